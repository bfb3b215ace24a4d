// ABOUTME: Artifact upload entries from the config file.
// ABOUTME: Each entry names a local file and its target generic repository path.

use serde::Deserialize;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// One artifact as written in the config file; every field is required at
/// validation time.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArtifactSettings {
    #[serde(default)]
    pub source_path: Option<PathBuf>,
    #[serde(default)]
    pub repository_id: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub artifact_path: Option<String>,
}

/// A validated artifact upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub source_path: PathBuf,
    pub repository_id: String,
    pub version: String,
    pub artifact_path: String,
}

impl ArtifactSettings {
    pub fn validate(&self) -> Result<Artifact> {
        let artifact_path = required(&self.artifact_path, "artifact_path")?;
        let repository_id = required(&self.repository_id, "repository_id")?;
        let source_path = self
            .source_path
            .clone()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(Error::MissingField("source_path"))?;
        let version = required(&self.version, "version")?;

        Ok(Artifact {
            source_path,
            repository_id,
            version,
            artifact_path,
        })
    }
}

pub(crate) fn required(value: &Option<String>, field: &'static str) -> Result<String> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or(Error::MissingField(field))
}
