// ABOUTME: Config-defined variable values: literals, environment lookups, or file contents.
// ABOUTME: Resolved once per run into the substitution environment and credential secrets.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EnvValue {
    Literal(String),
    FromEnv {
        #[serde(rename = "env")]
        var: String,
        #[serde(default)]
        default: Option<String>,
    },
    /// Contents of a file with surrounding whitespace trimmed.
    FromFile { file: PathBuf },
}

impl EnvValue {
    /// Resolve to a plain value. Relative `file` paths are taken from
    /// `base_dir` when one is given.
    pub fn resolve(&self, base_dir: Option<&Path>) -> Result<String> {
        match self {
            EnvValue::Literal(s) => Ok(s.clone()),
            EnvValue::FromEnv { var, default } => std::env::var(var)
                .ok()
                .or_else(|| default.clone())
                .ok_or_else(|| Error::MissingEnvVar(var.clone())),
            EnvValue::FromFile { file } => {
                let path = match base_dir {
                    Some(base) if file.is_relative() => base.join(file),
                    _ => file.clone(),
                };
                std::fs::read_to_string(&path)
                    .map(|content| content.trim().to_string())
                    .map_err(|e| {
                        Error::InvalidConfig(format!("cannot read {}: {}", path.display(), e))
                    })
            }
        }
    }
}

/// Resolve every value in `vars`, failing on the first one that cannot be.
pub fn resolve_vars(
    vars: &HashMap<String, EnvValue>,
    base_dir: Option<&Path>,
) -> Result<HashMap<String, String>> {
    vars.iter()
        .map(|(name, value)| value.resolve(base_dir).map(|resolved| (name.clone(), resolved)))
        .collect()
}
