// ABOUTME: Configuration types and parsing for ocideploy.yml.
// ABOUTME: Handles YAML parsing, CLI overrides, and validation into immutable run configs.

mod artifact;
mod env_value;
mod execution_mode;
mod init;
mod polling;

pub use artifact::{Artifact, ArtifactSettings};
pub use env_value::{EnvValue, resolve_vars};
pub use execution_mode::ExecutionMode;
pub use init::init_config;
pub use polling::{
    MIN_POLLING_INTERVAL_SECONDS, MIN_TIMEOUT_SECONDS, PollingConfig, PollingError,
};

use crate::error::{Error, Result};
use crate::types::PipelineId;
use artifact::required;
use nonempty::NonEmpty;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "ocideploy.yml";
pub const CONFIG_FILENAME_ALT: &str = "ocideploy.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".ocideploy/config.yml";
pub const CREDENTIALS_FILENAME: &str = "credentials.yml";

/// The config file as written. Required fields are optional here so that a
/// missing one is reported as a configuration error naming the field.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub credentials_id: Option<String>,

    #[serde(default)]
    pub credentials_file: Option<PathBuf>,

    #[serde(default)]
    pub pipeline_id: Option<String>,

    #[serde(default)]
    pub display_name: Option<String>,

    #[serde(default)]
    pub endpoint: Option<String>,

    /// JSON object template; `${NAME}` placeholders are substituted first.
    #[serde(default)]
    pub arguments: Option<String>,

    #[serde(default)]
    pub polling: PollingConfig,

    #[serde(default)]
    pub execution_mode: Option<ExecutionMode>,

    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,

    #[serde(default)]
    pub env: HashMap<String, EnvValue>,

    #[serde(default)]
    pub artifacts: Vec<ArtifactSettings>,

    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

/// Values supplied on the command line that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct DeployOverrides {
    pub execution_mode: Option<ExecutionMode>,
    pub display_name: Option<String>,
    pub timeout: Option<String>,
    pub polling_interval: Option<String>,
}

/// Validated, immutable settings for one deployment run.
#[derive(Debug, Clone)]
pub struct DeploymentConfig {
    credentials_id: String,
    pipeline_id: PipelineId,
    display_name: String,
    endpoint: String,
    arguments: Option<String>,
    polling: PollingConfig,
    execution_mode: ExecutionMode,
    request_timeout: Duration,
}

impl DeploymentConfig {
    pub fn credentials_id(&self) -> &str {
        &self.credentials_id
    }

    pub fn pipeline_id(&self) -> &PipelineId {
        &self.pipeline_id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn arguments(&self) -> Option<&str> {
        self.arguments.as_deref()
    }

    pub fn polling(&self) -> &PollingConfig {
        &self.polling
    }

    pub fn execution_mode(&self) -> ExecutionMode {
        self.execution_mode
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

/// Validated settings for an artifact upload run.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub credentials_id: String,
    pub artifacts: NonEmpty<Artifact>,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&content)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        candidates
            .iter()
            .find(|path| path.exists())
            .map(|path| Self::load(path))
            .unwrap_or_else(|| Err(Error::ConfigNotFound(dir.to_path_buf())))
    }

    /// Apply command-line overrides, returning the merged config.
    pub fn with_overrides(mut self, overrides: DeployOverrides) -> Self {
        if let Some(mode) = overrides.execution_mode {
            self.execution_mode = Some(mode);
        }
        if let Some(name) = overrides.display_name {
            self.display_name = Some(name);
        }
        self.polling = match (overrides.timeout, overrides.polling_interval) {
            (None, None) => self.polling,
            (Some(timeout), Some(interval)) => PollingConfig::parse(&timeout, &interval),
            // A non-integer in the file stays invalid unless both values are replaced.
            _ if !self.polling.is_valid() => self.polling,
            (timeout, interval) => PollingConfig::parse(
                &timeout.unwrap_or_else(|| self.polling.timeout_seconds().to_string()),
                &interval.unwrap_or_else(|| self.polling.polling_interval_seconds().to_string()),
            ),
        };
        self
    }

    /// Location of the credentials file, relative paths resolved against the
    /// directory holding the config file.
    pub fn credentials_path(&self) -> PathBuf {
        let path = self
            .credentials_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(CREDENTIALS_FILENAME));
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path,
        }
    }

    /// Validate the deployment settings.
    ///
    /// Checks run in a fixed order so the first problem reported is stable:
    /// credentials, pipeline, display name, endpoint, execution mode, then the
    /// polling bounds.
    pub fn deployment(&self) -> Result<DeploymentConfig> {
        let credentials_id = required(&self.credentials_id, "credentials_id")?;
        let pipeline_id = required(&self.pipeline_id, "pipeline_id")?;
        let display_name = required(&self.display_name, "display_name")?;
        let endpoint = required(&self.endpoint, "endpoint")?;
        let execution_mode = self
            .execution_mode
            .ok_or(Error::MissingField("execution_mode"))?;
        self.polling.validate()?;

        Ok(DeploymentConfig {
            credentials_id,
            pipeline_id: PipelineId::new(pipeline_id),
            display_name,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            arguments: self.arguments.clone(),
            polling: self.polling,
            execution_mode,
            request_timeout: self.request_timeout,
        })
    }

    /// Validate the artifact upload settings.
    pub fn upload(&self) -> Result<UploadConfig> {
        let credentials_id = required(&self.credentials_id, "credentials_id")?;
        let artifacts = self
            .artifacts
            .iter()
            .map(ArtifactSettings::validate)
            .collect::<Result<Vec<_>>>()?;
        let artifacts = NonEmpty::from_vec(artifacts).ok_or(Error::MissingField("artifacts"))?;

        Ok(UploadConfig {
            credentials_id,
            artifacts,
            request_timeout: self.request_timeout,
        })
    }

    /// Resolve the `env` section into plain values. Relative `file` entries
    /// are read from the directory holding the config file.
    pub fn resolved_env(&self) -> Result<HashMap<String, String>> {
        resolve_vars(&self.env, self.base_dir.as_deref())
    }

    pub fn template() -> Self {
        Config {
            credentials_id: Some("default".to_string()),
            credentials_file: None,
            pipeline_id: Some("ocid1.devopsdeploypipeline.oc1.iad.example".to_string()),
            display_name: Some("deploy-from-ci".to_string()),
            endpoint: Some("https://devops.us-ashburn-1.oci.oraclecloud.com".to_string()),
            arguments: None,
            polling: PollingConfig::default(),
            execution_mode: Some(ExecutionMode::Sync),
            request_timeout: default_request_timeout(),
            env: HashMap::new(),
            artifacts: vec![],
            base_dir: None,
        }
    }
}
