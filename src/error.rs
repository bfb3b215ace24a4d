// ABOUTME: Application-wide error types for ocideploy.
// ABOUTME: Uses thiserror; domain errors are wrapped transparently.

use std::path::PathBuf;
use thiserror::Error;

use crate::arguments::ArgumentsError;
use crate::auth::CredentialError;
use crate::config::PollingError;
use crate::deploy::DeployError;
use crate::types::{OcidError, RegionError};
use crate::upload::UploadError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("missing required configuration field: {0}")]
    MissingField(&'static str),

    #[error(transparent)]
    Polling(#[from] PollingError),

    #[error(transparent)]
    Ocid(#[from] OcidError),

    #[error(transparent)]
    Region(#[from] RegionError),

    #[error(transparent)]
    Arguments(#[from] ArgumentsError),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Deploy(#[from] DeployError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error("HTTP client error")]
    Http(#[source] reqwest::Error),

    #[error("I/O error")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
