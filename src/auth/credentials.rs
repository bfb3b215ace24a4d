// ABOUTME: File-backed API key credentials and the AuthProvider that serves them.
// ABOUTME: Looks credentials up by id and turns them into request signers.

use openssl::pkey::{PKey, Private};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::RequestSigner;
use crate::config::EnvValue;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("credentials '{0}' could not be found")]
    NotFound(String),

    #[error("credentials '{id}' are invalid: {reason}")]
    Invalid { id: String, reason: String },

    #[error("cannot read credentials file {path}")]
    Store {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse credentials file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Turns a credential id into something that can sign requests.
pub trait AuthProvider {
    fn signer(&self, credentials_id: &str) -> Result<RequestSigner, CredentialError>;
}

/// One API signing key entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiKeyCredentials {
    pub id: String,
    pub tenant_id: String,
    pub user_id: String,
    pub fingerprint: String,
    #[serde(default)]
    pub region_id: Option<String>,
    /// PEM private key file.
    #[serde(default)]
    pub key_file: Option<PathBuf>,
    /// PEM private key inline.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub passphrase: Option<EnvValue>,
}

impl ApiKeyCredentials {
    fn invalid(&self, reason: impl Into<String>) -> CredentialError {
        CredentialError::Invalid {
            id: self.id.clone(),
            reason: reason.into(),
        }
    }

    fn private_key(&self, base_dir: Option<&Path>) -> Result<PKey<Private>, CredentialError> {
        let pem = match (&self.api_key, &self.key_file) {
            (Some(inline), _) => inline.clone().into_bytes(),
            (None, Some(file)) => {
                let path = match base_dir {
                    Some(base) if file.is_relative() => base.join(file),
                    _ => file.clone(),
                };
                std::fs::read(&path)
                    .map_err(|e| self.invalid(format!("cannot read {}: {}", path.display(), e)))?
            }
            (None, None) => return Err(self.invalid("either key_file or api_key is required")),
        };

        let passphrase = self
            .passphrase
            .as_ref()
            .map(|value| value.resolve(base_dir))
            .transpose()
            .map_err(|e| self.invalid(e.to_string()))?;

        let key = match passphrase {
            Some(pass) => PKey::private_key_from_pem_passphrase(&pem, pass.as_bytes()),
            None => PKey::private_key_from_pem(&pem),
        };
        key.map_err(|e| self.invalid(format!("cannot decode private key: {e}")))
    }

    fn key_id(&self) -> String {
        format!("{}/{}/{}", self.tenant_id, self.user_id, self.fingerprint)
    }
}

/// Credentials loaded from a YAML list.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    entries: Vec<ApiKeyCredentials>,
    base_dir: Option<PathBuf>,
}

impl CredentialStore {
    pub fn new(entries: Vec<ApiKeyCredentials>) -> Self {
        Self {
            entries,
            base_dir: None,
        }
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml).map(Self::new)
    }

    /// Load a store; relative key paths resolve against the file's directory.
    pub fn load(path: &Path) -> Result<Self, CredentialError> {
        let content = std::fs::read_to_string(path).map_err(|source| CredentialError::Store {
            path: path.to_path_buf(),
            source,
        })?;
        let mut store = Self::from_yaml(&content).map_err(|source| CredentialError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        store.base_dir = path.parent().map(Path::to_path_buf);
        Ok(store)
    }

    pub fn get(&self, id: &str) -> Option<&ApiKeyCredentials> {
        self.entries.iter().find(|c| c.id == id)
    }
}

impl AuthProvider for CredentialStore {
    fn signer(&self, credentials_id: &str) -> Result<RequestSigner, CredentialError> {
        let credentials = self
            .get(credentials_id)
            .ok_or_else(|| CredentialError::NotFound(credentials_id.to_string()))?;

        let key = credentials.private_key(self.base_dir.as_deref())?;
        let signer = RequestSigner::new(credentials.key_id(), key);
        Ok(match &credentials.region_id {
            Some(region) => signer.with_region(region),
            None => signer,
        })
    }
}

/// A credentials file that is read each time a signer is requested, so a
/// missing or broken file surfaces as a run failure rather than at startup.
#[derive(Debug, Clone)]
pub struct CredentialFile {
    path: PathBuf,
}

impl CredentialFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl AuthProvider for CredentialFile {
    fn signer(&self, credentials_id: &str) -> Result<RequestSigner, CredentialError> {
        CredentialStore::load(&self.path)?.signer(credentials_id)
    }
}
