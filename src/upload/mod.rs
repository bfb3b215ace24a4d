// ABOUTME: Generic artifact upload to the regional artifact registry.
// ABOUTME: Derives the endpoint from the repository identifier and PUTs each file in turn.

use reqwest::Method;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{error, info};

use crate::auth::AuthProvider;
use crate::config::{Artifact, Config};
use crate::deploy::Outcome;
use crate::error::{Error, Result};
use crate::output::ResultSink;
use crate::service::{Payload, ServiceError, SignedClient};
use crate::types::{OcidError, Region, RegionError, parse_region};

const ARTIFACTS_API_VERSION: &str = "20160918";

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("repository id '{repository_id}' is not a valid identifier")]
    InvalidRepository {
        repository_id: String,
        #[source]
        source: OcidError,
    },

    #[error("cannot determine upload endpoint for '{repository_id}'")]
    UnknownRegion {
        repository_id: String,
        #[source]
        source: RegionError,
    },

    #[error("cannot read artifact {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to upload {artifact_path}")]
    Request {
        artifact_path: String,
        #[source]
        source: ServiceError,
    },
}

/// Upload endpoint for the region a repository lives in,
/// e.g. `https://generic.us-ashburn-1.ocir.io`.
pub fn upload_endpoint(repository_id: &str) -> std::result::Result<String, UploadError> {
    let code = parse_region(repository_id).map_err(|source| UploadError::InvalidRepository {
        repository_id: repository_id.to_string(),
        source,
    })?;
    let region = Region::from_code(&code).map_err(|source| UploadError::UnknownRegion {
        repository_id: repository_id.to_string(),
        source,
    })?;
    Ok(format!("https://generic.{}.ocir.io", region.id()))
}

/// Uploads artifacts with one set of credentials.
#[derive(Debug)]
pub struct ArtifactUploader {
    client: SignedClient,
    endpoint: Option<String>,
}

impl ArtifactUploader {
    pub fn new(client: SignedClient) -> Self {
        Self {
            client,
            endpoint: None,
        }
    }

    /// Send every upload to `endpoint` instead of the regional one.
    pub fn with_endpoint(client: SignedClient, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: Some(endpoint.into().trim_end_matches('/').to_string()),
        }
    }

    /// Full URL the artifact is PUT to.
    pub fn artifact_url(&self, artifact: &Artifact) -> std::result::Result<String, UploadError> {
        let endpoint = match &self.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => upload_endpoint(&artifact.repository_id)?,
        };
        Ok(format!(
            "{}/{}/generic/repositories/{}/artifactPaths/{}/versions/{}",
            endpoint,
            ARTIFACTS_API_VERSION,
            urlencoding::encode(&artifact.repository_id),
            urlencoding::encode(&artifact.artifact_path),
            urlencoding::encode(&artifact.version),
        ))
    }

    pub async fn upload(&self, artifact: &Artifact) -> std::result::Result<(), UploadError> {
        let url = self.artifact_url(artifact)?;
        let content =
            tokio::fs::read(&artifact.source_path)
                .await
                .map_err(|source| UploadError::Read {
                    path: artifact.source_path.clone(),
                    source,
                })?;

        info!(%url, bytes = content.len(), "uploading artifact");
        self.client
            .execute(Method::PUT, &url, Payload::Binary(content))
            .await
            .map_err(|source| UploadError::Request {
                artifact_path: artifact.artifact_path.clone(),
                source,
            })?;
        Ok(())
    }
}

/// Upload every artifact in `config`, in order, stopping at the first failure.
///
/// Like the deployment run, errors are reported to `sink` and `finish` is
/// called exactly once.
pub async fn upload_artifacts<A, R>(config: &Config, auth: &A, sink: &mut R) -> Outcome
where
    A: AuthProvider + ?Sized,
    R: ResultSink + ?Sized,
{
    upload_artifacts_to(config, auth, None, sink).await
}

/// [`upload_artifacts`], sending every request to `endpoint` when given
/// instead of each repository's regional endpoint.
pub async fn upload_artifacts_to<A, R>(
    config: &Config,
    auth: &A,
    endpoint: Option<&str>,
    sink: &mut R,
) -> Outcome
where
    A: AuthProvider + ?Sized,
    R: ResultSink + ?Sized,
{
    let outcome = match run(config, auth, endpoint, sink).await {
        Ok(()) => Outcome::Success,
        Err(e) => {
            error!(error = %e, "artifact upload failed");
            sink.error(&e);
            Outcome::Failure
        }
    };
    sink.finish(outcome);
    outcome
}

async fn run<A, R>(config: &Config, auth: &A, endpoint: Option<&str>, sink: &mut R) -> Result<()>
where
    A: AuthProvider + ?Sized,
    R: ResultSink + ?Sized,
{
    let settings = config.upload()?;
    let signer = auth.signer(&settings.credentials_id)?;
    let client = SignedClient::new(signer, settings.request_timeout).map_err(Error::Http)?;
    let uploader = match endpoint {
        Some(endpoint) => ArtifactUploader::with_endpoint(client, endpoint),
        None => ArtifactUploader::new(client),
    };

    for artifact in settings.artifacts.iter() {
        sink.progress(&format!(
            "Uploading {} as {}:{}",
            artifact.source_path.display(),
            artifact.artifact_path,
            artifact.version
        ));
        uploader.upload(artifact).await?;
    }
    sink.progress(&format!("Uploaded {} artifact(s)", settings.artifacts.len()));
    Ok(())
}
