// ABOUTME: Deployment service error types with SNAFU pattern.
// ABOUTME: Classifies failures as not-found (permanent) or transient for retry decisions.

use snafu::Snafu;

/// Failure talking to the deployment or artifact service.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ServiceError {
    #[snafu(display("request to {url} failed"))]
    Transport { url: String, source: reqwest::Error },

    #[snafu(display("service returned {status} for {url}: {message}"))]
    Status {
        url: String,
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[snafu(display("failed to decode response from {url}"))]
    Decode {
        url: String,
        source: serde_json::Error,
    },

    #[snafu(display("failed to encode request for {url}"))]
    Encode {
        url: String,
        source: serde_json::Error,
    },

    #[snafu(display("failed to sign request to {url}: {message}"))]
    Signing { url: String, message: String },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceErrorKind {
    /// The target resource does not exist. Never retried.
    NotFound,
    /// Anything else; worth another attempt.
    Transient,
}

impl ServiceError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> ServiceErrorKind {
        match self {
            ServiceError::Status { status: 404, .. } => ServiceErrorKind::NotFound,
            _ => ServiceErrorKind::Transient,
        }
    }

    /// HTTP status when the service answered with an error response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ServiceError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
