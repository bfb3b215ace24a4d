// ABOUTME: Error types for deployment tracking.
// ABOUTME: Separates failures creating a deployment from failures following it.

use crate::service::ServiceError;

/// Errors that can occur while submitting or polling a deployment.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// The create call failed; nothing was started.
    #[error("failed to create deployment")]
    Create {
        #[source]
        source: ServiceError,
    },

    /// A status fetch failed and was not retried, or failed on the last attempt.
    #[error("failed to get deployment status")]
    Poll {
        #[source]
        source: ServiceError,
    },

    /// Timeout and interval do not describe a usable polling budget.
    #[error("invalid polling policy: {0}")]
    InvalidPolicy(String),
}

impl DeployError {
    /// The underlying service error, if any.
    pub fn service_error(&self) -> Option<&ServiceError> {
        match self {
            DeployError::Create { source } | DeployError::Poll { source } => Some(source),
            DeployError::InvalidPolicy(_) => None,
        }
    }
}
