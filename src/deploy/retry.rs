// ABOUTME: Retry policy for deployment status polling.
// ABOUTME: Attempt budget derived from timeout and interval, plus result and error predicates.

use std::time::Duration;

use crate::config::{ExecutionMode, PollingConfig};
use crate::service::{DeploymentState, ServiceError, ServiceErrorKind};

use super::error::DeployError;

/// How often and how long to poll a deployment.
///
/// The budget counts calls, not wall-clock time: `max_attempts` is
/// `timeout / interval`, and the first status fetch is attempt one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    wait: Duration,
    mode: ExecutionMode,
}

impl RetryPolicy {
    pub fn new(
        mode: ExecutionMode,
        timeout_seconds: u64,
        interval_seconds: u64,
    ) -> Result<Self, DeployError> {
        if interval_seconds == 0 {
            return Err(DeployError::InvalidPolicy(
                "polling interval must be greater than zero".to_string(),
            ));
        }
        let max_attempts = timeout_seconds / interval_seconds;
        if max_attempts == 0 {
            return Err(DeployError::InvalidPolicy(format!(
                "timeout of {timeout_seconds}s allows no polls at an interval of {interval_seconds}s"
            )));
        }

        Ok(Self {
            max_attempts: u32::try_from(max_attempts).unwrap_or(u32::MAX),
            wait: Duration::from_secs(interval_seconds),
            mode,
        })
    }

    pub fn from_polling(mode: ExecutionMode, polling: &PollingConfig) -> Result<Self, DeployError> {
        Self::new(
            mode,
            polling.timeout_seconds(),
            polling.polling_interval_seconds(),
        )
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn wait(&self) -> Duration {
        self.wait
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Whether a fetched state warrants another poll.
    pub fn should_retry_on_result(&self, state: DeploymentState) -> bool {
        self.mode.keeps_polling(state)
    }

    /// Whether a failed fetch warrants another poll.
    pub fn should_retry_on_error(&self, error: &ServiceError) -> bool {
        error.kind() != ServiceErrorKind::NotFound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: u16) -> ServiceError {
        ServiceError::Status {
            url: "https://example.com".to_string(),
            status: code,
            code: None,
            message: String::new(),
        }
    }

    #[test]
    fn budget_is_timeout_over_interval() {
        let policy = RetryPolicy::new(ExecutionMode::Sync, 120, 10).unwrap();
        assert_eq!(policy.max_attempts(), 12);
        assert_eq!(policy.wait(), Duration::from_secs(10));

        let policy = RetryPolicy::new(ExecutionMode::Sync, 27, 5).unwrap();
        assert_eq!(policy.max_attempts(), 5);
    }

    #[test]
    fn zero_interval_is_rejected() {
        assert!(matches!(
            RetryPolicy::new(ExecutionMode::Sync, 120, 0),
            Err(DeployError::InvalidPolicy(_))
        ));
    }

    #[test]
    fn empty_budget_is_rejected() {
        assert!(RetryPolicy::new(ExecutionMode::Async, 4, 5).is_err());
    }

    #[test]
    fn sync_retries_until_terminal() {
        let policy = RetryPolicy::new(ExecutionMode::Sync, 20, 10).unwrap();
        assert!(policy.should_retry_on_result(DeploymentState::Accepted));
        assert!(policy.should_retry_on_result(DeploymentState::InProgress));
        assert!(!policy.should_retry_on_result(DeploymentState::Succeeded));
        assert!(!policy.should_retry_on_result(DeploymentState::Failed));
        assert!(!policy.should_retry_on_result(DeploymentState::Canceled));
    }

    #[test]
    fn async_also_stops_on_in_progress() {
        let policy = RetryPolicy::new(ExecutionMode::Async, 20, 10).unwrap();
        assert!(policy.should_retry_on_result(DeploymentState::Accepted));
        assert!(!policy.should_retry_on_result(DeploymentState::InProgress));
        assert!(!policy.should_retry_on_result(DeploymentState::Succeeded));
    }

    #[test]
    fn not_found_is_never_retried() {
        let policy = RetryPolicy::new(ExecutionMode::Sync, 20, 10).unwrap();
        assert!(!policy.should_retry_on_error(&status(404)));
        assert!(policy.should_retry_on_error(&status(503)));
    }
}
