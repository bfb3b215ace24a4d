// ABOUTME: Polling timeout and interval configuration for deployment tracking.
// ABOUTME: Accepts integers or integer strings; non-integers mark the config invalid.

use serde::Deserialize;
use thiserror::Error;

pub const MIN_TIMEOUT_SECONDS: u64 = 10;
pub const MIN_POLLING_INTERVAL_SECONDS: u64 = 5;

const DEFAULT_TIMEOUT_SECONDS: u64 = 120;
const DEFAULT_POLLING_INTERVAL_SECONDS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollingError {
    #[error("timeout and polling interval must be integers")]
    NotIntegers,

    #[error("timeout in seconds must be at least 10 (got {0})")]
    TimeoutTooShort(u64),

    #[error("polling interval in seconds must be at least 5 (got {0})")]
    IntervalTooShort(u64),

    #[error("timeout ({timeout}s) must not be shorter than the polling interval ({interval}s)")]
    IntervalExceedsTimeout { timeout: u64, interval: u64 },
}

/// How long to track a deployment and how often to ask for its state.
///
/// Values that were supplied but are not non-negative integers leave the
/// config in an invalid state; `validate` reports it before any use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "RawPolling")]
pub struct PollingConfig {
    timeout_seconds: u64,
    polling_interval_seconds: u64,
    is_valid: bool,
}

impl PollingConfig {
    pub fn new(timeout_seconds: u64, polling_interval_seconds: u64) -> Self {
        Self {
            timeout_seconds,
            polling_interval_seconds,
            is_valid: true,
        }
    }

    /// Build from user-supplied text such as command-line flags.
    pub fn parse(timeout: &str, polling_interval: &str) -> Self {
        match (parse_seconds(timeout), parse_seconds(polling_interval)) {
            (Some(t), Some(i)) => Self::new(t, i),
            _ => Self::invalid(),
        }
    }

    fn invalid() -> Self {
        Self {
            timeout_seconds: 0,
            polling_interval_seconds: 0,
            is_valid: false,
        }
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    pub fn polling_interval_seconds(&self) -> u64 {
        self.polling_interval_seconds
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Check integer-ness, minimums, and that the interval fits in the timeout.
    pub fn validate(&self) -> Result<(), PollingError> {
        if !self.is_valid {
            return Err(PollingError::NotIntegers);
        }
        if self.timeout_seconds < MIN_TIMEOUT_SECONDS {
            return Err(PollingError::TimeoutTooShort(self.timeout_seconds));
        }
        if self.polling_interval_seconds < MIN_POLLING_INTERVAL_SECONDS {
            return Err(PollingError::IntervalTooShort(
                self.polling_interval_seconds,
            ));
        }
        if self.polling_interval_seconds > self.timeout_seconds {
            return Err(PollingError::IntervalExceedsTimeout {
                timeout: self.timeout_seconds,
                interval: self.polling_interval_seconds,
            });
        }
        Ok(())
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT_SECONDS, DEFAULT_POLLING_INTERVAL_SECONDS)
    }
}

fn parse_seconds(s: &str) -> Option<u64> {
    s.trim().parse().ok()
}

#[derive(Deserialize)]
struct RawPolling {
    #[serde(default)]
    timeout_seconds: Option<serde_yaml::Value>,
    #[serde(default)]
    polling_interval_seconds: Option<serde_yaml::Value>,
}

impl From<RawPolling> for PollingConfig {
    fn from(raw: RawPolling) -> Self {
        let timeout = seconds_from_value(raw.timeout_seconds, DEFAULT_TIMEOUT_SECONDS);
        let interval = seconds_from_value(
            raw.polling_interval_seconds,
            DEFAULT_POLLING_INTERVAL_SECONDS,
        );
        match (timeout, interval) {
            (Some(t), Some(i)) => Self::new(t, i),
            _ => Self::invalid(),
        }
    }
}

fn seconds_from_value(value: Option<serde_yaml::Value>, default: u64) -> Option<u64> {
    match value {
        None | Some(serde_yaml::Value::Null) => Some(default),
        Some(serde_yaml::Value::Number(n)) => n.as_u64(),
        Some(serde_yaml::Value::String(s)) => parse_seconds(&s),
        Some(_) => None,
    }
}
