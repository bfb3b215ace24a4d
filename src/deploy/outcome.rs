// ABOUTME: Final run outcome and the per-mode rules mapping lifecycle states to it.
// ABOUTME: Both rules are total over DeploymentState.

use serde::Serialize;
use std::fmt;

use crate::config::ExecutionMode;
use crate::service::DeploymentState;

/// What a run reports to its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        self == Outcome::Success
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => write!(f, "SUCCESS"),
            Outcome::Failure => write!(f, "FAILURE"),
        }
    }
}

impl ExecutionMode {
    /// Whether a deployment in `state` should be polled again.
    ///
    /// Sync waits for a terminal state. Async only waits for the deployment
    /// to start running.
    pub fn keeps_polling(self, state: DeploymentState) -> bool {
        use DeploymentState::*;
        match (self, state) {
            (_, Succeeded | Failed | Canceled) => false,
            (_, Accepted | Canceling | Unknown) => true,
            (ExecutionMode::Sync, InProgress) => true,
            (ExecutionMode::Async, InProgress) => false,
        }
    }

    /// Map the last observed state to the reported outcome.
    pub fn outcome(self, state: DeploymentState) -> Outcome {
        use DeploymentState::*;
        match (self, state) {
            (ExecutionMode::Sync, Succeeded) => Outcome::Success,
            (ExecutionMode::Sync, Accepted | InProgress | Failed | Canceling | Canceled | Unknown) => {
                Outcome::Failure
            }
            (ExecutionMode::Async, Accepted | InProgress | Succeeded) => Outcome::Success,
            (ExecutionMode::Async, Failed | Canceling | Canceled | Unknown) => Outcome::Failure,
        }
    }
}
