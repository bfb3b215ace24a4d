// ABOUTME: Deployment tracking using the type state pattern.
// ABOUTME: Exports the retry policy, tracker states, outcome rules, and the orchestrator.

mod error;
mod orchestrate;
mod outcome;
mod retry;
mod tracker;

pub use error::DeployError;
pub use orchestrate::orchestrate;
pub use outcome::Outcome;
pub use retry::RetryPolicy;
pub use tracker::{Done, Submitted, Submitting, Tracker};
