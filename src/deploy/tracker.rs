// ABOUTME: Deployment lifecycle tracking using the type state pattern.
// ABOUTME: Submits one deployment, then polls it under a RetryPolicy until it settles.

use tracing::{debug, info, warn};

use crate::service::{Deployment, DeploymentRequest, DeploymentService};

use super::error::DeployError;
use super::outcome::Outcome;
use super::retry::RetryPolicy;

/// Nothing has been sent yet.
/// Available actions: `submit()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Submitting;

/// The service accepted the create call.
/// Available actions: `wait()`
#[derive(Debug, Clone)]
pub struct Submitted {
    deployment: Deployment,
}

/// Polling has stopped.
/// Available actions: `outcome()`, `deployment()`
#[derive(Debug, Clone)]
pub struct Done {
    deployment: Deployment,
    polls: u32,
}

/// One deployment run, parameterized by how far it has progressed.
#[derive(Debug)]
pub struct Tracker<'a, S: ?Sized, St> {
    service: &'a S,
    policy: RetryPolicy,
    state: St,
}

impl<'a, S: DeploymentService + ?Sized> Tracker<'a, S, Submitting> {
    pub fn new(service: &'a S, policy: RetryPolicy) -> Self {
        Tracker {
            service,
            policy,
            state: Submitting,
        }
    }

    /// Create the deployment. Exactly one create call is made.
    pub async fn submit(
        self,
        request: &DeploymentRequest,
    ) -> Result<Tracker<'a, S, Submitted>, DeployError> {
        let deployment = self
            .service
            .create_deployment(request)
            .await
            .map_err(|source| DeployError::Create { source })?;

        info!(
            deployment = %deployment.id,
            state = %deployment.lifecycle_state,
            "deployment created"
        );

        Ok(Tracker {
            service: self.service,
            policy: self.policy,
            state: Submitted { deployment },
        })
    }
}

impl<'a, S: DeploymentService + ?Sized> Tracker<'a, S, Submitted> {
    /// The deployment as returned by the create call.
    pub fn deployment(&self) -> &Deployment {
        &self.state.deployment
    }

    /// Poll until the deployment leaves the retryable states or the attempt
    /// budget runs out.
    ///
    /// No polling happens when the created state is already final for the
    /// mode. When the budget runs out the last fetched deployment is kept;
    /// an error on the last attempt is returned instead.
    pub async fn wait(self) -> Result<Tracker<'a, S, Done>, DeployError> {
        let Tracker {
            service,
            policy,
            state: Submitted {
                deployment: created,
            },
        } = self;
        let done = |deployment: Deployment, polls: u32| Tracker {
            service,
            policy,
            state: Done { deployment, polls },
        };

        if !policy.should_retry_on_result(created.lifecycle_state) {
            debug!(state = %created.lifecycle_state, "no polling needed");
            return Ok(done(created, 0));
        }

        let mut attempt = 0;
        loop {
            attempt += 1;
            match service.get_deployment(&created.id).await {
                Ok(deployment) => {
                    let state = deployment.lifecycle_state;
                    if !policy.should_retry_on_result(state) {
                        return Ok(done(deployment, attempt));
                    }
                    if attempt >= policy.max_attempts() {
                        warn!(%state, attempt, "polling budget exhausted");
                        return Ok(done(deployment, attempt));
                    }
                    info!(%state, attempt, "deployment still running");
                }
                Err(source) => {
                    if !policy.should_retry_on_error(&source) || attempt >= policy.max_attempts() {
                        return Err(DeployError::Poll { source });
                    }
                    warn!(error = %source, attempt, "status fetch failed, retrying");
                }
            }
            tokio::time::sleep(policy.wait()).await;
        }
    }
}

impl<S: ?Sized> Tracker<'_, S, Done> {
    /// The last observed deployment.
    pub fn deployment(&self) -> &Deployment {
        &self.state.deployment
    }

    /// Number of status fetches made.
    pub fn polls(&self) -> u32 {
        self.state.polls
    }

    pub fn outcome(&self) -> Outcome {
        self.policy
            .mode()
            .outcome(self.state.deployment.lifecycle_state)
    }
}
