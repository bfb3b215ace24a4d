// ABOUTME: Deployment service abstraction and its HTTP implementation.
// ABOUTME: The tracker only sees the DeploymentService trait; Connect builds clients from credentials.

mod client;
mod error;
mod models;

pub use client::{HttpDeploymentClient, Payload, SignedClient};
pub use error::{ServiceError, ServiceErrorKind};
pub use models::{Deployment, DeploymentRequest, DeploymentState, Phase};

use async_trait::async_trait;
use crate::auth::AuthProvider;
use crate::config::DeploymentConfig;
use crate::error::{Error, Result};
use crate::types::DeploymentId;

/// Remote operations needed to start and follow a deployment.
#[async_trait]
pub trait DeploymentService: Send + Sync {
    async fn create_deployment(
        &self,
        request: &DeploymentRequest,
    ) -> std::result::Result<Deployment, ServiceError>;

    async fn get_deployment(
        &self,
        id: &DeploymentId,
    ) -> std::result::Result<Deployment, ServiceError>;
}

/// Builds an authenticated service client from validated deployment settings.
pub trait Connect {
    type Client: DeploymentService;

    fn connect(&self, settings: &DeploymentConfig) -> Result<Self::Client>;
}

/// Connects to the real service using an [`AuthProvider`].
#[derive(Debug)]
pub struct ApiConnector<A> {
    auth: A,
}

impl<A: AuthProvider> ApiConnector<A> {
    pub fn new(auth: A) -> Self {
        Self { auth }
    }
}

impl<A: AuthProvider> Connect for ApiConnector<A> {
    type Client = HttpDeploymentClient;

    fn connect(&self, settings: &DeploymentConfig) -> Result<Self::Client> {
        let signer = self.auth.signer(settings.credentials_id())?;
        let client =
            SignedClient::new(signer, settings.request_timeout()).map_err(Error::Http)?;
        Ok(HttpDeploymentClient::new(settings.endpoint(), client))
    }
}
