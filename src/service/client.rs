// ABOUTME: Signed HTTP client for the deployment service REST API.
// ABOUTME: Create and get deployment calls, with service errors decoded from responses.

use async_trait::async_trait;
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use snafu::ResultExt;
use std::time::Duration;

use super::DeploymentService;
use super::error::{DecodeSnafu, EncodeSnafu, ServiceError, TransportSnafu};
use super::models::{ApiErrorBody, CreateDeploymentDetails, Deployment, DeploymentRequest};
use crate::auth::{BodySigning, RequestSigner};
use crate::types::DeploymentId;

const DEVOPS_API_VERSION: &str = "20210630";

/// Request body and how it is signed.
#[derive(Debug, Clone)]
pub enum Payload {
    Empty,
    Json(Vec<u8>),
    Binary(Vec<u8>),
}

/// An HTTP client that signs every request with one set of credentials.
#[derive(Debug)]
pub struct SignedClient {
    http: Client,
    signer: RequestSigner,
}

impl SignedClient {
    pub fn new(signer: RequestSigner, request_timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(request_timeout)
            .user_agent(concat!("ocideploy/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, signer })
    }

    /// Send a signed request and return the raw response body on success.
    pub async fn execute(
        &self,
        method: Method,
        url: &str,
        payload: Payload,
    ) -> Result<Vec<u8>, ServiceError> {
        let parsed = Url::parse(url).map_err(|e| ServiceError::Signing {
            url: url.to_string(),
            message: format!("invalid URL: {e}"),
        })?;

        let signing = match &payload {
            Payload::Empty => BodySigning::None,
            Payload::Json(bytes) => BodySigning::Json(bytes),
            Payload::Binary(_) => BodySigning::Excluded,
        };
        let headers = self
            .signer
            .sign(method.as_str(), &parsed, signing)
            .map_err(|e| ServiceError::Signing {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let mut request = self.http.request(method, parsed);
        for (name, value) in &headers {
            // reqwest computes the length from the body itself
            if name != "content-length" {
                request = request.header(name.as_str(), value.as_str());
            }
        }
        request = match payload {
            Payload::Empty => request,
            Payload::Json(bytes) => request.body(bytes),
            Payload::Binary(bytes) => request
                .header("content-type", "application/octet-stream")
                .body(bytes),
        };

        let response = request.send().await.context(TransportSnafu { url })?;
        let status = response.status();
        let body = response.bytes().await.context(TransportSnafu { url })?;

        if !status.is_success() {
            let error: ApiErrorBody = serde_json::from_slice(&body).unwrap_or_default();
            return Err(ServiceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                code: error.code,
                message: error
                    .message
                    .unwrap_or_else(|| String::from_utf8_lossy(&body).into_owned()),
            });
        }

        Ok(body.to_vec())
    }

    async fn execute_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        payload: Payload,
    ) -> Result<T, ServiceError> {
        let body = self.execute(method, url, payload).await?;
        serde_json::from_slice(&body).context(DecodeSnafu { url })
    }
}

/// Deployment service client bound to one regional endpoint.
#[derive(Debug)]
pub struct HttpDeploymentClient {
    client: SignedClient,
    endpoint: String,
}

impl HttpDeploymentClient {
    pub fn new(endpoint: impl Into<String>, client: SignedClient) -> Self {
        Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn deployments_url(&self) -> String {
        format!("{}/{}/deployments", self.endpoint, DEVOPS_API_VERSION)
    }
}

#[async_trait]
impl DeploymentService for HttpDeploymentClient {
    async fn create_deployment(
        &self,
        request: &DeploymentRequest,
    ) -> Result<Deployment, ServiceError> {
        let url = self.deployments_url();
        let body = serde_json::to_vec(&CreateDeploymentDetails::from(request))
            .context(EncodeSnafu { url: url.as_str() })?;
        tracing::debug!(%url, pipeline = %request.pipeline_id, "creating deployment");
        self.client
            .execute_json(Method::POST, &url, Payload::Json(body))
            .await
    }

    async fn get_deployment(&self, id: &DeploymentId) -> Result<Deployment, ServiceError> {
        let url = format!(
            "{}/{}",
            self.deployments_url(),
            urlencoding::encode(id.as_str())
        );
        tracing::debug!(%url, "fetching deployment");
        self.client
            .execute_json(Method::GET, &url, Payload::Empty)
            .await
    }
}
