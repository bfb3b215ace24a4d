// ABOUTME: Tests for the signed HTTP deployment client against a mock server.
// ABOUTME: Checks request paths, bodies, signing headers, and error decoding.

mod support;

use ocideploy::arguments::Arguments;
use ocideploy::auth::RequestSigner;
use ocideploy::service::{
    DeploymentRequest, DeploymentService, DeploymentState, HttpDeploymentClient, ServiceError,
    ServiceErrorKind, SignedClient,
};
use ocideploy::types::{DeploymentId, PipelineId};
use openssl::pkey::PKey;
use openssl::rsa::Rsa;
use serde_json::json;
use std::time::Duration;
use support::DEPLOYMENT_ID;
use wiremock::matchers::{body_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn signed_client() -> SignedClient {
    let key = PKey::from_rsa(Rsa::generate(2048).unwrap()).unwrap();
    SignedClient::new(RequestSigner::new("tenancy/user/fp", key), Duration::from_secs(5)).unwrap()
}

fn deployment_json(state: &str) -> serde_json::Value {
    json!({
        "id": DEPLOYMENT_ID,
        "displayName": "release",
        "deployPipelineId": "ocid1.devopsdeploypipeline.oc1.iad.p",
        "deploymentType": "PIPELINE_DEPLOYMENT",
        "lifecycleState": state,
        "timeCreated": "2024-05-01T10:00:00.000Z"
    })
}

#[tokio::test]
async fn create_posts_signed_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/20210630/deployments"))
        .and(header_exists("authorization"))
        .and(header_exists("x-content-sha256"))
        .and(header_exists("date"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "deploymentType": "PIPELINE_DEPLOYMENT",
            "deployPipelineId": "ocid1.devopsdeploypipeline.oc1.iad.p",
            "displayName": "release",
            "deploymentArguments": {"items": [{"name": "TAG", "value": "v1"}]}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(deployment_json("ACCEPTED")))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpDeploymentClient::new(format!("{}/", server.uri()), signed_client());
    let mut arguments = Arguments::new();
    arguments.insert("TAG".to_string(), "v1".to_string());
    let request = DeploymentRequest {
        pipeline_id: PipelineId::new("ocid1.devopsdeploypipeline.oc1.iad.p"),
        display_name: "release".to_string(),
        arguments,
        endpoint: server.uri(),
    };

    let deployment = client.create_deployment(&request).await.unwrap();
    assert_eq!(deployment.id.as_str(), DEPLOYMENT_ID);
    assert_eq!(deployment.lifecycle_state, DeploymentState::Accepted);
}

#[tokio::test]
async fn get_fetches_by_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/20210630/deployments/{DEPLOYMENT_ID}")))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(deployment_json("SUCCEEDED")))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpDeploymentClient::new(server.uri(), signed_client());
    let deployment = client
        .get_deployment(&DeploymentId::new(DEPLOYMENT_ID))
        .await
        .unwrap();
    assert_eq!(deployment.lifecycle_state, DeploymentState::Succeeded);
}

#[tokio::test]
async fn missing_deployment_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": "NotAuthorizedOrNotFound",
            "message": "Deployment not found"
        })))
        .mount(&server)
        .await;

    let client = HttpDeploymentClient::new(server.uri(), signed_client());
    let err = client
        .get_deployment(&DeploymentId::new("gone"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ServiceErrorKind::NotFound);
    match err {
        ServiceError::Status { code, message, .. } => {
            assert_eq!(code.as_deref(), Some("NotAuthorizedOrNotFound"));
            assert_eq!(message, "Deployment not found");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn server_error_without_json_keeps_raw_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let client = HttpDeploymentClient::new(server.uri(), signed_client());
    let err = client
        .get_deployment(&DeploymentId::new(DEPLOYMENT_ID))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ServiceErrorKind::Transient);
    assert_eq!(err.status(), Some(502));
    assert!(err.to_string().contains("bad gateway"));
}

#[tokio::test]
async fn undecodable_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;

    let client = HttpDeploymentClient::new(server.uri(), signed_client());
    let err = client
        .get_deployment(&DeploymentId::new(DEPLOYMENT_ID))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Decode { .. }));
    assert_eq!(err.kind(), ServiceErrorKind::Transient);
}
