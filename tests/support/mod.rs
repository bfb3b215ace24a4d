// ABOUTME: Test support utilities.
// ABOUTME: Scripted deployment service, connector, and fixtures for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use ocideploy::config::DeploymentConfig;
use ocideploy::error::Result;
use ocideploy::service::{
    Connect, Deployment, DeploymentRequest, DeploymentService, DeploymentState, ServiceError,
};
use ocideploy::types::DeploymentId;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::{Arc, Once};

pub const DEPLOYMENT_ID: &str = "ocid1.devopsdeployment.oc1.iad.amaaaaaatest";

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env()
            .add_directive("ocideploy=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub type Reply = std::result::Result<Deployment, ServiceError>;

pub fn deployment(state: DeploymentState) -> Deployment {
    Deployment {
        id: DeploymentId::new(DEPLOYMENT_ID),
        display_name: Some("test".to_string()),
        deploy_pipeline_id: None,
        lifecycle_state: state,
        lifecycle_details: None,
        time_created: None,
    }
}

pub fn ok(state: DeploymentState) -> Reply {
    Ok(deployment(state))
}

pub fn status_error(status: u16) -> ServiceError {
    ServiceError::Status {
        url: format!("https://devops.example.com/20210630/deployments/{DEPLOYMENT_ID}"),
        status,
        code: None,
        message: format!("scripted {status}"),
    }
}

#[derive(Debug, Default)]
struct Script {
    create: Option<Reply>,
    gets: VecDeque<Reply>,
    requests: Vec<DeploymentRequest>,
    get_calls: usize,
}

/// A deployment service that replays a fixed script of replies.
///
/// Clones share the same script, so a test can keep a handle while the code
/// under test owns another.
#[derive(Clone, Debug, Default)]
pub struct ScriptedService {
    script: Arc<Mutex<Script>>,
}

impl ScriptedService {
    /// Service whose create call returns `reply`.
    pub fn created(reply: Reply) -> Self {
        let service = Self::default();
        service.script.lock().create = Some(reply);
        service
    }

    /// Queue the reply for the next get call.
    pub fn then(self, reply: Reply) -> Self {
        self.script.lock().gets.push_back(reply);
        self
    }

    pub fn create_calls(&self) -> usize {
        self.script.lock().requests.len()
    }

    pub fn get_calls(&self) -> usize {
        self.script.lock().get_calls
    }

    pub fn last_request(&self) -> Option<DeploymentRequest> {
        self.script.lock().requests.last().cloned()
    }
}

#[async_trait]
impl DeploymentService for ScriptedService {
    async fn create_deployment(&self, request: &DeploymentRequest) -> Reply {
        let mut script = self.script.lock();
        script.requests.push(request.clone());
        script
            .create
            .take()
            .expect("create_deployment called more than once")
    }

    async fn get_deployment(&self, id: &DeploymentId) -> Reply {
        let mut script = self.script.lock();
        assert_eq!(id.as_str(), DEPLOYMENT_ID);
        script.get_calls += 1;
        script
            .gets
            .pop_front()
            .expect("get_deployment called more often than scripted")
    }
}

/// Hands out a [`ScriptedService`] and records how it was asked to connect.
#[derive(Clone, Default)]
pub struct ScriptedConnector {
    service: ScriptedService,
    connections: Arc<Mutex<Vec<(String, String)>>>,
}

impl ScriptedConnector {
    pub fn new(service: ScriptedService) -> Self {
        Self {
            service,
            connections: Arc::default(),
        }
    }

    /// (credentials id, endpoint) per connect call.
    pub fn connections(&self) -> Vec<(String, String)> {
        self.connections.lock().clone()
    }
}

impl Connect for ScriptedConnector {
    type Client = ScriptedService;

    fn connect(&self, settings: &DeploymentConfig) -> Result<Self::Client> {
        self.connections.lock().push((
            settings.credentials_id().to_string(),
            settings.endpoint().to_string(),
        ));
        Ok(self.service.clone())
    }
}

/// A minimal valid deployment config.
pub fn config_yaml(mode: &str, timeout: u64, interval: u64) -> String {
    format!(
        r#"
credentials_id: ci
pipeline_id: ocid1.devopsdeploypipeline.oc1.iad.amaaaaaapipeline
display_name: release
endpoint: https://devops.us-ashburn-1.oci.oraclecloud.com/
execution_mode: {mode}
polling:
  timeout_seconds: {timeout}
  polling_interval_seconds: {interval}
"#
    )
}
