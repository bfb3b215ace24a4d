// ABOUTME: Wire types for the deployment service: requests, deployments, lifecycle states.
// ABOUTME: Field names follow the service's camelCase JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::arguments::Arguments;
use crate::types::{DeploymentId, PipelineId};

/// Lifecycle state reported by the deployment service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeploymentState {
    Accepted,
    InProgress,
    Failed,
    Succeeded,
    Canceling,
    Canceled,
    /// Any state this client does not know about.
    #[serde(other)]
    Unknown,
}

/// Coarse grouping of lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Accepted or running.
    Progressing,
    /// Finished successfully.
    Succeeded,
    /// Finished without success.
    Failed,
    /// Neither progressing nor finished (canceling, unrecognised).
    Unsettled,
}

impl DeploymentState {
    pub fn phase(self) -> Phase {
        match self {
            DeploymentState::Accepted | DeploymentState::InProgress => Phase::Progressing,
            DeploymentState::Succeeded => Phase::Succeeded,
            DeploymentState::Failed | DeploymentState::Canceled => Phase::Failed,
            DeploymentState::Canceling | DeploymentState::Unknown => Phase::Unsettled,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self.phase(), Phase::Succeeded | Phase::Failed)
    }
}

impl fmt::Display for DeploymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DeploymentState::Accepted => "ACCEPTED",
            DeploymentState::InProgress => "IN_PROGRESS",
            DeploymentState::Failed => "FAILED",
            DeploymentState::Succeeded => "SUCCEEDED",
            DeploymentState::Canceling => "CANCELING",
            DeploymentState::Canceled => "CANCELED",
            DeploymentState::Unknown => "UNKNOWN",
        };
        write!(f, "{s}")
    }
}

/// A deployment as returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub id: DeploymentId,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub deploy_pipeline_id: Option<PipelineId>,
    pub lifecycle_state: DeploymentState,
    #[serde(default)]
    pub lifecycle_details: Option<String>,
    #[serde(default)]
    pub time_created: Option<DateTime<Utc>>,
}

impl fmt::Display for Deployment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.lifecycle_state)?;
        if let Some(details) = &self.lifecycle_details {
            write!(f, ": {details}")?;
        }
        Ok(())
    }
}

/// Everything needed to start one pipeline deployment. Built once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRequest {
    pub pipeline_id: PipelineId,
    pub display_name: String,
    pub arguments: Arguments,
    pub endpoint: String,
}

/// JSON body for the create-deployment call.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateDeploymentDetails<'a> {
    deployment_type: &'static str,
    deploy_pipeline_id: &'a PipelineId,
    display_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    deployment_arguments: Option<ArgumentCollection<'a>>,
}

#[derive(Debug, Serialize)]
struct ArgumentCollection<'a> {
    items: Vec<DeploymentArgument<'a>>,
}

#[derive(Debug, Serialize)]
struct DeploymentArgument<'a> {
    name: &'a str,
    value: &'a str,
}

impl<'a> From<&'a DeploymentRequest> for CreateDeploymentDetails<'a> {
    fn from(request: &'a DeploymentRequest) -> Self {
        let deployment_arguments = (!request.arguments.is_empty()).then(|| ArgumentCollection {
            items: request
                .arguments
                .iter()
                .map(|(name, value)| DeploymentArgument { name, value })
                .collect(),
        });

        CreateDeploymentDetails {
            deployment_type: "PIPELINE_DEPLOYMENT",
            deploy_pipeline_id: &request.pipeline_id,
            display_name: &request.display_name,
            deployment_arguments,
        }
    }
}

/// Error body returned by the service on non-2xx responses.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_deployment() {
        let json = r#"{
            "id": "ocid1.devopsdeployment.oc1.iad.abc",
            "displayName": "release",
            "deployPipelineId": "ocid1.devopsdeploypipeline.oc1.iad.xyz",
            "lifecycleState": "IN_PROGRESS",
            "timeCreated": "2024-05-01T10:00:00.000Z",
            "deploymentType": "PIPELINE_DEPLOYMENT"
        }"#;
        let deployment: Deployment = serde_json::from_str(json).unwrap();
        assert_eq!(deployment.id.as_str(), "ocid1.devopsdeployment.oc1.iad.abc");
        assert_eq!(deployment.lifecycle_state, DeploymentState::InProgress);
        assert!(deployment.time_created.is_some());
    }

    #[test]
    fn unrecognised_state_decodes_as_unknown() {
        let deployment: Deployment =
            serde_json::from_str(r#"{"id": "d", "lifecycleState": "WAITING"}"#).unwrap();
        assert_eq!(deployment.lifecycle_state, DeploymentState::Unknown);
        assert_eq!(deployment.lifecycle_state.phase(), Phase::Unsettled);
    }

    #[test]
    fn create_body_lists_arguments_in_order() {
        let mut arguments = Arguments::new();
        arguments.insert("B".to_string(), "2".to_string());
        arguments.insert("A".to_string(), "1".to_string());
        let request = DeploymentRequest {
            pipeline_id: PipelineId::new("p"),
            display_name: "name".to_string(),
            arguments,
            endpoint: "https://example.com".to_string(),
        };

        let body = serde_json::to_value(CreateDeploymentDetails::from(&request)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "deploymentType": "PIPELINE_DEPLOYMENT",
                "deployPipelineId": "p",
                "displayName": "name",
                "deploymentArguments": {"items": [
                    {"name": "B", "value": "2"},
                    {"name": "A", "value": "1"}
                ]}
            })
        );
    }

    #[test]
    fn create_body_omits_empty_arguments() {
        let request = DeploymentRequest {
            pipeline_id: PipelineId::new("p"),
            display_name: "name".to_string(),
            arguments: Arguments::new(),
            endpoint: "https://example.com".to_string(),
        };
        let body = serde_json::to_value(CreateDeploymentDetails::from(&request)).unwrap();
        assert!(body.get("deploymentArguments").is_none());
    }

    #[test]
    fn phases_partition_states() {
        assert_eq!(DeploymentState::Accepted.phase(), Phase::Progressing);
        assert_eq!(DeploymentState::InProgress.phase(), Phase::Progressing);
        assert_eq!(DeploymentState::Succeeded.phase(), Phase::Succeeded);
        assert_eq!(DeploymentState::Failed.phase(), Phase::Failed);
        assert_eq!(DeploymentState::Canceled.phase(), Phase::Failed);
        assert!(!DeploymentState::Canceling.is_terminal());
    }
}
