// ABOUTME: Deploy command implementation.
// ABOUTME: Merges CLI overrides into the config and runs the orchestrator against the live service.

use ocideploy::auth::CredentialFile;
use ocideploy::config::{Config, DeployOverrides};
use ocideploy::deploy::{Outcome, orchestrate};
use ocideploy::environment::ProcessEnvironment;
use ocideploy::output::Output;
use ocideploy::service::ApiConnector;

use crate::cli::DeployArgs;

/// Run one deployment and report it through `output`.
pub async fn deploy(config: Config, args: DeployArgs, output: &mut Output) -> Outcome {
    let config = config.with_overrides(DeployOverrides {
        execution_mode: args.mode,
        display_name: args.display_name,
        timeout: args.timeout,
        polling_interval: args.interval,
    });

    let connector = ApiConnector::new(CredentialFile::new(config.credentials_path()));

    orchestrate(&config, &ProcessEnvironment::new(), &connector, output).await
}
