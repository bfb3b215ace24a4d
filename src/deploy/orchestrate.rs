// ABOUTME: End-to-end deployment run: validate, substitute arguments, submit, track, report.
// ABOUTME: Every failure is turned into a FAILURE outcome on the ResultSink.

use tracing::{error, info};

use crate::arguments::{Arguments, parse_arguments, substitute};
use crate::config::Config;
use crate::environment::EnvironmentProvider;
use crate::error::Result;
use crate::output::ResultSink;
use crate::service::{Connect, DeploymentRequest};

use super::outcome::Outcome;
use super::retry::RetryPolicy;
use super::tracker::Tracker;

/// Run one deployment described by `config` and report it to `sink`.
///
/// Never fails: configuration, substitution, credential and service errors
/// are reported through `sink` and yield [`Outcome::Failure`]. `finish` is
/// called exactly once.
pub async fn orchestrate<C, E, R>(config: &Config, env: &E, connector: &C, sink: &mut R) -> Outcome
where
    C: Connect,
    E: EnvironmentProvider + ?Sized,
    R: ResultSink + ?Sized,
{
    let outcome = match run(config, env, connector, sink).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(error = %e, "deployment failed");
            sink.error(&e);
            Outcome::Failure
        }
    };
    sink.finish(outcome);
    outcome
}

async fn run<C, E, R>(config: &Config, env: &E, connector: &C, sink: &mut R) -> Result<Outcome>
where
    C: Connect,
    E: EnvironmentProvider + ?Sized,
    R: ResultSink + ?Sized,
{
    let settings = config.deployment()?;
    let mode = settings.execution_mode();
    let polling = settings.polling();

    sink.progress(&format!("Execution Mode: {mode}"));
    sink.progress(&format!(
        "Max timeout: {} seconds",
        polling.timeout_seconds()
    ));
    sink.progress(&format!(
        "Polling interval: {} seconds",
        polling.polling_interval_seconds()
    ));
    let policy = RetryPolicy::from_polling(mode, polling)?;

    let arguments = match settings.arguments().filter(|t| !t.is_empty()) {
        Some(template) => {
            let mut vars = env.snapshot();
            vars.extend(config.resolved_env()?);
            let substituted = substitute(template, &vars);
            sink.progress(&format!("Argument after substitution: {substituted}"));
            parse_arguments(&substituted)?
        }
        None => Arguments::new(),
    };

    let client = connector.connect(&settings)?;
    sink.progress(&format!(
        "Created deployment client for {} using credentials '{}'",
        settings.endpoint(),
        settings.credentials_id()
    ));

    let request = DeploymentRequest {
        pipeline_id: settings.pipeline_id().clone(),
        display_name: settings.display_name().to_string(),
        arguments,
        endpoint: settings.endpoint().to_string(),
    };
    info!(pipeline = %request.pipeline_id, %mode, "submitting deployment");

    let submitted = Tracker::new(&client, policy).submit(&request).await?;
    sink.progress(&format!("Create deployment response: {}", submitted.deployment()));

    let done = submitted.wait().await?;
    let deployment = done.deployment();
    sink.progress(&format!(
        "Deployment {} is completed with state {} after {} status checks",
        deployment.id,
        deployment.lifecycle_state,
        done.polls()
    ));

    Ok(done.outcome())
}
