// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Writes an ocideploy.yml template with every recognised option.

use std::path::Path;

use crate::error::{Error, Result};

use super::{CONFIG_FILENAME, Config, ExecutionMode};

pub fn init_config(
    dir: &Path,
    pipeline_id: Option<&str>,
    endpoint: Option<&str>,
    force: bool,
) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let mut config = Config::template();

    if let Some(p) = pipeline_id {
        config.pipeline_id = Some(p.to_string());
    }

    if let Some(e) = endpoint {
        config.endpoint = Some(e.to_string());
    }

    std::fs::write(&config_path, generate_template_yaml(&config))?;

    Ok(())
}

fn generate_template_yaml(config: &Config) -> String {
    let mode = match config.execution_mode {
        Some(ExecutionMode::Async) => "async",
        _ => "sync",
    };
    format!(
        r#"credentials_id: {}
# credentials_file: credentials.yml
pipeline_id: {}
display_name: {}
endpoint: {}
# sync waits for the deployment to succeed, async returns once it is running
execution_mode: {}
polling:
  timeout_seconds: {}
  polling_interval_seconds: {}
# request_timeout: 30s

# Deployment arguments as a JSON object. ${{NAME}} is replaced with a value
# from `env` below or the process environment; write \${{NAME}} to keep it.
# arguments: |
#   {{"IMAGE_TAG": "${{IMAGE_TAG}}"}}
# env:
#   IMAGE_TAG: {{ env: GIT_COMMIT, default: latest }}

# artifacts:
#   - source_path: target/release/app.tar.gz
#     repository_id: ocid1.artifactrepository.oc1.iad.example
#     artifact_path: app/app.tar.gz
#     version: "1.0.0"
"#,
        config.credentials_id.as_deref().unwrap_or("default"),
        config.pipeline_id.as_deref().unwrap_or_default(),
        config.display_name.as_deref().unwrap_or_default(),
        config.endpoint.as_deref().unwrap_or_default(),
        mode,
        config.polling.timeout_seconds(),
        config.polling.polling_interval_seconds(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_round_trips_into_a_valid_deployment() {
        let yaml = generate_template_yaml(&Config::template());
        let config = Config::from_yaml(&yaml).unwrap();
        let deployment = config.deployment().unwrap();
        assert_eq!(deployment.execution_mode(), ExecutionMode::Sync);
        assert_eq!(deployment.polling().timeout_seconds(), 120);
    }
}
