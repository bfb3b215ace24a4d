// ABOUTME: Upload command implementation.
// ABOUTME: Uploads every configured artifact with the configured credentials.

use ocideploy::auth::CredentialFile;
use ocideploy::config::Config;
use ocideploy::deploy::Outcome;
use ocideploy::output::Output;
use ocideploy::upload::upload_artifacts;

pub async fn upload(config: Config, output: &mut Output) -> Outcome {
    let credentials = CredentialFile::new(config.credentials_path());
    upload_artifacts(&config, &credentials, output).await
}
