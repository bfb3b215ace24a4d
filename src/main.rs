// ABOUTME: Entry point for the ocideploy CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use ocideploy::config::{self, Config};
use ocideploy::deploy::Outcome;
use ocideploy::error::Result;
use ocideploy::output::{Output, OutputMode, ResultSink};
use std::env;
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };
    let mut output = Output::new(mode);

    match run(cli, &mut output).await {
        Ok(outcome) if outcome.is_success() => {}
        Ok(_) => std::process::exit(1),
        Err(e) => {
            output.error(&e);
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli, output: &mut Output) -> Result<Outcome> {
    let cwd = env::current_dir()?;
    match cli.command {
        Commands::Init {
            pipeline_id,
            endpoint,
            force,
        } => {
            config::init_config(&cwd, pipeline_id.as_deref(), endpoint.as_deref(), force)?;
            output.result(&format!("Created {}", config::CONFIG_FILENAME));
            Ok(Outcome::Success)
        }
        Commands::Deploy(args) => {
            let config = load_config(cli.config.as_deref(), &cwd)?;
            Ok(commands::deploy(config, args, output).await)
        }
        Commands::Upload => {
            let config = load_config(cli.config.as_deref(), &cwd)?;
            Ok(commands::upload(config, output).await)
        }
        Commands::Region { ocid } => {
            commands::region(&ocid, output)?;
            Ok(Outcome::Success)
        }
    }
}

fn load_config(path: Option<&Path>, cwd: &Path) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => Config::discover(cwd),
    }
}
