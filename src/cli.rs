// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Args, Parser, Subcommand};
use ocideploy::config::ExecutionMode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ocideploy")]
#[command(about = "Trigger and track OCI DevOps pipeline deployments")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print the final result
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print JSON lines instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (default: discovered in the current directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new ocideploy.yml configuration file
    Init {
        /// Deploy pipeline identifier
        #[arg(long)]
        pipeline_id: Option<String>,

        /// DevOps service endpoint
        #[arg(long)]
        endpoint: Option<String>,

        /// Overwrite an existing configuration file
        #[arg(short, long)]
        force: bool,
    },

    /// Start a pipeline deployment and wait for it per the execution mode
    Deploy(DeployArgs),

    /// Upload the configured artifacts to the generic artifact registry
    Upload,

    /// Show the region and upload endpoint of a resource identifier
    Region {
        /// Resource identifier, e.g. ocid1.artifactrepository.oc1.iad.xxxx
        ocid: String,
    },
}

#[derive(Args, Debug, Default)]
pub struct DeployArgs {
    /// Execution mode: SYNC waits for completion, ASYNC for the start
    #[arg(short, long)]
    pub mode: Option<ExecutionMode>,

    /// Display name of the deployment
    #[arg(long)]
    pub display_name: Option<String>,

    /// Maximum time to poll, in seconds
    #[arg(long)]
    pub timeout: Option<String>,

    /// Seconds between status checks
    #[arg(long)]
    pub interval: Option<String>,
}
