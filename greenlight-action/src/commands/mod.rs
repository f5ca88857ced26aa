//! Commands module
//!
//! Defines the action's subcommands and their handlers.

mod deploy;
mod find_green;

pub use deploy::DeployArgs;
pub use find_green::FindGreenArgs;

use std::sync::Arc;

use anyhow::Result;
use clap::Subcommand;

use crate::config::ApiConfig;
use crate::runtime::WorkflowRuntime;

/// Top-level commands
#[derive(Subcommand)]
pub enum Commands {
    /// Create a deployment record in the post phase of a job
    DeployOnSuccess(DeployArgs),

    /// Wait for the default branch checks to pass and emit download URLs
    FindGreenDownload(FindGreenArgs),
}

/// Handle a command
///
/// # Arguments
/// * `command` - The command to execute
/// * `api` - Connection settings for the GitHub API
/// * `runtime` - Workflow command channels of the current step
pub async fn handle_command(
    command: Commands,
    api: &ApiConfig,
    runtime: Arc<WorkflowRuntime>,
) -> Result<()> {
    match command {
        Commands::DeployOnSuccess(args) => deploy::handle_deploy(args, api, runtime).await,
        Commands::FindGreenDownload(args) => {
            find_green::handle_find_green(args, api, &runtime).await
        }
    }
}
