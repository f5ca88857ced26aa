//! `deploy-on-success` command

use std::sync::Arc;

use anyhow::Result;
use clap::{Args, ValueEnum};
use greenlight_core::domain::deployment::Phase;

use crate::config::{ApiConfig, NotifierConfig};
use crate::repository::GitHubDeploymentRepository;
use crate::runtime::WorkflowRuntime;
use crate::service::{DeploymentNotifier, phase_from_marker};

/// Arguments of `deploy-on-success`
#[derive(Args)]
pub struct DeployArgs {
    /// Phase to run; `auto` picks post once the pre phase left its marker
    #[arg(long, value_enum, default_value_t = PhaseArg::Auto)]
    phase: PhaseArg,

    /// Repository to deploy, as owner/repo
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: Option<String>,

    /// Commit to deploy
    #[arg(long, env = "GITHUB_SHA")]
    sha: Option<String>,

    /// Store path of the build output, attached as deployment payload
    #[arg(long, env = "DEPLOY_STORE_PATH")]
    store_path: Option<String>,

    /// Deployment environment
    #[arg(long, env = "INPUT_ENVIRONMENT")]
    environment: Option<String>,
}

/// Phase selection on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PhaseArg {
    Pre,
    Post,
    Auto,
}

impl PhaseArg {
    fn resolve(self, runtime: &WorkflowRuntime) -> Phase {
        match self {
            PhaseArg::Pre => Phase::Pre,
            PhaseArg::Post => Phase::Post,
            PhaseArg::Auto => phase_from_marker(runtime),
        }
    }
}

impl DeployArgs {
    fn into_config(self) -> NotifierConfig {
        NotifierConfig {
            repository: self.repository,
            sha: self.sha,
            store_path: self.store_path,
            environment: self.environment,
        }
    }
}

/// Handle `deploy-on-success`
pub async fn handle_deploy(
    args: DeployArgs,
    api: &ApiConfig,
    runtime: Arc<WorkflowRuntime>,
) -> Result<()> {
    let phase = args.phase.resolve(&runtime);
    if phase == Phase::Post {
        api.validate()?;
    }

    let client = Arc::new(api.client());
    let notifier = DeploymentNotifier::new(
        args.into_config(),
        Arc::new(GitHubDeploymentRepository::new(client)),
        runtime,
    );

    notifier.run(phase).await?;
    Ok(())
}
