//! Greenlight
//!
//! Deployment and check-suite helpers for GitHub Actions workflows.
//!
//! Architecture:
//! - Commands: CLI parsing, with every flag bound to its runner env variable
//! - Configuration: validated settings per command
//! - Repositories: GitHub API access behind traits
//! - Services: deployment notifier and artifact resolver
//! - Scheduler: retry combinator and check-suite poller
//! - Runtime: step outputs, saved state and annotations
//!
//! Any error fails the step with its message as the visible reason.

mod commands;
mod config;
mod error;
mod repository;
mod runtime;
mod scheduler;
mod service;

#[cfg(test)]
mod testing;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use greenlight_client::{DEFAULT_API_URL, DEFAULT_GRAPHQL_URL};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{Commands, handle_command};
use crate::config::{ApiConfig, non_empty};
use crate::runtime::WorkflowRuntime;

#[derive(Parser)]
#[command(name = "greenlight")]
#[command(about = "Deployment and check-suite helpers for GitHub Actions", long_about = None)]
struct Cli {
    /// Token for the GitHub API; falls back to GITHUB_TOKEN
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// REST API base URL [default: https://api.github.com]
    #[arg(long, env = "GITHUB_API_URL")]
    api_url: Option<String>,

    /// GraphQL endpoint URL [default: https://api.github.com/graphql]
    #[arg(long, env = "GITHUB_GRAPHQL_URL")]
    graphql_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "greenlight=info,greenlight_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => return fail(&usage_error(&e)),
    };

    let api = ApiConfig {
        token: non_empty(cli.token).or_else(|| non_empty(std::env::var("GITHUB_TOKEN").ok())),
        api_url: non_empty(cli.api_url).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        graphql_url: non_empty(cli.graphql_url)
            .unwrap_or_else(|| DEFAULT_GRAPHQL_URL.to_string()),
    };
    let workflow = Arc::new(WorkflowRuntime::from_env());

    match handle_command(cli.command, &api, workflow).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(&format!("{:#}", e)),
    }
}

/// Fails the step with `message` as the visible reason
fn fail(message: &str) -> ExitCode {
    tracing::error!("{}", message);
    runtime::error(message);
    ExitCode::FAILURE
}

/// First line of a clap error, without its `error: ` prefix
fn usage_error(e: &clap::Error) -> String {
    let rendered = e.to_string();
    let line = rendered.lines().next().unwrap_or_default();
    line.strip_prefix("error: ").unwrap_or(line).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_inputs_are_left_to_the_commands() {
        let cli = Cli::try_parse_from([
            "greenlight",
            "--api-url=",
            "find-green-download",
            "--max-attempts=",
            "--check-suites=",
        ])
        .unwrap();

        assert_eq!(non_empty(cli.api_url), None);
        assert!(matches!(cli.command, Commands::FindGreenDownload(_)));
    }

    #[test]
    fn test_usage_error_is_a_single_line() {
        let err = match Cli::try_parse_from(["greenlight", "deploy-on-success", "--phase", "later"]) {
            Ok(_) => panic!("expected an invalid --phase value to be rejected"),
            Err(e) => e,
        };

        assert!(err.use_stderr());
        let message = usage_error(&err);
        assert!(message.contains("later"));
        assert!(!message.starts_with("error:"));
        assert!(!message.contains('\n'));
    }
}
