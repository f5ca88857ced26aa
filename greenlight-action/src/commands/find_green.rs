//! `find-green-download` command

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use crate::config::{
    ApiConfig, DEFAULT_CHECK_SUITES, DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_INTERVAL_SECS,
    PollerConfig, non_empty, parse_input,
};
use crate::repository::{GitHubArtifactRepository, GitHubCheckSuiteRepository};
use crate::runtime::WorkflowRuntime;
use crate::scheduler::CheckSuitePoller;
use crate::service::ArtifactResolver;

/// Arguments of `find-green-download`
///
/// Inputs stay strings until `into_config`: the runner exports declared but
/// unset inputs as empty strings, which must fall back to the defaults.
#[derive(Args)]
pub struct FindGreenArgs {
    /// Owner of the repository to watch
    #[arg(long, env = "INPUT_OWNER")]
    owner: Option<String>,

    /// Name of the repository to watch
    #[arg(long, env = "INPUT_REPO")]
    repo: Option<String>,

    /// Artifact whose download URL to emit once the checks pass
    #[arg(long, env = "INPUT_ARTIFACT")]
    artifact: Option<String>,

    /// Only check suites owned by this application are considered [default: GitHub Actions]
    #[arg(long, env = "INPUT_APP-NAME")]
    app_name: Option<String>,

    /// Number of polls before giving up [default: 60]
    #[arg(long, env = "INPUT_MAX-ATTEMPTS")]
    max_attempts: Option<String>,

    /// Seconds between polls [default: 15]
    #[arg(long, env = "INPUT_INTERVAL-SECS")]
    interval_secs: Option<String>,

    /// Number of check suites fetched per poll [default: 10]
    #[arg(long, env = "INPUT_CHECK-SUITES")]
    check_suites: Option<String>,
}

impl FindGreenArgs {
    fn into_config(self) -> crate::error::Result<PollerConfig> {
        let mut config = PollerConfig::new(
            non_empty(self.owner).unwrap_or_default(),
            non_empty(self.repo).unwrap_or_default(),
        )
        .with_artifact(self.artifact);

        if let Some(app_name) = non_empty(self.app_name) {
            config.app_name = app_name;
        }
        config.max_attempts =
            parse_input("max-attempts", self.max_attempts, DEFAULT_MAX_ATTEMPTS)?;
        config.poll_interval = Duration::from_secs(parse_input(
            "interval-secs",
            self.interval_secs,
            DEFAULT_POLL_INTERVAL_SECS,
        )?);
        config.check_suites =
            parse_input("check-suites", self.check_suites, DEFAULT_CHECK_SUITES)?;

        config.validate()?;
        Ok(config)
    }
}

/// Handle `find-green-download`
///
/// Sets `tarball_url` as soon as the checks pass, then `artifact_url` if an
/// artifact was requested.
pub async fn handle_find_green(
    args: FindGreenArgs,
    api: &ApiConfig,
    runtime: &WorkflowRuntime,
) -> Result<()> {
    let config = args.into_config()?;
    api.validate()?;

    let client = Arc::new(api.client());
    let poller = CheckSuitePoller::new(
        config.clone(),
        Arc::new(GitHubCheckSuiteRepository::new(Arc::clone(&client))),
    );

    let green = poller.wait_for_green().await?;

    info!("Tarball URL: {}", green.tarball_url);
    runtime
        .set_output("tarball_url", &green.tarball_url)
        .context("Failed to set tarball_url output")?;

    if let Some(name) = &config.artifact {
        let resolver = ArtifactResolver::new(
            &config.owner,
            &config.repo,
            Arc::new(GitHubArtifactRepository::new(client)),
        );
        let artifact_url = resolver.resolve(&green.suites, name).await?;

        info!("Artifact URL: {}", artifact_url);
        runtime
            .set_output("artifact_url", &artifact_url)
            .context("Failed to set artifact_url output")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ActionError;
    use mockito::Matcher;
    use serde_json::json;

    fn args(artifact: Option<&str>) -> FindGreenArgs {
        FindGreenArgs {
            owner: Some("acme".to_string()),
            repo: Some("broker".to_string()),
            artifact: artifact.map(str::to_string),
            app_name: None,
            max_attempts: Some("3".to_string()),
            interval_secs: Some("0".to_string()),
            check_suites: None,
        }
    }

    #[test]
    fn test_empty_inputs_fall_back_to_defaults() {
        let mut args = args(Some(""));
        args.app_name = Some(String::new());
        args.max_attempts = Some(String::new());
        args.interval_secs = Some(String::new());
        args.check_suites = Some(String::new());

        let config = args.into_config().unwrap();

        assert_eq!(config.app_name, "GitHub Actions");
        assert_eq!(config.max_attempts, DEFAULT_MAX_ATTEMPTS);
        assert_eq!(
            config.poll_interval,
            Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS)
        );
        assert_eq!(config.check_suites, DEFAULT_CHECK_SUITES);
        assert_eq!(config.artifact, None);
    }

    #[test]
    fn test_missing_owner_is_a_configuration_error() {
        let mut args = args(None);
        args.owner = None;

        let err = args.into_config().unwrap_err();

        assert!(matches!(err, ActionError::Configuration(_)));
        assert_eq!(err.to_string(), "owner input not set");
    }

    #[test]
    fn test_malformed_tuning_input_is_a_configuration_error() {
        let mut args = args(None);
        args.max_attempts = Some("many".to_string());

        assert!(matches!(
            args.into_config(),
            Err(ActionError::Configuration(_))
        ));
    }

    fn api_for(server: &mockito::ServerGuard) -> ApiConfig {
        ApiConfig {
            token: Some("token".to_string()),
            api_url: server.url(),
            graphql_url: format!("{}/graphql", server.url()),
        }
    }

    fn green_head_body() -> String {
        json!({
            "data": { "repository": { "defaultBranchRef": { "target": {
                "tarballUrl": "https://api.github.com/repos/acme/broker/tarball/abc123",
                "checkSuites": { "nodes": [
                    {
                        "app": { "name": "GitHub Actions" },
                        "conclusion": "SUCCESS",
                        "workflowRun": { "databaseId": 42 }
                    }
                ] }
            } } } }
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_emits_tarball_and_artifact_urls() {
        let mut server = mockito::Server::new_async().await;
        let _query = server
            .mock("POST", "/graphql")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(green_head_body())
            .create_async()
            .await;
        let artifacts = server
            .mock("GET", "/repos/acme/broker/actions/runs/42/artifacts")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "total_count": 1,
                    "artifacts": [{
                        "id": 5,
                        "name": "linux-debug",
                        "archive_download_url": "https://api.github.com/repos/acme/broker/actions/artifacts/5/zip"
                    }]
                })
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("output");
        let runtime = WorkflowRuntime::new(Some(output.clone()), None);

        handle_find_green(args(Some("linux-debug")), &api_for(&server), &runtime)
            .await
            .unwrap();

        artifacts.assert_async().await;
        let content = std::fs::read_to_string(&output).unwrap();
        assert!(content.contains("tarball_url<<"));
        assert!(content.contains("\nhttps://api.github.com/repos/acme/broker/tarball/abc123\n"));
        assert!(content.contains("artifact_url<<"));
        assert!(
            content.contains("\nhttps://api.github.com/repos/acme/broker/actions/artifacts/5/zip\n")
        );
    }

    #[tokio::test]
    async fn test_failed_checks_emit_nothing() {
        let mut server = mockito::Server::new_async().await;
        let _query = server
            .mock("POST", "/graphql")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(green_head_body().replace("SUCCESS", "FAILURE"))
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("output");
        let runtime = WorkflowRuntime::new(Some(output.clone()), None);

        let err = handle_find_green(args(None), &api_for(&server), &runtime)
            .await
            .unwrap_err();

        assert!(err.to_string().starts_with("Checks unsuccessful for acme/broker"));
        assert!(!output.exists());
    }
}
