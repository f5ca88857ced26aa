//! Action configuration
//!
//! Plain configuration structs built from the parsed command line. Each
//! command validates its own config before doing any work.

use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use greenlight_client::GitHubClient;
use greenlight_core::domain::check_suite::GITHUB_ACTIONS_APP;

use crate::error::{ActionError, Result};
use crate::scheduler::RetryPolicy;

/// Default number of polls before giving up
pub const DEFAULT_MAX_ATTEMPTS: u32 = 60;

/// Default delay between polls, in seconds
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 15;

/// Default number of check suites fetched per poll
pub const DEFAULT_CHECK_SUITES: u32 = 10;

/// GraphQL connections return at most this many nodes
const MAX_CHECK_SUITES: u32 = 100;

/// Connection settings for the GitHub API
#[derive(Clone)]
pub struct ApiConfig {
    /// Token used as bearer credentials
    pub token: Option<String>,

    /// REST API base URL
    pub api_url: String,

    /// GraphQL endpoint URL
    pub graphql_url: String,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("api_url", &self.api_url)
            .field("graphql_url", &self.graphql_url)
            .finish()
    }
}

impl ApiConfig {
    /// Validates the configuration
    ///
    /// Only commands that actually call the API need this; the pre phase of
    /// the deployment notifier runs without a token.
    pub fn validate(&self) -> Result<()> {
        if self.token.is_none() {
            return Err(ActionError::configuration(
                "token not set (pass the token input or set GITHUB_TOKEN)",
            ));
        }

        for (name, url) in [("api_url", &self.api_url), ("graphql_url", &self.graphql_url)] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ActionError::configuration(format!(
                    "{} must start with http:// or https://",
                    name
                )));
            }
        }

        Ok(())
    }

    /// Builds a client for the configured endpoints
    pub fn client(&self) -> GitHubClient {
        GitHubClient::with_endpoints(
            self.api_url.clone(),
            self.graphql_url.clone(),
            self.token.clone().unwrap_or_default(),
        )
    }
}

/// Check-suite poller configuration
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Owner of the watched repository
    pub owner: String,

    /// Name of the watched repository
    pub repo: String,

    /// Artifact to look up once the checks pass
    pub artifact: Option<String>,

    /// Only suites owned by this application are considered
    pub app_name: String,

    /// How many check suites to fetch per poll
    pub check_suites: u32,

    /// How many polls to make before giving up
    pub max_attempts: u32,

    /// Delay between polls
    pub poll_interval: Duration,
}

impl PollerConfig {
    /// Creates a configuration with defaults
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            artifact: None,
            app_name: GITHUB_ACTIONS_APP.to_string(),
            check_suites: DEFAULT_CHECK_SUITES,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
        }
    }

    /// Requests an artifact download URL; empty names count as unset
    pub fn with_artifact(mut self, artifact: Option<String>) -> Self {
        self.artifact = non_empty(artifact);
        self
    }

    /// `owner/repo`, for messages
    pub fn repository(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            interval: self.poll_interval,
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.owner.is_empty() {
            return Err(ActionError::configuration("owner input not set"));
        }

        if self.repo.is_empty() {
            return Err(ActionError::configuration("repo input not set"));
        }

        if self.app_name.is_empty() {
            return Err(ActionError::configuration("app-name cannot be empty"));
        }

        if self.max_attempts == 0 {
            return Err(ActionError::configuration(
                "max-attempts must be greater than 0",
            ));
        }

        if self.check_suites == 0 || self.check_suites > MAX_CHECK_SUITES {
            return Err(ActionError::configuration(format!(
                "check-suites must be between 1 and {}",
                MAX_CHECK_SUITES
            )));
        }

        Ok(())
    }
}

/// Deployment notifier configuration
///
/// Values stay optional until the post phase needs them, so the pre phase can
/// run in any environment.
#[derive(Debug, Clone, Default)]
pub struct NotifierConfig {
    /// `owner/repo` of the current repository
    pub repository: Option<String>,

    /// Commit being deployed
    pub sha: Option<String>,

    /// Store path of the build output
    pub store_path: Option<String>,

    /// Deployment environment; the API default applies when unset
    pub environment: Option<String>,
}

/// Everything needed to create one deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentTarget {
    pub owner: String,
    pub repo: String,
    pub sha: String,
    pub store_path: String,
    pub environment: Option<String>,
}

impl NotifierConfig {
    /// Resolves the deployment target, failing on missing values
    pub fn target(&self) -> Result<DeploymentTarget> {
        let store_path = non_empty(self.store_path.clone())
            .ok_or_else(|| ActionError::configuration("DEPLOY_STORE_PATH not set"))?;

        let repository = non_empty(self.repository.clone())
            .ok_or_else(|| ActionError::configuration("GITHUB_REPOSITORY not set"))?;

        let (owner, repo) = repository
            .split_once('/')
            .filter(|(owner, repo)| !owner.is_empty() && !repo.is_empty() && !repo.contains('/'))
            .ok_or_else(|| {
                ActionError::configuration(format!(
                    "GITHUB_REPOSITORY must look like owner/repo, got {:?}",
                    repository
                ))
            })?;

        let sha = non_empty(self.sha.clone())
            .ok_or_else(|| ActionError::configuration("GITHUB_SHA not set"))?;

        Ok(DeploymentTarget {
            owner: owner.to_string(),
            repo: repo.to_string(),
            sha,
            store_path,
            environment: non_empty(self.environment.clone()),
        })
    }
}

/// Treats empty strings the way the runner passes unset inputs
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

/// Parses an optional input, falling back to `default` when it is unset
pub fn parse_input<T>(name: &str, value: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match non_empty(value) {
        Some(raw) => raw.trim().parse().map_err(|e| {
            ActionError::configuration(format!("invalid {} input {:?}: {}", name, raw, e))
        }),
        None => Ok(default),
    }
}
