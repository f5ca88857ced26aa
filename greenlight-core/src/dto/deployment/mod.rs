//! Deployment DTOs

use serde::Serialize;

use crate::domain::deployment::DeploymentPayload;

/// Body of `POST /repos/{owner}/{repo}/deployments`
#[derive(Debug, Clone, Serialize)]
pub struct CreateDeployment {
    /// Commit SHA, branch or tag to deploy
    #[serde(rename = "ref")]
    pub git_ref: String,

    pub payload: DeploymentPayload,

    /// Status contexts that must pass before the deployment is created
    ///
    /// An empty list skips the check entirely.
    pub required_contexts: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
}

impl CreateDeployment {
    /// Deployment of `git_ref` carrying a store path, with no status gating
    pub fn for_store_path(git_ref: impl Into<String>, store_path: impl Into<String>) -> Self {
        Self {
            git_ref: git_ref.into(),
            payload: DeploymentPayload {
                store_path: store_path.into(),
            },
            required_contexts: Vec::new(),
            environment: None,
        }
    }

    pub fn with_environment(mut self, environment: Option<String>) -> Self {
        self.environment = environment;
        self
    }
}
