//! Artifacts repository

use std::sync::Arc;

use async_trait::async_trait;
use greenlight_client::{GitHubClient, Result};
use greenlight_core::domain::artifact::Artifact;

/// Repository trait for workflow run artifacts
#[async_trait]
pub trait ArtifactRepository: Send + Sync {
    /// Lists the artifacts attached to a workflow run
    async fn list_run_artifacts(
        &self,
        owner: &str,
        repo: &str,
        run_id: u64,
    ) -> Result<Vec<Artifact>>;
}

/// REST implementation of ArtifactRepository
pub struct GitHubArtifactRepository {
    client: Arc<GitHubClient>,
}

impl GitHubArtifactRepository {
    pub fn new(client: Arc<GitHubClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ArtifactRepository for GitHubArtifactRepository {
    async fn list_run_artifacts(
        &self,
        owner: &str,
        repo: &str,
        run_id: u64,
    ) -> Result<Vec<Artifact>> {
        self.client
            .list_workflow_run_artifacts(owner, repo, run_id)
            .await
    }
}
