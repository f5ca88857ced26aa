//! Workflow run artifact endpoints

use greenlight_core::domain::artifact::Artifact;
use greenlight_core::dto::artifact::ArtifactList;
use reqwest::Method;
use tracing::debug;

use crate::error::Result;
use crate::{GitHubClient, check_segment};

/// Largest page size the artifacts endpoint accepts
const ARTIFACTS_PER_PAGE: u32 = 100;

impl GitHubClient {
    // =============================================================================
    // Workflow Run Artifacts
    // =============================================================================

    /// List the artifacts of a workflow run
    ///
    /// # Arguments
    /// * `owner` - Repository owner
    /// * `repo` - Repository name
    /// * `run_id` - Database id of the workflow run
    ///
    /// # Returns
    /// The artifacts of the run, in API order
    pub async fn list_workflow_run_artifacts(
        &self,
        owner: &str,
        repo: &str,
        run_id: u64,
    ) -> Result<Vec<Artifact>> {
        check_segment("owner", owner)?;
        check_segment("repo", repo)?;

        let url = format!(
            "{}/repos/{}/{}/actions/runs/{}/artifacts",
            self.api_url, owner, repo, run_id
        );
        let response = self
            .request(Method::GET, &url)
            .query(&[("per_page", ARTIFACTS_PER_PAGE)])
            .send()
            .await?;

        let list: ArtifactList = self.handle_response(response).await?;
        debug!(
            "Workflow run {} has {} artifact(s)",
            run_id,
            list.artifacts.len()
        );

        Ok(list.artifacts)
    }
}
