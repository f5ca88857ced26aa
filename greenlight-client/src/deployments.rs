//! Deployment endpoints

use greenlight_core::domain::deployment::Deployment;
use greenlight_core::dto::deployment::CreateDeployment;
use reqwest::Method;
use tracing::debug;

use crate::error::Result;
use crate::{GitHubClient, check_segment};

impl GitHubClient {
    // =============================================================================
    // Deployments
    // =============================================================================

    /// Create a deployment for a ref
    ///
    /// # Arguments
    /// * `owner` - Repository owner
    /// * `repo` - Repository name
    /// * `req` - The deployment creation request
    ///
    /// # Returns
    /// The created deployment
    ///
    /// # Example
    /// ```no_run
    /// # use greenlight_client::GitHubClient;
    /// # use greenlight_core::dto::deployment::CreateDeployment;
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = GitHubClient::new("ghp_example");
    /// let deployment = client
    ///     .create_deployment(
    ///         "acme",
    ///         "broker",
    ///         &CreateDeployment::for_store_path("abc123", "/nix/store/xyz-broker"),
    ///     )
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create_deployment(
        &self,
        owner: &str,
        repo: &str,
        req: &CreateDeployment,
    ) -> Result<Deployment> {
        check_segment("owner", owner)?;
        check_segment("repo", repo)?;

        let url = format!("{}/repos/{}/{}/deployments", self.api_url, owner, repo);
        debug!("Creating deployment of {} for {}/{}", req.git_ref, owner, repo);

        let response = self.request(Method::POST, &url).json(req).send().await?;

        self.handle_response(response).await
    }
}
