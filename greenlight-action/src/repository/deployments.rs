//! Deployments repository

use std::sync::Arc;

use async_trait::async_trait;
use greenlight_client::{GitHubClient, Result};
use greenlight_core::domain::deployment::Deployment;
use greenlight_core::dto::deployment::CreateDeployment;

/// Repository trait for deployment records
#[async_trait]
pub trait DeploymentRepository: Send + Sync {
    /// Creates a deployment record
    ///
    /// # Arguments
    /// * `owner` - Repository owner
    /// * `repo` - Repository name
    /// * `req` - Ref, payload and gating of the deployment
    async fn create_deployment(
        &self,
        owner: &str,
        repo: &str,
        req: &CreateDeployment,
    ) -> Result<Deployment>;
}

/// REST implementation of DeploymentRepository
pub struct GitHubDeploymentRepository {
    client: Arc<GitHubClient>,
}

impl GitHubDeploymentRepository {
    pub fn new(client: Arc<GitHubClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DeploymentRepository for GitHubDeploymentRepository {
    async fn create_deployment(
        &self,
        owner: &str,
        repo: &str,
        req: &CreateDeployment,
    ) -> Result<Deployment> {
        self.client.create_deployment(owner, repo, req).await
    }
}
