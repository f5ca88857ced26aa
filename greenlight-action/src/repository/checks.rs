//! Check suite repository
//!
//! Fetches the default branch head commit with its check suites.

use std::sync::Arc;

use async_trait::async_trait;
use greenlight_client::{GitHubClient, Result};
use greenlight_core::domain::check_suite::HeadCommit;
use greenlight_core::dto::graphql::GraphQlError;

/// What one query revealed about the default branch head
#[derive(Debug, Clone, Default)]
pub struct BranchHeadSnapshot {
    /// The head commit, if the response got that far
    pub head: Option<HeadCommit>,

    /// Errors reported next to the data
    pub errors: Vec<GraphQlError>,
}

/// Repository trait for check suite queries
#[async_trait]
pub trait CheckSuiteRepository: Send + Sync {
    /// Fetches the default branch head and its first `suites` check suites
    ///
    /// Partial responses are returned as `Ok` with their errors attached.
    async fn fetch_default_branch_head(
        &self,
        owner: &str,
        repo: &str,
        suites: u32,
    ) -> Result<BranchHeadSnapshot>;
}

/// GraphQL implementation of CheckSuiteRepository
pub struct GitHubCheckSuiteRepository {
    client: Arc<GitHubClient>,
}

impl GitHubCheckSuiteRepository {
    pub fn new(client: Arc<GitHubClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CheckSuiteRepository for GitHubCheckSuiteRepository {
    async fn fetch_default_branch_head(
        &self,
        owner: &str,
        repo: &str,
        suites: u32,
    ) -> Result<BranchHeadSnapshot> {
        let response = self
            .client
            .query_default_branch_head(owner, repo, suites)
            .await?;

        Ok(BranchHeadSnapshot {
            head: response.data.as_ref().and_then(|data| data.head()),
            errors: response.errors,
        })
    }
}
