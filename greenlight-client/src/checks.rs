//! Check suite queries

use greenlight_core::dto::checks::{
    DEFAULT_BRANCH_HEAD_QUERY, DefaultBranchHeadData, DefaultBranchHeadVariables,
};
use greenlight_core::dto::graphql::GraphQlResponse;

use crate::error::{ClientError, Result};
use crate::GitHubClient;

impl GitHubClient {
    // =============================================================================
    // Check Suites
    // =============================================================================

    /// Query the default branch head commit and its first check suites
    ///
    /// # Arguments
    /// * `owner` - Repository owner
    /// * `repo` - Repository name
    /// * `suites` - How many check suites to fetch
    ///
    /// # Returns
    /// The GraphQL envelope. It may carry `errors` next to partial `data`;
    /// a response with errors and no data at all is returned as
    /// [`ClientError::GraphQl`].
    pub async fn query_default_branch_head(
        &self,
        owner: &str,
        repo: &str,
        suites: u32,
    ) -> Result<GraphQlResponse<DefaultBranchHeadData>> {
        let response: GraphQlResponse<DefaultBranchHeadData> = self
            .graphql(
                DEFAULT_BRANCH_HEAD_QUERY,
                DefaultBranchHeadVariables {
                    owner: owner.to_string(),
                    repo: repo.to_string(),
                    suites,
                },
            )
            .await?;

        if response.data.is_none() && response.has_errors() {
            return Err(ClientError::GraphQl(response.errors));
        }

        Ok(response)
    }
}
