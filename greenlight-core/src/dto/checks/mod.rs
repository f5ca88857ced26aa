//! Check suite query DTOs
//!
//! Every field of the response is optional: GraphQL nulls out whatever it
//! could not resolve, and a partial response is still worth reading.

use serde::{Deserialize, Serialize};

use crate::domain::check_suite::{CheckConclusion, CheckSuite, HeadCommit};

/// Query for the default branch head commit and its check suites
pub const DEFAULT_BRANCH_HEAD_QUERY: &str = r#"
query DefaultBranchHead($owner: String!, $repo: String!, $suites: Int!) {
  repository(owner: $owner, name: $repo) {
    defaultBranchRef { target { ... on Commit {
      tarballUrl
      checkSuites(first: $suites) { nodes {
        app { name }
        conclusion
        workflowRun { databaseId }
      } }
    } } }
  }
}
"#;

/// Variables of [`DEFAULT_BRANCH_HEAD_QUERY`]
#[derive(Debug, Clone, Serialize)]
pub struct DefaultBranchHeadVariables {
    pub owner: String,
    pub repo: String,
    pub suites: u32,
}

/// `data` of a [`DEFAULT_BRANCH_HEAD_QUERY`] response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DefaultBranchHeadData {
    #[serde(default)]
    pub repository: Option<RepositoryNode>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryNode {
    #[serde(default)]
    pub default_branch_ref: Option<RefNode>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RefNode {
    #[serde(default)]
    pub target: Option<CommitNode>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitNode {
    #[serde(default)]
    pub tarball_url: Option<String>,

    #[serde(default)]
    pub check_suites: Option<CheckSuiteConnection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckSuiteConnection {
    #[serde(default)]
    pub nodes: Option<Vec<Option<CheckSuiteNode>>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckSuiteNode {
    #[serde(default)]
    pub app: Option<AppNode>,

    #[serde(default)]
    pub conclusion: Option<CheckConclusion>,

    #[serde(default)]
    pub workflow_run: Option<WorkflowRunNode>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppNode {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowRunNode {
    #[serde(default)]
    pub database_id: Option<u64>,
}

impl DefaultBranchHeadData {
    /// The default branch head commit, if the response got that far
    pub fn head(&self) -> Option<HeadCommit> {
        let commit = self
            .repository
            .as_ref()?
            .default_branch_ref
            .as_ref()?
            .target
            .as_ref()?;

        Some(commit.into())
    }
}

impl From<&CommitNode> for HeadCommit {
    fn from(commit: &CommitNode) -> Self {
        let check_suites = commit
            .check_suites
            .as_ref()
            .and_then(|connection| connection.nodes.as_ref())
            .map(|nodes| nodes.iter().flatten().map(CheckSuite::from).collect())
            .unwrap_or_default();

        HeadCommit {
            tarball_url: commit.tarball_url.clone(),
            check_suites,
        }
    }
}

impl From<&CheckSuiteNode> for CheckSuite {
    fn from(node: &CheckSuiteNode) -> Self {
        CheckSuite {
            app_name: node.app.as_ref().and_then(|app| app.name.clone()),
            conclusion: node.conclusion,
            workflow_run_id: node.workflow_run.as_ref().and_then(|run| run.database_id),
        }
    }
}
