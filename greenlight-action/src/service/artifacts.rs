//! Artifact resolver
//!
//! Finds a named artifact among the workflow runs behind a set of check
//! suites.

use std::sync::Arc;

use greenlight_core::domain::artifact::find_by_name;
use greenlight_core::domain::check_suite::CheckSuite;
use tracing::{debug, info};

use crate::error::{ActionError, Result};
use crate::repository::ArtifactRepository;

/// Looks up artifact download URLs for one repository
pub struct ArtifactResolver {
    owner: String,
    repo: String,
    artifacts: Arc<dyn ArtifactRepository>,
}

impl ArtifactResolver {
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        artifacts: Arc<dyn ArtifactRepository>,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            artifacts,
        }
    }

    /// Returns the download URL of the first artifact named `name`
    ///
    /// Runs are scanned in suite order and the scan stops at the first match.
    /// Suites without a workflow run are skipped.
    pub async fn resolve(&self, suites: &[CheckSuite], name: &str) -> Result<String> {
        for suite in suites {
            let Some(run_id) = suite.workflow_run_id else {
                debug!("Skipping check suite without a workflow run");
                continue;
            };

            let artifacts = self
                .artifacts
                .list_run_artifacts(&self.owner, &self.repo, run_id)
                .await?;

            if let Some(artifact) = find_by_name(&artifacts, name) {
                info!(
                    "Found artifact {:?} (id {}) in workflow run {}",
                    artifact.name, artifact.id, run_id
                );
                return Ok(artifact.archive_download_url.clone());
            }

            debug!("Workflow run {} has no artifact named {:?}", run_id, name);
        }

        Err(ActionError::ArtifactNotFound {
            name: name.to_string(),
            repository: format!("{}/{}", self.owner, self.repo),
        })
    }
}
