//! Artifact DTOs

use serde::Deserialize;

use crate::domain::artifact::Artifact;

/// Response of `GET /repos/{owner}/{repo}/actions/runs/{run_id}/artifacts`
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactList {
    #[serde(default)]
    pub total_count: u64,

    #[serde(default)]
    pub artifacts: Vec<Artifact>,
}
