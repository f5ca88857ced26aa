//! Artifact domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named build output attached to a workflow run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub id: u64,
    pub name: String,

    /// Authenticated URL that redirects to the zip archive
    pub archive_download_url: String,

    #[serde(default)]
    pub size_in_bytes: u64,

    #[serde(default)]
    pub expired: bool,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Returns the first artifact with exactly the given name
pub fn find_by_name<'a>(artifacts: &'a [Artifact], name: &str) -> Option<&'a Artifact> {
    artifacts.iter().find(|artifact| artifact.name == name)
}
