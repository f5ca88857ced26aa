//! Deployment domain model
//!
//! A deployment is a request to deploy a specific ref. The action creates one
//! per successful build, carrying the store path of the build output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Deployment record as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deployment {
    pub id: u64,
    pub sha: String,

    #[serde(rename = "ref")]
    pub git_ref: String,

    #[serde(default)]
    pub environment: Option<String>,

    #[serde(default)]
    pub payload: serde_json::Value,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload attached to every deployment this action creates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentPayload {
    /// Store path of the build output to deploy
    pub store_path: String,
}

/// The two invocations of a pre/post step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Runs before the job's main steps
    Pre,

    /// Runs after the job's main steps
    Post,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Pre => write!(f, "pre"),
            Phase::Post => write!(f, "post"),
        }
    }
}
