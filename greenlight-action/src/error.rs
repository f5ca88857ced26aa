//! Action error types
//!
//! Every variant is fatal. The step fails with the error's message as the
//! visible reason.

use greenlight_client::ClientError;
use thiserror::Error;

/// Result type alias for action operations
pub type Result<T> = std::result::Result<T, ActionError>;

/// Errors that end an action run
#[derive(Debug, Error)]
pub enum ActionError {
    /// A required input or environment value is missing or malformed
    #[error("{0}")]
    Configuration(String),

    /// No usable head commit data could be obtained
    #[error("Could not get default branch info for {repository}: {reason}")]
    UpstreamQuery { repository: String, reason: String },

    /// A monitored check suite concluded with anything but success
    #[error("Checks unsuccessful for {repository}: {details}")]
    ChecksFailed { repository: String, details: String },

    /// The attempt budget ran out before the checks concluded
    #[error("Timed out waiting for checks of {repository} after {attempts} attempt(s)")]
    Timeout { repository: String, attempts: u32 },

    /// Checks passed but no workflow run carries the requested artifact
    #[error("Could not find artifact {name:?} in the workflow runs of {repository}")]
    ArtifactNotFound { name: String, repository: String },

    /// A REST or GraphQL call failed
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Writing a workflow file command failed
    #[error("Workflow command failed: {0}")]
    Io(#[from] std::io::Error),
}

impl ActionError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}
