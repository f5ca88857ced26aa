//! Repository layer
//!
//! Repositories are thin adapters over the GitHub client. They hand back
//! domain types and hold no business logic, so services and the scheduler
//! can be exercised against in-memory implementations.

mod artifacts;
mod checks;
mod deployments;

// Re-export traits
pub use artifacts::ArtifactRepository;
pub use checks::{BranchHeadSnapshot, CheckSuiteRepository};
pub use deployments::DeploymentRepository;

// Re-export implementations
pub use artifacts::GitHubArtifactRepository;
pub use checks::GitHubCheckSuiteRepository;
pub use deployments::GitHubDeploymentRepository;
