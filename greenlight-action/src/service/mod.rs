//! Service layer
//!
//! Services hold the action's business logic on top of the repositories:
//! creating the deployment record and finding a build artifact once the
//! checks are green.

mod artifacts;
mod notifier;

pub use artifacts::ArtifactResolver;
pub use notifier::{DeploymentNotifier, phase_from_marker};
