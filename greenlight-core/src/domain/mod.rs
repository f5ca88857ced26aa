//! Core domain types
//!
//! These types describe the state of a repository as seen by the action:
//! the check suites attached to a commit, the verdict derived from them,
//! and the build outputs and deployments the action reads or creates.

pub mod artifact;
pub mod check_suite;
pub mod deployment;
