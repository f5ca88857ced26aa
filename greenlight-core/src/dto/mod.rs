//! Data Transfer Objects for the GitHub APIs
//!
//! Request and response bodies exchanged with the REST and GraphQL endpoints.
//! Response types mirror the wire format and are converted into domain types
//! at the edge.

pub mod artifact;
pub mod checks;
pub mod deployment;
pub mod graphql;
