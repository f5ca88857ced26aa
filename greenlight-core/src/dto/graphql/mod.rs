//! GraphQL envelope types

use serde::{Deserialize, Serialize};

/// A GraphQL request body
#[derive(Debug, Clone, Serialize)]
pub struct GraphQlRequest<V> {
    pub query: &'static str,
    pub variables: V,
}

/// A GraphQL response body
///
/// GraphQL reports most failures in-band: a response may carry `errors` and
/// still hold partial `data`, so both are kept.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,

    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

impl<T> GraphQlResponse<T> {
    /// Whether the server reported any error alongside the data
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// One entry of a GraphQL `errors` array
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GraphQlError {
    pub message: String,

    #[serde(default, rename = "type")]
    pub kind: Option<String>,

    #[serde(default)]
    pub path: Vec<serde_json::Value>,
}

impl std::fmt::Display for GraphQlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            Some(kind) => write!(f, "{} ({})", self.message, kind),
            None => write!(f, "{}", self.message),
        }
    }
}
