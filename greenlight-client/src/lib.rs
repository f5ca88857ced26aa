//! Greenlight GitHub Client
//!
//! A small, typed HTTP client for the parts of the GitHub REST and GraphQL
//! APIs the Greenlight action needs.
//!
//! # Example
//!
//! ```no_run
//! use greenlight_client::GitHubClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = GitHubClient::new("ghp_example");
//!
//!     let response = client.query_default_branch_head("acme", "broker", 10).await?;
//!     if let Some(head) = response.data.and_then(|data| data.head()) {
//!         println!("Head has {} check suite(s)", head.check_suites.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
mod artifacts;
mod checks;
mod deployments;

// Re-export commonly used types
pub use error::{ClientError, Result};

use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;

use greenlight_core::dto::graphql::{GraphQlRequest, GraphQlResponse};

/// Default base URL of the REST API
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Default URL of the GraphQL endpoint
pub const DEFAULT_GRAPHQL_URL: &str = "https://api.github.com/graphql";

const API_VERSION: &str = "2022-11-28";
const MEDIA_TYPE: &str = "application/vnd.github+json";
const CLIENT_USER_AGENT: &str = concat!("greenlight/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the GitHub API
///
/// Endpoints are grouped by concern:
/// - Deployments (create)
/// - Check suites (default branch head query over GraphQL)
/// - Workflow run artifacts (list)
#[derive(Clone)]
pub struct GitHubClient {
    /// Base URL of the REST API (e.g., "https://api.github.com")
    api_url: String,
    /// URL of the GraphQL endpoint
    graphql_url: String,
    /// Bearer token sent with every request
    token: String,
    /// HTTP client instance
    client: Client,
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("api_url", &self.api_url)
            .field("graphql_url", &self.graphql_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl GitHubClient {
    /// Create a client for github.com
    ///
    /// # Arguments
    /// * `token` - Token used as bearer credentials
    ///
    /// # Example
    /// ```
    /// use greenlight_client::GitHubClient;
    ///
    /// let client = GitHubClient::new("ghp_example");
    /// assert_eq!(client.api_url(), "https://api.github.com");
    /// ```
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_endpoints(DEFAULT_API_URL, DEFAULT_GRAPHQL_URL, token)
    }

    /// Create a client for a specific REST and GraphQL endpoint pair
    ///
    /// Used for GitHub Enterprise Server and for tests.
    pub fn with_endpoints(
        api_url: impl Into<String>,
        graphql_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self::with_client(api_url, graphql_url, token, Client::new())
    }

    /// Create a client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(
        api_url: impl Into<String>,
        graphql_url: impl Into<String>,
        token: impl Into<String>,
        client: Client,
    ) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            graphql_url: graphql_url.into(),
            token: token.into(),
            client,
        }
    }

    /// Get the base URL of the REST API
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Get the URL of the GraphQL endpoint
    pub fn graphql_url(&self) -> &str {
        &self.graphql_url
    }

    /// Start a request with the headers every GitHub call needs
    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(&self.token)
            .header(ACCEPT, MEDIA_TYPE)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .header("X-GitHub-Api-Version", API_VERSION)
    }

    /// Run a GraphQL query and return the raw envelope
    ///
    /// A non-success HTTP status is an error; in-band GraphQL errors are
    /// left for the caller to inspect.
    async fn graphql<V, T>(&self, query: &'static str, variables: V) -> Result<GraphQlResponse<T>>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        let response = self
            .request(Method::POST, &self.graphql_url)
            .json(&GraphQlRequest { query, variables })
            .send()
            .await?;

        self.handle_response(response).await
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}

/// Reject path segments that would change the shape of a REST URL
fn check_segment(kind: &str, value: &str) -> Result<()> {
    if value.is_empty() || value.contains('/') {
        return Err(ClientError::InvalidRequest(format!(
            "{} must be a single non-empty path segment, got {:?}",
            kind, value
        )));
    }
    Ok(())
}
