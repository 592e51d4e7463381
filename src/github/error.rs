//! GitHub API error types

use reqwest::StatusCode;
use thiserror::Error;

/// Error types for GitHub API operations
#[derive(Debug, Error)]
pub enum GitHubError {
    /// Transport failure (connect, timeout, TLS)
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response that was not (or could no longer be) retried
    #[error("GitHub API error {status}: {body}")]
    Api { status: StatusCode, body: String },

    /// Response body did not match the expected shape
    #[error("Failed to decode response from {url}: {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Invalid input parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Authentication required or failed
    #[error("Authentication required: set GITHUB_TOKEN or pass --token")]
    AuthRequired,

    /// Client setup/configuration error
    #[error("Client setup failed: {0}")]
    ClientSetup(String),
}

impl GitHubError {
    /// Status code of the failing response, if the error came from one.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status(),
            _ => None,
        }
    }
}

/// Convenience result alias for GitHub operations
pub type GitHubResult<T> = Result<T, GitHubError>;
