//! Job-level error types

use crate::github::GitHubError;
use thiserror::Error;

/// Errors surfaced by the discovery and enrichment jobs
#[derive(Debug, Error)]
pub enum RadarError {
    #[error(transparent)]
    GitHub(#[from] GitHubError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// A repository lookup failed while the run was set to abort on error
    #[error("Enrichment of {repo} failed: {source}")]
    Repository {
        repo: String,
        #[source]
        source: GitHubError,
    },
}

pub type RadarResult<T> = Result<T, RadarError>;
