//! `github_radar` - topical GitHub repository discovery and activity harvesting
//!
//! Two batch jobs that talk to each other only through CSV files:
//!
//! - [`discovery`] fans keyword queries into the repository search endpoint
//!   and writes a deduplicated identity list plus a metadata catalog.
//! - [`enrichment`] reads the identity list and writes metadata, language,
//!   contributor, daily-commit and closed-issue tables.
//!
//! Both share the rate-limit aware [`GitHubClient`].

// Module declarations
pub mod config;
pub mod discovery;
pub mod enrichment;
pub mod error;
pub mod github;
pub mod output;

pub use config::{ApiConfig, DiscoveryConfig, EnrichmentConfig, RadarConfig};
pub use error::{RadarError, RadarResult};

// Re-export GitHub client types
pub use github::{
    GitHubClient, GitHubClientBuilder, GitHubError, GitHubResult, PageRequest, RateLimitStatus,
    RetryPolicy, fetch_all, paginate,
};

pub use discovery::{DiscoveryReport, Qualifiers};
pub use enrichment::{EnrichmentReport, RepositoryFailure, Windows};

pub use output::{
    ClosedIssueRecord, Contributor, CsvRow, DailyCommitCount, LanguageBreakdown,
    RepositoryCandidate, RepositoryIdentity, RepositoryMeta,
};
