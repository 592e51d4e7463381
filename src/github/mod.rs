//! GitHub REST access
//!
//! A rate-limit aware client, page-number pagination and the response
//! payloads used by the discovery and enrichment jobs.

pub mod client;
pub mod error;
pub mod models;
pub mod pagination;
pub mod rate_limiter;

// Re-export client types
pub use client::{GitHubClient, GitHubClientBuilder};

// Re-export error types
pub use error::{GitHubError, GitHubResult};

pub use pagination::{PageRequest, fetch_all, paginate};
pub use rate_limiter::{RateLimitStatus, RetryPolicy};
