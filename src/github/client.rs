//! Rate-limited GitHub REST client
//!
//! Wraps a single GET with bounded retry, exponential backoff and a sleep
//! until the quota resets when the limiter reports zero remaining requests.
//!
//! # Examples
//!
//! ```rust,no_run
//! use github_radar::{GitHubClient, RetryPolicy};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let gh = GitHubClient::builder()
//!         .personal_token("ghp_...")
//!         .retry_policy(RetryPolicy::enrichment())
//!         .build()?;
//!
//!     let repo: serde_json::Value = gh.get("/repos/rust-lang/rust", &[]).await?;
//!     println!("{}", repo["full_name"]);
//!
//!     Ok(())
//! }
//! ```

use crate::github::error::{GitHubError, GitHubResult};
use crate::github::rate_limiter::{
    RateLimitStatus, RetryPolicy, is_rate_limit_status, is_transient_status,
};
use chrono::Utc;
use log::{debug, info, warn};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

pub const DEFAULT_BASE_URI: &str = "https://api.github.com";
pub const DEFAULT_API_VERSION: &str = "2022-11-28";
pub const DEFAULT_USER_AGENT: &str = concat!("github-radar/", env!("CARGO_PKG_VERSION"));

const MEDIA_TYPE: &str = "application/vnd.github+json";
const API_VERSION_HEADER: &str = "x-github-api-version";

/// GitHub API client with retry and rate-limit handling.
///
/// Cloning is cheap (Arc clone).
#[derive(Clone, Debug)]
pub struct GitHubClient {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    http: reqwest::Client,
    base_uri: String,
    retry: RetryPolicy,
    request_delay: Duration,
}

impl GitHubClient {
    /// Create a new client builder
    #[must_use]
    pub fn builder() -> GitHubClientBuilder {
        GitHubClientBuilder::new()
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}/{}", self.inner.base_uri, path.trim_start_matches('/'))
        }
    }

    /// GET `path` with query `params` and decode the JSON body.
    ///
    /// Exhausted quota (403/429 with `x-ratelimit-remaining: 0`) sleeps until
    /// the reset time and retries without spending an attempt. Other 403/429
    /// responses and 5xx responses back off exponentially up to
    /// `max_attempts`. Anything else is returned as [`GitHubError::Api`].
    /// Every successful call is followed by the configured politeness delay.
    pub async fn get<T>(&self, path: &str, params: &[(&str, String)]) -> GitHubResult<T>
    where
        T: DeserializeOwned,
    {
        let url = self.url_for(path);
        let retry = self.inner.retry;
        let mut attempt = 0u32;
        let mut rate_limit_waits = 0u32;

        loop {
            debug!("GET {url} {params:?}");
            let response = self.inner.http.get(&url).query(params).send().await?;
            let status = response.status();

            if status.is_success() {
                let body = response.bytes().await?;
                let decoded = serde_json::from_slice(&body).map_err(|source| {
                    GitHubError::Json {
                        url: url.clone(),
                        source,
                    }
                })?;
                if !self.inner.request_delay.is_zero() {
                    sleep(self.inner.request_delay).await;
                }
                return Ok(decoded);
            }

            let limit = RateLimitStatus::from_headers(response.headers());
            let body = response.text().await.unwrap_or_default();

            if is_rate_limit_status(status)
                && limit.is_exhausted()
                && retry.allows_rate_limit_wait(rate_limit_waits)
            {
                let wait = limit.wait_until_reset(Utc::now());
                info!("[rate limit] waiting {}s for quota reset", wait.as_secs());
                sleep(wait).await;
                rate_limit_waits += 1;
                continue;
            }

            if is_rate_limit_status(status) || is_transient_status(status) {
                attempt += 1;
                if attempt >= retry.max_attempts {
                    warn!("[{status}] giving up on {url} after {attempt} attempt(s): {body}");
                    return Err(GitHubError::Api { status, body });
                }
                let backoff = retry.backoff_for(attempt);
                warn!(
                    "[{status}] attempt {attempt}/{}; retrying in {backoff:?}",
                    retry.max_attempts
                );
                sleep(backoff).await;
                continue;
            }

            warn!("[{status}] {url}: {body}");
            return Err(GitHubError::Api { status, body });
        }
    }
}

/// Builder for creating a [`GitHubClient`]
pub struct GitHubClientBuilder {
    token: Option<String>,
    base_uri: Option<String>,
    api_version: Option<String>,
    user_agent: Option<String>,
    timeout: Duration,
    retry: RetryPolicy,
    request_delay: Duration,
}

impl GitHubClientBuilder {
    /// Create a new builder
    #[must_use]
    pub fn new() -> Self {
        Self {
            token: None,
            base_uri: None,
            api_version: None,
            user_agent: None,
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
            request_delay: Duration::ZERO,
        }
    }

    /// Set personal access token for bearer authentication
    pub fn personal_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set base URI (for GitHub Enterprise or a test server)
    pub fn base_uri(mut self, uri: impl Into<String>) -> Self {
        self.base_uri = Some(uri.into());
        self
    }

    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Per-request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Delay applied after every successful request
    #[must_use]
    pub fn request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    /// Build the `GitHubClient`
    pub fn build(self) -> GitHubResult<GitHubClient> {
        let token = self
            .token
            .filter(|t| !t.trim().is_empty())
            .ok_or(GitHubError::AuthRequired)?;

        if self.retry.max_attempts == 0 {
            return Err(GitHubError::InvalidInput(
                "max_attempts must be at least 1".into(),
            ));
        }

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
            .map_err(|e| GitHubError::ClientSetup(format!("Invalid token: {e}")))?;
        auth.set_sensitive(true);

        let version = self
            .api_version
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());
        let version = HeaderValue::from_str(&version)
            .map_err(|e| GitHubError::ClientSetup(format!("Invalid API version: {e}")))?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static(MEDIA_TYPE));
        headers.insert(HeaderName::from_static(API_VERSION_HEADER), version);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(
                self.user_agent
                    .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            )
            .timeout(self.timeout)
            .build()
            .map_err(|e| GitHubError::ClientSetup(e.to_string()))?;

        let base_uri = self
            .base_uri
            .unwrap_or_else(|| DEFAULT_BASE_URI.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(GitHubClient {
            inner: Arc::new(ClientInner {
                http,
                base_uri,
                retry: self.retry,
                request_delay: self.request_delay,
            }),
        })
    }
}

impl Default for GitHubClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
