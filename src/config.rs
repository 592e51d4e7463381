//! Configuration for the discovery and enrichment jobs

use crate::error::{RadarError, RadarResult};
use crate::github::RetryPolicy;
use crate::github::client::{DEFAULT_API_VERSION, DEFAULT_BASE_URI, DEFAULT_USER_AGENT};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Longest lookback accepted for the push, commit and issue windows
pub const MAX_WINDOW_DAYS: u32 = 36_500;

/// Top-level configuration, built once at startup and passed by reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarConfig {
    pub api: ApiConfig,
    pub discovery: DiscoveryConfig,
    pub enrichment: EnrichmentConfig,
}

impl RadarConfig {
    /// Parse a TOML document. Missing sections and fields take their defaults.
    pub fn from_toml_str(raw: &str) -> RadarResult<Self> {
        let config: Self = toml::from_str(raw).map_err(|e| RadarError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject windows the date arithmetic cannot represent.
    pub fn validate(&self) -> RadarResult<()> {
        for (name, days) in [
            ("discovery.pushed_since_days", self.discovery.pushed_since_days),
            ("enrichment.commit_days", self.enrichment.commit_days),
            ("enrichment.issue_days", self.enrichment.issue_days),
        ] {
            if days > MAX_WINDOW_DAYS {
                return Err(RadarError::Config(format!(
                    "{name} = {days} exceeds {MAX_WINDOW_DAYS} days"
                )));
            }
        }
        Ok(())
    }

    /// Load from a TOML file, or use defaults when no path is given.
    pub fn load(path: Option<&Path>) -> RadarResult<Self> {
        match path {
            Some(p) => {
                let raw = std::fs::read_to_string(p).map_err(|e| {
                    RadarError::Config(format!("cannot read {}: {e}", p.display()))
                })?;
                Self::from_toml_str(&raw)
            }
            None => Ok(Self::default()),
        }
    }
}

/// Connection settings shared by both jobs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_uri: String,
    pub api_version: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl ApiConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_uri: DEFAULT_BASE_URI.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Repository search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    pub queries: Vec<String>,
    /// Inserted verbatim, e.g. `language:Python`
    pub language: String,
    /// Inserted verbatim after the other qualifiers
    pub extra_qualifiers: String,
    pub min_stars: u64,
    pub pushed_since_days: u32,
    pub per_page: u32,
    pub max_pages: u32,
    pub request_delay_ms: u64,
    pub list_file: String,
    pub catalog_file: String,
}

impl DiscoveryConfig {
    #[must_use]
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::search()
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            queries: [
                "data engineering",
                "ETL OR ELT",
                r#"airflow OR "apache airflow""#,
                r#"dbt OR "dbt-core""#,
                "duckdb",
                r#""great expectations" OR "data quality""#,
                r#"kafka OR "apache kafka""#,
                r#"delta lake OR "delta-io""#,
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            language: "language:Python".to_string(),
            extra_qualifiers: "fork:false".to_string(),
            min_stars: 100,
            pushed_since_days: 180,
            per_page: 100, // GitHub API max
            max_pages: 2,
            request_delay_ms: 1000,
            list_file: "repo_list.csv".to_string(),
            catalog_file: "repo_catalog.csv".to_string(),
        }
    }
}

/// Per-repository lookup settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    pub commit_days: u32,
    pub issue_days: u32,
    pub per_page: u32,
    pub request_delay_ms: u64,
    pub max_attempts: u32,
    pub base_backoff_ms: u64,
    /// Log a failing repository and move on instead of aborting the run
    pub continue_on_error: bool,
    pub meta_file: String,
    pub languages_file: String,
    pub contributors_file: String,
    pub commits_file: String,
    pub issues_file: String,
}

impl EnrichmentConfig {
    #[must_use]
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            base_backoff: Duration::from_millis(self.base_backoff_ms),
            max_rate_limit_waits: None,
        }
    }
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            commit_days: 30,
            issue_days: 60,
            per_page: 100,
            request_delay_ms: 500,
            max_attempts: 5,
            base_backoff_ms: 2000,
            continue_on_error: false,
            meta_file: "repo_meta.csv".to_string(),
            languages_file: "repo_languages.csv".to_string(),
            contributors_file: "repo_contributors.csv".to_string(),
            commits_file: "repo_commits_daily.csv".to_string(),
            issues_file: "repo_issues_closed.csv".to_string(),
        }
    }
}
