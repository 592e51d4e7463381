//! Repository discovery
//!
//! Fans the configured topical queries into the repository-search endpoint,
//! deduplicates the matches by `owner/name` (first query wins), sorts them by
//! stars and writes the identity list and the catalog.

mod query;

pub use query::Qualifiers;

use std::collections::HashSet;
use std::path::Path;

use chrono::Utc;
use log::info;

use crate::config::{ApiConfig, DiscoveryConfig};
use crate::error::RadarResult;
use crate::github::models::{RepoSummary, SearchResponse};
use crate::github::{GitHubClient, GitHubResult};
use crate::output::{RepositoryCandidate, RepositoryIdentity, truncate_chars, write_csv};

const SEARCH_PATH: &str = "/search/repositories";
const MAX_DESCRIPTION_CHARS: usize = 1000;

/// Result of a discovery run
#[derive(Debug, Clone, Default)]
pub struct DiscoveryReport {
    /// Deduplicated candidates, stars descending
    pub catalog: Vec<RepositoryCandidate>,
    /// Raw (pre-dedup) match count per query, in query order
    pub raw_counts: Vec<(String, usize)>,
}

impl DiscoveryReport {
    #[must_use]
    pub fn identities(&self) -> Vec<RepositoryIdentity> {
        self.catalog.iter().map(RepositoryCandidate::identity).collect()
    }
}

/// Candidates keyed by full name; the first insertion of a name is kept.
#[derive(Debug, Default)]
pub struct CandidateSet {
    seen: HashSet<String>,
    rows: Vec<RepositoryCandidate>,
}

impl CandidateSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a search match. Returns false for nameless items and repeats.
    pub fn insert(&mut self, item: &RepoSummary) -> bool {
        let Some(candidate) = candidate_from(item) else {
            return false;
        };
        if !self.seen.insert(candidate.full_name.clone()) {
            return false;
        }
        self.rows.push(candidate);
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Stars descending; a missing count sorts as zero. Ties keep insertion order.
    #[must_use]
    pub fn into_sorted(mut self) -> Vec<RepositoryCandidate> {
        self.rows
            .sort_by_key(|r| std::cmp::Reverse(r.stargazers_count.unwrap_or(0)));
        self.rows
    }
}

/// Shape a search match into a catalog row; `None` without a full name.
#[must_use]
pub fn candidate_from(item: &RepoSummary) -> Option<RepositoryCandidate> {
    let full_name = item.full_name.as_deref().filter(|n| !n.is_empty())?;
    let identity = RepositoryIdentity::from_full_name(full_name);
    let description = item
        .description
        .as_deref()
        .unwrap_or_default()
        .replace('\n', " ");

    Some(RepositoryCandidate {
        owner: identity.owner,
        repo: identity.repo,
        full_name: full_name.to_string(),
        html_url: item.html_url.clone(),
        description: truncate_chars(&description, MAX_DESCRIPTION_CHARS),
        language: item.language.clone(),
        stargazers_count: item.stargazers_count,
        forks_count: item.forks_count,
        open_issues_count: item.open_issues,
        archived: item.archived,
        created_at: item.created_at.clone(),
        updated_at: item.updated_at.clone(),
        pushed_at: item.pushed_at.clone(),
    })
}

/// Page through the search endpoint for one composed query.
pub async fn search_repositories(
    client: &GitHubClient,
    query: &str,
    config: &DiscoveryConfig,
) -> GitHubResult<Vec<RepoSummary>> {
    let per_page = config.per_page.max(1);
    let mut results = Vec::new();

    for page in 1..=config.max_pages {
        let params = [
            ("q", query.to_string()),
            ("sort", "stars".to_string()),
            ("order", "desc".to_string()),
            ("per_page", per_page.to_string()),
            ("page", page.to_string()),
        ];
        let response: SearchResponse = client.get(SEARCH_PATH, &params).await?;
        if page == 1
            && let Some(total) = response.total_count
        {
            info!("  {total} total matches reported");
        }
        let received = response.items.len();
        results.extend(response.items);
        if received < per_page as usize {
            break;
        }
    }

    Ok(results)
}

/// Run every configured query and merge the matches.
pub async fn discover(
    client: &GitHubClient,
    config: &DiscoveryConfig,
    qualifiers: &Qualifiers,
) -> RadarResult<DiscoveryReport> {
    info!(
        "Searching with pushed:>{}, stars:>{}, {}",
        qualifiers.pushed_after, qualifiers.min_stars, qualifiers.language
    );

    let mut candidates = CandidateSet::new();
    let mut raw_counts = Vec::with_capacity(config.queries.len());

    for terms in &config.queries {
        info!("== Query: {terms}");
        let items = search_repositories(client, &qualifiers.compose(terms), config).await?;
        info!("  {} raw items", items.len());

        let added = items.iter().filter(|item| candidates.insert(item)).count();
        info!("  {added} new repositories");
        raw_counts.push((terms.clone(), items.len()));
    }

    Ok(DiscoveryReport {
        catalog: candidates.into_sorted(),
        raw_counts,
    })
}

/// Write `repo_list.csv` and `repo_catalog.csv` under `out_dir`.
pub fn write_outputs(
    report: &DiscoveryReport,
    config: &DiscoveryConfig,
    out_dir: &Path,
) -> RadarResult<()> {
    std::fs::create_dir_all(out_dir)?;
    write_csv(&out_dir.join(&config.list_file), &report.identities())?;
    write_csv(&out_dir.join(&config.catalog_file), &report.catalog)?;
    Ok(())
}

/// Build the search client for this job.
pub fn build_client(
    token: &str,
    api: &ApiConfig,
    config: &DiscoveryConfig,
) -> GitHubResult<GitHubClient> {
    GitHubClient::builder()
        .personal_token(token)
        .base_uri(&api.base_uri)
        .api_version(&api.api_version)
        .user_agent(&api.user_agent)
        .timeout(api.timeout())
        .retry_policy(config.retry_policy())
        .request_delay(config.request_delay())
        .build()
}

/// Discover, then write both outputs. Nothing is written if any query fails.
pub async fn run(
    client: &GitHubClient,
    config: &DiscoveryConfig,
    out_dir: &Path,
) -> RadarResult<DiscoveryReport> {
    let qualifiers = Qualifiers::from_config(config, Utc::now().date_naive());
    let report = discover(client, config, &qualifiers).await?;
    write_outputs(&report, config, out_dir)?;
    Ok(report)
}
