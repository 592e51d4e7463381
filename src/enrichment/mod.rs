//! Per-repository enrichment
//!
//! For each `(owner, repo)` of the identity list, in order: metadata,
//! language bytes, contributors, commits of the trailing commit window
//! grouped by day, and issues closed in the trailing issue window.

mod activity;

pub use activity::{closed_issue_records, commit_day, daily_commit_counts, lead_time_days};

use std::path::Path;

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use log::{info, warn};
use serde_json::Value;

use crate::config::{ApiConfig, EnrichmentConfig};
use crate::error::{RadarError, RadarResult};
use crate::github::models::{CommitEntry, ContributorEntry, IssueEntry, RepoDetails};
use crate::github::{GitHubClient, GitHubError, GitHubResult, PageRequest, fetch_all};
use crate::output::{
    ClosedIssueRecord, Contributor, DailyCommitCount, LanguageBreakdown, RepositoryIdentity,
    RepositoryMeta, read_identities, truncate_chars, write_csv,
};

const MAX_DESCRIPTION_CHARS: usize = 1000;

/// `since` cut-offs for one run, fixed from a single clock reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Windows {
    pub commits_since: String,
    pub issues_since: String,
}

impl Windows {
    #[must_use]
    pub fn new(now: DateTime<Utc>, config: &EnrichmentConfig) -> Self {
        let since = |days: u32| {
            now.checked_sub_signed(Duration::days(i64::from(days)))
                .unwrap_or(DateTime::<Utc>::MIN_UTC)
                .to_rfc3339_opts(SecondsFormat::Secs, true)
        };
        Self {
            commits_since: since(config.commit_days),
            issues_since: since(config.issue_days),
        }
    }
}

/// Everything collected for one repository
#[derive(Debug, Clone)]
pub struct RepositoryFacts {
    pub meta: RepositoryMeta,
    pub languages: Vec<LanguageBreakdown>,
    pub contributors: Vec<Contributor>,
    pub daily_commits: Vec<DailyCommitCount>,
    pub closed_issues: Vec<ClosedIssueRecord>,
}

/// A repository skipped under `continue_on_error`
#[derive(Debug, Clone)]
pub struct RepositoryFailure {
    pub identity: RepositoryIdentity,
    pub error: String,
}

/// The five row-sets of a run, plus skipped repositories
#[derive(Debug, Clone, Default)]
pub struct EnrichmentReport {
    pub meta: Vec<RepositoryMeta>,
    pub languages: Vec<LanguageBreakdown>,
    pub contributors: Vec<Contributor>,
    pub daily_commits: Vec<DailyCommitCount>,
    pub closed_issues: Vec<ClosedIssueRecord>,
    pub failures: Vec<RepositoryFailure>,
}

impl EnrichmentReport {
    fn absorb(&mut self, facts: RepositoryFacts) {
        self.meta.push(facts.meta);
        self.languages.extend(facts.languages);
        self.contributors.extend(facts.contributors);
        self.daily_commits.extend(facts.daily_commits);
        self.closed_issues.extend(facts.closed_issues);
    }
}

fn repo_path(id: &RepositoryIdentity, suffix: &str) -> String {
    format!("/repos/{}/{}{suffix}", id.owner, id.repo)
}

pub async fn fetch_meta(
    client: &GitHubClient,
    id: &RepositoryIdentity,
) -> GitHubResult<RepositoryMeta> {
    let details: RepoDetails = client.get(&repo_path(id, ""), &[]).await?;

    Ok(RepositoryMeta {
        owner: id.owner.clone(),
        repo: id.repo.clone(),
        full_name: details.full_name,
        description: truncate_chars(
            details.description.as_deref().unwrap_or_default(),
            MAX_DESCRIPTION_CHARS,
        ),
        created_at: details.created_at,
        updated_at: details.updated_at,
        pushed_at: details.pushed_at,
        stargazers_count: details.stargazers_count,
        forks_count: details.forks_count,
        open_issues_count: details.open_issues_count,
        subscribers_count: details.subscribers_count,
        default_branch: details.default_branch,
        language: details.language,
        license: details.license.and_then(|l| l.spdx_id),
        archived: details.archived,
        disabled: details.disabled,
        visibility: details.visibility,
        html_url: details.html_url,
    })
}

/// Language byte counts in the order the API lists them.
pub async fn fetch_languages(
    client: &GitHubClient,
    id: &RepositoryIdentity,
) -> GitHubResult<Vec<LanguageBreakdown>> {
    let body: Value = client.get(&repo_path(id, "/languages"), &[]).await?;
    let Value::Object(map) = body else {
        return Ok(Vec::new());
    };

    Ok(map
        .into_iter()
        .filter_map(|(language, bytes)| {
            bytes.as_u64().map(|bytes| LanguageBreakdown {
                owner: id.owner.clone(),
                repo: id.repo.clone(),
                language,
                bytes,
            })
        })
        .collect())
}

pub async fn fetch_contributors(
    client: &GitHubClient,
    id: &RepositoryIdentity,
    per_page: u32,
) -> GitHubResult<Vec<Contributor>> {
    let entries: Vec<ContributorEntry> =
        fetch_all(client, PageRequest::new(repo_path(id, "/contributors"), per_page)).await?;

    Ok(entries
        .into_iter()
        .map(|c| Contributor {
            owner: id.owner.clone(),
            repo: id.repo.clone(),
            login: c.login,
            contributions: c.contributions,
        })
        .collect())
}

pub async fn fetch_daily_commits(
    client: &GitHubClient,
    id: &RepositoryIdentity,
    per_page: u32,
    since: &str,
) -> GitHubResult<Vec<DailyCommitCount>> {
    let request = PageRequest::new(repo_path(id, "/commits"), per_page).since(Some(since));
    let commits: Vec<CommitEntry> = fetch_all(client, request).await?;
    Ok(daily_commit_counts(id, &commits))
}

pub async fn fetch_closed_issues(
    client: &GitHubClient,
    id: &RepositoryIdentity,
    per_page: u32,
    since: &str,
) -> GitHubResult<Vec<ClosedIssueRecord>> {
    let request = PageRequest::new(repo_path(id, "/issues"), per_page)
        .param("state", "closed")
        .since(Some(since));
    let issues: Vec<IssueEntry> = fetch_all(client, request).await?;
    Ok(closed_issue_records(id, &issues))
}

/// Run the five lookups for one repository.
pub async fn enrich_repository(
    client: &GitHubClient,
    id: &RepositoryIdentity,
    config: &EnrichmentConfig,
    windows: &Windows,
) -> GitHubResult<RepositoryFacts> {
    let meta = fetch_meta(client, id).await?;
    let languages = fetch_languages(client, id).await?;
    let contributors = fetch_contributors(client, id, config.per_page).await?;
    let daily_commits =
        fetch_daily_commits(client, id, config.per_page, &windows.commits_since).await?;
    let closed_issues =
        fetch_closed_issues(client, id, config.per_page, &windows.issues_since).await?;

    Ok(RepositoryFacts {
        meta,
        languages,
        contributors,
        daily_commits,
        closed_issues,
    })
}

/// Enrich every repository in order.
///
/// The first failure aborts the run unless `continue_on_error` is set, in
/// which case the repository is recorded in `failures` and skipped.
pub async fn enrich(
    client: &GitHubClient,
    identities: &[RepositoryIdentity],
    config: &EnrichmentConfig,
    now: DateTime<Utc>,
) -> RadarResult<EnrichmentReport> {
    let windows = Windows::new(now, config);
    let mut report = EnrichmentReport::default();

    for id in identities {
        info!("=== {} ===", id.full_name());
        match enrich_repository(client, id, config, &windows).await {
            Ok(facts) => report.absorb(facts),
            Err(e) if config.continue_on_error => {
                warn!("Skipping {}: {e}", id.full_name());
                report.failures.push(RepositoryFailure {
                    identity: id.clone(),
                    error: e.to_string(),
                });
            }
            Err(e) => return Err(repository_error(id, e)),
        }
    }

    if !report.failures.is_empty() {
        warn!(
            "{} of {} repositories failed: {}",
            report.failures.len(),
            identities.len(),
            report
                .failures
                .iter()
                .map(|f| f.identity.full_name())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    Ok(report)
}

fn repository_error(id: &RepositoryIdentity, source: GitHubError) -> RadarError {
    RadarError::Repository {
        repo: id.full_name(),
        source,
    }
}

/// Write the five tables under `out_dir`.
pub fn write_outputs(
    report: &EnrichmentReport,
    config: &EnrichmentConfig,
    out_dir: &Path,
) -> RadarResult<()> {
    std::fs::create_dir_all(out_dir)?;
    write_csv(&out_dir.join(&config.meta_file), &report.meta)?;
    write_csv(&out_dir.join(&config.languages_file), &report.languages)?;
    write_csv(&out_dir.join(&config.contributors_file), &report.contributors)?;
    write_csv(&out_dir.join(&config.commits_file), &report.daily_commits)?;
    write_csv(&out_dir.join(&config.issues_file), &report.closed_issues)?;
    Ok(())
}

/// Build the collector client for this job.
pub fn build_client(
    token: &str,
    api: &ApiConfig,
    config: &EnrichmentConfig,
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

/// Read `input`, enrich, then write all five tables at once.
pub async fn run(
    client: &GitHubClient,
    config: &EnrichmentConfig,
    input: &Path,
    out_dir: &Path,
) -> RadarResult<EnrichmentReport> {
    let identities = read_identities(input)?;
    info!("{} repositories to enrich from {}", identities.len(), input.display());

    let report = enrich(client, &identities, config, Utc::now()).await?;
    write_outputs(&report, config, out_dir)?;
    Ok(report)
}
