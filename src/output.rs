//! Flat CSV tables written by the jobs
//!
//! Each row type carries its fixed header so that a table with zero rows
//! still gets a header line.

use crate::error::RadarResult;
use log::info;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::Path;

/// A serialisable row with a fixed column order.
pub trait CsvRow: Serialize {
    const HEADERS: &'static [&'static str];
}

/// `(owner, repo)` join key between discovery and enrichment
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryIdentity {
    pub owner: String,
    pub repo: String,
}

impl RepositoryIdentity {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Split `owner/name` on the first slash; the repo part is empty without one.
    #[must_use]
    pub fn from_full_name(full_name: &str) -> Self {
        match full_name.split_once('/') {
            Some((owner, repo)) => Self::new(owner, repo),
            None => Self::new(full_name, ""),
        }
    }

    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl CsvRow for RepositoryIdentity {
    const HEADERS: &'static [&'static str] = &["owner", "repo"];
}

/// Discovery catalog row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepositoryCandidate {
    pub owner: String,
    pub repo: String,
    pub full_name: String,
    pub html_url: Option<String>,
    pub description: String,
    pub language: Option<String>,
    pub stargazers_count: Option<u64>,
    pub forks_count: Option<u64>,
    pub open_issues_count: Option<u64>,
    pub archived: Option<bool>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub pushed_at: Option<String>,
}

impl RepositoryCandidate {
    #[must_use]
    pub fn identity(&self) -> RepositoryIdentity {
        RepositoryIdentity::new(&self.owner, &self.repo)
    }
}

impl CsvRow for RepositoryCandidate {
    const HEADERS: &'static [&'static str] = &[
        "owner",
        "repo",
        "full_name",
        "html_url",
        "description",
        "language",
        "stargazers_count",
        "forks_count",
        "open_issues_count",
        "archived",
        "created_at",
        "updated_at",
        "pushed_at",
    ];
}

/// Enrichment metadata row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepositoryMeta {
    pub owner: String,
    pub repo: String,
    pub full_name: Option<String>,
    pub description: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub pushed_at: Option<String>,
    pub stargazers_count: Option<u64>,
    pub forks_count: Option<u64>,
    pub open_issues_count: Option<u64>,
    pub subscribers_count: Option<u64>,
    pub default_branch: Option<String>,
    pub language: Option<String>,
    pub license: Option<String>,
    pub archived: Option<bool>,
    pub disabled: Option<bool>,
    pub visibility: Option<String>,
    pub html_url: Option<String>,
}

impl CsvRow for RepositoryMeta {
    const HEADERS: &'static [&'static str] = &[
        "owner",
        "repo",
        "full_name",
        "description",
        "created_at",
        "updated_at",
        "pushed_at",
        "stargazers_count",
        "forks_count",
        "open_issues_count",
        "subscribers_count",
        "default_branch",
        "language",
        "license",
        "archived",
        "disabled",
        "visibility",
        "html_url",
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageBreakdown {
    pub owner: String,
    pub repo: String,
    pub language: String,
    pub bytes: u64,
}

impl CsvRow for LanguageBreakdown {
    const HEADERS: &'static [&'static str] = &["owner", "repo", "language", "bytes"];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contributor {
    pub owner: String,
    pub repo: String,
    pub login: Option<String>,
    pub contributions: Option<u64>,
}

impl CsvRow for Contributor {
    const HEADERS: &'static [&'static str] = &["owner", "repo", "login", "contributions"];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCommitCount {
    pub owner: String,
    pub repo: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub commits: u64,
}

impl CsvRow for DailyCommitCount {
    const HEADERS: &'static [&'static str] = &["owner", "repo", "date", "commits"];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClosedIssueRecord {
    pub owner: String,
    pub repo: String,
    pub number: Option<u64>,
    pub title: String,
    pub created_at: Option<String>,
    pub closed_at: Option<String>,
    pub lead_time_days: Option<f64>,
    /// Comma-joined label names
    pub labels: String,
}

impl CsvRow for ClosedIssueRecord {
    const HEADERS: &'static [&'static str] = &[
        "owner",
        "repo",
        "number",
        "title",
        "created_at",
        "closed_at",
        "lead_time_days",
        "labels",
    ];
}

/// Keep at most `max` characters.
pub(crate) fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Write the header then every row.
pub fn write_rows_to<W: Write, R: CsvRow>(writer: W, rows: &[R]) -> RadarResult<()> {
    let mut w = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    w.write_record(R::HEADERS)?;
    for row in rows {
        w.serialize(row)?;
    }
    w.flush()?;
    Ok(())
}

/// Create (or truncate) `path` and write the table to it.
pub fn write_csv<R: CsvRow>(path: &Path, rows: &[R]) -> RadarResult<()> {
    let file = std::fs::File::create(path)?;
    write_rows_to(file, rows)?;
    info!("[ok] {} ({} rows)", path.display(), rows.len());
    Ok(())
}

/// Read an identity list with an `owner,repo` header; values are trimmed.
pub fn read_identities_from<R: Read>(reader: R) -> RadarResult<Vec<RepositoryIdentity>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut identities = Vec::new();
    for record in rdr.deserialize::<RepositoryIdentity>() {
        identities.push(record?);
    }
    Ok(identities)
}

pub fn read_identities(path: &Path) -> RadarResult<Vec<RepositoryIdentity>> {
    let file = std::fs::File::open(path)?;
    read_identities_from(file)
}
