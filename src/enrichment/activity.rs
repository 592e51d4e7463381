//! Commit and issue aggregation

use chrono::{DateTime, FixedOffset, NaiveDate};
use std::collections::BTreeMap;

use crate::github::models::{CommitEntry, IssueEntry};
use crate::output::{ClosedIssueRecord, DailyCommitCount, RepositoryIdentity, truncate_chars};

const MAX_TITLE_CHARS: usize = 300;
const SECONDS_PER_DAY: f64 = 86_400.0;

fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw.trim()).ok()
}

/// Calendar day of a commit: the author date, else the committer date.
///
/// Only the first non-empty date is considered; if it does not parse the
/// commit has no day.
#[must_use]
pub fn commit_day(entry: &CommitEntry) -> Option<NaiveDate> {
    let commit = entry.commit.as_ref()?;
    let author_date = commit.author.as_ref().and_then(|a| a.date.as_deref());
    let committer_date = commit.committer.as_ref().and_then(|c| c.date.as_deref());

    let raw = author_date
        .filter(|d| !d.is_empty())
        .or(committer_date)
        .filter(|d| !d.is_empty())?;

    parse_timestamp(raw).map(|dt| dt.date_naive())
}

/// Count commits per day, ascending. Undated commits are dropped.
#[must_use]
pub fn daily_commit_counts(
    id: &RepositoryIdentity,
    commits: &[CommitEntry],
) -> Vec<DailyCommitCount> {
    let mut per_day: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for day in commits.iter().filter_map(commit_day) {
        *per_day.entry(day).or_default() += 1;
    }

    per_day
        .into_iter()
        .map(|(day, commits)| DailyCommitCount {
            owner: id.owner.clone(),
            repo: id.repo.clone(),
            date: day.format("%Y-%m-%d").to_string(),
            commits,
        })
        .collect()
}

/// `(closed - created)` in days, rounded to two decimals.
#[must_use]
pub fn lead_time_days(created_at: Option<&str>, closed_at: Option<&str>) -> Option<f64> {
    let created = parse_timestamp(created_at?)?;
    let closed = parse_timestamp(closed_at?)?;
    let seconds = (closed - created).num_milliseconds() as f64 / 1000.0;
    Some((seconds / SECONDS_PER_DAY * 100.0).round() / 100.0)
}

/// One record per closed issue; pull requests are skipped.
#[must_use]
pub fn closed_issue_records(
    id: &RepositoryIdentity,
    issues: &[IssueEntry],
) -> Vec<ClosedIssueRecord> {
    issues
        .iter()
        .filter(|issue| !issue.is_pull_request())
        .map(|issue| ClosedIssueRecord {
            owner: id.owner.clone(),
            repo: id.repo.clone(),
            number: issue.number,
            title: truncate_chars(issue.title.as_deref().unwrap_or_default(), MAX_TITLE_CHARS),
            created_at: issue.created_at.clone(),
            closed_at: issue.closed_at.clone(),
            lead_time_days: lead_time_days(issue.created_at.as_deref(), issue.closed_at.as_deref()),
            labels: issue
                .labels
                .iter()
                .filter_map(|l| l.name.as_deref())
                .filter(|n| !n.is_empty())
                .collect::<Vec<_>>()
                .join(","),
        })
        .collect()
}
