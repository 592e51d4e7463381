//! Response payloads for the endpoints the radar reads.
//!
//! Every field is optional: the platform omits or nulls fields freely and a
//! missing value becomes an empty CSV cell rather than a decode failure.
//! Timestamps stay as the raw strings the API sent.

use serde::Deserialize;

/// Envelope of `GET /search/repositories`
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SearchResponse {
    #[serde(default)]
    pub total_count: Option<u64>,
    #[serde(default)]
    pub items: Vec<RepoSummary>,
}

/// A repository as listed by the search endpoint
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct RepoSummary {
    pub full_name: Option<String>,
    pub html_url: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
    pub stargazers_count: Option<u64>,
    pub forks_count: Option<u64>,
    pub open_issues: Option<u64>,
    pub archived: Option<bool>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub pushed_at: Option<String>,
}

/// `GET /repos/{owner}/{repo}`
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RepoDetails {
    pub full_name: Option<String>,
    pub description: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub pushed_at: Option<String>,
    pub stargazers_count: Option<u64>,
    pub forks_count: Option<u64>,
    pub open_issues_count: Option<u64>,
    pub subscribers_count: Option<u64>,
    pub default_branch: Option<String>,
    pub language: Option<String>,
    pub license: Option<License>,
    pub archived: Option<bool>,
    pub disabled: Option<bool>,
    pub visibility: Option<String>,
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct License {
    pub spdx_id: Option<String>,
}

/// Entry of `GET /repos/{owner}/{repo}/contributors`
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ContributorEntry {
    pub login: Option<String>,
    pub contributions: Option<u64>,
}

/// Entry of `GET /repos/{owner}/{repo}/commits`
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CommitEntry {
    #[serde(default)]
    pub commit: Option<CommitDetail>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CommitDetail {
    pub author: Option<Signature>,
    pub committer: Option<Signature>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Signature {
    pub date: Option<String>,
}

/// Entry of `GET /repos/{owner}/{repo}/issues`; pull requests carry `pull_request`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct IssueEntry {
    pub number: Option<u64>,
    pub title: Option<String>,
    pub created_at: Option<String>,
    pub closed_at: Option<String>,
    #[serde(default)]
    pub labels: Vec<IssueLabel>,
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
}

impl IssueEntry {
    #[must_use]
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct IssueLabel {
    pub name: Option<String>,
}
