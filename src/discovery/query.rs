//! Search query composition

use chrono::{Duration, NaiveDate};

use crate::config::DiscoveryConfig;

/// Qualifiers appended to every configured search term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Qualifiers {
    /// e.g. `language:Python`; inserted verbatim
    pub language: String,
    pub min_stars: u64,
    pub pushed_after: NaiveDate,
    /// e.g. `fork:false`; inserted verbatim
    pub extra: String,
}

impl Qualifiers {
    /// Qualifiers for a run starting on `today`.
    #[must_use]
    pub fn from_config(config: &DiscoveryConfig, today: NaiveDate) -> Self {
        Self {
            language: config.language.clone(),
            min_stars: config.min_stars,
            pushed_after: today
                .checked_sub_signed(Duration::days(i64::from(config.pushed_since_days)))
                .unwrap_or(NaiveDate::MIN),
            extra: config.extra_qualifiers.clone(),
        }
    }

    /// `"{terms} {language} stars:>{n} pushed:>{date} {extra}"`
    #[must_use]
    pub fn compose(&self, terms: &str) -> String {
        let mut q = terms.trim().to_string();

        if !self.language.is_empty() {
            q.push(' ');
            q.push_str(&self.language);
        }

        q.push_str(&format!(" stars:>{}", self.min_stars));
        q.push_str(&format!(" pushed:>{}", self.pushed_after.format("%Y-%m-%d")));

        if !self.extra.is_empty() {
            q.push(' ');
            q.push_str(&self.extra);
        }

        q
    }
}
