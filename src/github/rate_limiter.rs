//! Rate limiting support

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use std::time::Duration;

const REMAINING_HEADER: &str = "x-ratelimit-remaining";
const RESET_HEADER: &str = "x-ratelimit-reset";

/// Quota state reported by the limiter on a single response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RateLimitStatus {
    pub remaining: Option<u32>,
    pub reset_time: Option<DateTime<Utc>>,
}

impl RateLimitStatus {
    /// Read the remaining-quota and reset headers. Unparseable values are treated as absent.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let header_str = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

        let remaining = header_str(REMAINING_HEADER).and_then(|v| v.trim().parse().ok());
        let reset_time = header_str(RESET_HEADER)
            .and_then(|v| v.trim().parse::<i64>().ok())
            .and_then(|ts| DateTime::from_timestamp(ts, 0));

        Self {
            remaining,
            reset_time,
        }
    }

    /// Quota is spent and we know when it comes back.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.remaining == Some(0) && self.reset_time.is_some()
    }

    /// Time to sleep before the quota resets: `max(0, reset - now) + 1s`.
    #[must_use]
    pub fn wait_until_reset(&self, now: DateTime<Utc>) -> Duration {
        let secs = self
            .reset_time
            .map(|reset| (reset.timestamp() - now.timestamp()).max(0))
            .unwrap_or(0);
        Duration::from_secs(secs as u64 + 1)
    }
}

/// Bounded retry settings for a client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts allowed for transient failures, including the first one.
    pub max_attempts: u32,
    /// Delay before the first backoff retry; doubles on each subsequent one.
    pub base_backoff: Duration,
    /// How many quota-reset waits are allowed. `None` waits as often as needed.
    pub max_rate_limit_waits: Option<u32>,
}

impl RetryPolicy {
    /// Policy of the enrichment collectors: five attempts, 2s doubling backoff.
    #[must_use]
    pub const fn enrichment() -> Self {
        Self {
            max_attempts: 5,
            base_backoff: Duration::from_secs(2),
            max_rate_limit_waits: None,
        }
    }

    /// Policy of the search client: wait out one exhausted quota, otherwise propagate.
    #[must_use]
    pub const fn search() -> Self {
        Self {
            max_attempts: 1,
            base_backoff: Duration::from_secs(2),
            max_rate_limit_waits: Some(1),
        }
    }

    /// Backoff before retrying after the given failed attempt (1-based).
    #[must_use]
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.base_backoff.saturating_mul(1 << exponent)
    }

    pub(crate) fn allows_rate_limit_wait(&self, waits_so_far: u32) -> bool {
        self.max_rate_limit_waits
            .is_none_or(|limit| waits_so_far < limit)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::enrichment()
    }
}

/// Statuses the platform uses to reject a request for quota reasons.
#[must_use]
pub fn is_rate_limit_status(status: StatusCode) -> bool {
    status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS
}

/// Server-side failures worth retrying.
#[must_use]
pub fn is_transient_status(status: StatusCode) -> bool {
    matches!(status.as_u16(), 500 | 502 | 503 | 504)
}
