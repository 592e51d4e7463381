//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::time::Duration;

use github_radar::{GitHubClient, RetryPolicy};
use wiremock::MockServer;

pub const TOKEN: &str = "test-token";

/// Backoff short enough to keep retry tests fast.
pub fn fast_policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        base_backoff: Duration::from_millis(10),
        max_rate_limit_waits: None,
    }
}

pub fn client_for(server: &MockServer, policy: RetryPolicy) -> GitHubClient {
    GitHubClient::builder()
        .personal_token(TOKEN)
        .base_uri(server.uri())
        .retry_policy(policy)
        .build()
        .expect("client should build")
}

pub async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|r| r.len())
        .unwrap_or_default()
}
