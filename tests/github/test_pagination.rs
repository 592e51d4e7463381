//! Tests for page-number pagination.

use futures::StreamExt;
use github_radar::{PageRequest, fetch_all, paginate};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{client_for, fast_policy, request_count};

async fn mount_page(server: &MockServer, page: u32, body: serde_json::Value, expected: u64) {
    Mock::given(method("GET"))
        .and(path("/items"))
        .and(query_param("page", page.to_string().as_str()))
        .and(query_param("per_page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(expected)
        .mount(server)
        .await;
}

#[tokio::test]
async fn concatenates_pages_until_a_short_one() {
    let server = MockServer::start().await;
    mount_page(&server, 1, json!([1, 2]), 1).await;
    mount_page(&server, 2, json!([3, 4]), 1).await;
    mount_page(&server, 3, json!([5]), 1).await;
    mount_page(&server, 4, json!([6, 7]), 0).await;

    let gh = client_for(&server, fast_policy(1));
    let items: Vec<u32> = fetch_all(&gh, PageRequest::new("/items", 2)).await.unwrap();

    assert_eq!(items, vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn stops_at_an_empty_page() {
    let server = MockServer::start().await;
    mount_page(&server, 1, json!([1, 2]), 1).await;
    mount_page(&server, 2, json!([]), 1).await;

    let gh = client_for(&server, fast_policy(1));
    let items: Vec<u32> = fetch_all(&gh, PageRequest::new("/items", 2)).await.unwrap();

    assert_eq!(items, vec![1, 2]);
}

#[tokio::test]
async fn stops_on_a_non_list_body() {
    let server = MockServer::start().await;
    mount_page(&server, 1, json!({"message": "moved"}), 1).await;

    let gh = client_for(&server, fast_policy(1));
    let items: Vec<u32> = fetch_all(&gh, PageRequest::new("/items", 2)).await.unwrap();

    assert!(items.is_empty());
}

#[tokio::test]
async fn forwards_since_and_extra_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/issues"))
        .and(query_param("since", "2024-01-01T00:00:00Z"))
        .and(query_param("state", "closed"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"n": 1}])))
        .expect(1)
        .mount(&server)
        .await;

    let gh = client_for(&server, fast_policy(1));
    let request = PageRequest::new("/issues", 100)
        .param("state", "closed")
        .since(Some("2024-01-01T00:00:00Z"));
    let items: Vec<serde_json::Value> = fetch_all(&gh, request).await.unwrap();

    assert_eq!(items.len(), 1);
}

#[tokio::test]
async fn pages_are_fetched_lazily() {
    let server = MockServer::start().await;
    mount_page(&server, 1, json!([1, 2]), 1).await;
    mount_page(&server, 2, json!([3, 4]), 0).await;

    let gh = client_for(&server, fast_policy(1));
    let first: Vec<u32> = paginate::<u32>(&gh, PageRequest::new("/items", 2))
        .take(2)
        .map(Result::unwrap)
        .collect()
        .await;

    assert_eq!(first, vec![1, 2]);
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test]
async fn failing_page_ends_the_stream_with_an_error() {
    let server = MockServer::start().await;
    mount_page(&server, 1, json!([1, 2]), 1).await;
    Mock::given(method("GET"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&server)
        .await;

    let gh = client_for(&server, fast_policy(1));
    let result = fetch_all::<u32>(&gh, PageRequest::new("/items", 2)).await;
    assert!(result.is_err());
}
