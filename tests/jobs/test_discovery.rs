//! Discovery job against a mocked search endpoint.

use chrono::NaiveDate;
use github_radar::discovery::{self, Qualifiers};
use github_radar::{ApiConfig, DiscoveryConfig};
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{TOKEN, request_count};

fn repo(full_name: &str, stars: Option<u64>, description: &str) -> Value {
    json!({
        "full_name": full_name,
        "html_url": format!("https://github.com/{full_name}"),
        "description": description,
        "language": "Python",
        "stargazers_count": stars,
        "forks_count": 3,
        "open_issues": 4,
        "archived": false,
        "created_at": "2020-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z",
        "pushed_at": "2024-01-02T00:00:00Z"
    })
}

fn qualifiers() -> Qualifiers {
    Qualifiers {
        language: "language:Python".into(),
        min_stars: 100,
        pushed_after: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        extra: "fork:false".into(),
    }
}

fn config(queries: &[&str]) -> DiscoveryConfig {
    DiscoveryConfig {
        queries: queries.iter().map(|q| q.to_string()).collect(),
        per_page: 2,
        max_pages: 2,
        request_delay_ms: 0,
        ..DiscoveryConfig::default()
    }
}

async fn mount_search(server: &MockServer, terms: &str, page: u32, items: Value) {
    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .and(query_param("q", qualifiers().compose(terms).as_str()))
        .and(query_param("sort", "stars"))
        .and(query_param("order", "desc"))
        .and(query_param("page", page.to_string().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 99,
            "items": items
        })))
        .expect(1)
        .mount(server)
        .await;
}

fn client(server: &MockServer, config: &DiscoveryConfig) -> github_radar::GitHubClient {
    let api = ApiConfig {
        base_uri: server.uri(),
        ..ApiConfig::default()
    };
    discovery::build_client(TOKEN, &api, config).unwrap()
}

#[tokio::test]
async fn merges_queries_keeping_first_match_and_sorts_by_stars() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        "duckdb",
        1,
        json!([repo("A/B", Some(150), "first snapshot"), repo("c/d", Some(900), "")]),
    )
    .await;
    mount_search(&server, "duckdb", 2, json!([repo("e/f", None, "line\nbreak")])).await;
    mount_search(
        &server,
        "kafka",
        1,
        json!([repo("A/B", Some(5000), "second snapshot")]),
    )
    .await;

    let config = config(&["duckdb", "kafka"]);
    let gh = client(&server, &config);
    let report = discovery::discover(&gh, &config, &qualifiers()).await.unwrap();

    let names: Vec<_> = report.catalog.iter().map(|r| r.full_name.as_str()).collect();
    assert_eq!(names, vec!["c/d", "A/B", "e/f"]);

    let ab = &report.catalog[1];
    assert_eq!(ab.description, "first snapshot");
    assert_eq!(ab.stargazers_count, Some(150));
    assert_eq!(ab.open_issues_count, Some(4));
    assert_eq!(report.catalog[2].description, "line break");

    assert_eq!(
        report.raw_counts,
        vec![("duckdb".to_string(), 3), ("kafka".to_string(), 1)]
    );
}

#[tokio::test]
async fn writes_identity_list_and_catalog() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        "dbt",
        1,
        json!([repo("x/low", Some(101), "a, b"), repo("x/high", Some(700), "")]),
    )
    .await;
    mount_search(&server, "dbt", 2, json!([])).await;

    let config = config(&["dbt"]);
    let gh = client(&server, &config);
    let report = discovery::discover(&gh, &config, &qualifiers()).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    discovery::write_outputs(&report, &config, &out).unwrap();

    let list = std::fs::read_to_string(out.join("repo_list.csv")).unwrap();
    assert_eq!(list, "owner,repo\nx,high\nx,low\n");

    let catalog = std::fs::read_to_string(out.join("repo_catalog.csv")).unwrap();
    let mut lines = catalog.lines();
    assert_eq!(
        lines.next(),
        Some(
            "owner,repo,full_name,html_url,description,language,stargazers_count,forks_count,\
             open_issues_count,archived,created_at,updated_at,pushed_at"
        )
    );
    assert_eq!(
        lines.next(),
        Some(
            "x,high,x/high,https://github.com/x/high,,Python,700,3,4,false,\
             2020-01-01T00:00:00Z,2024-01-01T00:00:00Z,2024-01-02T00:00:00Z"
        )
    );
    assert!(lines.next().unwrap().contains(r#""a, b""#));
}

#[tokio::test]
async fn failed_search_writes_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(422).set_body_string("Validation Failed"))
        .mount(&server)
        .await;

    let config = config(&["anything"]);
    let gh = client(&server, &config);
    let dir = tempfile::tempdir().unwrap();

    let result = discovery::run(&gh, &config, dir.path()).await;

    assert!(result.is_err());
    assert!(!dir.path().join("repo_list.csv").exists());
    assert!(!dir.path().join("repo_catalog.csv").exists());
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test]
async fn stops_at_max_pages_when_every_page_is_full() {
    let server = MockServer::start().await;
    for page in 1..=3 {
        mount_search(
            &server,
            "x",
            page,
            json!([
                repo(&format!("p{page}/one"), Some(200), ""),
                repo(&format!("p{page}/two"), Some(100), "")
            ]),
        )
        .await;
    }

    let config = DiscoveryConfig {
        max_pages: 3,
        ..config(&["x"])
    };
    let gh = client(&server, &config);
    let report = discovery::discover(&gh, &config, &qualifiers()).await.unwrap();

    assert_eq!(request_count(&server).await, 3);
    assert_eq!(report.raw_counts, vec![("x".to_string(), 6)]);
    assert_eq!(report.catalog.len(), 6);
}
