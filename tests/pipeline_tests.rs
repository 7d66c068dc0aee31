use indicatif::ProgressBar;
use langusage::metrics;
use langusage::{report, GitHubClient, UsageAnalyzer, UsageError};
use mockito::{Matcher, Mock, ServerGuard};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;

mod common;
use common::test_helpers::*;

const SETUP_PY: &str = "from setuptools import setup\nsetup()\n";
const APP_PY: &str = "import os\nimport sys\n\nprint(os.getcwd())\n";

async fn mock_json(server: &mut ServerGuard, path: &str, body: serde_json::Value) -> Mock {
    server.mock("GET", path)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await
}

async fn mock_raw(server: &mut ServerGuard, repo: &str, path: &str, body: &str) -> Mock {
    server.mock("GET", raw_path(repo, path).as_str())
        .with_status(200)
        .with_body(body)
        .create_async()
        .await
}

async fn mock_status(server: &mut ServerGuard, path: &str, status: usize) -> Mock {
    server.mock("GET", path)
        .with_status(status)
        .with_body(r#"{"message": "unavailable"}"#)
        .create_async()
        .await
}

/// Two repositories over two pages:
/// - alpha (Python): `setup.py`, `src/app.py`, and `src/gone.py` whose content 404s
/// - beta (Rust): `main.rs` and a `broken` directory whose listing fails
async fn mock_account(server: &mut ServerGuard) -> Vec<Mock> {
    let base = server.url();
    let mut mocks = Vec::new();

    mocks.push(
        server.mock("GET", "/user/repos")
            .match_query(Matcher::UrlEncoded("type".into(), "all".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_header("link", &format!(r#"<{}/user/repos?page=2>; rel="next""#, base))
            .with_body(json!([repo_json(&base, "alpha", Some("Python"))]).to_string())
            .create_async()
            .await,
    );
    mocks.push(
        server.mock("GET", "/user/repos")
            .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!([repo_json(&base, "beta", Some("Rust"))]).to_string())
            .create_async()
            .await,
    );

    mocks.push(mock_json(server, &contents_path("alpha", ""), json!([
        dir_json(&base, "alpha", "src"),
        file_json(&base, "alpha", "setup.py"),
    ])).await);
    mocks.push(mock_json(server, &contents_path("alpha", "src"), json!([
        file_json(&base, "alpha", "src/app.py"),
        file_json(&base, "alpha", "src/gone.py"),
    ])).await);
    mocks.push(mock_raw(server, "alpha", "setup.py", SETUP_PY).await);
    mocks.push(mock_raw(server, "alpha", "src/app.py", APP_PY).await);
    mocks.push(mock_status(server, &raw_path("alpha", "src/gone.py"), 404).await);

    mocks.push(mock_json(server, &contents_path("beta", ""), json!([
        dir_json(&base, "beta", "broken"),
        file_json(&base, "beta", "main.rs"),
    ])).await);
    mocks.push(mock_status(server, &contents_path("beta", "broken"), 500).await);
    mocks.push(mock_raw(server, "beta", "main.rs", &"let x = 1;\n".repeat(14)).await);

    mocks
}

#[tokio::test]
async fn test_full_run_contains_failures() {
    setup_test_logger();
    let temp_dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new_async().await;
    let _mocks = mock_account(&mut server).await;

    let config = create_test_config(&server.url(), temp_dir.path());
    let analyzer = UsageAnalyzer::new(GitHubClient::new(&config).unwrap(), &config);
    let usage = analyzer.run(&ProgressBar::hidden()).await.unwrap();

    assert_eq!(usage.repositories, vec!["octo/alpha", "octo/beta"]);

    let python = usage.accumulator.get("Python").unwrap();
    assert_eq!(python.file_count, 2);
    assert_eq!(python.total_lines, 6);
    assert_eq!(python.max_lines, 4);
    assert_eq!(python.import_counts.get("from setuptools import setup"), Some(&1));
    assert_eq!(python.import_counts.get("import os"), Some(&1));
    assert_eq!(python.import_counts.get("import sys"), Some(&1));

    let rust = usage.accumulator.get("Rust").unwrap();
    assert_eq!((rust.file_count, rust.total_lines, rust.max_lines), (1, 14, 14));

    assert_eq!(usage.distribution.get("Python"), Some(30.0));
    assert_eq!(usage.distribution.get("Rust"), Some(70.0));

    let counters = analyzer.metrics();
    assert_eq!(counters.get_counter(metrics::REPOSITORIES).await, 2);
    assert_eq!(counters.get_counter(metrics::FILES_FETCHED).await, 3);
    assert_eq!(counters.get_counter(metrics::FILES_FAILED).await, 1);
    assert_eq!(counters.get_counter(metrics::DIRECTORIES_FAILED).await, 1);
}

#[tokio::test]
async fn test_reports_written() {
    setup_test_logger();
    let temp_dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new_async().await;
    let _mocks = mock_account(&mut server).await;

    let config = create_test_config(&server.url(), temp_dir.path());
    let analyzer = UsageAnalyzer::new(GitHubClient::new(&config).unwrap(), &config);
    let usage = analyzer.run(&ProgressBar::hidden()).await.unwrap();
    let paths = report::write_all(&usage, &config.output_dir).await.unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&paths.distribution).unwrap()).unwrap();
    assert_eq!(json, json!({"Python": 30.0, "Rust": 70.0}));

    let summary = std::fs::read_to_string(&paths.summary).unwrap();
    assert!(summary.contains("| Rust | 70.00% | 1 | 14 | 14 |"));
    assert!(summary.contains("| Python | 30.00% | 2 | 6 | 4 |"));
}

#[tokio::test]
async fn test_unavailable_listing_fails_run() {
    setup_test_logger();
    let temp_dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new_async().await;
    let _m = server.mock("GET", "/user/repos")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let config = create_test_config(&server.url(), temp_dir.path());
    let analyzer = UsageAnalyzer::new(GitHubClient::new(&config).unwrap(), &config);
    let result = analyzer.run(&ProgressBar::hidden()).await;

    assert!(matches!(result, Err(UsageError::GitHubApi { status: 503, .. })));
}
