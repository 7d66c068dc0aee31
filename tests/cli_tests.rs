use assert_cmd::Command;
use mockito::Matcher;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;

mod common;
use common::test_helpers::*;
use common::TEST_TOKEN;

fn langusage(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("langusage").unwrap();
    cmd.env_remove("GITHUB_TOKEN")
        .env_remove("GITHUB_API_BASE_URL")
        .env_remove("RUST_LOG")
        .env("XDG_CONFIG_HOME", config_home.path())
        .env("HOME", config_home.path());
    cmd
}

#[test]
fn test_help() {
    let home = TempDir::new().unwrap();
    langusage(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--weighting"));
}

#[test]
fn test_missing_token_is_a_startup_error() {
    let home = TempDir::new().unwrap();
    let out = home.path().join("out");

    langusage(&home)
        .arg("--output")
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("GITHUB_TOKEN is not set"));
    assert!(!out.exists());
}

#[test]
fn test_unknown_log_level_falls_back_to_info() {
    let home = TempDir::new().unwrap();
    langusage(&home)
        .args(["--log-level", "chatty"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("GITHUB_TOKEN is not set"))
        .stderr(predicate::str::contains("invalid logging spec").not());
}

#[test]
fn test_rejects_unknown_weighting() {
    let home = TempDir::new().unwrap();
    langusage(&home)
        .args(["--weighting", "stars"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown weighting"));
}

#[test]
fn test_end_to_end_run() {
    let home = TempDir::new().unwrap();
    let out = home.path().join("out");
    let mut server = mockito::Server::new();
    let base = server.url();

    let _repos = server.mock("GET", "/user/repos")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!([repo_json(&base, "solo", Some("Go"))]).to_string())
        .create();
    let _root = server.mock("GET", contents_path("solo", "").as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!([file_json(&base, "solo", "main.go")]).to_string())
        .create();
    let _raw = server.mock("GET", raw_path("solo", "main.go").as_str())
        .with_status(200)
        .with_body("package main\n\nimport \"fmt\"\n\nfunc main() { fmt.Println(1) }\n")
        .create();

    langusage(&home)
        .env("GITHUB_TOKEN", TEST_TOKEN)
        .env("GITHUB_API_BASE_URL", &base)
        .args(["--log-level", "warn", "--output"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("100.00%"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(out.join("language_usage.json")).unwrap()).unwrap();
    assert_eq!(json, json!({"Go": 100.0}));

    let summary = std::fs::read_to_string(out.join("LANGUAGE_USAGE.md")).unwrap();
    assert!(summary.contains("| Go | 100.00% | 1 | 5 | 5 |"));
}
