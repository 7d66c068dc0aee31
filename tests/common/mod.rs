#![allow(dead_code)]

use langusage::config::Config;
use serde_json::{json, Value};
use std::path::Path;

pub const TEST_TOKEN: &str = "test_token";

pub mod test_helpers {
    use super::*;

    pub fn create_test_config(base_url: &str, output_dir: &Path) -> Config {
        let mut config = Config::new(output_dir.to_path_buf());
        config.github_token = Some(TEST_TOKEN.to_string());
        config.api_base_url = base_url.to_string();
        config.fetch.max_concurrent_fetches = 3;
        config
    }

    pub fn setup_test_logger() {
        let _ = env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .is_test(true)
            .try_init();
    }

    pub fn repo_json(base: &str, name: &str, language: Option<&str>) -> Value {
        json!({
            "id": name.len(),
            "name": name,
            "full_name": format!("octo/{}", name),
            "private": false,
            "language": language,
            "contents_url": format!("{}/repos/octo/{}/contents/{{+path}}", base, name),
            "languages_url": format!("{}/repos/octo/{}/languages", base, name),
        })
    }

    pub fn dir_json(base: &str, repo: &str, path: &str) -> Value {
        json!({
            "name": path.rsplit('/').next().unwrap_or(path),
            "path": path,
            "type": "dir",
            "url": contents_url(base, repo, path),
            "download_url": null,
        })
    }

    pub fn file_json(base: &str, repo: &str, path: &str) -> Value {
        json!({
            "name": path.rsplit('/').next().unwrap_or(path),
            "path": path,
            "type": "file",
            "url": contents_url(base, repo, path),
            "download_url": format!("{}{}", base, raw_path(repo, path)),
        })
    }

    pub fn contents_path(repo: &str, path: &str) -> String {
        if path.is_empty() {
            format!("/repos/octo/{}/contents", repo)
        } else {
            format!("/repos/octo/{}/contents/{}", repo, path)
        }
    }

    pub fn contents_url(base: &str, repo: &str, path: &str) -> String {
        format!("{}{}", base, contents_path(repo, path))
    }

    pub fn raw_path(repo: &str, path: &str) -> String {
        format!("/raw/octo/{}/main/{}", repo, path)
    }
}
