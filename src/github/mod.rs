use crate::config::Config;
use crate::error::{Result, UsageError};
use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

/// Link header pagination helpers
pub mod pagination;
/// Repository and file descriptors
pub mod types;

pub use types::{EntryKind, FileDescriptor, RepositoryDescriptor, UNKNOWN_LANGUAGE};
use types::ContentEntry;

const API_TIMEOUT_SECS: u64 = 30;
const USER_AGENT_VALUE: &str = concat!("langusage/", env!("CARGO_PKG_VERSION"));
const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

/// Read access to repositories, their trees and file contents
///
/// [`GitHubClient`] talks to the REST API; tests substitute an in-memory source.
#[async_trait]
pub trait RepositorySource: Send + Sync {
    /// Every repository visible to the credential, across all pages, in listing order
    async fn list_repositories(&self) -> Result<Vec<RepositoryDescriptor>>;

    /// Entries of one directory listing, in the order the endpoint returns them
    async fn list_directory(&self, url: &str) -> Result<Vec<FileDescriptor>>;

    /// Raw content of one file
    async fn fetch_content(&self, url: &str) -> Result<String>;

    /// Declared language byte map of one repository
    async fn fetch_languages(&self, url: &str) -> Result<BTreeMap<String, u64>>;
}

/// GitHub REST API client authenticated with a bearer token
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    base_url: String,
    per_page: u32,
    repository_type: String,
}

impl GitHubClient {
    /// Builds a client from the configuration; fails without a token
    pub fn new(config: &Config) -> Result<Self> {
        let token = config.github_token()?;

        let mut headers = HeaderMap::new();
        let auth_value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| UsageError::Config(format!("Invalid GitHub token: {}", e)))?;
        headers.insert(AUTHORIZATION, auth_value);
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_MEDIA_TYPE));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(API_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base().to_string(),
            per_page: config.fetch.per_page,
            repository_type: config.fetch.repository_type.clone(),
        })
    }

    /// URL of the first repository listing page
    pub fn repositories_url(&self) -> Result<String> {
        let mut url = Url::parse(&format!("{}/user/repos", self.base_url))?;
        url.query_pairs_mut()
            .append_pair("per_page", &self.per_page.to_string())
            .append_pair("type", &self.repository_type);
        Ok(url.into())
    }

    async fn get(&self, url: &str) -> Result<Response> {
        let response = self.client
            .get(url)
            .send()
            .await
            .map_err(|e| UsageError::Network(format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UsageError::GitHubApi {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(url: &str, response: Response) -> Result<T> {
        let body = response
            .bytes()
            .await
            .map_err(|e| UsageError::Network(format!("{}: {}", url, e)))?;
        serde_json::from_slice(&body)
            .map_err(|e| UsageError::MalformedResponse(format!("{}: {}", url, e)))
    }
}

#[async_trait]
impl RepositorySource for GitHubClient {
    async fn list_repositories(&self) -> Result<Vec<RepositoryDescriptor>> {
        let mut repos = Vec::new();
        let mut next = Some(self.repositories_url()?);

        while let Some(url) = next {
            let response = self.get(&url).await?;
            next = pagination::next_page(response.headers());
            let page: Vec<RepositoryDescriptor> = Self::decode(&url, response).await?;
            debug!("Fetched {} repositories from {}", page.len(), url);
            repos.extend(page);
        }

        Ok(repos)
    }

    async fn list_directory(&self, url: &str) -> Result<Vec<FileDescriptor>> {
        let response = self.get(url).await?;
        let entries: Vec<ContentEntry> = Self::decode(url, response).await?;
        Ok(entries.into_iter().filter_map(ContentEntry::into_descriptor).collect())
    }

    async fn fetch_content(&self, url: &str) -> Result<String> {
        let response = self.get(url).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| UsageError::Network(format!("{}: {}", url, e)))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    async fn fetch_languages(&self, url: &str) -> Result<BTreeMap<String, u64>> {
        let response = self.get(url).await?;
        Self::decode(url, response).await
    }
}
