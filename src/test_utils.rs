use crate::error::{Result, UsageError};
use crate::github::{FileDescriptor, RepositoryDescriptor, RepositorySource};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};

/// In-memory repository source keyed by fake URLs
#[derive(Clone, Default)]
pub struct FakeSource {
    repositories: Vec<RepositoryDescriptor>,
    listing_fails: bool,
    dirs: HashMap<String, Vec<FileDescriptor>>,
    contents: HashMap<String, String>,
    languages: HashMap<String, BTreeMap<String, u64>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url(dir: &str) -> String {
        format!("fake://contents/{}", dir)
    }

    pub fn raw_url(path: &str) -> String {
        format!("fake://raw/{}", path)
    }

    pub fn dir_entry(path: &str) -> FileDescriptor {
        FileDescriptor::directory(path, &Self::url(path))
    }

    pub fn file_entry(path: &str) -> FileDescriptor {
        FileDescriptor::file(path, &Self::url(path), &Self::raw_url(path))
    }

    /// Adds a repository whose root listing is the directory named `name`
    pub fn with_repo(mut self, name: &str, language: Option<&str>) -> Self {
        self.repositories.push(RepositoryDescriptor {
            name: name.to_string(),
            full_name: format!("octo/{}", name),
            contents_url: format!("fake://contents/{}/{{+path}}", name),
            languages_url: format!("fake://languages/{}", name),
            language: language.map(str::to_string),
        });
        self
    }

    pub fn with_dir(mut self, dir: &str, entries: Vec<FileDescriptor>) -> Self {
        self.dirs.insert(Self::url(dir), entries);
        self
    }

    pub fn with_content(mut self, path: &str, content: &str) -> Self {
        self.contents.insert(Self::raw_url(path), content.to_string());
        self
    }

    pub fn with_languages(mut self, repo: &str, bytes: &[(&str, u64)]) -> Self {
        let map = bytes.iter().map(|(l, b)| (l.to_string(), *b)).collect();
        self.languages.insert(format!("fake://languages/{}", repo), map);
        self
    }

    pub fn failing_listing(mut self) -> Self {
        self.listing_fails = true;
        self
    }

    fn not_found(url: &str) -> UsageError {
        UsageError::GitHubApi { status: 404, url: url.to_string() }
    }
}

#[async_trait]
impl RepositorySource for FakeSource {
    async fn list_repositories(&self) -> Result<Vec<RepositoryDescriptor>> {
        if self.listing_fails {
            return Err(UsageError::GitHubApi { status: 401, url: "fake://user/repos".into() });
        }
        Ok(self.repositories.clone())
    }

    async fn list_directory(&self, url: &str) -> Result<Vec<FileDescriptor>> {
        self.dirs.get(url).cloned().ok_or_else(|| Self::not_found(url))
    }

    async fn fetch_content(&self, url: &str) -> Result<String> {
        self.contents.get(url).cloned().ok_or_else(|| Self::not_found(url))
    }

    async fn fetch_languages(&self, url: &str) -> Result<BTreeMap<String, u64>> {
        self.languages.get(url).cloned().ok_or_else(|| Self::not_found(url))
    }
}
