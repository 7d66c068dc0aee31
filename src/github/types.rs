use serde::{Deserialize, Serialize};

/// Label used when a repository declares no primary language
pub const UNKNOWN_LANGUAGE: &str = "Unknown";

/// A repository as returned by the repository listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryDescriptor {
    /// Short repository name
    pub name: String,
    /// `owner/name`
    #[serde(default)]
    pub full_name: String,
    /// URL template of the contents endpoint, e.g. `.../contents/{+path}`
    pub contents_url: String,
    /// Declared language byte map endpoint
    #[serde(default)]
    pub languages_url: String,
    /// Declared primary language
    pub language: Option<String>,
}

impl RepositoryDescriptor {
    /// Language every file of this repository is attributed to
    pub fn primary_language(&self) -> &str {
        self.language
            .as_deref()
            .filter(|l| !l.is_empty())
            .unwrap_or(UNKNOWN_LANGUAGE)
    }

    /// Contents listing URL of the repository root
    pub fn root_listing_url(&self) -> String {
        self.contents_url
            .replace("/{+path}", "")
            .replace("{+path}", "")
    }

    /// Name used in logs and reports
    pub fn display_name(&self) -> &str {
        if self.full_name.is_empty() {
            &self.name
        } else {
            &self.full_name
        }
    }
}

/// Kind of a listed entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Regular file
    File,
    /// Directory to descend into
    Directory,
}

/// A file or directory found while walking a repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    /// Path relative to the repository root
    pub path: String,
    /// File or directory
    pub kind: EntryKind,
    /// Contents API URL; for directories this is the listing to expand
    pub url: String,
    /// Raw content URL, files only
    pub download_url: Option<String>,
}

impl FileDescriptor {
    /// Creates a file entry
    pub fn file(path: &str, url: &str, download_url: &str) -> Self {
        Self {
            path: path.to_string(),
            kind: EntryKind::File,
            url: url.to_string(),
            download_url: Some(download_url.to_string()),
        }
    }

    /// Creates a directory entry
    pub fn directory(path: &str, url: &str) -> Self {
        Self {
            path: path.to_string(),
            kind: EntryKind::Directory,
            url: url.to_string(),
            download_url: None,
        }
    }

    /// Whether the walker should expand this entry
    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// URL to fetch this file's content from
    pub fn content_url(&self) -> &str {
        self.download_url.as_deref().unwrap_or(&self.url)
    }
}

/// One element of a contents listing, as sent by the API
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ContentEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub entry_type: String,
    pub url: String,
    pub download_url: Option<String>,
}

impl ContentEntry {
    /// Maps the raw entry to a descriptor; symlinks, submodules and files
    /// without a download URL yield `None`
    pub fn into_descriptor(self) -> Option<FileDescriptor> {
        match self.entry_type.as_str() {
            "file" => {
                let download_url = self.download_url?;
                Some(FileDescriptor {
                    path: self.path,
                    kind: EntryKind::File,
                    url: self.url,
                    download_url: Some(download_url),
                })
            }
            "dir" => Some(FileDescriptor::directory(&self.path, &self.url)),
            _ => None,
        }
    }
}
