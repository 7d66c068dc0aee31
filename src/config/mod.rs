mod env_manager;

use std::fs;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use crate::error::{Result, UsageError};
use crate::usage::Weighting;

pub use env_manager::{EnvOverrides, GITHUB_API_BASE_VAR, GITHUB_TOKEN_VAR};

/// Default GitHub REST API root
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Main configuration struct for the application
///
/// Holds the credential, the API root, where reports are written and how
/// languages are weighted. Values come from an optional TOML file and are then
/// overridden by the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// GitHub API token for authenticated requests
    #[serde(skip_serializing)]
    pub github_token: Option<String>,
    /// Root of the GitHub REST API
    pub api_base_url: String,
    /// Directory where the distribution and summary are written
    pub output_dir: PathBuf,
    /// Metric used to turn the accumulated totals into percentages
    pub weighting: Weighting,
    /// Request settings
    pub fetch: FetchConfig,
}

/// Settings for talking to the repository listing and content endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Page size requested from the repository listing
    pub per_page: u32,
    /// Repository affiliation filter (`all`, `owner`, `member`, ...)
    pub repository_type: String,
    /// Maximum number of file contents fetched at the same time
    pub max_concurrent_fetches: usize,
}

impl Config {
    /// Creates a new configuration with the specified output directory
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            github_token: None,
            api_base_url: DEFAULT_API_BASE.to_string(),
            output_dir,
            weighting: Weighting::default(),
            fetch: FetchConfig::default(),
        }
    }

    /// Loads configuration from `path`, or from the default config file location
    ///
    /// A missing default file yields the default configuration; a missing
    /// explicit file is an error. Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.apply_env(EnvOverrides::from_env());
        Ok(config)
    }

    /// Parses a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| UsageError::Config(format!("Failed to read config file {}: {}", path.display(), e)))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Location of the per-user config file, if the platform has a config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("langusage").join("config.toml"))
    }

    /// Applies values taken from the environment on top of the current ones
    pub fn apply_env(&mut self, overrides: EnvOverrides) {
        if let Some(token) = overrides.github_token {
            self.github_token = Some(token);
        }
        if let Some(base) = overrides.api_base_url {
            self.api_base_url = base;
        }
    }

    /// Validates the configuration before a run
    ///
    /// Fails when no credential is configured, then creates the output directory.
    pub async fn validate(&self) -> Result<()> {
        self.ensure_tokens()?;
        self.ensure_directories_exist().await
    }

    /// Ensures the output directory exists
    pub async fn ensure_directories_exist(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.output_dir).await?;
        Ok(())
    }

    /// Validates that a non-blank GitHub token is present
    pub fn ensure_tokens(&self) -> Result<()> {
        match self.github_token.as_deref() {
            Some(token) if !token.trim().is_empty() => Ok(()),
            Some(_) => Err(UsageError::Config(format!("{} is empty", GITHUB_TOKEN_VAR))),
            None => Err(UsageError::Config(format!("{} is not set", GITHUB_TOKEN_VAR))),
        }
    }

    /// Retrieves the GitHub token from the configuration
    pub fn github_token(&self) -> Result<&str> {
        self.ensure_tokens()?;
        self.github_token.as_deref()
            .ok_or_else(|| UsageError::Config(format!("{} is not set", GITHUB_TOKEN_VAR)))
    }

    /// API root without a trailing slash
    pub fn api_base(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            per_page: 100,
            repository_type: "all".to_string(),
            max_concurrent_fetches: 8,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(PathBuf::from("output"))
    }
}
