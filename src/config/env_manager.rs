/// Environment variable holding the GitHub credential
pub const GITHUB_TOKEN_VAR: &str = "GITHUB_TOKEN";
/// Environment variable overriding the API root
pub const GITHUB_API_BASE_VAR: &str = "GITHUB_API_BASE_URL";

/// Values read from the process environment at startup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    /// Bearer token for the GitHub API
    pub github_token: Option<String>,
    /// Alternative API root, mostly for tests against a local server
    pub api_base_url: Option<String>,
}

impl EnvOverrides {
    /// Reads the overrides from the current process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the overrides through an arbitrary lookup function
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            github_token: non_empty(lookup(GITHUB_TOKEN_VAR)),
            api_base_url: non_empty(lookup(GITHUB_API_BASE_VAR)),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
