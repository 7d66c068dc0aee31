#![warn(missing_docs)]
#![warn(clippy::all)]

//! langusage - language usage statistics across a GitHub account
//!
//! Lists every repository visible to a token, walks each repository's file
//! tree through the contents API, credits every file to the repository's
//! declared primary language and turns the totals into a percentage
//! distribution.
//!
//! ## Pipeline
//! - [`github`]: paginated repository listing and content access
//! - [`walker`]: depth-first expansion of directory listings
//! - [`aggregator`]: per-language file, line and import counters
//! - [`usage`]: percentage distribution over lines or declared bytes
//! - [`report`]: `language_usage.json` and a Markdown summary
//!
//! ## Usage
//! ```rust,ignore
//! use langusage::{Config, GitHubClient, UsageAnalyzer};
//! use indicatif::ProgressBar;
//!
//! async fn example() -> langusage::Result<()> {
//!     let config = Config::load(None)?;
//!     let client = GitHubClient::new(&config)?;
//!     let report = UsageAnalyzer::new(client, &config)
//!         .run(&ProgressBar::hidden())
//!         .await?;
//!     langusage::report::write_all(&report, &config.output_dir).await?;
//!     Ok(())
//! }
//! ```

/// Per-language accumulation
pub mod aggregator;
/// Pipeline orchestration
pub mod analyzer;
/// Configuration module for the application
pub mod config;
/// Error handling types and utilities
pub mod error;
/// GitHub API access
pub mod github;
/// Logging configuration and utilities
pub mod logging;
/// Run counters and timers
pub mod metrics;
/// Bounded concurrent execution
pub mod parallel;
/// Progress spinner helpers
pub mod progress;
/// Report rendering
pub mod report;
/// Percentage calculation
pub mod usage;
/// Repository tree walking
pub mod walker;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export common types
pub use aggregator::{FileCounts, LanguageStats, UsageAccumulator};
pub use analyzer::{UsageAnalyzer, UsageReport};
pub use config::Config;
pub use error::{Result, UsageError};
pub use github::{FileDescriptor, GitHubClient, RepositoryDescriptor, RepositorySource};
pub use usage::{calculate, UsageDistribution, Weighting};
pub use walker::walk_tree;
