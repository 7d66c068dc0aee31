use crate::aggregator::{FileCounts, UsageAccumulator};
use crate::config::Config;
use crate::error::Result;
use crate::github::{RepositoryDescriptor, RepositorySource};
use crate::metrics::{self, Metrics};
use crate::parallel::ParallelProcessor;
use crate::usage::{calculate, UsageDistribution, Weighting};
use crate::walker::walk_tree;
use chrono::{DateTime, Utc};
use indicatif::ProgressBar;
use log::{info, warn};
use serde::Serialize;
use std::time::Instant;

/// Everything one run produced
#[derive(Debug, Clone, Serialize)]
pub struct UsageReport {
    /// Repositories that were analyzed, in listing order
    pub repositories: Vec<String>,
    /// Per-language totals
    pub accumulator: UsageAccumulator,
    /// Percentage share per language
    pub distribution: UsageDistribution,
    /// Metric the distribution was computed from
    pub weighting: Weighting,
    /// When the run finished
    pub generated_at: DateTime<Utc>,
}

/// Runs the fetch, walk, aggregate and calculate steps over every repository
pub struct UsageAnalyzer<S> {
    source: S,
    weighting: Weighting,
    parallel: ParallelProcessor,
    metrics: Metrics,
}

impl<S> UsageAnalyzer<S>
where
    S: RepositorySource + Clone + 'static,
{
    /// Creates an analyzer using the weighting and concurrency from `config`
    pub fn new(source: S, config: &Config) -> Self {
        Self::with_options(source, config.weighting, config.fetch.max_concurrent_fetches)
    }

    /// Creates an analyzer with explicit options
    pub fn with_options(source: S, weighting: Weighting, max_concurrent_fetches: usize) -> Self {
        Self {
            source,
            weighting,
            parallel: ParallelProcessor::new(max_concurrent_fetches),
            metrics: Metrics::new(),
        }
    }

    /// Counters collected so far
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Runs the whole pipeline once
    ///
    /// Only a failure to list the repositories is returned as an error.
    /// Directories, files and language maps that cannot be fetched are logged
    /// and skipped.
    pub async fn run(&self, pb: &ProgressBar) -> Result<UsageReport> {
        let started = Instant::now();

        pb.set_message("Listing repositories...");
        let repos = self.source.list_repositories().await?;
        self.metrics.add(metrics::REPOSITORIES, repos.len() as u64).await;
        info!("Found {} repositories", repos.len());

        let mut accumulator = UsageAccumulator::new();
        for (i, repo) in repos.iter().enumerate() {
            pb.set_message(format!("[{}/{}] {}", i + 1, repos.len(), repo.display_name()));
            self.analyze_repository(repo, &mut accumulator).await;
        }

        let distribution = calculate(&accumulator, self.weighting);
        if distribution.is_empty() {
            warn!("Total {} weight is zero, distribution is empty", self.weighting);
        }

        self.metrics.record_time("run", started.elapsed()).await;
        pb.finish_with_message(format!(
            "Analyzed {} repositories, {} files",
            repos.len(),
            accumulator.total_files()
        ));

        Ok(UsageReport {
            repositories: repos.iter().map(|r| r.display_name().to_string()).collect(),
            accumulator,
            distribution,
            weighting: self.weighting,
            generated_at: Utc::now(),
        })
    }

    /// Walks one repository and credits its files to its primary language
    pub async fn analyze_repository(&self, repo: &RepositoryDescriptor, accumulator: &mut UsageAccumulator) {
        let language = repo.primary_language();

        if self.weighting == Weighting::Bytes {
            match self.source.fetch_languages(&repo.languages_url).await {
                Ok(bytes) => {
                    for (lang, count) in bytes {
                        accumulator.record_bytes(&lang, count);
                    }
                }
                Err(e) => {
                    self.metrics.increment(metrics::LANGUAGES_FAILED).await;
                    warn!("Skipping language bytes of {}: {}", repo.display_name(), e);
                }
            }
        }

        let files = walk_tree(&self.source, &repo.root_listing_url(), &self.metrics).await;

        let tasks: Vec<_> = files
            .iter()
            .map(|file| {
                let source = self.source.clone();
                let url = file.content_url().to_string();
                async move {
                    source
                        .fetch_content(&url)
                        .await
                        .map(|content| FileCounts::measure(&content))
                }
            })
            .collect();
        let results = self.parallel.process(tasks).await;

        // Applied one at a time in traversal order, whatever order the fetches finished in.
        for (file, result) in files.iter().zip(results) {
            match result {
                Ok(counts) => {
                    accumulator.record_counts(language, counts);
                    self.metrics.increment(metrics::FILES_FETCHED).await;
                }
                Err(e) => {
                    self.metrics.increment(metrics::FILES_FAILED).await;
                    warn!("Skipping {}/{}: {}", repo.display_name(), file.path, e);
                }
            }
        }
    }
}
