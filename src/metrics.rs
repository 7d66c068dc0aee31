use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use log::{debug, info};

/// Repositories seen in the listing
pub const REPOSITORIES: &str = "repositories";
/// Directory listings that succeeded
pub const DIRECTORIES_LISTED: &str = "directories_listed";
/// Directory listings that failed and were skipped
pub const DIRECTORIES_FAILED: &str = "directories_failed";
/// File contents fetched and aggregated
pub const FILES_FETCHED: &str = "files_fetched";
/// File contents that could not be fetched
pub const FILES_FAILED: &str = "files_failed";
/// Language byte maps that could not be fetched
pub const LANGUAGES_FAILED: &str = "languages_failed";

/// Counters and timers for one run
///
/// Cloning yields another handle onto the same counters.
#[derive(Clone, Default)]
pub struct Metrics {
    counters: Arc<RwLock<BTreeMap<String, u64>>>,
    timers: Arc<RwLock<BTreeMap<String, Duration>>>,
}

impl Metrics {
    /// Creates a new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments a counter metric by 1
    pub async fn increment(&self, key: &str) {
        self.add(key, 1).await;
    }

    /// Adds `amount` to a counter metric
    pub async fn add(&self, key: &str, amount: u64) {
        let mut counters = self.counters.write().await;
        let value = counters.entry(key.to_string()).or_insert(0);
        *value += amount;
        debug!("Counter {}: {}", key, value);
    }

    /// Records a timing metric
    pub async fn record_time(&self, key: &str, duration: Duration) {
        let mut timers = self.timers.write().await;
        timers.insert(key.to_string(), duration);
        debug!("Recorded timer {}: {:?}", key, duration);
    }

    /// Gets the current value of a counter metric, zero when never touched
    pub async fn get_counter(&self, key: &str) -> u64 {
        let counters = self.counters.read().await;
        counters.get(key).copied().unwrap_or(0)
    }

    /// Gets the current value of a timer metric
    pub async fn get_timer(&self, key: &str) -> Option<Duration> {
        let timers = self.timers.read().await;
        timers.get(key).copied()
    }

    /// Copy of all counters
    pub async fn counters(&self) -> BTreeMap<String, u64> {
        self.counters.read().await.clone()
    }

    /// Logs all collected metrics
    pub async fn report(&self) {
        info!("=== Run Metrics ===");

        let counters = self.counters.read().await;
        for (k, v) in counters.iter() {
            info!("  {}: {}", k, v);
        }

        let timers = self.timers.read().await;
        for (k, v) in timers.iter() {
            info!("  {}: {:.2?}", k, v);
        }
    }
}
