use std::sync::Arc;
use tokio::sync::Semaphore;
use std::future::Future;
use crate::error::{Result, UsageError};

/// Executes tasks concurrently with a fixed upper bound on in-flight tasks
pub struct ParallelProcessor {
    max_concurrent: usize,
    semaphore: Arc<Semaphore>,
}

impl ParallelProcessor {
    /// Creates a new parallel processor; a limit of zero is raised to one
    pub fn new(max_concurrent: usize) -> Self {
        let max_concurrent = max_concurrent.max(1);
        Self {
            max_concurrent,
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
        }
    }

    /// Concurrency limit in effect
    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Runs the futures and returns their results in submission order
    pub async fn process<F, T>(&self, tasks: Vec<F>) -> Vec<Result<T>>
    where
        F: Future<Output = Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        let mut handles = Vec::with_capacity(tasks.len());

        for task in tasks {
            let permit = self.semaphore.clone().acquire_owned().await;
            handles.push(tokio::spawn(async move {
                let _permit = permit.map_err(|e| UsageError::Message(format!("Task pool closed: {}", e)))?;
                task.await
            }));
        }

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            let result = handle
                .await
                .unwrap_or_else(|e| Err(UsageError::Message(format!("Task failed: {}", e))));
            results.push(result);
        }
        results
    }
}
