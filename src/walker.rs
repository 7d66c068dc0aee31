use crate::github::{FileDescriptor, RepositorySource};
use crate::metrics::{self, Metrics};
use log::{debug, warn};
use std::collections::HashSet;

/// Expands a contents listing into every regular file below it
///
/// Traversal is depth-first in the order the endpoint lists entries, driven by
/// an explicit stack. A listing that fails contributes no files; the failure is
/// logged and counted, and the walk carries on with the remaining entries.
pub async fn walk_tree<S>(source: &S, root_url: &str, metrics: &Metrics) -> Vec<FileDescriptor>
where
    S: RepositorySource + ?Sized,
{
    let mut files = Vec::new();
    let mut visited = HashSet::new();
    let mut pending = vec![FileDescriptor::directory("", root_url)];

    while let Some(entry) = pending.pop() {
        if !entry.is_directory() {
            files.push(entry);
            continue;
        }
        if !visited.insert(entry.url.clone()) {
            debug!("Skipping already listed directory {}", entry.url);
            continue;
        }

        match source.list_directory(&entry.url).await {
            Ok(children) => {
                metrics.increment(metrics::DIRECTORIES_LISTED).await;
                pending.extend(children.into_iter().rev());
            }
            Err(e) => {
                metrics.increment(metrics::DIRECTORIES_FAILED).await;
                let path = if entry.path.is_empty() { "/" } else { entry.path.as_str() };
                warn!("Skipping directory {}: {}", path, e);
            }
        }
    }

    files
}
