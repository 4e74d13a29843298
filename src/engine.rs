use crate::aggregator::{ResultAggregator, SortSummary};
use crate::category::DestinationTree;
use crate::config::AppConfig;
use crate::error::Error;
use crate::progress::ProgressReporter;
use crate::prune;
use crate::scanner::Dispatcher;
use glob::Pattern;
use rayon::ThreadPoolBuilder;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

pub struct SortEngine {
    config: AppConfig,
    source: PathBuf,
    destination: PathBuf,
    cancel: Arc<AtomicBool>,
}

#[derive(Debug)]
pub struct SortResult {
    pub summary: SortSummary,
    pub pruned_dirs: usize,
    pub sort_duration: Duration,
    pub prune_duration: Duration,
}

impl SortEngine {
    pub fn new(config: AppConfig, source: impl AsRef<Path>, destination: impl AsRef<Path>) -> Self {
        Self {
            config,
            source: source.as_ref().to_path_buf(),
            destination: destination.as_ref().to_path_buf(),
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Setting the token stops new items from being started. Items already
    /// in flight finish, then `run` returns [`Error::Cancelled`] without
    /// pruning.
    pub fn cancel_token(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Run the full pipeline:
    /// 1. Create the six category directories under the destination
    /// 2. Parallel sort of the source tree on one bounded worker pool
    /// 3. Bottom-up removal of directories left empty in the source
    pub fn run(&self, reporter: &dyn ProgressReporter) -> Result<SortResult, Error> {
        if !self.source.is_dir() {
            return Err(Error::NotADirectory(self.source.clone()));
        }

        if same_dir(&self.source, &self.destination) {
            return Err(Error::Other(format!(
                "Destination {} must differ from the source",
                self.destination.display()
            )));
        }

        let destination = DestinationTree::create(&self.destination)?;
        let protected = nested_destination(&self.source, &self.destination);
        if let Some(dir) = &protected {
            debug!("Destination {} is inside the source tree", dir.display());
        }

        let ignore_patterns = compile_patterns(&self.config.ignore_patterns);

        let pool = ThreadPoolBuilder::new()
            .num_threads(self.config.workers)
            .thread_name(|i| format!("sorter-{}", i))
            .build()?;
        debug!("Worker pool ready with {} threads", pool.current_num_threads());

        // Phase 1: Sort
        info!(
            "Sorting {} into {}...",
            self.source.display(),
            self.destination.display()
        );
        reporter.on_sort_start();
        let sort_start = Instant::now();
        let aggregator = ResultAggregator::new();
        let dispatcher = Dispatcher {
            destination: &destination,
            aggregator: &aggregator,
            reporter,
            policy: self.config.collision_policy,
            ignore_patterns: &ignore_patterns,
            protected: protected.as_deref(),
            cancel: &self.cancel,
        };
        // `install` returns once every nested task has finished.
        pool.install(|| dispatcher.dispatch(&self.source))?;
        let sort_duration = sort_start.elapsed();
        let total_sorted = aggregator.total_sorted();
        reporter.on_sort_complete(total_sorted, sort_duration.as_secs_f64());
        debug!(
            "Sort completed in {:.2}s, {} files",
            sort_duration.as_secs_f64(),
            total_sorted
        );

        if self.cancel.load(Ordering::Relaxed) {
            info!("Cancelled after sorting {} files", total_sorted);
            return Err(Error::Cancelled);
        }

        // Phase 2: Prune
        let prune_start = Instant::now();
        let pruned_dirs = if self.config.prune_empty_dirs {
            info!("Removing empty directories...");
            prune::prune_except(&self.source, protected.as_deref())
        } else {
            0
        };
        let prune_duration = prune_start.elapsed();
        reporter.on_prune_complete(pruned_dirs, prune_duration.as_secs_f64());

        Ok(SortResult {
            summary: aggregator.into_summary(),
            pruned_dirs,
            sort_duration,
            prune_duration,
        })
    }
}

fn compile_patterns(globs: &[String]) -> Vec<Pattern> {
    globs
        .iter()
        .filter_map(|glob| match Pattern::new(glob) {
            Ok(p) => Some(p),
            Err(e) => {
                error!("Invalid glob pattern '{}': {}", glob, e);
                None
            }
        })
        .collect()
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// If `destination` lives inside `source`, return it spelled under `source`
/// so it compares equal to the paths the traversal produces.
fn nested_destination(source: &Path, destination: &Path) -> Option<PathBuf> {
    let source_canonical = fs::canonicalize(source).ok()?;
    let destination_canonical = fs::canonicalize(destination).ok()?;
    let relative = destination_canonical.strip_prefix(&source_canonical).ok()?;
    if relative.as_os_str().is_empty() {
        return None;
    }
    Some(source.join(relative))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_nested_destination() {
        let tmp = tempdir().unwrap();
        let src = tmp.path().join("src");
        let inner = src.join("sorted");
        let outer = tmp.path().join("out");
        fs::create_dir_all(&inner).unwrap();
        fs::create_dir_all(&outer).unwrap();

        assert_eq!(nested_destination(&src, &inner), Some(inner.clone()));
        assert_eq!(nested_destination(&src, &outer), None);
        assert_eq!(nested_destination(&src, &src), None);
    }

    #[test]
    fn test_invalid_patterns_are_dropped() {
        let patterns = compile_patterns(&["**/*.tmp".to_string(), "[".to_string()]);
        assert_eq!(patterns.len(), 1);
    }
}
