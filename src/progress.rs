use crate::category::Category;
use std::path::Path;

/// Trait for reporting sort progress.
///
/// Hooks are called from worker threads, so implementations must be
/// `Send + Sync`. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    fn on_sort_start(&self) {}
    fn on_item_sorted(&self, _category: Category, _path: &Path) {}
    fn on_item_failed(&self, _path: &Path, _reason: &str) {}
    fn on_sort_complete(&self, _total_files: usize, _duration_secs: f64) {}
    fn on_prune_complete(&self, _removed_dirs: usize, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
