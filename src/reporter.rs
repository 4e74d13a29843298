use dir_sorter::{Category, ProgressReporter};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// CLI progress reporter: a spinner counting sorted and failed items while
/// the workers run.
pub struct CliReporter {
    bar: ProgressBar,
    sorted: AtomicUsize,
    failed: AtomicUsize,
}

impl CliReporter {
    pub fn new() -> Self {
        let bar = ProgressBar::hidden();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        Self {
            bar,
            sorted: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
        }
    }

    fn refresh(&self) {
        self.bar.set_message(format!(
            "Sorting... {} files, {} failed",
            self.sorted.load(Ordering::Relaxed),
            self.failed.load(Ordering::Relaxed)
        ));
    }
}

impl ProgressReporter for CliReporter {
    fn on_sort_start(&self) {
        self.bar.set_draw_target(indicatif::ProgressDrawTarget::stderr());
        self.refresh();
        self.bar.enable_steady_tick(Duration::from_millis(80));
    }

    fn on_item_sorted(&self, _category: Category, _path: &Path) {
        self.sorted.fetch_add(1, Ordering::Relaxed);
        self.refresh();
    }

    fn on_item_failed(&self, _path: &Path, _reason: &str) {
        self.failed.fetch_add(1, Ordering::Relaxed);
        self.refresh();
    }

    fn on_sort_complete(&self, total_files: usize, duration_secs: f64) {
        self.bar.finish_and_clear();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Sort complete: {} files in {:.2}s",
            total_files, duration_secs
        );
    }

    fn on_prune_complete(&self, removed_dirs: usize, duration_secs: f64) {
        eprintln!(
            "  \x1b[32m✓\x1b[0m Prune complete: {} empty directories removed in {:.2}s",
            removed_dirs, duration_secs
        );
    }
}
