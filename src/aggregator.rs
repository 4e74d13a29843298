use crate::category::Category;
use dashmap::{DashMap, DashSet};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Thread-safe, append-only collection of one run's outcomes.
///
/// Path lists keep arrival order per category (whichever worker got there
/// first); extension sets have set semantics.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    files: DashMap<Category, Vec<PathBuf>>,
    known_extensions: DashSet<String>,
    unknown_extensions: DashSet<String>,
    skipped_archives: DashSet<PathBuf>,
    failures: DashMap<PathBuf, Vec<String>>,
    ignored: AtomicUsize,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, category: Category, path: &Path) {
        self.files
            .entry(category)
            .or_default()
            .push(path.to_path_buf());
    }

    pub fn record_extension(&self, extension: &str, known: bool) {
        let set = if known {
            &self.known_extensions
        } else {
            &self.unknown_extensions
        };
        if !set.contains(extension) {
            set.insert(extension.to_string());
        }
    }

    /// An archive that failed the zip check and was deleted without extraction.
    pub fn record_skipped_archive(&self, path: &Path) {
        self.skipped_archives.insert(path.to_path_buf());
    }

    pub fn record_failure(&self, path: &Path, reason: impl Into<String>) {
        self.failures
            .entry(path.to_path_buf())
            .or_default()
            .push(reason.into());
    }

    pub fn record_ignored(&self) {
        self.ignored.fetch_add(1, Ordering::Relaxed);
    }

    pub fn total_sorted(&self) -> usize {
        self.files.iter().map(|entry| entry.value().len()).sum()
    }

    /// Freeze the collected state. Categories with no files are present with
    /// an empty list.
    pub fn into_summary(self) -> SortSummary {
        let mut files: BTreeMap<Category, Vec<PathBuf>> =
            Category::ALL.iter().map(|c| (*c, Vec::new())).collect();
        for (category, paths) in self.files {
            files.insert(category, paths);
        }

        let mut failures: Vec<ItemFailure> = self
            .failures
            .into_iter()
            .flat_map(|(path, reasons)| {
                reasons.into_iter().map(move |reason| ItemFailure {
                    path: path.clone(),
                    reason,
                })
            })
            .collect();
        failures.sort_by(|a, b| a.path.cmp(&b.path).then_with(|| a.reason.cmp(&b.reason)));

        SortSummary {
            files,
            known_extensions: self.known_extensions.into_iter().collect(),
            unknown_extensions: self.unknown_extensions.into_iter().collect(),
            skipped_archives: self.skipped_archives.into_iter().collect(),
            failures,
            ignored: self.ignored.into_inner(),
        }
    }
}

/// Snapshot of a finished run.
#[derive(Debug, Clone, Default)]
pub struct SortSummary {
    pub files: BTreeMap<Category, Vec<PathBuf>>,
    pub known_extensions: BTreeSet<String>,
    pub unknown_extensions: BTreeSet<String>,
    pub skipped_archives: BTreeSet<PathBuf>,
    pub failures: Vec<ItemFailure>,
    pub ignored: usize,
}

impl SortSummary {
    pub fn paths(&self, category: Category) -> &[PathBuf] {
        self.files.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn total_sorted(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }
}
