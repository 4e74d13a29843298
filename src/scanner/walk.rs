use crate::aggregator::ResultAggregator;
use crate::archive::{self, ArchiveOutcome};
use crate::category::{extension_of, Category, DestinationTree};
use crate::config::CollisionPolicy;
use crate::error::Error;
use crate::normalize::normalize;
use crate::progress::ProgressReporter;
use crate::relocate;
use glob::Pattern;
use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error};

/// Recursive, parallel sorter for one source tree.
///
/// Every directory level fans its entries out over the rayon pool the caller
/// is running in; subdirectories recurse on the same pool, so concurrency is
/// bounded by that pool no matter how deep or wide the tree is. Failures are
/// contained per entry and recorded in the aggregator.
pub struct Dispatcher<'a> {
    pub destination: &'a DestinationTree,
    pub aggregator: &'a ResultAggregator,
    pub reporter: &'a dyn ProgressReporter,
    pub policy: CollisionPolicy,
    pub ignore_patterns: &'a [Pattern],
    /// Directory never descended into (the destination, when it sits inside
    /// the source tree).
    pub protected: Option<&'a Path>,
    pub cancel: &'a AtomicBool,
}

impl<'a> Dispatcher<'a> {
    /// Sort the immediate entries of `dir`, recursing into subdirectories.
    /// Only a failure to list `dir` itself is returned.
    pub fn dispatch(&self, dir: &Path) -> io::Result<()> {
        let entries = fs::read_dir(dir).map_err(|err| {
            io::Error::new(
                err.kind(),
                format!("Error reading directory {}: {}", dir.display(), err),
            )
        })?;

        entries.par_bridge().for_each(|entry_result| match entry_result {
            Ok(entry) => self.dispatch_entry(entry.path()),
            Err(err) => {
                let reason = format!("Error reading entry in directory {}: {}", dir.display(), err);
                self.fail(dir, &reason);
            }
        });

        Ok(())
    }

    fn dispatch_entry(&self, path: PathBuf) {
        if self.cancel.load(Ordering::Relaxed) {
            return;
        }

        if self
            .ignore_patterns
            .iter()
            .any(|pattern| pattern.matches_path(&path))
        {
            debug!("Ignoring {}", path.display());
            self.aggregator.record_ignored();
            return;
        }

        let file_type = match fs::symlink_metadata(&path) {
            Ok(metadata) => metadata.file_type(),
            Err(err) => {
                self.fail(&path, &format!("Error getting metadata: {}", err));
                return;
            }
        };

        if file_type.is_dir() {
            if self.protected == Some(path.as_path()) {
                debug!("Skipping destination directory {}", path.display());
                return;
            }
            if let Err(err) = self.dispatch(&path) {
                self.fail(&path, &err.to_string());
            }
        } else if file_type.is_symlink() && path.is_dir() {
            debug!("Not following directory symlink {}", path.display());
            self.aggregator.record_ignored();
        } else if let Err(err) = self.sort_file(&path) {
            self.fail(&path, &err.to_string());
        }
    }

    fn sort_file(&self, path: &Path) -> Result<(), Error> {
        let extension = extension_of(path);
        let category = Category::classify(&extension);
        self.aggregator
            .record_extension(&extension, category.is_known());

        let category_dir = self.destination.dir_for(category);
        if category == Category::Archives {
            match archive::extract(path, &category_dir, self.policy)? {
                ArchiveOutcome::Extracted(dir) => {
                    debug!("{} -> {}", path.display(), dir.display());
                }
                ArchiveOutcome::Skipped => self.aggregator.record_skipped_archive(path),
            }
        } else {
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .ok_or_else(|| Error::Other(format!("No file name in {}", path.display())))?;
            let target = relocate::move_file(path, &category_dir, &normalize(&file_name), self.policy)?;
            debug!("{} -> {}", path.display(), target.display());
        }

        self.aggregator.record(category, path);
        self.reporter.on_item_sorted(category, path);
        Ok(())
    }

    fn fail(&self, path: &Path, reason: &str) {
        error!("Error processing {}: {}", path.display(), reason);
        self.aggregator.record_failure(path, reason);
        self.reporter.on_item_failed(path, reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::SilentReporter;
    use tempfile::tempdir;

    struct Fixture {
        destination: DestinationTree,
        aggregator: ResultAggregator,
        cancel: AtomicBool,
    }

    impl Fixture {
        fn new(out: &Path) -> Self {
            Self {
                destination: DestinationTree::create(out).unwrap(),
                aggregator: ResultAggregator::new(),
                cancel: AtomicBool::new(false),
            }
        }

        fn dispatcher<'a>(&'a self, patterns: &'a [Pattern]) -> Dispatcher<'a> {
            Dispatcher {
                destination: &self.destination,
                aggregator: &self.aggregator,
                reporter: &SilentReporter,
                policy: CollisionPolicy::Suffix,
                ignore_patterns: patterns,
                protected: None,
                cancel: &self.cancel,
            }
        }
    }

    #[test]
    fn test_dispatch_sorts_nested_files() {
        let tmp = tempdir().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir_all(src.join("a/b")).unwrap();
        fs::write(src.join("one.png"), "1").unwrap();
        fs::write(src.join("a/two.mp4"), "2").unwrap();
        fs::write(src.join("a/b/three.rs"), "3").unwrap();

        let fixture = Fixture::new(&tmp.path().join("out"));
        fixture.dispatcher(&[]).dispatch(&src).unwrap();

        let summary = fixture.aggregator.into_summary();
        assert_eq!(summary.total_sorted(), 3);
        assert_eq!(summary.paths(Category::Images), &[src.join("one.png")]);
        assert_eq!(summary.paths(Category::Video), &[src.join("a/two.mp4")]);
        assert_eq!(summary.paths(Category::Others), &[src.join("a/b/three.rs")]);
        assert!(summary.unknown_extensions.contains("rs"));
        assert!(summary.failures.is_empty());
    }

    #[test]
    fn test_ignored_entries_stay_in_place() {
        let tmp = tempdir().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir_all(src.join(".git")).unwrap();
        fs::write(src.join(".git/HEAD"), "ref").unwrap();
        fs::write(src.join("keep.txt"), "k").unwrap();

        let fixture = Fixture::new(&tmp.path().join("out"));
        let patterns = [Pattern::new("**/.git").unwrap()];
        fixture.dispatcher(&patterns).dispatch(&src).unwrap();

        assert!(src.join(".git/HEAD").exists());
        let summary = fixture.aggregator.into_summary();
        assert_eq!(summary.ignored, 1);
        assert_eq!(summary.paths(Category::Documents), &[src.join("keep.txt")]);
    }

    #[test]
    fn test_cancelled_dispatch_touches_nothing() {
        let tmp = tempdir().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("a.jpg"), "a").unwrap();

        let fixture = Fixture::new(&tmp.path().join("out"));
        fixture.cancel.store(true, Ordering::Relaxed);
        fixture.dispatcher(&[]).dispatch(&src).unwrap();

        assert!(src.join("a.jpg").exists());
        assert_eq!(fixture.aggregator.total_sorted(), 0);
    }

    #[test]
    fn test_failed_entry_does_not_stop_siblings() {
        let tmp = tempdir().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir_all(src.join("sub")).unwrap();
        fs::write(src.join("clip.mp4"), "v").unwrap();
        fs::write(src.join("pic.png"), "p").unwrap();
        fs::write(src.join("sub/notes.txt"), "n").unwrap();

        let out = tmp.path().join("out");
        let fixture = Fixture::new(&out);
        // Every video move now fails; nothing else should notice.
        fs::remove_dir(out.join("video")).unwrap();
        fixture.dispatcher(&[]).dispatch(&src).unwrap();

        assert!(src.join("clip.mp4").exists());
        assert!(out.join("images/pic.png").exists());
        assert!(out.join("documents/notes.txt").exists());

        let summary = fixture.aggregator.into_summary();
        assert_eq!(summary.total_sorted(), 2);
        assert!(summary.paths(Category::Video).is_empty());
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].path, src.join("clip.mp4"));
        assert!(summary.known_extensions.contains("mp4"));
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let tmp = tempdir().unwrap();
        let fixture = Fixture::new(&tmp.path().join("out"));
        let err = fixture
            .dispatcher(&[])
            .dispatch(&tmp.path().join("nope"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
