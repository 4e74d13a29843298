use std::fs;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Remove every directory under `root` that is empty once its own children
/// have been pruned. `root` itself is kept. Returns the number removed.
///
/// Must run only after every move out of the tree has finished.
pub fn prune(root: &Path) -> usize {
    prune_except(root, None)
}

/// Like [`prune`], but never descends into or removes `protected`.
pub fn prune_except(root: &Path, protected: Option<&Path>) -> usize {
    // Collect in pre-order so `filter_entry` can cut off the protected
    // subtree, then visit in reverse: every child comes before its parent.
    let mut dirs = Vec::new();
    let walker = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_entry(|entry| protected.map_or(true, |p| entry.path() != p));

    for entry in walker {
        match entry {
            Ok(entry) if entry.file_type().is_dir() => dirs.push(entry.into_path()),
            Ok(_) => {}
            Err(err) => warn!("Error walking {}: {}", root.display(), err),
        }
    }

    let mut removed = 0;
    for path in dirs.iter().rev() {
        let is_empty = match fs::read_dir(path) {
            Ok(mut children) => children.next().is_none(),
            Err(err) => {
                warn!("Error reading directory {}: {}", path.display(), err);
                continue;
            }
        };
        if !is_empty {
            continue;
        }

        match fs::remove_dir(path) {
            Ok(()) => {
                debug!("Removed empty directory {}", path.display());
                removed += 1;
            }
            Err(err) => warn!("Error removing directory {}: {}", path.display(), err),
        }
    }

    removed
}
