use crate::config::CollisionPolicy;
use crate::error::Error;
use crate::normalize::normalize;
use crate::relocate;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use zip::result::ZipError;
use zip::ZipArchive;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveOutcome {
    /// Extracted into this directory; the source archive is gone.
    Extracted(PathBuf),
    /// Not a zip container; deleted without extraction.
    Skipped,
}

/// Extraction directory name: the normalized file stem (last extension removed).
pub fn extraction_dir_name(archive_path: &Path) -> String {
    let stem = archive_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    normalize(&stem)
}

/// The content is not a zip container we can read. Plain I/O failures are
/// not format errors: they fail the item and keep the file.
fn is_format_error(err: &ZipError) -> bool {
    matches!(
        err,
        ZipError::InvalidArchive(_) | ZipError::UnsupportedArchive(_)
    )
}

/// Extract `archive_path` under `archives_root/<normalized stem>/` and delete
/// the source.
///
/// Only zip containers pass the validity check. Anything else carrying an
/// archive extension (`.tar`, `.gz`) is deleted without extraction and
/// reported as [`ArchiveOutcome::Skipped`]. A corrupt entry inside a valid
/// zip fails the item and keeps the source archive.
pub fn extract(
    archive_path: &Path,
    archives_root: &Path,
    policy: CollisionPolicy,
) -> Result<ArchiveOutcome, Error> {
    let file = File::open(archive_path)?;

    let mut zip = match ZipArchive::new(file) {
        Ok(zip) => zip,
        Err(err) if is_format_error(&err) => {
            warn!(
                "Skipping {}: Not a valid zip file ({})",
                archive_path.display(),
                err
            );
            fs::remove_file(archive_path)?;
            return Ok(ArchiveOutcome::Skipped);
        }
        Err(err) => return Err(err.into()),
    };

    let dir_name = extraction_dir_name(archive_path);
    let target = relocate::reserve_dir(archives_root, &dir_name, policy)?;
    debug!(
        "Extracting {} ({} entries) into {}",
        archive_path.display(),
        zip.len(),
        target.display()
    );
    zip.extract(&target)?;

    // Release the handle before deleting; Windows refuses otherwise.
    drop(zip);
    fs::remove_file(archive_path)?;

    Ok(ArchiveOutcome::Extracted(target))
}
