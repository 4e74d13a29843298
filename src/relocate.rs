use crate::config::CollisionPolicy;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

const MAX_SUFFIX: usize = 10_000;

/// Candidate names for `name`: the name itself, then `stem_1.ext`, `stem_2.ext`, ...
/// where the stem is everything before the first `.`.
fn candidate(name: &str, attempt: usize) -> String {
    if attempt == 0 {
        return name.to_string();
    }
    match name.split_once('.') {
        Some((stem, extension)) => format!("{stem}_{attempt}.{extension}"),
        None => format!("{name}_{attempt}"),
    }
}

/// Claim a file path in `dir` that no other worker can claim concurrently.
/// The claim is an empty placeholder that the move replaces.
fn reserve_file(dir: &Path, name: &str) -> io::Result<PathBuf> {
    for attempt in 0..MAX_SUFFIX {
        let target = dir.join(candidate(name, attempt));
        match OpenOptions::new().write(true).create_new(true).open(&target) {
            Ok(_) => return Ok(target),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(err) => return Err(err),
        }
    }
    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("no free name for {} in {}", name, dir.display()),
    ))
}

/// Claim a fresh directory in `dir`, same naming scheme as files.
pub fn reserve_dir(dir: &Path, name: &str, policy: CollisionPolicy) -> io::Result<PathBuf> {
    if policy == CollisionPolicy::Overwrite {
        let target = dir.join(name);
        fs::create_dir_all(&target)?;
        return Ok(target);
    }
    for attempt in 0..MAX_SUFFIX {
        let target = dir.join(candidate(name, attempt));
        match fs::create_dir(&target) {
            Ok(()) => return Ok(target),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(err) => return Err(err),
        }
    }
    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("no free directory name for {} in {}", name, dir.display()),
    ))
}

/// Move `src` into `dir` under `name`, resolving name clashes per `policy`.
/// Returns the final destination path.
pub fn move_file(
    src: &Path,
    dir: &Path,
    name: &str,
    policy: CollisionPolicy,
) -> io::Result<PathBuf> {
    // Fail early so a vanished source leaves no placeholder behind.
    fs::symlink_metadata(src)?;

    let target = match policy {
        CollisionPolicy::Suffix => reserve_file(dir, name)?,
        CollisionPolicy::Overwrite => dir.join(name),
    };

    if let Err(rename_err) = fs::rename(src, &target) {
        debug!(
            "rename {} -> {} failed ({}), falling back to copy",
            src.display(),
            target.display(),
            rename_err
        );
        if let Err(err) = copy_then_remove(src, dir, name, &target) {
            if policy == CollisionPolicy::Suffix {
                let _ = fs::remove_file(&target);
            }
            return Err(err);
        }
    }

    Ok(target)
}

/// Move by copying, for when `rename` can't (e.g. across devices). The copy
/// lands in a staging file and only takes the target name once the source
/// is gone, so a failure leaves the file in exactly one place.
fn copy_then_remove(src: &Path, dir: &Path, name: &str, target: &Path) -> io::Result<()> {
    let staging = reserve_file(dir, &format!(".{name}.part"))?;
    if let Err(err) = fs::copy(src, &staging).and_then(|_| fs::remove_file(src)) {
        let _ = fs::remove_file(&staging);
        return Err(err);
    }
    fs::rename(&staging, target).map_err(|err| {
        io::Error::new(
            err.kind(),
            format!(
                "copied {} to {} but could not rename it to {}: {}",
                src.display(),
                staging.display(),
                target.display(),
                err
            ),
        )
    })
}
