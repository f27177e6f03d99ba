//! Streaming ZIP extraction with containment checks.

use crate::ExtractLimits;
use std::fs::{self, File};
use std::io::{self, Read, Seek};
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use zip::result::ZipError;
use zip::ZipArchive;

/// Errors raised while extracting an untrusted archive.
///
/// Every variant is fatal to the whole extraction: the operation aborts
/// at the first failure and leaves any partially written tree for the
/// caller to clean up.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// An entry's resolved path escapes the destination root.
    #[error("entry is outside of the target dir: {entry}")]
    PathTraversal {
        /// The offending entry name as stored in the archive.
        entry: String,
    },

    /// Directory or file creation/write failure.
    #[error("I/O failure during extraction")]
    Io(#[from] io::Error),

    /// The bytes are not a valid ZIP container.
    #[error("invalid archive")]
    Zip(#[from] ZipError),

    /// The archive carries more entries than permitted.
    #[error("archive has {count} entries, limit is {max}")]
    TooManyEntries {
        /// Entries found in the central directory.
        count: usize,
        /// Configured cap.
        max: usize,
    },

    /// The archive inflates past the total-bytes cap.
    #[error("archive exceeds uncompressed size limit of {max} bytes")]
    SizeLimitExceeded {
        /// Configured cap.
        max: u64,
    },
}

/// Extracts a ZIP archive from `reader` into `dest_root`.
///
/// The destination directory is created if absent and must be owned
/// exclusively by the caller for this operation. Entries are streamed
/// one at a time — payloads are copied straight to disk, never buffered
/// together in memory.
///
/// On success every non-directory entry exists at its validated path
/// under `dest_root` with identical byte content, and nothing outside
/// `dest_root` was touched. On failure the operation has aborted early;
/// deleting the partial tree is the caller's responsibility.
///
/// # Errors
///
/// See [`ExtractError`]. In particular, any entry whose name resolves
/// outside `dest_root` (via `..` segments, an absolute path, or a
/// symlinked intermediate directory) fails the whole extraction with
/// [`ExtractError::PathTraversal`].
pub fn extract<R: Read + Seek>(
    reader: R,
    dest_root: &Path,
    limits: &ExtractLimits,
) -> Result<PathBuf, ExtractError> {
    fs::create_dir_all(dest_root)?;
    let canonical_root = dest_root.canonicalize()?;

    let mut archive = ZipArchive::new(reader)?;

    if archive.len() > limits.entries() {
        return Err(ExtractError::TooManyEntries {
            count: archive.len(),
            max: limits.entries(),
        });
    }

    let mut written: u64 = 0;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        let stored_name = entry.name().to_string();

        let Some(relative) = contained_relative_path(&stored_name)? else {
            // Entries that normalize to nothing ("", "./") carry no payload.
            continue;
        };
        let resolved = dest_root.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&resolved)?;
            ensure_contained(&resolved, &canonical_root, &stored_name)?;
            continue;
        }

        let parent = resolved
            .parent()
            .ok_or_else(|| ExtractError::PathTraversal {
                entry: stored_name.clone(),
            })?;
        fs::create_dir_all(parent)?;
        ensure_contained(parent, &canonical_root, &stored_name)?;

        // Cap against bytes actually inflated, not the declared size.
        let remaining = limits.total_bytes().saturating_sub(written);
        let mut out = File::create(&resolved)?;
        let copied = io::copy(&mut (&mut entry).take(remaining.saturating_add(1)), &mut out)?;
        if copied > remaining {
            return Err(ExtractError::SizeLimitExceeded {
                max: limits.total_bytes(),
            });
        }
        written += copied;

        tracing::trace!(entry = %stored_name, bytes = copied, "entry extracted");
    }

    tracing::debug!(dest = %dest_root.display(), bytes = written, "archive extracted");
    Ok(dest_root.to_path_buf())
}

/// Opens `archive_path` and extracts it into `dest_root`.
///
/// Convenience wrapper over [`extract`] for on-disk archives.
pub fn extract_path(
    archive_path: &Path,
    dest_root: &Path,
    limits: &ExtractLimits,
) -> Result<PathBuf, ExtractError> {
    let file = File::open(archive_path)?;
    extract(file, dest_root, limits)
}

/// Lexical containment pre-check on a stored entry name.
///
/// Accepts only `Normal` path components; `.` segments are dropped,
/// while `..`, root, and drive-prefix components are traversal attempts.
/// Returns `Ok(None)` for names that normalize to an empty path.
fn contained_relative_path(stored_name: &str) -> Result<Option<PathBuf>, ExtractError> {
    let mut relative = PathBuf::new();

    for component in Path::new(stored_name).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(ExtractError::PathTraversal {
                    entry: stored_name.to_string(),
                });
            }
        }
    }

    if relative.as_os_str().is_empty() {
        Ok(None)
    } else {
        Ok(Some(relative))
    }
}

/// Canonical containment check: `path` must exist and its real path
/// must remain under `canonical_root`. Run after directory creation so
/// symlinked intermediates cannot redirect the write outside the root.
fn ensure_contained(
    path: &Path,
    canonical_root: &Path,
    stored_name: &str,
) -> Result<(), ExtractError> {
    let canonical = path.canonicalize()?;
    if canonical.starts_with(canonical_root) {
        Ok(())
    } else {
        Err(ExtractError::PathTraversal {
            entry: stored_name.to_string(),
        })
    }
}
