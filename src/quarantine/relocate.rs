//! Moving duplicates into quarantine.
//!
//! # Overview
//!
//! A file at `<volume>/<relative>` is renamed to
//! `<volume>/DeletionDuplicates/<relative>`. The rename never crosses a
//! device, so the file is either fully at its source or fully at its
//! destination, never copied twice.
//!
//! In a confirmed batch every selected file is handled independently: a
//! missing source or an uncreatable destination is reported for that file
//! and the rest of the batch still runs.
//!
//! # Example
//!
//! ```no_run
//! use dupmanager::quarantine::{relocate, MountPointLocator};
//! use std::path::Path;
//!
//! let moved = relocate(Path::new("/data/copy.jpg"), &MountPointLocator).unwrap();
//! println!("{} -> {}", moved.source.display(), moved.destination.display());
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::manifest::{append_entry, ManifestEntry};
use super::volume::VolumeLocator;
use super::{QuarantineError, QUARANTINE_DIR_NAME};

/// A completed move into quarantine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relocation {
    /// Where the file was.
    pub source: PathBuf,
    /// Where the file is now.
    pub destination: PathBuf,
    /// Quarantine folder that received the file.
    pub quarantine_root: PathBuf,
    /// Parent directory created to hold the file, if one was missing.
    pub created_parent: Option<PathBuf>,
}

impl Relocation {
    /// Manifest record for this move.
    #[must_use]
    pub fn manifest_entry(&self) -> ManifestEntry {
        ManifestEntry::new(self.source.clone(), self.destination.clone())
    }
}

/// Compute the quarantine folder and destination path for `source`.
///
/// # Errors
///
/// Returns [`QuarantineError::VolumeRoot`] if the volume root cannot be
/// resolved or does not contain `source`.
pub fn plan_destination(
    source: &Path,
    locator: &dyn VolumeLocator,
) -> Result<(PathBuf, PathBuf), QuarantineError> {
    let volume_error = |source_err: io::Error| QuarantineError::VolumeRoot {
        path: source.to_path_buf(),
        source: source_err,
    };

    let volume_root = locator.volume_root(source).map_err(volume_error)?;
    let relative = source.strip_prefix(&volume_root).map_err(|_| {
        volume_error(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("not under {}", volume_root.display()),
        ))
    })?;

    let quarantine_root = volume_root.join(QUARANTINE_DIR_NAME);
    let destination = quarantine_root.join(relative);
    Ok((quarantine_root, destination))
}

/// Move a single file into its volume's quarantine folder.
///
/// Does not touch the manifest; see [`quarantine_batch`].
///
/// # Errors
///
/// - `SourceMissing` if the file no longer exists
/// - `VolumeRoot` if its volume cannot be resolved
/// - `DestinationExists` if something already occupies the destination
/// - `CreateDir` if the destination's parent cannot be created
/// - `Rename` if the move itself fails
pub fn relocate(source: &Path, locator: &dyn VolumeLocator) -> Result<Relocation, QuarantineError> {
    if fs::symlink_metadata(source).is_err() {
        return Err(QuarantineError::SourceMissing(source.to_path_buf()));
    }

    let (quarantine_root, destination) = plan_destination(source, locator)?;

    if fs::symlink_metadata(&destination).is_ok() {
        return Err(QuarantineError::DestinationExists(destination));
    }

    let mut created_parent = None;
    if let Some(parent) = destination.parent() {
        if !parent.is_dir() {
            fs::create_dir_all(parent).map_err(|e| QuarantineError::CreateDir {
                path: parent.to_path_buf(),
                source: e,
            })?;
            log::info!("Destination folder created: {}", parent.display());
            created_parent = Some(parent.to_path_buf());
        }
    }

    fs::rename(source, &destination).map_err(|e| QuarantineError::Rename {
        from: source.to_path_buf(),
        to: destination.clone(),
        source: e,
    })?;

    log::info!(
        "File moved from {} to {}",
        source.display(),
        destination.display()
    );

    Ok(Relocation {
        source: source.to_path_buf(),
        destination,
        quarantine_root,
        created_parent,
    })
}

/// Callback trait for per-file quarantine status reporting.
pub trait QuarantineProgressCallback {
    /// Called before each file is moved.
    fn on_before_move(&self, _path: &Path, _index: usize, _total: usize) {}

    /// Called after a file was moved.
    fn on_move_success(&self, _relocation: &Relocation) {}

    /// Called when a file could not be moved.
    fn on_move_failure(&self, _path: &Path, _error: &str) {}

    /// Called after the manifest record was written.
    fn on_manifest_appended(&self, _manifest: &Path) {}

    /// Called when the file moved but its manifest record could not be written.
    fn on_manifest_failure(&self, _relocation: &Relocation, _error: &str) {}

    /// Called when the batch completes.
    fn on_complete(&self, _result: &BatchQuarantineResult) {}
}

/// Results of quarantining a confirmed selection.
#[derive(Debug, Clone, Default)]
pub struct BatchQuarantineResult {
    /// Files moved into quarantine.
    pub moved: Vec<Relocation>,
    /// Files that could not be moved, with the reason.
    pub failures: Vec<(PathBuf, String)>,
    /// Moved files whose manifest record could not be written.
    pub manifest_failures: Vec<(PathBuf, String)>,
}

impl BatchQuarantineResult {
    /// Number of files moved.
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.moved.len()
    }

    /// Number of files that could not be moved.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Total number of attempted moves.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.moved.len() + self.failures.len()
    }

    /// Check if every file moved and was recorded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty() && self.manifest_failures.is_empty()
    }

    /// Human-readable summary of the operation.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut text = format!("Quarantined {} file(s)", self.success_count());
        if !self.failures.is_empty() {
            text.push_str(&format!(", {} failed", self.failure_count()));
        }
        if !self.manifest_failures.is_empty() {
            text.push_str(&format!(
                ", {} not recorded in manifest",
                self.manifest_failures.len()
            ));
        }
        text
    }
}

/// Quarantine the members of `paths` selected by `indices`.
///
/// Each index is processed independently; a failure is recorded and the
/// loop moves on. A manifest record is appended only after a successful
/// move.
pub fn quarantine_batch(
    paths: &[PathBuf],
    indices: &[usize],
    locator: &dyn VolumeLocator,
    callback: Option<&dyn QuarantineProgressCallback>,
) -> BatchQuarantineResult {
    let mut result = BatchQuarantineResult::default();
    let total = indices.len();

    for (position, &index) in indices.iter().enumerate() {
        let Some(source) = paths.get(index) else {
            let error = QuarantineError::IndexOutOfRange {
                index,
                len: paths.len(),
            };
            log::warn!("{}", error);
            let path = PathBuf::from(format!("#{index}"));
            if let Some(cb) = callback {
                cb.on_move_failure(&path, &error.to_string());
            }
            result.failures.push((path, error.to_string()));
            continue;
        };

        if let Some(cb) = callback {
            cb.on_before_move(source, position, total);
        }

        let relocation = match relocate(source, locator) {
            Ok(relocation) => relocation,
            Err(e) => {
                let message = e.to_string();
                log::warn!("Failed to quarantine {}: {}", source.display(), message);
                if let Some(cb) = callback {
                    cb.on_move_failure(source, &message);
                }
                result.failures.push((source.clone(), message));
                continue;
            }
        };

        if let Some(cb) = callback {
            cb.on_move_success(&relocation);
        }

        match append_entry(&relocation.quarantine_root, &relocation.manifest_entry()) {
            Ok(manifest) => {
                if let Some(cb) = callback {
                    cb.on_manifest_appended(&manifest);
                }
            }
            Err(e) => {
                let message = e.to_string();
                log::error!(
                    "Moved {} but could not record it: {}",
                    relocation.source.display(),
                    message
                );
                if let Some(cb) = callback {
                    cb.on_manifest_failure(&relocation, &message);
                }
                result
                    .manifest_failures
                    .push((relocation.source.clone(), message));
            }
        }

        result.moved.push(relocation);
    }

    if let Some(cb) = callback {
        cb.on_complete(&result);
    }

    log::info!("{}", result.summary());

    result
}
