//! Quarantine module.
//!
//! Selected duplicates are never deleted. They are moved into a quarantine
//! folder at the root of the volume they live on, keeping their path relative
//! to that volume root, and every move is recorded in a plain-text manifest
//! inside the quarantine folder.
//!
//! ```text
//! <volume>/DeletionDuplicates/
//! ├── paths.txt                  audit manifest (append-only)
//! └── photos/2021/img_0001.jpg   was <volume>/photos/2021/img_0001.jpg
//! ```
//!
//! - [`volume`]: volume-root resolution and quarantine folder creation
//! - [`relocate`]: moving files, one at a time or as a confirmed batch
//! - [`manifest`]: the audit log
//!
//! # Crash consistency
//!
//! The rename happens before the manifest append. A process killed between
//! the two leaves a quarantined file with no manifest record, and because
//! quarantine folders are skipped by name on later scans, nothing will flag
//! it. This gap is accepted.

pub mod manifest;
pub mod relocate;
pub mod volume;

use std::path::PathBuf;

pub use manifest::{append_entry, ManifestEntry, ManifestError};
pub use relocate::{
    plan_destination, quarantine_batch, relocate, BatchQuarantineResult,
    QuarantineProgressCallback, Relocation,
};
pub use volume::{
    ensure_quarantine_dir, quarantine_root, FixedVolumeLocator, MountPointLocator, QuarantineDir,
    VolumeLocator,
};

/// Name of the per-volume quarantine folder.
///
/// Fixed so that folders created by earlier runs are still recognised and
/// skipped by the walker.
pub const QUARANTINE_DIR_NAME: &str = "DeletionDuplicates";

/// Name of the audit manifest inside each quarantine folder.
pub const MANIFEST_FILE_NAME: &str = "paths.txt";

/// Errors that can occur while quarantining a single file.
#[derive(thiserror::Error, Debug)]
pub enum QuarantineError {
    /// The file to quarantine no longer exists.
    #[error("Source file does not exist: {0}")]
    SourceMissing(PathBuf),

    /// Something already occupies the destination path.
    #[error("Destination already exists: {0}")]
    DestinationExists(PathBuf),

    /// The volume root of the source could not be determined.
    #[error("Cannot determine volume root of {path}: {source}")]
    VolumeRoot {
        /// Source path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The destination's parent directory could not be created.
    #[error("Cannot create folder {path}: {source}")]
    CreateDir {
        /// Directory that could not be created
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The rename itself failed.
    #[error("Cannot move {from} to {to}: {source}")]
    Rename {
        /// Source path
        from: PathBuf,
        /// Destination path
        to: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// An index outside the duplicate group was selected.
    #[error("Row {index} is out of range (group has {len} files)")]
    IndexOutOfRange {
        /// Selected index
        index: usize,
        /// Number of files in the group
        len: usize,
    },
}

impl QuarantineError {
    /// Get the path associated with this error (if any).
    #[must_use]
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::SourceMissing(p)
            | Self::DestinationExists(p)
            | Self::VolumeRoot { path: p, .. }
            | Self::CreateDir { path: p, .. }
            | Self::Rename { from: p, .. } => Some(p),
            Self::IndexOutOfRange { .. } => None,
        }
    }
}
