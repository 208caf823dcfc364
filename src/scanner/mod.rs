//! Discovery of candidate files.
//!
//! [`Walker`] enumerates the regular files under the operator's roots,
//! skipping whatever [`ExclusionRules`] rejects, and yields one
//! [`FileRecord`] per file. [`Hasher`] later turns a path into a
//! [`ContentDigest`]. Paths are made absolute by [`path_utils`] but keep
//! their on-disk spelling; only comparison keys are normalized.
//!
//! ```no_run
//! use dupmanager::scanner::{ExclusionRules, Walker};
//! use std::path::PathBuf;
//!
//! let roots = vec![PathBuf::from("/data")];
//! let total: u64 = Walker::new(roots, ExclusionRules::for_host())
//!     .walk()
//!     .filter_map(Result::ok)
//!     .map(|record| record.size)
//!     .sum();
//! println!("{total} bytes eligible");
//! ```

pub mod exclusion;
pub mod hasher;
pub mod path_utils;
pub mod walker;

use std::io;
use std::path::{Path, PathBuf};

pub use exclusion::{Exclusion, ExclusionRules};
pub use hasher::{ContentDigest, Hasher, DEFAULT_CHUNK_SIZE};
pub use walker::{Walk, Walker};

/// A regular file discovered by the walker.
///
/// Produced once per eligible file and consumed by the size grouper; the
/// path is absolute and spelled exactly as on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Absolute location, as found on disk
    pub path: PathBuf,
    /// Length in bytes
    pub size: u64,
}

impl FileRecord {
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self { path, size }
    }
}

/// Why an entry or subtree was left out of the walk.
///
/// The walk carries on after each of these.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Listing or inspecting the entry was refused.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The entry disappeared while the walk was under way.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// A root was gone by the time the walker reached it.
    #[error("Not exist: {0}")]
    RootVanished(PathBuf),

    /// Any other read failure.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Entry being read
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Why a candidate could not be digested.
///
/// `Display` output is what gets deduplicated and reported at the end of
/// the hashing stage, so it names the file.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// Opening failed because the file is gone.
    #[error("Could not open file: {0}")]
    NotFound(PathBuf),

    /// Opening or reading was refused.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Any other read failure, e.g. a lock held by another process.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// File being digested
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl HashError {
    pub(crate) fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}
