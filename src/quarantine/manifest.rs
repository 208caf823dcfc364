//! Append-only audit manifest.
//!
//! Each relocation appends one record to `paths.txt` in the quarantine
//! folder:
//!
//! ```text
//! Source: /data/photos/img.jpg
//! Destination: /data/DeletionDuplicates/photos/img.jpg
//!
//! ```
//!
//! The file is opened, written and closed for every record, so a killed
//! process can at worst lose the record being written. The tool never reads
//! the manifest back.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::MANIFEST_FILE_NAME;

/// Errors that can occur while appending to the manifest.
#[derive(thiserror::Error, Debug)]
pub enum ManifestError {
    /// The manifest could not be opened for appending.
    #[error("Unable to open file: {path}: {source}")]
    Open {
        /// Manifest path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Writing the record failed.
    #[error("Unable to write to {path}: {source}")]
    Write {
        /// Manifest path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// One relocation record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Original location of the file.
    pub source: PathBuf,
    /// Location inside the quarantine folder.
    pub destination: PathBuf,
}

impl ManifestEntry {
    /// Create a new entry.
    #[must_use]
    pub fn new(source: PathBuf, destination: PathBuf) -> Self {
        Self {
            source,
            destination,
        }
    }

    /// The two-line record plus the blank separator line.
    #[must_use]
    pub fn render(&self) -> String {
        format!(
            "Source: {}\nDestination: {}\n\n",
            self.source.display(),
            self.destination.display()
        )
    }
}

/// Append `entry` to the manifest inside `quarantine_root`.
///
/// Returns the manifest path on success.
///
/// # Errors
///
/// Returns [`ManifestError`] if the manifest cannot be opened or written.
pub fn append_entry(quarantine_root: &Path, entry: &ManifestEntry) -> Result<PathBuf, ManifestError> {
    let path = quarantine_root.join(MANIFEST_FILE_NAME);

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|source| ManifestError::Open {
            path: path.clone(),
            source,
        })?;

    file.write_all(entry.render().as_bytes())
        .and_then(|()| file.flush())
        .map_err(|source| ManifestError::Write {
            path: path.clone(),
            source,
        })?;

    log::debug!("Paths appended to: {}", path.display());
    Ok(path)
}
