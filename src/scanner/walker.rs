//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing one or more
//! root directories and yielding every eligible regular file as a
//! [`FileRecord`]. Roots are walked one after another, in the order given,
//! and children are visited in file-name order so that repeated runs over
//! an unchanged tree produce the same sequence.
//!
//! # Features
//!
//! - Sequential multi-root traversal, lazily pulled by the consumer
//! - Subtree pruning for excluded directories (see [`ExclusionRules`])
//! - Symbolic links are never followed
//! - Quarantine folders are prepared for every root before the walk starts
//! - Unreadable entries and vanished roots become [`ScanError`] values
//!   instead of stopping the walk
//!
//! # Example
//!
//! ```no_run
//! use dupmanager::scanner::{ExclusionRules, Walker};
//! use std::path::PathBuf;
//!
//! let walker = Walker::new(vec![PathBuf::from("/data")], ExclusionRules::for_host());
//! let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();
//! println!("Found {} files", files.len());
//! ```

use std::collections::{BTreeSet, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use walkdir::WalkDir;

use super::exclusion::ExclusionRules;
use super::path_utils::absolute_path;
use super::{FileRecord, ScanError};
use crate::progress::ProgressCallback;
use crate::quarantine::{
    ensure_quarantine_dir, quarantine_root, MountPointLocator, QuarantineDir, VolumeLocator,
    QUARANTINE_DIR_NAME,
};

/// Directory walker over a list of scan roots.
pub struct Walker {
    /// Roots to walk, in order
    roots: Vec<PathBuf>,
    /// Exclusion rules applied to every entry below a root
    rules: ExclusionRules,
    /// Resolves where each root's quarantine folder lives
    locator: Arc<dyn VolumeLocator>,
    /// Receives a running count of discovered files
    progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl Walker {
    /// Create a new walker for the given roots.
    ///
    /// # Arguments
    ///
    /// * `roots` - Directories to scan, walked in this order
    /// * `rules` - Exclusion rules
    #[must_use]
    pub fn new(roots: Vec<PathBuf>, rules: ExclusionRules) -> Self {
        Self {
            roots,
            rules,
            locator: Arc::new(MountPointLocator),
            progress_callback: None,
        }
    }

    /// Use a different volume locator for quarantine preparation.
    #[must_use]
    pub fn with_locator(mut self, locator: Arc<dyn VolumeLocator>) -> Self {
        self.locator = locator;
        self
    }

    /// Set a progress callback.
    ///
    /// `on_progress` is called once per yielded file with the running count.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// The scan roots.
    #[must_use]
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Make sure the quarantine folder exists for the volume of every root.
    ///
    /// Each distinct quarantine folder is handled once. Failures are logged
    /// and skipped; the walk itself does not depend on them.
    pub fn prepare_quarantines(&self) -> Vec<QuarantineDir> {
        let mut seen = BTreeSet::new();
        let mut prepared = Vec::new();

        for root in &self.roots {
            let root = absolute_path(root).unwrap_or_else(|_| root.clone());
            let dir = match quarantine_root(self.locator.as_ref(), &root) {
                Ok(dir) => dir,
                Err(e) => {
                    log::warn!("Cannot locate volume of {}: {}", root.display(), e);
                    continue;
                }
            };

            if !seen.insert(dir.clone()) {
                continue;
            }

            match ensure_quarantine_dir(&dir) {
                Ok(ready) => prepared.push(ready),
                Err(e) => log::warn!("Quarantine unavailable at {}: {}", dir.display(), e),
            }
        }

        prepared
    }

    /// Walk all roots, yielding file records.
    ///
    /// Quarantine folders are prepared first. Errors are yielded as
    /// [`ScanError`] values rather than stopping iteration.
    pub fn walk(self) -> Walk {
        self.prepare_quarantines();

        Walk {
            pending: self.roots.into_iter().collect(),
            active: None,
            rules: self.rules,
            progress_callback: self.progress_callback,
            discovered: 0,
        }
    }
}

impl std::fmt::Debug for Walker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Walker")
            .field("roots", &self.roots)
            .field("rules", &self.rules)
            .field("locator", &self.locator)
            .field("progress_callback", &self.progress_callback.is_some())
            .finish()
    }
}

/// The root currently being walked.
struct ActiveRoot {
    root: PathBuf,
    entries: walkdir::IntoIter,
}

/// Lazy iterator returned by [`Walker::walk`].
pub struct Walk {
    pending: VecDeque<PathBuf>,
    active: Option<ActiveRoot>,
    rules: ExclusionRules,
    progress_callback: Option<Arc<dyn ProgressCallback>>,
    discovered: usize,
}

impl Walk {
    /// Number of files yielded so far.
    #[must_use]
    pub fn discovered(&self) -> usize {
        self.discovered
    }

    /// Start walking `root`. `Ok(None)` means the root is skipped.
    fn open_root(root: PathBuf) -> Result<Option<ActiveRoot>, ScanError> {
        let root = absolute_path(&root).unwrap_or(root);
        if !root.exists() {
            log::warn!("Not exist: {}", root.display());
            return Err(ScanError::RootVanished(root));
        }

        if is_inside_quarantine(&root) {
            log::warn!("Skipping {}: inside a quarantine folder", root.display());
            return Ok(None);
        }

        log::info!("Scanning {}", root.display());
        let entries = WalkDir::new(&root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();
        Ok(Some(ActiveRoot { root, entries }))
    }
}

impl Iterator for Walk {
    type Item = Result<FileRecord, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some(active) = self.active.as_mut() else {
                let root = self.pending.pop_front()?;
                match Self::open_root(root) {
                    Ok(next_root) => self.active = next_root,
                    Err(e) => return Some(Err(e)),
                }
                continue;
            };

            let Some(result) = active.entries.next() else {
                log::debug!("Finished walking {}", active.root.display());
                self.active = None;
                continue;
            };

            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    let err = classify_walk_error(&active.root, e);
                    if matches!(err, ScanError::RootVanished(_)) {
                        self.active = None;
                    }
                    return Some(Err(err));
                }
            };

            let file_type = entry.file_type();
            let metadata = entry.metadata();

            if entry.depth() > 0 {
                if let Some(reason) = self.rules.check(entry.path(), metadata.as_ref().ok()) {
                    log::trace!("Skipping {} ({})", entry.path().display(), reason);
                    if file_type.is_dir() {
                        active.entries.skip_current_dir();
                    }
                    continue;
                }
            }

            // Directories are descended into, links and devices are ignored
            if !file_type.is_file() {
                continue;
            }

            let size = match metadata {
                Ok(metadata) => metadata.len(),
                Err(e) => return Some(Err(classify_walk_error(&active.root, e))),
            };

            let path = entry.path().to_path_buf();
            self.discovered += 1;
            if let Some(ref callback) = self.progress_callback {
                callback.on_progress(self.discovered, &path.to_string_lossy());
            }

            return Some(Ok(FileRecord::new(path, size)));
        }
    }
}

/// Whether `path` is a quarantine folder or lies beneath one.
///
/// Exclusion rules only see entries below a root, so the root's own
/// components are checked here.
fn is_inside_quarantine(path: &Path) -> bool {
    path.components()
        .any(|c| c.as_os_str() == std::ffi::OsStr::new(QUARANTINE_DIR_NAME))
}

/// Map a walkdir error onto a [`ScanError`], logging it.
fn classify_walk_error(root: &Path, error: walkdir::Error) -> ScanError {
    if !root.exists() {
        log::warn!("Not exist: {}", root.display());
        return ScanError::RootVanished(root.to_path_buf());
    }

    let path = error
        .path()
        .map_or_else(|| root.to_path_buf(), Path::to_path_buf);

    match error.io_error().map(io::Error::kind) {
        Some(io::ErrorKind::PermissionDenied) => {
            log::warn!("Permission denied: {}", path.display());
            ScanError::PermissionDenied(path)
        }
        Some(io::ErrorKind::NotFound) => {
            log::debug!("Entry disappeared during walk: {}", path.display());
            ScanError::NotFound(path)
        }
        _ => {
            log::warn!("Error reading {}: {}", path.display(), error);
            let message = error.to_string();
            let source = error
                .into_io_error()
                .unwrap_or_else(|| io::Error::other(message));
            ScanError::Io { path, source }
        }
    }
}
