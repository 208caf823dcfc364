//! Volume-root resolution and quarantine folder creation.
//!
//! The quarantine folder always lives on the same volume as the files moved
//! into it, which keeps every relocation a same-device rename.
//!
//! - Windows: the volume root is the path prefix plus root separator (`C:\`,
//!   `\\server\share\`).
//! - Unix: the volume root is the mount point containing the path, found by
//!   walking up ancestors while the device id stays the same.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::QUARANTINE_DIR_NAME;

/// Resolves the volume root that scopes quarantine placement.
pub trait VolumeLocator: Send + Sync + std::fmt::Debug {
    /// Return the root of the volume containing `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be inspected.
    fn volume_root(&self, path: &Path) -> io::Result<PathBuf>;
}

/// Locator for the host platform's volumes.
#[derive(Debug, Clone, Copy, Default)]
pub struct MountPointLocator;

impl VolumeLocator for MountPointLocator {
    #[cfg(unix)]
    fn volume_root(&self, path: &Path) -> io::Result<PathBuf> {
        use std::os::unix::fs::MetadataExt;

        let device = fs::metadata(path)?.dev();
        let mut current = path.to_path_buf();
        while let Some(parent) = current.parent() {
            match fs::metadata(parent) {
                Ok(meta) if meta.dev() == device => current = parent.to_path_buf(),
                _ => break,
            }
        }
        Ok(current)
    }

    #[cfg(not(unix))]
    fn volume_root(&self, path: &Path) -> io::Result<PathBuf> {
        use std::path::Component;

        let mut root = PathBuf::new();
        for component in path.components() {
            match component {
                Component::Prefix(_) | Component::RootDir => root.push(component.as_os_str()),
                _ => break,
            }
        }
        if root.as_os_str().is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} has no root", path.display()),
            ));
        }
        Ok(root)
    }
}

/// Locator that treats one directory as the root of every path beneath it.
///
/// Useful for confining quarantine to a known location, e.g. in tests.
#[derive(Debug, Clone)]
pub struct FixedVolumeLocator {
    root: PathBuf,
}

impl FixedVolumeLocator {
    /// Create a locator rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl VolumeLocator for FixedVolumeLocator {
    fn volume_root(&self, path: &Path) -> io::Result<PathBuf> {
        if path.starts_with(&self.root) {
            Ok(self.root.clone())
        } else {
            Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is outside volume {}", path.display(), self.root.display()),
            ))
        }
    }
}

/// Path of the quarantine folder for the volume containing `path`.
///
/// # Errors
///
/// Propagates volume-root resolution failures.
pub fn quarantine_root(locator: &dyn VolumeLocator, path: &Path) -> io::Result<PathBuf> {
    Ok(locator.volume_root(path)?.join(QUARANTINE_DIR_NAME))
}

/// Outcome of [`ensure_quarantine_dir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuarantineDir {
    /// The folder was created by this call.
    Created(PathBuf),
    /// The folder was already there and is reused.
    Existing(PathBuf),
}

impl QuarantineDir {
    /// The quarantine folder path.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Created(p) | Self::Existing(p) => p,
        }
    }
}

/// Make sure a quarantine folder exists. Idempotent.
///
/// # Errors
///
/// Returns the I/O error if the folder is missing and cannot be created.
pub fn ensure_quarantine_dir(dir: &Path) -> io::Result<QuarantineDir> {
    if dir.is_dir() {
        log::info!("Folder already exists: {}", dir.display());
        return Ok(QuarantineDir::Existing(dir.to_path_buf()));
    }

    match fs::create_dir_all(dir) {
        Ok(()) => {
            log::info!("New folder created: {}", dir.display());
            Ok(QuarantineDir::Created(dir.to_path_buf()))
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && dir.is_dir() => {
            Ok(QuarantineDir::Existing(dir.to_path_buf()))
        }
        Err(e) => {
            log::warn!("Failed to create folder {}: {}", dir.display(), e);
            Err(e)
        }
    }
}
