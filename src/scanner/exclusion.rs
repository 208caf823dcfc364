//! Exclusion rules applied to every entry the walker visits.
//!
//! Checks run in a fixed order and the first match wins:
//!
//! 1. the operating system's own installation root
//! 2. reserved names: the quarantine folder and known trash folders
//! 3. hidden entries (platform hidden attribute or leading dot)
//! 4. remote-storage placeholders not yet materialized locally
//! 5. shortcuts (`.lnk`)
//!
//! When an excluded entry is a directory the walker prunes its whole subtree.

use std::fs::Metadata;
use std::path::{Path, PathBuf};

use crate::quarantine::QUARANTINE_DIR_NAME;
use crate::scanner::path_utils::same_path_ignore_case;

/// Folder names used by platforms and desktop environments for deleted items.
pub const TRASH_DIR_NAMES: &[&str] = &["$RECYCLE.BIN", "RECYCLE.BIN", "RECYCLER", ".Trash", ".Trashes"];

/// Extension of Windows shell shortcuts.
const SHORTCUT_EXTENSION: &str = "lnk";

#[cfg(windows)]
const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;
#[cfg(windows)]
const FILE_ATTRIBUTE_RECALL_ON_OPEN: u32 = 0x0004_0000;
#[cfg(windows)]
const FILE_ATTRIBUTE_RECALL_ON_DATA_ACCESS: u32 = 0x0040_0000;

/// Why an entry was excluded from the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    /// The operating system's installation root.
    SystemRoot,
    /// Quarantine or trash folder.
    ReservedName,
    /// Hidden attribute or dotfile.
    Hidden,
    /// Cloud file that only exists remotely.
    Placeholder,
    /// Shell shortcut.
    Shortcut,
}

impl std::fmt::Display for Exclusion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::SystemRoot => "system directory",
            Self::ReservedName => "quarantine/trash folder",
            Self::Hidden => "hidden",
            Self::Placeholder => "online-only placeholder",
            Self::Shortcut => "shortcut",
        };
        f.write_str(label)
    }
}

/// The set of exclusion rules used by the walker.
#[derive(Debug, Clone)]
pub struct ExclusionRules {
    system_roots: Vec<PathBuf>,
    reserved_names: Vec<String>,
}

impl Default for ExclusionRules {
    fn default() -> Self {
        Self::for_host()
    }
}

impl ExclusionRules {
    /// Rules for the running platform.
    ///
    /// On Windows the system root comes from `%SystemRoot%` (falling back to
    /// `%windir%`). Elsewhere the kernel pseudo-filesystems are treated as
    /// the system root.
    #[must_use]
    pub fn for_host() -> Self {
        Self::new(host_system_roots())
    }

    /// Rules with explicit system roots and the default reserved names.
    #[must_use]
    pub fn new(system_roots: Vec<PathBuf>) -> Self {
        let mut reserved_names = vec![QUARANTINE_DIR_NAME.to_string()];
        reserved_names.extend(TRASH_DIR_NAMES.iter().map(|n| (*n).to_string()));
        Self {
            system_roots,
            reserved_names,
        }
    }

    /// System roots that are never descended into.
    #[must_use]
    pub fn system_roots(&self) -> &[PathBuf] {
        &self.system_roots
    }

    /// Folder names that are never descended into.
    #[must_use]
    pub fn reserved_names(&self) -> &[String] {
        &self.reserved_names
    }

    /// Evaluate all rules against an entry.
    ///
    /// `metadata` is the entry's own (non-followed) metadata when available;
    /// attribute-based checks are skipped without it.
    #[must_use]
    pub fn check(&self, path: &Path, metadata: Option<&Metadata>) -> Option<Exclusion> {
        if self.is_system_root(path) {
            return Some(Exclusion::SystemRoot);
        }

        let name = path.file_name().map(|n| n.to_string_lossy());
        if let Some(name) = name.as_deref() {
            if self.reserved_names.iter().any(|r| r == name) {
                return Some(Exclusion::ReservedName);
            }
        }

        if name.as_deref().is_some_and(|n| n.starts_with('.')) || has_hidden_attribute(metadata) {
            return Some(Exclusion::Hidden);
        }

        if is_online_placeholder(metadata) {
            return Some(Exclusion::Placeholder);
        }

        if is_shortcut(path) {
            return Some(Exclusion::Shortcut);
        }

        None
    }

    fn is_system_root(&self, path: &Path) -> bool {
        self.system_roots.iter().any(|root| {
            if cfg!(windows) {
                same_path_ignore_case(root, path)
            } else {
                root == path
            }
        })
    }
}

/// Check whether a path has the shortcut extension.
#[must_use]
pub fn is_shortcut(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(SHORTCUT_EXTENSION))
}

#[cfg(windows)]
fn host_system_roots() -> Vec<PathBuf> {
    let mut roots: Vec<PathBuf> = Vec::new();
    for var in ["SystemRoot", "windir"] {
        if let Some(value) = std::env::var_os(var) {
            let path = PathBuf::from(value);
            if !roots.iter().any(|r| same_path_ignore_case(r, &path)) {
                roots.push(path);
            }
        }
    }
    if roots.is_empty() {
        log::warn!("Error getting the Windows directory path; system folder will be scanned");
    }
    roots
}

#[cfg(not(windows))]
fn host_system_roots() -> Vec<PathBuf> {
    ["/proc", "/sys", "/dev", "/run"]
        .iter()
        .map(PathBuf::from)
        .collect()
}

#[cfg(windows)]
fn has_hidden_attribute(metadata: Option<&Metadata>) -> bool {
    use std::os::windows::fs::MetadataExt;
    metadata.is_some_and(|m| m.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0)
}

#[cfg(not(windows))]
fn has_hidden_attribute(_metadata: Option<&Metadata>) -> bool {
    false
}

#[cfg(windows)]
fn is_online_placeholder(metadata: Option<&Metadata>) -> bool {
    use std::os::windows::fs::MetadataExt;
    metadata.is_some_and(|m| {
        m.file_attributes() & (FILE_ATTRIBUTE_RECALL_ON_DATA_ACCESS | FILE_ATTRIBUTE_RECALL_ON_OPEN)
            != 0
    })
}

#[cfg(not(windows))]
fn is_online_placeholder(_metadata: Option<&Metadata>) -> bool {
    false
}
