//! Shared fixtures for the integration tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dupmanager::duplicates::{DuplicateFinder, FinderConfig};
use dupmanager::quarantine::{FixedVolumeLocator, QUARANTINE_DIR_NAME};
use dupmanager::scanner::ExclusionRules;
use tempfile::TempDir;

/// Write `content` to `root/rel`, creating parent folders.
pub fn write(root: &Path, rel: &str, content: &[u8]) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

/// Locator treating the temp dir as the whole volume.
pub fn locator(dir: &TempDir) -> Arc<FixedVolumeLocator> {
    Arc::new(FixedVolumeLocator::new(dir.path()))
}

/// Finder confined to the temp dir, with no system roots.
pub fn finder(dir: &TempDir) -> DuplicateFinder {
    DuplicateFinder::new(
        FinderConfig::default()
            .with_rules(ExclusionRules::new(Vec::new()))
            .with_locator(locator(dir)),
    )
}

/// Quarantine folder of the temp-dir volume.
pub fn quarantine(dir: &TempDir) -> PathBuf {
    dir.path().join(QUARANTINE_DIR_NAME)
}
