//! Failure paths: unreadable files, vanished roots, broken selections.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dupmanager::duplicates::{group_by_hash, group_by_size, DuplicateFinder, FinderConfig};
use dupmanager::quarantine::{quarantine_batch, FixedVolumeLocator, MANIFEST_FILE_NAME, QUARANTINE_DIR_NAME};
use dupmanager::scanner::{ExclusionRules, FileRecord, Hasher, ScanError, Walker};
use tempfile::TempDir;

fn write(path: &Path, content: &[u8]) -> PathBuf {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
    path.to_path_buf()
}

fn record(path: &Path) -> FileRecord {
    FileRecord::new(path.to_path_buf(), fs::metadata(path).unwrap().len())
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_dropped_from_group() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let a = write(&dir.path().join("a"), b"shared content");
    let b = write(&dir.path().join("b"), b"shared content");
    let locked = write(&dir.path().join("locked"), b"shared content");

    let (size_groups, _) = group_by_size(vec![record(&a), record(&b), record(&locked)]);
    assert_eq!(size_groups[0].len(), 3);

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    if fs::File::open(&locked).is_ok() {
        // Running with privileges that ignore file modes
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
        return;
    }

    let report = group_by_hash(size_groups, &Hasher::new(), None);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();

    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.groups[0].paths, vec![a, b]);
    assert_eq!(report.progress.hashed, 2);
    assert_eq!(report.progress.total, 3);
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].contains("locked"));
}

#[test]
fn test_file_deleted_between_stages() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir.path().join("a"), b"12345");
    let b = write(&dir.path().join("b"), b"12345");
    let c = write(&dir.path().join("c"), b"12345");

    let (size_groups, _) = group_by_size(vec![record(&a), record(&b), record(&c)]);
    fs::remove_file(&c).unwrap();

    let report = group_by_hash(size_groups, &Hasher::new(), None);

    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.groups[0].paths, vec![a, b]);
    assert_eq!(report.failures, vec![format!("Could not open file: {}", c.display())]);
}

#[test]
fn test_repeated_failure_reported_once() {
    let dir = TempDir::new().unwrap();
    let gone = dir.path().join("gone");
    let groups = vec![
        dupmanager::duplicates::SizeGroup::new(4, vec![gone.clone(), gone.clone()]),
    ];

    let report = group_by_hash(groups, &Hasher::new(), None);

    assert!(report.groups.is_empty());
    assert_eq!(report.failures.len(), 1);
}

#[test]
fn test_vanished_root_does_not_stop_scan() {
    let dir = TempDir::new().unwrap();
    write(&dir.path().join("kept/a"), b"dup");
    write(&dir.path().join("kept/b"), b"dup");
    let vanished = dir.path().join("vanished");

    let walker = Walker::new(
        vec![vanished.clone(), dir.path().join("kept")],
        ExclusionRules::new(Vec::new()),
    )
    .with_locator(Arc::new(FixedVolumeLocator::new(dir.path())));

    let results: Vec<_> = walker.walk().collect();
    let errors: Vec<_> = results.iter().filter_map(|r| r.as_ref().err()).collect();
    let files = results.iter().filter(|r| r.is_ok()).count();

    assert_eq!(files, 2);
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], ScanError::RootVanished(p) if *p == vanished));
}

#[test]
fn test_finder_summary_records_scan_errors() {
    let dir = TempDir::new().unwrap();
    write(&dir.path().join("data/a"), b"dup");
    write(&dir.path().join("data/b"), b"dup");

    let finder = DuplicateFinder::new(
        FinderConfig::default()
            .with_rules(ExclusionRules::new(Vec::new()))
            .with_locator(Arc::new(FixedVolumeLocator::new(dir.path()))),
    );
    let (groups, summary) = finder.find_duplicates(&[dir.path().join("data"), dir.path().join("nope")]);

    assert_eq!(groups.len(), 1);
    assert_eq!(summary.scan_errors.len(), 1);
    assert_eq!(summary.duplicate_groups, 1);
}

#[test]
fn test_missing_source_in_batch() {
    let dir = TempDir::new().unwrap();
    let locator = FixedVolumeLocator::new(dir.path());
    let a = write(&dir.path().join("d/a"), b"x");
    let b = write(&dir.path().join("d/b"), b"x");
    fs::remove_file(&a).unwrap();

    let result = quarantine_batch(&[a.clone(), b.clone()], &[0, 1], &locator, None);

    assert_eq!(result.failure_count(), 1);
    assert_eq!(result.failures[0].0, a);
    assert!(result.failures[0].1.contains("Source file does not exist"));
    assert_eq!(result.success_count(), 1);
    assert!(!b.exists());

    let manifest = fs::read_to_string(dir.path().join(QUARANTINE_DIR_NAME).join(MANIFEST_FILE_NAME)).unwrap();
    assert_eq!(manifest.matches("Source: ").count(), 1);
}

#[test]
fn test_out_of_range_index_in_batch() {
    let dir = TempDir::new().unwrap();
    let locator = FixedVolumeLocator::new(dir.path());
    let a = write(&dir.path().join("d/a"), b"x");

    let result = quarantine_batch(&[a.clone()], &[3, 0], &locator, None);

    assert_eq!(result.failure_count(), 1);
    assert_eq!(result.success_count(), 1);
    assert!(!a.exists());
}

#[test]
fn test_failed_move_writes_no_manifest() {
    let dir = TempDir::new().unwrap();
    let locator = FixedVolumeLocator::new(dir.path());
    let a = write(&dir.path().join("d/a"), b"x");
    write(&dir.path().join(QUARANTINE_DIR_NAME).join("d/a"), b"occupied");

    let result = quarantine_batch(&[a.clone()], &[0], &locator, None);

    assert_eq!(result.failure_count(), 1);
    assert!(a.exists());
    assert!(!dir.path().join(QUARANTINE_DIR_NAME).join(MANIFEST_FILE_NAME).exists());
}
