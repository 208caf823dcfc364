use std::fs;
use std::path::PathBuf;

use dupmanager::duplicates::{group_by_hash, group_by_size};
use dupmanager::scanner::{ExclusionRules, Hasher, Walker};
use tempfile::TempDir;

use super::common::{finder, locator, quarantine, write};

#[test]
fn test_same_size_different_content_is_split() {
    let dir = TempDir::new().unwrap();
    let a = write(dir.path(), "data/a", b"XXXXXXXXXX");
    let b = write(dir.path(), "data/b", b"XXXXXXXXXX");
    let c = write(dir.path(), "data/c", b"YYYYYYYYYY");

    let walker = Walker::new(vec![dir.path().join("data")], ExclusionRules::new(Vec::new()))
        .with_locator(locator(&dir));
    let records: Vec<_> = walker.walk().collect::<Result<_, _>>().unwrap();

    let (size_groups, _) = group_by_size(records);
    assert_eq!(size_groups.len(), 1);
    assert_eq!(size_groups[0].size, 10);
    assert_eq!(size_groups[0].paths, vec![a.clone(), b.clone(), c]);

    let report = group_by_hash(size_groups, &Hasher::new(), None);
    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.groups[0].paths, vec![a, b]);
}

#[test]
fn test_scan_unique_files() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.txt", b"content a");
    write(dir.path(), "b.txt", b"content bb");
    write(dir.path(), "c.txt", b"content c");

    let (groups, summary) = finder(&dir).find_duplicates(&[dir.path().to_path_buf()]);

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 3);
    assert_eq!(summary.size_candidates, 2);
    assert_eq!(summary.hashed_files, 2);
}

#[test]
fn test_scan_multiple_groups_sorted_by_digest() {
    let dir = TempDir::new().unwrap();
    for i in 0..5 {
        let content = format!("group {i} content");
        write(dir.path(), &format!("x/{i}-first"), content.as_bytes());
        write(dir.path(), &format!("y/{i}-second"), content.as_bytes());
    }

    let (groups, summary) = finder(&dir).find_duplicates(&[dir.path().join("x"), dir.path().join("y")]);

    assert_eq!(groups.len(), 5);
    assert_eq!(summary.duplicate_files, 5);
    assert!(groups.windows(2).all(|w| w[0].digest < w[1].digest));
    for group in &groups {
        assert!(group.paths[0].starts_with(dir.path().join("x")));
        assert!(group.paths[1].starts_with(dir.path().join("y")));
    }
}

#[test]
fn test_scan_is_deterministic() {
    let dir = TempDir::new().unwrap();
    for (name, content) in [("q", "1"), ("b", "1"), ("k/z", "22"), ("k/a", "22"), ("m", "333")] {
        write(dir.path(), name, content.as_bytes());
    }

    let roots = [dir.path().to_path_buf()];
    let (first, _) = finder(&dir).find_duplicates(&roots);
    let (second, _) = finder(&dir).find_duplicates(&roots);

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}

#[test]
fn test_quarantine_folder_never_scanned() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "data/a.txt", b"payload");
    // An earlier run left a copy in quarantine
    write(dir.path(), "DeletionDuplicates/data/b.txt", b"payload");
    // A nested root with its own quarantine-named folder
    write(dir.path(), "data/sub/DeletionDuplicates/c.txt", b"payload");

    let (groups, summary) = finder(&dir).find_duplicates(&[dir.path().to_path_buf(), dir.path().join("data")]);

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 1);
    assert!(quarantine(&dir).is_dir());
}

#[test]
fn test_quarantine_folder_as_root_yields_nothing() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "DeletionDuplicates/data/a.txt", b"payload");
    write(dir.path(), "DeletionDuplicates/data/b.txt", b"payload");

    let walker = Walker::new(vec![quarantine(&dir), quarantine(&dir).join("data")], ExclusionRules::new(Vec::new()))
        .with_locator(locator(&dir));
    assert_eq!(walker.walk().count(), 0);

    let (groups, summary) = finder(&dir).find_duplicates(&[quarantine(&dir)]);
    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 0);
    assert!(summary.scan_errors.is_empty());
}

#[test]
fn test_walk_prepares_quarantine_for_every_root() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("one")).unwrap();

    let existing = quarantine(&dir);
    fs::create_dir(&existing).unwrap();
    write(&existing, "paths.txt", b"old record\n\n");

    let _ = finder(&dir).find_duplicates(&[dir.path().join("one")]);

    // Reused, not recreated
    assert_eq!(fs::read_to_string(existing.join("paths.txt")).unwrap(), "old record\n\n");
}

#[test]
fn test_missing_root_does_not_stop_other_roots() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "here/a", b"same");
    write(dir.path(), "here/b", b"same");

    let roots: Vec<PathBuf> = vec![dir.path().join("gone"), dir.path().join("here")];
    let (groups, summary) = finder(&dir).find_duplicates(&roots);

    assert_eq!(groups.len(), 1);
    assert_eq!(summary.scan_errors.len(), 1);
}
