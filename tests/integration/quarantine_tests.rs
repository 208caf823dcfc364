use std::fs;
use std::path::PathBuf;

use dupmanager::quarantine::{quarantine_batch, relocate, QuarantineError, MANIFEST_FILE_NAME};
use tempfile::TempDir;

use super::common::{locator, quarantine, write};

#[test]
fn test_relocation_mirrors_path_and_keeps_content() {
    let dir = TempDir::new().unwrap();
    let content = b"byte-for-byte \x00\xff payload";
    let source = write(dir.path(), "photos/2021/img.jpg", content);

    let moved = relocate(&source, locator(&dir).as_ref()).unwrap();

    let expected = quarantine(&dir).join("photos/2021/img.jpg");
    assert_eq!(moved.destination, expected);
    assert_eq!(moved.quarantine_root, quarantine(&dir));
    assert!(!source.exists());
    assert_eq!(fs::read(&expected).unwrap(), content);
}

#[test]
fn test_batch_moves_selected_and_records_manifest() {
    let dir = TempDir::new().unwrap();
    let a = write(dir.path(), "data/a.txt", b"X");
    let b = write(dir.path(), "data/b.txt", b"X");

    let result = quarantine_batch(&[a.clone(), b.clone()], &[0], locator(&dir).as_ref(), None);

    assert!(result.all_succeeded());
    assert_eq!(result.success_count(), 1);
    assert!(!a.exists());
    assert!(b.exists());

    let manifest = fs::read_to_string(quarantine(&dir).join(MANIFEST_FILE_NAME)).unwrap();
    assert_eq!(
        manifest,
        format!(
            "Source: {}\nDestination: {}\n\n",
            a.display(),
            quarantine(&dir).join("data/a.txt").display()
        )
    );
}

#[test]
fn test_batch_failure_does_not_block_others() {
    let dir = TempDir::new().unwrap();
    let a = write(dir.path(), "data/a.txt", b"X");
    let gone = dir.path().join("data/gone.txt");
    let c = write(dir.path(), "data/c.txt", b"X");

    let result = quarantine_batch(&[a, gone.clone(), c], &[0, 1, 2], locator(&dir).as_ref(), None);

    assert_eq!(result.success_count(), 2);
    assert_eq!(result.failure_count(), 1);
    assert_eq!(result.failures[0].0, gone);

    let manifest = fs::read_to_string(quarantine(&dir).join(MANIFEST_FILE_NAME)).unwrap();
    assert_eq!(manifest.matches("Source: ").count(), 2);
    assert!(!manifest.contains("gone.txt"));
}

#[test]
fn test_existing_destination_is_not_overwritten() {
    let dir = TempDir::new().unwrap();
    let source = write(dir.path(), "docs/report.pdf", b"new copy");
    let earlier = write(dir.path(), "DeletionDuplicates/docs/report.pdf", b"earlier copy");

    let err = relocate(&source, locator(&dir).as_ref()).unwrap_err();

    assert!(matches!(err, QuarantineError::DestinationExists(ref p) if *p == earlier));
    assert!(source.exists());
    assert_eq!(fs::read(&earlier).unwrap(), b"earlier copy");
}

#[test]
fn test_manifest_accumulates_across_batches() {
    let dir = TempDir::new().unwrap();
    let paths: Vec<PathBuf> = (0..3)
        .map(|i| write(dir.path(), &format!("d/{i}.bin"), b"same"))
        .collect();

    quarantine_batch(&paths, &[0], locator(&dir).as_ref(), None);
    quarantine_batch(&paths, &[2], locator(&dir).as_ref(), None);

    let manifest = fs::read_to_string(quarantine(&dir).join(MANIFEST_FILE_NAME)).unwrap();
    let sources: Vec<_> = manifest
        .lines()
        .filter_map(|l| l.strip_prefix("Source: "))
        .collect();
    let expected: Vec<String> = [&paths[0], &paths[2]]
        .iter()
        .map(|p| p.display().to_string())
        .collect();
    assert_eq!(sources, expected);
}
