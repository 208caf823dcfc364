use std::fs;
use std::io::Cursor;

use dupmanager::quarantine::MANIFEST_FILE_NAME;
use dupmanager::review::{ConsoleOperator, ReviewSummary, Reviewer};
use tempfile::TempDir;

use super::common::{finder, locator, quarantine, write};

fn console(input: &str) -> ConsoleOperator<Cursor<Vec<u8>>, Vec<u8>> {
    ConsoleOperator::new(Cursor::new(input.as_bytes().to_vec()), Vec::new()).with_color(false)
}

#[test]
fn test_confirmed_selection_is_quarantined() {
    let dir = TempDir::new().unwrap();
    let a = write(dir.path(), "data/a", b"XXXXXXXXXX");
    let b = write(dir.path(), "data/b", b"XXXXXXXXXX");
    write(dir.path(), "data/c", b"YYYYYYYYYY");

    let (groups, _) = finder(&dir).find_duplicates(&[dir.path().join("data")]);
    let mut operator = console("0\ny\n");
    let summary = Reviewer::new(locator(&dir)).review_all(groups, &mut operator).unwrap();

    assert_eq!(summary.moved, 1);
    assert!(!a.exists());
    assert!(b.exists());
    assert!(quarantine(&dir).join("data/a").exists());

    let manifest = fs::read_to_string(quarantine(&dir).join(MANIFEST_FILE_NAME)).unwrap();
    let lines: Vec<_> = manifest.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], format!("Source: {}", a.display()));
    assert_eq!(
        lines[1],
        format!("Destination: {}", quarantine(&dir).join("data/a").display())
    );
    assert_eq!(lines[2], "");

    let output = String::from_utf8(operator.into_writer()).unwrap();
    assert!(output.contains("Case 1:"));
    assert!(output.contains(&format!(
        "Destination folder created: {}",
        quarantine(&dir).join("data").display()
    )));
    assert!(output.contains("File moved from"));
    assert!(output.contains("Paths appended to:"));
}

#[test]
fn test_declined_selection_changes_nothing() {
    let dir = TempDir::new().unwrap();
    let a = write(dir.path(), "data/a", b"same");
    let b = write(dir.path(), "data/b", b"same");

    let (groups, _) = finder(&dir).find_duplicates(&[dir.path().join("data")]);
    let mut operator = console("0,1\nn\n");
    let summary = Reviewer::new(locator(&dir)).review_all(groups, &mut operator).unwrap();

    assert_eq!(
        summary,
        ReviewSummary {
            cases: 1,
            declined: 1,
            ..Default::default()
        }
    );
    assert!(a.exists());
    assert!(b.exists());
    assert!(!quarantine(&dir).join(MANIFEST_FILE_NAME).exists());
    assert_eq!(fs::read_dir(quarantine(&dir)).unwrap().count(), 0);
}

#[test]
fn test_invalid_answers_are_asked_again() {
    let dir = TempDir::new().unwrap();
    let a = write(dir.path(), "data/a", b"same");
    write(dir.path(), "data/b", b"same");

    let (groups, _) = finder(&dir).find_duplicates(&[dir.path().join("data")]);
    let mut operator = console("7\nfirst\n0\nsure\n\ny\n");
    let summary = Reviewer::new(locator(&dir)).review_all(groups, &mut operator).unwrap();

    assert_eq!(summary.moved, 1);
    assert!(!a.exists());

    let output = String::from_utf8(operator.into_writer()).unwrap();
    assert!(output.contains("Row 7 is out of range (0 to 1)"));
    assert!(output.contains("Not a row number: first"));
    assert!(output.contains("Invalid input. Please enter 'y' or 'n'."));
}

#[test]
fn test_each_group_reviewed_independently() {
    let dir = TempDir::new().unwrap();
    for i in 0..3 {
        let content = format!("content number {i}");
        write(dir.path(), &format!("data/{i}a"), content.as_bytes());
        write(dir.path(), &format!("data/{i}b"), content.as_bytes());
    }

    let (groups, _) = finder(&dir).find_duplicates(&[dir.path().join("data")]);
    assert_eq!(groups.len(), 3);
    let first_group_paths = groups[0].paths.clone();

    // Group 1: move row 1; group 2: skip; group 3: decline
    let mut operator = console("1\ny\n\n0\nn\n");
    let summary = Reviewer::new(locator(&dir)).review_all(groups, &mut operator).unwrap();

    assert_eq!(summary.cases, 3);
    assert_eq!(summary.moved, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.declined, 1);
    assert!(first_group_paths[0].exists());
    assert!(!first_group_paths[1].exists());
}

#[test]
fn test_closed_input_stops_review() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "data/a", b"same");
    write(dir.path(), "data/b", b"same");

    let (groups, _) = finder(&dir).find_duplicates(&[dir.path().join("data")]);
    let mut operator = console("");

    let err = Reviewer::new(locator(&dir))
        .review_all(groups, &mut operator)
        .unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
}
