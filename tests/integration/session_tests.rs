use std::io::Cursor;

use dupmanager::config::Config;
use dupmanager::review::ConsoleOperator;
use dupmanager::scanner::ExclusionRules;
use dupmanager::{run_session, SessionOptions};
use tempfile::TempDir;

use super::common::{locator, quarantine, write};

fn options(dir: &TempDir) -> SessionOptions {
    SessionOptions {
        config: Config {
            show_progress: false,
            ..Config::default()
        },
        quiet: true,
        locator: locator(dir),
        rules: ExclusionRules::new(Vec::new()),
    }
}

#[test]
fn test_full_session() {
    let dir = TempDir::new().unwrap();
    let a = write(dir.path(), "one/a.txt", b"duplicate");
    let b = write(dir.path(), "two/b.txt", b"duplicate");
    write(dir.path(), "two/c.txt", b"different");

    let input = format!(
        "{}\n{} , {}\n1\ny\n",
        dir.path().join("missing").display(),
        dir.path().join("one").display(),
        dir.path().join("two").display()
    );
    let mut operator =
        ConsoleOperator::new(Cursor::new(input.into_bytes()), Vec::new()).with_color(false);

    let summary = run_session(&mut operator, options(&dir)).unwrap();

    assert_eq!(summary.cases, 1);
    assert_eq!(summary.moved, 1);
    assert!(a.exists());
    assert!(!b.exists());
    assert!(quarantine(&dir).join("two/b.txt").exists());

    let output = String::from_utf8(operator.into_writer()).unwrap();
    assert!(output.contains("cloud storage"));
    assert!(output.contains(&format!("Not exist: {}", dir.path().join("missing").display())));
    assert!(output.contains("files: 3 with same size"));
    assert!(output.contains("Case 1:"));
    assert!(output.ends_with("#Duplication cases: 1\n"));
}

#[test]
fn test_session_without_duplicates() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "data/only.txt", b"alone");

    let input = format!("{}\n", dir.path().join("data").display());
    let mut operator =
        ConsoleOperator::new(Cursor::new(input.into_bytes()), Vec::new()).with_color(false);

    let summary = run_session(&mut operator, options(&dir)).unwrap();

    assert_eq!(summary.cases, 0);
    let output = String::from_utf8(operator.into_writer()).unwrap();
    assert!(output.contains("files: 0 with same size"));
    assert!(output.ends_with("#Duplication cases: 0\n"));
}

#[test]
fn test_session_ends_when_input_closes() {
    let dir = TempDir::new().unwrap();
    let mut operator = ConsoleOperator::new(Cursor::new(Vec::new()), Vec::new()).with_color(false);

    let err = run_session(&mut operator, options(&dir)).unwrap_err();
    assert!(format!("{err:#}").contains("input closed"));
}

#[test]
fn test_quiet_session_with_progress_configured() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "data/a", b"same");
    write(dir.path(), "data/b", b"same");

    let mut options = options(&dir);
    options.config.show_progress = true;
    let input = format!("{}\n\n", dir.path().join("data").display());
    let mut operator =
        ConsoleOperator::new(Cursor::new(input.into_bytes()), Vec::new()).with_color(false);

    let summary = run_session(&mut operator, options).unwrap();

    assert_eq!(summary.cases, 1);
    assert_eq!(summary.skipped, 1);
}
