//! Path normalization utilities.
//!
//! Paths produced by the walker are absolute (relative roots are resolved
//! against the working directory without following symlinks) but keep the
//! exact bytes found on disk: every file operation uses them as they are.
//! Normalization only feeds comparison keys, so the same file reached twice
//! compares equal.
//!
//! # Background
//!
//! macOS uses NFD (Decomposed) normalization for file paths, while Windows
//! and Linux typically use NFC (Composed) normalization. The same visual
//! filename can therefore have different byte representations:
//!
//! - NFC: `café.txt` - 'é' is U+00E9 (single code point)
//! - NFD: `café.txt` - 'e' U+0065 + combining acute accent U+0301
//!
//! On top of that, Windows and default macOS volumes are case-insensitive,
//! which is why the re-visit guard in the size grouper works on
//! [`comparison_key`] rather than on raw paths.
//!
//! # Example
//!
//! ```
//! use dupmanager::scanner::path_utils::{comparison_key, normalize_path_str};
//! use std::path::Path;
//!
//! assert_eq!(normalize_path_str("cafe\u{0301}.txt"), "café.txt");
//! assert_eq!(
//!     comparison_key(Path::new("/Data/Café.TXT")),
//!     comparison_key(Path::new("/data/cafe\u{0301}.txt")),
//! );
//! ```

use std::io;
use std::path::{Path, PathBuf};
use unicode_normalization::UnicodeNormalization;

/// Normalize a path string to NFC (Composed) form.
#[must_use]
pub fn normalize_path_str(s: &str) -> String {
    s.nfc().collect()
}

/// Make a path absolute without touching its spelling.
///
/// Unlike [`std::fs::canonicalize`] this does not resolve symlinks or
/// produce `\\?\` verbatim prefixes on Windows, so the result still
/// shares its prefix with the volume root computed for quarantine
/// placement. Unicode form is left alone: on byte-named file systems an
/// NFD name and its NFC spelling are different files.
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined for a
/// relative path.
pub fn absolute_path(path: &Path) -> io::Result<PathBuf> {
    std::path::absolute(path)
}

/// Case-insensitive comparison key for a path.
///
/// NFC-normalized and lower-cased. Invalid UTF-8 is converted lossily.
#[must_use]
pub fn comparison_key(path: &Path) -> String {
    normalize_path_str(&path.to_string_lossy()).to_lowercase()
}

/// Check whether two paths name the same location, ignoring case and
/// Unicode normalization form.
#[must_use]
pub fn same_path_ignore_case(a: &Path, b: &Path) -> bool {
    comparison_key(a) == comparison_key(b)
}
