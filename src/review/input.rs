//! Parsing and validation of operator input.
//!
//! The console loops in [`super::console`] keep asking until one of these
//! parsers accepts a line, so every function here takes the raw line and
//! either returns the finished value or an [`InputError`] to show before
//! asking again.

use std::path::PathBuf;

/// Why a line of operator input was rejected.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// No root paths were given.
    #[error("Enter at least one folder")]
    NoRoots,

    /// A listed root does not exist.
    #[error("Not exist: {0}")]
    NotExist(PathBuf),

    /// A row token is not a non-negative integer.
    #[error("Not a row number: {0}")]
    NotANumber(String),

    /// A row number is outside the group.
    #[error("Row {index} is out of range (0 to {max})")]
    OutOfRange {
        /// The rejected row
        index: usize,
        /// Highest valid row
        max: usize,
    },

    /// The confirmation was neither `y` nor `n`.
    #[error("Invalid input. Please enter 'y' or 'n'.")]
    InvalidConfirmation,
}

/// Parse a comma-separated list of root folders.
///
/// Entries are trimmed and empty entries dropped. Every remaining entry
/// must exist on disk.
///
/// # Errors
///
/// [`InputError::NoRoots`] for an empty list, [`InputError::NotExist`] for
/// the first entry that does not exist.
///
/// # Example
///
/// ```
/// use dupmanager::review::parse_roots;
///
/// let dir = std::env::temp_dir();
/// let line = format!(" {} , ", dir.display());
/// assert_eq!(parse_roots(&line).unwrap().len(), 1);
/// ```
pub fn parse_roots(line: &str) -> Result<Vec<PathBuf>, InputError> {
    let roots: Vec<PathBuf> = line
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect();

    if roots.is_empty() {
        return Err(InputError::NoRoots);
    }

    if let Some(missing) = roots.iter().find(|p| !p.exists()) {
        return Err(InputError::NotExist(missing.clone()));
    }

    Ok(roots)
}

/// Parse a row selection for a group of `len` files.
///
/// Rows are separated by commas and/or whitespace. A repeated row is kept
/// once, at its first position. An empty line is an empty selection.
///
/// # Errors
///
/// [`InputError::NotANumber`] or [`InputError::OutOfRange`] for the first
/// bad token.
///
/// # Example
///
/// ```
/// use dupmanager::review::parse_indices;
///
/// assert_eq!(parse_indices("2, 0 2", 3).unwrap(), vec![2, 0]);
/// assert!(parse_indices("3", 3).is_err());
/// ```
pub fn parse_indices(line: &str, len: usize) -> Result<Vec<usize>, InputError> {
    let mut selection = Vec::new();

    for token in line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        let index: usize = token
            .parse()
            .map_err(|_| InputError::NotANumber(token.to_string()))?;
        if index >= len {
            return Err(InputError::OutOfRange {
                index,
                max: len.saturating_sub(1),
            });
        }
        if !selection.contains(&index) {
            selection.push(index);
        }
    }

    Ok(selection)
}

/// Parse a yes/no confirmation.
///
/// Returns `Ok(None)` for a blank line, which is asked again without a
/// message.
///
/// # Errors
///
/// [`InputError::InvalidConfirmation`] for anything other than a single
/// `y` or `n` (either case).
pub fn parse_confirmation(line: &str) -> Result<Option<bool>, InputError> {
    let token = line.trim();
    if token.is_empty() {
        return Ok(None);
    }

    let mut chars = token.chars();
    let answer = match (chars.next(), chars.next()) {
        (Some(c), None) => c.to_ascii_lowercase(),
        _ => return Err(InputError::InvalidConfirmation),
    };

    match answer {
        'y' => Ok(Some(true)),
        'n' => Ok(Some(false)),
        _ => Err(InputError::InvalidConfirmation),
    }
}
