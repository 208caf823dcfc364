//! Terminal operator.
//!
//! Reads answers line by line from any `BufRead` and writes prompts and
//! listings to any `Write`, so the same code runs against stdin/stdout in
//! the binary and against in-memory buffers in tests. Invalid answers are
//! explained and asked again; end of input ends the session with
//! [`io::ErrorKind::UnexpectedEof`].

use std::cell::RefCell;
use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use yansi::{Paint, Style};

use super::input::{parse_confirmation, parse_indices, parse_roots};
use super::Operator;
use crate::duplicates::HashGroup;
use crate::quarantine::{BatchQuarantineResult, QuarantineProgressCallback, Relocation};

const HEADING: Style = Style::new().bold();
const PATH: Style = Style::new().cyan();
const OK: Style = Style::new().green();
const WARN: Style = Style::new().yellow();
const FAIL: Style = Style::new().red();

/// Operator backed by a line reader and a writer.
pub struct ConsoleOperator<R, W> {
    reader: R,
    writer: RefCell<W>,
    color: bool,
}

impl<R: BufRead, W: Write> ConsoleOperator<R, W> {
    /// Create a console operator. Colour is on by default.
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer: RefCell::new(writer),
            color: true,
        }
    }

    /// Enable or disable colour.
    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Recover the writer, e.g. to inspect captured output.
    pub fn into_writer(self) -> W {
        self.writer.into_inner()
    }

    fn paint(&self, text: impl Display, style: Style) -> String {
        if self.color {
            text.paint(style).to_string()
        } else {
            text.to_string()
        }
    }

    fn say(&self, line: impl Display) -> io::Result<()> {
        writeln!(self.writer.borrow_mut(), "{line}")
    }

    /// Write a status line from a callback, which cannot return the error.
    fn report(&self, line: impl Display) {
        if let Err(e) = self.say(line) {
            log::warn!("Console output failed: {}", e);
        }
    }

    fn ask(&mut self, prompt: impl Display) -> io::Result<String> {
        {
            let mut writer = self.writer.borrow_mut();
            write!(writer, "{prompt}")?;
            writer.flush()?;
        }

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim_end_matches(['\n', '\r']).to_string())
    }

    fn member_line(&self, index: usize, path: &Path) -> String {
        format!("{index} -> : {}", self.paint(path.display(), PATH))
    }

    /// Print the reminder about online-only files.
    ///
    /// # Errors
    ///
    /// Returns an error if the writer fails.
    pub fn print_startup_notice(&self) -> io::Result<()> {
        self.say(self.paint(
            "Files kept only in cloud storage are skipped. Download them locally first to include them.",
            WARN,
        ))
    }

    /// Ask for the folders to scan until every listed folder exists.
    ///
    /// # Errors
    ///
    /// Returns an error if input ends or the writer fails.
    pub fn prompt_roots(&mut self) -> io::Result<Vec<PathBuf>> {
        loop {
            let line = self.ask("Enter folders to scan (comma separated): ")?;
            match parse_roots(&line) {
                Ok(roots) => return Ok(roots),
                Err(e) => self.say(Self::paint(self, e, FAIL))?,
            }
        }
    }

    /// Report how many files share their size with another file.
    ///
    /// # Errors
    ///
    /// Returns an error if the writer fails.
    pub fn print_size_candidates(&self, count: usize) -> io::Result<()> {
        self.say(format!("files: {count} with same size"))
    }

    /// Print the final number of duplicate cases.
    ///
    /// # Errors
    ///
    /// Returns an error if the writer fails.
    pub fn print_case_count(&self, count: usize) -> io::Result<()> {
        self.say(self.paint(format!("#Duplication cases: {count}"), HEADING))
    }
}

impl<R: BufRead, W: Write> Operator for ConsoleOperator<R, W> {
    fn present(&mut self, case_number: usize, group: &HashGroup) -> io::Result<()> {
        self.say("")?;
        self.say(Self::paint(self, format!("Case {case_number}:"), HEADING))?;
        self.say(format!("hash: {}", group.digest_hex()))?;
        for (i, path) in group.paths.iter().enumerate() {
            self.say(self.member_line(i, path))?;
        }
        Ok(())
    }

    fn select(&mut self, group: &HashGroup) -> io::Result<Vec<usize>> {
        loop {
            let line = self.ask("Rows to move to quarantine (comma separated, Enter to keep all): ")?;
            match parse_indices(&line, group.len()) {
                Ok(selection) => return Ok(selection),
                Err(e) => self.say(Self::paint(self, e, FAIL))?,
            }
        }
    }

    fn confirm(&mut self, group: &HashGroup, selection: &[usize]) -> io::Result<bool> {
        self.say("Selected:")?;
        for &i in selection {
            if let Some(path) = group.paths.get(i) {
                self.say(format!("  {}", self.member_line(i, path)))?;
            }
        }

        loop {
            let line = self.ask("Move these files to quarantine? (y/n): ")?;
            match parse_confirmation(&line) {
                Ok(Some(answer)) => return Ok(answer),
                Ok(None) => {}
                Err(e) => self.say(Self::paint(self, e, FAIL))?,
            }
        }
    }

    fn status_sink(&self) -> Option<&dyn QuarantineProgressCallback> {
        Some(self)
    }
}

impl<R: BufRead, W: Write> QuarantineProgressCallback for ConsoleOperator<R, W> {
    fn on_move_success(&self, relocation: &Relocation) {
        if let Some(ref created) = relocation.created_parent {
            self.report(format!("Destination folder created: {}", created.display()));
        }
        self.report(format!(
            "{} {} to {}",
            self.paint("File moved from", OK),
            relocation.source.display(),
            relocation.destination.display()
        ));
    }

    fn on_move_failure(&self, path: &Path, error: &str) {
        self.report(self.paint(format!("Failed: {}: {error}", path.display()), FAIL));
    }

    fn on_manifest_appended(&self, manifest: &Path) {
        self.report(format!("Paths appended to: {}", manifest.display()));
    }

    fn on_manifest_failure(&self, relocation: &Relocation, error: &str) {
        self.report(self.paint(
            format!("Moved but not recorded: {}: {error}", relocation.source.display()),
            FAIL,
        ));
    }

    fn on_complete(&self, result: &BatchQuarantineResult) {
        let style = if result.all_succeeded() { OK } else { WARN };
        self.report(self.paint(result.summary(), style));
    }
}
