//! Stage progress, drawn with indicatif.
//!
//! Pipeline stages never print progress themselves. They report through a
//! [`ProgressCallback`] handed to them by the caller, and [`Progress`] turns
//! those reports into terminal output: a spinner with a running file count
//! while walking, and a bar of files hashed against same-size candidates
//! while hashing.

use std::sync::Mutex;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Phase name used while walking directories.
pub const PHASE_WALKING: &str = "walking";

/// Phase name used while computing content digests.
pub const PHASE_HASHING: &str = "hashing";

/// Receiver for stage progress.
///
/// Each stage calls `on_phase_start` once with its phase name and the
/// known total (0 while walking, where the total is not known up front),
/// then `on_progress` with a running 1-based count, then `on_phase_end`.
pub trait ProgressCallback: Send + Sync {
    /// A stage has started.
    fn on_phase_start(&self, phase: &str, total: usize);

    /// `current` items of the running stage are done; `path` is the latest.
    fn on_progress(&self, current: usize, path: &str);

    /// The running stage has finished.
    fn on_phase_end(&self, phase: &str);
}

/// Terminal progress display.
pub struct Progress {
    multi: MultiProgress,
    walking: Mutex<Option<ProgressBar>>,
    hashing: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl Progress {
    /// Create the display. With `quiet` every callback is a no-op.
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            multi: MultiProgress::new(),
            walking: Mutex::new(None),
            hashing: Mutex::new(None),
            quiet,
        }
    }

    fn walking_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}] files: {pos}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }

    fn hashing_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.green/blue}] SHA-256 Progress: {pos} of {len} {msg} (ETA: {eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }

    /// The bar of whichever phase is running, hashing first.
    fn with_active_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Some(ref pb) = *self.hashing.lock().unwrap() {
            f(pb);
        } else if let Some(ref pb) = *self.walking.lock().unwrap() {
            f(pb);
        }
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: &str, total: usize) {
        if self.quiet {
            return;
        }

        match phase {
            PHASE_WALKING => {
                let pb = self.multi.add(ProgressBar::new_spinner());
                pb.set_style(Self::walking_style());
                pb.set_message("Scanning");
                pb.enable_steady_tick(Duration::from_millis(100));
                *self.walking.lock().unwrap() = Some(pb);
            }
            PHASE_HASHING => {
                let pb = self.multi.add(ProgressBar::new(total as u64));
                pb.set_style(Self::hashing_style());
                *self.hashing.lock().unwrap() = Some(pb);
            }
            other => log::debug!("No progress display for phase '{}'", other),
        }
    }

    fn on_progress(&self, current: usize, path: &str) {
        if self.quiet {
            return;
        }

        let message = truncate_path(path, 30);
        self.with_active_bar(|pb| {
            pb.set_position(current as u64);
            pb.set_message(message);
        });
    }

    fn on_phase_end(&self, phase: &str) {
        if self.quiet {
            return;
        }

        match phase {
            PHASE_WALKING => {
                if let Some(pb) = self.walking.lock().unwrap().take() {
                    pb.finish_with_message("Scan complete");
                }
            }
            PHASE_HASHING => {
                if let Some(pb) = self.hashing.lock().unwrap().take() {
                    pb.finish_with_message("done");
                }
            }
            _ => {}
        }
    }
}

/// Truncate a path for display in the progress bar.
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }

    let file_name = std::path::Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let name_len = file_name.chars().count();
    if name_len + 4 > max_len {
        let tail: String = file_name
            .chars()
            .skip(name_len.saturating_sub(max_len.saturating_sub(3)))
            .collect();
        return format!("...{tail}");
    }

    format!(".../{file_name}")
}
