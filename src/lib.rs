//! DupManager - duplicate finder with quarantine
//!
//! Finds files with identical content across operator-chosen folders and
//! moves the copies the operator selects into a per-volume quarantine
//! folder, recording every move in an audit manifest. Nothing is deleted.
//!
//! The pipeline runs one stage at a time:
//!
//! 1. [`scanner`]: walk the roots, skipping system, trash, quarantine,
//!    hidden, online-only and shortcut entries
//! 2. [`duplicates`]: group by size, then by SHA-256 within each size
//! 3. [`review`]: present each duplicate group, then move the confirmed
//!    selection with [`quarantine`]

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod progress;
pub mod quarantine;
pub mod review;
pub mod scanner;

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Context;

use crate::cli::Cli;
use crate::config::Config;
use crate::duplicates::{DuplicateFinder, FinderConfig};
use crate::error::ExitCode;
use crate::progress::Progress;
use crate::quarantine::{MountPointLocator, VolumeLocator};
use crate::review::{ConsoleOperator, ReviewSummary, Reviewer};
use crate::scanner::ExclusionRules;

/// Everything a session needs besides the operator.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Runtime tunables
    pub config: Config,
    /// Hide progress bars regardless of `config`
    pub quiet: bool,
    /// Volume resolution for quarantine placement
    pub locator: Arc<dyn VolumeLocator>,
    /// Exclusion rules for the walk
    pub rules: ExclusionRules,
}

impl SessionOptions {
    /// Options for the running host.
    #[must_use]
    pub fn for_host(config: Config, quiet: bool) -> Self {
        Self {
            config,
            quiet,
            locator: Arc::new(MountPointLocator),
            rules: ExclusionRules::for_host(),
        }
    }
}

/// Run one interactive session: ask for roots, scan, review every group.
///
/// # Errors
///
/// Returns an error if the operator's input ends or output cannot be
/// written. Moves already made are kept.
pub fn run_session<R: BufRead, W: Write>(
    operator: &mut ConsoleOperator<R, W>,
    options: SessionOptions,
) -> anyhow::Result<ReviewSummary> {
    operator.print_startup_notice()?;
    let roots = operator
        .prompt_roots()
        .context("No folders to scan")?;
    log::info!("Scanning {} folder(s)", roots.len());

    let mut finder_config = FinderConfig::default()
        .with_chunk_size(options.config.chunk_size)
        .with_rules(options.rules)
        .with_locator(options.locator.clone());
    if options.config.show_progress {
        finder_config = finder_config.with_progress_callback(Arc::new(Progress::new(options.quiet)));
    }

    let (groups, summary) = DuplicateFinder::new(finder_config).find_duplicates(&roots);
    for error in &summary.scan_errors {
        log::debug!("Walk error: {}", error);
    }
    operator.print_size_candidates(summary.size_candidates)?;

    let cases = groups.len();
    let review = Reviewer::new(options.locator)
        .review_all(groups, operator)
        .context("Review stopped")?;
    operator.print_case_count(cases)?;

    Ok(review)
}

/// Entry point used by the binary.
///
/// # Errors
///
/// Propagates errors from [`run_session`].
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    if let Err(e) = logging::init_logging(cli.verbose, cli.quiet) {
        eprintln!("Logging unavailable: {e}");
    }
    if cli.no_color {
        yansi::disable();
    }

    let config = Config::load();
    log::debug!("Configuration: {:?}", config);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut operator = ConsoleOperator::new(stdin.lock(), stdout.lock()).with_color(!cli.no_color);

    let summary = run_session(&mut operator, SessionOptions::for_host(config, cli.quiet))?;
    log::debug!("Session summary: {:?}", summary);

    Ok(ExitCode::Success)
}
