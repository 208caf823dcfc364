//! Logging setup for the `dupmanager` binary.
//!
//! Library code only uses the `log` macros; this module installs the
//! `env_logger` backend. The level comes from, in priority order:
//!
//! 1. `RUST_LOG` (if set)
//! 2. `--quiet` (errors only) or `--verbose` (debug, trace when repeated)
//! 3. Default: info
//!
//! Debug builds prefix each line with a timestamp, and with the module path
//! when verbose. Release builds print the level and the message only.
//!
//! ```rust,no_run
//! use dupmanager::logging::init_logging;
//!
//! init_logging(1, false).expect("logger already installed");
//! log::debug!("visible with -v");
//! ```

use std::io::Write;

use env_logger::Builder;
use log::{LevelFilter, SetLoggerError};

/// Install the global logger.
///
/// # Errors
///
/// Returns an error if a logger has already been installed.
pub fn init_logging(verbose: u8, quiet: bool) -> Result<(), SetLoggerError> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let mut builder = build_logger(verbose, quiet, rust_log.as_deref());
    builder.try_init()?;

    match rust_log {
        Some(filters) => log::debug!("Logging configured from RUST_LOG={}", filters),
        None => log::debug!("Logging at level {}", determine_level(verbose, quiet)),
    }
    Ok(())
}

/// Build, but do not install, the logger for the given flags.
///
/// `rust_log` replaces the flag-derived level when present.
#[must_use]
pub fn build_logger(verbose: u8, quiet: bool, rust_log: Option<&str>) -> Builder {
    let mut builder = Builder::new();
    match rust_log {
        Some(filters) => {
            builder.parse_filters(filters);
        }
        None => {
            builder.filter_level(determine_level(verbose, quiet));
        }
    }
    configure_format(&mut builder, verbose);
    builder
}

/// Map the CLI flags to a level. `quiet` wins over `verbose`.
#[must_use]
pub fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    match (quiet, verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    }
}

#[cfg(debug_assertions)]
fn configure_format(builder: &mut Builder, verbose: u8) {
    builder.format(move |buf, record| {
        let level = record.level();
        let style = buf.default_level_style(level);
        let timestamp = buf.timestamp_seconds();

        if verbose > 0 {
            writeln!(
                buf,
                "{timestamp} {style}{level:<5}{style:#} [{}] {}",
                record.module_path().unwrap_or("unknown"),
                record.args()
            )
        } else {
            writeln!(buf, "{timestamp} {style}{level:<5}{style:#} {}", record.args())
        }
    });
}

#[cfg(not(debug_assertions))]
fn configure_format(builder: &mut Builder, _verbose: u8) {
    builder.format(|buf, record| {
        let level = record.level();
        let style = buf.default_level_style(level);
        writeln!(buf, "{style}{level:<5}{style:#} {}", record.args())
    });
}
