//! Command-line interface definitions for DupManager.
//!
//! The program is interactive: folders, row selections and confirmations
//! are all asked for on the terminal. The command line only tunes the
//! ambient behaviour (log verbosity and colour).
//!
//! ```bash
//! # Normal interactive run
//! dupmanager
//!
//! # Debug logging, no colours
//! dupmanager -v --no-color
//! ```

use clap::Parser;

/// Find duplicate files and move selected copies into a per-volume
/// quarantine folder instead of deleting them.
#[derive(Debug, Parser)]
#[command(name = "dupmanager")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors and hide progress bars
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,
}
