//! DupManager - duplicate finder with quarantine
//!
//! Entry point for the `dupmanager` binary.

use clap::Parser;
use dupmanager::{cli::Cli, error::ExitCode};

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    match dupmanager::run_app(cli) {
        Ok(code) => code.into(),
        Err(err) => {
            let code = ExitCode::GeneralError;
            eprintln!("{}", code.describe(&err));
            code.into()
        }
    }
}
