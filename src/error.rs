//! Process exit codes.
//!
//! Library failures are typed per stage (`ScanError`, `HashError`,
//! `QuarantineError`, `ManifestError`, `InputError`) and none of them ends
//! the run. The binary only distinguishes a normal finish from an error
//! that escaped `run_app`.

/// Exit codes for the DupManager application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// The run finished, whether or not duplicates were found.
    Success = 0,
    /// An unexpected error occurred (for example closed input).
    GeneralError = 1,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DM000",
            Self::GeneralError => "DM001",
        }
    }

    /// Line printed to stderr for an error that ended the run.
    #[must_use]
    pub fn describe(self, err: &anyhow::Error) -> String {
        format!("[{}] Error: {:#}", self.code_prefix(), err)
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        // Both variants fit in a u8
        Self::from(code.as_i32() as u8)
    }
}
