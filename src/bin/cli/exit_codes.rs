//! Exit codes for the CLI tool.

use crate::output::FileReport;

/// Every input was converted or skipped
pub const SUCCESS: i32 = 0;
/// At least one conversion failed, or the arguments were unusable
pub const FAILURE: i32 = 1;
/// Ctrl+C (128 + SIGINT)
pub const USER_INTERRUPT: i32 = 130;

/// Exit code enum for structured handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success,
    Failure,
}

impl ExitCode {
    /// Returns the numeric exit code
    pub fn code(self) -> i32 {
        match self {
            Self::Success => SUCCESS,
            Self::Failure => FAILURE,
        }
    }

    /// Skipped inputs are not failures; only a failed conversion is.
    pub fn for_reports(reports: &[FileReport]) -> Self {
        if reports
            .iter()
            .any(|r| matches!(r, FileReport::Failed { .. }))
        {
            Self::Failure
        } else {
            Self::Success
        }
    }
}
