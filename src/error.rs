//! Structured error handling and exit codes.

use serde::Serialize;

use crate::config::ConfigError;
use crate::duplicates::FinderError;
use crate::logging::LoggingError;
use crate::output::json::JsonOutputError;

/// Exit codes for the duplicatefile application.
///
/// Values follow the BSD sysexits convention:
/// - 0: Success (scan completed, with or without duplicates)
/// - 1: General error (unexpected failure)
/// - 64: Usage error (root path missing, not a folder, or unreadable)
/// - 73: Cannot create output (dump or log file)
/// - 78: Configuration error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: Scan completed.
    Success = 0,
    /// General error: An unexpected error occurred.
    GeneralError = 1,
    /// Usage: The directory to check is invalid.
    Usage = 64,
    /// Cannot create: The dump or log file could not be written.
    CantCreate = 73,
    /// Config: The configuration is invalid.
    Config = 78,
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
            Self::Success => "DF000",
            Self::GeneralError => "DF001",
            Self::Usage => "DF064",
            Self::CantCreate => "DF073",
            Self::Config => "DF078",
        }
    }

    /// Pick the exit code for an application error.
    #[must_use]
    pub fn from_error(err: &anyhow::Error) -> Self {
        if err.downcast_ref::<FinderError>().is_some() {
            Self::Usage
        } else if err.downcast_ref::<ConfigError>().is_some() {
            Self::Config
        } else if err.downcast_ref::<JsonOutputError>().is_some()
            || err.downcast_ref::<LoggingError>().is_some()
        {
            Self::CantCreate
        } else {
            Self::GeneralError
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "DF064")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{:#}", err),
        }
    }
}
