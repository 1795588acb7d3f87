use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes let schedulers and CI jobs tell a rejected invocation apart
/// from a run that failed part-way through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// The pipeline ran to completion (possibly with degraded sources)
    Success = 0,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Fatal pipeline error (unexpected failure in the driver, output I/O, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Application-specific errors for the analysis pipeline.
///
/// Most upstream failures never surface as errors at all: they are replaced
/// by documented defaults close to the call site. The variants below are the
/// ones that cross a component boundary.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("Warehouse command `bq {command}` failed with status {status}\nDetails: {stderr}\n\n💡 Hint: Check that the bq CLI is installed and authenticated (`gcloud auth login`)")]
    WarehouseCommand {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("Failed to parse warehouse output for `bq {command}`\nDetails: {details}")]
    WarehouseOutput { command: String, details: String },

    #[error("Warehouse query declined: {reason}\n\n💡 Hint: Re-run with --yes to approve the estimated cost non-interactively")]
    CostDeclined { reason: String },

    #[error("Failed to write cache file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the cache directory is writable")]
    CacheWriteError { path: PathBuf, details: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    #[error("Invalid configuration: {message}\n\n💡 Hint: {hint}")]
    InvalidConfig { message: String, hint: String },

    /// Validation error for domain value objects
    #[error("Validation error: {message}")]
    Validation { message: String },
}
