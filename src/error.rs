/// Error types for the surveillance pipeline
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for loading and collaborator calls.
///
/// Only `InputMissing` and `InputUnreadable` ever escape the pipeline, and
/// even those are turned into a fallback snapshot before a reader sees them.
#[derive(Error, Debug)]
pub enum DataError {
    /// No spreadsheet with an accepted extension in the data directory
    #[error("No spreadsheet input found in {dir}")]
    InputMissing { dir: PathBuf },

    /// Every parsing engine failed on the selected file
    #[error("Unreadable spreadsheet {path}: {reason}")]
    InputUnreadable { path: PathBuf, reason: String },

    /// A single row could not be coerced; the row is dropped
    #[error("Malformed row: {0}")]
    RowMalformed(String),

    /// Filesystem access failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request to a collaborator failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A collaborator answered with something we could not use
    #[error("Failed to parse response: {0}")]
    ResponseParse(String),
}

/// Type alias for Results using DataError
pub type Result<T> = std::result::Result<T, DataError>;
