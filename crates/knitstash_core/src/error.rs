//! Error types for knitstash core.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for migration operations.
pub type MigrateResult<T> = Result<T, MigrateError>;

/// Errors that can occur while migrating a stash file.
///
/// Every variant is terminal for the run: there are no retries and no
/// partial persistence. The caller must not write the document back
/// once any of these has been returned.
#[derive(Debug, Error)]
pub enum MigrateError {
    /// The source file was missing when the backup rename was attempted.
    #[error("file not found: {path:?}")]
    FileNotFound {
        /// The path that was looked up.
        path: PathBuf,
    },

    /// Generic rename/read/write failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file content is not the structured data we expect.
    #[error("malformed document: {message}")]
    MalformedDocument {
        /// Description of what was malformed.
        message: String,
    },

    /// A required top-level field is absent.
    ///
    /// For `assignments` this is only raised after the legacy `usages`
    /// fallback has also come up empty.
    #[error("required field '{field}' not found in document")]
    MissingField {
        /// Name of the missing field.
        field: &'static str,
    },
}

impl MigrateError {
    /// Creates a file-not-found error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Creates a malformed-document error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedDocument {
            message: message.into(),
        }
    }

    /// Creates a missing-field error.
    #[must_use]
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField { field }
    }
}
