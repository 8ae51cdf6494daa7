//! Error types for docstruct library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for docstruct operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while structuring a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The document source could not be opened.
    #[error("Cannot open document {path}: {reason}")]
    DocumentOpen {
        /// Path that was being opened
        path: PathBuf,
        /// Underlying reason
        reason: String,
    },

    /// The document dump is structurally invalid.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// A page could not be read from the document source.
    #[error("Page {page} extraction failed: {reason}")]
    PageExtraction {
        /// 1-indexed page number
        page: u32,
        /// Reason reported by the source
        reason: String,
    },

    /// Writing an output artifact failed.
    ///
    /// The temporary file is left in place; the destination is untouched.
    #[error("Failed to write {path}: {source}")]
    Write {
        /// Path being written (temporary or destination)
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Invalid page range specification.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Build a [`Error::Write`] for the given path.
    pub(crate) fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Write {
            path: path.into(),
            source,
        }
    }

    /// Whether this error reports a single unreadable page.
    ///
    /// Page failures are recoverable in lenient mode; everything else aborts.
    pub fn is_page_failure(&self) -> bool {
        matches!(self, Error::PageExtraction { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::PageExtraction {
            page: 12,
            reason: "missing".to_string(),
        };
        assert_eq!(err.to_string(), "Page 12 extraction failed: missing");

        let err = Error::DocumentOpen {
            path: PathBuf::from("spec.json"),
            reason: "not found".to_string(),
        };
        assert_eq!(err.to_string(), "Cannot open document spec.json: not found");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_write_error_keeps_source() {
        use std::error::Error as _;

        let err = Error::write(
            "out/toc.jsonl.tmp",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("out/toc.jsonl.tmp"));
        assert!(err.source().is_some());
        assert!(!err.is_page_failure());
    }
}
