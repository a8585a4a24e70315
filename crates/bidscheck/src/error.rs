//! Error types for the bidscheck library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for bidscheck operations.
///
/// Problems with individual dataset files never show up here: the pipeline
/// records them as [`Issue`](crate::Issue)s. These variants are reserved for
/// failures that stop a run before it produces a report.
#[derive(Debug, Error)]
pub enum BidsError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The tree failed the quick structural test.
    #[error("Not a BIDS dataset: no NIfTI images found under sub-*/[ses-*/]{{anat,func,dwi}}")]
    NotBids,

    /// NIfTI header could not be decoded.
    #[error("Invalid NIfTI header: {0}")]
    NiftiHeader(String),

    /// Worker pool could not be created.
    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}

/// Result type alias for bidscheck operations.
pub type Result<T> = std::result::Result<T, BidsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_names_path() {
        let err = BidsError::Io {
            path: PathBuf::from("/data/ds001"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(err.to_string(), "IO error for '/data/ds001': missing");
    }

    #[test]
    fn test_run_level_messages() {
        assert!(BidsError::NotBids.to_string().starts_with("Not a BIDS dataset"));
        assert_eq!(
            BidsError::ThreadPool("no threads".to_string()).to_string(),
            "Thread pool error: no threads"
        );
        assert_eq!(
            BidsError::NiftiHeader("short".to_string()).to_string(),
            "Invalid NIfTI header: short"
        );
    }
}
