//! Storage error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors specific to the filesystem store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Keys become file names, so only a safe character set is allowed.
    #[error("invalid storage key \"{0}\": use letters, digits, '-' or '_'")]
    InvalidKey(String),

    /// The data directory path exists but is not a directory.
    #[error("data path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
}
