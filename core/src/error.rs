use std::path::PathBuf;
use thiserror::Error;

/// Fatal failures while building an index. Documents with unusable names
/// are reported and skipped instead of surfacing here.
#[derive(Error, Debug)]
pub enum Error {
    /// File list unreadable.
    #[error("cannot read file list {path}: {source}")]
    Manifest {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Document could not be stat'd.
    #[error("cannot stat document {path}: {source}")]
    Stat {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Document could not be read.
    #[error("cannot read document {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for index-building operations.
pub type Result<T> = std::result::Result<T, Error>;
