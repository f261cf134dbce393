use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the task store.
///
/// A missing task is not an error; store operations report it as `None`.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The caller supplied input the store refuses to accept.
    #[error("invalid input: {0}")]
    Validation(String),

    /// The task file could not be read or written.
    #[error("cannot access task file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The task file exists but does not hold a valid task collection.
    #[error("task file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn corrupt(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Corrupt {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
