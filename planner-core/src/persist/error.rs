//! Cache persistence error types.

use std::path::PathBuf;

/// Errors that can occur when saving or loading a persisted cache.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// Reading or writing the cache file failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON encoding or decoding failed
    #[error("JSON codec error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV encoding or decoding failed
    #[error("CSV codec error: {0}")]
    Csv(#[from] csv::Error),

    /// The records decoded but do not describe a valid cache
    #[error("invalid cache content: {0}")]
    Invalid(String),
}

impl PersistError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PersistError::Io {
            path: path.into(),
            source,
        }
    }
}
