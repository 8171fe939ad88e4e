//! Core error type for pack inspection and reconciliation.

use std::path::PathBuf;

/// Errors surfaced by the freshness inspector and compilation orchestrator.
///
/// Structural problems *inside* a recognized pack (malformed mirrors,
/// unreadable sources) are reported as freshness states, never as errors.
/// Only calling into a directory that is not a pack at all, operational I/O
/// failures during mutation, and item compiler failures reach this type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("not a knowledge pack: {} (missing or invalid index.md)", .0.display())]
    NotAPack(PathBuf),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("compiling {item}: {source}")]
    Compile {
        item: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
