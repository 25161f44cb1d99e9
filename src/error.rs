use std::path::PathBuf;

/// Errors that can occur in fusebreak.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid parameter: {0}")]
    Parameter(String),

    #[error("I/O error: {source} ({path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    /// Malformed or internally inconsistent input record.
    #[error("format error: {0}")]
    Format(String),

    /// A component was paired with a transcript it does not belong to.
    #[error("reconciliation error: {0}")]
    Reconciliation(String),

    #[error("alignment error: {0}")]
    Alignment(String),

    #[error("JSON error: {source} ({path})")]
    Json {
        source: serde_json::Error,
        path: PathBuf,
    },
}

impl Error {
    /// Convenience for wrapping an `io::Error` with a path context.
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            source,
            path: path.into(),
        }
    }

    pub fn json(source: serde_json::Error, path: impl Into<PathBuf>) -> Self {
        Self::Json {
            source,
            path: path.into(),
        }
    }

    /// True for errors that only invalidate the current record.
    pub fn is_record_level(&self) -> bool {
        matches!(self, Self::Format(_))
    }
}
