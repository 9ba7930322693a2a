//! Error types for counter acquisition.
//!
//! The adapters in [`crate::system`] and [`crate::process`] return these;
//! the [`crate::source::CounterSource`] implementation turns them into
//! zero samples or skipped entities so a single bad read never ends a cycle.

/// Errors that can occur when reading counters from procfs.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Failed to read a procfs file (missing, permission denied, process gone).
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    /// A procfs record did not have the expected shape.
    #[error("failed to parse {path}: {detail}")]
    Parse { path: String, detail: String },
}

impl SourceError {
    pub fn parse(path: impl Into<String>, detail: impl Into<String>) -> Self {
        SourceError::Parse {
            path: path.into(),
            detail: detail.into(),
        }
    }

    /// True when the underlying file simply does not exist anymore.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            SourceError::Read { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}

/// Reads a procfs file into a string, mapping the I/O error to [`SourceError::Read`].
pub fn read_proc_file(path: &std::path::Path) -> Result<String, SourceError> {
    std::fs::read_to_string(path).map_err(|source| SourceError::Read {
        path: path.display().to_string(),
        source,
    })
}
