use std::path::PathBuf;

use thiserror::Error;

/// Shared `Result` alias for library operations.
pub type Result<T> = std::result::Result<T, CleanerError>;

/// Typed errors for cleaner operations.
/// The CLI uses `anyhow` at the top level; these let modules be precise
/// about what failed and where.
#[derive(Debug, Error)]
pub enum CleanerError {
    /// File system operation failed
    #[error("I/O error at '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Path is on the never-delete list
    #[error("refusing to remove protected path '{}'", path.display())]
    Protected { path: PathBuf },

    /// Path is neither a regular file nor a directory (or already gone)
    #[error("not a file or directory: '{}'", path.display())]
    NotRemovable { path: PathBuf },

    /// Exclude pattern could not be compiled
    #[error("invalid exclude pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },

    /// The coordinator worker thread is no longer running
    #[error("coordinator worker has shut down")]
    WorkerGone,

    /// Thread or runtime setup failed
    #[error("runtime failure: {details}")]
    Runtime { details: String },
}

impl CleanerError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CleanerError::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display_includes_path() {
        let err = CleanerError::io(
            "/tmp/missing",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/tmp/missing"));
        assert!(msg.contains("gone"));
    }

    #[test]
    fn test_protected_display() {
        let err = CleanerError::Protected {
            path: PathBuf::from("/"),
        };
        assert_eq!(err.to_string(), "refusing to remove protected path '/'");
    }
}
