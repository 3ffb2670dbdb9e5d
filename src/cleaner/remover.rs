use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

use crate::common::errors::{CleanerError, Result};
use crate::common::safety;
use crate::scanner::measure;

/// Remove mode determines whether paths are actually deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalMode {
    /// Permanent removal, no undo
    Delete,
    /// Measure and log what would be removed without touching anything
    DryRun,
}

impl Default for RemovalMode {
    fn default() -> Self {
        if cfg!(feature = "safe-mode") {
            RemovalMode::DryRun
        } else {
            RemovalMode::Delete
        }
    }
}

impl std::fmt::Display for RemovalMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemovalMode::Delete => write!(f, "delete"),
            RemovalMode::DryRun => write!(f, "dry_run"),
        }
    }
}

/// A path that could not be removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Report from a remove call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalReport {
    pub bytes_freed: u64,
    pub removed: Vec<PathBuf>,
    pub failures: Vec<RemovalFailure>,
    /// Set when the call was refused up front and nothing was attempted
    pub aborted: bool,
}

impl RemovalReport {
    /// Every path went away (or would have, in dry-run mode)
    pub fn fully_removed(&self) -> bool {
        !self.aborted && self.failures.is_empty()
    }
}

/// Deletes files and directory trees, one path at a time
#[derive(Debug, Clone, Copy, Default)]
pub struct PathRemover {
    mode: RemovalMode,
}

impl PathRemover {
    /// A `safe-mode` build always measures only, whatever mode is asked for
    pub fn new(mode: RemovalMode) -> Self {
        if cfg!(feature = "safe-mode") && mode == RemovalMode::Delete {
            debug!("safe-mode build: deletion requested, running dry");
            return PathRemover {
                mode: RemovalMode::DryRun,
            };
        }
        PathRemover { mode }
    }

    pub fn mode(&self) -> RemovalMode {
        self.mode
    }

    /// Remove every path, continuing past individual failures.
    ///
    /// If any path is empty the whole call is refused before touching the
    /// filesystem: an empty path is never a valid target.
    pub fn remove(&self, paths: &[PathBuf]) -> RemovalReport {
        let mut report = RemovalReport::default();

        if paths.iter().any(|p| p.as_os_str().is_empty()) {
            error!("One of provided paths is empty, refusing to remove anything");
            report.aborted = true;
            return report;
        }

        for path in paths {
            if safety::is_protected(path) {
                let e = CleanerError::Protected { path: path.clone() };
                warn!("Error deleting '{}': {}", path.display(), e);
                report.failures.push(RemovalFailure {
                    path: path.clone(),
                    reason: e.to_string(),
                });
                continue;
            }

            let size = measure(path);

            if self.mode == RemovalMode::DryRun {
                debug!("Dry run: would delete {} bytes '{}'", size, path.display());
                report.bytes_freed += size;
                report.removed.push(path.clone());
                continue;
            }

            match remove_path(path) {
                Ok(()) => {
                    debug!("Deleted {} bytes '{}'", size, path.display());
                    report.bytes_freed += size;
                    report.removed.push(path.clone());
                }
                Err(e) => {
                    warn!("Error deleting '{}': {}", path.display(), e);
                    report.failures.push(RemovalFailure {
                        path: path.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        report
    }
}

/// Delete a single file or directory permanently
fn remove_path(path: &Path) -> Result<()> {
    let metadata =
        std::fs::symlink_metadata(path).map_err(|e| CleanerError::io(path, e))?;

    if metadata.is_dir() {
        std::fs::remove_dir_all(path).map_err(|e| CleanerError::io(path, e))
    } else if metadata.is_file() || metadata.file_type().is_symlink() {
        std::fs::remove_file(path).map_err(|e| CleanerError::io(path, e))
    } else {
        Err(CleanerError::NotRemovable {
            path: path.to_path_buf(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_mode_follows_feature() {
        let expected = if cfg!(feature = "safe-mode") {
            RemovalMode::DryRun
        } else {
            RemovalMode::Delete
        };
        assert_eq!(RemovalMode::default(), expected);
    }

    #[test]
    fn test_protected_path_is_a_failure() {
        let report = PathRemover::new(RemovalMode::Delete).remove(&[PathBuf::from("/")]);
        assert!(!report.fully_removed());
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].reason.contains("protected"));
    }

    #[test]
    fn test_protected_path_fails_in_dry_run_too() {
        let report = PathRemover::new(RemovalMode::DryRun).remove(&[PathBuf::from("/usr/..")]);
        assert_eq!(report.failures.len(), 1);
        assert!(report.removed.is_empty());
    }

    #[cfg(feature = "safe-mode")]
    #[test]
    fn test_safe_mode_never_deletes() {
        let tmp = TempDir::new().unwrap();
        let f = tmp.path().join("keep.conf");
        std::fs::write(&f, "data").unwrap();

        let remover = PathRemover::new(RemovalMode::Delete);
        assert_eq!(remover.mode(), RemovalMode::DryRun);
        let report = remover.remove(&[f.clone()]);

        assert!(report.fully_removed());
        assert_eq!(report.bytes_freed, 4);
        assert!(f.exists());
    }

    #[cfg(not(feature = "safe-mode"))]
    #[test]
    fn test_missing_path_fails() {
        let tmp = TempDir::new().unwrap();
        let report =
            PathRemover::new(RemovalMode::Delete).remove(&[tmp.path().join("vanished")]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.bytes_freed, 0);
    }
}
