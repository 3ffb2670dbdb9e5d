use std::path::{Component, Path, PathBuf};

/// Paths that must NEVER be deleted under any circumstances.
/// This is a safety net against bad registry entries or config.
const PROTECTED_PATHS: &[&str] = &[
    "/", "/bin", "/boot", "/dev", "/etc", "/home", "/lib", "/lib64", "/opt", "/proc", "/root",
    "/run", "/sbin", "/srv", "/sys", "/tmp", "/usr", "/usr/share", "/var",
];

/// Paths under home that must never be deleted entirely
const PROTECTED_HOME_DIRS: &[&str] = &[
    "", // home dir itself
    ".config",
    ".cache",
    ".local",
    ".local/share",
    ".ssh",
    ".gnupg",
    "Desktop",
    "Documents",
    "Downloads",
    "Pictures",
    "Music",
    "Videos",
];

/// Check if a path is protected and should NEVER be deleted
pub fn is_protected(path: &Path) -> bool {
    // Only plain absolute paths can be compared against the list; a relative
    // path or one with `..` may resolve to anything
    if !path.is_absolute() || path.components().any(|c| c == Component::ParentDir) {
        return true;
    }

    let path = strip_trailing_separators(path);

    if PROTECTED_PATHS.iter().any(|p| path == Path::new(p)) {
        return true;
    }

    if let Some(home) = dirs::home_dir() {
        for dir in PROTECTED_HOME_DIRS {
            let protected_path = if dir.is_empty() {
                home.clone()
            } else {
                home.join(dir)
            };
            if path == protected_path {
                return true;
            }
        }
    }

    // The XDG base directories themselves, wherever they point
    [dirs::config_dir(), dirs::cache_dir(), dirs::data_dir()]
        .into_iter()
        .flatten()
        .any(|base| path == base)
}

fn strip_trailing_separators(path: &Path) -> PathBuf {
    // `Path` equality already ignores a trailing '/', but "//" style roots do not
    let s = path.to_string_lossy();
    let trimmed = s.trim_end_matches('/');
    if trimmed.is_empty() && !s.is_empty() {
        PathBuf::from("/")
    } else {
        PathBuf::from(trimmed)
    }
}
