use std::path::Path;
use walkdir::WalkDir;

/// Byte size of a path.
///
/// Directories sum the logical size of every regular file below them, hidden
/// files included. A regular file is its own length. Symlinks are never
/// followed, so a link measures 0 even when `path` itself is one: removing it
/// frees only the link. Anything else, including a path that vanished
/// mid-scan, measures as 0.
pub fn measure(path: &Path) -> u64 {
    let metadata = match std::fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(_) => return 0,
    };

    if metadata.is_dir() {
        dir_size(path)
    } else if metadata.is_file() {
        metadata.len()
    } else {
        0
    }
}

/// Calculate total size of a directory
fn dir_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.metadata().map(|m| m.len()).unwrap_or(0))
        .sum()
}
