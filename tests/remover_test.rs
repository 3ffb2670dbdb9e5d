// These exercise real deletion, which a safe-mode build never performs
#![cfg(not(feature = "safe-mode"))]

use std::path::PathBuf;
use tempfile::TempDir;

use appdata_cleaner::cleaner::{PathRemover, RemovalMode};

fn write(dir: &std::path::Path, rel: &str, len: usize) -> PathBuf {
    let p = dir.join(rel);
    std::fs::create_dir_all(p.parent().unwrap()).unwrap();
    std::fs::write(&p, vec![0u8; len]).unwrap();
    p
}

#[test]
fn test_removes_files_and_trees() {
    let tmp = TempDir::new().unwrap();
    let file = write(tmp.path(), "single.conf", 100);
    write(tmp.path(), "tree/a", 200);
    write(tmp.path(), "tree/nested/.b", 300);
    let tree = tmp.path().join("tree");

    let report = PathRemover::new(RemovalMode::Delete).remove(&[file.clone(), tree.clone()]);

    assert!(report.fully_removed());
    assert_eq!(report.bytes_freed, 600);
    assert_eq!(report.removed, vec![file.clone(), tree.clone()]);
    assert!(!file.exists());
    assert!(!tree.exists());
}

#[test]
fn test_empty_path_aborts_everything() {
    let tmp = TempDir::new().unwrap();
    let file = write(tmp.path(), "keep.me", 10);

    let report = PathRemover::new(RemovalMode::Delete).remove(&[file.clone(), PathBuf::new()]);

    assert!(report.aborted);
    assert!(!report.fully_removed());
    assert_eq!(report.bytes_freed, 0);
    assert!(report.removed.is_empty());
    assert!(file.exists(), "nothing may be deleted when a path is empty");
}

#[test]
fn test_partial_failure_continues() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("already-gone");
    let present = write(tmp.path(), "present", 1000);

    let report =
        PathRemover::new(RemovalMode::Delete).remove(&[missing.clone(), present.clone()]);

    assert!(!report.fully_removed());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].path, missing);
    assert_eq!(report.removed, vec![present.clone()]);
    assert_eq!(report.bytes_freed, 1000);
    assert!(!present.exists());
}

#[test]
fn test_dry_run_never_deletes() {
    let tmp = TempDir::new().unwrap();
    let file = write(tmp.path(), "cache/blob", 4096);
    let dir = tmp.path().join("cache");

    let remover = PathRemover::new(RemovalMode::DryRun);
    assert_eq!(remover.mode(), RemovalMode::DryRun);
    let report = remover.remove(&[dir.clone()]);

    assert!(report.fully_removed());
    assert_eq!(report.bytes_freed, 4096);
    assert!(file.exists());
}

#[cfg(unix)]
#[test]
fn test_symlink_is_removed_not_followed() {
    let tmp = TempDir::new().unwrap();
    let target = write(tmp.path(), "real/data", 50);
    let link = tmp.path().join("link");
    std::os::unix::fs::symlink(tmp.path().join("real"), &link).unwrap();

    let report = PathRemover::new(RemovalMode::Delete).remove(&[link.clone()]);

    assert!(report.fully_removed());
    assert_eq!(report.bytes_freed, 0, "only the link went away");
    assert!(std::fs::symlink_metadata(&link).is_err());
    assert!(target.exists(), "link target must survive");
}

#[test]
fn test_parent_dir_path_is_refused() {
    let tmp = TempDir::new().unwrap();
    let keep = write(tmp.path(), "config/harbour-x/settings", 10);
    let sneaky = tmp.path().join("config/harbour-x/..");

    let report = PathRemover::new(RemovalMode::Delete).remove(&[sneaky.clone()]);

    assert!(!report.fully_removed());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].path, sneaky);
    assert_eq!(report.bytes_freed, 0);
    assert!(keep.exists());
}

#[test]
fn test_relative_path_is_refused() {
    let report = PathRemover::new(RemovalMode::Delete).remove(&[PathBuf::from(".")]);
    assert_eq!(report.failures.len(), 1);
    assert!(report.removed.is_empty());
}
