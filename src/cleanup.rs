//! Removal of source subdirectories once their files have been moved out.
use crate::error::{OrganizeError, OrganizeResult};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::{info, warn};

/// What the cleanup phase did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    /// Directories deleted by this phase, in deletion order.
    pub removed: Vec<PathBuf>,
    /// Directories that no longer existed when their turn came.
    pub already_gone: Vec<PathBuf>,
}

/// Orders directories longest path first so children come before parents.
///
/// The sort is stable: paths of equal length keep their scan order.
pub fn deletion_order(subdirs: &[PathBuf]) -> Vec<PathBuf> {
    let mut ordered = subdirs.to_vec();
    ordered.sort_by_key(|dir| std::cmp::Reverse(dir.as_os_str().len()));
    ordered
}

/// Recursively deletes every directory in `subdirs`, deepest first.
///
/// A directory that is already gone is recorded and skipped. Any other failure
/// stops the phase; directories removed before it stay removed.
pub fn remove_empty_dirs(subdirs: &[PathBuf]) -> OrganizeResult<CleanupReport> {
    let mut report = CleanupReport::default();

    for dir in deletion_order(subdirs) {
        match fs::remove_dir_all(&dir) {
            Ok(()) => {
                info!(path = %dir.display(), "removed directory");
                report.removed.push(dir);
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(path = %dir.display(), "directory already removed");
                report.already_gone.push(dir);
            }
            Err(e) => return Err(OrganizeError::from_io(&dir, e)),
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    #[test]
    fn test_deletion_order_is_deepest_first() {
        let subdirs = vec![
            PathBuf::from("a"),
            PathBuf::from("a/b"),
            PathBuf::from("a/b/c"),
        ];
        assert_eq!(
            deletion_order(&subdirs),
            vec![
                PathBuf::from("a/b/c"),
                PathBuf::from("a/b"),
                PathBuf::from("a"),
            ]
        );
    }

    #[test]
    fn test_remove_nested_directories() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("a/b/c")).unwrap();
        fs::create_dir_all(root.join("x")).unwrap();

        let subdirs = vec![
            root.join("a"),
            root.join("a/b"),
            root.join("a/b/c"),
            root.join("x"),
        ];
        let report = remove_empty_dirs(&subdirs).unwrap();

        assert_eq!(
            report.removed,
            vec![root.join("a/b/c"), root.join("a/b"), root.join("a"), root.join("x")]
        );
        assert!(report.already_gone.is_empty());
        assert_eq!(fs::read_dir(root).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_directory_is_not_fatal() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir(root.join("present")).unwrap();

        let subdirs = vec![root.join("gone"), root.join("present")];
        let report = remove_empty_dirs(&subdirs).unwrap();

        assert_eq!(report.removed, vec![root.join("present")]);
        assert_eq!(report.already_gone, vec![root.join("gone")]);
    }

    #[test]
    fn test_leftover_contents_are_deleted() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("old");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("leftover"), b"x").unwrap();

        remove_empty_dirs(&[dir.clone()]).unwrap();
        assert!(!Path::new(&dir).exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_other_failure_halts_and_keeps_earlier_removals() {
        use crate::error::ErrorKind;
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("deep/nested/dir")).unwrap();
        fs::create_dir_all(root.join("z")).unwrap();
        let locked = root.join("locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("keep"), b"x").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

        // Permission bits do not bind root.
        if fs::File::create(locked.join("write_check")).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let subdirs = vec![root.join("z"), locked.clone(), root.join("deep/nested/dir")];
        let result = remove_empty_dirs(&subdirs);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
        assert!(!root.join("deep/nested/dir").exists());
        assert!(root.join("deep/nested").is_dir());
        assert!(locked.join("keep").exists());
        assert!(root.join("z").is_dir());
    }
}
