//! Recursive directory scanning.
//!
//! The scanner walks a root directory depth-first and splits what it finds into
//! plain files and subdirectories. Directories matching a skip predicate are not
//! entered and not reported, which keeps category folders from earlier runs out
//! of the way.
//!
//! Symlinks are not followed. A symlink pointing at a file is reported as a file;
//! symlinks to directories and dangling links are left alone.
use crate::error::{OrganizeError, OrganizeResult};
use crate::file_category::Category;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Everything found under a scanned root, flattened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// Plain files, in traversal order.
    pub files: Vec<PathBuf>,
    /// Non-skipped subdirectories, in traversal order.
    pub subdirs: Vec<PathBuf>,
}

/// Scans `root`, skipping directories whose name is a category name.
pub fn scan(root: &Path) -> OrganizeResult<ScanResult> {
    scan_with(root, Category::is_reserved_dir_name)
}

/// Scans `root`, skipping every directory for which `skip_dir(name)` is true.
///
/// # Errors
///
/// Returns [`OrganizeError::NotFound`] if `root` is missing or not a directory,
/// and propagates any error raised while reading entries.
pub fn scan_with<F>(root: &Path, skip_dir: F) -> OrganizeResult<ScanResult>
where
    F: Fn(&OsStr) -> bool,
{
    ensure_dir(root)?;

    let mut result = ScanResult::default();
    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| {
            let skipped = entry.file_type().is_dir() && skip_dir(entry.file_name());
            if skipped {
                debug!(path = %entry.path().display(), "skipping category directory");
            }
            !skipped
        });

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            match e.into_io_error() {
                Some(io) => OrganizeError::from_io(path, io),
                None => OrganizeError::Io {
                    path,
                    source: std::io::Error::other("filesystem loop detected"),
                },
            }
        })?;

        let file_type = entry.file_type();
        if file_type.is_file() {
            result.files.push(entry.into_path());
        } else if file_type.is_dir() {
            result.subdirs.push(entry.into_path());
        } else if file_type.is_symlink() && entry.path().is_file() {
            result.files.push(entry.into_path());
        } else {
            debug!(path = %entry.path().display(), "ignoring non-regular entry");
        }
    }

    debug!(
        root = %root.display(),
        files = result.files.len(),
        subdirs = result.subdirs.len(),
        "scan complete"
    );
    Ok(result)
}

/// Fails with `NotFound` unless `path` is an existing directory.
pub fn ensure_dir(path: &Path) -> OrganizeResult<()> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(OrganizeError::NotFound {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(OrganizeError::from_io(path, e)),
    }
}
