//! File name normalization and collision avoidance.
//!
//! A candidate name is split at its last `.`, the base is transliterated and
//! every character outside `[A-Za-z0-9_]` becomes `_`. The extension is kept
//! verbatim. Uniqueness is decided purely by asking the filesystem whether a
//! name is taken, trying `base.ext`, `base_1.ext`, `base_2.ext` and so on.
//!
//! Nothing here creates or moves files; the result is only a naming decision,
//! so two concurrent writers into the same directory can still race.
use crate::error::{OrganizeError, OrganizeResult};
use crate::translit::transliterate;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]").expect("Invalid sanitize pattern"));

/// Transliterates and sanitizes a base name (no extension).
///
/// ```
/// use clean_folder::normalizer::sanitize_base;
///
/// assert_eq!(sanitize_base("Мій звіт (1)"), "Mij_zvit__1_");
/// ```
pub fn sanitize_base(base: &str) -> String {
    NON_WORD
        .replace_all(&transliterate(base), "_")
        .into_owned()
}

/// Returns a path in `destination_dir` that is free for `candidate_name`.
///
/// # Errors
///
/// Returns [`OrganizeError::MissingExtension`] if `candidate_name` contains no `.`.
///
/// # Examples
///
/// ```no_run
/// use clean_folder::normalizer::normalize;
/// use std::path::Path;
///
/// let dest = normalize("фото.jpg", Path::new("/tmp/sorted/images")).unwrap();
/// assert_eq!(dest, Path::new("/tmp/sorted/images/foto.jpg"));
/// ```
pub fn normalize(candidate_name: &str, destination_dir: &Path) -> OrganizeResult<PathBuf> {
    let (base, extension) =
        candidate_name
            .rsplit_once('.')
            .ok_or_else(|| OrganizeError::MissingExtension {
                path: destination_dir.join(candidate_name),
            })?;

    let base = sanitize_base(base);
    Ok(first_free(destination_dir, |counter| match counter {
        0 => format!("{base}.{extension}"),
        n => format!("{base}_{n}.{extension}"),
    }))
}

/// Like [`normalize`] but for names without an extension: the whole name is
/// sanitized and suffixes are appended directly (`name`, `name_1`, ...).
pub fn normalize_bare(candidate_name: &str, destination_dir: &Path) -> PathBuf {
    let base = sanitize_base(candidate_name);
    first_free(destination_dir, |counter| match counter {
        0 => base.clone(),
        n => format!("{base}_{n}"),
    })
}

/// Normalizes any file name, falling back to [`normalize_bare`] when it has
/// no extension. Other errors from [`normalize`] are returned unchanged.
pub fn normalize_any(candidate_name: &str, destination_dir: &Path) -> OrganizeResult<PathBuf> {
    match normalize(candidate_name, destination_dir) {
        Err(OrganizeError::MissingExtension { .. }) => {
            Ok(normalize_bare(candidate_name, destination_dir))
        }
        other => other,
    }
}

fn first_free<F>(destination_dir: &Path, name_for: F) -> PathBuf
where
    F: Fn(u64) -> String,
{
    let mut counter = 0;
    loop {
        let candidate = destination_dir.join(name_for(counter));
        if !is_taken(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// A path is taken if anything exists there, including a dangling symlink.
pub(crate) fn is_taken(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}
