/// File organization: moving files into category directories.
///
/// This module relocates categorized files into `root/<category>/`, naming each
/// one through the normalizer, and drives a whole run: scan, categorize, move,
/// clean up the emptied source directories and unpack archives.
use crate::cleanup::{CleanupReport, remove_empty_dirs};
use crate::error::{OrganizeError, OrganizeResult, Phase, PhaseError};
use crate::file_category::{CategorizedFiles, Category, categorize};
use crate::normalizer::{is_taken, normalize_any};
use crate::scanner::scan;
use crate::unpack::{UnpackReport, unpack_archives};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A single file relocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovedFile {
    /// Where the file was found.
    pub from: PathBuf,
    /// Where it ended up.
    pub to: PathBuf,
    /// The category directory it was moved into.
    pub category: Category,
}

/// Result of the move phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// At least one file was moved.
    Moved(Vec<MovedFile>),
    /// No category had any files.
    NothingToMove,
}

impl MoveOutcome {
    pub fn moved(&self) -> &[MovedFile] {
        match self {
            MoveOutcome::Moved(files) => files,
            MoveOutcome::NothingToMove => &[],
        }
    }

    pub fn into_moved(self) -> Vec<MovedFile> {
        match self {
            MoveOutcome::Moved(files) => files,
            MoveOutcome::NothingToMove => Vec::new(),
        }
    }
}

/// Moves files into their category directories.
pub struct FileOrganizer;

impl FileOrganizer {
    /// Moves one file into `category_dir`, which must already exist.
    ///
    /// The destination name is normalized against the directory's current
    /// contents, so files moved earlier in the same batch are seen.
    ///
    /// # Errors
    ///
    /// * `NotFound` if the source disappeared since it was scanned
    /// * `AlreadyExists` if the chosen destination got taken before the move
    /// * `PermissionDenied` if the file cannot be moved
    pub fn move_into(
        file_path: &Path,
        category_dir: &Path,
        category: Category,
    ) -> OrganizeResult<MovedFile> {
        if !is_taken(file_path) {
            return Err(OrganizeError::NotFound {
                path: file_path.to_path_buf(),
            });
        }

        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| OrganizeError::NotFound {
                path: file_path.to_path_buf(),
            })?;

        let destination = normalize_any(&file_name, category_dir)?;
        if is_taken(&destination) {
            return Err(OrganizeError::AlreadyExists { path: destination });
        }

        relocate(file_path, &destination)?;
        info!(
            src = %file_path.display(),
            dest = %destination.display(),
            %category,
            "moved file"
        );

        Ok(MovedFile {
            from: file_path.to_path_buf(),
            to: destination,
            category,
        })
    }

    /// Moves every categorized file under `root`, reporting each move to `on_move`.
    ///
    /// Stops at the first failure. Files moved before it are not put back.
    pub fn move_files_with<F>(
        root: &Path,
        files: &CategorizedFiles,
        mut on_move: F,
    ) -> OrganizeResult<MoveOutcome>
    where
        F: FnMut(&MovedFile),
    {
        let mut moved = Vec::new();

        for (category, paths) in files.iter() {
            if paths.is_empty() {
                continue;
            }

            let category_dir = root.join(category.dir_name());
            fs::create_dir_all(&category_dir)
                .map_err(|e| OrganizeError::from_io(&category_dir, e))?;

            for path in paths {
                let record = Self::move_into(path, &category_dir, category)?;
                on_move(&record);
                moved.push(record);
            }
        }

        if moved.is_empty() {
            Ok(MoveOutcome::NothingToMove)
        } else {
            Ok(MoveOutcome::Moved(moved))
        }
    }

    /// Moves every categorized file under `root`.
    pub fn move_files(root: &Path, files: &CategorizedFiles) -> OrganizeResult<MoveOutcome> {
        Self::move_files_with(root, files, |_| {})
    }
}

/// Renames `src` to `dest`, copying then deleting when they sit on different devices.
fn relocate(src: &Path, dest: &Path) -> OrganizeResult<()> {
    match fs::rename(src, dest) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            warn!(src = %src.display(), dest = %dest.display(), "cross-device move, copying instead");
            fs::copy(src, dest).map_err(|e| OrganizeError::from_io(dest, e))?;
            fs::remove_file(src).map_err(|e| OrganizeError::from_io(src, e))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(OrganizeError::NotFound {
            path: src.to_path_buf(),
        }),
        Err(e) => Err(OrganizeError::from_io(dest, e)),
    }
}

/// Options for a whole run.
#[derive(Debug, Clone)]
pub struct OrganizeOptions {
    /// Unpack archives found in `root/archives` after moving.
    pub unpack: bool,
}

impl Default for OrganizeOptions {
    fn default() -> Self {
        Self { unpack: true }
    }
}

/// Progress notifications emitted during a run.
#[derive(Debug)]
pub enum RunEvent<'a> {
    /// Scanning and categorizing finished.
    Scanned { files: usize, subdirs: usize },
    /// A file was moved.
    Moved(&'a MovedFile),
    /// The move phase finished.
    MoveFinished,
}

/// Everything a successful run did.
#[derive(Debug, Clone, Serialize)]
pub struct OrganizeReport {
    /// UTC timestamp of when the run started.
    pub started_at: DateTime<Utc>,
    /// The organized directory.
    pub root: PathBuf,
    pub moved: Vec<MovedFile>,
    pub cleanup: CleanupReport,
    /// `None` when unpacking was disabled or there was no archives folder.
    pub unpack: Option<UnpackReport>,
}

impl OrganizeReport {
    /// Number of moved files per category directory name.
    pub fn counts_by_category(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for file in &self.moved {
            *counts.entry(file.category.dir_name().to_string()).or_insert(0) += 1;
        }
        counts
    }
}

/// Organizes `root` with default options.
pub fn organize(root: &Path) -> Result<OrganizeReport, PhaseError> {
    organize_with(root, &OrganizeOptions::default(), |_| {})
}

/// Organizes `root`: scan, categorize, move, clean up, unpack.
///
/// Phases run in order and the first failing phase ends the run. Cleanup and
/// unpacking only happen after every file was moved successfully.
///
/// # Examples
///
/// ```no_run
/// use clean_folder::file_organizer::{OrganizeOptions, organize_with};
/// use std::path::Path;
///
/// match organize_with(Path::new("/home/me/Downloads"), &OrganizeOptions::default(), |_| {}) {
///     Ok(report) => println!("Moved {} files", report.moved.len()),
///     Err(e) => eprintln!("{e}"),
/// }
/// ```
pub fn organize_with<F>(
    root: &Path,
    options: &OrganizeOptions,
    mut on_event: F,
) -> Result<OrganizeReport, PhaseError>
where
    F: FnMut(RunEvent<'_>),
{
    let started_at = Utc::now();

    let scanned = scan(root).map_err(|e| PhaseError::new(Phase::Scan, e))?;
    let categorized = categorize(scanned.files);
    on_event(RunEvent::Scanned {
        files: categorized.total(),
        subdirs: scanned.subdirs.len(),
    });

    let outcome = FileOrganizer::move_files_with(root, &categorized, |record| {
        on_event(RunEvent::Moved(record))
    })
    .map_err(|e| PhaseError::new(Phase::Move, e))?;
    on_event(RunEvent::MoveFinished);
    if outcome == MoveOutcome::NothingToMove {
        debug!(root = %root.display(), "nothing to move");
    }

    let cleanup =
        remove_empty_dirs(&scanned.subdirs).map_err(|e| PhaseError::new(Phase::Cleanup, e))?;

    let archives_dir = root.join(Category::Archives.dir_name());
    let unpack = if options.unpack && archives_dir.is_dir() {
        Some(unpack_archives(&archives_dir).map_err(|e| PhaseError::new(Phase::Unpack, e))?)
    } else {
        None
    };

    Ok(OrganizeReport {
        started_at,
        root: root.to_path_buf(),
        moved: outcome.into_moved(),
        cleanup,
        unpack,
    })
}
