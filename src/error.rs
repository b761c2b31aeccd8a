//! Error taxonomy shared by every phase of a clean-up run.
//!
//! Each phase (scan, move, cleanup, unpack) reports the first failure it hits as an
//! [`OrganizeError`] and stops; work already done by that phase stays on disk.
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while organizing a directory.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// The path vanished or never existed.
    #[error("{} - file or directory not found", path.display())]
    NotFound { path: PathBuf },

    /// A destination path is already taken.
    #[error("{} - a file with the same name already exists in the destination directory", path.display())]
    AlreadyExists { path: PathBuf },

    /// Insufficient rights to read, write or create the path.
    #[error("{} - insufficient permissions", path.display())]
    PermissionDenied { path: PathBuf },

    /// The archive could not be extracted.
    #[error("failed to unpack the archive {}: {reason}", archive.display())]
    UnpackFailed { archive: PathBuf, reason: String },

    /// A file name handed to the normalizer has no `.` separating an extension.
    #[error("{} - file name has no extension", path.display())]
    MissingExtension { path: PathBuf },

    /// Any other OS-level failure.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Fieldless classification of an [`OrganizeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    PermissionDenied,
    UnpackFailed,
    MissingExtension,
    Io,
}

impl OrganizeError {
    /// Classifies an I/O error raised while touching `path`.
    pub fn from_io(path: impl AsRef<Path>, source: io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound { path },
            io::ErrorKind::AlreadyExists => Self::AlreadyExists { path },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::Io { path, source },
        }
    }

    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Self::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            Self::UnpackFailed { .. } => ErrorKind::UnpackFailed,
            Self::MissingExtension { .. } => ErrorKind::MissingExtension,
            Self::Io { .. } => ErrorKind::Io,
        }
    }

    /// Process exit code used by the binary for this error.
    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            ErrorKind::NotFound => 3,
            ErrorKind::AlreadyExists => 4,
            ErrorKind::PermissionDenied => 5,
            ErrorKind::UnpackFailed => 6,
            ErrorKind::MissingExtension | ErrorKind::Io => 1,
        }
    }
}

/// Result type for organize operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// The phase of a run in which a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Scan,
    Move,
    Cleanup,
    Unpack,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Scan => "scan",
            Phase::Move => "move",
            Phase::Cleanup => "cleanup",
            Phase::Unpack => "unpack",
        };
        f.write_str(name)
    }
}

/// The first failure of a run, tagged with the phase that produced it.
#[derive(Debug, Error)]
#[error("{phase} phase failed: {source}")]
pub struct PhaseError {
    pub phase: Phase,
    #[source]
    pub source: OrganizeError,
}

impl PhaseError {
    pub fn new(phase: Phase, source: OrganizeError) -> Self {
        Self { phase, source }
    }
}
