//! clean_folder - sort a messy folder into category subdirectories
//!
//! This library scans a directory tree, assigns every file to a category by
//! extension, moves it into `<root>/<category>/` under a transliterated and
//! sanitized name, deletes the emptied source subdirectories and unpacks the
//! archives collected in `<root>/archives`.

pub mod cleanup;
pub mod cli;
pub mod config;
pub mod error;
pub mod file_category;
pub mod file_organizer;
pub mod logging;
pub mod normalizer;
pub mod output;
pub mod scanner;
pub mod translit;
pub mod unpack;

pub use config::Settings;
pub use error::{ErrorKind, OrganizeError, OrganizeResult, Phase, PhaseError};
pub use file_category::{CategorizedFiles, Category, FileMapper, categorize};
pub use file_organizer::{FileOrganizer, MoveOutcome, OrganizeOptions, OrganizeReport, organize};
pub use normalizer::normalize;
pub use cleanup::remove_empty_dirs;
pub use scanner::{ScanResult, scan};
pub use unpack::unpack_archives;

pub use cli::{Args, run_cli};
