//! Command-line interface module for clean-folder.
//!
//! This module handles all CLI-related functionality:
//! - Argument parsing
//! - Translating arguments into run [`Settings`]
//! - Driving a run and printing its progress and result

use crate::config::{LogLevel, OutputMode, Settings};
use crate::error::{Phase, PhaseError};
use crate::file_organizer::{OrganizeReport, RunEvent, organize_with};
use crate::output::OutputFormatter;
use clap::{Parser, ValueHint};
use indicatif::ProgressBar;
use std::path::PathBuf;

/// Sort a folder into category subdirectories.
///
/// Files are moved into images/, documents/, audio/, video/, archives/ and
/// other/ under the given folder, with transliterated and sanitized names.
/// Emptied subfolders are removed and archives are unpacked.
#[derive(Parser, Debug, Clone)]
#[command(name = "clean-folder", author, version, about)]
pub struct Args {
    /// Folder to organize.
    #[arg(value_name = "FOLDER", value_hint = ValueHint::DirPath)]
    pub root: PathBuf,

    /// Do not unpack archives after sorting.
    #[arg(long)]
    pub no_unpack: bool,

    /// Print the run report as JSON instead of a summary table.
    #[arg(long)]
    pub json: bool,

    /// More diagnostic logging on stderr (repeat for more).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    pub fn into_settings(self) -> Settings {
        Settings {
            log_level: LogLevel::from_flags(self.verbose, self.quiet),
            output: if self.json {
                OutputMode::Json
            } else {
                OutputMode::Human
            },
            unpack: !self.no_unpack,
            root: self.root,
        }
    }
}

/// Runs one clean-up with the given settings, printing progress and the result.
///
/// # Examples
///
/// ```no_run
/// use clean_folder::cli::run_cli;
/// use clean_folder::config::Settings;
///
/// match run_cli(&Settings::new("/path/to/directory")) {
///     Ok(report) => println!("Moved {} files", report.moved.len()),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(settings: &Settings) -> Result<OrganizeReport, PhaseError> {
    settings
        .validate()
        .map_err(|e| PhaseError::new(Phase::Scan, e))?;

    let human = settings.output == OutputMode::Human;
    if human {
        OutputFormatter::info(&format!("Organizing contents of: {}", settings.root.display()));
    }

    let mut progress: Option<ProgressBar> = None;
    let result = organize_with(&settings.root, &settings.organize_options(), |event| {
        if !human {
            return;
        }
        match event {
            RunEvent::Scanned { files, .. } => {
                progress = Some(OutputFormatter::create_progress_bar(files as u64));
            }
            RunEvent::Moved(record) => {
                if let Some(pb) = &progress {
                    pb.set_message(record.category.dir_name());
                    pb.inc(1);
                }
            }
            RunEvent::MoveFinished => {
                if let Some(pb) = progress.take() {
                    pb.finish_and_clear();
                }
            }
        }
    });
    if let Some(pb) = progress.take() {
        pb.abandon();
    }

    match &result {
        Ok(report) => match settings.output {
            OutputMode::Human => {
                OutputFormatter::report(report);
                OutputFormatter::success("Done.");
            }
            OutputMode::Json => match serde_json::to_string_pretty(report) {
                Ok(json) => println!("{json}"),
                Err(e) => OutputFormatter::error(&format!("Could not serialize report: {e}")),
            },
        },
        Err(e) => OutputFormatter::phase_error(e),
    }

    result
}
