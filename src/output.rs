//! Output formatting and styling module.
//!
//! All user-facing output of the binary goes through here: coloured status
//! lines, the progress bar shown while files are moved and the closing summary.
//! Diagnostics are logged separately through `tracing`.

use crate::error::PhaseError;
use crate::file_organizer::OrganizeReport;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;

/// Manages all CLI output with consistent styling and formatting.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Creates a progress bar for the move phase.
    ///
    /// Drawn on stderr and hidden automatically when stderr is not a terminal.
    ///
    /// ```no_run
    /// use clean_folder::output::OutputFormatter;
    /// let pb = OutputFormatter::create_progress_bar(100);
    /// pb.inc(1);
    /// pb.finish_and_clear();
    /// ```
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("█▓░"),
        );
        pb
    }

    /// Prints the failure of a run, naming the phase, path and kind.
    pub fn phase_error(err: &PhaseError) {
        Self::error(&format!("Error during {} phase: {}", err.phase, err.source));
    }

    /// Prints what a run did, ending with the per-category table.
    pub fn report(report: &OrganizeReport) {
        if report.moved.is_empty() {
            Self::info("No files to organize.");
        }

        for dir in &report.cleanup.already_gone {
            Self::warning(&format!("Directory {} not found", dir.display()));
        }
        if !report.cleanup.removed.is_empty() {
            Self::success(&format!(
                "Removed {} emptied {}",
                report.cleanup.removed.len(),
                if report.cleanup.removed.len() == 1 { "directory" } else { "directories" }
            ));
        }

        if let Some(unpack) = &report.unpack {
            for archive in &unpack.extracted {
                Self::success(&format!(
                    "Unpacked {} -> {}",
                    archive.archive.display(),
                    archive.into.display()
                ));
            }
            for skipped in &unpack.skipped {
                Self::info(&format!("Already unpacked: {}", skipped.display()));
            }
        }

        if !report.moved.is_empty() {
            Self::summary_table(&report.counts_by_category(), report.moved.len());
        }
    }

    /// Prints a summary table with file statistics by category.
    ///
    /// ```no_run
    /// use clean_folder::output::OutputFormatter;
    /// use std::collections::BTreeMap;
    ///
    /// let mut counts = BTreeMap::new();
    /// counts.insert("documents".to_string(), 15);
    /// counts.insert("images".to_string(), 8);
    /// OutputFormatter::summary_table(&counts, 23);
    /// ```
    pub fn summary_table(category_counts: &BTreeMap<String, usize>, total_files: usize) {
        Self::header("SUMMARY");

        let width = category_counts
            .keys()
            .map(String::len)
            .max()
            .unwrap_or(0)
            .max(8); // At least "Category" width

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = width
        );
        println!("{}", "-".repeat(width + 10));

        for (category, count) in category_counts {
            println!(
                "{:<width$} | {} {}",
                category,
                count.to_string().green(),
                plural(*count),
                width = width
            );
        }

        println!("{}", "-".repeat(width + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            plural(total_files),
            width = width
        );
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}
