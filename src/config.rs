//! Run settings.
//!
//! There is no configuration file: everything comes from the command line and
//! is collected here once arguments are parsed. `RUST_LOG`, when set, still
//! overrides the log level chosen on the command line.
use crate::error::OrganizeResult;
use crate::file_organizer::OrganizeOptions;
use crate::scanner::ensure_dir;
use std::path::PathBuf;

/// Verbosity of diagnostic logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Maps `-q` / `-v` counts to a level. Quiet wins over verbose.
    pub fn from_flags(verbose: u8, quiet: bool) -> Self {
        if quiet {
            return LogLevel::Error;
        }
        match verbose {
            0 => LogLevel::Warn,
            1 => LogLevel::Info,
            2 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }

    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// How the final result is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Coloured progress and summary table.
    Human,
    /// The run report as pretty-printed JSON.
    Json,
}

/// Everything a run needs to know.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory to organize.
    pub root: PathBuf,
    /// Unpack archives after moving.
    pub unpack: bool,
    pub output: OutputMode,
    pub log_level: LogLevel,
}

impl Settings {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            unpack: true,
            output: OutputMode::Human,
            log_level: LogLevel::Warn,
        }
    }

    /// Checks the root is an existing directory.
    pub fn validate(&self) -> OrganizeResult<()> {
        ensure_dir(&self.root)
    }

    pub fn organize_options(&self) -> OrganizeOptions {
        OrganizeOptions {
            unpack: self.unpack,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tempfile::TempDir;

    #[test]
    fn test_log_level_from_flags() {
        assert_eq!(LogLevel::from_flags(0, false), LogLevel::Warn);
        assert_eq!(LogLevel::from_flags(1, false), LogLevel::Info);
        assert_eq!(LogLevel::from_flags(2, false), LogLevel::Debug);
        assert_eq!(LogLevel::from_flags(7, false), LogLevel::Trace);
        assert_eq!(LogLevel::from_flags(3, true), LogLevel::Error);
    }

    #[test]
    fn test_validate_rejects_missing_root() {
        let temp = TempDir::new().unwrap();
        let settings = Settings::new(temp.path().join("missing"));
        assert_eq!(settings.validate().unwrap_err().kind(), ErrorKind::NotFound);

        assert!(Settings::new(temp.path()).validate().is_ok());
    }

    #[test]
    fn test_organize_options_follow_settings() {
        let mut settings = Settings::new("/tmp");
        assert!(settings.organize_options().unpack);
        settings.unpack = false;
        assert!(!settings.organize_options().unpack);
    }
}
