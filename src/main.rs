use clap::Parser;
use clean_folder::cli::{Args, run_cli};
use clean_folder::logging::init_logging;
use std::process::ExitCode;

fn main() -> ExitCode {
    let settings = Args::parse().into_settings();
    init_logging(settings.log_level);

    match run_cli(&settings) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => ExitCode::from(e.source.exit_code() as u8),
    }
}
