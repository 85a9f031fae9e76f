//! Recomendar CLI
//!
//! Command-line entry point for the recomendar sequence transforms.
//!
//! # Usage
//!
//! ```bash
//! # Validate a transform config
//! recomendar validate transforms.yaml --detailed
//!
//! # Show config info
//! recomendar info transforms.yaml --format json
//!
//! # Pad a batch file
//! recomendar pad transforms.yaml --batch batch.json --output padded.json
//! ```

use clap::Parser;
use recomendar::cli::{run_command, Cli, LogLevel};
use std::process::ExitCode;
use tracing_subscriber::FmtSubscriber;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = LogLevel::from_flags(cli.verbose, cli.quiet).tracing_level();
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: failed to install log subscriber: {e}");
    }

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
