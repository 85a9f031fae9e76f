//! Core CLI types - Cli, Command, and argument structs

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::types::OutputFormat;

/// Recomendar: sequence transforms for recommender batches
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "recomendar")]
#[command(author = "PAIML")]
#[command(version)]
#[command(about = "Pad ragged sequence features and broadcast context features in recommender batches")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Validate a transform configuration file
    Validate(ValidateArgs),

    /// Display information about a configuration
    Info(InfoArgs),

    /// Apply the configured transforms to a batch file
    Pad(PadArgs),
}

/// Arguments for the validate command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ValidateArgs {
    /// Path to YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Show detailed validation report
    #[arg(short, long)]
    pub detailed: bool,
}

/// Arguments for the info command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct InfoArgs {
    /// Path to YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Output format (text, json, yaml)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the pad command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct PadArgs {
    /// Path to YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Input batch file (.json, .yaml or .yml)
    #[arg(short, long)]
    pub batch: PathBuf,

    /// Output batch file; JSON on stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override the configured maximum sequence length
    #[arg(short, long)]
    pub max_sequence_length: Option<usize>,

    /// Pretty-print the output
    #[arg(long)]
    pub pretty: bool,
}

/// Parse CLI arguments from a string slice (for testing)
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}

/// Apply command-line overrides to a TransformSpec
pub fn apply_overrides(spec: &mut crate::config::TransformSpec, args: &PadArgs) {
    if let Some(max_len) = args.max_sequence_length {
        spec.padding.max_sequence_length = Some(max_len);
    }
}
