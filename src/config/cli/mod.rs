//! CLI argument parsing
//!
//! # Usage
//!
//! ```bash
//! recomendar validate transforms.yaml
//! recomendar info transforms.yaml --format json
//! recomendar pad transforms.yaml --batch batch.json --output padded.json
//! ```

mod core;
mod types;


pub use core::{apply_overrides, parse_args, Cli, Command, InfoArgs, PadArgs, ValidateArgs};
pub use types::OutputFormat;
