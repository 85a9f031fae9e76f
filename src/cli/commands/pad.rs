//! Pad command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{apply_overrides, load_config, validate_config, PadArgs};
use crate::io::{batch_to_string, load_batch, save_batch, BatchFormat, SaveConfig};
use crate::transforms::BatchTransform;
use tracing::info;

pub fn run_pad(args: PadArgs, level: LogLevel) -> Result<(), String> {
    let mut spec = load_config(&args.config).map_err(|e| format!("Config error: {e}"))?;
    apply_overrides(&mut spec, &args);
    validate_config(&spec).map_err(|e| format!("Validation failed: {e}"))?;

    let pipeline = spec
        .build_pipeline()
        .map_err(|e| format!("Failed to build transforms: {e}"))?;

    let batch = load_batch(&args.batch)
        .map_err(|e| format!("Failed to load batch {}: {e}", args.batch.display()))?;
    info!(
        batch = %args.batch.display(),
        features = batch.features.len(),
        "loaded batch"
    );

    let padded = pipeline.transform(&batch).map_err(|e| {
        if e.is_input_error() {
            format!("Invalid batch {}: {e}", args.batch.display())
        } else {
            format!("Transform failed: {e}")
        }
    })?;

    if let Some(sequences) = &padded.sequences {
        log(
            level,
            LogLevel::Verbose,
            &format!(
                "Padded {} sequence feature(s) to length {}",
                sequences.len(),
                sequences.max_length()
            ),
        );
    }

    match &args.output {
        Some(path) => {
            let format = BatchFormat::from_path(path).ok_or_else(|| {
                format!("Unsupported output extension: {}", path.display())
            })?;
            let config = SaveConfig::new(format).with_pretty(args.pretty);
            save_batch(&padded, path, &config)
                .map_err(|e| format!("Failed to save batch: {e}"))?;
            log(
                level,
                LogLevel::Normal,
                &format!("Wrote padded batch to {}", path.display()),
            );
        }
        None => {
            let config = SaveConfig::new(BatchFormat::Json).with_pretty(args.pretty);
            let text = batch_to_string(&padded, &config)
                .map_err(|e| format!("Failed to serialize batch: {e}"))?;
            println!("{text}");
        }
    }

    Ok(())
}
