//! Batch saving functionality

use super::format::{BatchFormat, SaveConfig};
use super::state::BatchState;
use crate::batch::Batch;
use crate::{Error, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Save a batch to a file
///
/// # Example
///
/// ```no_run
/// use recomendar::batch::Batch;
/// use recomendar::io::{save_batch, BatchFormat, SaveConfig};
///
/// let batch = Batch::default();
/// save_batch(&batch, "batch.json", &SaveConfig::new(BatchFormat::Json))?;
/// # Ok::<(), recomendar::Error>(())
/// ```
pub fn save_batch(batch: &Batch, path: impl AsRef<Path>, config: &SaveConfig) -> Result<()> {
    let data = batch_to_string(batch, config)?;
    let mut file = File::create(path.as_ref())?;
    file.write_all(data.as_bytes())?;
    Ok(())
}

/// Serialize a batch to a string in the configured format.
pub fn batch_to_string(batch: &Batch, config: &SaveConfig) -> Result<String> {
    let state = BatchState::from_batch(batch, config.include_lengths);
    match config.format {
        BatchFormat::Json => {
            if let Some(name) = state.first_non_finite() {
                return Err(Error::Serialization(format!(
                    "tensor {name} holds NaN or infinite values, which JSON cannot represent; \
                     save as YAML instead"
                )));
            }
            if config.pretty {
                serde_json::to_string_pretty(&state)
            } else {
                serde_json::to_string(&state)
            }
            .map_err(|e| Error::Serialization(format!("JSON serialization failed: {e}")))
        }
        BatchFormat::Yaml => serde_yaml::to_string(&state)
            .map_err(|e| Error::Serialization(format!("YAML serialization failed: {e}"))),
    }
}
