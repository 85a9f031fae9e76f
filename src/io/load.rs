//! Batch loading functionality

use super::format::BatchFormat;
use super::state::BatchState;
use crate::batch::Batch;
use crate::{Error, Result};
use std::fs;
use std::path::Path;

/// Load a batch from a file
///
/// The format is detected from the file extension.
///
/// # Example
///
/// ```no_run
/// use recomendar::io::load_batch;
///
/// let batch = load_batch("batch.json")?;
/// println!("batch size: {:?}", batch.batch_size());
/// # Ok::<(), recomendar::Error>(())
/// ```
pub fn load_batch(path: impl AsRef<Path>) -> Result<Batch> {
    let path = path.as_ref();

    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| Error::Serialization("File has no extension".to_string()))?;
    let format = BatchFormat::from_extension(ext)
        .ok_or_else(|| Error::Serialization(format!("Unsupported file extension: {ext}")))?;

    let content = fs::read_to_string(path)?;
    parse_batch(&content, format)
}

/// Parse a batch document in the given format.
pub fn parse_batch(content: &str, format: BatchFormat) -> Result<Batch> {
    let state: BatchState = match format {
        BatchFormat::Json => serde_json::from_str(content)
            .map_err(|e| Error::Serialization(format!("JSON deserialization failed: {e}")))?,
        BatchFormat::Yaml => serde_yaml::from_str(content)
            .map_err(|e| Error::Serialization(format!("YAML deserialization failed: {e}")))?,
    };
    state.into_batch()
}
