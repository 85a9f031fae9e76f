//! Loading transform specifications from YAML files

use super::schema::TransformSpec;
use super::validate::validate_config;
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Load and validate a transform specification from a YAML file.
///
/// # Example
///
/// ```no_run
/// use recomendar::config::load_config;
///
/// let spec = load_config("transforms.yaml")?;
/// let pipeline = spec.build_pipeline()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn load_config<P: AsRef<Path>>(config_path: P) -> Result<TransformSpec> {
    let spec = parse_config(config_path.as_ref())?;
    validate_config(&spec).map_err(|e| Error::ConfigError(format!("Invalid config: {e}")))?;
    Ok(spec)
}

/// Parse a YAML file without validating it.
pub fn parse_config<P: AsRef<Path>>(config_path: P) -> Result<TransformSpec> {
    let yaml_content = fs::read_to_string(config_path.as_ref()).map_err(|e| {
        Error::ConfigError(format!(
            "Failed to read config file {}: {}",
            config_path.as_ref().display(),
            e
        ))
    })?;
    parse_config_str(&yaml_content)
}

/// Parse a YAML document without validating it.
pub fn parse_config_str(yaml: &str) -> Result<TransformSpec> {
    serde_yaml::from_str(yaml)
        .map_err(|e| Error::ConfigError(format!("Failed to parse YAML config: {e}")))
}
