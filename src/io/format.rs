//! Batch file formats

use std::path::Path;

/// Serialization format for batch files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchFormat {
    #[default]
    Json,
    Yaml,
}

impl BatchFormat {
    /// Format for a file extension, case-insensitive.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(BatchFormat::Json),
            "yaml" | "yml" => Some(BatchFormat::Yaml),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|s| s.to_str())
            .and_then(Self::from_extension)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            BatchFormat::Json => "json",
            BatchFormat::Yaml => "yaml",
        }
    }
}

/// Options for writing a batch
#[derive(Debug, Clone, PartialEq)]
pub struct SaveConfig {
    pub format: BatchFormat,
    /// Pretty-print JSON output
    pub pretty: bool,
    /// Write recorded sequence lengths as `<name>__lengths` features
    pub include_lengths: bool,
}

impl SaveConfig {
    pub fn new(format: BatchFormat) -> Self {
        Self {
            format,
            pretty: false,
            include_lengths: true,
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_lengths(mut self, include_lengths: bool) -> Self {
        self.include_lengths = include_lengths;
        self
    }
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self::new(BatchFormat::Json)
    }
}
