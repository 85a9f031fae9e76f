//! YAML schema definitions for declarative transform configuration

use crate::schema::{Schema, Selection, Tag};
use serde::{Deserialize, Serialize};

/// Complete transform specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformSpec {
    /// Input columns and their tags
    pub schema: Schema,

    /// Padding configuration
    #[serde(default)]
    pub padding: PaddingSpec,

    /// Optional context broadcasting, applied after padding
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broadcast: Option<BroadcastSpec>,
}

/// Padding configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaddingSpec {
    /// Fixed padded width; the batch maximum when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_sequence_length: Option<usize>,

    /// Fill value for padded positions
    #[serde(default)]
    pub pad_value: f64,

    /// Dense features to pad
    #[serde(default = "default_sequence_selection")]
    pub sequence: Selection,
}

impl Default for PaddingSpec {
    fn default() -> Self {
        Self {
            max_sequence_length: None,
            pad_value: 0.0,
            sequence: default_sequence_selection(),
        }
    }
}

fn default_sequence_selection() -> Selection {
    Selection::Tags(vec![Tag::Sequence])
}

/// Broadcast configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BroadcastSpec {
    /// Features replicated along the sequence axis
    pub to_broadcast: Selection,

    /// Features defining the sequence length
    pub sequence: Selection,
}

impl TransformSpec {
    /// Create a spec with default padding and no broadcasting.
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            padding: PaddingSpec::default(),
            broadcast: None,
        }
    }

    /// The configured input schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}
