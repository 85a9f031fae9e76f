//! Broadcasting of context features along the sequence axis

use super::{BatchTransform, SchemaAware};
use crate::batch::Batch;
use crate::error::{Error, Result};
use crate::schema::{Schema, Selection};
use crate::tensor::{offsets_key, TensorMap};
use tracing::debug;

/// Replicates per-example features along a new sequence axis so they line
/// up with sequence features: `(B, D)` becomes `(B, L, D)`.
///
/// Both selections are resolved by
/// [`initialize_from_schema`](SchemaAware::initialize_from_schema), which
/// must run before the first call.
#[derive(Debug, Clone)]
pub struct BroadcastToSequence {
    to_broadcast: Selection,
    sequence: Selection,
    to_broadcast_features: Vec<String>,
    sequence_features: Vec<String>,
    initialized: bool,
}

impl BroadcastToSequence {
    pub fn new(to_broadcast: impl Into<Selection>, sequence: impl Into<Selection>) -> Self {
        Self {
            to_broadcast: to_broadcast.into(),
            sequence: sequence.into(),
            to_broadcast_features: Vec::new(),
            sequence_features: Vec::new(),
            initialized: false,
        }
    }

    /// Features replicated along the sequence axis, in schema order.
    pub fn to_broadcast_features(&self) -> &[String] {
        &self.to_broadcast_features
    }

    /// Features that define the sequence length, in schema order.
    pub fn sequence_features(&self) -> &[String] {
        &self.sequence_features
    }

    fn ensure_initialized(&self) -> Result<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(Error::NotInitialized("BroadcastToSequence".to_string()))
        }
    }

    /// Sequence length implied by the first sequence feature.
    ///
    /// With ragged input the final offset is used; otherwise the dense
    /// tensor's second dimension.
    ///
    /// # Errors
    ///
    /// Returns an error if the transform is uninitialized, has no sequence
    /// features, or the first one is absent from `inputs` or is 1-D.
    pub fn get_seq_length(&self, inputs: &TensorMap) -> Result<usize> {
        self.ensure_initialized()?;
        let first = self
            .sequence_features
            .first()
            .ok_or_else(|| Error::MissingFeature("<no sequence features selected>".to_string()))?;

        let key = offsets_key(first);
        if let Some(offsets) = inputs.get(&key) {
            let raw = offsets.to_i64_vec(&key)?;
            return match raw.last() {
                Some(&last) if last >= 0 => Ok(last as usize),
                Some(&last) => Err(Error::invalid_ragged(
                    first.as_str(),
                    format!("final offset {last} is negative"),
                )),
                None => Err(Error::invalid_ragged(first.as_str(), "offsets cannot be empty")),
            };
        }

        let dense = inputs
            .get(first)
            .ok_or_else(|| Error::MissingFeature(first.clone()))?;
        match dense.shape() {
            [_, seq_len, ..] => Ok(*seq_len),
            shape => Err(Error::UnsupportedRank { ndim: shape.len() }),
        }
    }

    /// Broadcast every selected feature in `inputs`; other entries are
    /// copied unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedRank`] if a broadcast feature is not 2-D
    /// or 3-D, plus any error from [`get_seq_length`](Self::get_seq_length).
    pub fn forward(&self, inputs: &TensorMap) -> Result<TensorMap> {
        let seq_len = self.get_seq_length(inputs)?;

        let mut outputs = TensorMap::new();
        for (key, value) in inputs {
            let tensor = if self.to_broadcast_features.contains(key) {
                value.broadcast_to_sequence(seq_len)?
            } else {
                value.clone()
            };
            outputs.insert(key.clone(), tensor);
        }

        debug!(
            seq_len,
            features = ?self.to_broadcast_features,
            "broadcast features to sequence"
        );
        Ok(outputs)
    }
}

impl SchemaAware for BroadcastToSequence {
    fn initialize_from_schema(&mut self, schema: &Schema) -> Result<()> {
        let to_broadcast: Vec<String> = self
            .to_broadcast
            .resolve(schema)?
            .column_names()
            .map(str::to_string)
            .collect();
        let sequence: Vec<String> = self
            .sequence
            .resolve(schema)?
            .column_names()
            .map(str::to_string)
            .collect();

        let overlap: Vec<&str> = to_broadcast
            .iter()
            .filter(|name| sequence.contains(name))
            .map(String::as_str)
            .collect();
        if !overlap.is_empty() {
            return Err(Error::ConfigError(format!(
                "features cannot be both broadcast and sequence: {}",
                overlap.join(", ")
            )));
        }

        self.to_broadcast_features = to_broadcast;
        self.sequence_features = sequence;
        self.initialized = true;
        Ok(())
    }
}

impl BatchTransform for BroadcastToSequence {
    fn transform(&self, batch: &Batch) -> Result<Batch> {
        Ok(Batch {
            features: self.forward(&batch.features)?,
            targets: batch.targets.clone(),
            sequences: batch.sequences.clone(),
        })
    }

    fn name(&self) -> &'static str {
        "broadcast_to_sequence"
    }
}
