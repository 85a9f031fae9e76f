//! Padding of sequence features to a common length

use super::{BatchTransform, SchemaAware};
use crate::batch::{Batch, Sequences};
use crate::error::{Error, Result};
use crate::schema::{Schema, Selection, Tag};
use crate::tensor::{base_name, ragged_names, RaggedTensor, Tensor, TensorMap};
use ndarray::Array1;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Pads ragged and dense sequence features to a fixed length.
///
/// Every ragged feature (`X__values` + `X__offsets`) is treated as a
/// sequence unless the schema tags `X` as [`Tag::Context`]. Dense features
/// are padded only when the configured [`Selection`] (by default every
/// [`Tag::Sequence`] column) picks them. Everything else passes through.
///
/// Without a configured maximum the target length is the longest sequence
/// in the batch.
#[derive(Debug, Clone)]
pub struct TabularPadding {
    selection: Selection,
    max_sequence_length: Option<usize>,
    pad_value: f64,
    features: Vec<String>,
    context: Vec<String>,
    initialized: bool,
}

impl Default for TabularPadding {
    fn default() -> Self {
        Self::new()
    }
}

impl TabularPadding {
    /// Create an uninitialized padding transform selecting
    /// [`Tag::Sequence`] columns, padding with 0 to the batch maximum.
    pub fn new() -> Self {
        Self {
            selection: Selection::from(Tag::Sequence),
            max_sequence_length: None,
            pad_value: 0.0,
            features: Vec::new(),
            context: Vec::new(),
            initialized: false,
        }
    }

    /// Create a padding transform already initialized from `schema`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if `max_sequence_length` is zero.
    pub fn from_schema(schema: &Schema, max_sequence_length: Option<usize>) -> Result<Self> {
        let mut padding = Self::new();
        if let Some(max_len) = max_sequence_length {
            if max_len == 0 {
                return Err(Error::ConfigError(
                    "max_sequence_length must be > 0".to_string(),
                ));
            }
            padding = padding.with_max_sequence_length(max_len);
        }
        padding.initialize_from_schema(schema)?;
        Ok(padding)
    }

    pub fn with_max_sequence_length(mut self, max_len: usize) -> Self {
        self.max_sequence_length = Some(max_len);
        self
    }

    pub fn with_pad_value(mut self, pad_value: f64) -> Self {
        self.pad_value = pad_value;
        self
    }

    /// Replace the dense feature selection. Requires re-initialization.
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self.features.clear();
        self.context.clear();
        self.initialized = false;
        self
    }

    pub fn max_sequence_length(&self) -> Option<usize> {
        self.max_sequence_length
    }

    pub fn pad_value(&self) -> f64 {
        self.pad_value
    }

    /// Dense sequence features resolved from the schema.
    pub fn features(&self) -> &[String] {
        &self.features
    }

    fn ragged_sequences(&self, map: &TensorMap, skip_context: bool) -> Result<Vec<RaggedTensor>> {
        ragged_names(map)
            .into_iter()
            .filter(|name| !(skip_context && self.context.contains(name)))
            .map(|name| RaggedTensor::from_map(map, &name))
            .collect()
    }

    fn infer_length<'a>(
        ragged: impl IntoIterator<Item = &'a RaggedTensor>,
        dense: impl IntoIterator<Item = &'a Tensor>,
    ) -> usize {
        let ragged_max = ragged.into_iter().map(RaggedTensor::max_row_length).max();
        let dense_max = dense.into_iter().map(|t| t.shape()[1]).max();
        ragged_max.into_iter().chain(dense_max).max().unwrap_or(0)
    }
}

impl SchemaAware for TabularPadding {
    fn initialize_from_schema(&mut self, schema: &Schema) -> Result<()> {
        self.features = self
            .selection
            .resolve(schema)?
            .column_names()
            .map(str::to_string)
            .collect();
        self.context = schema
            .select_by_tag(&[Tag::Context])
            .column_names()
            .map(str::to_string)
            .collect();
        self.initialized = true;
        debug!(features = ?self.features, "TabularPadding initialized");
        Ok(())
    }
}

impl BatchTransform for TabularPadding {
    fn transform(&self, batch: &Batch) -> Result<Batch> {
        if !self.initialized {
            return Err(Error::NotInitialized("TabularPadding".to_string()));
        }

        let ragged = self.ragged_sequences(&batch.features, true)?;
        let dense: Vec<(&str, &Tensor)> = self
            .features
            .iter()
            .filter_map(|name| batch.features.get(name).map(|t| (name.as_str(), t)))
            .collect();
        if let Some((_, t)) = dense.iter().find(|(_, t)| t.ndim() < 2) {
            return Err(Error::UnsupportedRank { ndim: t.ndim() });
        }

        let mut lengths: BTreeMap<String, Vec<i64>> = BTreeMap::new();
        for r in &ragged {
            lengths.insert(r.name().to_string(), r.row_lengths());
        }
        for (name, t) in &dense {
            lengths.insert((*name).to_string(), t.sequence_lengths(self.pad_value)?);
        }
        check_consistent(&lengths)?;

        let (target_ragged, target_dense): (Vec<RaggedTensor>, Vec<(&str, &Tensor)>) =
            match &batch.targets {
                Some(targets) => (
                    self.ragged_sequences(targets, false)?,
                    targets
                        .iter()
                        .filter(|(key, t)| base_name(key).is_none() && t.ndim() >= 2)
                        .map(|(key, t)| (key.as_str(), t))
                        .collect(),
                ),
                None => (Vec::new(), Vec::new()),
            };

        let max_len = self.max_sequence_length.unwrap_or_else(|| {
            Self::infer_length(
                ragged.iter().chain(&target_ragged),
                dense.iter().chain(&target_dense).map(|(_, t)| *t),
            )
        });

        let truncated: Vec<&str> = lengths
            .iter()
            .filter(|(_, l)| l.iter().any(|&n| n as usize > max_len))
            .map(|(name, _)| name.as_str())
            .collect();
        if !truncated.is_empty() {
            warn!(
                features = ?truncated,
                max_len,
                "truncating sequences longer than the maximum length"
            );
        }

        let dense_names: Vec<&str> = dense.iter().map(|(name, _)| *name).collect();
        let features = pad_map(&batch.features, &ragged, &dense_names, max_len, self.pad_value)?;

        let mut sequences = Sequences::new(max_len);
        for (name, l) in lengths {
            sequences.insert(name, Array1::from(l));
        }

        let targets = match &batch.targets {
            Some(targets) => {
                for r in &target_ragged {
                    sequences.insert(r.name(), Array1::from(r.row_lengths()));
                }
                for (name, t) in &target_dense {
                    sequences.insert(*name, Array1::from(t.sequence_lengths(self.pad_value)?));
                }
                let target_names: Vec<&str> = target_dense.iter().map(|(name, _)| *name).collect();
                Some(pad_map(targets, &target_ragged, &target_names, max_len, self.pad_value)?)
            }
            None => None,
        };

        debug!(
            max_len,
            padded = ragged.len() + dense.len(),
            "padded batch sequences"
        );

        Ok(Batch {
            features,
            targets,
            sequences: Some(sequences),
        })
    }

    fn name(&self) -> &'static str {
        "tabular_padding"
    }
}

/// All derived per-row lengths must agree.
fn check_consistent(lengths: &BTreeMap<String, Vec<i64>>) -> Result<()> {
    let mut all = lengths.values();
    let Some(first) = all.next() else {
        return Ok(());
    };
    if all.all(|l| l == first) {
        return Ok(());
    }

    let details = lengths
        .iter()
        .map(|(name, l)| format!("{name}={l:?}"))
        .collect::<Vec<_>>()
        .join(", ");
    Err(Error::SequenceLengthMismatch { details })
}

/// Pad the ragged and selected dense entries of `input`, copying the rest.
fn pad_map(
    input: &TensorMap,
    ragged: &[RaggedTensor],
    dense: &[&str],
    max_len: usize,
    pad_value: f64,
) -> Result<TensorMap> {
    let mut out = TensorMap::new();
    for (key, value) in input {
        let consumed = base_name(key).is_some_and(|base| ragged.iter().any(|r| r.name() == base));
        if consumed {
            continue;
        }
        let tensor = if dense.contains(&key.as_str()) {
            value.pad_sequence(max_len, pad_value)?
        } else {
            value.clone()
        };
        out.insert(key.clone(), tensor);
    }
    for r in ragged {
        out.insert(r.name().to_string(), r.to_padded(max_len, pad_value));
    }
    Ok(out)
}
