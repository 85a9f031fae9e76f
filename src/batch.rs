//! Batch data structures

use crate::tensor::{base_name, offsets_key, ragged_names, Tensor, TensorMap};
use ndarray::{Array1, Array2};
use std::collections::BTreeMap;

/// A batch of features with optional targets and sequence metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    /// Input features
    pub features: TensorMap,
    /// Target labels/values
    pub targets: Option<TensorMap>,
    /// Pre-padding lengths recorded by a padding transform
    pub sequences: Option<Sequences>,
}

impl Batch {
    /// Create a batch without targets.
    pub fn new(features: TensorMap) -> Self {
        Self {
            features,
            targets: None,
            sequences: None,
        }
    }

    pub fn with_targets(mut self, targets: TensorMap) -> Self {
        self.targets = Some(targets);
        self
    }

    pub fn with_sequences(mut self, sequences: Sequences) -> Self {
        self.sequences = Some(sequences);
        self
    }

    pub fn feature(&self, name: &str) -> Option<&Tensor> {
        self.features.get(name)
    }

    pub fn target(&self, name: &str) -> Option<&Tensor> {
        self.targets.as_ref().and_then(|t| t.get(name))
    }

    /// Number of examples, taken from the first dense feature or, failing
    /// that, from the first ragged feature's offsets.
    pub fn batch_size(&self) -> Option<usize> {
        self.features
            .iter()
            .find(|(key, t)| base_name(key).is_none() && t.ndim() > 0)
            .map(|(_, t)| t.len())
            .or_else(|| {
                ragged_names(&self.features).first().and_then(|base| {
                    self.features
                        .get(&offsets_key(base))
                        .map(|offsets| offsets.len().saturating_sub(1))
                })
            })
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Per-feature sequence lengths recorded before padding.
///
/// Lengths are the original row counts, so a row truncated to the padded
/// width still reports its full length; [`Sequences::mask`] clips to the
/// padded width.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sequences {
    lengths: BTreeMap<String, Array1<i64>>,
    max_length: usize,
}

impl Sequences {
    pub fn new(max_length: usize) -> Self {
        Self {
            lengths: BTreeMap::new(),
            max_length,
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, lengths: Array1<i64>) {
        self.lengths.insert(name.into(), lengths);
    }

    /// Width of the padded sequence axis.
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Original length of every row of `name`.
    pub fn length(&self, name: &str) -> Option<&Array1<i64>> {
        self.lengths.get(name)
    }

    /// `(batch, max_length)` validity mask for `name`.
    pub fn mask(&self, name: &str) -> Option<Array2<bool>> {
        let lengths = self.lengths.get(name)?;
        Some(Array2::from_shape_fn(
            (lengths.len(), self.max_length),
            |(row, pos)| (pos as i64) < lengths[row],
        ))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.lengths.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Array1<i64>)> {
        self.lengths.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }
}
