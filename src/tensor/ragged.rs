//! Ragged (values/offsets) feature encoding
//!
//! A variable-length feature `X` is stored as two tensors:
//! `X__values`, the concatenation of every row, and `X__offsets`, the
//! cumulative row boundaries (`batch_size + 1` entries, starting at 0 and
//! ending at `len(values)`).

use super::{ops, Tensor, TensorMap};
use crate::error::{Error, Result};
use ndarray::Array1;

/// Key suffix of the flattened values tensor.
pub const VALUES_SUFFIX: &str = "__values";
/// Key suffix of the row offsets tensor.
pub const OFFSETS_SUFFIX: &str = "__offsets";

/// `X__values` for base name `X`.
pub fn values_key(name: &str) -> String {
    format!("{name}{VALUES_SUFFIX}")
}

/// `X__offsets` for base name `X`.
pub fn offsets_key(name: &str) -> String {
    format!("{name}{OFFSETS_SUFFIX}")
}

/// Base names of all ragged features in `map`, identified by their
/// `__offsets` key.
pub fn ragged_names(map: &TensorMap) -> Vec<String> {
    map.keys()
        .filter_map(|k| k.strip_suffix(OFFSETS_SUFFIX))
        .map(str::to_string)
        .collect()
}

/// Split a ragged key into its base name, or `None` for dense keys.
pub(crate) fn base_name(key: &str) -> Option<&str> {
    key.strip_suffix(OFFSETS_SUFFIX)
        .or_else(|| key.strip_suffix(VALUES_SUFFIX))
}

/// A validated values/offsets pair.
#[derive(Debug, Clone, PartialEq)]
pub struct RaggedTensor {
    name: String,
    values: Tensor,
    offsets: Vec<usize>,
}

impl RaggedTensor {
    /// Pair `values` with `offsets`, checking the ragged invariant.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRagged`] if offsets are not a non-decreasing
    /// 1-D sequence starting at 0 and ending at the number of values.
    pub fn new(name: impl Into<String>, values: Tensor, offsets: &Tensor) -> Result<Self> {
        let name = name.into();
        if values.ndim() == 0 {
            return Err(Error::invalid_ragged(&name, "values must have at least one dimension"));
        }
        if offsets.ndim() != 1 {
            return Err(Error::invalid_ragged(
                &name,
                format!("offsets must be 1-D, got {} dimensions", offsets.ndim()),
            ));
        }

        let raw = offsets.to_i64_vec(&offsets_key(&name))?;
        let Some(&first) = raw.first() else {
            return Err(Error::invalid_ragged(&name, "offsets cannot be empty"));
        };
        if first != 0 {
            return Err(Error::invalid_ragged(
                &name,
                format!("offsets must start at 0, got {first}"),
            ));
        }
        if let Some(pos) = raw.windows(2).position(|w| w[1] < w[0]) {
            return Err(Error::invalid_ragged(
                &name,
                format!(
                    "offsets must be non-decreasing, got {} after {}",
                    raw[pos + 1],
                    raw[pos]
                ),
            ));
        }
        let last = raw[raw.len() - 1] as usize;
        if last != values.len() {
            return Err(Error::invalid_ragged(
                &name,
                format!("final offset {last} does not match {} values", values.len()),
            ));
        }

        Ok(Self {
            name,
            values,
            offsets: raw.into_iter().map(|o| o as usize).collect(),
        })
    }

    /// Extract and validate ragged feature `name` from `map`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingFeature`] if either half of the pair is absent,
    /// or [`Error::InvalidRagged`] if the pair is malformed.
    pub fn from_map(map: &TensorMap, name: &str) -> Result<Self> {
        let values_key = values_key(name);
        let offsets_key = offsets_key(name);
        let values = map
            .get(&values_key)
            .ok_or(Error::MissingFeature(values_key))?;
        let offsets = map
            .get(&offsets_key)
            .ok_or(Error::MissingFeature(offsets_key))?;
        Self::new(name, values.clone(), offsets)
    }

    /// Encode integer rows.
    pub fn from_rows_i64(name: impl Into<String>, rows: &[Vec<i64>]) -> Self {
        let (values, offsets) = flatten(rows);
        Self {
            name: name.into(),
            values: Tensor::Int64(Array1::from(values).into_dyn()),
            offsets,
        }
    }

    /// Encode float rows.
    pub fn from_rows_f32(name: impl Into<String>, rows: &[Vec<f32>]) -> Self {
        let (values, offsets) = flatten(rows);
        Self {
            name: name.into(),
            values: Tensor::Float32(Array1::from(values).into_dyn()),
            offsets,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &Tensor {
        &self.values
    }

    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Number of rows (examples).
    pub fn num_rows(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Length of every row, derived from consecutive offsets.
    pub fn row_lengths(&self) -> Vec<i64> {
        self.offsets
            .windows(2)
            .map(|w| (w[1] - w[0]) as i64)
            .collect()
    }

    /// Length of the longest row, 0 for an empty batch.
    pub fn max_row_length(&self) -> usize {
        self.offsets
            .windows(2)
            .map(|w| w[1] - w[0])
            .max()
            .unwrap_or(0)
    }

    /// Dense `(rows, max_len, ...)` tensor; short rows are filled with
    /// `pad_value` and long rows truncated.
    pub fn to_padded(&self, max_len: usize, pad_value: f64) -> Tensor {
        match &self.values {
            Tensor::Float32(v) => {
                Tensor::Float32(ops::pad_rows(v, &self.offsets, max_len, pad_value as f32))
            }
            Tensor::Int64(v) => {
                Tensor::Int64(ops::pad_rows(v, &self.offsets, max_len, pad_value as i64))
            }
        }
    }

    /// Offsets as a 1-D `int64` tensor.
    pub fn offsets_tensor(&self) -> Tensor {
        let offsets: Vec<i64> = self.offsets.iter().map(|&o| o as i64).collect();
        Tensor::Int64(Array1::from(offsets).into_dyn())
    }

    /// Write the `__values`/`__offsets` pair into `map`.
    pub fn insert_into(&self, map: &mut TensorMap) {
        map.insert(values_key(&self.name), self.values.clone());
        map.insert(offsets_key(&self.name), self.offsets_tensor());
    }
}

fn flatten<T: Clone>(rows: &[Vec<T>]) -> (Vec<T>, Vec<usize>) {
    let mut offsets = Vec::with_capacity(rows.len() + 1);
    offsets.push(0);
    let mut values = Vec::new();
    for row in rows {
        values.extend_from_slice(row);
        offsets.push(values.len());
    }
    (values, offsets)
}
