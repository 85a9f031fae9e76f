//! Typed n-dimensional tensors and the feature map convention
//!
//! Features travel through transforms as a [`TensorMap`]: feature name to
//! [`Tensor`]. Variable-length features use the ragged naming convention
//! (`X__values` / `X__offsets`), see [`RaggedTensor`].

mod ops;
mod ragged;


pub use ragged::{
    offsets_key, ragged_names, values_key, RaggedTensor, OFFSETS_SUFFIX, VALUES_SUFFIX,
};
pub(crate) use ragged::base_name;

use crate::error::{Error, Result};
use ndarray::{Array, ArrayD, Dimension, IxDyn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Ordered mapping from feature name to tensor.
pub type TensorMap = BTreeMap<String, Tensor>;

/// Element type of a [`Tensor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    Float32,
    Int64,
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DType::Float32 => write!(f, "float32"),
            DType::Int64 => write!(f, "int64"),
        }
    }
}

/// A dense tensor of `f32` values or `i64` ids.
#[derive(Debug, Clone, PartialEq)]
pub enum Tensor {
    Float32(ArrayD<f32>),
    Int64(ArrayD<i64>),
}

impl Tensor {
    /// Build a float tensor from row-major data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if `data.len()` differs from the
    /// product of `shape`.
    pub fn from_f32(shape: &[usize], data: Vec<f32>) -> Result<Self> {
        let len = data.len();
        ArrayD::from_shape_vec(IxDyn(shape), data)
            .map(Tensor::Float32)
            .map_err(|_| Error::ShapeMismatch {
                expected: shape.to_vec(),
                actual: vec![len],
            })
    }

    /// Build an integer tensor from row-major data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if `data.len()` differs from the
    /// product of `shape`.
    pub fn from_i64(shape: &[usize], data: Vec<i64>) -> Result<Self> {
        let len = data.len();
        ArrayD::from_shape_vec(IxDyn(shape), data)
            .map(Tensor::Int64)
            .map_err(|_| Error::ShapeMismatch {
                expected: shape.to_vec(),
                actual: vec![len],
            })
    }

    pub fn dtype(&self) -> DType {
        match self {
            Tensor::Float32(_) => DType::Float32,
            Tensor::Int64(_) => DType::Int64,
        }
    }

    pub fn shape(&self) -> &[usize] {
        match self {
            Tensor::Float32(a) => a.shape(),
            Tensor::Int64(a) => a.shape(),
        }
    }

    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Size of the leading (batch) dimension; 0 for scalars.
    pub fn len(&self) -> usize {
        self.shape().first().copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_f32(&self) -> Option<&ArrayD<f32>> {
        match self {
            Tensor::Float32(a) => Some(a),
            Tensor::Int64(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<&ArrayD<i64>> {
        match self {
            Tensor::Int64(a) => Some(a),
            Tensor::Float32(_) => None,
        }
    }

    /// Pad or truncate the second dimension to `max_len`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedRank`] for tensors of rank < 2.
    pub fn pad_sequence(&self, max_len: usize, pad_value: f64) -> Result<Tensor> {
        if self.ndim() < 2 {
            return Err(Error::UnsupportedRank { ndim: self.ndim() });
        }
        Ok(match self {
            Tensor::Float32(a) => Tensor::Float32(ops::pad_axis1(a, max_len, pad_value as f32)),
            Tensor::Int64(a) => Tensor::Int64(ops::pad_axis1(a, max_len, pad_value as i64)),
        })
    }

    /// Per-row count of sequence positions that are not entirely padding.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedRank`] for tensors of rank < 2.
    pub fn sequence_lengths(&self, pad_value: f64) -> Result<Vec<i64>> {
        if self.ndim() < 2 {
            return Err(Error::UnsupportedRank { ndim: self.ndim() });
        }
        Ok(match self {
            Tensor::Float32(a) => ops::non_pad_lengths(a, &(pad_value as f32)),
            Tensor::Int64(a) => ops::non_pad_lengths(a, &(pad_value as i64)),
        })
    }

    /// Replicate along a new sequence axis inserted after the batch axis.
    ///
    /// `(B, D)` becomes `(B, L, D)` and `(B, A, D)` becomes `(B, L, A, D)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedRank`] unless the tensor is 2-D or 3-D.
    pub fn broadcast_to_sequence(&self, seq_len: usize) -> Result<Tensor> {
        match self.ndim() {
            2 | 3 => {}
            ndim => return Err(Error::UnsupportedRank { ndim }),
        }
        Ok(match self {
            Tensor::Float32(a) => Tensor::Float32(ops::repeat_axis1(a, seq_len)?),
            Tensor::Int64(a) => Tensor::Int64(ops::repeat_axis1(a, seq_len)?),
        })
    }

    /// Flatten to a vector of `i64`, accepting integral floats.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DtypeMismatch`] if a float element is not integral.
    pub fn to_i64_vec(&self, feature: &str) -> Result<Vec<i64>> {
        match self {
            Tensor::Int64(a) => Ok(a.iter().copied().collect()),
            Tensor::Float32(a) => a
                .iter()
                .map(|&v| {
                    if v.fract() == 0.0 && v.is_finite() {
                        Ok(v as i64)
                    } else {
                        Err(Error::DtypeMismatch {
                            feature: feature.to_string(),
                            expected: DType::Int64.to_string(),
                            actual: DType::Float32.to_string(),
                        })
                    }
                })
                .collect(),
        }
    }
}

impl<D: Dimension> From<Array<f32, D>> for Tensor {
    fn from(array: Array<f32, D>) -> Self {
        Tensor::Float32(array.into_dyn())
    }
}

impl<D: Dimension> From<Array<i64, D>> for Tensor {
    fn from(array: Array<i64, D>) -> Self {
        Tensor::Int64(array.into_dyn())
    }
}
