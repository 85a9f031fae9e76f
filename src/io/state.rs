//! Serializable batch state

use crate::batch::Batch;
use crate::error::{Error, Result};
use crate::tensor::{DType, Tensor, TensorMap};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Suffix of the per-row length features written for padded sequences.
pub const LENGTHS_SUFFIX: &str = "__lengths";

/// Flat tensor data; integers and floats are told apart by their JSON/YAML
/// representation, then converted to the declared dtype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TensorData {
    Int(Vec<i64>),
    Float(Vec<f32>),
}

impl TensorData {
    pub fn len(&self) -> usize {
        match self {
            TensorData::Int(v) => v.len(),
            TensorData::Float(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A tensor as written to a batch file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TensorState {
    pub dtype: DType,
    pub shape: Vec<usize>,
    pub data: TensorData,
}

impl TensorState {
    pub fn from_tensor(tensor: &Tensor) -> Self {
        let data = match tensor {
            Tensor::Float32(a) => TensorData::Float(a.iter().copied().collect()),
            Tensor::Int64(a) => TensorData::Int(a.iter().copied().collect()),
        };
        Self {
            dtype: tensor.dtype(),
            shape: tensor.shape().to_vec(),
            data,
        }
    }

    /// Rebuild the tensor, checking that the data fills the shape.
    pub fn into_tensor(self, name: &str) -> Result<Tensor> {
        let expected = self
            .shape
            .iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d))
            .ok_or_else(|| {
                Error::Serialization(format!("tensor {name}: shape {:?} overflows", self.shape))
            })?;
        if expected != self.data.len() {
            return Err(Error::Serialization(format!(
                "tensor {name}: shape {:?} needs {expected} values, found {}",
                self.shape,
                self.data.len()
            )));
        }

        match (self.dtype, self.data) {
            (DType::Float32, TensorData::Float(v)) => Tensor::from_f32(&self.shape, v),
            (DType::Float32, TensorData::Int(v)) => {
                Tensor::from_f32(&self.shape, v.into_iter().map(|x| x as f32).collect())
            }
            (DType::Int64, TensorData::Int(v)) => Tensor::from_i64(&self.shape, v),
            (DType::Int64, TensorData::Float(v)) => {
                if v.iter().any(|x| x.fract() != 0.0) {
                    return Err(Error::Serialization(format!(
                        "tensor {name}: int64 data contains fractional values"
                    )));
                }
                Tensor::from_i64(&self.shape, v.into_iter().map(|x| x as i64).collect())
            }
        }
    }
}

/// A batch as written to a file
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BatchState {
    pub features: BTreeMap<String, TensorState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targets: Option<BTreeMap<String, TensorState>>,
}

impl BatchState {
    /// Snapshot `batch`; with `include_lengths`, recorded sequence lengths
    /// become `<name>__lengths` features.
    pub fn from_batch(batch: &Batch, include_lengths: bool) -> Self {
        let mut features = map_state(&batch.features);
        if include_lengths {
            if let Some(sequences) = &batch.sequences {
                for (name, lengths) in sequences.iter() {
                    let tensor = Tensor::from(lengths.clone());
                    features.insert(
                        format!("{name}{LENGTHS_SUFFIX}"),
                        TensorState::from_tensor(&tensor),
                    );
                }
            }
        }
        Self {
            features,
            targets: batch.targets.as_ref().map(map_state),
        }
    }

    /// Name of the first tensor holding NaN or infinite values.
    pub fn first_non_finite(&self) -> Option<&str> {
        self.features
            .iter()
            .chain(self.targets.iter().flatten())
            .find(|(_, state)| {
                matches!(&state.data, TensorData::Float(v) if v.iter().any(|x| !x.is_finite()))
            })
            .map(|(name, _)| name.as_str())
    }

    pub fn into_batch(self) -> Result<Batch> {
        let features = map_tensors(self.features)?;
        let targets = self.targets.map(map_tensors).transpose()?;
        Ok(Batch {
            features,
            targets,
            sequences: None,
        })
    }
}

fn map_state(map: &TensorMap) -> BTreeMap<String, TensorState> {
    map.iter()
        .map(|(name, tensor)| (name.clone(), TensorState::from_tensor(tensor)))
        .collect()
}

fn map_tensors(map: BTreeMap<String, TensorState>) -> Result<TensorMap> {
    map.into_iter()
        .map(|(name, state)| {
            let tensor = state.into_tensor(&name)?;
            Ok((name, tensor))
        })
        .collect()
}
