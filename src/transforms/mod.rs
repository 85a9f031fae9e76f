//! Batch transforms for sequential recommendation inputs
//!
//! - [`TabularPadding`]: ragged and dense sequence features to a fixed width
//! - [`BroadcastToSequence`]: context features replicated along the sequence axis
//! - [`SequencePipeline`]: ordered chain of transforms
//!
//! # Example
//!
//! ```
//! use recomendar::batch::Batch;
//! use recomendar::schema::{ColumnSchema, Schema, Tag};
//! use recomendar::tensor::{RaggedTensor, TensorMap};
//! use recomendar::transforms::{BatchTransform, TabularPadding};
//!
//! let schema = Schema::new(vec![ColumnSchema::new("a").with_tags([Tag::Sequence])]).unwrap();
//! let padding = TabularPadding::from_schema(&schema, Some(4)).unwrap();
//!
//! let mut features = TensorMap::new();
//! RaggedTensor::from_rows_i64("a", &[vec![1, 2], vec![3]]).insert_into(&mut features);
//!
//! let padded = padding.transform(&Batch::new(features)).unwrap();
//! assert_eq!(padded.features["a"].shape(), &[2, 4]);
//! ```

mod broadcast;
mod padding;
mod pipeline;

#[cfg(test)]
mod tests;

pub use broadcast::BroadcastToSequence;
pub use padding::TabularPadding;
pub use pipeline::SequencePipeline;

use crate::batch::Batch;
use crate::error::Result;
use crate::schema::Schema;

/// A component whose feature lists are resolved against an input schema.
pub trait SchemaAware {
    /// Resolve tag- or name-based selections against `schema`.
    ///
    /// # Errors
    ///
    /// Returns an error if a selection refers to columns the schema lacks or
    /// the resolved sets conflict.
    fn initialize_from_schema(&mut self, schema: &Schema) -> Result<()>;
}

/// A per-batch transform.
pub trait BatchTransform: SchemaAware + Send + Sync {
    /// Apply the transform, returning a new batch.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch violates the transform's input contract.
    fn transform(&self, batch: &Batch) -> Result<Batch>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}
