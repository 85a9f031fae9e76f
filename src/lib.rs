//! # Recomendar: sequence transforms for recommender batches
//!
//! Prepares batches of tabular recommender features for sequential models:
//!
//! - **Padding**: ragged (`X__values` + `X__offsets`) and dense sequence
//!   features are padded or truncated to a common length, recording each
//!   row's original length
//! - **Broadcasting**: per-example context features are replicated along
//!   the sequence axis
//! - **Configuration**: transforms are declared in YAML against a tagged
//!   column schema
//!
//! ## Example
//!
//! ```
//! use recomendar::schema::{ColumnSchema, Schema, Tag};
//! use recomendar::tensor::{RaggedTensor, TensorMap};
//! use recomendar::transforms::{BatchTransform, TabularPadding};
//! use recomendar::Batch;
//!
//! let schema = Schema::new(vec![
//!     ColumnSchema::new("item_ids").with_tags([Tag::Sequence, Tag::ItemId]),
//! ])?;
//! let padding = TabularPadding::from_schema(&schema, Some(4))?;
//!
//! let mut features = TensorMap::new();
//! RaggedTensor::from_rows_i64("item_ids", &[vec![7, 8], vec![9]]).insert_into(&mut features);
//!
//! let padded = padding.transform(&Batch::new(features))?;
//! assert_eq!(padded.features["item_ids"].shape(), &[2, 4]);
//! assert_eq!(padded.sequences.unwrap().length("item_ids").unwrap().to_vec(), vec![2, 1]);
//! # Ok::<(), recomendar::Error>(())
//! ```

pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod io;
pub mod schema;
pub mod tensor;
pub mod transforms;

pub use batch::{Batch, Sequences};
pub use error::{Error, Result};
pub use schema::{ColumnSchema, Schema, Tag};
pub use tensor::{RaggedTensor, Tensor, TensorMap};
