//! Batch file input/output
//!
//! Batches are stored as JSON or YAML documents mapping feature names to
//! `{dtype, shape, data}` records, with an optional `targets` section.

mod format;
mod load;
mod save;
mod state;

pub use format::{BatchFormat, SaveConfig};
pub use load::{load_batch, parse_batch};
pub use save::{batch_to_string, save_batch};
pub use state::{BatchState, TensorData, TensorState, LENGTHS_SUFFIX};
