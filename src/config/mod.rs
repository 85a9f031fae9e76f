//! Declarative YAML configuration
//!
//! A [`TransformSpec`] names the input schema and configures padding and
//! optional context broadcasting:
//!
//! ```yaml
//! schema:
//!   - name: item_id_seq
//!     tags: [sequence, item_id]
//!   - name: user_age
//!     tags: [context]
//! padding:
//!   max_sequence_length: 8
//! broadcast:
//!   to_broadcast: {tags: [context]}
//!   sequence: {names: [item_id_seq]}
//! ```

mod builder;
pub mod cli;
mod loader;
mod schema;
mod validate;

pub use cli::{apply_overrides, parse_args, Cli, Command, InfoArgs, OutputFormat, PadArgs, ValidateArgs};
pub use loader::{load_config, parse_config, parse_config_str};
pub use schema::{BroadcastSpec, PaddingSpec, TransformSpec};
pub use validate::{validate_config, ValidationError};
