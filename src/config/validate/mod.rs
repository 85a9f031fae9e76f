//! Configuration validation
//!
//! Validates transform specifications before any transform is built.

mod error;
mod validator;

#[cfg(test)]
mod proptests;

pub use error::ValidationError;
pub use validator::validate_config;
