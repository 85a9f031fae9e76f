//! Validation error types
//!
//! Defines all validation error variants for transform specifications.

/// Validation error type
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ValidationError {
    #[error("Schema must contain at least one column")]
    EmptySchema,

    #[error("Column names cannot be empty")]
    EmptyColumnName,

    #[error("Duplicate column name: {0}")]
    DuplicateColumn(String),

    #[error("Invalid max sequence length: {0} (must be > 0)")]
    InvalidMaxSequenceLength(usize),

    #[error("Invalid value count for {column}: min {min} > max {max}")]
    InvalidValueCount {
        column: String,
        min: usize,
        max: usize,
    },

    #[error("Invalid pad value: {0} (must be finite)")]
    InvalidPadValue(f64),

    #[error("Selection for {0} cannot be empty")]
    EmptySelection(&'static str),

    #[error("Selection for {selection} refers to unknown column: {column}")]
    UnknownColumn {
        selection: &'static str,
        column: String,
    },

    #[error("Features cannot be both broadcast and sequence: {0}")]
    OverlappingBroadcast(String),
}
