//! Error types for sequence transforms.
//!
//! Every error is raised synchronously at call time and carries enough
//! context for the caller to fix the offending input.

use thiserror::Error;

/// Result type alias for recomendar operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or applying transforms.
#[derive(Error, Debug)]
pub enum Error {
    /// Sequence features in one batch imply different per-row lengths.
    #[error(
        "The sequential inputs must have the same length for each row in the batch, \
         but they are different: {details}"
    )]
    SequenceLengthMismatch { details: String },

    /// A tensor has a rank the operation cannot handle.
    #[error("Unsupported number of dimensions: {ndim}")]
    UnsupportedRank { ndim: usize },

    /// A `__values`/`__offsets` pair violates the ragged encoding.
    #[error("Invalid ragged feature '{feature}': {message}")]
    InvalidRagged { feature: String, message: String },

    /// A feature or column required by the operation is absent.
    #[error("Feature not found: {0}")]
    MissingFeature(String),

    /// A transform was used before `initialize_from_schema`.
    #[error("{0} must be initialized from a schema before use")]
    NotInitialized(String),

    /// A tensor has the wrong element type.
    #[error("Feature '{feature}' has dtype {actual}, expected {expected}")]
    DtypeMismatch {
        feature: String,
        expected: String,
        actual: String,
    },

    /// Tensor shapes are incompatible.
    #[error("Tensor shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Batch files could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Underlying I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build an [`Error::InvalidRagged`] for `feature`.
    pub fn invalid_ragged(feature: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRagged {
            feature: feature.into(),
            message: message.into(),
        }
    }

    /// Whether the error was caused by malformed batch contents rather than
    /// configuration or I/O.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::SequenceLengthMismatch { .. }
                | Self::UnsupportedRank { .. }
                | Self::InvalidRagged { .. }
                | Self::MissingFeature(_)
                | Self::DtypeMismatch { .. }
                | Self::ShapeMismatch { .. }
        )
    }
}
