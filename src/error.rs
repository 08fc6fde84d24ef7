//! Error types for fedmean

use thiserror::Error;

/// All possible errors raised by the aggregator and its collaborators
#[derive(Error, Debug)]
pub enum AggregatorError {
    /// `aggregate` was called before any contribution was accepted
    #[error("No contributions to aggregate")]
    EmptyAggregation,

    /// A contribution lacks a variable present in the first contribution
    #[error("Contribution {contribution} is missing variable '{variable}'")]
    MissingVariable {
        /// Variable name taken from the first contribution
        variable: String,
        /// Index of the offending contribution in collection order
        contribution: usize,
    },

    /// Arrays for the same variable disagree on shape
    #[error("Shape mismatch for '{variable}': expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// Variable name
        variable: String,
        /// Shape of the first contribution's array
        expected: Vec<usize>,
        /// Shape of the mismatching array
        actual: Vec<usize>,
    },

    /// Arrays passed to a raw averaging kernel have different shapes
    #[error("Dimension mismatch: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        /// Shape of the first array
        expected: Vec<usize>,
        /// Shape of the mismatching array
        actual: Vec<usize>,
    },

    /// The host-supplied round context is malformed
    #[error("Context integrity error: {0}")]
    ContextIntegrity(String),

    /// Array shape error
    #[error("Array shape error: {0}")]
    ShapeError(String),

    /// Configuration could not be read, parsed or validated
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<ndarray::ShapeError> for AggregatorError {
    fn from(e: ndarray::ShapeError) -> Self {
        AggregatorError::ShapeError(e.to_string())
    }
}

impl From<toml::de::Error> for AggregatorError {
    fn from(e: toml::de::Error) -> Self {
        AggregatorError::Config(e.to_string())
    }
}
