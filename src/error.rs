//! Error types for network construction, stepping and training.

use thiserror::Error;

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, NetError>;

#[derive(Error, Debug)]
pub enum NetError {
    /// Fewer than two layers, or a layer with no neurons
    #[error("invalid topology: {0}")]
    InvalidTopology(String),

    /// Input vector length differs from the input layer's non-bias count
    #[error("input size mismatch: expected {expected} values, got {got}")]
    InputSizeMismatch { expected: usize, got: usize },

    /// Target vector length differs from the output layer's non-bias count
    #[error("target size mismatch: expected {expected} values, got {got}")]
    TargetSizeMismatch { expected: usize, got: usize },

    /// NaN or infinity in a caller-supplied input or target vector
    #[error("non-finite value at index {index}")]
    NonFiniteValue { index: usize },

    #[error("invalid network options: {0}")]
    InvalidOptions(String),

    #[error("invalid dataset: {0}")]
    InvalidDataset(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
