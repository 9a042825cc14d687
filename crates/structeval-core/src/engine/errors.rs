//! Error types for structeval evaluation.

use thiserror::Error;

impl From<csv::Error> for EvalError {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            match err.into_kind() {
                csv::ErrorKind::Io(io) => EvalError::Io(io),
                other => EvalError::Storage(format!("{:?}", other)),
            }
        } else {
            EvalError::Storage(err.to_string())
        }
    }
}

/// Errors that can occur while loading, aligning, reducing or scoring matrices.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in the future without breaking changes.
///
/// All public APIs return `Result<T, EvalError>`; score computations on
/// well-formed same-shaped matrices never fail.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum EvalError {
    /// Two matrices that must share a shape do not.
    #[error("dimension mismatch: {left}x{left} vs {right}x{right}")]
    DimensionMismatch { left: usize, right: usize },

    /// The declared observed count exceeds the aligned matrix size.
    #[error("invalid observed count: {observed} observed variables in a {size}x{size} matrix")]
    InvalidObservedCount { observed: usize, size: usize },

    /// The equivalence-class oracle rejected its input (e.g. a directed cycle).
    #[error("equivalence conversion failed: {0}")]
    EquivalenceConversionFailed(String),

    /// Structurally malformed matrix or label set.
    #[error("invalid matrix: {0}")]
    InvalidMatrix(String),

    /// Ground-truth observed variables with no counterpart in the prediction.
    #[error("observed variables missing from prediction: {}", missing.join(", "))]
    ObservedMismatch { missing: Vec<String> },

    /// Latent block too large for exhaustive relabeling search.
    #[error("latent block of {latents} variables exceeds search limit of {limit}")]
    LatentBlockTooLarge { latents: usize, limit: usize },

    /// Malformed delimited table.
    #[error("storage error: {0}")]
    Storage(String),

    /// Underlying I/O failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
