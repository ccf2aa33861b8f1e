//! Error type shared by every fitting / evaluation operation.
//!
//! Malformed input is a fatal precondition violation for the single call that
//! received it: nothing is truncated, padded or retried.  Degenerate but legal
//! inputs (rank-deficient designs, zero-variance channels) are *not* errors;
//! see [`crate::ols`] and [`crate::evaluate`] for how they are resolved.
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodingError {
    /// Two arrays that must agree along one dimension do not.
    #[error("shape mismatch in {what}: expected {expected}, got {got}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    /// A delay embedding was requested with no delays.
    #[error("delay list is empty")]
    EmptyDelays,

    /// An input with zero rows / columns where data is required.
    #[error("empty input: {0}")]
    Empty(&'static str),

    /// NaN or ±inf in an input matrix.
    #[error("non-finite value in {0}")]
    NonFinite(&'static str),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The SVD solver refused the system.
    #[error("least-squares solver failed: {0}")]
    Solver(String),
}

pub type Result<T> = std::result::Result<T, EncodingError>;

/// Fail with [`EncodingError::ShapeMismatch`] unless `expected == got`.
pub(crate) fn check_dim(what: &'static str, expected: usize, got: usize) -> Result<()> {
    if expected != got {
        return Err(EncodingError::ShapeMismatch { what, expected, got });
    }
    Ok(())
}
