//! Failure taxonomy shared by every array-engine operation.
//!
//! The engine either returns a valid result or fails loudly; no operation
//! defaults a dtype, coerces between numeric domains, or leaves a partial
//! write visible after a failed bounds or domain check.

use thiserror::Error;

use super::dtype::DType;

/// Errors produced by buffer, matrix, and tensor operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TensorError {
    /// A dtype tag outside the closed set of ten kinds was requested.
    #[error("unsupported element kind tag `{tag}`")]
    UnsupportedElementKind { tag: String },

    /// A nonsensical size was requested for allocation (element count or byte
    /// size overflows `usize`, or a required dimension was zero).
    #[error("invalid length: {reason}")]
    InvalidLength { reason: String },

    /// Buffer length and requested shape disagree, or two structures that must
    /// share a shape (e.g. `dot` operands) do not.
    #[error("shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// More than one dimension was left for inference.
    #[error("incomplete shape: more than one dimension left for inference")]
    IncompleteShape,

    /// A read or write index falls outside the addressed extent.
    #[error("index {index} out of range for extent {extent}")]
    IndexOutOfRange { index: usize, extent: usize },

    /// An axis argument is not smaller than the tensor's rank.
    #[error("axis {axis} out of range for rank {rank}")]
    AxisOutOfRange { axis: usize, rank: usize },

    /// A value outside the storage's numeric domain was used in a write or an
    /// arithmetic operation. Covers dtype disagreement as well as checked
    /// integer arithmetic that would overflow the storage domain.
    #[error("domain mismatch in {op}: {detail}")]
    DomainMismatch { op: &'static str, detail: String },
}

impl TensorError {
    pub(crate) fn domain(op: &'static str, expected: DType, actual: DType) -> Self {
        TensorError::DomainMismatch {
            op,
            detail: format!("storage is {expected} but the value is {actual}"),
        }
    }

    pub(crate) fn overflow(op: &'static str, dtype: DType) -> Self {
        TensorError::DomainMismatch {
            op,
            detail: format!("result does not fit in the {dtype} domain"),
        }
    }
}

/// Convenience alias used across the engine.
pub type Result<T> = std::result::Result<T, TensorError>;
