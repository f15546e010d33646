//! The array engine: typed, reshapeable, strided numeric storage.
//!
//! Everything else in the crate (vectorizers, encoders, image helpers,
//! metrics) allocates, reshapes, slices, and mutates the containers defined
//! here. The engine is single-threaded, synchronous, and copy-on-derive:
//! every tensor exclusively owns its buffer, and every derived structure is
//! an independent copy, trading memory for the absence of aliasing bugs.

mod buffer;
pub mod dtype;
mod error;
mod matrix;
mod nd;

pub use buffer::{Buffer, ScalarIter};
pub use dtype::{DType, Scalar};
pub use error::{Result, TensorError};
pub use matrix::{Cols, Matrix, Rows};
pub use nd::{contiguous_strides, DimSpec, Slabs, Tensor};
