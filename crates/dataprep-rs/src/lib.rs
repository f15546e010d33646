//! Data-preparation utilities over a typed, strided array engine.
//!
//! The [`tensor`] module is the core: a closed set of ten numeric element
//! kinds, an owned [`tensor::Buffer`], the 2-D [`tensor::Matrix`], and the
//! general N-D [`tensor::Tensor`]. The remaining modules are thin transforms
//! written against that engine: text vectorizers and TF-IDF weighting,
//! one-hot categorical encoding, image patch extraction and color
//! quantization, classification metrics, standardization, and train/test
//! splitting.

pub mod encoding;
pub mod image;
pub mod metrics;
pub mod preprocess;
pub mod split;
pub mod tensor;
pub mod text;

pub use tensor::{Buffer, DType, DimSpec, Matrix, Scalar, Tensor, TensorError};
