//! General N-dimensional tensor over one buffer.
//!
//! A [`Tensor`] pairs a [`Buffer`] with a shape and row-major strides. Strides
//! are recomputed whenever a new tensor is produced, never patched in place,
//! and rank is fixed at construction. The 2-D case is [`Matrix`]; the two
//! convert losslessly in both directions.

use serde::{Deserialize, Serialize};

use super::buffer::Buffer;
use super::dtype::{DType, Scalar};
use super::error::{Result, TensorError};
use super::matrix::Matrix;

/// One dimension of a possibly-partial shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimSpec {
    /// A known extent.
    Sized(usize),
    /// Left for inference from the buffer length; at most one per shape.
    Infer,
}

/// Computes row-major (C order) strides for a shape.
pub fn contiguous_strides(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![1; shape.len()];
    let mut running = 1usize;
    for axis in (0..shape.len()).rev() {
        strides[axis] = running;
        running = running.saturating_mul(shape[axis]);
    }
    strides
}

fn checked_numel(shape: &[usize]) -> Result<usize> {
    shape
        .iter()
        .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
        .ok_or_else(|| TensorError::InvalidLength {
            reason: format!("shape {shape:?} overflows the address space"),
        })
}

/// Owned N-dimensional array of one element kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tensor {
    buffer: Buffer,
    shape: Vec<usize>,
    strides: Vec<usize>,
}

impl Tensor {
    /// Allocates a zero-filled tensor of the given kind and shape.
    pub fn zeros(dtype: DType, shape: &[usize]) -> Result<Self> {
        let numel = checked_numel(shape)?;
        Ok(Tensor {
            buffer: Buffer::alloc(dtype, numel)?,
            shape: shape.to_vec(),
            strides: contiguous_strides(shape),
        })
    }

    /// Takes ownership of `buffer` under the given shape.
    pub fn from_buffer(buffer: Buffer, shape: &[usize]) -> Result<Self> {
        let numel = checked_numel(shape)?;
        if buffer.len() != numel {
            return Err(TensorError::ShapeMismatch {
                expected: shape.to_vec(),
                actual: vec![buffer.len()],
            });
        }
        Ok(Tensor {
            buffer,
            shape: shape.to_vec(),
            strides: contiguous_strides(shape),
        })
    }

    /// Takes ownership of `buffer` under a shape with at most one inferred
    /// dimension.
    ///
    /// More than one [`DimSpec::Infer`] fails with `IncompleteShape`; a buffer
    /// length not divisible by the known extents fails with `ShapeMismatch`.
    pub fn from_buffer_inferred(buffer: Buffer, dims: &[DimSpec]) -> Result<Self> {
        let inferred = dims
            .iter()
            .filter(|d| matches!(d, DimSpec::Infer))
            .count();
        if inferred > 1 {
            return Err(TensorError::IncompleteShape);
        }
        let known: Vec<usize> = dims
            .iter()
            .filter_map(|d| match d {
                DimSpec::Sized(n) => Some(*n),
                DimSpec::Infer => None,
            })
            .collect();
        if inferred == 0 {
            return Tensor::from_buffer(buffer, &known);
        }
        let known_numel = checked_numel(&known)?;
        if known_numel == 0 {
            return Err(TensorError::InvalidLength {
                reason: "cannot infer a dimension alongside a zero extent".to_string(),
            });
        }
        if buffer.len() % known_numel != 0 {
            return Err(TensorError::ShapeMismatch {
                expected: known,
                actual: vec![buffer.len()],
            });
        }
        let missing = buffer.len() / known_numel;
        let shape: Vec<usize> = dims
            .iter()
            .map(|d| match d {
                DimSpec::Sized(n) => *n,
                DimSpec::Infer => missing,
            })
            .collect();
        Tensor::from_buffer(buffer, &shape)
    }

    /// Returns the element kind of the stored values.
    pub fn dtype(&self) -> DType {
        self.buffer.dtype()
    }

    /// Borrows the shape.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Borrows the row-major strides.
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Returns the order (number of axes).
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Returns the total number of stored elements.
    pub fn numel(&self) -> usize {
        self.buffer.len()
    }

    /// Borrows the backing buffer.
    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// Consumes the tensor, handing the backing buffer back to the caller.
    pub fn into_buffer(self) -> Buffer {
        self.buffer
    }

    /// Converts a rank-2 tensor into its matrix form; any other rank fails
    /// with `ShapeMismatch` (the expected side reports the required rank).
    pub fn into_matrix(self) -> Result<Matrix> {
        if self.rank() == 2 {
            let (rows, cols) = (self.shape[0], self.shape[1]);
            Matrix::from_buffer(self.buffer, rows, cols)
        } else {
            Err(TensorError::ShapeMismatch {
                expected: vec![2],
                actual: self.shape,
            })
        }
    }

    fn linear_offset(&self, index: &[usize]) -> Result<usize> {
        if index.len() != self.rank() {
            return Err(TensorError::ShapeMismatch {
                expected: self.shape.clone(),
                actual: index.to_vec(),
            });
        }
        let mut offset = 0;
        for (&i, (&dim, &stride)) in index.iter().zip(self.shape.iter().zip(&self.strides)) {
            if i >= dim {
                return Err(TensorError::IndexOutOfRange {
                    index: i,
                    extent: dim,
                });
            }
            offset += i * stride;
        }
        Ok(offset)
    }

    /// Reads the element at a per-axis index.
    pub fn item(&self, index: &[usize]) -> Result<Scalar> {
        let offset = self.linear_offset(index)?;
        self.buffer.get(offset)
    }

    /// Writes `value` at a per-axis index; a failed bounds or domain check
    /// leaves the buffer untouched.
    pub fn set_item(&mut self, index: &[usize], value: Scalar) -> Result<()> {
        let offset = self.linear_offset(index)?;
        self.buffer.set(offset, value)
    }

    /// Returns an owned copy of the `i`th axis-0 slab (rank reduced by one).
    pub fn slab(&self, i: usize) -> Result<Tensor> {
        if self.rank() == 0 {
            return Err(TensorError::AxisOutOfRange { axis: 0, rank: 0 });
        }
        if i >= self.shape[0] {
            return Err(TensorError::IndexOutOfRange {
                index: i,
                extent: self.shape[0],
            });
        }
        let slab_len = self.strides[0];
        let buffer = self.buffer.copy_slice(i * slab_len, (i + 1) * slab_len)?;
        Tensor::from_buffer(buffer, &self.shape[1..])
    }

    /// Returns the sub-tensor covering `[start, end)` along `axis`.
    ///
    /// `end = None` means the full remaining extent along that axis.
    pub fn slice(&self, start: usize, end: Option<usize>, axis: usize) -> Result<Tensor> {
        if axis >= self.rank() {
            return Err(TensorError::AxisOutOfRange {
                axis,
                rank: self.rank(),
            });
        }
        let extent = self.shape[axis];
        let end = end.unwrap_or(extent);
        if start > end || end > extent {
            return Err(TensorError::IndexOutOfRange {
                index: end.max(start),
                extent,
            });
        }
        let stride = self.strides[axis];
        let block_in = extent * stride;
        let block_out = (end - start) * stride;
        let outer: usize = self.shape[..axis].iter().product();
        let mut shape = self.shape.clone();
        shape[axis] = end - start;
        let mut out = Buffer::alloc(self.dtype(), outer * block_out)?;
        for o in 0..outer {
            out.copy_range_from(
                o * block_out,
                &self.buffer,
                o * block_in + start * stride,
                block_out,
            )?;
        }
        Tensor::from_buffer(out, &shape)
    }

    /// Keeps the axis-0 slabs for which the predicate holds, preserving
    /// order; axis-0 length of the result equals the number of matches.
    pub fn filter<F>(&self, mut predicate: F) -> Result<Tensor>
    where
        F: FnMut(&Tensor, usize) -> bool,
    {
        if self.rank() == 0 {
            return Err(TensorError::AxisOutOfRange { axis: 0, rank: 0 });
        }
        let slab_len = self.strides[0];
        let mut kept = Vec::new();
        for i in 0..self.shape[0] {
            let slab = self.slab(i)?;
            if predicate(&slab, i) {
                kept.push(i);
            }
        }
        let mut shape = self.shape.clone();
        shape[0] = kept.len();
        let mut out = Buffer::alloc(self.dtype(), kept.len() * slab_len)?;
        for (dst, &src) in kept.iter().enumerate() {
            out.copy_range_from(dst * slab_len, &self.buffer, src * slab_len, slab_len)?;
        }
        Tensor::from_buffer(out, &shape)
    }

    /// Returns the reversed-axes transpose as a freshly allocated tensor.
    ///
    /// For rank 2 this is the usual matrix transpose: element `(i, j)` of the
    /// result equals element `(j, i)` of the source.
    pub fn transpose(&self) -> Result<Tensor> {
        let rank = self.rank();
        let rev_shape: Vec<usize> = self.shape.iter().rev().copied().collect();
        let mut out = Buffer::alloc(self.dtype(), self.buffer.len())?;
        if self.buffer.is_empty() {
            return Tensor::from_buffer(out, &rev_shape);
        }
        // Walk destination offsets sequentially, odometer-style, reading the
        // source through reversed strides.
        let mut index = vec![0usize; rank];
        for dst_offset in 0..self.buffer.len() {
            let mut src_offset = 0;
            for axis in 0..rank {
                src_offset += index[axis] * self.strides[rank - 1 - axis];
            }
            out.set(dst_offset, self.buffer.get(src_offset)?)?;
            for axis in (0..rank).rev() {
                index[axis] += 1;
                if index[axis] < rev_shape[axis] {
                    break;
                }
                index[axis] = 0;
            }
        }
        Tensor::from_buffer(out, &rev_shape)
    }

    /// Restartable iterator over owned axis-0 slabs.
    pub fn iter(&self) -> Slabs<'_> {
        Slabs {
            tensor: self,
            index: 0,
        }
    }
}

impl From<Matrix> for Tensor {
    fn from(matrix: Matrix) -> Self {
        let [rows, cols] = matrix.shape();
        let shape = vec![rows, cols];
        Tensor {
            strides: contiguous_strides(&shape),
            buffer: matrix.into_buffer(),
            shape,
        }
    }
}

/// Iterator yielding each axis-0 slab as an owned tensor.
pub struct Slabs<'a> {
    tensor: &'a Tensor,
    index: usize,
}

impl Iterator for Slabs<'_> {
    type Item = Tensor;

    fn next(&mut self) -> Option<Tensor> {
        if self.tensor.rank() == 0 || self.index >= self.tensor.shape[0] {
            return None;
        }
        let slab = self.tensor.slab(self.index).ok();
        self.index += 1;
        slab
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let total = if self.tensor.rank() == 0 {
            0
        } else {
            self.tensor.shape[0]
        };
        let remaining = total.saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Slabs<'_> {}
