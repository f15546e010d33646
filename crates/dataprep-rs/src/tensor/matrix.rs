//! Row-major 2-D specialization of the array engine.
//!
//! A [`Matrix`] is a collection of row vectors over one [`Buffer`], with the
//! implicit strides `[n_cols, 1]`. Every derived structure (transpose, slice,
//! filter, reductions, row/column extraction) allocates a fresh buffer and
//! copies; nothing in the engine hands out an aliasing view, so mutating a
//! derived matrix never touches its source.
//!
//! Reduction naming convention, fixed once and for all: `row_sum`/`row_mean`
//! accumulate *down the row index* and return one total per column (length
//! `n_cols`); `col_sum`/`col_mean` return one total per row (length `n_rows`).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::buffer::{dispatch_buffer, Buffer, Element};
use super::dtype::{DType, Scalar};
use super::error::{Result, TensorError};

/// Owned 2-D array of one element kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    buffer: Buffer,
    n_rows: usize,
    n_cols: usize,
}

impl Matrix {
    /// Allocates a zero-filled matrix of the given kind and shape.
    pub fn zeros(dtype: DType, n_rows: usize, n_cols: usize) -> Result<Self> {
        let len = n_rows
            .checked_mul(n_cols)
            .ok_or_else(|| TensorError::InvalidLength {
                reason: format!("{n_rows} x {n_cols} elements overflow the address space"),
            })?;
        Ok(Matrix {
            buffer: Buffer::alloc(dtype, len)?,
            n_rows,
            n_cols,
        })
    }

    /// Takes ownership of `buffer` as an `n_rows` x `n_cols` matrix.
    pub fn from_buffer(buffer: Buffer, n_rows: usize, n_cols: usize) -> Result<Self> {
        let expected = n_rows
            .checked_mul(n_cols)
            .ok_or_else(|| TensorError::InvalidLength {
                reason: format!("{n_rows} x {n_cols} elements overflow the address space"),
            })?;
        if buffer.len() != expected {
            return Err(TensorError::ShapeMismatch {
                expected: vec![n_rows, n_cols],
                actual: vec![buffer.len()],
            });
        }
        Ok(Matrix {
            buffer,
            n_rows,
            n_cols,
        })
    }

    /// Takes ownership of `buffer`, inferring the row count from `n_cols`.
    pub fn from_buffer_rows(buffer: Buffer, n_cols: usize) -> Result<Self> {
        if n_cols == 0 {
            return Err(TensorError::InvalidLength {
                reason: "cannot infer a row count from zero columns".to_string(),
            });
        }
        if buffer.len() % n_cols != 0 {
            return Err(TensorError::ShapeMismatch {
                expected: vec![buffer.len() / n_cols, n_cols],
                actual: vec![buffer.len()],
            });
        }
        let n_rows = buffer.len() / n_cols;
        Ok(Matrix {
            buffer,
            n_rows,
            n_cols,
        })
    }

    /// Returns the element kind of the stored values.
    pub fn dtype(&self) -> DType {
        self.buffer.dtype()
    }

    /// Returns `[n_rows, n_cols]`.
    pub fn shape(&self) -> [usize; 2] {
        [self.n_rows, self.n_cols]
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns.
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Borrows the backing buffer.
    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// Consumes the matrix, handing the backing buffer back to the caller.
    pub fn into_buffer(self) -> Buffer {
        self.buffer
    }

    fn check_row(&self, row: usize) -> Result<()> {
        if row >= self.n_rows {
            return Err(TensorError::IndexOutOfRange {
                index: row,
                extent: self.n_rows,
            });
        }
        Ok(())
    }

    fn check_col(&self, col: usize) -> Result<()> {
        if col >= self.n_cols {
            return Err(TensorError::IndexOutOfRange {
                index: col,
                extent: self.n_cols,
            });
        }
        Ok(())
    }

    /// Reads the element at `(row, col)`.
    pub fn item(&self, row: usize, col: usize) -> Result<Scalar> {
        self.check_row(row)?;
        self.check_col(col)?;
        self.buffer.get(row * self.n_cols + col)
    }

    /// Returns an owned copy of the `n`th row.
    pub fn row(&self, n: usize) -> Result<Buffer> {
        self.check_row(n)?;
        self.buffer
            .copy_slice(n * self.n_cols, (n + 1) * self.n_cols)
    }

    /// Returns an owned copy of the `n`th column (strided gather, O(n_rows)).
    pub fn col(&self, n: usize) -> Result<Buffer> {
        self.check_col(n)?;
        Ok(dispatch_buffer!(&self.buffer, data => {
            let mut out = Vec::with_capacity(self.n_rows);
            let mut offset = n;
            for _ in 0..self.n_rows {
                out.push(data[offset]);
                offset += self.n_cols;
            }
            Buffer::from(out)
        }))
    }

    /// Writes `value` at `(row, col)`.
    pub fn set_cell(&mut self, row: usize, col: usize, value: Scalar) -> Result<()> {
        self.check_row(row)?;
        self.check_col(col)?;
        self.buffer.set(row * self.n_cols + col, value)
    }

    /// Adds `value` to the element at `(row, col)` in the storage domain.
    ///
    /// The addend must belong to the same domain (a 64-bit-integer-backed
    /// matrix takes a 64-bit-integer addend); integer overflow is rejected and
    /// leaves the cell unchanged.
    pub fn set_add(&mut self, row: usize, col: usize, value: Scalar) -> Result<()> {
        self.check_row(row)?;
        self.check_col(col)?;
        let index = row * self.n_cols + col;
        let current = self.buffer.get(index)?;
        let next = current.checked_add(value)?;
        self.buffer.set(index, next)
    }

    /// Replaces the `row`th row with `values`.
    pub fn set_row(&mut self, row: usize, values: &Buffer) -> Result<()> {
        self.check_row(row)?;
        if values.len() != self.n_cols {
            return Err(TensorError::ShapeMismatch {
                expected: vec![self.n_cols],
                actual: vec![values.len()],
            });
        }
        self.buffer
            .copy_range_from(row * self.n_cols, values, 0, self.n_cols)
    }

    /// Replaces the `col`th column with `values`.
    pub fn set_col(&mut self, col: usize, values: &Buffer) -> Result<()> {
        self.check_col(col)?;
        if values.len() != self.n_rows {
            return Err(TensorError::ShapeMismatch {
                expected: vec![self.n_rows],
                actual: vec![values.len()],
            });
        }
        if values.dtype() != self.dtype() {
            return Err(TensorError::domain("set_col", self.dtype(), values.dtype()));
        }
        for i in 0..self.n_rows {
            self.buffer.set(i * self.n_cols + col, values.get(i)?)?;
        }
        Ok(())
    }

    /// Returns the transpose as a freshly allocated matrix.
    ///
    /// Streams source columns into contiguous destination rows: sequential
    /// reads down each column, contiguous writes on the destination side.
    pub fn transpose(&self) -> Matrix {
        let buffer = dispatch_buffer!(&self.buffer, data => {
            let mut out = vec![Element::zero(); data.len()];
            for c in 0..self.n_cols {
                let base = c * self.n_rows;
                for r in 0..self.n_rows {
                    out[base + r] = data[r * self.n_cols + c];
                }
            }
            Buffer::from(out)
        });
        Matrix {
            buffer,
            n_rows: self.n_cols,
            n_cols: self.n_rows,
        }
    }

    /// Sums down the row index: one total per column, length `n_cols`.
    ///
    /// An empty matrix reduces to all zeros. Integer kinds accumulate with
    /// wrapping arithmetic.
    pub fn row_sum(&self) -> Buffer {
        dispatch_buffer!(&self.buffer, data => {
            Buffer::from(sum_down_rows(data, self.n_rows, self.n_cols))
        })
    }

    /// Per-column means; integer kinds divide truncating toward zero.
    pub fn row_mean(&self) -> Buffer {
        if self.n_rows == 0 {
            return self.row_sum();
        }
        dispatch_buffer!(&self.row_sum(), sums => {
            Buffer::from(sums.iter().map(|&v| v.div_count(self.n_rows)).collect::<Vec<_>>())
        })
    }

    /// Sums along each row: one total per row, length `n_rows`.
    pub fn col_sum(&self) -> Buffer {
        dispatch_buffer!(&self.buffer, data => {
            Buffer::from(sum_along_rows(data, self.n_rows, self.n_cols))
        })
    }

    /// Per-row means; integer kinds divide truncating toward zero.
    pub fn col_mean(&self) -> Buffer {
        if self.n_cols == 0 {
            return self.col_sum();
        }
        dispatch_buffer!(&self.col_sum(), sums => {
            Buffer::from(sums.iter().map(|&v| v.div_count(self.n_cols)).collect::<Vec<_>>())
        })
    }

    /// Elementwise-product sum over the full buffer.
    ///
    /// Shapes and kinds must match. Accumulation is promoted to the widest
    /// domain of the matching signedness (128-bit for integers, `f64` for
    /// floats) and narrowed back with a checked conversion, so fixed-width
    /// wraparound can never silently corrupt the result; the returned scalar
    /// is `U64`, `I64`, or `F64` accordingly.
    pub fn dot(&self, rhs: &Matrix) -> Result<Scalar> {
        if self.shape() != rhs.shape() {
            return Err(TensorError::ShapeMismatch {
                expected: self.shape().to_vec(),
                actual: rhs.shape().to_vec(),
            });
        }
        fn narrow_u(acc: u128) -> Result<Scalar> {
            u64::try_from(acc)
                .map(Scalar::U64)
                .map_err(|_| TensorError::overflow("dot", DType::U64))
        }
        fn narrow_i(acc: i128) -> Result<Scalar> {
            i64::try_from(acc)
                .map(Scalar::I64)
                .map_err(|_| TensorError::overflow("dot", DType::I64))
        }
        match (&self.buffer, &rhs.buffer) {
            (Buffer::U8(a), Buffer::U8(b)) => {
                narrow_u(a.iter().zip(b).map(|(&x, &y)| x as u128 * y as u128).sum())
            }
            (Buffer::U16(a), Buffer::U16(b)) => {
                narrow_u(a.iter().zip(b).map(|(&x, &y)| x as u128 * y as u128).sum())
            }
            (Buffer::U32(a), Buffer::U32(b)) => {
                narrow_u(a.iter().zip(b).map(|(&x, &y)| x as u128 * y as u128).sum())
            }
            (Buffer::U64(a), Buffer::U64(b)) => {
                narrow_u(a.iter().zip(b).map(|(&x, &y)| x as u128 * y as u128).sum())
            }
            (Buffer::I8(a), Buffer::I8(b)) => {
                narrow_i(a.iter().zip(b).map(|(&x, &y)| x as i128 * y as i128).sum())
            }
            (Buffer::I16(a), Buffer::I16(b)) => {
                narrow_i(a.iter().zip(b).map(|(&x, &y)| x as i128 * y as i128).sum())
            }
            (Buffer::I32(a), Buffer::I32(b)) => {
                narrow_i(a.iter().zip(b).map(|(&x, &y)| x as i128 * y as i128).sum())
            }
            (Buffer::I64(a), Buffer::I64(b)) => {
                narrow_i(a.iter().zip(b).map(|(&x, &y)| x as i128 * y as i128).sum())
            }
            (Buffer::F32(a), Buffer::F32(b)) => Ok(Scalar::F64(
                a.iter().zip(b).map(|(&x, &y)| x as f64 * y as f64).sum(),
            )),
            (Buffer::F64(a), Buffer::F64(b)) => {
                Ok(Scalar::F64(a.iter().zip(b).map(|(&x, &y)| x * y).sum()))
            }
            (lhs, rhs) => Err(TensorError::domain("dot", lhs.dtype(), rhs.dtype())),
        }
    }

    /// Returns the sub-matrix covering rows `[start, end)`.
    ///
    /// `end = None` means all remaining rows.
    pub fn slice_rows(&self, start: usize, end: Option<usize>) -> Result<Matrix> {
        let end = end.unwrap_or(self.n_rows);
        if start > end || end > self.n_rows {
            return Err(TensorError::IndexOutOfRange {
                index: end.max(start),
                extent: self.n_rows,
            });
        }
        let buffer = self
            .buffer
            .copy_slice(start * self.n_cols, end * self.n_cols)?;
        Matrix::from_buffer(buffer, end - start, self.n_cols)
    }

    /// Keeps the rows for which the predicate holds, preserving order.
    ///
    /// The predicate receives an owned copy of each row and its index. An
    /// always-false predicate yields a valid zero-row matrix.
    pub fn filter<F>(&self, mut predicate: F) -> Result<Matrix>
    where
        F: FnMut(&Buffer, usize) -> bool,
    {
        let mut kept = Vec::new();
        for i in 0..self.n_rows {
            let row = self.row(i)?;
            if predicate(&row, i) {
                kept.push(i);
            }
        }
        let mut out = Matrix::zeros(self.dtype(), kept.len(), self.n_cols)?;
        for (dst, &src) in kept.iter().enumerate() {
            out.buffer.copy_range_from(
                dst * self.n_cols,
                &self.buffer,
                src * self.n_cols,
                self.n_cols,
            )?;
        }
        Ok(out)
    }

    /// Restartable iterator over owned row copies.
    pub fn rows(&self) -> Rows<'_> {
        Rows {
            matrix: self,
            index: 0,
        }
    }

    /// Restartable iterator over owned column copies.
    pub fn cols(&self) -> Cols<'_> {
        Cols {
            matrix: self,
            index: 0,
        }
    }
}

fn sum_down_rows<T: Element>(data: &[T], n_rows: usize, n_cols: usize) -> Vec<T> {
    let mut sums = vec![T::zero(); n_cols];
    for r in 0..n_rows {
        let base = r * n_cols;
        for c in 0..n_cols {
            sums[c] = sums[c].acc_add(data[base + c]);
        }
    }
    sums
}

fn sum_along_rows<T: Element>(data: &[T], n_rows: usize, n_cols: usize) -> Vec<T> {
    let mut sums = vec![T::zero(); n_rows];
    for r in 0..n_rows {
        let base = r * n_cols;
        for c in 0..n_cols {
            sums[r] = sums[r].acc_add(data[base + c]);
        }
    }
    sums
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.n_rows {
            for c in 0..self.n_cols {
                if c > 0 {
                    f.write_str("\t")?;
                }
                match self.buffer.get(r * self.n_cols + c) {
                    Ok(value) => write!(f, "{value}")?,
                    Err(_) => f.write_str("?")?,
                }
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}

/// Iterator yielding each row as an owned buffer.
pub struct Rows<'a> {
    matrix: &'a Matrix,
    index: usize,
}

impl Iterator for Rows<'_> {
    type Item = Buffer;

    fn next(&mut self) -> Option<Buffer> {
        if self.index >= self.matrix.n_rows {
            return None;
        }
        let row = self.matrix.row(self.index).ok();
        self.index += 1;
        row
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.matrix.n_rows - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Rows<'_> {}

/// Iterator yielding each column as an owned buffer.
pub struct Cols<'a> {
    matrix: &'a Matrix,
    index: usize,
}

impl Iterator for Cols<'_> {
    type Item = Buffer;

    fn next(&mut self) -> Option<Buffer> {
        if self.index >= self.matrix.n_cols {
            return None;
        }
        let col = self.matrix.col(self.index).ok();
        self.index += 1;
        col
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.matrix.n_cols - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Cols<'_> {}
