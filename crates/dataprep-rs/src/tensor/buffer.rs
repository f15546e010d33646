//! Owned, contiguous, homogeneously-typed element storage.
//!
//! A [`Buffer`] is the only thing the engine ever heap-allocates. It is a
//! closed enum with one variant per element kind; every operation dispatches
//! over that enum with an exhaustive match, so there is no ad hoc runtime type
//! probing and no silent fallback kind anywhere.

use serde::{Deserialize, Serialize};

use super::dtype::{DType, Scalar};
use super::error::{Result, TensorError};

/// Numeric behaviour the engine's generic inner loops need from an element.
///
/// Integer kinds accumulate with wrapping arithmetic so reductions are total
/// (the documented, deterministic policy); float kinds follow IEEE-754.
/// Integer `div_count` divides in a widened 128-bit domain, truncating toward
/// zero; the count may exceed the element kind's own range.
pub(crate) trait Element: Copy {
    fn zero() -> Self;
    fn acc_add(self, rhs: Self) -> Self;
    fn div_count(self, count: usize) -> Self;
}

macro_rules! element_int {
    ($($prim:ty),*) => {
        $(
            impl Element for $prim {
                fn zero() -> Self {
                    0
                }
                fn acc_add(self, rhs: Self) -> Self {
                    self.wrapping_add(rhs)
                }
                fn div_count(self, count: usize) -> Self {
                    (self as i128 / count as i128) as $prim
                }
            }
        )*
    };
}

macro_rules! element_float {
    ($($prim:ty),*) => {
        $(
            impl Element for $prim {
                fn zero() -> Self {
                    0.0
                }
                fn acc_add(self, rhs: Self) -> Self {
                    self + rhs
                }
                fn div_count(self, count: usize) -> Self {
                    self / count as $prim
                }
            }
        )*
    };
}

element_int!(u8, u16, u32, u64, i8, i16, i32, i64);
element_float!(f32, f64);

/// Owned, fixed-length sequence of values of one element kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Buffer {
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    U64(Vec<u64>),
    I8(Vec<i8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

/// Expands `$body` once per variant with `$data` bound to the inner vec.
///
/// The body is monomorphised per arm, so generic element code (via the
/// [`Element`] trait) stays type-correct without any boxing.
macro_rules! dispatch_buffer {
    ($buf:expr, $data:ident => $body:expr) => {
        match $buf {
            Buffer::U8($data) => $body,
            Buffer::U16($data) => $body,
            Buffer::U32($data) => $body,
            Buffer::U64($data) => $body,
            Buffer::I8($data) => $body,
            Buffer::I16($data) => $body,
            Buffer::I32($data) => $body,
            Buffer::I64($data) => $body,
            Buffer::F32($data) => $body,
            Buffer::F64($data) => $body,
        }
    };
}

pub(crate) use dispatch_buffer;

macro_rules! buffer_from {
    ($($variant:ident, $prim:ty);* $(;)?) => {
        $(
            impl From<Vec<$prim>> for Buffer {
                /// Takes ownership of an already-populated sequence, inferring
                /// the element kind from its representation.
                fn from(data: Vec<$prim>) -> Self {
                    Buffer::$variant(data)
                }
            }
        )*
    };
}

buffer_from! {
    U8, u8; U16, u16; U32, u32; U64, u64;
    I8, i8; I16, i16; I32, i32; I64, i64;
    F32, f32; F64, f64;
}

impl Buffer {
    /// Allocates `len` zeroed elements of the given kind.
    ///
    /// Fails with `InvalidLength` when the byte size of the allocation does
    /// not fit in `usize`.
    pub fn alloc(dtype: DType, len: usize) -> Result<Self> {
        if len.checked_mul(dtype.size_in_bytes()).is_none() {
            return Err(TensorError::InvalidLength {
                reason: format!("{len} elements of {dtype} overflow the address space"),
            });
        }
        Ok(match dtype {
            DType::U8 => Buffer::U8(vec![0; len]),
            DType::U16 => Buffer::U16(vec![0; len]),
            DType::U32 => Buffer::U32(vec![0; len]),
            DType::U64 => Buffer::U64(vec![0; len]),
            DType::I8 => Buffer::I8(vec![0; len]),
            DType::I16 => Buffer::I16(vec![0; len]),
            DType::I32 => Buffer::I32(vec![0; len]),
            DType::I64 => Buffer::I64(vec![0; len]),
            DType::F32 => Buffer::F32(vec![0.0; len]),
            DType::F64 => Buffer::F64(vec![0.0; len]),
        })
    }

    /// Returns the element kind of the stored values.
    pub fn dtype(&self) -> DType {
        match self {
            Buffer::U8(_) => DType::U8,
            Buffer::U16(_) => DType::U16,
            Buffer::U32(_) => DType::U32,
            Buffer::U64(_) => DType::U64,
            Buffer::I8(_) => DType::I8,
            Buffer::I16(_) => DType::I16,
            Buffer::I32(_) => DType::I32,
            Buffer::I64(_) => DType::I64,
            Buffer::F32(_) => DType::F32,
            Buffer::F64(_) => DType::F64,
        }
    }

    /// Returns the number of stored elements.
    pub fn len(&self) -> usize {
        dispatch_buffer!(self, data => data.len())
    }

    /// Reports whether the buffer holds zero elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads the element at `index`.
    pub fn get(&self, index: usize) -> Result<Scalar> {
        if index >= self.len() {
            return Err(TensorError::IndexOutOfRange {
                index,
                extent: self.len(),
            });
        }
        Ok(dispatch_buffer!(self, data => Scalar::from(data[index])))
    }

    /// Writes `value` at `index`.
    ///
    /// The value's domain must match the buffer's kind; a failed check leaves
    /// the buffer untouched.
    pub fn set(&mut self, index: usize, value: Scalar) -> Result<()> {
        if index >= self.len() {
            return Err(TensorError::IndexOutOfRange {
                index,
                extent: self.len(),
            });
        }
        match (&mut *self, value) {
            (Buffer::U8(data), Scalar::U8(v)) => data[index] = v,
            (Buffer::U16(data), Scalar::U16(v)) => data[index] = v,
            (Buffer::U32(data), Scalar::U32(v)) => data[index] = v,
            (Buffer::U64(data), Scalar::U64(v)) => data[index] = v,
            (Buffer::I8(data), Scalar::I8(v)) => data[index] = v,
            (Buffer::I16(data), Scalar::I16(v)) => data[index] = v,
            (Buffer::I32(data), Scalar::I32(v)) => data[index] = v,
            (Buffer::I64(data), Scalar::I64(v)) => data[index] = v,
            (Buffer::F32(data), Scalar::F32(v)) => data[index] = v,
            (Buffer::F64(data), Scalar::F64(v)) => data[index] = v,
            (buf, value) => return Err(TensorError::domain("set", buf.dtype(), value.dtype())),
        }
        Ok(())
    }

    /// Fills every element with `value` (same-domain only).
    pub fn fill(&mut self, value: Scalar) -> Result<()> {
        match (&mut *self, value) {
            (Buffer::U8(data), Scalar::U8(v)) => data.fill(v),
            (Buffer::U16(data), Scalar::U16(v)) => data.fill(v),
            (Buffer::U32(data), Scalar::U32(v)) => data.fill(v),
            (Buffer::U64(data), Scalar::U64(v)) => data.fill(v),
            (Buffer::I8(data), Scalar::I8(v)) => data.fill(v),
            (Buffer::I16(data), Scalar::I16(v)) => data.fill(v),
            (Buffer::I32(data), Scalar::I32(v)) => data.fill(v),
            (Buffer::I64(data), Scalar::I64(v)) => data.fill(v),
            (Buffer::F32(data), Scalar::F32(v)) => data.fill(v),
            (Buffer::F64(data), Scalar::F64(v)) => data.fill(v),
            (buf, value) => return Err(TensorError::domain("fill", buf.dtype(), value.dtype())),
        }
        Ok(())
    }

    /// Returns a new owned buffer holding `[start, end)`, same kind.
    pub fn copy_slice(&self, start: usize, end: usize) -> Result<Buffer> {
        if start > end || end > self.len() {
            return Err(TensorError::IndexOutOfRange {
                index: end.max(start),
                extent: self.len(),
            });
        }
        Ok(dispatch_buffer!(self, data => Buffer::from(data[start..end].to_vec())))
    }

    /// Copies `src[src_range]` into `self` starting at `dst_offset`.
    ///
    /// Both buffers must share a kind and the destination range must fit; the
    /// destination is untouched when any check fails.
    pub fn copy_range_from(
        &mut self,
        dst_offset: usize,
        src: &Buffer,
        src_start: usize,
        len: usize,
    ) -> Result<()> {
        if src_start.checked_add(len).map_or(true, |end| end > src.len()) {
            return Err(TensorError::IndexOutOfRange {
                index: src_start.saturating_add(len),
                extent: src.len(),
            });
        }
        if dst_offset.checked_add(len).map_or(true, |end| end > self.len()) {
            return Err(TensorError::IndexOutOfRange {
                index: dst_offset.saturating_add(len),
                extent: self.len(),
            });
        }
        match (&mut *self, src) {
            (Buffer::U8(dst), Buffer::U8(s)) => {
                dst[dst_offset..dst_offset + len].copy_from_slice(&s[src_start..src_start + len])
            }
            (Buffer::U16(dst), Buffer::U16(s)) => {
                dst[dst_offset..dst_offset + len].copy_from_slice(&s[src_start..src_start + len])
            }
            (Buffer::U32(dst), Buffer::U32(s)) => {
                dst[dst_offset..dst_offset + len].copy_from_slice(&s[src_start..src_start + len])
            }
            (Buffer::U64(dst), Buffer::U64(s)) => {
                dst[dst_offset..dst_offset + len].copy_from_slice(&s[src_start..src_start + len])
            }
            (Buffer::I8(dst), Buffer::I8(s)) => {
                dst[dst_offset..dst_offset + len].copy_from_slice(&s[src_start..src_start + len])
            }
            (Buffer::I16(dst), Buffer::I16(s)) => {
                dst[dst_offset..dst_offset + len].copy_from_slice(&s[src_start..src_start + len])
            }
            (Buffer::I32(dst), Buffer::I32(s)) => {
                dst[dst_offset..dst_offset + len].copy_from_slice(&s[src_start..src_start + len])
            }
            (Buffer::I64(dst), Buffer::I64(s)) => {
                dst[dst_offset..dst_offset + len].copy_from_slice(&s[src_start..src_start + len])
            }
            (Buffer::F32(dst), Buffer::F32(s)) => {
                dst[dst_offset..dst_offset + len].copy_from_slice(&s[src_start..src_start + len])
            }
            (Buffer::F64(dst), Buffer::F64(s)) => {
                dst[dst_offset..dst_offset + len].copy_from_slice(&s[src_start..src_start + len])
            }
            (dst, src) => return Err(TensorError::domain("copy", dst.dtype(), src.dtype())),
        }
        Ok(())
    }

    /// Iterates over the stored values as tagged scalars.
    pub fn iter(&self) -> ScalarIter<'_> {
        ScalarIter {
            buffer: self,
            index: 0,
        }
    }

    /// Converts every element to `f64` (explicit, possibly lossy for 64-bit
    /// integers beyond 2^53).
    pub fn to_f64_vec(&self) -> Vec<f64> {
        dispatch_buffer!(self, data => data.iter().map(|&v| v as f64).collect())
    }

    /// Borrows the raw `u8` values when the buffer holds that kind.
    pub fn as_u8(&self) -> Option<&[u8]> {
        match self {
            Buffer::U8(data) => Some(data),
            _ => None,
        }
    }

    /// Borrows the raw `u32` values when the buffer holds that kind.
    pub fn as_u32(&self) -> Option<&[u32]> {
        match self {
            Buffer::U32(data) => Some(data),
            _ => None,
        }
    }

    /// Borrows the raw `f32` values when the buffer holds that kind.
    pub fn as_f32(&self) -> Option<&[f32]> {
        match self {
            Buffer::F32(data) => Some(data),
            _ => None,
        }
    }

    /// Borrows the raw `f64` values when the buffer holds that kind.
    pub fn as_f64(&self) -> Option<&[f64]> {
        match self {
            Buffer::F64(data) => Some(data),
            _ => None,
        }
    }
}

/// Restartable iterator over a buffer's values.
pub struct ScalarIter<'a> {
    buffer: &'a Buffer,
    index: usize,
}

impl Iterator for ScalarIter<'_> {
    type Item = Scalar;

    fn next(&mut self) -> Option<Scalar> {
        if self.index >= self.buffer.len() {
            return None;
        }
        let value = self.buffer.get(self.index).ok();
        self.index += 1;
        value
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.buffer.len() - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ScalarIter<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_is_zero_filled() {
        let buf = Buffer::alloc(DType::I16, 4).expect("small allocation");
        assert_eq!(buf.len(), 4);
        for value in buf.iter() {
            assert_eq!(value, Scalar::I16(0));
        }
    }

    #[test]
    fn wrap_infers_kind_from_representation() {
        let buf = Buffer::from(vec![1.5f32, 2.5]);
        assert_eq!(buf.dtype(), DType::F32);
        assert_eq!(buf.get(1).expect("in range"), Scalar::F32(2.5));
    }

    #[test]
    fn set_rejects_cross_domain_writes_without_mutating() {
        let mut buf = Buffer::from(vec![7u64, 8, 9]);
        let err = buf
            .set(1, Scalar::F64(3.25))
            .expect_err("float into u64 storage must not truncate");
        assert!(matches!(err, TensorError::DomainMismatch { op: "set", .. }));
        assert_eq!(buf.get(1).expect("in range"), Scalar::U64(8));
    }

    #[test]
    fn out_of_range_access_is_reported() {
        let buf = Buffer::from(vec![1u8, 2]);
        assert_eq!(
            buf.get(2).expect_err("one past the end"),
            TensorError::IndexOutOfRange {
                index: 2,
                extent: 2
            }
        );
    }

    #[test]
    fn div_count_survives_counts_beyond_the_element_range() {
        assert_eq!(200u8.div_count(256), 0);
        assert_eq!(40_000u16.div_count(70_000), 0);
        assert_eq!((-7i8).div_count(2), -3);
        assert_eq!(i8::MIN.div_count(1), i8::MIN);
        assert_eq!(u64::MAX.div_count(1), u64::MAX);
    }

    #[test]
    fn fill_replaces_every_element_in_domain() {
        let mut buf = Buffer::alloc(DType::F64, 3).expect("alloc");
        buf.fill(Scalar::F64(2.5)).expect("same domain");
        assert_eq!(buf.as_f64(), Some(&[2.5, 2.5, 2.5][..]));
        assert!(buf.fill(Scalar::U8(1)).is_err());
    }

    #[test]
    fn copy_range_with_overflowing_bounds_is_rejected() {
        let src = Buffer::from(vec![1u8; 4]);
        let mut dst = Buffer::from(vec![0u8; 4]);
        let err = dst
            .copy_range_from(usize::MAX, &src, 0, 2)
            .expect_err("destination offset overflows");
        assert!(matches!(err, TensorError::IndexOutOfRange { .. }));
        assert!(dst.copy_range_from(0, &src, usize::MAX, 2).is_err());
        assert_eq!(dst, Buffer::from(vec![0u8; 4]));
    }

    #[test]
    fn copy_slice_produces_an_independent_buffer() {
        let buf = Buffer::from(vec![1u32, 2, 3, 4]);
        let mut slice = buf.copy_slice(1, 3).expect("valid range");
        assert_eq!(slice, Buffer::from(vec![2u32, 3]));
        slice.set(0, Scalar::U32(99)).expect("in range");
        assert_eq!(buf.get(1).expect("in range"), Scalar::U32(2));
    }
}
