//! Enumerates the element kinds supported by the array engine.
//!
//! Every buffer, matrix, and tensor carries exactly one [`DType`] for its
//! entire lifetime. Values move through the engine as [`Scalar`]s, which keep
//! the kind attached so cross-domain writes are caught instead of truncated.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::{Result, TensorError};

/// Logical element kind carried by buffers and tensors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DType {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
}

impl DType {
    /// Returns the number of bytes required per scalar element.
    pub fn size_in_bytes(self) -> usize {
        match self {
            DType::U8 | DType::I8 => 1,
            DType::U16 | DType::I16 => 2,
            DType::U32 | DType::I32 | DType::F32 => 4,
            DType::U64 | DType::I64 | DType::F64 => 8,
        }
    }

    /// Returns `true` when the kind is any signed or unsigned integer.
    pub fn is_integer(self) -> bool {
        !self.is_float()
    }

    /// Returns `true` when the kind is a floating-point representation.
    pub fn is_float(self) -> bool {
        matches!(self, DType::F32 | DType::F64)
    }

    /// Returns `true` when values of the kind are sign-bit aware.
    pub fn is_signed(self) -> bool {
        matches!(
            self,
            DType::I8 | DType::I16 | DType::I32 | DType::I64 | DType::F32 | DType::F64
        )
    }

    /// Produces a stable tag used for serialization and diagnostics.
    pub fn tag(self) -> &'static str {
        match self {
            DType::U8 => "u8",
            DType::U16 => "u16",
            DType::U32 => "u32",
            DType::U64 => "u64",
            DType::I8 => "i8",
            DType::I16 => "i16",
            DType::I32 => "i32",
            DType::I64 => "i64",
            DType::F32 => "f32",
            DType::F64 => "f64",
        }
    }

    /// Reconstructs a `DType` from its tag.
    ///
    /// Unknown tags fail with [`TensorError::UnsupportedElementKind`]; the
    /// engine never falls back to a default kind.
    pub fn from_tag(tag: &str) -> Result<Self> {
        match tag {
            "u8" => Ok(DType::U8),
            "u16" => Ok(DType::U16),
            "u32" => Ok(DType::U32),
            "u64" => Ok(DType::U64),
            "i8" => Ok(DType::I8),
            "i16" => Ok(DType::I16),
            "i32" => Ok(DType::I32),
            "i64" => Ok(DType::I64),
            "f32" => Ok(DType::F32),
            "f64" => Ok(DType::F64),
            other => Err(TensorError::UnsupportedElementKind {
                tag: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A single value tagged with its element kind.
///
/// Scalars are how values enter and leave buffers. Arithmetic between scalars
/// of different kinds is refused rather than coerced; conversions are explicit
/// ([`Scalar::to_f64`], [`Scalar::from_usize`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
}

macro_rules! scalar_from {
    ($($variant:ident, $prim:ty);* $(;)?) => {
        $(
            impl From<$prim> for Scalar {
                fn from(value: $prim) -> Self {
                    Scalar::$variant(value)
                }
            }
        )*
    };
}

scalar_from! {
    U8, u8; U16, u16; U32, u32; U64, u64;
    I8, i8; I16, i16; I32, i32; I64, i64;
    F32, f32; F64, f64;
}

impl Scalar {
    /// Returns the element kind this value belongs to.
    pub fn dtype(self) -> DType {
        match self {
            Scalar::U8(_) => DType::U8,
            Scalar::U16(_) => DType::U16,
            Scalar::U32(_) => DType::U32,
            Scalar::U64(_) => DType::U64,
            Scalar::I8(_) => DType::I8,
            Scalar::I16(_) => DType::I16,
            Scalar::I32(_) => DType::I32,
            Scalar::I64(_) => DType::I64,
            Scalar::F32(_) => DType::F32,
            Scalar::F64(_) => DType::F64,
        }
    }

    /// Returns the additive identity in the given domain.
    pub fn zero(dtype: DType) -> Self {
        match dtype {
            DType::U8 => Scalar::U8(0),
            DType::U16 => Scalar::U16(0),
            DType::U32 => Scalar::U32(0),
            DType::U64 => Scalar::U64(0),
            DType::I8 => Scalar::I8(0),
            DType::I16 => Scalar::I16(0),
            DType::I32 => Scalar::I32(0),
            DType::I64 => Scalar::I64(0),
            DType::F32 => Scalar::F32(0.0),
            DType::F64 => Scalar::F64(0.0),
        }
    }

    /// Returns the multiplicative identity in the given domain.
    pub fn one(dtype: DType) -> Self {
        match dtype {
            DType::U8 => Scalar::U8(1),
            DType::U16 => Scalar::U16(1),
            DType::U32 => Scalar::U32(1),
            DType::U64 => Scalar::U64(1),
            DType::I8 => Scalar::I8(1),
            DType::I16 => Scalar::I16(1),
            DType::I32 => Scalar::I32(1),
            DType::I64 => Scalar::I64(1),
            DType::F32 => Scalar::F32(1.0),
            DType::F64 => Scalar::F64(1.0),
        }
    }

    /// Converts an index-like value into the given domain.
    ///
    /// Fails with `DomainMismatch` when the value is not representable, e.g.
    /// 300 in the `u8` domain.
    pub fn from_usize(dtype: DType, value: usize) -> Result<Self> {
        let overflow = || TensorError::overflow("from_usize", dtype);
        Ok(match dtype {
            DType::U8 => Scalar::U8(u8::try_from(value).map_err(|_| overflow())?),
            DType::U16 => Scalar::U16(u16::try_from(value).map_err(|_| overflow())?),
            DType::U32 => Scalar::U32(u32::try_from(value).map_err(|_| overflow())?),
            DType::U64 => Scalar::U64(u64::try_from(value).map_err(|_| overflow())?),
            DType::I8 => Scalar::I8(i8::try_from(value).map_err(|_| overflow())?),
            DType::I16 => Scalar::I16(i16::try_from(value).map_err(|_| overflow())?),
            DType::I32 => Scalar::I32(i32::try_from(value).map_err(|_| overflow())?),
            DType::I64 => Scalar::I64(i64::try_from(value).map_err(|_| overflow())?),
            DType::F32 => Scalar::F32(value as f32),
            DType::F64 => Scalar::F64(value as f64),
        })
    }

    /// Checked same-domain addition.
    ///
    /// Mixed-domain operands fail with `DomainMismatch`, as does integer
    /// overflow; floating addition follows IEEE-754.
    pub fn checked_add(self, rhs: Scalar) -> Result<Scalar> {
        let overflow = || TensorError::overflow("add", self.dtype());
        match (self, rhs) {
            (Scalar::U8(a), Scalar::U8(b)) => a.checked_add(b).map(Scalar::U8).ok_or_else(overflow),
            (Scalar::U16(a), Scalar::U16(b)) => {
                a.checked_add(b).map(Scalar::U16).ok_or_else(overflow)
            }
            (Scalar::U32(a), Scalar::U32(b)) => {
                a.checked_add(b).map(Scalar::U32).ok_or_else(overflow)
            }
            (Scalar::U64(a), Scalar::U64(b)) => {
                a.checked_add(b).map(Scalar::U64).ok_or_else(overflow)
            }
            (Scalar::I8(a), Scalar::I8(b)) => a.checked_add(b).map(Scalar::I8).ok_or_else(overflow),
            (Scalar::I16(a), Scalar::I16(b)) => {
                a.checked_add(b).map(Scalar::I16).ok_or_else(overflow)
            }
            (Scalar::I32(a), Scalar::I32(b)) => {
                a.checked_add(b).map(Scalar::I32).ok_or_else(overflow)
            }
            (Scalar::I64(a), Scalar::I64(b)) => {
                a.checked_add(b).map(Scalar::I64).ok_or_else(overflow)
            }
            (Scalar::F32(a), Scalar::F32(b)) => Ok(Scalar::F32(a + b)),
            (Scalar::F64(a), Scalar::F64(b)) => Ok(Scalar::F64(a + b)),
            (lhs, rhs) => Err(TensorError::domain("add", lhs.dtype(), rhs.dtype())),
        }
    }

    /// Converts the value to `f64`.
    ///
    /// Lossless except for 64-bit integers beyond 2^53, which round to the
    /// nearest representable double; callers needing exactness should stay in
    /// the integer domain.
    pub fn to_f64(self) -> f64 {
        match self {
            Scalar::U8(v) => v as f64,
            Scalar::U16(v) => v as f64,
            Scalar::U32(v) => v as f64,
            Scalar::U64(v) => v as f64,
            Scalar::I8(v) => v as f64,
            Scalar::I16(v) => v as f64,
            Scalar::I32(v) => v as f64,
            Scalar::I64(v) => v as f64,
            Scalar::F32(v) => v as f64,
            Scalar::F64(v) => v,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::U8(v) => write!(f, "{v}"),
            Scalar::U16(v) => write!(f, "{v}"),
            Scalar::U32(v) => write!(f, "{v}"),
            Scalar::U64(v) => write!(f, "{v}"),
            Scalar::I8(v) => write!(f, "{v}"),
            Scalar::I16(v) => write!(f, "{v}"),
            Scalar::I32(v) => write!(f, "{v}"),
            Scalar::I64(v) => write!(f, "{v}"),
            Scalar::F32(v) => write!(f, "{v}"),
            Scalar::F64(v) => write!(f, "{v}"),
        }
    }
}
