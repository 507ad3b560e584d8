//! Element types and dtype promotion.
//!
//! Arrays carry one of two dtypes:
//! ```text
//! DType
//!   ├── Real64      (f64)
//!   └── Complex128  (Complex64, stored as split re/im buffers)
//! ```
//!
//! Binary operations decide their output dtype once, up front, through
//! [`DType::promote`]. Generic kernels (matmul, convolution, running sums)
//! are written over the [`Element`] trait so the same loop serves both.

use core::fmt;
use core::iter::Sum;

use num_complex::Complex64;
use num_traits::{Num, NumAssign};

use crate::storage::Storage;

// ---------------------------------------------------------------------------
// DType
// ---------------------------------------------------------------------------

/// The element type tag of an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DType {
    /// IEEE-754 double precision.
    Real64,
    /// Pair of doubles (real, imaginary).
    Complex128,
}

/// Promotion lookup, indexed by `[lhs as usize][rhs as usize]`.
const PROMOTION: [[DType; 2]; 2] = [
    [DType::Real64, DType::Complex128],
    [DType::Complex128, DType::Complex128],
];

impl DType {
    /// Result dtype of a binary operation on `self` and `other`.
    #[inline]
    pub fn promote(self, other: DType) -> DType {
        PROMOTION[self as usize][other as usize]
    }

    /// Promote over any number of dtypes; `Real64` for an empty list.
    pub fn promote_all<I: IntoIterator<Item = DType>>(dtypes: I) -> DType {
        dtypes.into_iter().fold(DType::Real64, DType::promote)
    }

    /// Canonical lowercase name (`real64` / `complex128`).
    pub fn name(self) -> &'static str {
        match self {
            DType::Real64 => "real64",
            DType::Complex128 => "complex128",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Element — the generic kernel bound
// ---------------------------------------------------------------------------

/// Numeric element storable in an [`NDArray`](crate::array::NDArray).
///
/// Implemented for `f64` and [`Complex64`] only.
pub trait Element:
    Copy + fmt::Debug + PartialEq + Num + NumAssign + Sum + Send + Sync + 'static
{
    /// The dtype tag that arrays of this element carry.
    const DTYPE: DType;

    /// Lift a real value into this element type.
    fn from_real(v: f64) -> Self;

    /// Complex conjugate (identity for reals).
    fn conj(self) -> Self;

    /// Widen into a host-visible [`Value`].
    fn into_value(self) -> Value;

    /// Pack a flat buffer of elements into storage.
    fn into_storage(data: Vec<Self>) -> Storage;
}

impl Element for f64 {
    const DTYPE: DType = DType::Real64;

    #[inline]
    fn from_real(v: f64) -> Self {
        v
    }
    #[inline]
    fn conj(self) -> Self {
        self
    }
    #[inline]
    fn into_value(self) -> Value {
        Value::Real(self)
    }
    fn into_storage(data: Vec<Self>) -> Storage {
        Storage::Real(data)
    }
}

impl Element for Complex64 {
    const DTYPE: DType = DType::Complex128;

    #[inline]
    fn from_real(v: f64) -> Self {
        Complex64::new(v, 0.0)
    }
    #[inline]
    fn conj(self) -> Self {
        Complex64::conj(&self)
    }
    #[inline]
    fn into_value(self) -> Value {
        Value::Complex(self)
    }
    fn into_storage(data: Vec<Self>) -> Storage {
        Storage::from_complex(data)
    }
}

// ---------------------------------------------------------------------------
// Value — a single dynamically typed element
// ---------------------------------------------------------------------------

/// One element as seen by the host: real or complex.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Real(f64),
    Complex(Complex64),
}

impl Value {
    /// The dtype this value would occupy in an array.
    pub fn dtype(&self) -> DType {
        match self {
            Value::Real(_) => DType::Real64,
            Value::Complex(_) => DType::Complex128,
        }
    }

    /// Real part.
    pub fn re(&self) -> f64 {
        match self {
            Value::Real(v) => *v,
            Value::Complex(z) => z.re,
        }
    }

    /// Imaginary part (zero for reals).
    pub fn im(&self) -> f64 {
        match self {
            Value::Real(_) => 0.0,
            Value::Complex(z) => z.im,
        }
    }

    /// The value as a complex number.
    pub fn to_complex(&self) -> Complex64 {
        Complex64::new(self.re(), self.im())
    }

    /// The value if it is real.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Real(v) => Some(*v),
            Value::Complex(_) => None,
        }
    }

    /// Truthiness: nonzero in either component.
    pub fn is_truthy(&self) -> bool {
        self.re() != 0.0 || self.im() != 0.0
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<Complex64> for Value {
    fn from(z: Complex64) -> Self {
        Value::Complex(z)
    }
}

impl PartialEq<f64> for Value {
    fn eq(&self, other: &f64) -> bool {
        match self {
            Value::Real(v) => v == other,
            Value::Complex(z) => z.im == 0.0 && z.re == *other,
        }
    }
}

impl PartialEq<Complex64> for Value {
    fn eq(&self, other: &Complex64) -> bool {
        self.to_complex() == *other
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Real(v) => write!(f, "{v}"),
            Value::Complex(z) => write!(f, "{z}"),
        }
    }
}
