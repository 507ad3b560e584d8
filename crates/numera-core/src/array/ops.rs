//! Element-wise binary operations, comparisons, and selection.
//!
//! Every binary operation broadcasts its operands, decides the output dtype
//! once via [`DType::promote`], and then runs a single scalar kernel over the
//! aligned positions. Floating-point edge cases (division by zero, `0^0`,
//! domain errors) produce `Inf`/`NaN` and are never errors.
//!
//! Operator overloads (`&a + &b`, `&a * 2.0`) panic on incompatible shapes;
//! the named methods (`add`, `mul`, ...) return `Err` instead.

use core::ops;

use num_complex::Complex64;

use crate::dtype::{DType, Value};
use crate::error::{CoreError, Result};
use crate::shape::{broadcast_all, broadcast_indices, broadcast_shapes};
use crate::storage::Storage;

use super::NDArray;

// ======================================================================
// Scalar kernels
// ======================================================================

/// Floored modulo: the result takes the sign of `b`.
///
/// `floor_mod(-7.0, 3.0) == 2.0`.
#[inline]
pub fn floor_mod(a: f64, b: f64) -> f64 {
    let r = a % b;
    if r != 0.0 && (r < 0.0) != (b < 0.0) {
        r + b
    } else {
        r
    }
}

/// Complex power with `z^0 == 1` and exact small integer exponents.
fn complex_pow(a: Complex64, b: Complex64) -> Complex64 {
    if b == Complex64::new(0.0, 0.0) {
        return Complex64::new(1.0, 0.0);
    }
    if a == Complex64::new(0.0, 0.0) {
        return if b.im == 0.0 && b.re > 0.0 {
            Complex64::new(0.0, 0.0)
        } else {
            Complex64::new(f64::NAN, f64::NAN)
        };
    }
    if b.im == 0.0 && b.re.fract() == 0.0 && b.re.abs() <= f64::from(i32::MAX) {
        return a.powi(b.re as i32);
    }
    a.powc(b)
}

/// A binary element-wise operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    /// Floored modulo (sign of divisor).
    Mod,
    /// Truncated modulo (sign of dividend).
    Fmod,
    Arctan2,
    Hypot,
    Maximum,
    Minimum,
}

impl BinaryOp {
    pub fn name(self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Sub => "subtract",
            BinaryOp::Mul => "multiply",
            BinaryOp::Div => "divide",
            BinaryOp::Pow => "power",
            BinaryOp::Mod => "mod",
            BinaryOp::Fmod => "fmod",
            BinaryOp::Arctan2 => "arctan2",
            BinaryOp::Hypot => "hypot",
            BinaryOp::Maximum => "maximum",
            BinaryOp::Minimum => "minimum",
        }
    }

    #[inline]
    fn real(self, a: f64, b: f64) -> f64 {
        match self {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
            BinaryOp::Div => a / b,
            BinaryOp::Pow => a.powf(b),
            BinaryOp::Mod => floor_mod(a, b),
            BinaryOp::Fmod => a % b,
            BinaryOp::Arctan2 => a.atan2(b),
            BinaryOp::Hypot => a.hypot(b),
            // NaN-propagating, unlike f64::max/min
            BinaryOp::Maximum => {
                if a.is_nan() || b.is_nan() {
                    f64::NAN
                } else {
                    a.max(b)
                }
            }
            BinaryOp::Minimum => {
                if a.is_nan() || b.is_nan() {
                    f64::NAN
                } else {
                    a.min(b)
                }
            }
        }
    }

    /// Whether the operation has a complex definition.
    #[inline]
    fn supports_complex(self) -> bool {
        matches!(
            self,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Pow
        )
    }

    #[inline]
    fn complex(self, a: Complex64, b: Complex64) -> Complex64 {
        match self {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
            BinaryOp::Div => a / b,
            BinaryOp::Pow => complex_pow(a, b),
            _ => Complex64::new(f64::NAN, f64::NAN),
        }
    }
}

/// An element-wise comparison producing a real 0/1 array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
}

impl CompareOp {
    #[inline]
    fn real(self, a: f64, b: f64) -> bool {
        match self {
            CompareOp::Equal => a == b,
            CompareOp::NotEqual => a != b,
            CompareOp::Less => a < b,
            CompareOp::LessEqual => a <= b,
            CompareOp::Greater => a > b,
            CompareOp::GreaterEqual => a >= b,
        }
    }

    /// Complex ordering is lexicographic on (re, im).
    #[inline]
    fn complex(self, a: Complex64, b: Complex64) -> bool {
        let lt = a.re < b.re || (a.re == b.re && a.im < b.im);
        let gt = a.re > b.re || (a.re == b.re && a.im > b.im);
        match self {
            CompareOp::Equal => a == b,
            CompareOp::NotEqual => a != b,
            CompareOp::Less => lt,
            CompareOp::LessEqual => lt || a == b,
            CompareOp::Greater => gt,
            CompareOp::GreaterEqual => gt || a == b,
        }
    }
}

#[inline]
fn bool_to_f64(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

// ======================================================================
// Broadcasting dispatch
// ======================================================================

impl NDArray {
    /// Apply a binary operation with broadcasting and dtype promotion.
    pub fn binary(&self, other: &NDArray, op: BinaryOp) -> Result<NDArray> {
        let out_shape = broadcast_shapes(&self.shape, &other.shape)?;
        let dtype = self.dtype().promote(other.dtype());
        log::trace!(
            "{}: {:?} x {:?} -> {:?} ({})",
            op.name(),
            self.shape,
            other.shape,
            out_shape,
            dtype
        );
        if dtype == DType::Complex128 && !op.supports_complex() {
            return Err(CoreError::UnsupportedDtype {
                op: op.name(),
                dtype,
            });
        }

        let ia = broadcast_indices(&self.shape, &out_shape);
        let ib = broadcast_indices(&other.shape, &out_shape);

        let storage = match dtype {
            DType::Real64 => {
                let (a, b) = (self.as_slice(), other.as_slice());
                Storage::Real(
                    ia.iter()
                        .zip(ib.iter())
                        .map(|(&i, &j)| op.real(a[i], b[j]))
                        .collect(),
                )
            }
            DType::Complex128 => Storage::from_complex(
                ia.iter()
                    .zip(ib.iter())
                    .map(|(&i, &j)| {
                        op.complex(self.storage.complex_at(i), other.storage.complex_at(j))
                    })
                    .collect(),
            ),
        };
        Ok(NDArray::from_raw(storage, out_shape))
    }

    /// Binary operation against a scalar value.
    pub fn binary_scalar(&self, value: impl Into<Value>, op: BinaryOp) -> Result<NDArray> {
        self.binary(&NDArray::from_value(value.into()), op)
    }

    /// Element-wise addition, returning `Err` on incompatible shapes.
    pub fn add(&self, other: &NDArray) -> Result<NDArray> {
        self.binary(other, BinaryOp::Add)
    }

    /// Element-wise subtraction, returning `Err` on incompatible shapes.
    pub fn sub(&self, other: &NDArray) -> Result<NDArray> {
        self.binary(other, BinaryOp::Sub)
    }

    /// Element-wise multiplication, returning `Err` on incompatible shapes.
    pub fn mul(&self, other: &NDArray) -> Result<NDArray> {
        self.binary(other, BinaryOp::Mul)
    }

    /// Element-wise division, returning `Err` on incompatible shapes.
    pub fn div(&self, other: &NDArray) -> Result<NDArray> {
        self.binary(other, BinaryOp::Div)
    }

    /// Element-wise power (`self ^ other`).
    pub fn power(&self, other: &NDArray) -> Result<NDArray> {
        self.binary(other, BinaryOp::Pow)
    }

    /// Floored modulo; the result has the sign of `other`.
    pub fn modulo(&self, other: &NDArray) -> Result<NDArray> {
        self.binary(other, BinaryOp::Mod)
    }

    /// Truncated modulo; the result has the sign of `self`.
    pub fn fmod(&self, other: &NDArray) -> Result<NDArray> {
        self.binary(other, BinaryOp::Fmod)
    }

    /// Quadrant-aware `atan(self / other)`.
    pub fn arctan2(&self, other: &NDArray) -> Result<NDArray> {
        self.binary(other, BinaryOp::Arctan2)
    }

    pub fn hypot(&self, other: &NDArray) -> Result<NDArray> {
        self.binary(other, BinaryOp::Hypot)
    }

    /// Element-wise maximum, propagating NaN.
    pub fn maximum(&self, other: &NDArray) -> Result<NDArray> {
        self.binary(other, BinaryOp::Maximum)
    }

    /// Element-wise minimum, propagating NaN.
    pub fn minimum(&self, other: &NDArray) -> Result<NDArray> {
        self.binary(other, BinaryOp::Minimum)
    }

    // ------------------------------------------------------------------
    // Comparisons
    // ------------------------------------------------------------------

    /// Compare element-wise; the result is always a real 0/1 array.
    pub fn compare(&self, other: &NDArray, op: CompareOp) -> Result<NDArray> {
        let out_shape = broadcast_shapes(&self.shape, &other.shape)?;
        let ia = broadcast_indices(&self.shape, &out_shape);
        let ib = broadcast_indices(&other.shape, &out_shape);
        let complex = self.is_complex() || other.is_complex();

        let data = ia
            .iter()
            .zip(ib.iter())
            .map(|(&i, &j)| {
                let hit = if complex {
                    op.complex(self.storage.complex_at(i), other.storage.complex_at(j))
                } else {
                    op.real(self.as_slice()[i], other.as_slice()[j])
                };
                bool_to_f64(hit)
            })
            .collect();
        Ok(NDArray::from_raw(Storage::Real(data), out_shape))
    }

    pub fn equal(&self, other: &NDArray) -> Result<NDArray> {
        self.compare(other, CompareOp::Equal)
    }

    pub fn not_equal(&self, other: &NDArray) -> Result<NDArray> {
        self.compare(other, CompareOp::NotEqual)
    }

    pub fn less(&self, other: &NDArray) -> Result<NDArray> {
        self.compare(other, CompareOp::Less)
    }

    pub fn less_equal(&self, other: &NDArray) -> Result<NDArray> {
        self.compare(other, CompareOp::LessEqual)
    }

    pub fn greater(&self, other: &NDArray) -> Result<NDArray> {
        self.compare(other, CompareOp::Greater)
    }

    pub fn greater_equal(&self, other: &NDArray) -> Result<NDArray> {
        self.compare(other, CompareOp::GreaterEqual)
    }

    /// 1 where the element (either component) is NaN.
    pub fn isnan(&self) -> NDArray {
        self.map_to_real(|v| bool_to_f64(v.re().is_nan() || v.im().is_nan()))
    }

    /// 1 where the element (either component) is infinite.
    pub fn isinf(&self) -> NDArray {
        self.map_to_real(|v| bool_to_f64(v.re().is_infinite() || v.im().is_infinite()))
    }

    /// 1 where every component is finite.
    pub fn isfinite(&self) -> NDArray {
        self.map_to_real(|v| bool_to_f64(v.re().is_finite() && v.im().is_finite()))
    }

    // ------------------------------------------------------------------
    // Logical
    // ------------------------------------------------------------------

    fn logical(&self, other: &NDArray, f: impl Fn(bool, bool) -> bool) -> Result<NDArray> {
        let out_shape = broadcast_shapes(&self.shape, &other.shape)?;
        let ia = broadcast_indices(&self.shape, &out_shape);
        let ib = broadcast_indices(&other.shape, &out_shape);
        let data = ia
            .iter()
            .zip(ib.iter())
            .map(|(&i, &j)| {
                bool_to_f64(f(
                    self.storage.value(i).is_truthy(),
                    other.storage.value(j).is_truthy(),
                ))
            })
            .collect();
        Ok(NDArray::from_raw(Storage::Real(data), out_shape))
    }

    pub fn logical_and(&self, other: &NDArray) -> Result<NDArray> {
        self.logical(other, |a, b| a && b)
    }

    pub fn logical_or(&self, other: &NDArray) -> Result<NDArray> {
        self.logical(other, |a, b| a || b)
    }

    pub fn logical_xor(&self, other: &NDArray) -> Result<NDArray> {
        self.logical(other, |a, b| a != b)
    }

    pub fn logical_not(&self) -> NDArray {
        self.map_to_real(|v| bool_to_f64(!v.is_truthy()))
    }

    // ------------------------------------------------------------------
    // Selection and closeness
    // ------------------------------------------------------------------

    /// Pick from `x` where `cond` is nonzero, else from `y`.
    ///
    /// All three operands are broadcast together.
    pub fn where_(cond: &NDArray, x: &NDArray, y: &NDArray) -> Result<NDArray> {
        let out_shape = broadcast_all(&[&cond.shape, &x.shape, &y.shape])?;
        let ic = broadcast_indices(&cond.shape, &out_shape);
        let ix = broadcast_indices(&x.shape, &out_shape);
        let iy = broadcast_indices(&y.shape, &out_shape);

        let pick = |k: usize| cond.storage.value(ic[k]).is_truthy();
        let storage = match x.dtype().promote(y.dtype()) {
            DType::Real64 => Storage::Real(
                (0..ic.len())
                    .map(|k| {
                        if pick(k) {
                            x.as_slice()[ix[k]]
                        } else {
                            y.as_slice()[iy[k]]
                        }
                    })
                    .collect(),
            ),
            DType::Complex128 => Storage::from_complex(
                (0..ic.len())
                    .map(|k| {
                        if pick(k) {
                            x.storage.complex_at(ix[k])
                        } else {
                            y.storage.complex_at(iy[k])
                        }
                    })
                    .collect(),
            ),
        };
        Ok(NDArray::from_raw(storage, out_shape))
    }

    /// 1 where `|a - b| <= atol + rtol * |b|`; NaN is never close.
    pub fn isclose(&self, other: &NDArray, rtol: f64, atol: f64) -> Result<NDArray> {
        let out_shape = broadcast_shapes(&self.shape, &other.shape)?;
        let ia = broadcast_indices(&self.shape, &out_shape);
        let ib = broadcast_indices(&other.shape, &out_shape);
        let data = ia
            .iter()
            .zip(ib.iter())
            .map(|(&i, &j)| {
                let a = self.storage.complex_at(i);
                let b = other.storage.complex_at(j);
                let close = if a == b {
                    true
                } else {
                    (a - b).norm() <= atol + rtol * b.norm()
                };
                bool_to_f64(close)
            })
            .collect();
        Ok(NDArray::from_raw(Storage::Real(data), out_shape))
    }

    /// Whether every pair of elements is close (see [`isclose`](Self::isclose)).
    pub fn allclose(&self, other: &NDArray, rtol: f64, atol: f64) -> Result<bool> {
        Ok(self
            .isclose(other, rtol, atol)?
            .as_slice()
            .iter()
            .all(|&x| x != 0.0))
    }

    /// Same shape and equal values (dtype-insensitive).
    pub fn array_equal(&self, other: &NDArray) -> bool {
        self.shape == other.shape
            && (0..self.size()).all(|i| self.storage.complex_at(i) == other.storage.complex_at(i))
    }
}

// ======================================================================
// Operator overloads (panic on incompatible shapes)
// ======================================================================

fn binary_or_panic(a: &NDArray, b: &NDArray, op: BinaryOp) -> NDArray {
    match a.binary(b, op) {
        Ok(out) => out,
        Err(e) => panic!("{}: {e}", op.name()),
    }
}

macro_rules! impl_array_binop {
    ($trait:ident, $method:ident, $op:expr) => {
        impl ops::$trait for &NDArray {
            type Output = NDArray;

            fn $method(self, rhs: &NDArray) -> NDArray {
                binary_or_panic(self, rhs, $op)
            }
        }

        impl ops::$trait for NDArray {
            type Output = NDArray;

            fn $method(self, rhs: NDArray) -> NDArray {
                binary_or_panic(&self, &rhs, $op)
            }
        }

        impl ops::$trait<f64> for &NDArray {
            type Output = NDArray;

            fn $method(self, rhs: f64) -> NDArray {
                binary_or_panic(self, &NDArray::scalar(rhs), $op)
            }
        }

        impl ops::$trait<f64> for NDArray {
            type Output = NDArray;

            fn $method(self, rhs: f64) -> NDArray {
                binary_or_panic(&self, &NDArray::scalar(rhs), $op)
            }
        }
    };
}

impl_array_binop!(Add, add, BinaryOp::Add);
impl_array_binop!(Sub, sub, BinaryOp::Sub);
impl_array_binop!(Mul, mul, BinaryOp::Mul);
impl_array_binop!(Div, div, BinaryOp::Div);

impl ops::Neg for &NDArray {
    type Output = NDArray;

    fn neg(self) -> NDArray {
        let storage = match &self.storage {
            Storage::Real(v) => Storage::Real(v.iter().map(|&x| -x).collect()),
            Storage::Complex { re, im } => Storage::Complex {
                re: re.iter().map(|&x| -x).collect(),
                im: im.iter().map(|&x| -x).collect(),
            },
        };
        self.with_storage(storage)
    }
}

impl ops::Neg for NDArray {
    type Output = NDArray;

    fn neg(self) -> NDArray {
        -&self
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn v(data: &[f64]) -> NDArray {
        NDArray::from(data.to_vec())
    }

    #[test]
    fn test_add_vectors() {
        let c = &v(&[1.0, 2.0, 3.0]) + &v(&[4.0, 5.0, 6.0]);
        assert_eq!(c.as_slice(), &[5.0, 7.0, 9.0]);
    }

    #[test]
    fn test_column_plus_row_broadcasts() {
        let col = NDArray::from_vec(vec![1.0, 2.0, 3.0], vec![3, 1]).unwrap();
        let row = v(&[10.0, 20.0, 30.0]);
        let c = col.add(&row).unwrap();
        assert_eq!(c.shape(), &[3, 3]);
        assert_eq!(
            c.as_slice(),
            &[11.0, 21.0, 31.0, 12.0, 22.0, 32.0, 13.0, 23.0, 33.0]
        );
    }

    #[test]
    fn test_broadcast_error_message() {
        let a = NDArray::zeros(vec![2, 3]);
        let b = NDArray::zeros(vec![4]);
        let err = a.add(&b).unwrap_err();
        assert!(err.to_string().contains("broadcast"));
    }

    #[test]
    #[should_panic(expected = "broadcast")]
    fn test_operator_panics_on_mismatch() {
        let _ = NDArray::zeros(vec![2]) + NDArray::zeros(vec![3]);
    }

    #[test]
    fn test_scalar_ops() {
        let a = v(&[1.0, 2.0, 3.0]);
        assert_eq!((&a * 10.0).as_slice(), &[10.0, 20.0, 30.0]);
        assert_eq!((&a - 1.0).as_slice(), &[0.0, 1.0, 2.0]);
        assert_eq!((-a).as_slice(), &[-1.0, -2.0, -3.0]);
    }

    #[test]
    fn test_mod_and_fmod_signs() {
        let a = NDArray::scalar(-7.0);
        let b = NDArray::scalar(3.0);
        assert_eq!(a.modulo(&b).unwrap().item().unwrap(), 2.0);
        assert_eq!(a.fmod(&b).unwrap().item().unwrap(), -1.0);
        assert_eq!(floor_mod(7.0, -3.0), -2.0);
        assert_eq!(floor_mod(6.0, 3.0), 0.0);
    }

    #[test]
    fn test_ieee_edge_cases() {
        let a = v(&[1.0, 0.0, -1.0]);
        let z = v(&[0.0, 0.0, 0.0]);
        let q = a.div(&z).unwrap();
        assert_eq!(q.as_slice()[0], f64::INFINITY);
        assert!(q.as_slice()[1].is_nan());
        assert_eq!(q.as_slice()[2], f64::NEG_INFINITY);
        assert_eq!(z.power(&z).unwrap().as_slice(), &[1.0, 1.0, 1.0]);
        assert!(NDArray::scalar(-8.0)
            .power(&NDArray::scalar(0.5))
            .unwrap()
            .as_slice()[0]
            .is_nan());
    }

    #[test]
    fn test_promotion_real_complex() {
        let a = v(&[1.0, 2.0]);
        let z = NDArray::from_complex(vec![Complex64::new(0.0, 1.0); 2], vec![2]).unwrap();
        let s = a.add(&z).unwrap();
        assert!(s.is_complex());
        assert_eq!(s.get(&[1]).unwrap(), Complex64::new(2.0, 1.0));
        let p = z.mul(&z).unwrap();
        assert_eq!(p.get(&[0]).unwrap(), Complex64::new(-1.0, 0.0));
    }

    #[test]
    fn test_complex_mod_unsupported() {
        let z = NDArray::scalar(1.0).to_complex();
        let err = z.modulo(&NDArray::scalar(2.0)).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Dtype);
    }

    #[test]
    fn test_arctan2() {
        let y = v(&[1.0, -1.0]);
        let x = v(&[1.0, -1.0]);
        let r = y.arctan2(&x).unwrap();
        assert!((r.as_slice()[0] - core::f64::consts::FRAC_PI_4).abs() < 1e-15);
        assert!((r.as_slice()[1] + 3.0 * core::f64::consts::FRAC_PI_4).abs() < 1e-15);
    }

    #[test]
    fn test_maximum_propagates_nan() {
        let m = v(&[1.0, f64::NAN]).maximum(&v(&[2.0, 0.0])).unwrap();
        assert_eq!(m.as_slice()[0], 2.0);
        assert!(m.as_slice()[1].is_nan());
    }

    #[test]
    fn test_comparisons_real_output() {
        let a = v(&[1.0, 2.0, 3.0]);
        let b = NDArray::scalar(2.0);
        assert_eq!(a.greater(&b).unwrap().as_slice(), &[0.0, 0.0, 1.0]);
        assert_eq!(a.less_equal(&b).unwrap().as_slice(), &[1.0, 1.0, 0.0]);
        assert_eq!(a.equal(&b).unwrap().as_slice(), &[0.0, 1.0, 0.0]);
        let z = a.to_complex();
        let eq = z.not_equal(&b).unwrap();
        assert!(!eq.is_complex());
        assert_eq!(eq.as_slice(), &[1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_nan_inf_predicates() {
        let a = v(&[1.0, f64::NAN, f64::INFINITY]);
        assert_eq!(a.isnan().as_slice(), &[0.0, 1.0, 0.0]);
        assert_eq!(a.isinf().as_slice(), &[0.0, 0.0, 1.0]);
        assert_eq!(a.isfinite().as_slice(), &[1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_where_broadcasts() {
        let cond = NDArray::from_vec(vec![1.0, 0.0], vec![2, 1]).unwrap();
        let x = v(&[1.0, 2.0, 3.0]);
        let y = NDArray::scalar(-1.0);
        let w = NDArray::where_(&cond, &x, &y).unwrap();
        assert_eq!(w.shape(), &[2, 3]);
        assert_eq!(w.as_slice(), &[1.0, 2.0, 3.0, -1.0, -1.0, -1.0]);
    }

    #[test]
    fn test_logical() {
        let a = v(&[0.0, 1.0, 2.0]);
        let b = v(&[1.0, 0.0, 3.0]);
        assert_eq!(a.logical_and(&b).unwrap().as_slice(), &[0.0, 0.0, 1.0]);
        assert_eq!(a.logical_or(&b).unwrap().as_slice(), &[1.0, 1.0, 1.0]);
        assert_eq!(a.logical_xor(&b).unwrap().as_slice(), &[1.0, 1.0, 0.0]);
        assert_eq!(a.logical_not().as_slice(), &[1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_isclose_allclose() {
        let a = v(&[1.0, 2.0, f64::NAN]);
        let b = v(&[1.0 + 1e-10, 2.1, f64::NAN]);
        assert_eq!(a.isclose(&b, 1e-5, 1e-8).unwrap().as_slice(), &[1.0, 0.0, 0.0]);
        assert!(v(&[1.0, 2.0]).allclose(&v(&[1.0, 2.0 + 1e-12]), 1e-9, 0.0).unwrap());
        assert!(v(&[1.0]).array_equal(&v(&[1.0]).to_complex()));
    }
}
