//! Owned element buffers.
//!
//! A real array owns one `Vec<f64>`; a complex array owns two parallel
//! buffers of equal length (real and imaginary parts). Every operation that
//! builds a new array builds new storage, so buffers are never aliased.

use num_complex::Complex64;

use crate::dtype::{DType, Value};
use crate::error::{CoreError, Result};

/// Flat, row-major element storage tagged by dtype.
#[derive(Debug, Clone, PartialEq)]
pub enum Storage {
    Real(Vec<f64>),
    Complex { re: Vec<f64>, im: Vec<f64> },
}

impl Storage {
    /// Build complex storage from interleaved values.
    pub fn from_complex(data: Vec<Complex64>) -> Self {
        let (re, im) = data.into_iter().map(|z| (z.re, z.im)).unzip();
        Storage::Complex { re, im }
    }

    /// Build complex storage from split parts.
    pub fn from_parts(re: Vec<f64>, im: Vec<f64>) -> Result<Self> {
        if re.len() != im.len() {
            return Err(CoreError::ShapeMismatch {
                expected: vec![re.len()],
                got: vec![im.len()],
            });
        }
        Ok(Storage::Complex { re, im })
    }

    /// Storage of `n` copies of `value`.
    pub fn filled(n: usize, value: Value) -> Self {
        match value {
            Value::Real(v) => Storage::Real(vec![v; n]),
            Value::Complex(z) => Storage::Complex {
                re: vec![z.re; n],
                im: vec![z.im; n],
            },
        }
    }

    #[inline]
    pub fn dtype(&self) -> DType {
        match self {
            Storage::Real(_) => DType::Real64,
            Storage::Complex { .. } => DType::Complex128,
        }
    }

    /// Number of logical elements.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Storage::Real(v) => v.len(),
            Storage::Complex { re, .. } => re.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The real buffer (real part for complex storage).
    #[inline]
    pub fn re(&self) -> &[f64] {
        match self {
            Storage::Real(v) => v,
            Storage::Complex { re, .. } => re,
        }
    }

    /// The imaginary buffer, if complex.
    #[inline]
    pub fn im(&self) -> Option<&[f64]> {
        match self {
            Storage::Real(_) => None,
            Storage::Complex { im, .. } => Some(im),
        }
    }

    /// Element `i` as a [`Value`].
    #[inline]
    pub fn value(&self, i: usize) -> Value {
        match self {
            Storage::Real(v) => Value::Real(v[i]),
            Storage::Complex { re, im } => Value::Complex(Complex64::new(re[i], im[i])),
        }
    }

    /// Element `i` widened to complex.
    #[inline]
    pub fn complex_at(&self, i: usize) -> Complex64 {
        match self {
            Storage::Real(v) => Complex64::new(v[i], 0.0),
            Storage::Complex { re, im } => Complex64::new(re[i], im[i]),
        }
    }

    /// Overwrite element `i`. Writing a complex value into real storage
    /// fails with a dtype error; writing a real into complex storage zeroes
    /// the imaginary part.
    pub fn set(&mut self, i: usize, value: Value) -> Result<()> {
        match (self, value) {
            (Storage::Real(v), Value::Real(x)) => v[i] = x,
            (Storage::Real(_), Value::Complex(_)) => {
                return Err(CoreError::UnsupportedDtype {
                    op: "assigning a complex value",
                    dtype: DType::Real64,
                });
            }
            (Storage::Complex { re, im }, value) => {
                re[i] = value.re();
                im[i] = value.im();
            }
        }
        Ok(())
    }

    /// All elements widened to complex.
    pub fn to_complex_vec(&self) -> Vec<Complex64> {
        match self {
            Storage::Real(v) => v.iter().map(|&x| Complex64::new(x, 0.0)).collect(),
            Storage::Complex { re, im } => re
                .iter()
                .zip(im.iter())
                .map(|(&r, &i)| Complex64::new(r, i))
                .collect(),
        }
    }

    /// Convert to the given dtype. Narrowing complex to real is refused.
    pub fn cast(&self, dtype: DType) -> Result<Storage> {
        match (self, dtype) {
            (Storage::Real(v), DType::Real64) => Ok(Storage::Real(v.clone())),
            (Storage::Real(v), DType::Complex128) => Ok(Storage::Complex {
                re: v.clone(),
                im: vec![0.0; v.len()],
            }),
            (Storage::Complex { .. }, DType::Complex128) => Ok(self.clone()),
            (Storage::Complex { .. }, DType::Real64) => Err(CoreError::UnsupportedDtype {
                op: "narrowing to real64",
                dtype: DType::Complex128,
            }),
        }
    }

    /// New storage holding `self[idx[0]], self[idx[1]], ...`.
    pub fn gather(&self, idx: &[usize]) -> Storage {
        match self {
            Storage::Real(v) => Storage::Real(idx.iter().map(|&i| v[i]).collect()),
            Storage::Complex { re, im } => Storage::Complex {
                re: idx.iter().map(|&i| re[i]).collect(),
                im: idx.iter().map(|&i| im[i]).collect(),
            },
        }
    }

    /// Like [`gather`](Self::gather), but `None` slots take `fill`.
    ///
    /// The output dtype is the promotion of `self` and `fill`.
    pub fn gather_or(&self, idx: &[Option<usize>], fill: Value) -> Storage {
        match (self, fill) {
            (Storage::Real(v), Value::Real(f)) => {
                Storage::Real(idx.iter().map(|i| i.map_or(f, |i| v[i])).collect())
            }
            _ => {
                let f = fill.to_complex();
                Storage::from_complex(
                    idx.iter()
                        .map(|i| i.map_or(f, |i| self.complex_at(i)))
                        .collect(),
                )
            }
        }
    }

    /// Concatenate storages end to end, promoting to a common dtype.
    pub fn concat(parts: &[&Storage]) -> Storage {
        let dtype = DType::promote_all(parts.iter().map(|s| s.dtype()));
        match dtype {
            DType::Real64 => {
                let mut out = Vec::with_capacity(parts.iter().map(|s| s.len()).sum());
                for s in parts {
                    out.extend_from_slice(s.re());
                }
                Storage::Real(out)
            }
            DType::Complex128 => {
                let total = parts.iter().map(|s| s.len()).sum();
                let mut re = Vec::with_capacity(total);
                let mut im = Vec::with_capacity(total);
                for s in parts {
                    re.extend_from_slice(s.re());
                    match s.im() {
                        Some(i) => im.extend_from_slice(i),
                        None => im.extend(core::iter::repeat(0.0).take(s.len())),
                    }
                }
                Storage::Complex { re, im }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts_length_mismatch() {
        assert!(Storage::from_parts(vec![1.0, 2.0], vec![0.0]).is_err());
    }

    #[test]
    fn test_gather_complex() {
        let s = Storage::from_parts(vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]).unwrap();
        let g = s.gather(&[2, 0]);
        assert_eq!(g.re(), &[3.0, 1.0]);
        assert_eq!(g.im().unwrap(), &[6.0, 4.0]);
    }

    #[test]
    fn test_gather_or_promotes() {
        let s = Storage::Real(vec![1.0, 2.0]);
        let g = s.gather_or(&[None, Some(1)], Value::Complex(Complex64::new(0.0, 1.0)));
        assert_eq!(g.dtype(), DType::Complex128);
        assert_eq!(g.complex_at(0), Complex64::new(0.0, 1.0));
        assert_eq!(g.complex_at(1), Complex64::new(2.0, 0.0));
    }

    #[test]
    fn test_concat_mixed() {
        let a = Storage::Real(vec![1.0]);
        let b = Storage::from_complex(vec![Complex64::new(2.0, 3.0)]);
        let c = Storage::concat(&[&a, &b]);
        assert_eq!(c.re(), &[1.0, 2.0]);
        assert_eq!(c.im().unwrap(), &[0.0, 3.0]);
    }

    #[test]
    fn test_set_complex_into_real_fails() {
        let mut s = Storage::Real(vec![0.0]);
        assert!(s.set(0, Value::Complex(Complex64::new(1.0, 1.0))).is_err());
        s.set(0, Value::Real(7.0)).unwrap();
        assert_eq!(s.re(), &[7.0]);
    }

    #[test]
    fn test_cast() {
        let s = Storage::Real(vec![1.0, 2.0]);
        let c = s.cast(DType::Complex128).unwrap();
        assert_eq!(c.im().unwrap(), &[0.0, 0.0]);
        assert!(c.cast(DType::Real64).is_err());
    }
}
