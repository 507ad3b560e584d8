//! Linear algebra on 1-D and 2-D arrays.
//!
//! Products (`dot`, `matmul`, `inner`, `outer`, `kron`, `matrix_power`)
//! promote their operands to a common dtype once and then run the generic
//! kernels in [`blas`]. Diagonal helpers (`trace`, `diagonal`, `diag`) work
//! on either dtype directly.

pub mod blas;

use num_complex::Complex64;

use crate::array::{BinaryOp, NDArray};
use crate::dtype::{DType, Element, Value};
use crate::error::{CoreError, Result};
use crate::storage::Storage;

/// Matrix-style product of operands with shapes `sa` and `sb` (rank <= 2).
fn product<T: Element>(a: &[T], sa: &[usize], b: &[T], sb: &[usize]) -> Result<(Vec<T>, Vec<usize>)> {
    let mismatch = || CoreError::ShapeMismatch {
        expected: sa.to_vec(),
        got: sb.to_vec(),
    };
    match (sa, sb) {
        ([n], [m]) => {
            if n != m {
                return Err(mismatch());
            }
            Ok((vec![blas::dot(a, b)], vec![]))
        }
        ([m, k], [n]) => {
            if k != n {
                return Err(mismatch());
            }
            Ok((blas::gemv(a, *m, *k, b), vec![*m]))
        }
        ([k], [k2, n]) => {
            if k != k2 {
                return Err(mismatch());
            }
            Ok((blas::gemm(a, 1, *k, b, *n), vec![*n]))
        }
        ([m, k], [k2, n]) => {
            if k != k2 {
                return Err(mismatch());
            }
            Ok((blas::gemm(a, *m, *k, b, *n), vec![*m, *n]))
        }
        _ => Err(CoreError::InvalidArgument {
            reason: "matrix products support arrays of rank 1 or 2",
        }),
    }
}

/// Kronecker product of two matrices given as `[p, q]` and `[r, s]`.
fn kron_kernel<T: Element>(a: &[T], (p, q): (usize, usize), b: &[T], (r, s): (usize, usize)) -> Vec<T> {
    let cols = q * s;
    let mut out = vec![T::zero(); p * r * cols];
    for i in 0..p {
        for j in 0..q {
            let aij = a[i * q + j];
            for k in 0..r {
                for l in 0..s {
                    out[(i * r + k) * cols + j * s + l] = aij * b[k * s + l];
                }
            }
        }
    }
    out
}

/// Run a two-operand kernel at the promoted dtype.
fn promoted<R, C>(a: &NDArray, b: &NDArray, real: R, complex: C) -> Result<NDArray>
where
    R: FnOnce(&[f64], &[f64]) -> Result<(Vec<f64>, Vec<usize>)>,
    C: FnOnce(&[Complex64], &[Complex64]) -> Result<(Vec<Complex64>, Vec<usize>)>,
{
    let (storage, shape) = match a.dtype().promote(b.dtype()) {
        DType::Real64 => {
            let (data, shape) = real(a.as_slice(), b.as_slice())?;
            (f64::into_storage(data), shape)
        }
        DType::Complex128 => {
            let (x, y) = (a.storage().to_complex_vec(), b.storage().to_complex_vec());
            let (data, shape) = complex(&x, &y)?;
            (Complex64::into_storage(data), shape)
        }
    };
    NDArray::from_storage(storage, shape)
}

impl NDArray {
    /// Dot product.
    ///
    /// - vector · vector gives a 0-d array,
    /// - matrix · vector and vector · matrix give a vector,
    /// - matrix · matrix is the matrix product,
    /// - a 0-d operand scales the other element-wise.
    ///
    /// ```
    /// # use numera_core::array::NDArray;
    /// let a = NDArray::from(vec![1.0, 2.0, 3.0]);
    /// let b = NDArray::from(vec![4.0, 5.0, 6.0]);
    /// assert_eq!(a.dot(&b).unwrap().item().unwrap(), 32.0);
    /// ```
    pub fn dot(&self, other: &NDArray) -> Result<NDArray> {
        if self.ndim() == 0 || other.ndim() == 0 {
            return self.binary(other, BinaryOp::Mul);
        }
        log::debug!("dot: {:?} x {:?}", self.shape(), other.shape());
        let (sa, sb) = (self.shape(), other.shape());
        promoted(self, other, |a, b| product(a, sa, b, sb), |a, b| product(a, sa, b, sb))
    }

    /// Matrix product; like [`dot`](Self::dot) but rejects 0-d operands.
    pub fn matmul(&self, other: &NDArray) -> Result<NDArray> {
        if self.ndim() == 0 || other.ndim() == 0 {
            return Err(CoreError::InvalidArgument {
                reason: "matmul operands must have at least one dimension",
            });
        }
        self.dot(other)
    }

    /// Inner product of two vectors.
    pub fn inner(&self, other: &NDArray) -> Result<NDArray> {
        if self.ndim() != 1 || other.ndim() != 1 {
            return Err(CoreError::InvalidArgument {
                reason: "inner expects two 1-D arrays",
            });
        }
        self.dot(other)
    }

    /// Outer product of the flattened operands: `out[i, j] = a[i] * b[j]`.
    pub fn outer(&self, other: &NDArray) -> Result<NDArray> {
        let col = self.reshaped(vec![self.size(), 1])?;
        let row = other.reshaped(vec![1, other.size()])?;
        col.binary(&row, BinaryOp::Mul)
    }

    /// Kronecker product of two arrays of rank <= 2.
    ///
    /// Two vectors give a vector; otherwise vectors are treated as rows.
    pub fn kron(&self, other: &NDArray) -> Result<NDArray> {
        fn as_matrix(t: &NDArray) -> Result<(usize, usize)> {
            match *t.shape() {
                [] => Ok((1, 1)),
                [n] => Ok((1, n)),
                [m, n] => Ok((m, n)),
                _ => Err(CoreError::InvalidArgument {
                    reason: "kron supports arrays of rank <= 2",
                }),
            }
        }
        let (pa, pb) = (as_matrix(self)?, as_matrix(other)?);
        let out_shape = if self.ndim() <= 1 && other.ndim() <= 1 {
            vec![pa.1 * pb.1]
        } else {
            vec![pa.0 * pb.0, pa.1 * pb.1]
        };
        let (s1, s2) = (out_shape.clone(), out_shape);
        promoted(
            self,
            other,
            |a, b| Ok((kron_kernel(a, pa, b, pb), s1)),
            |a, b| Ok((kron_kernel(a, pa, b, pb), s2)),
        )
    }

    /// Integer power of a square matrix; `n = 0` gives the identity.
    pub fn matrix_power(&self, n: u32) -> Result<NDArray> {
        let size = match *self.shape() {
            [r, c] if r == c => r,
            _ => {
                return Err(CoreError::InvalidArgument {
                    reason: "matrix_power requires a square matrix",
                })
            }
        };
        let mut result = NDArray::identity(size);
        if self.is_complex() {
            result = result.to_complex();
        }
        let mut base = self.clone();
        let mut e = n;
        while e > 0 {
            if e & 1 == 1 {
                result = result.dot(&base)?;
            }
            e >>= 1;
            if e > 0 {
                base = base.dot(&base)?;
            }
        }
        Ok(result)
    }

    /// Frobenius norm (the 2-norm for vectors); complex moduli are used.
    pub fn norm(&self) -> f64 {
        match self.storage() {
            Storage::Real(v) => blas::nrm2(v),
            s @ Storage::Complex { .. } => s
                .to_complex_vec()
                .iter()
                .map(Complex64::norm_sqr)
                .sum::<f64>()
                .sqrt(),
        }
    }

    /// Flat indices of diagonal `offset` of a matrix (positive = above).
    fn diagonal_indices(&self, offset: isize) -> Result<Vec<usize>> {
        let [rows, cols] = *self.shape() else {
            return Err(CoreError::InvalidArgument {
                reason: "diagonal requires a 2-D array",
            });
        };
        let (r0, c0) = if offset >= 0 {
            (0, offset.unsigned_abs())
        } else {
            (offset.unsigned_abs(), 0)
        };
        let len = rows.saturating_sub(r0).min(cols.saturating_sub(c0));
        Ok((0..len).map(|i| (r0 + i) * cols + c0 + i).collect())
    }

    /// Elements on diagonal `offset` of a matrix, as a 1-D array.
    pub fn diagonal(&self, offset: isize) -> Result<NDArray> {
        let idx = self.diagonal_indices(offset)?;
        self.take(&idx)
    }

    /// Sum along diagonal `offset` of a matrix.
    pub fn trace(&self, offset: isize) -> Result<Value> {
        Ok(self.diagonal(offset)?.sum())
    }

    /// Vector input builds a square matrix with the vector on diagonal `k`;
    /// matrix input extracts diagonal `k`.
    pub fn diag(&self, k: isize) -> Result<NDArray> {
        match self.ndim() {
            1 => {
                let n = self.size() + k.unsigned_abs();
                let (r0, c0) = if k >= 0 {
                    (0, k.unsigned_abs())
                } else {
                    (k.unsigned_abs(), 0)
                };
                let mut idx = vec![None; n * n];
                for i in 0..self.size() {
                    idx[(r0 + i) * n + c0 + i] = Some(i);
                }
                let storage = self.storage().gather_or(&idx, self.zero_value());
                NDArray::from_storage(storage, vec![n, n])
            }
            2 => self.diagonal(k),
            _ => Err(CoreError::InvalidArgument {
                reason: "diag requires a 1-D or 2-D array",
            }),
        }
    }

    /// Zero of this array's dtype.
    fn zero_value(&self) -> Value {
        match self.dtype() {
            DType::Real64 => Value::Real(0.0),
            DType::Complex128 => Value::Complex(Complex64::new(0.0, 0.0)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use approx::assert_abs_diff_eq;

    fn m22() -> NDArray {
        NDArray::from_vec(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2]).unwrap()
    }

    #[test]
    fn test_dot_vectors_scalar_result() {
        let a = NDArray::from(vec![1.0, 2.0, 3.0]);
        let d = a.dot(&a).unwrap();
        assert_eq!(d.ndim(), 0);
        assert_eq!(d.item().unwrap(), 14.0);
    }

    #[test]
    fn test_matmul() {
        let b = NDArray::from_vec(vec![5.0, 6.0, 7.0, 8.0], vec![2, 2]).unwrap();
        let c = m22().matmul(&b).unwrap();
        assert_eq!(c.as_slice(), &[19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn test_matvec_and_vecmat() {
        let x = NDArray::from(vec![5.0, 6.0]);
        assert_eq!(m22().dot(&x).unwrap().as_slice(), &[17.0, 39.0]);
        assert_eq!(x.dot(&m22()).unwrap().as_slice(), &[23.0, 34.0]);
    }

    #[test]
    fn test_dot_shape_mismatch() {
        let a = NDArray::from(vec![1.0, 2.0]);
        let b = NDArray::from(vec![1.0, 2.0, 3.0]);
        assert_eq!(a.dot(&b).unwrap_err().kind(), ErrorKind::Shape);
        assert!(NDArray::scalar(2.0).matmul(&a).is_err());
    }

    #[test]
    fn test_dot_complex_promotes() {
        let a = NDArray::from(vec![1.0, 2.0]);
        let b = NDArray::from_complex(
            vec![Complex64::new(0.0, 1.0), Complex64::new(1.0, 0.0)],
            vec![2],
        )
        .unwrap();
        let d = a.dot(&b).unwrap();
        assert_eq!(d.item().unwrap(), Complex64::new(2.0, 1.0));
    }

    #[test]
    fn test_outer() {
        let a = NDArray::from(vec![1.0, 2.0]);
        let b = NDArray::from(vec![3.0, 4.0, 5.0]);
        let o = a.outer(&b).unwrap();
        assert_eq!(o.shape(), &[2, 3]);
        assert_eq!(o.get(&[1, 2]).unwrap(), 10.0);
    }

    #[test]
    fn test_trace_eye() {
        for n in [1, 3, 7] {
            assert_eq!(NDArray::eye(n, None, 0).trace(0).unwrap(), n as f64);
        }
        assert_eq!(m22().trace(1).unwrap(), 2.0);
        assert_eq!(m22().trace(-1).unwrap(), 3.0);
    }

    #[test]
    fn test_diagonal_offsets() {
        let t = NDArray::arange(0.0, 12.0, 1.0).unwrap().reshape(vec![3, 4]).unwrap();
        assert_eq!(t.diagonal(0).unwrap().as_slice(), &[0.0, 5.0, 10.0]);
        assert_eq!(t.diagonal(1).unwrap().as_slice(), &[1.0, 6.0, 11.0]);
        assert_eq!(t.diagonal(-2).unwrap().as_slice(), &[8.0]);
        assert!(t.diagonal(5).unwrap().is_empty());
    }

    #[test]
    fn test_diag_build_and_extract() {
        let v = NDArray::from(vec![1.0, 2.0]);
        let d = v.diag(0).unwrap();
        assert_eq!(d.as_slice(), &[1.0, 0.0, 0.0, 2.0]);
        let up = v.diag(1).unwrap();
        assert_eq!(up.shape(), &[3, 3]);
        assert_eq!(up.get(&[0, 1]).unwrap(), 1.0);
        assert_eq!(up.get(&[1, 2]).unwrap(), 2.0);
        assert_eq!(d.diag(0).unwrap(), v);
    }

    #[test]
    fn test_diag_of_outer() {
        let v = NDArray::from(vec![1.0, 2.0, 3.0]);
        let d = v.outer(&v).unwrap().diag(0).unwrap();
        assert_eq!(d.as_slice(), &[1.0, 4.0, 9.0]);
    }

    #[test]
    fn test_kron() {
        let a = NDArray::from_vec(vec![1.0, 2.0], vec![1, 2]).unwrap();
        let b = NDArray::eye(2, None, 0);
        let k = a.kron(&b).unwrap();
        assert_eq!(k.shape(), &[2, 4]);
        assert_eq!(k.as_slice(), &[1.0, 0.0, 2.0, 0.0, 0.0, 1.0, 0.0, 2.0]);
        let v = NDArray::from(vec![1.0, 10.0]);
        assert_eq!(v.kron(&v).unwrap().as_slice(), &[1.0, 10.0, 10.0, 100.0]);
    }

    #[test]
    fn test_matrix_power() {
        let m = NDArray::from_vec(vec![1.0, 1.0, 1.0, 0.0], vec![2, 2]).unwrap();
        // Fibonacci: [[F(n+1), F(n)], [F(n), F(n-1)]]
        let p = m.matrix_power(10).unwrap();
        assert_eq!(p.as_slice(), &[89.0, 55.0, 55.0, 34.0]);
        assert_eq!(m.matrix_power(0).unwrap(), NDArray::identity(2));
        assert!(NDArray::zeros(vec![2, 3]).matrix_power(2).is_err());
    }

    #[test]
    fn test_norm() {
        assert_abs_diff_eq!(NDArray::from(vec![3.0, 4.0]).norm(), 5.0, epsilon = 1e-15);
        let z = NDArray::from_complex(vec![Complex64::new(3.0, 4.0)], vec![1]).unwrap();
        assert_abs_diff_eq!(z.norm(), 5.0, epsilon = 1e-15);
        assert_abs_diff_eq!(m22().norm(), 30f64.sqrt(), epsilon = 1e-15);
    }
}
