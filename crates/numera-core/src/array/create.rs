//! Array creation functions analogous to `np.zeros`, `np.arange`, etc.

use crate::dtype::Value;
use crate::error::{CoreError, Result};
use crate::shape::numel;
use crate::storage::Storage;

use super::NDArray;

impl NDArray {
    /// Create an array filled with zeros.
    ///
    /// ```
    /// # use numera_core::array::NDArray;
    /// let t = NDArray::zeros(vec![2, 3]);
    /// assert_eq!(t.shape(), &[2, 3]);
    /// assert!(t.as_slice().iter().all(|&x| x == 0.0));
    /// ```
    pub fn zeros(shape: Vec<usize>) -> Self {
        Self::full(shape, 0.0)
    }

    /// Create an array filled with ones.
    pub fn ones(shape: Vec<usize>) -> Self {
        Self::full(shape, 1.0)
    }

    /// Create an array filled with a constant value.
    pub fn full(shape: Vec<usize>, value: impl Into<Value>) -> Self {
        let n = numel(&shape);
        Self::from_raw(Storage::filled(n, value.into()), shape)
    }

    /// An uninitialised array in `NumPy`; zero-filled here.
    pub fn empty(shape: Vec<usize>) -> Self {
        Self::zeros(shape)
    }

    /// Zeros with the shape and dtype of `other`.
    pub fn zeros_like(other: &NDArray) -> Self {
        Self::full_like(other, 0.0)
    }

    /// Ones with the shape and dtype of `other`.
    pub fn ones_like(other: &NDArray) -> Self {
        Self::full_like(other, 1.0)
    }

    /// `value` repeated with the shape of `other`; complex if either is.
    pub fn full_like(other: &NDArray, value: impl Into<Value>) -> Self {
        let value = match (value.into(), other.is_complex()) {
            (Value::Real(v), true) => Value::Complex(num_complex::Complex64::new(v, 0.0)),
            (v, _) => v,
        };
        Self::full(other.shape().to_vec(), value)
    }

    /// Evenly spaced values in the half-open interval `[start, stop)`.
    ///
    /// ```
    /// # use numera_core::array::NDArray;
    /// let t = NDArray::arange(0.0, 10.0, 2.0).unwrap();
    /// assert_eq!(t.as_slice(), &[0.0, 2.0, 4.0, 6.0, 8.0]);
    /// ```
    pub fn arange(start: f64, stop: f64, step: f64) -> Result<Self> {
        if step == 0.0 || !step.is_finite() {
            return Err(CoreError::InvalidArgument {
                reason: "arange step must be finite and nonzero",
            });
        }
        if !start.is_finite() || !stop.is_finite() {
            return Err(CoreError::InvalidArgument {
                reason: "arange bounds must be finite",
            });
        }
        let n = ((stop - start) / step).ceil().max(0.0) as usize;
        let data: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
        Ok(Self::from_raw(Storage::Real(data), vec![n]))
    }

    /// Create a 1-D array with `n` evenly spaced values from `start` to `end`
    /// (inclusive).
    ///
    /// `n == 1` yields `[start]`; `n == 0` yields an empty array.
    pub fn linspace(start: f64, end: f64, n: usize) -> Self {
        let data: Vec<f64> = match n {
            0 => vec![],
            1 => vec![start],
            _ => {
                let step = (end - start) / (n - 1) as f64;
                let mut data: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
                data[n - 1] = end;
                data
            }
        };
        Self::from_raw(Storage::Real(data), vec![n])
    }

    /// An `n x m` matrix with ones on diagonal `k` (positive = above main).
    ///
    /// ```
    /// # use numera_core::array::NDArray;
    /// let eye = NDArray::eye(3, None, 0);
    /// assert_eq!(eye.shape(), &[3, 3]);
    /// assert_eq!(eye.get(&[0, 0]).unwrap(), 1.0);
    /// assert_eq!(eye.get(&[0, 1]).unwrap(), 0.0);
    /// ```
    pub fn eye(n: usize, m: Option<usize>, k: isize) -> Self {
        let m = m.unwrap_or(n);
        let mut data = vec![0.0; n * m];
        for i in 0..n {
            let j = i as isize + k;
            if j >= 0 && (j as usize) < m {
                data[i * m + j as usize] = 1.0;
            }
        }
        Self::from_raw(Storage::Real(data), vec![n, m])
    }

    /// Create an identity matrix of size `n x n`.
    pub fn identity(n: usize) -> Self {
        Self::eye(n, None, 0)
    }
}
