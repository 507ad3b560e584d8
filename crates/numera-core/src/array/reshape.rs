//! Shape manipulation: reshape, flatten, transpose, squeeze, expand_dims,
//! and broadcast_to.
//!
//! The storage order never changes here except in `transpose`, so these are
//! metadata-only when they consume `self`.

use crate::error::{CoreError, Result};
use crate::shape::{broadcast_indices, broadcast_shapes, compute_strides, infer_shape, numel};

use super::NDArray;

impl NDArray {
    /// Reshape the array to a new shape without copying data.
    ///
    /// The total number of elements must remain the same.
    pub fn reshape(mut self, new_shape: Vec<usize>) -> Result<Self> {
        if numel(&new_shape) != self.size() {
            return Err(CoreError::InvalidShape {
                shape: new_shape,
                reason: "new shape has different number of elements",
            });
        }
        self.strides = compute_strides(&new_shape);
        self.shape = new_shape;
        Ok(self)
    }

    /// Return a reshaped array without consuming `self` (copies data).
    pub fn reshaped(&self, new_shape: Vec<usize>) -> Result<Self> {
        self.clone().reshape(new_shape)
    }

    /// Reshape where one dimension may be `-1` and is inferred.
    pub fn reshape_infer(&self, spec: &[isize]) -> Result<Self> {
        let shape = infer_shape(spec, self.size())?;
        self.reshaped(shape)
    }

    /// Flatten the array into a 1-D array (consumes self, no copy).
    pub fn flatten(self) -> Self {
        let n = self.size();
        NDArray {
            storage: self.storage,
            shape: vec![n],
            strides: vec![1],
        }
    }

    /// Return a flattened copy of the array.
    pub fn flattened(&self) -> Self {
        self.clone().flatten()
    }

    /// Alias of [`flattened`](Self::flattened).
    pub fn ravel(&self) -> Self {
        self.flattened()
    }

    /// Matrix transpose.
    ///
    /// Rank 0 and 1 arrays are returned unchanged; rank 2 arrays have their
    /// axes swapped. Higher ranks are rejected.
    pub fn transpose(&self) -> Result<Self> {
        match self.ndim() {
            0 | 1 => Ok(self.clone()),
            2 => {
                let (rows, cols) = (self.shape[0], self.shape[1]);
                let mut idx = Vec::with_capacity(self.size());
                for c in 0..cols {
                    for r in 0..rows {
                        idx.push(r * cols + c);
                    }
                }
                Ok(Self::from_raw(self.storage.gather(&idx), vec![cols, rows]))
            }
            _ => Err(CoreError::InvalidArgument {
                reason: "transpose() supports arrays of rank <= 2",
            }),
        }
    }

    /// Shorthand for [`transpose`](Self::transpose).
    #[allow(non_snake_case)]
    pub fn T(&self) -> Result<Self> {
        self.transpose()
    }

    /// Insert a dimension of size 1 at the given axis (`axis <= ndim`).
    pub fn expand_dims(mut self, axis: usize) -> Result<Self> {
        if axis > self.ndim() {
            return Err(CoreError::AxisOutOfBounds {
                axis,
                ndim: self.ndim() + 1,
            });
        }
        self.shape.insert(axis, 1);
        self.strides = compute_strides(&self.shape);
        Ok(self)
    }

    /// Remove all dimensions of size 1.
    pub fn squeeze(mut self) -> Self {
        self.shape.retain(|&d| d != 1);
        self.strides = compute_strides(&self.shape);
        self
    }

    /// Remove one dimension, which must have size 1.
    pub fn squeeze_axis(mut self, axis: usize) -> Result<Self> {
        crate::shape::check_axis(axis, self.ndim())?;
        if self.shape[axis] != 1 {
            return Err(CoreError::InvalidArgument {
                reason: "cannot squeeze an axis whose size is not 1",
            });
        }
        self.shape.remove(axis);
        self.strides = compute_strides(&self.shape);
        Ok(self)
    }

    /// Materialise this array broadcast to `shape`.
    pub fn broadcast_to(&self, shape: &[usize]) -> Result<Self> {
        let out = broadcast_shapes(&self.shape, shape)?;
        if out != shape {
            return Err(CoreError::BroadcastError {
                shape_a: self.shape.clone(),
                shape_b: shape.to_vec(),
            });
        }
        let idx = broadcast_indices(&self.shape, shape);
        Ok(Self::from_raw(self.storage.gather(&idx), out))
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn seq(n: usize) -> NDArray {
        NDArray::arange(0.0, n as f64, 1.0).unwrap()
    }

    #[test]
    fn test_reshape() {
        let t = NDArray::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![6]).unwrap();
        let t = t.reshape(vec![2, 3]).unwrap();
        assert_eq!(t.shape(), &[2, 3]);
        assert_eq!(t.strides(), &[3, 1]);
        assert_eq!(t.get(&[1, 0]).unwrap(), 4.0);
    }

    #[test]
    fn test_reshape_invalid() {
        let t = seq(4);
        let err = t.reshape(vec![3, 2]).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Shape);
    }

    #[test]
    fn test_reshape_infer() {
        let t = seq(12).reshape_infer(&[3, -1]).unwrap();
        assert_eq!(t.shape(), &[3, 4]);
    }

    #[test]
    fn test_flatten() {
        let t = seq(6).reshape(vec![2, 3]).unwrap();
        let flat = t.flatten();
        assert_eq!(flat.shape(), &[6]);
        assert_eq!(flat.as_slice(), &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_transpose() {
        // [[1, 2, 3],
        //  [4, 5, 6]]
        let t = NDArray::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]).unwrap();
        let tt = t.T().unwrap();
        assert_eq!(tt.shape(), &[3, 2]);
        assert_eq!(tt.get(&[0, 1]).unwrap(), 4.0);
        assert_eq!(tt.get(&[2, 0]).unwrap(), 3.0);
        assert_eq!(tt.get(&[2, 1]).unwrap(), 6.0);
    }

    #[test]
    fn test_transpose_vector_and_3d() {
        let v = seq(3);
        assert_eq!(v.transpose().unwrap(), v);
        assert!(seq(8).reshape(vec![2, 2, 2]).unwrap().transpose().is_err());
    }

    #[test]
    fn test_transpose_complex() {
        let z = seq(4).reshape(vec![2, 2]).unwrap().to_complex();
        let zt = z.transpose().unwrap();
        assert!(zt.is_complex());
        assert_eq!(zt.real().as_slice(), &[0.0, 2.0, 1.0, 3.0]);
    }

    #[test]
    fn test_expand_dims_squeeze() {
        let t = seq(3);
        let t = t.expand_dims(0).unwrap();
        assert_eq!(t.shape(), &[1, 3]);
        let t = t.expand_dims(2).unwrap();
        assert_eq!(t.shape(), &[1, 3, 1]);
        assert!(t.clone().expand_dims(4).is_err());
        let t = t.squeeze();
        assert_eq!(t.shape(), &[3]);
    }

    #[test]
    fn test_squeeze_to_scalar() {
        let t = NDArray::from_vec(vec![5.0], vec![1, 1]).unwrap().squeeze();
        assert_eq!(t.ndim(), 0);
        assert_eq!(t.item().unwrap(), 5.0);
    }

    #[test]
    fn test_squeeze_axis() {
        let t = seq(3).reshape(vec![1, 3]).unwrap();
        assert_eq!(t.clone().squeeze_axis(0).unwrap().shape(), &[3]);
        assert!(t.squeeze_axis(1).is_err());
    }

    #[test]
    fn test_broadcast_to() {
        let col = NDArray::from_vec(vec![1.0, 2.0], vec![2, 1]).unwrap();
        let b = col.broadcast_to(&[2, 3]).unwrap();
        assert_eq!(b.as_slice(), &[1.0, 1.0, 1.0, 2.0, 2.0, 2.0]);
        assert!(col.broadcast_to(&[3, 3]).is_err());
        assert!(b.broadcast_to(&[1, 3]).is_err());
    }
}
