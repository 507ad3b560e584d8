//! Nested-sequence interchange form.
//!
//! [`Nested`] is what hosts hand in (`array([[1, 2], [3, 4]])`) and what
//! [`NDArray::tolist`] hands back. Nesting depth is the rank; every list at
//! a given depth must have the same length.

use num_complex::Complex64;

use crate::array::NDArray;
use crate::dtype::Value;
use crate::error::{CoreError, Result};
use crate::shape::numel;
use crate::storage::Storage;

/// A scalar or a list of nested values.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum Nested {
    Scalar(Value),
    List(Vec<Nested>),
}

impl Nested {
    /// Shape implied by following the first element at each depth.
    ///
    /// This does not check that the input is rectangular; see
    /// [`NDArray::from_nested`].
    pub fn shape(&self) -> Vec<usize> {
        let mut shape = Vec::new();
        let mut node = self;
        while let Nested::List(items) = node {
            shape.push(items.len());
            match items.first() {
                Some(first) => node = first,
                None => break,
            }
        }
        shape
    }

    /// Nesting depth (0 for a scalar).
    pub fn depth(&self) -> usize {
        self.shape().len()
    }

    pub fn as_scalar(&self) -> Option<Value> {
        match self {
            Nested::Scalar(v) => Some(*v),
            Nested::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Nested]> {
        match self {
            Nested::Scalar(_) => None,
            Nested::List(items) => Some(items),
        }
    }
}

impl From<Value> for Nested {
    fn from(v: Value) -> Self {
        Nested::Scalar(v)
    }
}

impl From<f64> for Nested {
    fn from(v: f64) -> Self {
        Nested::Scalar(Value::Real(v))
    }
}

impl From<Complex64> for Nested {
    fn from(z: Complex64) -> Self {
        Nested::Scalar(Value::Complex(z))
    }
}

impl<T: Into<Nested>> From<Vec<T>> for Nested {
    fn from(items: Vec<T>) -> Self {
        Nested::List(items.into_iter().map(Into::into).collect())
    }
}

fn flatten_into(node: &Nested, shape: &[usize], full: &[usize], out: &mut Vec<Value>) -> Result<()> {
    match (node, shape.split_first()) {
        (Nested::Scalar(v), None) => {
            out.push(*v);
            Ok(())
        }
        (Nested::List(items), Some((&len, rest))) if items.len() == len => {
            for item in items {
                flatten_into(item, rest, full, out)?;
            }
            Ok(())
        }
        _ => Err(CoreError::InvalidShape {
            shape: full.to_vec(),
            reason: "ragged nested sequence",
        }),
    }
}

impl NDArray {
    /// Build an array from nested sequences.
    ///
    /// The result is complex if any leaf is complex. Ragged input fails
    /// with a shape error.
    ///
    /// ```
    /// # use numera_core::array::NDArray;
    /// # use numera_core::interop::Nested;
    /// let n = Nested::from(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
    /// let a = NDArray::from_nested(&n).unwrap();
    /// assert_eq!(a.shape(), &[2, 2]);
    /// assert_eq!(a.tolist(), n);
    /// ```
    pub fn from_nested(nested: &Nested) -> Result<NDArray> {
        let shape = nested.shape();
        let mut values = Vec::with_capacity(numel(&shape));
        flatten_into(nested, &shape, &shape, &mut values)?;
        let storage = if values.iter().any(|v| matches!(v, Value::Complex(_))) {
            Storage::from_complex(values.iter().map(Value::to_complex).collect())
        } else {
            Storage::Real(values.iter().map(Value::re).collect())
        };
        Ok(NDArray::from_raw(storage, shape))
    }

    /// The array as nested sequences; a 0-d array becomes a bare scalar.
    ///
    /// An empty list carries no inner extents, so an array whose leading
    /// axis has length 0 (say shape `[0, 3]`) comes back from
    /// [`from_nested`](Self::from_nested) with shape `[0]`.
    pub fn tolist(&self) -> Nested {
        self.nest(0, 0)
    }

    fn nest(&self, axis: usize, base: usize) -> Nested {
        if axis == self.ndim() {
            return Nested::Scalar(self.value_at(base));
        }
        let stride = self.strides()[axis];
        Nested::List(
            (0..self.shape()[axis])
                .map(|i| self.nest(axis + 1, base + i * stride))
                .collect(),
        )
    }
}

impl TryFrom<&Nested> for NDArray {
    type Error = CoreError;

    fn try_from(nested: &Nested) -> Result<Self> {
        NDArray::from_nested(nested)
    }
}

impl From<&NDArray> for Nested {
    fn from(a: &NDArray) -> Self {
        a.tolist()
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::dtype::DType;
    use crate::error::ErrorKind;

    #[test]
    fn test_empty_leading_axis_drops_inner_extents() {
        let a = NDArray::zeros(vec![0, 3]);
        assert_eq!(a.tolist(), Nested::List(vec![]));
        assert_eq!(NDArray::from_nested(&a.tolist()).unwrap().shape(), &[0]);
        let b = NDArray::zeros(vec![3, 0]);
        assert_eq!(NDArray::from_nested(&b.tolist()).unwrap().shape(), &[3, 0]);
    }

    #[test]
    fn test_shape_inference() {
        let n = Nested::from(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        assert_eq!(n.shape(), vec![2, 3]);
        assert_eq!(n.depth(), 2);
        assert_eq!(Nested::from(7.0).shape(), Vec::<usize>::new());
    }

    #[test]
    fn test_from_nested_real() {
        let n = Nested::from(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        let a = NDArray::from_nested(&n).unwrap();
        assert_eq!(a.dtype(), DType::Real64);
        assert_eq!(a.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_mixed_leaves_promote() {
        let n = Nested::List(vec![
            Nested::from(1.0),
            Nested::from(Complex64::new(0.0, 2.0)),
        ]);
        let a = NDArray::from_nested(&n).unwrap();
        assert!(a.is_complex());
        assert_eq!(a.get(&[0]).unwrap(), Complex64::new(1.0, 0.0));
    }

    #[test]
    fn test_ragged_is_shape_error() {
        let n = Nested::List(vec![Nested::from(vec![1.0, 2.0]), Nested::from(vec![3.0])]);
        let err = NDArray::from_nested(&n).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);
        assert!(err.to_string().contains("ragged"));

        let mixed_depth = Nested::List(vec![Nested::from(1.0), Nested::from(vec![2.0])]);
        assert!(NDArray::from_nested(&mixed_depth).is_err());
    }

    #[test]
    fn test_empty_list() {
        let a = NDArray::from_nested(&Nested::List(vec![])).unwrap();
        assert_eq!(a.shape(), &[0]);
        assert_eq!(a.tolist(), Nested::List(vec![]));
    }

    #[test]
    fn test_scalar_roundtrip() {
        let a = NDArray::scalar(3.5);
        assert_eq!(a.tolist(), Nested::from(3.5));
        assert_eq!(NDArray::from_nested(&a.tolist()).unwrap(), a);
    }

    #[test]
    fn test_tolist_3d_roundtrip() {
        let a = NDArray::arange(0.0, 24.0, 1.0)
            .unwrap()
            .reshape(vec![2, 3, 4])
            .unwrap()
            .sin();
        let back = NDArray::try_from(&a.tolist()).unwrap();
        assert_eq!(back, a);
    }

    #[test]
    fn test_complex_roundtrip_keeps_dtype() {
        let z = NDArray::from_vec(vec![1.0, 2.0], vec![2]).unwrap().to_complex();
        let back = NDArray::from_nested(&Nested::from(&z)).unwrap();
        assert!(back.is_complex());
        assert_eq!(back, z);
    }
}
