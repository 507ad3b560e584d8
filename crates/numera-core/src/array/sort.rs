//! Sorting and searching.
//!
//! Sorting is stable and places NaN after every number. Index results are
//! 0-based and stored as real arrays so they compose with the rest of the
//! engine (gathering, arithmetic, host conversion).

use crate::config::Side;
use crate::error::{CoreError, Result};
use crate::shape::{axis_lanes, check_axis, unravel_index};
use crate::storage::Storage;

use super::reduce::nan_last;
use super::NDArray;

fn to_f64(indices: impl IntoIterator<Item = usize>) -> Vec<f64> {
    indices.into_iter().map(|i| i as f64).collect()
}

/// Insertion point of `x` into ascending `sorted`.
fn search(sorted: &[f64], x: f64, side: Side) -> usize {
    match side {
        Side::Left => sorted.partition_point(|v| nan_last(v, &x).is_lt()),
        Side::Right => sorted.partition_point(|v| nan_last(v, &x).is_le()),
    }
}

impl NDArray {
    /// Sort ascending. `None` sorts the flattened array (1-D result);
    /// `Some(axis)` sorts every lane along `axis` independently.
    pub fn sort(&self, axis: Option<usize>) -> Result<NDArray> {
        let data = self.real_data("sort")?;
        match axis {
            None => {
                let mut sorted = data.to_vec();
                sorted.sort_by(nan_last);
                Ok(NDArray::from(sorted))
            }
            Some(axis) => {
                check_axis(axis, self.ndim())?;
                let mut result = data.to_vec();
                let mut buf = Vec::new();
                for lane in axis_lanes(&self.shape, axis) {
                    buf.clear();
                    buf.extend(lane.iter().map(|&i| data[i]));
                    buf.sort_by(nan_last);
                    for (&dst, &v) in lane.iter().zip(buf.iter()) {
                        result[dst] = v;
                    }
                }
                Ok(Self::from_raw(Storage::Real(result), self.shape.clone()))
            }
        }
    }

    /// Indices that would sort the array, with the same axis convention as
    /// [`sort`](Self::sort). Ties keep their original order.
    pub fn argsort(&self, axis: Option<usize>) -> Result<NDArray> {
        let data = self.real_data("argsort")?;
        match axis {
            None => {
                let mut idx: Vec<usize> = (0..data.len()).collect();
                idx.sort_by(|&a, &b| nan_last(&data[a], &data[b]));
                Ok(NDArray::from(to_f64(idx)))
            }
            Some(axis) => {
                check_axis(axis, self.ndim())?;
                let mut result = vec![0.0; data.len()];
                let mut order: Vec<usize> = Vec::new();
                for lane in axis_lanes(&self.shape, axis) {
                    order.clear();
                    order.extend(0..lane.len());
                    order.sort_by(|&a, &b| nan_last(&data[lane[a]], &data[lane[b]]));
                    for (&dst, &k) in lane.iter().zip(order.iter()) {
                        result[dst] = k as f64;
                    }
                }
                Ok(Self::from_raw(Storage::Real(result), self.shape.clone()))
            }
        }
    }

    /// Insertion points of each of `values` into this sorted 1-D array.
    ///
    /// The result has the shape of `values`.
    pub fn searchsorted(&self, values: &NDArray, side: Side) -> Result<NDArray> {
        if self.ndim() != 1 {
            return Err(CoreError::InvalidArgument {
                reason: "searchsorted requires a 1-D sorted array",
            });
        }
        let sorted = self.real_data("searchsorted")?;
        let out = values
            .real_data("searchsorted")?
            .iter()
            .map(|&x| search(sorted, x, side) as f64)
            .collect();
        Ok(values.with_storage(Storage::Real(out)))
    }

    /// Sorted distinct values (all NaNs collapse into one trailing NaN).
    pub fn unique(&self) -> Result<NDArray> {
        self.unique_with_counts().map(|(values, _)| values)
    }

    /// Sorted distinct values together with how often each occurs.
    pub fn unique_with_counts(&self) -> Result<(NDArray, NDArray)> {
        let mut sorted = self.real_data("unique")?.to_vec();
        sorted.sort_by(nan_last);

        let mut values: Vec<f64> = Vec::new();
        let mut counts: Vec<f64> = Vec::new();
        for x in sorted {
            match values.last() {
                Some(&last) if last == x || (last.is_nan() && x.is_nan()) => {
                    if let Some(c) = counts.last_mut() {
                        *c += 1.0;
                    }
                }
                _ => {
                    values.push(x);
                    counts.push(1.0);
                }
            }
        }
        Ok((NDArray::from(values), NDArray::from(counts)))
    }

    /// Indices of nonzero elements, one 1-D index array per axis.
    ///
    /// A 0-d array is treated as shape `[1]`.
    pub fn nonzero(&self) -> Vec<NDArray> {
        let shape: Vec<usize> = if self.ndim() == 0 {
            vec![1]
        } else {
            self.shape.clone()
        };
        let mut per_axis = vec![Vec::new(); shape.len()];
        for (flat, v) in self.iter_values().enumerate() {
            if v.is_truthy() {
                for (axis, i) in unravel_index(flat, &shape).into_iter().enumerate() {
                    per_axis[axis].push(i as f64);
                }
            }
        }
        per_axis.into_iter().map(NDArray::from).collect()
    }

    /// Multi-indices of nonzero elements as an `(N, ndim)` array, in
    /// row-major order.
    pub fn argwhere(&self) -> NDArray {
        let ndim = self.ndim();
        let mut rows = Vec::new();
        let mut n = 0;
        for (flat, v) in self.iter_values().enumerate() {
            if v.is_truthy() {
                rows.extend(to_f64(unravel_index(flat, &self.shape)));
                n += 1;
            }
        }
        Self::from_raw(Storage::Real(rows), vec![n, ndim])
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_sort_1d() {
        let t = NDArray::from(vec![3.0, 1.0, 4.0, 1.0, 5.0]);
        assert_eq!(t.sort(None).unwrap().as_slice(), &[1.0, 1.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_sort_nan_last() {
        let t = NDArray::from(vec![2.0, f64::NAN, -1.0]);
        let s = t.sort(None).unwrap();
        assert_eq!(&s.as_slice()[..2], &[-1.0, 2.0]);
        assert!(s.as_slice()[2].is_nan());
    }

    #[test]
    fn test_argsort_stable() {
        let t = NDArray::from(vec![30.0, 10.0, 20.0, 10.0]);
        assert_eq!(t.argsort(None).unwrap().as_slice(), &[1.0, 3.0, 2.0, 0.0]);
    }

    #[test]
    fn test_sort_argsort_consistent() {
        let t = NDArray::from(vec![0.3, -2.0, 7.5, 0.3, 1.0]);
        let idx: Vec<usize> = t
            .argsort(None)
            .unwrap()
            .as_slice()
            .iter()
            .map(|&i| i as usize)
            .collect();
        assert_eq!(t.take(&idx).unwrap(), t.sort(None).unwrap());
    }

    #[test]
    fn test_sort_axis() {
        // [[3, 1, 2],
        //  [6, 4, 5]]
        let t = NDArray::from_vec(vec![3.0, 1.0, 2.0, 6.0, 4.0, 5.0], vec![2, 3]).unwrap();
        let s1 = t.sort(Some(1)).unwrap();
        assert_eq!(s1.as_slice(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

        let t = NDArray::from_vec(vec![4.0, 1.0, 2.0, 3.0], vec![2, 2]).unwrap();
        let s0 = t.sort(Some(0)).unwrap();
        assert_eq!(s0.as_slice(), &[2.0, 1.0, 4.0, 3.0]);
        assert!(t.sort(Some(2)).is_err());
    }

    #[test]
    fn test_argsort_axis() {
        let t = NDArray::from_vec(vec![3.0, 1.0, 2.0, 6.0, 4.0, 5.0], vec![2, 3]).unwrap();
        let a = t.argsort(Some(1)).unwrap();
        assert_eq!(a.shape(), &[2, 3]);
        assert_eq!(a.as_slice(), &[1.0, 2.0, 0.0, 1.0, 2.0, 0.0]);
    }

    #[test]
    fn test_sort_rejects_complex() {
        let z = NDArray::from(vec![1.0]).to_complex();
        assert_eq!(z.sort(None).unwrap_err().kind(), ErrorKind::Dtype);
    }

    #[test]
    fn test_searchsorted_sides() {
        let a = NDArray::from(vec![1.0, 2.0, 2.0, 3.0]);
        let v = NDArray::from(vec![2.0, 0.0, 4.0]);
        assert_eq!(a.searchsorted(&v, Side::Left).unwrap().as_slice(), &[1.0, 0.0, 4.0]);
        assert_eq!(a.searchsorted(&v, Side::Right).unwrap().as_slice(), &[3.0, 0.0, 4.0]);
    }

    #[test]
    fn test_unique_law() {
        let t = NDArray::from(vec![3.0, 1.0, 3.0, 2.0, 1.0, 3.0]);
        let (u, c) = t.unique_with_counts().unwrap();
        assert_eq!(u.as_slice(), &[1.0, 2.0, 3.0]);
        assert_eq!(c.as_slice(), &[2.0, 1.0, 3.0]);
        assert_eq!(c.sum(), t.size() as f64);
        assert!(u.as_slice().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_unique_collapses_nan() {
        let u = NDArray::from(vec![f64::NAN, 1.0, f64::NAN]).unique().unwrap();
        assert_eq!(u.size(), 2);
        assert!(u.as_slice()[1].is_nan());
    }

    #[test]
    fn test_nonzero_argwhere() {
        // [[0, 2],
        //  [3, 0]]
        let t = NDArray::from_vec(vec![0.0, 2.0, 3.0, 0.0], vec![2, 2]).unwrap();
        let nz = t.nonzero();
        assert_eq!(nz.len(), 2);
        assert_eq!(nz[0].as_slice(), &[0.0, 1.0]);
        assert_eq!(nz[1].as_slice(), &[1.0, 0.0]);

        let w = t.argwhere();
        assert_eq!(w.shape(), &[2, 2]);
        assert_eq!(w.as_slice(), &[0.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_argwhere_none() {
        let w = NDArray::zeros(vec![3]).argwhere();
        assert_eq!(w.shape(), &[0, 1]);
    }
}
