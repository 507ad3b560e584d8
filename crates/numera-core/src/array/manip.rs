//! Structural manipulation: joining, splitting, tiling, reordering, padding,
//! and element insertion/removal.
//!
//! Most operations here are expressed as an index map from each output
//! position back to a source position, then materialised with one gather.

use crate::config::PadMode;
use crate::dtype::{DType, Value};
use crate::error::{CoreError, Result};
use crate::shape::{check_axis, numel, unravel_index};
use crate::storage::Storage;

use super::{NDArray, SliceRange};

impl NDArray {
    /// Flat offset of a multi-index (caller guarantees bounds).
    #[inline]
    fn offset_of(&self, index: &[usize]) -> usize {
        index.iter().zip(self.strides.iter()).map(|(&i, &s)| i * s).sum()
    }

    /// Build an array of `out_shape` by mapping every output multi-index to
    /// a source multi-index. `src` writes into its second argument and
    /// returns `false` for positions that take `fill` instead.
    fn remap<F>(&self, out_shape: Vec<usize>, fill: Value, mut src: F) -> NDArray
    where
        F: FnMut(&[usize], &mut [usize]) -> bool,
    {
        let mut from = vec![0usize; self.ndim()];
        let idx: Vec<Option<usize>> = (0..numel(&out_shape))
            .map(|flat| {
                let out = unravel_index(flat, &out_shape);
                src(&out, &mut from).then(|| self.offset_of(&from))
            })
            .collect();
        let storage = if idx.iter().all(Option::is_some) {
            let idx: Vec<usize> = idx.into_iter().flatten().collect();
            self.storage.gather(&idx)
        } else {
            self.storage.gather_or(&idx, fill)
        };
        Self::from_raw(storage, out_shape)
    }

    // ------------------------------------------------------------------
    // Joining
    // ------------------------------------------------------------------

    /// Join arrays along an existing axis.
    ///
    /// All arrays must have the same rank and identical extents on every
    /// other axis. Mixed dtypes promote to complex.
    pub fn concatenate(arrays: &[&NDArray], axis: usize) -> Result<NDArray> {
        let Some(first) = arrays.first() else {
            return Err(CoreError::InvalidArgument {
                reason: "need at least one array to concatenate",
            });
        };
        let ndim = first.ndim();
        check_axis(axis, ndim)?;

        for t in &arrays[1..] {
            let same_rank = t.ndim() == ndim;
            let same_extents = same_rank
                && first
                    .shape
                    .iter()
                    .zip(t.shape.iter())
                    .enumerate()
                    .all(|(d, (&a, &b))| d == axis || a == b);
            if !same_extents {
                return Err(CoreError::ShapeMismatch {
                    expected: first.shape.clone(),
                    got: t.shape.clone(),
                });
            }
        }

        let mut new_shape = first.shape.clone();
        new_shape[axis] = arrays.iter().map(|t| t.shape[axis]).sum();
        let outer = numel(&new_shape[..axis]);
        let inner = numel(&new_shape[axis + 1..]);
        let total = numel(&new_shape);

        let complex = DType::promote_all(arrays.iter().map(|t| t.dtype())) == DType::Complex128;
        let mut re = Vec::with_capacity(total);
        let mut im = Vec::with_capacity(if complex { total } else { 0 });

        for o in 0..outer {
            for t in arrays {
                let len = t.shape[axis] * inner;
                let range = o * len..(o + 1) * len;
                re.extend_from_slice(&t.as_slice()[range.clone()]);
                if complex {
                    match t.imag_slice() {
                        Some(i) => im.extend_from_slice(&i[range]),
                        None => im.resize(im.len() + len, 0.0),
                    }
                }
            }
        }

        let storage = if complex {
            Storage::Complex { re, im }
        } else {
            Storage::Real(re)
        };
        Ok(Self::from_raw(storage, new_shape))
    }

    /// Join equally shaped arrays along a new axis inserted at `axis`.
    pub fn stack(arrays: &[&NDArray], axis: usize) -> Result<NDArray> {
        let Some(first) = arrays.first() else {
            return Err(CoreError::InvalidArgument {
                reason: "need at least one array to stack",
            });
        };
        if let Some(t) = arrays.iter().find(|t| t.shape != first.shape) {
            return Err(CoreError::ShapeMismatch {
                expected: first.shape.clone(),
                got: t.shape.clone(),
            });
        }
        let expanded = arrays
            .iter()
            .map(|t| (*t).clone().expand_dims(axis))
            .collect::<Result<Vec<_>>>()?;
        let refs: Vec<&NDArray> = expanded.iter().collect();
        Self::concatenate(&refs, axis)
    }

    /// Stack row-wise: 1-D inputs become rows, others join on axis 0.
    pub fn vstack(arrays: &[&NDArray]) -> Result<NDArray> {
        let rows = arrays
            .iter()
            .map(|t| match t.ndim() {
                0 | 1 => t.reshaped(vec![1, t.size()]),
                _ => Ok((*t).clone()),
            })
            .collect::<Result<Vec<_>>>()?;
        let refs: Vec<&NDArray> = rows.iter().collect();
        Self::concatenate(&refs, 0)
    }

    /// Stack column-wise: 1-D inputs join end to end, others on axis 1.
    pub fn hstack(arrays: &[&NDArray]) -> Result<NDArray> {
        let flat = arrays
            .iter()
            .map(|t| match t.ndim() {
                0 => t.reshaped(vec![1]),
                _ => Ok((*t).clone()),
            })
            .collect::<Result<Vec<_>>>()?;
        let refs: Vec<&NDArray> = flat.iter().collect();
        let axis = if refs.first().is_some_and(|t| t.ndim() == 1) { 0 } else { 1 };
        Self::concatenate(&refs, axis)
    }

    // ------------------------------------------------------------------
    // Splitting
    // ------------------------------------------------------------------

    /// Split the flattened array into `n` equal contiguous chunks.
    pub fn split(&self, n: usize) -> Result<Vec<NDArray>> {
        self.flattened().split_axis(n, 0)
    }

    /// Split along `axis` into `n` equal parts.
    pub fn split_axis(&self, n: usize, axis: usize) -> Result<Vec<NDArray>> {
        check_axis(axis, self.ndim())?;
        let len = self.shape[axis];
        if n == 0 || len % n != 0 {
            return Err(CoreError::InvalidArgument {
                reason: "array split does not result in an equal division",
            });
        }
        let chunk = len / n;
        let mut ranges: Vec<SliceRange> = self.shape.iter().map(|&d| SliceRange::full(d)).collect();
        (0..n)
            .map(|k| {
                ranges[axis] = SliceRange::range(k * chunk, (k + 1) * chunk);
                self.slice(&ranges)
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Replication
    // ------------------------------------------------------------------

    /// Repeat the whole array `reps[d]` times along each axis.
    ///
    /// When `reps` and the array differ in rank, the shorter one is padded
    /// with leading 1s.
    pub fn tile(&self, reps: &[usize]) -> NDArray {
        let ndim = self.ndim().max(reps.len());
        let mut shape = vec![1usize; ndim - self.ndim()];
        shape.extend_from_slice(&self.shape);
        let mut full_reps = vec![1usize; ndim - reps.len()];
        full_reps.extend_from_slice(reps);

        let base = Self::from_raw(self.storage.clone(), shape.clone());
        let out_shape: Vec<usize> = shape.iter().zip(&full_reps).map(|(&d, &r)| d * r).collect();
        base.remap(out_shape, Value::Real(0.0), |out, from| {
            for (d, slot) in from.iter_mut().enumerate() {
                *slot = out[d] % shape[d];
            }
            true
        })
    }

    /// Repeat each element `n` times in place. `None` flattens first.
    pub fn repeat(&self, n: usize, axis: Option<usize>) -> Result<NDArray> {
        let (base, axis) = match axis {
            None => (self.flattened(), 0),
            Some(a) => (self.clone(), check_axis(a, self.ndim())?),
        };
        let mut out_shape = base.shape.clone();
        out_shape[axis] *= n;
        Ok(base.remap(out_shape, Value::Real(0.0), |out, from| {
            from.copy_from_slice(out);
            from[axis] = out[axis] / n;
            true
        }))
    }

    // ------------------------------------------------------------------
    // Reordering
    // ------------------------------------------------------------------

    /// Reverse element order along `axis`, or along every axis for `None`.
    pub fn flip(&self, axis: Option<usize>) -> Result<NDArray> {
        if let Some(a) = axis {
            check_axis(a, self.ndim())?;
        }
        let shape = self.shape.clone();
        Ok(self.remap(shape.clone(), Value::Real(0.0), |out, from| {
            for (d, slot) in from.iter_mut().enumerate() {
                *slot = if axis.map_or(true, |a| a == d) {
                    shape[d] - 1 - out[d]
                } else {
                    out[d]
                };
            }
            true
        }))
    }

    /// Circularly shift elements by `shift` (positive moves toward higher
    /// indices). `None` rolls the flattened order and keeps the shape.
    pub fn roll(&self, shift: isize, axis: Option<usize>) -> Result<NDArray> {
        match axis {
            None => {
                let rolled = self.flattened().roll(shift, Some(0))?;
                rolled.reshape(self.shape.clone())
            }
            Some(axis) => {
                check_axis(axis, self.ndim())?;
                let len = self.shape[axis] as isize;
                let shape = self.shape.clone();
                Ok(self.remap(shape, Value::Real(0.0), |out, from| {
                    from.copy_from_slice(out);
                    from[axis] = (out[axis] as isize - shift).rem_euclid(len) as usize;
                    true
                }))
            }
        }
    }

    // ------------------------------------------------------------------
    // Padding
    // ------------------------------------------------------------------

    /// Pad every axis by `width` on both ends.
    pub fn pad(&self, width: usize, mode: PadMode, value: impl Into<Value>) -> Result<NDArray> {
        let widths = vec![(width, width); self.ndim()];
        self.pad_width(&widths, mode, value)
    }

    /// Pad each axis by its own `(before, after)` widths.
    ///
    /// `value` is only used by [`PadMode::Constant`].
    pub fn pad_width(
        &self,
        widths: &[(usize, usize)],
        mode: PadMode,
        value: impl Into<Value>,
    ) -> Result<NDArray> {
        if widths.len() != self.ndim() {
            return Err(CoreError::InvalidArgument {
                reason: "pad widths must give one (before, after) pair per axis",
            });
        }
        if mode != PadMode::Constant && self.is_empty() {
            return Err(CoreError::InvalidArgument {
                reason: "cannot extend an empty axis with a non-constant pad mode",
            });
        }
        let out_shape: Vec<usize> = self
            .shape
            .iter()
            .zip(widths)
            .map(|(&d, &(b, a))| b + d + a)
            .collect();
        let shape = self.shape.clone();
        Ok(self.remap(out_shape, value.into(), |out, from| {
            for (d, slot) in from.iter_mut().enumerate() {
                let p = out[d] as isize - widths[d].0 as isize;
                match pad_source(p, shape[d], mode) {
                    Some(i) => *slot = i,
                    None => return false,
                }
            }
            true
        }))
    }

    // ------------------------------------------------------------------
    // Insertion / deletion
    // ------------------------------------------------------------------

    /// Insert `value` before position `pos`. With an axis, a whole
    /// hyperplane filled with `value` is inserted; `None` flattens first.
    pub fn insert(&self, pos: usize, value: impl Into<Value>, axis: Option<usize>) -> Result<NDArray> {
        let (base, axis) = match axis {
            None => (self.flattened(), 0),
            Some(a) => (self.clone(), check_axis(a, self.ndim())?),
        };
        if pos > base.shape[axis] {
            return Err(CoreError::IndexOutOfBounds {
                index: vec![pos],
                shape: base.shape.clone(),
            });
        }
        let mut out_shape = base.shape.clone();
        out_shape[axis] += 1;
        Ok(base.remap(out_shape, value.into(), |out, from| {
            if out[axis] == pos {
                return false;
            }
            from.copy_from_slice(out);
            if out[axis] > pos {
                from[axis] -= 1;
            }
            true
        }))
    }

    /// Remove position `pos` along `axis`; `None` flattens first.
    pub fn delete(&self, pos: usize, axis: Option<usize>) -> Result<NDArray> {
        let (base, axis) = match axis {
            None => (self.flattened(), 0),
            Some(a) => (self.clone(), check_axis(a, self.ndim())?),
        };
        if pos >= base.shape[axis] {
            return Err(CoreError::IndexOutOfBounds {
                index: vec![pos],
                shape: base.shape.clone(),
            });
        }
        let mut out_shape = base.shape.clone();
        out_shape[axis] -= 1;
        Ok(base.remap(out_shape, Value::Real(0.0), |out, from| {
            from.copy_from_slice(out);
            if out[axis] >= pos {
                from[axis] += 1;
            }
            true
        }))
    }

    // ------------------------------------------------------------------
    // Differences
    // ------------------------------------------------------------------

    /// `n`-th discrete difference along `axis` (default: last axis).
    pub fn diff(&self, n: usize, axis: Option<usize>) -> Result<NDArray> {
        if self.ndim() == 0 {
            return Err(CoreError::InvalidArgument {
                reason: "diff requires at least one dimension",
            });
        }
        let axis = check_axis(axis.unwrap_or(self.ndim() - 1), self.ndim())?;
        let mut cur = self.clone();
        for _ in 0..n {
            let len = cur.shape[axis];
            if len == 0 {
                break;
            }
            let mut hi: Vec<SliceRange> = cur.shape.iter().map(|&d| SliceRange::full(d)).collect();
            let mut lo = hi.clone();
            hi[axis] = SliceRange::range(1, len);
            lo[axis] = SliceRange::range(0, len - 1);
            cur = cur.slice(&hi)?.sub(&cur.slice(&lo)?)?;
        }
        Ok(cur)
    }
}

/// Source index along one axis of length `len` for padded position `p`
/// (negative `p` lies in the leading pad).
fn pad_source(p: isize, len: usize, mode: PadMode) -> Option<usize> {
    let n = len as isize;
    if (0..n).contains(&p) {
        return Some(p as usize);
    }
    let i = match mode {
        PadMode::Constant => return None,
        PadMode::Edge => p.clamp(0, n - 1),
        PadMode::Wrap => p.rem_euclid(n),
        PadMode::Reflect => {
            if n == 1 {
                0
            } else {
                let period = 2 * (n - 1);
                let m = p.rem_euclid(period);
                if m >= n {
                    period - m
                } else {
                    m
                }
            }
        }
        PadMode::Symmetric => {
            let m = p.rem_euclid(2 * n);
            if m >= n {
                2 * n - 1 - m
            } else {
                m
            }
        }
    };
    Some(i as usize)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use num_complex::Complex64;

    fn v(data: &[f64]) -> NDArray {
        NDArray::from(data.to_vec())
    }

    fn m23() -> NDArray {
        NDArray::arange(1.0, 7.0, 1.0).unwrap().reshape(vec![2, 3]).unwrap()
    }

    #[test]
    fn test_concatenate_axis0_axis1() {
        let a = m23();
        let b = NDArray::from_vec(vec![7.0, 8.0, 9.0], vec![1, 3]).unwrap();
        let c = NDArray::concatenate(&[&a, &b], 0).unwrap();
        assert_eq!(c.shape(), &[3, 3]);
        assert_eq!(c.as_slice()[6..], [7.0, 8.0, 9.0]);

        let d = NDArray::from_vec(vec![0.0, 0.0], vec![2, 1]).unwrap();
        let e = NDArray::concatenate(&[&a, &d], 1).unwrap();
        assert_eq!(e.shape(), &[2, 4]);
        assert_eq!(e.as_slice(), &[1.0, 2.0, 3.0, 0.0, 4.0, 5.0, 6.0, 0.0]);
    }

    #[test]
    fn test_concatenate_mismatch() {
        let a = m23();
        let b = NDArray::zeros(vec![2, 2]);
        let err = NDArray::concatenate(&[&a, &b], 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);
        assert!(NDArray::concatenate(&[], 0).is_err());
    }

    #[test]
    fn test_concatenate_promotes() {
        let a = v(&[1.0]);
        let b = NDArray::from_complex(vec![Complex64::new(0.0, 1.0)], vec![1]).unwrap();
        let c = NDArray::concatenate(&[&a, &b], 0).unwrap();
        assert!(c.is_complex());
        assert_eq!(c.imag().as_slice(), &[0.0, 1.0]);
    }

    #[test]
    fn test_stack_vstack_hstack() {
        let a = v(&[1.0, 2.0]);
        let b = v(&[3.0, 4.0]);
        let s = NDArray::stack(&[&a, &b], 0).unwrap();
        assert_eq!(s.shape(), &[2, 2]);
        let s1 = NDArray::stack(&[&a, &b], 1).unwrap();
        assert_eq!(s1.as_slice(), &[1.0, 3.0, 2.0, 4.0]);
        assert_eq!(NDArray::vstack(&[&a, &b]).unwrap(), s);
        let h = NDArray::hstack(&[&a, &b]).unwrap();
        assert_eq!(h.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
        assert!(NDArray::stack(&[&a, &v(&[1.0])], 0).is_err());
    }

    #[test]
    fn test_split() {
        let parts = NDArray::arange(0.0, 6.0, 1.0).unwrap().split(3).unwrap();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[1].as_slice(), &[2.0, 3.0]);
        assert!(v(&[1.0, 2.0, 3.0]).split(2).is_err());
    }

    #[test]
    fn test_split_axis() {
        let parts = m23().split_axis(3, 1).unwrap();
        assert_eq!(parts[2].shape(), &[2, 1]);
        assert_eq!(parts[2].as_slice(), &[3.0, 6.0]);
    }

    #[test]
    fn test_tile_and_repeat() {
        let a = v(&[1.0, 2.0]);
        assert_eq!(a.tile(&[3]).as_slice(), &[1.0, 2.0, 1.0, 2.0, 1.0, 2.0]);
        let t = a.tile(&[2, 2]);
        assert_eq!(t.shape(), &[2, 4]);
        assert_eq!(a.repeat(2, None).unwrap().as_slice(), &[1.0, 1.0, 2.0, 2.0]);
        let r = m23().repeat(2, Some(0)).unwrap();
        assert_eq!(r.shape(), &[4, 3]);
        assert_eq!(r.select(1, 0).unwrap().as_slice(), &[1.0, 1.0, 4.0, 4.0]);
    }

    #[test]
    fn test_flip() {
        let t = m23();
        assert_eq!(t.flip(Some(1)).unwrap().as_slice(), &[3.0, 2.0, 1.0, 6.0, 5.0, 4.0]);
        assert_eq!(t.flip(Some(0)).unwrap().as_slice(), &[4.0, 5.0, 6.0, 1.0, 2.0, 3.0]);
        assert_eq!(t.flip(None).unwrap().as_slice(), &[6.0, 5.0, 4.0, 3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_roll() {
        let a = v(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(a.roll(1, None).unwrap().as_slice(), &[4.0, 1.0, 2.0, 3.0]);
        assert_eq!(a.roll(-1, None).unwrap().as_slice(), &[2.0, 3.0, 4.0, 1.0]);
        assert_eq!(a.roll(5, None).unwrap().as_slice(), &[4.0, 1.0, 2.0, 3.0]);
        let r = m23().roll(1, Some(1)).unwrap();
        assert_eq!(r.as_slice(), &[3.0, 1.0, 2.0, 6.0, 4.0, 5.0]);
    }

    #[test]
    fn test_pad_modes_1d() {
        let a = v(&[1.0, 2.0, 3.0]);
        assert_eq!(
            a.pad(2, PadMode::Constant, 0.0).unwrap().as_slice(),
            &[0.0, 0.0, 1.0, 2.0, 3.0, 0.0, 0.0]
        );
        assert_eq!(
            a.pad(2, PadMode::Edge, 0.0).unwrap().as_slice(),
            &[1.0, 1.0, 1.0, 2.0, 3.0, 3.0, 3.0]
        );
        assert_eq!(
            a.pad(2, PadMode::Reflect, 0.0).unwrap().as_slice(),
            &[3.0, 2.0, 1.0, 2.0, 3.0, 2.0, 1.0]
        );
        assert_eq!(
            a.pad(2, PadMode::Symmetric, 0.0).unwrap().as_slice(),
            &[2.0, 1.0, 1.0, 2.0, 3.0, 3.0, 2.0]
        );
        assert_eq!(
            a.pad(2, PadMode::Wrap, 0.0).unwrap().as_slice(),
            &[2.0, 3.0, 1.0, 2.0, 3.0, 1.0, 2.0]
        );
    }

    #[test]
    fn test_pad_2d() {
        let a = NDArray::from_vec(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2]).unwrap();
        let p = a.pad(1, PadMode::Constant, 9.0).unwrap();
        assert_eq!(p.shape(), &[4, 4]);
        assert_eq!(p.get(&[0, 0]).unwrap(), 9.0);
        assert_eq!(p.get(&[1, 1]).unwrap(), 1.0);
        assert_eq!(p.get(&[2, 2]).unwrap(), 4.0);
        let e = a.pad(1, PadMode::Edge, 0.0).unwrap();
        assert_eq!(e.get(&[0, 0]).unwrap(), 1.0);
        assert_eq!(e.get(&[3, 3]).unwrap(), 4.0);
    }

    #[test]
    fn test_insert_delete() {
        let a = v(&[1.0, 2.0, 3.0]);
        assert_eq!(a.insert(1, 9.0, None).unwrap().as_slice(), &[1.0, 9.0, 2.0, 3.0]);
        assert_eq!(a.insert(3, 9.0, None).unwrap().as_slice(), &[1.0, 2.0, 3.0, 9.0]);
        assert!(a.insert(4, 9.0, None).is_err());
        assert_eq!(a.delete(0, None).unwrap().as_slice(), &[2.0, 3.0]);
        assert_eq!(a.delete(3, None).unwrap_err().kind(), ErrorKind::Index);

        let m = m23();
        let row = m.insert(1, 0.0, Some(0)).unwrap();
        assert_eq!(row.shape(), &[3, 3]);
        assert_eq!(row.select(0, 1).unwrap().as_slice(), &[0.0, 0.0, 0.0]);
        let col = m.delete(1, Some(1)).unwrap();
        assert_eq!(col.as_slice(), &[1.0, 3.0, 4.0, 6.0]);
    }

    #[test]
    fn test_diff() {
        let a = v(&[1.0, 2.0, 4.0, 7.0, 0.0]);
        assert_eq!(a.diff(1, None).unwrap().as_slice(), &[1.0, 2.0, 3.0, -7.0]);
        assert_eq!(a.diff(2, None).unwrap().as_slice(), &[1.0, 1.0, -10.0]);
        let m = NDArray::from_vec(vec![1.0, 3.0, 6.0, 10.0], vec![2, 2]).unwrap();
        assert_eq!(m.diff(1, None).unwrap().as_slice(), &[2.0, 4.0]);
        assert_eq!(m.diff(1, Some(0)).unwrap().as_slice(), &[5.0, 7.0]);
        assert_eq!(a.diff(0, None).unwrap(), a);
    }
}
