//! Slicing and gather-style indexing for [`NDArray`].

use crate::error::{CoreError, Result};

use super::NDArray;

/// A range specification for one axis when slicing an array.
///
/// Mirrors Python's `start:stop:step` slice notation.
#[derive(Debug, Clone, Copy)]
pub struct SliceRange {
    pub start: usize,
    pub stop: usize,
    pub step: usize,
}

impl SliceRange {
    /// Create a new slice range.
    pub fn new(start: usize, stop: usize, step: usize) -> Self {
        Self { start, stop, step }
    }

    /// Shorthand for `start..stop` with step 1.
    pub fn range(start: usize, stop: usize) -> Self {
        Self::new(start, stop, 1)
    }

    /// Select the full extent of an axis. Requires knowing the axis length.
    pub fn full(len: usize) -> Self {
        Self::new(0, len, 1)
    }

    /// The number of elements this range selects.
    fn len(&self) -> usize {
        if self.stop <= self.start {
            0
        } else {
            (self.stop - self.start).div_ceil(self.step)
        }
    }
}

impl NDArray {
    /// Extract a sub-array by slicing along each axis.
    ///
    /// `ranges` must have exactly `ndim` elements. Returns a new array with
    /// copied data.
    pub fn slice(&self, ranges: &[SliceRange]) -> Result<Self> {
        if ranges.len() != self.ndim() {
            return Err(CoreError::InvalidArgument {
                reason: "number of slice ranges must match array rank",
            });
        }

        for (d, r) in ranges.iter().enumerate() {
            if r.stop > self.shape[d] {
                return Err(CoreError::IndexOutOfBounds {
                    index: vec![r.stop],
                    shape: self.shape.clone(),
                });
            }
            if r.step == 0 {
                return Err(CoreError::InvalidArgument {
                    reason: "slice step must be > 0",
                });
            }
        }

        let new_shape: Vec<usize> = ranges.iter().map(SliceRange::len).collect();
        let new_numel: usize = new_shape.iter().product();

        let mut idx = Vec::with_capacity(new_numel);
        if new_numel > 0 {
            let mut index: Vec<usize> = ranges.iter().map(|r| r.start).collect();

            // Odometer over the sliced indices
            for _ in 0..new_numel {
                let flat = index
                    .iter()
                    .zip(self.strides.iter())
                    .map(|(&i, &s)| i * s)
                    .sum::<usize>();
                idx.push(flat);

                for d in (0..self.ndim()).rev() {
                    index[d] += ranges[d].step;
                    if index[d] < ranges[d].stop {
                        break;
                    }
                    index[d] = ranges[d].start;
                }
            }
        }

        Ok(Self::from_raw(self.storage.gather(&idx), new_shape))
    }

    /// Select a single index along the given axis, reducing rank by 1.
    ///
    /// For a 2-D array, `select(0, i)` returns row `i` as a 1-D array.
    pub fn select(&self, axis: usize, index: usize) -> Result<Self> {
        crate::shape::check_axis(axis, self.ndim())?;
        if index >= self.shape[axis] {
            return Err(CoreError::IndexOutOfBounds {
                index: vec![index],
                shape: self.shape.clone(),
            });
        }

        let mut ranges: Vec<SliceRange> = self.shape.iter().map(|&len| SliceRange::full(len)).collect();
        ranges[axis] = SliceRange::new(index, index + 1, 1);

        let sliced = self.slice(&ranges)?;
        let mut new_shape = sliced.shape().to_vec();
        new_shape.remove(axis);
        sliced.reshape(new_shape)
    }

    /// Gather elements by flat (row-major) index into a 1-D array.
    pub fn take(&self, indices: &[usize]) -> Result<Self> {
        if let Some(&bad) = indices.iter().find(|&&i| i >= self.size()) {
            return Err(CoreError::IndexOutOfBounds {
                index: vec![bad],
                shape: vec![self.size()],
            });
        }
        Ok(Self::from_raw(self.storage.gather(indices), vec![indices.len()]))
    }
}
