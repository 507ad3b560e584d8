//! Shape arithmetic: strides, broadcasting, and axis bookkeeping.
//!
//! Everything here is 0-based. One-based host indices are translated in
//! [`crate::interop`] before they reach this module.

use crate::error::{CoreError, Result};

/// Number of elements described by `shape` (1 for the empty shape).
#[inline]
pub fn numel(shape: &[usize]) -> usize {
    shape.iter().product()
}

/// Compute row-major (C-order) strides from a shape.
pub fn compute_strides(shape: &[usize]) -> Vec<usize> {
    let ndim = shape.len();
    if ndim == 0 {
        return vec![];
    }
    let mut strides = vec![1usize; ndim];
    for i in (0..ndim - 1).rev() {
        strides[i] = strides[i + 1] * shape[i + 1];
    }
    strides
}

/// Broadcast two shapes together.
///
/// Shapes are right-aligned; the shorter one is padded with leading 1s.
/// Each aligned pair must be equal or contain a 1.
///
/// ```
/// # use numera_core::shape::broadcast_shapes;
/// assert_eq!(broadcast_shapes(&[3, 1], &[3]).unwrap(), vec![3, 3]);
/// assert!(broadcast_shapes(&[2, 3], &[4]).is_err());
/// ```
pub fn broadcast_shapes(a: &[usize], b: &[usize]) -> Result<Vec<usize>> {
    let ndim = a.len().max(b.len());
    let mut out = vec![0usize; ndim];
    for i in 0..ndim {
        let da = dim_from_right(a, ndim, i);
        let db = dim_from_right(b, ndim, i);
        out[i] = if da == db {
            da
        } else if da == 1 {
            db
        } else if db == 1 {
            da
        } else {
            return Err(CoreError::BroadcastError {
                shape_a: a.to_vec(),
                shape_b: b.to_vec(),
            });
        };
    }
    Ok(out)
}

/// Broadcast any number of shapes together.
pub fn broadcast_all(shapes: &[&[usize]]) -> Result<Vec<usize>> {
    let mut out: Vec<usize> = Vec::new();
    for s in shapes {
        out = broadcast_shapes(&out, s)?;
    }
    Ok(out)
}

#[inline]
fn dim_from_right(shape: &[usize], ndim: usize, i: usize) -> usize {
    let pad = ndim - shape.len();
    if i < pad {
        1
    } else {
        shape[i - pad]
    }
}

/// For every position of `out_shape` (row-major), the flat index of the
/// element of an array of shape `src` that broadcasts onto it.
///
/// `src` must already be known to broadcast to `out_shape`.
pub fn broadcast_indices(src: &[usize], out_shape: &[usize]) -> Vec<usize> {
    let total = numel(out_shape);
    if src == out_shape {
        return (0..total).collect();
    }
    let ndim = out_shape.len();
    let src_strides = compute_strides(src);
    // Stride 0 along broadcast (size-1 or missing) dimensions.
    let strides: Vec<usize> = (0..ndim)
        .map(|i| {
            let pad = ndim - src.len();
            if i < pad || src[i - pad] == 1 {
                0
            } else {
                src_strides[i - pad]
            }
        })
        .collect();

    let mut out = Vec::with_capacity(total);
    let mut index = vec![0usize; ndim];
    let mut flat = 0usize;
    for _ in 0..total {
        out.push(flat);
        // Advance the odometer
        for d in (0..ndim).rev() {
            index[d] += 1;
            flat += strides[d];
            if index[d] < out_shape[d] {
                break;
            }
            flat -= strides[d] * index[d];
            index[d] = 0;
        }
    }
    out
}

/// Validate a 0-based axis against `ndim`.
#[inline]
pub fn check_axis(axis: usize, ndim: usize) -> Result<usize> {
    if axis >= ndim {
        return Err(CoreError::AxisOutOfBounds { axis, ndim });
    }
    Ok(axis)
}

/// Split `shape` around `axis` into `(outer, axis_len, inner)` extents.
#[inline]
pub fn split_at_axis(shape: &[usize], axis: usize) -> (usize, usize, usize) {
    let outer = numel(&shape[..axis]);
    let inner = numel(&shape[axis + 1..]);
    (outer, shape[axis], inner)
}

/// `shape` with `axis` removed.
pub fn reduced_shape(shape: &[usize], axis: usize) -> Vec<usize> {
    let mut out = shape.to_vec();
    out.remove(axis);
    out
}

/// Flat indices of every 1-D lane running along `axis`.
///
/// Lanes come out in row-major order of the remaining axes, so collecting
/// one value per lane yields data laid out for [`reduced_shape`].
pub fn axis_lanes(shape: &[usize], axis: usize) -> impl Iterator<Item = Vec<usize>> {
    let (outer, len, inner) = split_at_axis(shape, axis);
    (0..outer).flat_map(move |o| {
        (0..inner).map(move |i| {
            let base = o * len * inner + i;
            (0..len).map(|k| base + k * inner).collect()
        })
    })
}

/// Convert a flat row-major offset to a multi-index.
pub fn unravel_index(mut flat: usize, shape: &[usize]) -> Vec<usize> {
    let mut index = vec![0usize; shape.len()];
    for d in (0..shape.len()).rev() {
        if shape[d] > 0 {
            index[d] = flat % shape[d];
            flat /= shape[d];
        }
    }
    index
}

/// Resolve a shape containing at most one `-1` against a known element count.
pub fn infer_shape(spec: &[isize], total: usize) -> Result<Vec<usize>> {
    let mut unknown = None;
    let mut known = 1usize;
    for (i, &d) in spec.iter().enumerate() {
        if d == -1 {
            if unknown.is_some() {
                return Err(CoreError::InvalidArgument {
                    reason: "can only infer one dimension in reshape",
                });
            }
            unknown = Some(i);
        } else if d < 0 {
            return Err(CoreError::InvalidArgument {
                reason: "negative dimension in reshape",
            });
        } else {
            known *= d as usize;
        }
    }
    let mut shape: Vec<usize> = spec.iter().map(|&d| d.max(0) as usize).collect();
    if let Some(i) = unknown {
        if known == 0 || total % known != 0 {
            return Err(CoreError::InvalidShape {
                shape: shape.clone(),
                reason: "cannot infer dimension for requested size",
            });
        }
        shape[i] = total / known;
    }
    Ok(shape)
}
