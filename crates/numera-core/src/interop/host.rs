//! The 1-based host surface.
//!
//! Everything else in the crate addresses elements and axes from 0. Hosts
//! count from 1, so this module is the one place where positions are
//! translated: incoming indices and axes are shifted down and checked,
//! outgoing index arrays are shifted up. Axis-optional reductions return a
//! 0-d array when no axis is given, so every call hands back an
//! [`NDArray`].
//!
//! ```
//! # use numera_core::array::NDArray;
//! # use numera_core::interop::host;
//! let a = NDArray::from(vec![3.0, 1.0, 2.0]);
//! assert_eq!(host::argsort(&a, None).unwrap().as_slice(), &[2.0, 3.0, 1.0]);
//! assert_eq!(host::get(&a, &[1]).unwrap(), 3.0);
//! ```

use crate::array::NDArray;
use crate::config::Side;
use crate::dtype::Value;
use crate::error::{CoreError, Result};
use crate::interop::Nested;

// ----------------------------------------------------------------------
// Index translation
// ----------------------------------------------------------------------

/// 1-based axis to 0-based, checked against `ndim`.
pub fn axis(axis: usize, ndim: usize) -> Result<usize> {
    if axis == 0 || axis > ndim {
        return Err(CoreError::AxisOutOfBounds { axis, ndim });
    }
    Ok(axis - 1)
}

fn opt_axis(ax: Option<usize>, ndim: usize) -> Result<Option<usize>> {
    ax.map(|a| axis(a, ndim)).transpose()
}

/// 1-based multi-index to 0-based. Upper bounds are left to the callee.
fn index(idx: &[usize], shape: &[usize]) -> Result<Vec<usize>> {
    if idx.contains(&0) {
        return Err(CoreError::IndexOutOfBounds {
            index: idx.to_vec(),
            shape: shape.to_vec(),
        });
    }
    Ok(idx.iter().map(|&i| i - 1).collect())
}

fn position(pos: usize, shape: &[usize]) -> Result<usize> {
    index(&[pos], shape).map(|v| v[0])
}

/// Shift an array of 0-based positions to 1-based.
fn one_based(a: &NDArray) -> NDArray {
    a.map_to_real(|v| v.re() + 1.0)
}

fn scalar_index(i: usize) -> NDArray {
    NDArray::scalar((i + 1) as f64)
}

// ----------------------------------------------------------------------
// Construction and export
// ----------------------------------------------------------------------

pub fn array(nested: &Nested) -> Result<NDArray> {
    NDArray::from_nested(nested)
}

pub fn tolist(a: &NDArray) -> Nested {
    a.tolist()
}

/// The host-visible string form, `array(d1, d2, ...)`.
pub fn repr(a: &NDArray) -> String {
    a.to_string()
}

// ----------------------------------------------------------------------
// Element access
// ----------------------------------------------------------------------

pub fn get(a: &NDArray, idx: &[usize]) -> Result<Value> {
    a.get(&index(idx, a.shape())?)
}

pub fn set(a: &mut NDArray, idx: &[usize], value: impl Into<Value>) -> Result<()> {
    let idx = index(idx, a.shape())?;
    a.set(&idx, value)
}

/// Flat gather at 1-based positions.
pub fn take(a: &NDArray, indices: &[usize]) -> Result<NDArray> {
    a.take(&index(indices, a.shape())?)
}

// ----------------------------------------------------------------------
// Reductions
// ----------------------------------------------------------------------

fn reduce<W, A>(a: &NDArray, ax: Option<usize>, whole: W, along: A) -> Result<NDArray>
where
    W: FnOnce(&NDArray) -> Result<Value>,
    A: FnOnce(&NDArray, usize) -> Result<NDArray>,
{
    match opt_axis(ax, a.ndim())? {
        None => whole(a).map(NDArray::from_value),
        Some(ax) => along(a, ax),
    }
}

fn truth(b: bool) -> Value {
    Value::Real(if b { 1.0 } else { 0.0 })
}

pub fn sum(a: &NDArray, ax: Option<usize>) -> Result<NDArray> {
    reduce(a, ax, |a| Ok(a.sum()), NDArray::sum_axis)
}

pub fn prod(a: &NDArray, ax: Option<usize>) -> Result<NDArray> {
    reduce(a, ax, |a| Ok(a.prod()), NDArray::prod_axis)
}

pub fn mean(a: &NDArray, ax: Option<usize>) -> Result<NDArray> {
    reduce(a, ax, |a| Ok(a.mean()), NDArray::mean_axis)
}

pub fn var(a: &NDArray, ax: Option<usize>) -> Result<NDArray> {
    reduce(a, ax, |a| a.var().map(Value::Real), NDArray::var_axis)
}

pub fn std(a: &NDArray, ax: Option<usize>) -> Result<NDArray> {
    reduce(a, ax, |a| a.std().map(Value::Real), NDArray::std_axis)
}

pub fn min(a: &NDArray, ax: Option<usize>) -> Result<NDArray> {
    reduce(a, ax, |a| a.min().map(Value::Real), NDArray::min_axis)
}

pub fn max(a: &NDArray, ax: Option<usize>) -> Result<NDArray> {
    reduce(a, ax, |a| a.max().map(Value::Real), NDArray::max_axis)
}

pub fn ptp(a: &NDArray, ax: Option<usize>) -> Result<NDArray> {
    reduce(a, ax, |a| a.ptp().map(Value::Real), NDArray::ptp_axis)
}

pub fn median(a: &NDArray, ax: Option<usize>) -> Result<NDArray> {
    reduce(a, ax, |a| a.median().map(Value::Real), NDArray::median_axis)
}

pub fn percentile(a: &NDArray, p: f64, ax: Option<usize>) -> Result<NDArray> {
    reduce(
        a,
        ax,
        |a| a.percentile(p).map(Value::Real),
        |a, ax| a.percentile_axis(p, ax),
    )
}

pub fn quantile(a: &NDArray, q: f64, ax: Option<usize>) -> Result<NDArray> {
    reduce(
        a,
        ax,
        |a| a.quantile(q).map(Value::Real),
        |a, ax| a.quantile_axis(q, ax),
    )
}

pub fn all(a: &NDArray, ax: Option<usize>) -> Result<NDArray> {
    reduce(a, ax, |a| Ok(truth(a.all())), NDArray::all_axis)
}

pub fn any(a: &NDArray, ax: Option<usize>) -> Result<NDArray> {
    reduce(a, ax, |a| Ok(truth(a.any())), NDArray::any_axis)
}

pub fn cumsum(a: &NDArray, ax: Option<usize>) -> Result<NDArray> {
    a.cumsum(opt_axis(ax, a.ndim())?)
}

pub fn cumprod(a: &NDArray, ax: Option<usize>) -> Result<NDArray> {
    a.cumprod(opt_axis(ax, a.ndim())?)
}

/// 1-based position of the first minimum (globally or per lane).
pub fn argmin(a: &NDArray, ax: Option<usize>) -> Result<NDArray> {
    match opt_axis(ax, a.ndim())? {
        None => a.argmin().map(scalar_index),
        Some(ax) => a.argmin_axis(ax).map(|r| one_based(&r)),
    }
}

/// 1-based position of the first maximum (globally or per lane).
pub fn argmax(a: &NDArray, ax: Option<usize>) -> Result<NDArray> {
    match opt_axis(ax, a.ndim())? {
        None => a.argmax().map(scalar_index),
        Some(ax) => a.argmax_axis(ax).map(|r| one_based(&r)),
    }
}

// ----------------------------------------------------------------------
// Sorting and searching
// ----------------------------------------------------------------------

pub fn sort(a: &NDArray, ax: Option<usize>) -> Result<NDArray> {
    a.sort(opt_axis(ax, a.ndim())?)
}

pub fn argsort(a: &NDArray, ax: Option<usize>) -> Result<NDArray> {
    let order = a.argsort(opt_axis(ax, a.ndim())?)?;
    Ok(one_based(&order))
}

/// 1-based insertion points: `1` means before the first element.
pub fn searchsorted(sorted: &NDArray, values: &NDArray, side: Side) -> Result<NDArray> {
    let pos = sorted.searchsorted(values, side)?;
    Ok(one_based(&pos))
}

pub fn nonzero(a: &NDArray) -> Vec<NDArray> {
    a.nonzero().iter().map(one_based).collect()
}

pub fn argwhere(a: &NDArray) -> NDArray {
    one_based(&a.argwhere())
}

// ----------------------------------------------------------------------
// Shape and manipulation
// ----------------------------------------------------------------------

pub fn expand_dims(a: &NDArray, ax: usize) -> Result<NDArray> {
    let ax = axis(ax, a.ndim() + 1)?;
    a.clone().expand_dims(ax)
}

pub fn squeeze(a: &NDArray, ax: Option<usize>) -> Result<NDArray> {
    match opt_axis(ax, a.ndim())? {
        None => Ok(a.clone().squeeze()),
        Some(ax) => a.clone().squeeze_axis(ax),
    }
}

/// Join along an existing axis (default: the first).
pub fn concatenate(arrays: &[&NDArray], ax: Option<usize>) -> Result<NDArray> {
    let Some(first) = arrays.first() else {
        return NDArray::concatenate(arrays, 0);
    };
    NDArray::concatenate(arrays, axis(ax.unwrap_or(1), first.ndim())?)
}

/// Join along a new axis (default: the first).
pub fn stack(arrays: &[&NDArray], ax: Option<usize>) -> Result<NDArray> {
    let ndim = arrays.first().map_or(0, |a| a.ndim());
    NDArray::stack(arrays, axis(ax.unwrap_or(1), ndim + 1)?)
}

pub fn split(a: &NDArray, n: usize, ax: Option<usize>) -> Result<Vec<NDArray>> {
    match opt_axis(ax, a.ndim())? {
        None => a.split(n),
        Some(ax) => a.split_axis(n, ax),
    }
}

pub fn repeat(a: &NDArray, n: usize, ax: Option<usize>) -> Result<NDArray> {
    a.repeat(n, opt_axis(ax, a.ndim())?)
}

pub fn flip(a: &NDArray, ax: Option<usize>) -> Result<NDArray> {
    a.flip(opt_axis(ax, a.ndim())?)
}

pub fn roll(a: &NDArray, shift: isize, ax: Option<usize>) -> Result<NDArray> {
    a.roll(shift, opt_axis(ax, a.ndim())?)
}

/// Insert `value` so that it lands at 1-based position `pos`.
pub fn insert(a: &NDArray, pos: usize, value: impl Into<Value>, ax: Option<usize>) -> Result<NDArray> {
    let ax = opt_axis(ax, a.ndim())?;
    a.insert(position(pos, a.shape())?, value, ax)
}

/// Remove the element (or row/column along `ax`) at 1-based `pos`.
pub fn delete(a: &NDArray, pos: usize, ax: Option<usize>) -> Result<NDArray> {
    let ax = opt_axis(ax, a.ndim())?;
    a.delete(position(pos, a.shape())?, ax)
}

pub fn diff(a: &NDArray, n: usize, ax: Option<usize>) -> Result<NDArray> {
    a.diff(n, opt_axis(ax, a.ndim())?)
}

pub fn gradient(a: &NDArray, spacing: f64, ax: Option<usize>) -> Result<Vec<NDArray>> {
    a.gradient(spacing, opt_axis(ax, a.ndim())?)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn matrix() -> NDArray {
        NDArray::from_vec(vec![1.0, 5.0, 3.0, 4.0, 2.0, 6.0], vec![2, 3]).unwrap()
    }

    #[test]
    fn test_axis_translation() {
        assert_eq!(axis(1, 2).unwrap(), 0);
        assert_eq!(axis(2, 2).unwrap(), 1);
        assert_eq!(axis(0, 2).unwrap_err().kind(), ErrorKind::Argument);
        assert_eq!(axis(3, 2).unwrap_err().kind(), ErrorKind::Argument);
    }

    #[test]
    fn test_join_nothing_is_argument_error() {
        let err = concatenate(&[], None).unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument { .. }));
        assert!(err.to_string().contains("at least one array"));
        let err = stack(&[], None).unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument { .. }));
    }

    #[test]
    fn test_get_set_one_based() {
        let mut a = matrix();
        assert_eq!(get(&a, &[1, 1]).unwrap(), 1.0);
        assert_eq!(get(&a, &[2, 3]).unwrap(), 6.0);
        set(&mut a, &[2, 1], 40.0).unwrap();
        assert_eq!(a.get(&[1, 0]).unwrap(), 40.0);
        assert_eq!(get(&a, &[0, 1]).unwrap_err().kind(), ErrorKind::Index);
        assert_eq!(get(&a, &[3, 1]).unwrap_err().kind(), ErrorKind::Index);
    }

    #[test]
    fn test_axis_reductions() {
        let a = matrix();
        assert_eq!(sum(&a, None).unwrap().item().unwrap(), 21.0);
        assert_eq!(sum(&a, Some(1)).unwrap().as_slice(), &[5.0, 7.0, 9.0]);
        assert_eq!(sum(&a, Some(2)).unwrap().as_slice(), &[9.0, 12.0]);
        assert_eq!(ptp(&a, Some(2)).unwrap().as_slice(), &[4.0, 4.0]);
        assert_eq!(all(&a, None).unwrap().item().unwrap(), 1.0);
        assert!(sum(&a, Some(3)).is_err());
    }

    #[test]
    fn test_argmin_argmax_one_based() {
        let a = NDArray::from(vec![3.0, 1.0, 1.0, 9.0]);
        assert_eq!(argmin(&a, None).unwrap().item().unwrap(), 2.0);
        assert_eq!(argmax(&a, None).unwrap().item().unwrap(), 4.0);
        assert_eq!(argmax(&matrix(), Some(2)).unwrap().as_slice(), &[2.0, 3.0]);
    }

    #[test]
    fn test_argsort_gathers_sort() {
        let a = NDArray::from(vec![4.0, 2.0, 5.0, 1.0]);
        let order = argsort(&a, None).unwrap();
        assert_eq!(order.as_slice(), &[4.0, 2.0, 1.0, 3.0]);
        let positions: Vec<usize> = order.as_slice().iter().map(|&p| p as usize).collect();
        assert_eq!(take(&a, &positions).unwrap(), sort(&a, None).unwrap());
    }

    #[test]
    fn test_nonzero_and_argwhere() {
        let a = NDArray::from_vec(vec![0.0, 1.0, 2.0, 0.0], vec![2, 2]).unwrap();
        let nz = nonzero(&a);
        assert_eq!(nz[0].as_slice(), &[1.0, 2.0]);
        assert_eq!(nz[1].as_slice(), &[2.0, 1.0]);
        assert_eq!(argwhere(&a).as_slice(), &[1.0, 2.0, 2.0, 1.0]);
    }

    #[test]
    fn test_searchsorted_one_based() {
        let sorted = NDArray::from(vec![1.0, 2.0, 2.0, 3.0]);
        let v = NDArray::from(vec![0.0, 2.0]);
        assert_eq!(searchsorted(&sorted, &v, Side::Left).unwrap().as_slice(), &[1.0, 2.0]);
        assert_eq!(searchsorted(&sorted, &v, Side::Right).unwrap().as_slice(), &[1.0, 4.0]);
    }

    #[test]
    fn test_insert_delete_positions() {
        let a = NDArray::from(vec![1.0, 2.0, 3.0]);
        assert_eq!(insert(&a, 1, 0.0, None).unwrap().as_slice(), &[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(insert(&a, 4, 9.0, None).unwrap().as_slice(), &[1.0, 2.0, 3.0, 9.0]);
        assert_eq!(delete(&a, 2, None).unwrap().as_slice(), &[1.0, 3.0]);
        assert!(delete(&a, 0, None).is_err());
        let m = matrix();
        assert_eq!(delete(&m, 1, Some(1)).unwrap().shape(), &[1, 3]);
        assert_eq!(delete(&m, 3, Some(2)).unwrap().as_slice(), &[1.0, 5.0, 4.0, 2.0]);
    }

    #[test]
    fn test_concatenate_default_axis() {
        let a = NDArray::ones(vec![1, 2]);
        let b = NDArray::zeros(vec![2, 2]);
        assert_eq!(concatenate(&[&a, &b], None).unwrap().shape(), &[3, 2]);
        assert_eq!(concatenate(&[&a, &a], Some(2)).unwrap().shape(), &[1, 4]);
        assert_eq!(stack(&[&a, &a], None).unwrap().shape(), &[2, 1, 2]);
    }

    #[test]
    fn test_expand_dims_axis() {
        let a = NDArray::from(vec![1.0, 2.0]);
        assert_eq!(expand_dims(&a, 1).unwrap().shape(), &[1, 2]);
        assert_eq!(expand_dims(&a, 2).unwrap().shape(), &[2, 1]);
        assert!(expand_dims(&a, 3).is_err());
    }

    #[test]
    fn test_repr() {
        assert_eq!(repr(&NDArray::zeros(vec![3, 3])), "array(3, 3)");
    }
}
