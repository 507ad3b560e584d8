//! One-dimensional signal primitives: convolution, correlation, finite
//! difference gradients, and piecewise-linear interpolation.

use num_complex::Complex64;

use crate::array::NDArray;
use crate::config::ConvolveMode;
use crate::dtype::{DType, Element};
use crate::error::{CoreError, Result};
use crate::shape::{axis_lanes, check_axis};
use crate::storage::Storage;

/// Full discrete convolution, length `n + m - 1`.
fn convolve_full<T: Element>(a: &[T], v: &[T]) -> Vec<T> {
    let mut out = vec![T::zero(); a.len() + v.len() - 1];
    for (i, &ai) in a.iter().enumerate() {
        for (j, &vj) in v.iter().enumerate() {
            out[i + j] += ai * vj;
        }
    }
    out
}

/// The window of the full result kept by `mode`.
fn mode_window(n: usize, m: usize, mode: ConvolveMode) -> core::ops::Range<usize> {
    let (long, short) = (n.max(m), n.min(m));
    match mode {
        ConvolveMode::Full => 0..n + m - 1,
        ConvolveMode::Valid => short - 1..long,
        ConvolveMode::Same => {
            let start = (short - 1) / 2;
            start..start + long
        }
    }
}

fn check_signal(t: &NDArray, name: &'static str) -> Result<()> {
    if t.ndim() != 1 {
        return Err(CoreError::InvalidArgument {
            reason: "convolve and correlate expect 1-D arrays",
        });
    }
    if t.is_empty() {
        return Err(CoreError::InvalidArgument { reason: name });
    }
    Ok(())
}

/// Discrete linear convolution of two 1-D arrays.
///
/// ```
/// # use numera_core::array::NDArray;
/// # use numera_core::config::ConvolveMode;
/// # use numera_core::signal::convolve;
/// let a = NDArray::from(vec![1.0, 2.0, 3.0]);
/// let v = NDArray::from(vec![0.0, 1.0, 0.5]);
/// let c = convolve(&a, &v, ConvolveMode::Full).unwrap();
/// assert_eq!(c.as_slice(), &[0.0, 1.0, 2.5, 4.0, 1.5]);
/// ```
pub fn convolve(a: &NDArray, v: &NDArray, mode: ConvolveMode) -> Result<NDArray> {
    check_signal(a, "convolve requires non-empty inputs")?;
    check_signal(v, "convolve requires non-empty inputs")?;
    log::debug!("convolve: {} x {} ({mode:?})", a.size(), v.size());
    let window = mode_window(a.size(), v.size(), mode);
    let storage = match a.dtype().promote(v.dtype()) {
        DType::Real64 => Storage::Real(convolve_full(a.as_slice(), v.as_slice())[window].to_vec()),
        DType::Complex128 => {
            let full = convolve_full(&a.storage().to_complex_vec(), &v.storage().to_complex_vec());
            Storage::from_complex(full[window].to_vec())
        }
    };
    let n = storage.len();
    NDArray::from_storage(storage, vec![n])
}

/// Cross-correlation: `convolve(a, reversed(conj(v)))`.
pub fn correlate(a: &NDArray, v: &NDArray, mode: ConvolveMode) -> Result<NDArray> {
    check_signal(v, "correlate requires non-empty inputs")?;
    let reversed = v.conj().flip(None)?;
    convolve(a, &reversed, mode)
}

/// Gradient of one lane with uniform spacing `h`.
fn gradient_lane<T: Element>(f: &[T], h: T, out: &mut [T]) {
    let n = f.len();
    let two = T::from_real(2.0);
    out[0] = (f[1] - f[0]) / h;
    out[n - 1] = (f[n - 1] - f[n - 2]) / h;
    for i in 1..n - 1 {
        out[i] = (f[i + 1] - f[i - 1]) / (two * h);
    }
}

fn gradient_along<T: Element>(data: &[T], shape: &[usize], axis: usize, h: f64) -> Vec<T> {
    let mut out = vec![T::zero(); data.len()];
    let mut lane_in = Vec::new();
    let mut lane_out = Vec::new();
    for lane in axis_lanes(shape, axis) {
        lane_in.clear();
        lane_in.extend(lane.iter().map(|&i| data[i]));
        lane_out.clear();
        lane_out.resize(lane.len(), T::zero());
        gradient_lane(&lane_in, T::from_real(h), &mut lane_out);
        for (&dst, &g) in lane.iter().zip(lane_out.iter()) {
            out[dst] = g;
        }
    }
    out
}

impl NDArray {
    /// Numerical gradient with uniform `spacing`.
    ///
    /// Interior points use central differences; the two boundary points use
    /// one-sided differences. With `axis = None` one gradient per axis is
    /// returned (a single array for 1-D input). Every differentiated axis
    /// needs at least two elements.
    pub fn gradient(&self, spacing: f64, axis: Option<usize>) -> Result<Vec<NDArray>> {
        let axes: Vec<usize> = match axis {
            Some(a) => vec![check_axis(a, self.ndim())?],
            None => (0..self.ndim()).collect(),
        };
        if axes.is_empty() {
            return Err(CoreError::InvalidArgument {
                reason: "gradient requires at least one dimension",
            });
        }
        axes.into_iter()
            .map(|axis| {
                if self.shape()[axis] < 2 {
                    return Err(CoreError::InvalidArgument {
                        reason: "gradient requires at least 2 elements along each axis",
                    });
                }
                let storage = match self.storage() {
                    Storage::Real(v) => Storage::Real(gradient_along(v, self.shape(), axis, spacing)),
                    s @ Storage::Complex { .. } => Storage::from_complex(gradient_along::<Complex64>(
                        &s.to_complex_vec(),
                        self.shape(),
                        axis,
                        spacing,
                    )),
                };
                Ok(self.with_storage(storage))
            })
            .collect()
    }
}

/// Free-function form of [`NDArray::gradient`].
pub fn gradient(a: &NDArray, spacing: f64, axis: Option<usize>) -> Result<Vec<NDArray>> {
    a.gradient(spacing, axis)
}

/// Piecewise-linear interpolation of the points `(xp, fp)` at `x`.
///
/// `xp` must be increasing. Points below `xp[0]` take `left` (default
/// `fp[0]`); points above the last `xp` take `right` (default last `fp`).
/// The result has the shape of `x`.
pub fn interp(
    x: &NDArray,
    xp: &NDArray,
    fp: &NDArray,
    left: Option<f64>,
    right: Option<f64>,
) -> Result<NDArray> {
    let (xs, xp_data, fp_data) = (
        x.real_data("interp")?,
        xp.real_data("interp")?,
        fp.real_data("interp")?,
    );
    if xp.ndim() != 1 || fp.ndim() != 1 || xp.size() != fp.size() {
        return Err(CoreError::ShapeMismatch {
            expected: xp.shape().to_vec(),
            got: fp.shape().to_vec(),
        });
    }
    let (Some(&x0), Some(&xn)) = (xp_data.first(), xp_data.last()) else {
        return Err(CoreError::InvalidArgument {
            reason: "interp requires at least one sample point",
        });
    };
    let left = left.unwrap_or(fp_data[0]);
    let right = right.unwrap_or(fp_data[fp_data.len() - 1]);

    let out = xs
        .iter()
        .map(|&t| {
            if t.is_nan() {
                f64::NAN
            } else if t < x0 {
                left
            } else if t > xn {
                right
            } else if t == xn {
                fp_data[fp_data.len() - 1]
            } else {
                // xp[j - 1] <= t < xp[j]
                let j = xp_data.partition_point(|&v| v <= t);
                let (xa, xb) = (xp_data[j - 1], xp_data[j]);
                let (fa, fb) = (fp_data[j - 1], fp_data[j]);
                fa + (fb - fa) * (t - xa) / (xb - xa)
            }
        })
        .collect();
    Ok(x.with_storage(Storage::Real(out)))
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn v(data: &[f64]) -> NDArray {
        NDArray::from(data.to_vec())
    }

    #[test]
    fn test_convolve_modes() {
        let a = v(&[1.0, 2.0, 3.0]);
        let k = v(&[0.0, 1.0, 0.5]);
        let full = convolve(&a, &k, ConvolveMode::Full).unwrap();
        assert_eq!(full.size(), 5);
        assert_eq!(full.as_slice()[2], 2.5);
        let same = convolve(&a, &k, ConvolveMode::Same).unwrap();
        assert_eq!(same.as_slice(), &[1.0, 2.5, 4.0]);
        let valid = convolve(&a, &k, ConvolveMode::Valid).unwrap();
        assert_eq!(valid.as_slice(), &[2.5]);
    }

    #[test]
    fn test_convolve_lengths() {
        let a = v(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let k = v(&[1.0, 1.0]);
        assert_eq!(convolve(&a, &k, ConvolveMode::Full).unwrap().size(), 6);
        assert_eq!(convolve(&a, &k, ConvolveMode::Valid).unwrap().size(), 4);
        assert_eq!(convolve(&a, &k, ConvolveMode::Same).unwrap().size(), 5);
        // commutative in full mode
        assert_eq!(
            convolve(&k, &a, ConvolveMode::Full).unwrap(),
            convolve(&a, &k, ConvolveMode::Full).unwrap()
        );
    }

    #[test]
    fn test_convolve_rejects_empty_and_2d() {
        assert!(convolve(&v(&[]), &v(&[1.0]), ConvolveMode::Full).is_err());
        let m = NDArray::zeros(vec![2, 2]);
        assert!(convolve(&m, &v(&[1.0]), ConvolveMode::Full).is_err());
    }

    #[test]
    fn test_correlate() {
        let a = v(&[1.0, 2.0, 3.0]);
        let k = v(&[0.0, 1.0, 0.5]);
        let c = correlate(&a, &k, ConvolveMode::Full).unwrap();
        assert_eq!(c.as_slice(), &[0.5, 2.0, 3.5, 3.0, 0.0]);
        let valid = correlate(&a, &k, ConvolveMode::Valid).unwrap();
        assert_eq!(valid.as_slice(), &[3.5]);
    }

    #[test]
    fn test_correlate_complex_conjugates() {
        let a = NDArray::from_complex(vec![Complex64::new(0.0, 1.0)], vec![1]).unwrap();
        let c = correlate(&a, &a, ConvolveMode::Full).unwrap();
        assert_eq!(c.get(&[0]).unwrap(), Complex64::new(1.0, 0.0));
    }

    #[test]
    fn test_gradient_1d() {
        let g = v(&[1.0, 2.0, 4.0, 7.0, 11.0]).gradient(1.0, None).unwrap();
        assert_eq!(g.len(), 1);
        assert_eq!(g[0].as_slice(), &[1.0, 1.5, 2.5, 3.5, 4.0]);
        let g2 = gradient(&v(&[0.0, 2.0, 4.0]), 2.0, None).unwrap();
        assert_eq!(g2[0].as_slice(), &[1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_gradient_2d() {
        // [[1, 2, 6],
        //  [3, 4, 5]]
        let t = NDArray::from_vec(vec![1.0, 2.0, 6.0, 3.0, 4.0, 5.0], vec![2, 3]).unwrap();
        let g = t.gradient(1.0, None).unwrap();
        assert_eq!(g.len(), 2);
        assert_eq!(g[0].as_slice(), &[2.0, 2.0, -1.0, 2.0, 2.0, -1.0]);
        assert_eq!(g[1].as_slice(), &[1.0, 2.5, 4.0, 1.0, 1.0, 1.0]);
        let g1 = t.gradient(1.0, Some(1)).unwrap();
        assert_eq!(g1.len(), 1);
        assert_eq!(g1[0], g[1]);
    }

    #[test]
    fn test_gradient_too_short() {
        assert!(v(&[1.0]).gradient(1.0, None).is_err());
        assert!(NDArray::scalar(1.0).gradient(1.0, None).is_err());
    }

    #[test]
    fn test_interp() {
        let xp = v(&[1.0, 2.0, 3.0]);
        let fp = v(&[3.0, 2.0, 0.0]);
        let r = interp(&v(&[0.0, 1.0, 1.5, 2.72, 3.0, 3.14]), &xp, &fp, None, None).unwrap();
        assert_eq!(r.as_slice()[0], 3.0);
        assert_eq!(r.as_slice()[1], 3.0);
        assert_eq!(r.as_slice()[2], 2.5);
        assert_abs_diff_eq!(r.as_slice()[3], 0.56, epsilon = 1e-12);
        assert_eq!(r.as_slice()[4], 0.0);
        assert_eq!(r.as_slice()[5], 0.0);
    }

    #[test]
    fn test_interp_left_right() {
        let xp = v(&[0.0, 1.0]);
        let fp = v(&[0.0, 10.0]);
        let r = interp(&v(&[-1.0, 0.5, 2.0]), &xp, &fp, Some(-99.0), Some(99.0)).unwrap();
        assert_eq!(r.as_slice(), &[-99.0, 5.0, 99.0]);
        assert!(interp(&v(&[0.0]), &xp, &v(&[1.0]), None, None).is_err());
    }
}
