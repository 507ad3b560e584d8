//! Reductions, global and along a single axis.
//!
//! Each reduction comes in two forms: a global one that collapses the whole
//! array to one value, and an `_axis` variant that collapses only `axis` and
//! returns an array of the remaining shape.
//!
//! Zero-size input: `sum` is 0, `prod` is 1, `all` is true, `any` is false,
//! and the statistical reductions (`mean`, `var`, `std`, `median`,
//! `percentile`) are NaN. Order-based reductions (`min`, `max`, `argmin`,
//! `argmax`, `ptp`) have no answer and fail with an argument error.

use core::cmp::Ordering;

use num_complex::Complex64;

use crate::dtype::{Element, Value};
use crate::error::{CoreError, Result};
use crate::shape::{axis_lanes, check_axis, reduced_shape};
use crate::storage::Storage;

use super::NDArray;

const ZERO_SIZE: CoreError = CoreError::InvalidArgument {
    reason: "zero-size array has no minimum or maximum",
};

// ======================================================================
// Lane kernels
// ======================================================================

fn sum_of<T: Element>(xs: &[T]) -> T {
    xs.iter().copied().sum()
}

fn prod_of<T: Element>(xs: &[T]) -> T {
    xs.iter().copied().fold(T::one(), |acc, x| acc * x)
}

fn mean_of<T: Element>(xs: &[T]) -> T {
    sum_of(xs) / T::from_real(xs.len() as f64)
}

fn var_of(xs: &[f64]) -> f64 {
    let m = mean_of(xs);
    xs.iter().map(|&x| (x - m) * (x - m)).sum::<f64>() / xs.len() as f64
}

/// Index of the first NaN, or of the first extreme element by `better`.
fn arg_extreme(xs: &[f64], better: fn(f64, f64) -> bool) -> Option<usize> {
    if let Some(i) = xs.iter().position(|x| x.is_nan()) {
        return Some(i);
    }
    let mut best: Option<usize> = None;
    for (i, &x) in xs.iter().enumerate() {
        match best {
            Some(b) if !better(x, xs[b]) => {}
            _ => best = Some(i),
        }
    }
    best
}

fn min_of(xs: &[f64]) -> Result<f64> {
    arg_extreme(xs, |a, b| a < b).map(|i| xs[i]).ok_or(ZERO_SIZE)
}

fn max_of(xs: &[f64]) -> Result<f64> {
    arg_extreme(xs, |a, b| a > b).map(|i| xs[i]).ok_or(ZERO_SIZE)
}

/// Ascending total order with NaN after every number.
pub(crate) fn nan_last(a: &f64, b: &f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (true, true) => Ordering::Equal,
    }
}

/// Linear-interpolated quantile `q` in `[0, 1]` of unsorted data.
fn quantile_of(xs: &[f64], q: f64) -> f64 {
    if xs.is_empty() || xs.iter().any(|x| x.is_nan()) {
        return f64::NAN;
    }
    let mut sorted = xs.to_vec();
    sorted.sort_by(nan_last);
    let f = q * (sorted.len() - 1) as f64;
    let lo = f.floor() as usize;
    let hi = f.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (sorted[hi] - sorted[lo]) * (f - lo as f64)
    }
}

fn check_quantile(q: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&q) {
        Ok(q)
    } else {
        Err(CoreError::InvalidArgument {
            reason: "quantile must be in [0, 1] (percentile in [0, 100])",
        })
    }
}

/// Apply `f` to each lane of `data` along `axis`.
fn lanes_map<T: Copy, U>(
    data: &[T],
    shape: &[usize],
    axis: usize,
    mut f: impl FnMut(&[T]) -> Result<U>,
) -> Result<Vec<U>> {
    let mut buf = Vec::new();
    axis_lanes(shape, axis)
        .map(|lane| {
            buf.clear();
            buf.extend(lane.iter().map(|&i| data[i]));
            f(&buf)
        })
        .collect()
}

/// Running accumulation along each lane (or the flat order for `None`).
fn running<T: Element>(data: &[T], shape: &[usize], axis: Option<usize>, op: fn(T, T) -> T) -> Vec<T> {
    let mut out = data.to_vec();
    match axis {
        None => {
            for k in 1..out.len() {
                out[k] = op(out[k - 1], out[k]);
            }
        }
        Some(axis) => {
            for lane in axis_lanes(shape, axis) {
                for w in lane.windows(2) {
                    out[w[1]] = op(out[w[0]], out[w[1]]);
                }
            }
        }
    }
    out
}

// ======================================================================
// NDArray reductions
// ======================================================================

impl NDArray {
    /// Reduce a real array lane by lane along `axis`.
    fn reduce_real_axis(
        &self,
        op: &'static str,
        axis: usize,
        f: impl FnMut(&[f64]) -> Result<f64>,
    ) -> Result<NDArray> {
        let data = self.real_data(op)?;
        check_axis(axis, self.ndim())?;
        let out = lanes_map(data, &self.shape, axis, f)?;
        Ok(Self::from_raw(Storage::Real(out), reduced_shape(&self.shape, axis)))
    }

    /// Reduce along `axis` with kernels for either dtype.
    fn reduce_elem_axis(
        &self,
        axis: usize,
        real: fn(&[f64]) -> f64,
        complex: fn(&[Complex64]) -> Complex64,
    ) -> Result<NDArray> {
        check_axis(axis, self.ndim())?;
        let shape = reduced_shape(&self.shape, axis);
        let storage = match &self.storage {
            Storage::Real(v) => Storage::Real(lanes_map(v, &self.shape, axis, |l| Ok(real(l)))?),
            s @ Storage::Complex { .. } => Storage::from_complex(lanes_map(
                &s.to_complex_vec(),
                &self.shape,
                axis,
                |l| Ok(complex(l)),
            )?),
        };
        Ok(Self::from_raw(storage, shape))
    }

    fn reduce_elem(&self, real: fn(&[f64]) -> f64, complex: fn(&[Complex64]) -> Complex64) -> Value {
        match &self.storage {
            Storage::Real(v) => Value::Real(real(v)),
            s @ Storage::Complex { .. } => Value::Complex(complex(&s.to_complex_vec())),
        }
    }

    // ------------------------------------------------------------------
    // Sums and products
    // ------------------------------------------------------------------

    /// Sum of all elements.
    pub fn sum(&self) -> Value {
        self.reduce_elem(sum_of::<f64>, sum_of::<Complex64>)
    }

    /// Sum along `axis`, removing it from the shape.
    pub fn sum_axis(&self, axis: usize) -> Result<NDArray> {
        self.reduce_elem_axis(axis, sum_of::<f64>, sum_of::<Complex64>)
    }

    /// Product of all elements.
    pub fn prod(&self) -> Value {
        self.reduce_elem(prod_of::<f64>, prod_of::<Complex64>)
    }

    pub fn prod_axis(&self, axis: usize) -> Result<NDArray> {
        self.reduce_elem_axis(axis, prod_of::<f64>, prod_of::<Complex64>)
    }

    /// Arithmetic mean of all elements.
    pub fn mean(&self) -> Value {
        self.reduce_elem(mean_of::<f64>, mean_of::<Complex64>)
    }

    pub fn mean_axis(&self, axis: usize) -> Result<NDArray> {
        self.reduce_elem_axis(axis, mean_of::<f64>, mean_of::<Complex64>)
    }

    /// Sum treating NaN as zero.
    pub fn nansum(&self) -> Result<f64> {
        let data = self.real_data("nansum")?;
        Ok(data.iter().filter(|x| !x.is_nan()).sum())
    }

    /// Mean of the non-NaN elements (NaN if there are none).
    pub fn nanmean(&self) -> Result<f64> {
        let data = self.real_data("nanmean")?;
        let (sum, n) = data
            .iter()
            .filter(|x| !x.is_nan())
            .fold((0.0, 0usize), |(s, n), &x| (s + x, n + 1));
        Ok(sum / n as f64)
    }

    /// Weighted mean; `weights` must have the same shape as `self`.
    pub fn average(&self, weights: Option<&NDArray>) -> Result<f64> {
        let data = self.real_data("average")?;
        let Some(w) = weights else {
            return Ok(mean_of(data));
        };
        if w.shape() != self.shape() {
            return Err(CoreError::ShapeMismatch {
                expected: self.shape.clone(),
                got: w.shape.clone(),
            });
        }
        let w = w.real_data("average")?;
        let total: f64 = w.iter().sum();
        if total == 0.0 {
            return Err(CoreError::InvalidArgument {
                reason: "weights sum to zero",
            });
        }
        Ok(data.iter().zip(w).map(|(&x, &wi)| x * wi).sum::<f64>() / total)
    }

    /// Number of nonzero elements.
    pub fn count_nonzero(&self) -> usize {
        self.iter_values().filter(Value::is_truthy).count()
    }

    // ------------------------------------------------------------------
    // Spread
    // ------------------------------------------------------------------

    /// Population variance (divides by `N`).
    pub fn var(&self) -> Result<f64> {
        Ok(var_of(self.real_data("var")?))
    }

    pub fn var_axis(&self, axis: usize) -> Result<NDArray> {
        self.reduce_real_axis("var", axis, |l| Ok(var_of(l)))
    }

    /// Population standard deviation.
    pub fn std(&self) -> Result<f64> {
        self.var().map(f64::sqrt)
    }

    pub fn std_axis(&self, axis: usize) -> Result<NDArray> {
        self.reduce_real_axis("std", axis, |l| Ok(var_of(l).sqrt()))
    }

    // ------------------------------------------------------------------
    // Order statistics
    // ------------------------------------------------------------------

    /// Smallest element; NaN if any element is NaN.
    pub fn min(&self) -> Result<f64> {
        min_of(self.real_data("min")?)
    }

    pub fn min_axis(&self, axis: usize) -> Result<NDArray> {
        self.reduce_real_axis("min", axis, min_of)
    }

    /// Largest element; NaN if any element is NaN.
    pub fn max(&self) -> Result<f64> {
        max_of(self.real_data("max")?)
    }

    pub fn max_axis(&self, axis: usize) -> Result<NDArray> {
        self.reduce_real_axis("max", axis, max_of)
    }

    /// Peak to peak (`max - min`).
    pub fn ptp(&self) -> Result<f64> {
        Ok(self.max()? - self.min()?)
    }

    pub fn ptp_axis(&self, axis: usize) -> Result<NDArray> {
        self.reduce_real_axis("ptp", axis, |l| Ok(max_of(l)? - min_of(l)?))
    }

    /// Flat index of the first minimum (or first NaN).
    pub fn argmin(&self) -> Result<usize> {
        arg_extreme(self.real_data("argmin")?, |a, b| a < b).ok_or(ZERO_SIZE)
    }

    /// Flat index of the first maximum (or first NaN).
    pub fn argmax(&self) -> Result<usize> {
        arg_extreme(self.real_data("argmax")?, |a, b| a > b).ok_or(ZERO_SIZE)
    }

    /// Per-lane index of the first minimum, as a real array.
    pub fn argmin_axis(&self, axis: usize) -> Result<NDArray> {
        self.reduce_real_axis("argmin", axis, |l| {
            arg_extreme(l, |a, b| a < b).map(|i| i as f64).ok_or(ZERO_SIZE)
        })
    }

    /// Per-lane index of the first maximum, as a real array.
    pub fn argmax_axis(&self, axis: usize) -> Result<NDArray> {
        self.reduce_real_axis("argmax", axis, |l| {
            arg_extreme(l, |a, b| a > b).map(|i| i as f64).ok_or(ZERO_SIZE)
        })
    }

    /// Median (NaN for an empty array or one containing NaN).
    pub fn median(&self) -> Result<f64> {
        Ok(quantile_of(self.real_data("median")?, 0.5))
    }

    pub fn median_axis(&self, axis: usize) -> Result<NDArray> {
        self.reduce_real_axis("median", axis, |l| Ok(quantile_of(l, 0.5)))
    }

    /// The `p`-th percentile, `p` in `[0, 100]`.
    pub fn percentile(&self, p: f64) -> Result<f64> {
        self.quantile(p / 100.0)
    }

    pub fn percentile_axis(&self, p: f64, axis: usize) -> Result<NDArray> {
        self.quantile_axis(p / 100.0, axis)
    }

    /// The `q`-th quantile, `q` in `[0, 1]`.
    pub fn quantile(&self, q: f64) -> Result<f64> {
        let q = check_quantile(q)?;
        Ok(quantile_of(self.real_data("quantile")?, q))
    }

    pub fn quantile_axis(&self, q: f64, axis: usize) -> Result<NDArray> {
        let q = check_quantile(q)?;
        self.reduce_real_axis("quantile", axis, |l| Ok(quantile_of(l, q)))
    }

    // ------------------------------------------------------------------
    // Truth tests
    // ------------------------------------------------------------------

    /// Whether every element is nonzero.
    pub fn all(&self) -> bool {
        self.iter_values().all(|v| v.is_truthy())
    }

    /// Whether any element is nonzero.
    pub fn any(&self) -> bool {
        self.iter_values().any(|v| v.is_truthy())
    }

    /// Per-lane `all`, as a 0/1 real array.
    pub fn all_axis(&self, axis: usize) -> Result<NDArray> {
        self.truth_axis(axis, |l| l.iter().all(|&b| b))
    }

    /// Per-lane `any`, as a 0/1 real array.
    pub fn any_axis(&self, axis: usize) -> Result<NDArray> {
        self.truth_axis(axis, |l| l.iter().any(|&b| b))
    }

    fn truth_axis(&self, axis: usize, f: fn(&[bool]) -> bool) -> Result<NDArray> {
        check_axis(axis, self.ndim())?;
        let truthy: Vec<bool> = self.iter_values().map(|v| v.is_truthy()).collect();
        let out = lanes_map(&truthy, &self.shape, axis, |l| Ok(if f(l) { 1.0 } else { 0.0 }))?;
        Ok(Self::from_raw(Storage::Real(out), reduced_shape(&self.shape, axis)))
    }

    // ------------------------------------------------------------------
    // Cumulative
    // ------------------------------------------------------------------

    /// Running sum. `None` runs over the flattened array (1-D result).
    pub fn cumsum(&self, axis: Option<usize>) -> Result<NDArray> {
        self.accumulate(axis, |a, b| a + b, |a, b| a + b)
    }

    /// Running product. `None` runs over the flattened array (1-D result).
    pub fn cumprod(&self, axis: Option<usize>) -> Result<NDArray> {
        self.accumulate(axis, |a, b| a * b, |a, b| a * b)
    }

    fn accumulate(
        &self,
        axis: Option<usize>,
        real: fn(f64, f64) -> f64,
        complex: fn(Complex64, Complex64) -> Complex64,
    ) -> Result<NDArray> {
        let shape = match axis {
            Some(a) => {
                check_axis(a, self.ndim())?;
                self.shape.clone()
            }
            None => vec![self.size()],
        };
        let storage = match &self.storage {
            Storage::Real(v) => Storage::Real(running(v, &self.shape, axis, real)),
            s @ Storage::Complex { .. } => {
                Storage::from_complex(running(&s.to_complex_vec(), &self.shape, axis, complex))
            }
        };
        Ok(Self::from_raw(storage, shape))
    }

    // ------------------------------------------------------------------
    // Counting
    // ------------------------------------------------------------------

    /// Equal-width histogram over `[min, max]` of the finite elements.
    ///
    /// Returns `(counts, edges)` with `nbins` counts and `nbins + 1` edges.
    /// The last bin is closed on the right. A constant array uses the range
    /// `[v - 0.5, v + 0.5]`; an array with no finite values uses `[0, 1]`.
    pub fn histogram(&self, nbins: usize) -> Result<(NDArray, NDArray)> {
        if nbins == 0 {
            return Err(CoreError::InvalidArgument {
                reason: "histogram requires at least one bin",
            });
        }
        let data = self.real_data("histogram")?;
        let finite = data.iter().copied().filter(|x| x.is_finite());
        let (mut lo, mut hi) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
            (lo.min(x), hi.max(x))
        });
        if lo > hi {
            (lo, hi) = (0.0, 1.0);
        } else if lo == hi {
            (lo, hi) = (lo - 0.5, hi + 0.5);
        }

        // Work in halves so `hi - lo` cannot overflow past f64::MAX.
        let (lo_half, half_width) = (lo / 2.0, hi / 2.0 - lo / 2.0);
        let mut counts = vec![0.0; nbins];
        for &x in data {
            if !(lo..=hi).contains(&x) {
                continue;
            }
            let bin = ((x / 2.0 - lo_half) / half_width * nbins as f64) as usize;
            counts[bin.min(nbins - 1)] += 1.0;
        }
        let half_step = half_width / nbins as f64;
        let mut edges: Vec<f64> = (0..=nbins)
            .map(|i| (lo_half + half_step * i as f64) * 2.0)
            .collect();
        edges[nbins] = hi;
        Ok((NDArray::from(counts), NDArray::from(edges)))
    }

    /// Occurrence counts of non-negative integer values.
    ///
    /// The output has length `max(max_value + 1, minlength)`. With `weights`
    /// each occurrence contributes its weight instead of 1.
    pub fn bincount(&self, weights: Option<&NDArray>, minlength: usize) -> Result<NDArray> {
        if self.ndim() != 1 {
            return Err(CoreError::InvalidArgument {
                reason: "bincount requires a 1-D array",
            });
        }
        let data = self.real_data("bincount")?;
        let weights = match weights {
            Some(w) if w.shape() != self.shape() => {
                return Err(CoreError::ShapeMismatch {
                    expected: self.shape.clone(),
                    got: w.shape.clone(),
                });
            }
            Some(w) => Some(w.real_data("bincount")?),
            None => None,
        };

        let mut bins = Vec::with_capacity(data.len());
        for &x in data {
            if !(x >= 0.0 && x.fract() == 0.0 && x.is_finite()) {
                return Err(CoreError::InvalidArgument {
                    reason: "bincount values must be non-negative integers",
                });
            }
            if x >= usize::MAX as f64 {
                return Err(CoreError::InvalidArgument {
                    reason: "bincount value too large",
                });
            }
            bins.push(x as usize);
        }
        let len = bins.iter().map(|&b| b + 1).max().unwrap_or(0).max(minlength);
        let mut out = vec![0.0; len];
        for (k, &b) in bins.iter().enumerate() {
            out[b] += weights.map_or(1.0, |w| w[k]);
        }
        Ok(NDArray::from(out))
    }
}
