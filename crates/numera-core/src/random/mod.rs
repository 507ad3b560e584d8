//! Random array creation.
//!
//! All generators take an explicit `&mut Rng`; there is no hidden global or
//! thread-local state, so a fixed seed always reproduces the same arrays.
//! Sampling is delegated to `rand`'s `StdRng` and the `rand_distr`
//! distributions. Integer-valued draws are returned as real arrays.

use rand::distributions::{Bernoulli, Distribution, Uniform};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng as _, SeedableRng};
use rand_distr::{Normal, StandardNormal};

use crate::array::NDArray;
use crate::error::{CoreError, Result};
use crate::shape::numel;
use crate::storage::Storage;

/// A seeded pseudo-random generator.
///
/// ```
/// use numera_core::random::Rng;
///
/// let mut rng = Rng::new(42);
/// let value = rng.next_f64(); // uniform in [0, 1)
/// assert!((0.0..1.0).contains(&value));
/// ```
#[derive(Debug, Clone)]
pub struct Rng {
    inner: StdRng,
}

impl Rng {
    /// Create a generator from a single `u64` seed.
    pub fn new(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    /// Re-seed the generator, discarding all previous state.
    pub fn seed(&mut self, seed: u64) {
        *self = Self::new(seed);
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.inner.gen()
    }

    /// Uniform `f64` in `[0, 1)`.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        self.inner.gen()
    }

    fn fill<D: Distribution<f64>>(&mut self, shape: Vec<usize>, dist: D) -> NDArray {
        let data: Vec<f64> = (&mut self.inner).sample_iter(dist).take(numel(&shape)).collect();
        array_of(data, shape)
    }
}

fn array_of(data: Vec<f64>, shape: Vec<usize>) -> NDArray {
    NDArray::from_raw(Storage::Real(data), shape)
}

/// An array of values uniformly distributed in `[0, 1)`.
///
/// ```
/// use numera_core::random::{uniform, Rng};
///
/// let mut rng = Rng::new(0);
/// let t = uniform(&mut rng, vec![2, 3]);
/// assert_eq!(t.shape(), &[2, 3]);
/// assert!(t.as_slice().iter().all(|&x| (0.0..1.0).contains(&x)));
/// ```
pub fn uniform(rng: &mut Rng, shape: Vec<usize>) -> NDArray {
    rng.fill(shape, Uniform::new(0.0, 1.0))
}

/// An array of values uniformly distributed in `[low, high)`.
pub fn uniform_range(rng: &mut Rng, shape: Vec<usize>, low: f64, high: f64) -> Result<NDArray> {
    if !(low < high) || !low.is_finite() || !high.is_finite() {
        return Err(CoreError::InvalidArgument {
            reason: "uniform_range requires finite low < high",
        });
    }
    Ok(rng.fill(shape, Uniform::new(low, high)))
}

/// Samples from `N(0, 1)`.
pub fn standard_normal(rng: &mut Rng, shape: Vec<usize>) -> NDArray {
    rng.fill(shape, StandardNormal)
}

/// Samples from `N(mean, std_dev^2)`.
pub fn normal(rng: &mut Rng, shape: Vec<usize>, mean: f64, std_dev: f64) -> Result<NDArray> {
    let dist = Normal::new(mean, std_dev).map_err(|_| CoreError::InvalidArgument {
        reason: "normal requires a finite, non-negative standard deviation",
    })?;
    Ok(rng.fill(shape, dist))
}

/// Random integers in `[low, high)`, stored as doubles.
pub fn randint(rng: &mut Rng, shape: Vec<usize>, low: i64, high: i64) -> Result<NDArray> {
    if low >= high {
        return Err(CoreError::InvalidArgument {
            reason: "randint requires low < high",
        });
    }
    let dist = Uniform::new(low, high);
    let data: Vec<f64> = (0..numel(&shape))
        .map(|_| dist.sample(&mut rng.inner) as f64)
        .collect();
    Ok(array_of(data, shape))
}

/// 0/1 draws that are 1 with probability `p`.
pub fn bernoulli(rng: &mut Rng, shape: Vec<usize>, p: f64) -> Result<NDArray> {
    let dist = Bernoulli::new(p).map_err(|_| CoreError::InvalidArgument {
        reason: "bernoulli requires p in [0, 1]",
    })?;
    let data: Vec<f64> = (0..numel(&shape))
        .map(|_| if dist.sample(&mut rng.inner) { 1.0 } else { 0.0 })
        .collect();
    Ok(array_of(data, shape))
}

/// A random ordering of `0..n` as a 1-D array.
pub fn permutation(rng: &mut Rng, n: usize) -> NDArray {
    let mut idx: Vec<usize> = (0..n).collect();
    idx.shuffle(&mut rng.inner);
    NDArray::from(idx.into_iter().map(|i| i as f64).collect::<Vec<_>>())
}

/// Shuffle the elements of `array` in place, in flat storage order.
pub fn shuffle(rng: &mut Rng, array: &mut NDArray) {
    let mut idx: Vec<usize> = (0..array.size()).collect();
    idx.shuffle(&mut rng.inner);
    let shuffled = array.storage().gather(&idx);
    array.replace_storage(shuffled);
}

/// Sample `n` elements from a 1-D array, with or without replacement.
pub fn choice(rng: &mut Rng, array: &NDArray, n: usize, replace: bool) -> Result<NDArray> {
    if array.ndim() != 1 {
        return Err(CoreError::InvalidArgument {
            reason: "choice requires a 1-D array",
        });
    }
    let len = array.size();
    if len == 0 && n > 0 {
        return Err(CoreError::InvalidArgument {
            reason: "choice from an empty array",
        });
    }
    let idx: Vec<usize> = if replace {
        let dist = Uniform::new(0, len.max(1));
        (0..n).map(|_| dist.sample(&mut rng.inner)).collect()
    } else {
        if n > len {
            return Err(CoreError::InvalidArgument {
                reason: "choice without replacement: n > array length",
            });
        }
        let mut all: Vec<usize> = (0..len).collect();
        let (picked, _) = all.partial_shuffle(&mut rng.inner, n);
        picked.to_vec()
    };
    array.take(&idx)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_rng_reproducibility() {
        let mut rng1 = Rng::new(12345);
        let mut rng2 = Rng::new(12345);
        for _ in 0..100 {
            assert_eq!(rng1.next_u64(), rng2.next_u64());
        }
    }

    #[test]
    fn test_reseed() {
        let mut rng = Rng::new(7);
        let first = rng.next_f64();
        rng.seed(7);
        assert_eq!(rng.next_f64(), first);
    }

    #[test]
    fn test_uniform_range_values() {
        let mut rng = Rng::new(1);
        let t = uniform_range(&mut rng, vec![1000], -2.0, 3.0).unwrap();
        assert!(t.as_slice().iter().all(|&x| (-2.0..3.0).contains(&x)));
        assert!(uniform_range(&mut rng, vec![1], 1.0, 1.0).is_err());
    }

    #[test]
    fn test_standard_normal_stats() {
        let mut rng = Rng::new(42);
        let t = standard_normal(&mut rng, vec![100, 100]);
        assert_eq!(t.shape(), &[100, 100]);
        assert_abs_diff_eq!(t.mean().re(), 0.0, epsilon = 0.05);
        assert_abs_diff_eq!(t.std().unwrap(), 1.0, epsilon = 0.05);
    }

    #[test]
    fn test_normal_custom() {
        let mut rng = Rng::new(3);
        let t = normal(&mut rng, vec![10_000], 5.0, 2.0).unwrap();
        assert_abs_diff_eq!(t.mean().re(), 5.0, epsilon = 0.1);
        assert!(normal(&mut rng, vec![1], 0.0, -1.0).is_err());
    }

    #[test]
    fn test_randint_range() {
        let mut rng = Rng::new(9);
        let t = randint(&mut rng, vec![500], -3, 4).unwrap();
        assert!(t
            .as_slice()
            .iter()
            .all(|&x| x.fract() == 0.0 && (-3.0..4.0).contains(&x)));
        assert!(randint(&mut rng, vec![1], 2, 2).is_err());
    }

    #[test]
    fn test_bernoulli() {
        let mut rng = Rng::new(5);
        let t = bernoulli(&mut rng, vec![200], 0.5).unwrap();
        assert!(t.as_slice().iter().all(|&x| x == 0.0 || x == 1.0));
        assert!(bernoulli(&mut rng, vec![1], 1.5).is_err());
    }

    #[test]
    fn test_permutation_is_complete() {
        let mut rng = Rng::new(11);
        let p = permutation(&mut rng, 10);
        assert_eq!(p.sort(None).unwrap(), NDArray::arange(0.0, 10.0, 1.0).unwrap());
    }

    #[test]
    fn test_shuffle_preserves_elements() {
        let mut rng = Rng::new(2);
        let original = NDArray::arange(0.0, 20.0, 1.0).unwrap().reshape(vec![4, 5]).unwrap();
        let mut t = original.copy();
        shuffle(&mut rng, &mut t);
        assert_eq!(t.shape(), &[4, 5]);
        assert_eq!(t.sort(None).unwrap(), original.sort(None).unwrap());
        assert_ne!(t, original);
    }

    #[test]
    fn test_choice() {
        let mut rng = Rng::new(4);
        let src = NDArray::arange(0.0, 5.0, 1.0).unwrap();
        let with = choice(&mut rng, &src, 20, true).unwrap();
        assert_eq!(with.size(), 20);
        let without = choice(&mut rng, &src, 5, false).unwrap();
        assert_eq!(without.unique().unwrap().size(), 5);
        assert!(choice(&mut rng, &src, 6, false).is_err());
        assert!(choice(&mut rng, &NDArray::zeros(vec![2, 2]), 1, true).is_err());
    }
}
