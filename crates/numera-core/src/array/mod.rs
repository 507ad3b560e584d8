//! N-dimensional array type with dynamic shape and dtype.
//!
//! The [`NDArray`] type is the fundamental data structure of numera,
//! analogous to `NumPy`'s `ndarray`. It stores elements in row-major (C)
//! order and is either real (`f64`) or complex (split `re`/`im` buffers).
//!
//! Arrays behave as values: every operation returns a freshly allocated
//! array. The only mutation is [`NDArray::set`] on an array the caller owns,
//! and [`NDArray::copy`] always produces an independent buffer.

mod create;
mod display;
mod indexing;
mod manip;
mod ops;
mod reduce;
mod reshape;
mod sort;

pub use indexing::SliceRange;
pub use ops::{BinaryOp, CompareOp};

use num_complex::Complex64;

use crate::dtype::{DType, Value};
use crate::error::{CoreError, Result};
use crate::shape::{compute_strides, numel};
use crate::storage::Storage;

/// A dense N-dimensional array of `real64` or `complex128` elements.
///
/// Strides are always the canonical row-major strides of `shape`; they are
/// recomputed by every shape-changing operation and never set directly.
#[derive(Debug, Clone)]
pub struct NDArray {
    storage: Storage,
    shape: Vec<usize>,
    strides: Vec<usize>,
}

impl NDArray {
    // ------------------------------------------------------------------
    // Construction from raw parts
    // ------------------------------------------------------------------

    /// Create a real array from a flat data vector and a shape.
    ///
    /// Returns an error if the product of `shape` does not equal `data.len()`.
    pub fn from_vec(data: Vec<f64>, shape: Vec<usize>) -> Result<Self> {
        Self::from_storage(Storage::Real(data), shape)
    }

    /// Create a real array from a flat slice and a shape (copies the data).
    pub fn from_slice(data: &[f64], shape: Vec<usize>) -> Result<Self> {
        Self::from_vec(data.to_vec(), shape)
    }

    /// Create a complex array from interleaved complex values.
    pub fn from_complex(data: Vec<Complex64>, shape: Vec<usize>) -> Result<Self> {
        Self::from_storage(Storage::from_complex(data), shape)
    }

    /// Create a complex array from separate real and imaginary buffers.
    pub fn from_parts(re: Vec<f64>, im: Vec<f64>, shape: Vec<usize>) -> Result<Self> {
        Self::from_storage(Storage::from_parts(re, im)?, shape)
    }

    /// Wrap existing storage with a shape.
    pub fn from_storage(storage: Storage, shape: Vec<usize>) -> Result<Self> {
        if numel(&shape) != storage.len() {
            return Err(CoreError::InvalidShape {
                shape,
                reason: "shape product does not match data length",
            });
        }
        Ok(Self::from_raw(storage, shape))
    }

    /// Internal constructor for callers that already guarantee the size.
    pub(crate) fn from_raw(storage: Storage, shape: Vec<usize>) -> Self {
        debug_assert_eq!(numel(&shape), storage.len());
        let strides = compute_strides(&shape);
        Self {
            storage,
            shape,
            strides,
        }
    }

    /// Create a real scalar (0-dimensional) array.
    pub fn scalar(value: f64) -> Self {
        Self::from_raw(Storage::Real(vec![value]), vec![])
    }

    /// Create a 0-dimensional array holding any value.
    pub fn from_value(value: Value) -> Self {
        Self::from_raw(Storage::filled(1, value), vec![])
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// The shape of the array as a slice.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// The strides of the array (in number of elements).
    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// The number of dimensions (rank) of the array.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// The total number of elements.
    #[inline]
    pub fn size(&self) -> usize {
        self.storage.len()
    }

    /// Whether the array has zero elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    #[inline]
    pub fn dtype(&self) -> DType {
        self.storage.dtype()
    }

    #[inline]
    pub fn is_complex(&self) -> bool {
        self.dtype() == DType::Complex128
    }

    /// The backing storage.
    #[inline]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// The real buffer in storage order (real parts, for complex arrays).
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        self.storage.re()
    }

    /// The imaginary buffer, if complex.
    #[inline]
    pub fn imag_slice(&self) -> Option<&[f64]> {
        self.storage.im()
    }

    /// Consume the array and return its storage.
    #[inline]
    pub fn into_storage(self) -> Storage {
        self.storage
    }

    /// The real buffer, or a dtype error naming `op` for complex arrays.
    pub(crate) fn real_data(&self, op: &'static str) -> Result<&[f64]> {
        match &self.storage {
            Storage::Real(v) => Ok(v),
            Storage::Complex { .. } => Err(CoreError::UnsupportedDtype {
                op,
                dtype: DType::Complex128,
            }),
        }
    }

    /// The single element of a size-1 array.
    pub fn item(&self) -> Result<Value> {
        if self.size() != 1 {
            return Err(CoreError::InvalidArgument {
                reason: "item() requires an array with exactly one element",
            });
        }
        Ok(self.storage.value(0))
    }

    // ------------------------------------------------------------------
    // Element access
    // ------------------------------------------------------------------

    /// Compute the flat index for a multi-dimensional index.
    fn flat_index(&self, index: &[usize]) -> Result<usize> {
        if index.len() != self.ndim() {
            return Err(CoreError::IndexOutOfBounds {
                index: index.to_vec(),
                shape: self.shape.clone(),
            });
        }
        let mut flat = 0;
        for (i, (&idx, &dim)) in index.iter().zip(self.shape.iter()).enumerate() {
            if idx >= dim {
                return Err(CoreError::IndexOutOfBounds {
                    index: index.to_vec(),
                    shape: self.shape.clone(),
                });
            }
            flat += idx * self.strides[i];
        }
        Ok(flat)
    }

    /// The element at the given multi-dimensional index.
    pub fn get(&self, index: &[usize]) -> Result<Value> {
        let flat = self.flat_index(index)?;
        Ok(self.storage.value(flat))
    }

    /// Set the element at the given multi-dimensional index.
    pub fn set(&mut self, index: &[usize], value: impl Into<Value>) -> Result<()> {
        let flat = self.flat_index(index)?;
        self.storage.set(flat, value.into())
    }

    /// The element at a flat row-major offset.
    #[inline]
    pub fn value_at(&self, flat: usize) -> Value {
        self.storage.value(flat)
    }

    /// Iterate over all elements in storage order.
    pub fn iter_values(&self) -> impl Iterator<Item = Value> + '_ {
        (0..self.size()).map(move |i| self.storage.value(i))
    }

    /// A deep copy with an independently owned buffer.
    pub fn copy(&self) -> NDArray {
        self.clone()
    }

    // ------------------------------------------------------------------
    // Complex parts
    // ------------------------------------------------------------------

    /// Real part as a real array.
    pub fn real(&self) -> NDArray {
        Self::from_raw(Storage::Real(self.storage.re().to_vec()), self.shape.clone())
    }

    /// Imaginary part as a real array (zeros for real input).
    pub fn imag(&self) -> NDArray {
        let im = match self.storage.im() {
            Some(im) => im.to_vec(),
            None => vec![0.0; self.size()],
        };
        Self::from_raw(Storage::Real(im), self.shape.clone())
    }

    /// Complex conjugate (a copy for real input).
    pub fn conj(&self) -> NDArray {
        match &self.storage {
            Storage::Real(_) => self.clone(),
            Storage::Complex { re, im } => Self::from_raw(
                Storage::Complex {
                    re: re.clone(),
                    im: im.iter().map(|&x| -x).collect(),
                },
                self.shape.clone(),
            ),
        }
    }

    /// Promote to `complex128` (a copy if already complex).
    pub fn to_complex(&self) -> NDArray {
        match self.storage.cast(DType::Complex128) {
            Ok(storage) => Self::from_raw(storage, self.shape.clone()),
            Err(_) => self.clone(),
        }
    }

    // ------------------------------------------------------------------
    // Map / apply
    // ------------------------------------------------------------------

    /// Apply a real function to every element; dtype error for complex arrays.
    pub fn map_real<F>(&self, op: &'static str, f: F) -> Result<NDArray>
    where
        F: Fn(f64) -> f64,
    {
        let data = self.real_data(op)?;
        Ok(Self::from_raw(
            Storage::Real(data.iter().map(|&x| f(x)).collect()),
            self.shape.clone(),
        ))
    }

    /// Apply a complex function to every element, promoting real input.
    pub fn map_complex<F>(&self, f: F) -> NDArray
    where
        F: Fn(Complex64) -> Complex64,
    {
        let data = (0..self.size())
            .map(|i| f(self.storage.complex_at(i)))
            .collect();
        Self::from_raw(Storage::from_complex(data), self.shape.clone())
    }

    /// A new array with the same shape built from per-element predicates.
    pub(crate) fn map_to_real<F>(&self, f: F) -> NDArray
    where
        F: Fn(Value) -> f64,
    {
        let data = self.iter_values().map(f).collect();
        Self::from_raw(Storage::Real(data), self.shape.clone())
    }

    /// Same shape, new storage.
    pub(crate) fn with_storage(&self, storage: Storage) -> NDArray {
        Self::from_raw(storage, self.shape.clone())
    }

    /// Swap in storage of the same length, keeping the shape.
    pub(crate) fn replace_storage(&mut self, storage: Storage) {
        debug_assert_eq!(storage.len(), self.storage.len());
        self.storage = storage;
    }
}

impl PartialEq for NDArray {
    fn eq(&self, other: &Self) -> bool {
        self.shape == other.shape && self.storage == other.storage
    }
}

impl From<f64> for NDArray {
    fn from(v: f64) -> Self {
        NDArray::scalar(v)
    }
}

impl From<Vec<f64>> for NDArray {
    fn from(v: Vec<f64>) -> Self {
        let n = v.len();
        NDArray::from_raw(Storage::Real(v), vec![n])
    }
}
