//! `numera-core` — dense n-dimensional real/complex arrays.
//!
//! Provides the [`NDArray`] value type together with NumPy-style
//! broadcasting arithmetic, reductions, sorting, array manipulation, small
//! dense linear algebra, 1-D signal kernels, and random generation.
//!
//! # Design
//!
//! - Arrays are values: operations allocate a new array and never alias
//!   their inputs.
//! - Each array is either `real64` or `complex128`. Mixed operations promote
//!   once per call, not per element.
//! - Indices and axes are 0-based throughout the crate. The 1-based host
//!   contract lives only in [`interop::host`].
//! - Diagnostics go through the `log` facade; no logger is installed here.

pub mod array;
pub mod config;
pub mod dtype;
pub mod error;
pub mod interop;
pub mod linalg;
pub mod math;
pub mod random;
pub mod shape;
pub mod signal;
pub mod storage;

// Re-export key types at crate root for convenience.
pub use array::{BinaryOp, CompareOp, NDArray, SliceRange};
pub use config::{ConvolveMode, PadMode, PrintOptions, Side};
pub use dtype::{DType, Element, Value};
pub use error::{CoreError, ErrorKind, Result};
pub use interop::Nested;
pub use math::UnaryOp;
pub use storage::Storage;

/// Items intended for glob-import: `use numera_core::prelude::*;`
pub mod prelude {
    pub use crate::array::{NDArray, SliceRange};
    pub use crate::config::{ConvolveMode, PadMode, PrintOptions, Side};
    pub use crate::dtype::{DType, Value};
    pub use crate::error::{CoreError, ErrorKind, Result};
    pub use crate::interop::{host, Nested};
    pub use crate::random::Rng;
    pub use crate::signal::{convolve, correlate, interp};
    pub use num_complex::Complex64;
}
