//! Conversion between arrays and what a host sees.
//!
//! [`Nested`] carries values in and out as nested sequences; [`host`]
//! exposes the array operations with 1-based indices and axes.

pub mod host;
mod nested;

pub use nested::Nested;
