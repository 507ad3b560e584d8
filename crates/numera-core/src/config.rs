//! Formatting options and host-string option parsing.

use core::str::FromStr;

use crate::error::CoreError;

/// Controls how [`NDArray::format_with`](crate::array::NDArray::format_with)
/// renders element values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintOptions {
    /// Digits after the decimal point.
    pub precision: usize,
    /// Arrays with more elements than this are summarised.
    pub threshold: usize,
    /// Items shown at each end of a summarised axis.
    pub edgeitems: usize,
    /// Print values below `1e-(precision)` in magnitude as zero.
    pub suppress_small: bool,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            precision: 8,
            threshold: 1000,
            edgeitems: 3,
            suppress_small: false,
        }
    }
}

impl PrintOptions {
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }
}

/// Which insertion point `searchsorted` reports for equal elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    /// First position that keeps the order (before equal elements).
    #[default]
    Left,
    /// Last position that keeps the order (after equal elements).
    Right,
}

/// Output extent of `convolve` / `correlate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConvolveMode {
    /// Every point of overlap: `n + m - 1`.
    #[default]
    Full,
    /// Only complete overlap: `max(n, m) - min(n, m) + 1`.
    Valid,
    /// Centered, `max(n, m)`.
    Same,
}

/// How `pad` fills the new border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PadMode {
    /// A constant value.
    #[default]
    Constant,
    /// Repeat the edge element.
    Edge,
    /// Mirror without repeating the edge (`3 2 | 1 2 3 | 2 1`).
    Reflect,
    /// Mirror including the edge (`2 1 | 1 2 3 | 3 2`).
    Symmetric,
    /// Wrap around periodically.
    Wrap,
}

macro_rules! impl_from_str {
    ($ty:ty, $name:literal, { $($text:literal => $variant:expr),+ $(,)? }) => {
        impl FromStr for $ty {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_ascii_lowercase().as_str() {
                    $($text => Ok($variant),)+
                    _ => Err(CoreError::InvalidMode {
                        name: $name,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

impl_from_str!(Side, "side", { "left" => Side::Left, "right" => Side::Right });
impl_from_str!(ConvolveMode, "convolve", {
    "full" => ConvolveMode::Full,
    "valid" => ConvolveMode::Valid,
    "same" => ConvolveMode::Same,
});
impl_from_str!(PadMode, "pad", {
    "constant" => PadMode::Constant,
    "edge" => PadMode::Edge,
    "reflect" => PadMode::Reflect,
    "symmetric" => PadMode::Symmetric,
    "wrap" => PadMode::Wrap,
});
