use crate::dtype::DType;

/// Coarse failure classes surfaced to hosts.
///
/// Hosts that only see the message text can still tell these apart: every
/// [`CoreError`] message contains a stable keyword for its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Rank mismatch, incompatible broadcast, bad reshape, ragged input.
    Shape,
    /// Out-of-bounds element access.
    Index,
    /// Operation undefined for the operand dtype(s).
    Dtype,
    /// Invalid axis, percentile range, mode string, or other argument.
    Argument,
}

/// All errors returned by `numera-core`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// Operand shapes do not match the required layout.
    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    /// A shape specification or nested input is invalid.
    #[error("invalid shape {shape:?}: {reason}")]
    InvalidShape {
        shape: Vec<usize>,
        reason: &'static str,
    },

    /// Shapes cannot be broadcast together.
    #[error("cannot broadcast shapes {shape_a:?} and {shape_b:?}")]
    BroadcastError {
        shape_a: Vec<usize>,
        shape_b: Vec<usize>,
    },

    /// A multi-dimensional index is out of bounds.
    #[error("index {index:?} out of bounds for shape {shape:?}")]
    IndexOutOfBounds {
        index: Vec<usize>,
        shape: Vec<usize>,
    },

    /// An axis is out of bounds for the array's rank.
    #[error("axis {axis} out of bounds for array with {ndim} dimensions")]
    AxisOutOfBounds { axis: usize, ndim: usize },

    /// The operation has no definition for this dtype.
    #[error("dtype error: {op} is not supported for {dtype} arrays")]
    UnsupportedDtype { op: &'static str, dtype: DType },

    /// The operation is not supported for the given input.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: &'static str },

    /// A mode/side string did not name a known option.
    #[error("invalid argument: unknown {name} mode {value:?}")]
    InvalidMode { name: &'static str, value: String },
}

impl CoreError {
    /// The failure class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ShapeMismatch { .. } | Self::InvalidShape { .. } | Self::BroadcastError { .. } => {
                ErrorKind::Shape
            }
            Self::IndexOutOfBounds { .. } => ErrorKind::Index,
            Self::UnsupportedDtype { .. } => ErrorKind::Dtype,
            Self::AxisOutOfBounds { .. }
            | Self::InvalidArgument { .. }
            | Self::InvalidMode { .. } => ErrorKind::Argument,
        }
    }
}

/// Convenience alias used throughout `numera-core`.
pub type Result<T> = std::result::Result<T, CoreError>;
