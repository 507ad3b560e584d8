//! Element-wise array math functions (ufuncs).
//!
//! Provides both methods on [`NDArray`] and free functions mirroring
//! `NumPy`'s top-level ufuncs (`np.sin`, `np.exp`, etc.).
//!
//! Functions with a complex-analytic definition (`sqrt`, `exp`, `log`, the
//! trigonometric and hyperbolic families) accept either dtype and return an
//! array of the input dtype. Functions that only make sense on the real line
//! (`floor`, `ceil`, `round`, `sign`, `clip`) return a dtype error for
//! complex input. On real arrays, domain errors yield NaN; use
//! [`csqrt`]/[`clog`] to get the complex continuation instead.

use core::f64::consts::{LN_10, LN_2, PI};

use num_complex::Complex64;

use crate::array::NDArray;
use crate::error::{CoreError, Result};
use crate::storage::Storage;

/// A unary element-wise function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Sqrt,
    Exp,
    Log,
    Log2,
    Log10,
    Log1p,
    Expm1,
    Sin,
    Cos,
    Tan,
    Sinh,
    Cosh,
    Tanh,
    Arcsin,
    Arccos,
    Arctan,
    Arcsinh,
    Arccosh,
    Arctanh,
    Square,
    Reciprocal,
    Floor,
    Ceil,
    Round,
    Sign,
}

impl UnaryOp {
    pub fn name(self) -> &'static str {
        match self {
            UnaryOp::Sqrt => "sqrt",
            UnaryOp::Exp => "exp",
            UnaryOp::Log => "log",
            UnaryOp::Log2 => "log2",
            UnaryOp::Log10 => "log10",
            UnaryOp::Log1p => "log1p",
            UnaryOp::Expm1 => "expm1",
            UnaryOp::Sin => "sin",
            UnaryOp::Cos => "cos",
            UnaryOp::Tan => "tan",
            UnaryOp::Sinh => "sinh",
            UnaryOp::Cosh => "cosh",
            UnaryOp::Tanh => "tanh",
            UnaryOp::Arcsin => "arcsin",
            UnaryOp::Arccos => "arccos",
            UnaryOp::Arctan => "arctan",
            UnaryOp::Arcsinh => "arcsinh",
            UnaryOp::Arccosh => "arccosh",
            UnaryOp::Arctanh => "arctanh",
            UnaryOp::Square => "square",
            UnaryOp::Reciprocal => "reciprocal",
            UnaryOp::Floor => "floor",
            UnaryOp::Ceil => "ceil",
            UnaryOp::Round => "round",
            UnaryOp::Sign => "sign",
        }
    }

    fn real(self, x: f64) -> f64 {
        match self {
            UnaryOp::Sqrt => x.sqrt(),
            UnaryOp::Exp => x.exp(),
            UnaryOp::Log => x.ln(),
            UnaryOp::Log2 => x.log2(),
            UnaryOp::Log10 => x.log10(),
            UnaryOp::Log1p => x.ln_1p(),
            UnaryOp::Expm1 => x.exp_m1(),
            UnaryOp::Sin => x.sin(),
            UnaryOp::Cos => x.cos(),
            UnaryOp::Tan => x.tan(),
            UnaryOp::Sinh => x.sinh(),
            UnaryOp::Cosh => x.cosh(),
            UnaryOp::Tanh => x.tanh(),
            UnaryOp::Arcsin => x.asin(),
            UnaryOp::Arccos => x.acos(),
            UnaryOp::Arctan => x.atan(),
            UnaryOp::Arcsinh => x.asinh(),
            UnaryOp::Arccosh => x.acosh(),
            UnaryOp::Arctanh => x.atanh(),
            UnaryOp::Square => x * x,
            UnaryOp::Reciprocal => x.recip(),
            UnaryOp::Floor => x.floor(),
            UnaryOp::Ceil => x.ceil(),
            UnaryOp::Round => x.round_ties_even(),
            UnaryOp::Sign => sign(x),
        }
    }

    /// The complex-analytic definition, if there is one.
    fn complex(self, z: Complex64) -> Option<Complex64> {
        let one = Complex64::new(1.0, 0.0);
        Some(match self {
            UnaryOp::Sqrt => z.sqrt(),
            UnaryOp::Exp => z.exp(),
            UnaryOp::Log => z.ln(),
            UnaryOp::Log2 => z.ln() / LN_2,
            UnaryOp::Log10 => z.ln() / LN_10,
            UnaryOp::Log1p => (z + one).ln(),
            UnaryOp::Expm1 => z.exp() - one,
            UnaryOp::Sin => z.sin(),
            UnaryOp::Cos => z.cos(),
            UnaryOp::Tan => z.tan(),
            UnaryOp::Sinh => z.sinh(),
            UnaryOp::Cosh => z.cosh(),
            UnaryOp::Tanh => z.tanh(),
            UnaryOp::Arcsin => z.asin(),
            UnaryOp::Arccos => z.acos(),
            UnaryOp::Arctan => z.atan(),
            UnaryOp::Arcsinh => z.asinh(),
            UnaryOp::Arccosh => z.acosh(),
            UnaryOp::Arctanh => z.atanh(),
            UnaryOp::Square => z * z,
            UnaryOp::Reciprocal => one / z,
            UnaryOp::Floor | UnaryOp::Ceil | UnaryOp::Round | UnaryOp::Sign => return None,
        })
    }
}

#[inline]
fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        // zero of either sign, or NaN
        if x.is_nan() {
            x
        } else {
            0.0
        }
    }
}

// ======================================================================
// NDArray methods
// ======================================================================

impl NDArray {
    /// Apply a unary function element-wise.
    pub fn unary(&self, op: UnaryOp) -> Result<NDArray> {
        match self.storage() {
            Storage::Real(v) => Ok(self.with_storage(Storage::Real(
                v.iter().map(|&x| op.real(x)).collect(),
            ))),
            Storage::Complex { .. } => {
                let mut out = Vec::with_capacity(self.size());
                for i in 0..self.size() {
                    let z = self.storage().complex_at(i);
                    out.push(op.complex(z).ok_or(CoreError::UnsupportedDtype {
                        op: op.name(),
                        dtype: self.dtype(),
                    })?);
                }
                Ok(self.with_storage(Storage::from_complex(out)))
            }
        }
    }

    /// Unary functions defined on both dtypes cannot fail.
    fn analytic(&self, op: UnaryOp) -> NDArray {
        match self.storage() {
            Storage::Real(v) => {
                self.with_storage(Storage::Real(v.iter().map(|&x| op.real(x)).collect()))
            }
            Storage::Complex { .. } => self.map_complex(|z| {
                op.complex(z)
                    .unwrap_or_else(|| Complex64::new(f64::NAN, f64::NAN))
            }),
        }
    }

    /// Element-wise absolute value (modulus for complex; always real).
    pub fn abs(&self) -> NDArray {
        self.map_to_real(|v| v.to_complex().norm())
    }

    /// Element-wise phase angle in radians (always real).
    pub fn angle(&self) -> NDArray {
        self.map_to_real(|v| v.to_complex().arg())
    }

    #[inline]
    pub fn sqrt(&self) -> NDArray {
        self.analytic(UnaryOp::Sqrt)
    }

    #[inline]
    pub fn exp(&self) -> NDArray {
        self.analytic(UnaryOp::Exp)
    }

    /// Element-wise natural logarithm.
    #[inline]
    pub fn log(&self) -> NDArray {
        self.analytic(UnaryOp::Log)
    }

    #[inline]
    pub fn log2(&self) -> NDArray {
        self.analytic(UnaryOp::Log2)
    }

    #[inline]
    pub fn log10(&self) -> NDArray {
        self.analytic(UnaryOp::Log10)
    }

    /// `log(1 + x)`, accurate near zero.
    #[inline]
    pub fn log1p(&self) -> NDArray {
        self.analytic(UnaryOp::Log1p)
    }

    /// `exp(x) - 1`, accurate near zero.
    #[inline]
    pub fn expm1(&self) -> NDArray {
        self.analytic(UnaryOp::Expm1)
    }

    #[inline]
    pub fn sin(&self) -> NDArray {
        self.analytic(UnaryOp::Sin)
    }

    #[inline]
    pub fn cos(&self) -> NDArray {
        self.analytic(UnaryOp::Cos)
    }

    #[inline]
    pub fn tan(&self) -> NDArray {
        self.analytic(UnaryOp::Tan)
    }

    #[inline]
    pub fn sinh(&self) -> NDArray {
        self.analytic(UnaryOp::Sinh)
    }

    #[inline]
    pub fn cosh(&self) -> NDArray {
        self.analytic(UnaryOp::Cosh)
    }

    #[inline]
    pub fn tanh(&self) -> NDArray {
        self.analytic(UnaryOp::Tanh)
    }

    #[inline]
    pub fn arcsin(&self) -> NDArray {
        self.analytic(UnaryOp::Arcsin)
    }

    #[inline]
    pub fn arccos(&self) -> NDArray {
        self.analytic(UnaryOp::Arccos)
    }

    #[inline]
    pub fn arctan(&self) -> NDArray {
        self.analytic(UnaryOp::Arctan)
    }

    #[inline]
    pub fn arcsinh(&self) -> NDArray {
        self.analytic(UnaryOp::Arcsinh)
    }

    #[inline]
    pub fn arccosh(&self) -> NDArray {
        self.analytic(UnaryOp::Arccosh)
    }

    #[inline]
    pub fn arctanh(&self) -> NDArray {
        self.analytic(UnaryOp::Arctanh)
    }

    #[inline]
    pub fn square(&self) -> NDArray {
        self.analytic(UnaryOp::Square)
    }

    /// Element-wise reciprocal (`1/x`).
    #[inline]
    pub fn reciprocal(&self) -> NDArray {
        self.analytic(UnaryOp::Reciprocal)
    }

    /// Element-wise floor.
    pub fn floor(&self) -> Result<NDArray> {
        self.unary(UnaryOp::Floor)
    }

    /// Element-wise ceiling.
    pub fn ceil(&self) -> Result<NDArray> {
        self.unary(UnaryOp::Ceil)
    }

    /// Round to the nearest integer, ties to even.
    pub fn round(&self) -> Result<NDArray> {
        self.unary(UnaryOp::Round)
    }

    /// Round to `decimals` digits (negative rounds left of the point).
    pub fn round_to(&self, decimals: i32) -> Result<NDArray> {
        let scale = 10f64.powi(decimals);
        self.map_real("round", |x| (x * scale).round_ties_even() / scale)
    }

    /// -1, 0, or 1 by sign; NaN stays NaN.
    pub fn sign(&self) -> Result<NDArray> {
        self.unary(UnaryOp::Sign)
    }

    /// Clamp every element to `[min, max]`. NaN passes through.
    pub fn clip(&self, min: f64, max: f64) -> Result<NDArray> {
        if min > max {
            return Err(CoreError::InvalidArgument {
                reason: "clip requires min <= max",
            });
        }
        self.map_real("clip", |x| if x.is_nan() { x } else { x.max(min).min(max) })
    }
}

// ======================================================================
// Free functions
// ======================================================================

/// Element-wise square root.
pub fn sqrt(t: &NDArray) -> NDArray {
    t.sqrt()
}

/// Element-wise natural exponential.
pub fn exp(t: &NDArray) -> NDArray {
    t.exp()
}

/// Element-wise natural logarithm.
pub fn log(t: &NDArray) -> NDArray {
    t.log()
}

/// Element-wise sine.
pub fn sin(t: &NDArray) -> NDArray {
    t.sin()
}

/// Element-wise cosine.
pub fn cos(t: &NDArray) -> NDArray {
    t.cos()
}

/// Element-wise absolute value.
pub fn abs(t: &NDArray) -> NDArray {
    t.abs()
}

/// Square root on the complex plane: `csqrt(-4) == 2i`.
pub fn csqrt(t: &NDArray) -> NDArray {
    t.to_complex().sqrt()
}

/// Natural log on the complex plane: `clog(-1) == i*pi`.
pub fn clog(t: &NDArray) -> NDArray {
    t.to_complex().log()
}

/// Degrees to radians.
pub fn deg2rad(t: &NDArray) -> Result<NDArray> {
    t.map_real("deg2rad", |x| x * PI / 180.0)
}

/// Radians to degrees.
pub fn rad2deg(t: &NDArray) -> Result<NDArray> {
    t.map_real("rad2deg", |x| x * 180.0 / PI)
}
