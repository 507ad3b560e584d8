//! `Display` and value formatting for [`NDArray`].
//!
//! `Display` names only the shape (`array(2, 3)`), which is the form hosts
//! see as the array's string representation. [`NDArray::format_with`]
//! renders the values themselves under a [`PrintOptions`].

use core::fmt;

use crate::config::PrintOptions;
use crate::dtype::Value;

use super::NDArray;

impl fmt::Display for NDArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "array(")?;
        for (i, d) in self.shape.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{d}")?;
        }
        write!(f, ")")
    }
}

fn format_real(x: f64, opts: &PrintOptions) -> String {
    if !x.is_finite() {
        return if x.is_nan() {
            "nan".to_string()
        } else if x > 0.0 {
            "inf".to_string()
        } else {
            "-inf".to_string()
        };
    }
    let x = if opts.suppress_small && x.abs() < 10f64.powi(-(opts.precision as i32)) {
        0.0
    } else {
        x
    };
    let mut s = format!("{x:.prec$}", prec = opts.precision);
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').len();
        s.truncate(trimmed);
        if s.ends_with('.') {
            s.push('0');
        }
    }
    s
}

fn format_value(v: Value, opts: &PrintOptions) -> String {
    match v {
        Value::Real(x) => format_real(x, opts),
        Value::Complex(z) => {
            let sign = if z.im < 0.0 || (z.im == 0.0 && z.im.is_sign_negative()) {
                '-'
            } else {
                '+'
            };
            format!(
                "{}{sign}{}j",
                format_real(z.re, opts),
                format_real(z.im.abs(), opts)
            )
        }
    }
}

impl NDArray {
    /// Render the element values as nested brackets.
    ///
    /// Arrays with more than `opts.threshold` elements show only
    /// `opts.edgeitems` entries at each end of every axis.
    ///
    /// ```
    /// # use numera_core::array::NDArray;
    /// # use numera_core::config::PrintOptions;
    /// let t = NDArray::from_vec(vec![1.0, 2.5, 3.0, 4.0], vec![2, 2]).unwrap();
    /// assert_eq!(t.format_with(&PrintOptions::default()), "[[1.0, 2.5], [3.0, 4.0]]");
    /// ```
    pub fn format_with(&self, opts: &PrintOptions) -> String {
        let summarise = self.size() > opts.threshold;
        let mut out = String::new();
        if self.ndim() == 0 {
            out.push_str(&format_value(self.value_at(0), opts));
        } else {
            self.format_axis(&mut out, 0, 0, summarise, opts);
        }
        out
    }

    fn format_axis(&self, out: &mut String, axis: usize, base: usize, summarise: bool, opts: &PrintOptions) {
        let len = self.shape[axis];
        let stride = self.strides[axis];
        out.push('[');
        let skip = summarise && len > 2 * opts.edgeitems;
        let mut first = true;
        for i in 0..len {
            if skip && i >= opts.edgeitems && i < len - opts.edgeitems {
                if i == opts.edgeitems {
                    out.push_str(", ...");
                }
                continue;
            }
            if !first {
                out.push_str(", ");
            }
            first = false;
            let offset = base + i * stride;
            if axis + 1 == self.ndim() {
                out.push_str(&format_value(self.value_at(offset), opts));
            } else {
                self.format_axis(out, axis + 1, offset, summarise, opts);
            }
        }
        out.push(']');
    }
}
