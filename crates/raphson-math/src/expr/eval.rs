//! Numeric evaluation of expression trees.

use super::{Expr, ExprError, Func};

impl Expr {
    /// Evaluates at `x` with IEEE semantics.
    ///
    /// Division by zero and domain errors yield infinities or NaN, which the
    /// solver classifies itself.
    pub fn eval(&self, x: f64) -> f64 {
        match self {
            Self::Number(n) => *n,
            Self::Variable => x,
            Self::Constant(c) => c.value(),
            Self::Neg(a) => -a.eval(x),
            Self::Add(a, b) => a.eval(x) + b.eval(x),
            Self::Sub(a, b) => a.eval(x) - b.eval(x),
            Self::Mul(a, b) => a.eval(x) * b.eval(x),
            Self::Div(a, b) => a.eval(x) / b.eval(x),
            Self::Pow(a, b) => pow(a.eval(x), b.eval(x)),
            Self::Call(func, a) => func.apply(a.eval(x)),
        }
    }

    /// Evaluates at `x`, failing instead of producing NaN or infinity.
    ///
    /// # Errors
    ///
    /// Returns [`ExprError::Evaluation`] on division by zero, a domain error
    /// (logarithm of a non-positive value, square root of a negative value,
    /// inverse sine/cosine outside `[-1, 1]`, fractional power of a negative
    /// base) or a non-finite intermediate result.
    pub fn try_eval(&self, x: f64) -> Result<f64, ExprError> {
        self.checked(x).map_err(|reason| ExprError::Evaluation {
            x,
            reason: reason.to_string(),
        })
    }

    fn checked(&self, x: f64) -> Result<f64, &'static str> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Variable => x,
            Self::Constant(c) => c.value(),
            Self::Neg(a) => -a.checked(x)?,
            Self::Add(a, b) => a.checked(x)? + b.checked(x)?,
            Self::Sub(a, b) => a.checked(x)? - b.checked(x)?,
            Self::Mul(a, b) => a.checked(x)? * b.checked(x)?,
            Self::Div(a, b) => {
                let num = a.checked(x)?;
                let den = b.checked(x)?;
                if den == 0.0 {
                    return Err("division by zero");
                }
                num / den
            }
            Self::Pow(a, b) => {
                let base = a.checked(x)?;
                let exponent = b.checked(x)?;
                if base == 0.0 && exponent < 0.0 {
                    return Err("division by zero");
                }
                if base < 0.0 && exponent.fract() != 0.0 {
                    return Err("fractional power of a negative number");
                }
                pow(base, exponent)
            }
            Self::Call(func, a) => {
                let arg = a.checked(x)?;
                check_domain(*func, arg)?;
                func.apply(arg)
            }
        };

        if value.is_finite() {
            Ok(value)
        } else {
            Err("result is not finite")
        }
    }
}

/// Integer exponents go through `powi` so `(-2)^3` stays exact.
fn pow(base: f64, exponent: f64) -> f64 {
    if exponent.fract() == 0.0 && exponent.abs() <= f64::from(i32::MAX) {
        #[allow(clippy::cast_possible_truncation)]
        let n = exponent as i32;
        base.powi(n)
    } else {
        base.powf(exponent)
    }
}

fn check_domain(func: Func, arg: f64) -> Result<(), &'static str> {
    match func {
        Func::Ln | Func::Log10 if arg <= 0.0 => Err("logarithm of a non-positive number"),
        Func::Sqrt if arg < 0.0 => Err("square root of a negative number"),
        Func::Asin | Func::Acos if !(-1.0..=1.0).contains(&arg) => {
            Err("inverse sine/cosine argument outside [-1, 1]")
        }
        Func::Tan if arg.cos() == 0.0 => Err("tangent pole"),
        _ => Ok(()),
    }
}
