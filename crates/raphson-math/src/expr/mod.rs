//! Single-variable expressions: parsing, evaluation and differentiation.
//!
//! This module supplies the callables the solver consumes. A source string
//! such as `"x^2 - 4"` becomes an [`Expr`] tree which can be evaluated at a
//! point and differentiated symbolically with respect to `x`.
//!
//! # Syntax
//!
//! | Element | Forms |
//! |---------|-------|
//! | Variable | `x` |
//! | Numbers | `3`, `0.25`, `.5`, `1e-6` |
//! | Operators | `+ - * /`, `^` or `**` |
//! | Constants | `pi`, `e` |
//! | Functions | `sin cos tan asin acos atan sinh cosh tanh exp log ln log10 sqrt abs` |
//!
//! `log` is the natural logarithm.
//!
//! # Example
//!
//! ```rust
//! use raphson_math::expr::{differentiate, evaluate, parse};
//!
//! let expr = parse("x^3 + sin(x)").unwrap();
//! assert_eq!(expr.derivative().to_string(), "3*x^2 + cos(x)");
//!
//! let df = differentiate("x^2 - 4").unwrap();
//! assert_eq!(df(3.0), 6.0);
//!
//! assert!(evaluate("1 / x", 0.0).is_err());
//! ```

mod derivative;
mod display;
mod eval;
mod parser;

pub use parser::{parse, MAX_DEPTH};

use thiserror::Error;

use crate::error::MathResult;

/// Errors from parsing or checked evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExprError {
    /// The source is not a valid expression.
    #[error("Parse error at position {position}: {message}")]
    Parse {
        /// Byte offset of the offending token.
        position: usize,
        /// What went wrong.
        message: String,
    },

    /// The expression has no finite value at `x`.
    #[error("Cannot evaluate at x = {x}: {reason}")]
    Evaluation {
        /// The evaluation point.
        x: f64,
        /// Division by zero, domain error or overflow.
        reason: String,
    },
}

/// Named mathematical constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constant {
    /// π
    Pi,
    /// Euler's number.
    E,
}

impl Constant {
    /// Numeric value.
    pub fn value(self) -> f64 {
        match self {
            Self::Pi => std::f64::consts::PI,
            Self::E => std::f64::consts::E,
        }
    }

    /// Source name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Pi => "pi",
            Self::E => "e",
        }
    }
}

/// Built-in single-argument functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Func {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Exp,
    Ln,
    Log10,
    Sqrt,
    Abs,
}

impl Func {
    /// Looks up a function by its source name.
    pub fn from_name(name: &str) -> Option<Self> {
        let func = match name {
            "sin" => Self::Sin,
            "cos" => Self::Cos,
            "tan" => Self::Tan,
            "asin" => Self::Asin,
            "acos" => Self::Acos,
            "atan" => Self::Atan,
            "sinh" => Self::Sinh,
            "cosh" => Self::Cosh,
            "tanh" => Self::Tanh,
            "exp" => Self::Exp,
            "log" | "ln" => Self::Ln,
            "log10" => Self::Log10,
            "sqrt" => Self::Sqrt,
            "abs" => Self::Abs,
            _ => return None,
        };
        Some(func)
    }

    /// Name used when printing.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Asin => "asin",
            Self::Acos => "acos",
            Self::Atan => "atan",
            Self::Sinh => "sinh",
            Self::Cosh => "cosh",
            Self::Tanh => "tanh",
            Self::Exp => "exp",
            Self::Ln => "log",
            Self::Log10 => "log10",
            Self::Sqrt => "sqrt",
            Self::Abs => "abs",
        }
    }

    /// Applies the function with IEEE semantics.
    pub fn apply(self, v: f64) -> f64 {
        match self {
            Self::Sin => v.sin(),
            Self::Cos => v.cos(),
            Self::Tan => v.tan(),
            Self::Asin => v.asin(),
            Self::Acos => v.acos(),
            Self::Atan => v.atan(),
            Self::Sinh => v.sinh(),
            Self::Cosh => v.cosh(),
            Self::Tanh => v.tanh(),
            Self::Exp => v.exp(),
            Self::Ln => v.ln(),
            Self::Log10 => v.log10(),
            Self::Sqrt => v.sqrt(),
            Self::Abs => v.abs(),
        }
    }
}

/// Expression tree in the single variable `x`.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal.
    Number(f64),
    /// The variable `x`.
    Variable,
    /// Named constant.
    Constant(Constant),
    /// Negation.
    Neg(Box<Expr>),
    /// Sum.
    Add(Box<Expr>, Box<Expr>),
    /// Difference.
    Sub(Box<Expr>, Box<Expr>),
    /// Product.
    Mul(Box<Expr>, Box<Expr>),
    /// Quotient.
    Div(Box<Expr>, Box<Expr>),
    /// Power.
    Pow(Box<Expr>, Box<Expr>),
    /// Function application.
    Call(Func, Box<Expr>),
}

impl Expr {
    /// Returns true if `x` occurs anywhere in the tree.
    pub fn depends_on_x(&self) -> bool {
        match self {
            Self::Number(_) | Self::Constant(_) => false,
            Self::Variable => true,
            Self::Neg(a) | Self::Call(_, a) => a.depends_on_x(),
            Self::Add(a, b)
            | Self::Sub(a, b)
            | Self::Mul(a, b)
            | Self::Div(a, b)
            | Self::Pow(a, b) => a.depends_on_x() || b.depends_on_x(),
        }
    }
}

/// A parsed function together with its symbolic derivative.
///
/// # Example
///
/// ```rust
/// use raphson_math::expr::Function;
///
/// let f = Function::parse("exp(x) - 2").unwrap();
/// assert_eq!(f.derivative().to_string(), "exp(x)");
/// assert_eq!(f.slope(0.0), 1.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    source: String,
    expression: Expr,
    derivative: Expr,
}

impl Function {
    /// Parses `source` and derives it symbolically.
    pub fn parse(source: &str) -> Result<Self, ExprError> {
        let expression = parse(source)?;
        let derivative = expression.derivative();
        Ok(Self {
            source: source.trim().to_string(),
            expression,
            derivative,
        })
    }

    /// Parses `source` and uses a caller-supplied derivative instead.
    pub fn with_derivative(source: &str, derivative: &str) -> Result<Self, ExprError> {
        Ok(Self {
            source: source.trim().to_string(),
            expression: parse(source)?,
            derivative: parse(derivative)?,
        })
    }

    /// The source text, trimmed.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The parsed expression.
    pub fn expression(&self) -> &Expr {
        &self.expression
    }

    /// The derivative expression.
    pub fn derivative(&self) -> &Expr {
        &self.derivative
    }

    /// `f(x)`, NaN or infinite where undefined.
    pub fn value(&self, x: f64) -> f64 {
        self.expression.eval(x)
    }

    /// `f'(x)`, NaN or infinite where undefined.
    pub fn slope(&self, x: f64) -> f64 {
        self.derivative.eval(x)
    }

    /// `f(x)`, failing where the function is undefined.
    pub fn try_value(&self, x: f64) -> Result<f64, ExprError> {
        self.expression.try_eval(x)
    }
}

/// Parses `expression` and returns its derivative as a callable.
///
/// # Errors
///
/// Returns [`MathError::Expression`](crate::MathError::Expression) if the
/// expression does not parse.
pub fn differentiate(expression: &str) -> MathResult<impl Fn(f64) -> f64 + Send + Sync> {
    let derivative = parse(expression)?.derivative();
    Ok(move |x: f64| derivative.eval(x))
}

/// Parses `expression` and evaluates it at `x`.
///
/// # Errors
///
/// Fails if the expression does not parse or has no finite value at `x`.
pub fn evaluate(expression: &str, x: f64) -> MathResult<f64> {
    Ok(parse(expression)?.try_eval(x)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_function_parse_and_derive() {
        let f = Function::parse("  x^2 - 4 ").unwrap();
        assert_eq!(f.source(), "x^2 - 4");
        assert_eq!(f.derivative().to_string(), "2*x");
        assert_relative_eq!(f.value(3.0), 5.0);
        assert_relative_eq!(f.slope(3.0), 6.0);
    }

    #[test]
    fn test_function_with_derivative() {
        let f = Function::with_derivative("x^3", "3*x^2").unwrap();
        assert_relative_eq!(f.slope(2.0), 12.0);
        assert!(Function::with_derivative("x^3", "3*").is_err());
    }

    #[test]
    fn test_try_value() {
        let f = Function::parse("log(x)").unwrap();
        assert!(f.try_value(-1.0).is_err());
        assert!(f.value(-1.0).is_nan());
        assert_relative_eq!(f.try_value(1.0).unwrap(), 0.0);
    }

    #[test]
    fn test_differentiate_callable() {
        let df = differentiate("sin(x) + x^2").unwrap();
        assert_relative_eq!(df(0.0), 1.0);
        assert_relative_eq!(df(1.0), 1.0_f64.cos() + 2.0, epsilon = 1e-12);

        assert!(differentiate("sin(").is_err());
    }

    #[test]
    fn test_evaluate() {
        assert_relative_eq!(evaluate("x^2 - 4", 3.0).unwrap(), 5.0);
        assert!(matches!(
            evaluate("1 / (x - 2)", 2.0),
            Err(crate::MathError::Expression(ExprError::Evaluation { .. }))
        ));
        assert!(matches!(
            evaluate("x +", 2.0),
            Err(crate::MathError::Expression(ExprError::Parse { .. }))
        ));
    }

    #[test]
    fn test_depends_on_x() {
        assert!(parse("sin(2*x)").unwrap().depends_on_x());
        assert!(!parse("pi^2 + e").unwrap().depends_on_x());
    }

    #[test]
    fn test_func_names_round_trip() {
        for name in [
            "sin", "cos", "tan", "asin", "acos", "atan", "sinh", "cosh", "tanh", "exp", "log",
            "log10", "sqrt", "abs",
        ] {
            let func = Func::from_name(name).unwrap();
            assert_eq!(func.name(), name);
        }
        assert_eq!(Func::from_name("ln"), Some(Func::Ln));
        assert_eq!(Func::from_name("cot"), None);
    }
}
