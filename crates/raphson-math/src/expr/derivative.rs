//! Symbolic differentiation with respect to `x`.
//!
//! Rules are applied structurally and the result is tidied by the smart
//! constructors below (constant folding and the `0`/`1` identities). The
//! tidying keeps printed derivatives readable; it is not a simplifier.

use super::{Expr, Func};

impl Expr {
    /// Returns `d/dx` of this expression.
    ///
    /// # Example
    ///
    /// ```rust
    /// use raphson_math::expr::parse;
    ///
    /// let expr = parse("x^2 - 4").unwrap();
    /// assert_eq!(expr.derivative().to_string(), "2*x");
    /// ```
    pub fn derivative(&self) -> Expr {
        match self {
            Self::Number(_) | Self::Constant(_) => num(0.0),
            Self::Variable => num(1.0),
            Self::Neg(a) => neg(a.derivative()),
            Self::Add(a, b) => add(a.derivative(), b.derivative()),
            Self::Sub(a, b) => sub(a.derivative(), b.derivative()),
            Self::Mul(a, b) => add(
                mul(a.derivative(), (**b).clone()),
                mul((**a).clone(), b.derivative()),
            ),
            Self::Div(a, b) => div(
                sub(
                    mul(a.derivative(), (**b).clone()),
                    mul((**a).clone(), b.derivative()),
                ),
                pow((**b).clone(), num(2.0)),
            ),
            Self::Pow(a, b) => power_rule(a, b),
            Self::Call(func, a) => mul(outer_derivative(*func, a), a.derivative()),
        }
    }
}

fn power_rule(base: &Expr, exponent: &Expr) -> Expr {
    let u = base.clone();
    let v = fold_numeric(exponent);

    if !exponent.depends_on_x() {
        // d(u^c) = c * u^(c - 1) * u'
        return mul(
            mul(v.clone(), pow(u, sub(v, num(1.0)))),
            base.derivative(),
        );
    }

    if !base.depends_on_x() {
        // d(c^v) = c^v * ln(c) * v'
        return mul(
            mul(pow(u.clone(), v), call(Func::Ln, u)),
            exponent.derivative(),
        );
    }

    // d(u^v) = u^v * (v' * ln(u) + v * u' / u)
    mul(
        pow(u.clone(), v.clone()),
        add(
            mul(exponent.derivative(), call(Func::Ln, u.clone())),
            div(mul(v, base.derivative()), u),
        ),
    )
}

/// `f'(u)` for the outer function, before the chain-rule factor `u'`.
fn outer_derivative(func: Func, arg: &Expr) -> Expr {
    let u = arg.clone();
    match func {
        Func::Sin => call(Func::Cos, u),
        Func::Cos => neg(call(Func::Sin, u)),
        Func::Tan => div(num(1.0), pow(call(Func::Cos, u), num(2.0))),
        Func::Asin => div(
            num(1.0),
            call(Func::Sqrt, sub(num(1.0), pow(u, num(2.0)))),
        ),
        Func::Acos => neg(div(
            num(1.0),
            call(Func::Sqrt, sub(num(1.0), pow(u, num(2.0)))),
        )),
        Func::Atan => div(num(1.0), add(num(1.0), pow(u, num(2.0)))),
        Func::Sinh => call(Func::Cosh, u),
        Func::Cosh => call(Func::Sinh, u),
        Func::Tanh => div(num(1.0), pow(call(Func::Cosh, u), num(2.0))),
        Func::Exp => call(Func::Exp, u),
        Func::Ln => div(num(1.0), u),
        Func::Log10 => div(num(1.0), mul(u, call(Func::Ln, num(10.0)))),
        Func::Sqrt => div(num(1.0), mul(num(2.0), call(Func::Sqrt, u))),
        Func::Abs => div(u.clone(), call(Func::Abs, u)),
    }
}

fn num(n: f64) -> Expr {
    Expr::Number(n)
}

/// Whether `e` is built from number literals and arithmetic only.
fn is_numeric(e: &Expr) -> bool {
    match e {
        Expr::Number(_) => true,
        Expr::Variable | Expr::Constant(_) | Expr::Call(..) => false,
        Expr::Neg(a) => is_numeric(a),
        Expr::Add(a, b)
        | Expr::Sub(a, b)
        | Expr::Mul(a, b)
        | Expr::Div(a, b)
        | Expr::Pow(a, b) => is_numeric(a) && is_numeric(b),
    }
}

/// Collapses literal arithmetic such as `1/2` to a single number.
/// Named constants and function calls are left symbolic.
fn fold_numeric(e: &Expr) -> Expr {
    if is_numeric(e) {
        let value = e.eval(0.0);
        if value.is_finite() {
            return num(value);
        }
    }
    e.clone()
}

fn as_number(e: &Expr) -> Option<f64> {
    match e {
        Expr::Number(n) => Some(*n),
        _ => None,
    }
}

fn call(func: Func, arg: Expr) -> Expr {
    Expr::Call(func, Box::new(arg))
}

fn neg(a: Expr) -> Expr {
    match a {
        Expr::Number(n) => num(-n),
        Expr::Neg(inner) => *inner,
        other => Expr::Neg(Box::new(other)),
    }
}

fn add(a: Expr, b: Expr) -> Expr {
    match (as_number(&a), as_number(&b)) {
        (Some(x), Some(y)) => num(x + y),
        (Some(x), None) if x == 0.0 => b,
        (None, Some(y)) if y == 0.0 => a,
        _ => match b {
            Expr::Neg(inner) => sub(a, *inner),
            b => Expr::Add(Box::new(a), Box::new(b)),
        },
    }
}

fn sub(a: Expr, b: Expr) -> Expr {
    match (as_number(&a), as_number(&b)) {
        (Some(x), Some(y)) => num(x - y),
        (Some(x), None) if x == 0.0 => neg(b),
        (None, Some(y)) if y == 0.0 => a,
        _ => match b {
            Expr::Neg(inner) => add(a, *inner),
            b => Expr::Sub(Box::new(a), Box::new(b)),
        },
    }
}

fn mul(a: Expr, b: Expr) -> Expr {
    match (as_number(&a), as_number(&b)) {
        (Some(x), Some(y)) => num(x * y),
        (Some(x), _) | (_, Some(x)) if x == 0.0 => num(0.0),
        (Some(x), None) if x == 1.0 => b,
        (None, Some(y)) if y == 1.0 => a,
        (Some(x), None) if x == -1.0 => neg(b),
        (None, Some(y)) if y == -1.0 => neg(a),
        // Keep numeric factors in front: u * 3 -> 3*u.
        (None, Some(_)) => mul(b, a),
        _ => match (a, b) {
            (Expr::Neg(a), b) => neg(mul(*a, b)),
            (a, Expr::Neg(b)) => neg(mul(a, *b)),
            (a, b) => Expr::Mul(Box::new(a), Box::new(b)),
        },
    }
}

fn div(a: Expr, b: Expr) -> Expr {
    match (as_number(&a), as_number(&b)) {
        (Some(x), Some(y)) if y != 0.0 => num(x / y),
        (Some(x), _) if x == 0.0 => num(0.0),
        (None, Some(y)) if y == 1.0 => a,
        _ => match (a, b) {
            (a, b) if a == b => num(1.0),
            (Expr::Neg(a), b) => neg(div(*a, b)),
            (a, b) => Expr::Div(Box::new(a), Box::new(b)),
        },
    }
}

fn pow(a: Expr, b: Expr) -> Expr {
    match (as_number(&a), as_number(&b)) {
        (Some(x), Some(y)) => num(x.powf(y)),
        (_, Some(y)) if y == 0.0 => num(1.0),
        (_, Some(y)) if y == 1.0 => a,
        _ => Expr::Pow(Box::new(a), Box::new(b)),
    }
}
