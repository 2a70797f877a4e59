//! Infix rendering with minimal parentheses.

use std::fmt;

use super::Expr;

const ADDITIVE: u8 = 1;
const MULTIPLICATIVE: u8 = 2;
const UNARY: u8 = 3;
const POWER: u8 = 4;
const ATOM: u8 = 5;

impl Expr {
    fn precedence(&self) -> u8 {
        match self {
            Self::Add(..) | Self::Sub(..) => ADDITIVE,
            Self::Mul(..) | Self::Div(..) => MULTIPLICATIVE,
            Self::Neg(_) => UNARY,
            Self::Number(n) if *n < 0.0 => UNARY,
            Self::Pow(..) => POWER,
            Self::Number(_) | Self::Variable | Self::Constant(_) | Self::Call(..) => ATOM,
        }
    }
}

fn child(f: &mut fmt::Formatter<'_>, expr: &Expr, parens: bool) -> fmt::Result {
    if parens {
        write!(f, "({expr})")
    } else {
        write!(f, "{expr}")
    }
}

fn binary(
    f: &mut fmt::Formatter<'_>,
    lhs: &Expr,
    op: &str,
    rhs: &Expr,
    prec: u8,
    rhs_needs_strict: bool,
) -> fmt::Result {
    child(f, lhs, lhs.precedence() < prec)?;
    f.write_str(op)?;
    let rhs_parens = if rhs_needs_strict {
        rhs.precedence() <= prec
    } else {
        rhs.precedence() < prec
    };
    child(f, rhs, rhs_parens)
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Variable => f.write_str("x"),
            Self::Constant(c) => f.write_str(c.name()),
            Self::Neg(a) => {
                f.write_str("-")?;
                child(f, a, a.precedence() <= UNARY)
            }
            Self::Add(a, b) => binary(f, a, " + ", b, ADDITIVE, false),
            Self::Sub(a, b) => binary(f, a, " - ", b, ADDITIVE, true),
            Self::Mul(a, b) => binary(f, a, "*", b, MULTIPLICATIVE, false),
            Self::Div(a, b) => binary(f, a, "/", b, MULTIPLICATIVE, true),
            // Right associative: the base needs parentheses, the exponent only when looser.
            Self::Pow(a, b) => {
                child(f, a, a.precedence() <= POWER)?;
                f.write_str("^")?;
                child(f, b, b.precedence() < POWER)
            }
            Self::Call(func, a) => write!(f, "{}({a})", func.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::parse;

    fn round_trip(source: &str) -> String {
        parse(source).unwrap().to_string()
    }

    #[test]
    fn test_minimal_parentheses() {
        assert_eq!(round_trip("x^2 - 4"), "x^2 - 4");
        assert_eq!(round_trip("(x + 1)*(x - 1)"), "(x + 1)*(x - 1)");
        assert_eq!(round_trip("x - (x - 1)"), "x - (x - 1)");
        assert_eq!(round_trip("(x - 1) - x"), "x - 1 - x");
        assert_eq!(round_trip("x / (2 * x)"), "x/(2*x)");
        assert_eq!(round_trip("(x^2)^3"), "(x^2)^3");
        assert_eq!(round_trip("x^2^3"), "x^2^3");
        assert_eq!(round_trip("(-x)^2"), "(-x)^2");
        assert_eq!(round_trip("-x^2"), "-x^2");
        assert_eq!(round_trip("-(x + 1)"), "-(x + 1)");
        assert_eq!(round_trip("2^(-x)"), "2^(-x)");
    }

    #[test]
    fn test_atoms() {
        assert_eq!(round_trip("pi*e"), "pi*e");
        assert_eq!(round_trip("0.25"), "0.25");
        assert_eq!(round_trip("ln(x)"), "log(x)");
        assert_eq!(round_trip("sqrt(x + 1)"), "sqrt(x + 1)");
    }

    #[test]
    fn test_printed_form_reparses_to_same_value() {
        for source in ["x - (x - 1)/(x + 2)", "-(x^2 + 1)^-1", "2^-x*sin(x)", "x/(2*x)^3"] {
            let expr = parse(source).unwrap();
            let reparsed = parse(&expr.to_string()).unwrap();
            for x in [0.5, 1.5, 2.5] {
                assert!((expr.eval(x) - reparsed.eval(x)).abs() < 1e-12);
            }
        }
    }
}
