//! Recursive-descent parser for single-variable expressions.
//!
//! Grammar, loosest binding first:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | power
//! power   := primary (('^' | '**') unary)?
//! primary := number | 'x' | constant | function '(' expr ')' | '(' expr ')'
//! ```
//!
//! `-x^2` therefore reads as `-(x^2)` and `2^-x` as `2^(-x)`.
//!
//! Nesting is limited to [`MAX_DEPTH`] levels, both while parsing and in the
//! resulting tree, so evaluation and differentiation never recurse deeper.

use super::{Constant, Expr, ExprError, Func};

/// Deepest expression tree `parse` accepts.
pub const MAX_DEPTH: usize = 256;

const TOO_DEEP: &str = "expression nested too deeply";

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
    End,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Self::Number(n) => format!("number {n}"),
            Self::Ident(name) => format!("'{name}'"),
            Self::Plus => "'+'".to_string(),
            Self::Minus => "'-'".to_string(),
            Self::Star => "'*'".to_string(),
            Self::Slash => "'/'".to_string(),
            Self::Caret => "'^'".to_string(),
            Self::LParen => "'('".to_string(),
            Self::RParen => "')'".to_string(),
            Self::End => "end of input".to_string(),
        }
    }
}

fn parse_error(position: usize, message: impl Into<String>) -> ExprError {
    ExprError::Parse {
        position,
        message: message.into(),
    }
}

/// Splits the source into `(position, token)` pairs, ending with `End`.
fn tokenize(source: &str) -> Result<Vec<(usize, Token)>, ExprError> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        match c {
            b' ' | b'\t' | b'\n' | b'\r' => i += 1,
            b'+' => {
                tokens.push((i, Token::Plus));
                i += 1;
            }
            b'-' => {
                tokens.push((i, Token::Minus));
                i += 1;
            }
            b'*' if bytes.get(i + 1) == Some(&b'*') => {
                tokens.push((i, Token::Caret));
                i += 2;
            }
            b'*' => {
                tokens.push((i, Token::Star));
                i += 1;
            }
            b'/' => {
                tokens.push((i, Token::Slash));
                i += 1;
            }
            b'^' => {
                tokens.push((i, Token::Caret));
                i += 1;
            }
            b'(' => {
                tokens.push((i, Token::LParen));
                i += 1;
            }
            b')' => {
                tokens.push((i, Token::RParen));
                i += 1;
            }
            b'0'..=b'9' | b'.' => {
                let start = i;
                while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
                    i += 1;
                }
                // Exponent part, only when followed by digits (e.g. 1e-3, 2E5).
                if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
                    let mut j = i + 1;
                    if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
                        j += 1;
                    }
                    if j < bytes.len() && bytes[j].is_ascii_digit() {
                        while j < bytes.len() && bytes[j].is_ascii_digit() {
                            j += 1;
                        }
                        i = j;
                    }
                }
                let text = &source[start..i];
                let value = text
                    .parse::<f64>()
                    .map_err(|_| parse_error(start, format!("invalid number '{text}'")))?;
                tokens.push((start, Token::Number(value)));
            }
            c if c.is_ascii_alphabetic() || c == b'_' => {
                let start = i;
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                    i += 1;
                }
                tokens.push((start, Token::Ident(source[start..i].to_string())));
            }
            _ => {
                let ch = source[i..].chars().next().unwrap_or('?');
                return Err(parse_error(i, format!("unexpected character '{ch}'")));
            }
        }
    }

    tokens.push((source.len(), Token::End));
    Ok(tokens)
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos].1
    }

    fn position(&self) -> usize {
        self.tokens[self.pos].0
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].1.clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, expected: &Token) -> Result<(), ExprError> {
        if self.peek() == expected {
            self.advance();
            Ok(())
        } else {
            Err(parse_error(
                self.position(),
                format!(
                    "expected {}, found {}",
                    expected.describe(),
                    self.peek().describe()
                ),
            ))
        }
    }

    fn expr(&mut self) -> Result<Expr, ExprError> {
        let mut lhs = self.term()?;
        loop {
            match self.peek() {
                Token::Plus => {
                    self.advance();
                    lhs = Expr::Add(Box::new(lhs), Box::new(self.term()?));
                }
                Token::Minus => {
                    self.advance();
                    lhs = Expr::Sub(Box::new(lhs), Box::new(self.term()?));
                }
                _ => return Ok(lhs),
            }
        }
    }

    fn term(&mut self) -> Result<Expr, ExprError> {
        let mut lhs = self.unary()?;
        loop {
            match self.peek() {
                Token::Star => {
                    self.advance();
                    lhs = Expr::Mul(Box::new(lhs), Box::new(self.unary()?));
                }
                Token::Slash => {
                    self.advance();
                    lhs = Expr::Div(Box::new(lhs), Box::new(self.unary()?));
                }
                _ => return Ok(lhs),
            }
        }
    }

    fn unary(&mut self) -> Result<Expr, ExprError> {
        // Every recursive path (signs, parentheses, calls, exponents) passes here.
        if self.depth == MAX_DEPTH {
            return Err(parse_error(self.position(), TOO_DEEP));
        }
        self.depth += 1;
        let result = self.signed();
        self.depth -= 1;
        result
    }

    fn signed(&mut self) -> Result<Expr, ExprError> {
        match self.peek() {
            Token::Minus => {
                self.advance();
                Ok(Expr::Neg(Box::new(self.unary()?)))
            }
            Token::Plus => {
                self.advance();
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<Expr, ExprError> {
        let base = self.primary()?;
        if *self.peek() == Token::Caret {
            self.advance();
            let exponent = self.unary()?;
            return Ok(Expr::Pow(Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<Expr, ExprError> {
        let position = self.position();
        match self.advance() {
            Token::Number(n) => Ok(Expr::Number(n)),
            Token::LParen => {
                let inner = self.expr()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            Token::Ident(name) => self.identifier(&name, position),
            other => Err(parse_error(
                position,
                format!("expected a value, found {}", other.describe()),
            )),
        }
    }

    fn identifier(&mut self, name: &str, position: usize) -> Result<Expr, ExprError> {
        if let Some(func) = Func::from_name(name) {
            if *self.peek() != Token::LParen {
                return Err(parse_error(
                    self.position(),
                    format!("function '{name}' must be followed by '('"),
                ));
            }
            self.advance();
            let arg = self.expr()?;
            self.expect(&Token::RParen)?;
            return Ok(Expr::Call(func, Box::new(arg)));
        }

        match name {
            "x" => Ok(Expr::Variable),
            "pi" => Ok(Expr::Constant(Constant::Pi)),
            "e" => Ok(Expr::Constant(Constant::E)),
            _ if *self.peek() == Token::LParen => {
                Err(parse_error(position, format!("unknown function '{name}'")))
            }
            _ => Err(parse_error(
                position,
                format!("unknown identifier '{name}' (the variable is 'x')"),
            )),
        }
    }
}

/// Parses an expression in `x`.
///
/// # Errors
///
/// Returns [`ExprError::Parse`] with the byte offset of the offending token.
///
/// # Example
///
/// ```rust
/// use raphson_math::expr::parse;
///
/// let expr = parse("x**2 - 4").unwrap();
/// assert_eq!(expr.eval(3.0), 5.0);
/// ```
pub fn parse(source: &str) -> Result<Expr, ExprError> {
    let tokens = tokenize(source)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };

    if *parser.peek() == Token::End {
        return Err(parse_error(0, "empty expression"));
    }

    let expr = parser.expr()?;
    if *parser.peek() != Token::End {
        return Err(parse_error(
            parser.position(),
            format!("unexpected {}", parser.peek().describe()),
        ));
    }
    // Long operator chains nest without recursing in the parser.
    if tree_depth(&expr) > MAX_DEPTH {
        return Err(parse_error(0, TOO_DEEP));
    }
    Ok(expr)
}

/// Height of the tree, computed without recursion.
fn tree_depth(expr: &Expr) -> usize {
    let mut deepest = 0;
    let mut stack: Vec<(&Expr, usize)> = vec![(expr, 1)];
    while let Some((node, depth)) = stack.pop() {
        deepest = deepest.max(depth);
        match node {
            Expr::Number(_) | Expr::Variable | Expr::Constant(_) => {}
            Expr::Neg(inner) | Expr::Call(_, inner) => stack.push((&**inner, depth + 1)),
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => {
                stack.push((&**lhs, depth + 1));
                stack.push((&**rhs, depth + 1));
            }
        }
    }
    deepest
}
