//! Lowering: AST -> exact symbolic `Expr`.
//!
//! Numbers are converted to exact rationals (`0.5` is `1/2`), calls map to
//! the elementary functions, and `^` requires an integer exponent.
//! Exponents are capped at [`MAX_EXPONENT`] so that no lowered expression
//! can push the exact arithmetic past its exponent range.

use std::collections::HashSet;
use std::fmt;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, ToPrimitive};

use crate::core::ast::ASTNode;
use crate::core::cas::{Expr, FuncKind};
use crate::core::token::TokenKind;

/// Largest power any atom may carry in a lowered expression.
pub const MAX_EXPONENT: u64 = 4096;

/// Largest decimal shift accepted in a number literal such as `1e300`.
const MAX_DECIMAL_SHIFT: u64 = 4096;

#[derive(Debug, Clone, PartialEq)]
pub enum LowerError {
    UnknownFunction { name: String, line: usize, column: usize },
    Arity { name: String, expected: usize, found: usize, line: usize, column: usize },
    NonIntegerExponent { line: usize, column: usize },
    ExponentRange { line: usize, column: usize },
    UnknownSymbol { name: String, line: usize, column: usize },
    InvalidNumber { text: String, line: usize, column: usize },
}

impl LowerError {
    pub fn position(&self) -> (usize, usize) {
        match self {
            LowerError::UnknownFunction { line, column, .. }
            | LowerError::Arity { line, column, .. }
            | LowerError::NonIntegerExponent { line, column }
            | LowerError::ExponentRange { line, column }
            | LowerError::UnknownSymbol { line, column, .. }
            | LowerError::InvalidNumber { line, column, .. } => (*line, *column),
        }
    }
}

impl fmt::Display for LowerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LowerError::UnknownFunction { name, line, column } => {
                write!(f, "Unknown function '{}' at {}:{}", name, line, column)
            }
            LowerError::Arity { name, expected, found, line, column } => write!(
                f,
                "Function '{}' takes {} argument(s) but {} were given at {}:{}",
                name, expected, found, line, column
            ),
            LowerError::NonIntegerExponent { line, column } => {
                write!(f, "Exponent must be an integer constant at {}:{}", line, column)
            }
            LowerError::ExponentRange { line, column } => write!(
                f,
                "Exponent exceeds the supported range of +/-{} at {}:{}",
                MAX_EXPONENT, line, column
            ),
            LowerError::UnknownSymbol { name, line, column } => {
                write!(f, "Unknown symbol '{}' at {}:{}", name, line, column)
            }
            LowerError::InvalidNumber { text, line, column } => {
                write!(f, "Invalid number literal '{}' at {}:{}", text, line, column)
            }
        }
    }
}

impl std::error::Error for LowerError {}

/// Turns parsed expressions into `Expr`s, optionally restricted to a fixed
/// set of symbol names.
#[derive(Debug, Clone, Default)]
pub struct Lowerer {
    symbols: Option<HashSet<String>>,
}

impl Lowerer {
    /// Accept every identifier as a symbol.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the given names are valid symbols.
    pub fn strict<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { symbols: Some(symbols.into_iter().map(Into::into).collect()) }
    }

    pub fn lower(&self, node: &ASTNode) -> Result<Expr, LowerError> {
        match node {
            ASTNode::NumberLiteral { text, line, column } => parse_exact(text)
                .map(Expr::from)
                .ok_or_else(|| LowerError::InvalidNumber { text: text.clone(), line: *line, column: *column }),
            ASTNode::Identifier { name, line, column } => {
                if let Some(known) = &self.symbols {
                    if !known.contains(name) {
                        return Err(LowerError::UnknownSymbol { name: name.clone(), line: *line, column: *column });
                    }
                }
                Ok(Expr::symbol(name.clone()))
            }
            ASTNode::UnaryExpr { op, expr } => {
                let inner = self.lower(expr)?;
                Ok(match op {
                    TokenKind::Minus => -inner,
                    _ => inner,
                })
            }
            ASTNode::BinaryExpr { op, left, right } => {
                let lhs = self.lower(left)?;
                if *op == TokenKind::Caret {
                    let exponent = self.lower(right)?;
                    let (line, column) = right.position();
                    let n = integer_exponent(&exponent, line, column)?;
                    let value = lhs.checked_pow(n).ok_or(LowerError::ExponentRange { line, column })?;
                    return bounded(value, line, column);
                }
                let rhs = self.lower(right)?;
                let value = match op {
                    TokenKind::Plus => lhs + rhs,
                    TokenKind::Minus => lhs - rhs,
                    TokenKind::Star => lhs * rhs,
                    _ => lhs / rhs,
                };
                let (line, column) = node.position();
                bounded(value, line, column)
            }
            ASTNode::Call { name, args, line, column } => self.lower_call(name, args, *line, *column),
        }
    }

    fn lower_call(&self, name: &str, args: &[ASTNode], line: usize, column: usize) -> Result<Expr, LowerError> {
        let tan = name == "tan";
        let kind = FuncKind::from_name(name);
        if kind.is_none() && !tan {
            return Err(LowerError::UnknownFunction { name: name.to_string(), line, column });
        }
        let [arg] = args else {
            return Err(LowerError::Arity { name: name.to_string(), expected: 1, found: args.len(), line, column });
        };
        let arg = self.lower(arg)?;
        Ok(match kind {
            Some(kind) => Expr::func(kind, arg),
            None => Expr::tan(arg),
        })
    }
}

fn integer_exponent(e: &Expr, line: usize, column: usize) -> Result<i64, LowerError> {
    let c = e
        .as_rational()
        .filter(|c| c.denom().is_one())
        .ok_or(LowerError::NonIntegerExponent { line, column })?;
    c.numer()
        .to_i64()
        .filter(|n| n.unsigned_abs() <= MAX_EXPONENT)
        .ok_or(LowerError::ExponentRange { line, column })
}

fn bounded(value: Expr, line: usize, column: usize) -> Result<Expr, LowerError> {
    if value.max_exponent() > MAX_EXPONENT {
        return Err(LowerError::ExponentRange { line, column });
    }
    Ok(value)
}

/// Exact value of `digits[.digits][e[+-]digits]`.
pub fn parse_exact(text: &str) -> Option<BigRational> {
    let (mantissa, exp) = match text.find(|c| c == 'e' || c == 'E') {
        Some(i) => (&text[..i], text[i + 1..].parse::<i64>().ok()?),
        None => (text, 0),
    };
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    let digits: BigInt = format!("{}{}", int_part, frac_part).parse().ok()?;
    let shift = exp.checked_sub(i64::try_from(frac_part.len()).ok()?)?;
    if shift.unsigned_abs() > MAX_DECIMAL_SHIFT {
        return None;
    }
    let scale = num_traits::pow(BigInt::from(10u8), usize::try_from(shift.unsigned_abs()).ok()?);
    Some(if shift >= 0 {
        BigRational::from_integer(digits * scale)
    } else {
        BigRational::new(digits, scale)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::lexer::Lexer;
    use crate::core::parser::Parser;

    fn lower_with(src: &str, lowerer: &Lowerer) -> Result<Expr, LowerError> {
        let tokens = Lexer::new(src).tokenize().unwrap();
        let ast = Parser::new(tokens).parse().unwrap();
        lowerer.lower(&ast)
    }

    fn lower(src: &str) -> Result<Expr, LowerError> {
        lower_with(src, &Lowerer::new())
    }

    #[test]
    fn decimals_are_exact() {
        assert_eq!(parse_exact("0.5"), Some(BigRational::new(1.into(), 2.into())));
        assert_eq!(parse_exact("1.25e2"), Some(BigRational::from_integer(125.into())));
        assert_eq!(parse_exact("3e-3"), Some(BigRational::new(3.into(), 1000.into())));
        assert_eq!(lower("0.1 + 0.2").unwrap(), Expr::rational(3, 10));
    }

    #[test]
    fn huge_decimal_shifts_are_rejected() {
        assert!(parse_exact("1e4096").is_some());
        assert_eq!(parse_exact("1e99999999999"), None);
        assert_eq!(parse_exact("2.5e-99999999999"), None);
        assert_eq!(
            lower("1e99999999999").unwrap_err(),
            LowerError::InvalidNumber { text: "1e99999999999".into(), line: 1, column: 1 }
        );
    }

    #[test]
    fn exponents_stay_in_range() {
        assert_eq!(lower("r^3000000000").unwrap_err(), LowerError::ExponentRange { line: 1, column: 3 });
        assert_eq!(lower("r^-3000000000").unwrap_err(), LowerError::ExponentRange { line: 1, column: 3 });
        assert_eq!(lower("(r^4096)^2").unwrap_err(), LowerError::ExponentRange { line: 1, column: 10 });
        assert!(matches!(lower("r^4096 * r"), Err(LowerError::ExponentRange { line: 1, column: 1 })));
        let top = lower("r^4096").unwrap();
        assert_eq!(top.max_exponent(), MAX_EXPONENT);
        assert!(lower("r^4096 / r").unwrap().equivalent(&Expr::symbol("r").pow(4095)));
    }

    #[test]
    fn builds_schwarzschild_component() {
        let e = lower("-(1 - 2*G*M/(c^2*r))").unwrap();
        let expected = -(Expr::one()
            - Expr::integer(2) * Expr::symbol("G") * Expr::symbol("M") / (Expr::symbol("c").pow(2) * Expr::symbol("r")));
        assert!(e.equivalent(&expected));
    }

    #[test]
    fn functions_and_powers() {
        let e = lower("sin(theta)**2 + cos(theta)^2").unwrap();
        assert!(e.is_one());
        assert!(lower("r^-1").unwrap().equivalent(&Expr::symbol("r").recip()));
        assert!(lower("tan(x)*cos(x)").unwrap().equivalent(&Expr::sin(Expr::symbol("x"))));
    }

    #[test]
    fn errors_carry_positions() {
        assert_eq!(
            lower("sqrt(r)").unwrap_err(),
            LowerError::UnknownFunction { name: "sqrt".into(), line: 1, column: 1 }
        );
        assert!(matches!(lower("sin(a, b)"), Err(LowerError::Arity { found: 2, .. })));
        assert_eq!(lower("r^0.5").unwrap_err(), LowerError::NonIntegerExponent { line: 1, column: 3 });
        let strict = Lowerer::strict(["r", "theta"]);
        assert_eq!(
            lower_with("r + M", &strict).unwrap_err(),
            LowerError::UnknownSymbol { name: "M".into(), line: 1, column: 5 }
        );
    }
}
