use std::fmt;

use crate::core::cas::EvalError;
use crate::core::geometry::numeric::NumericError;
use crate::core::geometry::TensorError;
use crate::core::lexer::LexerError;
use crate::core::lowering::LowerError;
use crate::core::parser::ParserError;

#[derive(Debug)]
pub enum CoreError {
    Lex(LexerError),
    Parse(ParserError),
    Lower(LowerError),
    Tensor(TensorError),
    Eval(EvalError),
    Numeric(NumericError),
    /// A metric component written as text failed to compile.
    Component { row: usize, col: usize, text: String, error: Box<CoreError> },
}

impl CoreError {
    /// Source line and column for front-end errors.
    pub fn location(&self) -> Option<(usize, usize)> {
        match self {
            CoreError::Lex(e) => Some(e.position()),
            CoreError::Parse(e) => Some((e.line, e.column)),
            CoreError::Lower(e) => Some(e.position()),
            CoreError::Component { error, .. } => error.location(),
            _ => None,
        }
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::Lex(e) => write!(f, "Lexing error: {}", e),
            CoreError::Parse(e) => write!(f, "Parsing error: {}", e),
            CoreError::Lower(e) => write!(f, "Expression error: {}", e),
            CoreError::Tensor(e) => write!(f, "Tensor error: {}", e),
            CoreError::Eval(e) => write!(f, "Evaluation error: {}", e),
            CoreError::Numeric(e) => write!(f, "Numeric error: {}", e),
            CoreError::Component { row, col, error, .. } => write!(f, "in component g[{}][{}]: {}", row, col, error),
        }
    }
}

impl std::error::Error for CoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CoreError::Lex(e) => Some(e),
            CoreError::Parse(e) => Some(e),
            CoreError::Lower(e) => Some(e),
            CoreError::Tensor(e) => Some(e),
            CoreError::Eval(e) => Some(e),
            CoreError::Numeric(e) => Some(e),
            CoreError::Component { error, .. } => Some(error.as_ref()),
        }
    }
}

impl From<LexerError> for CoreError {
    fn from(e: LexerError) -> Self { CoreError::Lex(e) }
}
impl From<ParserError> for CoreError {
    fn from(e: ParserError) -> Self { CoreError::Parse(e) }
}
impl From<LowerError> for CoreError {
    fn from(e: LowerError) -> Self { CoreError::Lower(e) }
}
impl From<TensorError> for CoreError {
    fn from(e: TensorError) -> Self { CoreError::Tensor(e) }
}
impl From<EvalError> for CoreError {
    fn from(e: EvalError) -> Self { CoreError::Eval(e) }
}
impl From<NumericError> for CoreError {
    fn from(e: NumericError) -> Self { CoreError::Numeric(e) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test] fn test_lex_error() {
        let err = CoreError::from(LexerError::UnexpectedCharacter('$', 1, 3));
        assert_eq!(format!("{}", err), "Lexing error: Unexpected character '$' at 1:3");
        assert_eq!(err.location(), Some((1, 3)));
    }
    #[test] fn test_parse_error() {
        let err = CoreError::from(ParserError { message: "Expected ')'".into(), line: 2, column: 7 });
        assert_eq!(format!("{}", err), "Parsing error: Expected ')' at 2:7");
        assert_eq!(err.location(), Some((2, 7)));
    }
    #[test] fn test_tensor_error() {
        let err = CoreError::from(TensorError::Dimension { rows: 3, cols: 4 });
        assert_eq!(format!("{}", err), "Tensor error: metric must be 4x4, got 3x4");
        assert_eq!(err.location(), None);
    }
    #[test] fn test_component_error_keeps_inner_location() {
        let inner = CoreError::from(LexerError::UnexpectedCharacter('$', 1, 5));
        let err = CoreError::Component { row: 1, col: 1, text: "r + $".into(), error: Box::new(inner) };
        assert_eq!(err.location(), Some((1, 5)));
        assert_eq!(format!("{}", err), "in component g[1][1]: Lexing error: Unexpected character '$' at 1:5");
    }
    #[test] fn test_eval_error() {
        let err = CoreError::from(EvalError::Unbound("M".into()));
        assert_eq!(format!("{}", err), "Evaluation error: no numeric value bound for symbol 'M'");
    }
    #[test] fn test_numeric_error() {
        let err = CoreError::from(NumericError::Singular([0.0, 1.0, 0.0, 0.0]));
        assert_eq!(format!("{}", err), "Numeric error: metric is not invertible at [0.0, 1.0, 0.0, 0.0]");
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.location(), None);
    }
}
