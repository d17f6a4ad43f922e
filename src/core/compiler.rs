// src/core/compiler.rs
//! Expression pipeline: lexing, parsing and lowering to an exact `Expr`.

use crate::core::{
    cas::Expr,
    error::CoreError,
    lexer::Lexer,
    lowering::Lowerer,
    parser::Parser,
};

/// Compile expression text with every identifier treated as a symbol.
pub fn compile_expr(source: &str) -> Result<Expr, CoreError> {
    compile_expr_with(source, &Lowerer::new())
}

pub fn compile_expr_with(source: &str, lowerer: &Lowerer) -> Result<Expr, CoreError> {
    let tokens = Lexer::new(source).tokenize()?;
    debug_log!("compile: {} tokens from {:?}", tokens.len(), source);
    let ast = Parser::new(tokens).parse()?;
    Ok(lowerer.lower(&ast)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compiles_component() {
        let e = compile_expr("r^2*sin(theta)^2").unwrap();
        let expected = Expr::symbol("r").pow(2) * Expr::sin(Expr::symbol("theta")).pow(2);
        assert_eq!(e, expected);
    }

    #[test]
    fn test_errors_are_wrapped_by_stage() {
        assert!(matches!(compile_expr("r $ 2"), Err(CoreError::Lex(_))));
        assert!(matches!(compile_expr("(r"), Err(CoreError::Parse(_))));
        assert!(matches!(compile_expr("foo(r)"), Err(CoreError::Lower(_))));
    }

    #[test]
    fn test_plain_output_reads_back() {
        let e = compile_expr("-(1 - 2*G*M/(c^2*r))").unwrap();
        let again = compile_expr(&e.to_string()).unwrap();
        assert!(again.equivalent(&e));
    }
}
