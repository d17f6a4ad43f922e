//! Precedence parser for component expressions, with spanned errors.
//!
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('-' | '+') unary | power
//! power   := call (('^' | '**') unary)?      right-associative
//! call    := IDENT '(' args ')' | primary
//! primary := NUMBER | IDENT | '(' expr ')'

use crate::core::ast::ASTNode;
use crate::core::token::{Token, TokenKind};

#[derive(Debug, Clone, PartialEq)]
pub struct ParserError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for ParserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}:{}", self.message, self.line, self.column)
    }
}

impl std::error::Error for ParserError {}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Create new parser instance; ensure trailing EOF token present
    pub fn new(mut tokens: Vec<Token>) -> Self {
        let needs_eof = match tokens.last() {
            Some(t) => !matches!(t.kind, TokenKind::EOF),
            None => true,
        };
        if needs_eof {
            let (line, column) = tokens.last().map(|t| (t.line, t.column + t.lexeme.chars().count())).unwrap_or((1, 1));
            tokens.push(Token::new(TokenKind::EOF, String::new(), line, column));
        }
        Parser { tokens, pos: 0 }
    }

    /// Parses exactly one expression spanning the whole input.
    pub fn parse(&mut self) -> Result<ASTNode, ParserError> {
        if self.is_at_end() {
            return Err(self.err_here("Expected an expression"));
        }
        let expr = self.parse_expression()?;
        if !self.is_at_end() {
            let tok = self.peek();
            return Err(self.err_at(&format!("Unexpected token '{}' after expression", tok.lexeme), tok.line, tok.column));
        }
        Ok(expr)
    }

    fn parse_expression(&mut self) -> Result<ASTNode, ParserError> {
        self.parse_term()
    }

    fn parse_term(&mut self) -> Result<ASTNode, ParserError> {
        let mut expr = self.parse_factor()?;
        while self.match_token(&[TokenKind::Plus, TokenKind::Minus]) {
            let op = self.previous().kind.clone();
            let right = self.parse_factor()?;
            expr = ASTNode::new_binary_expr(op, expr, right);
        }
        Ok(expr)
    }

    fn parse_factor(&mut self) -> Result<ASTNode, ParserError> {
        let mut expr = self.parse_unary()?;
        while self.match_token(&[TokenKind::Star, TokenKind::Slash]) {
            let op = self.previous().kind.clone();
            let right = self.parse_unary()?;
            expr = ASTNode::new_binary_expr(op, expr, right);
        }
        Ok(expr)
    }

    fn parse_unary(&mut self) -> Result<ASTNode, ParserError> {
        if self.match_token(&[TokenKind::Minus, TokenKind::Plus]) {
            let op = self.previous().kind.clone();
            let right = self.parse_unary()?;
            return Ok(ASTNode::new_unary_expr(op, right));
        }
        self.parse_power()
    }

    // -x^2 is -(x^2); x^-1 and x^y^z (= x^(y^z)) are accepted
    fn parse_power(&mut self) -> Result<ASTNode, ParserError> {
        let base = self.parse_call()?;
        if self.match_token(&[TokenKind::Caret, TokenKind::StarStar]) {
            let exponent = self.parse_unary()?;
            return Ok(ASTNode::new_binary_expr(TokenKind::Caret, base, exponent));
        }
        Ok(base)
    }

    fn parse_call(&mut self) -> Result<ASTNode, ParserError> {
        let is_call = matches!(self.peek().kind, TokenKind::Identifier(_))
            && matches!(self.peek_next().map(|t| &t.kind), Some(TokenKind::OpenParen));
        if !is_call {
            return self.parse_primary();
        }
        let name_tok = self.advance().clone();
        self.consume(TokenKind::OpenParen, "Expected '(' after function name")?;
        let mut args = Vec::new();
        if !self.check(&TokenKind::CloseParen) {
            loop {
                args.push(self.parse_expression()?);
                if !self.match_token(&[TokenKind::Comma]) {
                    break;
                }
            }
        }
        self.consume(TokenKind::CloseParen, "Expected ')' after arguments")?;
        Ok(ASTNode::new_call_at(&name_tok.lexeme, args, name_tok.line, name_tok.column))
    }

    fn parse_primary(&mut self) -> Result<ASTNode, ParserError> {
        let tok = self.advance().clone();
        match tok.kind {
            TokenKind::NumberLiteral(text) => Ok(ASTNode::new_number_at(&text, tok.line, tok.column)),
            TokenKind::Identifier(name) => Ok(ASTNode::new_identifier_at(&name, tok.line, tok.column)),
            TokenKind::OpenParen => {
                let expr = self.parse_expression()?;
                self.consume(TokenKind::CloseParen, "Expected ')'")?;
                Ok(expr)
            }
            TokenKind::EOF => Err(self.err_at("Unexpected end of input", tok.line, tok.column)),
            other => Err(self.err_at(&format!("Unexpected token '{}'", other), tok.line, tok.column)),
        }
    }

    /* ── Token utils ─────────────────────────────────────── */
    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.pos += 1;
            return self.previous();
        }
        self.peek()
    }

    fn previous(&self) -> &Token {
        if self.pos == 0 {
            &self.tokens[0]
        } else {
            &self.tokens[self.pos - 1]
        }
    }

    fn peek(&self) -> &Token {
        // Safe: we ensure there's always an EOF at the end
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_next(&self) -> Option<&Token> {
        self.tokens.get(self.pos + 1)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        !self.is_at_end() && &self.peek().kind == kind
    }

    fn match_token(&mut self, kinds: &[TokenKind]) -> bool {
        for kind in kinds {
            if self.check(kind) {
                self.advance();
                return true;
            }
        }
        false
    }

    fn consume(&mut self, kind: TokenKind, msg: &str) -> Result<&Token, ParserError> {
        if self.check(&kind) {
            Ok(self.advance())
        } else {
            Err(self.err_at(msg, self.peek().line, self.peek().column))
        }
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::EOF)
    }

    fn err_here(&self, msg: &str) -> ParserError {
        self.err_at(msg, self.peek().line, self.peek().column)
    }

    fn err_at(&self, msg: &str, line: usize, column: usize) -> ParserError {
        ParserError {
            message: msg.into(),
            line,
            column,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::lexer::Lexer;

    fn parse(src: &str) -> Result<ASTNode, ParserError> {
        let tokens = Lexer::new(src).tokenize().expect("lexes");
        Parser::new(tokens).parse()
    }

    #[test]
    fn power_binds_tighter_than_unary_minus() {
        let node = parse("-r^2").unwrap();
        match node {
            ASTNode::UnaryExpr { op: TokenKind::Minus, expr } => {
                assert!(matches!(*expr, ASTNode::BinaryExpr { op: TokenKind::Caret, .. }));
            }
            other => panic!("unexpected tree {:?}", other),
        }
    }

    #[test]
    fn power_is_right_associative() {
        let node = parse("a^b**c").unwrap();
        let ASTNode::BinaryExpr { op: TokenKind::Caret, right, .. } = node else {
            panic!("expected power");
        };
        assert!(matches!(*right, ASTNode::BinaryExpr { op: TokenKind::Caret, .. }));
    }

    #[test]
    fn calls_take_argument_lists() {
        let node = parse("sin(theta)^2").unwrap();
        let ASTNode::BinaryExpr { left, .. } = node else {
            panic!("expected power");
        };
        assert!(matches!(*left, ASTNode::Call { ref name, ref args, .. } if name == "sin" && args.len() == 1));
    }

    #[test]
    fn trailing_tokens_are_rejected() {
        let err = parse("r r").unwrap_err();
        assert_eq!(err.line, 1);
        assert_eq!(err.column, 3);
    }

    #[test]
    fn missing_paren_reports_location() {
        let err = parse("(1 - 2*M/r").unwrap_err();
        assert_eq!(err.message, "Expected ')'");
        assert_eq!((err.line, err.column), (1, 11));
        assert!(parse("").is_err());
    }
}
