// lexer.rs

use std::fmt;
use unicode_ident::{is_xid_continue, is_xid_start};
use unicode_normalization::UnicodeNormalization;

use crate::core::token::{Token, TokenKind};

/// Lexer error types with detailed location.
#[derive(Debug, Clone, PartialEq)]
pub enum LexerError {
    UnexpectedCharacter(char, usize, usize),
    InvalidNumber(String, usize, usize),
}

impl LexerError {
    pub fn position(&self) -> (usize, usize) {
        match self {
            LexerError::UnexpectedCharacter(_, line, col) | LexerError::InvalidNumber(_, line, col) => (*line, *col),
        }
    }
}

impl fmt::Display for LexerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use LexerError::*;
        match self {
            UnexpectedCharacter(ch, line, col) => write!(f, "Unexpected character '{}' at {}:{}", ch, line, col),
            InvalidNumber(num, line, col) => write!(f, "Invalid number literal '{}' at {}:{}", num, line, col),
        }
    }
}
impl std::error::Error for LexerError {}

/// Expression lexer over NFC-normalized input.
pub struct Lexer {
    chars: Vec<char>,
    index: usize,
    current: Option<char>,
    line: usize,
    col: usize,
    consumed_eof: bool, // Prevent repeated EOF tokens
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        let chars: Vec<char> = input.nfc().collect();
        Self {
            chars,
            index: 0,
            current: None,
            line: 1,
            col: 0,
            consumed_eof: false,
        }
        .init_first_char()
    }

    #[inline]
    fn init_first_char(mut self) -> Self {
        self.current = self.chars.first().copied();
        if self.current.is_some() {
            self.col = 1;
        }
        self
    }

    #[inline]
    fn pos(&self) -> (usize, usize) {
        (self.line, self.col)
    }

    #[inline]
    fn advance_char(&mut self) {
        let leaving = self.current;
        self.index += 1;
        self.current = self.chars.get(self.index).copied();
        if leaving == Some('\n') {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
    }

    #[inline]
    fn peek_char(&self) -> Option<char> {
        self.chars.get(self.index + 1).copied()
    }

    pub fn next_token(&mut self) -> Result<Option<Token>, LexerError> {
        if self.consumed_eof {
            return Ok(None);
        }

        loop {
            let Some(ch) = self.current else {
                self.consumed_eof = true;
                let (line, col) = self.pos();
                return Ok(Some(Token::new(TokenKind::EOF, String::new(), line, col)));
            };

            if ch == '#' {
                self.lex_line_comment();
                continue;
            }
            if is_safe_whitespace(ch) {
                self.advance_char();
                continue;
            }

            let (line, col) = self.pos();
            if ch == '*' && self.peek_char() == Some('*') {
                self.advance_char();
                self.advance_char();
                return Ok(Some(Token::new(TokenKind::StarStar, "**".into(), line, col)));
            }
            if let Some(kind) = match_single_char_token(ch) {
                self.advance_char();
                return Ok(Some(Token::new(kind, ch.to_string(), line, col)));
            }
            if ch.is_ascii_digit() || (ch == '.' && self.peek_char().is_some_and(|c| c.is_ascii_digit())) {
                return self.lex_number().map(Some);
            }
            if is_identifier_start(ch) {
                return Ok(Some(self.lex_identifier()));
            }
            return Err(LexerError::UnexpectedCharacter(ch, line, col));
        }
    }

    /// Tokenizes entire source input, ending with a single EOF token.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexerError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            let is_eof = matches!(token.kind, TokenKind::EOF);
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    fn lex_line_comment(&mut self) {
        while let Some(ch) = self.current {
            if ch == '\n' {
                break;
            }
            self.advance_char();
        }
    }

    /// `digits [. digits] [(e|E) [+|-] digits]`
    fn lex_number(&mut self) -> Result<Token, LexerError> {
        let (line, col) = self.pos();
        let mut num_str = String::new();
        let mut has_decimal = false;
        while let Some(ch) = self.current {
            if ch.is_ascii_digit() {
                num_str.push(ch);
                self.advance_char();
            } else if ch == '.' && !has_decimal {
                has_decimal = true;
                num_str.push(ch);
                self.advance_char();
            } else {
                break;
            }
        }
        if matches!(self.current, Some('e' | 'E')) {
            let after = self.peek_char();
            let signed = matches!(after, Some('+' | '-'))
                && self.chars.get(self.index + 2).is_some_and(|c| c.is_ascii_digit());
            if after.is_some_and(|c| c.is_ascii_digit()) || signed {
                num_str.push('e');
                self.advance_char();
                if signed {
                    num_str.push(self.current.unwrap_or('+'));
                    self.advance_char();
                }
                while let Some(ch) = self.current.filter(|c| c.is_ascii_digit()) {
                    num_str.push(ch);
                    self.advance_char();
                }
            }
        }
        if num_str.ends_with('.') || num_str.matches('.').count() > 1 {
            return Err(LexerError::InvalidNumber(num_str, line, col));
        }
        Ok(Token::new(TokenKind::NumberLiteral(num_str.clone()), num_str, line, col))
    }

    fn lex_identifier(&mut self) -> Token {
        let (line, col) = self.pos();
        let mut ident = String::new();
        while let Some(ch) = self.current {
            if is_identifier_part(ch) {
                ident.push(ch);
                self.advance_char();
            } else {
                break;
            }
        }
        Token::new(TokenKind::Identifier(ident.clone()), ident, line, col)
    }
}

fn match_single_char_token(ch: char) -> Option<TokenKind> {
    match ch {
        '+' => Some(TokenKind::Plus),
        '-' | '−' => Some(TokenKind::Minus),
        '*' | '·' | '×' => Some(TokenKind::Star),
        '/' => Some(TokenKind::Slash),
        '^' => Some(TokenKind::Caret),
        ',' => Some(TokenKind::Comma),
        '(' => Some(TokenKind::OpenParen),
        ')' => Some(TokenKind::CloseParen),
        _ => None,
    }
}

// Utility functions for identifiers and whitespace

fn is_identifier_start(ch: char) -> bool {
    ch == '_' || is_xid_start(ch)
}
fn is_identifier_part(ch: char) -> bool {
    ch == '_' || is_xid_continue(ch)
}
fn is_safe_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\r' | '\n' | '\u{FEFF}')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Lexer::new(src).tokenize().unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lexes_operators_and_powers() {
        assert_eq!(
            kinds("r**2 * c^2"),
            vec![
                TokenKind::Identifier("r".into()),
                TokenKind::StarStar,
                TokenKind::NumberLiteral("2".into()),
                TokenKind::Star,
                TokenKind::Identifier("c".into()),
                TokenKind::Caret,
                TokenKind::NumberLiteral("2".into()),
                TokenKind::EOF,
            ]
        );
    }

    #[test]
    fn numbers_keep_their_text() {
        assert_eq!(kinds("0.5 1e-3")[..2], [TokenKind::NumberLiteral("0.5".into()), TokenKind::NumberLiteral("1e-3".into())]);
    }

    #[test]
    fn unicode_identifiers_and_comments() {
        let toks = Lexer::new("sin(θ) # polar angle\n+ φ").tokenize().unwrap();
        assert_eq!(toks[2].kind, TokenKind::Identifier("θ".into()));
        assert_eq!(toks[4].kind, TokenKind::Plus);
        assert_eq!((toks[4].line, toks[4].column), (2, 1));
        assert_eq!(toks[5].kind, TokenKind::Identifier("φ".into()));
    }

    #[test]
    fn reports_position_of_bad_character() {
        let err = Lexer::new("r + $").tokenize().unwrap_err();
        assert_eq!(err, LexerError::UnexpectedCharacter('$', 1, 5));
        assert_eq!(err.to_string(), "Unexpected character '$' at 1:5");
    }

    #[test]
    fn rejects_trailing_decimal_point() {
        assert!(matches!(Lexer::new("3.").tokenize(), Err(LexerError::InvalidNumber(..))));
    }
}
