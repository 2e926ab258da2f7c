use std::str::Chars;

use peekmore::{PeekMore, PeekMoreIterator};

use crate::error::{Report, ScanError};
use crate::literal::Literal;
use crate::token::{self, Token, Type};

/// Turns source text into a token stream. Errors are reported as encountered; scanning continues
/// so a single pass can surface more than one problem.
pub struct Scanner<'a> {
    source: PeekMoreIterator<Chars<'a>>,
    tokens: Vec<Token>,
    lexeme: String,
    line: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Scanner<'a> {
        Scanner {
            source: source.chars().peekmore(),
            tokens: Vec::new(),
            lexeme: String::new(),
            line: 1,
        }
    }

    pub fn scan_tokens(mut self) -> Vec<Token> {
        while !self.is_at_end() {
            self.lexeme.clear();
            self.scan_token();
        }

        tracing::trace!(kind = ?Type::Eof, line = self.line, "scanned token");
        self.tokens.push(Token::new(Type::Eof, String::new(), None, self.line));
        self.tokens
    }

    fn is_at_end(&mut self) -> bool {
        self.source.peek().is_none()
    }

    fn advance(&mut self) -> char {
        let c = self.source.next().expect("advance past end of source");
        self.lexeme.push(c);
        c
    }

    fn peek(&mut self) -> char {
        self.source.peek().copied().unwrap_or('\0')
    }

    fn peek_next(&mut self) -> char {
        self.source.peek_next().copied().unwrap_or('\0')
    }

    fn matches(&mut self, expected: char) -> bool {
        if self.peek() != expected {
            return false;
        }
        self.advance();
        true
    }

    fn add_token(&mut self, kind: Type, literal: Option<Literal>) {
        tracing::trace!(kind = ?kind, lexeme = %self.lexeme, line = self.line, "scanned token");
        self.tokens.push(Token::new(kind, self.lexeme.clone(), literal, self.line));
    }

    fn scan_token(&mut self) {
        let c = self.advance();
        match c {
            '(' => self.add_token(Type::LeftParen, None),
            ')' => self.add_token(Type::RightParen, None),
            '{' => self.add_token(Type::LeftBrace, None),
            '}' => self.add_token(Type::RightBrace, None),
            ',' => self.add_token(Type::Comma, None),
            '.' => self.add_token(Type::Dot, None),
            '-' => self.add_token(Type::Minus, None),
            '+' => self.add_token(Type::Plus, None),
            ';' => self.add_token(Type::Semicolon, None),
            '*' => self.add_token(Type::Star, None),
            '!' => {
                let kind = if self.matches('=') { Type::BangEqual } else { Type::Bang };
                self.add_token(kind, None);
            }
            '=' => {
                let kind = if self.matches('=') { Type::EqualEqual } else { Type::Equal };
                self.add_token(kind, None);
            }
            '<' => {
                let kind = if self.matches('=') { Type::LessEqual } else { Type::Less };
                self.add_token(kind, None);
            }
            '>' => {
                let kind = if self.matches('=') { Type::GreaterEqual } else { Type::Greater };
                self.add_token(kind, None);
            }
            '/' => {
                if self.matches('/') {
                    while self.peek() != '\n' && !self.is_at_end() {
                        self.advance();
                    }
                } else {
                    self.add_token(Type::Slash, None);
                }
            }
            ' ' | '\r' | '\t' => {}
            '\n' => self.line += 1,
            '"' => self.string(),
            c if c.is_ascii_digit() => self.number(),
            c if c.is_alphabetic() || c == '_' => self.identifier(),
            _ => {
                ScanError { line: self.line, message: "Unexpected character.".to_string() }.report();
            }
        }
    }

    fn string(&mut self) {
        let start_line = self.line;

        while self.peek() != '"' && !self.is_at_end() {
            if self.peek() == '\n' {
                self.line += 1;
            }
            self.advance();
        }

        if self.is_at_end() {
            ScanError { line: start_line, message: "Unterminated string.".to_string() }.report();
            return;
        }

        self.advance(); // closing quote

        // Strip the surrounding quotes; `lexeme` at this point is `"...."`.
        let value = self.lexeme[1..self.lexeme.len() - 1].to_string();
        self.add_token(Type::String, Some(Literal::String(value)));
    }

    fn number(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            self.advance(); // the '.'
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        let value: f64 = self.lexeme.parse().expect("scanned number lexeme must parse as f64");
        self.add_token(Type::Number, Some(Literal::Number(value)));
    }

    fn identifier(&mut self) {
        while self.peek().is_alphanumeric() || self.peek() == '_' {
            self.advance();
        }

        let kind = token::keyword(&self.lexeme).unwrap_or(Type::Identifier);
        self.add_token(kind, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Type> {
        Scanner::new(source).scan_tokens().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn scans_single_and_double_char_operators() {
        assert_eq!(
            kinds("!= == <= >= < > ="),
            vec![
                Type::BangEqual,
                Type::EqualEqual,
                Type::LessEqual,
                Type::GreaterEqual,
                Type::Less,
                Type::Greater,
                Type::Equal,
                Type::Eof,
            ]
        );
    }

    #[test]
    fn skips_line_comments() {
        assert_eq!(kinds("// a comment\n1"), vec![Type::Number, Type::Eof]);
    }

    #[test]
    fn scans_a_number_literal() {
        let tokens = Scanner::new("123.45").scan_tokens();
        assert_eq!(tokens[0].kind, Type::Number);
        assert_eq!(tokens[0].literal, Some(Literal::Number(123.45)));
    }

    #[test]
    fn scans_a_string_literal_stripping_quotes() {
        let tokens = Scanner::new("\"hello\"").scan_tokens();
        assert_eq!(tokens[0].kind, Type::String);
        assert_eq!(tokens[0].literal, Some(Literal::String("hello".to_string())));
    }

    #[test]
    fn identifier_that_matches_a_keyword_is_not_an_identifier() {
        assert_eq!(kinds("class"), vec![Type::Class, Type::Eof]);
        assert_eq!(kinds("classroom"), vec![Type::Identifier, Type::Eof]);
    }

    #[test]
    fn newlines_advance_the_line_counter() {
        let tokens = Scanner::new("1\n\n2").scan_tokens();
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[1].line, 3);
    }

    #[test]
    fn unterminated_string_reports_an_error() {
        crate::error::reset_error();
        Scanner::new("\"unterminated").scan_tokens();
        assert!(crate::error::did_error());
        crate::error::reset_error();
    }
}
