use tracing::{debug, trace};
use winnow::error::ContextError;
use winnow::prelude::*;
use winnow::stream::{LocatingSlice, Location};
use winnow::token::{any, one_of, take_till, take_while};

use crate::error::ScanError;
use crate::report::Reporter;
use crate::scanner::token::{Literal, Span, Token, TokenKind, keyword_kind};

type Input<'a> = LocatingSlice<&'a str>;

/// Single-pass scanner over one source text.
///
/// Built once per source, consumed by [`Scanner::scan_tokens`]. Errors go to
/// the reporter and scanning carries on with the next character.
pub struct Scanner<'a, 'r> {
    source: &'a str,
    input: Input<'a>,
    /// Byte offset of the lexeme being scanned.
    start: usize,
    line: usize,
    tokens: Vec<Token>,
    errors: usize,
    reporter: &'r mut dyn Reporter,
}

impl<'a, 'r> Scanner<'a, 'r> {
    pub fn new(source: &'a str, reporter: &'r mut dyn Reporter) -> Self {
        Self {
            source,
            input: LocatingSlice::new(source),
            start: 0,
            line: 1,
            tokens: Vec::new(),
            errors: 0,
            reporter,
        }
    }

    pub fn scan_tokens(mut self) -> Vec<Token> {
        while !self.input.is_empty() {
            self.start = self.offset();
            self.scan_token();
        }
        self.tokens.push(Token::eof(self.line, self.source.len()));
        debug!(
            tokens = self.tokens.len(),
            errors = self.errors,
            lines = self.line,
            "scan finished"
        );
        self.tokens
    }

    fn scan_token(&mut self) {
        let Some(c) = self.advance() else {
            return;
        };
        match c {
            '(' => self.add_token(TokenKind::LeftParen),
            ')' => self.add_token(TokenKind::RightParen),
            '{' => self.add_token(TokenKind::LeftBrace),
            '}' => self.add_token(TokenKind::RightBrace),
            ',' => self.add_token(TokenKind::Comma),
            '.' => self.add_token(TokenKind::Dot),
            '-' => self.add_token(TokenKind::Minus),
            '+' => self.add_token(TokenKind::Plus),
            ';' => self.add_token(TokenKind::Semicolon),
            '*' => self.add_token(TokenKind::Star),
            '!' => self.one_or_two(TokenKind::BangEqual, TokenKind::Bang),
            '=' => self.one_or_two(TokenKind::EqualEqual, TokenKind::Equal),
            '<' => self.one_or_two(TokenKind::LessEqual, TokenKind::Less),
            '>' => self.one_or_two(TokenKind::GreaterEqual, TokenKind::Greater),
            '/' => {
                if self.eat('/') {
                    // The newline stays in the input so the line count sees it.
                    self.eat_till('\n');
                } else {
                    self.add_token(TokenKind::Slash);
                }
            }
            ' ' | '\r' | '\t' => {}
            '\n' => self.line += 1,
            '"' => self.string(),
            c if c.is_ascii_digit() => self.number(),
            c if c.is_alphabetic() || c == '_' => self.identifier(),
            other => {
                let span = Span::new(self.start, other.len_utf8());
                self.report(ScanError::unexpected_character(other, self.line, span));
            }
        }
    }

    fn one_or_two(&mut self, with_equal: TokenKind, alone: TokenKind) {
        let kind = if self.eat('=') { with_equal } else { alone };
        self.add_token(kind);
    }

    fn string(&mut self) {
        let opened_on = self.line;
        let body: &'a str = self.eat_till('"');
        self.line += body.matches('\n').count();

        if !self.eat('"') {
            let span = Span::new(self.start, self.offset() - self.start);
            self.report(ScanError::unterminated_string(opened_on, span));
            return;
        }
        self.add_literal_token(TokenKind::String, Literal::Str(body.to_string()));
    }

    fn number(&mut self) {
        self.eat_while(|c: char| c.is_ascii_digit());

        let mut ahead = self.input.chars();
        if ahead.next() == Some('.') && ahead.next().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            self.eat_while(|c: char| c.is_ascii_digit());
        }

        // Digit runs always parse; too many digits saturate to infinity.
        let value = self.lexeme().parse::<f64>().unwrap_or(f64::INFINITY);
        self.add_literal_token(TokenKind::Number, Literal::Number(value));
    }

    fn identifier(&mut self) {
        self.eat_while(|c: char| c.is_alphanumeric() || c == '_');
        let kind = keyword_kind(self.lexeme()).unwrap_or(TokenKind::Identifier);
        self.add_token(kind);
    }

    fn advance(&mut self) -> Option<char> {
        any::<_, ContextError>.parse_next(&mut self.input).ok()
    }

    /// Consume `expected` if it is the next character.
    fn eat(&mut self, expected: char) -> bool {
        let matched: Result<char, ContextError> = one_of(expected).parse_next(&mut self.input);
        matched.is_ok()
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        take_while::<_, _, ContextError>(0.., pred)
            .parse_next(&mut self.input)
            .unwrap_or_default()
    }

    fn eat_till(&mut self, stop: char) -> &'a str {
        take_till::<_, _, ContextError>(0.., stop)
            .parse_next(&mut self.input)
            .unwrap_or_default()
    }

    fn offset(&self) -> usize {
        self.input.current_token_start()
    }

    fn lexeme(&self) -> &'a str {
        &self.source[self.start..self.offset()]
    }

    fn add_token(&mut self, kind: TokenKind) {
        let token = self.make_token(kind);
        self.push(token);
    }

    fn add_literal_token(&mut self, kind: TokenKind, literal: Literal) {
        let token = self.make_token(kind).with_literal(literal);
        self.push(token);
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        let lexeme = self.lexeme();
        Token::new(kind, lexeme, self.line, Span::new(self.start, lexeme.len()))
    }

    fn push(&mut self, token: Token) {
        trace!(kind = %token.kind, lexeme = %token.lexeme, line = token.line, "token");
        self.tokens.push(token);
    }

    fn report(&mut self, error: ScanError) {
        debug!(line = error.line(), error = %error.kind(), "scan error");
        self.errors += 1;
        self.reporter.report(error);
    }
}
