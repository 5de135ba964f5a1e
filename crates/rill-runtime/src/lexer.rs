//! Lexical analysis (tokenization)
//!
//! The lexer converts Rill source code into a stream of tokens with span
//! information. Invalid input produces diagnostics rather than panics; the
//! offending character is skipped and scanning continues.

use crate::diagnostic::Diagnostic;
use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Lexer state for tokenizing source code
pub struct Lexer {
    /// Characters of source code
    chars: Vec<char>,
    /// Current position in chars
    current: usize,
    /// Current line number (1-indexed)
    line: u32,
    /// Start position of current token
    start_pos: usize,
    /// Start line of current token
    start_line: u32,
    /// Collected diagnostics
    diagnostics: Vec<Diagnostic>,
}

impl Lexer {
    /// Create a new lexer for the given source code
    pub fn new(source: impl AsRef<str>) -> Self {
        Self {
            chars: source.as_ref().chars().collect(),
            current: 0,
            line: 1,
            start_pos: 0,
            start_line: 1,
            diagnostics: Vec::new(),
        }
    }

    /// Tokenize the source code, returning tokens and any diagnostics
    pub fn tokenize(&mut self) -> (Vec<Token>, Vec<Diagnostic>) {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }

        (tokens, std::mem::take(&mut self.diagnostics))
    }

    /// Scan the next token
    fn next_token(&mut self) -> Token {
        loop {
            self.skip_whitespace_and_comments();

            self.start_pos = self.current;
            self.start_line = self.line;

            if self.is_at_end() {
                return self.make_token(TokenKind::Eof, "");
            }

            let c = self.advance();

            match c {
                '(' => return self.make_token(TokenKind::LeftParen, "("),
                ')' => return self.make_token(TokenKind::RightParen, ")"),
                '{' => return self.make_token(TokenKind::LeftBrace, "{"),
                '}' => return self.make_token(TokenKind::RightBrace, "}"),
                ',' => return self.make_token(TokenKind::Comma, ","),
                '.' => return self.make_token(TokenKind::Dot, "."),
                ';' => return self.make_token(TokenKind::Semicolon, ";"),
                '?' => return self.make_token(TokenKind::Question, "?"),
                ':' => return self.make_token(TokenKind::Colon, ":"),
                '+' => return self.make_token(TokenKind::Plus, "+"),
                '-' => return self.make_token(TokenKind::Minus, "-"),
                '*' => return self.make_token(TokenKind::Star, "*"),
                '/' => return self.make_token(TokenKind::Slash, "/"),
                '=' => {
                    return if self.match_char('=') {
                        self.make_token(TokenKind::EqualEqual, "==")
                    } else {
                        self.make_token(TokenKind::Equal, "=")
                    }
                }
                '!' => {
                    return if self.match_char('=') {
                        self.make_token(TokenKind::BangEqual, "!=")
                    } else {
                        self.make_token(TokenKind::Bang, "!")
                    }
                }
                '<' => {
                    return if self.match_char('=') {
                        self.make_token(TokenKind::LessEqual, "<=")
                    } else {
                        self.make_token(TokenKind::Less, "<")
                    }
                }
                '>' => {
                    return if self.match_char('=') {
                        self.make_token(TokenKind::GreaterEqual, ">=")
                    } else {
                        self.make_token(TokenKind::Greater, ">")
                    }
                }
                '"' => {
                    if let Some(token) = self.string() {
                        return token;
                    }
                    // Unterminated string: diagnostic already recorded,
                    // continue scanning at EOF.
                }
                c if c.is_ascii_digit() => return self.number(),
                c if c.is_alphabetic() || c == '_' => return self.identifier(),
                c => {
                    self.diagnostics.push(Diagnostic::error_with_code(
                        "RL0101",
                        format!("Unexpected character '{}'", c),
                        self.current_span(),
                    ));
                    // Skip the character and keep scanning.
                }
            }
        }
    }

    /// Scan a string literal; the opening quote has been consumed
    fn string(&mut self) -> Option<Token> {
        let mut value = String::new();
        while !self.is_at_end() && self.peek() != '"' {
            let c = self.advance();
            if c == '\n' {
                self.line += 1;
            }
            value.push(c);
        }

        if self.is_at_end() {
            self.diagnostics.push(Diagnostic::error_with_code(
                "RL0102",
                "Unterminated string literal",
                self.current_span(),
            ));
            return None;
        }

        self.advance(); // closing quote
        Some(self.make_token(TokenKind::String, value))
    }

    /// Scan a number literal; the first digit has been consumed
    fn number(&mut self) -> Token {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        // Fractional part only when a digit follows the dot, so `1.foo()`
        // lexes as a property access.
        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            self.advance();
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        let lexeme: String = self.chars[self.start_pos..self.current].iter().collect();
        self.make_token(TokenKind::Number, lexeme)
    }

    /// Scan an identifier or keyword; the first character has been consumed
    fn identifier(&mut self) -> Token {
        while self.peek().is_alphanumeric() || self.peek() == '_' {
            self.advance();
        }

        let lexeme: String = self.chars[self.start_pos..self.current].iter().collect();
        let kind = TokenKind::keyword(&lexeme).unwrap_or(TokenKind::Identifier);
        self.make_token(kind, lexeme)
    }

    /// Skip whitespace, line comments, and block comments
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                ' ' | '\r' | '\t' => {
                    self.advance();
                }
                '\n' => {
                    self.line += 1;
                    self.advance();
                }
                '/' => {
                    if self.peek_next() == '/' {
                        while !self.is_at_end() && self.peek() != '\n' {
                            self.advance();
                        }
                    } else if self.peek_next() == '*' {
                        self.block_comment();
                    } else {
                        return;
                    }
                }
                _ => return,
            }
        }
    }

    /// Skip a `/* ... */` block comment (no nesting)
    fn block_comment(&mut self) {
        let start = self.current;
        let start_line = self.line;
        self.advance(); // '/'
        self.advance(); // '*'

        while !self.is_at_end() {
            if self.peek() == '*' && self.peek_next() == '/' {
                self.advance();
                self.advance();
                return;
            }
            if self.peek() == '\n' {
                self.line += 1;
            }
            self.advance();
        }

        self.diagnostics.push(Diagnostic::error_with_code(
            "RL0103",
            "Unterminated block comment",
            Span::new(start, self.current, start_line),
        ));
    }

    // === Low-level helpers ===

    fn make_token(&self, kind: TokenKind, lexeme: impl Into<String>) -> Token {
        Token::new(kind, lexeme, self.current_span())
    }

    fn current_span(&self) -> Span {
        Span::new(self.start_pos, self.current, self.start_line)
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.chars.len()
    }

    fn advance(&mut self) -> char {
        let c = self.chars[self.current];
        self.current += 1;
        c
    }

    fn peek(&self) -> char {
        self.chars.get(self.current).copied().unwrap_or('\0')
    }

    fn peek_next(&self) -> char {
        self.chars.get(self.current + 1).copied().unwrap_or('\0')
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == expected {
            self.current += 1;
            true
        } else {
            false
        }
    }
}
