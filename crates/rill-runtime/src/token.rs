//! Token types for lexical analysis
//!
//! Defines all token types recognized by the Rill lexer.

use crate::span::Span;

/// Token produced by the lexer
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The source text of this token
    pub lexeme: String,
    /// Source location
    pub span: Span,
}

impl Token {
    /// Create a new token
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
        }
    }
}

/// Classification of token types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals
    /// Number literal (42, 3.14)
    Number,
    /// String literal ("hello")
    String,
    /// Identifier
    Identifier,

    // Keywords
    /// `var` keyword (variable declaration)
    Var,
    /// `fun` keyword (function declaration or expression)
    Fun,
    /// `class` keyword
    Class,
    /// `static` keyword (class-level method)
    Static,
    /// `if` keyword
    If,
    /// `else` keyword
    Else,
    /// `while` keyword
    While,
    /// `return` keyword
    Return,
    /// `break` keyword
    Break,
    /// `continue` keyword
    Continue,
    /// `print` keyword
    Print,
    /// `and` keyword (logical and)
    And,
    /// `or` keyword (logical or)
    Or,
    /// `this` keyword
    This,
    /// `super` keyword
    Super,
    /// `true` keyword
    True,
    /// `false` keyword
    False,
    /// `nil` keyword
    Nil,

    // Operators
    /// `+` (addition or concatenation)
    Plus,
    /// `-` (subtraction or negation)
    Minus,
    /// `*` (multiplication)
    Star,
    /// `/` (division)
    Slash,
    /// `!` (logical not)
    Bang,
    /// `=` (assignment)
    Equal,
    /// `==` (equality)
    EqualEqual,
    /// `!=` (inequality)
    BangEqual,
    /// `<` (less than)
    Less,
    /// `<=` (less than or equal)
    LessEqual,
    /// `>` (greater than)
    Greater,
    /// `>=` (greater than or equal)
    GreaterEqual,
    /// `?` (conditional)
    Question,
    /// `:` (conditional branch separator)
    Colon,

    // Punctuation
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// `;`
    Semicolon,

    /// End of file
    Eof,
}

impl TokenKind {
    /// Look up the keyword for an identifier lexeme, if any
    pub fn keyword(lexeme: &str) -> Option<TokenKind> {
        let kind = match lexeme {
            "var" => TokenKind::Var,
            "fun" => TokenKind::Fun,
            "class" => TokenKind::Class,
            "static" => TokenKind::Static,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            "return" => TokenKind::Return,
            "break" => TokenKind::Break,
            "continue" => TokenKind::Continue,
            "print" => TokenKind::Print,
            "and" => TokenKind::And,
            "or" => TokenKind::Or,
            "this" => TokenKind::This,
            "super" => TokenKind::Super,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "nil" => TokenKind::Nil,
            _ => return None,
        };
        Some(kind)
    }
}
