//! Token definitions for the lexer.

use super::span::Span;
use std::fmt;

/// A lexical token with its source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// The kind of a lexical token.
///
/// Number literals are kept unsigned 64-bit so the full range survives the
/// pipeline exactly; sign handling belongs to the language, not the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// An identifier or type name.
    Ident(String),
    /// An unsigned integer literal.
    Number(u64),
    /// A string literal with escapes already processed.
    Str(String),

    // Keywords
    KwReturn,
    KwAsm,
    KwClass,
    KwPublic,
    KwProtected,
    KwPrivate,

    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Semicolon,
    Colon,
    Assign,
    Star,

    /// End of input marker appended by the lexer.
    Eof,
}

impl TokenKind {
    /// A short human-readable description, used in parse errors.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Ident(name) => format!("identifier '{}'", name),
            TokenKind::Number(value) => format!("number {}", value),
            TokenKind::Str(_) => "string literal".to_string(),
            TokenKind::KwReturn => "'return'".to_string(),
            TokenKind::KwAsm => "'asm'".to_string(),
            TokenKind::KwClass => "'class'".to_string(),
            TokenKind::KwPublic => "'public'".to_string(),
            TokenKind::KwProtected => "'protected'".to_string(),
            TokenKind::KwPrivate => "'private'".to_string(),
            TokenKind::LParen => "'('".to_string(),
            TokenKind::RParen => "')'".to_string(),
            TokenKind::LBrace => "'{'".to_string(),
            TokenKind::RBrace => "'}'".to_string(),
            TokenKind::Comma => "','".to_string(),
            TokenKind::Semicolon => "';'".to_string(),
            TokenKind::Colon => "':'".to_string(),
            TokenKind::Assign => "'='".to_string(),
            TokenKind::Star => "'*'".to_string(),
            TokenKind::Eof => "end of input".to_string(),
        }
    }

    /// Map an identifier to its keyword kind, if it is one.
    pub fn keyword(ident: &str) -> Option<TokenKind> {
        match ident {
            "return" => Some(TokenKind::KwReturn),
            "asm" => Some(TokenKind::KwAsm),
            "class" => Some(TokenKind::KwClass),
            "public" => Some(TokenKind::KwPublic),
            "protected" => Some(TokenKind::KwProtected),
            "private" => Some(TokenKind::KwPrivate),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}
