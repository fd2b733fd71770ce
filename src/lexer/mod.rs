//! Lexical analysis: raw source text to a flat token stream.
//!
//! The scanner is a single forward pass over the source bytes. It tracks
//! line and column positions so every token carries an accurate [`Span`],
//! recognizes `//` line comments, and processes string escapes in place.
//! Lexical failures surface as [`ParseError`]s, the same family the parser
//! reports, since both describe malformed source.

pub mod span;
pub mod token;

pub use span::Span;
pub use token::{Token, TokenKind};

use crate::parser::ParseError;

/// Tokenize a whole source buffer.
///
/// The returned stream always ends with a single [`TokenKind::Eof`] token,
/// so the parser can peek without bounds checks.
pub fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    Lexer::new(source).run()
}

struct Lexer<'src> {
    src: &'src [u8],
    pos: usize,
    line: u32,
    col: u32,
}

impl<'src> Lexer<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            src: source.as_bytes(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    fn run(mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia();
            let span_start = (self.line, self.col);
            let Some(c) = self.peek() else {
                tokens.push(Token::new(TokenKind::Eof, Span::point(self.line, self.col)));
                return Ok(tokens);
            };

            let kind = match c {
                b'(' => self.punct(TokenKind::LParen),
                b')' => self.punct(TokenKind::RParen),
                b'{' => self.punct(TokenKind::LBrace),
                b'}' => self.punct(TokenKind::RBrace),
                b',' => self.punct(TokenKind::Comma),
                b';' => self.punct(TokenKind::Semicolon),
                b':' => self.punct(TokenKind::Colon),
                b'=' => self.punct(TokenKind::Assign),
                b'*' => self.punct(TokenKind::Star),
                b'"' => self.string_literal()?,
                b'0'..=b'9' => self.number_literal()?,
                c if c == b'_' || c.is_ascii_alphabetic() => self.ident_or_keyword(),
                other => {
                    return Err(ParseError::UnexpectedChar {
                        found: other as char,
                        span: Span::new(self.line, self.col, 1),
                    });
                }
            };

            let len = self.col.saturating_sub(span_start.1).max(1);
            let span = if self.line == span_start.0 {
                Span::new(span_start.0, span_start.1, len)
            } else {
                // Multi-line token (a string literal spanning lines): anchor
                // the span at its opening position.
                Span::new(span_start.0, span_start.1, 1)
            };
            tokens.push(Token::new(kind, span));
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let c = self.peek()?;
        self.pos += 1;
        if c == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_ascii_whitespace() => {
                    self.bump();
                }
                Some(b'/') if self.src.get(self.pos + 1) == Some(&b'/') => {
                    while let Some(c) = self.peek() {
                        if c == b'\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                _ => return,
            }
        }
    }

    fn punct(&mut self, kind: TokenKind) -> TokenKind {
        self.bump();
        kind
    }

    fn ident_or_keyword(&mut self) -> TokenKind {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == b'_' || c.is_ascii_alphanumeric() {
                self.bump();
            } else {
                break;
            }
        }
        let text = std::str::from_utf8(&self.src[start..self.pos])
            .expect("identifier bytes are ASCII");
        TokenKind::keyword(text).unwrap_or_else(|| TokenKind::Ident(text.to_string()))
    }

    fn number_literal(&mut self) -> Result<TokenKind, ParseError> {
        let (line, col) = (self.line, self.col);
        let start = self.pos;

        let radix = if self.peek() == Some(b'0') && matches!(self.src.get(self.pos + 1), Some(b'x') | Some(b'X')) {
            self.bump();
            self.bump();
            16
        } else {
            10
        };

        let digits_start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_hexdigit() {
                self.bump();
            } else {
                break;
            }
        }

        let digits = std::str::from_utf8(&self.src[digits_start..self.pos])
            .expect("digit bytes are ASCII");
        let span = Span::new(line, col, (self.pos - start) as u32);
        if digits.is_empty() {
            return Err(ParseError::InvalidNumber {
                message: "expected digits after '0x'".to_string(),
                span,
            });
        }

        let value = u64::from_str_radix(digits, radix).map_err(|_| ParseError::InvalidNumber {
            message: format!("'{}' does not fit in 64 bits", digits),
            span,
        })?;
        Ok(TokenKind::Number(value))
    }

    fn string_literal(&mut self) -> Result<TokenKind, ParseError> {
        let (line, col) = (self.line, self.col);
        self.bump(); // opening quote

        let mut content = String::new();
        loop {
            match self.bump() {
                None => {
                    return Err(ParseError::UnterminatedString {
                        span: Span::new(line, col, 1),
                    });
                }
                Some(b'"') => return Ok(TokenKind::Str(content)),
                Some(b'\\') => {
                    let (esc_line, esc_col) = (self.line, self.col);
                    match self.bump() {
                        Some(b'n') => content.push('\n'),
                        Some(b't') => content.push('\t'),
                        Some(b'\\') => content.push('\\'),
                        Some(b'"') => content.push('"'),
                        Some(b'0') => content.push('\0'),
                        other => {
                            return Err(ParseError::InvalidEscape {
                                escape: other.map(|c| c as char).unwrap_or(' '),
                                span: Span::new(esc_line, esc_col.saturating_sub(1), 2),
                            });
                        }
                    }
                }
                Some(c) => content.push(c as char),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn empty_source_yields_only_eof() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn scans_a_declaration() {
        assert_eq!(
            kinds("int x = 42;"),
            vec![
                TokenKind::Ident("int".into()),
                TokenKind::Ident("x".into()),
                TokenKind::Assign,
                TokenKind::Number(42),
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn keywords_are_not_identifiers() {
        assert_eq!(
            kinds("return asm class"),
            vec![
                TokenKind::KwReturn,
                TokenKind::KwAsm,
                TokenKind::KwClass,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn line_comments_are_skipped() {
        assert_eq!(
            kinds("// a comment\nreturn // trailing\n"),
            vec![TokenKind::KwReturn, TokenKind::Eof]
        );
    }

    #[test]
    fn spans_track_lines_and_columns() {
        let tokens = tokenize("int x;\n  return y;").unwrap();
        assert_eq!(tokens[0].span, Span::new(1, 1, 3)); // int
        assert_eq!(tokens[1].span, Span::new(1, 5, 1)); // x
        assert_eq!(tokens[3].span, Span::new(2, 3, 6)); // return
        assert_eq!(tokens[4].span, Span::new(2, 10, 1)); // y
    }

    #[test]
    fn hex_and_max_u64_literals_are_exact() {
        assert_eq!(
            kinds("0xff 18446744073709551615"),
            vec![
                TokenKind::Number(255),
                TokenKind::Number(u64::MAX),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn overflowing_literal_is_rejected() {
        let err = tokenize("18446744073709551616").unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber { .. }));
    }

    #[test]
    fn string_escapes_are_processed() {
        assert_eq!(
            kinds(r#""mov rax, 1\n\tnop""#),
            vec![TokenKind::Str("mov rax, 1\n\tnop".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn unterminated_string_is_rejected() {
        let err = tokenize("\"nop").unwrap_err();
        assert!(matches!(err, ParseError::UnterminatedString { .. }));
    }

    #[test]
    fn stray_byte_is_rejected_with_position() {
        let err = tokenize("int x;\n@").unwrap_err();
        match err {
            ParseError::UnexpectedChar { found, span } => {
                assert_eq!(found, '@');
                assert_eq!(span.line, 2);
                assert_eq!(span.col, 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
