//! Semantic error reporting with source location context.

use crate::lexer::Span;
use std::fmt;

/// A semantic error: the source is well-formed syntax but violates a
/// static rule. Decoration aborts at the first one.
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticError {
    /// The violated rule.
    pub kind: SemanticErrorKind,
    /// The location of the offending reference or declaration.
    pub span: Span,
    /// Context naming the entity involved.
    pub message: String,
}

impl SemanticError {
    pub fn new(kind: SemanticErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    /// Format the error with the offending source line and a caret pointer.
    pub fn display_with_source(&self, source: &str) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "error at {}: {}\n  {}\n",
            self.span, self.kind, self.message
        ));
        output.push_str(&annotate_span(source, self.span));
        output
    }
}

impl fmt::Display for SemanticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}: {}", self.kind, self.span, self.message)
    }
}

impl std::error::Error for SemanticError {}

/// The kind of semantic rule that was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticErrorKind {
    /// A name that no active scope declares.
    UnresolvedName,
    /// A second declaration of a name in the same scope.
    DuplicateDeclaration,
    /// Two binding requests naming one register in one inline assembly
    /// statement.
    ConflictingRegisterBinding,
}

impl fmt::Display for SemanticErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            SemanticErrorKind::UnresolvedName => "unresolved name",
            SemanticErrorKind::DuplicateDeclaration => "duplicate declaration",
            SemanticErrorKind::ConflictingRegisterBinding => "conflicting register binding",
        };
        write!(f, "{}", msg)
    }
}

/// Render the source line a span points at, with a caret pointer under the
/// offending range. Returns an empty string when the line is out of range.
pub(crate) fn annotate_span(source: &str, span: Span) -> String {
    let Some(line_text) = source.lines().nth(span.line as usize - 1) else {
        return String::new();
    };

    let mut output = String::new();
    output.push_str("  |\n");
    output.push_str(&format!("{:>3} | {}\n", span.line, line_text));

    let indent = " ".repeat(span.col.saturating_sub(1) as usize);
    let pointer = if span.len <= 1 {
        "^".to_string()
    } else {
        format!("^{}", "~".repeat((span.len - 1) as usize))
    };
    output.push_str(&format!("  | {}{}\n", indent, pointer));
    output
}
