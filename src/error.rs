//! Top-level error types for the compilation pipeline.
//!
//! Two families, kept deliberately distinguishable:
//! - **user errors** ([`ParseError`], [`SemanticError`]) mean the source is
//!   malformed or violates a static rule; they carry the offending location
//!   and render with source context;
//! - **internal errors** ([`InternalError`]) mean the compiler itself broke
//!   an invariant (consulting a description before decoration, reaching an
//!   unimplemented path). They are never caused by user source.

use crate::parser::ParseError;
use crate::semantic::error::annotate_span;
use crate::semantic::SemanticError;
use thiserror::Error;

/// Any failure of the compilation pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("{0}")]
    Semantic(#[from] SemanticError),

    #[error("internal compiler error: {0}")]
    Internal(#[from] InternalError),
}

impl CompileError {
    /// Format the error for terminal display, pointing at the offending
    /// source where a location is known.
    pub fn display_with_source(&self, source: &str) -> String {
        match self {
            CompileError::Parse(error) => {
                let span = error.span();
                format!("error at {}: {}\n{}", span, error, annotate_span(source, span))
            }
            CompileError::Semantic(error) => error.display_with_source(source),
            CompileError::Internal(error) => format!("internal compiler error: {}\n", error),
        }
    }
}

/// A broken compiler invariant. Reaching one of these aborts compilation
/// with a diagnostic that tooling can tell apart from user errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InternalError {
    /// A node's resolved metadata was consulted before decoration ran.
    #[error("{node} node consulted before decoration")]
    NotDecorated { node: &'static str },

    /// A genuinely unimplemented code path was reached.
    #[error("{what} is not supported")]
    Unsupported { what: String },
}
