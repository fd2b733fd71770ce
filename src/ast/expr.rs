//! Expression nodes.
//!
//! The expression grammar is deliberately small: a value position holds
//! either a number literal or a variable reference. The sum is a closed
//! enum and every consumer matches it exhaustively, so adding a kind is a
//! compile-visible change everywhere.

use crate::error::InternalError;
use crate::lexer::Span;
use crate::semantic::{FunctionId, VariableId};

/// A value-producing expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Number(NumberLiteral),
    Variable(Variable),
}

impl Expression {
    /// Get the span of this expression.
    pub fn span(&self) -> Span {
        match self {
            Self::Number(e) => e.span,
            Self::Variable(e) => e.span,
        }
    }
}

/// An unsigned integer literal.
///
/// The value is kept as `u64` end to end so the full 64-bit range is
/// materialized exactly by code generation.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberLiteral {
    pub value: u64,
    pub span: Span,
}

/// A named variable, either at its declaration site or as a use.
///
/// After decoration the node carries the [`VariableId`] of the resolved
/// description; every mention of one declared variable resolves to the same
/// id.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub span: Span,
    variable_id: Option<VariableId>,
}

impl Variable {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
            variable_id: None,
        }
    }

    /// The resolved variable, or [`InternalError::NotDecorated`] when the
    /// decorator has not visited this node yet.
    pub fn variable_id(&self) -> Result<VariableId, InternalError> {
        self.variable_id
            .ok_or(InternalError::NotDecorated { node: "Variable" })
    }

    pub fn is_decorated(&self) -> bool {
        self.variable_id.is_some()
    }

    pub(crate) fn resolve(&mut self, id: VariableId) {
        self.variable_id = Some(id);
    }
}

/// A string literal. Only used as the raw text of inline assembly blocks;
/// the language has no string-typed values.
#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    pub value: String,
    pub span: Span,
}

/// A call of a named function with positional arguments.
///
/// Calls appear only in instruction position. `Expression` is closed over
/// literals and variables, so a call can never occur where a value is
/// demanded — the gap is structural rather than a runtime failure.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: Vec<Expression>,
    pub span: Span,
    function_id: Option<FunctionId>,
}

impl FunctionCall {
    pub fn new(name: impl Into<String>, arguments: Vec<Expression>, span: Span) -> Self {
        Self {
            name: name.into(),
            arguments,
            span,
            function_id: None,
        }
    }

    /// The resolved callee, or [`InternalError::NotDecorated`] when the
    /// decorator has not visited this node yet.
    pub fn function_id(&self) -> Result<FunctionId, InternalError> {
        self.function_id
            .ok_or(InternalError::NotDecorated { node: "FunctionCall" })
    }

    pub(crate) fn resolve(&mut self, id: FunctionId) {
        self.function_id = Some(id);
    }
}
