//! Abstract syntax tree for the language.
//!
//! This module defines the closed set of node kinds the rest of the
//! pipeline traverses:
//! - expression nodes ([`expr`]): literals, variable references, calls
//! - instruction nodes ([`stmt`]): returns, declarations, inline assembly
//! - declaration nodes ([`decl`]): functions, classes, members
//! - type expressions ([`types`])
//!
//! The tree is built once by the parser and owned exclusively by the
//! [`TranslationUnit`] root. Decoration mutates nodes in place exactly once,
//! attaching description ids; code generation only reads. Nodes expose their
//! decorated state through `Result`-returning accessors, so consulting an
//! undecorated node is an explicit [`crate::error::InternalError`] instead
//! of a crash.

pub mod decl;
pub mod dump;
pub mod expr;
pub mod stmt;
pub mod types;

pub use decl::{
    Attribute, Class, Function, FunctionParameter, FunctionParameterList, Method, Visibility,
};
pub use expr::{Expression, FunctionCall, NumberLiteral, StringLiteral, Variable};
pub use stmt::{
    BindingRequest, Declaration, InlineAsmStatement, Instruction, InstructionList,
    ReturnStatement,
};
pub use types::TypeExpr;

use crate::lexer::Span;

/// The root of one compiled source file: every free function and class it
/// defines, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationUnit {
    pub functions: Vec<Function>,
    pub classes: Vec<Class>,
    pub span: Span,
}

impl TranslationUnit {
    pub fn new(functions: Vec<Function>, classes: Vec<Class>, span: Span) -> Self {
        Self {
            functions,
            classes,
            span,
        }
    }
}
