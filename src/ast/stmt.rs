//! Instruction nodes: the statement forms a function body may contain.

use super::expr::{Expression, FunctionCall, StringLiteral, Variable};
use super::types::TypeExpr;
use crate::codegen::Register;
use crate::lexer::Span;

/// One instruction in a function body.
///
/// A closed sum: return, inline assembly, declaration, or a standalone
/// call. Consumers match exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    Return(ReturnStatement),
    InlineAsm(InlineAsmStatement),
    Declaration(Declaration),
    Call(FunctionCall),
}

impl Instruction {
    /// Get the span of this instruction.
    pub fn span(&self) -> Span {
        match self {
            Self::Return(i) => i.span,
            Self::InlineAsm(i) => i.span,
            Self::Declaration(i) => i.span,
            Self::Call(i) => i.span,
        }
    }
}

/// `return <expression>;`
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    pub value: Expression,
    pub span: Span,
}

/// `T x;` or `T x = <expression>;`
///
/// The declared name is itself a [`Variable`] node; decoration resolves it
/// to the freshly created description, so declaration sites and use sites
/// share one id space.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub ty: TypeExpr,
    pub variable: Variable,
    pub initializer: Option<Expression>,
    pub span: Span,
}

/// One register-binding request of an inline assembly statement:
/// `=rax(x)` asks for variable `x` to be loaded into `rax` before the raw
/// block runs.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingRequest {
    pub register: Register,
    pub variable: Variable,
    pub span: Span,
}

/// `asm("..." : =reg(var), ...);`
///
/// The raw text is emitted verbatim after the binding moves. Bindings are
/// one-directional: the variable's value flows into the register, nothing
/// flows back after the block.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineAsmStatement {
    pub body: StringLiteral,
    pub bindings: Vec<BindingRequest>,
    pub span: Span,
}

/// An ordered function body.
#[derive(Debug, Clone, PartialEq)]
pub struct InstructionList {
    pub instructions: Vec<Instruction>,
    pub span: Span,
}

impl InstructionList {
    pub fn new(instructions: Vec<Instruction>, span: Span) -> Self {
        Self { instructions, span }
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Whether the last instruction is a `return`, meaning the function
    /// needs no implicit epilogue.
    pub fn ends_with_return(&self) -> bool {
        matches!(self.instructions.last(), Some(Instruction::Return(_)))
    }
}
