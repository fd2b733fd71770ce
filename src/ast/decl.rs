//! Top-level declarations: functions, classes, and their members.

use super::stmt::InstructionList;
use super::types::TypeExpr;
use crate::error::InternalError;
use crate::lexer::Span;
use crate::semantic::{FunctionId, TypeId, VariableId};
use std::fmt;

/// A single function parameter: `int x`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionParameter {
    pub ty: TypeExpr,
    pub name: String,
    pub span: Span,
    variable_id: Option<VariableId>,
}

impl FunctionParameter {
    pub fn new(ty: TypeExpr, name: impl Into<String>, span: Span) -> Self {
        Self {
            ty,
            name: name.into(),
            span,
            variable_id: None,
        }
    }

    /// The variable this parameter was declared as, or
    /// [`InternalError::NotDecorated`] before decoration.
    pub fn variable_id(&self) -> Result<VariableId, InternalError> {
        self.variable_id
            .ok_or(InternalError::NotDecorated { node: "FunctionParameter" })
    }

    pub(crate) fn resolve(&mut self, id: VariableId) {
        self.variable_id = Some(id);
    }
}

/// An ordered parameter list.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionParameterList {
    pub parameters: Vec<FunctionParameter>,
    pub span: Span,
}

impl FunctionParameterList {
    pub fn new(parameters: Vec<FunctionParameter>, span: Span) -> Self {
        Self { parameters, span }
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FunctionParameter> {
        self.parameters.iter()
    }
}

/// A free function definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub return_type: TypeExpr,
    pub name: String,
    pub params: FunctionParameterList,
    pub body: InstructionList,
    pub span: Span,
    function_id: Option<FunctionId>,
    frame_size: Option<u32>,
}

impl Function {
    pub fn new(
        return_type: TypeExpr,
        name: impl Into<String>,
        params: FunctionParameterList,
        body: InstructionList,
        span: Span,
    ) -> Self {
        Self {
            return_type,
            name: name.into(),
            params,
            body,
            span,
            function_id: None,
            frame_size: None,
        }
    }

    /// The registered signature, or [`InternalError::NotDecorated`] before
    /// decoration.
    pub fn function_id(&self) -> Result<FunctionId, InternalError> {
        self.function_id
            .ok_or(InternalError::NotDecorated { node: "Function" })
    }

    /// The stack frame size in bytes, 16-byte aligned, computed while the
    /// body was decorated.
    pub fn frame_size(&self) -> Result<u32, InternalError> {
        self.frame_size
            .ok_or(InternalError::NotDecorated { node: "Function" })
    }

    pub(crate) fn resolve(&mut self, id: FunctionId) {
        self.function_id = Some(id);
    }

    pub(crate) fn set_frame_size(&mut self, size: u32) {
        self.frame_size = Some(size);
    }
}

/// Member visibility inside a class body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Public => write!(f, "public"),
            Visibility::Protected => write!(f, "protected"),
            Visibility::Private => write!(f, "private"),
        }
    }
}

/// A data member of a class: `int hp;`.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub visibility: Visibility,
    pub ty: TypeExpr,
    pub name: String,
    pub span: Span,
}

/// A member function of a class. Decorated like a free function (own scope,
/// parameters, frame layout) but not lowered by code generation.
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub visibility: Visibility,
    pub return_type: TypeExpr,
    pub name: String,
    pub params: FunctionParameterList,
    pub body: InstructionList,
    pub span: Span,
    frame_size: Option<u32>,
}

impl Method {
    pub fn new(
        visibility: Visibility,
        return_type: TypeExpr,
        name: impl Into<String>,
        params: FunctionParameterList,
        body: InstructionList,
        span: Span,
    ) -> Self {
        Self {
            visibility,
            return_type,
            name: name.into(),
            params,
            body,
            span,
            frame_size: None,
        }
    }

    pub fn frame_size(&self) -> Result<u32, InternalError> {
        self.frame_size
            .ok_or(InternalError::NotDecorated { node: "Method" })
    }

    pub(crate) fn set_frame_size(&mut self, size: u32) {
        self.frame_size = Some(size);
    }
}

/// A class definition: a named type with attributes and methods.
#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub methods: Vec<Method>,
    pub span: Span,
    type_id: Option<TypeId>,
}

impl Class {
    pub fn new(
        name: impl Into<String>,
        attributes: Vec<Attribute>,
        methods: Vec<Method>,
        span: Span,
    ) -> Self {
        Self {
            name: name.into(),
            attributes,
            methods,
            span,
            type_id: None,
        }
    }

    /// The registered class type, or [`InternalError::NotDecorated`] before
    /// decoration.
    pub fn type_id(&self) -> Result<TypeId, InternalError> {
        self.type_id.ok_or(InternalError::NotDecorated { node: "Class" })
    }

    pub(crate) fn resolve(&mut self, id: TypeId) {
        self.type_id = Some(id);
    }
}
