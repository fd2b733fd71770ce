//! Type expressions as written in source.

use crate::error::InternalError;
use crate::lexer::Span;
use crate::semantic::TypeId;

/// A type reference: a base name plus a pointer-indirection depth.
///
/// `int` has depth 0, `int*` depth 1, `int**` depth 2, and so on. Pointer
/// types are structural — only the base name is looked up during
/// decoration, and the depth stays on this node.
///
/// Before decoration the node is just the raw (name, depth) pair; after a
/// successful decoration it also carries the [`TypeId`] of the resolved
/// type description. [`TypeExpr::type_id`] makes the two states explicit by
/// returning a `Result` instead of faulting.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeExpr {
    pub name: String,
    pub pointer_depth: u8,
    pub span: Span,
    type_id: Option<TypeId>,
}

impl TypeExpr {
    pub fn new(name: impl Into<String>, pointer_depth: u8, span: Span) -> Self {
        Self {
            name: name.into(),
            pointer_depth,
            span,
            type_id: None,
        }
    }

    /// The type as spelled in source, e.g. `int**`.
    pub fn full_name(&self) -> String {
        let mut name = self.name.clone();
        for _ in 0..self.pointer_depth {
            name.push('*');
        }
        name
    }

    /// The resolved base type, or [`InternalError::NotDecorated`] when the
    /// decorator has not visited this node yet.
    pub fn type_id(&self) -> Result<TypeId, InternalError> {
        self.type_id.ok_or(InternalError::NotDecorated { node: "Type" })
    }

    /// Whether decoration has resolved this node.
    pub fn is_decorated(&self) -> bool {
        self.type_id.is_some()
    }

    pub(crate) fn resolve(&mut self, id: TypeId) {
        self.type_id = Some(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_name_appends_pointer_stars() {
        let ty = TypeExpr::new("int", 2, Span::point(1, 1));
        assert_eq!(ty.full_name(), "int**");
    }

    #[test]
    fn type_id_before_decoration_is_an_internal_error() {
        let ty = TypeExpr::new("int", 0, Span::point(1, 1));
        assert!(!ty.is_decorated());
        assert_eq!(
            ty.type_id(),
            Err(InternalError::NotDecorated { node: "Type" })
        );
    }

    #[test]
    fn type_id_after_decoration_round_trips() {
        let mut ty = TypeExpr::new("int", 0, Span::point(1, 1));
        ty.resolve(TypeId(3));
        assert_eq!(ty.type_id(), Ok(TypeId(3)));
    }
}
