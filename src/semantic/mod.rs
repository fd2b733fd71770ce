//! Semantic analysis: scopes, descriptions, and the decoration pass.
//!
//! The pipeline is register-then-decorate:
//! - the [`ScopeStack`] owns every [`Scope`] and every description record,
//!   keeping them alive until code generation finishes;
//! - [`decorate`] walks the tree once, resolving names innermost-scope-first
//!   and attaching description ids to every node.

pub mod decorator;
pub mod descriptions;
pub mod error;
pub mod scope;

pub use decorator::decorate;
pub use descriptions::{
    FunctionDescription, FunctionId, PrimitiveType, ResolvedType, Storage, TypeDescription,
    TypeId, TypeKind, VariableDescription, VariableId,
};
pub use error::{SemanticError, SemanticErrorKind};
pub use scope::{Scope, ScopeStack};
