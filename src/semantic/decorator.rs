//! The decoration pass: resolve every name, attach every description.
//!
//! Decoration runs in two steps over the translation unit:
//! 1. a registration pre-pass declares every class's type name and every
//!    free function's signature in the global scope, so forward references
//!    and self-recursion resolve;
//! 2. the decoration pass then walks class bodies and function bodies,
//!    resolving types and variables, assigning stack storage, and checking
//!    inline-assembly binding requests.
//!
//! The pass mutates the tree in place exactly once and has no other side
//! effects. It aborts on the first error; code generation never sees a
//! partially decorated tree.

use rustc_hash::FxHashSet;

use super::descriptions::{ResolvedType, Storage, TypeKind};
use super::error::{SemanticError, SemanticErrorKind};
use super::scope::ScopeStack;
use crate::ast::{
    Class, Declaration, Expression, Function, FunctionCall, InlineAsmStatement, Instruction,
    Method, TranslationUnit, TypeExpr,
};
use crate::codegen::Register;

/// Decorate a translation unit, resolving every reference against `scopes`.
///
/// `scopes` must be freshly constructed; it ends up owning every
/// description the tree references and must stay alive until code
/// generation finishes. Decorating a tree twice is undefined.
pub fn decorate(
    unit: &mut TranslationUnit,
    scopes: &mut ScopeStack,
) -> Result<(), SemanticError> {
    Decorator { scopes }.decorate_unit(unit)
}

/// Stack slot bookkeeping for one function or method body.
///
/// Every declared variable gets an 8-byte slot; offsets grow downward from
/// the frame pointer in declaration order.
struct FrameLayout {
    next_offset: u32,
}

impl FrameLayout {
    fn new() -> Self {
        Self { next_offset: 0 }
    }

    fn allocate_slot(&mut self) -> Storage {
        self.next_offset += 8;
        Storage::Stack {
            offset: self.next_offset,
        }
    }

    /// Total frame size, rounded up so `rsp` stays 16-byte aligned at call
    /// sites.
    fn frame_size(&self) -> u32 {
        self.next_offset.next_multiple_of(16)
    }
}

struct Decorator<'a> {
    scopes: &'a mut ScopeStack,
}

impl Decorator<'_> {
    fn decorate_unit(&mut self, unit: &mut TranslationUnit) -> Result<(), SemanticError> {
        // Registration pre-pass: class types first, then function
        // signatures, so signatures may mention class types and bodies may
        // call forward.
        for class in &mut unit.classes {
            let id = self
                .scopes
                .declare_type(&class.name, TypeKind::Class, class.span)?;
            class.resolve(id);
        }
        let mut signatures = Vec::with_capacity(unit.functions.len());
        for function in &mut unit.functions {
            signatures.push(self.register_function(function)?);
        }

        for class in &mut unit.classes {
            self.decorate_class(class)?;
        }
        for (function, params) in unit.functions.iter_mut().zip(signatures) {
            self.decorate_function_body(function, params)?;
        }
        Ok(())
    }

    /// Resolve a type expression and return the (base, depth) pair used by
    /// descriptions.
    fn resolve_type_expr(&mut self, ty: &mut TypeExpr) -> Result<ResolvedType, SemanticError> {
        let type_id = self.scopes.resolve_type(&ty.name, ty.span)?;
        ty.resolve(type_id);
        Ok(ResolvedType {
            type_id,
            pointer_depth: ty.pointer_depth,
        })
    }

    /// Declare a function's signature in the current (global) scope.
    /// Returns the resolved parameter types for the body pass.
    fn register_function(
        &mut self,
        function: &mut Function,
    ) -> Result<Vec<ResolvedType>, SemanticError> {
        let return_type = self.resolve_type_expr(&mut function.return_type)?;
        let mut params = Vec::with_capacity(function.params.len());
        for param in &mut function.params.parameters {
            params.push(self.resolve_type_expr(&mut param.ty)?);
        }
        let id = self.scopes.declare_function(
            &function.name,
            return_type,
            params.clone(),
            function.span,
        )?;
        function.resolve(id);
        Ok(params)
    }

    fn decorate_function_body(
        &mut self,
        function: &mut Function,
        params: Vec<ResolvedType>,
    ) -> Result<(), SemanticError> {
        self.scopes.push_scope();
        let mut frame = FrameLayout::new();

        for (param, ty) in function.params.parameters.iter_mut().zip(params) {
            let storage = frame.allocate_slot();
            let id = self
                .scopes
                .declare_variable(&param.name, ty, storage, param.span)?;
            param.resolve(id);
        }
        for instruction in &mut function.body.instructions {
            self.decorate_instruction(instruction, &mut frame)?;
        }

        self.scopes.pop_scope();
        function.set_frame_size(frame.frame_size());
        Ok(())
    }

    fn decorate_class(&mut self, class: &mut Class) -> Result<(), SemanticError> {
        self.scopes.push_scope();
        for attribute in &mut class.attributes {
            self.resolve_type_expr(&mut attribute.ty)?;
        }
        for method in &mut class.methods {
            self.decorate_method(method)?;
        }
        self.scopes.pop_scope();
        Ok(())
    }

    /// Methods decorate exactly like functions but are not registered as
    /// callable entities; lowering them is a later stage of the language.
    fn decorate_method(&mut self, method: &mut Method) -> Result<(), SemanticError> {
        self.resolve_type_expr(&mut method.return_type)?;
        let mut params = Vec::with_capacity(method.params.len());
        for param in &mut method.params.parameters {
            params.push(self.resolve_type_expr(&mut param.ty)?);
        }

        self.scopes.push_scope();
        let mut frame = FrameLayout::new();
        for (param, ty) in method.params.parameters.iter_mut().zip(params) {
            let storage = frame.allocate_slot();
            let id = self
                .scopes
                .declare_variable(&param.name, ty, storage, param.span)?;
            param.resolve(id);
        }
        for instruction in &mut method.body.instructions {
            self.decorate_instruction(instruction, &mut frame)?;
        }
        self.scopes.pop_scope();
        method.set_frame_size(frame.frame_size());
        Ok(())
    }

    fn decorate_instruction(
        &mut self,
        instruction: &mut Instruction,
        frame: &mut FrameLayout,
    ) -> Result<(), SemanticError> {
        match instruction {
            Instruction::Return(ret) => self.decorate_expression(&mut ret.value),
            Instruction::Declaration(decl) => self.decorate_declaration(decl, frame),
            Instruction::InlineAsm(asm) => self.decorate_inline_asm(asm),
            Instruction::Call(call) => self.decorate_call(call),
        }
    }

    fn decorate_declaration(
        &mut self,
        decl: &mut Declaration,
        frame: &mut FrameLayout,
    ) -> Result<(), SemanticError> {
        let ty = self.resolve_type_expr(&mut decl.ty)?;
        let storage = frame.allocate_slot();
        let id = self
            .scopes
            .declare_variable(&decl.variable.name, ty, storage, decl.variable.span)?;
        decl.variable.resolve(id);

        // The name is in scope before its initializer is decorated, so
        // `int x = x;` resolves to the fresh declaration.
        if let Some(initializer) = &mut decl.initializer {
            self.decorate_expression(initializer)?;
        }
        Ok(())
    }

    fn decorate_inline_asm(&mut self, asm: &mut InlineAsmStatement) -> Result<(), SemanticError> {
        let mut bound: FxHashSet<Register> = FxHashSet::default();
        for binding in &mut asm.bindings {
            if !bound.insert(binding.register) {
                return Err(SemanticError::new(
                    SemanticErrorKind::ConflictingRegisterBinding,
                    binding.span,
                    format!(
                        "register '{}' is requested by more than one binding in this statement",
                        binding.register
                    ),
                ));
            }
            let id = self
                .scopes
                .resolve_variable(&binding.variable.name, binding.variable.span)?;
            binding.variable.resolve(id);
        }
        Ok(())
    }

    fn decorate_call(&mut self, call: &mut FunctionCall) -> Result<(), SemanticError> {
        let id = self.scopes.resolve_function(&call.name, call.span)?;
        call.resolve(id);
        for argument in &mut call.arguments {
            self.decorate_expression(argument)?;
        }
        Ok(())
    }

    fn decorate_expression(&mut self, expression: &mut Expression) -> Result<(), SemanticError> {
        match expression {
            Expression::Number(_) => Ok(()),
            Expression::Variable(variable) => {
                let id = self
                    .scopes
                    .resolve_variable(&variable.name, variable.span)?;
                variable.resolve(id);
                Ok(())
            }
        }
    }
}
