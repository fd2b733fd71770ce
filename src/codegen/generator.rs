//! NASM x86-64 emission from the decorated tree.
//!
//! One generation routine per node kind, dispatched over the closed sums.
//! The generator only reads: it looks descriptions up through the ids the
//! decorator attached and never recomputes scope membership. Hitting an
//! undecorated node here is a compiler defect and surfaces as an
//! [`InternalError`], never as a user diagnostic.

use super::registers::Register;
use crate::ast::{
    Declaration, Expression, Function, FunctionCall, InlineAsmStatement, Instruction,
    ReturnStatement, TranslationUnit, Variable,
};
use crate::error::InternalError;
use crate::semantic::{ScopeStack, Storage};

/// Generate the assembly listing for a decorated translation unit.
///
/// Generation is pure over its inputs: calling it twice on the same tree
/// yields byte-identical output.
pub fn generate(unit: &TranslationUnit, scopes: &ScopeStack) -> Result<String, InternalError> {
    let mut emitter = NasmEmitter::new(scopes);
    emitter.generate_unit(unit)?;
    Ok(emitter.finish())
}

/// Accumulates the output listing and holds the description arenas the
/// routines consult.
struct NasmEmitter<'a> {
    scopes: &'a ScopeStack,
    out: String,
}

impl<'a> NasmEmitter<'a> {
    fn new(scopes: &'a ScopeStack) -> Self {
        Self {
            scopes,
            out: String::new(),
        }
    }

    fn finish(self) -> String {
        self.out
    }

    fn emit(&mut self, instruction: impl AsRef<str>) {
        self.out.push_str("    ");
        self.out.push_str(instruction.as_ref());
        self.out.push('\n');
    }

    fn emit_raw(&mut self, line: impl AsRef<str>) {
        self.out.push_str(line.as_ref());
        self.out.push('\n');
    }

    fn generate_unit(&mut self, unit: &TranslationUnit) -> Result<(), InternalError> {
        self.emit_raw("section .text");
        // Classes are decorated but not lowered; only free functions
        // produce code.
        for function in &unit.functions {
            self.emit_raw("");
            self.generate_function(function)?;
        }
        Ok(())
    }

    fn generate_function(&mut self, function: &Function) -> Result<(), InternalError> {
        let frame_size = function.frame_size()?;

        self.emit_raw(format!("global {}", function.name));
        self.emit_raw(format!("{}:", function.name));
        self.emit("push rbp");
        self.emit("mov rbp, rsp");
        if frame_size > 0 {
            self.emit(format!("sub rsp, {}", frame_size));
        }

        // Spill incoming arguments into their stack slots so parameters
        // behave like any other variable.
        for (index, param) in function.params.iter().enumerate() {
            let register = argument_register(index, &function.name)?;
            let description = self.scopes.variable_description(param.variable_id()?);
            let Storage::Stack { offset } = description.storage;
            self.emit(format!("mov [rbp - {}], {}", offset, register));
        }

        for instruction in &function.body.instructions {
            self.generate_instruction(instruction)?;
        }

        // Falling off the end returns 0.
        if !function.body.ends_with_return() {
            self.emit(format!("mov {}, 0", Register::RETURN_VALUE));
            self.emit_epilogue();
        }
        Ok(())
    }

    fn generate_instruction(&mut self, instruction: &Instruction) -> Result<(), InternalError> {
        match instruction {
            Instruction::Return(ret) => self.generate_return(ret),
            Instruction::Declaration(decl) => self.generate_declaration(decl),
            Instruction::InlineAsm(asm) => self.generate_inline_asm(asm),
            Instruction::Call(call) => self.generate_call(call),
        }
    }

    fn generate_return(&mut self, ret: &ReturnStatement) -> Result<(), InternalError> {
        self.load_expression(&ret.value, Register::RETURN_VALUE)?;
        self.emit_epilogue();
        Ok(())
    }

    fn generate_declaration(&mut self, decl: &Declaration) -> Result<(), InternalError> {
        // Storage already exists in the frame; only an initializer
        // produces instructions.
        let Some(initializer) = &decl.initializer else {
            return Ok(());
        };
        self.load_expression(initializer, Register::Rax)?;
        let description = self.scopes.variable_description(decl.variable.variable_id()?);
        let Storage::Stack { offset } = description.storage;
        self.emit(format!("mov [rbp - {}], rax", offset));
        Ok(())
    }

    fn generate_inline_asm(&mut self, asm: &InlineAsmStatement) -> Result<(), InternalError> {
        for binding in &asm.bindings {
            self.load_variable(&binding.variable, binding.register)?;
        }
        // The raw block is the programmer's text, emitted untouched.
        for line in asm.body.value.lines() {
            self.emit(line);
        }
        Ok(())
    }

    fn generate_call(&mut self, call: &FunctionCall) -> Result<(), InternalError> {
        for (index, argument) in call.arguments.iter().enumerate() {
            let register = argument_register(index, &call.name)?;
            self.load_expression(argument, register)?;
        }
        let callee = self.scopes.function_description(call.function_id()?);
        self.emit(format!("call {}", callee.name));
        Ok(())
    }

    /// Materialize an expression's value into `target`. The base cases of
    /// value production: an exact immediate load, or a move from a
    /// variable's stack slot.
    fn load_expression(
        &mut self,
        expression: &Expression,
        target: Register,
    ) -> Result<(), InternalError> {
        match expression {
            Expression::Number(literal) => {
                self.emit(format!("mov {}, {}", target, literal.value));
                Ok(())
            }
            Expression::Variable(variable) => self.load_variable(variable, target),
        }
    }

    fn load_variable(
        &mut self,
        variable: &Variable,
        target: Register,
    ) -> Result<(), InternalError> {
        let description = self.scopes.variable_description(variable.variable_id()?);
        let Storage::Stack { offset } = description.storage;
        self.emit(format!("mov {}, [rbp - {}]", target, offset));
        Ok(())
    }

    fn emit_epilogue(&mut self) {
        self.emit("mov rsp, rbp");
        self.emit("pop rbp");
        self.emit("ret");
    }
}

/// The register carrying argument `index`, or an [`InternalError`] past the
/// six-register limit of the chosen convention.
fn argument_register(index: usize, callee: &str) -> Result<Register, InternalError> {
    Register::ARGUMENT_ORDER
        .get(index)
        .copied()
        .ok_or_else(|| InternalError::Unsupported {
            what: format!("more than 6 arguments in call of '{}'", callee),
        })
}
