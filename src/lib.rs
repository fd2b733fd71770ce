//! Crate root: wires together the compilation pipeline.
//!
//! The stages are small and composable so they can evolve independently:
//! - [`lexer`] performs lexical analysis and produces a flat token stream;
//! - [`parser`] owns all syntactic knowledge and returns the undecorated
//!   tree;
//! - [`semantic`] resolves every name against the scope stack and attaches
//!   type and storage metadata to the tree in place;
//! - [`codegen`] lowers the decorated tree into NASM-syntax x86-64 text;
//! - [`error`] centralises the error families the other modules report.
//!
//! The pipeline is single-threaded and runs each stage to completion before
//! the next starts; the first error aborts the whole compilation.
//!
//! # Example
//!
//! ```
//! let asm = minic::compile("int five() { return 5; }").unwrap();
//! assert!(asm.contains("five:"));
//! assert!(asm.contains("mov rax, 5"));
//! ```

pub mod ast;
pub mod codegen;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod semantic;

pub use error::{CompileError, InternalError};
pub use parser::ParseError;
pub use semantic::{ScopeStack, SemanticError, SemanticErrorKind};

/// Compile a source string into a NASM x86-64 assembly listing.
pub fn compile(source: &str) -> Result<String, CompileError> {
    let tokens = lexer::tokenize(source)?;
    let mut unit = parser::parse(tokens)?;
    let mut scopes = semantic::ScopeStack::new();
    semantic::decorate(&mut unit, &mut scopes)?;
    Ok(codegen::generate(&unit, &scopes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_compiles_a_simple_program() {
        let asm = compile("int main() { return 0; }").unwrap();
        assert!(asm.starts_with("section .text"));
        assert!(asm.contains("main:"));
    }

    #[test]
    fn pipeline_propagates_each_error_family() {
        assert!(matches!(compile("int f() { @"), Err(CompileError::Parse(_))));
        assert!(matches!(
            compile("int f() { return y; }"),
            Err(CompileError::Semantic(_))
        ));
    }
}
