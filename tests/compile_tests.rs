//! Integration tests for the full compilation pipeline.
//!
//! These drive `minic::compile` (and the individual stages where a test
//! needs to observe intermediate state) against complete programs and
//! assert on the emitted NASM text.

use minic::{compile, CompileError, SemanticErrorKind};

/// Compile and unwrap, panicking with the rendered error on failure.
fn asm_for(source: &str) -> String {
    match compile(source) {
        Ok(asm) => asm,
        Err(error) => panic!("compilation failed:\n{}", error.display_with_source(source)),
    }
}

/// The semantic error kind a source fails with.
fn semantic_kind(source: &str) -> SemanticErrorKind {
    match compile(source) {
        Err(CompileError::Semantic(error)) => error.kind,
        Ok(_) => panic!("expected a semantic error"),
        Err(other) => panic!("expected a semantic error, got: {other}"),
    }
}

fn trimmed_lines(asm: &str) -> Vec<&str> {
    asm.lines().map(str::trim).collect()
}

// =============================================================================
// Code shape
// =============================================================================

#[test]
fn listing_has_text_section_and_one_label_per_function() {
    let asm = asm_for("int f() { return 1; } int g() { return 2; }");
    assert!(asm.starts_with("section .text"));
    assert!(asm.contains("global f"));
    assert!(asm.contains("\nf:\n"));
    assert!(asm.contains("global g"));
    assert!(asm.contains("\ng:\n"));
}

#[test]
fn return_five_loads_the_immediate_and_returns() {
    let asm = asm_for("int f() { return 5; }");
    let lines = trimmed_lines(&asm);
    let load = lines
        .iter()
        .position(|l| *l == "mov rax, 5")
        .expect("immediate load of 5 into the return register");
    let ret = lines.iter().position(|l| *l == "ret").expect("return");
    assert!(load < ret);
}

#[test]
fn number_literals_survive_numerically_exact() {
    let asm = asm_for("uint64 f() { return 18446744073709551615; }");
    assert!(asm.contains("mov rax, 18446744073709551615"));

    let asm = asm_for("uint64 f() { return 0xdeadbeef; }");
    assert!(asm.contains("mov rax, 3735928559"));
}

#[test]
fn locals_live_in_rbp_relative_slots() {
    let asm = asm_for("int f() { int x = 1; int y = 2; return y; }");
    let lines = trimmed_lines(&asm);
    assert!(lines.contains(&"sub rsp, 16"));
    assert!(lines.contains(&"mov [rbp - 8], rax"));
    assert!(lines.contains(&"mov [rbp - 16], rax"));
    assert!(lines.contains(&"mov rax, [rbp - 16]"));
}

#[test]
fn calls_use_the_sysv_argument_registers() {
    let asm = asm_for(
        "void sink(int a, int b, int c) { } \
         int main() { sink(1, 2, 3); return 0; }",
    );
    let lines = trimmed_lines(&asm);
    let rdi = lines.iter().position(|l| *l == "mov rdi, 1").unwrap();
    let rsi = lines.iter().position(|l| *l == "mov rsi, 2").unwrap();
    let rdx = lines.iter().position(|l| *l == "mov rdx, 3").unwrap();
    let call = lines.iter().position(|l| *l == "call sink").unwrap();
    assert!(rdi < rsi && rsi < rdx && rdx < call);
}

#[test]
fn function_without_return_falls_back_to_zero() {
    let asm = asm_for("void noop() { }");
    let lines = trimmed_lines(&asm);
    let zero = lines.iter().position(|l| *l == "mov rax, 0").unwrap();
    assert_eq!(lines[zero + 3], "ret");
}

// =============================================================================
// Inline assembly
// =============================================================================

#[test]
fn binding_moves_the_variable_before_the_raw_text() {
    let asm = asm_for("int f() { int y = 9; asm(\"nop\" : =rax(y)); return 0; }");
    let lines = trimmed_lines(&asm);
    let nop = lines.iter().position(|l| *l == "nop").expect("raw nop");
    assert_eq!(lines[nop - 1], "mov rax, [rbp - 8]");
}

#[test]
fn multiple_bindings_each_get_a_move() {
    let asm = asm_for(
        "int f() { int a = 1; int b = 2; asm(\"syscall\" : =rdi(a), =rsi(b)); return 0; }",
    );
    let lines = trimmed_lines(&asm);
    let syscall = lines.iter().position(|l| *l == "syscall").unwrap();
    assert_eq!(lines[syscall - 2], "mov rdi, [rbp - 8]");
    assert_eq!(lines[syscall - 1], "mov rsi, [rbp - 16]");
}

#[test]
fn conflicting_bindings_fail_and_emit_nothing() {
    let source = "int f() { int x; int y; asm(\"nop\" : =rax(x), =rax(y)); return 0; }";
    assert_eq!(
        semantic_kind(source),
        SemanticErrorKind::ConflictingRegisterBinding
    );
}

#[test]
fn rebinding_a_register_in_a_later_statement_is_fine() {
    let asm = asm_for(
        "int f() { int x = 1; asm(\"nop\" : =rax(x)); asm(\"nop\" : =rax(x)); return 0; }",
    );
    assert_eq!(trimmed_lines(&asm).iter().filter(|&&l| l == "nop").count(), 2);
}

// =============================================================================
// Name resolution
// =============================================================================

#[test]
fn undeclared_names_always_fail_with_unresolved_name() {
    for source in [
        "int f() { return y; }",
        "int f() { int x = y; return x; }",
        "widget f() { return 0; }",
        "int f() { missing(); return 0; }",
        "int f() { asm(\"nop\" : =rax(ghost)); return 0; }",
    ] {
        assert_eq!(semantic_kind(source), SemanticErrorKind::UnresolvedName);
    }
}

#[test]
fn same_scope_redeclaration_fails_with_duplicate_declaration() {
    for source in [
        "int f() { int x; int x; }",
        "int f(int x) { int x; }",
        "int f() { return 0; } int f() { return 1; }",
        "class P { } class P { }",
    ] {
        assert_eq!(
            semantic_kind(source),
            SemanticErrorKind::DuplicateDeclaration
        );
    }
}

#[test]
fn classes_decorate_but_do_not_lower() {
    let asm = asm_for(
        "class Player { int hp; public: int get(int v) { return v; } } \
         int main() { return 0; }",
    );
    assert!(!asm.contains("get"));
    assert!(asm.contains("main:"));
}

#[test]
fn forward_references_resolve() {
    asm_for("int main() { helper(); return 0; } int helper() { return 1; }");
    asm_for("int use(Player* p) { return 0; } class Player { int hp; }");
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn generating_twice_from_one_decorated_tree_is_identical() {
    let source = "int f(int a) { int x = 41; asm(\"inc rbx\" : =rbx(x)); return a; }";
    let tokens = minic::lexer::tokenize(source).unwrap();
    let mut unit = minic::parser::parse(tokens).unwrap();
    let mut scopes = minic::ScopeStack::new();
    minic::semantic::decorate(&mut unit, &mut scopes).unwrap();

    let first = minic::codegen::generate(&unit, &scopes).unwrap();
    let second = minic::codegen::generate(&unit, &scopes).unwrap();
    assert_eq!(first, second);
}

#[test]
fn compiling_the_same_source_twice_is_identical() {
    let source = "int f() { int x = 1; return x; } int main() { f(); return 0; }";
    assert_eq!(asm_for(source), asm_for(source));
}

// =============================================================================
// Error reporting
// =============================================================================

#[test]
fn semantic_errors_point_at_the_offending_line() {
    let source = "int f() {\n    return ghost;\n}";
    let Err(error) = compile(source) else {
        panic!("expected failure");
    };
    let rendered = error.display_with_source(source);
    assert!(rendered.contains("2:"));
    assert!(rendered.contains("return ghost;"));
    assert!(rendered.contains("^"));
}

#[test]
fn parse_errors_are_not_semantic_errors() {
    assert!(matches!(
        compile("int f() { return 5 }"),
        Err(CompileError::Parse(_))
    ));
}

#[test]
fn internal_errors_render_distinguishably() {
    // Reading an undecorated tree is a compiler defect, not a user error.
    let tokens = minic::lexer::tokenize("int f() { return 5; }").unwrap();
    let unit = minic::parser::parse(tokens).unwrap();
    let scopes = minic::ScopeStack::new();
    let error = CompileError::from(minic::codegen::generate(&unit, &scopes).unwrap_err());
    assert!(format!("{error}").contains("internal compiler error"));
}
