//! Debug dump of the tree as an indented outline.
//!
//! One routine per node kind, matching the sums exhaustively. Used by tests
//! and by the CLI's `--dump-ast` flag.

use super::decl::{Attribute, Class, Function, Method};
use super::expr::{Expression, FunctionCall};
use super::stmt::{Instruction, InstructionList};
use super::TranslationUnit;
use std::fmt::Write;

impl TranslationUnit {
    /// Render the tree as an indented outline, one node per line.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "TranslationUnit");
        for class in &self.classes {
            dump_class(class, 1, &mut out);
        }
        for function in &self.functions {
            dump_function(function, 1, &mut out);
        }
        out
    }
}

fn indent(depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn dump_class(class: &Class, depth: usize, out: &mut String) {
    indent(depth, out);
    let _ = writeln!(out, "Class {}", class.name);
    for attr in &class.attributes {
        dump_attribute(attr, depth + 1, out);
    }
    for method in &class.methods {
        dump_method(method, depth + 1, out);
    }
}

fn dump_attribute(attr: &Attribute, depth: usize, out: &mut String) {
    indent(depth, out);
    let _ = writeln!(
        out,
        "Attribute {} {} {}",
        attr.visibility,
        attr.ty.full_name(),
        attr.name
    );
}

fn dump_method(method: &Method, depth: usize, out: &mut String) {
    indent(depth, out);
    let _ = writeln!(
        out,
        "Method {} {} {}({})",
        method.visibility,
        method.return_type.full_name(),
        method.name,
        signature(&method.params)
    );
    dump_body(&method.body, depth + 1, out);
}

fn dump_function(function: &Function, depth: usize, out: &mut String) {
    indent(depth, out);
    let _ = writeln!(
        out,
        "Function {} {}({})",
        function.return_type.full_name(),
        function.name,
        signature(&function.params)
    );
    dump_body(&function.body, depth + 1, out);
}

fn signature(params: &super::decl::FunctionParameterList) -> String {
    params
        .iter()
        .map(|p| format!("{} {}", p.ty.full_name(), p.name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn dump_body(body: &InstructionList, depth: usize, out: &mut String) {
    for instruction in &body.instructions {
        dump_instruction(instruction, depth, out);
    }
}

fn dump_instruction(instruction: &Instruction, depth: usize, out: &mut String) {
    indent(depth, out);
    match instruction {
        Instruction::Return(ret) => {
            let _ = writeln!(out, "Return");
            dump_expression(&ret.value, depth + 1, out);
        }
        Instruction::Declaration(decl) => {
            let _ = writeln!(
                out,
                "Declaration {} {}",
                decl.ty.full_name(),
                decl.variable.name
            );
            if let Some(init) = &decl.initializer {
                dump_expression(init, depth + 1, out);
            }
        }
        Instruction::InlineAsm(asm) => {
            let bindings = asm
                .bindings
                .iter()
                .map(|b| format!("={}({})", b.register, b.variable.name))
                .collect::<Vec<_>>()
                .join(", ");
            let _ = writeln!(out, "InlineAsm [{}]", bindings);
        }
        Instruction::Call(call) => dump_call(call, depth, out),
    }
}

fn dump_call(call: &FunctionCall, depth: usize, out: &mut String) {
    let _ = writeln!(out, "Call {}", call.name);
    for argument in &call.arguments {
        dump_expression(argument, depth + 1, out);
    }
}

fn dump_expression(expression: &Expression, depth: usize, out: &mut String) {
    indent(depth, out);
    match expression {
        Expression::Number(n) => {
            let _ = writeln!(out, "Number {}", n.value);
        }
        Expression::Variable(v) => {
            let _ = writeln!(out, "Variable {}", v.name);
        }
    }
}
