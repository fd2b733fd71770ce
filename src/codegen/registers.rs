//! The physical register model.
//!
//! Code generation targets the sixteen general-purpose 64-bit registers
//! directly; there is no virtual register abstraction and no spilling. The
//! language's expression shapes never need more registers than exist, so
//! the allocation policy is fixed per node kind.

use std::fmt;

/// One of the sixteen x86-64 general-purpose registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    Rax,
    Rbx,
    Rcx,
    Rdx,
    Rsi,
    Rdi,
    Rbp,
    Rsp,
    R8,
    R9,
    R10,
    R11,
    R12,
    R13,
    R14,
    R15,
}

impl Register {
    pub const ALL: [Register; 16] = [
        Register::Rax,
        Register::Rbx,
        Register::Rcx,
        Register::Rdx,
        Register::Rsi,
        Register::Rdi,
        Register::Rbp,
        Register::Rsp,
        Register::R8,
        Register::R9,
        Register::R10,
        Register::R11,
        Register::R12,
        Register::R13,
        Register::R14,
        Register::R15,
    ];

    /// Where call arguments go, in order (System V AMD64).
    pub const ARGUMENT_ORDER: [Register; 6] = [
        Register::Rdi,
        Register::Rsi,
        Register::Rdx,
        Register::Rcx,
        Register::R8,
        Register::R9,
    ];

    /// Where a function's return value lives.
    pub const RETURN_VALUE: Register = Register::Rax;

    /// The NASM spelling of this register.
    pub const fn name(self) -> &'static str {
        match self {
            Register::Rax => "rax",
            Register::Rbx => "rbx",
            Register::Rcx => "rcx",
            Register::Rdx => "rdx",
            Register::Rsi => "rsi",
            Register::Rdi => "rdi",
            Register::Rbp => "rbp",
            Register::Rsp => "rsp",
            Register::R8 => "r8",
            Register::R9 => "r9",
            Register::R10 => "r10",
            Register::R11 => "r11",
            Register::R12 => "r12",
            Register::R13 => "r13",
            Register::R14 => "r14",
            Register::R15 => "r15",
        }
    }

    /// Parse a register name as written in a binding request.
    /// Case-insensitive; returns `None` for anything else.
    pub fn parse(name: &str) -> Option<Register> {
        let lowered = name.to_ascii_lowercase();
        Register::ALL
            .into_iter()
            .find(|register| register.name() == lowered)
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
