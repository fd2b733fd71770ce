//! Code generation: decorated tree to NASM x86-64 text.

pub mod generator;
pub mod registers;

pub use generator::generate;
pub use registers::Register;
