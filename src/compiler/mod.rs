//! Code generation module for the compiler.
//!
//! This module lowers a type checked tree to textual .NET IL, ready for
//! `ilasm`. It handles:
//!
//! - The assembly header and the `Program` class layout
//! - Storage classes: static fields, locals and arguments
//! - Control flow lowering with numbered branch labels
//! - Calls into the program and into the PSILib standard library

pub mod compiler;
pub mod expr;
pub mod stmt;

#[cfg(test)]
mod tests;
