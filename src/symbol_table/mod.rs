//! Symbol table module for the compiler.
//!
//! Scopes are kept in an arena and linked to their parent by index. Both the
//! type checker and the code generator build their own table while walking
//! the tree, pushing a scope on block entry and popping it on exit.
//!
//! Lookups that miss every program scope fall back to the standard library
//! scope, which is built once per process and never modified.

pub mod symbol_table;

#[cfg(test)]
mod tests;
