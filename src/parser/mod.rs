//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into an Abstract Syntax Tree. It uses a Pratt parser for expressions
//! with proper operator precedence and handles:
//!
//! - Declaration sections (constants, variables, functions, procedures)
//! - Statement parsing (assignments, calls, control flow, write/read)
//! - Expression parsing (unary and binary ops, function calls, literals)
//! - Type names in declarations
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling. The
//! first syntax error aborts parsing.

pub mod decl;
pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;
