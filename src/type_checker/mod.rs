//! Type checking and semantic analysis module.
//!
//! This module resolves every name against a scoped symbol table and checks
//! the program's types, annotating the tree in place:
//!
//! - Every expression node is tagged with its inferred type
//! - Implicit coercions are made explicit as `TypeCast` nodes
//! - Routine calls are checked against the callee's signature
//! - Reads of variables that were never assigned are rejected
//!
//! Analysis stops at the first error, and the tree is left untouched.

pub mod type_checker;
