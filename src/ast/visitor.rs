//! Traversal contracts over the tree.
//!
//! A pass implements one method per node variant; `accept`/`accept_mut` on the
//! node types dispatch to the matching method with an exhaustive `match`, so a
//! new variant cannot be added without every pass handling it. Each pass picks
//! its own `Output`: the type checker returns the inferred `Type`, the code
//! generator returns `()`.
//!
//! Parents visit their children explicitly, in evaluation order.

use crate::errors::errors::Error;

use super::{
    ast::{Block, ConstDecl, FnDecl, Program, VarDecl},
    expressions::{
        BinaryExpr, FnCallExpr, IdentifierExpr, LiteralExpr, TypeCastExpr, UnaryExpr,
    },
    statements::{
        AssignStmt, CallStmt, CompoundStmt, ForStmt, IfStmt, ReadStmt, RepeatStmt, WhileStmt,
        WriteStmt,
    },
};

/// A read-only pass over the tree.
pub trait Visitor {
    type Output;

    fn visit_program(&mut self, program: &Program) -> Result<Self::Output, Error>;
    fn visit_block(&mut self, block: &Block) -> Result<Self::Output, Error>;
    fn visit_const_decl(&mut self, decl: &ConstDecl) -> Result<Self::Output, Error>;
    fn visit_var_decl(&mut self, decl: &VarDecl) -> Result<Self::Output, Error>;
    fn visit_fn_decl(&mut self, decl: &FnDecl) -> Result<Self::Output, Error>;

    fn visit_compound(&mut self, stmt: &CompoundStmt) -> Result<Self::Output, Error>;
    fn visit_assign(&mut self, stmt: &AssignStmt) -> Result<Self::Output, Error>;
    fn visit_if(&mut self, stmt: &IfStmt) -> Result<Self::Output, Error>;
    fn visit_while(&mut self, stmt: &WhileStmt) -> Result<Self::Output, Error>;
    fn visit_repeat(&mut self, stmt: &RepeatStmt) -> Result<Self::Output, Error>;
    fn visit_for(&mut self, stmt: &ForStmt) -> Result<Self::Output, Error>;
    fn visit_write(&mut self, stmt: &WriteStmt) -> Result<Self::Output, Error>;
    fn visit_read(&mut self, stmt: &ReadStmt) -> Result<Self::Output, Error>;
    fn visit_call(&mut self, stmt: &CallStmt) -> Result<Self::Output, Error>;

    fn visit_literal(&mut self, expr: &LiteralExpr) -> Result<Self::Output, Error>;
    fn visit_identifier(&mut self, expr: &IdentifierExpr) -> Result<Self::Output, Error>;
    fn visit_unary(&mut self, expr: &UnaryExpr) -> Result<Self::Output, Error>;
    fn visit_binary(&mut self, expr: &BinaryExpr) -> Result<Self::Output, Error>;
    fn visit_fn_call(&mut self, expr: &FnCallExpr) -> Result<Self::Output, Error>;
    fn visit_type_cast(&mut self, expr: &TypeCastExpr) -> Result<Self::Output, Error>;
}

/// A pass that may rewrite the tree while walking it.
pub trait VisitorMut {
    type Output;

    fn visit_program(&mut self, program: &mut Program) -> Result<Self::Output, Error>;
    fn visit_block(&mut self, block: &mut Block) -> Result<Self::Output, Error>;
    fn visit_const_decl(&mut self, decl: &mut ConstDecl) -> Result<Self::Output, Error>;
    fn visit_var_decl(&mut self, decl: &mut VarDecl) -> Result<Self::Output, Error>;
    fn visit_fn_decl(&mut self, decl: &mut FnDecl) -> Result<Self::Output, Error>;

    fn visit_compound(&mut self, stmt: &mut CompoundStmt) -> Result<Self::Output, Error>;
    fn visit_assign(&mut self, stmt: &mut AssignStmt) -> Result<Self::Output, Error>;
    fn visit_if(&mut self, stmt: &mut IfStmt) -> Result<Self::Output, Error>;
    fn visit_while(&mut self, stmt: &mut WhileStmt) -> Result<Self::Output, Error>;
    fn visit_repeat(&mut self, stmt: &mut RepeatStmt) -> Result<Self::Output, Error>;
    fn visit_for(&mut self, stmt: &mut ForStmt) -> Result<Self::Output, Error>;
    fn visit_write(&mut self, stmt: &mut WriteStmt) -> Result<Self::Output, Error>;
    fn visit_read(&mut self, stmt: &mut ReadStmt) -> Result<Self::Output, Error>;
    fn visit_call(&mut self, stmt: &mut CallStmt) -> Result<Self::Output, Error>;

    fn visit_literal(&mut self, expr: &mut LiteralExpr) -> Result<Self::Output, Error>;
    fn visit_identifier(&mut self, expr: &mut IdentifierExpr) -> Result<Self::Output, Error>;
    fn visit_unary(&mut self, expr: &mut UnaryExpr) -> Result<Self::Output, Error>;
    fn visit_binary(&mut self, expr: &mut BinaryExpr) -> Result<Self::Output, Error>;
    fn visit_fn_call(&mut self, expr: &mut FnCallExpr) -> Result<Self::Output, Error>;
    fn visit_type_cast(&mut self, expr: &mut TypeCastExpr) -> Result<Self::Output, Error>;
}
