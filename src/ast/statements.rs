use crate::{errors::errors::Error, lexer::tokens::Token};

use super::{
    expressions::Expr,
    visitor::{Visitor, VisitorMut},
};

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Compound(CompoundStmt),
    Assign(AssignStmt),
    If(IfStmt),
    While(WhileStmt),
    Repeat(RepeatStmt),
    For(ForStmt),
    Write(WriteStmt),
    Read(ReadStmt),
    Call(CallStmt),
}

impl Stmt {
    pub fn accept<V: Visitor>(&self, visitor: &mut V) -> Result<V::Output, Error> {
        match self {
            Stmt::Compound(stmt) => visitor.visit_compound(stmt),
            Stmt::Assign(stmt) => visitor.visit_assign(stmt),
            Stmt::If(stmt) => visitor.visit_if(stmt),
            Stmt::While(stmt) => visitor.visit_while(stmt),
            Stmt::Repeat(stmt) => visitor.visit_repeat(stmt),
            Stmt::For(stmt) => visitor.visit_for(stmt),
            Stmt::Write(stmt) => visitor.visit_write(stmt),
            Stmt::Read(stmt) => visitor.visit_read(stmt),
            Stmt::Call(stmt) => visitor.visit_call(stmt),
        }
    }

    pub fn accept_mut<V: VisitorMut>(&mut self, visitor: &mut V) -> Result<V::Output, Error> {
        match self {
            Stmt::Compound(stmt) => visitor.visit_compound(stmt),
            Stmt::Assign(stmt) => visitor.visit_assign(stmt),
            Stmt::If(stmt) => visitor.visit_if(stmt),
            Stmt::While(stmt) => visitor.visit_while(stmt),
            Stmt::Repeat(stmt) => visitor.visit_repeat(stmt),
            Stmt::For(stmt) => visitor.visit_for(stmt),
            Stmt::Write(stmt) => visitor.visit_write(stmt),
            Stmt::Read(stmt) => visitor.visit_read(stmt),
            Stmt::Call(stmt) => visitor.visit_call(stmt),
        }
    }
}

/// `begin s1; s2; ... end`
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundStmt {
    pub statements: Vec<Stmt>,
}

/// `name := expr`
#[derive(Debug, Clone, PartialEq)]
pub struct AssignStmt {
    pub name: Token,
    pub expr: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub token: Token,
    pub condition: Expr,
    pub then_branch: Box<Stmt>,
    pub else_branch: Option<Box<Stmt>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub token: Token,
    pub condition: Expr,
    pub body: Box<Stmt>,
}

/// Post-test loop: the body always runs once, and the loop exits as soon as
/// the condition holds.
#[derive(Debug, Clone, PartialEq)]
pub struct RepeatStmt {
    pub token: Token,
    pub body: Vec<Stmt>,
    pub condition: Expr,
}

/// `for var := start to|downto end do body`
#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub var: Token,
    pub start: Expr,
    pub end: Expr,
    pub body: Box<Stmt>,
    pub ascending: bool,
}

/// `write(...)` or `writeln(...)`
#[derive(Debug, Clone, PartialEq)]
pub struct WriteStmt {
    pub exprs: Vec<Expr>,
    pub newline: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadStmt {
    pub token: Token,
    pub identifiers: Vec<Token>,
}

/// A procedure or function called for its effect.
#[derive(Debug, Clone, PartialEq)]
pub struct CallStmt {
    pub name: Token,
    pub args: Vec<Expr>,
}
