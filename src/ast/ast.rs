use crate::{errors::errors::Error, lexer::tokens::Token};

use super::{
    statements::CompoundStmt,
    types::Type,
    visitor::{Visitor, VisitorMut},
};

/// Root of a parsed program: `program NAME; block.`
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub name: Token,
    pub block: Block,
}

impl Program {
    pub fn accept<V: Visitor>(&self, visitor: &mut V) -> Result<V::Output, Error> {
        visitor.visit_program(self)
    }

    pub fn accept_mut<V: VisitorMut>(&mut self, visitor: &mut V) -> Result<V::Output, Error> {
        visitor.visit_program(self)
    }
}

/// Declarations followed by a `begin ... end` body.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub declarations: Declarations,
    pub body: CompoundStmt,
}

impl Block {
    pub fn accept<V: Visitor>(&self, visitor: &mut V) -> Result<V::Output, Error> {
        visitor.visit_block(self)
    }

    pub fn accept_mut<V: VisitorMut>(&mut self, visitor: &mut V) -> Result<V::Output, Error> {
        visitor.visit_block(self)
    }
}

/// Declarations of one block, grouped by kind and kept in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Declarations {
    pub consts: Vec<ConstDecl>,
    pub vars: Vec<VarDecl>,
    pub functions: Vec<FnDecl>,
}

impl Declarations {
    pub fn is_empty(&self) -> bool {
        self.consts.is_empty() && self.vars.is_empty() && self.functions.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstDecl {
    pub name: Token,
    /// Always a literal token.
    pub value: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub name: Token,
    pub var_type: Type,
}

/// A function or procedure. Procedures have a `Void` return type.
#[derive(Debug, Clone, PartialEq)]
pub struct FnDecl {
    pub name: Token,
    pub params: Vec<VarDecl>,
    pub return_type: Type,
    pub block: Block,
}

impl FnDecl {
    pub fn is_procedure(&self) -> bool {
        self.return_type == Type::Void
    }
}
