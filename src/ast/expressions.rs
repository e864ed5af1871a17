use std::mem;

use crate::{errors::errors::Error, lexer::tokens::Token};

use super::{
    types::{BinaryOp, Type, UnaryOp},
    visitor::{Visitor, VisitorMut},
};

/// An expression node together with the type inferred for it.
///
/// `ty` is `None` until the type checker has visited the node.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub ty: Option<Type>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal(LiteralExpr),
    Identifier(IdentifierExpr),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
    FnCall(FnCallExpr),
    /// Only ever inserted by the type checker.
    TypeCast(TypeCastExpr),
}

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        Expr { kind, ty: None }
    }

    pub fn accept<V: Visitor>(&self, visitor: &mut V) -> Result<V::Output, Error> {
        match &self.kind {
            ExprKind::Literal(expr) => visitor.visit_literal(expr),
            ExprKind::Identifier(expr) => visitor.visit_identifier(expr),
            ExprKind::Unary(expr) => visitor.visit_unary(expr),
            ExprKind::Binary(expr) => visitor.visit_binary(expr),
            ExprKind::FnCall(expr) => visitor.visit_fn_call(expr),
            ExprKind::TypeCast(expr) => visitor.visit_type_cast(expr),
        }
    }

    pub fn accept_mut<V: VisitorMut>(&mut self, visitor: &mut V) -> Result<V::Output, Error> {
        match &mut self.kind {
            ExprKind::Literal(expr) => visitor.visit_literal(expr),
            ExprKind::Identifier(expr) => visitor.visit_identifier(expr),
            ExprKind::Unary(expr) => visitor.visit_unary(expr),
            ExprKind::Binary(expr) => visitor.visit_binary(expr),
            ExprKind::FnCall(expr) => visitor.visit_fn_call(expr),
            ExprKind::TypeCast(expr) => visitor.visit_type_cast(expr),
        }
    }

    /// The token used to position errors raised for this expression.
    pub fn token(&self) -> &Token {
        match &self.kind {
            ExprKind::Literal(expr) => &expr.token,
            ExprKind::Identifier(expr) => &expr.name,
            ExprKind::Unary(expr) => &expr.token,
            ExprKind::Binary(expr) => &expr.token,
            ExprKind::FnCall(expr) => &expr.name,
            ExprKind::TypeCast(expr) => expr.expr.token(),
        }
    }

    /// Replaces this expression with a cast of itself to `target`.
    pub fn wrap_in_cast(&mut self, target: Type) {
        let placeholder = Expr::new(ExprKind::Literal(LiteralExpr {
            token: Token::null(),
        }));
        let inner = mem::replace(self, placeholder);

        *self = Expr {
            kind: ExprKind::TypeCast(TypeCastExpr {
                expr: Box::new(inner),
                target,
            }),
            ty: Some(target),
        };
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralExpr {
    pub token: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IdentifierExpr {
    pub name: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub token: Token,
    pub expr: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub left: Box<Expr>,
    pub op: BinaryOp,
    pub token: Token,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FnCallExpr {
    pub name: Token,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeCastExpr {
    pub expr: Box<Expr>,
    pub target: Type,
}
