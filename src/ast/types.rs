//! Type system definitions for the AST.
//!
//! This module defines the closed set of primitive types and the rules that
//! relate them:
//!
//! - Which single-value coercions may be inserted implicitly
//! - The result type and operand casts of every binary operator
//! - The operand types accepted by each unary operator
//!
//! Both the type checker and the code generator consult these rules, so they
//! live next to the tree rather than inside either pass.

use std::fmt::Display;

use crate::lexer::tokens::TokenKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Void,
    Integer,
    Real,
    Boolean,
    Char,
    String,
    /// Produced by failed inference; never valid in a checked tree.
    Error,
}

impl Type {
    /// Returns the type of a literal token kind, if it is a literal.
    pub fn from_literal(kind: TokenKind) -> Option<Type> {
        match kind {
            TokenKind::Integer => Some(Type::Integer),
            TokenKind::Real => Some(Type::Real),
            TokenKind::Boolean => Some(Type::Boolean),
            TokenKind::String => Some(Type::String),
            TokenKind::Char => Some(Type::Char),
            _ => None,
        }
    }

    /// Resolves a type name as written in source. Names are case-insensitive.
    pub fn from_name(name: &str) -> Option<Type> {
        match name.to_lowercase().as_str() {
            "integer" => Some(Type::Integer),
            "real" => Some(Type::Real),
            "boolean" => Some(Type::Boolean),
            "char" => Some(Type::Char),
            "string" => Some(Type::String),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Integer | Type::Real)
    }

    pub fn is_textual(&self) -> bool {
        matches!(self, Type::Char | Type::String)
    }

    /// Whether a value of this type can be stored, passed or printed.
    pub fn is_value(&self) -> bool {
        !matches!(self, Type::Void | Type::Error)
    }

    /// The IL spelling of the type.
    pub fn il_name(&self) -> &'static str {
        match self {
            Type::Void => "void",
            Type::Integer => "int32",
            Type::Real => "float64",
            Type::Boolean => "bool",
            Type::Char => "char",
            Type::String => "string",
            Type::Error => "<error>",
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Type::Void => "void",
            Type::Integer => "integer",
            Type::Real => "real",
            Type::Boolean => "boolean",
            Type::Char => "char",
            Type::String => "string",
            Type::Error => "error",
        };
        write!(f, "{}", name)
    }
}

/// Implicit single-value coercions, used for assignments and call arguments.
///
/// A same-type pair never needs a cast and is not reported as coercible.
pub fn can_coerce(from: Type, to: Type) -> bool {
    matches!(
        (from, to),
        (Type::Integer, Type::Real) | (Type::Char, Type::Integer) | (Type::Char, Type::String)
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Neq,
    Lt,
    Leq,
    Gt,
    Geq,
    And,
    Or,
}

impl BinaryOp {
    pub fn from_token_kind(kind: TokenKind) -> Option<BinaryOp> {
        match kind {
            TokenKind::Plus => Some(BinaryOp::Add),
            TokenKind::Dash => Some(BinaryOp::Sub),
            TokenKind::Star => Some(BinaryOp::Mul),
            TokenKind::Slash => Some(BinaryOp::Div),
            TokenKind::Mod => Some(BinaryOp::Mod),
            TokenKind::Equals => Some(BinaryOp::Eq),
            TokenKind::NotEquals => Some(BinaryOp::Neq),
            TokenKind::Less => Some(BinaryOp::Lt),
            TokenKind::LessEquals => Some(BinaryOp::Leq),
            TokenKind::Greater => Some(BinaryOp::Gt),
            TokenKind::GreaterEquals => Some(BinaryOp::Geq),
            TokenKind::And => Some(BinaryOp::And),
            TokenKind::Or => Some(BinaryOp::Or),
            _ => None,
        }
    }

    pub fn is_arithmetic(&self) -> bool {
        matches!(self, BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div)
    }

    pub fn is_ordering(&self) -> bool {
        matches!(self, BinaryOp::Lt | BinaryOp::Leq | BinaryOp::Gt | BinaryOp::Geq)
    }

    pub fn is_equality(&self) -> bool {
        matches!(self, BinaryOp::Eq | BinaryOp::Neq)
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "mod",
            BinaryOp::Eq => "=",
            BinaryOp::Neq => "<>",
            BinaryOp::Lt => "<",
            BinaryOp::Leq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Geq => ">=",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
        };
        write!(f, "{}", symbol)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    Plus,
    Not,
}

impl UnaryOp {
    pub fn from_token_kind(kind: TokenKind) -> Option<UnaryOp> {
        match kind {
            TokenKind::Dash => Some(UnaryOp::Negate),
            TokenKind::Plus => Some(UnaryOp::Plus),
            TokenKind::Not => Some(UnaryOp::Not),
            _ => None,
        }
    }
}

impl Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            UnaryOp::Negate => "-",
            UnaryOp::Plus => "+",
            UnaryOp::Not => "not",
        };
        write!(f, "{}", symbol)
    }
}

/// The outcome of applying a binary operator to two operand types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryRule {
    pub result: Type,
    pub left_cast: Option<Type>,
    pub right_cast: Option<Type>,
}

impl BinaryRule {
    fn plain(result: Type) -> Self {
        BinaryRule {
            result,
            left_cast: None,
            right_cast: None,
        }
    }
}

/// Widens a mixed Integer/Real pair, casting the Integer side to Real.
fn promote(left: Type, right: Type) -> (Option<Type>, Option<Type>) {
    match (left, right) {
        (Type::Integer, Type::Real) => (Some(Type::Real), None),
        (Type::Real, Type::Integer) => (None, Some(Type::Real)),
        _ => (None, None),
    }
}

/// Resolves the result type and operand casts for `left op right`.
///
/// Returns `None` when no rule applies.
pub fn binary_rule(op: BinaryOp, left: Type, right: Type) -> Option<BinaryRule> {
    if !left.is_value() || !right.is_value() {
        return None;
    }

    if op == BinaryOp::Add && (left == Type::String || right == Type::String) {
        return Some(BinaryRule {
            result: Type::String,
            left_cast: (left != Type::String).then_some(Type::String),
            right_cast: (right != Type::String).then_some(Type::String),
        });
    }

    if op.is_arithmetic() {
        if left.is_numeric() && right.is_numeric() {
            let (left_cast, right_cast) = promote(left, right);
            let result = if left == right { left } else { Type::Real };
            return Some(BinaryRule {
                result,
                left_cast,
                right_cast,
            });
        }
        return None;
    }

    if op == BinaryOp::Mod {
        return (left == Type::Integer && right == Type::Integer)
            .then(|| BinaryRule::plain(Type::Integer));
    }

    if op.is_ordering() {
        if left.is_numeric() && right.is_numeric() {
            let (left_cast, right_cast) = promote(left, right);
            return Some(BinaryRule {
                result: Type::Boolean,
                left_cast,
                right_cast,
            });
        }
        return (left.is_textual() && left == right).then(|| BinaryRule::plain(Type::Boolean));
    }

    if op.is_equality() {
        if left.is_numeric() && right.is_numeric() {
            let (left_cast, right_cast) = promote(left, right);
            return Some(BinaryRule {
                result: Type::Boolean,
                left_cast,
                right_cast,
            });
        }
        return (left == right).then(|| BinaryRule::plain(Type::Boolean));
    }

    // and / or
    let accepted = left == right && matches!(left, Type::Integer | Type::Boolean);
    accepted.then(|| BinaryRule::plain(left))
}

/// Resolves the result type of a unary operator, or `None` when the operand
/// type is not accepted.
pub fn unary_result(op: UnaryOp, operand: Type) -> Option<Type> {
    match op {
        UnaryOp::Negate | UnaryOp::Plus => operand.is_numeric().then_some(operand),
        UnaryOp::Not => matches!(operand, Type::Boolean | Type::Integer).then_some(operand),
    }
}
