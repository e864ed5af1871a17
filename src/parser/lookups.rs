use std::collections::HashMap;

use crate::{
    ast::{expressions::Expr, statements::Stmt},
    errors::errors::Error,
    lexer::tokens::TokenKind,
};

use super::{expr::*, parser::Parser, stmt::*};

#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum BindingPower {
    Default,
    Logical,
    Relational,
    Additive,
    Multiplicative,
    Unary,
    Call,
    Primary,
}

pub type StmtHandler = fn(&mut Parser) -> Result<Stmt, Error>;
pub type NUDHandler = fn(&mut Parser) -> Result<Expr, Error>;
pub type LEDHandler = fn(&mut Parser, Expr, BindingPower) -> Result<Expr, Error>;

pub fn create_token_lookups(parser: &mut Parser) {
    // Logical
    parser.led(TokenKind::And, BindingPower::Logical, parse_binary_expr);
    parser.led(TokenKind::Or, BindingPower::Logical, parse_binary_expr);

    // Relational
    parser.led(TokenKind::Less, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::LessEquals, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::Greater, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::GreaterEquals, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::Equals, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::NotEquals, BindingPower::Relational, parse_binary_expr);

    // Additive and multiplicative
    parser.led(TokenKind::Plus, BindingPower::Additive, parse_binary_expr);
    parser.led(TokenKind::Dash, BindingPower::Additive, parse_binary_expr);
    parser.led(TokenKind::Star, BindingPower::Multiplicative, parse_binary_expr);
    parser.led(TokenKind::Slash, BindingPower::Multiplicative, parse_binary_expr);
    parser.led(TokenKind::Mod, BindingPower::Multiplicative, parse_binary_expr);

    parser.led(TokenKind::OpenParen, BindingPower::Call, parse_call_expr);

    // Literals and symbols
    parser.nud(TokenKind::Integer, parse_primary_expr);
    parser.nud(TokenKind::Real, parse_primary_expr);
    parser.nud(TokenKind::Boolean, parse_primary_expr);
    parser.nud(TokenKind::String, parse_primary_expr);
    parser.nud(TokenKind::Char, parse_primary_expr);
    parser.nud(TokenKind::Identifier, parse_primary_expr);
    parser.nud(TokenKind::Dash, parse_prefix_expr);
    parser.nud(TokenKind::Plus, parse_prefix_expr);
    parser.nud(TokenKind::Not, parse_prefix_expr);
    parser.nud(TokenKind::OpenParen, parse_grouping_expr);

    // Statements
    parser.stmt(TokenKind::Begin, parse_compound_stmt);
    parser.stmt(TokenKind::Identifier, parse_identifier_stmt);
    parser.stmt(TokenKind::If, parse_if_stmt);
    parser.stmt(TokenKind::While, parse_while_stmt);
    parser.stmt(TokenKind::Repeat, parse_repeat_stmt);
    parser.stmt(TokenKind::For, parse_for_stmt);
    parser.stmt(TokenKind::Write, parse_write_stmt);
    parser.stmt(TokenKind::Writeln, parse_write_stmt);
    parser.stmt(TokenKind::Read, parse_read_stmt);
}

// Lookup tables inside parser struct, so it's easier
pub type StmtLookup = HashMap<TokenKind, StmtHandler>;
pub type NUDLookup = HashMap<TokenKind, NUDHandler>;
pub type LEDLookup = HashMap<TokenKind, LEDHandler>;
pub type BPLookup = HashMap<TokenKind, BindingPower>;
