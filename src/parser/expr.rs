use crate::{
    ast::{
        expressions::{
            BinaryExpr, Expr, ExprKind, FnCallExpr, IdentifierExpr, LiteralExpr, UnaryExpr,
        },
        types::{BinaryOp, UnaryOp},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
};

use super::{lookups::BindingPower, parser::Parser};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let nud = match parser.get_nud_lookup().get(&token_kind) {
        Some(handler) => *handler,
        None => return Err(parser.unexpected()),
    };

    let mut left = nud(parser)?;

    // While the next operator binds tighter than the current one, keep extending lhs
    loop {
        let token_kind = parser.current_token_kind();
        let next_bp = *parser
            .get_bp_lookup()
            .get(&token_kind)
            .unwrap_or(&BindingPower::Default);

        if next_bp <= bp {
            break;
        }

        let led = match parser.get_led_lookup().get(&token_kind) {
            Some(handler) => *handler,
            None => break,
        };

        left = led(parser, left, next_bp)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.current_token().clone();

    match token.kind {
        TokenKind::Integer | TokenKind::Real => check_number(&token)?,
        TokenKind::Boolean | TokenKind::String | TokenKind::Char => (),
        TokenKind::Identifier => {
            parser.advance();
            return Ok(Expr::new(ExprKind::Identifier(IdentifierExpr { name: token })));
        }
        _ => return Err(parser.unexpected()),
    }

    parser.advance();
    Ok(Expr::new(ExprKind::Literal(LiteralExpr { token })))
}

/// Rejects a numeric literal whose (possibly signed) text does not fit its
/// type.
pub fn check_number(token: &Token) -> Result<(), Error> {
    let valid = match token.kind {
        TokenKind::Integer => token.value.parse::<i32>().is_ok(),
        TokenKind::Real => token.value.parse::<f64>().map_or(false, f64::is_finite),
        _ => true,
    };

    if !valid {
        return Err(Error::at(
            ErrorImpl::NumberParseError {
                token: token.value.clone(),
            },
            token,
        ));
    }
    Ok(())
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let op = BinaryOp::from_token_kind(operator_token.kind).ok_or_else(|| {
        Error::internal(
            format!("{} registered as a binary operator", operator_token.kind),
            operator_token.span.start.clone(),
        )
    })?;

    let right = parse_expr(parser, bp)?;

    Ok(Expr::new(ExprKind::Binary(BinaryExpr {
        left: Box::new(left),
        op,
        token: operator_token,
        right: Box::new(right),
    })))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let op = UnaryOp::from_token_kind(operator_token.kind).ok_or_else(|| {
        Error::internal(
            format!("{} registered as a prefix operator", operator_token.kind),
            operator_token.span.start.clone(),
        )
    })?;

    let rhs = parse_expr(parser, BindingPower::Unary)?;

    Ok(Expr::new(ExprKind::Unary(UnaryExpr {
        op,
        token: operator_token,
        expr: Box::new(rhs),
    })))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.advance();
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

/// Parses a parenthesised, comma separated argument list.
pub fn parse_args(parser: &mut Parser) -> Result<Vec<Expr>, Error> {
    parser.expect(TokenKind::OpenParen)?;

    let mut args = vec![];
    if parser.current_token_kind() == TokenKind::CloseParen {
        parser.advance();
        return Ok(args);
    }

    loop {
        args.push(parse_expr(parser, BindingPower::Default)?);

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else {
            parser.expect(TokenKind::CloseParen)?;
            break;
        }
    }

    Ok(args)
}

pub fn parse_call_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    let name = match left.kind {
        ExprKind::Identifier(IdentifierExpr { name }) => name,
        _ => return Err(parser.unexpected_detailed("only functions can be called")),
    };

    let args = parse_args(parser)?;

    Ok(Expr::new(ExprKind::FnCall(FnCallExpr { name, args })))
}
