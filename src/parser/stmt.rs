use crate::{
    ast::statements::{
        AssignStmt, CallStmt, CompoundStmt, ForStmt, IfStmt, ReadStmt, RepeatStmt, Stmt,
        WhileStmt, WriteStmt,
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
    parser::{
        expr::{parse_args, parse_expr},
        lookups::BindingPower,
    },
};

use super::parser::Parser;

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let handler = match parser.get_stmt_lookup().get(&parser.current_token_kind()) {
        Some(handler) => *handler,
        None => return Err(parser.unexpected()),
    };

    handler(parser)
}

/// Parses `;`-separated statements up to (not including) `terminator`.
///
/// Empty statements are allowed, so `begin end` and `begin x := 1; end`
/// are both accepted.
pub fn parse_stmt_list(parser: &mut Parser, terminator: TokenKind) -> Result<Vec<Stmt>, Error> {
    let mut statements = vec![];

    loop {
        while parser.current_token_kind() == TokenKind::Semicolon {
            parser.advance();
        }

        if parser.current_token_kind() == terminator {
            break;
        }

        statements.push(parse_stmt(parser)?);

        let kind = parser.current_token_kind();
        if kind != TokenKind::Semicolon && kind != terminator {
            let message = format!("expected ';' or '{}'", terminator.to_string().to_lowercase());
            return Err(parser.unexpected_detailed(&message));
        }
    }

    Ok(statements)
}

pub fn parse_compound(parser: &mut Parser) -> Result<CompoundStmt, Error> {
    parser.expect(TokenKind::Begin)?;
    let statements = parse_stmt_list(parser, TokenKind::End)?;
    parser.expect(TokenKind::End)?;

    Ok(CompoundStmt { statements })
}

pub fn parse_compound_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    Ok(Stmt::Compound(parse_compound(parser)?))
}

/// Parses `name := expr`, `name(args)` or a bare `name` procedure call.
pub fn parse_identifier_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let name = parser.advance().clone();

    match parser.current_token_kind() {
        TokenKind::Assignment => {
            parser.advance();
            let expr = parse_expr(parser, BindingPower::Default)?;
            Ok(Stmt::Assign(AssignStmt { name, expr }))
        }
        TokenKind::OpenParen => {
            let args = parse_args(parser)?;
            Ok(Stmt::Call(CallStmt { name, args }))
        }
        _ => Ok(Stmt::Call(CallStmt { name, args: vec![] })),
    }
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let token = parser.advance().clone();

    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Then)?;
    let then_branch = parse_stmt(parser)?;

    let else_branch = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        Some(Box::new(parse_stmt(parser)?))
    } else {
        None
    };

    Ok(Stmt::If(IfStmt {
        token,
        condition,
        then_branch: Box::new(then_branch),
        else_branch,
    }))
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let token = parser.advance().clone();

    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Do)?;
    let body = parse_stmt(parser)?;

    Ok(Stmt::While(WhileStmt {
        token,
        condition,
        body: Box::new(body),
    }))
}

pub fn parse_repeat_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let token = parser.advance().clone();

    let body = parse_stmt_list(parser, TokenKind::Until)?;
    parser.expect(TokenKind::Until)?;
    let condition = parse_expr(parser, BindingPower::Default)?;

    Ok(Stmt::Repeat(RepeatStmt {
        token,
        body,
        condition,
    }))
}

pub fn parse_for_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.advance();

    let var = parser.expect(TokenKind::Identifier)?;
    parser.expect(TokenKind::Assignment)?;
    let start = parse_expr(parser, BindingPower::Default)?;

    let ascending = match parser.current_token_kind() {
        TokenKind::To => true,
        TokenKind::Downto => false,
        _ => return Err(parser.unexpected_detailed("expected 'to' or 'downto'")),
    };
    parser.advance();

    let end = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Do)?;
    let body = parse_stmt(parser)?;

    Ok(Stmt::For(ForStmt {
        var,
        start,
        end,
        body: Box::new(body),
        ascending,
    }))
}

/// Parses `write(...)`, `writeln(...)` and a bare `writeln`.
pub fn parse_write_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let newline = parser.advance().kind == TokenKind::Writeln;

    let exprs = if parser.current_token_kind() == TokenKind::OpenParen {
        parse_args(parser)?
    } else {
        vec![]
    };

    Ok(Stmt::Write(WriteStmt { exprs, newline }))
}

pub fn parse_read_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let token = parser.advance().clone();

    parser.expect(TokenKind::OpenParen)?;
    let mut identifiers = vec![parser.expect(TokenKind::Identifier)?];
    while parser.current_token_kind() == TokenKind::Comma {
        parser.advance();
        identifiers.push(parser.expect(TokenKind::Identifier)?);
    }
    parser.expect(TokenKind::CloseParen)?;

    Ok(Stmt::Read(ReadStmt { token, identifiers }))
}
