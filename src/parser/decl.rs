use crate::{
    ast::{
        ast::{Block, ConstDecl, Declarations, FnDecl, Program, VarDecl},
        types::Type,
    },
    errors::errors::Error,
    lexer::tokens::{Token, TokenKind},
    Span,
};

use super::{expr::check_number, parser::Parser, stmt::parse_compound, types::parse_type};

/// Parses `program NAME; block.` followed by the end of input.
pub fn parse_program(parser: &mut Parser) -> Result<Program, Error> {
    parser.expect(TokenKind::Program)?;
    let name = parser.expect(TokenKind::Identifier)?;
    parser.expect(TokenKind::Semicolon)?;

    let block = parse_block(parser)?;

    parser.expect(TokenKind::Dot)?;
    let error = parser.unexpected_detailed("expected end of file after 'end.'");
    parser.expect_error(TokenKind::EOF, Some(error))?;

    Ok(Program { name, block })
}

/// Parses any number of `const`, `var`, `function` and `procedure` sections
/// followed by the `begin ... end` body.
pub fn parse_block(parser: &mut Parser) -> Result<Block, Error> {
    let mut declarations = Declarations::default();

    loop {
        match parser.current_token_kind() {
            TokenKind::Const => parse_const_section(parser, &mut declarations.consts)?,
            TokenKind::Var => parse_var_section(parser, &mut declarations.vars)?,
            TokenKind::Function | TokenKind::Procedure => {
                declarations.functions.push(parse_routine(parser)?)
            }
            TokenKind::Begin => break,
            _ => return Err(parser.unexpected_detailed("expected a declaration or 'begin'")),
        }
    }

    let body = parse_compound(parser)?;

    Ok(Block { declarations, body })
}

fn parse_const_section(parser: &mut Parser, consts: &mut Vec<ConstDecl>) -> Result<(), Error> {
    parser.advance();

    loop {
        let name = parser.expect(TokenKind::Identifier)?;
        parser.expect(TokenKind::Equals)?;
        let value = parse_const_value(parser)?;
        parser.expect(TokenKind::Semicolon)?;

        consts.push(ConstDecl { name, value });

        if parser.current_token_kind() != TokenKind::Identifier {
            return Ok(());
        }
    }
}

/// A constant's value is a literal, optionally preceded by a sign for numbers.
fn parse_const_value(parser: &mut Parser) -> Result<Token, Error> {
    let sign = if parser.current_token().is_one_of_many(&[TokenKind::Dash, TokenKind::Plus]) {
        Some(parser.advance().clone())
    } else {
        None
    };

    let token = parser.current_token().clone();
    let accepted = match sign {
        Some(_) => token.is_one_of_many(&[TokenKind::Integer, TokenKind::Real]),
        None => token.kind.is_literal(),
    };
    if !accepted {
        return Err(parser.unexpected_detailed("expected a literal constant value"));
    }
    parser.advance();

    let value = match sign {
        Some(sign) if sign.kind == TokenKind::Dash => Token {
            value: format!("-{}", token.value),
            span: Span {
                start: sign.span.start,
                end: token.span.end,
            },
            kind: token.kind,
        },
        _ => token,
    };
    check_number(&value)?;

    Ok(value)
}

fn parse_var_section(parser: &mut Parser, vars: &mut Vec<VarDecl>) -> Result<(), Error> {
    parser.advance();

    loop {
        vars.extend(parse_var_group(parser)?);
        parser.expect(TokenKind::Semicolon)?;

        if parser.current_token_kind() != TokenKind::Identifier {
            return Ok(());
        }
    }
}

/// Parses `a, b, c: type` into one declaration per name.
fn parse_var_group(parser: &mut Parser) -> Result<Vec<VarDecl>, Error> {
    let mut names = vec![parser.expect(TokenKind::Identifier)?];
    while parser.current_token_kind() == TokenKind::Comma {
        parser.advance();
        names.push(parser.expect(TokenKind::Identifier)?);
    }

    parser.expect(TokenKind::Colon)?;
    let var_type = parse_type(parser)?;

    Ok(names
        .into_iter()
        .map(|name| VarDecl { name, var_type })
        .collect())
}

fn parse_routine(parser: &mut Parser) -> Result<FnDecl, Error> {
    let is_function = parser.advance().kind == TokenKind::Function;
    let name = parser.expect(TokenKind::Identifier)?;

    let mut params = vec![];
    if parser.current_token_kind() == TokenKind::OpenParen {
        parser.advance();

        if parser.current_token_kind() != TokenKind::CloseParen {
            loop {
                params.extend(parse_var_group(parser)?);

                if parser.current_token_kind() == TokenKind::Semicolon {
                    parser.advance();
                } else {
                    break;
                }
            }
        }

        parser.expect(TokenKind::CloseParen)?;
    }

    let return_type = if is_function {
        parser.expect(TokenKind::Colon)?;
        parse_type(parser)?
    } else {
        Type::Void
    };
    parser.expect(TokenKind::Semicolon)?;

    let block = parse_block(parser)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(FnDecl {
        name,
        params,
        return_type,
        block,
    })
}
