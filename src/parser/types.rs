use crate::{
    ast::types::Type,
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::parser::Parser;

/// Parses a type name such as `integer` or `String`.
pub fn parse_type(parser: &mut Parser) -> Result<Type, Error> {
    let error = parser.unexpected_detailed("expected a type name");
    let token = parser.expect_error(TokenKind::Identifier, Some(error))?;

    Type::from_name(&token.value).ok_or_else(|| {
        Error::at(
            ErrorImpl::UnknownType {
                type_: token.value.clone(),
            },
            &token,
        )
    })
}
