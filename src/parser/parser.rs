//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the `parse` entry point.
//! The parser uses a Pratt parser approach with NUD/LED handlers for
//! expression parsing and specialized functions for statements and
//! declarations.
//!
//! It maintains lookup tables for:
//! - Statement handlers
//! - NUD (null denotation) handlers for prefix expressions
//! - LED (left denotation) handlers for infix expressions
//! - Binding powers for operator precedence

use std::{collections::HashMap, rc::Rc};

use crate::{
    ast::ast::Program,
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Position, Span,
};

use super::{
    decl::parse_program,
    lookups::{
        create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler, NUDLookup,
        StmtHandler, StmtLookup,
    },
};

/// The main parser structure that maintains parsing state.
///
/// This struct holds the token stream and maintains lookup tables for
/// parsing statements and expressions. It tracks the current position in
/// the token stream and provides methods for token consumption.
pub struct Parser {
    /// The list of tokens to parse, always terminated by an EOF token
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup,
    /// Lookup table for null denotation (prefix) expression handlers
    nud_lookup: NUDLookup,
    /// Lookup table for left denotation (infix) expression handlers
    led_lookup: LEDLookup,
    /// Lookup table for expression binding powers (precedence)
    binding_power_lookup: BPLookup,
}

impl Parser {
    /// Creates a new Parser instance.
    ///
    /// # Arguments
    ///
    /// * `tokens` - Vector of tokens to parse
    /// * `file` - Reference-counted string containing the source file name
    ///
    /// # Returns
    ///
    /// A new Parser instance ready to parse the token stream.
    pub fn new(mut tokens: Vec<Token>, file: Rc<String>) -> Self {
        if tokens.last().map(|token| token.kind) != Some(TokenKind::EOF) {
            let position = tokens
                .last()
                .map(|token| token.span.end.clone())
                .unwrap_or_else(|| Position::new(0, 1, 1, Rc::clone(&file)));
            tokens.push(Token {
                kind: TokenKind::EOF,
                value: String::from("EOF"),
                span: Span {
                    start: position.clone(),
                    end: position,
                },
            });
        }

        Parser {
            tokens,
            pos: 0,
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos]
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Advances to the next token and returns the previous token.
    ///
    /// The position never moves past the final EOF token.
    pub fn advance(&mut self) -> &Token {
        let index = self.pos;
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        &self.tokens[index]
    }

    /// Expects a token of the specified kind, with optional custom error.
    ///
    /// # Arguments
    ///
    /// * `expected_kind` - The expected TokenKind
    /// * `error` - Optional custom error to return if expectation fails
    ///
    /// # Returns
    ///
    /// Returns Ok(Token) if the current token matches, otherwise returns an Error.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Error>,
    ) -> Result<Token, Error> {
        if self.current_token_kind() != expected_kind {
            match error {
                Some(error) => Err(error),
                None => Err(self.unexpected()),
            }
        } else {
            Ok(self.advance().clone())
        }
    }

    /// Expects a token of the specified kind with default error message.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    /// Builds an `UnexpectedToken` error for the current token.
    pub fn unexpected(&self) -> Error {
        let token = self.current_token();
        Error::at(
            ErrorImpl::UnexpectedToken {
                token: token.value.clone(),
            },
            token,
        )
    }

    /// Builds an `UnexpectedTokenDetailed` error for the current token.
    pub fn unexpected_detailed(&self, message: &str) -> Error {
        let token = self.current_token();
        Error::at(
            ErrorImpl::UnexpectedTokenDetailed {
                token: token.value.clone(),
                message: message.to_string(),
            },
            token,
        )
    }

    /// Returns a reference to the statement lookup table.
    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    /// Returns a reference to the NUD (null denotation) lookup table.
    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    /// Returns a reference to the LED (left denotation) lookup table.
    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    /// Returns a reference to the binding power lookup table.
    pub fn get_bp_lookup(&self) -> &BPLookup {
        &self.binding_power_lookup
    }

    /// Registers a left denotation (infix) handler for a token.
    ///
    /// # Arguments
    ///
    /// * `kind` - The token kind to register
    /// * `binding_power` - The precedence/binding power for this operator
    /// * `led_fn` - The handler function for this infix operator
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token.
    ///
    /// Prefix handlers leave the binding power table alone, since tokens such
    /// as `-` are both prefix and infix operators.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler for a token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }
}

/// Parses a stream of tokens into a program tree.
///
/// This is the main entry point for parsing. It creates a parser instance,
/// initializes the lookup tables, and parses `program NAME; block.`
///
/// # Arguments
///
/// * `tokens` - Vector of tokens to parse
/// * `file` - Reference-counted string containing the source file name
///
/// # Returns
///
/// The untyped program, or the first syntax error encountered.
pub fn parse(tokens: Vec<Token>, file: Rc<String>) -> Result<Program, Error> {
    let mut parser = Parser::new(tokens, file);
    create_token_lookups(&mut parser);

    parse_program(&mut parser)
}
