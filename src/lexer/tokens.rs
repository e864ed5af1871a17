use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    /// Reserved words, keyed by their lowercase spelling. Lookups must
    /// lowercase the candidate first since keywords are case-insensitive.
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("program", TokenKind::Program);
        map.insert("const", TokenKind::Const);
        map.insert("var", TokenKind::Var);
        map.insert("function", TokenKind::Function);
        map.insert("procedure", TokenKind::Procedure);
        map.insert("begin", TokenKind::Begin);
        map.insert("end", TokenKind::End);
        map.insert("if", TokenKind::If);
        map.insert("then", TokenKind::Then);
        map.insert("else", TokenKind::Else);
        map.insert("while", TokenKind::While);
        map.insert("do", TokenKind::Do);
        map.insert("repeat", TokenKind::Repeat);
        map.insert("until", TokenKind::Until);
        map.insert("for", TokenKind::For);
        map.insert("to", TokenKind::To);
        map.insert("downto", TokenKind::Downto);
        map.insert("write", TokenKind::Write);
        map.insert("writeln", TokenKind::Writeln);
        map.insert("read", TokenKind::Read);
        map.insert("not", TokenKind::Not);
        map.insert("and", TokenKind::And);
        map.insert("or", TokenKind::Or);
        map.insert("mod", TokenKind::Mod);
        map.insert("true", TokenKind::Boolean);
        map.insert("false", TokenKind::Boolean);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Identifier,

    // Literals
    Integer,
    Real,
    Boolean,
    String,
    Char,

    OpenParen,
    CloseParen,

    Assignment, // :=
    Equals,     // =
    NotEquals,  // <>

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Plus,
    Dash,
    Star,
    Slash,

    Dot,
    Semicolon,
    Colon,
    Comma,

    // Reserved
    Program,
    Const,
    Var,
    Function,
    Procedure,
    Begin,
    End,
    If,
    Then,
    Else,
    While,
    Do,
    Repeat,
    Until,
    For,
    To,
    Downto,
    Write,
    Writeln,
    Read,
    Not,
    And,
    Or,
    Mod,
}

impl TokenKind {
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::Integer
                | TokenKind::Real
                | TokenKind::Boolean
                | TokenKind::String
                | TokenKind::Char
        )
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::EOF => write!(f, "EOF"),
            TokenKind::String => write!(f, "\"{}\"", self.value),
            TokenKind::Char => write!(f, "'{}'", self.value),
            _ => write!(f, "{}", self.value),
        }
    }
}

impl Token {
    /// A token with no source location, used for compiler-synthesized nodes.
    pub fn null() -> Self {
        Token {
            kind: TokenKind::EOF,
            value: String::new(),
            span: Span::null(),
        }
    }

    pub fn is_one_of_many(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.kind)
    }
}
