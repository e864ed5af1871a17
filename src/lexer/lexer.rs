use std::rc::Rc;

use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

pub type RegexHandler = fn(&mut Lexer, &Regex);

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

// Every pattern is anchored at the start of the remaining input; the first
// matching pattern wins, so longer operators precede their prefixes.
lazy_static! {
    static ref PATTERNS: Vec<RegexPattern> = vec![
        RegexPattern { regex: Regex::new(r"^\s+").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new(r"^//[^\n]*").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new(r"^\{[^}]*\}").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*").unwrap(), handler: symbol_handler },
        RegexPattern { regex: Regex::new(r"^[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?").unwrap(), handler: number_handler },
        RegexPattern { regex: Regex::new(r#"^"(\\.|[^"\\])*""#).unwrap(), handler: string_handler },
        RegexPattern { regex: Regex::new(r"^'[^']'").unwrap(), handler: char_handler },
        RegexPattern { regex: Regex::new(r"^\(").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(") },
        RegexPattern { regex: Regex::new(r"^\)").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")") },
        RegexPattern { regex: Regex::new(r"^:=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Assignment, ":=") },
        RegexPattern { regex: Regex::new(r"^<>").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "<>") },
        RegexPattern { regex: Regex::new(r"^<=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=") },
        RegexPattern { regex: Regex::new(r"^<").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Less, "<") },
        RegexPattern { regex: Regex::new(r"^>=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=") },
        RegexPattern { regex: Regex::new(r"^>").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Greater, ">") },
        RegexPattern { regex: Regex::new(r"^=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Equals, "=") },
        RegexPattern { regex: Regex::new(r"^\.").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Dot, ".") },
        RegexPattern { regex: Regex::new(r"^;").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";") },
        RegexPattern { regex: Regex::new(r"^:").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Colon, ":") },
        RegexPattern { regex: Regex::new(r"^,").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Comma, ",") },
        RegexPattern { regex: Regex::new(r"^\+").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Plus, "+") },
        RegexPattern { regex: Regex::new(r"^-").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Dash, "-") },
        RegexPattern { regex: Regex::new(r"^/").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Slash, "/") },
        RegexPattern { regex: Regex::new(r"^\*").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Star, "*") },
    ];
}

pub struct Lexer {
    tokens: Vec<Token>,
    source: String,
    line_starts: Vec<usize>,
    pub(crate) pos: usize,
    file: Rc<String>,
}

impl Lexer {
    pub fn new(source: String, file: Option<String>) -> Lexer {
        let file_name = if let Some(file) = file {
            Rc::new(file)
        } else {
            Rc::new(String::from("shell"))
        };

        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .char_indices()
                .filter(|(_, c)| *c == '\n')
                .map(|(index, _)| index + 1),
        );

        Lexer {
            pos: 0,
            tokens: vec![],
            source,
            line_starts,
            file: file_name,
        }
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Converts a byte offset into a line/column position.
    pub fn position(&self, offset: usize) -> Position {
        let line = self.line_starts.partition_point(|start| *start <= offset);
        let column = offset - self.line_starts[line - 1] + 1;

        Position::new(offset as u32, line as u32, column as u32, Rc::clone(&self.file))
    }

    pub fn span(&self, start: usize, end: usize) -> Span {
        Span {
            start: self.position(start),
            end: self.position(end),
        }
    }
}

fn matched_text(lexer: &Lexer, regex: &Regex) -> String {
    regex
        .find(lexer.remainder())
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

fn skip_handler(lexer: &mut Lexer, regex: &Regex) {
    let matched = matched_text(lexer, regex);
    lexer.advance_n(matched.len());
}

fn number_handler(lexer: &mut Lexer, regex: &Regex) {
    let matched = matched_text(lexer, regex);
    let kind = if matched.contains(['.', 'e', 'E']) {
        TokenKind::Real
    } else {
        TokenKind::Integer
    };

    let span = lexer.span(lexer.pos, lexer.pos + matched.len());
    lexer.advance_n(matched.len());
    lexer.push(MK_TOKEN!(kind, matched, span));
}

fn symbol_handler(lexer: &mut Lexer, regex: &Regex) {
    let value = matched_text(lexer, regex);
    let span = lexer.span(lexer.pos, lexer.pos + value.len());
    lexer.advance_n(value.len());

    if let Some(kind) = RESERVED_LOOKUP.get(value.to_lowercase().as_str()) {
        lexer.push(MK_TOKEN!(*kind, value, span));
    } else {
        lexer.push(MK_TOKEN!(TokenKind::Identifier, value, span));
    }
}

fn char_handler(lexer: &mut Lexer, regex: &Regex) {
    let matched = matched_text(lexer, regex);
    let span = lexer.span(lexer.pos, lexer.pos + matched.len());
    lexer.advance_n(matched.len());

    let value = matched.trim_matches('\'').to_string();
    lexer.push(MK_TOKEN!(TokenKind::Char, value, span));
}

fn string_handler(lexer: &mut Lexer, regex: &Regex) {
    let matched = matched_text(lexer, regex);
    let span = lexer.span(lexer.pos, lexer.pos + matched.len());
    lexer.advance_n(matched.len());

    let string_literal = &matched[1..matched.len() - 1];
    lexer.push(MK_TOKEN!(TokenKind::String, unescape(string_literal), span));
}

fn unescape(string_literal: &str) -> String {
    let mut result = String::new();
    let mut chars = string_literal.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        match chars.peek() {
            Some('n') => {
                result.push('\n');
                chars.next();
            }
            Some('t') => {
                result.push('\t');
                chars.next();
            }
            Some('\\') => {
                result.push('\\');
                chars.next();
            }
            Some('r') => {
                result.push('\r');
                chars.next();
            }
            Some('"') => {
                result.push('"');
                chars.next();
            }
            Some('0') => {
                result.push('\0');
                chars.next();
            }
            Some('x') => {
                chars.next();
                let mut hex = String::new();

                for _ in 0..2 {
                    match chars.peek() {
                        Some(ch) if ch.is_ascii_hexdigit() => {
                            hex.push(*ch);
                            chars.next();
                        }
                        _ => break,
                    }
                }

                match u8::from_str_radix(&hex, 16) {
                    Ok(byte) => result.push(byte as char),
                    Err(_) => {
                        result.push_str("\\x");
                        result.push_str(&hex);
                    }
                }
            }
            _ => result.push(ch), // Keep the backslash
        }
    }

    result
}

pub fn tokenize(source: String, file: Option<String>) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(source, file);

    while !lex.at_eof() {
        let mut matched = false;

        for pattern in PATTERNS.iter() {
            if pattern.regex.is_match(lex.remainder()) {
                (pattern.handler)(&mut lex, &pattern.regex);
                matched = true;
                break;
            }
        }

        if !matched {
            let token = lex.remainder().chars().next().unwrap_or_default().to_string();
            return Err(Error::new(
                ErrorImpl::UnrecognisedToken { token },
                lex.position(lex.pos),
            ));
        }
    }

    let span = lex.span(lex.pos, lex.pos);
    lex.push(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), span));
    Ok(lex.tokens)
}
