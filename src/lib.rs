#![allow(clippy::module_inception)]

use std::rc::Rc;

use crate::{
    compiler::compiler::compile,
    errors::errors::{Error, ErrorTip},
    lexer::lexer::tokenize,
    parser::parser::parse,
    type_checker::type_checker::type_check,
};

pub mod ast;
pub mod compiler;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod symbol_table;
pub mod type_checker;

extern crate regex;

/// A point in a source file. `line` and `column` are 1-based, `offset` is the
/// byte offset from the start of the file.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub offset: u32,
    pub line: u32,
    pub column: u32,
    pub file: Rc<String>,
}

impl Position {
    pub fn new(offset: u32, line: u32, column: u32, file: Rc<String>) -> Self {
        Position {
            offset,
            line,
            column,
            file,
        }
    }

    pub fn null() -> Self {
        Position::new(0, 0, 0, Rc::new(String::from("<null>")))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn null() -> Self {
        Span {
            start: Position::null(),
            end: Position::null(),
        }
    }
}

/// Runs the whole pipeline over `source` and returns the generated IL text.
pub fn compile_source(source: String, file: &str) -> Result<String, Error> {
    let tokens = tokenize(source, Some(String::from(file)))?;
    let mut program = parse(tokens, Rc::new(String::from(file)))?;
    type_check(&mut program)?;
    compile(&program)
}

/// Returns the 1-based line `line` of `source`, or an empty string when the
/// line does not exist.
pub fn get_source_line(source: &str, line: u32) -> String {
    if line == 0 {
        return String::new();
    }

    source
        .split_inclusive('\n')
        .nth((line - 1) as usize)
        .map(|text| text.trim_end_matches(['\n', '\r']).to_string())
        .unwrap_or_default()
}


pub fn display_error(error: &Error, source: &str) {
    /*
        Error: message
        -> hello.pas
           |
        20 | x := #;
           | -----^
    */

    let position = error.get_position();
    let line_text = get_source_line(source, position.line);

    let line_string = position.line.to_string();
    let padding = line_string.len() + 2;

    if let ErrorTip::None = error.get_tip() {
        eprintln!("Error: {}", error.get_error_name());
    } else {
        eprintln!("Error: {} ({})", error.get_error_name(), error.get_tip());
    }
    eprintln!("-> {}:{}:{}", position.file, position.line, position.column);
    eprintln!("{:>padding$}", "|");

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    eprintln!("{} | {}", line_string, line_text_removed.trim_end());

    let arrows = (position.column as usize).saturating_sub(removed_whitespace).max(1);

    eprintln!("{:>padding$} {:->arrows$}", "|", "^");
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' || c == '\t' {
            start += 1;
        } else {
            break;
        }
    }

    (String::from(&string[start..]), start)
}
