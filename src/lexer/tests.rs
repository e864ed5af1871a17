//! Unit tests for the lexer module.
//!
//! Covers keywords (in any letter case), identifiers, numeric, string and
//! character literals, operators, comments, positions and error cases.

use super::{lexer::tokenize, tokens::TokenKind};

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source.to_string(), Some("test.pas".to_string()))
        .unwrap()
        .into_iter()
        .map(|token| token.kind)
        .collect()
}

#[test]
fn test_tokenize_keywords() {
    let source = "program const var function procedure begin end if then else while do repeat until for to downto";
    let tokens = kinds(source);

    assert_eq!(
        tokens,
        vec![
            TokenKind::Program,
            TokenKind::Const,
            TokenKind::Var,
            TokenKind::Function,
            TokenKind::Procedure,
            TokenKind::Begin,
            TokenKind::End,
            TokenKind::If,
            TokenKind::Then,
            TokenKind::Else,
            TokenKind::While,
            TokenKind::Do,
            TokenKind::Repeat,
            TokenKind::Until,
            TokenKind::For,
            TokenKind::To,
            TokenKind::Downto,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_keywords_are_case_insensitive() {
    let tokens = tokenize("BEGIN WriteLn End".to_string(), None).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Begin);
    assert_eq!(tokens[1].kind, TokenKind::Writeln);
    assert_eq!(tokens[1].value, "WriteLn");
    assert_eq!(tokens[2].kind, TokenKind::End);
}

#[test]
fn test_tokenize_identifiers() {
    let tokens = tokenize("foo bar_1 _x Counter".to_string(), None).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].value, "foo");
    assert_eq!(tokens[1].value, "bar_1");
    assert_eq!(tokens[2].value, "_x");
    assert_eq!(tokens[3].value, "Counter");
    assert_eq!(tokens[4].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_numbers() {
    let tokens = tokenize("42 3.14 0 1e3 2.5E-2".to_string(), None).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Integer);
    assert_eq!(tokens[0].value, "42");
    assert_eq!(tokens[1].kind, TokenKind::Real);
    assert_eq!(tokens[1].value, "3.14");
    assert_eq!(tokens[2].kind, TokenKind::Integer);
    assert_eq!(tokens[3].kind, TokenKind::Real);
    assert_eq!(tokens[4].kind, TokenKind::Real);
    assert_eq!(tokens[4].value, "2.5E-2");
}

#[test]
fn test_number_followed_by_dot() {
    assert_eq!(
        kinds("5."),
        vec![TokenKind::Integer, TokenKind::Dot, TokenKind::EOF]
    );
}

#[test]
fn test_tokenize_booleans() {
    let tokens = tokenize("true False".to_string(), None).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Boolean);
    assert_eq!(tokens[0].value, "true");
    assert_eq!(tokens[1].kind, TokenKind::Boolean);
    assert_eq!(tokens[1].value, "False");
}

#[test]
fn test_tokenize_strings() {
    let tokens = tokenize(r#""hello" "a\nb" "say \"hi\"""#.to_string(), None).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].value, "hello");
    assert_eq!(tokens[1].value, "a\nb");
    assert_eq!(tokens[2].value, "say \"hi\"");
}

#[test]
fn test_string_hex_escape() {
    let tokens = tokenize(r#""\x41\x42""#.to_string(), None).unwrap();
    assert_eq!(tokens[0].value, "AB");
}

#[test]
fn test_tokenize_chars() {
    let tokens = tokenize("'a' ' '".to_string(), None).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Char);
    assert_eq!(tokens[0].value, "a");
    assert_eq!(tokens[1].kind, TokenKind::Char);
    assert_eq!(tokens[1].value, " ");
}

#[test]
fn test_tokenize_operators() {
    assert_eq!(
        kinds(":= = <> < <= > >= + - * / mod and or not"),
        vec![
            TokenKind::Assignment,
            TokenKind::Equals,
            TokenKind::NotEquals,
            TokenKind::Less,
            TokenKind::LessEquals,
            TokenKind::Greater,
            TokenKind::GreaterEquals,
            TokenKind::Plus,
            TokenKind::Dash,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Mod,
            TokenKind::And,
            TokenKind::Or,
            TokenKind::Not,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_punctuation() {
    assert_eq!(
        kinds("( ) ; : , ."),
        vec![
            TokenKind::OpenParen,
            TokenKind::CloseParen,
            TokenKind::Semicolon,
            TokenKind::Colon,
            TokenKind::Comma,
            TokenKind::Dot,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_operators_without_spaces() {
    assert_eq!(
        kinds("x:=y<=3"),
        vec![
            TokenKind::Identifier,
            TokenKind::Assignment,
            TokenKind::Identifier,
            TokenKind::LessEquals,
            TokenKind::Integer,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_comments_are_skipped() {
    let source = "x { block\ncomment } // line comment\ny";
    let tokens = tokenize(source.to_string(), None).unwrap();

    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[0].value, "x");
    assert_eq!(tokens[1].value, "y");
}

#[test]
fn test_token_positions() {
    let source = "program p;\n  x := 1;";
    let tokens = tokenize(source.to_string(), Some("pos.pas".to_string())).unwrap();

    assert_eq!(tokens[0].span.start.line, 1);
    assert_eq!(tokens[0].span.start.column, 1);

    let x = &tokens[3];
    assert_eq!(x.value, "x");
    assert_eq!(x.span.start.line, 2);
    assert_eq!(x.span.start.column, 3);
    assert_eq!(x.span.start.offset, 13);
    assert_eq!(x.span.start.file.as_str(), "pos.pas");
}

#[test]
fn test_unrecognised_token() {
    let error = tokenize("x := @;".to_string(), None).unwrap_err();

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_position().column, 6);
}

#[test]
fn test_unterminated_string_is_rejected() {
    assert!(tokenize("\"abc".to_string(), None).is_err());
}

#[test]
fn test_empty_source() {
    assert_eq!(kinds(""), vec![TokenKind::EOF]);
}
