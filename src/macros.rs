//! Helper macros for the lexer's pattern table.

/// Builds a `Token` from its kind, text and span.
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $span:expr) => {
        Token {
            kind: $kind,
            value: $value,
            span: $span,
        }
    };
}

/// Expands to a pattern handler that pushes a fixed-text token of `$kind` and
/// moves past it.
///
/// ```ignore
/// handler: MK_DEFAULT_HANDLER!(TokenKind::Assignment, ":="),
/// ```
#[macro_export]
macro_rules! MK_DEFAULT_HANDLER {
    ($kind:expr, $value:literal) => {
        |lexer: &mut Lexer, _regex: &Regex| {
            let span = lexer.span(lexer.pos, lexer.pos + $value.len());
            lexer.push(MK_TOKEN!($kind, String::from($value), span));
            lexer.advance_n($value.len());
        }
    };
}
