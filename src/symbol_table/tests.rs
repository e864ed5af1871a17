use crate::ast::types::Type;
use crate::errors::errors::ErrorCategory;
use crate::lexer::tokens::{Token, TokenKind};
use crate::Span;

use super::symbol_table::{ConstSymbol, FnSymbol, Storage, Symbol, SymbolRef, SymbolTable, VarSymbol};

fn name(value: &str) -> Token {
    Token {
        kind: TokenKind::Identifier,
        value: value.to_string(),
        span: Span::null(),
    }
}

fn var(value: &str, ty: Type) -> Symbol {
    Symbol::Var(VarSymbol::new(value, ty, Storage::Static))
}

#[test]
fn test_declare_and_find() {
    let mut table = SymbolTable::new();
    table.push_scope();
    table.declare(var("x", Type::Integer), &name("x")).unwrap();

    match table.find("x") {
        Some(SymbolRef::Var(symbol)) => {
            assert_eq!(symbol.ty, Type::Integer);
            assert!(!symbol.assigned);
        }
        other => panic!("expected variable, found {:?}", other),
    }
    assert_eq!(table.find("y"), None);
}

#[test]
fn test_duplicate_in_same_scope() {
    let mut table = SymbolTable::new();
    table.push_scope();
    table.declare(var("x", Type::Integer), &name("x")).unwrap();

    let error = table.declare(var("x", Type::Real), &name("x")).unwrap_err();
    assert_eq!(error.category(), ErrorCategory::Redeclaration);
}

#[test]
fn test_duplicate_across_kinds() {
    let mut table = SymbolTable::new();
    table.push_scope();
    table
        .declare(
            Symbol::Const(ConstSymbol {
                name: "n".to_string(),
                value: Token {
                    kind: TokenKind::Integer,
                    value: "3".to_string(),
                    span: Span::null(),
                },
                ty: Type::Integer,
            }),
            &name("n"),
        )
        .unwrap();

    let function = Symbol::Function(FnSymbol {
        name: "n".to_string(),
        params: vec![],
        return_type: Type::Void,
        std_lib: false,
    });
    assert!(table.declare(function, &name("n")).is_err());
    assert!(table.declare(var("n", Type::Char), &name("n")).is_err());
}

#[test]
fn test_shadowing_resolves_innermost() {
    let mut table = SymbolTable::new();
    table.push_scope();
    table.declare(var("x", Type::Integer), &name("x")).unwrap();

    table.push_scope();
    table.declare(var("x", Type::String), &name("x")).unwrap();
    assert!(matches!(table.find("x"), Some(SymbolRef::Var(v)) if v.ty == Type::String));

    table.pop_scope();
    assert!(matches!(table.find("x"), Some(SymbolRef::Var(v)) if v.ty == Type::Integer));
}

#[test]
fn test_outer_names_visible_from_inner_scope() {
    let mut table = SymbolTable::new();
    table.push_scope();
    table.declare(var("total", Type::Real), &name("total")).unwrap();
    table.push_scope();

    assert!(table.find("total").is_some());
    assert_eq!(table.depth(), 2);
}

#[test]
fn test_pop_discards_inner_declarations() {
    let mut table = SymbolTable::new();
    table.push_scope();
    table.push_scope();
    table.declare(var("tmp", Type::Integer), &name("tmp")).unwrap();
    table.pop_scope();

    assert_eq!(table.find("tmp"), None);
    assert_eq!(table.depth(), 1);

    table.push_scope();
    assert_eq!(table.find("tmp"), None);
}

#[test]
fn test_mark_assigned_targets_resolved_variable() {
    let mut table = SymbolTable::new();
    table.push_scope();
    table.declare(var("x", Type::Integer), &name("x")).unwrap();
    table.push_scope();
    table.declare(var("x", Type::Integer), &name("x")).unwrap();

    assert!(table.mark_assigned("x"));
    assert!(matches!(table.find("x"), Some(SymbolRef::Var(v)) if v.assigned));

    table.pop_scope();
    assert!(matches!(table.find("x"), Some(SymbolRef::Var(v)) if !v.assigned));
    assert!(!table.mark_assigned("missing"));
}

#[test]
fn test_standard_library_fallback() {
    let table = SymbolTable::new();

    match table.find("Sqrt") {
        Some(SymbolRef::Function(symbol)) => {
            assert!(symbol.std_lib);
            assert_eq!(symbol.params.len(), 1);
            assert_eq!(symbol.return_type, Type::Real);
        }
        other => panic!("expected function, found {:?}", other),
    }

    match table.find("Pi") {
        Some(SymbolRef::Var(symbol)) => {
            assert!(symbol.is_read_only());
            assert!(symbol.assigned);
        }
        other => panic!("expected variable, found {:?}", other),
    }

    assert!(matches!(table.find("Beep"), Some(SymbolRef::Function(f)) if f.is_procedure()));
}

#[test]
fn test_program_names_shadow_standard_library() {
    let mut table = SymbolTable::new();
    table.push_scope();
    table.declare(var("Pi", Type::Integer), &name("Pi")).unwrap();

    assert!(matches!(table.find("Pi"), Some(SymbolRef::Var(v)) if !v.std_lib));
}

#[test]
fn test_declare_without_scope_is_internal_error() {
    let mut table = SymbolTable::new();
    let error = table.declare(var("x", Type::Integer), &name("x")).unwrap_err();

    assert_eq!(error.category(), ErrorCategory::Internal);
}

#[test]
fn test_find_function_skips_only_result_variable() {
    let mut table = SymbolTable::new();
    table.push_scope();
    table
        .declare(
            Symbol::Function(FnSymbol {
                name: "fact".to_string(),
                params: vec![("n".to_string(), Type::Integer)],
                return_type: Type::Integer,
                std_lib: false,
            }),
            &name("fact"),
        )
        .unwrap();
    table.push_scope();
    table
        .declare(Symbol::Var(VarSymbol::result("fact", Type::Integer)), &name("fact"))
        .unwrap();

    assert!(matches!(table.find("fact"), Some(SymbolRef::Var(_))));
    assert_eq!(table.find_function("fact").map(|f| f.params.len()), Some(1));
    assert!(table.find_function("Round").is_some());
    assert!(table.find_function("Pi").is_none());

    table.push_scope();
    table.declare(var("fact", Type::Integer), &name("fact")).unwrap();
    table.declare(var("Round", Type::Integer), &name("Round")).unwrap();

    assert!(table.find_function("fact").is_none());
    assert!(table.find_function("Round").is_none());
}
