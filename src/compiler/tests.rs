use std::rc::Rc;

use super::compiler::compile;
use crate::errors::errors::ErrorCategory;
use crate::lexer::lexer::tokenize;
use crate::parser::parser::parse;
use crate::compile_source;

fn il(source: &str) -> String {
    compile_source(source.to_string(), "test.pas").unwrap()
}

/// Asserts that `needles` appear in `haystack` in the given order.
fn assert_in_order(haystack: &str, needles: &[&str]) {
    let mut rest = haystack;
    for needle in needles {
        match rest.find(needle) {
            Some(index) => rest = &rest[index + needle.len()..],
            None => panic!("'{}' not found in order in:\n{}", needle, haystack),
        }
    }
}

#[test]
fn test_program_layout() {
    let output = il("program hello; begin end.");

    assert!(output.starts_with(".assembly extern System.Runtime"));
    assert_in_order(
        &output,
        &[
            ".assembly extern PSILib { .ver 1:0:0:0 }",
            ".assembly hello { .ver 0:0:0:0 }",
            ".class Program {",
            ".method static void Main () {",
            ".entrypoint",
            "ret",
        ],
    );
    assert!(output.ends_with("  }\n}\n"));
}

#[test]
fn test_static_variables() {
    let output = il("program p; var x: integer; begin x := 1; writeln(x) end.");

    assert_in_order(
        &output,
        &[
            ".field static int32 x",
            ".entrypoint",
            "ldc.i4 1",
            "stsfld int32 Program::x",
            "ldsfld int32 Program::x",
            "call void [System.Console]System.Console::Write (int32)",
            "call void [System.Console]System.Console::WriteLine ()",
        ],
    );
}

#[test]
fn test_function_storage_classes() {
    let source = "program p;
        function add(a, b: integer): integer;
        var t: integer;
        begin t := a + b; add := t end;
        begin writeln(add(1, 2)) end.";
    let output = il(source);

    assert_in_order(
        &output,
        &[
            ".method public static int32 add (int32 a, int32 b) {",
            ".locals init (int32 add, int32 t)",
            "ldarg a",
            "ldarg b",
            "add",
            "stloc t",
            "ldloc t",
            "stloc add",
            "ldloc add\n    ret",
            ".method static void Main () {",
            "call int32 Program::add(int32, int32)",
        ],
    );
}

#[test]
fn test_procedure_without_locals() {
    let output = il("program p; procedure hi; begin writeln(\"hi\") end; begin hi end.");

    assert!(output.contains(".method public static void hi () {"));
    assert!(!output.contains(".locals"));
    assert!(output.contains("call void Program::hi()"));
    assert!(!output.contains("pop"));
}

#[test]
fn test_standard_library_references() {
    let output = il("program p; var r: real; begin r := Sqrt(2) * Pi; Beep(440, 10) end.");

    assert_in_order(
        &output,
        &[
            "ldc.i4 2",
            "conv.r8",
            "call float64 [PSILib]PSILib.Lib::Sqrt(float64)",
            "call float64 [PSILib]PSILib.Lib::get_Pi()",
            "mul",
            "stsfld float64 Program::r",
            "call void [PSILib]PSILib.Lib::Beep(int32, int32)",
        ],
    );
}

#[test]
fn test_discarded_function_result() {
    let output = il("program p; function f: integer; begin f := 1 end; begin f end.");
    assert!(output.contains("call int32 Program::f()\n    pop"));
}

#[test]
fn test_constants_are_inlined() {
    let output = il("program p; const n = 5; greeting = \"hey\"; begin writeln(n, greeting) end.");

    assert!(!output.contains(".field"));
    assert_in_order(&output, &["ldc.i4 5", "ldstr \"hey\""]);
}

#[test]
fn test_literal_encodings() {
    let source = "program p;
        var b: boolean; c: char; r: real; s: string;
        begin b := true; b := FALSE; c := 'A'; r := 2.5; s := \"say \\\"hi\\\"\" end.";
    let output = il(source);

    assert_in_order(
        &output,
        &[
            "ldc.i4 1",
            "ldc.i4 0",
            "ldc.i4 65",
            "ldc.r8 2.5",
            "ldstr \"say \\\"hi\\\"\"",
        ],
    );
}

#[test]
fn test_string_operations() {
    let source = "program p;
        var b: boolean; s: string;
        begin s := \"a\"; b := s <= \"b\"; s := s + 1 end.";
    let output = il(source);

    assert_in_order(
        &output,
        &[
            "call int32 [System.Runtime]System.String::CompareOrdinal (string, string)",
            "ldc.i4.0",
            "cgt",
            "ldc.i4.0",
            "ceq",
            "call string [PSILib]PSILib.Helper::CIntStr (int32)",
            "call string [System.Runtime]System.String::Concat (string, string)",
        ],
    );
}

#[test]
fn test_unary_operators() {
    let source = "program p; var b: boolean; i: integer;
        begin i := 3; i := -i; i := +i; i := not i; b := not true end.";
    let output = il(source);

    assert_in_order(&output, &["neg", "stsfld", "stsfld", "not", "ldc.i4 1", "ldc.i4.0", "ceq"]);
}

#[test]
fn test_if_lowering() {
    let output = il("program p; var x: integer; begin if 1 < 2 then x := 1 else x := 2 end.");

    assert_in_order(
        &output,
        &[
            "clt",
            "brfalse IL_0001",
            "ldc.i4 1",
            "br IL_0002",
            "  IL_0001:",
            "ldc.i4 2",
            "  IL_0002:",
        ],
    );
}

#[test]
fn test_loop_lowering() {
    let source = "program p; var i: integer;
        begin
            while false do writeln;
            repeat writeln until true;
            for i := 1 to 3 do writeln(i)
        end.";
    let output = il(source);

    assert_in_order(
        &output,
        &[
            "br IL_0002",
            "  IL_0001:",
            "  IL_0002:",
            "brtrue IL_0001",
            "  IL_0003:",
            "brfalse IL_0003",
            "stsfld int32 Program::i",
            "br IL_0004",
            "  IL_0005:",
            "ldc.i4.1",
            "add",
            "  IL_0004:",
            "ldc.i4 3",
            "cgt",
            "brfalse IL_0005",
        ],
    );
}

#[test]
fn test_labels_are_unique_across_routines() {
    let source = "program p;
        procedure a; begin if true then writeln end;
        procedure b; begin if true then writeln end;
        begin if true then writeln; if false then writeln end.";
    let output = il(source);

    let labels = output
        .lines()
        .filter(|line| line.trim_end().ends_with(':'))
        .map(|line| line.trim().to_string())
        .collect::<Vec<_>>();

    assert_eq!(labels.len(), 8);
    let mut unique = labels.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), labels.len());
}

#[test]
fn test_output_is_deterministic() {
    let source = "program p; var i: integer; begin for i := 1 to 2 do if i = 1 then writeln end.";
    assert_eq!(il(source), il(source));
}

#[test]
fn test_unchecked_tree_is_internal_error() {
    let tokens = tokenize("program p; begin writeln(1) end.".to_string(), None).unwrap();
    let program = parse(tokens, Rc::new("shell".to_string())).unwrap();

    let error = compile(&program).unwrap_err();
    assert_eq!(error.category(), ErrorCategory::Internal);
}

#[test]
fn test_real_literals_keep_source_text() {
    let source = "program p;
        const tiny = -1.5e-7;
        var r: real;
        begin r := 1e20; r := tiny; r := 0.10 end.";
    let output = il(source);

    assert_in_order(&output, &["ldc.r8 1e20", "ldc.r8 -1.5e-7", "ldc.r8 0.10"]);
}
