use crate::{
    ast::{
        expressions::{BinaryExpr, IdentifierExpr, TypeCastExpr, UnaryExpr},
        types::{BinaryOp, Type, UnaryOp},
    },
    errors::errors::Error,
    lexer::tokens::Token,
    symbol_table::symbol_table::SymbolRef,
};

use super::compiler::{expr_type, Compiler, HELPER_QUALIFIER};

/// Pushes a literal. Constants are also emitted through here, inline at every
/// use.
pub fn gen_literal(compiler: &mut Compiler, token: &Token) -> Result<(), Error> {
    let malformed = || {
        Error::internal(
            format!("malformed literal '{}'", token.value),
            token.span.start.clone(),
        )
    };

    let instruction = match Type::from_literal(token.kind).ok_or_else(malformed)? {
        Type::Integer => {
            let value = token.value.parse::<i32>().map_err(|_| malformed())?;
            format!("ldc.i4 {}", value)
        }
        // The source text is already a valid float64 operand.
        Type::Real => {
            token.value.parse::<f64>().map_err(|_| malformed())?;
            format!("ldc.r8 {}", token.value)
        }
        Type::Boolean => {
            let value = token.value.eq_ignore_ascii_case("true");
            format!("ldc.i4 {}", value as i32)
        }
        Type::Char => {
            let value = token.value.chars().next().ok_or_else(malformed)?;
            format!("ldc.i4 {}", value as u32)
        }
        Type::String => format!("ldstr \"{}\"", escape_string(&token.value)),
        Type::Void | Type::Error => return Err(malformed()),
    };
    compiler.emit(&instruction);

    Ok(())
}

/// Escapes a string for an `ldstr` operand.
pub fn escape_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());

    for c in value.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            '\0' => escaped.push_str("\\0"),
            c => escaped.push(c),
        }
    }

    escaped
}

pub fn gen_identifier(compiler: &mut Compiler, expr: &IdentifierExpr) -> Result<(), Error> {
    let constant = match compiler.symbols().find(&expr.name.value) {
        Some(SymbolRef::Const(constant)) => Some(constant.value.clone()),
        Some(SymbolRef::Var(_)) => None,
        _ => {
            return Err(Error::internal(
                format!("'{}' does not resolve to a value", expr.name.value),
                expr.name.span.start.clone(),
            ))
        }
    };

    match constant {
        Some(value) => gen_literal(compiler, &value),
        None => compiler.load_var(&expr.name),
    }
}

pub fn gen_unary(compiler: &mut Compiler, expr: &UnaryExpr) -> Result<(), Error> {
    let operand = expr_type(&expr.expr)?;
    compiler.gen_expr(&expr.expr)?;

    match (expr.op, operand) {
        (UnaryOp::Negate, _) => compiler.emit("neg"),
        (UnaryOp::Plus, _) => {}
        (UnaryOp::Not, Type::Boolean) => {
            compiler.emit("ldc.i4.0");
            compiler.emit("ceq");
        }
        (UnaryOp::Not, _) => compiler.emit("not"),
    }

    Ok(())
}

pub fn gen_binary(compiler: &mut Compiler, expr: &BinaryExpr) -> Result<(), Error> {
    let left = expr_type(&expr.left)?;
    let right = expr_type(&expr.right)?;

    compiler.gen_expr(&expr.left)?;
    compiler.gen_expr(&expr.right)?;

    if expr.op == BinaryOp::Add && (left == Type::String || right == Type::String) {
        compiler.emit("call string [System.Runtime]System.String::Concat (string, string)");
        return Ok(());
    }

    // Strings are ordered by comparing the result of CompareOrdinal with zero.
    if left == Type::String && right == Type::String {
        compiler.emit("call int32 [System.Runtime]System.String::CompareOrdinal (string, string)");
        compiler.emit("ldc.i4.0");
    }

    for instruction in binary_instructions(expr.op) {
        compiler.emit(instruction);
    }

    Ok(())
}

/// The instruction sequence for an operator whose operands are on the stack.
fn binary_instructions(op: BinaryOp) -> &'static [&'static str] {
    match op {
        BinaryOp::Add => &["add"],
        BinaryOp::Sub => &["sub"],
        BinaryOp::Mul => &["mul"],
        BinaryOp::Div => &["div"],
        BinaryOp::Mod => &["rem"],
        BinaryOp::Eq => &["ceq"],
        BinaryOp::Neq => &["ceq", "ldc.i4.0", "ceq"],
        BinaryOp::Lt => &["clt"],
        BinaryOp::Leq => &["cgt", "ldc.i4.0", "ceq"],
        BinaryOp::Gt => &["cgt"],
        BinaryOp::Geq => &["clt", "ldc.i4.0", "ceq"],
        BinaryOp::And => &["and"],
        BinaryOp::Or => &["or"],
    }
}

pub fn gen_type_cast(compiler: &mut Compiler, expr: &TypeCastExpr) -> Result<(), Error> {
    let source = expr_type(&expr.expr)?;
    compiler.gen_expr(&expr.expr)?;

    let instruction = match (source, expr.target) {
        (Type::Integer, Type::Real) => String::from("conv.r8"),
        (Type::Char, Type::Integer) => String::from("conv.i4"),
        (Type::Integer, Type::String) => to_string_helper("CIntStr", source),
        (Type::Real, Type::String) => to_string_helper("CRealStr", source),
        (Type::Boolean, Type::String) => to_string_helper("CBoolStr", source),
        (Type::Char, Type::String) => to_string_helper("CCharStr", source),
        (source, target) => {
            return Err(Error::internal(
                format!("no conversion from {} to {}", source, target),
                expr.expr.token().span.start.clone(),
            ))
        }
    };
    compiler.emit(&instruction);

    Ok(())
}

fn to_string_helper(helper: &str, source: Type) -> String {
    format!(
        "call string {}::{} ({})",
        HELPER_QUALIFIER,
        helper,
        source.il_name()
    )
}
