use crate::{
    ast::{
        statements::{AssignStmt, CallStmt, ForStmt, IfStmt, RepeatStmt, WhileStmt, WriteStmt},
        types::Type,
    },
    errors::errors::Error,
};

use super::compiler::{expr_type, Compiler};

pub fn gen_assign(compiler: &mut Compiler, stmt: &AssignStmt) -> Result<(), Error> {
    compiler.gen_expr(&stmt.expr)?;
    compiler.store_var(&stmt.name)
}

pub fn gen_if(compiler: &mut Compiler, stmt: &IfStmt) -> Result<(), Error> {
    let false_label = compiler.next_label();
    let join_label = compiler.next_label();

    compiler.gen_expr(&stmt.condition)?;
    compiler.emit(&format!("brfalse {}", false_label));
    stmt.then_branch.accept(compiler)?;
    compiler.emit(&format!("br {}", join_label));

    compiler.emit_label(&false_label);
    if let Some(else_branch) = &stmt.else_branch {
        else_branch.accept(compiler)?;
    }
    compiler.emit_label(&join_label);

    Ok(())
}

/// The condition is tested after the body; a leading jump to the test gives
/// the loop its pre-test behaviour.
pub fn gen_while(compiler: &mut Compiler, stmt: &WhileStmt) -> Result<(), Error> {
    let body_label = compiler.next_label();
    let test_label = compiler.next_label();

    compiler.emit(&format!("br {}", test_label));
    compiler.emit_label(&body_label);
    stmt.body.accept(compiler)?;

    compiler.emit_label(&test_label);
    compiler.gen_expr(&stmt.condition)?;
    compiler.emit(&format!("brtrue {}", body_label));

    Ok(())
}

pub fn gen_repeat(compiler: &mut Compiler, stmt: &RepeatStmt) -> Result<(), Error> {
    let loop_label = compiler.next_label();

    compiler.emit_label(&loop_label);
    for statement in &stmt.body {
        statement.accept(compiler)?;
    }
    compiler.gen_expr(&stmt.condition)?;
    compiler.emit(&format!("brfalse {}", loop_label));

    Ok(())
}

/// Lowers `for v := start to|downto end do body`.
///
/// The loop exits once `v > end` (ascending) or `v < end` (descending), with
/// the end expression evaluated again before every test.
pub fn gen_for(compiler: &mut Compiler, stmt: &ForStmt) -> Result<(), Error> {
    compiler.gen_expr(&stmt.start)?;
    compiler.store_var(&stmt.var)?;

    let test_label = compiler.next_label();
    let body_label = compiler.next_label();

    compiler.emit(&format!("br {}", test_label));
    compiler.emit_label(&body_label);
    stmt.body.accept(compiler)?;

    compiler.load_var(&stmt.var)?;
    compiler.emit("ldc.i4.1");
    compiler.emit(if stmt.ascending { "add" } else { "sub" });
    compiler.store_var(&stmt.var)?;

    compiler.emit_label(&test_label);
    compiler.load_var(&stmt.var)?;
    compiler.gen_expr(&stmt.end)?;
    compiler.emit(if stmt.ascending { "cgt" } else { "clt" });
    compiler.emit(&format!("brfalse {}", body_label));

    Ok(())
}

pub fn gen_write(compiler: &mut Compiler, stmt: &WriteStmt) -> Result<(), Error> {
    for expr in &stmt.exprs {
        let ty = expr_type(expr)?;
        compiler.gen_expr(expr)?;
        compiler.emit(&format!(
            "call void [System.Console]System.Console::Write ({})",
            ty.il_name()
        ));
    }

    if stmt.newline {
        compiler.emit("call void [System.Console]System.Console::WriteLine ()");
    }

    Ok(())
}

pub fn gen_call(compiler: &mut Compiler, stmt: &CallStmt) -> Result<(), Error> {
    for arg in &stmt.args {
        compiler.gen_expr(arg)?;
    }

    // A function called as a statement leaves its result on the stack.
    if compiler.emit_call(&stmt.name)? != Type::Void {
        compiler.emit("pop");
    }

    Ok(())
}
