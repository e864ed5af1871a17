//! Main compiler module.
//!
//! This module contains the core Compiler structure and drives IL generation
//! over a type checked tree. It owns the output buffer, the label counter and a
//! scope chain of its own, which it uses to decide where every variable lives.

use std::fmt::Write;

use tracing::{debug, trace};

use crate::{
    ast::{
        ast::{Block, ConstDecl, FnDecl, Program, VarDecl},
        expressions::{
            BinaryExpr, Expr, FnCallExpr, IdentifierExpr, LiteralExpr, TypeCastExpr, UnaryExpr,
        },
        statements::{
            AssignStmt, CallStmt, CompoundStmt, ForStmt, IfStmt, ReadStmt, RepeatStmt, WhileStmt,
            WriteStmt,
        },
        types::Type,
        visitor::Visitor,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::Token,
    symbol_table::symbol_table::{
        ConstSymbol, FnSymbol, Storage, Symbol, SymbolRef, SymbolTable, VarSymbol,
    },
};

use super::{expr, stmt};

/// Assembly references emitted at the top of every module.
const ASSEMBLY_EXTERNS: [&str; 3] = [
    ".assembly extern System.Runtime { .publickeytoken = (B0 3F 5F 7F 11 D5 0A 3A) .ver 7:0:0:0 }",
    ".assembly extern System.Console { .publickeytoken = (B0 3F 5F 7F 11 D5 0A 3A) .ver 7:0:0:0 }",
    ".assembly extern PSILib { .ver 1:0:0:0 }",
];

/// Qualifier for routines and variables of the standard library.
pub const STD_LIB_QUALIFIER: &str = "[PSILib]PSILib.Lib";
/// Qualifier for the runtime conversion helpers.
pub const HELPER_QUALIFIER: &str = "[PSILib]PSILib.Helper";
/// Qualifier for routines and fields of the generated program.
pub const PROGRAM_QUALIFIER: &str = "Program";

/// The state of one code generation run.
///
/// Nothing here outlives a call to [`compile`], so separate compilations
/// never share labels or output.
pub struct Compiler {
    output: String,
    symbols: SymbolTable,
    label: u32,
    in_function: bool,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Compiler {
    pub fn new() -> Self {
        Compiler {
            output: String::new(),
            symbols: SymbolTable::new(),
            label: 0,
            in_function: false,
        }
    }

    /// Appends one line to the output.
    pub fn out(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }

    /// Appends one indented instruction to the output.
    pub fn emit(&mut self, instruction: &str) {
        let _ = writeln!(self.output, "    {}", instruction);
    }

    pub fn emit_label(&mut self, label: &str) {
        let _ = writeln!(self.output, "  {}:", label);
    }

    /// Allocates a fresh branch label. Labels are numbered from 1 and are never
    /// reused within a run.
    pub fn next_label(&mut self) -> String {
        self.label += 1;
        let label = format!("IL_{:04}", self.label);
        trace!(%label, "allocated label");
        label
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Generates code for an expression, refusing nodes the type checker did
    /// not annotate with a value type.
    pub fn gen_expr(&mut self, expr: &Expr) -> Result<(), Error> {
        expr_type(expr)?;
        expr.accept(self)
    }

    /// Resolves `name` to a variable of the generated program.
    fn resolve_var(&self, name: &Token) -> Result<VarSymbol, Error> {
        match self.symbols.find(&name.value) {
            Some(SymbolRef::Var(var)) => Ok(var.clone()),
            _ => Err(Error::internal(
                format!("'{}' does not resolve to a variable", name.value),
                name.span.start.clone(),
            )),
        }
    }

    /// Pushes the value of the variable `name`.
    pub fn load_var(&mut self, name: &Token) -> Result<(), Error> {
        let var = self.resolve_var(name)?;

        let instruction = match var.storage {
            Storage::Local => format!("ldloc {}", var.name),
            Storage::Argument => format!("ldarg {}", var.name),
            Storage::Static if var.std_lib => format!(
                "call {} {}::get_{}()",
                var.ty.il_name(),
                STD_LIB_QUALIFIER,
                var.name
            ),
            Storage::Static => format!(
                "ldsfld {} {}::{}",
                var.ty.il_name(),
                PROGRAM_QUALIFIER,
                var.name
            ),
        };
        self.emit(&instruction);

        Ok(())
    }

    /// Pops the top of the stack into the variable `name`.
    pub fn store_var(&mut self, name: &Token) -> Result<(), Error> {
        let var = self.resolve_var(name)?;
        if var.is_read_only() {
            return Err(Error::internal(
                format!("store to read-only variable '{}'", var.name),
                name.span.start.clone(),
            ));
        }

        let instruction = match var.storage {
            Storage::Local => format!("stloc {}", var.name),
            Storage::Argument => format!("starg {}", var.name),
            Storage::Static => format!(
                "stsfld {} {}::{}",
                var.ty.il_name(),
                PROGRAM_QUALIFIER,
                var.name
            ),
        };
        self.emit(&instruction);

        Ok(())
    }

    /// Emits a call to the routine `name` with its arguments already pushed,
    /// and returns the routine's return type.
    pub fn emit_call(&mut self, name: &Token) -> Result<Type, Error> {
        let function = self.symbols.find_function(&name.value).cloned().ok_or_else(|| {
            Error::internal(
                format!("'{}' does not resolve to a routine", name.value),
                name.span.start.clone(),
            )
        })?;

        let qualifier = if function.std_lib {
            STD_LIB_QUALIFIER
        } else {
            PROGRAM_QUALIFIER
        };
        let params = function
            .params
            .iter()
            .map(|(_, ty)| ty.il_name())
            .collect::<Vec<_>>()
            .join(", ");

        self.emit(&format!(
            "call {} {}::{}({})",
            function.return_type.il_name(),
            qualifier,
            function.name,
            params
        ));

        Ok(function.return_type)
    }

    fn gen_declarations(&mut self, block: &Block) -> Result<(), Error> {
        for decl in &block.declarations.consts {
            self.visit_const_decl(decl)?;
        }
        for decl in &block.declarations.vars {
            self.visit_var_decl(decl)?;
        }
        for decl in &block.declarations.functions {
            self.visit_fn_decl(decl)?;
        }
        Ok(())
    }
}

/// The annotated type of `expr`, or an internal error when the type checker
/// left it without a value type.
pub fn expr_type(expr: &Expr) -> Result<Type, Error> {
    match expr.ty {
        Some(ty) if ty.is_value() => Ok(ty),
        ty => Err(Error::internal(
            format!(
                "expression reached code generation with type {}",
                ty.map_or(String::from("<none>"), |ty| ty.to_string())
            ),
            expr.token().span.start.clone(),
        )),
    }
}

impl Visitor for Compiler {
    type Output = ();

    fn visit_program(&mut self, program: &Program) -> Result<(), Error> {
        debug!(program = %program.name.value, "generating program");

        for line in ASSEMBLY_EXTERNS {
            self.out(line);
        }
        self.out(&format!(
            ".assembly {} {{ .ver 0:0:0:0 }}\n",
            program.name.value
        ));

        self.out(".class Program {");
        self.symbols.push_scope();
        self.gen_declarations(&program.block)?;

        self.out("  .method static void Main () {");
        self.emit(".entrypoint");
        self.visit_compound(&program.block.body)?;
        self.emit("ret");
        self.out("  }");

        self.symbols.pop_scope();
        self.out("}");

        Ok(())
    }

    fn visit_block(&mut self, block: &Block) -> Result<(), Error> {
        self.gen_declarations(block)?;
        self.visit_compound(&block.body)
    }

    fn visit_const_decl(&mut self, decl: &ConstDecl) -> Result<(), Error> {
        let ty = Type::from_literal(decl.value.kind).ok_or_else(|| {
            Error::internal(
                format!("constant {} bound to a non-literal", decl.name.value),
                decl.value.span.start.clone(),
            )
        })?;

        self.symbols.declare(
            Symbol::Const(ConstSymbol {
                name: decl.name.value.clone(),
                value: decl.value.clone(),
                ty,
            }),
            &decl.name,
        )
    }

    fn visit_var_decl(&mut self, decl: &VarDecl) -> Result<(), Error> {
        let storage = if self.in_function {
            Storage::Local
        } else {
            Storage::Static
        };

        self.symbols.declare(
            Symbol::Var(VarSymbol::new(&decl.name.value, decl.var_type, storage)),
            &decl.name,
        )?;

        // Locals are listed once in the method header.
        if storage == Storage::Static {
            self.out(&format!(
                "  .field static {} {}",
                decl.var_type.il_name(),
                decl.name.value
            ));
        }

        Ok(())
    }

    fn visit_fn_decl(&mut self, decl: &FnDecl) -> Result<(), Error> {
        if self.in_function {
            return Err(Error::at(
                ErrorImpl::NotImplementedError {
                    feature: String::from("nested routine declarations"),
                },
                &decl.name,
            ));
        }

        debug!(routine = %decl.name.value, "generating routine");

        self.symbols.declare(
            Symbol::Function(FnSymbol {
                name: decl.name.value.clone(),
                params: decl
                    .params
                    .iter()
                    .map(|param| (param.name.value.clone(), param.var_type))
                    .collect(),
                return_type: decl.return_type,
                std_lib: false,
            }),
            &decl.name,
        )?;

        let params = decl
            .params
            .iter()
            .map(|param| format!("{} {}", param.var_type.il_name(), param.name.value))
            .collect::<Vec<_>>()
            .join(", ");
        self.out(&format!(
            "  .method public static {} {} ({}) {{",
            decl.return_type.il_name(),
            decl.name.value,
            params
        ));

        let mut locals = vec![];
        if !decl.is_procedure() {
            locals.push(format!("{} {}", decl.return_type.il_name(), decl.name.value));
        }
        for var in &decl.block.declarations.vars {
            locals.push(format!("{} {}", var.var_type.il_name(), var.name.value));
        }
        if !locals.is_empty() {
            self.emit(&format!(".locals init ({})", locals.join(", ")));
        }

        self.symbols.push_scope();
        self.in_function = true;

        for param in &decl.params {
            let symbol = VarSymbol::new(&param.name.value, param.var_type, Storage::Argument);
            self.symbols.declare(Symbol::Var(symbol), &param.name)?;
        }
        if !decl.is_procedure() {
            let result = VarSymbol::result(&decl.name.value, decl.return_type);
            self.symbols.declare(Symbol::Var(result), &decl.name)?;
        }

        self.visit_block(&decl.block)?;

        if !decl.is_procedure() {
            self.emit(&format!("ldloc {}", decl.name.value));
        }
        self.emit("ret");
        self.out("  }");

        self.in_function = false;
        self.symbols.pop_scope();

        Ok(())
    }

    fn visit_compound(&mut self, stmt: &CompoundStmt) -> Result<(), Error> {
        for statement in &stmt.statements {
            statement.accept(self)?;
        }
        Ok(())
    }

    fn visit_assign(&mut self, stmt: &AssignStmt) -> Result<(), Error> {
        stmt::gen_assign(self, stmt)
    }

    fn visit_if(&mut self, stmt: &IfStmt) -> Result<(), Error> {
        stmt::gen_if(self, stmt)
    }

    fn visit_while(&mut self, stmt: &WhileStmt) -> Result<(), Error> {
        stmt::gen_while(self, stmt)
    }

    fn visit_repeat(&mut self, stmt: &RepeatStmt) -> Result<(), Error> {
        stmt::gen_repeat(self, stmt)
    }

    fn visit_for(&mut self, stmt: &ForStmt) -> Result<(), Error> {
        stmt::gen_for(self, stmt)
    }

    fn visit_write(&mut self, stmt: &WriteStmt) -> Result<(), Error> {
        stmt::gen_write(self, stmt)
    }

    fn visit_read(&mut self, stmt: &ReadStmt) -> Result<(), Error> {
        Err(Error::at(
            ErrorImpl::NotImplementedError {
                feature: String::from("read"),
            },
            &stmt.token,
        ))
    }

    fn visit_call(&mut self, stmt: &CallStmt) -> Result<(), Error> {
        stmt::gen_call(self, stmt)
    }

    fn visit_literal(&mut self, expr: &LiteralExpr) -> Result<(), Error> {
        expr::gen_literal(self, &expr.token)
    }

    fn visit_identifier(&mut self, expr: &IdentifierExpr) -> Result<(), Error> {
        expr::gen_identifier(self, expr)
    }

    fn visit_unary(&mut self, expr: &UnaryExpr) -> Result<(), Error> {
        expr::gen_unary(self, expr)
    }

    fn visit_binary(&mut self, expr: &BinaryExpr) -> Result<(), Error> {
        expr::gen_binary(self, expr)
    }

    fn visit_fn_call(&mut self, expr: &FnCallExpr) -> Result<(), Error> {
        for arg in &expr.args {
            self.gen_expr(arg)?;
        }
        self.emit_call(&expr.name)?;
        Ok(())
    }

    fn visit_type_cast(&mut self, expr: &TypeCastExpr) -> Result<(), Error> {
        expr::gen_type_cast(self, expr)
    }
}

/// Generates the IL text for a type checked program.
pub fn compile(program: &Program) -> Result<String, Error> {
    let mut compiler = Compiler::new();
    program.accept(&mut compiler)?;

    Ok(compiler.output)
}
