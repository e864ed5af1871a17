use tracing::debug;

use crate::{
    ast::{
        ast::{Block, ConstDecl, FnDecl, Program, VarDecl},
        expressions::{
            BinaryExpr, Expr, ExprKind, FnCallExpr, IdentifierExpr, LiteralExpr, TypeCastExpr,
            UnaryExpr,
        },
        statements::{
            AssignStmt, CallStmt, CompoundStmt, ForStmt, IfStmt, ReadStmt, RepeatStmt, WhileStmt,
            WriteStmt,
        },
        types::{binary_rule, can_coerce, unary_result, Type},
        visitor::VisitorMut,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::Token,
    symbol_table::symbol_table::{
        ConstSymbol, FnSymbol, Storage, Symbol, SymbolRef, SymbolTable, VarSymbol,
    },
    Position,
};

pub struct TypeChecker {
    symbols: SymbolTable,
    in_function: bool,
}

impl Default for TypeChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeChecker {
    pub fn new() -> Self {
        TypeChecker {
            symbols: SymbolTable::new(),
            in_function: false,
        }
    }

    /// Infers the type of `expr`, records it on the node and returns it.
    pub fn infer(&mut self, expr: &mut Expr) -> Result<Type, Error> {
        // A bare routine name in an expression is a call without arguments.
        if let ExprKind::Identifier(IdentifierExpr { name }) = &expr.kind {
            if let Some(SymbolRef::Function(_)) = self.symbols.find(&name.value) {
                expr.kind = ExprKind::FnCall(FnCallExpr {
                    name: name.clone(),
                    args: vec![],
                });
            }
        }

        let ty = expr.accept_mut(self)?;
        expr.ty = Some(ty);
        Ok(ty)
    }

    fn check_block(&mut self, block: &mut Block) -> Result<(), Error> {
        for decl in block.declarations.consts.iter_mut() {
            self.visit_const_decl(decl)?;
        }
        for decl in block.declarations.vars.iter_mut() {
            self.visit_var_decl(decl)?;
        }
        for decl in block.declarations.functions.iter_mut() {
            self.visit_fn_decl(decl)?;
        }

        self.visit_compound(&mut block.body)?;
        Ok(())
    }

    fn check_condition(&mut self, condition: &mut Expr) -> Result<(), Error> {
        let ty = self.infer(condition)?;
        if ty != Type::Boolean {
            return Err(Error::at(
                ErrorImpl::TypeMatchError {
                    expected: Type::Boolean.to_string(),
                    received: ty.to_string(),
                },
                condition.token(),
            ));
        }
        Ok(())
    }

    /// Resolves a routine and checks the arguments against its parameters,
    /// inserting casts where an argument needs an implicit coercion.
    fn check_call(&mut self, name: &Token, args: &mut [Expr]) -> Result<Type, Error> {
        let function = match self.symbols.find_function(&name.value) {
            Some(function) => function.clone(),
            None if self.symbols.find(&name.value).is_some() => {
                return Err(Error::at(
                    ErrorImpl::NotAFunction {
                        name: name.value.clone(),
                    },
                    name,
                ))
            }
            None => {
                return Err(Error::at(
                    ErrorImpl::FunctionNotDeclared {
                        function: name.value.clone(),
                    },
                    name,
                ))
            }
        };

        let expected = function.params.len();
        let received = args.len();
        if received > expected {
            return Err(Error::at(
                ErrorImpl::UnexpectedArguments { expected, received },
                name,
            ));
        }
        if received < expected {
            return Err(Error::at(
                ErrorImpl::MissingArguments { expected, received },
                name,
            ));
        }

        for (arg, (_, param_type)) in args.iter_mut().zip(function.params.iter()) {
            self.infer(arg)?;
            let position = arg.token().span.start.clone();
            coerce(arg, *param_type, position)?;
        }

        Ok(function.return_type)
    }

    /// Resolves an assignment target to a writable variable.
    fn resolve_target(&self, name: &Token) -> Result<Type, Error> {
        match self.symbols.find(&name.value) {
            Some(SymbolRef::Var(var)) if var.is_read_only() => Err(Error::at(
                ErrorImpl::AssignmentToReadOnly {
                    name: name.value.clone(),
                },
                name,
            )),
            Some(SymbolRef::Var(var)) => Ok(var.ty),
            Some(SymbolRef::Const(_)) => Err(Error::at(
                ErrorImpl::AssignmentToReadOnly {
                    name: name.value.clone(),
                },
                name,
            )),
            Some(SymbolRef::Function(_)) | None => Err(Error::at(
                ErrorImpl::VariableNotDeclared {
                    variable: name.value.clone(),
                },
                name,
            )),
        }
    }
}

/// Wraps `expr` in a cast to `target` when its type differs and the implicit
/// coercion exists.
fn coerce(expr: &mut Expr, target: Type, position: Position) -> Result<(), Error> {
    let source = expr.ty.unwrap_or(Type::Error);
    if source == target {
        return Ok(());
    }

    if !can_coerce(source, target) {
        return Err(Error::new(
            ErrorImpl::TypeMatchError {
                expected: target.to_string(),
                received: source.to_string(),
            },
            position,
        ));
    }

    expr.wrap_in_cast(target);
    Ok(())
}

impl VisitorMut for TypeChecker {
    type Output = Type;

    fn visit_program(&mut self, program: &mut Program) -> Result<Type, Error> {
        debug!(program = %program.name.value, "type checking program");
        self.visit_block(&mut program.block)
    }

    fn visit_block(&mut self, block: &mut Block) -> Result<Type, Error> {
        self.symbols.push_scope();
        self.check_block(block)?;
        self.symbols.pop_scope();

        Ok(Type::Void)
    }

    fn visit_const_decl(&mut self, decl: &mut ConstDecl) -> Result<Type, Error> {
        let ty = Type::from_literal(decl.value.kind).ok_or_else(|| {
            Error::internal(
                format!("constant {} bound to a non-literal", decl.name.value),
                decl.value.span.start.clone(),
            )
        })?;

        let symbol = Symbol::Const(ConstSymbol {
            name: decl.name.value.clone(),
            value: decl.value.clone(),
            ty,
        });
        self.symbols.declare(symbol, &decl.name)?;

        Ok(ty)
    }

    fn visit_var_decl(&mut self, decl: &mut VarDecl) -> Result<Type, Error> {
        let storage = if self.in_function {
            Storage::Local
        } else {
            Storage::Static
        };

        let symbol = Symbol::Var(VarSymbol::new(&decl.name.value, decl.var_type, storage));
        self.symbols.declare(symbol, &decl.name)?;

        Ok(decl.var_type)
    }

    fn visit_fn_decl(&mut self, decl: &mut FnDecl) -> Result<Type, Error> {
        if self.in_function {
            return Err(Error::at(
                ErrorImpl::NotImplementedError {
                    feature: String::from("nested routine declarations"),
                },
                &decl.name,
            ));
        }

        debug!(routine = %decl.name.value, "type checking routine");

        let symbol = Symbol::Function(FnSymbol {
            name: decl.name.value.clone(),
            params: decl
                .params
                .iter()
                .map(|param| (param.name.value.clone(), param.var_type))
                .collect(),
            return_type: decl.return_type,
            std_lib: false,
        });
        self.symbols.declare(symbol, &decl.name)?;

        self.symbols.push_scope();
        self.in_function = true;

        for param in &decl.params {
            let mut symbol = VarSymbol::new(&param.name.value, param.var_type, Storage::Argument);
            symbol.assigned = true;
            self.symbols.declare(Symbol::Var(symbol), &param.name)?;
        }

        if !decl.is_procedure() {
            let result = VarSymbol::result(&decl.name.value, decl.return_type);
            self.symbols.declare(Symbol::Var(result), &decl.name)?;
        }

        self.check_block(&mut decl.block)?;

        self.in_function = false;
        self.symbols.pop_scope();

        Ok(decl.return_type)
    }

    fn visit_compound(&mut self, stmt: &mut CompoundStmt) -> Result<Type, Error> {
        for statement in stmt.statements.iter_mut() {
            statement.accept_mut(self)?;
        }
        Ok(Type::Void)
    }

    fn visit_assign(&mut self, stmt: &mut AssignStmt) -> Result<Type, Error> {
        let target = self.resolve_target(&stmt.name)?;

        self.infer(&mut stmt.expr)?;
        coerce(&mut stmt.expr, target, stmt.name.span.start.clone())?;
        self.symbols.mark_assigned(&stmt.name.value);

        Ok(target)
    }

    fn visit_if(&mut self, stmt: &mut IfStmt) -> Result<Type, Error> {
        self.check_condition(&mut stmt.condition)?;
        stmt.then_branch.accept_mut(self)?;
        if let Some(else_branch) = stmt.else_branch.as_mut() {
            else_branch.accept_mut(self)?;
        }
        Ok(Type::Void)
    }

    fn visit_while(&mut self, stmt: &mut WhileStmt) -> Result<Type, Error> {
        self.check_condition(&mut stmt.condition)?;
        stmt.body.accept_mut(self)?;
        Ok(Type::Void)
    }

    fn visit_repeat(&mut self, stmt: &mut RepeatStmt) -> Result<Type, Error> {
        for statement in stmt.body.iter_mut() {
            statement.accept_mut(self)?;
        }
        self.check_condition(&mut stmt.condition)?;
        Ok(Type::Void)
    }

    fn visit_for(&mut self, stmt: &mut ForStmt) -> Result<Type, Error> {
        let var_type = self.resolve_target(&stmt.var)?;
        if var_type != Type::Integer {
            return Err(Error::at(
                ErrorImpl::TypeMatchError {
                    expected: Type::Integer.to_string(),
                    received: var_type.to_string(),
                },
                &stmt.var,
            ));
        }

        self.infer(&mut stmt.start)?;
        let position = stmt.start.token().span.start.clone();
        coerce(&mut stmt.start, var_type, position)?;

        self.infer(&mut stmt.end)?;
        let position = stmt.end.token().span.start.clone();
        coerce(&mut stmt.end, var_type, position)?;

        self.symbols.mark_assigned(&stmt.var.value);
        stmt.body.accept_mut(self)?;

        Ok(Type::Void)
    }

    fn visit_write(&mut self, stmt: &mut WriteStmt) -> Result<Type, Error> {
        for expr in stmt.exprs.iter_mut() {
            self.infer(expr)?;
        }
        Ok(Type::Void)
    }

    fn visit_read(&mut self, stmt: &mut ReadStmt) -> Result<Type, Error> {
        Err(Error::at(
            ErrorImpl::NotImplementedError {
                feature: String::from("read"),
            },
            &stmt.token,
        ))
    }

    fn visit_call(&mut self, stmt: &mut CallStmt) -> Result<Type, Error> {
        self.check_call(&stmt.name, &mut stmt.args)
    }

    fn visit_literal(&mut self, expr: &mut LiteralExpr) -> Result<Type, Error> {
        Type::from_literal(expr.token.kind).ok_or_else(|| {
            Error::internal(
                format!("{:?} is not a literal", expr.token.kind),
                expr.token.span.start.clone(),
            )
        })
    }

    fn visit_identifier(&mut self, expr: &mut IdentifierExpr) -> Result<Type, Error> {
        match self.symbols.find(&expr.name.value) {
            Some(SymbolRef::Var(var)) if !var.assigned => Err(Error::at(
                ErrorImpl::VariableNotAssigned {
                    variable: expr.name.value.clone(),
                },
                &expr.name,
            )),
            Some(SymbolRef::Var(var)) => Ok(var.ty),
            Some(SymbolRef::Const(constant)) => Ok(constant.ty),
            Some(SymbolRef::Function(_)) | None => Err(Error::at(
                ErrorImpl::VariableNotDeclared {
                    variable: expr.name.value.clone(),
                },
                &expr.name,
            )),
        }
    }

    fn visit_unary(&mut self, expr: &mut UnaryExpr) -> Result<Type, Error> {
        let operand = self.infer(&mut expr.expr)?;

        unary_result(expr.op, operand).ok_or_else(|| {
            Error::at(
                ErrorImpl::InvalidOperand {
                    operator: expr.op.to_string(),
                    operand: operand.to_string(),
                },
                &expr.token,
            )
        })
    }

    fn visit_binary(&mut self, expr: &mut BinaryExpr) -> Result<Type, Error> {
        let left = self.infer(&mut expr.left)?;
        let right = self.infer(&mut expr.right)?;

        let rule = binary_rule(expr.op, left, right).ok_or_else(|| {
            Error::at(
                ErrorImpl::InvalidOperands {
                    operator: expr.op.to_string(),
                    left: left.to_string(),
                    right: right.to_string(),
                },
                &expr.token,
            )
        })?;

        if let Some(target) = rule.left_cast {
            expr.left.wrap_in_cast(target);
        }
        if let Some(target) = rule.right_cast {
            expr.right.wrap_in_cast(target);
        }

        Ok(rule.result)
    }

    fn visit_fn_call(&mut self, expr: &mut FnCallExpr) -> Result<Type, Error> {
        let return_type = self.check_call(&expr.name, &mut expr.args)?;

        if return_type == Type::Void {
            return Err(Error::at(
                ErrorImpl::ProcedureInExpression {
                    procedure: expr.name.value.clone(),
                },
                &expr.name,
            ));
        }

        Ok(return_type)
    }

    fn visit_type_cast(&mut self, expr: &mut TypeCastExpr) -> Result<Type, Error> {
        self.infer(&mut expr.expr)?;
        Ok(expr.target)
    }
}

/// Resolves names, checks and annotates types, and inserts implicit casts.
///
/// The tree is only modified when the whole program checks successfully; on
/// error it is left exactly as it was.
pub fn type_check(program: &mut Program) -> Result<(), Error> {
    let mut checked = program.clone();
    let mut type_checker = TypeChecker::new();

    checked.accept_mut(&mut type_checker)?;

    *program = checked;
    Ok(())
}
