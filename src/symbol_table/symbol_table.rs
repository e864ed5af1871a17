use std::collections::HashMap;

use lazy_static::lazy_static;
use tracing::debug;

use crate::{
    ast::types::Type,
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::Token,
};

/// Where a variable lives in the generated program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    /// Module-level static field.
    Static,
    /// Local slot of the enclosing routine.
    Local,
    /// Parameter slot of the enclosing routine.
    Argument,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstSymbol {
    pub name: String,
    /// The literal the constant stands for.
    pub value: Token,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarSymbol {
    pub name: String,
    pub ty: Type,
    pub assigned: bool,
    pub storage: Storage,
    pub std_lib: bool,
    /// Set on the variable holding a function's result inside its own body.
    pub is_result: bool,
}

impl VarSymbol {
    pub fn new(name: &str, ty: Type, storage: Storage) -> Self {
        VarSymbol {
            name: name.to_string(),
            ty,
            assigned: false,
            storage,
            std_lib: false,
            is_result: false,
        }
    }

    /// The result variable a function body assigns its return value to.
    pub fn result(name: &str, ty: Type) -> Self {
        VarSymbol {
            is_result: true,
            ..VarSymbol::new(name, ty, Storage::Local)
        }
    }

    /// Standard library variables are exposed through getters only.
    pub fn is_read_only(&self) -> bool {
        self.std_lib
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FnSymbol {
    pub name: String,
    pub params: Vec<(String, Type)>,
    pub return_type: Type,
    pub std_lib: bool,
}

impl FnSymbol {
    pub fn is_procedure(&self) -> bool {
        self.return_type == Type::Void
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
    Const(ConstSymbol),
    Var(VarSymbol),
    Function(FnSymbol),
}

impl Symbol {
    pub fn name(&self) -> &str {
        match self {
            Symbol::Const(symbol) => &symbol.name,
            Symbol::Var(symbol) => &symbol.name,
            Symbol::Function(symbol) => &symbol.name,
        }
    }
}

/// A borrowed view of a resolved symbol.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SymbolRef<'a> {
    Const(&'a ConstSymbol),
    Var(&'a VarSymbol),
    Function(&'a FnSymbol),
}

#[derive(Debug)]
pub struct Scope {
    parent: Option<usize>,
    consts: HashMap<String, ConstSymbol>,
    vars: HashMap<String, VarSymbol>,
    functions: HashMap<String, FnSymbol>,
}

impl Scope {
    fn new(parent: Option<usize>) -> Self {
        Scope {
            parent,
            consts: HashMap::new(),
            vars: HashMap::new(),
            functions: HashMap::new(),
        }
    }

    fn contains(&self, name: &str) -> bool {
        self.consts.contains_key(name)
            || self.vars.contains_key(name)
            || self.functions.contains_key(name)
    }

    fn get(&self, name: &str) -> Option<SymbolRef<'_>> {
        if let Some(symbol) = self.consts.get(name) {
            return Some(SymbolRef::Const(symbol));
        }
        if let Some(symbol) = self.vars.get(name) {
            return Some(SymbolRef::Var(symbol));
        }
        self.functions.get(name).map(SymbolRef::Function)
    }

    fn insert(&mut self, symbol: Symbol) {
        match symbol {
            Symbol::Const(symbol) => {
                self.consts.insert(symbol.name.clone(), symbol);
            }
            Symbol::Var(symbol) => {
                self.vars.insert(symbol.name.clone(), symbol);
            }
            Symbol::Function(symbol) => {
                self.functions.insert(symbol.name.clone(), symbol);
            }
        }
    }
}

/// The predeclared routines and variables every program can see.
pub struct StandardLibrary {
    vars: HashMap<String, VarSymbol>,
    functions: HashMap<String, FnSymbol>,
}

impl StandardLibrary {
    fn get(&self, name: &str) -> Option<SymbolRef<'_>> {
        if let Some(symbol) = self.vars.get(name) {
            return Some(SymbolRef::Var(symbol));
        }
        self.functions.get(name).map(SymbolRef::Function)
    }

    fn add_function(&mut self, name: &str, params: &[Type], return_type: Type) {
        let params = params
            .iter()
            .enumerate()
            .map(|(index, ty)| (format!("arg{}", index), *ty))
            .collect();

        self.functions.insert(
            name.to_string(),
            FnSymbol {
                name: name.to_string(),
                params,
                return_type,
                std_lib: true,
            },
        );
    }

    fn add_var(&mut self, name: &str, ty: Type) {
        self.vars.insert(
            name.to_string(),
            VarSymbol {
                name: name.to_string(),
                ty,
                assigned: true,
                storage: Storage::Static,
                std_lib: true,
                is_result: false,
            },
        );
    }
}

lazy_static! {
    pub static ref STANDARD_LIBRARY: StandardLibrary = {
        let mut library = StandardLibrary {
            vars: HashMap::new(),
            functions: HashMap::new(),
        };

        library.add_function("Sqrt", &[Type::Real], Type::Real);
        library.add_function("Round", &[Type::Real], Type::Integer);
        library.add_function("Random", &[Type::Integer], Type::Integer);
        library.add_function("Sleep", &[Type::Integer], Type::Void);
        library.add_function("Beep", &[Type::Integer, Type::Integer], Type::Void);
        library.add_var("Pi", Type::Real);

        library
    };
}

/// A chain of lexical scopes, innermost last.
#[derive(Debug, Default)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    current: Option<usize>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable {
            scopes: vec![],
            current: None,
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::new(self.current));
        self.current = Some(self.scopes.len() - 1);
        debug!(depth = self.depth(), "entered scope");
    }

    /// Discards the innermost scope and makes its parent current again.
    pub fn pop_scope(&mut self) {
        if let Some(index) = self.current {
            self.current = self.scopes[index].parent;
            self.scopes.truncate(index);
            debug!(depth = self.depth(), "left scope");
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Registers `symbol` in the innermost scope.
    ///
    /// # Arguments
    ///
    /// * `symbol` - The symbol to add
    /// * `token` - The declaring token, used to position errors
    ///
    /// # Returns
    ///
    /// An `AlreadyDeclared` error when a constant, variable or routine of the
    /// same name already exists in the innermost scope. Names from outer
    /// scopes may be shadowed freely.
    pub fn declare(&mut self, symbol: Symbol, token: &Token) -> Result<(), Error> {
        let index = self.current.ok_or_else(|| {
            Error::internal("declaration outside of any scope", token.span.start.clone())
        })?;

        let scope = &mut self.scopes[index];
        if scope.contains(symbol.name()) {
            return Err(Error::at(
                ErrorImpl::AlreadyDeclared {
                    name: symbol.name().to_string(),
                },
                token,
            ));
        }

        scope.insert(symbol);
        Ok(())
    }

    fn resolve_scope(&self, name: &str) -> Option<usize> {
        let mut current = self.current;

        while let Some(index) = current {
            if self.scopes[index].contains(name) {
                return Some(index);
            }
            current = self.scopes[index].parent;
        }

        None
    }

    /// Looks `name` up from the innermost scope outwards, ending with the
    /// standard library. The first symbol of any kind wins.
    pub fn find(&self, name: &str) -> Option<SymbolRef<'_>> {
        match self.resolve_scope(name) {
            Some(index) => self.scopes[index].get(name),
            None => STANDARD_LIBRARY.get(name),
        }
    }

    /// Looks up the routine a call to `name` refers to. Like [`find`], the
    /// innermost symbol wins, except that a function's own result variable is
    /// passed over so the function can call itself. Any other constant or
    /// variable of that name hides the routine and yields `None`.
    ///
    /// [`find`]: SymbolTable::find
    pub fn find_function(&self, name: &str) -> Option<&FnSymbol> {
        let mut current = self.current;

        while let Some(index) = current {
            let scope = &self.scopes[index];
            if let Some(symbol) = scope.functions.get(name) {
                return Some(symbol);
            }
            match scope.vars.get(name) {
                Some(var) if var.is_result => {}
                Some(_) => return None,
                None if scope.consts.contains_key(name) => return None,
                None => {}
            }
            current = scope.parent;
        }

        STANDARD_LIBRARY.functions.get(name)
    }

    /// Sets the assigned flag of the variable `name` resolves to. Returns
    /// false when `name` does not resolve to a program variable.
    pub fn mark_assigned(&mut self, name: &str) -> bool {
        let Some(index) = self.resolve_scope(name) else {
            return false;
        };

        match self.scopes[index].vars.get_mut(name) {
            Some(var) => {
                var.assigned = true;
                true
            }
            None => false,
        }
    }
}
