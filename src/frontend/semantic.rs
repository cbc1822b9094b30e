//! Semantic analysis for the Pascal subset
//!
//! Walks the AST building a chain of scoped symbol tables, resolving
//! every identifier and type-checking expressions, assignments and
//! procedure calls before anything is evaluated.

use crate::frontend::ast::*;
use crate::utils::{Error, Result};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

// ==================== Symbols ====================

/// A declared variable together with its resolved type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VarSymbol {
    pub name: String,
    pub type_name: TypeName,
}

/// Symbol information
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "symbolType")]
pub enum Symbol {
    #[serde(rename = "builtin_type")]
    BuiltinType { name: String },
    #[serde(rename = "var")]
    Var(VarSymbol),
    #[serde(rename = "procedure")]
    Procedure {
        name: String,
        params: Vec<VarSymbol>,
    },
}

impl Symbol {
    pub fn name(&self) -> &str {
        match self {
            Symbol::BuiltinType { name } => name,
            Symbol::Var(var) => &var.name,
            Symbol::Procedure { name, .. } => name,
        }
    }

    /// Kind label used in wrong-symbol-kind messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Symbol::BuiltinType { .. } => "builtin_type",
            Symbol::Var(_) => "var",
            Symbol::Procedure { .. } => "procedure",
        }
    }
}

// ==================== Scoped symbol table ====================

/// Index of a scope in the table's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScopeId(usize);

#[derive(Debug)]
struct Scope {
    name: String,
    level: usize,
    enclosing: Option<ScopeId>,
    symbols: HashMap<String, Symbol>,
}

/// Nested symbol tables backed by an arena. Leaving a scope only moves
/// the cursor, so finished scopes stay inspectable for the UI.
pub struct ScopedSymbolTable {
    scopes: Vec<Scope>,
    current: ScopeId,
}

impl ScopedSymbolTable {
    /// Create the table with its builtins scope: the INTEGER and REAL
    /// type symbols plus the `write` procedure signature.
    pub fn new() -> Self {
        let mut builtins = Scope {
            name: "builtins".to_string(),
            level: 0,
            enclosing: None,
            symbols: HashMap::new(),
        };
        for name in ["INTEGER", "REAL"] {
            builtins.symbols.insert(
                name.to_string(),
                Symbol::BuiltinType {
                    name: name.to_string(),
                },
            );
        }
        builtins.symbols.insert(
            "write".to_string(),
            Symbol::Procedure {
                name: "write".to_string(),
                params: vec![VarSymbol {
                    name: "value".to_string(),
                    type_name: TypeName::Real,
                }],
            },
        );
        Self {
            scopes: vec![builtins],
            current: ScopeId(0),
        }
    }

    /// Enter a new scope one level below the current one
    fn enter_scope(&mut self, name: &str) {
        let id = ScopeId(self.scopes.len());
        let level = self.scopes[self.current.0].level + 1;
        self.scopes.push(Scope {
            name: name.to_string(),
            level,
            enclosing: Some(self.current),
            symbols: HashMap::new(),
        });
        self.current = id;
    }

    /// Move back to the enclosing scope
    fn exit_scope(&mut self) {
        if let Some(enclosing) = self.scopes[self.current.0].enclosing {
            self.current = enclosing;
        }
    }

    /// Define a symbol in the current scope
    fn define(&mut self, symbol: Symbol) {
        let scope = &mut self.scopes[self.current.0];
        scope.symbols.insert(symbol.name().to_string(), symbol);
    }

    /// Look up a symbol, searching from the current scope outward
    fn lookup(&self, name: &str) -> Option<&Symbol> {
        let mut scope_id = Some(self.current);
        while let Some(id) = scope_id {
            if let Some(symbol) = self.scopes[id.0].symbols.get(name) {
                return Some(symbol);
            }
            scope_id = self.scopes[id.0].enclosing;
        }
        None
    }

    /// Look up a symbol only in the current scope
    fn lookup_local(&self, name: &str) -> Option<&Symbol> {
        self.scopes[self.current.0].symbols.get(name)
    }

    /// Symbols of the named scope, keyed by name, for the symbol-table
    /// panel.
    pub fn scope_symbols(&self, scope_name: &str) -> Option<BTreeMap<String, Symbol>> {
        self.scopes.iter().find(|s| s.name == scope_name).map(|s| {
            s.symbols
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()
        })
    }
}

impl Default for ScopedSymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

// ==================== Analyzer ====================

/// The semantic analyzer
pub struct SemanticAnalyzer {
    table: ScopedSymbolTable,
}

impl SemanticAnalyzer {
    pub fn new() -> Self {
        Self {
            table: ScopedSymbolTable::new(),
        }
    }

    /// Check a program; on success the symbol table remains available
    /// for display.
    pub fn check(&mut self, program: &Program) -> Result<()> {
        self.visit_program(program)
    }

    /// Global-scope symbols keyed by name, for the symbol-table panel
    pub fn global_symbols(&self) -> BTreeMap<String, Symbol> {
        self.table.scope_symbols("global").unwrap_or_default()
    }

    fn visit_program(&mut self, program: &Program) -> Result<()> {
        self.table.enter_scope("global");
        let result = self.visit_block(&program.block);
        self.table.exit_scope();
        result
    }

    fn visit_block(&mut self, block: &Block) -> Result<()> {
        for declaration in &block.declarations {
            match declaration {
                Declaration::VarDecl(decl) => self.visit_var_decl(decl)?,
                Declaration::Procedure(decl) => self.visit_procedure_decl(decl)?,
            }
        }
        self.visit_compound(&block.compound)
    }

    fn visit_var_decl(&mut self, decl: &VarDecl) -> Result<()> {
        let type_name = self.resolve_type(&decl.type_spec)?;

        if self.table.lookup_local(&decl.var.name).is_some() {
            return Err(Error::DuplicateDeclaration {
                name: decl.var.name.clone(),
                span: decl.var.span,
            });
        }

        self.table.define(Symbol::Var(VarSymbol {
            name: decl.var.name.clone(),
            type_name,
        }));
        Ok(())
    }

    /// Resolve a type spec against the scope chain; it must name a
    /// builtin type symbol.
    fn resolve_type(&self, type_spec: &TypeSpec) -> Result<TypeName> {
        match self.table.lookup(type_spec.name.name()) {
            Some(Symbol::BuiltinType { .. }) => Ok(type_spec.name),
            Some(_) | None => Err(Error::NotAType {
                name: type_spec.name.name().to_string(),
                span: type_spec.span,
            }),
        }
    }

    fn visit_procedure_decl(&mut self, decl: &ProcedureDecl) -> Result<()> {
        let mut param_symbols = Vec::with_capacity(decl.params.len());
        for param in &decl.params {
            let type_name = self.resolve_type(&param.type_spec)?;
            param_symbols.push(VarSymbol {
                name: param.var.name.clone(),
                type_name,
            });
        }

        // The procedure itself is registered in the enclosing scope;
        // its parameters live in the new one.
        self.table.define(Symbol::Procedure {
            name: decl.name.clone(),
            params: param_symbols.clone(),
        });

        self.table.enter_scope(&decl.name);
        for param in param_symbols {
            self.table.define(Symbol::Var(param));
        }
        let result = self.visit_block(&decl.block);
        self.table.exit_scope();
        result
    }

    fn visit_compound(&mut self, compound: &Compound) -> Result<()> {
        for child in &compound.children {
            match child {
                Statement::Compound(inner) => self.visit_compound(inner)?,
                Statement::Assign(assign) => self.visit_assign(assign)?,
                Statement::ProcedureCall(call) => self.visit_procedure_call(call)?,
                Statement::WriteStream(_) | Statement::NoOp(_) => {}
            }
        }
        Ok(())
    }

    fn visit_assign(&mut self, assign: &Assign) -> Result<()> {
        let var_symbol = match self.table.lookup(&assign.target.name) {
            Some(Symbol::Var(var)) => var.clone(),
            _ => {
                return Err(Error::UndeclaredName {
                    name: assign.target.name.clone(),
                    span: assign.target.span,
                })
            }
        };

        let expr_type = self.visit_expr(&assign.value)?;
        if !widens_to(expr_type, var_symbol.type_name) {
            return Err(Error::AssignTypeMismatch {
                name: var_symbol.name,
                expected: var_symbol.type_name.name().to_string(),
                got: expr_type.name().to_string(),
                span: assign.span,
            });
        }
        Ok(())
    }

    fn visit_procedure_call(&mut self, call: &ProcedureCall) -> Result<()> {
        let (name, params) = match self.table.lookup(&call.name) {
            Some(Symbol::Procedure { name, params }) => (name.clone(), params.clone()),
            Some(other) => {
                return Err(Error::NotAProcedure {
                    name: call.name.clone(),
                    kind: other.kind_name().to_string(),
                    span: call.span,
                })
            }
            None => {
                return Err(Error::UndeclaredName {
                    name: call.name.clone(),
                    span: call.span,
                })
            }
        };

        if call.args.len() != params.len() {
            return Err(Error::ArgCountMismatch {
                name,
                expected: params.len(),
                got: call.args.len(),
                span: call.span,
            });
        }

        for (formal, actual) in params.iter().zip(&call.args) {
            let got = self.visit_expr(actual)?;
            if !widens_to(got, formal.type_name) {
                return Err(Error::ParamTypeMismatch {
                    proc: name.clone(),
                    param: formal.name.clone(),
                    expected: formal.type_name.name().to_string(),
                    got: got.name().to_string(),
                    span: actual.span(),
                });
            }
        }
        Ok(())
    }

    fn visit_expr(&mut self, expr: &Expr) -> Result<TypeName> {
        match expr {
            Expr::BinOp(bin_op) => self.visit_bin_op(bin_op),
            Expr::UnaryOp(unary_op) => self.visit_expr(&unary_op.expr),
            Expr::Num(num) => Ok(match num.value {
                NumValue::Integer(_) => TypeName::Integer,
                NumValue::Real(_) => TypeName::Real,
            }),
            Expr::Var(var) => self.visit_var(var),
        }
    }

    fn visit_bin_op(&mut self, bin_op: &BinOp) -> Result<TypeName> {
        let left = self.visit_expr(&bin_op.left)?;
        let right = self.visit_expr(&bin_op.right)?;

        match bin_op.op {
            BinOpKind::IntegerDiv => {
                if left == TypeName::Integer && right == TypeName::Integer {
                    Ok(TypeName::Integer)
                } else {
                    Err(Error::IntegerDivOperands {
                        left: left.name().to_string(),
                        right: right.name().to_string(),
                        span: bin_op.span,
                    })
                }
            }
            _ => Ok(int_real_mixed_op(left, right)),
        }
    }

    fn visit_var(&mut self, var: &Var) -> Result<TypeName> {
        match self.table.lookup(&var.name) {
            Some(Symbol::Var(symbol)) => Ok(symbol.type_name),
            _ => Err(Error::UndeclaredName {
                name: var.name.clone(),
                span: var.span,
            }),
        }
    }
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether a value of type `from` may flow into a slot of type `to`:
/// exact match, or implicit INTEGER -> REAL widening.
fn widens_to(from: TypeName, to: TypeName) -> bool {
    from == to || (from == TypeName::Integer && to == TypeName::Real)
}

/// Result type of PLUS / MINUS / MUL / FLOAT_DIV: both INTEGER gives
/// INTEGER, anything involving REAL widens to REAL. With only two
/// builtin types every combination is well-typed.
fn int_real_mixed_op(left: TypeName, right: TypeName) -> TypeName {
    if left == TypeName::Integer && right == TypeName::Integer {
        TypeName::Integer
    } else {
        TypeName::Real
    }
}
