//! Tree-walking interpreter
//!
//! Evaluates a semantically valid AST over a fresh runtime scope
//! chain. Pascal's static INTEGER/REAL distinction is erased here:
//! every runtime value is an f64, and division by zero follows
//! IEEE-754 (inf / NaN) rather than raising.

mod builtins;
mod namespace;

use crate::frontend::ast::*;
use crate::utils::{Error, Result};
use namespace::ScopedNameSpace;
use serde::Serialize;

/// Default limit on nested procedure calls. The language has no
/// conditionals, so any self-recursive procedure recurses forever;
/// the guard turns that into an error instead of a blown host stack.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Program output accumulators
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Streams {
    pub stdout: String,
    pub stderr: String,
}

/// The interpreter
pub struct Interpreter<'a> {
    program: &'a Program,
    scope: ScopedNameSpace<'a>,
    streams: Streams,
    depth: usize,
    max_depth: usize,
}

impl<'a> Interpreter<'a> {
    /// Create an interpreter for a program that already passed
    /// semantic analysis. The base scope is named after the program
    /// and holds the builtin procedures.
    pub fn new(program: &'a Program) -> Self {
        let mut scope = ScopedNameSpace::new(&program.name);
        scope.insert_procedure(&builtins::WRITE);
        Self {
            program,
            scope,
            streams: Streams::default(),
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Run the program. Runtime errors (unresolved names, call depth)
    /// should be unreachable after semantic analysis; they are folded
    /// into STDOUT rather than propagated so a display layer always
    /// gets output text.
    pub fn interpret(&mut self) -> Streams {
        self.depth = 0;
        if let Err(err) = self.visit_program() {
            self.streams.stdout.push_str(&err.display_tagged());
        }
        std::mem::take(&mut self.streams)
    }

    fn visit_program(&mut self) -> Result<()> {
        let program = self.program;
        self.scope.enter_scope("global");
        let result = self.visit_block(&program.block);
        self.scope.exit_scope();
        result
    }

    fn visit_block(&mut self, block: &'a Block) -> Result<()> {
        for declaration in &block.declarations {
            match declaration {
                // Runtime bindings appear on assignment, not declaration
                Declaration::VarDecl(_) => {}
                Declaration::Procedure(decl) => self.scope.insert_procedure(decl),
            }
        }
        self.visit_compound(&block.compound)
    }

    fn visit_compound(&mut self, compound: &'a Compound) -> Result<()> {
        for child in &compound.children {
            match child {
                Statement::Compound(inner) => self.visit_compound(inner)?,
                Statement::Assign(assign) => self.visit_assign(assign)?,
                Statement::ProcedureCall(call) => self.visit_procedure_call(call)?,
                Statement::WriteStream(write) => self.visit_write_stream(write)?,
                Statement::NoOp(_) => {}
            }
        }
        Ok(())
    }

    fn visit_assign(&mut self, assign: &'a Assign) -> Result<()> {
        let value = self.visit_expr(&assign.value)?;
        self.scope.insert_value(&assign.target.name, value);
        Ok(())
    }

    fn visit_procedure_call(&mut self, call: &'a ProcedureCall) -> Result<()> {
        let procedure =
            self.scope
                .look_up_procedure(&call.name)
                .ok_or_else(|| Error::NameNotFound {
                    name: call.name.clone(),
                })?;

        self.depth += 1;
        if self.depth > self.max_depth {
            self.depth -= 1;
            return Err(Error::CallDepthExceeded {
                limit: self.max_depth,
            });
        }

        self.scope.enter_scope(&call.name);
        let result = self.bind_params_and_run(procedure, call);
        self.scope.exit_scope();
        self.depth -= 1;
        result
    }

    /// Formals bind one at a time inside the callee's scope, so a
    /// later actual already sees the formals bound before it.
    fn bind_params_and_run(
        &mut self,
        procedure: &'a ProcedureDecl,
        call: &'a ProcedureCall,
    ) -> Result<()> {
        for (param, arg) in procedure.params.iter().zip(&call.args) {
            let value = self.visit_expr(arg)?;
            self.scope.insert_value(&param.var.name, value);
        }
        self.visit_block(&procedure.block)
    }

    fn visit_write_stream(&mut self, write: &'a WriteStream) -> Result<()> {
        let value =
            self.scope
                .look_up_value(&write.var.name)
                .ok_or_else(|| Error::NameNotFound {
                    name: write.var.name.clone(),
                })?;
        let text = value.to_string();
        match write.stream {
            StreamKind::Stdout => self.streams.stdout.push_str(&text),
            StreamKind::Stderr => self.streams.stderr.push_str(&text),
        }
        Ok(())
    }

    fn visit_expr(&mut self, expr: &'a Expr) -> Result<f64> {
        match expr {
            Expr::BinOp(bin_op) => self.visit_bin_op(bin_op),
            Expr::UnaryOp(unary_op) => {
                let value = self.visit_expr(&unary_op.expr)?;
                Ok(match unary_op.op {
                    UnaryOpKind::Plus => value,
                    UnaryOpKind::Minus => -value,
                })
            }
            Expr::Num(num) => Ok(match num.value {
                NumValue::Integer(value) => value as f64,
                NumValue::Real(value) => value,
            }),
            Expr::Var(var) => {
                self.scope
                    .look_up_value(&var.name)
                    .ok_or_else(|| Error::NameNotFound {
                        name: var.name.clone(),
                    })
            }
        }
    }

    fn visit_bin_op(&mut self, bin_op: &'a BinOp) -> Result<f64> {
        let left = self.visit_expr(&bin_op.left)?;
        let right = self.visit_expr(&bin_op.right)?;
        Ok(match bin_op.op {
            BinOpKind::Plus => left + right,
            BinOpKind::Minus => left - right,
            BinOpKind::Mul => left * right,
            BinOpKind::IntegerDiv => (left / right).floor(),
            BinOpKind::FloatDiv => left / right,
        })
    }
}
