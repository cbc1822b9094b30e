//! Abstract syntax tree for the Pascal subset
//!
//! Nodes are built once by the parser and never mutated; children are
//! owned exclusively by their parent. Every node carries the span of
//! the source text it was parsed from, for editor highlighting.

use crate::utils::Span;
use serde::Serialize;

/// A complete program: `PROGRAM ID SEMI block DOT`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    pub name: String,
    pub block: Block,
    pub span: Span,
}

/// Declarations followed by a compound statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub declarations: Vec<Declaration>,
    pub compound: Compound,
    pub span: Span,
}

/// A declaration-section entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Declaration {
    VarDecl(VarDecl),
    Procedure(ProcedureDecl),
}

impl Declaration {
    pub fn span(&self) -> Span {
        match self {
            Declaration::VarDecl(d) => d.span,
            Declaration::Procedure(d) => d.span,
        }
    }
}

/// A single `name: type` variable declaration. A multi-name
/// declaration list flattens into one VarDecl per name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VarDecl {
    pub var: Var,
    pub type_spec: TypeSpec,
    pub span: Span,
}

/// `PROCEDURE ID (params)? SEMI block`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcedureDecl {
    pub name: String,
    pub params: Vec<Param>,
    pub block: Block,
    pub span: Span,
}

/// A formal parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Param {
    pub var: Var,
    pub type_spec: TypeSpec,
    pub span: Span,
}

/// `BEGIN statement_list END`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Compound {
    pub children: Vec<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Statement {
    Compound(Compound),
    Assign(Assign),
    ProcedureCall(ProcedureCall),
    /// Appends a variable's value to an output stream. Never produced
    /// by the parser; only synthesized builtin bodies contain it.
    WriteStream(WriteStream),
    NoOp(NoOp),
}

impl Statement {
    pub fn span(&self) -> Span {
        match self {
            Statement::Compound(s) => s.span,
            Statement::Assign(s) => s.span,
            Statement::ProcedureCall(s) => s.span,
            Statement::WriteStream(s) => s.span,
            Statement::NoOp(s) => s.span,
        }
    }
}

/// `variable := expr`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assign {
    pub target: Var,
    pub value: Expr,
    pub span: Span,
}

/// `ID (LPAREN expr (COMMA expr)* RPAREN)?`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcedureCall {
    pub name: String,
    pub args: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WriteStream {
    pub stream: StreamKind,
    pub var: Var,
    pub span: Span,
}

/// The empty statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoOp {
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Expr {
    BinOp(Box<BinOp>),
    UnaryOp(Box<UnaryOp>),
    Num(Num),
    Var(Var),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::BinOp(e) => e.span,
            Expr::UnaryOp(e) => e.span,
            Expr::Num(e) => e.span,
            Expr::Var(e) => e.span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinOpKind {
    Plus,
    Minus,
    Mul,
    IntegerDiv,
    FloatDiv,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinOp {
    pub left: Expr,
    pub op: BinOpKind,
    /// Span of the operator token itself
    pub op_span: Span,
    pub right: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOpKind {
    Plus,
    Minus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnaryOp {
    pub op: UnaryOpKind,
    pub expr: Expr,
    pub span: Span,
}

/// A numeric literal. Integer vs real is kept distinct here; the
/// distinction is erased at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", content = "value")]
pub enum NumValue {
    Integer(i64),
    Real(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Num {
    pub value: NumValue,
    pub span: Span,
}

/// A variable reference
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Var {
    pub name: String,
    pub span: Span,
}

/// `INTEGER | REAL`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TypeName {
    Integer,
    Real,
}

impl TypeName {
    pub fn name(&self) -> &'static str {
        match self {
            TypeName::Integer => "INTEGER",
            TypeName::Real => "REAL",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeSpec {
    pub name: TypeName,
    pub span: Span,
}
