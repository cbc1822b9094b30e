//! Token definitions for the Pascal subset

use crate::utils::Span;
use serde::Serialize;
use std::fmt;

/// A token produced by the lexer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn eof(span: Span) -> Self {
        Self {
            kind: TokenKind::Eof,
            span,
        }
    }

    /// Terminal tokens end the stream: EOF and the lexer's error token.
    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, TokenKind::Eof | TokenKind::UnexpectedChar(_))
    }
}

/// Token kinds
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value")]
pub enum TokenKind {
    // ============ Reserved words ============
    /// BEGIN
    Begin,
    /// END
    End,
    /// PROGRAM
    Program,
    /// VAR
    Var,
    /// PROCEDURE
    Procedure,
    /// INTEGER
    Integer,
    /// REAL
    Real,

    // ============ Identifiers and literals ============
    /// Identifier (variable, procedure or program name)
    Id(String),
    /// Integer literal
    IntegerConst(i64),
    /// Real literal
    RealConst(f64),

    // ============ Operators ============
    /// :=
    Assign,
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Mul,
    /// DIV
    IntegerDiv,
    /// /
    FloatDiv,

    // ============ Delimiters ============
    /// (
    LParen,
    /// )
    RParen,
    /// :
    Colon,
    /// ,
    Comma,
    /// ;
    Semi,
    /// .
    Dot,

    // ============ Special ============
    /// End of file
    Eof,
    /// Unrecognized character (terminal, carries the offending char)
    UnexpectedChar(char),
}

impl TokenKind {
    /// Try to convert an identifier to a reserved word.
    /// Matching is case-sensitive; `DIV` lexes as the integer
    /// division operator rather than a keyword proper.
    pub fn keyword_from_str(s: &str) -> Option<TokenKind> {
        match s {
            "BEGIN" => Some(TokenKind::Begin),
            "END" => Some(TokenKind::End),
            "PROGRAM" => Some(TokenKind::Program),
            "VAR" => Some(TokenKind::Var),
            "PROCEDURE" => Some(TokenKind::Procedure),
            "INTEGER" => Some(TokenKind::Integer),
            "REAL" => Some(TokenKind::Real),
            "DIV" => Some(TokenKind::IntegerDiv),
            _ => None,
        }
    }

    /// The grammar-level name of this token kind, as shown in the
    /// token panel and in unexpected-token messages.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Begin => "BEGIN",
            TokenKind::End => "END",
            TokenKind::Program => "PROGRAM",
            TokenKind::Var => "VAR",
            TokenKind::Procedure => "PROCEDURE",
            TokenKind::Integer => "INTEGER",
            TokenKind::Real => "REAL",
            TokenKind::Id(_) => "ID",
            TokenKind::IntegerConst(_) => "INTEGER_CONST",
            TokenKind::RealConst(_) => "REAL_CONST",
            TokenKind::Assign => "ASSIGN",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Mul => "MUL",
            TokenKind::IntegerDiv => "INTEGER_DIV",
            TokenKind::FloatDiv => "FLOAT_DIV",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::Colon => "COLON",
            TokenKind::Comma => "COMMA",
            TokenKind::Semi => "SEMI",
            TokenKind::Dot => "DOT",
            TokenKind::Eof => "EOF",
            TokenKind::UnexpectedChar(_) => "UNEXPECTED_CHAR",
        }
    }

    /// Two kinds match when their discriminants match, payloads aside.
    pub fn same_kind(&self, other: &TokenKind) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
