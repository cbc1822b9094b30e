//! Error handling for the interpreter pipeline

use crate::utils::Span;
use std::fmt;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// The pipeline stage an error belongs to. Drives the
/// `"<Stage> Error: <message>"` prefix shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Lexer,
    Parser,
    Semantic,
    Name,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Lexer => write!(f, "Lexer"),
            Stage::Parser => write!(f, "Parser"),
            Stage::Semantic => write!(f, "Semantic"),
            Stage::Name => write!(f, "Name"),
        }
    }
}

/// Pipeline error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // ==================== Lexer Errors ====================
    #[error("Unexpected char {ch:?}")]
    UnexpectedChar { ch: char, span: Span },

    // ==================== Parser Errors ====================
    #[error("Unexpected token {got:?}, expected {expected}")]
    UnexpectedToken {
        expected: String,
        got: String,
        span: Span,
    },

    // ==================== Semantic Errors ====================
    #[error("{name} not found in scope")]
    UndeclaredName { name: String, span: Span },

    #[error("Duplicate declaration: {name}")]
    DuplicateDeclaration { name: String, span: Span },

    #[error("Expected {name} to be a type")]
    NotAType { name: String, span: Span },

    #[error("Can't assign type {got} to var '{name}' which has type {expected}")]
    AssignTypeMismatch {
        name: String,
        expected: String,
        got: String,
        span: Span,
    },

    #[error("Can't integer divide types {left} and {right}")]
    IntegerDivOperands {
        left: String,
        right: String,
        span: Span,
    },

    #[error("Expected {name} to be a procedure but it is a {kind}")]
    NotAProcedure {
        name: String,
        kind: String,
        span: Span,
    },

    #[error("Wrong number of params to {name}, expected {expected} got {got}")]
    ArgCountMismatch {
        name: String,
        expected: usize,
        got: usize,
        span: Span,
    },

    #[error("Wrong param type to {proc} param {param}, expected {expected} got {got}")]
    ParamTypeMismatch {
        proc: String,
        param: String,
        expected: String,
        got: String,
        span: Span,
    },

    // ==================== Interpreter Errors ====================
    // Unreachable on semantically valid ASTs, handled defensively.
    #[error("{name} not found in scope")]
    NameNotFound { name: String },

    #[error("Call depth limit of {limit} exceeded")]
    CallDepthExceeded { limit: usize },
}

impl Error {
    /// Get the span associated with this error
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::UnexpectedChar { span, .. } => Some(*span),
            Self::UnexpectedToken { span, .. } => Some(*span),
            Self::UndeclaredName { span, .. } => Some(*span),
            Self::DuplicateDeclaration { span, .. } => Some(*span),
            Self::NotAType { span, .. } => Some(*span),
            Self::AssignTypeMismatch { span, .. } => Some(*span),
            Self::IntegerDivOperands { span, .. } => Some(*span),
            Self::NotAProcedure { span, .. } => Some(*span),
            Self::ArgCountMismatch { span, .. } => Some(*span),
            Self::ParamTypeMismatch { span, .. } => Some(*span),
            Self::NameNotFound { .. } | Self::CallDepthExceeded { .. } => None,
        }
    }

    /// The pipeline stage this error belongs to
    pub fn stage(&self) -> Stage {
        match self {
            Self::UnexpectedChar { .. } => Stage::Lexer,
            Self::UnexpectedToken { .. } => Stage::Parser,
            Self::UndeclaredName { .. }
            | Self::DuplicateDeclaration { .. }
            | Self::NotAType { .. }
            | Self::AssignTypeMismatch { .. }
            | Self::IntegerDivOperands { .. }
            | Self::NotAProcedure { .. }
            | Self::ArgCountMismatch { .. }
            | Self::ParamTypeMismatch { .. } => Stage::Semantic,
            Self::NameNotFound { .. } | Self::CallDepthExceeded { .. } => Stage::Name,
        }
    }

    /// Render as the stage-tagged string the UI displays.
    pub fn display_tagged(&self) -> String {
        format!("{} Error: {}", self.stage(), self)
    }
}
