//! Language front-end: tokens, lexer, parser, AST and semantic
//! analysis.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod semantic;
pub mod token;
