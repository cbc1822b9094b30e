//! Pascal-subset interpreter
//!
//! A small educational interpreter built to be watched: every stage
//! of the pipeline — lexing, parsing, semantic analysis and
//! evaluation — exposes its intermediate result (token stream with
//! byte spans, AST, symbol table, output streams) so a display layer
//! can highlight exactly what the interpreter is doing as code
//! changes.

pub mod frontend;
pub mod interpreter;
mod pipeline;
pub mod utils;

pub use pipeline::{run, RunOutcome};
