//! Stage driver
//!
//! Runs Lexer -> Parser -> Semantic Analyzer -> Interpreter over a
//! source string, stopping at the first failure. Everything a display
//! layer needs — the token stream, the AST, the symbol table and the
//! output or stage-tagged error text — comes back in one bundle, and
//! nothing is shared between runs.

use crate::frontend::ast::Program;
use crate::frontend::lexer::Lexer;
use crate::frontend::parser::Parser;
use crate::frontend::semantic::{SemanticAnalyzer, Symbol};
use crate::frontend::token::Token;
use crate::interpreter::Interpreter;
use crate::utils::Span;
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;

/// Everything one pipeline run produces
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    /// The full token stream, including a trailing UNEXPECTED_CHAR
    /// token when lexing failed partway
    pub tokens: Vec<Token>,
    /// The AST, when parsing succeeded
    pub ast: Option<Program>,
    /// Global-scope symbols, when semantic analysis succeeded
    pub symbols: Option<BTreeMap<String, Symbol>>,
    /// Interpreter STDOUT, or a `"<Stage> Error: <message>"` string
    pub output: String,
    /// Interpreter STDERR
    pub stderr: String,
    /// Span of the offending token or node when a stage failed, for
    /// editor highlighting
    pub error_span: Option<Span>,
}

/// Run the whole pipeline over a source string
pub fn run(source: &str) -> RunOutcome {
    // The panel stream is collected by its own lexer; the parser
    // pulls from a fresh one.
    let tokens = Lexer::new(source).tokenize();
    debug!("lexed {} tokens", tokens.len());

    let program = match Parser::new(Lexer::new(source)).parse() {
        Ok(program) => program,
        Err(err) => {
            debug!("parse failed: {err}");
            return RunOutcome {
                tokens,
                ast: None,
                symbols: None,
                output: err.display_tagged(),
                stderr: String::new(),
                error_span: err.span(),
            };
        }
    };

    let mut analyzer = SemanticAnalyzer::new();
    if let Err(err) = analyzer.check(&program) {
        debug!("semantic analysis failed: {err}");
        return RunOutcome {
            tokens,
            ast: Some(program),
            symbols: None,
            output: err.display_tagged(),
            stderr: String::new(),
            error_span: err.span(),
        };
    }
    let symbols = analyzer.global_symbols();

    let streams = Interpreter::new(&program).interpret();
    debug!("interpreted: {} bytes of stdout", streams.stdout.len());
    RunOutcome {
        tokens,
        ast: Some(program),
        symbols: Some(symbols),
        output: streams.stdout,
        stderr: streams.stderr,
        error_span: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::token::TokenKind;

    #[test]
    fn test_successful_run() {
        let outcome = run("PROGRAM p; VAR x: INTEGER; BEGIN x := 10 DIV 3; write(x) END.");
        assert_eq!(outcome.output, "3");
        assert!(outcome.ast.is_some());
        assert!(outcome.symbols.unwrap().contains_key("x"));
        assert_eq!(outcome.error_span, None);
    }

    #[test]
    fn test_lexer_stage_tag() {
        let outcome = run("PROGRAM p; BEGIN x := # END.");
        assert_eq!(outcome.output, "Lexer Error: Unexpected char '#'");
        assert!(outcome.ast.is_none());
        // Tokens before the error are preserved for display
        assert!(matches!(
            outcome.tokens.last().unwrap().kind,
            TokenKind::UnexpectedChar('#')
        ));
        assert!(outcome.tokens.len() > 1);
        let span = outcome.error_span.unwrap();
        assert_eq!(span, Span::new(22, 23));
        assert_eq!(span.len(), 1);
    }

    #[test]
    fn test_parser_stage_tag() {
        let outcome = run("PROGRAM p BEGIN END.");
        assert!(
            outcome.output.starts_with("Parser Error: "),
            "got: {}",
            outcome.output
        );
        assert!(outcome.ast.is_none());
    }

    #[test]
    fn test_semantic_stage_tag() {
        let outcome = run("PROGRAM p; BEGIN x := 1 END.");
        assert_eq!(outcome.output, "Semantic Error: x not found in scope");
        assert!(outcome.ast.is_some());
        assert!(outcome.symbols.is_none());
        // Highlights the undeclared `x` itself
        assert_eq!(outcome.error_span, Some(Span::new(17, 18)));
    }
}
