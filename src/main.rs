//! Pascal-subset interpreter CLI
//!
//! Drives the pipeline over a source file and prints either the
//! program output or a stage-tagged error. The panel dumps (tokens,
//! AST, symbols) emit the same JSON a display layer would consume.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use pascalet::frontend::lexer::Lexer;
use pascalet::frontend::parser::{self, Parser as PascalParser};
use pascalet::frontend::semantic::SemanticAnalyzer;

/// Pascal-subset interpreter
#[derive(Parser, Debug)]
#[command(name = "pascalet")]
#[command(version = "0.1.0")]
#[command(about = "Pascal-subset interpreter with inspectable pipeline stages")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Source file to run
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a source file and print its output
    Run {
        /// Source file
        input: PathBuf,
    },
    /// Check a source file for syntax and semantic errors
    Check {
        /// Source file
        input: PathBuf,
    },
    /// Print a source file's token stream as JSON
    Tokens {
        /// Source file
        input: PathBuf,
    },
    /// Print a source file's AST as JSON
    Ast {
        /// Source file
        input: PathBuf,
    },
    /// Print a source file's global symbol table as JSON
    Symbols {
        /// Source file
        input: PathBuf,
    },
    /// Print the grammar
    Grammar,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Run { input }) => run_file(&input),
        Some(Commands::Check { input }) => check_file(&input),
        Some(Commands::Tokens { input }) => {
            let source = read_source(&input)?;
            let tokens = Lexer::new(&source).tokenize();
            println!("{}", serde_json::to_string_pretty(&tokens)?);
            Ok(())
        }
        Some(Commands::Ast { input }) => {
            let source = read_source(&input)?;
            let program = parse_or_exit(&source);
            println!("{}", serde_json::to_string_pretty(&program)?);
            Ok(())
        }
        Some(Commands::Symbols { input }) => {
            let source = read_source(&input)?;
            let program = parse_or_exit(&source);
            let mut analyzer = SemanticAnalyzer::new();
            if let Err(err) = analyzer.check(&program) {
                eprintln!("{}", err.display_tagged());
                process::exit(1);
            }
            println!(
                "{}",
                serde_json::to_string_pretty(&analyzer.global_symbols())?
            );
            Ok(())
        }
        Some(Commands::Grammar) => {
            for production in parser::GRAMMAR {
                println!("{production}");
            }
            Ok(())
        }
        None => match cli.input {
            Some(input) => run_file(&input),
            None => {
                eprintln!("Error: No input file specified");
                eprintln!("Usage: pascalet <FILE> or pascalet run <FILE>");
                process::exit(1);
            }
        },
    }
}

fn read_source(input: &Path) -> Result<String> {
    fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))
}

fn parse_or_exit(source: &str) -> pascalet::frontend::ast::Program {
    match PascalParser::new(Lexer::new(source)).parse() {
        Ok(program) => program,
        Err(err) => {
            eprintln!("{}", err.display_tagged());
            process::exit(1);
        }
    }
}

fn run_file(input: &Path) -> Result<()> {
    let source = read_source(input)?;
    let outcome = pascalet::run(&source);
    // A missing AST or symbol table means a stage failed and the
    // output text carries its tagged error.
    let failed = outcome.ast.is_none() || outcome.symbols.is_none();
    if failed {
        eprintln!("{}", outcome.output);
        process::exit(1);
    }
    if !outcome.output.is_empty() {
        println!("{}", outcome.output);
    }
    if !outcome.stderr.is_empty() {
        eprintln!("{}", outcome.stderr);
    }
    Ok(())
}

fn check_file(input: &Path) -> Result<()> {
    let source = read_source(input)?;
    let program = parse_or_exit(&source);

    let mut analyzer = SemanticAnalyzer::new();
    if let Err(err) = analyzer.check(&program) {
        eprintln!("{}", err.display_tagged());
        process::exit(1);
    }

    println!("No errors found");
    Ok(())
}
