//! # bpl
//!
//! bpl is a tree-walking interpreter for BPL+, a small BASIC-inspired
//! scripting language with significant newlines, `end`-terminated blocks,
//! shared-reference arrays and maps, a module system, and numbered file
//! handles.
//!
//! A source file is lexed into a line/column-tagged token stream, parsed by
//! recursive descent into a statement list, and executed directly over that
//! tree. Runtime errors render with the offending source line, a caret under
//! the failing column, and the call stack.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

use std::path::Path;

use crate::interpreter::{
    evaluator::core::Interpreter,
    lexer::{normalize_newlines, tokenize},
    parser::core::parse,
};

/// Defines the structure of parsed code.
///
/// This module declares the `Expr` and `Stmt` enums and related types that
/// represent the syntactic structure of source code as a tree. The AST is
/// built by the parser and traversed by the evaluator.
///
/// # Responsibilities
/// - Defines expression and statement types for all language constructs.
/// - Attaches source spans to nodes and tokens for error reporting.
/// - Keeps operator kinds as dedicated enums shared by parser and evaluator.
pub mod ast;
/// Provides unified error types for parsing and evaluation.
///
/// This module defines all errors that can be raised while lexing, parsing,
/// or executing code, and the fully rendered diagnostic form shown to users.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (lexer, parser, evaluator).
/// - Attaches spans and detailed messages for context.
/// - Renders runtime diagnostics with source line, caret, and call stack.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, evaluation, value
/// representations, error handling, and all supporting infrastructure to
/// provide a complete runtime for BPL+ programs. It exposes the public API
/// for interpreting and executing source text.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, evaluator, and values.
/// - Provides entry points for parsing and executing user code.
/// - Manages the flow of data and errors between phases.
pub mod interpreter;

/// Parses and executes a source text under the given diagnostic filename.
///
/// This is the whole pipeline in one call: newline normalization, lexing,
/// parsing, and execution in a fresh interpreter writing to stdout. The
/// filename only labels diagnostics and anchors relative imports; nothing is
/// read from disk here.
///
/// # Errors
/// Returns an error if parsing fails or a runtime error aborts execution.
///
/// # Examples
/// ```
/// use bpl::run_source;
///
/// // A well-formed program runs to completion.
/// let res = run_source("demo.bpl", "x = 2 + 3\nprint x\n");
/// assert!(res.is_ok());
///
/// // An undefined variable is a runtime error.
/// let res = run_source("demo.bpl", "print y\n");
/// assert!(res.is_err());
/// ```
pub fn run_source(filename: &str, source: &str) -> Result<(), Box<dyn std::error::Error>> {
    let source = normalize_newlines(source);

    let tokens = tokenize(&source)?;
    let program = parse(&tokens)?;

    let mut interp = Interpreter::with_source(filename, &source);
    interp.run(&program)?;
    Ok(())
}

/// Reads and executes a script file.
///
/// Diagnostics are reported against the file's base name, matching what the
/// command-line runner shows.
///
/// # Errors
/// Returns an error if the file cannot be read, parsing fails, or a runtime
/// error aborts execution.
pub fn run_file(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(path)?;
    let filename = path.file_name()
                       .map_or_else(|| path.display().to_string(), |name| {
                           name.to_string_lossy().into_owned()
                       });
    run_source(&filename, &source)
}
