//! # calci
//!
//! calci is a small scripting language with integers, floats, strings,
//! booleans and shared arrays, first-class functions with lexical closures,
//! `while` and `for` loops, and text output.
//!
//! A program is tokenized, parsed into an AST together with its lexical
//! scopes, and evaluated by a tree-walking evaluator over an arena of frames.

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
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use std::io;

use crate::{error::Error, interpreter::session::Interpreter, interpreter::value::core::Value};

/// Defines the structure of parsed code.
///
/// This module declares the `Expr` enum and related types that represent the
/// syntactic structure of source code as a tree. The AST is built by the parser
/// and traversed by the evaluator.
///
/// # Responsibilities
/// - Defines expression and statement types for all language constructs.
/// - Attaches source lines to AST nodes for error reporting.
/// - Names the operators and array methods the language knows.
pub mod ast;
/// Provides unified error types for parsing and evaluation.
///
/// Every error carries the line it was raised on and renders as
/// `Error on line N: ...`.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (lexer, parser, evaluator).
/// - Wraps both phases in one top-level `Error`.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, the runtime environment,
/// evaluation and value representations, and exposes the persistent
/// interpreter session.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, evaluator, and value
///   types.
/// - Provides entry points for parsing and evaluating user code.
/// - Manages the flow of data and errors between phases.
pub mod interpreter;
/// General numeric helpers.
///
/// Python-compatible floored division and modulo, and the text form of
/// floats.
pub mod util;

pub use interpreter::lexer::tokenize;

/// Runs a complete program, writing its output to stdout.
///
/// The program gets a fresh root environment; nothing survives the call.
///
/// # Returns
/// The value of the program's last statement, `Value::Unit` if it yields
/// nothing.
///
/// # Errors
/// Returns an error if parsing fails, or at the first runtime error.
///
/// # Examples
/// ```
/// use calci::{execute, interpreter::value::core::Value};
///
/// // The last statement is the program's value.
/// let result = execute("var x = 2 + 2; x * 10").unwrap();
/// assert_eq!(result, Value::Integer(40));
///
/// // `y` is never declared.
/// assert!(execute("var x = y + 1").is_err());
/// ```
pub fn execute(source: &str) -> Result<Value, Error> {
    Interpreter::new(io::stdout().lock()).run(source)
}
