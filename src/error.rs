use thiserror::Error;

/// Parsing errors.
///
/// Defines all error types that can occur during lexing and parsing of source
/// code: unrecognized characters, unexpected tokens, invalid assignment
/// targets and malformed method calls.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation, such as
/// unbound names, type mismatches, out-of-range indices and division by zero.
pub mod runtime_error;

pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;

/// Any error that stops a program.
///
/// Parse errors stop a program before any of it runs. Runtime errors stop it
/// at the failing statement; output written before that point is kept.
#[derive(Debug, Error)]
pub enum Error {
    /// The program could not be tokenized or parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The program failed while running.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl Error {
    /// Line number the error was reported on, if it has one.
    #[must_use]
    pub const fn line(&self) -> Option<usize> {
        match self {
            Self::Parse(e) => Some(e.line()),
            Self::Runtime(e) => e.line(),
        }
    }
}
