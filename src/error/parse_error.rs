use thiserror::Error;

/// Represents all errors that can occur during lexing or parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// Found a token that does not fit the grammar at this point.
    #[error("Error on line {line}: Expected {expected}, found {found}.")]
    UnexpectedToken {
        /// What the parser was looking for.
        expected: String,
        /// The token encountered.
        found:    String,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// Reached the end of input unexpectedly.
    #[error("Error on line {line}: Unexpected end of input, expected {expected}.")]
    UnexpectedEndOfInput {
        /// What the parser was looking for.
        expected: String,
        /// The last line of the input.
        line:     usize,
    },
    /// The lexer could not match any token.
    #[error("Error on line {line}: Unrecognized character sequence `{text}`.")]
    UnexpectedCharacter {
        /// The offending source text.
        text: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// The left side of `=` is not a variable or an index expression.
    #[error("Error on line {line}: Cannot assign to {target}.")]
    InvalidAssignmentTarget {
        /// Description of the left-hand side.
        target: String,
        /// The source line where the error occurred.
        line:   usize,
    },
    /// A compound assignment such as `+=` was applied to something other
    /// than a variable.
    #[error("Error on line {line}: Compound assignment needs a variable, found {target}.")]
    InvalidCompoundTarget {
        /// Description of the left-hand side.
        target: String,
        /// The source line where the error occurred.
        line:   usize,
    },
    /// `.Name` does not name an array method.
    #[error("Error on line {line}: Unknown array method `{name}`.")]
    UnknownMethod {
        /// The method name as written.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// An array method was given the wrong number of arguments.
    #[error("Error on line {line}: Method `{method}` takes {expected} argument(s), found {found}.")]
    MethodArity {
        /// The method name.
        method:   String,
        /// Number of arguments the method takes.
        expected: usize,
        /// Number of arguments supplied.
        found:    usize,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// A function lists the same parameter twice.
    #[error("Error on line {line}: Parameter `{name}` appears more than once in `{function}`.")]
    DuplicateParameter {
        /// The repeated parameter.
        name:     String,
        /// The function being defined.
        function: String,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// A `for` loop header does not start with a `var` binding.
    #[error("Error on line {line}: A for loop must start with a `var` binding.")]
    InvalidLoopInit {
        /// The source line where the error occurred.
        line: usize,
    },
}

impl ParseError {
    /// The source line where the error occurred.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::UnexpectedToken { line, .. }
            | Self::UnexpectedEndOfInput { line, .. }
            | Self::UnexpectedCharacter { line, .. }
            | Self::InvalidAssignmentTarget { line, .. }
            | Self::InvalidCompoundTarget { line, .. }
            | Self::UnknownMethod { line, .. }
            | Self::MethodArity { line, .. }
            | Self::DuplicateParameter { line, .. }
            | Self::InvalidLoopInit { line } => *line,
        }
    }
}
