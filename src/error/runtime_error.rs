use thiserror::Error;

/// Represents all errors that can occur during evaluation and runtime.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// A name has no binding in any enclosing frame, or its declaration has
    /// not run yet.
    #[error("Error on line {line}: `{name}` is not bound to a value.")]
    UnboundName {
        /// The name that was looked up.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A function was called with the wrong number of arguments.
    #[error("Error on line {line}: Function `{name}` takes {expected} argument(s), found {found}.")]
    Arity {
        /// The name of the function.
        name:     String,
        /// Number of declared parameters.
        expected: usize,
        /// Number of arguments supplied.
        found:    usize,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// A call named something that is not a function.
    #[error("Error on line {line}: `{name}` is not a function.")]
    NotCallable {
        /// The name being called.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// An index was negative or not smaller than the array length.
    #[error("Error on line {line}: Index {index} is out of range for an array of length {len}.")]
    IndexOutOfRange {
        /// The requested index.
        index: i64,
        /// The array length at the time of access.
        len:   usize,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// A pop was attempted on an empty array.
    #[error("Error on line {line}: Cannot {method} from an empty array.")]
    EmptyContainer {
        /// The method that was called.
        method: String,
        /// The source line where the error occurred.
        line:   usize,
    },
    /// A value had an unexpected or incompatible type.
    #[error("Error on line {line}: {details}")]
    TypeMismatch {
        /// Details about the type mismatch.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// Integer division or modulo by zero.
    #[error("Error on line {line}: Division by zero.")]
    DivisionByZero {
        /// The source line where the error occurred.
        line: usize,
    },
    /// An integer operation left the 64-bit range.
    #[error("Error on line {line}: Integer overflow in `{op}`.")]
    Overflow {
        /// The operator that overflowed.
        op:   String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A numeric literal could not be represented.
    #[error("Error on line {line}: Invalid numeric literal `{text}`.")]
    InvalidLiteral {
        /// The literal as written.
        text: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// `char(n)` was given something that is not a valid code point.
    #[error("Error on line {line}: {code} is not a valid character code.")]
    InvalidCharacterCode {
        /// The rejected code.
        code: i64,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Calls nested deeper than the evaluator allows.
    #[error("Error on line {line}: Maximum recursion depth of {depth} exceeded.")]
    RecursionLimit {
        /// The depth limit that was hit.
        depth: usize,
        /// The source line of the call that went over the limit.
        line:  usize,
    },
    /// Writing program output failed.
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl RuntimeError {
    /// The source line where the error occurred, if the error has one.
    #[must_use]
    pub const fn line(&self) -> Option<usize> {
        match self {
            Self::UnboundName { line, .. }
            | Self::Arity { line, .. }
            | Self::NotCallable { line, .. }
            | Self::IndexOutOfRange { line, .. }
            | Self::EmptyContainer { line, .. }
            | Self::TypeMismatch { line, .. }
            | Self::DivisionByZero { line }
            | Self::Overflow { line, .. }
            | Self::InvalidLiteral { line, .. }
            | Self::InvalidCharacterCode { line, .. }
            | Self::RecursionLimit { line, .. } => Some(*line),
            Self::Output(_) => None,
        }
    }
}
