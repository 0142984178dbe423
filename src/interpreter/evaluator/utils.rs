use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Evaluator},
        value::{array::ArrayRef, core::Value},
    },
};

/// Builds a `TypeMismatch` naming what `role` required and what it got.
pub(in crate::interpreter::evaluator) fn mismatch(role: &str,
                                                  expected: &str,
                                                  found: &Value,
                                                  line: usize)
                                                  -> RuntimeError {
    RuntimeError::TypeMismatch { details: format!("{role} must be {expected}, found {}.",
                                                  found.type_name()),
                                 line }
}

impl Evaluator<'_> {
    /// Unwraps a boolean operand.
    ///
    /// # Errors
    /// `TypeMismatch` naming `role` if `value` is not a boolean.
    pub(in crate::interpreter::evaluator) fn expect_boolean(value: Value,
                                                            role: &str,
                                                            line: usize)
                                                            -> EvalResult<bool> {
        match value {
            Value::Boolean(b) => Ok(b),
            other => Err(mismatch(role, "a boolean", &other, line)),
        }
    }

    /// Unwraps an integer operand, such as an index.
    ///
    /// # Errors
    /// `TypeMismatch` naming `role` if `value` is not an integer.
    pub(in crate::interpreter::evaluator) fn expect_integer(value: &Value,
                                                            role: &str,
                                                            line: usize)
                                                            -> EvalResult<i64> {
        match value {
            Value::Integer(n) => Ok(*n),
            other => Err(mismatch(role, "an integer", other, line)),
        }
    }

    /// Unwraps an array operand.
    ///
    /// # Errors
    /// `TypeMismatch` naming `role` if `value` is not an array.
    pub(in crate::interpreter::evaluator) fn expect_array(value: Value,
                                                          role: &str,
                                                          line: usize)
                                                          -> EvalResult<ArrayRef> {
        match value {
            Value::Array(array) => Ok(array),
            other => Err(mismatch(role, "an array", &other, line)),
        }
    }
}
