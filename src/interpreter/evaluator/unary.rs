use crate::{
    ast::UnaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{EvalResult, Evaluator},
            utils::mismatch,
        },
        value::core::Value,
    },
};

impl Evaluator<'_> {
    /// Evaluates a unary operator on an evaluated operand.
    ///
    /// - `-` negates an integer or a float.
    /// - `not` inverts a boolean.
    /// - `char` turns an integer code point into a one-character string.
    /// - `ascii` turns a one-character string into its integer code point.
    ///
    /// # Errors
    /// - `Overflow` when negating the smallest integer.
    /// - `InvalidCharacterCode` when `char` gets a code that is not a Unicode
    ///   scalar value.
    /// - `TypeMismatch` for any other operand.
    ///
    /// # Example
    /// ```
    /// use calci::{
    ///     ast::UnaryOperator,
    ///     interpreter::{evaluator::core::Evaluator, value::core::Value},
    /// };
    ///
    /// let b = Evaluator::eval_unary(UnaryOperator::Char, Value::Integer(66), 1).unwrap();
    /// assert_eq!(b, Value::from("B"));
    /// ```
    pub fn eval_unary(op: UnaryOperator, operand: Value, line: usize) -> EvalResult<Value> {
        match (op, operand) {
            (UnaryOperator::Negate, Value::Integer(n)) => {
                n.checked_neg()
                 .map(Value::Integer)
                 .ok_or_else(|| RuntimeError::Overflow { op: op.to_string(),
                                                         line })
            },
            (UnaryOperator::Negate, Value::Float(x)) => Ok(Value::Float(-x)),
            (UnaryOperator::Not, Value::Boolean(b)) => Ok(Value::Boolean(!b)),
            (UnaryOperator::Char, Value::Integer(code)) => {
                u32::try_from(code).ok()
                                   .and_then(char::from_u32)
                                   .map(|c| Value::Text(c.to_string()))
                                   .ok_or(RuntimeError::InvalidCharacterCode { code, line })
            },
            (UnaryOperator::Ascii, Value::Text(text)) => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Value::Integer(i64::from(u32::from(c)))),
                    _ => Err(RuntimeError::TypeMismatch { details: format!("ascii needs a single character, found \"{text}\"."),
                                                          line }),
                }
            },
            (UnaryOperator::Negate, other) => Err(mismatch("The operand of `-`", "a number", &other, line)),
            (UnaryOperator::Not, other) => Err(mismatch("The operand of `not`", "a boolean", &other, line)),
            (UnaryOperator::Char, other) => Err(mismatch("The operand of `char`", "an integer", &other, line)),
            (UnaryOperator::Ascii, other) => Err(mismatch("The operand of `ascii`", "a string", &other, line)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_and_ascii_round_trip() {
        let code = Evaluator::eval_unary(UnaryOperator::Ascii, Value::from("x"), 1).unwrap();
        assert_eq!(code, Value::Integer(120));
        assert_eq!(Evaluator::eval_unary(UnaryOperator::Char, code, 1).unwrap(), Value::from("x"));
    }

    #[test]
    fn invalid_codes_and_strings_are_rejected() {
        assert!(matches!(Evaluator::eval_unary(UnaryOperator::Char, Value::Integer(-1), 3),
                         Err(RuntimeError::InvalidCharacterCode { code: -1, line: 3 })));
        assert!(matches!(Evaluator::eval_unary(UnaryOperator::Ascii, Value::from("ab"), 3),
                         Err(RuntimeError::TypeMismatch { line: 3, .. })));
    }

    #[test]
    fn negation_checks_overflow() {
        assert_eq!(Evaluator::eval_unary(UnaryOperator::Negate, Value::Float(1.5), 1).unwrap(),
                   Value::Float(-1.5));
        assert!(matches!(Evaluator::eval_unary(UnaryOperator::Negate, Value::Integer(i64::MIN), 1),
                         Err(RuntimeError::Overflow { .. })));
    }
}
