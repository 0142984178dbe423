use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Evaluator},
        value::core::Value,
    },
};

impl Evaluator<'_> {
    /// Evaluates bitwise, shift and logical operators.
    ///
    /// `&`, `|` and `^` work bit by bit on two integers and as logical
    /// and/or/xor on two booleans. `<<` and `>>` shift an integer by a
    /// non-negative integer amount; `>>` rounds toward negative infinity.
    /// `and` and `or` take two booleans.
    ///
    /// # Errors
    /// - `Overflow` when a left shift loses bits.
    /// - `TypeMismatch` for any other operand kinds, or a negative shift.
    ///
    /// # Example
    /// ```
    /// use calci::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Evaluator, value::core::Value},
    /// };
    ///
    /// let xor = Evaluator::eval_logic(BinaryOperator::Caret, Value::Integer(6), Value::Integer(3), 1);
    /// assert_eq!(xor.unwrap(), Value::Integer(5));
    /// ```
    pub fn eval_logic(op: BinaryOperator, left: Value, right: Value, line: usize) -> EvalResult<Value> {
        use BinaryOperator::{And, BitAnd, BitOr, Caret, Or, Shl, Shr};

        match (op, &left, &right) {
            (BitAnd, Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a & b)),
            (BitOr, Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a | b)),
            (Caret, Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a ^ b)),
            (BitAnd | And, Value::Boolean(a), Value::Boolean(b)) => Ok(Value::Boolean(*a && *b)),
            (BitOr | Or, Value::Boolean(a), Value::Boolean(b)) => Ok(Value::Boolean(*a || *b)),
            (Caret, Value::Boolean(a), Value::Boolean(b)) => Ok(Value::Boolean(a != b)),
            (Shl | Shr, Value::Integer(a), Value::Integer(b)) => Self::eval_shift(op, *a, *b, line),
            _ => Err(RuntimeError::TypeMismatch { details: format!("Cannot apply `{op}` to {} and {}.",
                                                                   left.type_name(),
                                                                   right.type_name()),
                                                  line }),
        }
    }

    fn eval_shift(op: BinaryOperator, value: i64, amount: i64, line: usize) -> EvalResult<Value> {
        let Ok(amount) = u32::try_from(amount) else {
            return Err(RuntimeError::TypeMismatch { details: format!("Shift amount must not be negative, found {amount}."),
                                                    line });
        };

        if op == BinaryOperator::Shr {
            return Ok(Value::Integer(value >> amount.min(63)));
        }

        if value == 0 {
            return Ok(Value::Integer(0));
        }
        value.checked_shl(amount)
             .filter(|shifted| shifted >> amount == value)
             .map(Value::Integer)
             .ok_or_else(|| RuntimeError::Overflow { op: op.to_string(),
                                                     line })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logic(op: BinaryOperator, left: Value, right: Value) -> EvalResult<Value> {
        Evaluator::eval_logic(op, left, right, 1)
    }

    #[test]
    fn bitwise_on_integers() {
        assert_eq!(logic(BinaryOperator::BitAnd, Value::Integer(12), Value::Integer(10)).unwrap(),
                   Value::Integer(8));
        assert_eq!(logic(BinaryOperator::BitOr, Value::Integer(12), Value::Integer(10)).unwrap(),
                   Value::Integer(14));
    }

    #[test]
    fn logical_on_booleans() {
        assert_eq!(logic(BinaryOperator::And, Value::Boolean(true), Value::Boolean(false)).unwrap(),
                   Value::Boolean(false));
        assert_eq!(logic(BinaryOperator::BitOr, Value::Boolean(false), Value::Boolean(true)).unwrap(),
                   Value::Boolean(true));
        assert!(matches!(logic(BinaryOperator::Or, Value::Integer(1), Value::Boolean(true)),
                         Err(RuntimeError::TypeMismatch { .. })));
    }

    #[test]
    fn shifts() {
        assert_eq!(logic(BinaryOperator::Shl, Value::Integer(3), Value::Integer(4)).unwrap(),
                   Value::Integer(48));
        assert_eq!(logic(BinaryOperator::Shr, Value::Integer(-9), Value::Integer(1)).unwrap(),
                   Value::Integer(-5));
        assert_eq!(logic(BinaryOperator::Shr, Value::Integer(5), Value::Integer(100)).unwrap(),
                   Value::Integer(0));
        assert!(matches!(logic(BinaryOperator::Shl, Value::Integer(1), Value::Integer(64)),
                         Err(RuntimeError::Overflow { .. })));
        assert!(matches!(logic(BinaryOperator::Shl, Value::Integer(1), Value::Integer(-1)),
                         Err(RuntimeError::TypeMismatch { .. })));
    }
}
