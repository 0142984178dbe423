use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Evaluator},
        value::core::Value,
    },
    util::num::{floor_div_i64, floor_mod_f64, floor_mod_i64, i64_to_f64},
};

impl Evaluator<'_> {
    /// Evaluates an arithmetic operation.
    ///
    /// Two integers stay integers for `+ - * / %`, with overflow reported
    /// rather than wrapped; `/` then divides with flooring. `÷` always
    /// produces a float. Any float operand promotes the other operand to a
    /// float. Two strings concatenate under `+`.
    ///
    /// `^` reaches this function only when at least one operand is not an
    /// integer, and then raises the left operand to the power of the right.
    ///
    /// # Errors
    /// - `DivisionByZero` for a zero divisor under `/`, `÷` or `%`.
    /// - `Overflow` when an integer result does not fit in 64 bits.
    /// - `TypeMismatch` for non-numeric operands.
    ///
    /// # Example
    /// ```
    /// use calci::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Evaluator, value::core::Value},
    /// };
    ///
    /// let floored = Evaluator::eval_arithmetic(BinaryOperator::Div,
    ///                                          Value::Integer(-7),
    ///                                          Value::Integer(2),
    ///                                          1);
    /// assert_eq!(floored.unwrap(), Value::Integer(-4));
    /// ```
    pub fn eval_arithmetic(op: BinaryOperator,
                           left: Value,
                           right: Value,
                           line: usize)
                           -> EvalResult<Value> {
        match (left, right) {
            (Value::Integer(a), Value::Integer(b)) => Self::eval_integer_arithmetic(op, a, b, line),
            (Value::Text(a), Value::Text(b)) if op == BinaryOperator::Add => Ok(Value::Text(a + &b)),
            (left, right) => {
                let (Some(a), Some(b)) = (as_float(&left), as_float(&right)) else {
                    return Err(RuntimeError::TypeMismatch { details: format!("Cannot apply `{op}` to {} and {}.",
                                                                             left.type_name(),
                                                                             right.type_name()),
                                                            line });
                };
                Self::eval_float_arithmetic(op, a, b, line)
            },
        }
    }

    fn eval_integer_arithmetic(op: BinaryOperator, a: i64, b: i64, line: usize) -> EvalResult<Value> {
        use BinaryOperator::{Add, Div, Mod, Mul, RealDiv, Sub};

        let overflow = || RuntimeError::Overflow { op: op.to_string(),
                                                   line };
        if matches!(op, Div | Mod | RealDiv) && b == 0 {
            return Err(RuntimeError::DivisionByZero { line });
        }

        let result = match op {
            Add => a.checked_add(b),
            Sub => a.checked_sub(b),
            Mul => a.checked_mul(b),
            Div => floor_div_i64(a, b),
            Mod => floor_mod_i64(a, b),
            RealDiv => return Ok(Value::Float(i64_to_f64(a) / i64_to_f64(b))),
            _ => return Self::eval_float_arithmetic(op, i64_to_f64(a), i64_to_f64(b), line),
        };
        result.map(Value::Integer).ok_or_else(overflow)
    }

    fn eval_float_arithmetic(op: BinaryOperator, a: f64, b: f64, line: usize) -> EvalResult<Value> {
        use BinaryOperator::{Add, Caret, Div, Mod, Mul, RealDiv, Sub};

        if matches!(op, Div | Mod | RealDiv) && b == 0.0 {
            return Err(RuntimeError::DivisionByZero { line });
        }

        let result = match op {
            Add => a + b,
            Sub => a - b,
            Mul => a * b,
            Div | RealDiv => a / b,
            Mod => floor_mod_f64(a, b),
            Caret => a.powf(b),
            _ => {
                return Err(RuntimeError::TypeMismatch { details: format!("`{op}` is not an arithmetic operator."),
                                                        line });
            },
        };
        Ok(Value::Float(result))
    }
}

/// Reads a numeric operand as a float.
fn as_float(value: &Value) -> Option<f64> {
    match value {
        Value::Integer(n) => Some(i64_to_f64(*n)),
        Value::Float(x) => Some(*x),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arithmetic(op: BinaryOperator, left: Value, right: Value) -> EvalResult<Value> {
        Evaluator::eval_arithmetic(op, left, right, 1)
    }

    #[test]
    fn float_rounding_matches_ieee_doubles() {
        let product = arithmetic(BinaryOperator::Mul, Value::Float(5.5), Value::Float(2.2)).unwrap();
        let difference = arithmetic(BinaryOperator::Sub, product, Value::Float(5.5)).unwrap();
        let remainder = arithmetic(BinaryOperator::Mod, Value::Float(5.5), Value::Float(2.2)).unwrap();
        let total = arithmetic(BinaryOperator::Add, difference, remainder).unwrap();
        assert_eq!(total.to_string(), "7.700000000000001");
    }

    #[test]
    fn integer_results_stay_integral() {
        assert_eq!(arithmetic(BinaryOperator::Mod, Value::Integer(-7), Value::Integer(3)).unwrap(),
                   Value::Integer(2));
        assert_eq!(arithmetic(BinaryOperator::RealDiv, Value::Integer(7), Value::Integer(2)).unwrap(),
                   Value::Float(3.5));
        assert_eq!(arithmetic(BinaryOperator::Div, Value::Integer(7), Value::Float(2.0)).unwrap(),
                   Value::Float(3.5));
    }

    #[test]
    fn overflow_and_zero_divisors_are_errors() {
        assert!(matches!(arithmetic(BinaryOperator::Add, Value::Integer(i64::MAX), Value::Integer(1)),
                         Err(RuntimeError::Overflow { .. })));
        assert!(matches!(arithmetic(BinaryOperator::Div, Value::Integer(1), Value::Integer(0)),
                         Err(RuntimeError::DivisionByZero { line: 1 })));
        assert!(matches!(arithmetic(BinaryOperator::Mod, Value::Float(1.0), Value::Integer(0)),
                         Err(RuntimeError::DivisionByZero { line: 1 })));
    }

    #[test]
    fn strings_only_concatenate() {
        assert_eq!(arithmetic(BinaryOperator::Add, Value::from("ab"), Value::from("cd")).unwrap(),
                   Value::from("abcd"));
        assert!(matches!(arithmetic(BinaryOperator::Mul, Value::from("ab"), Value::Integer(2)),
                         Err(RuntimeError::TypeMismatch { .. })));
    }
}
