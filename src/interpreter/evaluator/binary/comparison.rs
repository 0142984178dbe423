use std::cmp::Ordering;

use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Evaluator},
        value::core::Value,
    },
    util::num::i64_to_f64,
};

impl Evaluator<'_> {
    /// Evaluates a comparison operator, producing a boolean.
    ///
    /// Ordering (`< > <= >=`) is defined for numbers, with integers and
    /// floats mixing freely, and for strings, which compare
    /// lexicographically. Equality (`== !=`) additionally covers booleans and
    /// arrays, which are equal when their elements are pairwise equal.
    /// Comparisons involving `NaN` are false, except `!=`.
    ///
    /// # Errors
    /// `TypeMismatch` when the operands cannot be compared with `op`.
    ///
    /// # Example
    /// ```
    /// use calci::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Evaluator, value::core::Value},
    /// };
    ///
    /// let result = Evaluator::eval_comparison(BinaryOperator::LessEqual,
    ///                                         &Value::Integer(2),
    ///                                         &Value::Float(2.0),
    ///                                         1);
    /// assert_eq!(result.unwrap(), Value::Boolean(true));
    /// ```
    pub fn eval_comparison(op: BinaryOperator,
                           left: &Value,
                           right: &Value,
                           line: usize)
                           -> EvalResult<Value> {
        use BinaryOperator::{Equal, Greater, GreaterEqual, Less, LessEqual, NotEqual};

        let incomparable = || RuntimeError::TypeMismatch { details: format!("Cannot compare {} and {} with `{op}`.",
                                                                            left.type_name(),
                                                                            right.type_name()),
                                                           line };

        let result = match op {
            Equal => equals(left, right).ok_or_else(incomparable)?,
            NotEqual => !equals(left, right).ok_or_else(incomparable)?,
            Less | Greater | LessEqual | GreaterEqual => {
                if !orderable(left, right) {
                    return Err(incomparable());
                }
                match (order(left, right), op) {
                    (None, _) => false,
                    (Some(ordering), Less) => ordering == Ordering::Less,
                    (Some(ordering), Greater) => ordering == Ordering::Greater,
                    (Some(ordering), LessEqual) => ordering != Ordering::Greater,
                    (Some(ordering), _) => ordering != Ordering::Less,
                }
            },
            _ => return Err(incomparable()),
        };
        Ok(Value::Boolean(result))
    }
}

/// Whether `<` and friends are defined between the two kinds.
const fn orderable(left: &Value, right: &Value) -> bool {
    matches!((left, right),
             (Value::Integer(_) | Value::Float(_), Value::Integer(_) | Value::Float(_))
             | (Value::Text(_), Value::Text(_)))
}

/// Orders two orderable values. `None` when a float comparison involves NaN.
fn order(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
        (Value::Integer(a), Value::Float(b)) => i64_to_f64(*a).partial_cmp(b),
        (Value::Float(a), Value::Integer(b)) => a.partial_cmp(&i64_to_f64(*b)),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
        (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Tests two values for equality.
///
/// Returns `None` when equality is not defined between the two kinds. Inside
/// arrays such pairs count as unequal rather than as errors.
fn equals(left: &Value, right: &Value) -> Option<bool> {
    equals_within(left, right, &mut Vec::new())
}

/// [`equals`], given the array pairs already under comparison.
fn equals_within(left: &Value, right: &Value, pairs: &mut Vec<(usize, usize)>) -> Option<bool> {
    match (left, right) {
        (Value::Integer(_) | Value::Float(_), Value::Integer(_) | Value::Float(_))
        | (Value::Text(_), Value::Text(_)) => Some(order(left, right) == Some(Ordering::Equal)),
        (Value::Boolean(a), Value::Boolean(b)) => Some(a == b),
        (Value::Unit, Value::Unit) => Some(true),
        (Value::Function(_), Value::Function(_)) => Some(left == right),
        (Value::Array(a), Value::Array(b)) => {
            Some(a.elements_eq(b, pairs, |x, y, pairs| equals_within(x, y, pairs) == Some(true)))
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::value::array::ArrayRef;

    fn compare(op: BinaryOperator, left: Value, right: Value) -> EvalResult<Value> {
        Evaluator::eval_comparison(op, &left, &right, 1)
    }

    #[test]
    fn numbers_mix_freely() {
        assert_eq!(compare(BinaryOperator::Equal, Value::Integer(1), Value::Float(1.0)).unwrap(),
                   Value::Boolean(true));
        assert_eq!(compare(BinaryOperator::Greater, Value::Float(2.5), Value::Integer(2)).unwrap(),
                   Value::Boolean(true));
        assert_eq!(compare(BinaryOperator::Less, Value::Float(f64::NAN), Value::Integer(2)).unwrap(),
                   Value::Boolean(false));
    }

    #[test]
    fn strings_order_lexicographically() {
        assert_eq!(compare(BinaryOperator::Less, Value::from("apple"), Value::from("banana")).unwrap(),
                   Value::Boolean(true));
    }

    #[test]
    fn arrays_compare_element_wise() {
        let a = Value::from(vec![Value::Integer(1), Value::from("x")]);
        let b = Value::from(vec![Value::Float(1.0), Value::from("x")]);
        let c = Value::from(vec![Value::Integer(1), Value::Boolean(true)]);
        assert_eq!(compare(BinaryOperator::Equal, a.clone(), b).unwrap(), Value::Boolean(true));
        assert_eq!(compare(BinaryOperator::NotEqual, a, c).unwrap(), Value::Boolean(true));
    }

    #[test]
    fn arrays_that_contain_themselves_compare() {
        let a = ArrayRef::from(vec![Value::Integer(1)]);
        a.push_back(Value::Array(a.clone()));
        let b = ArrayRef::from(vec![Value::Integer(1)]);
        b.push_back(Value::Array(b.clone()));
        let c = ArrayRef::from(vec![Value::Integer(2)]);
        c.push_back(Value::Array(c.clone()));

        assert_eq!(compare(BinaryOperator::Equal, Value::Array(a.clone()), Value::Array(b.clone())).unwrap(),
                   Value::Boolean(true));
        assert_eq!(compare(BinaryOperator::Equal, Value::Array(a.clone()), Value::Array(c.clone())).unwrap(),
                   Value::Boolean(false));
        assert_eq!(Value::Array(a.clone()), Value::Array(b.clone()));

        for array in [a, b, c] {
            array.clear();
        }
    }

    #[test]
    fn mismatched_kinds_are_errors() {
        assert!(matches!(compare(BinaryOperator::Equal, Value::Boolean(true), Value::Integer(1)),
                         Err(RuntimeError::TypeMismatch { .. })));
        assert!(matches!(compare(BinaryOperator::Less, Value::Boolean(true), Value::Boolean(false)),
                         Err(RuntimeError::TypeMismatch { .. })));
    }
}
