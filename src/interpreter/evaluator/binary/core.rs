use crate::{
    ast::BinaryOperator,
    interpreter::{
        evaluator::core::{EvalResult, Evaluator},
        value::core::Value,
    },
};

impl Evaluator<'_> {
    /// Evaluates a binary operation between two values.
    ///
    /// Both operands have already been evaluated; `and` and `or` do not
    /// short-circuit. Routing:
    /// - `+ - * / ÷ %` go to `eval_arithmetic`.
    /// - `^` is xor on two integers or two booleans and exponentiation
    ///   otherwise.
    /// - `& | << >>` and `and`/`or` go to `eval_logic`.
    /// - comparisons go to `eval_comparison`.
    ///
    /// # Parameters
    /// - `op`: The operator.
    /// - `left`: Left operand.
    /// - `right`: Right operand.
    /// - `line`: Line number for error reporting.
    ///
    /// # Example
    /// ```
    /// use calci::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Evaluator, value::core::Value},
    /// };
    ///
    /// let result = Evaluator::eval_binary(BinaryOperator::Add,
    ///                                     Value::Integer(3),
    ///                                     Value::Float(0.5),
    ///                                     1);
    /// assert_eq!(result.unwrap(), Value::Float(3.5));
    /// ```
    pub fn eval_binary(op: BinaryOperator,
                       left: Value,
                       right: Value,
                       line: usize)
                       -> EvalResult<Value> {
        use BinaryOperator::{
            Add, And, BitAnd, BitOr, Caret, Div, Equal, Greater, GreaterEqual, Less, LessEqual,
            Mod, Mul, NotEqual, Or, RealDiv, Shl, Shr, Sub,
        };

        match op {
            Add | Sub | Mul | Div | RealDiv | Mod => Self::eval_arithmetic(op, left, right, line),
            Caret => match (&left, &right) {
                (Value::Integer(_), Value::Integer(_)) | (Value::Boolean(_), Value::Boolean(_)) => {
                    Self::eval_logic(op, left, right, line)
                },
                _ => Self::eval_arithmetic(op, left, right, line),
            },
            BitAnd | BitOr | Shl | Shr | And | Or => Self::eval_logic(op, left, right, line),
            Less | Greater | LessEqual | GreaterEqual | Equal | NotEqual => {
                Self::eval_comparison(op, &left, &right, line)
            },
        }
    }
}
