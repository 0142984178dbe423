use crate::{
    ast::{ArrayMethod, Expr},
    error::RuntimeError,
    interpreter::{
        environment::EnvId,
        evaluator::core::{EvalResult, Evaluator},
        value::core::Value,
    },
};

impl Evaluator<'_> {
    /// Builds a new array from its element expressions, left to right.
    pub fn eval_array_literal(&mut self, elements: &[Expr], frame: EnvId) -> EvalResult<Value> {
        let values = elements.iter()
                             .map(|element| self.eval(element, frame))
                             .collect::<EvalResult<Vec<_>>>()?;
        Ok(Value::from(values))
    }

    /// Reads `array[index]`.
    ///
    /// # Errors
    /// - `TypeMismatch` if the target is not an array or the index is not an
    ///   integer.
    /// - `IndexOutOfRange` if the index is negative or past the end.
    pub fn eval_index(&mut self,
                      array: &Expr,
                      index: &Expr,
                      line: usize,
                      frame: EnvId)
                      -> EvalResult<Value> {
        let array = self.eval(array, frame)?;
        let array = Self::expect_array(array, "The indexed value", line)?;
        let index = self.eval(index, frame)?;
        let index = Self::expect_integer(&index, "An index", line)?;
        array.get(index, line)
    }

    /// Writes `array[index] = value`.
    ///
    /// The array, the index and the value are evaluated in that order. The
    /// write is visible through every alias of the array.
    pub fn eval_index_assign(&mut self,
                             array: &Expr,
                             index: &Expr,
                             value: &Expr,
                             line: usize,
                             frame: EnvId)
                             -> EvalResult<Value> {
        let array = self.eval(array, frame)?;
        let array = Self::expect_array(array, "The indexed value", line)?;
        let index = self.eval(index, frame)?;
        let index = Self::expect_integer(&index, "An index", line)?;
        let value = self.eval(value, frame)?;
        array.set(index, value, line)?;
        Ok(Value::Unit)
    }

    /// Calls an array method.
    ///
    /// The argument count was checked by the parser, so a mismatch here is a
    /// malformed tree and reported as a type error.
    ///
    /// # Returns
    /// The removed element for pops and `Remove`, the element count for
    /// `Length`, and `Value::Unit` otherwise.
    pub fn eval_method_call(&mut self,
                            array: &Expr,
                            method: ArrayMethod,
                            arguments: &[Expr],
                            line: usize,
                            frame: EnvId)
                            -> EvalResult<Value> {
        let target = self.eval(array, frame)?;
        let target = Self::expect_array(target, &format!("The receiver of `{method}`"), line)?;
        let mut args = arguments.iter()
                                .map(|argument| self.eval(argument, frame))
                                .collect::<EvalResult<Vec<_>>>()?
                                .into_iter();

        let mut next_arg = || {
            args.next()
                .ok_or_else(|| RuntimeError::TypeMismatch { details: format!("`{method}` is missing an argument."),
                                                            line })
        };

        match method {
            ArrayMethod::PushFront => {
                target.push_front(next_arg()?);
                Ok(Value::Unit)
            },
            ArrayMethod::PushBack => {
                target.push_back(next_arg()?);
                Ok(Value::Unit)
            },
            ArrayMethod::PopFront => target.pop_front(line),
            ArrayMethod::PopBack => target.pop_back(line),
            ArrayMethod::Insert => {
                let index = Self::expect_integer(&next_arg()?, "An insert position", line)?;
                target.insert(index, next_arg()?, line)?;
                Ok(Value::Unit)
            },
            ArrayMethod::Remove => {
                let index = Self::expect_integer(&next_arg()?, "A remove position", line)?;
                target.remove(index, line)
            },
            ArrayMethod::Clear => {
                target.clear();
                Ok(Value::Unit)
            },
            ArrayMethod::Length => {
                i64::try_from(target.len()).map(Value::Integer)
                                           .map_err(|_| RuntimeError::Overflow { op: method.to_string(),
                                                                                 line })
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        error::RuntimeError,
        interpreter::{
            environment::Environment, evaluator::core::Evaluator, lexer::tokenize, parser::parse,
            value::core::Value,
        },
    };

    fn run(source: &str) -> (Result<Value, RuntimeError>, String) {
        let program = parse(&tokenize(source).unwrap()).unwrap();
        let mut env = Environment::new();
        let root = env.root();
        env.seed(root, program.scopes.names(program.root));

        let mut out = Vec::new();
        let result = Evaluator::new(&program.scopes, &mut env, &mut out).evaluate(&program.statements, root);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn aliases_share_writes() {
        let (result, out) = run("var a = [1, 2, 3]\nvar b = a\nb[0] = 9\na.PushBack(4)\ndisplayl a\nb.Length");
        assert_eq!(result.unwrap(), Value::Integer(4));
        assert_eq!(out, "[9, 2, 3, 4]\n");
    }

    #[test]
    fn methods_return_removed_elements() {
        let (result, out) =
            run("var a = [1, 2, 3]\na.Insert(0, 0)\ndisplay a.PopBack\ndisplay a.Remove(1)\ndisplayl a");
        assert!(result.is_ok());
        assert_eq!(out, "31[0, 2]\n");
    }

    #[test]
    fn bad_access_is_reported() {
        assert!(matches!(run("var a = []\na.PopFront").0,
                         Err(RuntimeError::EmptyContainer { line: 2, .. })));
        assert!(matches!(run("[1, 2][2]").0,
                         Err(RuntimeError::IndexOutOfRange { index: 2, len: 2, .. })));
        assert!(matches!(run("[1][0.0]").0, Err(RuntimeError::TypeMismatch { .. })));
        assert!(matches!(run("var x = 1\nx[0]").0, Err(RuntimeError::TypeMismatch { line: 2, .. })));
    }
}
