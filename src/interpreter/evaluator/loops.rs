use crate::{
    ast::{Expr, ForLoop, Statements},
    interpreter::{
        environment::EnvId,
        evaluator::core::{EvalResult, Evaluator},
        parser::scope::ScopeId,
        value::core::Value,
    },
};

impl Evaluator<'_> {
    /// Runs a `while` loop.
    ///
    /// The condition is evaluated in `frame` before every pass. The body runs
    /// in a single frame created on loop entry, so bindings made by one pass
    /// are visible to the next and vanish once the loop ends.
    ///
    /// # Errors
    /// `TypeMismatch` if the condition is not a boolean; any error from the
    /// body.
    pub fn eval_while(&mut self,
                      condition: &Expr,
                      body: &Statements,
                      scope: ScopeId,
                      line: usize,
                      frame: EnvId)
                      -> EvalResult<Value> {
        let inner = self.env.child(frame);
        self.env.seed(inner, self.scopes.names(scope));

        let result = self.run_while(condition, body, line, frame, inner);
        self.env.release(inner);
        result
    }

    fn run_while(&mut self,
                 condition: &Expr,
                 body: &Statements,
                 line: usize,
                 outer: EnvId,
                 inner: EnvId)
                 -> EvalResult<Value> {
        loop {
            let test = self.eval(condition, outer)?;
            if !Self::expect_boolean(test, "while condition", line)? {
                return Ok(Value::Unit);
            }
            self.evaluate(body, inner)?;
        }
    }

    /// Runs a `for` loop.
    ///
    /// The loop variable, the condition, the step and the body all live in
    /// one frame nested in `frame`.
    ///
    /// # Errors
    /// `TypeMismatch` if the condition is not a boolean; any error from the
    /// header or the body.
    pub fn eval_for(&mut self, context: &ForLoop, frame: EnvId) -> EvalResult<Value> {
        let inner = self.env.child(frame);
        self.env.seed(inner, self.scopes.names(context.scope));

        let result = self.run_for(context, inner);
        self.env.release(inner);
        result
    }

    fn run_for(&mut self, context: &ForLoop, frame: EnvId) -> EvalResult<Value> {
        self.eval(&context.init, frame)?;
        loop {
            let test = self.eval(&context.condition, frame)?;
            if !Self::expect_boolean(test, "for condition", context.condition.line_number())? {
                return Ok(Value::Unit);
            }
            self.evaluate(&context.body, frame)?;
            self.eval(&context.step, frame)?;
        }
    }
}
