use std::rc::Rc;

use crate::{
    ast::{Expr, FunctionDef},
    error::RuntimeError,
    interpreter::{
        environment::EnvId,
        evaluator::core::{EvalResult, Evaluator, MAX_CALL_DEPTH},
        value::core::{Closure, Value},
    },
};

impl Evaluator<'_> {
    /// Binds a function definition to its name in `frame`.
    ///
    /// The closure keeps `frame` alive so that free names in the body resolve
    /// against the definition site for as long as the function exists.
    pub fn eval_function_def(&mut self, def: &Rc<FunctionDef>, frame: EnvId) -> Value {
        self.env.capture(frame);
        let closure = Closure { def: Rc::clone(def),
                                env: frame };
        self.env.define(frame, &def.name, Value::Function(Rc::new(closure)));
        Value::Unit
    }

    /// Evaluates a call.
    ///
    /// Arguments are evaluated left to right in the caller's frame. The body
    /// then runs in a new frame nested in the closure's frame, with the
    /// parameters bound and the rest of the body's declarations seeded.
    ///
    /// # Parameters
    /// - `name`: The called name, looked up from `frame`.
    /// - `arguments`: Argument expressions.
    /// - `line`: Line number of the call.
    /// - `frame`: The caller's frame.
    ///
    /// # Returns
    /// The value of the last statement in the body.
    ///
    /// # Errors
    /// - `UnboundName` if `name` has no value.
    /// - `NotCallable` if the value is not a function.
    /// - `Arity` if the argument count differs from the parameter count.
    /// - `RecursionLimit` if [`MAX_CALL_DEPTH`] calls are already in
    ///   progress.
    pub fn eval_function_call(&mut self,
                              name: &str,
                              arguments: &[Expr],
                              line: usize,
                              frame: EnvId)
                              -> EvalResult<Value> {
        let Value::Function(closure) = self.env.get(frame, name, line)? else {
            return Err(RuntimeError::NotCallable { name: name.to_string(),
                                                   line });
        };

        let def = &closure.def;
        if arguments.len() != def.params.len() {
            return Err(RuntimeError::Arity { name: name.to_string(),
                                             expected: def.params.len(),
                                             found: arguments.len(),
                                             line });
        }

        let values = arguments.iter()
                              .map(|argument| self.eval(argument, frame))
                              .collect::<EvalResult<Vec<_>>>()?;

        if self.depth >= MAX_CALL_DEPTH {
            return Err(RuntimeError::RecursionLimit { depth: MAX_CALL_DEPTH,
                                                      line });
        }

        let call = self.env.child(closure.env);
        tracing::trace!(function = %def.name,
                        arity = values.len(),
                        frame = %call,
                        recursive = closure.is_recursive(),
                        depth = self.depth,
                        "calling function");

        self.env.seed(call, self.scopes.names(def.scope));
        for (param, value) in def.params.iter().zip(values) {
            self.env.define(call, param, value);
        }

        self.depth += 1;
        let result = self.evaluate(&def.body, call);
        self.depth -= 1;
        self.env.release(call);
        result
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        error::RuntimeError,
        interpreter::{
            environment::Environment,
            evaluator::core::{Evaluator, MAX_CALL_DEPTH},
            lexer::tokenize,
            parser::parse,
            value::core::Value,
        },
    };

    fn run(source: &str) -> Result<Value, RuntimeError> {
        let program = parse(&tokenize(source).unwrap()).unwrap();
        let mut env = Environment::new();
        let root = env.root();
        env.seed(root, program.scopes.names(program.root));

        let mut out = Vec::new();
        Evaluator::new(&program.scopes, &mut env, &mut out).evaluate(&program.statements, root)
    }

    #[test]
    fn recursive_functions_call_themselves() {
        let result = run("fnrec fact(n) { if n < 2 then 1 else n * fact(n - 1) end }\nfact(10)");
        assert_eq!(result.unwrap(), Value::Integer(3_628_800));
    }

    #[test]
    fn plain_functions_cannot_call_themselves() {
        let result = run("fn loop(n) { loop(n) }\nloop(1)");
        assert!(matches!(result, Err(RuntimeError::UnboundName { ref name, .. }) if name == "loop"));
    }

    #[test]
    fn closures_see_their_definition_site() {
        let result = run("var base = 10\nfn add(x) { x + base }\nbase = 20\nadd(1)");
        assert_eq!(result.unwrap(), Value::Integer(21));

        let result = run("fn outer() { var hidden = 3; fn inner() { hidden } inner }\nvar f = outer()\nf()");
        assert_eq!(result.unwrap(), Value::Integer(3));
    }

    #[test]
    fn calls_check_callee_and_arity() {
        assert!(matches!(run("var x = 1\nx(2)"), Err(RuntimeError::NotCallable { line: 2, .. })));
        assert!(matches!(run("fn f(a, b) { a }\nf(1)"),
                         Err(RuntimeError::Arity { expected: 2, found: 1, .. })));
    }

    #[test]
    fn free_names_ignore_the_callers_bindings() {
        let source = "var base = 10\n\
                      fn add(x) { x + base }\n\
                      fn caller() { var base = 100; add(1) }\n\
                      caller()";
        assert_eq!(run(source).unwrap(), Value::Integer(11));
    }

    #[test]
    fn initializers_read_the_outer_binding() {
        let result = run("var x = 10\nfn f() { var x = x + 1; x }\nf()");
        assert_eq!(result.unwrap(), Value::Integer(11));

        let result = run("fn f() { var y = y + 1; y }\nf()");
        assert!(matches!(result, Err(RuntimeError::UnboundName { ref name, .. }) if name == "y"));
    }

    #[test]
    fn deep_recursion_hits_the_call_limit() {
        let count = "fnrec count(n) { if n == 0 then 0 else 1 + count(n - 1) end }\n";

        let result = run(&format!("{count}count(900)"));
        assert_eq!(result.unwrap(), Value::Integer(900));

        let result = run(&format!("{count}count(5000)"));
        assert!(matches!(result, Err(RuntimeError::RecursionLimit { depth: MAX_CALL_DEPTH, line: 1 })));
    }
}
