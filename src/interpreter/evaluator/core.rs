use std::io::Write;

use crate::{
    ast::{Expr, Statements},
    error::RuntimeError,
    interpreter::{
        environment::{EnvId, Environment},
        parser::scope::ScopeArena,
        value::core::Value,
    },
    util::stack::ensure_sufficient_stack,
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// How many user function calls may be active at once.
pub const MAX_CALL_DEPTH: usize = 1000;

/// Walks the AST against a runtime environment.
///
/// Apart from the number of calls in progress, the evaluator only holds
/// borrowed handles: the scopes recorded by the parser (to seed new frames),
/// the environment holding every frame, and the sink that `display` writes
/// to. Callers pick the frame each evaluation starts in.
///
/// ## Usage
/// ```
/// use calci::interpreter::{
///     environment::Environment,
///     evaluator::core::Evaluator,
///     lexer::tokenize,
///     parser::parse,
/// };
///
/// let program = parse(&tokenize("var x = 20; displayl x + 1").unwrap()).unwrap();
/// let mut env = Environment::new();
/// let root = env.root();
/// env.seed(root, program.scopes.names(program.root));
///
/// let mut out = Vec::new();
/// Evaluator::new(&program.scopes, &mut env, &mut out).evaluate(&program.statements, root)
///                                                    .unwrap();
/// assert_eq!(String::from_utf8(out).unwrap(), "21\n");
/// ```
pub struct Evaluator<'a> {
    pub(in crate::interpreter::evaluator) scopes: &'a ScopeArena,
    pub(in crate::interpreter::evaluator) env:    &'a mut Environment,
    pub(in crate::interpreter::evaluator) out:    &'a mut dyn Write,
    /// User function calls currently in progress.
    pub(in crate::interpreter::evaluator) depth:  usize,
}

impl<'a> Evaluator<'a> {
    /// Creates an evaluator over the given scopes, environment and output
    /// sink.
    pub fn new(scopes: &'a ScopeArena, env: &'a mut Environment, out: &'a mut dyn Write) -> Self {
        Self { scopes,
               env,
               out,
               depth: 0 }
    }

    /// Evaluates a statement sequence in `frame`.
    ///
    /// # Returns
    /// The value of the last statement, or `Value::Unit` for an empty
    /// sequence.
    ///
    /// # Errors
    /// Stops at the first statement that fails.
    pub fn evaluate(&mut self, statements: &Statements, frame: EnvId) -> EvalResult<Value> {
        let mut last = Value::Unit;
        for statement in &statements.statements {
            last = self.eval(statement, frame)?;
        }
        Ok(last)
    }

    /// Evaluates one node in `frame`.
    ///
    /// This is the single dispatch point over every AST variant.
    pub fn eval(&mut self, expr: &Expr, frame: EnvId) -> EvalResult<Value> {
        ensure_sufficient_stack(|| self.eval_node(expr, frame))
    }

    fn eval_node(&mut self, expr: &Expr, frame: EnvId) -> EvalResult<Value> {
        match expr {
            Expr::Number { text, line } => Self::eval_number(text, *line),
            Expr::String { value, .. } => Ok(Value::Text(value.clone())),
            Expr::Boolean { value, .. } => Ok(Value::Boolean(*value)),
            Expr::ArrayLiteral { elements, .. } => self.eval_array_literal(elements, frame),
            Expr::Variable { name, line } => self.env.get(frame, name, *line),
            Expr::VarBind { name, value, .. } => {
                let value = self.eval_initializer(name, value, frame)?;
                self.env.define(frame, name, value);
                Ok(Value::Unit)
            },
            Expr::AssignToVar { name, value, line } => {
                let value = self.eval(value, frame)?;
                self.env.assign(frame, name, value, *line)?;
                Ok(Value::Unit)
            },
            Expr::CompoundAssignment { name,
                                       op,
                                       value,
                                       line, } => {
                let current = self.env.get(frame, name, *line)?;
                let rhs = self.eval(value, frame)?;
                let result = Self::eval_binary(*op, current, rhs, *line)?;
                self.env.assign(frame, name, result, *line)?;
                Ok(Value::Unit)
            },
            Expr::IndexAssign { array,
                                index,
                                value,
                                line, } => self.eval_index_assign(array, index, value, *line, frame),
            Expr::BinOp { op,
                          left,
                          right,
                          line, } => {
                let left = self.eval(left, frame)?;
                let right = self.eval(right, frame)?;
                Self::eval_binary(*op, left, right, *line)
            },
            Expr::UnaryOp { op, operand, line } => {
                let operand = self.eval(operand, frame)?;
                Self::eval_unary(*op, operand, *line)
            },
            Expr::If { condition,
                       then_branch,
                       else_branch,
                       line, } => {
                let condition = self.eval(condition, frame)?;
                if Self::expect_boolean(condition, "if condition", *line)? {
                    self.eval(then_branch, frame)
                } else if let Some(else_branch) = else_branch {
                    self.eval(else_branch, frame)
                } else {
                    Ok(Value::Unit)
                }
            },
            Expr::WhileLoop { condition,
                              body,
                              scope,
                              line, } => self.eval_while(condition, body, *scope, *line, frame),
            Expr::ForLoop { context, .. } => self.eval_for(context, frame),
            Expr::Display { value, .. } => {
                let value = self.eval(value, frame)?;
                if !value.is_unit() {
                    write!(self.out, "{value}")?;
                }
                Ok(Value::Unit)
            },
            Expr::DisplayLine { value, .. } => {
                let value = self.eval(value, frame)?;
                if !value.is_unit() {
                    writeln!(self.out, "{value}")?;
                }
                Ok(Value::Unit)
            },
            Expr::FuncDef(def) => Ok(self.eval_function_def(def, frame)),
            Expr::FuncCall { name,
                             arguments,
                             line, } => self.eval_function_call(name, arguments, *line, frame),
            Expr::Statements(block) => self.evaluate(block, frame),
            Expr::Index { array, index, line } => self.eval_index(array, index, *line, frame),
            Expr::MethodCall { array,
                               method,
                               arguments,
                               line, } => self.eval_method_call(array, *method, arguments, *line, frame),
        }
    }

    /// Evaluates the initializer of `var name = ...` in `frame`.
    ///
    /// The declared name is not yet in scope for its own initializer, so an
    /// uninitialized slot for it in `frame` is set aside while the
    /// initializer runs and `name` resolves to any outer binding instead.
    fn eval_initializer(&mut self, name: &str, value: &Expr, frame: EnvId) -> EvalResult<Value> {
        if !self.env.unseed(frame, name) {
            return self.eval(value, frame);
        }
        let result = self.eval(value, frame);
        if result.is_err() {
            self.env.seed(frame, [name]);
        }
        result
    }

    /// Reads a numeric literal: integer unless the text has a fractional
    /// part.
    ///
    /// # Errors
    /// `InvalidLiteral` if the integer does not fit in 64 bits.
    ///
    /// # Example
    /// ```
    /// use calci::interpreter::{evaluator::core::Evaluator, value::core::Value};
    ///
    /// assert_eq!(Evaluator::eval_number("-12", 1).unwrap(), Value::Integer(-12));
    /// assert_eq!(Evaluator::eval_number("2.50", 1).unwrap(), Value::Float(2.5));
    /// assert!(Evaluator::eval_number("99999999999999999999", 1).is_err());
    /// ```
    pub fn eval_number(text: &str, line: usize) -> EvalResult<Value> {
        let invalid = || RuntimeError::InvalidLiteral { text: text.to_string(),
                                                        line };
        if text.contains('.') {
            text.parse::<f64>().map(Value::Float).map_err(|_| invalid())
        } else {
            text.parse::<i64>().map(Value::Integer).map_err(|_| invalid())
        }
    }
}
