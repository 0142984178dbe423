use std::io::Write;

use crate::{
    error::{Error, RuntimeError},
    interpreter::{
        environment::{EnvId, Environment},
        evaluator::core::Evaluator,
        lexer::tokenize,
        parser::{
            parse_in,
            scope::{ScopeArena, ScopeId},
        },
        value::core::Value,
    },
};

/// An interpreter that remembers its bindings between runs.
///
/// Each call to [`Interpreter::run`] parses into the same root scope and
/// evaluates in the same root frame, so variables and functions declared by
/// one input are visible to the next. Output goes to the writer supplied at
/// construction.
///
/// # Example
/// ```
/// use calci::interpreter::{session::Interpreter, value::core::Value};
///
/// let mut session = Interpreter::new(Vec::new());
/// session.run("var x = 4").unwrap();
/// session.run("fn twice(n) { n * 2 }").unwrap();
///
/// assert_eq!(session.run("twice(x)").unwrap(), Value::Integer(8));
/// session.run("displayl x").unwrap();
/// assert_eq!(session.output(), b"4\n");
/// ```
#[derive(Debug)]
pub struct Interpreter<W: Write> {
    scopes:     ScopeArena,
    root_scope: ScopeId,
    env:        Environment,
    root_frame: EnvId,
    out:        W,
}

impl<W: Write> Interpreter<W> {
    /// Creates a session with nothing bound, writing output to `out`.
    pub fn new(out: W) -> Self {
        let scopes = ScopeArena::new();
        let root_scope = scopes.root();
        let env = Environment::new();
        let root_frame = env.root();
        Self { scopes,
               root_scope,
               env,
               root_frame,
               out }
    }

    /// Runs one program in the session.
    ///
    /// # Returns
    /// The value of the program's last statement.
    ///
    /// # Errors
    /// A `ParseError` if the source is malformed, or the first `RuntimeError`
    /// raised while evaluating it. Bindings made before a runtime error stay
    /// in place.
    pub fn run(&mut self, source: &str) -> Result<Value, Error> {
        let tokens = tokenize(source)?;
        let statements = parse_in(&tokens, &mut self.scopes, self.root_scope)?;
        self.env.seed(self.root_frame, self.scopes.names(self.root_scope));

        let result = Evaluator::new(&self.scopes, &mut self.env, &mut self.out).evaluate(&statements,
                                                                                         self.root_frame);
        self.out.flush().map_err(RuntimeError::from)?;
        Ok(result?)
    }

    /// Everything written so far.
    pub fn output(&self) -> &W {
        &self.out
    }

    /// Ends the session and hands back the writer.
    pub fn into_output(self) -> W {
        self.out
    }
}
