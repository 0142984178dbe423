use std::iter::Peekable;

use crate::{
    ast::{Expr, Statements},
    error::ParseError,
    interpreter::{
        lexer::{Keyword, Token},
        parser::{
            binary::parse_logical,
            scope::{Declaration, ScopeArena, ScopeId},
            statement::parse_statement,
            utils::{expect, skip_semicolons, unexpected},
        },
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// State threaded through every parsing function.
///
/// Tracks the scope that declarations currently land in. Constructs that open
/// a scope switch `current` for the duration of their body and restore it
/// afterwards.
pub struct ParseContext<'s> {
    scopes:       &'s mut ScopeArena,
    current:      ScopeId,
    /// Line reported when the input ends too early.
    pub end_line: usize,
}

impl<'s> ParseContext<'s> {
    /// Creates a context that declares into `current`.
    pub fn new(scopes: &'s mut ScopeArena, current: ScopeId, end_line: usize) -> Self {
        Self { scopes,
               current,
               end_line }
    }

    /// The scope declarations currently land in.
    #[must_use]
    pub const fn current(&self) -> ScopeId {
        self.current
    }

    /// Makes `scope` the current scope and returns the previous one.
    pub fn enter(&mut self, scope: ScopeId) -> ScopeId {
        std::mem::replace(&mut self.current, scope)
    }

    /// Opens a scope nested in the current one without entering it.
    pub fn open_child(&mut self) -> ScopeId {
        self.scopes.child(self.current)
    }

    /// Declares `name` in the current scope.
    pub fn declare(&mut self, name: &str, declaration: Declaration) {
        self.scopes.declare(self.current, name, declaration);
    }

    /// Declares `name` in a specific scope.
    pub fn declare_in(&mut self, scope: ScopeId, name: &str, declaration: Declaration) {
        self.scopes.declare(scope, name, declaration);
    }

    /// Logs references the parser cannot resolve. They are not rejected:
    /// the evaluator reports them if they are still unbound when reached.
    pub fn note_reference(&self, name: &str, line: usize) {
        if self.scopes.lookup(self.current, name).is_none() {
            tracing::debug!(name, line, "reference to a name not declared in scope");
        }
    }

    /// Number of scopes recorded so far.
    #[must_use]
    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }
}

/// Parses a full expression.
///
/// This is the entry point for expression parsing inside statements: the
/// conditional level, below which sit the logical, bitwise, comparison,
/// shift and arithmetic levels.
///
/// Grammar: `expression := "if" if_rest | logical`
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>,
                               context: &mut ParseContext<'_>)
                               -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    if let Some((Token::Keyword(Keyword::If), line)) = tokens.peek() {
        let line = *line;
        tokens.next();
        return parse_if(tokens, context, line);
    }
    parse_logical(tokens, context)
}

/// Parses an `if` expression with an optional `else` branch.
///
/// Syntax:
/// ```text
///     if <condition> then <branch> [else <branch>] end
/// ```
/// A branch is a single statement, which may be a `{ ... }` block. Branches
/// do not open a scope, and any `;` after a branch is skipped.
///
/// # Parameters
/// - `tokens`: Token stream positioned after the `if` keyword.
/// - `line`: Line number of the `if` token.
///
/// # Errors
/// - `UnexpectedToken` if `then` or `end` is missing.
/// - Propagates any errors from the condition or the branches.
pub fn parse_if<'a, I>(tokens: &mut Peekable<I>,
                       context: &mut ParseContext<'_>,
                       line: usize)
                       -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let condition = parse_expression(tokens, context)?;
    expect(tokens, context, &Token::Keyword(Keyword::Then), "`then` after the if condition")?;

    let then_branch = parse_branch(tokens, context)?;

    let else_branch = if let Some((Token::Keyword(Keyword::Else), _)) = tokens.peek() {
        tokens.next();
        Some(Box::new(parse_branch(tokens, context)?))
    } else {
        None
    };

    expect(tokens, context, &Token::Keyword(Keyword::End), "`end` to close the if")?;

    Ok(Expr::If { condition: Box::new(condition),
                  then_branch: Box::new(then_branch),
                  else_branch,
                  line })
}

fn parse_branch<'a, I>(tokens: &mut Peekable<I>, context: &mut ParseContext<'_>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let branch = parse_statement(tokens, context)?;
    skip_semicolons(tokens);
    Ok(branch)
}

/// Parses statements until `closing` or, when `closing` is `None`, until the
/// input ends.
///
/// Statements may be separated by any number of `;`. The closing token is
/// consumed.
///
/// Grammar: `statements := (";"* statement)* ";"* closing?`
///
/// # Errors
/// - `UnexpectedEndOfInput` if the input ends before `closing`.
/// - `UnexpectedToken` for a stray `}` at the top level.
pub fn parse_statements<'a, I>(tokens: &mut Peekable<I>,
                               context: &mut ParseContext<'_>,
                               closing: Option<&Token>)
                               -> ParseResult<Statements>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let line = tokens.peek().map_or(context.end_line, |(_, line)| *line);
    let mut statements = Vec::new();

    loop {
        skip_semicolons(tokens);
        match (tokens.peek(), closing) {
            (None, None) => break,
            (None, Some(closing)) => {
                return Err(ParseError::UnexpectedEndOfInput { expected: closing.to_string(),
                                                              line:     context.end_line, });
            },
            (Some((token, _)), Some(closing)) if token == closing => {
                tokens.next();
                break;
            },
            (Some((Token::RBrace, _)), None) => {
                return Err(unexpected(tokens.next(), context, "a statement"));
            },
            _ => statements.push(parse_statement(tokens, context)?),
        }
    }

    Ok(Statements::new(statements, line))
}
