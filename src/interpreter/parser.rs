use crate::{
    ast::Statements,
    interpreter::{
        lexer::Token,
        parser::{
            core::{ParseContext, ParseResult, parse_statements},
            scope::{ScopeArena, ScopeId},
        },
    },
};

/// Binary operator precedence levels.
///
/// One function per level, from logical `and`/`or` down to division. Each
/// level is left-associative.
pub mod binary;

/// Braced constructs.
///
/// Blocks, function definitions and loops, including the scopes that
/// function bodies and loop bodies open.
pub mod block;

/// Parser state and the top of the expression grammar.
///
/// Holds the parse context threaded through every parsing function, the
/// statement sequence loop and conditionals.
pub mod core;

/// Static scope bookkeeping.
///
/// Names are recorded here as their declarations are parsed, so the evaluator
/// can seed matching runtime frames.
pub mod scope;

/// Statement forms.
///
/// Output, declarations and assignments: the levels of the grammar above
/// conditionals.
pub mod statement;

/// Unary operators, postfix operations and primary expressions.
pub mod unary;

/// Shared parsing helpers.
pub mod utils;

/// A parsed program together with the scopes recorded while parsing it.
#[derive(Debug)]
pub struct Program {
    /// Top-level statements.
    pub statements: Statements,
    /// Every scope opened by the program.
    pub scopes:     ScopeArena,
    /// The top-level scope.
    pub root:       ScopeId,
}

/// Parses a token stream into a fresh [`Program`].
///
/// # Errors
/// Returns a `ParseError` at the first token that does not fit the grammar.
///
/// # Example
/// ```
/// use calci::interpreter::{lexer::tokenize, parser::parse};
///
/// let tokens = tokenize("var x = 1; displayl x + 1").unwrap();
/// let program = parse(&tokens).unwrap();
/// assert_eq!(program.statements.len(), 2);
/// ```
pub fn parse(tokens: &[(Token, usize)]) -> ParseResult<Program> {
    let mut scopes = ScopeArena::new();
    let root = scopes.root();
    let statements = parse_in(tokens, &mut scopes, root)?;
    Ok(Program { statements,
                 scopes,
                 root })
}

/// Parses a token stream into an existing scope arena.
///
/// Declarations are added to `scope`. A session parses each new input this
/// way so earlier declarations stay visible.
///
/// # Errors
/// Returns a `ParseError` at the first token that does not fit the grammar.
pub fn parse_in(tokens: &[(Token, usize)],
                scopes: &mut ScopeArena,
                scope: ScopeId)
                -> ParseResult<Statements> {
    let end_line = tokens.last().map_or(1, |(_, line)| *line);
    let mut context = ParseContext::new(scopes, scope, end_line);
    let mut iter = tokens.iter().peekable();

    let statements = parse_statements(&mut iter, &mut context, None)?;

    tracing::debug!(statements = statements.len(),
                    scopes = context.scope_count(),
                    "parsed program");
    Ok(statements)
}
