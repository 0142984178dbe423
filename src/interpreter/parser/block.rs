use std::{collections::HashSet, iter::Peekable, rc::Rc};

use crate::{
    ast::{Expr, ForLoop, FunctionDef},
    error::ParseError,
    interpreter::{
        lexer::{Keyword, Token},
        parser::{
            core::{ParseContext, ParseResult, parse_expression, parse_statements},
            scope::Declaration,
            statement::{parse_assignment, parse_declaration},
            utils::{expect, parse_comma_separated, parse_name},
        },
    },
};

/// Parses a function definition after its `fn` or `fnrec` keyword.
///
/// The body gets a new scope nested in the scope of the definition site, with
/// the parameters declared in it. The function's own name is declared in the
/// enclosing scope:
///
/// - for `fnrec`, before the body is parsed, so the body can call itself;
/// - for `fn`, after the body, and the body scope masks the name so a call
///   from inside the body cannot reach the function or an outer binding.
///
/// Grammar: `function := ("fn" | "fnrec") name "(" (name ("," name)*)? ")"
/// "{" statements "}"`
///
/// # Parameters
/// - `tokens`: Token stream positioned after the keyword.
/// - `context`: The parse context.
/// - `recursive`: `true` for `fnrec`.
/// - `line`: Line number of the keyword.
///
/// # Errors
/// - `DuplicateParameter` if a parameter name repeats.
/// - `UnexpectedToken` for a malformed header or a missing brace.
pub fn parse_function<'a, I>(tokens: &mut Peekable<I>,
                             context: &mut ParseContext<'_>,
                             recursive: bool,
                             line: usize)
                             -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let (name, _) = parse_name(tokens, context, "a function name")?;
    expect(tokens, context, &Token::LParen, "`(` to open the parameter list")?;
    let params = parse_comma_separated(tokens,
                                       context,
                                       |tokens, context| {
                                           parse_name(tokens, context, "a parameter name").map(|(param, _)| param)
                                       },
                                       &Token::RParen)?;

    let mut seen = HashSet::new();
    if let Some(duplicate) = params.iter().find(|param| !seen.insert(param.as_str())) {
        return Err(ParseError::DuplicateParameter { name: duplicate.clone(),
                                                    function: name,
                                                    line });
    }

    if recursive {
        context.declare(&name, Declaration::Function);
    }

    let scope = context.open_child();
    if !recursive {
        context.declare_in(scope, &name, Declaration::Masked);
    }
    for param in &params {
        context.declare_in(scope, param, Declaration::Parameter);
    }

    expect(tokens, context, &Token::LBrace, "`{` to open the function body")?;
    let enclosing = context.enter(scope);
    let body = parse_statements(tokens, context, Some(&Token::RBrace))?;
    context.enter(enclosing);

    if !recursive {
        context.declare(&name, Declaration::Function);
    }

    Ok(Expr::FuncDef(Rc::new(FunctionDef { name,
                                           params,
                                           body,
                                           scope,
                                           recursive,
                                           line })))
}

/// Parses a `while` loop after its keyword.
///
/// The condition belongs to the enclosing scope; the body gets a scope of
/// its own.
///
/// Grammar: `while := "while" expression "{" statements "}"`
///
/// # Errors
/// - `UnexpectedToken` if the body does not start with `{`.
pub fn parse_while<'a, I>(tokens: &mut Peekable<I>,
                          context: &mut ParseContext<'_>,
                          line: usize)
                          -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let condition = parse_expression(tokens, context)?;
    expect(tokens, context, &Token::LBrace, "`{` to open the loop body")?;

    let scope = context.open_child();
    let enclosing = context.enter(scope);
    let body = parse_statements(tokens, context, Some(&Token::RBrace))?;
    context.enter(enclosing);

    Ok(Expr::WhileLoop { condition: Box::new(condition),
                         body,
                         scope,
                         line })
}

/// Parses a `for` loop after its keyword.
///
/// The header's `var` binding and the body share one scope nested in the
/// enclosing one. The condition and step are parsed inside it so they see
/// the loop variable.
///
/// Grammar: `for := "for" "(" declaration ";" expression ";" assignment ")"
/// "{" statements "}"`
///
/// # Errors
/// - `InvalidLoopInit` if the header does not start with `var`.
/// - `UnexpectedToken` for a malformed header.
pub fn parse_for<'a, I>(tokens: &mut Peekable<I>,
                        context: &mut ParseContext<'_>,
                        line: usize)
                        -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    expect(tokens, context, &Token::LParen, "`(` after `for`")?;
    if !matches!(tokens.peek(), Some((Token::Keyword(Keyword::Var), _))) {
        return Err(ParseError::InvalidLoopInit { line });
    }

    let scope = context.open_child();
    let enclosing = context.enter(scope);

    let init = parse_declaration(tokens, context)?;
    expect(tokens, context, &Token::Semicolon, "`;` after the loop variable")?;
    let condition = parse_expression(tokens, context)?;
    expect(tokens, context, &Token::Semicolon, "`;` after the loop condition")?;
    let step = parse_assignment(tokens, context)?;
    expect(tokens, context, &Token::RParen, "`)` to close the loop header")?;
    expect(tokens, context, &Token::LBrace, "`{` to open the loop body")?;
    let body = parse_statements(tokens, context, Some(&Token::RBrace))?;

    context.enter(enclosing);

    Ok(Expr::ForLoop { context: Box::new(ForLoop { init,
                                                   condition,
                                                   step,
                                                   body,
                                                   scope }),
                       line })
}

#[cfg(test)]
mod tests {
    use crate::{
        ast::Expr,
        error::ParseError,
        interpreter::{
            lexer::tokenize,
            parser::{
                Program, parse,
                scope::{Declaration, ScopeArena, ScopeId},
            },
        },
    };

    fn parse_source(source: &str) -> Result<Program, ParseError> {
        parse(&tokenize(source)?)
    }

    fn function_scope(program: &Program, index: usize) -> ScopeId {
        match &program.statements.statements[index] {
            Expr::FuncDef(def) => def.scope,
            other => panic!("expected a function definition, found {other:?}"),
        }
    }

    #[test]
    fn recursive_functions_see_their_own_name() {
        let program = parse_source("fnrec fact(n) { if n < 2 then 1 else n * fact(n - 1) end }").unwrap();
        let scope = function_scope(&program, 0);
        let scopes: &ScopeArena = &program.scopes;

        assert_eq!(scopes.lookup(scope, "fact"), Some(Declaration::Function));
        assert_eq!(scopes.lookup(scope, "n"), Some(Declaration::Parameter));
        assert_eq!(scopes.lookup(program.root, "fact"), Some(Declaration::Function));
    }

    #[test]
    fn plain_functions_mask_their_own_name() {
        let program = parse_source("fn f(x) { x }").unwrap();
        let scope = function_scope(&program, 0);

        assert_eq!(program.scopes.lookup(scope, "f"), None);
        assert_eq!(program.scopes.lookup(program.root, "f"), Some(Declaration::Function));
    }

    #[test]
    fn parameters_must_be_distinct() {
        assert!(matches!(parse_source("fn f(a, b, a) { a }"),
                         Err(ParseError::DuplicateParameter { ref name, .. }) if name == "a"));
    }

    #[test]
    fn loop_bodies_do_not_leak_declarations() {
        let program = parse_source("while False { var inner = 1 }\nfor (var i = 0; i < 1; i += 1) { }").unwrap();

        assert_eq!(program.scopes.lookup(program.root, "inner"), None);
        assert_eq!(program.scopes.lookup(program.root, "i"), None);
        assert_eq!(program.scopes.len(), 3);
    }

    #[test]
    fn for_loops_need_a_binding() {
        assert!(matches!(parse_source("for (i = 0; i < 3; i += 1) { }"),
                         Err(ParseError::InvalidLoopInit { line: 1 })));
    }

    #[test]
    fn unterminated_bodies_report_the_missing_brace() {
        assert!(matches!(parse_source("fn f() {\n 1"),
                         Err(ParseError::UnexpectedEndOfInput { line: 2, .. })));
    }
}
