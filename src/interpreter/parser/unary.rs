use std::iter::Peekable;

use crate::{
    ast::{ArrayMethod, Expr, UnaryOperator},
    error::ParseError,
    interpreter::{
        lexer::{Keyword, Operator, Token},
        parser::{
            block::{parse_for, parse_function, parse_while},
            core::{ParseContext, ParseResult, parse_expression, parse_if, parse_statements},
            statement::parse_statement,
            utils::{expect, parse_comma_separated, parse_name, unexpected},
        },
    },
    util::stack::ensure_sufficient_stack,
};

/// Parses prefix operators.
///
/// `char`, `ascii`, `not` and `-` all take a unary operand, so they nest:
/// `char(ascii("a") + 1)` and `not not x` both parse. `char(66)` is simply
/// `char` applied to the parenthesized operand `(66)`.
///
/// The rule is: `unary := ("char" | "ascii" | "not" | "-") unary | postfix`
///
/// # Parameters
/// - `tokens`: Token stream positioned at the operand.
/// - `context`: The parse context.
pub fn parse_unary<'a, I>(tokens: &mut Peekable<I>,
                          context: &mut ParseContext<'_>)
                          -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    ensure_sufficient_stack(|| {
        let (op, line) = match tokens.peek() {
            Some((Token::Keyword(Keyword::Char), line)) => (UnaryOperator::Char, *line),
            Some((Token::Keyword(Keyword::Ascii), line)) => (UnaryOperator::Ascii, *line),
            Some((Token::Keyword(Keyword::Not), line)) => (UnaryOperator::Not, *line),
            Some((Token::Operator(Operator::Minus), line)) => (UnaryOperator::Negate, *line),
            _ => return parse_postfix(tokens, context),
        };
        tokens.next();

        let operand = parse_unary(tokens, context)?;
        Ok(Expr::UnaryOp { op,
                           operand: Box::new(operand),
                           line })
    })
}

/// Parses indexing and method calls following a primary expression.
///
/// Methods that take no arguments may be written without parentheses, so
/// `a.Length` and `a.Length()` are the same call. Methods with arguments
/// must be called with a parenthesized list of the right length.
///
/// The rule is: `postfix := primary ("[" expression "]" | "." name ("("
/// arguments ")")?)*`
///
/// # Errors
/// - `UnknownMethod` for a name that is not an array method.
/// - `MethodArity` when the argument count does not match.
pub fn parse_postfix<'a, I>(tokens: &mut Peekable<I>,
                            context: &mut ParseContext<'_>)
                            -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut expr = parse_primary(tokens, context)?;

    loop {
        match tokens.peek() {
            Some((Token::LBracket, line)) => {
                let line = *line;
                tokens.next();
                let index = parse_expression(tokens, context)?;
                expect(tokens, context, &Token::RBracket, "`]` after the index")?;
                expr = Expr::Index { array: Box::new(expr),
                                     index: Box::new(index),
                                     line };
            },
            Some((Token::Dot, _)) => {
                tokens.next();
                let (name, line) = parse_name(tokens, context, "a method name after `.`")?;
                let method =
                    ArrayMethod::from_name(&name).ok_or(ParseError::UnknownMethod { name, line })?;

                let arguments = if tokens.next_if(|(token, _)| *token == Token::LParen).is_some() {
                    parse_comma_separated(tokens, context, parse_expression, &Token::RParen)?
                } else {
                    Vec::new()
                };

                if arguments.len() != method.arity() {
                    return Err(ParseError::MethodArity { method: method.to_string(),
                                                         expected: method.arity(),
                                                         found: arguments.len(),
                                                         line });
                }

                expr = Expr::MethodCall { array: Box::new(expr),
                                          method,
                                          arguments,
                                          line };
            },
            _ => break,
        }
    }

    Ok(expr)
}

/// Parses a primary expression.
///
/// Primaries are literals, names and calls, parenthesized statements, array
/// literals, blocks, function definitions, loops and conditionals.
///
/// An identifier immediately followed by `(` is a call; otherwise it is a
/// variable reference.
///
/// # Errors
/// - `UnexpectedToken` if the next token cannot start an expression.
/// - `UnexpectedEndOfInput` if there is no next token.
pub fn parse_primary<'a, I>(tokens: &mut Peekable<I>,
                            context: &mut ParseContext<'_>)
                            -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let next = tokens.next();
    let Some((token, line)) = next else {
        return Err(unexpected(None, context, "an expression"));
    };
    let line = *line;

    match token {
        Token::Number(text) => Ok(Expr::Number { text: text.clone(),
                                                 line }),
        Token::String(value) => Ok(Expr::String { value: value.clone(),
                                                  line }),
        Token::Boolean(value) => Ok(Expr::Boolean { value: *value,
                                                    line }),
        Token::Var(name) => {
            context.note_reference(name, line);
            if tokens.next_if(|(token, _)| *token == Token::LParen).is_some() {
                let arguments =
                    parse_comma_separated(tokens, context, parse_expression, &Token::RParen)?;
                return Ok(Expr::FuncCall { name: name.clone(),
                                           arguments,
                                           line });
            }
            Ok(Expr::Variable { name: name.clone(),
                                line })
        },
        Token::LParen => {
            let expr = parse_statement(tokens, context)?;
            expect(tokens, context, &Token::RParen, "`)` to close the group")?;
            Ok(expr)
        },
        Token::LBracket => {
            let elements =
                parse_comma_separated(tokens, context, parse_expression, &Token::RBracket)?;
            Ok(Expr::ArrayLiteral { elements, line })
        },
        Token::LBrace => {
            let block = parse_statements(tokens, context, Some(&Token::RBrace))?;
            Ok(Expr::Statements(block))
        },
        Token::Keyword(Keyword::Fn) => parse_function(tokens, context, false, line),
        Token::Keyword(Keyword::FnRec) => parse_function(tokens, context, true, line),
        Token::Keyword(Keyword::While) => parse_while(tokens, context, line),
        Token::Keyword(Keyword::For) => parse_for(tokens, context, line),
        Token::Keyword(Keyword::If) => parse_if(tokens, context, line),
        _ => Err(unexpected(next, context, "an expression")),
    }
}
