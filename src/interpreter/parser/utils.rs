use std::iter::Peekable;

use crate::{
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::core::{ParseContext, ParseResult},
    },
};

/// Builds the error for a token that does not fit, or for running out of
/// input.
///
/// # Parameters
/// - `found`: The offending token, or `None` at the end of input.
/// - `context`: Supplies the last line of the input.
/// - `expected`: What the parser was looking for.
pub(in crate::interpreter::parser) fn unexpected(found: Option<&(Token, usize)>,
                                                 context: &ParseContext<'_>,
                                                 expected: &str)
                                                 -> ParseError {
    match found {
        Some((token, line)) => ParseError::UnexpectedToken { expected: expected.to_string(),
                                                             found:    token.to_string(),
                                                             line:     *line, },
        None => ParseError::UnexpectedEndOfInput { expected: expected.to_string(),
                                                   line:     context.end_line, },
    }
}

/// Consumes `token` or fails, returning the line it was found on.
///
/// # Errors
/// Returns a `ParseError` naming `expected` if the next token differs.
pub(in crate::interpreter::parser) fn expect<'a, I>(tokens: &mut Peekable<I>,
                                                    context: &ParseContext<'_>,
                                                    token: &Token,
                                                    expected: &str)
                                                    -> ParseResult<usize>
    where I: Iterator<Item = &'a (Token, usize)>
{
    match tokens.next() {
        Some((found, line)) if found == token => Ok(*line),
        other => Err(unexpected(other, context, expected)),
    }
}

/// Parses a plain identifier and returns its name and line.
///
/// # Errors
/// Returns a `ParseError` if the next token is not an identifier.
pub(in crate::interpreter::parser) fn parse_name<'a, I>(tokens: &mut Peekable<I>,
                                                        context: &ParseContext<'_>,
                                                        expected: &str)
                                                        -> ParseResult<(String, usize)>
    where I: Iterator<Item = &'a (Token, usize)>
{
    match tokens.next() {
        Some((Token::Var(name), line)) => Ok((name.clone(), *line)),
        other => Err(unexpected(other, context, expected)),
    }
}

/// Skips any number of `;`.
pub(in crate::interpreter::parser) fn skip_semicolons<'a, I>(tokens: &mut Peekable<I>)
    where I: Iterator<Item = &'a (Token, usize)>
{
    while tokens.next_if(|(token, _)| *token == Token::Semicolon).is_some() {}
}

/// Parses a comma-separated list of items until a closing token.
///
/// Shared by array literals, call arguments, method arguments and parameter
/// lists. An immediately encountered closing token produces an empty list.
///
/// Grammar (simplified): `list := (item ("," item)*)? closing`
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the first item or closing token.
/// - `context`: The parse context, handed on to `parse_item`.
/// - `parse_item`: Function used to parse each list element.
/// - `closing`: The token that terminates the list (e.g., `]` or `)`).
///
/// # Errors
/// Returns a `ParseError` if:
/// - an item fails to parse,
/// - an item is followed by something other than `,` or `closing`,
/// - the stream ends before the closing token.
pub(in crate::interpreter::parser) fn parse_comma_separated<'a, I, T>(
    tokens: &mut Peekable<I>,
    context: &mut ParseContext<'_>,
    parse_item: impl Fn(&mut Peekable<I>, &mut ParseContext<'_>) -> ParseResult<T>,
    closing: &Token)
    -> ParseResult<Vec<T>>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut items = Vec::new();
    if tokens.next_if(|(token, _)| token == closing).is_some() {
        return Ok(items);
    }
    loop {
        items.push(parse_item(tokens, context)?);
        match tokens.next() {
            Some((Token::Comma, _)) => {},
            Some((token, _)) if token == closing => break,
            other => return Err(unexpected(other, context, &format!("`,` or {closing}"))),
        }
    }
    Ok(items)
}
