use std::iter::Peekable;

use crate::{
    ast::{BinaryOperator, Expr},
    error::ParseError,
    interpreter::{
        lexer::{Keyword, Operator, Token},
        parser::{
            core::{ParseContext, ParseResult, parse_expression},
            scope::Declaration,
            utils::{expect, parse_name},
        },
    },
    util::stack::ensure_sufficient_stack,
};

/// Parses a single statement.
///
/// Statements are the lowest grammar level: `display` and `displayl` wrap
/// the next level down, everything else falls through to declarations.
///
/// Grammar: `statement := ("display" | "displayl") declaration | declaration`
///
/// # Parameters
/// - `tokens`: Token stream positioned at the start of a statement.
/// - `context`: The parse context.
///
/// # Returns
/// The parsed statement node.
pub fn parse_statement<'a, I>(tokens: &mut Peekable<I>,
                              context: &mut ParseContext<'_>)
                              -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    ensure_sufficient_stack(|| match tokens.peek() {
        Some((Token::Keyword(Keyword::Display), line)) => {
            let line = *line;
            tokens.next();
            let value = parse_declaration(tokens, context)?;
            Ok(Expr::Display { value: Box::new(value),
                               line })
        },
        Some((Token::Keyword(Keyword::DisplayLine), line)) => {
            let line = *line;
            tokens.next();
            let value = parse_declaration(tokens, context)?;
            Ok(Expr::DisplayLine { value: Box::new(value),
                                   line })
        },
        _ => parse_declaration(tokens, context),
    })
}

/// Parses a variable declaration.
///
/// The declared name is added to the current scope only after the
/// initializer has been parsed, so `var x = x + 1` refers to an outer `x`.
///
/// Grammar: `declaration := "var" type? name "=" assignment | assignment`
///
/// # Errors
/// - `UnexpectedToken` if the name or `=` is missing.
pub fn parse_declaration<'a, I>(tokens: &mut Peekable<I>,
                                context: &mut ParseContext<'_>)
                                -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let Some((Token::Keyword(Keyword::Var), line)) = tokens.peek() else {
        return parse_assignment(tokens, context);
    };
    let line = *line;
    tokens.next();

    let declared_type = match tokens.peek() {
        Some((Token::Type(base), _)) => {
            let base = *base;
            tokens.next();
            Some(base)
        },
        _ => None,
    };

    let (name, _) = parse_name(tokens, context, "a variable name after `var`")?;
    expect(tokens, context, &Token::Operator(Operator::Assign), "`=` in the declaration")?;
    let value = parse_assignment(tokens, context)?;

    context.declare(&name, Declaration::Variable);

    Ok(Expr::VarBind { name,
                       declared_type,
                       value: Box::new(value),
                       line })
}

/// Parses an assignment or compound assignment.
///
/// The target is parsed as an ordinary expression first and then checked:
/// `=` accepts a variable or an index expression, the compound forms accept
/// only a variable.
///
/// Grammar: `assignment := expression (("=" | "+=" | "-=" | "*=" | "/=" |
/// "%=") expression)?`
///
/// # Errors
/// - `InvalidAssignmentTarget` or `InvalidCompoundTarget` for any other
///   target.
pub fn parse_assignment<'a, I>(tokens: &mut Peekable<I>,
                               context: &mut ParseContext<'_>)
                               -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let target = parse_expression(tokens, context)?;

    let Some((Token::Operator(operator), line)) = tokens.peek() else {
        return Ok(target);
    };
    let line = *line;
    let compound = match operator {
        Operator::Assign => None,
        Operator::PlusAssign => Some(BinaryOperator::Add),
        Operator::MinusAssign => Some(BinaryOperator::Sub),
        Operator::StarAssign => Some(BinaryOperator::Mul),
        Operator::SlashAssign => Some(BinaryOperator::Div),
        Operator::PercentAssign => Some(BinaryOperator::Mod),
        _ => return Ok(target),
    };
    tokens.next();

    let value = Box::new(parse_expression(tokens, context)?);

    match (target, compound) {
        (Expr::Variable { name, .. }, None) => Ok(Expr::AssignToVar { name, value, line }),
        (Expr::Variable { name, .. }, Some(op)) => Ok(Expr::CompoundAssignment { name,
                                                                                  op,
                                                                                  value,
                                                                                  line }),
        (Expr::Index { array, index, .. }, None) => Ok(Expr::IndexAssign { array,
                                                                           index,
                                                                           value,
                                                                           line }),
        (other, None) => Err(ParseError::InvalidAssignmentTarget { target: other.describe()
                                                                               .to_string(),
                                                                   line }),
        (other, Some(_)) => Err(ParseError::InvalidCompoundTarget { target: other.describe()
                                                                                .to_string(),
                                                                    line }),
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        ast::{BinaryOperator, Expr},
        error::ParseError,
        interpreter::{lexer::tokenize, parser::parse},
    };

    fn parse_source(source: &str) -> Result<Vec<Expr>, ParseError> {
        let tokens = tokenize(source)?;
        Ok(parse(&tokens)?.statements.statements)
    }

    #[test]
    fn compound_assignment_keeps_the_plain_operator() {
        let statements = parse_source("var x = 1; x *= 3").unwrap();
        assert!(matches!(&statements[1],
                         Expr::CompoundAssignment { name, op: BinaryOperator::Mul, .. } if name == "x"));
    }

    #[test]
    fn index_targets_accept_only_plain_assignment() {
        let statements = parse_source("var a = [1]; a[0] = 2").unwrap();
        assert!(matches!(&statements[1], Expr::IndexAssign { .. }));

        assert!(matches!(parse_source("var a = [1]; a[0] += 2"),
                         Err(ParseError::InvalidCompoundTarget { line: 1, .. })));
    }

    #[test]
    fn literals_cannot_be_assigned() {
        assert!(matches!(parse_source("3 = 4"),
                         Err(ParseError::InvalidAssignmentTarget { line: 1, .. })));
    }

    #[test]
    fn declarations_require_an_initializer() {
        assert!(matches!(parse_source("var x;"),
                         Err(ParseError::UnexpectedToken { line: 1, .. })));
        assert!(matches!(parse_source("var"),
                         Err(ParseError::UnexpectedEndOfInput { .. })));
    }

    #[test]
    fn groups_hold_whole_statements() {
        let statements = parse_source("var x = 5; display (x -= 2)").unwrap();
        assert!(matches!(&statements[1],
                         Expr::Display { value, .. } if matches!(**value, Expr::CompoundAssignment { .. })));

        let statements = parse_source("display( var integer x = 3+7-1)").unwrap();
        assert!(matches!(&statements[0],
                         Expr::Display { value, .. } if matches!(**value, Expr::VarBind { .. })));
    }

    #[test]
    fn deeply_nested_groups_parse() {
        let source = format!("{}1{}", "(".repeat(1000), ")".repeat(1000));
        assert!(matches!(parse_source(&source).unwrap().as_slice(), [Expr::Number { .. }]));
    }
}
