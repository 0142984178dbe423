use std::iter::Peekable;

use crate::{
    ast::{BinaryOperator, Expr},
    interpreter::{
        lexer::{Keyword, Operator, Token},
        parser::{
            core::{ParseContext, ParseResult},
            unary::parse_unary,
        },
    },
};

/// Maps a token to the binary operator it spells, if any.
///
/// Assignment operators are not binary operators and map to `None`.
#[must_use]
pub const fn token_to_binary_operator(token: &Token) -> Option<BinaryOperator> {
    use BinaryOperator as B;
    match token {
        Token::Operator(operator) => match operator {
            Operator::Plus => Some(B::Add),
            Operator::Minus => Some(B::Sub),
            Operator::Star => Some(B::Mul),
            Operator::Slash => Some(B::Div),
            Operator::RealDivide => Some(B::RealDiv),
            Operator::Percent => Some(B::Mod),
            Operator::Caret => Some(B::Caret),
            Operator::Ampersand => Some(B::BitAnd),
            Operator::Pipe => Some(B::BitOr),
            Operator::ShiftLeft => Some(B::Shl),
            Operator::ShiftRight => Some(B::Shr),
            Operator::Less => Some(B::Less),
            Operator::Greater => Some(B::Greater),
            Operator::LessEqual => Some(B::LessEqual),
            Operator::GreaterEqual => Some(B::GreaterEqual),
            Operator::EqualEqual => Some(B::Equal),
            Operator::BangEqual => Some(B::NotEqual),
            Operator::Assign
            | Operator::PlusAssign
            | Operator::MinusAssign
            | Operator::StarAssign
            | Operator::SlashAssign
            | Operator::PercentAssign => None,
        },
        Token::Keyword(Keyword::And) => Some(B::And),
        Token::Keyword(Keyword::Or) => Some(B::Or),
        _ => None,
    }
}

/// Folds one left-associative precedence level.
///
/// Parses an operand with `next`, then keeps folding `operand op operand`
/// into `Expr::BinOp` while the next token is an operator that `accepts`.
fn parse_level<'a, I>(tokens: &mut Peekable<I>,
                      context: &mut ParseContext<'_>,
                      next: fn(&mut Peekable<I>, &mut ParseContext<'_>) -> ParseResult<Expr>,
                      accepts: fn(BinaryOperator) -> bool)
                      -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut left = next(tokens, context)?;
    while let Some((token, line)) = tokens.peek() {
        let Some(op) = token_to_binary_operator(token).filter(|op| accepts(*op)) else {
            break;
        };
        let line = *line;
        tokens.next();
        let right = next(tokens, context)?;
        left = Expr::BinOp { op,
                             left: Box::new(left),
                             right: Box::new(right),
                             line };
    }
    Ok(left)
}

/// Parses logical `and` / `or`.
///
/// Both share one level, so `a or b and c` groups as `(a or b) and c`.
///
/// The rule is: `logical := bitwise (("and" | "or") bitwise)*`
pub fn parse_logical<'a, I>(tokens: &mut Peekable<I>,
                            context: &mut ParseContext<'_>)
                            -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_level(tokens, context, parse_bitwise, |op| {
        matches!(op, BinaryOperator::And | BinaryOperator::Or)
    })
}

/// Parses bitwise `&`, `|` and `^`.
///
/// The rule is: `bitwise := comparison (("&" | "|" | "^") comparison)*`
pub fn parse_bitwise<'a, I>(tokens: &mut Peekable<I>,
                            context: &mut ParseContext<'_>)
                            -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_level(tokens, context, parse_comparison, |op| {
        matches!(op, BinaryOperator::BitAnd | BinaryOperator::BitOr | BinaryOperator::Caret)
    })
}

/// Parses comparisons.
///
/// Comparisons chain left to right like every other level: `a < b < c`
/// compares the boolean `a < b` with `c`.
///
/// The rule is: `comparison := shift (("<" | ">" | "==" | "!=" | "<=" | ">=")
/// shift)*`
pub fn parse_comparison<'a, I>(tokens: &mut Peekable<I>,
                               context: &mut ParseContext<'_>)
                               -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_level(tokens, context, parse_shift, |op| {
        matches!(op,
                 BinaryOperator::Less
                 | BinaryOperator::Greater
                 | BinaryOperator::Equal
                 | BinaryOperator::NotEqual
                 | BinaryOperator::LessEqual
                 | BinaryOperator::GreaterEqual)
    })
}

/// Parses `<<` and `>>`.
///
/// The rule is: `shift := additive (("<<" | ">>") additive)*`
pub fn parse_shift<'a, I>(tokens: &mut Peekable<I>,
                          context: &mut ParseContext<'_>)
                          -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_level(tokens, context, parse_additive, |op| {
        matches!(op, BinaryOperator::Shl | BinaryOperator::Shr)
    })
}

/// Parses addition and subtraction.
///
/// The rule is: `additive := multiplicative (("+" | "-") multiplicative)*`
pub fn parse_additive<'a, I>(tokens: &mut Peekable<I>,
                             context: &mut ParseContext<'_>)
                             -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_level(tokens, context, parse_multiplicative, |op| {
        matches!(op, BinaryOperator::Add | BinaryOperator::Sub)
    })
}

/// Parses multiplication.
///
/// The rule is: `multiplicative := modulo ("*" modulo)*`
pub fn parse_multiplicative<'a, I>(tokens: &mut Peekable<I>,
                                   context: &mut ParseContext<'_>)
                                   -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_level(tokens, context, parse_modulo, |op| op == BinaryOperator::Mul)
}

/// Parses modulo. Binds tighter than `*`: `a * b % c` is `a * (b % c)`.
///
/// The rule is: `modulo := division ("%" division)*`
pub fn parse_modulo<'a, I>(tokens: &mut Peekable<I>,
                           context: &mut ParseContext<'_>)
                           -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_level(tokens, context, parse_division, |op| op == BinaryOperator::Mod)
}

/// Parses `/` and `÷`, the tightest binary level.
///
/// The rule is: `division := unary (("/" | "÷") unary)*`
pub fn parse_division<'a, I>(tokens: &mut Peekable<I>,
                             context: &mut ParseContext<'_>)
                             -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_level(tokens, context, parse_unary, |op| {
        matches!(op, BinaryOperator::Div | BinaryOperator::RealDiv)
    })
}
