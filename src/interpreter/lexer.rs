use std::fmt;

use logos::Logos;

use crate::{ast::BaseType, error::ParseError, interpreter::parser::core::ParseResult};

/// Reserved words of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    If,
    Else,
    Then,
    End,
    Display,
    DisplayLine,
    While,
    For,
    Var,
    Ascii,
    Char,
    Fn,
    FnRec,
    Or,
    And,
    Not,
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let word = match self {
            Self::If => "if",
            Self::Else => "else",
            Self::Then => "then",
            Self::End => "end",
            Self::Display => "display",
            Self::DisplayLine => "displayl",
            Self::While => "while",
            Self::For => "for",
            Self::Var => "var",
            Self::Ascii => "ascii",
            Self::Char => "char",
            Self::Fn => "fn",
            Self::FnRec => "fnrec",
            Self::Or => "or",
            Self::And => "and",
            Self::Not => "not",
        };
        write!(f, "{word}")
    }
}

/// Operator symbols, including plain and compound assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Plus,
    Minus,
    Star,
    Slash,
    /// `÷`
    RealDivide,
    Percent,
    Caret,
    Ampersand,
    Pipe,
    ShiftLeft,
    ShiftRight,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    EqualEqual,
    BangEqual,
    Assign,
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    PercentAssign,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::RealDivide => "÷",
            Self::Percent => "%",
            Self::Caret => "^",
            Self::Ampersand => "&",
            Self::Pipe => "|",
            Self::ShiftLeft => "<<",
            Self::ShiftRight => ">>",
            Self::Less => "<",
            Self::Greater => ">",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::EqualEqual => "==",
            Self::BangEqual => "!=",
            Self::Assign => "=",
            Self::PlusAssign => "+=",
            Self::MinusAssign => "-=",
            Self::StarAssign => "*=",
            Self::SlashAssign => "/=",
            Self::PercentAssign => "%=",
        };
        write!(f, "{symbol}")
    }
}

/// Represents a lexical token in the source input.
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// This enum defines all recognized tokens in the language.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(extras = LexerExtras)]
pub enum Token {
    /// Numeric literal tokens, such as `42` or `3.14`. The text is kept as
    /// written; the evaluator decides between integer and float.
    #[regex(r"[0-9]+(\.[0-9]+)?", |lex| lex.slice().to_string())]
    Number(String),
    /// String literal tokens in single or double quotes, without the quotes.
    #[regex(r#""[^"]*""#, lex_string)]
    #[regex(r"'[^']*'", lex_string)]
    String(String),
    /// `True` or `False`.
    #[token("True", |_| true)]
    #[token("False", |_| false)]
    Boolean(bool),
    /// Reserved words.
    #[token("if", |_| Keyword::If)]
    #[token("else", |_| Keyword::Else)]
    #[token("then", |_| Keyword::Then)]
    #[token("end", |_| Keyword::End)]
    #[token("display", |_| Keyword::Display)]
    #[token("displayl", |_| Keyword::DisplayLine)]
    #[token("while", |_| Keyword::While)]
    #[token("for", |_| Keyword::For)]
    #[token("var", |_| Keyword::Var)]
    #[token("ascii", |_| Keyword::Ascii)]
    #[token("char", |_| Keyword::Char)]
    #[token("fn", |_| Keyword::Fn)]
    #[token("fnrec", |_| Keyword::FnRec)]
    #[token("or", |_| Keyword::Or)]
    #[token("and", |_| Keyword::And)]
    #[token("not", |_| Keyword::Not)]
    Keyword(Keyword),
    /// Base type names used in declarations.
    #[token("integer", |_| BaseType::Integer)]
    #[token("decimal", |_| BaseType::Decimal)]
    #[token("uinteger", |_| BaseType::UInteger)]
    Type(BaseType),
    /// Operator symbols. Multi-character operators win over their prefixes.
    #[token("+", |_| Operator::Plus)]
    #[token("-", |_| Operator::Minus)]
    #[token("*", |_| Operator::Star)]
    #[token("/", |_| Operator::Slash)]
    #[token("÷", |_| Operator::RealDivide)]
    #[token("%", |_| Operator::Percent)]
    #[token("^", |_| Operator::Caret)]
    #[token("&", |_| Operator::Ampersand)]
    #[token("|", |_| Operator::Pipe)]
    #[token("<<", |_| Operator::ShiftLeft)]
    #[token(">>", |_| Operator::ShiftRight)]
    #[token("<", |_| Operator::Less)]
    #[token(">", |_| Operator::Greater)]
    #[token("<=", |_| Operator::LessEqual)]
    #[token(">=", |_| Operator::GreaterEqual)]
    #[token("==", |_| Operator::EqualEqual)]
    #[token("!=", |_| Operator::BangEqual)]
    #[token("=", |_| Operator::Assign)]
    #[token("+=", |_| Operator::PlusAssign)]
    #[token("-=", |_| Operator::MinusAssign)]
    #[token("*=", |_| Operator::StarAssign)]
    #[token("/=", |_| Operator::SlashAssign)]
    #[token("%=", |_| Operator::PercentAssign)]
    Operator(Operator),
    /// Identifier tokens; variable or function names such as `x` or `square`.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Var(String),
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `,`
    #[token(",")]
    Comma,
    /// `;`
    #[token(";")]
    Semicolon,
    /// `.`
    #[token(".")]
    Dot,
    /// `/~ comment ~/`, which may run over several lines.
    #[regex(r"/~([^~]|~+[^~/])*~+/", skip_counting_lines, priority = 5, allow_greedy = true)]
    Comment,
    /// ```text
    /// /~{ block
    ///     comment }~/
    /// ```
    #[regex(r"/~\{([^}]|\}+[^}~])*\}+~/", skip_counting_lines, priority = 10, allow_greedy = true)]
    BlockComment,
    /// Line breaks advance the line counter.
    #[token("\n", |lex| {
        lex.extras.line += 1;
        logos::Skip
    })]
    NewLine,
    /// Spaces, tabs, carriage returns and feeds.
    #[regex(r"[ \t\r\f]+", logos::skip)]
    Ignored,
}

impl Token {
    /// Whether this token can end an operand.
    ///
    /// A `-` right after such a token is a subtraction; anywhere else it may
    /// be folded into a negative literal.
    #[must_use]
    pub const fn ends_value(&self) -> bool {
        matches!(self,
                 Self::Number(_)
                 | Self::String(_)
                 | Self::Boolean(_)
                 | Self::Var(_)
                 | Self::RParen
                 | Self::RBracket
                 | Self::Keyword(Keyword::End))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "number `{n}`"),
            Self::String(s) => write!(f, "string \"{s}\""),
            Self::Boolean(true) => write!(f, "`True`"),
            Self::Boolean(false) => write!(f, "`False`"),
            Self::Keyword(k) => write!(f, "keyword `{k}`"),
            Self::Type(t) => write!(f, "type `{t:?}`"),
            Self::Operator(o) => write!(f, "`{o}`"),
            Self::Var(name) => write!(f, "identifier `{name}`"),
            Self::LParen => write!(f, "`(`"),
            Self::RParen => write!(f, "`)`"),
            Self::LBrace => write!(f, "`{{`"),
            Self::RBrace => write!(f, "`}}`"),
            Self::LBracket => write!(f, "`[`"),
            Self::RBracket => write!(f, "`]`"),
            Self::Comma => write!(f, "`,`"),
            Self::Semicolon => write!(f, "`;`"),
            Self::Dot => write!(f, "`.`"),
            Self::Comment | Self::BlockComment => write!(f, "comment"),
            Self::NewLine => write!(f, "newline"),
            Self::Ignored => write!(f, "whitespace"),
        }
    }
}

/// Additional information carried by the lexer during tokenization.
///
/// Tracks the current line number for error reporting and diagnostics.
pub struct LexerExtras {
    /// The current line number in the source being tokenized.
    pub line: usize,
}

impl Default for LexerExtras {
    fn default() -> Self {
        Self { line: 1 }
    }
}

/// Strips the quotes from a string literal and counts the line breaks it
/// spans.
fn lex_string(lex: &mut logos::Lexer<Token>) -> String {
    let slice = lex.slice();
    lex.extras.line += slice.matches('\n').count();
    slice[1..slice.len() - 1].to_string()
}

/// Skips a block comment, keeping the line counter in step.
fn skip_counting_lines(lex: &mut logos::Lexer<Token>) -> logos::Skip {
    lex.extras.line += lex.slice().matches('\n').count();
    logos::Skip
}

/// Converts source text into `(token, line)` pairs.
///
/// Whitespace and comments are dropped. A `-` that does not follow a
/// value-ending token and is immediately followed by a number is folded into
/// a negative numeric literal, so `x - 1` subtracts while `f(-1)` and
/// `2 * -3` pass negative literals.
///
/// # Errors
/// Returns `ParseError::UnexpectedCharacter` for text that matches no token,
/// including an unterminated string.
///
/// # Example
/// ```
/// use calci::interpreter::lexer::{Token, tokenize};
///
/// let tokens = tokenize("var x = -3").unwrap();
/// assert_eq!(tokens.last(), Some(&(Token::Number("-3".to_string()), 1)));
/// ```
pub fn tokenize(source: &str) -> ParseResult<Vec<(Token, usize)>> {
    let mut lexer = Token::lexer(source);
    let mut tokens: Vec<(Token, usize)> = Vec::new();

    while let Some(token) = lexer.next() {
        let line = lexer.extras.line;
        let Ok(token) = token else {
            return Err(ParseError::UnexpectedCharacter { text: lexer.slice().to_string(),
                                                         line });
        };

        if let Token::Number(digits) = &token
           && fold_negative(&tokens)
        {
            tokens.pop();
            tokens.push((Token::Number(format!("-{digits}")), line));
            continue;
        }
        tokens.push((token, line));
    }

    tracing::trace!(count = tokens.len(), "tokenized source");
    Ok(tokens)
}

/// Whether the last token is a `-` that should become part of a following
/// number literal.
fn fold_negative(tokens: &[(Token, usize)]) -> bool {
    match tokens {
        [.., (previous, _), (Token::Operator(Operator::Minus), _)] => !previous.ends_value(),
        [(Token::Operator(Operator::Minus), _)] => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source).unwrap().into_iter().map(|(token, _)| token).collect()
    }

    fn number(text: &str) -> Token {
        Token::Number(text.to_string())
    }

    #[test]
    fn multi_character_operators_win() {
        assert_eq!(kinds("a <= b"),
                   vec![Token::Var("a".to_string()),
                        Token::Operator(Operator::LessEqual),
                        Token::Var("b".to_string())]);
        assert_eq!(kinds("x += 1 << 2"),
                   vec![Token::Var("x".to_string()),
                        Token::Operator(Operator::PlusAssign),
                        number("1"),
                        Token::Operator(Operator::ShiftLeft),
                        number("2")]);
    }

    #[test]
    fn keywords_types_and_names() {
        assert_eq!(kinds("var integer displayl display True iffy"),
                   vec![Token::Keyword(Keyword::Var),
                        Token::Type(BaseType::Integer),
                        Token::Keyword(Keyword::DisplayLine),
                        Token::Keyword(Keyword::Display),
                        Token::Boolean(true),
                        Token::Var("iffy".to_string())]);
    }

    #[test]
    fn minus_folds_only_where_no_operand_ends() {
        assert_eq!(kinds("x -1"),
                   vec![Token::Var("x".to_string()), Token::Operator(Operator::Minus), number("1")]);
        assert_eq!(kinds("-1"), vec![number("-1")]);
        assert_eq!(kinds("2*-3.5"),
                   vec![number("2"), Token::Operator(Operator::Star), number("-3.5")]);
        assert_eq!(kinds("(-2)"), vec![Token::LParen, number("-2"), Token::RParen]);
        assert_eq!(kinds("a[0] - 1"),
                   vec![Token::Var("a".to_string()),
                        Token::LBracket,
                        number("0"),
                        Token::RBracket,
                        Token::Operator(Operator::Minus),
                        number("1")]);
        assert_eq!(kinds("- x"), vec![Token::Operator(Operator::Minus), Token::Var("x".to_string())]);
    }

    #[test]
    fn strings_in_either_quote() {
        assert_eq!(kinds(r#""hi" 'there'"#),
                   vec![Token::String("hi".to_string()), Token::String("there".to_string())]);
    }

    #[test]
    fn comments_are_skipped_and_lines_counted() {
        let tokens = tokenize("1 /~ note ~/\n/~{ a\nb }~/ 2\n3").unwrap();
        assert_eq!(tokens, vec![(number("1"), 1), (number("2"), 3), (number("3"), 4)]);
    }

    #[test]
    fn plain_comments_may_span_lines() {
        let tokens = tokenize("1 /~ a comment that\nwraps onto\nthree lines ~/ 2\n3").unwrap();
        assert_eq!(tokens, vec![(number("1"), 1), (number("2"), 3), (number("3"), 4)]);

        let tokens = tokenize("/~ ~ tildes ~~ inside ~/ 4").unwrap();
        assert_eq!(tokens, vec![(number("4"), 1)]);
    }

    #[test]
    fn unknown_character_is_an_error() {
        assert_eq!(tokenize("var x = 1\n$"),
                   Err(ParseError::UnexpectedCharacter { text: "$".to_string(),
                                                         line: 2, }));
        assert!(matches!(tokenize("\"open"), Err(ParseError::UnexpectedCharacter { .. })));
    }
}
