/// The runtime environment: an arena of value frames.
///
/// Frames mirror the static scopes recorded by the parser. Lookups walk
/// parent handles, closures keep the frame they were defined in, and frames
/// created by a call or a loop are released when it finishes unless a
/// closure captured one of them.
pub mod environment;
/// The evaluator module executes AST nodes and computes results.
///
/// The evaluator traverses the AST against the runtime environment,
/// performing arithmetic, comparisons, array operations, calls and output.
///
/// # Responsibilities
/// - Evaluates every AST node through one exhaustive dispatch.
/// - Creates and releases frames for calls and loops.
/// - Reports runtime errors such as division by zero or unbound names.
pub mod evaluator;
/// The lexer module tokenizes source code for further parsing.
///
/// The lexer reads the raw source text and produces a stream of tokens, each
/// tagged with the line it starts on. Comments and whitespace are dropped
/// here.
///
/// # Responsibilities
/// - Converts the input characters into tokens with line numbers.
/// - Folds a `-` directly before a number into a negative literal where it
///   cannot be a subtraction.
/// - Reports characters that start no token.
pub mod lexer;
/// The parser module builds the abstract syntax tree (AST) from tokens.
///
/// The parser is recursive descent with one function per precedence level.
/// While parsing it records the lexical scopes of the program, which the
/// evaluator later uses to seed runtime frames.
///
/// # Responsibilities
/// - Converts tokens into AST nodes.
/// - Rejects malformed programs with the line of the offending token.
/// - Declares names in their scopes as it meets them.
pub mod parser;
/// A persistent interpreter session.
///
/// Keeps the scopes and the root frame alive between inputs, as the REPL
/// needs.
pub mod session;
/// The value module defines the runtime data types for evaluation.
///
/// Integers, floats, strings, booleans, shared arrays, function closures and
/// the unit value, with their display forms.
pub mod value;
