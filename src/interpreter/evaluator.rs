/// Binary operator evaluation logic.
///
/// Handles arithmetic with integer/float promotion, bitwise and logical
/// operators, shifts and comparisons.
pub mod binary;

/// Unary operator evaluation logic.
///
/// Negation, logical not and the `char`/`ascii` conversions.
pub mod unary;

/// Core evaluation logic.
///
/// Contains the evaluator itself, the exhaustive dispatch over AST nodes,
/// bindings, assignment, conditionals and output.
pub mod core;

/// Evaluation of `while` and `for` loops.
///
/// Each loop entry gets one frame seeded from the loop's scope.
pub mod loops;

/// Array literals, indexing and array methods.
pub mod array;

/// Utility functions for evaluation.
///
/// Provides operand checks shared by the evaluation modules.
pub mod utils;

/// Function definition and call.
///
/// Builds closures over the current frame and evaluates calls in a fresh
/// frame nested in the closure's frame.
pub mod function;
