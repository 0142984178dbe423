/// Operator dispatch.
pub mod core;

/// Integer and float arithmetic, and string concatenation.
pub mod scalar;

/// Ordering and equality.
pub mod comparison;

/// Bitwise, shift and logical operators.
pub mod logic;
