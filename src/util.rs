/// Numeric helpers.
///
/// Floored integer division and modulo, float modulo with the sign of the
/// divisor, and the canonical text form of floats.
pub mod num;

/// Host stack growth for deeply nested programs.
pub mod stack;
