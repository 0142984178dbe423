/// Shared, mutable arrays.
///
/// Defines `ArrayRef`, the handle behind `Value::Array`. Copies of the handle
/// share one underlying sequence, so mutation through any binding is visible
/// through all of them.
pub mod array;

/// The runtime value type and its textual form.
pub mod core;
