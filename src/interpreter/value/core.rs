use std::{fmt, rc::Rc};

use crate::{
    ast::FunctionDef,
    interpreter::{environment::EnvId, value::array::ArrayRef},
    util::num::format_float,
};

/// A function value: a definition paired with the frame it was defined in.
///
/// Free names in the body resolve through `env`, never through the caller's
/// frame.
#[derive(Debug)]
pub struct Closure {
    /// The parsed definition, shared with the AST.
    pub def: Rc<FunctionDef>,
    /// The frame that was current when the definition was evaluated.
    pub env: EnvId,
}

impl Closure {
    /// `true` for functions defined with `fnrec`.
    #[must_use]
    pub fn is_recursive(&self) -> bool {
        self.def.recursive
    }
}

/// Represents a runtime value in the interpreter.
///
/// Values are cheap to clone: arrays and functions are reference-counted
/// handles, so clones share the underlying data.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// A 64-bit signed integer.
    Integer(i64),
    /// A double precision float.
    Float(f64),
    /// A string.
    Text(String),
    /// A boolean, produced by comparisons and the logical operators.
    Boolean(bool),
    /// A shared, mutable array.
    Array(ArrayRef),
    /// A function closure.
    Function(Rc<Closure>),
    /// The result of statements that yield nothing: declarations,
    /// assignments, loops, output and a false `if` without `else`.
    #[default]
    Unit,
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<Vec<Self>> for Value {
    fn from(v: Vec<Self>) -> Self {
        Self::Array(ArrayRef::from(v))
    }
}

impl Value {
    /// Name of the value's type, for error messages.
    ///
    /// # Example
    /// ```
    /// use calci::interpreter::value::core::Value;
    ///
    /// assert_eq!(Value::Float(1.5).type_name(), "float");
    /// assert_eq!(Value::Unit.type_name(), "unit");
    /// ```
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Text(_) => "string",
            Self::Boolean(_) => "boolean",
            Self::Array(_) => "array",
            Self::Function(_) => "function",
            Self::Unit => "unit",
        }
    }

    #[must_use]
    pub const fn is_unit(&self) -> bool {
        matches!(self, Self::Unit)
    }
}

/// Structural equality, used by tests and by array comparison. Functions are
/// equal only to themselves.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        structural_eq(self, other, &mut Vec::new())
    }
}

fn structural_eq(left: &Value, right: &Value, pairs: &mut Vec<(usize, usize)>) -> bool {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => a == b,
        (Value::Float(a), Value::Float(b)) => a == b,
        (Value::Text(a), Value::Text(b)) => a == b,
        (Value::Boolean(a), Value::Boolean(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => a.elements_eq(b, pairs, structural_eq),
        (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
        (Value::Unit, Value::Unit) => true,
        _ => false,
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{}", format_float(*x)),
            Self::Text(s) => write!(f, "{s}"),
            Self::Boolean(true) => write!(f, "True"),
            Self::Boolean(false) => write!(f, "False"),
            Self::Array(items) => write!(f, "{items}"),
            Self::Function(closure) => write!(f, "<fn {}>", closure.def.name),
            Self::Unit => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_forms() {
        assert_eq!(Value::Integer(-4).to_string(), "-4");
        assert_eq!(Value::Float(3.0).to_string(), "3.0");
        assert_eq!(Value::Boolean(true).to_string(), "True");
        assert_eq!(Value::from("hi").to_string(), "hi");
        assert_eq!(Value::Unit.to_string(), "");
        assert_eq!(Value::from(vec![Value::Integer(1), Value::Float(2.5), Value::from("x")]).to_string(),
                   "[1, 2.5, 'x']");
    }

    #[test]
    fn arrays_compare_by_contents() {
        let a = Value::from(vec![Value::Integer(1), Value::Integer(2)]);
        let b = Value::from(vec![Value::Integer(1), Value::Integer(2)]);
        assert_eq!(a, b);
        assert_ne!(a, Value::from(vec![Value::Integer(1)]));
        assert_ne!(Value::Integer(1), Value::Float(1.0));
    }
}
