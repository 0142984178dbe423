use std::{cell::RefCell, collections::VecDeque, fmt, rc::Rc};

use crate::{
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, value::core::Value},
};

/// A reference-shared, double-ended, indexable sequence of values.
///
/// Cloning an `ArrayRef` clones the handle, never the elements.
///
/// # Example
/// ```
/// use calci::interpreter::value::{array::ArrayRef, core::Value};
///
/// let a = ArrayRef::from(vec![Value::Integer(1), Value::Integer(2)]);
/// let b = a.clone();
/// b.push_front(Value::Integer(0));
///
/// assert_eq!(a.len(), 3);
/// assert_eq!(a.to_string(), "[0, 1, 2]");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ArrayRef(Rc<RefCell<VecDeque<Value>>>);

impl From<Vec<Value>> for ArrayRef {
    fn from(values: Vec<Value>) -> Self {
        Self(Rc::new(RefCell::new(VecDeque::from(values))))
    }
}

impl ArrayRef {
    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Whether both handles refer to the same array.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Identity of the shared storage, equal for every handle to one array.
    #[must_use]
    pub fn id(&self) -> usize {
        Rc::as_ptr(&self.0).addr()
    }

    /// Number of live handles to this array.
    #[must_use]
    pub fn handles(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    /// Calls `f` on each element in order, without copying them.
    pub fn for_each(&self, mut f: impl FnMut(&Value)) {
        for value in self.0.borrow().iter() {
            f(value);
        }
    }

    /// A copy of the current elements.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Value> {
        self.0.borrow().iter().cloned().collect()
    }

    pub fn push_front(&self, value: Value) {
        self.0.borrow_mut().push_front(value);
    }

    pub fn push_back(&self, value: Value) {
        self.0.borrow_mut().push_back(value);
    }

    /// Removes and returns the first element.
    ///
    /// # Errors
    /// `EmptyContainer` if the array is empty.
    pub fn pop_front(&self, line: usize) -> EvalResult<Value> {
        self.0
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| RuntimeError::EmptyContainer { method: "PopFront".to_string(),
                                                          line })
    }

    /// Removes and returns the last element.
    ///
    /// # Errors
    /// `EmptyContainer` if the array is empty.
    pub fn pop_back(&self, line: usize) -> EvalResult<Value> {
        self.0
            .borrow_mut()
            .pop_back()
            .ok_or_else(|| RuntimeError::EmptyContainer { method: "PopBack".to_string(),
                                                          line })
    }

    /// Reads the element at `index`.
    ///
    /// # Errors
    /// `IndexOutOfRange` unless `0 <= index < len`.
    pub fn get(&self, index: i64, line: usize) -> EvalResult<Value> {
        let items = self.0.borrow();
        let position = checked_position(index, items.len(), line)?;
        Ok(items[position].clone())
    }

    /// Replaces the element at `index`.
    ///
    /// # Errors
    /// `IndexOutOfRange` unless `0 <= index < len`.
    pub fn set(&self, index: i64, value: Value, line: usize) -> EvalResult<()> {
        let mut items = self.0.borrow_mut();
        let position = checked_position(index, items.len(), line)?;
        items[position] = value;
        Ok(())
    }

    /// Inserts `value` before position `index`, shifting later elements
    /// back. `index == len` appends.
    ///
    /// # Errors
    /// `IndexOutOfRange` unless `0 <= index <= len`.
    pub fn insert(&self, index: i64, value: Value, line: usize) -> EvalResult<()> {
        let mut items = self.0.borrow_mut();
        let len = items.len();
        match usize::try_from(index) {
            Ok(position) if position <= len => {
                items.insert(position, value);
                Ok(())
            },
            _ => Err(RuntimeError::IndexOutOfRange { index, len, line }),
        }
    }

    /// Removes and returns the element at `index`, shifting later elements
    /// forward.
    ///
    /// # Errors
    /// `IndexOutOfRange` unless `0 <= index < len`.
    pub fn remove(&self, index: i64, line: usize) -> EvalResult<Value> {
        let mut items = self.0.borrow_mut();
        let position = checked_position(index, items.len(), line)?;
        items.remove(position)
             .ok_or(RuntimeError::IndexOutOfRange { index,
                                                    len: items.len(),
                                                    line })
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// Compares the elements of two arrays pairwise with `item_eq`.
    ///
    /// `pairs` holds the arrays whose comparison is already in progress. A
    /// pair met again inside itself counts as equal, so arrays that contain
    /// themselves compare in finite time.
    pub fn elements_eq<F>(&self, other: &Self, pairs: &mut Vec<(usize, usize)>, item_eq: F) -> bool
        where F: Fn(&Value, &Value, &mut Vec<(usize, usize)>) -> bool
    {
        let pair = (self.id(), other.id());
        if self.ptr_eq(other) || pairs.contains(&pair) {
            return true;
        }
        let (left, right) = (self.to_vec(), other.to_vec());
        if left.len() != right.len() {
            return false;
        }

        pairs.push(pair);
        let equal = left.iter().zip(&right).all(|(a, b)| item_eq(a, b, pairs));
        pairs.pop();
        equal
    }

    /// Writes the array, showing one that is already being written further
    /// out as `[...]`.
    fn render(&self, f: &mut fmt::Formatter<'_>, open: &mut Vec<usize>) -> fmt::Result {
        if open.contains(&self.id()) {
            return write!(f, "[...]");
        }
        open.push(self.id());

        write!(f, "[")?;
        for (i, item) in self.0.borrow().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match item {
                Value::Text(text) => write!(f, "'{text}'")?,
                Value::Array(inner) => inner.render(f, open)?,
                other => write!(f, "{other}")?,
            }
        }
        open.pop();
        write!(f, "]")
    }
}

/// Converts `index` to a position below `bound`.
fn checked_position(index: i64, bound: usize, line: usize) -> EvalResult<usize> {
    usize::try_from(index).ok()
                          .filter(|position| *position < bound)
                          .ok_or(RuntimeError::IndexOutOfRange { index,
                                                                 len: bound,
                                                                 line })
}

impl fmt::Display for ArrayRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, &mut Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(values: &[i64]) -> ArrayRef {
        ArrayRef::from(values.iter().copied().map(Value::Integer).collect::<Vec<_>>())
    }

    #[test]
    fn both_ends_push_and_pop() {
        let array = numbers(&[1, 2, 3, 4, 5]);
        array.push_front(Value::Integer(0));
        assert_eq!(array.to_string(), "[0, 1, 2, 3, 4, 5]");

        assert_eq!(array.pop_back(1).unwrap(), Value::Integer(5));
        assert_eq!(array.pop_front(1).unwrap(), Value::Integer(0));
        assert_eq!(array.to_string(), "[1, 2, 3, 4]");
    }

    #[test]
    fn popping_an_empty_array_fails() {
        let array = numbers(&[]);
        assert!(matches!(array.pop_back(7),
                         Err(RuntimeError::EmptyContainer { line: 7, .. })));
        assert!(matches!(array.pop_front(7),
                         Err(RuntimeError::EmptyContainer { line: 7, .. })));
    }

    #[test]
    fn indices_are_bounds_checked() {
        let array = numbers(&[10, 20]);
        assert_eq!(array.get(1, 1).unwrap(), Value::Integer(20));
        assert!(matches!(array.get(2, 3),
                         Err(RuntimeError::IndexOutOfRange { index: 2, len: 2, line: 3 })));
        assert!(matches!(array.set(-1, Value::Integer(0), 3),
                         Err(RuntimeError::IndexOutOfRange { index: -1, .. })));
    }

    #[test]
    fn insert_accepts_the_end_position() {
        let array = numbers(&[1, 3]);
        array.insert(1, Value::Integer(2), 1).unwrap();
        array.insert(3, Value::Integer(4), 1).unwrap();
        assert_eq!(array.to_string(), "[1, 2, 3, 4]");
        assert!(matches!(array.insert(5, Value::Integer(0), 1),
                         Err(RuntimeError::IndexOutOfRange { index: 5, len: 4, .. })));
    }

    #[test]
    fn remove_shifts_later_elements() {
        let array = numbers(&[1, 2, 3]);
        assert_eq!(array.remove(0, 1).unwrap(), Value::Integer(1));
        assert_eq!(array.to_string(), "[2, 3]");
        array.clear();
        assert!(array.is_empty());
    }

    #[test]
    fn clones_share_storage() {
        let a = numbers(&[1, 2, 3]);
        let b = a.clone();
        b.set(0, Value::Integer(9), 1).unwrap();
        assert_eq!(a.to_string(), "[9, 2, 3]");
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&numbers(&[9, 2, 3])));
    }

    #[test]
    fn arrays_that_contain_themselves_display_once() {
        let array = numbers(&[1]);
        array.push_back(Value::Array(array.clone()));
        assert_eq!(array.len(), 2);
        assert_eq!(array.to_string(), "[1, [...]]");

        let outer = numbers(&[0]);
        outer.push_back(Value::Array(array.clone()));
        outer.push_back(Value::Array(array.clone()));
        assert_eq!(outer.to_string(), "[0, [1, [...]], [1, [...]]]");

        array.clear();
    }
}
