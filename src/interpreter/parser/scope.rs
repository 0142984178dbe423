use std::collections::HashMap;

/// Handle of a frame in a [`ScopeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

/// What a scope knows about a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Declaration {
    /// Introduced by `var`.
    Variable,
    /// A function parameter.
    Parameter,
    /// Introduced by `fn` or `fnrec`.
    Function,
    /// Hidden inside the body of a non-recursive function so the body
    /// cannot refer to the function itself.
    Masked,
}

/// One lexical scope: the names declared in it and its enclosing scope.
#[derive(Debug, Default)]
struct ScopeFrame {
    names:  HashMap<String, Declaration>,
    parent: Option<ScopeId>,
}

/// Arena of lexical scopes built while parsing.
///
/// Scopes only track names. The evaluator later creates one runtime frame
/// per entry into each scope and seeds it with these names.
///
/// # Example
/// ```
/// use calci::interpreter::parser::scope::{Declaration, ScopeArena};
///
/// let mut scopes = ScopeArena::new();
/// let root = scopes.root();
/// scopes.declare(root, "x", Declaration::Variable);
///
/// let body = scopes.child(root);
/// assert_eq!(scopes.lookup(body, "x"), Some(Declaration::Variable));
/// assert_eq!(scopes.lookup(root, "y"), None);
/// ```
#[derive(Debug)]
pub struct ScopeArena {
    frames: Vec<ScopeFrame>,
}

impl Default for ScopeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeArena {
    /// Creates an arena holding only the program's root scope.
    #[must_use]
    pub fn new() -> Self {
        Self { frames: vec![ScopeFrame::default()] }
    }

    /// The scope of the program's top level.
    #[must_use]
    pub const fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    /// Opens a new scope nested in `parent`.
    pub fn child(&mut self, parent: ScopeId) -> ScopeId {
        self.frames.push(ScopeFrame { names:  HashMap::new(),
                                      parent: Some(parent), });
        ScopeId(self.frames.len() - 1)
    }

    /// Records `name` in `scope`, replacing any earlier declaration of the
    /// same name there.
    pub fn declare(&mut self, scope: ScopeId, name: &str, declaration: Declaration) {
        if let Some(frame) = self.frames.get_mut(scope.0) {
            frame.names.insert(name.to_string(), declaration);
        }
    }

    /// Resolves `name` from `scope` outward.
    ///
    /// Returns `None` when no scope in the chain declares the name, or when
    /// the nearest declaration masks it.
    #[must_use]
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<Declaration> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let frame = self.frames.get(id.0)?;
            match frame.names.get(name) {
                Some(Declaration::Masked) => return None,
                Some(declaration) => return Some(*declaration),
                None => current = frame.parent,
            }
        }
        None
    }

    /// Names declared directly in `scope`, in no particular order.
    pub fn names(&self, scope: ScopeId) -> impl Iterator<Item = &str> {
        self.frames
            .get(scope.0)
            .into_iter()
            .flat_map(|frame| frame.names.keys().map(String::as_str))
    }

    /// Number of scopes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always `false`: the root scope exists from construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_walks_outward() {
        let mut scopes = ScopeArena::new();
        let root = scopes.root();
        let outer = scopes.child(root);
        let inner = scopes.child(outer);
        scopes.declare(root, "a", Declaration::Variable);
        scopes.declare(outer, "b", Declaration::Parameter);

        assert_eq!(scopes.lookup(inner, "a"), Some(Declaration::Variable));
        assert_eq!(scopes.lookup(inner, "b"), Some(Declaration::Parameter));
        assert_eq!(scopes.lookup(root, "b"), None);
    }

    #[test]
    fn masked_names_hide_outer_declarations() {
        let mut scopes = ScopeArena::new();
        let root = scopes.root();
        scopes.declare(root, "f", Declaration::Function);
        let body = scopes.child(root);
        scopes.declare(body, "f", Declaration::Masked);

        assert_eq!(scopes.lookup(body, "f"), None);
        assert!(scopes.names(body).any(|name| name == "f"));
        assert_eq!(scopes.lookup(root, "f"), Some(Declaration::Function));
    }

    #[test]
    fn names_lists_direct_declarations_only() {
        let mut scopes = ScopeArena::new();
        let root = scopes.root();
        scopes.declare(root, "x", Declaration::Variable);
        let child = scopes.child(root);
        scopes.declare(child, "y", Declaration::Variable);
        scopes.declare(child, "z", Declaration::Function);

        let mut names: Vec<&str> = scopes.names(child).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["y", "z"]);
        assert_eq!(scopes.len(), 2);
    }
}
