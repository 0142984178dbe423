use std::{
    collections::{HashMap, HashSet},
    rc::Rc,
};

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::{
            array::ArrayRef,
            core::{Closure, Value},
        },
    },
};

/// Handle of a frame in an [`Environment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnvId(usize);

impl std::fmt::Display for EnvId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Storage for one name in a frame.
#[derive(Debug, Clone)]
pub enum Slot {
    /// Declared in the frame's scope, but its declaration has not run.
    Uninitialized,
    /// Holds a value.
    Bound(Value),
}

#[derive(Debug)]
struct Frame {
    slots:    HashMap<String, Slot>,
    parent:   Option<EnvId>,
    /// Set once a closure has captured this frame.
    captured: bool,
    /// Set once the call or loop that created the frame has finished.
    released: bool,
}

impl Frame {
    fn new(parent: Option<EnvId>) -> Self {
        Self { slots: HashMap::new(),
               parent,
               captured: false,
               released: false }
    }

    fn values(&self) -> impl Iterator<Item = &Value> {
        self.slots.values().filter_map(|slot| match slot {
                               Slot::Bound(value) => Some(value),
                               Slot::Uninitialized => None,
                           })
    }
}

/// Arena of runtime frames.
///
/// Every frame mirrors one entry into a static scope: the program itself, a
/// function call or a loop. Lookups walk from a frame to its parents, and the
/// first frame that holds a slot for the name decides the result, so a name
/// declared later in an inner scope shadows outer bindings even before its
/// declaration has run.
///
/// A frame is handed back with [`Environment::release`] when its call or
/// loop ends. Frames no closure captured are freed on the spot. Captured
/// frames stay until no closure that can still be reached needs them, and
/// their slots are then reused by later frames.
///
/// # Example
/// ```
/// use calci::interpreter::{environment::Environment, value::core::Value};
///
/// let mut env = Environment::new();
/// let root = env.root();
/// env.define(root, "x", Value::Integer(1));
///
/// let inner = env.child(root);
/// env.assign(inner, "x", Value::Integer(2), 1).unwrap();
/// assert_eq!(env.get(root, "x", 1).unwrap(), Value::Integer(2));
///
/// env.release(inner);
/// assert_eq!(env.len(), 1);
/// ```
#[derive(Debug)]
pub struct Environment {
    frames:   Vec<Option<Frame>>,
    /// Indices of freed entries in `frames`.
    free:     Vec<usize>,
    /// Released frames that are still allocated.
    retained: usize,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// Creates an environment holding only the root frame.
    #[must_use]
    pub fn new() -> Self {
        let mut root = Frame::new(None);
        root.captured = true;
        Self { frames:   vec![Some(root)],
               free:     Vec::new(),
               retained: 0, }
    }

    /// The frame of the program's top level.
    #[must_use]
    pub const fn root(&self) -> EnvId {
        EnvId(0)
    }

    fn frame(&self, id: EnvId) -> Option<&Frame> {
        self.frames.get(id.0).and_then(Option::as_ref)
    }

    fn frame_mut(&mut self, id: EnvId) -> Option<&mut Frame> {
        self.frames.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Creates an empty frame whose parent is `parent`.
    pub fn child(&mut self, parent: EnvId) -> EnvId {
        let frame = Some(Frame::new(Some(parent)));
        if let Some(index) = self.free.pop() {
            self.frames[index] = frame;
            EnvId(index)
        } else {
            self.frames.push(frame);
            EnvId(self.frames.len() - 1)
        }
    }

    /// Adds an uninitialized slot for each name the frame does not hold yet.
    pub fn seed<'n>(&mut self, frame: EnvId, names: impl IntoIterator<Item = &'n str>) {
        if let Some(frame) = self.frame_mut(frame) {
            for name in names {
                frame.slots.entry(name.to_string()).or_insert(Slot::Uninitialized);
            }
        }
    }

    /// Removes the slot for `name` from `frame` if it is still
    /// uninitialized, so that lookups from `frame` reach outer bindings.
    ///
    /// # Returns
    /// Whether a slot was removed.
    pub fn unseed(&mut self, frame: EnvId, name: &str) -> bool {
        let Some(frame) = self.frame_mut(frame) else {
            return false;
        };
        if matches!(frame.slots.get(name), Some(Slot::Uninitialized)) {
            frame.slots.remove(name);
            true
        } else {
            false
        }
    }

    /// Binds `name` in `frame` itself, replacing any earlier binding there.
    pub fn define(&mut self, frame: EnvId, name: &str, value: Value) {
        if let Some(frame) = self.frame_mut(frame) {
            frame.slots.insert(name.to_string(), Slot::Bound(value));
        }
    }

    /// Finds the nearest frame, starting at `frame`, that has a slot for
    /// `name`.
    fn resolve(&self, frame: EnvId, name: &str) -> Option<&Slot> {
        let mut current = Some(frame);
        while let Some(id) = current {
            let frame = self.frame(id)?;
            if let Some(slot) = frame.slots.get(name) {
                return Some(slot);
            }
            current = frame.parent;
        }
        None
    }

    /// Reads `name` as seen from `frame`.
    ///
    /// # Errors
    /// `UnboundName` if no frame in the chain has the name, or the nearest
    /// slot is still uninitialized.
    pub fn get(&self, frame: EnvId, name: &str, line: usize) -> EvalResult<Value> {
        match self.resolve(frame, name) {
            Some(Slot::Bound(value)) => Ok(value.clone()),
            Some(Slot::Uninitialized) | None => Err(unbound(name, line)),
        }
    }

    /// Overwrites the nearest binding of `name` as seen from `frame`.
    ///
    /// # Errors
    /// `UnboundName` if no frame in the chain has the name, or the nearest
    /// slot is still uninitialized. Assignment never creates a binding.
    pub fn assign(&mut self, frame: EnvId, name: &str, value: Value, line: usize) -> EvalResult<()> {
        let mut current = Some(frame);
        while let Some(id) = current {
            let frame = self.frame_mut(id).ok_or_else(|| unbound(name, line))?;
            match frame.slots.get_mut(name) {
                Some(slot) if matches!(slot, Slot::Bound(_)) => {
                    *slot = Slot::Bound(value);
                    return Ok(());
                },
                Some(_) => break,
                None => current = frame.parent,
            }
        }
        Err(unbound(name, line))
    }

    /// Marks `frame` as reachable from a closure.
    pub fn capture(&mut self, frame: EnvId) {
        if let Some(frame) = self.frame_mut(frame) {
            frame.captured = true;
        }
    }

    /// Hands back the frame of a call or loop that has finished.
    ///
    /// An uncaptured frame is freed at once while no other released frame
    /// is still allocated. Otherwise the released frames are collected:
    /// those still needed by a reachable closure, or by a frame in use,
    /// stay and the rest are freed.
    pub fn release(&mut self, frame: EnvId) {
        let captured = match self.frame_mut(frame) {
            Some(released) => {
                released.released = true;
                released.captured
            },
            None => return,
        };
        if !captured && self.retained == 0 {
            self.free_frame(frame);
            return;
        }
        self.retained += 1;
        self.collect();
    }

    fn free_frame(&mut self, id: EnvId) -> Option<Frame> {
        let frame = self.frames.get_mut(id.0).and_then(Option::take)?;
        self.free.push(id.0);
        Some(frame)
    }

    /// Frees every released frame that nothing live can reach.
    ///
    /// Frames still in use are roots, and so are closures and arrays the
    /// evaluator holds outside any frame. Those are found by comparing each
    /// handle count with the handles the frames themselves hold. A released
    /// frame stays if a root reaches it through a closure, an array or a
    /// parent link.
    fn collect(&mut self) {
        let mut census = Census::default();
        for frame in self.frames.iter().flatten() {
            frame.values().for_each(|value| census.tally(value));
        }

        let mut visited = HashSet::new();
        let mut pending = census.held_outside(&mut visited);
        drop(census);
        for frame in self.frames.iter().flatten().filter(|frame| !frame.released) {
            pending.extend(frame.parent);
            for value in frame.values() {
                reach(value, &mut visited, &mut pending);
            }
        }

        let mut live = HashSet::new();
        while let Some(id) = pending.pop() {
            let Some(frame) = self.frame(id).filter(|frame| frame.released) else {
                continue;
            };
            if live.insert(id) {
                pending.extend(frame.parent);
                for value in frame.values() {
                    reach(value, &mut visited, &mut pending);
                }
            }
        }

        let released = self.frames
                           .iter()
                           .enumerate()
                           .filter(|(_, frame)| frame.as_ref().is_some_and(|frame| frame.released))
                           .map(|(index, _)| EnvId(index))
                           .collect::<Vec<_>>();
        let freed = released.iter()
                            .filter(|id| !live.contains(*id))
                            .filter_map(|id| self.free_frame(*id))
                            .count();
        self.retained = released.len() - freed;
        tracing::trace!(freed, retained = self.retained, "collected frames");
    }

    /// Number of allocated frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len() - self.free.len()
    }

    /// Always `false`: the root frame exists from construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A shared handle found in the frames, with its total handle count and how
/// many of those handles the frames hold.
struct Tally<T> {
    handle:  T,
    handles: usize,
    seen:    usize,
}

/// Closures and arrays held by frames, keyed by identity.
#[derive(Default)]
struct Census {
    closures: HashMap<usize, Tally<Rc<Closure>>>,
    arrays:   HashMap<usize, Tally<ArrayRef>>,
}

impl Census {
    fn tally(&mut self, value: &Value) {
        match value {
            Value::Function(closure) => {
                self.closures
                    .entry(Rc::as_ptr(closure).addr())
                    .or_insert_with(|| Tally { handles: Rc::strong_count(closure),
                                               handle:  Rc::clone(closure),
                                               seen:    0, })
                    .seen += 1;
            },
            Value::Array(array) => {
                let first = !self.arrays.contains_key(&array.id());
                self.arrays
                    .entry(array.id())
                    .or_insert_with(|| Tally { handles: array.handles(),
                                               handle:  array.clone(),
                                               seen:    0, })
                    .seen += 1;
                if first {
                    array.for_each(|item| self.tally(item));
                }
            },
            _ => {},
        }
    }

    /// Frames reachable from the counted values that are also held
    /// somewhere else.
    fn held_outside(&self, visited: &mut HashSet<usize>) -> Vec<EnvId> {
        let mut pending = self.closures
                              .values()
                              .filter(|tally| tally.handles > tally.seen)
                              .map(|tally| tally.handle.env)
                              .collect::<Vec<_>>();
        for tally in self.arrays.values().filter(|tally| tally.handles > tally.seen) {
            reach(&Value::Array(tally.handle.clone()), visited, &mut pending);
        }
        pending
    }
}

/// Pushes the frame of every closure reachable from `value`.
fn reach(value: &Value, visited: &mut HashSet<usize>, pending: &mut Vec<EnvId>) {
    match value {
        Value::Function(closure) => pending.push(closure.env),
        Value::Array(array) => {
            if visited.insert(array.id()) {
                array.for_each(|item| reach(item, visited, pending));
            }
        },
        _ => {},
    }
}

fn unbound(name: &str, line: usize) -> RuntimeError {
    RuntimeError::UnboundName { name: name.to_string(),
                                line }
}
