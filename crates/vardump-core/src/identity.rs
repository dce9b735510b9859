//! Composite identity and the per-build ancestor stack.
//!
//! An [`Identity`] is the allocation address of a composite's shared cell:
//! two structurally identical arrays have different identities, while two
//! handles to the same storage share one. It is used only for structural
//! comparison during a build and is never rendered as a value.

use std::collections::HashSet;

use crate::value::{ArrayStorage, ObjectData, Shared, Value};

/// Opaque handle distinguishing one composite instance from another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identity(usize);

impl Identity {
    /// Identity of an array's backing storage.
    #[must_use]
    pub fn of_array(storage: &Shared<ArrayStorage>) -> Self {
        Identity(std::rc::Rc::as_ptr(storage) as usize)
    }

    /// Identity of an object's backing data.
    #[must_use]
    pub fn of_object(data: &Shared<ObjectData>) -> Self {
        Identity(std::rc::Rc::as_ptr(data) as usize)
    }

    /// Identity of a composite value, `None` for non-composites.
    #[must_use]
    pub fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Arr(cell) => Some(Self::of_array(cell)),
            Value::Obj(cell) => Some(Self::of_object(cell)),
            _ => None,
        }
    }
}

/// Ancestor stack scoped to a single top-level build.
///
/// `enter` returning `false` means the identity is already being expanded
/// somewhere up the current path: the caller must emit a recursion leaf and
/// must not descend. Every successful `enter` is paired with exactly one
/// [`leave`](Self::leave), on every exit path including depth and policy
/// exclusions.
#[derive(Debug, Default)]
pub struct IdentityTracker {
    active: Vec<Identity>,
    seen: HashSet<Identity>,
}

impl IdentityTracker {
    /// Create an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to start expanding `id`. Returns `false` when `id` is an
    /// in-progress ancestor (a cycle).
    pub fn enter(&mut self, id: Identity) -> bool {
        if self.active.contains(&id) {
            return false;
        }
        self.active.push(id);
        self.seen.insert(id);
        true
    }

    /// Finish expanding `id`. Must mirror a successful `enter`.
    pub fn leave(&mut self, id: Identity) {
        debug_assert_eq!(self.active.last(), Some(&id), "unpaired leave");
        self.active.pop();
    }

    /// True while nothing is being expanded.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.active.is_empty()
    }

    /// Current expansion depth (number of in-progress composites).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.active.len()
    }

    /// Whether `id` was fully expanded at some point during this build.
    /// Cross-reference bookkeeping only; not needed for cycle correctness.
    #[must_use]
    pub fn was_seen(&self, id: Identity) -> bool {
        self.seen.contains(&id)
    }

    /// Drain the seen set, leaving the tracker empty.
    pub fn take_seen(&mut self) -> HashSet<Identity> {
        debug_assert!(self.is_idle(), "take_seen during expansion");
        std::mem::take(&mut self.seen)
    }
}
