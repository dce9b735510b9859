//! Value-abstraction engine for the vardump debugging console.
//!
//! This crate is the engine every output format sits on top of:
//!
//! - [`Value`] — the raw, possibly self-referential value graph handed to
//!   a logging call (shared cells for strings and composites)
//! - [`classify`] — pure, total type classification
//! - [`IdentityTracker`] — per-build ancestor stack for cycle detection
//! - [`SnapshotBuilder`] — walks the graph exactly once and produces an
//!   [`AbstractNode`] tree
//! - [`AbstractNode`] — the immutable, acyclic, renderer-agnostic tree
//!
//! # Guarantees
//!
//! - **Termination**: any cycle in the input collapses to a terminal
//!   recursion marker; the builder never overflows the stack.
//! - **Snapshot isolation**: scalar leaves are value copies; mutating the
//!   source after a build changes nothing already captured.
//! - **No failure**: builds absorb per-node problems (unreadable
//!   properties, exhausted depth) into the tree instead of returning
//!   errors, so logging can never crash the host.

#![forbid(unsafe_code)]

mod classify;
mod identity;
mod snapshot;
mod tree;
mod value;

pub use classify::{Classification, Refinement, TypeTag, classify, refine_string};
pub use identity::{Identity, IdentityTracker};
pub use snapshot::{BuildOptions, IdentityScope, SnapshotBuilder, build};
pub use tree::{AbstractNode, Children, Property, Scalar};
pub use value::{
    ArrayStorage, CallableRef, MapKey, MethodSig, ObjectData, PropertySlot, ResourceHandle,
    Shared, Value, Visibility, shared,
};
