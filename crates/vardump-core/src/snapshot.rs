//! Snapshot builder: raw value graph in, abstraction tree out.
//!
//! One builder invocation walks the value graph exactly once, consulting
//! the classifier and an [`IdentityTracker`] owned by the invocation (no
//! shared or static state). Scalar leaves are captured as independent
//! copies, so later mutation of caller-owned storage is invisible to the
//! tree. The builder never fails: every failure mode is absorbed into the
//! tree as a terminal node or placeholder leaf.

use log::trace;

use crate::classify::{Refinement, TypeTag, refine_string};
use crate::identity::{Identity, IdentityTracker};
use crate::tree::{AbstractNode, Property, Scalar};
use crate::value::{MapKey, MethodSig, PropertySlot, Value};

/// Per-build policies.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Maximum composite nesting depth; `None` means unlimited.
    pub max_depth: Option<usize>,
    /// Enumerate object method signatures into the tree.
    pub include_methods: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            include_methods: false,
        }
    }
}

impl BuildOptions {
    /// Builder-style depth limit.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Builder-style method enumeration toggle.
    #[must_use]
    pub fn with_methods(mut self, include: bool) -> Self {
        self.include_methods = include;
        self
    }
}

/// Identity-tracking scope for multiple top-level arguments in one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdentityScope {
    /// Each argument gets a fresh tracker: a composite shared between two
    /// arguments expands independently under each.
    #[default]
    PerArgument,
    /// One `seen` set spans the call: a composite already fully expanded
    /// under an earlier sibling collapses to an excluded "already shown"
    /// leaf. Ancestor cycles within an argument are still recursion leaves.
    SharedCall,
}

/// Converts raw values into abstraction trees.
///
/// A builder may be reused across top-level values; its tracker is idle
/// between builds. Under [`IdentityScope::SharedCall`] the identities seen
/// by earlier builds persist and suppress re-expansion.
#[derive(Debug)]
pub struct SnapshotBuilder {
    opts: BuildOptions,
    tracker: IdentityTracker,
    prior_seen: std::collections::HashSet<Identity>,
    shared_scope: bool,
}

impl SnapshotBuilder {
    /// Create a builder with the given options (per-argument scope).
    #[must_use]
    pub fn new(opts: BuildOptions) -> Self {
        Self {
            opts,
            tracker: IdentityTracker::new(),
            prior_seen: std::collections::HashSet::new(),
            shared_scope: false,
        }
    }

    /// Build one tree from one raw value.
    pub fn build(&mut self, value: &Value) -> AbstractNode {
        debug_assert!(self.tracker.is_idle(), "build started mid-expansion");
        let node = self.node(value, self.opts.max_depth);
        debug_assert!(self.tracker.is_idle(), "unbalanced enter/leave");
        if self.shared_scope {
            self.prior_seen.extend(self.tracker.take_seen());
        } else {
            self.tracker = IdentityTracker::new();
        }
        node
    }

    /// Build one tree per value under the chosen identity scope.
    pub fn build_group(
        values: &[Value],
        opts: &BuildOptions,
        scope: IdentityScope,
    ) -> Vec<AbstractNode> {
        trace!(
            "abstracting {} value(s), scope {scope:?}, depth {:?}",
            values.len(),
            opts.max_depth
        );
        let mut builder = Self::new(opts.clone());
        builder.shared_scope = scope == IdentityScope::SharedCall;
        values.iter().map(|v| builder.build(v)).collect()
    }

    fn node(&mut self, value: &Value, budget: Option<usize>) -> AbstractNode {
        match value {
            Value::Null => AbstractNode::scalar(TypeTag::Null, Scalar::Null),
            Value::Undefined => AbstractNode::scalar(TypeTag::Undefined, Scalar::Null),
            Value::Bool(b) => AbstractNode::scalar(TypeTag::Bool, Scalar::Bool(*b)),
            Value::Int(i) => AbstractNode::scalar(TypeTag::Int, Scalar::Int(*i)),
            Value::Float(x) => AbstractNode::scalar(TypeTag::Float, Scalar::Float(*x)),
            Value::Str(cell) => self.string_leaf(&cell.borrow()),
            Value::Callable(c) => AbstractNode::callable(c.clone()),
            // Resources are opaque: no expansion, no identity, label only.
            Value::Resource(r) => AbstractNode::resource(r.label()),
            // Already-abstracted input passes through untouched; its own
            // recursion markers stay exactly as first built.
            Value::Abstracted(node) => (**node).clone(),
            Value::Arr(cell) => {
                let id = Identity::of_array(cell);
                if self.shared_scope && self.prior_seen.contains(&id) {
                    return AbstractNode::excluded(
                        TypeTag::Arr,
                        Some("array (already shown)".to_owned()),
                    );
                }
                if !self.tracker.enter(id) {
                    return AbstractNode::recursion(TypeTag::Arr, None);
                }
                let node = if budget == Some(0) {
                    AbstractNode::excluded(TypeTag::Arr, Some("array".to_owned()))
                } else {
                    let storage = cell.borrow();
                    let mut entries = Vec::with_capacity(storage.len());
                    for (key, child) in storage.entries() {
                        entries.push((key.clone(), self.node(child, next_budget(budget))));
                    }
                    AbstractNode::array(entries, id)
                };
                self.tracker.leave(id);
                node
            }
            Value::Obj(cell) => {
                let id = Identity::of_object(cell);
                let class_name = cell.borrow().class_name().to_owned();
                if self.shared_scope && self.prior_seen.contains(&id) {
                    return AbstractNode::excluded(
                        TypeTag::Obj,
                        Some(format!("{class_name} (already shown)")),
                    );
                }
                if !self.tracker.enter(id) {
                    return AbstractNode::recursion(TypeTag::Obj, Some(class_name));
                }
                let data = cell.borrow();
                let node = if data.is_opaque() || budget == Some(0) {
                    AbstractNode::excluded(TypeTag::Obj, Some(class_name))
                } else {
                    let mut properties = Vec::with_capacity(data.properties().len());
                    for (name, visibility, slot) in data.properties() {
                        let child = match slot {
                            PropertySlot::Value(v) => self.node(v, next_budget(budget)),
                            // A failing property read surfaces as a
                            // placeholder on that node only.
                            PropertySlot::Unreadable(reason) => AbstractNode::scalar(
                                TypeTag::Str,
                                Scalar::Str(format!("(unreadable: {reason})")),
                            ),
                        };
                        properties.push(Property {
                            name: name.clone(),
                            visibility: *visibility,
                            node: child,
                        });
                    }
                    let methods = if self.opts.include_methods {
                        data.methods().iter().map(MethodSig::signature).collect()
                    } else {
                        Vec::new()
                    };
                    AbstractNode::object(class_name, properties, methods, id)
                };
                drop(data);
                self.tracker.leave(id);
                node
            }
        }
    }

    fn string_leaf(&self, text: &str) -> AbstractNode {
        let refinement = refine_string(text);
        let decoded = if refinement == Some(Refinement::JsonString) {
            decode_json(text)
        } else {
            None
        };
        AbstractNode::string(text.to_owned(), refinement, decoded)
    }
}

fn next_budget(budget: Option<usize>) -> Option<usize> {
    budget.map(|d| d.saturating_sub(1))
}

/// Decode a json-string into a side tree for pretty-printing. JSON data is
/// acyclic, so no identity tracking applies.
fn decode_json(text: &str) -> Option<Box<AbstractNode>> {
    let parsed: serde_json::Value = serde_json::from_str(text).ok()?;
    Some(Box::new(json_node(&parsed)))
}

fn json_node(value: &serde_json::Value) -> AbstractNode {
    match value {
        serde_json::Value::Null => AbstractNode::scalar(TypeTag::Null, Scalar::Null),
        serde_json::Value::Bool(b) => AbstractNode::scalar(TypeTag::Bool, Scalar::Bool(*b)),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                AbstractNode::scalar(TypeTag::Int, Scalar::Int(i))
            } else {
                AbstractNode::scalar(TypeTag::Float, Scalar::Float(n.as_f64().unwrap_or(f64::NAN)))
            }
        }
        serde_json::Value::String(s) => AbstractNode::string(s.clone(), None, None),
        serde_json::Value::Array(items) => {
            let entries = items
                .iter()
                .enumerate()
                .map(|(i, item)| (MapKey::Int(i as i64), json_node(item)))
                .collect();
            AbstractNode::decoded_array(entries)
        }
        serde_json::Value::Object(map) => {
            let entries = map
                .iter()
                .map(|(k, v)| (MapKey::Str(k.clone()), json_node(v)))
                .collect();
            AbstractNode::decoded_array(entries)
        }
    }
}

/// Build one tree with default per-argument scope. Convenience entry.
#[must_use]
pub fn build(value: &Value, opts: &BuildOptions) -> AbstractNode {
    SnapshotBuilder::new(opts.clone()).build(value)
}
