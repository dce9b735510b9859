//! The abstraction tree: the renderer-agnostic output of a build.
//!
//! An [`AbstractNode`] is immutable once built. It owns independent copies
//! of every scalar leaf (snapshot semantics), is acyclic (cycle-closing
//! edges are terminal [`is_recursion`](AbstractNode::is_recursion) leaves),
//! and a deterministic child order equal to the source's iteration order at
//! snapshot time. It serializes directly, which is what the wire renderer
//! ships to devtools extensions.

use serde::Serialize;

use crate::classify::{Refinement, TypeTag};
use crate::identity::Identity;
use crate::value::{CallableRef, MapKey, Visibility};

/// Captured scalar content. Always a value copy, never a reference to
/// caller-owned storage.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

/// Children of a composite node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Children {
    /// Leaf node.
    None,
    /// Array entries: `(key, node)` pairs, keys unique, order preserved.
    Entries(Vec<(MapKey, AbstractNode)>),
    /// Object properties in declaration order.
    Properties(Vec<Property>),
}

impl Children {
    /// True for leaf nodes.
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Children::None)
    }

    /// Number of direct children.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Children::None => 0,
            Children::Entries(entries) => entries.len(),
            Children::Properties(props) => props.len(),
        }
    }

    /// True when there are no direct children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One object property in the tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    pub name: String,
    pub visibility: Visibility,
    pub node: AbstractNode,
}

/// A node of the abstraction tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AbstractNode {
    /// Primary type tag.
    #[serde(rename = "type")]
    pub tag: TypeTag,
    /// Optional secondary tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refinement: Option<Refinement>,
    /// Captured literal for scalars; absent for composites.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Scalar>,
    /// Children for composites.
    #[serde(skip_serializing_if = "Children::is_none")]
    pub children: Children,
    /// Terminal cycle-closing reference to an in-progress ancestor.
    #[serde(skip_serializing_if = "is_false")]
    pub is_recursion: bool,
    /// Expansion intentionally skipped (depth limit, do-not-inspect,
    /// already shown in a shared-scope call).
    #[serde(skip_serializing_if = "is_false")]
    pub is_excluded: bool,
    /// Classname / resource kind / exclusion label, where one applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Two-part identity of a callable leaf.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callable: Option<CallableRef>,
    /// Method signatures of an object, when enumeration is enabled.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<String>,
    /// Side decode of a json-string, used only for pretty-printing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decoded: Option<Box<AbstractNode>>,
    /// Structural identity of the source composite. Never rendered.
    #[serde(skip)]
    pub identity: Option<Identity>,
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

impl AbstractNode {
    fn leaf(tag: TypeTag) -> Self {
        Self {
            tag,
            refinement: None,
            value: None,
            children: Children::None,
            is_recursion: false,
            is_excluded: false,
            label: None,
            callable: None,
            methods: Vec::new(),
            decoded: None,
            identity: None,
        }
    }

    /// A scalar leaf carrying a captured literal.
    #[must_use]
    pub fn scalar(tag: TypeTag, value: Scalar) -> Self {
        Self {
            value: Some(value),
            ..Self::leaf(tag)
        }
    }

    /// A captured string leaf with optional refinement and side decode.
    #[must_use]
    pub fn string(
        text: String,
        refinement: Option<Refinement>,
        decoded: Option<Box<AbstractNode>>,
    ) -> Self {
        Self {
            refinement,
            value: Some(Scalar::Str(text)),
            decoded,
            ..Self::leaf(TypeTag::Str)
        }
    }

    /// A callable leaf.
    #[must_use]
    pub fn callable(reference: CallableRef) -> Self {
        Self {
            callable: Some(reference),
            ..Self::leaf(TypeTag::Callable)
        }
    }

    /// An opaque resource leaf labeled with its kind.
    #[must_use]
    pub fn resource(label: String) -> Self {
        Self {
            label: Some(label),
            ..Self::leaf(TypeTag::Resource)
        }
    }

    /// A terminal cycle marker for an in-progress ancestor.
    #[must_use]
    pub fn recursion(tag: TypeTag, label: Option<String>) -> Self {
        Self {
            is_recursion: true,
            label,
            ..Self::leaf(tag)
        }
    }

    /// A terminal not-inspected marker.
    #[must_use]
    pub fn excluded(tag: TypeTag, label: Option<String>) -> Self {
        Self {
            is_excluded: true,
            label,
            ..Self::leaf(tag)
        }
    }

    /// An expanded array node.
    #[must_use]
    pub fn array(entries: Vec<(MapKey, AbstractNode)>, identity: Identity) -> Self {
        Self {
            children: Children::Entries(entries),
            identity: Some(identity),
            ..Self::leaf(TypeTag::Arr)
        }
    }

    /// An array-shaped composite with no source identity, as produced by
    /// json-string side decodes.
    #[must_use]
    pub fn decoded_array(entries: Vec<(MapKey, AbstractNode)>) -> Self {
        Self {
            children: Children::Entries(entries),
            ..Self::leaf(TypeTag::Arr)
        }
    }

    /// An expanded object node.
    #[must_use]
    pub fn object(
        class_name: String,
        properties: Vec<Property>,
        methods: Vec<String>,
        identity: Identity,
    ) -> Self {
        Self {
            children: Children::Properties(properties),
            label: Some(class_name),
            methods,
            identity: Some(identity),
            ..Self::leaf(TypeTag::Obj)
        }
    }

    /// True for nodes that never have children.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.children.is_none()
    }

    /// Count recursion markers in this tree (side decodes excluded).
    #[must_use]
    pub fn recursion_count(&self) -> usize {
        let own = usize::from(self.is_recursion);
        let below: usize = match &self.children {
            Children::None => 0,
            Children::Entries(entries) => {
                entries.iter().map(|(_, n)| n.recursion_count()).sum()
            }
            Children::Properties(props) => {
                props.iter().map(|p| p.node.recursion_count()).sum()
            }
        };
        own + below
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_leaf_is_terminal() {
        let node = AbstractNode::scalar(TypeTag::Int, Scalar::Int(9));
        assert!(node.is_terminal());
        assert!(!node.is_recursion);
        assert!(!node.is_excluded);
        assert_eq!(node.value, Some(Scalar::Int(9)));
    }

    #[test]
    fn recursion_marker_counts_once() {
        let marker = AbstractNode::recursion(TypeTag::Arr, None);
        assert!(marker.is_terminal());
        assert_eq!(marker.recursion_count(), 1);
    }

    #[test]
    fn decoded_array_has_entries_but_no_identity_or_value() {
        let node = AbstractNode::decoded_array(vec![(
            MapKey::Int(0),
            AbstractNode::scalar(TypeTag::Int, Scalar::Int(1)),
        )]);
        assert_eq!(node.tag, TypeTag::Arr);
        assert!(node.identity.is_none());
        assert!(node.value.is_none());
        assert_eq!(node.children.len(), 1);
    }

    #[test]
    fn serialization_skips_absent_fields() {
        let node = AbstractNode::scalar(TypeTag::Int, Scalar::Int(42));
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "integer");
        assert_eq!(json["value"], 42);
        assert!(json.get("isRecursion").is_none());
        assert!(json.get("children").is_none());
        assert!(json.get("label").is_none());
    }

    #[test]
    fn serialization_exposes_recursion_flag() {
        let node = AbstractNode::recursion(TypeTag::Obj, Some("User".into()));
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["isRecursion"], true);
        assert_eq!(json["label"], "User");
    }

    #[test]
    fn scalar_serializes_untagged() {
        assert_eq!(serde_json::to_value(Scalar::Null).unwrap(), serde_json::Value::Null);
        assert_eq!(serde_json::to_value(Scalar::Bool(true)).unwrap(), true);
        assert_eq!(
            serde_json::to_value(Scalar::Str("x".into())).unwrap(),
            "x"
        );
    }
}
