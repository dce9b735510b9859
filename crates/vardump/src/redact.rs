//! Redaction post-processing.
//!
//! Collectors feed sensitive structures (request bodies, session data)
//! through the same ingress as everything else; this pass lets them mask
//! selected content before rendering. Because a buffered tree may already
//! be shared with other readers, redaction never mutates: it returns a new
//! tree with masked string leaves, keyed by the originating property or
//! array-key name.

use vardump_core::{AbstractNode, Children, Property, Scalar, TypeTag};

/// Replacement text for masked string leaves.
pub const REDACTED_MASK: &str = "********";

/// Produce a copy of `tree` with string leaves under matching key or
/// property names replaced by [`REDACTED_MASK`]. Matching is
/// case-insensitive on the exact name; a matching composite key masks
/// every string leaf beneath it. The input tree is untouched.
#[must_use]
pub fn redact(tree: &AbstractNode, keys: &[&str]) -> AbstractNode {
    walk(tree, keys, false)
}

fn walk(node: &AbstractNode, keys: &[&str], mask: bool) -> AbstractNode {
    if mask && node.tag == TypeTag::Str && node.value.is_some() {
        return masked_leaf(node);
    }

    let children = match &node.children {
        Children::None => Children::None,
        Children::Entries(entries) => Children::Entries(
            entries
                .iter()
                .map(|(key, child)| {
                    let hit = mask || matches(keys, &key.to_string());
                    (key.clone(), walk(child, keys, hit))
                })
                .collect(),
        ),
        Children::Properties(props) => Children::Properties(
            props
                .iter()
                .map(|prop| Property {
                    name: prop.name.clone(),
                    visibility: prop.visibility,
                    node: walk(&prop.node, keys, mask || matches(keys, &prop.name)),
                })
                .collect(),
        ),
    };

    AbstractNode {
        children,
        ..node.clone()
    }
}

fn matches(keys: &[&str], name: &str) -> bool {
    keys.iter().any(|key| key.eq_ignore_ascii_case(name))
}

/// A masked leaf keeps its string tag but loses refinement and the side
/// decode; redacted content must not leak through either.
fn masked_leaf(node: &AbstractNode) -> AbstractNode {
    AbstractNode {
        refinement: None,
        value: Some(Scalar::Str(REDACTED_MASK.to_owned())),
        decoded: None,
        ..node.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vardump_core::{
        ArrayStorage, BuildOptions, ObjectData, Value, Visibility, build, shared,
    };

    fn login_tree() -> AbstractNode {
        let mut form = ArrayStorage::new();
        form.insert("user", Value::string("bob"));
        form.insert("password", Value::string("hunter2"));
        build(&Value::Arr(shared(form)), &BuildOptions::default())
    }

    fn leaf_text(node: &AbstractNode, index: usize) -> String {
        match &node.children {
            Children::Entries(entries) => match &entries[index].1.value {
                Some(Scalar::Str(s)) => s.clone(),
                other => panic!("expected string, got {other:?}"),
            },
            other => panic!("expected entries, got {other:?}"),
        }
    }

    #[test]
    fn masks_matching_key_case_insensitively() {
        let tree = login_tree();
        let redacted = redact(&tree, &["PASSWORD"]);
        assert_eq!(leaf_text(&redacted, 0), "bob");
        assert_eq!(leaf_text(&redacted, 1), REDACTED_MASK);
    }

    #[test]
    fn input_tree_is_untouched() {
        let tree = login_tree();
        let before = tree.clone();
        let _ = redact(&tree, &["password"]);
        assert_eq!(tree, before);
    }

    #[test]
    fn matching_composite_key_masks_nested_strings() {
        let mut secrets = ArrayStorage::new();
        secrets.insert("token", Value::string("abc"));
        let mut root = ArrayStorage::new();
        root.insert("credentials", Value::Arr(shared(secrets)));
        root.insert("count", Value::Int(2));
        let tree = build(&Value::Arr(shared(root)), &BuildOptions::default());

        let redacted = redact(&tree, &["credentials"]);
        match &redacted.children {
            Children::Entries(entries) => {
                assert_eq!(leaf_text(&entries[0].1, 0), REDACTED_MASK);
                // Non-string leaves pass through even under a mask.
                assert_eq!(entries[1].1.value, Some(Scalar::Int(2)));
            }
            other => panic!("expected entries, got {other:?}"),
        }
    }

    #[test]
    fn masks_object_properties_by_name() {
        let value = Value::object(
            ObjectData::new("Session")
                .with_property("id", Visibility::Public, Value::Int(9))
                .with_property("secret", Visibility::Private, Value::string("s3cr3t")),
        );
        let tree = build(&value, &BuildOptions::default());
        let redacted = redact(&tree, &["secret"]);

        match &redacted.children {
            Children::Properties(props) => {
                assert_eq!(
                    props[1].node.value,
                    Some(Scalar::Str(REDACTED_MASK.to_owned()))
                );
            }
            other => panic!("expected properties, got {other:?}"),
        }
    }

    #[test]
    fn redacted_json_string_loses_its_decode() {
        let mut form = ArrayStorage::new();
        form.insert("payload", Value::string(r#"{"card": "4111"}"#));
        let tree = build(&Value::Arr(shared(form)), &BuildOptions::default());

        let redacted = redact(&tree, &["payload"]);
        match &redacted.children {
            Children::Entries(entries) => {
                assert!(entries[0].1.decoded.is_none());
                assert!(entries[0].1.refinement.is_none());
            }
            other => panic!("expected entries, got {other:?}"),
        }
    }
}
