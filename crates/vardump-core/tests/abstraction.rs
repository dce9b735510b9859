//! Engine-level correctness: termination, identity, snapshot isolation.

use vardump_core::{
    ArrayStorage, BuildOptions, Children, IdentityScope, ObjectData, Scalar, SnapshotBuilder,
    Value, Visibility, build, shared,
};

fn default_build(value: &Value) -> vardump_core::AbstractNode {
    build(value, &BuildOptions::default())
}

#[test]
fn self_referential_array_yields_exactly_one_marker() {
    let cell = shared(ArrayStorage::new());
    cell.borrow_mut().push(Value::string("head"));
    cell.borrow_mut().push(Value::Arr(cell.clone()));

    let tree = default_build(&Value::Arr(cell));
    assert_eq!(tree.recursion_count(), 1);
}

#[test]
fn mutual_cross_reference_yields_one_marker_from_either_root() {
    // A references B, B references A. Built from A: A expands, B expands
    // on first encounter, and only B's edge back to A (now an ancestor)
    // closes as recursion.
    let a = shared(ArrayStorage::new());
    let b = shared(ArrayStorage::new());
    a.borrow_mut().insert("to_b", Value::Arr(b.clone()));
    b.borrow_mut().insert("to_a", Value::Arr(a.clone()));

    let from_a = default_build(&Value::Arr(a.clone()));
    assert_eq!(from_a.recursion_count(), 1);

    let from_b = default_build(&Value::Arr(b));
    assert_eq!(from_b.recursion_count(), 1);

    // And the marker sits exactly where the cycle closes.
    match &from_a.children {
        Children::Entries(entries) => match &entries[0].1.children {
            Children::Entries(inner) => assert!(inner[0].1.is_recursion),
            other => panic!("expected entries, got {other:?}"),
        },
        other => panic!("expected entries, got {other:?}"),
    }
}

#[test]
fn two_distinct_cycles_yield_two_markers() {
    let first = shared(ArrayStorage::new());
    first.borrow_mut().push(Value::Arr(first.clone()));
    let second = shared(ArrayStorage::new());
    second.borrow_mut().push(Value::Arr(second.clone()));

    let root = Value::array_of([Value::Arr(first), Value::Arr(second)]);
    let tree = default_build(&root);
    assert_eq!(tree.recursion_count(), 2);
}

#[test]
fn object_cycle_through_property_terminates() {
    let obj = shared(ObjectData::new("Node"));
    obj.borrow_mut()
        .set_property("next", Visibility::Public, Value::Obj(obj.clone()));

    let tree = default_build(&Value::Obj(obj));
    assert_eq!(tree.recursion_count(), 1);
    match &tree.children {
        Children::Properties(props) => {
            assert!(props[0].node.is_recursion);
            assert_eq!(props[0].node.label.as_deref(), Some("Node"));
        }
        other => panic!("expected properties, got {other:?}"),
    }
}

#[test]
fn snapshot_isolation_against_later_mutation() {
    let status = shared(String::from("success"));
    let mut map = ArrayStorage::new();
    map.insert("status", Value::Str(status.clone()));
    let value = Value::Arr(shared(map));

    let tree = default_build(&value);
    *status.borrow_mut() = String::from("fail");

    match &tree.children {
        Children::Entries(entries) => {
            assert_eq!(entries[0].1.value, Some(Scalar::Str("success".into())));
        }
        other => panic!("expected entries, got {other:?}"),
    }
}

#[test]
fn snapshot_isolation_against_composite_growth() {
    let cell = shared(ArrayStorage::new());
    cell.borrow_mut().push(Value::Int(1));

    let tree = default_build(&Value::Arr(cell.clone()));
    cell.borrow_mut().push(Value::Int(2));

    assert_eq!(tree.children.len(), 1);
}

#[test]
fn separate_builds_of_aliased_composites_each_mark_their_own_cycle() {
    // X is self-referential; Y references X. Two separate top-level builds
    // must produce two markers combined, one per build's own expansion.
    let x = shared(ArrayStorage::new());
    x.borrow_mut().push(Value::Arr(x.clone()));

    let y = shared(ArrayStorage::new());
    y.borrow_mut().insert("x", Value::Arr(x.clone()));

    let tree_x = default_build(&Value::Arr(x));
    let tree_y = default_build(&Value::Arr(y));

    assert_eq!(tree_x.recursion_count() + tree_y.recursion_count(), 2);
}

#[test]
fn per_argument_scope_expands_each_argument_independently() {
    let x = shared(ArrayStorage::new());
    x.borrow_mut().push(Value::Arr(x.clone()));

    let args = [Value::Arr(x.clone()), Value::Arr(x)];
    let trees = SnapshotBuilder::build_group(
        &args,
        &BuildOptions::default(),
        IdentityScope::PerArgument,
    );

    let total: usize = trees.iter().map(vardump_core::AbstractNode::recursion_count).sum();
    assert_eq!(total, 2);
}

#[test]
fn shared_scope_collapses_cross_argument_repeat() {
    let x = shared(ArrayStorage::new());
    x.borrow_mut().push(Value::Int(1));

    let args = [Value::Arr(x.clone()), Value::Arr(x)];
    let trees = SnapshotBuilder::build_group(
        &args,
        &BuildOptions::default(),
        IdentityScope::SharedCall,
    );

    assert_eq!(trees[0].children.len(), 1);
    assert!(trees[1].is_excluded);
    assert!(trees[1].label.as_deref().unwrap_or_default().contains("already shown"));
}

#[test]
fn shared_scope_still_marks_true_cycles() {
    let x = shared(ArrayStorage::new());
    x.borrow_mut().push(Value::Arr(x.clone()));

    let fresh = Value::array_of([Value::Int(9)]);
    let args = [fresh, Value::Arr(x)];
    let trees = SnapshotBuilder::build_group(
        &args,
        &BuildOptions::default(),
        IdentityScope::SharedCall,
    );

    assert_eq!(trees[0].recursion_count(), 0);
    assert_eq!(trees[1].recursion_count(), 1);
}

#[test]
fn deep_nesting_respects_budget_without_unbalanced_state() {
    // Build a 64-deep chain with a cycle at the bottom and a tight budget;
    // a reused builder proves enter/leave stayed paired.
    let bottom = shared(ArrayStorage::new());
    bottom.borrow_mut().push(Value::Arr(bottom.clone()));

    let mut chain = Value::Arr(bottom);
    for _ in 0..64 {
        chain = Value::array_of([chain]);
    }

    let mut builder = SnapshotBuilder::new(BuildOptions::default().with_max_depth(8));
    let first = builder.build(&chain);
    assert_eq!(first.recursion_count(), 0);

    // Second build on the same builder still works and still terminates.
    let second = builder.build(&chain);
    assert_eq!(first, second);
}

#[test]
fn resource_inside_composite_stays_opaque() {
    let value = Value::array_of([Value::Resource(vardump_core::ResourceHandle::new(
        "socket", 12,
    ))]);
    let tree = default_build(&value);
    match &tree.children {
        Children::Entries(entries) => {
            let leaf = &entries[0].1;
            assert_eq!(leaf.tag, vardump_core::TypeTag::Resource);
            assert!(leaf.is_terminal());
            assert_eq!(leaf.label.as_deref(), Some("socket #12"));
        }
        other => panic!("expected entries, got {other:?}"),
    }
}

#[test]
fn trees_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<vardump_core::AbstractNode>();
}
