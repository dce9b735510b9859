//! Cross-format properties: purity, marker fidelity, resource opacity.

use vardump_core::{
    AbstractNode, ArrayStorage, BuildOptions, MapKey, ObjectData, ResourceHandle, TypeTag, Value,
    Visibility, build, shared,
};
use vardump_render::{Format, RECURSION_MARKER, RenderContext, UNKNOWN_MARKER, render};

const ALL_FORMATS: [Format; 5] = [
    Format::Plain,
    Format::Ansi,
    Format::Markup,
    Format::Wire,
    Format::Table,
];

fn sample_tree() -> vardump_core::AbstractNode {
    let value = Value::array_of([
        Value::Int(1),
        Value::string("two"),
        Value::object(
            ObjectData::new("Row").with_property("ok", Visibility::Public, Value::Bool(true)),
        ),
    ]);
    build(&value, &BuildOptions::default())
}

#[test]
fn rendering_is_idempotent_in_every_format() {
    let tree = sample_tree();
    let ctx = RenderContext::default();
    for format in ALL_FORMATS {
        let first = render(&tree, format, &ctx);
        let second = render(&tree, format, &ctx);
        assert_eq!(first, second, "format {format:?} not pure");
    }
}

#[test]
fn rendering_does_not_mutate_the_tree() {
    let tree = sample_tree();
    let copy = tree.clone();
    let ctx = RenderContext::default();
    for format in ALL_FORMATS {
        let _ = render(&tree, format, &ctx);
    }
    assert_eq!(tree, copy);
}

#[test]
fn recursion_marker_appears_exactly_once_in_text_formats() {
    let cell = shared(ArrayStorage::new());
    cell.borrow_mut().push(Value::Arr(cell.clone()));
    let tree = build(&Value::Arr(cell), &BuildOptions::default());
    let ctx = RenderContext::default();

    for format in [Format::Plain, Format::Ansi, Format::Markup] {
        let out = render(&tree, format, &ctx);
        assert_eq!(
            out.matches(RECURSION_MARKER).count(),
            1,
            "format {format:?}"
        );
    }
}

#[test]
fn resource_stays_opaque_in_every_format() {
    let value = Value::array_of([Value::Resource(ResourceHandle::new("stream", 7))]);
    let tree = build(&value, &BuildOptions::default());
    let ctx = RenderContext::default();

    for format in ALL_FORMATS {
        let out = render(&tree, format, &ctx);
        assert!(
            out.contains("stream #7"),
            "format {format:?} lost the opaque label: {out}"
        );
    }
}

#[test]
fn ansi_output_matches_plain_modulo_escapes() {
    let tree = sample_tree();
    let ctx = RenderContext::default();

    let plain = render(&tree, Format::Plain, &ctx);
    let ansi = render(&tree, Format::Ansi, &ctx);
    let stripped = strip_ansi_escapes::strip_str(&ansi);
    assert_eq!(stripped, plain);
}

#[test]
fn wire_round_trips_through_serde_json() {
    let tree = sample_tree();
    let out = render(&tree, Format::Wire, &RenderContext::default());
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["version"], vardump_render::WIRE_VERSION);
    assert_eq!(parsed["root"]["type"], "array");
}

#[test]
fn excluded_subtree_renders_without_special_casing() {
    let deep = Value::array_of([Value::array_of([Value::array_of([Value::Int(1)])])]);
    let tree = build(&deep, &BuildOptions::default().with_max_depth(2));
    let ctx = RenderContext::default();

    for format in [Format::Plain, Format::Ansi, Format::Markup] {
        let out = render(&tree, format, &ctx);
        assert!(out.contains("not inspected"), "format {format:?}: {out}");
    }
}

// A node shape the builder never produces: the tag promises content the
// node does not carry.
fn hollow(tag: TypeTag) -> AbstractNode {
    AbstractNode {
        is_excluded: false,
        ..AbstractNode::excluded(tag, None)
    }
}

#[test]
fn degenerate_shapes_degrade_to_a_marker_without_aborting() {
    let tree = AbstractNode::decoded_array(vec![
        (MapKey::Int(0), hollow(TypeTag::Str)),
        (MapKey::Int(1), hollow(TypeTag::Callable)),
        (MapKey::Int(2), build(&Value::Int(7), &BuildOptions::default())),
    ]);
    let ctx = RenderContext::default();

    for format in [Format::Plain, Format::Ansi, Format::Markup] {
        let out = render(&tree, format, &ctx);
        assert_eq!(
            out.matches(UNKNOWN_MARKER).count(),
            2,
            "format {format:?}: {out}"
        );
        // The healthy sibling still renders.
        assert!(out.contains('7'), "format {format:?}: {out}");
    }
}

#[test]
fn snapshot_isolation_survives_to_render_time() {
    // Capture "success", mutate to "fail", render must still say
    // "success".
    let status = shared(String::from("success"));
    let mut map = ArrayStorage::new();
    map.insert("status", Value::Str(status.clone()));
    let tree = build(&Value::Arr(shared(map)), &BuildOptions::default());

    *status.borrow_mut() = String::from("fail");

    let out = render(&tree, Format::Plain, &RenderContext::default());
    assert!(out.contains("success"));
    assert!(!out.contains("fail"));
}
