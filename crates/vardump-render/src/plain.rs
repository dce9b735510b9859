//! Plain-text renderer.
//!
//! `var_dump`-flavored output with no styling. The other text renderers
//! follow the same layout; this one is also the fallback when rich output
//! is disabled.

use log::warn;
use vardump_core::{AbstractNode, Children, MapKey, TypeTag};

use crate::context::RenderContext;
use crate::literal::{EXCLUDED_MARKER, RECURSION_MARKER, UNKNOWN_MARKER, literal, timestamp_note};

/// Render a tree to plain text. Pure: same tree and context, same bytes.
#[must_use]
pub fn render(node: &AbstractNode, ctx: &RenderContext) -> String {
    let mut out = String::new();
    write_node(&mut out, node, ctx);
    out
}

fn write_node(out: &mut String, node: &AbstractNode, ctx: &RenderContext) {
    if node.is_recursion {
        out.push_str(RECURSION_MARKER);
        if let Some(label) = &node.label {
            out.push_str(&format!(" ({label})"));
        }
        return;
    }
    if node.is_excluded {
        let label = node.label.clone().unwrap_or_else(|| node.tag.to_string());
        out.push_str(&format!("{label} {EXCLUDED_MARKER}"));
        return;
    }

    match node.tag {
        TypeTag::Null
        | TypeTag::Undefined
        | TypeTag::Bool
        | TypeTag::Int
        | TypeTag::Float
        | TypeTag::Str => match literal(node, ctx) {
            Some(text) => {
                out.push_str(&text);
                if let Some(note) = timestamp_note(node) {
                    out.push_str(&format!(" /* {note} */"));
                }
                if let Some(decoded) = &node.decoded {
                    out.push_str(" json: ");
                    write_node(out, decoded, ctx);
                }
            }
            None => degrade(out, node),
        },
        TypeTag::Callable => match &node.callable {
            Some(c) => match &c.owner {
                Some(owner) => out.push_str(&format!("{owner}::{}", c.name)),
                None => out.push_str(&c.name),
            },
            None => degrade(out, node),
        },
        TypeTag::Resource => {
            let label = node.label.as_deref().unwrap_or("unknown");
            out.push_str(&format!("resource({label})"));
        }
        TypeTag::Arr => write_array(out, node, ctx),
        TypeTag::Obj => write_object(out, node, ctx),
        TypeTag::Abstracted => degrade(out, node),
    }
}

fn write_array(out: &mut String, node: &AbstractNode, ctx: &RenderContext) {
    let Children::Entries(entries) = &node.children else {
        degrade(out, node);
        return;
    };
    out.push_str(&format!("array({})", entries.len()));
    if entries.is_empty() {
        out.push_str(" []");
        return;
    }
    out.push_str(" [\n");
    let child = ctx.child();
    for (key, value) in entries {
        out.push_str(&child.pad());
        out.push_str(&key_text(key));
        out.push_str(" => ");
        write_node(out, value, &child);
        out.push_str(",\n");
    }
    out.push_str(&ctx.pad());
    out.push(']');
}

fn write_object(out: &mut String, node: &AbstractNode, ctx: &RenderContext) {
    let Children::Properties(props) = &node.children else {
        degrade(out, node);
        return;
    };
    out.push_str(node.label.as_deref().unwrap_or("object"));
    if props.is_empty() && node.methods.is_empty() {
        out.push_str(" {}");
        return;
    }
    out.push_str(" {\n");
    let child = ctx.child();
    for prop in props {
        out.push_str(&child.pad());
        out.push_str(&format!("{} {} = ", prop.visibility, prop.name));
        write_node(out, &prop.node, &child);
        out.push('\n');
    }
    if !node.methods.is_empty() {
        out.push_str(&child.pad());
        out.push_str("methods {\n");
        let inner = child.child();
        for sig in &node.methods {
            out.push_str(&inner.pad());
            out.push_str(sig);
            out.push('\n');
        }
        out.push_str(&child.pad());
        out.push_str("}\n");
    }
    out.push_str(&ctx.pad());
    out.push('}');
}

fn key_text(key: &MapKey) -> String {
    match key {
        MapKey::Int(i) => i.to_string(),
        MapKey::Str(s) => format!("\"{s}\""),
    }
}

/// A shape this renderer cannot interpret loses one fragment, not the
/// whole output.
fn degrade(out: &mut String, node: &AbstractNode) {
    warn!("plain renderer: degenerate node shape ({})", node.tag);
    out.push_str(UNKNOWN_MARKER);
}

#[cfg(test)]
mod tests {
    use super::*;
    use vardump_core::{BuildOptions, Value, build};

    fn plain(value: &Value) -> String {
        render(&build(value, &BuildOptions::default()), &RenderContext::default())
    }

    #[test]
    fn scalars() {
        assert_eq!(plain(&Value::Null), "null");
        assert_eq!(plain(&Value::Bool(true)), "true");
        assert_eq!(plain(&Value::Int(7)), "7");
        assert_eq!(plain(&Value::Float(2.5)), "2.5");
        assert_eq!(plain(&Value::string("hi")), "\"hi\"");
    }

    #[test]
    fn nested_array_layout() {
        let value = Value::array_of([
            Value::Int(1),
            Value::array_of([Value::string("x")]),
        ]);
        let expected = "array(2) [\n  0 => 1,\n  1 => array(1) [\n    0 => \"x\",\n  ],\n]";
        assert_eq!(plain(&value), expected);
    }

    #[test]
    fn empty_array_stays_on_one_line() {
        assert_eq!(plain(&Value::array()), "array(0) []");
    }

    #[test]
    fn object_layout_with_visibility() {
        use vardump_core::{ObjectData, Visibility};
        let value = Value::object(
            ObjectData::new("User")
                .with_property("name", Visibility::Public, Value::string("bob"))
                .with_property("id", Visibility::Private, Value::Int(1)),
        );
        let expected = "User {\n  public name = \"bob\"\n  private id = 1\n}";
        assert_eq!(plain(&value), expected);
    }

    #[test]
    fn callable_and_resource_forms() {
        use vardump_core::{CallableRef, ResourceHandle};
        assert_eq!(
            plain(&Value::Callable(CallableRef::method("Mailer", "send"))),
            "Mailer::send"
        );
        assert_eq!(
            plain(&Value::Resource(ResourceHandle::new("stream", 4))),
            "resource(stream #4)"
        );
    }

    #[test]
    fn timestamp_annotation_is_cosmetic_suffix() {
        assert_eq!(
            plain(&Value::Int(1_234_567_890)),
            "1234567890 /* 2009-02-13 23:31:30 UTC */"
        );
    }

    #[test]
    fn recursion_marker_is_fixed() {
        use vardump_core::{ArrayStorage, shared};
        let cell = shared(ArrayStorage::new());
        cell.borrow_mut().push(Value::Arr(cell.clone()));
        let text = plain(&Value::Arr(cell));
        assert_eq!(text.matches(RECURSION_MARKER).count(), 1);
    }

    #[test]
    fn json_string_pretty_prints_beside_the_literal() {
        let text = plain(&Value::string(r#"{"a":1}"#));
        assert!(text.starts_with("\"{\\\"a\\\":1}\" json: array(1) ["));
        assert!(text.contains("\"a\" => 1"));
    }
}
