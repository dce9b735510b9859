//! Inline-markup renderer.
//!
//! Emits an HTML fragment suitable for embedding in a browser debug panel.
//! Every literal is entity-escaped; structure is carried by `vd-*` classed
//! spans and divs so a stylesheet can theme it without touching the tree.

use log::warn;
use vardump_core::{AbstractNode, Children, MapKey, TypeTag};

use crate::context::RenderContext;
use crate::literal::{EXCLUDED_MARKER, RECURSION_MARKER, UNKNOWN_MARKER, literal, timestamp_note};

/// Render a tree to an HTML fragment.
#[must_use]
pub fn render(node: &AbstractNode, ctx: &RenderContext) -> String {
    let mut out = String::new();
    write_node(&mut out, node, ctx);
    out
}

/// Escape text for HTML interpolation.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn span(out: &mut String, class: &str, body: &str) {
    out.push_str(&format!("<span class=\"vd-{class}\">{}</span>", escape(body)));
}

fn write_node(out: &mut String, node: &AbstractNode, ctx: &RenderContext) {
    if node.is_recursion {
        span(out, "recursion", RECURSION_MARKER);
        if let Some(label) = &node.label {
            out.push(' ');
            span(out, "label", &format!("({label})"));
        }
        return;
    }
    if node.is_excluded {
        let label = node.label.clone().unwrap_or_else(|| node.tag.to_string());
        span(out, "excluded", &format!("{label} {EXCLUDED_MARKER}"));
        return;
    }

    match node.tag {
        TypeTag::Null | TypeTag::Undefined | TypeTag::Bool => match literal(node, ctx) {
            Some(text) => span(out, "keyword", &text),
            None => degrade(out, node),
        },
        TypeTag::Int | TypeTag::Float => match literal(node, ctx) {
            Some(text) => {
                span(out, "number", &text);
                push_note(out, node);
            }
            None => degrade(out, node),
        },
        TypeTag::Str => match literal(node, ctx) {
            Some(text) => {
                span(out, "string", &text);
                push_note(out, node);
                if let Some(decoded) = &node.decoded {
                    out.push(' ');
                    span(out, "note", "json:");
                    out.push(' ');
                    write_node(out, decoded, ctx);
                }
            }
            None => degrade(out, node),
        },
        TypeTag::Callable => match &node.callable {
            Some(c) => {
                let text = match &c.owner {
                    Some(owner) => format!("{owner}::{}", c.name),
                    None => c.name.clone(),
                };
                span(out, "callable", &text);
            }
            None => degrade(out, node),
        },
        TypeTag::Resource => {
            let label = node.label.as_deref().unwrap_or("unknown");
            span(out, "resource", &format!("resource({label})"));
        }
        TypeTag::Arr => write_array(out, node, ctx),
        TypeTag::Obj => write_object(out, node, ctx),
        TypeTag::Abstracted => degrade(out, node),
    }
}

fn push_note(out: &mut String, node: &AbstractNode) {
    if let Some(note) = timestamp_note(node) {
        out.push(' ');
        span(out, "note", &format!("/* {note} */"));
    }
}

fn write_array(out: &mut String, node: &AbstractNode, ctx: &RenderContext) {
    let Children::Entries(entries) = &node.children else {
        degrade(out, node);
        return;
    };
    span(out, "type", &format!("array({})", entries.len()));
    if entries.is_empty() {
        out.push_str(" []");
        return;
    }
    out.push_str(" [<div class=\"vd-children\">");
    let child = ctx.child();
    for (key, value) in entries {
        out.push_str("<div class=\"vd-entry\">");
        span(out, "key", &key_text(key));
        out.push_str(" =&gt; ");
        write_node(out, value, &child);
        out.push_str("</div>");
    }
    out.push_str("</div>]");
}

fn write_object(out: &mut String, node: &AbstractNode, ctx: &RenderContext) {
    let Children::Properties(props) = &node.children else {
        degrade(out, node);
        return;
    };
    span(out, "classname", node.label.as_deref().unwrap_or("object"));
    if props.is_empty() && node.methods.is_empty() {
        out.push_str(" {}");
        return;
    }
    out.push_str(" {<div class=\"vd-children\">");
    let child = ctx.child();
    for prop in props {
        out.push_str("<div class=\"vd-property\">");
        span(out, "visibility", &prop.visibility.to_string());
        out.push(' ');
        span(out, "key", &prop.name);
        out.push_str(" = ");
        write_node(out, &prop.node, &child);
        out.push_str("</div>");
    }
    if !node.methods.is_empty() {
        out.push_str("<div class=\"vd-methods\">");
        for sig in &node.methods {
            out.push_str("<div class=\"vd-method\">");
            span(out, "signature", sig);
            out.push_str("</div>");
        }
        out.push_str("</div>");
    }
    out.push_str("</div>}");
}

fn key_text(key: &MapKey) -> String {
    match key {
        MapKey::Int(i) => i.to_string(),
        MapKey::Str(s) => format!("\"{s}\""),
    }
}

fn degrade(out: &mut String, node: &AbstractNode) {
    warn!("markup renderer: degenerate node shape ({})", node.tag);
    span(out, "unknown", UNKNOWN_MARKER);
}

#[cfg(test)]
mod tests {
    use super::*;
    use vardump_core::{BuildOptions, Value, build};

    #[test]
    fn escape_table() {
        assert_eq!(escape("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&#39;");
    }

    #[test]
    fn string_content_is_escaped() {
        let tree = build(&Value::string("<script>"), &BuildOptions::default());
        let html = render(&tree, &RenderContext::default());
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn array_nests_children_divs() {
        let tree = build(
            &Value::array_of([Value::Int(1)]),
            &BuildOptions::default(),
        );
        let html = render(&tree, &RenderContext::default());
        assert!(html.contains("<span class=\"vd-type\">array(1)</span>"));
        assert!(html.contains("<div class=\"vd-entry\">"));
    }

    #[test]
    fn empty_array_has_no_children_div() {
        let tree = build(&Value::array(), &BuildOptions::default());
        let html = render(&tree, &RenderContext::default());
        assert_eq!(html, "<span class=\"vd-type\">array(0)</span> []");
    }
}
