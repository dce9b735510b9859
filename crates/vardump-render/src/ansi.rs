//! ANSI-escaped terminal renderer.
//!
//! Same layout as the plain renderer, colorized with [`console`] styles.
//! Styling is forced so output is a pure function of the tree rather than
//! of the process's TTY state; the facade decides which stream it goes to.

use console::Style;
use log::warn;
use vardump_core::{AbstractNode, Children, MapKey, TypeTag};

use crate::context::RenderContext;
use crate::literal::{EXCLUDED_MARKER, RECURSION_MARKER, UNKNOWN_MARKER, literal, timestamp_note};

struct Palette {
    string: Style,
    number: Style,
    keyword: Style,
    key: Style,
    class: Style,
    punct: Style,
    recursion: Style,
    excluded: Style,
    note: Style,
}

fn palette() -> Palette {
    let forced = |s: Style| s.force_styling(true);
    Palette {
        string: forced(Style::new().green()),
        number: forced(Style::new().yellow()),
        keyword: forced(Style::new().magenta()),
        key: forced(Style::new().cyan()),
        class: forced(Style::new().bold()),
        punct: forced(Style::new().dim()),
        recursion: forced(Style::new().red().bold()),
        excluded: forced(Style::new().dim()),
        note: forced(Style::new().dim()),
    }
}

/// Render a tree to ANSI-styled text.
#[must_use]
pub fn render(node: &AbstractNode, ctx: &RenderContext) -> String {
    let mut out = String::new();
    write_node(&mut out, node, ctx, &palette());
    out
}

fn write_node(out: &mut String, node: &AbstractNode, ctx: &RenderContext, p: &Palette) {
    if node.is_recursion {
        out.push_str(&p.recursion.apply_to(RECURSION_MARKER).to_string());
        if let Some(label) = &node.label {
            out.push_str(&format!(" {}", p.note.apply_to(format!("({label})"))));
        }
        return;
    }
    if node.is_excluded {
        let label = node.label.clone().unwrap_or_else(|| node.tag.to_string());
        out.push_str(&p.excluded.apply_to(format!("{label} {EXCLUDED_MARKER}")).to_string());
        return;
    }

    match node.tag {
        TypeTag::Null | TypeTag::Undefined | TypeTag::Bool => match literal(node, ctx) {
            Some(text) => out.push_str(&p.keyword.apply_to(text).to_string()),
            None => degrade(out, node, p),
        },
        TypeTag::Int | TypeTag::Float => match literal(node, ctx) {
            Some(text) => {
                out.push_str(&p.number.apply_to(text).to_string());
                push_note(out, node, p);
            }
            None => degrade(out, node, p),
        },
        TypeTag::Str => match literal(node, ctx) {
            Some(text) => {
                out.push_str(&p.string.apply_to(text).to_string());
                push_note(out, node, p);
                if let Some(decoded) = &node.decoded {
                    out.push_str(&format!(" {} ", p.note.apply_to("json:")));
                    write_node(out, decoded, ctx, p);
                }
            }
            None => degrade(out, node, p),
        },
        TypeTag::Callable => match &node.callable {
            Some(c) => {
                let text = match &c.owner {
                    Some(owner) => format!("{owner}::{}", c.name),
                    None => c.name.clone(),
                };
                out.push_str(&p.class.apply_to(text).to_string());
            }
            None => degrade(out, node, p),
        },
        TypeTag::Resource => {
            let label = node.label.as_deref().unwrap_or("unknown");
            out.push_str(&p.excluded.apply_to(format!("resource({label})")).to_string());
        }
        TypeTag::Arr => write_array(out, node, ctx, p),
        TypeTag::Obj => write_object(out, node, ctx, p),
        TypeTag::Abstracted => degrade(out, node, p),
    }
}

fn push_note(out: &mut String, node: &AbstractNode, p: &Palette) {
    if let Some(note) = timestamp_note(node) {
        out.push_str(&format!(" {}", p.note.apply_to(format!("/* {note} */"))));
    }
}

fn write_array(out: &mut String, node: &AbstractNode, ctx: &RenderContext, p: &Palette) {
    let Children::Entries(entries) = &node.children else {
        degrade(out, node, p);
        return;
    };
    out.push_str(&p.punct.apply_to(format!("array({})", entries.len())).to_string());
    if entries.is_empty() {
        out.push_str(&p.punct.apply_to(" []").to_string());
        return;
    }
    out.push_str(&p.punct.apply_to(" [").to_string());
    out.push('\n');
    let child = ctx.child();
    for (key, value) in entries {
        out.push_str(&child.pad());
        out.push_str(&p.key.apply_to(key_text(key)).to_string());
        out.push_str(&p.punct.apply_to(" => ").to_string());
        write_node(out, value, &child, p);
        out.push_str(&p.punct.apply_to(",").to_string());
        out.push('\n');
    }
    out.push_str(&ctx.pad());
    out.push_str(&p.punct.apply_to("]").to_string());
}

fn write_object(out: &mut String, node: &AbstractNode, ctx: &RenderContext, p: &Palette) {
    let Children::Properties(props) = &node.children else {
        degrade(out, node, p);
        return;
    };
    out.push_str(
        &p.class
            .apply_to(node.label.as_deref().unwrap_or("object"))
            .to_string(),
    );
    if props.is_empty() && node.methods.is_empty() {
        out.push_str(&p.punct.apply_to(" {}").to_string());
        return;
    }
    out.push_str(&p.punct.apply_to(" {").to_string());
    out.push('\n');
    let child = ctx.child();
    for prop in props {
        out.push_str(&child.pad());
        out.push_str(&p.note.apply_to(prop.visibility.to_string()).to_string());
        out.push(' ');
        out.push_str(&p.key.apply_to(&prop.name).to_string());
        out.push_str(&p.punct.apply_to(" = ").to_string());
        write_node(out, &prop.node, &child, p);
        out.push('\n');
    }
    if !node.methods.is_empty() {
        out.push_str(&child.pad());
        out.push_str(&p.punct.apply_to("methods {").to_string());
        out.push('\n');
        let inner = child.child();
        for sig in &node.methods {
            out.push_str(&inner.pad());
            out.push_str(&p.note.apply_to(sig).to_string());
            out.push('\n');
        }
        out.push_str(&child.pad());
        out.push_str(&p.punct.apply_to("}").to_string());
        out.push('\n');
    }
    out.push_str(&ctx.pad());
    out.push_str(&p.punct.apply_to("}").to_string());
}

fn key_text(key: &MapKey) -> String {
    match key {
        MapKey::Int(i) => i.to_string(),
        MapKey::Str(s) => format!("\"{s}\""),
    }
}

fn degrade(out: &mut String, node: &AbstractNode, p: &Palette) {
    warn!("ansi renderer: degenerate node shape ({})", node.tag);
    out.push_str(&p.excluded.apply_to(UNKNOWN_MARKER).to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use vardump_core::{BuildOptions, Value, build};

    #[test]
    fn output_contains_escape_codes() {
        let tree = build(&Value::Int(5), &BuildOptions::default());
        let text = render(&tree, &RenderContext::default());
        assert!(text.contains('\u{1b}'));
        assert!(text.contains('5'));
    }

    #[test]
    fn rendering_is_idempotent() {
        let tree = build(
            &Value::array_of([Value::string("a"), Value::Int(1)]),
            &BuildOptions::default(),
        );
        let ctx = RenderContext::default();
        assert_eq!(render(&tree, &ctx), render(&tree, &ctx));
    }
}
