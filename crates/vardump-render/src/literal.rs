//! Scalar literal formatting shared by the text-oriented renderers.

use time::OffsetDateTime;
use time::macros::format_description;
use vardump_core::{AbstractNode, Refinement, Scalar, TypeTag};

use crate::context::RenderContext;

/// Fixed recursion marker, identical across formats.
pub const RECURSION_MARKER: &str = "*RECURSION*";

/// Fixed not-inspected marker, identical across formats.
pub const EXCLUDED_MARKER: &str = "(not inspected)";

/// Fragment emitted for a node whose shape a renderer cannot interpret.
pub const UNKNOWN_MARKER: &str = "(unknown value)";

/// Plausible unix-timestamp window for the cosmetic annotation.
const TIMESTAMP_WINDOW: std::ops::RangeInclusive<i64> = 1_000_000_000..=2_000_000_000;

/// Format a scalar node's literal with quoting and truncation from the
/// context. `None` for non-scalar tags or a scalar node missing its value
/// (a degenerate shape the caller degrades on).
#[must_use]
pub fn literal(node: &AbstractNode, ctx: &RenderContext) -> Option<String> {
    let scalar = node.value.as_ref()?;
    let text = match scalar {
        Scalar::Null => {
            if node.tag == TypeTag::Undefined {
                "undefined".to_owned()
            } else {
                "null".to_owned()
            }
        }
        Scalar::Bool(true) => "true".to_owned(),
        Scalar::Bool(false) => "false".to_owned(),
        Scalar::Int(i) => i.to_string(),
        Scalar::Float(x) => float_text(*x),
        Scalar::Str(s) => {
            if ctx.quote_strings {
                quote(s, ctx)
            } else {
                truncate(s, ctx)
            }
        }
    };
    Some(text)
}

/// Cosmetic annotation for values that look like unix timestamps: integer
/// scalars and numeric strings inside the plausible window.
#[must_use]
pub fn timestamp_note(node: &AbstractNode) -> Option<String> {
    let seconds = match (&node.value, node.refinement) {
        (Some(Scalar::Int(i)), _) => *i,
        (Some(Scalar::Str(s)), Some(Refinement::NumericString)) => s.parse::<i64>().ok()?,
        _ => return None,
    };
    if !TIMESTAMP_WINDOW.contains(&seconds) {
        return None;
    }
    let when = OffsetDateTime::from_unix_timestamp(seconds).ok()?;
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second] UTC");
    when.format(&format).ok()
}

/// Render a float so it stays visually a float (`1` becomes `1.0`).
#[must_use]
pub fn float_text(x: f64) -> String {
    if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e15 {
        format!("{x:.1}")
    } else {
        format!("{x}")
    }
}

/// Quote and escape a string literal, truncating per the context.
#[must_use]
pub fn quote(text: &str, ctx: &RenderContext) -> String {
    let body = truncate(text, ctx);
    let mut out = String::with_capacity(body.len() + 2);
    out.push('"');
    for ch in body.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

fn truncate(text: &str, ctx: &RenderContext) -> String {
    match ctx.truncate_at {
        Some(limit) if text.chars().count() > limit => {
            let cut: String = text.chars().take(limit).collect();
            format!("{cut}…")
        }
        _ => text.to_owned(),
    }
}
