//! Wire-protocol renderer.
//!
//! Serializes a tree into the versioned JSON message a browser
//! developer-tools extension consumes. The payload is the abstraction
//! node's own serialization, so the wire contract tracks the tree shape.

use log::warn;
use serde::Serialize;
use vardump_core::AbstractNode;

use crate::context::RenderContext;

/// Wire protocol version. Bump on any breaking payload change.
pub const WIRE_VERSION: u32 = 1;

/// Envelope of one value message.
#[derive(Debug, Serialize)]
pub struct WireMessage<'a> {
    /// Protocol version.
    pub version: u32,
    /// Message kind; always `value` for tree payloads.
    pub kind: &'static str,
    /// The abstraction tree.
    pub root: &'a AbstractNode,
}

impl<'a> WireMessage<'a> {
    /// Wrap a tree for transmission.
    #[must_use]
    pub fn value(root: &'a AbstractNode) -> Self {
        Self {
            version: WIRE_VERSION,
            kind: "value",
            root,
        }
    }
}

/// Render a tree as one wire message. Encoding failures degrade to a
/// fixed error message instead of aborting the output pass.
#[must_use]
pub fn render(node: &AbstractNode, _ctx: &RenderContext) -> String {
    match serde_json::to_string(&WireMessage::value(node)) {
        Ok(json) => json,
        Err(err) => {
            warn!("wire renderer: encoding failed: {err}");
            format!("{{\"version\":{WIRE_VERSION},\"kind\":\"error\"}}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vardump_core::{BuildOptions, Value, build};

    #[test]
    fn message_shape() {
        let tree = build(&Value::Int(3), &BuildOptions::default());
        let json: serde_json::Value =
            serde_json::from_str(&render(&tree, &RenderContext::default())).unwrap();
        assert_eq!(json["version"], 1);
        assert_eq!(json["kind"], "value");
        assert_eq!(json["root"]["type"], "integer");
        assert_eq!(json["root"]["value"], 3);
    }

    #[test]
    fn recursion_flag_crosses_the_wire() {
        use vardump_core::{ArrayStorage, shared};
        let cell = shared(ArrayStorage::new());
        cell.borrow_mut().push(Value::Arr(cell.clone()));
        let tree = build(&Value::Arr(cell), &BuildOptions::default());

        let json: serde_json::Value =
            serde_json::from_str(&render(&tree, &RenderContext::default())).unwrap();
        assert_eq!(json["root"]["children"][0][1]["isRecursion"], true);
    }

    #[test]
    fn non_finite_float_still_produces_a_message() {
        // serde_json writes non-finite floats as null; the tag survives.
        let tree = build(&Value::Float(f64::NAN), &BuildOptions::default());
        let json: serde_json::Value =
            serde_json::from_str(&render(&tree, &RenderContext::default())).unwrap();
        assert_eq!(json["root"]["type"], "float");
        assert_eq!(json["root"]["value"], serde_json::Value::Null);
    }
}
