//! Renderers for vardump abstraction trees.
//!
//! Every output format is a pure function from `(tree, context)` to a
//! string: same inputs, byte-identical output. Renderers depend only on
//! the tree contract, never on the original raw value, and each one
//! matches [`TypeTag`](vardump_core::TypeTag) exhaustively, so adding a
//! value kind is a compile-enforced change in every format at once.
//!
//! Formats:
//!
//! - [`plain`] — unstyled text (also the rich-disabled fallback)
//! - [`ansi`] — terminal text styled with the `console` crate
//! - [`markup`] — HTML fragment for a browser debug panel
//! - [`wire`] — versioned JSON for devtools extensions
//! - [`table`] — box-drawn summary of uniform mapping rows

#![forbid(unsafe_code)]

pub mod ansi;
pub mod context;
pub mod literal;
pub mod markup;
pub mod plain;
pub mod table;
pub mod wire;

pub use context::RenderContext;
pub use literal::{EXCLUDED_MARKER, RECURSION_MARKER, UNKNOWN_MARKER};
pub use wire::WIRE_VERSION;

use vardump_core::AbstractNode;

/// An output format selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Unstyled text.
    Plain,
    /// ANSI-escaped terminal text.
    Ansi,
    /// HTML fragment.
    Markup,
    /// Wire-protocol JSON message.
    Wire,
    /// Tabular summary of a sequence of mappings.
    Table,
}

/// Render one tree in the selected format.
#[must_use]
pub fn render(node: &AbstractNode, format: Format, ctx: &RenderContext) -> String {
    match format {
        Format::Plain => plain::render(node, ctx),
        Format::Ansi => ansi::render(node, ctx),
        Format::Markup => markup::render(node, ctx),
        Format::Wire => wire::render(node, ctx),
        Format::Table => table::render_node(node),
    }
}
