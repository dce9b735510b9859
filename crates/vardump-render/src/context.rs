//! Per-render context.

/// Small, copy-down state a renderer carries through one tree walk:
/// nesting depth plus format-local formatting rules. Renderers are pure
/// functions of `(tree, context)`.
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// Current nesting depth (0 at the root).
    pub depth: usize,
    /// Spaces per indentation level.
    pub indent: usize,
    /// Quote and escape string literals.
    pub quote_strings: bool,
    /// Truncate string literals beyond this many characters.
    pub truncate_at: Option<usize>,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self {
            depth: 0,
            indent: 2,
            quote_strings: true,
            truncate_at: Some(200),
        }
    }
}

impl RenderContext {
    /// Context for rendering one level deeper.
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            depth: self.depth + 1,
            ..self.clone()
        }
    }

    /// Indentation prefix for the current depth.
    #[must_use]
    pub fn pad(&self) -> String {
        " ".repeat(self.depth * self.indent)
    }

    /// Builder-style indentation width.
    #[must_use]
    pub fn with_indent(mut self, spaces: usize) -> Self {
        self.indent = spaces;
        self
    }

    /// Builder-style truncation limit (`None` disables truncation).
    #[must_use]
    pub fn with_truncate_at(mut self, limit: Option<usize>) -> Self {
        self.truncate_at = limit;
        self
    }

    /// Builder-style string quoting rule.
    #[must_use]
    pub fn with_quoting(mut self, quote: bool) -> Self {
        self.quote_strings = quote;
        self
    }
}
