//! The debugging console: ingress, buffering, and output.

use std::sync::OnceLock;

use log::trace;
use time::macros::format_description;
use vardump_core::{BuildOptions, IdentityScope, SnapshotBuilder, Value};
use vardump_render::{Format, RenderContext};

use crate::buffer::{EntryId, LogBuffer, LogEntry};
use crate::config::{AnsiTarget, ConsoleConfig};

/// Per-call options for [`DebugConsole::log_with`].
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Capture depth for this call, overriding the configured depth.
    pub depth: Option<usize>,
    /// Force full (unlimited) expansion depth for this call.
    pub full_depth: bool,
    /// Identity-tracking scope across this call's arguments.
    pub scope: IdentityScope,
    /// Leading-template handling for this call.
    pub template: TemplateMode,
}

impl CallOptions {
    /// Defaults: configured depth, per-argument scope, auto templates.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the capture depth.
    #[must_use]
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = Some(depth);
        self
    }

    /// Force unlimited expansion depth.
    #[must_use]
    pub fn full_depth(mut self) -> Self {
        self.full_depth = true;
        self
    }

    /// Share identity tracking across this call's arguments.
    #[must_use]
    pub fn shared_scope(mut self) -> Self {
        self.scope = IdentityScope::SharedCall;
        self
    }

    /// Never treat the first argument as a template.
    #[must_use]
    pub fn no_template(mut self) -> Self {
        self.template = TemplateMode::Never;
        self
    }
}

/// Whether a leading string argument may be promoted to an entry label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemplateMode {
    /// Promote when it looks like a format template (and config allows).
    #[default]
    Auto,
    /// Never promote.
    Never,
}

/// The debugging console.
///
/// `log` captures values into immutable abstraction trees synchronously —
/// by the time it returns, later mutation of the arguments cannot affect
/// what was recorded. Rendering happens later, entry by entry, in any
/// format.
#[derive(Debug, Default)]
pub struct DebugConsole {
    config: ConsoleConfig,
    buffer: LogBuffer,
}

impl DebugConsole {
    /// Console configured from the environment.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ConsoleConfig::from_env())
    }

    /// Console with explicit configuration.
    #[must_use]
    pub fn with_config(config: ConsoleConfig) -> Self {
        Self {
            config,
            buffer: LogBuffer::new(),
        }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    /// Log values with default per-call options. Never fails.
    pub fn log(&self, values: &[Value]) -> EntryId {
        self.log_with(values, &CallOptions::default())
    }

    /// Log values with explicit per-call options. Never fails.
    pub fn log_with(&self, values: &[Value], opts: &CallOptions) -> EntryId {
        let (label, rest) = self.split_template(values, opts);

        let max_depth = if opts.full_depth {
            None
        } else {
            opts.depth.or(self.config.max_depth)
        };
        let build = BuildOptions {
            max_depth,
            include_methods: self.config.include_methods,
        };
        let trees = SnapshotBuilder::build_group(rest, &build, opts.scope);
        trace!("logged {} value(s)", trees.len());
        self.buffer.push(label, trees)
    }

    /// Buffered entries, in order.
    #[must_use]
    pub fn entries(&self) -> Vec<LogEntry> {
        self.buffer.entries()
    }

    /// Number of buffered entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// True when nothing is buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Discard all buffered entries.
    pub fn clear(&self) {
        self.buffer.clear();
    }

    /// Render one entry in the given format.
    #[must_use]
    pub fn render_entry(&self, entry: &LogEntry, format: Format) -> String {
        let ctx = RenderContext::default().with_truncate_at(self.config.truncate_at);
        let trees: Vec<String> = entry
            .trees
            .iter()
            .map(|tree| vardump_render::render(tree, format, &ctx))
            .collect();

        match format {
            // Machine formats carry no decoration.
            Format::Wire => trees.join("\n"),
            _ => {
                let mut out = String::new();
                if let Some(header) = self.entry_header(entry) {
                    out.push_str(&header);
                    out.push('\n');
                }
                out.push_str(&trees.join("\n"));
                out
            }
        }
    }

    /// Render every buffered entry. One entry's renderer trouble never
    /// suppresses the others.
    #[must_use]
    pub fn render_all(&self, format: Format) -> String {
        self.entries()
            .iter()
            .map(|entry| self.render_entry(entry, format))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Write all buffered entries to the configured terminal stream,
    /// styled when the resolved context is human.
    pub fn print(&self) {
        let format = if self.config.should_style() {
            Format::Ansi
        } else {
            Format::Plain
        };
        let text = self.render_all(format);
        match self.config.ansi_target {
            AnsiTarget::Stderr => eprintln!("{text}"),
            AnsiTarget::Stdout => println!("{text}"),
        }
    }

    fn entry_header(&self, entry: &LogEntry) -> Option<String> {
        let mut parts = Vec::new();
        if self.config.timestamps {
            let format = format_description!("[hour]:[minute]:[second]");
            if let Ok(stamp) = entry.at.format(&format) {
                parts.push(format!("[{stamp}]"));
            }
        }
        if let Some(label) = &entry.label {
            parts.push(label.clone());
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }

    fn split_template<'v>(
        &self,
        values: &'v [Value],
        opts: &CallOptions,
    ) -> (Option<String>, &'v [Value]) {
        if !self.config.detect_templates || opts.template == TemplateMode::Never {
            return (None, values);
        }
        if let Some(Value::Str(first)) = values.first() {
            let text = first.borrow();
            if looks_like_template(&text) && values.len() > 1 {
                return (Some(text.clone()), &values[1..]);
            }
        }
        (None, values)
    }
}

/// Format-template heuristic for a leading string argument.
fn looks_like_template(text: &str) -> bool {
    ["%s", "%d", "%f", "{}"].iter().any(|p| text.contains(p))
}

// ─────────────────────────────────────────────────────────
// Global Console Accessor
// ─────────────────────────────────────────────────────────

static CONSOLE: OnceLock<DebugConsole> = OnceLock::new();

/// The process-wide console instance.
#[must_use]
pub fn console() -> &'static DebugConsole {
    CONSOLE.get_or_init(DebugConsole::new)
}

/// Install a configured global console. Errors if output already started
/// through the default instance.
pub fn init_console(config: ConsoleConfig) -> Result<(), &'static str> {
    CONSOLE
        .set(DebugConsole::with_config(config))
        .map_err(|_| "console already initialized")
}
