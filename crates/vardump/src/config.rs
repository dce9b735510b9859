//! Console configuration.
//!
//! `ConsoleConfig` is the single configuration point for capture policy
//! (depth, method enumeration) and output policy (styling, truncation,
//! target stream), settable programmatically or from the environment.

use std::env;

use crate::detection::DisplayContext;

/// Stream ANSI/plain terminal output is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnsiTarget {
    /// Standard error (default; keeps stdout clean for program output).
    #[default]
    Stderr,
    /// Standard output.
    Stdout,
}

/// Configuration for a [`DebugConsole`](crate::DebugConsole).
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Override display context (`None` = auto-detect).
    pub context: Option<DisplayContext>,
    /// Force styled output even in machine contexts.
    pub force_color: bool,
    /// Force plain output everywhere.
    pub force_plain: bool,
    /// Maximum capture depth for composites; `None` is unlimited.
    pub max_depth: Option<usize>,
    /// Enumerate object method signatures into captured trees.
    pub include_methods: bool,
    /// Truncate string literals at this many characters when rendering.
    pub truncate_at: Option<usize>,
    /// Stream for terminal output.
    pub ansi_target: AnsiTarget,
    /// Treat a leading format-template string argument as the entry label.
    pub detect_templates: bool,
    /// Prefix rendered entries with their capture timestamp.
    pub timestamps: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            context: None,
            force_color: false,
            force_plain: false,
            max_depth: Some(8),
            include_methods: false,
            truncate_at: Some(200),
            ansi_target: AnsiTarget::Stderr,
            detect_templates: true,
            timestamps: true,
        }
    }
}

impl ConsoleConfig {
    /// Defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read configuration from the environment.
    ///
    /// | Variable | Values | Meaning |
    /// |----------|--------|---------|
    /// | `VARDUMP_DEPTH` | number, `unlimited` | capture depth |
    /// | `VARDUMP_METHODS` | (set) | enumerate methods |
    /// | `VARDUMP_TRUNCATE` | number, `off` | string truncation |
    /// | `VARDUMP_PLAIN` | (set) | force plain output |
    /// | `VARDUMP_FORCE_COLOR` | (set) | force styled output |
    /// | `NO_COLOR` | (set) | disable styling (standard) |
    /// | `VARDUMP_TARGET` | `stderr`, `stdout` | output stream |
    /// | `VARDUMP_TIMESTAMPS` | `0`, `false` | hide timestamps |
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(depth) = env::var("VARDUMP_DEPTH") {
            config.max_depth = match depth.to_lowercase().as_str() {
                "unlimited" | "none" => None,
                other => other.parse::<usize>().ok().or(config.max_depth),
            };
        }
        if env::var("VARDUMP_METHODS").is_ok() {
            config.include_methods = true;
        }
        if let Ok(limit) = env::var("VARDUMP_TRUNCATE") {
            config.truncate_at = match limit.to_lowercase().as_str() {
                "off" | "none" => None,
                other => other.parse::<usize>().ok().or(config.truncate_at),
            };
        }
        if env::var("VARDUMP_PLAIN").is_ok() || env::var("NO_COLOR").is_ok() {
            config.force_plain = true;
        }
        if env::var("VARDUMP_FORCE_COLOR").is_ok() {
            config.force_color = true;
        }
        if let Ok(target) = env::var("VARDUMP_TARGET") {
            if target.eq_ignore_ascii_case("stdout") {
                config.ansi_target = AnsiTarget::Stdout;
            }
        }
        if env::var("VARDUMP_TIMESTAMPS")
            .map(|v| v == "0" || v.eq_ignore_ascii_case("false"))
            .unwrap_or(false)
        {
            config.timestamps = false;
        }

        config
    }

    /// Builder-style capture depth.
    #[must_use]
    pub fn with_max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }

    /// Builder-style method enumeration.
    #[must_use]
    pub fn with_methods(mut self, include: bool) -> Self {
        self.include_methods = include;
        self
    }

    /// Builder-style truncation limit.
    #[must_use]
    pub fn with_truncate_at(mut self, limit: Option<usize>) -> Self {
        self.truncate_at = limit;
        self
    }

    /// Force plain output.
    #[must_use]
    pub fn plain_mode(mut self) -> Self {
        self.force_plain = true;
        self
    }

    /// Force styled output.
    #[must_use]
    pub fn with_force_color(mut self) -> Self {
        self.force_color = true;
        self
    }

    /// Set the terminal output stream.
    #[must_use]
    pub fn with_target(mut self, target: AnsiTarget) -> Self {
        self.ansi_target = target;
        self
    }

    /// Disable leading-template detection.
    #[must_use]
    pub fn without_templates(mut self) -> Self {
        self.detect_templates = false;
        self
    }

    /// Hide capture timestamps in rendered output.
    #[must_use]
    pub fn without_timestamps(mut self) -> Self {
        self.timestamps = false;
        self
    }

    /// Set the display context explicitly.
    #[must_use]
    pub fn with_context(mut self, context: DisplayContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Resolve the display context from config and environment.
    #[must_use]
    pub fn resolve_context(&self) -> DisplayContext {
        if self.force_plain {
            return DisplayContext::Machine;
        }
        if self.force_color {
            return DisplayContext::Human;
        }
        self.context.unwrap_or_else(DisplayContext::detect)
    }

    /// Whether terminal output should be styled.
    #[must_use]
    pub fn should_style(&self) -> bool {
        self.resolve_context().is_human()
    }
}
