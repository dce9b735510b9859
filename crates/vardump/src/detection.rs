//! Human/machine context detection.
//!
//! Decides whether styled terminal output is appropriate for the current
//! environment. Machine contexts (CI, piped agents, `NO_COLOR`) fall back
//! to plain text.

/// Display context the console resolves output decisions against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayContext {
    /// Machine context: plain output for parsing.
    Machine,
    /// Human context: styled output.
    #[default]
    Human,
}

impl DisplayContext {
    /// Auto-detect from the environment.
    #[must_use]
    pub fn detect() -> Self {
        if should_enable_styling() {
            Self::Human
        } else {
            Self::Machine
        }
    }

    /// True when styled output applies.
    #[must_use]
    pub fn is_human(&self) -> bool {
        matches!(self, Self::Human)
    }
}

/// True in environments where styled output would be noise.
#[must_use]
pub fn is_machine_context() -> bool {
    std::env::var("CI").is_ok()
        || std::env::var("NO_COLOR").is_ok()
        || std::env::var("VARDUMP_PLAIN").is_ok()
}

/// Decide whether to emit ANSI styling. Explicit enable always wins.
#[must_use]
pub fn should_enable_styling() -> bool {
    if std::env::var("VARDUMP_FORCE_COLOR").is_ok() {
        return true;
    }
    !is_machine_context()
}
