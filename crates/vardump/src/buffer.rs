//! The ordered log buffer.
//!
//! The one shared mutable resource in the system: entries append under a
//! mutex (single writer at a time), and render passes read cloned
//! snapshots so they never observe a half-written entry. The trees inside
//! an entry are immutable owned data and safe to read from any thread.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use time::OffsetDateTime;
use vardump_core::AbstractNode;

/// Identifier of one buffered entry, unique per buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(u64);

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One logging call's captured output.
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Entry identifier.
    pub id: EntryId,
    /// Capture time (UTC).
    pub at: OffsetDateTime,
    /// Label taken from a leading template argument, when one applied.
    pub label: Option<String>,
    /// One abstraction tree per logged value.
    pub trees: Vec<AbstractNode>,
}

/// Ordered, append-only store of log entries.
#[derive(Debug, Default)]
pub struct LogBuffer {
    entries: Mutex<Vec<LogEntry>>,
    next_id: AtomicU64,
}

impl LogBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry. Returns its id.
    pub fn push(&self, label: Option<String>, trees: Vec<AbstractNode>) -> EntryId {
        let id = EntryId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let entry = LogEntry {
            id,
            at: OffsetDateTime::now_utc(),
            label,
            trees,
        };
        match self.entries.lock() {
            Ok(mut entries) => entries.push(entry),
            Err(poisoned) => poisoned.into_inner().push(entry),
        }
        id
    }

    /// Snapshot of all entries in append order.
    #[must_use]
    pub fn entries(&self) -> Vec<LogEntry> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Number of buffered entries.
    #[must_use]
    pub fn len(&self) -> usize {
        match self.entries.lock() {
            Ok(entries) => entries.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    /// True when nothing is buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Discard all entries. Ids keep increasing.
    pub fn clear(&self) {
        match self.entries.lock() {
            Ok(mut entries) => entries.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}
