//! vardump: a debugging console for arbitrary runtime values.
//!
//! Application code hands values to [`DebugConsole::log`]; the engine
//! snapshots them into immutable, acyclic abstraction trees (cycles become
//! recursion markers, mutation after the call changes nothing captured),
//! buffers them in order, and renders them on demand as styled terminal
//! text, plain text, HTML markup, devtools wire messages, or tables.
//!
//! ```
//! use vardump::{ConsoleConfig, DebugConsole, Format, Value};
//!
//! let console = DebugConsole::with_config(ConsoleConfig::default().without_timestamps());
//! console.log(&[Value::string("hello"), Value::Int(42)]);
//!
//! let text = console.render_all(Format::Plain);
//! assert!(text.contains("\"hello\""));
//! assert!(text.contains("42"));
//! ```
//!
//! Logging never fails and never panics the host: per-node trouble
//! (unreadable properties, depth limits, cycles) is absorbed into the
//! tree, and renderer trouble in one entry never suppresses the rest.

#![forbid(unsafe_code)]

mod buffer;
mod config;
mod console;
mod detection;
mod redact;

pub use buffer::{EntryId, LogBuffer, LogEntry};
pub use config::{AnsiTarget, ConsoleConfig};
pub use console::{CallOptions, DebugConsole, TemplateMode, console, init_console};
pub use detection::{DisplayContext, is_machine_context, should_enable_styling};
pub use redact::{REDACTED_MASK, redact};

// The value model, engine knobs, and render formats are part of this
// crate's surface.
pub use vardump_core::{
    AbstractNode, ArrayStorage, BuildOptions, CallableRef, Children, IdentityScope, MapKey,
    MethodSig, ObjectData, PropertySlot, Refinement, ResourceHandle, Scalar, TypeTag, Value,
    Visibility, classify, shared,
};
pub use vardump_render::{Format, RenderContext};
