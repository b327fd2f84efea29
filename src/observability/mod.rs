//! Observability
//!
//! Diagnostic logging and the structured session event stream.

pub mod events;
pub mod logging;

pub use events::{Event, EventEmitter, RunSummary, StopReason, events_between};
pub use logging::{LogFormat, init_logging};
