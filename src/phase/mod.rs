//! Phase scheduling and session timing
//!
//! Expands workout definitions into timed phases and drives a session
//! through them.
//!
//! # Architecture
//!
//! - [`expand`]: pure workout → phase list expansion
//! - [`SessionEngine`]: pause-aware state machine over a fixed phase list
//! - [`SessionSnapshot`]: immutable view produced by every command and tick
//! - [`Clock`]: injected monotonic time ([`MonotonicClock`], [`ManualClock`])

pub mod clock;
pub mod engine;
pub mod expand;
pub mod snapshot;

pub use clock::{Clock, ManualClock, Millis, MonotonicClock};
pub use engine::SessionEngine;
pub use expand::{Phase, PhaseType, expand, total_duration_sec};
pub use snapshot::{SessionSnapshot, Status};
