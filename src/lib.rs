//! `interval-trainer` - interval timer for HIIT-style workouts
//!
//! This library expands saved workouts into timed phases and drives a
//! pause-aware session through them, producing an immutable snapshot on
//! every command and tick.

pub mod cli;
pub mod config;
pub mod error;
pub mod feedback;
pub mod library;
pub mod observability;
pub mod phase;
pub mod runner;
pub mod workout;
