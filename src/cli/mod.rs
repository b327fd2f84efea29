//! Command-line interface
//!
//! Argument definitions live in [`args`]; each subcommand has a handler
//! under [`commands`].

pub mod args;
pub mod commands;
pub mod render;
