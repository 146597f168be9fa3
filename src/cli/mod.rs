//! Command-line interface definitions and helpers.
//!
//! This module contains argument parsing, the config subcommand and the
//! stopwatch lap summary.

mod args;
mod commands;
mod summary;

pub use args::{Args, Command, ConfigAction};
pub use commands::handle_config_action;
pub use summary::format_report;
