//! termdown library crate.
//!
//! This module exposes the internal components for the binary and for
//! integration testing.

pub mod announce;
pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod format;
pub mod input;
pub mod logging;
pub mod mirror;
pub mod modes;
pub mod terminal;
pub mod ticker;
pub mod timespec;
