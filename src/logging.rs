//! Log setup.
//!
//! The display owns the terminal, so records can only go to a file. Without a
//! log file no logger is installed and the `log` macros are no-ops.

use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::OpenOptions;
use std::path::Path;

use crate::error::TimerError;

/// Install a file logger if `file` is given.
pub fn init(file: Option<&Path>, level: LevelFilter) -> Result<(), TimerError> {
    let Some(path) = file else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let config = ConfigBuilder::new()
        .set_thread_level(LevelFilter::Debug)
        .set_target_level(LevelFilter::Off)
        .build();
    WriteLogger::init(level, config, file)?;
    log::info!("termdown {} starting", env!("CARGO_PKG_VERSION"));
    Ok(())
}
