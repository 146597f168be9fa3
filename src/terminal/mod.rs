//! Terminal management module - raw mode, big-text font, layout and drawing.

mod display;
mod glyphs;
mod layout;
mod raw_mode;

use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

pub use display::{Color, Display, Frame, Screen};
pub use glyphs::{render_big, GLYPH_HEIGHT};
pub use layout::{fits, pad_to_size, text_size, variants, Variant};
pub use raw_mode::RawModeGuard;

/// The terminal, shared between the display and the input reader.
///
/// Holding the lock makes a render (title plus drawing) or a key poll atomic.
pub type SharedTerminal = Arc<Mutex<io::Stdout>>;

/// Create the shared handle for this process's stdout.
pub fn shared_stdout() -> SharedTerminal {
    Arc::new(Mutex::new(io::stdout()))
}

/// Lock the terminal, ignoring poisoning by a panicked holder.
pub fn lock_terminal(terminal: &SharedTerminal) -> MutexGuard<'_, io::Stdout> {
    terminal.lock().unwrap_or_else(|e| e.into_inner())
}
