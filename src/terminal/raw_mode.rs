//! Raw terminal mode management with panic-safe cleanup.

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use std::io;
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};

/// Whether a guard currently owns the terminal (read by the panic hook)
pub(crate) static RAW_MODE_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Guard that puts the terminal into full-screen raw mode and restores it on drop.
///
/// Covers normal exits and panics: the alternate screen is left, the cursor shown
/// and raw mode disabled.
pub struct RawModeGuard {
    active: bool,
}

impl RawModeGuard {
    /// Enter raw mode on the alternate screen with a hidden cursor.
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be switched (e.g. stdout is not a TTY)
    pub fn enter() -> io::Result<Self> {
        install_panic_hook();

        enable_raw_mode()?;
        RAW_MODE_ACTIVE.store(true, Ordering::SeqCst);
        let mut guard = Self { active: true };

        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen, Hide) {
            let _ = guard.exit();
            return Err(e);
        }
        Ok(guard)
    }

    /// Restore the terminal now; dropping the guard afterwards is a no-op.
    pub fn exit(&mut self) -> io::Result<()> {
        if self.active {
            self.active = false;
            RAW_MODE_ACTIVE.store(false, Ordering::SeqCst);
            let screen = execute!(io::stdout(), Show, LeaveAlternateScreen);
            disable_raw_mode()?;
            screen?;
        }
        Ok(())
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if self.active {
            let _ = self.exit();
        }
    }
}

/// Install (once) a panic hook restoring the terminal before the message prints.
pub(crate) fn install_panic_hook() {
    static HOOK_INSTALLED: AtomicBool = AtomicBool::new(false);

    if HOOK_INSTALLED.swap(true, Ordering::SeqCst) {
        return;
    }

    let original_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        if RAW_MODE_ACTIVE.swap(false, Ordering::SeqCst) {
            let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
            let _ = disable_raw_mode();
        }
        original_hook(panic_info);
    }));
}
