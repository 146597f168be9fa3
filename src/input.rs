//! Keyboard input handling.
//!
//! This module handles:
//! - Mapping crossterm KeyEvents to timer hotkeys
//! - A background reader that polls the terminal and feeds the event queue

use crossterm::event::{self, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::events::{Event, EventSender, InputEvent};
use crate::terminal::{lock_terminal, SharedTerminal};

/// Pause between polls so the display gets the terminal lock in between.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Translate a key event into a timer event.
///
/// Hotkeys:
/// - q: Exit
/// - Space: Pause / resume
/// - r: Reset
/// - l: Lap
/// - + / -: Adjust by 10 seconds
/// - e: Toggle end time display
/// - Ctrl+C: Interrupt (raw mode swallows the signal)
///
/// Letters are case-insensitive. Releases and repeats are ignored.
pub fn map_key(event: KeyEvent) -> Option<Event> {
    let KeyEvent {
        code,
        modifiers,
        kind,
        ..
    } = event;

    if kind != KeyEventKind::Press {
        return None;
    }

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') | KeyCode::Char('C') => Some(Event::Interrupt),
            _ => None,
        };
    }

    let input = match code {
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'q' => InputEvent::Exit,
            ' ' => InputEvent::Pause,
            'r' => InputEvent::Reset,
            'l' => InputEvent::Lap,
            '+' => InputEvent::Plus,
            '-' => InputEvent::Minus,
            'e' => InputEvent::ToggleEnd,
            _ => return None,
        },
        _ => return None,
    };
    Some(Event::Input(input))
}

/// Background thread reading hotkeys from the terminal.
pub struct InputReader {
    stop_flag: Arc<AtomicBool>,
    reader_thread: Option<JoinHandle<()>>,
}

impl InputReader {
    /// Spawn the reader.
    ///
    /// The terminal lock is held only while polling (with a zero timeout) and
    /// reading one event, never while sleeping.
    pub fn spawn(terminal: SharedTerminal, events: EventSender) -> std::io::Result<Self> {
        let stop_flag = Arc::new(AtomicBool::new(false));
        let flag = stop_flag.clone();

        let handle = thread::Builder::new()
            .name("input".to_string())
            .spawn(move || {
                while !flag.load(Ordering::SeqCst) {
                    if let Some(event) = poll_once(&terminal) {
                        log::debug!("Key event: {:?}", event);
                        if !events.put(event) {
                            break;
                        }
                    }
                    thread::sleep(POLL_INTERVAL);
                }
            })?;

        Ok(InputReader {
            stop_flag,
            reader_thread: Some(handle),
        })
    }

    /// Stop reading keys.
    pub fn stop(&mut self) {
        self.stop_flag.store(true, Ordering::SeqCst);
        if let Some(handle) = self.reader_thread.take() {
            // never blocks longer than one poll interval
            let _ = handle.join();
        }
    }
}

impl Drop for InputReader {
    fn drop(&mut self) {
        self.stop();
    }
}

fn poll_once(terminal: &SharedTerminal) -> Option<Event> {
    let _guard = lock_terminal(terminal);
    match event::poll(Duration::ZERO) {
        Ok(true) => match event::read() {
            Ok(event::Event::Key(key)) => map_key(key),
            Ok(_) => None,
            Err(e) => {
                log::debug!("Failed to read terminal event: {}", e);
                None
            }
        },
        Ok(false) => None,
        Err(e) => {
            log::debug!("Failed to poll terminal: {}", e);
            None
        }
    }
}
