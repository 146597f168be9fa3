//! Full-screen drawing of timer frames.

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use std::io::{self, Write};

use super::glyphs::render_big;
use super::layout::{fits, pad_to_size, variants, Variant};
use super::{lock_terminal, SharedTerminal};
use crate::config::Settings;

/// Size assumed when the terminal cannot be queried.
const FALLBACK_SIZE: (u16, u16) = (80, 24);

/// Color scheme of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    #[default]
    Normal,
    /// Red text
    Critical,
    /// Blue text
    Paused,
    /// Red background
    Inverse,
}

/// One screenful of timer output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame<'a> {
    pub text: &'a str,
    pub color: Color,
    /// Secondary line below the main text (end time, countdown text)
    pub end: Option<&'a str>,
    /// Terminal window title to set along with the frame
    pub window_title: Option<&'a str>,
}

impl<'a> Frame<'a> {
    pub fn new(text: &'a str) -> Self {
        Frame {
            text,
            color: Color::Normal,
            end: None,
            window_title: None,
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn end(mut self, end: Option<&'a str>) -> Self {
        self.end = end;
        self
    }

    pub fn window_title(mut self, title: &'a str) -> Self {
        self.window_title = Some(title);
        self
    }
}

/// Where frames go.
///
/// Implementations swallow their own I/O errors: a frame that cannot be drawn
/// must never stop the timer.
pub trait Screen: Send + Sync {
    fn render(&self, frame: &Frame<'_>);

    /// Ring the terminal bell.
    fn bell(&self);
}

/// The real terminal screen.
pub struct Display {
    terminal: SharedTerminal,
    title: String,
    /// Rendered once; `None` if art is disabled or the title has no glyphs
    art_title: Option<String>,
    no_art: bool,
    no_window_title: bool,
}

impl Display {
    pub fn new(terminal: SharedTerminal, settings: &Settings) -> Self {
        let title = settings.title.clone().unwrap_or_default();
        let art_title = if settings.no_art {
            None
        } else {
            render_big(&title)
        };
        Display {
            terminal,
            title,
            art_title,
            no_art: settings.no_art,
            no_window_title: settings.no_window_title,
        }
    }

    /// Reset the window title set by previous frames.
    pub fn clear_title(&self) {
        if self.no_window_title {
            return;
        }
        let mut out = lock_terminal(&self.terminal);
        if let Err(e) = write_title(&mut *out, "").and_then(|_| out.flush()) {
            log::debug!("Failed to clear window title: {}", e);
        }
    }

    fn draw(&self, out: &mut impl Write, frame: &Frame<'_>) -> io::Result<()> {
        if !self.no_window_title {
            if let Some(title) = frame.window_title {
                write_title(out, title)?;
            }
        }

        let end = frame.end.unwrap_or("");
        let (art_text, art_end) = if self.no_art {
            (None, None)
        } else {
            (render_big(frame.text), render_big(end))
        };
        let candidates = variants(&Variant {
            title: &self.title,
            text: frame.text,
            end,
            art_title: self.art_title.as_deref(),
            art_text: art_text.as_deref(),
            art_end: art_end.as_deref(),
        });

        let (cols, rows) = crossterm::terminal::size().unwrap_or_else(|e| {
            log::debug!("Failed to query terminal size: {}", e);
            FALLBACK_SIZE
        });
        let (cols, rows) = (usize::from(cols), usize::from(rows));

        queue!(out, ResetColor)?;
        match frame.color {
            Color::Normal => {}
            Color::Critical => queue!(out, SetForegroundColor(TermColor::Red))?,
            Color::Paused => queue!(out, SetForegroundColor(TermColor::Blue))?,
            Color::Inverse => queue!(out, SetBackgroundColor(TermColor::Red))?,
        }

        let chosen = candidates.iter().find(|c| fits(c, cols, rows));
        let lines = match chosen {
            Some(text) => pad_to_size(text, cols, rows),
            None => pad_to_size("", cols, rows),
        };
        for (row, line) in lines.iter().enumerate().take(rows) {
            queue!(out, MoveTo(0, row as u16), Print(line))?;
        }
        queue!(out, ResetColor)?;
        out.flush()
    }
}

impl Screen for Display {
    fn render(&self, frame: &Frame<'_>) {
        let mut out = lock_terminal(&self.terminal);
        if let Err(e) = self.draw(&mut *out, frame) {
            log::debug!("Failed to draw frame: {}", e);
        }
    }

    fn bell(&self) {
        let mut out = lock_terminal(&self.terminal);
        if let Err(e) = out.write_all(b"\x07").and_then(|_| out.flush()) {
            log::debug!("Failed to ring bell: {}", e);
        }
    }
}

fn write_title(out: &mut impl Write, title: &str) -> io::Result<()> {
    write!(out, "\x1b]2;{}\x07", title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_builder() {
        let frame = Frame::new("42")
            .color(Color::Critical)
            .end(Some("12:00"))
            .window_title("42");
        assert_eq!(frame.text, "42");
        assert_eq!(frame.color, Color::Critical);
        assert_eq!(frame.end, Some("12:00"));
        assert_eq!(frame.window_title, Some("42"));
    }

    #[test]
    fn test_draw_writes_title_and_text() {
        let display = Display {
            terminal: super::super::shared_stdout(),
            title: String::new(),
            art_title: None,
            no_art: true,
            no_window_title: false,
        };
        let mut buf = Vec::new();
        display
            .draw(&mut buf, &Frame::new("17").window_title("17"))
            .unwrap();
        let written = String::from_utf8_lossy(&buf);
        assert!(written.starts_with("\x1b]2;17\x07"));
        assert!(written.contains("17"));
    }

    #[test]
    fn test_draw_skips_title_when_disabled() {
        let display = Display {
            terminal: super::super::shared_stdout(),
            title: String::new(),
            art_title: None,
            no_art: true,
            no_window_title: true,
        };
        let mut buf = Vec::new();
        display
            .draw(&mut buf, &Frame::new("17").window_title("17"))
            .unwrap();
        assert!(!String::from_utf8_lossy(&buf).contains("\x1b]2;"));
    }
}
