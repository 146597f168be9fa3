//! Wall clock display.

use chrono::Local;

use super::{Session, Termination, ADJUST_SECONDS};
use crate::clock::chrono_seconds;
use crate::events::{Event, InputEvent};
use crate::terminal::{Color, Frame};
use crate::ticker::Phase;

pub(super) fn run(s: &Session<'_>) -> Termination {
    log::info!("Clock started");
    // kept alive for its ticks; pausing the clock only changes the color
    let _pacer = s.start_pacer(Phase::Free);
    let started = s.clock.monotonic();
    let mut offset = chrono::Duration::zero();
    let mut paused = false;

    loop {
        let elapsed = s
            .clock
            .monotonic()
            .saturating_duration_since(started)
            .as_secs_f64();
        if let Some(limit) = s.settings.quit_after {
            if elapsed >= limit {
                return Termination::Completed;
            }
        }

        let shown = (s.clock.now() + offset).with_timezone(&Local);
        let text = shown.format(&s.settings.time_format).to_string();
        let color = if paused { Color::Paused } else { Color::Normal };
        s.mirror(&text, elapsed);
        s.screen
            .render(&Frame::new(&text).color(color).window_title(&text));

        match s.events.get() {
            Event::Tick => {}
            Event::Interrupt => return Termination::Interrupted,
            Event::Input(InputEvent::Exit) => return Termination::UserExit,
            Event::Input(InputEvent::Pause) => paused = !paused,
            Event::Input(InputEvent::Reset) => offset = chrono::Duration::zero(),
            Event::Input(InputEvent::Plus) => offset = offset + chrono_seconds(ADJUST_SECONDS),
            Event::Input(InputEvent::Minus) => offset = offset - chrono_seconds(ADJUST_SECONDS),
            Event::Input(InputEvent::Lap) | Event::Input(InputEvent::ToggleEnd) => {}
        }
    }
}
