//! Stopwatch with laps.

use std::time::Instant;

use super::{Session, StopwatchReport, Termination, ADJUST_SECONDS};
use crate::clock::subsec_fraction;
use crate::events::{Event, InputEvent};
use crate::terminal::{Color, Frame};
use crate::ticker::Phase;

/// Time on the current lap: frozen while paused, otherwise measured from the
/// anchor plus the manual adjustment.
struct LapClock {
    anchor: Instant,
    bias: f64,
    frozen: Option<f64>,
}

impl LapClock {
    fn new(now: Instant) -> Self {
        LapClock {
            anchor: now,
            bias: 0.0,
            frozen: None,
        }
    }

    fn elapsed(&self, now: Instant) -> f64 {
        self.frozen
            .unwrap_or_else(|| now.saturating_duration_since(self.anchor).as_secs_f64() + self.bias)
    }

    /// Continue from the frozen value, which already reflects laps, resets and
    /// adjustments made while paused.
    fn resume(&mut self, now: Instant) {
        if let Some(value) = self.frozen.take() {
            self.anchor = now;
            self.bias = value;
        }
    }

    fn restart(&mut self, now: Instant) {
        self.anchor = now;
        self.bias = 0.0;
        if self.frozen.is_some() {
            self.frozen = Some(0.0);
        }
    }
}

pub(super) fn run(s: &Session<'_>) -> StopwatchReport {
    log::info!("Stopwatch started");
    let mut pacer = s.start_pacer(Phase::Offset(subsec_fraction(s.clock.now())));
    let mut lap = LapClock::new(s.clock.monotonic());
    let mut laps: Vec<f64> = Vec::new();
    let mut last_announced: Option<i64> = None;

    let report = |termination, lap: &LapClock, laps: Vec<f64>| StopwatchReport {
        termination,
        elapsed: lap.elapsed(s.clock.monotonic()),
        laps,
    };

    loop {
        let elapsed = lap.elapsed(s.clock.monotonic());
        if let Some(limit) = s.settings.quit_after {
            if laps.iter().sum::<f64>() + elapsed >= limit {
                return report(Termination::Completed, &lap, laps);
            }
        }

        let text = s.format(elapsed.floor());
        let color = if pacer.is_paused() {
            Color::Paused
        } else {
            Color::Normal
        };
        s.mirror(&text, elapsed);
        s.screen
            .render(&Frame::new(&text).color(color).window_title(&text));

        let second = elapsed.floor() as i64;
        if lap.frozen.is_none() && last_announced != Some(second) {
            s.announcer.stopwatch(second);
            last_announced = Some(second);
        }

        match s.events.get() {
            Event::Tick => {}
            Event::Interrupt => return report(Termination::Interrupted, &lap, laps),
            Event::Input(InputEvent::Exit) => return report(Termination::UserExit, &lap, laps),
            Event::Input(InputEvent::Pause) => match pacer.pause() {
                Some(paused_for) => {
                    log::debug!("Stopwatch resumed after {:.3}s", paused_for.as_secs_f64());
                    lap.resume(s.clock.monotonic());
                }
                None => lap.frozen = Some(lap.elapsed(s.clock.monotonic())),
            },
            Event::Input(InputEvent::Reset) => {
                laps.clear();
                last_announced = None;
                lap.restart(s.clock.monotonic());
            }
            Event::Input(InputEvent::Lap) => {
                let now = s.clock.monotonic();
                laps.push(lap.elapsed(now));
                log::debug!("Lap {}: {:.3}s", laps.len(), laps[laps.len() - 1]);
                lap.restart(now);
            }
            Event::Input(InputEvent::Plus) => {
                lap.bias += ADJUST_SECONDS;
                if let Some(value) = lap.frozen.as_mut() {
                    *value += ADJUST_SECONDS;
                }
            }
            Event::Input(InputEvent::Minus) => {
                lap.bias -= ADJUST_SECONDS;
                if let Some(value) = lap.frozen.as_mut() {
                    *value -= ADJUST_SECONDS;
                }
            }
            Event::Input(InputEvent::ToggleEnd) => {}
        }
    }
}
