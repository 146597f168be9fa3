//! Countdown to a target instant.

use chrono::{DateTime, Utc};
use std::time::Duration;

use super::{Session, Termination, ADJUST_SECONDS};
use crate::clock::{chrono_seconds, seconds_between, subsec_fraction};
use crate::error::ParseError;
use crate::events::{Event, InputEvent};
use crate::terminal::{Color, Frame};
use crate::ticker::{Pacer, Phase};
use crate::timespec::{format_target, TimeSpec};

/// Interval between blink frames once the countdown has finished.
const BLINK_INTERVAL: Duration = Duration::from_millis(500);

enum Finish {
    Done(Termination),
    /// Reset pressed after the end: count down to this target again
    Restart(DateTime<Utc>),
}

pub(super) fn run(s: &Session<'_>, spec: &TimeSpec) -> Result<Termination, ParseError> {
    let mut target = spec.resolve(s.clock.now())?;
    log::info!("Counting down to {}", target);

    let mut pacer = s.start_pacer(phase_of(target));
    let mut show_end = s.settings.show_end;
    let mut frozen: Option<f64> = None;
    let mut last_announced: Option<i64> = None;

    loop {
        loop {
            let now = s.clock.now();
            let remaining = frozen.unwrap_or_else(|| seconds_between(now, target));
            if remaining <= 0.0 {
                break;
            }

            let text = s.format(remaining);
            let end_text = show_end.then(|| {
                format_target(target, now, &s.settings.time_format, &s.settings.date_format)
            });
            let color = if pacer.is_paused() {
                Color::Paused
            } else if remaining <= s.settings.critical as f64 {
                Color::Critical
            } else {
                Color::Normal
            };
            s.mirror(&text, remaining);
            s.screen.render(
                &Frame::new(&text)
                    .color(color)
                    .end(end_text.as_deref())
                    .window_title(&text),
            );

            let second = remaining.ceil() as i64;
            if frozen.is_none() && last_announced != Some(second) {
                s.announcer.countdown(second);
                last_announced = Some(second);
            }

            match s.events.get() {
                Event::Tick => {}
                Event::Interrupt => return Ok(Termination::Interrupted),
                Event::Input(InputEvent::Exit) => return Ok(Termination::UserExit),
                Event::Input(InputEvent::Pause) => match pacer.pause() {
                    Some(paused_for) => {
                        target = target + chrono_seconds(paused_for.as_secs_f64());
                        pacer.realign(phase_of(target));
                        frozen = None;
                    }
                    None => frozen = Some(seconds_between(s.clock.now(), target)),
                },
                Event::Input(InputEvent::Reset) => {
                    if pacer.is_paused() {
                        pacer.pause();
                    }
                    frozen = None;
                    last_announced = None;
                    target = spec.resolve(s.clock.now())?;
                    pacer.realign(phase_of(target));
                    log::debug!("Countdown reset, new target {}", target);
                }
                Event::Input(InputEvent::Plus) => adjust(&mut target, &mut frozen, ADJUST_SECONDS),
                Event::Input(InputEvent::Minus) => adjust(&mut target, &mut frozen, -ADJUST_SECONDS),
                Event::Input(InputEvent::ToggleEnd) => show_end = !show_end,
                Event::Input(InputEvent::Lap) => {}
            }
        }

        match finish(s, pacer.as_mut(), target, spec)? {
            Finish::Done(termination) => return Ok(termination),
            Finish::Restart(new_target) => {
                target = new_target;
                pacer.realign(phase_of(target));
                frozen = None;
                last_announced = None;
            }
        }
    }
}

/// Ticks land where the remaining time crosses a whole second.
fn phase_of(target: DateTime<Utc>) -> Phase {
    Phase::Offset(subsec_fraction(target))
}

fn adjust(target: &mut DateTime<Utc>, frozen: &mut Option<f64>, seconds: f64) {
    *target = *target + chrono_seconds(seconds);
    if let Some(value) = frozen.as_mut() {
        *value += seconds;
    }
}

/// Ring, mark the mirror file and optionally blink until the user reacts.
fn finish(
    s: &Session<'_>,
    pacer: &mut dyn Pacer,
    target: DateTime<Utc>,
    spec: &TimeSpec,
) -> Result<Finish, ParseError> {
    log::info!("Countdown finished");
    if !s.settings.no_bell {
        s.screen.bell();
    }
    if let Some(mirror) = s.mirror {
        mirror.write_done(s.settings.text.as_deref());
    }
    if !s.settings.blink && s.settings.text.is_none() {
        return Ok(Finish::Done(Termination::Completed));
    }

    // no ticks while blinking
    if !pacer.is_paused() {
        pacer.pause();
    }
    let base = if s.settings.blink {
        Color::Critical
    } else {
        Color::Normal
    };
    let text = s.settings.text.as_deref().unwrap_or("");
    let mut flip = true;

    loop {
        if let Some(limit) = s.settings.quit_after {
            if seconds_between(target, s.clock.now()) >= limit {
                return Ok(Finish::Done(Termination::Completed));
            }
        }

        s.screen.render(
            &Frame::new(text)
                .color(if flip { base } else { Color::Inverse })
                .window_title(if flip { "/" } else { "\\" }),
        );
        if s.settings.blink {
            flip = !flip;
        }

        match s.events.get_timeout(BLINK_INTERVAL) {
            None | Some(Event::Tick) => {}
            Some(Event::Interrupt) => return Ok(Finish::Done(Termination::Interrupted)),
            Some(Event::Input(InputEvent::Exit)) => return Ok(Finish::Done(Termination::UserExit)),
            Some(Event::Input(InputEvent::Reset)) => {
                pacer.pause();
                let target = spec.resolve(s.clock.now())?;
                log::debug!("Countdown restarted, new target {}", target);
                return Ok(Finish::Restart(target));
            }
            Some(Event::Input(_)) => {}
        }
    }
}
