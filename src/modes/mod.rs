//! The three timer modes and what they share.
//!
//! Every mode is a single-threaded loop: compute the value from absolute
//! instants, render it, then block on exactly one event from the queue.

mod clock;
mod countdown;
mod stopwatch;

use std::sync::Arc;

use crate::announce::Announcer;
use crate::clock::Clock;
use crate::config::{Mode, Settings};
use crate::error::TimerError;
use crate::events::EventQueue;
use crate::format::{format_seconds, format_seconds_alt};
use crate::mirror::MirrorFile;
use crate::terminal::Screen;
use crate::ticker::{ManualPacer, Metronome, Pacer, Phase};

/// Step applied by the Plus and Minus keys.
pub const ADJUST_SECONDS: f64 = 10.0;

/// Why a mode loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The countdown finished or the quit-after limit was reached
    Completed,
    /// The user pressed the exit key
    UserExit,
    /// Ctrl+C
    Interrupted,
}

impl Termination {
    pub fn exit_code(self) -> i32 {
        match self {
            Termination::Completed | Termination::UserExit => 0,
            Termination::Interrupted => 1,
        }
    }
}

/// Result of a stopwatch run, used for the lap summary.
#[derive(Debug, Clone, PartialEq)]
pub struct StopwatchReport {
    pub termination: Termination,
    /// Time on the final, still running lap
    pub elapsed: f64,
    /// Completed laps in order
    pub laps: Vec<f64>,
}

impl StopwatchReport {
    /// Sum of all laps and the final lap.
    pub fn total(&self) -> f64 {
        self.laps.iter().sum::<f64>() + self.elapsed
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Countdown(Termination),
    Stopwatch(StopwatchReport),
    Clock(Termination),
}

impl Outcome {
    pub fn termination(&self) -> Termination {
        match self {
            Outcome::Countdown(t) | Outcome::Clock(t) => *t,
            Outcome::Stopwatch(report) => report.termination,
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.termination().exit_code()
    }
}

/// Where ticks come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickSource {
    /// A metronome thread started by the mode
    Metronome,
    /// Someone else puts `Tick` events into the queue
    External,
}

/// Everything a mode loop works with.
pub struct Session<'a> {
    pub settings: &'a Settings,
    pub clock: Arc<dyn Clock>,
    pub events: &'a EventQueue,
    pub screen: &'a dyn Screen,
    pub mirror: Option<&'a MirrorFile>,
    pub announcer: &'a Announcer,
    pub ticks: TickSource,
}

impl Session<'_> {
    fn start_pacer(&self, phase: Phase) -> Box<dyn Pacer> {
        match self.ticks {
            TickSource::Metronome => Box::new(Metronome::start(
                self.events.sender(),
                self.clock.clone(),
                phase,
            )),
            TickSource::External => Box::new(ManualPacer::new(self.clock.clone(), phase)),
        }
    }

    /// Format a number of seconds according to the display settings.
    fn format(&self, seconds: f64) -> String {
        if self.settings.alt_format {
            format_seconds_alt(seconds, self.settings.no_seconds)
        } else {
            format_seconds(seconds, self.settings.no_seconds)
        }
    }

    fn mirror(&self, text: &str, value: f64) {
        if let Some(mirror) = self.mirror {
            mirror.write(text, value);
        }
    }
}

/// Run the mode selected in the settings until it terminates.
pub fn run(session: &Session<'_>) -> Result<Outcome, TimerError> {
    let outcome = match &session.settings.mode {
        Mode::Countdown(spec) => Outcome::Countdown(countdown::run(session, spec)?),
        Mode::Stopwatch => Outcome::Stopwatch(stopwatch::run(session)),
        Mode::Clock => Outcome::Clock(clock::run(session)),
    };
    log::info!("Finished: {:?}", outcome.termination());
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(Termination::Completed.exit_code(), 0);
        assert_eq!(Termination::UserExit.exit_code(), 0);
        assert_eq!(Termination::Interrupted.exit_code(), 1);
    }

    #[test]
    fn test_report_total() {
        let report = StopwatchReport {
            termination: Termination::UserExit,
            elapsed: 2.0,
            laps: vec![1.0, 1.5],
        };
        assert!((report.total() - 4.5).abs() < 1e-9);
        assert_eq!(Outcome::Stopwatch(report).exit_code(), 0);
    }
}
