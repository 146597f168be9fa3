//! Metronome producing one `Tick` event per second.
//!
//! The sleep target is recomputed from absolute wall-clock time on every cycle,
//! so sleep overhead never accumulates into drift. Ticks can be phase shifted so
//! they land on a countdown target's sub-second boundary instead of on full
//! wall-clock seconds.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::clock::{subsec_fraction, wall_seconds, Clock};
use crate::events::{Event, EventSender};

/// Wake-ups closer than this to the next boundary skip to the one after.
const MIN_SLEEP_SECS: f64 = 0.001;

/// Where within each wall-clock second ticks are placed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    /// On full seconds, never realigned (clock mode)
    Free,
    /// At the given fraction of each second; realigned on resume
    Offset(f64),
}

impl Phase {
    fn fraction(self) -> f64 {
        match self {
            Phase::Free => 0.0,
            Phase::Offset(offset) => offset.rem_euclid(1.0),
        }
    }
}

/// Pausable source of frame pacing.
pub trait Pacer: Send {
    /// Toggle the pause state.
    ///
    /// Returns the length of the pause when this call resumed, `None` when it
    /// paused.
    fn pause(&mut self) -> Option<Duration>;

    fn is_paused(&self) -> bool;

    /// Move future ticks to `phase`, dropping a tick already being waited for.
    fn realign(&mut self, phase: Phase);
}

/// Compute the wall-clock second (as a float) of the next tick after `now`.
pub fn next_boundary(now: f64, phase: Phase) -> f64 {
    let offset = phase.fraction();
    let mut target = (now - offset).floor() + 1.0 + offset;
    if target - now < MIN_SLEEP_SECS {
        target += 1.0;
    }
    target
}

#[derive(Debug)]
struct TickerState {
    phase: Phase,
    paused_at: Option<Instant>,
    /// Bumped on every pause and resume; a sleep planned under an older
    /// generation does not produce a tick
    generation: u64,
}

impl TickerState {
    fn new(phase: Phase) -> Self {
        TickerState {
            phase,
            paused_at: None,
            generation: 0,
        }
    }

    fn realign(&mut self, phase: Phase) {
        self.generation += 1;
        self.phase = phase;
    }

    fn toggle(&mut self, clock: &dyn Clock) -> Option<Duration> {
        self.generation += 1;
        match self.paused_at.take() {
            Some(started) => {
                let paused_for = clock.monotonic().saturating_duration_since(started);
                if let Phase::Offset(_) = self.phase {
                    // next tick one full second after resuming
                    self.phase = Phase::Offset(subsec_fraction(clock.now()));
                }
                Some(paused_for)
            }
            None => {
                self.paused_at = Some(clock.monotonic());
                None
            }
        }
    }
}

/// Background thread emitting `Event::Tick` once per second.
///
/// The thread keeps running while paused and simply swallows ticks. It stops
/// when the `Metronome` is dropped or the event consumer goes away.
pub struct Metronome {
    state: Arc<Mutex<TickerState>>,
    clock: Arc<dyn Clock>,
    stop_flag: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl Metronome {
    /// Spawn the tick thread.
    pub fn start(events: EventSender, clock: Arc<dyn Clock>, phase: Phase) -> Self {
        let state = Arc::new(Mutex::new(TickerState::new(phase)));
        let stop_flag = Arc::new(AtomicBool::new(false));

        let thread = {
            let state = state.clone();
            let clock = clock.clone();
            let stop_flag = stop_flag.clone();
            thread::Builder::new()
                .name("metronome".to_string())
                .spawn(move || run(&state, clock.as_ref(), &stop_flag, &events))
                .map_err(|e| log::error!("Failed to spawn metronome thread: {}", e))
                .ok()
        };

        Metronome {
            state,
            clock,
            stop_flag,
            thread,
        }
    }

    /// Current phase (offset within the second) of the ticks.
    pub fn phase(&self) -> Phase {
        lock(&self.state).phase
    }

    /// Stop emitting ticks. The thread exits after its current sleep.
    pub fn stop(&mut self) {
        self.stop_flag.store(true, Ordering::SeqCst);
        // detached: joining would block for up to a second
        self.thread = None;
    }
}

impl Pacer for Metronome {
    fn pause(&mut self) -> Option<Duration> {
        let resumed = lock(&self.state).toggle(self.clock.as_ref());
        match resumed {
            Some(d) => log::debug!("Metronome resumed after {:.3}s", d.as_secs_f64()),
            None => log::debug!("Metronome paused"),
        }
        resumed
    }

    fn is_paused(&self) -> bool {
        lock(&self.state).paused_at.is_some()
    }

    fn realign(&mut self, phase: Phase) {
        log::debug!("Metronome realigned to {:?}", phase);
        lock(&self.state).realign(phase);
    }
}

impl Drop for Metronome {
    fn drop(&mut self) {
        self.stop();
    }
}

fn lock(state: &Mutex<TickerState>) -> MutexGuard<'_, TickerState> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

fn run(state: &Mutex<TickerState>, clock: &dyn Clock, stop_flag: &AtomicBool, events: &EventSender) {
    while !stop_flag.load(Ordering::SeqCst) {
        let (phase, generation) = {
            let state = lock(state);
            (state.phase, state.generation)
        };
        let now = wall_seconds(clock.now());
        let target = next_boundary(now, phase);
        clock.sleep(Duration::from_secs_f64(target - now));

        if stop_flag.load(Ordering::SeqCst) {
            break;
        }
        let due = {
            let state = lock(state);
            state.generation == generation && state.paused_at.is_none()
        };
        if due && !events.put(Event::Tick) {
            log::debug!("Event consumer gone, metronome exiting");
            break;
        }
    }
}

/// Pacer without a thread, for sessions whose ticks come from elsewhere.
///
/// Implements the same pause contract as [`Metronome`].
pub struct ManualPacer {
    state: TickerState,
    clock: Arc<dyn Clock>,
}

impl ManualPacer {
    pub fn new(clock: Arc<dyn Clock>, phase: Phase) -> Self {
        ManualPacer {
            state: TickerState::new(phase),
            clock,
        }
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }
}

impl Pacer for ManualPacer {
    fn pause(&mut self) -> Option<Duration> {
        self.state.toggle(self.clock.as_ref())
    }

    fn is_paused(&self) -> bool {
        self.state.paused_at.is_some()
    }

    fn realign(&mut self, phase: Phase) {
        self.state.realign(phase);
    }
}
