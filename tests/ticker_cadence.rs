//! Timing tests for the metronome against the real clock.
//!
//! These take several seconds each: ticks are one second apart by definition.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use termdown::clock::{subsec_fraction, SystemClock};
use termdown::events::{Event, EventQueue};
use termdown::ticker::{Metronome, Pacer, Phase};

const WAIT: Duration = Duration::from_millis(1500);

fn next_tick(queue: &EventQueue) -> Instant {
    match queue.get_timeout(WAIT) {
        Some(Event::Tick) => Instant::now(),
        other => panic!("expected a tick, got {:?}", other),
    }
}

#[test]
fn test_ticks_are_one_second_apart() {
    let queue = EventQueue::new();
    let _metronome = Metronome::start(queue.sender(), Arc::new(SystemClock), Phase::Free);

    let ticks: Vec<(Instant, i64)> = (0..8)
        .map(|_| {
            let at = next_tick(&queue);
            (at, Utc::now().timestamp())
        })
        .collect();
    for pair in ticks.windows(2) {
        let gap = pair[1].0 - pair[0].0;
        assert!(
            gap > Duration::from_millis(850) && gap < Duration::from_millis(1150),
            "gap {:?}",
            gap
        );
        // each tick on its own second, none skipped
        assert_eq!(pair[1].1, pair[0].1 + 1, "ticks at {:?}", ticks);
    }
}

#[test]
fn test_free_ticks_land_on_full_seconds() {
    let queue = EventQueue::new();
    let _metronome = Metronome::start(queue.sender(), Arc::new(SystemClock), Phase::Free);

    next_tick(&queue);
    let fraction = subsec_fraction(Utc::now());
    // shortly after the boundary, never before it
    assert!(fraction < 0.1, "tick at fraction {}", fraction);
}

#[test]
fn test_offset_ticks_follow_phase() {
    let queue = EventQueue::new();
    let _metronome = Metronome::start(
        queue.sender(),
        Arc::new(SystemClock),
        Phase::Offset(0.5),
    );

    next_tick(&queue);
    let fraction = subsec_fraction(Utc::now());
    assert!((0.5..0.6).contains(&fraction), "tick at fraction {}", fraction);
}

#[test]
fn test_paused_metronome_is_silent() {
    let queue = EventQueue::new();
    let mut metronome = Metronome::start(queue.sender(), Arc::new(SystemClock), Phase::Offset(0.0));

    next_tick(&queue);
    assert_eq!(metronome.pause(), None);
    assert!(metronome.is_paused());
    queue.drain();
    assert_eq!(queue.get_timeout(WAIT), None);

    let paused_for = metronome.pause().expect("resume returns the pause length");
    assert!(paused_for >= WAIT);
    // realigned to the resume instant: the next tick comes a full second later
    let resumed = Instant::now();
    let tick = next_tick(&queue);
    let gap = tick - resumed;
    assert!(
        gap > Duration::from_millis(900) && gap < Duration::from_millis(1150),
        "gap {:?}",
        gap
    );
}

#[test]
fn test_dropped_metronome_stops() {
    let queue = EventQueue::new();
    let metronome = Metronome::start(queue.sender(), Arc::new(SystemClock), Phase::Free);
    next_tick(&queue);
    drop(metronome);
    assert_eq!(queue.get_timeout(WAIT), None);
}

#[test]
fn test_realign_moves_ticks_to_new_phase() {
    let queue = EventQueue::new();
    let mut metronome = Metronome::start(queue.sender(), Arc::new(SystemClock), Phase::Offset(0.0));

    next_tick(&queue);
    metronome.realign(Phase::Offset(0.5));
    // the wait for the old full-second boundary is dropped, so the next tick
    // comes about 1.5 s later
    assert_eq!(queue.get_timeout(Duration::from_millis(2500)), Some(Event::Tick));
    let fraction = subsec_fraction(Utc::now());
    assert!((0.5..0.6).contains(&fraction), "tick at fraction {}", fraction);
}
