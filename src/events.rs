//! Event queue connecting the ticker, the input reader and the mode loop.
//!
//! Any number of producers hold an [`EventSender`]; the mode loop is the only
//! consumer and takes events one at a time from the [`EventQueue`]. Order is
//! FIFO across all producers.

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

/// A semantic key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Exit,
    Pause,
    Reset,
    Lap,
    Plus,
    Minus,
    /// Toggle the end time display (countdown only)
    ToggleEnd,
}

/// Everything the mode loop can be woken up by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Roughly one second has passed
    Tick,
    /// The user pressed a hotkey
    Input(InputEvent),
    /// Ctrl+C, either as a signal or as a key in raw mode
    Interrupt,
}

impl From<InputEvent> for Event {
    fn from(input: InputEvent) -> Self {
        Event::Input(input)
    }
}

/// Producer half handed to background threads.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: Sender<Event>,
}

impl EventSender {
    /// Enqueue an event without blocking.
    ///
    /// Returns `false` once the consumer is gone, which tells producer threads
    /// to stop.
    pub fn put(&self, event: impl Into<Event>) -> bool {
        self.tx.send(event.into()).is_ok()
    }
}

/// Unbounded FIFO mailbox consumed by the mode loop.
#[derive(Debug, Clone)]
pub struct EventQueue {
    tx: Sender<Event>,
    rx: Receiver<Event>,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventQueue {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        EventQueue { tx, rx }
    }

    /// A producer handle for another thread.
    pub fn sender(&self) -> EventSender {
        EventSender {
            tx: self.tx.clone(),
        }
    }

    /// Enqueue an event from the consumer side.
    pub fn put(&self, event: impl Into<Event>) {
        // cannot fail: self keeps the receiver alive
        let _ = self.tx.send(event.into());
    }

    /// Block until the next event arrives.
    pub fn get(&self) -> Event {
        match self.rx.recv() {
            Ok(event) => event,
            // unreachable while self holds a sender; treat as a request to stop
            Err(_) => Event::Interrupt,
        }
    }

    /// Wait up to `timeout` for the next event; `None` if nothing arrived.
    pub fn get_timeout(&self, timeout: Duration) -> Option<Event> {
        match self.rx.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(Event::Interrupt),
        }
    }

    /// Discard all pending events.
    pub fn drain(&self) -> usize {
        self.rx.try_iter().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Instant;

    #[test]
    fn test_fifo_order_single_producer() {
        let queue = EventQueue::new();
        queue.put(Event::Tick);
        queue.put(InputEvent::Pause);
        queue.put(Event::Interrupt);

        assert_eq!(queue.get(), Event::Tick);
        assert_eq!(queue.get(), Event::Input(InputEvent::Pause));
        assert_eq!(queue.get(), Event::Interrupt);
    }

    #[test]
    fn test_get_timeout_expires_without_event() {
        let queue = EventQueue::new();
        let started = Instant::now();
        assert_eq!(queue.get_timeout(Duration::from_millis(50)), None);
        assert!(started.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn test_get_timeout_returns_pending_event() {
        let queue = EventQueue::new();
        queue.put(InputEvent::Lap);
        assert_eq!(
            queue.get_timeout(Duration::from_millis(50)),
            Some(Event::Input(InputEvent::Lap))
        );
    }

    #[test]
    fn test_two_producers_lose_nothing() {
        let queue = EventQueue::new();
        let ticks = queue.sender();
        let keys = queue.sender();

        let a = thread::spawn(move || {
            for _ in 0..100 {
                assert!(ticks.put(Event::Tick));
            }
        });
        let b = thread::spawn(move || {
            for _ in 0..100 {
                assert!(keys.put(InputEvent::Plus));
            }
        });
        a.join().unwrap();
        b.join().unwrap();

        let mut tick_count = 0;
        let mut plus_count = 0;
        while let Some(event) = queue.get_timeout(Duration::from_millis(10)) {
            match event {
                Event::Tick => tick_count += 1,
                Event::Input(InputEvent::Plus) => plus_count += 1,
                other => panic!("unexpected event {:?}", other),
            }
        }
        assert_eq!(tick_count, 100);
        assert_eq!(plus_count, 100);
    }

    #[test]
    fn test_sender_reports_disconnected_consumer() {
        let queue = EventQueue::new();
        let sender = queue.sender();
        drop(queue);
        assert!(!sender.put(Event::Tick));
    }

    #[test]
    fn test_drain_discards_pending() {
        let queue = EventQueue::new();
        queue.put(Event::Tick);
        queue.put(Event::Tick);
        assert_eq!(queue.drain(), 2);
        assert_eq!(queue.get_timeout(Duration::from_millis(5)), None);
    }
}
