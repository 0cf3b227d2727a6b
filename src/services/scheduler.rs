//! One-shot timer scheduling
//!
//! The reconnect managers and the sampling loop never sleep in place; they
//! ask a `Scheduler` to deliver an event after a delay and return to the
//! daemon's single control thread. Timers are one-shot: re-arming is always
//! an explicit decision of whoever handles the fired event.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Events delivered to the daemon control thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The sampling period elapsed; take a reading
    SampleDue,
    /// Link retry timer fired
    RetryLink,
    /// Session retry timer fired
    RetrySession,
    /// The link driver reported connectivity loss
    LinkDown,
    /// The broker acknowledged the connection
    SessionUp,
    /// The transport lost the broker connection
    SessionDown(String),
}

/// Capability to deliver an event after a delay
pub trait Scheduler {
    /// Schedule a one-shot delivery of `event` after `delay`
    fn schedule(&self, delay: Duration, event: Event);
}

/// Scheduler backed by detached sleeper threads
///
/// Each schedule spawns a thread that sleeps and posts the event on the
/// daemon channel. Sends to a closed channel are ignored; that only happens
/// during shutdown.
pub struct ThreadScheduler {
    tx: mpsc::Sender<Event>,
}

impl ThreadScheduler {
    /// Create a scheduler posting to the given channel
    pub fn new(tx: mpsc::Sender<Event>) -> Self {
        Self { tx }
    }
}

impl Scheduler for ThreadScheduler {
    fn schedule(&self, delay: Duration, event: Event) {
        let tx = self.tx.clone();
        let spawned = thread::Builder::new()
            .name("tempmon-timer".to_string())
            .spawn(move || {
                if !delay.is_zero() {
                    thread::sleep(delay);
                }
                let _ = tx.send(event);
            });

        if let Err(e) = spawned {
            log::error!("Failed to spawn timer thread: {}", e);
        }
    }
}
