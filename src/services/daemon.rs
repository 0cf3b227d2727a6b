//! Daemon event loop
//!
//! A single control thread owns all mutable state: both connection state
//! machines, the threshold episode, and the sampler. Timer threads and the
//! transport pump only post events onto the channel drained here, so state
//! transitions never race. Sampling is paced by rescheduling `SampleDue` a
//! full period after each tick completes.

use crate::domain::Tick;
use crate::error::{AppError, Result};
use crate::net::link::{LinkManager, NetworkLink};
use crate::net::session::{MessagingSession, MqttTransport};
use crate::sensor::TemperatureProbe;
use crate::services::sampler::Sampler;
use crate::services::scheduler::{Event, Scheduler};

use std::sync::mpsc;
use std::time::{Duration, Instant};

/// Long-running daemon wiring the sampler to the connectivity managers
pub struct Daemon<P, L, T, S>
where
    P: TemperatureProbe,
    L: NetworkLink,
    T: MqttTransport,
    S: Scheduler,
{
    link: LinkManager<L>,
    session: MessagingSession<T>,
    sampler: Sampler<P>,
    scheduler: S,
    events: mpsc::Receiver<Event>,
    sample_period: Duration,
    started: Instant,
}

impl<P, L, T, S> Daemon<P, L, T, S>
where
    P: TemperatureProbe,
    L: NetworkLink,
    T: MqttTransport,
    S: Scheduler,
{
    /// Create a daemon
    pub fn new(
        link: LinkManager<L>,
        session: MessagingSession<T>,
        sampler: Sampler<P>,
        scheduler: S,
        events: mpsc::Receiver<Event>,
        sample_period: Duration,
    ) -> Self {
        Self {
            link,
            session,
            sampler,
            scheduler,
            events,
            sample_period,
            started: Instant::now(),
        }
    }

    /// Run until the event channel closes
    ///
    /// Brings the link up first, then the session, then starts sampling
    /// immediately. Runs indefinitely; connectivity failures self-heal via
    /// the retry timers.
    pub fn run(&mut self) -> Result<()> {
        log::info!(
            "Starting sampling loop (period {:?})",
            self.sample_period
        );

        self.link.ensure_connected(&self.scheduler);
        self.session
            .ensure_connected(self.link.status(), &self.scheduler);
        self.scheduler.schedule(Duration::ZERO, Event::SampleDue);

        loop {
            let event = self
                .events
                .recv()
                .map_err(|_| AppError::EventChannelClosed)?;
            self.handle_event(event);
        }
    }

    /// Dispatch one event
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::SampleDue => {
                let tick = self.now();
                self.sampler.tick(&mut self.session, tick);
                self.scheduler.schedule(self.sample_period, Event::SampleDue);
            }
            Event::RetryLink => {
                self.link.retry(&self.scheduler);
                if self.link.status().is_connected() {
                    // A recovered link is what re-triggers a session attempt
                    self.session
                        .ensure_connected(self.link.status(), &self.scheduler);
                }
            }
            Event::RetrySession => {
                self.session.retry(self.link.status(), &self.scheduler);
            }
            Event::LinkDown => {
                self.link.on_lost(&self.scheduler);
            }
            Event::SessionUp => {
                self.session.on_connected();
            }
            Event::SessionDown(reason) => {
                log::debug!("Transport reported disconnect: {}", reason);
                self.session
                    .on_disconnected(self.link.status(), &self.scheduler);
            }
        }
    }

    fn now(&self) -> Tick {
        Tick::from_millis(self.started.elapsed().as_millis() as u64)
    }
}
