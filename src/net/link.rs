//! Network link management
//!
//! `LinkManager` keeps a best-effort always-up link through whatever driver
//! implements `NetworkLink`. Failures are never fatal; every failed or lost
//! connection resolves to a one-shot retry on a fixed delay.

use crate::domain::ConnectionState;
use crate::error::LinkError;
use crate::services::scheduler::{Event, Scheduler};

use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

/// Trait for network link drivers
///
/// A driver dials the network when asked. Loss is reported out of band,
/// through the daemon's `LinkDown` event, by drivers that can observe it.
pub trait NetworkLink {
    /// Attempt to bring the link up; blocking, bounded by the driver's timeout
    fn connect(&mut self) -> Result<(), LinkError>;
}

/// Link driver probing reachability with a bounded TCP dial
///
/// The host-daemon stand-in for a platform network driver: the link counts
/// as up when the probe address accepts a TCP connection within the timeout.
#[derive(Debug)]
pub struct TcpLink {
    addr: String,
    timeout: Duration,
}

impl TcpLink {
    /// Create a link probing `addr` (host:port) with the given dial timeout
    pub fn new(addr: impl Into<String>, timeout: Duration) -> Self {
        Self {
            addr: addr.into(),
            timeout,
        }
    }
}

impl NetworkLink for TcpLink {
    fn connect(&mut self) -> Result<(), LinkError> {
        let addrs: Vec<_> = self
            .addr
            .to_socket_addrs()
            .map_err(|_| LinkError::AddressResolution(self.addr.clone()))?
            .collect();

        let mut last_err = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, self.timeout) {
                Ok(_) => return Ok(()),
                Err(e) => last_err = Some(e),
            }
        }

        Err(LinkError::Unreachable {
            addr: self.addr.clone(),
            source: last_err.unwrap_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::NotFound, "no addresses resolved")
            }),
        })
    }
}

/// Reconnect state machine for the network link
pub struct LinkManager<L: NetworkLink> {
    link: L,
    state: ConnectionState,
    retry_delay: Duration,
    retry_pending: bool,
}

impl<L: NetworkLink> LinkManager<L> {
    /// Create a manager for a link driver with a fixed retry delay
    pub fn new(link: L, retry_delay: Duration) -> Self {
        Self {
            link,
            state: ConnectionState::Disconnected,
            retry_delay,
            retry_pending: false,
        }
    }

    /// Current link state
    pub fn status(&self) -> ConnectionState {
        self.state
    }

    /// Bring the link up if it is down and no attempt is in flight
    ///
    /// Idempotent. On failure the link stays down and a one-shot retry is
    /// scheduled; retries continue indefinitely.
    pub fn ensure_connected(&mut self, timers: &dyn Scheduler) {
        if self.state != ConnectionState::Disconnected || self.retry_pending {
            return;
        }

        self.state = ConnectionState::Connecting;
        log::info!("Connecting network link");

        match self.link.connect() {
            Ok(()) => {
                self.state = ConnectionState::Connected;
                log::info!("Network link up");
            }
            Err(e) => {
                self.state = ConnectionState::Disconnected;
                log::warn!(
                    "Network link connect failed: {}; retrying in {:?}",
                    e,
                    self.retry_delay
                );
                self.schedule_retry(timers);
            }
        }
    }

    /// Handle a driver-reported connectivity loss
    pub fn on_lost(&mut self, timers: &dyn Scheduler) {
        if self.state == ConnectionState::Disconnected && self.retry_pending {
            return;
        }

        self.state = ConnectionState::Disconnected;
        log::warn!(
            "Network link lost; reconnecting in {:?}",
            self.retry_delay
        );
        self.schedule_retry(timers);
    }

    /// Handle the retry timer firing
    pub fn retry(&mut self, timers: &dyn Scheduler) {
        self.retry_pending = false;
        self.ensure_connected(timers);
    }

    fn schedule_retry(&mut self, timers: &dyn Scheduler) {
        self.retry_pending = true;
        timers.schedule(self.retry_delay, Event::RetryLink);
    }
}
