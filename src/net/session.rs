//! Messaging session management
//!
//! `MessagingSession` layers broker connectivity on top of the link manager.
//! It only ever dials while the link is up, marks itself connected on the
//! broker's acknowledgement, and on disconnect schedules a one-shot retry
//! only while the link is still up; with the link down it waits for link
//! recovery to trigger a fresh attempt. Publishing is fire-and-forget:
//! while disconnected a publish is dropped with a warning, never an error.

use crate::domain::{ConnectionState, PacketId, Qos};
use crate::error::SessionError;
use crate::services::scheduler::{Event, Scheduler};

use std::time::Duration;

/// Trait for messaging transports
///
/// `connect` launches a connection attempt; the outcome arrives later as
/// `SessionUp`/`SessionDown` events on the daemon channel. `publish` is only
/// meaningful on an established connection.
pub trait MqttTransport {
    /// Launch a connection attempt
    fn connect(&mut self) -> Result<(), SessionError>;

    /// Publish a message, returning the assigned packet id
    fn publish(
        &mut self,
        topic: &str,
        qos: Qos,
        retain: bool,
        payload: &[u8],
    ) -> Result<PacketId, SessionError>;
}

/// Reconnect state machine for the broker session
pub struct MessagingSession<T: MqttTransport> {
    transport: T,
    state: ConnectionState,
    retry_delay: Duration,
    retry_pending: bool,
}

impl<T: MqttTransport> MessagingSession<T> {
    /// Create a session over a transport with a fixed retry delay
    pub fn new(transport: T, retry_delay: Duration) -> Self {
        Self {
            transport,
            state: ConnectionState::Disconnected,
            retry_delay,
            retry_pending: false,
        }
    }

    /// Current session state
    pub fn status(&self) -> ConnectionState {
        self.state
    }

    /// Dial the broker if the session is down and the link is up
    ///
    /// Idempotent. With the link down this is a deferral, not a failure:
    /// link recovery re-invokes it.
    pub fn ensure_connected(&mut self, link: ConnectionState, timers: &dyn Scheduler) {
        if self.state != ConnectionState::Disconnected || self.retry_pending {
            return;
        }
        if !link.is_connected() {
            log::debug!("Broker connect deferred: network link {}", link);
            return;
        }

        self.state = ConnectionState::Connecting;
        log::info!("Connecting to MQTT broker");

        if let Err(e) = self.transport.connect() {
            self.state = ConnectionState::Disconnected;
            log::warn!(
                "Broker connect failed: {}; retrying in {:?}",
                e,
                self.retry_delay
            );
            self.schedule_retry(timers);
        }
    }

    /// Handle the broker's connection acknowledgement
    pub fn on_connected(&mut self) {
        self.state = ConnectionState::Connected;
        log::info!("Connected to MQTT broker");
    }

    /// Handle a transport disconnect
    ///
    /// Schedules a one-shot reconnect only while the link is up; otherwise
    /// the session stays down until the link recovers.
    pub fn on_disconnected(&mut self, link: ConnectionState, timers: &dyn Scheduler) {
        if self.state == ConnectionState::Disconnected && self.retry_pending {
            return;
        }

        self.state = ConnectionState::Disconnected;
        if link.is_connected() {
            log::warn!(
                "Disconnected from MQTT broker; reconnecting in {:?}",
                self.retry_delay
            );
            self.schedule_retry(timers);
        } else {
            log::warn!("Disconnected from MQTT broker; waiting for network link recovery");
        }
    }

    /// Handle the retry timer firing
    pub fn retry(&mut self, link: ConnectionState, timers: &dyn Scheduler) {
        self.retry_pending = false;
        self.ensure_connected(link, timers);
    }

    /// Publish a message, dropping it with a warning when not connected
    pub fn publish(
        &mut self,
        topic: &str,
        qos: Qos,
        retain: bool,
        payload: &[u8],
    ) -> Option<PacketId> {
        if self.state != ConnectionState::Connected {
            log::warn!("Dropping publish to {}: session {}", topic, self.state);
            return None;
        }

        match self.transport.publish(topic, qos, retain, payload) {
            Ok(id) => Some(id),
            Err(e) => {
                log::warn!("Publish to {} failed: {}", topic, e);
                None
            }
        }
    }

    fn schedule_retry(&mut self, timers: &dyn Scheduler) {
        self.retry_pending = true;
        timers.schedule(self.retry_delay, Event::RetrySession);
    }

    #[cfg(test)]
    pub(crate) fn transport(&self) -> &T {
        &self.transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockTransport, RecordingScheduler};

    const RETRY: Duration = Duration::from_millis(2000);

    fn session() -> MessagingSession<MockTransport> {
        MessagingSession::new(MockTransport::new(), RETRY)
    }

    #[test]
    fn test_never_dials_while_link_down() {
        let timers = RecordingScheduler::new();
        let mut session = session();

        session.ensure_connected(ConnectionState::Disconnected, &timers);
        session.ensure_connected(ConnectionState::Connecting, &timers);

        assert_eq!(session.transport.connect_calls(), 0);
        assert_eq!(session.status(), ConnectionState::Disconnected);
        assert!(timers.take().is_empty());
    }

    #[test]
    fn test_dials_when_link_up_and_connects_on_ack() {
        let timers = RecordingScheduler::new();
        let mut session = session();

        session.ensure_connected(ConnectionState::Connected, &timers);
        assert_eq!(session.status(), ConnectionState::Connecting);
        assert_eq!(session.transport.connect_calls(), 1);

        session.on_connected();
        assert_eq!(session.status(), ConnectionState::Connected);
    }

    #[test]
    fn test_ensure_connected_is_idempotent_while_connecting() {
        let timers = RecordingScheduler::new();
        let mut session = session();

        session.ensure_connected(ConnectionState::Connected, &timers);
        session.ensure_connected(ConnectionState::Connected, &timers);

        assert_eq!(session.transport.connect_calls(), 1);
    }

    #[test]
    fn test_failed_dial_schedules_single_retry() {
        let timers = RecordingScheduler::new();
        let transport =
            MockTransport::new().with_connect_results(vec![Err(SessionError::NotConnected)]);
        let mut session = MessagingSession::new(transport, RETRY);

        session.ensure_connected(ConnectionState::Connected, &timers);

        assert_eq!(session.status(), ConnectionState::Disconnected);
        assert_eq!(timers.take(), vec![(RETRY, Event::RetrySession)]);
    }

    #[test]
    fn test_disconnect_with_link_up_schedules_retry() {
        let timers = RecordingScheduler::new();
        let mut session = session();
        session.ensure_connected(ConnectionState::Connected, &timers);
        session.on_connected();

        session.on_disconnected(ConnectionState::Connected, &timers);

        assert_eq!(session.status(), ConnectionState::Disconnected);
        assert_eq!(timers.take(), vec![(RETRY, Event::RetrySession)]);
    }

    #[test]
    fn test_disconnect_with_link_down_waits_for_link() {
        let timers = RecordingScheduler::new();
        let mut session = session();
        session.ensure_connected(ConnectionState::Connected, &timers);
        session.on_connected();

        session.on_disconnected(ConnectionState::Disconnected, &timers);

        assert_eq!(session.status(), ConnectionState::Disconnected);
        assert!(timers.take().is_empty());
    }

    #[test]
    fn test_duplicate_disconnects_do_not_stack_timers() {
        let timers = RecordingScheduler::new();
        let mut session = session();
        session.ensure_connected(ConnectionState::Connected, &timers);
        session.on_connected();

        session.on_disconnected(ConnectionState::Connected, &timers);
        session.on_disconnected(ConnectionState::Connected, &timers);

        assert_eq!(timers.take().len(), 1);
    }

    #[test]
    fn test_publish_while_disconnected_is_a_dropped_no_op() {
        let mut session = session();

        let id = session.publish("sensor/temperature", Qos::AtLeastOnce, true, b"21.50");

        assert_eq!(id, None);
        assert!(session.transport.publishes().is_empty());
    }

    #[test]
    fn test_publish_while_connected_returns_packet_id() {
        let timers = RecordingScheduler::new();
        let mut session = session();
        session.ensure_connected(ConnectionState::Connected, &timers);
        session.on_connected();

        let id = session.publish("sensor/temperature", Qos::AtLeastOnce, true, b"21.50");

        assert!(id.is_some());
        let publishes = session.transport.publishes();
        assert_eq!(publishes.len(), 1);
        assert_eq!(publishes[0].topic, "sensor/temperature");
        assert!(publishes[0].retain);
    }

    #[test]
    fn test_retry_after_link_recovery_dials_again() {
        let timers = RecordingScheduler::new();
        let mut session = session();
        session.ensure_connected(ConnectionState::Connected, &timers);
        session.on_connected();
        session.on_disconnected(ConnectionState::Connected, &timers);

        // Timer fires while the link is down: deferred, not failed
        session.retry(ConnectionState::Disconnected, &timers);
        assert_eq!(session.transport.connect_calls(), 1);

        // Link recovery re-invokes ensure_connected
        session.ensure_connected(ConnectionState::Connected, &timers);
        assert_eq!(session.transport.connect_calls(), 2);
    }
}
