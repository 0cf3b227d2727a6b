//! Mock implementations for testing
//!
//! Provides scripted probe, link, transport, and scheduler doubles for unit
//! testing without real hardware or a broker.

use crate::domain::{Celsius, PacketId, Qos};
use crate::error::{LinkError, SensorError, SessionError};
use crate::net::link::NetworkLink;
use crate::net::session::MqttTransport;
use crate::sensor::TemperatureProbe;
use crate::services::scheduler::{Event, Scheduler};

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Scripted temperature probe
///
/// Returns queued results in order; an exhausted script reads as a sensor
/// failure so tests fail loudly rather than loop on stale data.
#[derive(Debug, Default)]
pub struct MockProbe {
    readings: Mutex<VecDeque<Result<Celsius, SensorError>>>,
}

impl MockProbe {
    /// Create a probe with an empty script
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: queue scripted results
    pub fn with_readings(self, readings: Vec<Result<Celsius, SensorError>>) -> Self {
        self.readings.lock().unwrap().extend(readings);
        self
    }

    /// Queue one successful reading
    pub fn push_ok(&self, degrees: f64) {
        self.readings
            .lock()
            .unwrap()
            .push_back(Ok(Celsius::new(degrees)));
    }

    /// Queue one failed reading
    pub fn push_err(&self, err: SensorError) {
        self.readings.lock().unwrap().push_back(Err(err));
    }
}

impl TemperatureProbe for MockProbe {
    fn read_temperature(&mut self) -> Result<Celsius, SensorError> {
        self.readings
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(SensorError::Malformed("mock script exhausted".to_string())))
    }
}

/// Scripted network link
///
/// Pops queued connect results; an exhausted script connects successfully.
#[derive(Debug, Default)]
pub struct MockLink {
    results: Mutex<VecDeque<Result<(), LinkError>>>,
    connect_calls: AtomicUsize,
}

impl MockLink {
    /// Create a link that always connects
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: queue scripted connect results
    pub fn with_results(self, results: Vec<Result<(), LinkError>>) -> Self {
        self.results.lock().unwrap().extend(results);
        self
    }

    /// Number of connect attempts made
    pub fn connect_calls(&self) -> usize {
        self.connect_calls.load(Ordering::SeqCst)
    }
}

impl NetworkLink for MockLink {
    fn connect(&mut self) -> Result<(), LinkError> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        self.results.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}

/// Record of one publish accepted by the mock transport
#[derive(Debug, Clone, PartialEq)]
pub struct PublishRecord {
    pub topic: String,
    pub qos: Qos,
    pub retain: bool,
    pub payload: Vec<u8>,
}

/// Scripted messaging transport
///
/// Connects successfully unless scripted otherwise; records every publish
/// and assigns sequential packet ids.
#[derive(Debug, Default)]
pub struct MockTransport {
    connect_results: Mutex<VecDeque<Result<(), SessionError>>>,
    connect_calls: AtomicUsize,
    publishes: Mutex<Vec<PublishRecord>>,
    next_pkid: AtomicUsize,
}

impl MockTransport {
    /// Create a transport that accepts everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: queue scripted connect results
    pub fn with_connect_results(self, results: Vec<Result<(), SessionError>>) -> Self {
        self.connect_results.lock().unwrap().extend(results);
        self
    }

    /// Number of connect attempts made
    pub fn connect_calls(&self) -> usize {
        self.connect_calls.load(Ordering::SeqCst)
    }

    /// All publishes accepted so far, in order
    pub fn publishes(&self) -> Vec<PublishRecord> {
        self.publishes.lock().unwrap().clone()
    }
}

impl MqttTransport for MockTransport {
    fn connect(&mut self) -> Result<(), SessionError> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        self.connect_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(()))
    }

    fn publish(
        &mut self,
        topic: &str,
        qos: Qos,
        retain: bool,
        payload: &[u8],
    ) -> Result<PacketId, SessionError> {
        self.publishes.lock().unwrap().push(PublishRecord {
            topic: topic.to_string(),
            qos,
            retain,
            payload: payload.to_vec(),
        });
        let id = self.next_pkid.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(PacketId::new(id as u16))
    }
}

/// Scheduler that records instead of sleeping
#[derive(Debug, Default)]
pub struct RecordingScheduler {
    scheduled: Mutex<Vec<(Duration, Event)>>,
}

impl RecordingScheduler {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain and return everything scheduled so far
    pub fn take(&self) -> Vec<(Duration, Event)> {
        std::mem::take(&mut *self.scheduled.lock().unwrap())
    }
}

impl Scheduler for RecordingScheduler {
    fn schedule(&self, delay: Duration, event: Event) {
        self.scheduled.lock().unwrap().push((delay, event));
    }
}
