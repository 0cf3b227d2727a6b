//! Sampling service
//!
//! One tick: read the probe, run the threshold monitor, publish the reading,
//! and publish the warning only when the monitor fires. The reading publish
//! always precedes the warning publish. A failed probe read skips the tick
//! entirely so a sensor fault can neither publish garbage nor start a
//! below-threshold episode.

use crate::config::TopicsConfig;
use crate::domain::{Qos, Reading, Tick};
use crate::monitor::{AlertDecision, ThresholdMonitor};
use crate::net::session::{MessagingSession, MqttTransport};
use crate::sensor::TemperatureProbe;

/// Per-tick sampling pipeline
pub struct Sampler<P: TemperatureProbe> {
    probe: P,
    monitor: ThresholdMonitor,
    topics: TopicsConfig,
    warning_message: String,
    dry_run: bool,
}

impl<P: TemperatureProbe> Sampler<P> {
    /// Create a sampler
    pub fn new(
        probe: P,
        monitor: ThresholdMonitor,
        topics: TopicsConfig,
        warning_message: String,
        dry_run: bool,
    ) -> Self {
        Self {
            probe,
            monitor,
            topics,
            warning_message,
            dry_run,
        }
    }

    /// The monitor driven by this sampler
    pub fn monitor(&self) -> &ThresholdMonitor {
        &self.monitor
    }

    /// Execute one sampling tick
    pub fn tick<T: MqttTransport>(&mut self, session: &mut MessagingSession<T>, tick: Tick) {
        let celsius = match self.probe.read_temperature() {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Sensor read failed, skipping sample: {}", e);
                return;
            }
        };

        log::info!("Temperature: {}", celsius);

        let decision = self.monitor.evaluate(Reading::new(celsius, tick));

        let payload = format!("{:.2}", celsius.as_degrees());
        self.publish(session, &self.topics.reading, &payload);

        if decision == AlertDecision::Fire {
            self.publish(session, &self.topics.warning, &self.warning_message);
        }
    }

    fn publish<T: MqttTransport>(
        &self,
        session: &mut MessagingSession<T>,
        topic: &str,
        payload: &str,
    ) {
        if self.dry_run {
            log::info!("[DRY RUN] Would publish on topic {}: {}", topic, payload);
            return;
        }

        if let Some(id) = session.publish(topic, Qos::AtLeastOnce, true, payload.as_bytes()) {
            log::info!(
                "Publishing on topic {}, packetId: {}, Message: {}",
                topic,
                id,
                payload
            );
        }
    }
}
