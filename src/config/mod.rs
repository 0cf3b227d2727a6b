//! Configuration system
//!
//! Handles TOML config file parsing and CLI argument merging. Everything is
//! fixed at startup; there is no runtime reconfiguration.

pub mod builder;
pub mod file;

pub use builder::ConfigBuilder;
pub use file::ConfigFile;

use crate::domain::Celsius;
use crate::error::ConfigError;
use crate::monitor::ThresholdMonitor;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,
    /// Network link settings
    pub network: NetworkConfig,
    /// MQTT broker settings
    pub broker: BrokerConfig,
    /// Publish topics
    pub topics: TopicsConfig,
    /// Threshold monitor settings
    pub monitor: MonitorConfig,
    /// Sampling settings
    pub sampling: SamplingConfig,
    /// Reconnect settings
    pub connection: ConnectionConfig,
    /// Sensor settings
    pub sensor: SensorConfig,
}

impl Config {
    /// Validate cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sampling.period_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "sampling.period_ms".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.broker.host.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "broker.host".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        // The MQTT client rejects keep-alive intervals under 5 seconds
        if self.broker.keepalive_secs < 5 {
            return Err(ConfigError::InvalidValue {
                key: "broker.keepalive_secs".to_string(),
                message: "must be at least 5".to_string(),
            });
        }
        Ok(())
    }
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable verbose logging
    pub verbose: bool,
    /// Dry run mode: sample and log but never publish
    pub dry_run: bool,
}

/// Network link configuration
///
/// The link driver here is a TCP reachability probe; when no probe address
/// is given, the broker address is probed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Host to probe for connectivity
    pub probe_host: Option<String>,
    /// Port to probe for connectivity
    pub probe_port: Option<u16>,
    /// Dial timeout in milliseconds
    pub connect_timeout_ms: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            probe_host: None,
            probe_port: None,
            connect_timeout_ms: 3000,
        }
    }
}

impl NetworkConfig {
    /// Resolve the probe address, falling back to the broker address
    pub fn probe_addr(&self, broker: &BrokerConfig) -> String {
        let host = self.probe_host.as_deref().unwrap_or(&broker.host);
        let port = self.probe_port.unwrap_or(broker.port);
        format!("{}:{}", host, port)
    }

    /// Dial timeout as a Duration
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

/// MQTT broker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    /// Broker hostname or IP
    pub host: String,
    /// Broker port
    pub port: u16,
    /// Client identifier presented to the broker
    pub client_id: String,
    /// Optional username
    pub username: Option<String>,
    /// Optional password
    pub password: Option<String>,
    /// Keep-alive interval in seconds
    pub keepalive_secs: u64,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 1883,
            client_id: "tempmon".to_string(),
            username: None,
            password: None,
            keepalive_secs: 30,
        }
    }
}

/// Publish topics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicsConfig {
    /// Topic for periodic readings
    pub reading: String,
    /// Topic for the sustained-low warning
    pub warning: String,
}

impl Default for TopicsConfig {
    fn default() -> Self {
        Self {
            reading: "esp/sensor/temperature".to_string(),
            warning: "esp/sensor/warning".to_string(),
        }
    }
}

/// Threshold monitor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Alert threshold in degrees Celsius
    pub threshold_celsius: f64,
    /// Sustained duration before the alert fires, in milliseconds
    pub debounce_ms: u64,
    /// Message published on the warning topic
    pub warning_message: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            threshold_celsius: 31.0,
            debounce_ms: 60_000,
            warning_message: "Warning: Temperature below 31°C for 1 minute!".to_string(),
        }
    }
}

impl MonitorConfig {
    /// Convert to a ThresholdMonitor
    pub fn to_monitor(&self) -> ThresholdMonitor {
        ThresholdMonitor::new(
            Celsius::new(self.threshold_celsius),
            Duration::from_millis(self.debounce_ms),
        )
    }
}

/// Sampling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Interval between samples in milliseconds
    pub period_ms: u64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self { period_ms: 5000 }
    }
}

impl SamplingConfig {
    /// Sampling period as a Duration
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }
}

/// Reconnect configuration shared by the link and the session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Delay before a reconnect attempt, in milliseconds
    pub retry_delay_ms: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            retry_delay_ms: 2000,
        }
    }
}

impl ConnectionConfig {
    /// Retry delay as a Duration
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

/// Sensor configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SensorConfig {
    /// Device directory under the w1 sysfs root; autodetected when unset
    pub device: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.monitor.threshold_celsius, 31.0);
        assert_eq!(config.monitor.debounce_ms, 60_000);
        assert_eq!(config.sampling.period_ms, 5000);
        assert_eq!(config.connection.retry_delay_ms, 2000);
        assert_eq!(config.broker.port, 1883);
        assert_eq!(config.topics.reading, "esp/sensor/temperature");
        config.validate().unwrap();
    }

    #[test]
    fn test_zero_period_rejected() {
        let mut config = Config::default();
        config.sampling.period_ms = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_short_keepalive_rejected() {
        let mut config = Config::default();
        config.broker.keepalive_secs = 2;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_probe_addr_falls_back_to_broker() {
        let config = Config::default();
        assert_eq!(
            config.network.probe_addr(&config.broker),
            "localhost:1883"
        );

        let mut config = Config::default();
        config.network.probe_host = Some("gateway".to_string());
        config.network.probe_port = Some(53);
        assert_eq!(config.network.probe_addr(&config.broker), "gateway:53");
    }

    #[test]
    fn test_monitor_config_to_monitor() {
        let config = MonitorConfig::default();
        let monitor = config.to_monitor();
        assert_eq!(monitor.threshold().as_degrees(), 31.0);
    }
}
