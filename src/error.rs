//! Unified error types for tempmon
//!
//! This module defines all error types used throughout the application.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from the temperature probe
    #[error("Sensor error: {0}")]
    Sensor(#[from] SensorError),

    /// Error from the network link
    #[error("Link error: {0}")]
    Link(#[from] LinkError),

    /// Error from the messaging session
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Error from configuration parsing/validation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The daemon event channel closed unexpectedly
    #[error("Event channel closed")]
    EventChannelClosed,

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the temperature probe
#[derive(Error, Debug)]
pub enum SensorError {
    /// Sensor device file not found
    #[error("Sensor device not found: {0}. Is the w1-therm kernel module loaded?")]
    DeviceNotFound(String),

    /// No sensor detected on the bus
    #[error("No temperature sensor detected under {0}")]
    NoSensorFound(String),

    /// Failed to read the sensor device
    #[error("Failed to read sensor: {0}")]
    Io(#[from] std::io::Error),

    /// Sensor reported a failed checksum for the reading
    #[error("Sensor reported a CRC failure; reading discarded")]
    CrcMismatch,

    /// Sensor output did not contain a temperature
    #[error("Malformed sensor output: {0}")]
    Malformed(String),

    /// Reading outside the sensor's physical range
    #[error("Implausible reading: {0}°C (sensor range is -55 to +125°C)")]
    ImplausibleReading(f64),
}

/// Errors from the network link driver
#[derive(Error, Debug)]
pub enum LinkError {
    /// Probe address could not be resolved
    #[error("Failed to resolve {0}")]
    AddressResolution(String),

    /// Probe target could not be reached
    #[error("{addr} unreachable: {source}")]
    Unreachable {
        addr: String,
        source: std::io::Error,
    },
}

/// Errors from the messaging transport
#[derive(Error, Debug)]
pub enum SessionError {
    /// Publish or connect attempted with no live client
    #[error("Not connected to the broker")]
    NotConnected,

    /// The MQTT client rejected the request
    #[error("MQTT client error: {0}")]
    Client(#[from] rumqttc::ClientError),

    /// The transport event pump thread could not be started
    #[error("Failed to start event pump: {0}")]
    Pump(#[from] std::io::Error),
}

/// Errors from configuration parsing and validation
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Invalid config value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_error_display() {
        let err = SensorError::ImplausibleReading(-127.0);
        assert!(err.to_string().contains("-127"));
        assert!(err.to_string().contains("-55 to +125"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidValue {
            key: "sampling.period_ms".to_string(),
            message: "must be greater than zero".to_string(),
        };
        assert!(err.to_string().contains("sampling.period_ms"));
    }

    #[test]
    fn test_error_conversion() {
        let sensor_err = SensorError::CrcMismatch;
        let app_err: AppError = sensor_err.into();
        assert!(matches!(app_err, AppError::Sensor(_)));
    }
}
