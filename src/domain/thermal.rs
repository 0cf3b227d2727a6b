//! Thermal domain types
//!
//! Provides the temperature value type and the per-tick reading.

use crate::domain::Tick;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Temperature in degrees Celsius
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Celsius(f64);

impl Celsius {
    /// Create a new Celsius value
    pub const fn new(degrees: f64) -> Self {
        Self(degrees)
    }

    /// Get the temperature in degrees Celsius
    #[inline]
    pub const fn as_degrees(&self) -> f64 {
        self.0
    }

    /// Check whether this reading is strictly below a threshold
    ///
    /// A reading exactly at the threshold counts as not below.
    pub fn is_below(&self, threshold: Celsius) -> bool {
        self.0 < threshold.0
    }
}

impl fmt::Display for Celsius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}°C", self.0)
    }
}

impl From<f64> for Celsius {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Celsius> for f64 {
    fn from(temp: Celsius) -> Self {
        temp.0
    }
}

/// A single temperature sample with its capture tick
///
/// Transient; not retained beyond the tick it was captured on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Sampled temperature
    pub celsius: Celsius,
    /// Wall-clock tick at capture
    pub tick: Tick,
}

impl Reading {
    /// Create a new reading
    pub const fn new(celsius: Celsius, tick: Tick) -> Self {
        Self { celsius, tick }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_celsius_display_two_decimals() {
        assert_eq!(Celsius::new(22.5).to_string(), "22.50°C");
        assert_eq!(Celsius::new(-5.125).to_string(), "-5.12°C");
    }

    #[test]
    fn test_is_below() {
        let threshold = Celsius::new(31.0);
        assert!(Celsius::new(30.99).is_below(threshold));
        assert!(!Celsius::new(31.0).is_below(threshold));
        assert!(!Celsius::new(31.01).is_below(threshold));
    }

    #[test]
    fn test_reading_carries_tick() {
        let reading = Reading::new(Celsius::new(20.0), Tick::from_millis(5000));
        assert_eq!(reading.tick.as_millis(), 5000);
    }
}
