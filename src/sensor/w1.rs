//! DS18B20 probe via the Linux w1 kernel driver
//!
//! The w1-therm module exposes each DS18B20 as a directory under
//! /sys/bus/w1/devices whose `w1_slave` file holds the latest conversion:
//!
//! ```text
//! 2d 00 4b 46 ff ff 02 10 19 : crc=19 YES
//! 2d 00 4b 46 ff ff 02 10 19 t=22562
//! ```
//!
//! The first line carries the CRC verdict, the second the temperature in
//! millidegrees. Reading the file triggers a fresh conversion.

use crate::domain::Celsius;
use crate::error::SensorError;
use crate::sensor::TemperatureProbe;

use std::fs;
use std::path::{Path, PathBuf};

/// Default sysfs root for one-wire devices
const W1_DEVICES_ROOT: &str = "/sys/bus/w1/devices";

/// Family code prefix of DS18B20 sensors
const DS18B20_PREFIX: &str = "28-";

/// DS18B20 operating range in degrees Celsius
const MIN_PLAUSIBLE: f64 = -55.0;
const MAX_PLAUSIBLE: f64 = 125.0;

/// Temperature probe backed by a w1_slave sysfs file
#[derive(Debug)]
pub struct W1Probe {
    slave_path: PathBuf,
}

impl W1Probe {
    /// Create a probe for a specific device directory
    ///
    /// `device_dir` is the sensor's directory under the w1 sysfs root,
    /// e.g. `/sys/bus/w1/devices/28-0316a2c55bff`.
    pub fn new<P: AsRef<Path>>(device_dir: P) -> Self {
        Self {
            slave_path: device_dir.as_ref().join("w1_slave"),
        }
    }

    /// Create a probe reading directly from a w1_slave-format file
    pub fn from_slave_file<P: AsRef<Path>>(path: P) -> Self {
        Self {
            slave_path: path.as_ref().to_path_buf(),
        }
    }

    /// Find the first DS18B20 on the default one-wire bus
    pub fn discover() -> Result<Self, SensorError> {
        Self::discover_in(W1_DEVICES_ROOT)
    }

    /// Find the first DS18B20 under a given sysfs root
    pub fn discover_in<P: AsRef<Path>>(root: P) -> Result<Self, SensorError> {
        let root = root.as_ref();
        let entries = fs::read_dir(root)
            .map_err(|_| SensorError::DeviceNotFound(root.display().to_string()))?;

        for entry in entries.flatten() {
            let name = entry.file_name();
            if name.to_string_lossy().starts_with(DS18B20_PREFIX) {
                return Ok(Self::new(entry.path()));
            }
        }

        Err(SensorError::NoSensorFound(root.display().to_string()))
    }

    /// Path of the w1_slave file this probe reads
    pub fn slave_path(&self) -> &Path {
        &self.slave_path
    }
}

impl TemperatureProbe for W1Probe {
    fn read_temperature(&mut self) -> Result<Celsius, SensorError> {
        let content = fs::read_to_string(&self.slave_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SensorError::DeviceNotFound(self.slave_path.display().to_string())
            } else {
                SensorError::Io(e)
            }
        })?;

        parse_slave(&content)
    }
}

/// Parse the two-line w1_slave format into a temperature
fn parse_slave(content: &str) -> Result<Celsius, SensorError> {
    let mut lines = content.lines();

    let crc_line = lines
        .next()
        .ok_or_else(|| SensorError::Malformed("empty sensor output".to_string()))?;
    if !crc_line.trim_end().ends_with("YES") {
        return Err(SensorError::CrcMismatch);
    }

    let temp_line = lines
        .next()
        .ok_or_else(|| SensorError::Malformed("missing temperature line".to_string()))?;
    let raw = temp_line
        .split("t=")
        .nth(1)
        .ok_or_else(|| SensorError::Malformed(format!("no t= field in '{}'", temp_line)))?;

    let millidegrees: i64 = raw
        .trim()
        .parse()
        .map_err(|_| SensorError::Malformed(format!("unparseable temperature '{}'", raw.trim())))?;

    let degrees = millidegrees as f64 / 1000.0;
    if !(MIN_PLAUSIBLE..=MAX_PLAUSIBLE).contains(&degrees) {
        return Err(SensorError::ImplausibleReading(degrees));
    }

    Ok(Celsius::new(degrees))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const GOOD: &str = "2d 00 4b 46 ff ff 02 10 19 : crc=19 YES\n\
                        2d 00 4b 46 ff ff 02 10 19 t=22562\n";

    #[test]
    fn test_parse_valid_reading() {
        let temp = parse_slave(GOOD).unwrap();
        assert_eq!(temp.as_degrees(), 22.562);
    }

    #[test]
    fn test_parse_negative_reading() {
        let content = "2d 00 4b 46 ff ff 02 10 19 : crc=19 YES\n\
                       2d 00 4b 46 ff ff 02 10 19 t=-1250\n";
        let temp = parse_slave(content).unwrap();
        assert_eq!(temp.as_degrees(), -1.25);
    }

    #[test]
    fn test_parse_crc_failure() {
        let content = "2d 00 4b 46 ff ff 02 10 19 : crc=19 NO\n\
                       2d 00 4b 46 ff ff 02 10 19 t=22562\n";
        assert!(matches!(parse_slave(content), Err(SensorError::CrcMismatch)));
    }

    #[test]
    fn test_parse_missing_temperature() {
        let content = "2d 00 4b 46 ff ff 02 10 19 : crc=19 YES\n\
                       2d 00 4b 46 ff ff 02 10 19\n";
        assert!(matches!(parse_slave(content), Err(SensorError::Malformed(_))));
    }

    #[test]
    fn test_parse_implausible_reading() {
        // -127 is the disconnected-probe sentinel of the Dallas library
        let content = "2d 00 4b 46 ff ff 02 10 19 : crc=19 YES\n\
                       2d 00 4b 46 ff ff 02 10 19 t=-127000\n";
        assert!(matches!(
            parse_slave(content),
            Err(SensorError::ImplausibleReading(_))
        ));
    }

    #[test]
    fn test_read_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(GOOD.as_bytes()).unwrap();

        let mut probe = W1Probe::from_slave_file(file.path());
        let temp = probe.read_temperature().unwrap();
        assert_eq!(temp.as_degrees(), 22.562);
    }

    #[test]
    fn test_read_missing_device() {
        let mut probe = W1Probe::new("/nonexistent/28-0000");
        assert!(matches!(
            probe.read_temperature(),
            Err(SensorError::DeviceNotFound(_))
        ));
    }

    #[test]
    fn test_discover_in_finds_ds18b20() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("w1_bus_master1")).unwrap();
        std::fs::create_dir(dir.path().join("28-0316a2c55bff")).unwrap();

        let probe = W1Probe::discover_in(dir.path()).unwrap();
        assert!(probe.slave_path().starts_with(dir.path().join("28-0316a2c55bff")));
    }

    #[test]
    fn test_discover_in_empty_bus() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            W1Probe::discover_in(dir.path()),
            Err(SensorError::NoSensorFound(_))
        ));
    }
}
