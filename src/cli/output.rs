//! Output formatting utilities
//!
//! Provides table and JSON output formatting for CLI commands.

use crate::cli::args::OutputFormat;
use crate::domain::Celsius;
use serde::Serialize;
use std::io::{self, Write};

/// Format and print output based on the selected format
pub fn print_output<T: Serialize + TableDisplay>(data: &T, format: OutputFormat) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match format {
        OutputFormat::Table => {
            writeln!(handle, "{}", data.to_table())?;
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string());
            writeln!(handle, "{}", json)?;
        }
        OutputFormat::Compact => {
            writeln!(handle, "{}", data.to_compact())?;
        }
    }

    Ok(())
}

/// Trait for types that can be displayed as a table
pub trait TableDisplay {
    /// Format as a table string
    fn to_table(&self) -> String;

    /// Format as a compact single line
    fn to_compact(&self) -> String {
        self.to_table().replace('\n', " | ")
    }
}

/// One-shot reading for display
#[derive(Debug, Clone, Serialize)]
pub struct ReadingReport {
    pub celsius: f64,
}

impl From<Celsius> for ReadingReport {
    fn from(temp: Celsius) -> Self {
        Self {
            celsius: temp.as_degrees(),
        }
    }
}

impl TableDisplay for ReadingReport {
    fn to_table(&self) -> String {
        format!("Temperature: {:.2}°C", self.celsius)
    }

    fn to_compact(&self) -> String {
        format!("{:.2}", self.celsius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_report_table() {
        let report = ReadingReport::from(Celsius::new(22.562));
        assert_eq!(report.to_table(), "Temperature: 22.56°C");
        assert_eq!(report.to_compact(), "22.56");
    }

    #[test]
    fn test_reading_report_serializes() {
        let report = ReadingReport::from(Celsius::new(22.5));
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("22.5"));
    }
}
