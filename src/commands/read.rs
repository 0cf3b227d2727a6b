//! Read command implementation
//!
//! Takes a single probe reading and prints it.

use crate::cli::args::{OutputFormat, ReadArgs};
use crate::cli::output::{print_output, ReadingReport};
use crate::commands::run::open_probe;
use crate::config::ConfigBuilder;
use crate::error::Result;
use crate::sensor::TemperatureProbe;

/// Execute the read command
pub fn run_read(args: &ReadArgs, format: OutputFormat, config_path: Option<&str>) -> Result<()> {
    let config = ConfigBuilder::new()
        .with_file(config_path)
        .with_device(args.device.clone())
        .build();

    let mut probe = open_probe(&config)?;
    let celsius = probe.read_temperature()?;

    print_output(&ReadingReport::from(celsius), format)?;
    Ok(())
}
