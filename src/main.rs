//! tempmon - temperature sampling daemon
//!
//! Samples a DS18B20 temperature probe on a fixed period, publishes each
//! reading to an MQTT broker, and raises a retained warning when the
//! temperature stays below a threshold for a sustained duration.

use clap::Parser;
use tempmon::cli::args::{generate_completions, Cli, Commands};
use tempmon::commands::{run_daemon, run_read};
use tempmon::error::AppError;

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Set log level based on verbose flag
    if cli.verbose {
        log::set_max_level(log::LevelFilter::Debug);
    }

    // Run the appropriate command
    let result = run(&cli);

    if let Err(e) = result {
        log::error!("{}", e);
        print_error(&e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    match &cli.command {
        Commands::Run(args) => run_daemon(args, cli.config.as_deref(), cli.verbose, cli.dry_run),

        Commands::Read(args) => run_read(args, cli.format, cli.config.as_deref()),

        Commands::Completions { shell } => {
            generate_completions(*shell);
            Ok(())
        }
    }
}

fn print_error(err: &AppError) {
    eprintln!("Error: {}", err);

    // Print helpful hints for common errors
    match err {
        AppError::Sensor(tempmon::error::SensorError::DeviceNotFound(_))
        | AppError::Sensor(tempmon::error::SensorError::NoSensorFound(_)) => {
            eprintln!();
            eprintln!("Hint: Make sure the one-wire kernel modules are loaded.");
            eprintln!("      Try 'modprobe w1-gpio && modprobe w1-therm'.");
        }
        AppError::Link(_) => {
            eprintln!();
            eprintln!("Hint: Check the broker address and your network connection.");
        }
        AppError::Config(_) => {
            eprintln!();
            eprintln!("Hint: Check the configuration file syntax and values.");
        }
        _ => {}
    }
}
