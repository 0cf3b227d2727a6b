//! CLI argument definitions using clap derive
//!
//! Defines all command-line arguments and subcommands.

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// Temperature sampling daemon with MQTT publishing
///
/// Samples a DS18B20 probe, publishes readings to an MQTT broker, and
/// raises a retained warning when the temperature stays below a threshold.
#[derive(Parser, Debug)]
#[command(name = "tempmon")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "TEMPMON_CONFIG")]
    pub config: Option<String>,

    /// Dry run mode - sample and log but don't publish
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the sampling daemon
    Run(RunArgs),

    /// Take a single reading and print it
    Read(ReadArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Sample period in milliseconds
    #[arg(long)]
    pub period_ms: Option<u64>,

    /// MQTT broker host
    #[arg(long)]
    pub broker_host: Option<String>,

    /// MQTT broker port
    #[arg(long)]
    pub broker_port: Option<u16>,

    /// Sensor device directory (autodetected when omitted)
    #[arg(long)]
    pub device: Option<String>,
}

/// Arguments for the read command
#[derive(Parser, Debug)]
pub struct ReadArgs {
    /// Sensor device directory (autodetected when omitted)
    #[arg(long)]
    pub device: Option<String>,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Compact single-line output
    Compact,
}

/// Generate shell completions to stdout
pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
}
