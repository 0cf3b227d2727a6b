//! Run command implementation
//!
//! Wires configuration into the probe, the connectivity managers, and the
//! daemon event loop, then runs until externally terminated.

use crate::cli::args::RunArgs;
use crate::config::{Config, ConfigBuilder};
use crate::error::Result;
use crate::net::{LinkManager, MessagingSession, RumqttTransport, TcpLink};
use crate::sensor::W1Probe;
use crate::services::{Daemon, Event, Sampler, ThreadScheduler};

use std::sync::mpsc;

/// Execute the run command
pub fn run_daemon(
    args: &RunArgs,
    config_path: Option<&str>,
    verbose: bool,
    dry_run: bool,
) -> Result<()> {
    let config = ConfigBuilder::new()
        .with_file(config_path)
        .with_verbose(Some(verbose))
        .with_dry_run(Some(dry_run))
        .with_period_ms(args.period_ms)
        .with_broker_host(args.broker_host.clone())
        .with_broker_port(args.broker_port)
        .with_device(args.device.clone())
        .build();
    config.validate()?;

    if config.general.verbose {
        log::info!("Broker: {}:{}", config.broker.host, config.broker.port);
        log::info!(
            "Threshold: {}°C over {}ms",
            config.monitor.threshold_celsius,
            config.monitor.debounce_ms
        );
        log::info!("Sample period: {}ms", config.sampling.period_ms);
        log::info!("Dry run: {}", config.general.dry_run);
    }

    let probe = open_probe(&config)?;
    let retry_delay = config.connection.retry_delay();

    let (tx, rx) = mpsc::channel::<Event>();
    let scheduler = ThreadScheduler::new(tx.clone());

    let link = TcpLink::new(
        config.network.probe_addr(&config.broker),
        config.network.connect_timeout(),
    );
    let link_manager = LinkManager::new(link, retry_delay);

    let transport = RumqttTransport::new(&config.broker, tx);
    let session = MessagingSession::new(transport, retry_delay);

    let sampler = Sampler::new(
        probe,
        config.monitor.to_monitor(),
        config.topics.clone(),
        config.monitor.warning_message.clone(),
        config.general.dry_run,
    );

    let mut daemon = Daemon::new(
        link_manager,
        session,
        sampler,
        scheduler,
        rx,
        config.sampling.period(),
    );
    daemon.run()
}

/// Open the configured probe, autodetecting when no device is given
pub(crate) fn open_probe(config: &Config) -> Result<W1Probe> {
    let probe = match &config.sensor.device {
        Some(device) => W1Probe::new(device),
        None => W1Probe::discover()?,
    };
    log::info!("Using sensor at {}", probe.slave_path().display());
    Ok(probe)
}
