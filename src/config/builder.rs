//! Configuration builder
//!
//! Merges configuration from files and CLI arguments.

use crate::config::{Config, ConfigFile};

/// Builder for merging configuration sources
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Load configuration from a file
    pub fn with_file(mut self, path: Option<&str>) -> Self {
        let file_config = if let Some(path) = path {
            ConfigFile::load(path).ok()
        } else {
            ConfigFile::load_default()
        };

        if let Some(cfg) = file_config {
            self.config = cfg;
        }

        self
    }

    /// Override with CLI verbose flag
    pub fn with_verbose(mut self, verbose: Option<bool>) -> Self {
        if let Some(v) = verbose {
            self.config.general.verbose = v;
        }
        self
    }

    /// Override with CLI dry-run flag
    pub fn with_dry_run(mut self, dry_run: Option<bool>) -> Self {
        if let Some(d) = dry_run {
            self.config.general.dry_run = d;
        }
        self
    }

    /// Override with CLI sample period
    pub fn with_period_ms(mut self, period_ms: Option<u64>) -> Self {
        if let Some(p) = period_ms {
            self.config.sampling.period_ms = p;
        }
        self
    }

    /// Override with CLI broker host
    pub fn with_broker_host(mut self, host: Option<String>) -> Self {
        if let Some(h) = host {
            self.config.broker.host = h;
        }
        self
    }

    /// Override with CLI broker port
    pub fn with_broker_port(mut self, port: Option<u16>) -> Self {
        if let Some(p) = port {
            self.config.broker.port = p;
        }
        self
    }

    /// Override with CLI sensor device path
    pub fn with_device(mut self, device: Option<String>) -> Self {
        if let Some(d) = device {
            self.config.sensor.device = Some(d);
        }
        self
    }

    /// Build the final configuration
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
