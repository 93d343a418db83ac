//! Configuration layering.
//!
//! Built-in defaults, then the TOML file given with `--config`, then command
//! line flags. Each layer only overrides the values it sets.

use std::net::SocketAddr;
use std::path::PathBuf;

use psd_discovery::adapters::DEFAULT_SD_NAME;
use psd_discovery::domain::DEFAULT_OUTPUT_FILE;
use psd_discovery::{load_config_file, ConfigError, DiscoveryConfig, FileConfig};
use psd_telemetry::TelemetryConfig;

use crate::cli::Args;

/// Fully resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeSettings {
    pub discovery: DiscoveryConfig,
    pub output_file: PathBuf,
    pub sd_name: String,
    pub telemetry: TelemetryConfig,
    pub metrics_listen: Option<SocketAddr>,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            discovery: DiscoveryConfig::default(),
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            sd_name: DEFAULT_SD_NAME.to_string(),
            telemetry: TelemetryConfig::default(),
            metrics_listen: None,
        }
    }
}

impl RuntimeSettings {
    /// Resolve settings from the command line, loading `--config` if given.
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let file = match &args.config {
            Some(path) => Some(load_config_file(path)?),
            None => None,
        };
        Self::layered(TelemetryConfig::from_env(), file.as_ref(), args)
    }

    /// Layer `file` and `args` over the defaults and validate the result.
    pub fn layered(
        telemetry: TelemetryConfig,
        file: Option<&FileConfig>,
        args: &Args,
    ) -> Result<Self, ConfigError> {
        let mut settings = Self {
            telemetry,
            ..Self::default()
        };

        if let Some(file) = file {
            settings.apply_file(file)?;
        }
        settings.apply_args(args);

        settings.discovery.validate()?;
        Ok(settings)
    }

    fn apply_file(&mut self, file: &FileConfig) -> Result<(), ConfigError> {
        file.apply_to(&mut self.discovery)?;

        if let Some(output) = &file.output_file {
            self.output_file = PathBuf::from(output);
        }
        if let Some(name) = &file.sd_name {
            self.sd_name = name.clone();
        }
        if let Some(level) = &file.log.level {
            self.telemetry.log_level = level.clone();
        }
        if let Some(json) = file.log.json {
            self.telemetry.json_logs = json;
        }
        if let Some(listen) = &file.metrics.listen {
            let addr = listen.parse().map_err(|_| {
                ConfigError::Parse(format!("invalid metrics listen address: {listen}"))
            })?;
            self.metrics_listen = Some(addr);
        }
        Ok(())
    }

    fn apply_args(&mut self, args: &Args) {
        let discovery = &mut self.discovery;

        if !args.source_addresses.is_empty() {
            discovery.source_addresses = args.source_addresses.clone();
        }
        if let Some(interval) = args.refresh_interval {
            discovery.refresh_interval = interval;
        }
        if let Some(range) = args.scan_range {
            discovery.scan_range = range;
        }
        if let Some(timeout) = args.scan_timeout {
            discovery.scan_timeout = timeout;
        }
        if let Some(timeout) = args.diagnostics_timeout {
            discovery.diagnostics_timeout = timeout;
        }
        if !args.banned_addresses.is_empty() {
            discovery.banned_addresses = args.banned_addresses.clone();
        }
        if args.allow_private_addresses {
            discovery.allow_private_addresses = true;
        }
        if let Some(n) = args.max_concurrent_resolutions {
            discovery.max_concurrent_resolutions = n;
        }
        if let Some(n) = args.max_concurrent_sources {
            discovery.max_concurrent_sources = n;
        }

        if let Some(output) = &args.output_file {
            self.output_file = output.clone();
        }
        if let Some(name) = &args.sd_name {
            self.sd_name = name.clone();
        }
        if let Some(level) = &args.log_level {
            self.telemetry.log_level = level.clone();
        }
        if args.log_json {
            self.telemetry.json_logs = true;
        }
        if let Some(addr) = args.metrics_listen {
            self.metrics_listen = Some(addr);
        }
    }
}
