//! TOML configuration file.
//!
//! Every key is optional. Absent keys leave the corresponding
//! [`DiscoveryConfig`] value untouched.
//!
//! # Config File Format
//!
//! ```toml
//! output_file = "keep_sd.json"
//! sd_name = "peer_sd"
//! refresh_interval = "5m"
//!
//! [sources]
//! addresses = ["bootstrap-0.example.com:9701", "bootstrap-1.example.com:9701"]
//! max_concurrent = 4
//!
//! [scan]
//! range = "9701-9799"
//! timeout = "1s"
//! banned_addresses = ["127.0.0.1"]
//! allow_private_addresses = false
//! max_concurrent = 8
//!
//! [diagnostics]
//! timeout = "5s"
//!
//! [log]
//! level = "info"
//! json = false
//!
//! [metrics]
//! listen = "0.0.0.0:9464"
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::domain::{parse_duration, ConfigError, DiscoveryConfig, PortRange};

/// Parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub output_file: Option<String>,
    pub sd_name: Option<String>,
    pub refresh_interval: Option<String>,
    #[serde(default)]
    pub sources: SourcesSection,
    #[serde(default)]
    pub scan: ScanSection,
    #[serde(default)]
    pub diagnostics: DiagnosticsSection,
    #[serde(default)]
    pub log: LogSection,
    #[serde(default)]
    pub metrics: MetricsSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourcesSection {
    pub addresses: Option<Vec<String>>,
    pub max_concurrent: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScanSection {
    pub range: Option<String>,
    pub timeout: Option<String>,
    pub banned_addresses: Option<Vec<String>>,
    pub allow_private_addresses: Option<bool>,
    pub max_concurrent: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiagnosticsSection {
    pub timeout: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogSection {
    pub level: Option<String>,
    pub json: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    pub listen: Option<String>,
}

/// Load and parse a configuration file.
///
/// # Errors
///
/// Returns error if the file cannot be read or parsed.
pub fn load_config_file<P: AsRef<Path>>(path: P) -> Result<FileConfig, ConfigError> {
    let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
        path: path.as_ref().display().to_string(),
        reason: e.to_string(),
    })?;

    FileConfig::parse(&content)
}

impl FileConfig {
    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Overlay the values present in the file onto `config`.
    pub fn apply_to(&self, config: &mut DiscoveryConfig) -> Result<(), ConfigError> {
        if let Some(addresses) = &self.sources.addresses {
            config.source_addresses = addresses.clone();
        }
        if let Some(n) = self.sources.max_concurrent {
            config.max_concurrent_sources = n;
        }
        if let Some(interval) = &self.refresh_interval {
            config.refresh_interval = parse_duration(interval)?;
        }
        if let Some(range) = &self.scan.range {
            config.scan_range = range.parse::<PortRange>()?;
        }
        if let Some(timeout) = &self.scan.timeout {
            config.scan_timeout = parse_duration(timeout)?;
        }
        if let Some(banned) = &self.scan.banned_addresses {
            config.banned_addresses = banned.clone();
        }
        if let Some(allow) = self.scan.allow_private_addresses {
            config.allow_private_addresses = allow;
        }
        if let Some(n) = self.scan.max_concurrent {
            config.max_concurrent_resolutions = n;
        }
        if let Some(timeout) = &self.diagnostics.timeout {
            config.diagnostics_timeout = parse_duration(timeout)?;
        }
        Ok(())
    }
}
