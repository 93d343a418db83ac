//! Discovery configuration.

use std::time::Duration;

use crate::domain::{ConfigError, PortRange};

/// Default bootstrap source.
pub const DEFAULT_SOURCE_ADDRESS: &str = "localhost:9701";
/// Default diagnostics port range.
pub const DEFAULT_SCAN_RANGE: &str = "9701-9799";
/// Default file_sd output file.
pub const DEFAULT_OUTPUT_FILE: &str = "keep_sd.json";

/// Static configuration of the discovery loop. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryConfig {
    /// `host:port` of bootstrap nodes, in order of trust.
    pub source_addresses: Vec<String>,
    /// Time between the start of two rounds.
    pub refresh_interval: Duration,
    /// Ports scanned when a peer's diagnostics port is unknown.
    pub scan_range: PortRange,
    /// Timeout of a single TCP port probe.
    pub scan_timeout: Duration,
    /// Timeout of a single diagnostics call.
    pub diagnostics_timeout: Duration,
    /// Addresses never scanned.
    pub banned_addresses: Vec<String>,
    /// Whether RFC 1918 / unique-local addresses may be scanned.
    pub allow_private_addresses: bool,
    /// Upper bound on peers resolved concurrently.
    pub max_concurrent_resolutions: usize,
    /// Upper bound on bootstrap sources queried concurrently.
    pub max_concurrent_sources: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            source_addresses: vec![DEFAULT_SOURCE_ADDRESS.to_string()],
            refresh_interval: Duration::from_secs(5 * 60),
            scan_range: PortRange::from_static(9701, 9799),
            scan_timeout: Duration::from_secs(1),
            diagnostics_timeout: Duration::from_secs(5),
            banned_addresses: vec!["127.0.0.1".to_string()],
            allow_private_addresses: false,
            max_concurrent_resolutions: 8,
            max_concurrent_sources: 4,
        }
    }
}

impl DiscoveryConfig {
    /// Small timeouts and a narrow range, for tests.
    pub fn for_testing() -> Self {
        Self {
            source_addresses: vec!["boot-1:9701".to_string()],
            refresh_interval: Duration::from_secs(60),
            scan_range: PortRange::from_static(9601, 9605),
            scan_timeout: Duration::from_millis(50),
            diagnostics_timeout: Duration::from_millis(100),
            banned_addresses: vec!["127.0.0.1".to_string()],
            allow_private_addresses: false,
            max_concurrent_resolutions: 1,
            max_concurrent_sources: 1,
        }
    }

    /// Reject configurations the discovery loop cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source_addresses.iter().all(|s| s.trim().is_empty()) {
            return Err(ConfigError::NoSources);
        }
        if self.refresh_interval.is_zero() {
            return Err(ConfigError::Zero("refresh interval"));
        }
        if self.scan_timeout.is_zero() {
            return Err(ConfigError::Zero("scan timeout"));
        }
        if self.diagnostics_timeout.is_zero() {
            return Err(ConfigError::Zero("diagnostics timeout"));
        }
        if self.max_concurrent_resolutions == 0 {
            return Err(ConfigError::Zero("max concurrent resolutions"));
        }
        if self.max_concurrent_sources == 0 {
            return Err(ConfigError::Zero("max concurrent sources"));
        }
        Ok(())
    }
}

/// Parse a human duration: `250ms`, `30s`, `5m`, `1h`, or plain seconds.
pub fn parse_duration(value: &str) -> Result<Duration, ConfigError> {
    let s = value.trim();
    let invalid = |reason: &str| ConfigError::Duration {
        value: value.to_string(),
        reason: reason.to_string(),
    };
    let number = |digits: &str| -> Result<u64, ConfigError> {
        digits.trim().parse::<u64>().map_err(|_| invalid("not a whole number"))
    };

    if let Some(ms) = s.strip_suffix("ms") {
        Ok(Duration::from_millis(number(ms)?))
    } else if let Some(secs) = s.strip_suffix('s') {
        Ok(Duration::from_secs(number(secs)?))
    } else if let Some(mins) = s.strip_suffix('m') {
        number(mins)?
            .checked_mul(60)
            .map(Duration::from_secs)
            .ok_or_else(|| invalid("overflow"))
    } else if let Some(hours) = s.strip_suffix('h') {
        number(hours)?
            .checked_mul(3600)
            .map(Duration::from_secs)
            .ok_or_else(|| invalid("overflow"))
    } else {
        Ok(Duration::from_secs(number(s)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = DiscoveryConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.source_addresses, vec!["localhost:9701"]);
        assert_eq!(config.refresh_interval, Duration::from_secs(300));
        assert_eq!(config.scan_range.to_string(), DEFAULT_SCAN_RANGE);
        assert_eq!(config.banned_addresses, vec!["127.0.0.1"]);
        assert!(!config.allow_private_addresses);
    }

    #[test]
    fn test_validate_rejects_missing_sources() {
        let config = DiscoveryConfig {
            source_addresses: vec![],
            ..DiscoveryConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NoSources));
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let config = DiscoveryConfig {
            refresh_interval: Duration::ZERO,
            ..DiscoveryConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::Zero("refresh interval")));
    }

    #[test]
    fn test_parse_duration_units() {
        assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_duration("1s").unwrap(), Duration::from_secs(1));
        assert_eq!(parse_duration("5m").unwrap(), Duration::from_secs(300));
        assert_eq!(parse_duration("2h").unwrap(), Duration::from_secs(7200));
        assert_eq!(parse_duration(" 45 ").unwrap(), Duration::from_secs(45));
    }

    #[test]
    fn test_parse_duration_rejects_garbage() {
        assert!(parse_duration("fast").is_err());
        assert!(parse_duration("1.5s").is_err());
        assert!(parse_duration("").is_err());
    }
}
