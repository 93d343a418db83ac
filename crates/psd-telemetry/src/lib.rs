//! # Peer-SD Telemetry
//!
//! Logging and metrics for the discovery service.
//!
//! ## Components
//!
//! - **Logging**: `tracing-subscriber` registry with an env filter and either
//!   JSON or human-readable output
//! - **Metrics**: Prometheus registry with the discovery round metrics,
//!   rendered in text format by [`encode_metrics`]
//!
//! ## Usage
//!
//! ```rust,ignore
//! use psd_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     init_telemetry(&config).expect("Failed to init telemetry");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `PSD_SERVICE_NAME` | `peer-sd` | Service name attached to startup logs |
//! | `PSD_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `PSD_JSON_LOGS` | `false` | Emit JSON log lines |

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::{build_filter, init_logging};
pub use metrics::{
    encode_metrics, register_metrics, IDENTITY_MISMATCHES, MALFORMED_ADDRESSES, PEERS_DISCOVERED,
    RESOLUTION_FAILURES, ROUNDS_TOTAL, ROUND_DURATION, SINK_FAILURES, SOURCE_FAILURES,
    TARGETS_REMOVED, TARGETS_RESOLVED,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Register metrics and install the global log subscriber.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    register_metrics()?;
    init_logging(config)?;

    tracing::info!(
        service = %config.service_name,
        json_logs = config.json_logs,
        "Telemetry initialized"
    );
    Ok(())
}
