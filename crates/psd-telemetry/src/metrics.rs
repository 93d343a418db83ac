//! Prometheus metrics for peer discovery.
//!
//! All metrics follow the naming convention: `psd_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g., psd_rounds_total)
//! - **Gauge**: Value of the last round (e.g., psd_peers_discovered)
//! - **Histogram**: Distribution of values (e.g., psd_round_duration_seconds)

use lazy_static::lazy_static;
use prometheus::{exponential_buckets, Counter, Encoder, Gauge, Histogram, Registry, TextEncoder};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // ROUND METRICS
    // =========================================================================

    /// Completed discovery rounds
    pub static ref ROUNDS_TOTAL: Counter = Counter::new(
        "psd_rounds_total",
        "Total number of completed discovery rounds"
    ).expect("metric creation failed");

    /// Round duration histogram
    pub static ref ROUND_DURATION: Histogram = Histogram::with_opts(
        prometheus::HistogramOpts::new(
            "psd_round_duration_seconds",
            "Time spent on a full discovery round"
        ).buckets(exponential_buckets(0.05, 2.0, 14).expect("valid bucket layout"))
    ).expect("metric creation failed");

    // =========================================================================
    // PEER METRICS
    // =========================================================================

    /// Peers discovered in the last round
    pub static ref PEERS_DISCOVERED: Gauge = Gauge::new(
        "psd_peers_discovered",
        "Number of unique peers reported by bootstrap sources in the last round"
    ).expect("metric creation failed");

    /// Live targets emitted by the last round
    pub static ref TARGETS_RESOLVED: Gauge = Gauge::new(
        "psd_targets_resolved",
        "Number of peers with a working diagnostics endpoint in the last round"
    ).expect("metric creation failed");

    /// Removal entries emitted
    pub static ref TARGETS_REMOVED: Counter = Counter::new(
        "psd_targets_removed_total",
        "Total number of removal entries emitted for vanished peers"
    ).expect("metric creation failed");

    // =========================================================================
    // ERROR METRICS
    // =========================================================================

    /// Peers whose endpoint could not be resolved
    pub static ref RESOLUTION_FAILURES: Counter = Counter::new(
        "psd_resolution_failures_total",
        "Total number of peers left without an endpoint after scanning"
    ).expect("metric creation failed");

    /// Conflicting network IDs across sources
    pub static ref IDENTITY_MISMATCHES: Counter = Counter::new(
        "psd_identity_mismatches_total",
        "Total number of peer entries discarded for a conflicting network ID"
    ).expect("metric creation failed");

    /// Unparseable multi-addresses
    pub static ref MALFORMED_ADDRESSES: Counter = Counter::new(
        "psd_malformed_addresses_total",
        "Total number of multi-addresses that failed to parse"
    ).expect("metric creation failed");

    /// Bootstrap sources that failed to answer
    pub static ref SOURCE_FAILURES: Counter = Counter::new(
        "psd_source_failures_total",
        "Total number of failed bootstrap source queries"
    ).expect("metric creation failed");

    /// Batches the output sink rejected
    pub static ref SINK_FAILURES: Counter = Counter::new(
        "psd_sink_failures_total",
        "Total number of target batches that failed to publish"
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
///
/// Safe to call more than once.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Rounds
        Box::new(ROUNDS_TOTAL.clone()),
        Box::new(ROUND_DURATION.clone()),
        // Peers
        Box::new(PEERS_DISCOVERED.clone()),
        Box::new(TARGETS_RESOLVED.clone()),
        Box::new(TARGETS_REMOVED.clone()),
        // Errors
        Box::new(RESOLUTION_FAILURES.clone()),
        Box::new(IDENTITY_MISMATCHES.clone()),
        Box::new(MALFORMED_ADDRESSES.clone()),
        Box::new(SOURCE_FAILURES.clone()),
        Box::new(SINK_FAILURES.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }
    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
