//! Round metrics.

use psd_discovery::{RoundObserver, RoundReport};
use psd_telemetry::{
    IDENTITY_MISMATCHES, MALFORMED_ADDRESSES, PEERS_DISCOVERED, RESOLUTION_FAILURES,
    ROUNDS_TOTAL, ROUND_DURATION, SINK_FAILURES, SOURCE_FAILURES, TARGETS_REMOVED,
    TARGETS_RESOLVED,
};

/// Feeds every [`RoundReport`] into the Prometheus registry.
#[derive(Debug, Default, Clone, Copy)]
pub struct MetricsObserver;

impl RoundObserver for MetricsObserver {
    fn on_round(&self, report: &RoundReport) {
        ROUNDS_TOTAL.inc();
        ROUND_DURATION.observe(report.duration.as_secs_f64());

        PEERS_DISCOVERED.set(report.peers_discovered as f64);
        TARGETS_RESOLVED.set(report.live_targets() as f64);
        TARGETS_REMOVED.inc_by(report.removed as f64);

        RESOLUTION_FAILURES.inc_by(report.exhausted as f64);
        IDENTITY_MISMATCHES.inc_by(report.identity_mismatches as f64);
        MALFORMED_ADDRESSES.inc_by(report.malformed_addresses as f64);
        SOURCE_FAILURES.inc_by(report.sources_failed as f64);
        if report.sink_failed {
            SINK_FAILURES.inc();
        }
    }
}
