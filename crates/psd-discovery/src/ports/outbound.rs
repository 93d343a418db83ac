//! # Driven Ports (Outbound SPI)
//!
//! These are the capabilities the discovery loop **requires** from the host
//! application: fetching diagnostics, probing TCP ports, delivering target
//! batches and observing finished rounds.
//!
//! Every implementation must be `Send + Sync`. Resolutions for different
//! peers run concurrently against the same gateway and probe.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{DiagnosticsError, DiagnosticsRecord, RoundReport, SinkError, TargetGroup};

/// Fetches the diagnostics record served at an endpoint.
///
/// # Example Implementation
///
/// ```rust,ignore
/// struct HttpDiagnosticsGateway { client: reqwest::Client }
///
/// #[async_trait]
/// impl DiagnosticsGateway for HttpDiagnosticsGateway {
///     async fn fetch(&self, endpoint: &str) -> Result<DiagnosticsRecord, DiagnosticsError> {
///         // GET http://{endpoint}/diagnostics and decode the JSON body
///         todo!()
///     }
/// }
/// ```
#[async_trait]
pub trait DiagnosticsGateway: Send + Sync {
    /// Fetch and decode diagnostics from `endpoint` (`host:port`).
    ///
    /// Implementations apply their own timeout and make exactly one attempt.
    async fn fetch(&self, endpoint: &str) -> Result<DiagnosticsRecord, DiagnosticsError>;
}

/// Tests whether a TCP port accepts connections.
#[async_trait]
pub trait PortProbe: Send + Sync {
    /// True if `host:port` accepted a connection within `timeout`.
    async fn is_open(&self, host: &str, port: u16, timeout: Duration) -> bool;
}

/// Destination of the target batch produced by each round.
#[async_trait]
pub trait TargetSink: Send + Sync {
    /// Deliver one round's batch. Entries with empty `targets` are removals.
    async fn publish(&self, groups: Vec<TargetGroup>) -> Result<(), SinkError>;
}

/// Receives a summary after every completed round.
pub trait RoundObserver: Send + Sync {
    fn on_round(&self, report: &RoundReport);
}

/// Observer that ignores every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRoundObserver;

impl RoundObserver for NoopRoundObserver {
    fn on_round(&self, _report: &RoundReport) {}
}
