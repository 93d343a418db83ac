//! Test utilities for peer discovery.
//!
//! In-memory implementations of the outbound ports for deterministic testing.
//! Enable with the `test-utils` feature flag.
//!
//! # Example
//!
//! ```rust
//! use psd_discovery::test_utils::{diagnostics, InMemoryDiagnosticsGateway};
//!
//! let gateway = InMemoryDiagnosticsGateway::new();
//! gateway.respond("boot-1:9701", diagnostics("B1", vec![]));
//! assert!(gateway.calls().is_empty());
//! ```

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::{
    AdvertisedPeer, DiagnosticsError, DiagnosticsRecord, PeerIdentity, SinkError, TargetGroup,
};
use crate::ports::{DiagnosticsGateway, PortProbe, TargetSink};

/// Build an advertised peer.
pub fn advertised(identity: &str, network_id: &str, multi_addresses: &[&str]) -> AdvertisedPeer {
    AdvertisedPeer {
        identity: PeerIdentity::from(identity),
        network_id: network_id.to_string(),
        multi_addresses: multi_addresses.iter().map(|s| s.to_string()).collect(),
    }
}

/// Build a diagnostics record served by `self_identity`.
pub fn diagnostics(self_identity: &str, connected_peers: Vec<AdvertisedPeer>) -> DiagnosticsRecord {
    DiagnosticsRecord {
        self_info: advertised(self_identity, "", &[]),
        connected_peers,
    }
}

/// Diagnostics gateway answering from a script.
///
/// Endpoints without a scripted response fail with `Unreachable`.
#[derive(Debug, Default)]
pub struct InMemoryDiagnosticsGateway {
    responses: Mutex<HashMap<String, Result<DiagnosticsRecord, DiagnosticsError>>>,
    calls: Mutex<Vec<String>>,
}

impl InMemoryDiagnosticsGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `record` at `endpoint`.
    pub fn respond(&self, endpoint: &str, record: DiagnosticsRecord) {
        self.responses.lock().insert(endpoint.to_string(), Ok(record));
    }

    /// Fail every request to `endpoint` with `error`.
    pub fn fail(&self, endpoint: &str, error: DiagnosticsError) {
        self.responses.lock().insert(endpoint.to_string(), Err(error));
    }

    /// Forget the script for `endpoint`.
    pub fn forget(&self, endpoint: &str) {
        self.responses.lock().remove(endpoint);
    }

    /// Every endpoint fetched, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Number of fetches made to `endpoint`.
    pub fn calls_to(&self, endpoint: &str) -> usize {
        self.calls.lock().iter().filter(|c| *c == endpoint).count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }
}

#[async_trait]
impl DiagnosticsGateway for InMemoryDiagnosticsGateway {
    async fn fetch(&self, endpoint: &str) -> Result<DiagnosticsRecord, DiagnosticsError> {
        if endpoint.is_empty() {
            return Err(DiagnosticsError::EmptyAddress);
        }
        self.calls.lock().push(endpoint.to_string());
        self.responses
            .lock()
            .get(endpoint)
            .cloned()
            .unwrap_or_else(|| {
                Err(DiagnosticsError::Unreachable {
                    endpoint: endpoint.to_string(),
                    reason: "connection refused".to_string(),
                })
            })
    }
}

/// Port probe reporting a fixed set of `(host, port)` pairs as open.
#[derive(Debug, Default)]
pub struct ScriptedPortProbe {
    open: Mutex<HashSet<(String, u16)>>,
    probes: Mutex<Vec<(String, u16)>>,
}

impl ScriptedPortProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `host:port` as open.
    pub fn open(&self, host: &str, port: u16) {
        self.open.lock().insert((host.to_string(), port));
    }

    /// Mark `host:port` as closed.
    pub fn close(&self, host: &str, port: u16) {
        self.open.lock().remove(&(host.to_string(), port));
    }

    /// Every probe made, in call order.
    pub fn probes(&self) -> Vec<(String, u16)> {
        self.probes.lock().clone()
    }

    /// Ports probed on `host`, in call order.
    pub fn probes_of(&self, host: &str) -> Vec<u16> {
        self.probes
            .lock()
            .iter()
            .filter(|(h, _)| h == host)
            .map(|(_, port)| *port)
            .collect()
    }

    pub fn clear_probes(&self) {
        self.probes.lock().clear();
    }
}

#[async_trait]
impl PortProbe for ScriptedPortProbe {
    async fn is_open(&self, host: &str, port: u16, _timeout: Duration) -> bool {
        self.probes.lock().push((host.to_string(), port));
        self.open.lock().contains(&(host.to_string(), port))
    }
}

/// Sink keeping every published batch in memory.
#[derive(Debug, Default)]
pub struct RecordingTargetSink {
    batches: Mutex<Vec<Vec<TargetGroup>>>,
    failing: Mutex<bool>,
}

impl RecordingTargetSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent publishes fail with `SinkError::Closed`.
    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock() = failing;
    }

    pub fn batches(&self) -> Vec<Vec<TargetGroup>> {
        self.batches.lock().clone()
    }

    pub fn last_batch(&self) -> Option<Vec<TargetGroup>> {
        self.batches.lock().last().cloned()
    }
}

#[async_trait]
impl TargetSink for RecordingTargetSink {
    async fn publish(&self, groups: Vec<TargetGroup>) -> Result<(), SinkError> {
        if *self.failing.lock() {
            return Err(SinkError::Closed);
        }
        self.batches.lock().push(groups);
        Ok(())
    }
}
