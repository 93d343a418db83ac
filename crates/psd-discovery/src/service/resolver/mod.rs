//! # Endpoint Resolution
//!
//! Finds the diagnostics endpoint of a single peer.
//!
//! ```text
//! HasCachedEndpoint ──verified──> Verified
//!        │ stale
//!        ▼
//! Scanning(address) ──cached port ok / range hit──> Resolved
//!        │ all addresses tried
//!        ▼
//!    Exhausted
//! ```
//!
//! Every answering port is written to the round's [`DiscoveredPortCache`]
//! under the identity it actually served, so peers sharing an address with
//! an already scanned peer can skip the range scan.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::domain::{
    is_excluded, join_host_port, CheckPortError, DiscoveredPortCache, DiscoveryConfig,
    PeerIdentity, PeerRecord, PortSource, ResolutionOutcome,
};
use crate::ports::{DiagnosticsGateway, PortProbe};

/// Resolves diagnostics endpoints using a cache-then-scan strategy.
pub struct EndpointResolver<G, P> {
    gateway: Arc<G>,
    probe: Arc<P>,
    config: Arc<DiscoveryConfig>,
}

impl<G, P> Clone for EndpointResolver<G, P> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            probe: Arc::clone(&self.probe),
            config: Arc::clone(&self.config),
        }
    }
}

impl<G: DiagnosticsGateway, P: PortProbe> EndpointResolver<G, P> {
    pub fn new(gateway: Arc<G>, probe: Arc<P>, config: Arc<DiscoveryConfig>) -> Self {
        Self {
            gateway,
            probe,
            config,
        }
    }

    /// Resolve `peer`'s endpoint in place.
    ///
    /// On `Verified` and `Resolved` the record's `endpoint` holds the working
    /// endpoint. On `Exhausted` it is cleared.
    pub async fn resolve(
        &self,
        peer: &mut PeerRecord,
        cache: &DiscoveredPortCache,
    ) -> ResolutionOutcome {
        info!(peer = %peer.identity, "Resolving diagnostics endpoint target for peer");

        if let Some(endpoint) = peer.endpoint.take() {
            if self.serves(&endpoint, &peer.identity).await {
                info!(
                    peer = %peer.identity,
                    endpoint = %endpoint,
                    "Already known endpoint still works"
                );
                peer.endpoint = Some(endpoint);
                return ResolutionOutcome::Verified;
            }
            warn!(
                peer = %peer.identity,
                endpoint = %endpoint,
                "Already known endpoint doesn't work"
            );
        }

        info!(peer = %peer.identity, "Starting diagnostics ports scanning");

        for address in &peer.addresses {
            if let Some(outcome) = self.scan_address(address, peer, cache).await {
                if let ResolutionOutcome::Resolved { endpoint, .. } = &outcome {
                    peer.endpoint = Some(endpoint.clone());
                }
                return outcome;
            }
        }

        error!(
            peer = %peer.identity,
            addresses = ?peer.addresses,
            "Failed to find diagnostics port"
        );
        ResolutionOutcome::Exhausted
    }

    /// Try one address: cached port first, then the configured range.
    async fn scan_address(
        &self,
        address: &str,
        peer: &PeerRecord,
        cache: &DiscoveredPortCache,
    ) -> Option<ResolutionOutcome> {
        let config = &self.config;

        if is_excluded(
            address,
            &config.banned_addresses,
            config.allow_private_addresses,
        ) {
            debug!(peer = %peer.identity, address, "Skipping excluded address");
            return None;
        }

        if let Some(port) = peer.port {
            if !self.probe.is_open(address, port, config.scan_timeout).await {
                info!(peer = %peer.identity, address, port, "Address is not reachable");
                return None;
            }
        }

        if let Some(port) = cache.get(address, &peer.identity) {
            match self.check_port(address, port, &peer.identity, cache).await {
                Ok(endpoint) => {
                    info!(peer = %peer.identity, address, port, "Found diagnostics port");
                    return Some(ResolutionOutcome::Resolved {
                        endpoint,
                        via: PortSource::CachedPort,
                    });
                }
                Err(e) => warn!(address, port, error = %e, "Failed to check port"),
            }
        }

        for port in config.scan_range.iter() {
            debug!(peer = %peer.identity, address, port, "Scanning port");
            match self.check_port(address, port, &peer.identity, cache).await {
                Ok(endpoint) => {
                    info!(peer = %peer.identity, address, port, "Found diagnostics port");
                    return Some(ResolutionOutcome::Resolved {
                        endpoint,
                        via: PortSource::RangeScan,
                    });
                }
                Err(e @ CheckPortError::PortClosed { .. }) => {
                    debug!(address, port, error = %e, "Failed to check port")
                }
                Err(e) => warn!(address, port, error = %e, "Failed to check port"),
            }
        }

        None
    }

    /// Check whether `address:port` serves diagnostics for `identity`.
    ///
    /// Any answering port is recorded in `cache` under the identity it served,
    /// even when that identity is not the one being looked for.
    pub async fn check_port(
        &self,
        address: &str,
        port: u16,
        identity: &PeerIdentity,
        cache: &DiscoveredPortCache,
    ) -> Result<String, CheckPortError> {
        if !self
            .probe
            .is_open(address, port, self.config.scan_timeout)
            .await
        {
            return Err(CheckPortError::PortClosed {
                address: address.to_string(),
                port,
            });
        }

        let endpoint = join_host_port(address, port);
        let record = self.gateway.fetch(&endpoint).await.map_err(|source| {
            CheckPortError::UnreachableDiagnostics {
                address: address.to_string(),
                port,
                source,
            }
        })?;

        let served = record.self_info.identity;
        cache.record(address, served.clone(), port);

        if &served != identity {
            return Err(CheckPortError::WrongPeer {
                address: address.to_string(),
                port,
                served,
            });
        }
        Ok(endpoint)
    }

    async fn serves(&self, endpoint: &str, identity: &PeerIdentity) -> bool {
        match self.gateway.fetch(endpoint).await {
            Ok(record) => record.self_identity() == identity,
            Err(e) => {
                debug!(endpoint, error = %e, "Known endpoint unreachable");
                false
            }
        }
    }
}
