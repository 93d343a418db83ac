//! Round bookkeeping: what survives from one round to the next, and the
//! diff that turns a round's resolved peers into a target batch.

use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

use crate::domain::{PeerIdentity, PeerRecord, TargetGroup};

/// How a peer's endpoint was confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortSource {
    /// Port taken from the round's discovered-port cache.
    CachedPort,
    /// Port found by scanning the configured range.
    RangeScan,
}

/// Final state of a peer's endpoint resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// The previous round's endpoint still serves this peer.
    Verified,
    /// A new endpoint was found.
    Resolved { endpoint: String, via: PortSource },
    /// No address yielded a working endpoint.
    Exhausted,
}

impl ResolutionOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Exhausted)
    }
}

/// State carried from one round to the next.
///
/// Only identities and endpoint hints survive. Peer records themselves are
/// rebuilt from scratch every round.
#[derive(Debug, Clone, Default)]
pub struct RoundHistory {
    identities: BTreeSet<PeerIdentity>,
    endpoints: HashMap<PeerIdentity, String>,
}

impl RoundHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identities emitted as live targets by the previous round.
    pub fn identities(&self) -> &BTreeSet<PeerIdentity> {
        &self.identities
    }

    /// Endpoints resolved by the previous round.
    pub fn endpoints(&self) -> &HashMap<PeerIdentity, String> {
        &self.endpoints
    }

    /// Build the round's target batch and replace the history with it.
    ///
    /// Records without an endpoint are ignored. Every identity live in the
    /// previous round but not in this one gets a removal entry after the live
    /// entries.
    pub fn advance(&mut self, records: &[PeerRecord]) -> Vec<TargetGroup> {
        let mut groups = Vec::with_capacity(records.len());
        let mut identities = BTreeSet::new();
        let mut endpoints = HashMap::new();

        for record in records {
            if let Some(group) = TargetGroup::for_peer(record) {
                identities.insert(record.identity.clone());
                if let Some(endpoint) = &record.endpoint {
                    endpoints.insert(record.identity.clone(), endpoint.clone());
                }
                groups.push(group);
            }
        }

        groups.extend(
            self.identities
                .difference(&identities)
                .map(|gone| TargetGroup::removal(gone.as_str())),
        );

        self.identities = identities;
        self.endpoints = endpoints;
        groups
    }
}

/// Summary of one discovery round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundReport {
    pub round: u64,
    pub sources_queried: usize,
    pub sources_failed: usize,
    pub peers_discovered: usize,
    /// Peers whose previous endpoint was confirmed.
    pub verified: usize,
    /// Peers given a new endpoint.
    pub resolved: usize,
    pub exhausted: usize,
    /// Removal entries emitted.
    pub removed: usize,
    pub identity_mismatches: usize,
    pub malformed_addresses: usize,
    pub sink_failed: bool,
    pub duration: Duration,
}

impl RoundReport {
    /// Peers emitted as live targets.
    pub fn live_targets(&self) -> usize {
        self.verified + self.resolved
    }
}
