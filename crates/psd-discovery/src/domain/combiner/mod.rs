//! Peer combination across bootstrap sources.
//!
//! Each bootstrap source reports the peers it is connected to. Sources often
//! know different addresses for the same peer, so the reports are merged into
//! one record per identity.
//!
//! ## Ordering policy
//!
//! Records are processed in configured-source order. The first network ID seen
//! for an identity wins, and so does the first non-zero port. Later sources
//! that disagree on the network ID are reported and ignored for that peer.
//! Sources are expected to be configured in order of trust.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::{error, warn};

use crate::domain::{
    classify_order, parse_multi_address, AddressError, DiagnosticsRecord, PeerIdentity,
    PeerRecord,
};

/// A peer reported with a network ID different from the one recorded first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityMismatch {
    pub identity: PeerIdentity,
    /// Network ID recorded from an earlier source.
    pub recorded: String,
    /// Conflicting network ID that was discarded.
    pub reported: String,
    /// Position of the offending record in the input sequence.
    pub source_index: usize,
}

/// A multi-address that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedMultiAddress {
    pub identity: PeerIdentity,
    pub error: AddressError,
}

/// Result of merging all source records of a round.
#[derive(Debug, Clone, Default)]
pub struct CombinedPeers {
    /// One canonical record per identity, ordered by identity.
    pub peers: BTreeMap<PeerIdentity, PeerRecord>,
    pub mismatches: Vec<IdentityMismatch>,
    pub malformed: Vec<MalformedMultiAddress>,
}

#[derive(Default)]
struct PeerAccumulator {
    network_id: String,
    hosts: BTreeSet<String>,
    port: Option<u16>,
}

/// Merge diagnostics records into one record per peer identity.
///
/// `previous_endpoints` carries the endpoints resolved in the previous round;
/// they are attached to the new records as resolution hints.
pub fn combine_peers(
    records: &[DiagnosticsRecord],
    previous_endpoints: &HashMap<PeerIdentity, String>,
) -> CombinedPeers {
    let mut accumulators: BTreeMap<PeerIdentity, PeerAccumulator> = BTreeMap::new();
    let mut combined = CombinedPeers::default();

    for (source_index, record) in records.iter().enumerate() {
        for peer in &record.connected_peers {
            if peer.identity.as_str().is_empty() {
                warn!(
                    source = %record.self_identity(),
                    network_id = %peer.network_id,
                    "Skipping connected peer without identity"
                );
                continue;
            }

            if let Some(acc) = accumulators.get(&peer.identity) {
                if acc.network_id != peer.network_id {
                    warn!(
                        peer = %peer.identity,
                        previous = %acc.network_id,
                        current = %peer.network_id,
                        "Previously resolved network ID for the peer doesn't match"
                    );
                    combined.mismatches.push(IdentityMismatch {
                        identity: peer.identity.clone(),
                        recorded: acc.network_id.clone(),
                        reported: peer.network_id.clone(),
                        source_index,
                    });
                    continue;
                }
            }

            let acc = accumulators
                .entry(peer.identity.clone())
                .or_insert_with(|| PeerAccumulator {
                    network_id: peer.network_id.clone(),
                    ..PeerAccumulator::default()
                });

            for multi_address in &peer.multi_addresses {
                match parse_multi_address(multi_address) {
                    Ok((host, port)) => {
                        acc.hosts.insert(host);
                        if acc.port.is_none() {
                            acc.port = port;
                        }
                    }
                    Err(e) => {
                        error!(
                            peer = %peer.identity,
                            multiaddress = %multi_address,
                            error = %e,
                            "Failed to extract peer address from multi address"
                        );
                        combined.malformed.push(MalformedMultiAddress {
                            identity: peer.identity.clone(),
                            error: e,
                        });
                    }
                }
            }
        }
    }

    combined.peers = accumulators
        .into_iter()
        .map(|(identity, acc)| {
            let record = PeerRecord {
                addresses: classify_order(&acc.hosts),
                port: acc.port,
                endpoint: previous_endpoints.get(&identity).cloned(),
                network_id: acc.network_id,
                identity: identity.clone(),
            };
            (identity, record)
        })
        .collect();

    combined
}
