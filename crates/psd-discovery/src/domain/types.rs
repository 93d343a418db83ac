//! Core domain types: peer identities, diagnostics payloads, peer records and
//! the target groups handed to the output sink.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Label carrying the scrape address of a target.
pub const LABEL_ADDRESS: &str = "__address__";
/// Label carrying the peer's self-reported identity (chain address).
pub const LABEL_IDENTITY: &str = "__meta_chain_address";
/// Label carrying the peer's network ID.
pub const LABEL_NETWORK_ID: &str = "__meta_network_id";

/// Self-reported unique identifier of a network participant.
///
/// Opaque: equality is plain string equality. Nothing about the value is
/// validated cryptographically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerIdentity(String);

impl PeerIdentity {
    /// Wrap a raw identity string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the raw identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PeerIdentity {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for PeerIdentity {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A peer as advertised inside a diagnostics payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AdvertisedPeer {
    /// Self-reported identity of the peer.
    #[serde(rename = "chain_address")]
    pub identity: PeerIdentity,
    /// Network-layer identifier of the peer.
    #[serde(default)]
    pub network_id: String,
    /// Multi-addresses the peer listens on.
    #[serde(default, rename = "multiaddrs", alias = "network_multiaddresses")]
    pub multi_addresses: Vec<String>,
}

/// Diagnostics payload served by a node.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DiagnosticsRecord {
    /// The node answering the request.
    #[serde(rename = "client_info")]
    pub self_info: AdvertisedPeer,
    /// Peers the node is currently connected to.
    #[serde(default)]
    pub connected_peers: Vec<AdvertisedPeer>,
}

impl DiagnosticsRecord {
    /// Identity of the node that served this record.
    pub fn self_identity(&self) -> &PeerIdentity {
        &self.self_info.identity
    }
}

/// Canonical, per-round view of one peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerRecord {
    pub identity: PeerIdentity,
    pub network_id: String,
    /// Hosts in resolution order (see `classify_order`).
    pub addresses: Vec<String>,
    /// First non-zero port advertised for the peer.
    pub port: Option<u16>,
    /// `host:port` of the diagnostics endpoint, if known.
    pub endpoint: Option<String>,
}

impl PeerRecord {
    /// Create a record with no addresses, port or endpoint.
    pub fn new(identity: PeerIdentity, network_id: impl Into<String>) -> Self {
        Self {
            identity,
            network_id: network_id.into(),
            addresses: Vec::new(),
            port: None,
            endpoint: None,
        }
    }

    /// Set the endpoint hint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the resolution-ordered addresses.
    #[must_use]
    pub fn with_addresses<I, S>(mut self, addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.addresses = addresses.into_iter().map(Into::into).collect();
        self
    }

    /// Set the advertised port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }
}

/// A single scrape target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub address: String,
}

/// Unit of output handed to the sink.
///
/// An empty `targets` list tells downstream consumers the source disappeared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetGroup {
    pub source: String,
    pub targets: Vec<Target>,
    pub labels: BTreeMap<String, String>,
}

impl TargetGroup {
    /// Build the live target group for a resolved peer.
    ///
    /// Returns `None` when the record has no endpoint.
    pub fn for_peer(record: &PeerRecord) -> Option<Self> {
        let endpoint = record.endpoint.as_ref()?;

        let mut labels = BTreeMap::new();
        labels.insert(LABEL_ADDRESS.to_string(), endpoint.clone());
        labels.insert(LABEL_IDENTITY.to_string(), record.identity.to_string());
        labels.insert(LABEL_NETWORK_ID.to_string(), record.network_id.clone());

        Some(Self {
            source: record.identity.to_string(),
            targets: vec![Target {
                address: endpoint.clone(),
            }],
            labels,
        })
    }

    /// Build a removal entry for a source that is no longer live.
    pub fn removal(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            targets: Vec::new(),
            labels: BTreeMap::new(),
        }
    }

    /// True when this entry signals removal of its source.
    pub fn is_removal(&self) -> bool {
        self.targets.is_empty()
    }
}
