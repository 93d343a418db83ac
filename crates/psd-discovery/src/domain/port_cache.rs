//! Round-scoped cache of diagnostics ports discovered while scanning.
//!
//! Whenever a port answers with *any* identity, the pair
//! `(address, served identity) -> port` is recorded. A peer sharing that
//! address with another node can then skip straight to the right port instead
//! of scanning the whole range.
//!
//! Shared by every concurrently resolving peer. Writes go through a mutex so
//! none is lost; a peer reading just before another peer's write only pays
//! for a redundant scan.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::domain::PeerIdentity;

#[derive(Debug, Default)]
pub struct DiscoveredPortCache {
    ports: Mutex<HashMap<(String, PeerIdentity), u16>>,
}

impl DiscoveredPortCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Port previously seen serving `identity` on `address`.
    pub fn get(&self, address: &str, identity: &PeerIdentity) -> Option<u16> {
        self.ports
            .lock()
            .get(&(address.to_string(), identity.clone()))
            .copied()
    }

    /// Record that `port` on `address` serves `identity`.
    ///
    /// Returns the port previously recorded for the key, if any.
    pub fn record(&self, address: &str, identity: PeerIdentity, port: u16) -> Option<u16> {
        self.ports.lock().insert((address.to_string(), identity), port)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.ports.lock().len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.ports.lock().is_empty()
    }
}
