//! `DiscoveryApi` implementation.

use std::sync::atomic::Ordering;

use async_trait::async_trait;

use super::DiscoveryScheduler;
use crate::domain::{PeerIdentity, RoundReport};
use crate::ports::{DiagnosticsGateway, DiscoveryApi, PortProbe, TargetSink};

#[async_trait]
impl<G, P, S> DiscoveryApi for DiscoveryScheduler<G, P, S>
where
    G: DiagnosticsGateway,
    P: PortProbe,
    S: TargetSink,
{
    async fn run_round(&self) -> RoundReport {
        self.execute_round().await
    }

    fn live_identities(&self) -> Vec<PeerIdentity> {
        self.history.lock().identities().iter().cloned().collect()
    }

    fn rounds_completed(&self) -> u64 {
        self.rounds.load(Ordering::SeqCst)
    }
}
