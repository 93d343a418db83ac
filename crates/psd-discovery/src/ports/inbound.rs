//! # Driving Ports (Inbound API)
//!
//! The API the discovery loop exposes to the host binary.

use async_trait::async_trait;

use crate::domain::{PeerIdentity, RoundReport};

/// Primary API of the discovery service.
///
/// # Example
///
/// ```rust,ignore
/// use psd_discovery::ports::DiscoveryApi;
///
/// async fn one_shot<T: DiscoveryApi>(api: &T) {
///     let report = api.run_round().await;
///     println!("{} live targets", report.live_targets());
/// }
/// ```
#[async_trait]
pub trait DiscoveryApi: Send + Sync {
    /// Run a single round: fetch, combine, resolve, diff and publish.
    ///
    /// Never fails. Every error inside a round is logged and reflected in
    /// the returned report.
    async fn run_round(&self) -> RoundReport;

    /// Identities emitted as live targets by the last completed round.
    fn live_identities(&self) -> Vec<PeerIdentity>;

    /// Number of rounds completed since start.
    fn rounds_completed(&self) -> u64;
}
