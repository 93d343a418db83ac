//! # Discovery Scheduler
//!
//! Drives periodic discovery rounds:
//!
//! 1. Fetch diagnostics from every bootstrap source (parallel, one attempt)
//! 2. Combine the records with the previous round's endpoint hints
//! 3. Resolve an endpoint per peer (bounded parallelism, shared port cache)
//! 4. Diff against the previous round and publish the batch
//!
//! Rounds never overlap. Cancellation is only observed between rounds.

mod api;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, info_span, Instrument};

use crate::domain::{
    combine_peers, DiagnosticsRecord, DiscoveredPortCache, DiscoveryConfig, PeerRecord,
    ResolutionOutcome, RoundHistory, RoundReport,
};
use crate::ports::{DiagnosticsGateway, NoopRoundObserver, PortProbe, RoundObserver, TargetSink};
use crate::service::EndpointResolver;

/// Periodic discovery loop.
///
/// # Example
///
/// ```rust,ignore
/// let scheduler = DiscoveryScheduler::new(config, gateway, probe, sink);
/// let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
/// tokio::spawn(async move { scheduler.run(shutdown_rx).await });
/// ```
pub struct DiscoveryScheduler<G, P, S> {
    config: Arc<DiscoveryConfig>,
    gateway: Arc<G>,
    resolver: EndpointResolver<G, P>,
    sink: Arc<S>,
    observer: Arc<dyn RoundObserver>,
    history: Mutex<RoundHistory>,
    rounds: AtomicU64,
}

impl<G, P, S> DiscoveryScheduler<G, P, S>
where
    G: DiagnosticsGateway,
    P: PortProbe,
    S: TargetSink,
{
    pub fn new(config: DiscoveryConfig, gateway: Arc<G>, probe: Arc<P>, sink: Arc<S>) -> Self {
        let config = Arc::new(config);
        let resolver = EndpointResolver::new(Arc::clone(&gateway), probe, Arc::clone(&config));
        Self {
            config,
            gateway,
            resolver,
            sink,
            observer: Arc::new(NoopRoundObserver),
            history: Mutex::new(RoundHistory::new()),
            rounds: AtomicU64::new(0),
        }
    }

    /// Attach an observer notified after every round.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn RoundObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// Snapshot of the state carried into the next round.
    pub fn history(&self) -> RoundHistory {
        self.history.lock().clone()
    }

    /// Run rounds until `shutdown` flips to `true` or its sender is dropped.
    ///
    /// The first round starts immediately. Returns the number of rounds run.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> u64 {
        let mut ticker = tokio::time::interval(self.config.refresh_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut completed = 0;

        info!(
            sources = ?self.config.source_addresses,
            interval = ?self.config.refresh_interval,
            "Starting peer discovery"
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                biased;
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                    continue;
                }
                _ = ticker.tick() => {}
            }

            self.execute_round().await;
            completed += 1;
        }

        info!(rounds = completed, "Shutdown signal received, stopping discovery");
        completed
    }

    async fn execute_round(&self) -> RoundReport {
        let round = self.rounds.load(Ordering::SeqCst) + 1;
        self.round_body(round)
            .instrument(info_span!("discovery_round", round))
            .await
    }

    async fn round_body(&self, round: u64) -> RoundReport {
        let started = Instant::now();
        let mut report = RoundReport {
            round,
            sources_queried: self.config.source_addresses.len(),
            ..RoundReport::default()
        };

        let records = self.collect_diagnostics().await;
        report.sources_failed = report.sources_queried - records.len();

        let previous_endpoints = self.history.lock().endpoints().clone();
        let combined = combine_peers(&records, &previous_endpoints);
        report.peers_discovered = combined.peers.len();
        report.identity_mismatches = combined.mismatches.len();
        report.malformed_addresses = combined.malformed.len();

        info!("Discovered {} connected peers", combined.peers.len());
        debug!(peers = ?combined.peers, "Combined peer set");

        let cache = DiscoveredPortCache::new();
        let resolved = self
            .resolve_all(combined.peers.into_values().collect(), &cache)
            .await;

        let mut records = Vec::with_capacity(resolved.len());
        for (peer, outcome) in resolved {
            match outcome {
                ResolutionOutcome::Verified => report.verified += 1,
                ResolutionOutcome::Resolved { .. } => report.resolved += 1,
                ResolutionOutcome::Exhausted => report.exhausted += 1,
            }
            records.push(peer);
        }
        records.sort_by(|a, b| a.identity.cmp(&b.identity));

        let groups = self.history.lock().advance(&records);
        report.removed = groups.iter().filter(|g| g.is_removal()).count();

        if let Err(e) = self.sink.publish(groups).await {
            error!(error = %e, "Failed to publish discovered targets");
            report.sink_failed = true;
        }

        self.rounds.store(round, Ordering::SeqCst);
        report.duration = started.elapsed();
        self.observer.on_round(&report);

        info!(
            live = report.live_targets(),
            removed = report.removed,
            exhausted = report.exhausted,
            "Discovery round completed"
        );
        report
    }

    /// Fetch diagnostics from every source, keeping configured order.
    ///
    /// Failed sources are logged and left out.
    async fn collect_diagnostics(&self) -> Vec<DiagnosticsRecord> {
        let gateway = &self.gateway;

        stream::iter(self.config.source_addresses.iter().cloned())
            .map(move |source| async move {
                info!(source = %source, "Getting diagnostics from source node");
                match gateway.fetch(&source).await {
                    Ok(record) => Some(record),
                    Err(e) => {
                        error!(
                            source = %source,
                            error = %e,
                            "Failed to get diagnostics from source node"
                        );
                        None
                    }
                }
            })
            .buffered(self.config.max_concurrent_sources)
            .filter_map(|record| async move { record })
            .collect()
            .await
    }

    async fn resolve_all(
        &self,
        peers: Vec<PeerRecord>,
        cache: &DiscoveredPortCache,
    ) -> Vec<(PeerRecord, ResolutionOutcome)> {
        let resolver = &self.resolver;

        stream::iter(peers)
            .map(move |mut peer| async move {
                let outcome = resolver.resolve(&mut peer, cache).await;
                (peer, outcome)
            })
            .buffer_unordered(self.config.max_concurrent_resolutions)
            .collect()
            .await
    }
}
