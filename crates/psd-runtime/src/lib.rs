//! # Peer-SD Runtime
//!
//! Wires the discovery service to its production adapters:
//!
//! - [`HttpDiagnosticsGateway`] for bootstrap and peer diagnostics
//! - [`TcpPortProbe`] for the port scan
//! - [`FileSdSink`] for the Prometheus `file_sd` output
//! - [`MetricsObserver`] plus an optional `/metrics` endpoint
//!
//! ## Startup Sequence
//!
//! 1. Parse the command line and layer configuration
//! 2. Initialize telemetry
//! 3. Start the metrics server (if configured)
//! 4. Run discovery rounds until Ctrl+C

pub mod cli;
pub mod metrics_server;
pub mod observer;
pub mod settings;

use std::sync::Arc;

use anyhow::{Context, Result};
use psd_discovery::{DiscoveryScheduler, FileSdSink, HttpDiagnosticsGateway, TcpPortProbe};
use tokio::sync::watch;
use tracing::{error, info};

pub use cli::Args;
pub use observer::MetricsObserver;
pub use settings::RuntimeSettings;

/// Run discovery until `shutdown` flips to `true`. Returns the number of
/// completed rounds.
pub async fn run(settings: RuntimeSettings, shutdown: watch::Receiver<bool>) -> Result<u64> {
    info!(
        service = %settings.telemetry.service_name,
        output = %settings.output_file.display(),
        "Starting peer service discovery"
    );

    let metrics_server = match settings.metrics_listen {
        Some(addr) => {
            let (bound, handle) = metrics_server::spawn(addr, shutdown.clone())
                .await
                .with_context(|| format!("failed to bind metrics server on {addr}"))?;
            info!(addr = %bound, "Metrics endpoint ready");
            Some(handle)
        }
        None => None,
    };

    let gateway = HttpDiagnosticsGateway::new(settings.discovery.diagnostics_timeout)
        .context("failed to build diagnostics HTTP client")?;
    let sink = FileSdSink::new(&settings.output_file, settings.sd_name.clone());

    let scheduler = DiscoveryScheduler::new(
        settings.discovery,
        Arc::new(gateway),
        Arc::new(TcpPortProbe::new()),
        Arc::new(sink),
    )
    .with_observer(Arc::new(MetricsObserver));

    let rounds = scheduler.run(shutdown).await;

    if let Some(handle) = metrics_server {
        match handle.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!(error = %e, "Metrics server failed"),
            Err(e) => error!(error = %e, "Metrics server task panicked"),
        }
    }

    info!(rounds, "Peer service discovery stopped");
    Ok(rounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use psd_discovery::DiscoveryConfig;

    #[tokio::test]
    async fn test_run_writes_output_and_stops_on_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("sd.json");
        let settings = RuntimeSettings {
            discovery: DiscoveryConfig {
                // Nothing listens on port 1; the only source fails fast.
                source_addresses: vec!["127.0.0.1:1".to_string()],
                ..DiscoveryConfig::for_testing()
            },
            output_file: output.clone(),
            metrics_listen: Some("127.0.0.1:0".parse().unwrap()),
            ..RuntimeSettings::default()
        };

        let (tx, rx) = watch::channel(false);
        let runner = tokio::spawn(run(settings, rx));

        for _ in 0..100 {
            if output.exists() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        tx.send(true).unwrap();

        assert_eq!(runner.await.unwrap().unwrap(), 1);
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "[]");
    }
}
