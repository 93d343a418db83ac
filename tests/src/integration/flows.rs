//! # Discovery Flows
//!
//! Full rounds through [`DiscoveryScheduler`] with the `file_sd` sink:
//!
//! 1. **Scripted network**: in-memory diagnostics and port probe, real output
//!    file
//! 2. **Local network**: HTTP diagnostics gateway and TCP probe against
//!    diagnostics servers on this machine

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;
    use std::time::Duration;

    use psd_discovery::test_utils::{
        advertised, diagnostics, InMemoryDiagnosticsGateway, ScriptedPortProbe,
    };
    use psd_discovery::{
        DiagnosticsError, DiscoveryApi, DiscoveryConfig, DiscoveryScheduler, FileSdSink,
        HttpDiagnosticsGateway, PortRange, TcpPortProbe,
    };
    use serde_json::{json, Value};

    use crate::integration::support::DiagnosticsServer;

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    struct ScriptedNetwork {
        gateway: Arc<InMemoryDiagnosticsGateway>,
        probe: Arc<ScriptedPortProbe>,
        scheduler: DiscoveryScheduler<InMemoryDiagnosticsGateway, ScriptedPortProbe, FileSdSink>,
    }

    fn scripted(output: &Path, sources: &[&str]) -> ScriptedNetwork {
        let config = DiscoveryConfig {
            source_addresses: sources.iter().map(|s| s.to_string()).collect(),
            scan_range: PortRange::new(4000, 4002).unwrap(),
            max_concurrent_sources: 2,
            max_concurrent_resolutions: 4,
            ..DiscoveryConfig::for_testing()
        };
        let gateway = Arc::new(InMemoryDiagnosticsGateway::new());
        let probe = Arc::new(ScriptedPortProbe::new());
        let scheduler = DiscoveryScheduler::new(
            config,
            Arc::clone(&gateway),
            Arc::clone(&probe),
            Arc::new(FileSdSink::new(output, "peer_sd")),
        );
        ScriptedNetwork {
            gateway,
            probe,
            scheduler,
        }
    }

    impl ScriptedNetwork {
        fn serve_peer(&self, host: &str, port: u16, identity: &str) {
            self.probe.open(host, port);
            self.gateway
                .respond(&format!("{host}:{port}"), diagnostics(identity, vec![]));
        }
    }

    fn read_targets(path: &Path) -> Value {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    // =========================================================================
    // SCRIPTED NETWORK
    // =========================================================================

    #[tokio::test]
    async fn test_public_address_written_private_address_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("keep_sd.json");
        let net = scripted(&output, &["boot-1:9701"]);
        net.gateway.respond(
            "boot-1:9701",
            diagnostics(
                "B1",
                vec![advertised(
                    "P1",
                    "N1",
                    &["/dns4/host-a/tcp/4001", "/ip4/10.0.0.5/tcp/4001"],
                )],
            ),
        );
        net.serve_peer("host-a", 4001, "P1");
        net.serve_peer("10.0.0.5", 4001, "P1");

        let report = net.scheduler.run_round().await;

        assert_eq!(report.live_targets(), 1);
        assert!(net.probe.probes_of("10.0.0.5").is_empty());
        assert_eq!(
            read_targets(&output),
            json!([{
                "targets": ["host-a:4001"],
                "labels": {
                    "__address__": "host-a:4001",
                    "__meta_chain_address": "P1",
                    "__meta_network_id": "N1"
                }
            }])
        );
    }

    #[tokio::test]
    async fn test_vanished_peer_removed_from_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("keep_sd.json");
        let net = scripted(&output, &["boot-1:9701"]);
        net.gateway.respond(
            "boot-1:9701",
            diagnostics(
                "B1",
                vec![
                    advertised("P1", "N1", &["/dns4/host-a/tcp/4001"]),
                    advertised("P2", "N2", &["/dns4/host-b/tcp/4001"]),
                ],
            ),
        );
        net.serve_peer("host-a", 4001, "P1");
        net.serve_peer("host-b", 4001, "P2");

        net.scheduler.run_round().await;
        assert_eq!(read_targets(&output).as_array().unwrap().len(), 2);

        net.gateway.respond(
            "boot-1:9701",
            diagnostics("B1", vec![advertised("P1", "N1", &["/dns4/host-a/tcp/4001"])]),
        );
        let report = net.scheduler.run_round().await;

        assert_eq!(report.removed, 1);
        let targets = read_targets(&output);
        assert_eq!(targets.as_array().unwrap().len(), 1);
        assert_eq!(targets[0]["labels"]["__meta_chain_address"], "P1");
    }

    #[tokio::test]
    async fn test_failed_source_leaves_other_sources_working() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("keep_sd.json");
        let net = scripted(&output, &["boot-1:9701", "boot-2:9701"]);
        net.gateway.fail(
            "boot-1:9701",
            DiagnosticsError::Unreachable {
                endpoint: "boot-1:9701".to_string(),
                reason: "connection refused".to_string(),
            },
        );
        net.gateway.respond(
            "boot-2:9701",
            diagnostics("B2", vec![advertised("P2", "N2", &["/dns4/host-b/tcp/4002"])]),
        );
        net.serve_peer("host-b", 4002, "P2");

        let report = net.scheduler.run_round().await;

        assert_eq!(report.sources_failed, 1);
        assert_eq!(report.live_targets(), 1);
        assert_eq!(read_targets(&output)[0]["targets"][0], "host-b:4002");
    }

    #[tokio::test]
    async fn test_peer_found_by_range_scan_on_shared_host() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("keep_sd.json");
        let net = scripted(&output, &["boot-1:9701"]);
        net.gateway.respond(
            "boot-1:9701",
            diagnostics(
                "B1",
                vec![
                    advertised("P1", "N1", &["/dns4/host-shared/tcp/30303"]),
                    advertised("P2", "N1", &["/dns4/host-shared/tcp/30304"]),
                ],
            ),
        );
        net.probe.open("host-shared", 30303);
        net.probe.open("host-shared", 30304);
        net.serve_peer("host-shared", 4000, "P1");
        net.serve_peer("host-shared", 4002, "P2");

        let report = net.scheduler.run_round().await;

        assert_eq!(report.live_targets(), 2);
        let targets = read_targets(&output);
        let mut addresses: Vec<&str> = targets
            .as_array()
            .unwrap()
            .iter()
            .map(|g| g["targets"][0].as_str().unwrap())
            .collect();
        addresses.sort();
        assert_eq!(addresses, vec!["host-shared:4000", "host-shared:4002"]);
    }

    // =========================================================================
    // LOCAL NETWORK
    // =========================================================================

    #[tokio::test]
    async fn test_round_over_http_and_tcp() {
        let peer = DiagnosticsServer::start(diagnostics("P1", vec![]))
            .await
            .unwrap();
        let port = peer.port();
        let bootstrap = DiagnosticsServer::start(diagnostics(
            "B1",
            vec![advertised(
                "P1",
                "N1",
                &[&format!("/dns4/localhost/tcp/{port}")],
            )],
        ))
        .await
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("keep_sd.json");
        let config = DiscoveryConfig {
            source_addresses: vec![bootstrap.endpoint()],
            scan_range: PortRange::new(port, port).unwrap(),
            scan_timeout: Duration::from_millis(500),
            diagnostics_timeout: Duration::from_secs(2),
            ..DiscoveryConfig::for_testing()
        };
        let scheduler = DiscoveryScheduler::new(
            config,
            Arc::new(HttpDiagnosticsGateway::new(Duration::from_secs(2)).unwrap()),
            Arc::new(TcpPortProbe::new()),
            Arc::new(FileSdSink::new(&output, "peer_sd")),
        );

        let report = scheduler.run_round().await;

        assert_eq!(report.sources_failed, 0);
        assert_eq!(report.live_targets(), 1);
        let endpoint = format!("localhost:{port}");
        let targets = read_targets(&output);
        assert_eq!(targets[0]["targets"][0], endpoint.as_str());

        // Second round confirms the endpoint without scanning.
        let second = scheduler.run_round().await;
        assert_eq!(second.verified, 1);
    }
}
