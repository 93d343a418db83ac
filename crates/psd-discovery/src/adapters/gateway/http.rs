//! HTTP diagnostics gateway.
//!
//! Fetches `GET http://{endpoint}/diagnostics` and decodes the JSON body.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::domain::{DiagnosticsError, DiagnosticsRecord};
use crate::ports::DiagnosticsGateway;

/// Path the diagnostics record is served under.
pub const DIAGNOSTICS_PATH: &str = "/diagnostics";

/// [`DiagnosticsGateway`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpDiagnosticsGateway {
    client: Client,
}

impl HttpDiagnosticsGateway {
    /// Create a gateway whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    fn url(endpoint: &str) -> String {
        format!("http://{endpoint}{DIAGNOSTICS_PATH}")
    }
}

#[async_trait]
impl DiagnosticsGateway for HttpDiagnosticsGateway {
    async fn fetch(&self, endpoint: &str) -> Result<DiagnosticsRecord, DiagnosticsError> {
        if endpoint.is_empty() {
            return Err(DiagnosticsError::EmptyAddress);
        }

        let unreachable = |e: reqwest::Error| DiagnosticsError::Unreachable {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        };

        let response = self
            .client
            .get(Self::url(endpoint))
            .send()
            .await
            .map_err(unreachable)?
            .error_for_status()
            .map_err(unreachable)?;

        response
            .json::<DiagnosticsRecord>()
            .await
            .map_err(|e| DiagnosticsError::Decode {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve a single HTTP response with `body` and return the endpoint.
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = listener.local_addr().unwrap().to_string();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes()).await;
        });
        endpoint
    }

    #[test]
    fn test_url_targets_diagnostics_path() {
        assert_eq!(
            HttpDiagnosticsGateway::url("host-a:9701"),
            "http://host-a:9701/diagnostics"
        );
        assert_eq!(
            HttpDiagnosticsGateway::url("[2001:db8::1]:9701"),
            "http://[2001:db8::1]:9701/diagnostics"
        );
    }

    #[tokio::test]
    async fn test_empty_endpoint_rejected() {
        let gateway = HttpDiagnosticsGateway::new(Duration::from_millis(100)).unwrap();
        assert_eq!(gateway.fetch("").await, Err(DiagnosticsError::EmptyAddress));
    }

    #[tokio::test]
    async fn test_fetch_decodes_record() {
        let endpoint = serve_once(
            "200 OK",
            r#"{"client_info":{"chain_address":"B1","network_id":"NB"},"connected_peers":[{"chain_address":"P1","network_id":"N1","multiaddrs":["/dns4/host-a/tcp/4001"]}]}"#,
        )
        .await;
        let gateway = HttpDiagnosticsGateway::new(Duration::from_secs(2)).unwrap();

        let record = gateway.fetch(&endpoint).await.unwrap();

        assert_eq!(record.self_identity().as_str(), "B1");
        assert_eq!(record.connected_peers.len(), 1);
        assert_eq!(record.connected_peers[0].multi_addresses, vec!["/dns4/host-a/tcp/4001"]);
    }

    #[tokio::test]
    async fn test_invalid_body_is_decode_error() {
        let endpoint = serve_once("200 OK", "not json").await;
        let gateway = HttpDiagnosticsGateway::new(Duration::from_secs(2)).unwrap();

        assert!(matches!(
            gateway.fetch(&endpoint).await,
            Err(DiagnosticsError::Decode { .. })
        ));
    }

    #[tokio::test]
    async fn test_error_status_is_unreachable() {
        let endpoint = serve_once("500 Internal Server Error", "{}").await;
        let gateway = HttpDiagnosticsGateway::new(Duration::from_secs(2)).unwrap();

        assert!(matches!(
            gateway.fetch(&endpoint).await,
            Err(DiagnosticsError::Unreachable { .. })
        ));
    }

    #[tokio::test]
    async fn test_closed_port_is_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = listener.local_addr().unwrap().to_string();
        drop(listener);
        let gateway = HttpDiagnosticsGateway::new(Duration::from_millis(500)).unwrap();

        assert!(matches!(
            gateway.fetch(&endpoint).await,
            Err(DiagnosticsError::Unreachable { .. })
        ));
    }
}
