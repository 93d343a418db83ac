//! Local diagnostics servers for the integration flows.

use psd_discovery::DiagnosticsRecord;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Minimal HTTP server answering every request with `record` as JSON.
///
/// Connections closed without a request (port probes) are dropped silently.
pub struct DiagnosticsServer {
    port: u16,
    handle: JoinHandle<()>,
}

impl DiagnosticsServer {
    pub async fn start(record: DiagnosticsRecord) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let port = listener.local_addr()?.port();
        let body = serde_json::to_string(&record)?;

        let handle = tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let body = body.clone();
                tokio::spawn(async move {
                    let mut buf = [0u8; 2048];
                    match stream.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(_) => {}
                    }
                    let response = format!(
                        "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = stream.write_all(response.as_bytes()).await;
                });
            }
        });

        Ok(Self { port, handle })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// `host:port` of the bootstrap-facing endpoint.
    pub fn endpoint(&self) -> String {
        format!("127.0.0.1:{}", self.port)
    }
}

impl Drop for DiagnosticsServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
