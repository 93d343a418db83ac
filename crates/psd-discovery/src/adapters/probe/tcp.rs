//! TCP connect probe.

use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::trace;

use crate::domain::join_host_port;
use crate::ports::PortProbe;

/// A port is open when a TCP connection completes within the timeout.
/// The connection is dropped right away.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpPortProbe;

impl TcpPortProbe {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PortProbe for TcpPortProbe {
    async fn is_open(&self, host: &str, port: u16, limit: Duration) -> bool {
        let address = join_host_port(host, port);
        match timeout(limit, TcpStream::connect(&address)).await {
            Ok(Ok(_stream)) => true,
            Ok(Err(e)) => {
                trace!(address = %address, error = %e, "Connection refused");
                false
            }
            Err(_) => {
                trace!(address = %address, "Connection timed out");
                false
            }
        }
    }
}
