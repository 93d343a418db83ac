//! `/metrics` and `/health` HTTP endpoint.

use std::net::SocketAddr;

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

const TEXT_FORMAT: &str = "text/plain; version=0.0.4";

/// Router serving the Prometheus registry.
pub fn router() -> Router {
    Router::new()
        .route("/metrics", get(metrics))
        .route("/health", get(health_check))
}

async fn metrics() -> impl IntoResponse {
    match psd_telemetry::encode_metrics() {
        Ok(body) => (StatusCode::OK, [(header::CONTENT_TYPE, TEXT_FORMAT)], body).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to encode metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

async fn health_check() -> &'static str {
    "OK"
}

/// Bind `addr` and serve until `shutdown` flips to `true` or its sender is
/// dropped. Returns the bound address, which differs from `addr` for port 0.
pub async fn spawn(
    addr: SocketAddr,
    mut shutdown: watch::Receiver<bool>,
) -> std::io::Result<(SocketAddr, JoinHandle<std::io::Result<()>>)> {
    let listener = TcpListener::bind(addr).await?;
    let local = listener.local_addr()?;
    info!(addr = %local, "Starting metrics server");

    let handle = tokio::spawn(async move {
        axum::serve(listener, router())
            .with_graceful_shutdown(async move {
                while !*shutdown.borrow() {
                    if shutdown.changed().await.is_err() {
                        break;
                    }
                }
            })
            .await
    });
    Ok((local, handle))
}
