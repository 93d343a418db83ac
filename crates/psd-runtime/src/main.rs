//! `peer-sd` entry point.

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::watch;
use tracing::{info, warn};

use psd_runtime::{Args, RuntimeSettings};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = RuntimeSettings::from_args(&args).context("invalid configuration")?;

    psd_telemetry::init_telemetry(&settings.telemetry)
        .context("failed to initialize telemetry")?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => warn!(error = %e, "Failed to listen for Ctrl+C, shutting down"),
        }
        let _ = shutdown_tx.send(true);
    });

    psd_runtime::run(settings, shutdown_rx).await?;
    Ok(())
}
