//! # Adapters Layer
//!
//! Concrete implementations of the outbound ports:
//!
//! - `gateway` - HTTP diagnostics transport (requires `network`)
//! - `probe` - TCP connect probe (requires `network`)
//! - `sink` - mpsc channel sink, Prometheus `file_sd` sink (requires `file-sd`)
//! - `config` - TOML configuration file (requires `config-file`)

#[cfg(feature = "config-file")]
pub mod config;
#[cfg(feature = "network")]
pub mod gateway;
#[cfg(feature = "network")]
pub mod probe;
pub mod sink;

#[cfg(feature = "config-file")]
pub use config::{load_config_file, FileConfig};
#[cfg(feature = "network")]
pub use gateway::HttpDiagnosticsGateway;
#[cfg(feature = "network")]
pub use probe::TcpPortProbe;
#[cfg(feature = "file-sd")]
pub use sink::{FileSdSink, DEFAULT_SD_NAME};
pub use sink::ChannelTargetSink;
