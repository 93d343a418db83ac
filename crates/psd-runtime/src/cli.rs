//! Command line interface.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use psd_discovery::{parse_duration, PortRange};

/// Discovers network peers through their bootstrap nodes and exports them to
/// a Prometheus file_sd target file.
#[derive(Parser, Debug, Clone, Default, PartialEq, Eq)]
#[command(name = "peer-sd")]
#[command(version, about)]
pub struct Args {
    /// TOML configuration file. Command line flags take precedence.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output file for file_sd compatible file [default: keep_sd.json]
    #[arg(long, value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Bootstrap node to discover peers from. Repeat for several sources,
    /// most trusted first [default: localhost:9701]
    #[arg(long = "source-address", value_name = "HOST:PORT")]
    pub source_addresses: Vec<String>,

    /// Time between discovery rounds, e.g. `30s`, `5m` [default: 5m]
    #[arg(long, value_parser = parse_duration)]
    pub refresh_interval: Option<Duration>,

    /// Port range for the diagnostics endpoint scan [default: 9701-9799]
    #[arg(long, value_name = "START-END")]
    pub scan_range: Option<PortRange>,

    /// Timeout for a single port probe [default: 1s]
    #[arg(long, value_parser = parse_duration)]
    pub scan_timeout: Option<Duration>,

    /// Timeout for a diagnostics endpoint call [default: 5s]
    #[arg(long, value_parser = parse_duration)]
    pub diagnostics_timeout: Option<Duration>,

    /// Address never scanned. Repeatable; replaces the default list
    /// [default: 127.0.0.1]
    #[arg(long = "banned-address", value_name = "ADDRESS")]
    pub banned_addresses: Vec<String>,

    /// Scan RFC 1918 and unique-local addresses too
    #[arg(long)]
    pub allow_private_addresses: bool,

    /// Peers resolved concurrently [default: 8]
    #[arg(long)]
    pub max_concurrent_resolutions: Option<usize>,

    /// Bootstrap sources queried concurrently [default: 4]
    #[arg(long)]
    pub max_concurrent_sources: Option<usize>,

    /// Output logs in JSON format
    #[arg(long)]
    pub log_json: bool,

    /// Log level or filter directives [default: info]
    #[arg(long)]
    pub log_level: Option<String>,

    /// Serve `/metrics` and `/health` on this address
    #[arg(long, value_name = "HOST:PORT")]
    pub metrics_listen: Option<SocketAddr>,

    /// Name prefixed to every target group key in the output file
    /// [default: peer_sd]
    #[arg(long)]
    pub sd_name: Option<String>,
}
