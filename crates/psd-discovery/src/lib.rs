//! # Peer Service Discovery
//!
//! Periodically discovers the peers of a distributed network through its
//! bootstrap nodes and turns them into scrape targets.
//!
//! Every round:
//! 1. Bootstrap sources are asked for their diagnostics (connected peers)
//! 2. The peer lists are merged into one record per peer identity
//! 3. Each peer's diagnostics endpoint is resolved: known endpoint first,
//!    then a port discovered for another peer at the same address, then a
//!    scan of the configured port range
//! 4. The result is diffed against the previous round. Peers that vanished
//!    get an explicit removal entry
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture with:
//! - **Domain Layer:** Pure logic (multi-address parsing, peer combination,
//!   round diffing, configuration)
//! - **Ports Layer:** Trait definitions for diagnostics transport, port
//!   probing, target output and round observation
//! - **Service Layer:** The endpoint resolver and the round scheduler
//! - **Adapters Layer:** Concrete implementations (feature-gated)
//!
//! ## Features
//!
//! - `network` - HTTP diagnostics gateway (reqwest) and TCP port probe
//! - `file-sd` - Prometheus `file_sd` output file
//! - `config-file` - TOML configuration loader
//! - `test-utils` - In-memory gateway, probe and sink
//!
//! ## Example
//!
//! ```rust
//! use psd_discovery::{classify_order, parse_multi_address};
//!
//! let (host, port) = parse_multi_address("/dns4/host-a/tcp/4001").unwrap();
//! assert_eq!(host, "host-a");
//! assert_eq!(port, Some(4001));
//!
//! let order = classify_order(["10.0.0.5", "host-a"]);
//! assert_eq!(order, vec!["host-a", "10.0.0.5"]);
//! ```

// =============================================================================
// CORE MODULES
// =============================================================================

pub mod domain;
pub mod ports;
pub mod service;

// =============================================================================
// FEATURE-GATED MODULES
// =============================================================================

/// Adapters for external integrations.
/// Different adapters require different features.
pub mod adapters;

/// In-memory port implementations.
/// Requires feature: `test-utils`
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// =============================================================================
// CORE RE-EXPORTS (Always Available)
// =============================================================================

// Domain entities
pub use domain::{
    AdvertisedPeer, CombinedPeers, DiagnosticsRecord, DiscoveredPortCache, DiscoveryConfig,
    IdentityMismatch, MalformedMultiAddress, PeerIdentity, PeerRecord, PortRange, PortSource,
    ResolutionOutcome, RoundHistory, RoundReport, Target, TargetGroup, LABEL_ADDRESS,
    LABEL_IDENTITY, LABEL_NETWORK_ID,
};

// Domain errors
pub use domain::{
    AddressError, CheckPortError, ConfigError, DiagnosticsError, PortRangeError, SinkError,
};

// Domain services
pub use domain::{
    classify_order, combine_peers, is_excluded, is_private_ip, join_host_port,
    parse_duration, parse_multi_address,
};

// Port traits
pub use ports::{
    DiagnosticsGateway, DiscoveryApi, NoopRoundObserver, PortProbe, RoundObserver, TargetSink,
};

// Service
pub use service::{DiscoveryScheduler, EndpointResolver};

// =============================================================================
// ADAPTER RE-EXPORTS
// =============================================================================

pub use adapters::ChannelTargetSink;

#[cfg(feature = "network")]
pub use adapters::{HttpDiagnosticsGateway, TcpPortProbe};

#[cfg(feature = "file-sd")]
pub use adapters::FileSdSink;

#[cfg(feature = "config-file")]
pub use adapters::{load_config_file, FileConfig};
