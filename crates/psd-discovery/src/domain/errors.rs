//! Domain errors for peer discovery.
//!
//! None of these abort a round. They are logged at the point of failure and
//! the algorithm continues with whatever data is left.

use crate::domain::PeerIdentity;
use thiserror::Error;

/// Failure to parse a multi-address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// The string is not of the form `/<code>/<host>/<protocol>/<port>`.
    #[error("malformed multi-address: {0}")]
    MalformedAddress(String),
    /// The host segment is empty.
    #[error("empty host in multi-address: {0}")]
    EmptyHost(String),
    /// The port segment is not a valid port number.
    #[error("invalid port {port:?} in multi-address: {address}")]
    InvalidPort { address: String, port: String },
}

/// Failure to parse a `start-end` port range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortRangeError {
    #[error("invalid range provided: {0}")]
    InvalidFormat(String),
    #[error("invalid port number: {0}")]
    InvalidNumber(String),
    #[error("port range bound must be within 1-65535, got {0}")]
    OutOfBounds(u32),
    #[error("range start {start} is greater than end {end}")]
    StartAfterEnd { start: u16, end: u16 },
}

/// Failure to fetch diagnostics from an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiagnosticsError {
    #[error("address is empty")]
    EmptyAddress,
    #[error("failed to get diagnostics from {endpoint}: {reason}")]
    Unreachable { endpoint: String, reason: String },
    #[error("failed to decode diagnostics from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },
}

/// Rejection of a single `(address, port)` candidate during resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckPortError {
    #[error("port {port} is not open on {address}")]
    PortClosed { address: String, port: u16 },
    #[error("diagnostics unreachable on {address}:{port}: {source}")]
    UnreachableDiagnostics {
        address: String,
        port: u16,
        #[source]
        source: DiagnosticsError,
    },
    #[error("port {port} on {address} serves another peer: {served}")]
    WrongPeer {
        address: String,
        port: u16,
        served: PeerIdentity,
    },
}

/// Failure to deliver a batch to the output sink.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    #[error("failed to write targets to {path}: {reason}")]
    Io { path: String, reason: String },
    #[error("failed to encode targets: {0}")]
    Encode(String),
    #[error("sink receiver closed")]
    Closed,
}

/// Invalid static configuration. The only fatal error class.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid port range: {0}")]
    PortRange(#[from] PortRangeError),
    #[error("invalid duration {value:?}: {reason}")]
    Duration { value: String, reason: String },
    #[error("no bootstrap source addresses configured")]
    NoSources,
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
    #[error("failed to read {path}: {reason}")]
    Io { path: String, reason: String },
    #[error("failed to parse config: {0}")]
    Parse(String),
}
