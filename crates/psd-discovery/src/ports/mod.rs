//! # Ports Layer - Hexagonal Architecture Boundaries
//!
//! - **Driving Ports (Inbound):** the API the runtime drives
//! - **Driven Ports (Outbound):** capabilities adapters provide (diagnostics
//!   transport, port probing, target output, round observation)

pub mod inbound;
pub mod outbound;

pub use inbound::DiscoveryApi;
pub use outbound::{DiagnosticsGateway, NoopRoundObserver, PortProbe, RoundObserver, TargetSink};
