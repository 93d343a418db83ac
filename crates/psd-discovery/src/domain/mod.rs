//! Domain Layer - Pure discovery logic with no I/O
//!
//! This module contains:
//! - Peer identities, diagnostics payloads and target groups
//! - Multi-address parsing, resolution ordering and exclusion rules
//! - Peer combination across bootstrap sources
//! - The round-scoped discovered-port cache
//! - Round history and the target diff
//! - Static configuration

pub mod address;
pub mod combiner;
pub mod config;
pub mod errors;
pub mod port_cache;
pub mod port_range;
pub mod round;
/// Core domain types (identities, records, target groups)
pub mod types;

pub use address::*;
pub use combiner::*;
pub use config::*;
pub use errors::*;
pub use port_cache::*;
pub use port_range::*;
pub use round::*;
pub use types::*;
