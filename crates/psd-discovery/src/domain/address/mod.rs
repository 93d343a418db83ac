//! Address utilities: multi-address parsing, resolution ordering and
//! exclusion rules.
//!
//! All functions in this module are pure (no I/O, no state mutation).

// Semantic submodules
mod exclusion;
mod multiaddr;
mod ordering;

// Re-export public API
pub use exclusion::{is_excluded, is_private_ip};
pub use multiaddr::{join_host_port, parse_multi_address};
pub use ordering::classify_order;
