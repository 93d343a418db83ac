//! # Service Layer
//!
//! Wires the pure domain logic to the outbound ports:
//!
//! - [`EndpointResolver`]: per-peer endpoint resolution state machine
//! - [`DiscoveryScheduler`]: periodic round driver, implements `DiscoveryApi`

mod resolver;
mod scheduler;

pub use resolver::EndpointResolver;
pub use scheduler::DiscoveryScheduler;
