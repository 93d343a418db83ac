//! Port probing adapters.

mod tcp;

pub use tcp::TcpPortProbe;
