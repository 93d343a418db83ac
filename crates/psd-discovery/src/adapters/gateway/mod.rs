//! Diagnostics transport adapters.

mod http;

pub use http::HttpDiagnosticsGateway;
