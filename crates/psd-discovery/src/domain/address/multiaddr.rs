//! Multi-address parsing.

use crate::domain::AddressError;

/// Extract the host and port from a multi-address such as
/// `/dns4/bootstrap-1.test.keep.network/tcp/3919`.
///
/// The first four slash-delimited segments are `code`, `host`, `protocol`
/// and `port`. Anything after the port (e.g. `/p2p/<id>`) is ignored, as is
/// a single trailing slash. A port of `0` means "no port".
///
/// The host is returned unmodified: a DNS name, IPv4 or IPv6 literal.
pub fn parse_multi_address(multi_address: &str) -> Result<(String, Option<u16>), AddressError> {
    let malformed = || AddressError::MalformedAddress(multi_address.to_string());

    let rest = multi_address.strip_prefix('/').ok_or_else(malformed)?;
    let segments: Vec<&str> = rest.split('/').collect();
    if segments.len() < 4 {
        return Err(malformed());
    }

    let (code, host, protocol, port) = (segments[0], segments[1], segments[2], segments[3]);
    if code.is_empty() || protocol.is_empty() || port.is_empty() {
        return Err(malformed());
    }

    if host.is_empty() {
        return Err(AddressError::EmptyHost(multi_address.to_string()));
    }

    let port_number = if port.bytes().all(|b| b.is_ascii_digit()) {
        port.parse::<u16>().ok()
    } else {
        None
    };
    let port_number = port_number.ok_or_else(|| AddressError::InvalidPort {
        address: multi_address.to_string(),
        port: port.to_string(),
    })?;

    Ok((host.to_string(), (port_number != 0).then_some(port_number)))
}

/// Join a host and port into an endpoint string, bracketing IPv6 literals.
pub fn join_host_port(host: &str, port: u16) -> String {
    if host.contains(':') {
        format!("[{}]:{}", host, port)
    } else {
        format!("{}:{}", host, port)
    }
}
