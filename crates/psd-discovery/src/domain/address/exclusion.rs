//! Address exclusion rules.

use std::net::IpAddr;

/// Decide whether an address must not be scanned.
///
/// Excluded when it is literally banned, when it is a loopback IP, or when it
/// is a private IP and private addresses are not allowed. Hostnames are only
/// matched against the banned list; they are never resolved here.
pub fn is_excluded(address: &str, banned: &[String], allow_private: bool) -> bool {
    if banned.iter().any(|b| b == address) {
        return true;
    }

    match address.parse::<IpAddr>() {
        Ok(ip) if ip.is_loopback() => true,
        Ok(ip) => !allow_private && is_private_ip(&ip),
        Err(_) => false,
    }
}

/// RFC 1918 for IPv4, unique-local (`fc00::/7`) for IPv6.
pub fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_private(),
        IpAddr::V6(v6) => (v6.segments()[0] & 0xfe00) == 0xfc00,
    }
}
