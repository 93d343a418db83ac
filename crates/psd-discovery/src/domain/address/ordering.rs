//! Resolution ordering of peer addresses.

use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::net::IpAddr;

/// Order a set of hosts for resolution attempts.
///
/// Hostnames come first in ascending order, then IP literals in descending
/// lexicographic order. Duplicates collapse.
pub fn classify_order<I, S>(addresses: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut hostnames = BTreeSet::new();
    let mut ips = BTreeSet::new();

    for address in addresses {
        let address = address.as_ref();
        if address.parse::<IpAddr>().is_ok() {
            ips.insert(Reverse(address.to_string()));
        } else {
            hostnames.insert(address.to_string());
        }
    }

    hostnames
        .into_iter()
        .chain(ips.into_iter().map(|Reverse(ip)| ip))
        .collect()
}
