//! LAN/remote classification of media player addresses.

/// Classification of a player address relative to the private LAN ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressClass {
    /// Address falls inside 10/8, 172.16/12, or 192.168/16.
    Local,
    /// Anything else, including addresses that fail to parse.
    Remote,
}

impl AddressClass {
    /// Whether the address counts toward the remote stream census.
    #[must_use]
    pub const fn is_remote(self) -> bool {
        matches!(self, Self::Remote)
    }
}

/// Classify a player address as LAN-local or remote.
///
/// Accepts `host:port`, bare IPv4, or arbitrary text. An optional port is
/// stripped by keeping the substring before the last `:`. Input that does not
/// parse as exactly four IPv4 octets fails open to [`AddressClass::Remote`]
/// so an unreadable address never suppresses throttling.
///
/// Loopback (127/8) is deliberately not treated as local; it falls through
/// to `Remote` like any other non-private range.
#[must_use]
pub fn classify(address: &str) -> AddressClass {
    let host = address.rsplit_once(':').map_or(address, |(host, _)| host);
    let Some(octets) = parse_ipv4(host) else {
        return AddressClass::Remote;
    };

    match (octets[0], octets[1]) {
        (10, _) | (172, 16..=31) | (192, 168) => AddressClass::Local,
        _ => AddressClass::Remote,
    }
}

fn parse_ipv4(host: &str) -> Option<[u8; 4]> {
    let mut octets = [0_u8; 4];
    let mut segments = host.split('.');
    for slot in &mut octets {
        *slot = segments.next()?.parse().ok()?;
    }
    if segments.next().is_some() {
        return None;
    }
    Some(octets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn private_ranges_classify_local() {
        assert_eq!(classify("10.0.0.5"), AddressClass::Local);
        assert_eq!(classify("10.255.255.255"), AddressClass::Local);
        assert_eq!(classify("172.16.0.1"), AddressClass::Local);
        assert_eq!(classify("172.31.200.7"), AddressClass::Local);
        assert_eq!(classify("192.168.1.50"), AddressClass::Local);
    }

    #[test]
    fn port_suffix_is_stripped() {
        assert_eq!(classify("10.0.0.5:32400"), AddressClass::Local);
        assert_eq!(classify("172.31.0.9:51413"), AddressClass::Local);
        assert_eq!(classify("203.0.113.9:32400"), AddressClass::Remote);
    }

    #[test]
    fn public_addresses_classify_remote() {
        assert_eq!(classify("203.0.113.9"), AddressClass::Remote);
        assert_eq!(classify("8.8.8.8"), AddressClass::Remote);
        assert_eq!(classify("172.15.0.1"), AddressClass::Remote);
        assert_eq!(classify("172.32.0.1"), AddressClass::Remote);
        assert_eq!(classify("192.169.0.1"), AddressClass::Remote);
    }

    #[test]
    fn loopback_is_not_special_cased() {
        assert_eq!(classify("127.0.0.1"), AddressClass::Remote);
    }

    #[test]
    fn malformed_input_fails_open_to_remote() {
        assert_eq!(classify("garbage"), AddressClass::Remote);
        assert_eq!(classify(""), AddressClass::Remote);
        assert_eq!(classify("10.0.0"), AddressClass::Remote);
        assert_eq!(classify("10.0.0.0.0"), AddressClass::Remote);
        assert_eq!(classify("10.0.0.256"), AddressClass::Remote);
        assert_eq!(classify("::1"), AddressClass::Remote);
        assert_eq!(classify("fe80::1%eth0"), AddressClass::Remote);
    }

    #[test]
    fn is_remote_reflects_variant() {
        assert!(AddressClass::Remote.is_remote());
        assert!(!AddressClass::Local.is_remote());
    }
}
