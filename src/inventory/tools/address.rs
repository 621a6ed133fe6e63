//! Address normalisation for the `Ip-address` column.
//!
//! Operators type addresses either bare (`10.0.0.5`) or with a CIDR mask
//! (`192.168.1.10/24`). Both forms are reduced to a canonical host address and
//! an optional prefix length. What happens to the host bits is decided by an
//! [`IpPolicy`].

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How the part before the slash becomes the canonical address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IpPolicy {
    /// Keep the address exactly as written (`192.168.1.10/24` → `192.168.1.10`).
    #[default]
    LiteralStrip,
    /// Resolve to the network base (`192.168.1.10/24` → `192.168.1.0`).
    NetworkBase,
}

/// Canonical address plus the mask length that accompanied it, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedAddress {
    pub address: String,
    pub prefix_length: Option<u8>,
}

/// Reasons an address cell cannot be normalised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("'{0}' is not an IPv4 or IPv6 literal")]
    InvalidLiteral(String),

    #[error("'{0}' is not a valid prefix length")]
    InvalidPrefix(String),

    #[error("prefix length {prefix} exceeds {max} for {address}")]
    PrefixOutOfRange { address: String, prefix: u32, max: u8 },
}

/// Splits `raw` on the first `/`, validates both halves and applies `policy`.
///
/// Hostnames are rejected; only dotted-quad IPv4 and hextet IPv6 literals are
/// accepted. The prefix must be plain decimal digits within the range of the
/// address family.
pub fn normalize(raw: &str, policy: IpPolicy) -> Result<NormalizedAddress, AddressError> {
    let raw = raw.trim();
    let (literal, prefix) = match raw.split_once('/') {
        Some((literal, prefix)) => (literal.trim(), Some(prefix.trim())),
        None => (raw, None),
    };

    let ip: IpAddr = literal
        .parse()
        .map_err(|_| AddressError::InvalidLiteral(literal.to_string()))?;

    let prefix_length = match prefix {
        Some(prefix) => Some(parse_prefix(literal, prefix, max_prefix(&ip))?),
        None => None,
    };

    let address = match policy {
        IpPolicy::LiteralStrip => literal.to_string(),
        IpPolicy::NetworkBase => {
            network_base(ip, prefix_length.unwrap_or_else(|| max_prefix(&ip))).to_string()
        }
    };

    Ok(NormalizedAddress {
        address,
        prefix_length,
    })
}

fn parse_prefix(literal: &str, prefix: &str, max: u8) -> Result<u8, AddressError> {
    if prefix.is_empty() || !prefix.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(AddressError::InvalidPrefix(prefix.to_string()));
    }
    let value: u32 = prefix
        .parse()
        .map_err(|_| AddressError::InvalidPrefix(prefix.to_string()))?;
    if value > u32::from(max) {
        return Err(AddressError::PrefixOutOfRange {
            address: literal.to_string(),
            prefix: value,
            max,
        });
    }
    // Bounded by `max`, which is at most 128.
    Ok(value as u8)
}

fn max_prefix(ip: &IpAddr) -> u8 {
    match ip {
        IpAddr::V4(_) => 32,
        IpAddr::V6(_) => 128,
    }
}

/// Clears the host bits of `ip` beyond `prefix_length`.
pub fn network_base(ip: IpAddr, prefix_length: u8) -> IpAddr {
    match ip {
        IpAddr::V4(v4) => {
            let host_bits = 32u32.saturating_sub(u32::from(prefix_length));
            let mask = u32::MAX.checked_shl(host_bits).unwrap_or(0);
            IpAddr::V4(Ipv4Addr::from(u32::from(v4) & mask))
        }
        IpAddr::V6(v6) => {
            let host_bits = 128u32.saturating_sub(u32::from(prefix_length));
            let mask = u128::MAX.checked_shl(host_bits).unwrap_or(0);
            IpAddr::V6(Ipv6Addr::from(u128::from(v6) & mask))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalized(address: &str, prefix_length: Option<u8>) -> NormalizedAddress {
        NormalizedAddress {
            address: address.to_string(),
            prefix_length,
        }
    }

    #[test]
    fn literal_strip_keeps_host_address() {
        assert_eq!(
            normalize("192.168.1.10/24", IpPolicy::LiteralStrip),
            Ok(normalized("192.168.1.10", Some(24)))
        );
        assert_eq!(
            normalize("10.0.0.5", IpPolicy::LiteralStrip),
            Ok(normalized("10.0.0.5", None))
        );
    }

    #[test]
    fn network_base_clears_host_bits() {
        assert_eq!(
            normalize("192.168.1.10/24", IpPolicy::NetworkBase),
            Ok(normalized("192.168.1.0", Some(24)))
        );
        assert_eq!(
            normalize("10.1.2.3/0", IpPolicy::NetworkBase),
            Ok(normalized("0.0.0.0", Some(0)))
        );
        assert_eq!(
            normalize("2001:db8::1234/64", IpPolicy::NetworkBase),
            Ok(normalized("2001:db8::", Some(64)))
        );
    }

    #[test]
    fn network_base_without_mask_is_the_host_itself() {
        assert_eq!(
            normalize("10.0.0.5", IpPolicy::NetworkBase),
            Ok(normalized("10.0.0.5", None))
        );
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(
            normalize("  172.16.0.9 / 16 ", IpPolicy::LiteralStrip),
            Ok(normalized("172.16.0.9", Some(16)))
        );
    }

    #[test]
    fn ipv6_literal_is_kept_as_written() {
        assert_eq!(
            normalize("2001:DB8::1/128", IpPolicy::LiteralStrip),
            Ok(normalized("2001:DB8::1", Some(128)))
        );
    }

    #[test]
    fn rejects_hostnames_and_garbage() {
        for raw in ["not-an-ip", "web01.local", "999.999.999.999", "10.0.0", "10.0.0.1x/24", ""] {
            assert!(
                matches!(
                    normalize(raw, IpPolicy::LiteralStrip),
                    Err(AddressError::InvalidLiteral(_))
                ),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_bad_prefixes() {
        assert_eq!(
            normalize("10.0.0.1/", IpPolicy::LiteralStrip),
            Err(AddressError::InvalidPrefix(String::new()))
        );
        assert_eq!(
            normalize("10.0.0.1/+8", IpPolicy::LiteralStrip),
            Err(AddressError::InvalidPrefix("+8".into()))
        );
        assert_eq!(
            normalize("10.0.0.1/24/8", IpPolicy::LiteralStrip),
            Err(AddressError::InvalidPrefix("24/8".into()))
        );
        assert_eq!(
            normalize("10.0.0.1/33", IpPolicy::LiteralStrip),
            Err(AddressError::PrefixOutOfRange {
                address: "10.0.0.1".into(),
                prefix: 33,
                max: 32,
            })
        );
        assert!(normalize("::1/129", IpPolicy::LiteralStrip).is_err());
        assert!(normalize("::1/128", IpPolicy::LiteralStrip).is_ok());
    }
}
