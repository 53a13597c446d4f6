// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Reverse-lookup (PTR) names derived from address literals.
//!
//! IPv4 addresses map to octet-reversed names under `in-addr.arpa.` and IPv6
//! addresses to nibble-reversed names under `ip6.arpa.`. The first label
//! becomes the PTR owner and the remainder is the reverse zone the update is
//! sent to.
//!
//! # Example
//!
//! ```rust
//! use binder::reverse::reverse_name;
//!
//! let reverse = reverse_name("10.20.0.5").unwrap();
//! assert_eq!(reverse.owner, "5");
//! assert_eq!(reverse.zone, "0.20.10.in-addr.arpa.");
//! ```

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use serde::Serialize;

use crate::dns_errors::AddressError;

/// Address family of a parsed address literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AddressFamily {
    IPv4,
    IPv6,
}

impl AddressFamily {
    /// Reverse tree this family lives under, with the trailing root label.
    #[must_use]
    pub fn reverse_suffix(&self) -> &'static str {
        match self {
            Self::IPv4 => "in-addr.arpa.",
            Self::IPv6 => "ip6.arpa.",
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IPv4 => write!(f, "IPv4"),
            Self::IPv6 => write!(f, "IPv6"),
        }
    }
}

/// A reverse-lookup name split into PTR owner and reverse zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReverseName {
    /// Family of the address the name was derived from
    pub family: AddressFamily,
    /// First label of the reverse name (e.g. "5")
    pub owner: String,
    /// Everything after the first label, ending with "." (e.g. "0.20.10.in-addr.arpa.")
    pub zone: String,
}

impl ReverseName {
    /// Fully-qualified reverse name (`owner.zone`).
    #[must_use]
    pub fn fqdn(&self) -> String {
        format!("{}.{}", self.owner, self.zone)
    }
}

/// Compute the reverse-lookup owner and zone for an IPv4 or IPv6 literal.
///
/// # Errors
///
/// Returns [`AddressError::InvalidAddress`] if `address` does not parse as an
/// IP address.
pub fn reverse_name(address: &str) -> Result<ReverseName, AddressError> {
    let ip: IpAddr = address
        .trim()
        .parse()
        .map_err(|_| AddressError::InvalidAddress {
            address: address.to_string(),
        })?;

    let (family, mut labels) = match ip {
        IpAddr::V4(v4) => (AddressFamily::IPv4, ipv4_labels(v4)),
        IpAddr::V6(v6) => (AddressFamily::IPv6, ipv6_labels(v6)),
    };

    // Both families produce at least four labels, so the split always has an owner.
    let owner = labels.remove(0);
    let zone = format!("{}.{}", labels.join("."), family.reverse_suffix());

    Ok(ReverseName {
        family,
        owner,
        zone,
    })
}

fn ipv4_labels(addr: Ipv4Addr) -> Vec<String> {
    addr.octets()
        .iter()
        .rev()
        .map(ToString::to_string)
        .collect()
}

fn ipv6_labels(addr: Ipv6Addr) -> Vec<String> {
    addr.octets()
        .iter()
        .rev()
        .flat_map(|byte| [byte & 0x0f, byte >> 4])
        .map(|nibble| format!("{nibble:x}"))
        .collect()
}
