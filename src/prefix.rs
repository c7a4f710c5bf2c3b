//! Canonical network prefix representation.
//!
//! A [`Prefix`] is a base address (fixed-width unsigned integer) plus a prefix
//! length, with all host bits cleared. Containment, sibling detection and
//! masking are implemented directly on the integer representation so the
//! aggregator can reason about address space without any helper types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;
use thiserror::Error;

/// Address family of a prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Ipv4,
    Ipv6,
}

impl Family {
    /// Number of address bits in this family.
    pub fn bit_width(self) -> u8 {
        match self {
            Family::Ipv4 => 32,
            Family::Ipv6 => 128,
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Family::Ipv4 => f.write_str("ipv4"),
            Family::Ipv6 => f.write_str("ipv6"),
        }
    }
}

/// Error returned when text does not describe a valid address or CIDR block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("not a valid address or CIDR block")]
pub struct InvalidPrefix;

/// A canonical network prefix: base address with host bits cleared, plus length.
///
/// The derived ordering is exactly what the aggregator needs: family first,
/// then base ascending as an unsigned integer, then length ascending (broader
/// prefix first at the same base).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Prefix {
    V4 { base: u32, len: u8 },
    V6 { base: u128, len: u8 },
}

/// Clear the bits of `addr` beyond the first `len` bits.
fn mask_v4(addr: u32, len: u8) -> u32 {
    debug_assert!(len <= 32);
    if len == 0 {
        0
    } else {
        let host_bits = 32 - len;
        (addr >> host_bits) << host_bits
    }
}

fn mask_v6(addr: u128, len: u8) -> u128 {
    debug_assert!(len <= 128);
    if len == 0 {
        0
    } else {
        let host_bits = 128 - len;
        (addr >> host_bits) << host_bits
    }
}

impl Prefix {
    /// Build a canonical prefix from an address and a length.
    ///
    /// Host bits beyond `len` are cleared rather than rejected, mirroring the
    /// relaxed CIDR interpretation of the feeds being consumed. Returns `None`
    /// only when `len` exceeds the family's bit width.
    pub fn new(addr: IpAddr, len: u8) -> Option<Self> {
        match addr {
            IpAddr::V4(v4) => {
                if len > 32 {
                    return None;
                }
                Some(Prefix::V4 {
                    base: mask_v4(u32::from(v4), len),
                    len,
                })
            }
            IpAddr::V6(v6) => {
                if len > 128 {
                    return None;
                }
                Some(Prefix::V6 {
                    base: mask_v6(u128::from(v6), len),
                    len,
                })
            }
        }
    }

    /// Address family of this prefix.
    pub fn family(&self) -> Family {
        match self {
            Prefix::V4 { .. } => Family::Ipv4,
            Prefix::V6 { .. } => Family::Ipv6,
        }
    }

    /// Prefix length in bits.
    pub fn prefix_len(&self) -> u8 {
        match self {
            Prefix::V4 { len, .. } | Prefix::V6 { len, .. } => *len,
        }
    }

    /// Check whether this prefix fully contains `other`.
    ///
    /// True iff both are the same family, this prefix is at most as long as
    /// `other`, and `other`'s base masked to this length equals this base.
    pub fn contains(&self, other: &Prefix) -> bool {
        match (self, other) {
            (Prefix::V4 { base: a, len: al }, Prefix::V4 { base: b, len: bl }) => {
                al <= bl && mask_v4(*b, *al) == *a
            }
            (Prefix::V6 { base: a, len: al }, Prefix::V6 { base: b, len: bl }) => {
                al <= bl && mask_v6(*b, *al) == *a
            }
            _ => false,
        }
    }

    /// Check whether `self` and `other` are the two halves of one parent block.
    ///
    /// Siblings have the same family and the same length L (L >= 1), and their
    /// bases differ in exactly bit `bit_width - L`. Two `/0` prefixes have no
    /// parent and are never siblings.
    pub fn is_sibling_of(&self, other: &Prefix) -> bool {
        match (self, other) {
            (Prefix::V4 { base: a, len: al }, Prefix::V4 { base: b, len: bl }) => {
                al == bl && *al >= 1 && (a ^ b) == 1u32 << (32 - al)
            }
            (Prefix::V6 { base: a, len: al }, Prefix::V6 { base: b, len: bl }) => {
                al == bl && *al >= 1 && (a ^ b) == 1u128 << (128 - al)
            }
            _ => false,
        }
    }

    /// The block one bit broader that contains this prefix, or `None` at `/0`.
    pub fn parent(&self) -> Option<Prefix> {
        match *self {
            Prefix::V4 { base, len } if len > 0 => Some(Prefix::V4 {
                base: mask_v4(base, len - 1),
                len: len - 1,
            }),
            Prefix::V6 { base, len } if len > 0 => Some(Prefix::V6 {
                base: mask_v6(base, len - 1),
                len: len - 1,
            }),
            _ => None,
        }
    }
}

impl From<IpAddr> for Prefix {
    /// A bare address is the narrowest prefix: `/32` or `/128`.
    fn from(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(v4) => Prefix::V4 {
                base: u32::from(v4),
                len: 32,
            },
            IpAddr::V6(v6) => Prefix::V6 {
                base: u128::from(v6),
                len: 128,
            },
        }
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Prefix::V4 { base, len } => write!(f, "{}/{}", Ipv4Addr::from(base), len),
            Prefix::V6 { base, len } => write!(f, "{}/{}", Ipv6Addr::from(base), len),
        }
    }
}

impl FromStr for Prefix {
    type Err = InvalidPrefix;

    /// Parse `addr/len` or a bare address. Host bits under `len` are masked.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((addr, len)) => {
                let addr: IpAddr = addr.parse().map_err(|_| InvalidPrefix)?;
                let len: u8 = len.parse().map_err(|_| InvalidPrefix)?;
                Prefix::new(addr, len).ok_or(InvalidPrefix)
            }
            None => {
                let addr: IpAddr = s.parse().map_err(|_| InvalidPrefix)?;
                Ok(Prefix::from(addr))
            }
        }
    }
}
