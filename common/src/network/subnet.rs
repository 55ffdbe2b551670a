use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use pnet::ipnetwork::Ipv4Network;
use serde::{Deserialize, Serialize};

/// An IPv4 address bound to an interface together with its prefix length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InterfaceAddress {
    pub address: Ipv4Addr,
    pub prefix: u8,
}

impl InterfaceAddress {
    pub fn new(address: Ipv4Addr, prefix: u8) -> anyhow::Result<Self> {
        anyhow::ensure!(prefix <= 32, "prefix /{prefix} is longer than 32 bits");
        Ok(Self { address, prefix })
    }

    /// Builds an address from the `A.B.C.D M.M.M.M` form.
    pub fn with_mask(address: Ipv4Addr, mask: Ipv4Addr) -> anyhow::Result<Self> {
        let prefix = mask_to_prefix(mask)
            .ok_or_else(|| anyhow::anyhow!("{mask} is not a contiguous subnet mask"))?;
        Self::new(address, prefix)
    }

    pub fn network(&self) -> Network {
        Network::containing(self.address, self.prefix)
    }

    pub fn mask(&self) -> Ipv4Addr {
        prefix_to_mask(self.prefix)
    }

    /// `true` when either address falls inside the other's network.
    pub fn overlaps(&self, other: &InterfaceAddress) -> bool {
        self.network().contains(other.address) || other.network().contains(self.address)
    }
}

impl fmt::Display for InterfaceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.prefix)
    }
}

impl FromStr for InterfaceAddress {
    type Err = String;

    /// Accepts `10.0.0.1/30` as well as `10.0.0.1 255.255.255.252`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (addr_str, mask_str) = s
            .split_once('/')
            .or_else(|| s.split_once(char::is_whitespace))
            .ok_or_else(|| format!("missing mask in '{s}'"))?;

        let address = addr_str
            .trim()
            .parse::<Ipv4Addr>()
            .map_err(|e| format!("invalid address '{addr_str}': {e}"))?;
        let mask_str = mask_str.trim();

        let result = match mask_str.parse::<u8>() {
            Ok(prefix) => Self::new(address, prefix),
            Err(_) => {
                let mask = mask_str
                    .parse::<Ipv4Addr>()
                    .map_err(|e| format!("invalid mask '{mask_str}': {e}"))?;
                Self::with_mask(address, mask)
            }
        };
        result.map_err(|e| e.to_string())
    }
}

/// A network address with its prefix, the grouping key of subnet inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Network {
    pub address: Ipv4Addr,
    pub prefix: u8,
}

impl Network {
    /// Network of `address` under `prefix`; prefixes above 32 are clamped.
    pub fn containing(address: Ipv4Addr, prefix: u8) -> Self {
        let prefix = prefix.min(32);
        let mask: u32 = prefix_to_mask(prefix).into();
        let network = u32::from(address) & mask;
        Self {
            address: Ipv4Addr::from(network),
            prefix,
        }
    }

    pub fn contains(&self, address: Ipv4Addr) -> bool {
        self.to_ipnetwork()
            .map(|net| net.contains(address))
            .unwrap_or(false)
    }

    pub fn is_default(&self) -> bool {
        self.prefix == 0
    }

    pub fn to_ipnetwork(&self) -> anyhow::Result<Ipv4Network> {
        let network = Ipv4Network::new(self.address, self.prefix)?;
        Ok(network)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.prefix)
    }
}

/// Converts a dotted subnet mask into a prefix length.
///
/// Returns `None` for non-contiguous masks such as `255.0.255.0`.
pub fn mask_to_prefix(mask: Ipv4Addr) -> Option<u8> {
    let bits = u32::from(mask);
    let prefix = bits.leading_ones();
    if bits.checked_shl(prefix).unwrap_or(0) != 0 {
        return None;
    }
    Some(prefix as u8)
}

/// Converts an ACL-style wildcard (`0.0.0.3`) into a prefix length.
pub fn wildcard_to_prefix(wildcard: Ipv4Addr) -> Option<u8> {
    mask_to_prefix(Ipv4Addr::from(!u32::from(wildcard)))
}

/// Accepts either a subnet mask or a wildcard, whichever is contiguous.
pub fn mask_or_wildcard_to_prefix(value: Ipv4Addr) -> Option<u8> {
    if u32::from(value) == 0 {
        // 0.0.0.0 is the wildcard of a host route far more often than a /0 mask
        return Some(32);
    }
    mask_to_prefix(value).or_else(|| wildcard_to_prefix(value))
}

pub fn prefix_to_mask(prefix: u8) -> Ipv4Addr {
    let prefix = u32::from(prefix.min(32));
    let bits = u32::MAX.checked_shl(32 - prefix).unwrap_or(0);
    Ipv4Addr::from(bits)
}

/// Classful prefix, used for RIP and EIGRP `network` statements without a mask.
pub fn classful_prefix(address: Ipv4Addr) -> u8 {
    match address.octets()[0] {
        0..=127 => 8,
        128..=191 => 16,
        _ => 24,
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
