use std::fmt;
use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

use crate::model::source::LineRange;
use crate::network::subnet::Network;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutingProtocol {
    Static,
    Rip,
    Ospf,
    Eigrp,
    Bgp,
    Unknown,
}

impl RoutingProtocol {
    /// Maps the keyword following `router` to a protocol.
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword.to_ascii_lowercase().as_str() {
            "rip" => Self::Rip,
            "ospf" => Self::Ospf,
            "eigrp" => Self::Eigrp,
            "bgp" => Self::Bgp,
            _ => Self::Unknown,
        }
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::Rip | Self::Ospf | Self::Eigrp | Self::Bgp)
    }
}

impl fmt::Display for RoutingProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Static => "static",
            Self::Rip => "rip",
            Self::Ospf => "ospf",
            Self::Eigrp => "eigrp",
            Self::Bgp => "bgp",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NextHop {
    Address(Ipv4Addr),
    Interface(String),
}

impl fmt::Display for NextHop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address(addr) => write!(f, "{addr}"),
            Self::Interface(name) => f.write_str(name),
        }
    }
}

/// A static route or a network statement of a dynamic protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingEntry {
    pub protocol: RoutingProtocol,
    /// The keyword as written, kept so unknown protocols lose nothing.
    pub keyword: String,
    /// OSPF process id, EIGRP/BGP autonomous system, ...
    pub process: Option<String>,
    pub destination: Option<Network>,
    pub next_hop: Option<NextHop>,
    pub area: Option<String>,
    pub admin_distance: Option<u8>,
    pub lines: LineRange,
}

impl RoutingEntry {
    pub fn new(protocol: RoutingProtocol, keyword: impl Into<String>, lines: LineRange) -> Self {
        Self {
            protocol,
            keyword: keyword.into(),
            process: None,
            destination: None,
            next_hop: None,
            area: None,
            admin_distance: None,
            lines,
        }
    }

    pub fn is_default_route(&self) -> bool {
        self.destination.is_some_and(|net| net.is_default())
    }
}
