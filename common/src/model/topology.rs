//! Inferred network graph.
//!
//! Nodes are kept sorted by hostname and act as the arena; links and segments
//! name their devices by hostname and never own them.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::device::DeviceRole;
use crate::network::subnet::Network;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InferenceBasis {
    Description,
    Subnet,
}

impl InferenceBasis {
    pub fn confidence(&self) -> Confidence {
        match self {
            Self::Description => Confidence::High,
            Self::Subnet => Confidence::Medium,
        }
    }
}

impl fmt::Display for InferenceBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Description => f.write_str("description"),
            Self::Subnet => f.write_str("subnet"),
        }
    }
}

/// Ordered from strongest to weakest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => f.write_str("high"),
            Self::Medium => f.write_str("medium"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkFlag {
    /// The remote interface could not be pinned down.
    AmbiguousEndpoint,
    /// Three or more interfaces share one broadcast network.
    SharedSegment,
}

impl fmt::Display for LinkFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AmbiguousEndpoint => f.write_str("ambiguous-endpoint"),
            Self::SharedSegment => f.write_str("shared-segment"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Endpoint {
    pub device: String,
    /// `None` when the link is device-to-device only.
    pub interface: Option<String>,
}

impl Endpoint {
    pub fn new(device: impl Into<String>, interface: Option<String>) -> Self {
        Self {
            device: device.into(),
            interface,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.interface {
            Some(interface) => write!(f, "{} {}", self.device, interface),
            None => write!(f, "{} (?)", self.device),
        }
    }
}

/// A point-to-point connection between two devices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub a: Endpoint,
    pub b: Endpoint,
    pub basis: InferenceBasis,
    pub confidence: Confidence,
    pub network: Option<Network>,
    pub flags: BTreeSet<LinkFlag>,
}

impl Link {
    pub fn touches(&self, hostname: &str) -> bool {
        self.a.device == hostname || self.b.device == hostname
    }

    pub fn is_ambiguous(&self) -> bool {
        self.flags.contains(&LinkFlag::AmbiguousEndpoint)
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <-> {} [{}, {}]", self.a, self.b, self.basis, self.confidence)
    }
}

/// A multi-party broadcast network standing in for pairwise links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedSegment {
    pub network: Network,
    /// Sorted by device, then interface.
    pub members: Vec<Endpoint>,
    pub basis: InferenceBasis,
    pub confidence: Confidence,
}

impl SharedSegment {
    pub fn flag(&self) -> LinkFlag {
        LinkFlag::SharedSegment
    }

    pub fn touches(&self, hostname: &str) -> bool {
        self.members.iter().any(|member| member.device == hostname)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyNode {
    pub hostname: String,
    pub role: DeviceRole,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyGraph {
    nodes: Vec<TopologyNode>,
    links: Vec<Link>,
    segments: Vec<SharedSegment>,
}

impl TopologyGraph {
    /// Sorts the nodes so lookups can binary search them.
    pub fn new(mut nodes: Vec<TopologyNode>, links: Vec<Link>, segments: Vec<SharedSegment>) -> Self {
        nodes.sort_by(|a, b| a.hostname.cmp(&b.hostname));
        Self {
            nodes,
            links,
            segments,
        }
    }

    pub fn nodes(&self) -> &[TopologyNode] {
        &self.nodes
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn segments(&self) -> &[SharedSegment] {
        &self.segments
    }

    pub fn node_index(&self, hostname: &str) -> Option<usize> {
        self.nodes
            .binary_search_by(|node| node.hostname.as_str().cmp(hostname))
            .ok()
    }

    pub fn node(&self, hostname: &str) -> Option<&TopologyNode> {
        self.node_index(hostname).map(|idx| &self.nodes[idx])
    }

    pub fn links_of<'a>(&'a self, hostname: &'a str) -> impl Iterator<Item = &'a Link> + 'a {
        self.links.iter().filter(move |link| link.touches(hostname))
    }

    pub fn is_connected(&self, hostname: &str) -> bool {
        self.links.iter().any(|link| link.touches(hostname))
            || self.segments.iter().any(|segment| segment.touches(hostname))
    }

    /// Devices with no inferred connections.
    pub fn isolated(&self) -> impl Iterator<Item = &TopologyNode> {
        self.nodes
            .iter()
            .filter(|node| !self.is_connected(&node.hostname))
    }

    pub fn count_links(&self, confidence: Confidence) -> usize {
        self.links
            .iter()
            .filter(|link| link.confidence == confidence)
            .count()
    }

    pub fn has_no_edges(&self) -> bool {
        self.links.is_empty() && self.segments.is_empty()
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

#[cfg(test)]
mod tests {
    use super::*;

    fn node(name: &str) -> TopologyNode {
        TopologyNode {
            hostname: name.to_string(),
            role: DeviceRole::Router,
        }
    }

    #[test]
    fn nodes_are_sorted_and_searchable() {
        let graph = TopologyGraph::new(vec![node("R3"), node("R1"), node("R2")], vec![], vec![]);
        let names: Vec<&str> = graph.nodes().iter().map(|n| n.hostname.as_str()).collect();
        assert_eq!(names, vec!["R1", "R2", "R3"]);
        assert_eq!(graph.node_index("R2"), Some(1));
        assert!(graph.node("R9").is_none());
    }

    #[test]
    fn isolated_nodes_exclude_link_and_segment_members() {
        let link = Link {
            a: Endpoint::new("R1", Some("Serial0/0/0".into())),
            b: Endpoint::new("R2", None),
            basis: InferenceBasis::Description,
            confidence: Confidence::High,
            network: None,
            flags: BTreeSet::from([LinkFlag::AmbiguousEndpoint]),
        };
        let segment = SharedSegment {
            network: Network::containing("192.168.1.0".parse().unwrap(), 24),
            members: vec![Endpoint::new("R3", Some("GigabitEthernet0/0".into()))],
            basis: InferenceBasis::Subnet,
            confidence: Confidence::Medium,
        };
        let graph = TopologyGraph::new(
            vec![node("R1"), node("R2"), node("R3"), node("R4")],
            vec![link],
            vec![segment],
        );

        let isolated: Vec<&str> = graph.isolated().map(|n| n.hostname.as_str()).collect();
        assert_eq!(isolated, vec!["R4"]);
        assert_eq!(graph.count_links(Confidence::High), 1);
        assert_eq!(graph.count_links(Confidence::Medium), 0);
        assert!(graph.links()[0].is_ambiguous());
    }

    #[test]
    fn empty_graph_is_valid() {
        let graph = TopologyGraph::default();
        assert!(graph.has_no_edges());
        assert_eq!(graph.isolated().count(), 0);
    }
}
