//! # Topology inference
//!
//! Builds a [`TopologyGraph`] from the complete device set in two passes:
//!
//! 1. **Descriptions** (high confidence): an interface description naming
//!    another device's hostname.
//! 2. **Subnets** (medium confidence): interfaces on different devices that
//!    share a network, address and mask alike.
//!
//! Devices are ordered by hostname and every candidate is collected before
//! any is accepted, so the graph never depends on the order files were read
//! in. An interface ends up in at most one link or segment.

use std::collections::BTreeSet;

use cfgmap_common::model::device::Device;
use cfgmap_common::model::issue::ValidationIssue;
use cfgmap_common::model::topology::{Confidence, Endpoint, TopologyGraph, TopologyNode};
use tracing::info;

mod description;
mod subnet;

/// `(hostname, interface)` pairs already claimed by an accepted link.
type UsedInterfaces = BTreeSet<(String, String)>;

fn is_used(endpoint: &Endpoint, used: &UsedInterfaces) -> bool {
    endpoint
        .interface
        .as_ref()
        .is_some_and(|iface| used.contains(&(endpoint.device.clone(), iface.clone())))
}

/// The endpoint's device is known and, when named, owns the interface.
fn endpoint_exists(endpoint: &Endpoint, devices: &[&Device]) -> bool {
    devices
        .iter()
        .find(|device| device.hostname == endpoint.device)
        .is_some_and(|device| {
            endpoint
                .interface
                .as_deref()
                .is_none_or(|name| device.has_interface(name))
        })
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopologyOutcome {
    pub graph: TopologyGraph,
    /// Problems only visible across devices, such as conflicting masks.
    pub issues: Vec<ValidationIssue>,
}

pub fn build(devices: &[Device]) -> TopologyOutcome {
    let mut ordered: Vec<&Device> = devices.iter().collect();
    ordered.sort_by(|a, b| a.hostname.cmp(&b.hostname));

    let mut used = UsedInterfaces::new();
    let candidates = description::candidates(&ordered);
    let mut links = description::accept(candidates, &mut used);
    let (subnet_links, segments) = subnet::infer(&ordered, &mut used);
    links.extend(subnet_links);

    let issues = subnet::mask_mismatches(&ordered);
    debug_assert!(
        links
            .iter()
            .flat_map(|link| [&link.a, &link.b])
            .chain(segments.iter().flat_map(|segment| &segment.members))
            .all(|endpoint| endpoint_exists(endpoint, &ordered)),
        "topology edge names an interface its device does not have"
    );

    let nodes = ordered
        .iter()
        .map(|device| TopologyNode {
            hostname: device.hostname.clone(),
            role: device.role(),
        })
        .collect();
    let graph = TopologyGraph::new(nodes, links, segments);

    info!(
        devices = graph.nodes().len(),
        high = graph.count_links(Confidence::High),
        medium = graph.count_links(Confidence::Medium),
        segments = graph.segments().len(),
        isolated = graph.isolated().count(),
        "inferred topology"
    );

    TopologyOutcome { graph, issues }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
