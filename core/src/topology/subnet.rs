//! Medium-confidence links from shared IPv4 networks.

use std::collections::{BTreeMap, BTreeSet};

use cfgmap_common::model::device::Device;
use cfgmap_common::model::interface::Interface;
use cfgmap_common::model::issue::{Severity, ValidationIssue};
use cfgmap_common::model::topology::{Endpoint, InferenceBasis, Link, SharedSegment};
use cfgmap_common::network::subnet::{InterfaceAddress, Network};
use tracing::debug;

use super::{UsedInterfaces, is_used};

const MASK_MISMATCH: &str = "subnet-mask-mismatch";

/// Groups the still unclaimed interfaces by network. Two members make a link,
/// more make a shared segment.
pub(super) fn infer(devices: &[&Device], used: &mut UsedInterfaces) -> (Vec<Link>, Vec<SharedSegment>) {
    let mut groups: BTreeMap<Network, BTreeSet<Endpoint>> = BTreeMap::new();
    for device in devices {
        for iface in &device.interfaces {
            for address in iface.addresses() {
                groups
                    .entry(address.network())
                    .or_default()
                    .insert(Endpoint::new(&device.hostname, Some(iface.name.clone())));
            }
        }
    }

    let mut links = Vec::new();
    let mut segments = Vec::new();

    for (network, members) in groups {
        let members: Vec<Endpoint> = members
            .into_iter()
            .filter(|member| !is_used(member, used))
            .collect();
        let hosts: BTreeSet<&str> = members.iter().map(|m| m.device.as_str()).collect();
        if hosts.len() < 2 {
            continue;
        }

        for member in &members {
            if let Some(iface) = &member.interface {
                used.insert((member.device.clone(), iface.clone()));
            }
        }

        let basis = InferenceBasis::Subnet;
        match <[Endpoint; 2]>::try_from(members) {
            Ok([a, b]) => {
                debug!(%network, a = %a, b = %b, "subnet link");
                links.push(Link {
                    a,
                    b,
                    basis,
                    confidence: basis.confidence(),
                    network: Some(network),
                    flags: BTreeSet::new(),
                });
            }
            Err(members) => {
                debug!(%network, members = members.len(), "shared segment");
                segments.push(SharedSegment {
                    network,
                    members,
                    basis,
                    confidence: basis.confidence(),
                });
            }
        }
    }

    (links, segments)
}

/// Addresses on different devices whose networks overlap under different
/// prefix lengths. Each involved device gets an error issue; no link is drawn.
pub(super) fn mask_mismatches(devices: &[&Device]) -> Vec<ValidationIssue> {
    let addressed: Vec<(&Device, &Interface, &InterfaceAddress)> = devices
        .iter()
        .copied()
        .flat_map(|device| {
            device
                .interfaces
                .iter()
                .flat_map(move |iface| iface.addresses().map(move |address| (device, iface, address)))
        })
        .collect();

    let mut issues = Vec::new();
    for (idx, (left_dev, left_iface, left_addr)) in addressed.iter().enumerate() {
        for (right_dev, right_iface, right_addr) in &addressed[idx + 1..] {
            if left_dev.hostname == right_dev.hostname
                || left_addr.prefix == right_addr.prefix
                || !left_addr.overlaps(right_addr)
            {
                continue;
            }

            issues.push(mismatch(left_dev, left_iface, left_addr, right_dev, right_addr));
            issues.push(mismatch(right_dev, right_iface, right_addr, left_dev, left_addr));
        }
    }
    issues
}

fn mismatch(
    device: &Device,
    iface: &Interface,
    address: &InterfaceAddress,
    other: &Device,
    other_address: &InterfaceAddress,
) -> ValidationIssue {
    ValidationIssue::for_device(
        Severity::Error,
        MASK_MISMATCH,
        &device.hostname,
        format!(
            "{address} overlaps {other_address} on {} with a different mask, no link inferred",
            other.hostname
        ),
    )
    .on_interface(&iface.name)
    .at_lines(iface.lines)
}
