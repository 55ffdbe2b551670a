//! High-confidence links read from interface descriptions.

use std::collections::BTreeSet;

use cfgmap_common::model::device::Device;
use cfgmap_common::model::interface::Interface;
use cfgmap_common::model::topology::{Endpoint, InferenceBasis, Link, LinkFlag};
use cfgmap_common::network::subnet::Network;
use cfgmap_dialect::DialectProfile;
use cfgmap_dialect::names::{Mention, interface_mentions};
use cfgmap_dialect::profile::IOS;
use tracing::debug;

use super::{UsedInterfaces, is_used};

#[derive(Debug, Clone)]
pub(super) struct Candidate {
    local: Endpoint,
    remote: Endpoint,
    network: Option<Network>,
}

impl Candidate {
    fn is_resolved(&self) -> bool {
        self.remote.interface.is_some()
    }

    /// Endpoints in canonical order, the smaller one first.
    fn endpoints(&self) -> (Endpoint, Endpoint) {
        if self.local <= self.remote {
            (self.local.clone(), self.remote.clone())
        } else {
            (self.remote.clone(), self.local.clone())
        }
    }

    fn into_link(self) -> Link {
        let (a, b) = self.endpoints();
        let mut flags = BTreeSet::new();
        if b.interface.is_none() || a.interface.is_none() {
            flags.insert(LinkFlag::AmbiguousEndpoint);
        }
        Link {
            a,
            b,
            basis: InferenceBasis::Description,
            confidence: InferenceBasis::Description.confidence(),
            network: self.network,
            flags,
        }
    }
}

/// One candidate per described interface that names another device.
pub(super) fn candidates(devices: &[&Device]) -> Vec<Candidate> {
    let mut found = Vec::new();

    for local in devices {
        for iface in &local.interfaces {
            let Some(description) = iface.description.as_deref() else {
                continue;
            };
            let Some(remote) = named_device(description, local, devices) else {
                continue;
            };

            let remote_iface = resolve_remote(description, local, iface, remote);
            let network = remote_iface.and_then(|remote_iface| shared_network(iface, remote_iface));
            debug!(
                local = %local.hostname,
                interface = %iface.name,
                remote = %remote.hostname,
                remote_interface = remote_iface.map(|r| r.name.as_str()),
                "description candidate"
            );

            found.push(Candidate {
                local: Endpoint::new(&local.hostname, Some(iface.name.clone())),
                remote: Endpoint::new(&remote.hostname, remote_iface.map(|r| r.name.clone())),
                network,
            });
        }
    }
    found
}

/// Resolved candidates first, each group in canonical order. A candidate that
/// reuses a claimed interface is discarded.
pub(super) fn accept(mut candidates: Vec<Candidate>, used: &mut UsedInterfaces) -> Vec<Link> {
    candidates.sort_by_cached_key(|candidate| (!candidate.is_resolved(), candidate.endpoints()));

    let mut accepted: Vec<Link> = Vec::new();
    for candidate in candidates {
        let (a, b) = candidate.endpoints();
        if accepted.iter().any(|link| link.a == a && link.b == b) {
            continue;
        }

        if is_used(&a, used) || is_used(&b, used) {
            debug!(a = %a, b = %b, "discarding candidate on an interface already linked");
            continue;
        }

        for endpoint in [&a, &b] {
            if let Some(iface) = &endpoint.interface {
                used.insert((endpoint.device.clone(), iface.clone()));
            }
        }
        accepted.push(candidate.into_link());
    }
    accepted
}

/// The other device whose hostname appears in `text`, case-insensitively;
/// the longest name wins.
fn named_device<'d>(text: &str, local: &Device, devices: &[&'d Device]) -> Option<&'d Device> {
    let lowered = text.to_lowercase();
    devices
        .iter()
        .copied()
        .filter(|device| device.hostname_key() != local.hostname_key())
        .filter(|device| lowered.contains(&device.hostname_key()))
        .max_by(|a, b| {
            a.hostname
                .len()
                .cmp(&b.hostname.len())
                .then_with(|| b.hostname.cmp(&a.hostname))
        })
}

fn resolve_remote<'d>(
    description: &str,
    local: &Device,
    local_iface: &Interface,
    remote: &'d Device,
) -> Option<&'d Interface> {
    if let Some(named) = mentioned_interface(&description.to_lowercase(), local_iface, remote) {
        return Some(named);
    }

    let local_key = local.hostname_key();
    let describing_back: Vec<&Interface> = remote
        .interfaces
        .iter()
        .filter(|iface| {
            iface
                .description
                .as_deref()
                .is_some_and(|text| text.to_lowercase().contains(&local_key))
        })
        .collect();
    if let [only] = describing_back.as_slice() {
        return Some(*only);
    }

    let same_network: Vec<&Interface> = remote
        .interfaces
        .iter()
        .filter(|iface| shared_network(local_iface, iface).is_some())
        .collect();
    match same_network.as_slice() {
        [only] => Some(*only),
        _ => None,
    }
}

/// Remote port named in a lowercased description. Names after the remote
/// hostname are tried first; before it, the local port's own name is skipped.
fn mentioned_interface<'d>(lowered: &str, local_iface: &Interface, remote: &'d Device) -> Option<&'d Interface> {
    let profile = DialectProfile::by_name(&remote.dialect).unwrap_or(&IOS);
    let key = remote.hostname_key();
    let after_hostname = lowered.find(&key).map_or(0, |start| start + key.len());

    let (following, preceding): (Vec<Mention>, Vec<Mention>) = interface_mentions(lowered, profile)
        .into_iter()
        .partition(|mention| mention.offset >= after_hostname);
    following
        .iter()
        .chain(preceding.iter().filter(|mention| mention.name != local_iface.name))
        .find_map(|mention| remote.interface(&mention.name))
}

fn shared_network(left: &Interface, right: &Interface) -> Option<Network> {
    left.addresses()
        .map(|address| address.network())
        .find(|network| right.addresses().any(|other| other.network() == *network))
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
    use std::path::Path;

    use super::*;
    use crate::builder::parse_config;

    fn device(text: &str) -> Device {
        parse_config(Path::new("t.cfg"), text, false).unwrap()
    }

    fn r2() -> Device {
        device("hostname R2\ninterface Gi0/1\n ip address 10.0.1.2 255.255.255.0\ninterface Gi0/2\n ip address 10.0.2.2 255.255.255.0\n")
    }

    #[test]
    fn hostnames_match_inside_other_text() {
        let r1 = device("hostname R1\n");
        let r2 = r2();
        let sw1 = device("hostname SW1\n");
        let devices = [&r1, &r2, &sw1];

        assert_eq!(named_device("uplinkR2", &r1, &devices).map(|d| d.hostname.as_str()), Some("R2"));
        assert_eq!(named_device("toSW1-gi0/3", &r1, &devices).map(|d| d.hostname.as_str()), Some("SW1"));
        assert!(named_device("to R1 loopback", &r1, &devices).is_none());
    }

    #[test]
    fn remote_port_is_the_one_after_the_hostname() {
        let r1 = device("hostname R1\ninterface Gi0/1\n description Gi0/1 to R2 Gi0/2\n");
        let r2 = r2();
        let local = &r1.interfaces[0];

        let found = mentioned_interface("gi0/1 to r2 gi0/2", local, &r2).map(|i| i.name.as_str());
        assert_eq!(found, Some("GigabitEthernet0/2"));

        let same_number = mentioned_interface("gi0/1 to r2 gi0/1", local, &r2).map(|i| i.name.as_str());
        assert_eq!(same_number, Some("GigabitEthernet0/1"));

        assert!(mentioned_interface("gi0/1 to r2", local, &r2).is_none());
    }
}
