//! The rule registry. Order here is the order issues are reported in.

use std::sync::LazyLock;

use cfgmap_common::error::RuleError;
use cfgmap_common::model::device::{Device, DeviceRole};
use cfgmap_common::model::issue::Severity;
use cfgmap_common::model::routing::RoutingProtocol;
use regex::Regex;

use super::{Finding, Rule};

/// More static routes than this without any dynamic protocol is worth a note.
const STATIC_ROUTE_THRESHOLD: usize = 5;

static ROUTER_MENTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:rtr|router)|\bto r\d").expect("router mention pattern")
});

pub fn registry() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(NoPasswordSet),
        Box::new(DefaultVlanInUse),
        Box::new(UnusedInterfaceUp),
        Box::new(InconsistentSubnetMask),
        Box::new(MissingRoutingAuth),
        Box::new(WeakSnmpCommunity),
        Box::new(UnnamedVlan),
        Box::new(EmptyVlan),
        Box::new(RoleUndetermined),
        Box::new(UnrecognizedRouting),
        Box::new(RouterOnAccessPort),
        Box::new(MissingDefaultRoute),
        Box::new(StaticOnlyRouting),
    ]
}

struct NoPasswordSet;

impl Rule for NoPasswordSet {
    fn id(&self) -> &'static str {
        "no-password-set"
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn summary(&self) -> &'static str {
        "no enable, line or local user password is configured"
    }

    fn check(&self, device: &Device) -> Result<Vec<Finding>, RuleError> {
        if device.security.has_any_password() {
            return Ok(Vec::new());
        }
        Ok(vec![Finding::new(
            "no enable secret, enable password, line password or local user password is set",
        )])
    }
}

struct DefaultVlanInUse;

impl Rule for DefaultVlanInUse {
    fn id(&self) -> &'static str {
        "default-vlan-in-use"
    }

    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn summary(&self) -> &'static str {
        "access port left on VLAN 1"
    }

    fn check(&self, device: &Device) -> Result<Vec<Finding>, RuleError> {
        Ok(device
            .interfaces
            .iter()
            .filter(|iface| iface.effective_access_vlan() == Some(1))
            .map(|iface| {
                let how = if iface.access_vlan.is_some() { "explicitly" } else { "implicitly" };
                Finding::new(format!("access port is {how} on default VLAN 1"))
                    .on_interface(&iface.name, iface.lines)
            })
            .collect())
    }
}

struct UnusedInterfaceUp;

impl Rule for UnusedInterfaceUp {
    fn id(&self) -> &'static str {
        "unused-interface-up"
    }

    fn severity(&self) -> Severity {
        Severity::BestPractice
    }

    fn summary(&self) -> &'static str {
        "interface is up with no address, no description and no trunking"
    }

    fn check(&self, device: &Device) -> Result<Vec<Finding>, RuleError> {
        Ok(device
            .interfaces
            .iter()
            .filter(|iface| {
                iface.is_up() && !iface.has_address() && iface.description.is_none() && !iface.is_trunk()
            })
            .map(|iface| {
                Finding::new("interface is up but appears unused, consider shutting it down")
                    .on_interface(&iface.name, iface.lines)
            })
            .collect())
    }
}

struct InconsistentSubnetMask;

impl Rule for InconsistentSubnetMask {
    fn id(&self) -> &'static str {
        "inconsistent-subnet-mask"
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn summary(&self) -> &'static str {
        "two interfaces overlap but use different mask lengths"
    }

    fn check(&self, device: &Device) -> Result<Vec<Finding>, RuleError> {
        let mut addressed = Vec::new();
        for iface in &device.interfaces {
            for address in iface.addresses() {
                // Public fields let a hand-built address skip the /32 bound.
                if address.prefix > 32 {
                    return Err(RuleError::InvalidPrefix {
                        interface: iface.name.clone(),
                        prefix: address.prefix,
                    });
                }
                addressed.push((iface, address));
            }
        }

        let mut findings = Vec::new();
        for (idx, (left, left_addr)) in addressed.iter().enumerate() {
            for (right, right_addr) in &addressed[idx + 1..] {
                if left.name == right.name || left_addr.prefix == right_addr.prefix {
                    continue;
                }
                if left_addr.overlaps(right_addr) {
                    findings.push(
                        Finding::new(format!(
                            "{left_addr} overlaps {right_addr} on {} with a different mask",
                            right.name
                        ))
                        .on_interface(&left.name, left.lines),
                    );
                }
            }
        }
        Ok(findings)
    }
}

struct MissingRoutingAuth;

impl Rule for MissingRoutingAuth {
    fn id(&self) -> &'static str {
        "missing-routing-auth"
    }

    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn summary(&self) -> &'static str {
        "dynamic routing protocol runs without authentication"
    }

    fn check(&self, device: &Device) -> Result<Vec<Finding>, RuleError> {
        Ok(device
            .dynamic_protocols()
            .into_iter()
            .filter(|protocol| !device.authenticated_protocols.contains(protocol))
            .map(|protocol| {
                let finding = Finding::new(format!("{protocol} is configured without authentication"));
                match device.routes.iter().find(|route| route.protocol == protocol) {
                    Some(route) => finding.at_lines(route.lines),
                    None => finding,
                }
            })
            .collect())
    }
}

struct WeakSnmpCommunity;

impl Rule for WeakSnmpCommunity {
    fn id(&self) -> &'static str {
        "weak-snmp-community"
    }

    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn summary(&self) -> &'static str {
        "SNMP community string is a well-known default"
    }

    fn check(&self, device: &Device) -> Result<Vec<Finding>, RuleError> {
        Ok(device
            .security
            .snmp_communities
            .iter()
            .filter(|community| {
                community.name.eq_ignore_ascii_case("public") || community.name.eq_ignore_ascii_case("private")
            })
            .map(|community| {
                Finding::new(format!("SNMP community '{}' is trivially guessable", community.name))
                    .at_lines(community.lines)
            })
            .collect())
    }
}

struct UnnamedVlan;

impl Rule for UnnamedVlan {
    fn id(&self) -> &'static str {
        "unnamed-vlan"
    }

    fn severity(&self) -> Severity {
        Severity::BestPractice
    }

    fn summary(&self) -> &'static str {
        "declared VLAN has no name"
    }

    fn check(&self, device: &Device) -> Result<Vec<Finding>, RuleError> {
        Ok(device
            .vlans
            .values()
            .filter(|vlan| vlan.declared && vlan.name.is_none())
            .map(|vlan| Finding::new(format!("VLAN {} has no name", vlan.id)))
            .collect())
    }
}

struct EmptyVlan;

impl Rule for EmptyVlan {
    fn id(&self) -> &'static str {
        "empty-vlan"
    }

    fn severity(&self) -> Severity {
        Severity::BestPractice
    }

    fn summary(&self) -> &'static str {
        "declared VLAN has no member ports"
    }

    fn check(&self, device: &Device) -> Result<Vec<Finding>, RuleError> {
        Ok(device
            .vlans
            .values()
            .filter(|vlan| vlan.declared && vlan.members.is_empty())
            .map(|vlan| Finding::new(format!("VLAN {} has no access ports", vlan.id)))
            .collect())
    }
}

struct RoleUndetermined;

impl Rule for RoleUndetermined {
    fn id(&self) -> &'static str {
        "role-undetermined"
    }

    fn severity(&self) -> Severity {
        Severity::BestPractice
    }

    fn summary(&self) -> &'static str {
        "configuration does not reveal whether the device routes or switches"
    }

    fn check(&self, device: &Device) -> Result<Vec<Finding>, RuleError> {
        if device.role() != DeviceRole::Unknown {
            return Ok(Vec::new());
        }
        Ok(vec![Finding::new(
            "could not tell router from switch, role-specific checks were skipped",
        )])
    }
}

struct UnrecognizedRouting;

impl Rule for UnrecognizedRouting {
    fn id(&self) -> &'static str {
        "unrecognized-routing"
    }

    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn summary(&self) -> &'static str {
        "routing section with a protocol keyword the parser does not know"
    }

    fn check(&self, device: &Device) -> Result<Vec<Finding>, RuleError> {
        Ok(device
            .routes
            .iter()
            .filter(|route| route.protocol == RoutingProtocol::Unknown)
            .map(|route| {
                Finding::new(format!("'{}' is not a recognized routing protocol", route.keyword))
                    .at_lines(route.lines)
            })
            .collect())
    }
}

struct RouterOnAccessPort;

impl Rule for RouterOnAccessPort {
    fn id(&self) -> &'static str {
        "router-on-access-port"
    }

    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn summary(&self) -> &'static str {
        "access port description points at a router, which usually needs a trunk"
    }

    fn check(&self, device: &Device) -> Result<Vec<Finding>, RuleError> {
        Ok(device
            .interfaces
            .iter()
            .filter(|iface| iface.is_access())
            .filter_map(|iface| {
                let description = iface.description.as_deref()?;
                ROUTER_MENTION.is_match(description).then(|| {
                    Finding::new(format!(
                        "access port ({description}) connects to a router, it should probably be a trunk"
                    ))
                    .on_interface(&iface.name, iface.lines)
                })
            })
            .collect())
    }
}

struct MissingDefaultRoute;

impl Rule for MissingDefaultRoute {
    fn id(&self) -> &'static str {
        "missing-default-route"
    }

    fn severity(&self) -> Severity {
        Severity::BestPractice
    }

    fn summary(&self) -> &'static str {
        "router has routes but no default route"
    }

    fn check(&self, device: &Device) -> Result<Vec<Finding>, RuleError> {
        let missing = device.role() == DeviceRole::Router
            && !device.routes.is_empty()
            && !device.routes.iter().any(|route| route.is_default_route());
        if !missing {
            return Ok(Vec::new());
        }
        Ok(vec![Finding::new("no default route (0.0.0.0/0) is configured")])
    }
}

struct StaticOnlyRouting;

impl Rule for StaticOnlyRouting {
    fn id(&self) -> &'static str {
        "static-only-routing"
    }

    fn severity(&self) -> Severity {
        Severity::BestPractice
    }

    fn summary(&self) -> &'static str {
        "router relies on many static routes and no dynamic protocol"
    }

    fn check(&self, device: &Device) -> Result<Vec<Finding>, RuleError> {
        let statics = device.static_routes().count();
        if device.role() != DeviceRole::Router
            || statics <= STATIC_ROUTE_THRESHOLD
            || !device.dynamic_protocols().is_empty()
        {
            return Ok(Vec::new());
        }
        Ok(vec![Finding::new(format!(
            "{statics} static routes and no dynamic routing protocol, consider OSPF or BGP"
        ))])
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
    use std::collections::BTreeSet;
    use std::path::Path;

    use crate::builder::parse_config;

    use super::*;

    fn device(text: &str) -> Device {
        parse_config(Path::new("t.cfg"), text, false).unwrap()
    }

    fn check(rule: &dyn Rule, text: &str) -> Vec<Finding> {
        rule.check(&device(text)).unwrap()
    }

    #[test]
    fn registry_ids_are_unique_and_ordered() {
        let ids: Vec<&str> = registry().iter().map(|rule| rule.id()).collect();
        assert_eq!(ids.len(), 13);
        assert_eq!(ids[0], "no-password-set");
        assert_eq!(ids[12], "static-only-routing");
        assert_eq!(ids.iter().collect::<BTreeSet<_>>().len(), ids.len());
    }

    #[test]
    fn overlapping_masks_on_one_device() {
        let findings = check(
            &InconsistentSubnetMask,
            "hostname R1\ninterface Gi0/0\n ip address 10.1.1.1 255.255.255.0\ninterface Gi0/1\n ip address 10.1.1.130 255.255.255.128\ninterface Gi0/2\n ip address 10.2.2.1 255.255.255.0\n",
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].interface.as_deref(), Some("GigabitEthernet0/0"));
    }

    #[test]
    fn out_of_range_prefix_is_a_rule_error() {
        let mut router = device("hostname R1\ninterface Gi0/0\n ip address 10.1.1.1 255.255.255.0\n");
        router.interfaces[0].address = Some(cfgmap_common::network::subnet::InterfaceAddress {
            address: "10.1.1.1".parse().unwrap(),
            prefix: 40,
        });

        assert_eq!(
            InconsistentSubnetMask.check(&router),
            Err(RuleError::InvalidPrefix { interface: "GigabitEthernet0/0".into(), prefix: 40 })
        );
    }

    #[test]
    fn unauthenticated_ospf_is_flagged() {
        let text = "hostname R1\nrouter ospf 1\n network 10.0.0.0 0.0.0.255 area 0\n";
        assert_eq!(check(&MissingRoutingAuth, text).len(), 1);

        let secured = format!("{text} area 0 authentication message-digest\n");
        assert!(check(&MissingRoutingAuth, &secured).is_empty());
    }

    #[test]
    fn unused_interface_ignores_trunks_and_documented_ports() {
        let text = "\
hostname SW1
interface Fa0/1
 no shutdown
interface Fa0/2
 description spare
interface Fa0/3
 switchport mode trunk
interface Fa0/4
 shutdown
";
        let findings = check(&UnusedInterfaceUp, text);
        let names: Vec<_> = findings.iter().filter_map(|f| f.interface.as_deref()).collect();
        assert_eq!(names, vec!["FastEthernet0/1"]);
    }

    #[test]
    fn router_mentions_on_access_ports() {
        let text = "\
hostname SW1
interface Fa0/1
 switchport mode access
 description uplink to R1
interface Fa0/2
 switchport mode access
 description to rack 4
interface Fa0/3
 switchport mode trunk
 description core router
";
        let findings = check(&RouterOnAccessPort, text);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].interface.as_deref(), Some("FastEthernet0/1"));
    }

    #[test]
    fn router_route_hygiene() {
        let mut text = String::from("hostname R1\ninterface Gi0/0\n ip address 10.0.0.1 255.255.255.0\ninterface Gi0/1\n ip address 10.0.1.1 255.255.255.0\n");
        for net in 1..=6 {
            text.push_str(&format!("ip route 172.16.{net}.0 255.255.255.0 10.0.0.2\n"));
        }
        assert_eq!(device(&text).role(), DeviceRole::Router);
        assert_eq!(check(&MissingDefaultRoute, &text).len(), 1);
        assert_eq!(check(&StaticOnlyRouting, &text).len(), 1);

        text.push_str("ip route 0.0.0.0 0.0.0.0 10.0.0.254\n");
        assert!(check(&MissingDefaultRoute, &text).is_empty());
    }

    #[test]
    fn unknown_routing_and_role() {
        let text = "hostname X1\nrouter isis CORE\n net 49.0001\n";
        assert_eq!(check(&UnrecognizedRouting, text).len(), 1);
        assert!(check(&RoleUndetermined, "hostname X2\n").len() == 1);
    }

    #[test]
    fn empty_and_unnamed_vlans() {
        let text = "hostname SW1\nvlan 10\n name USERS\nvlan 20\ninterface Fa0/1\n switchport mode access\n switchport access vlan 20\n";
        let empty = check(&EmptyVlan, text);
        assert_eq!(empty.len(), 1);
        assert!(empty[0].message.contains("VLAN 10"));

        let unnamed = check(&UnnamedVlan, text);
        assert_eq!(unnamed.len(), 1);
        assert!(unnamed[0].message.contains("VLAN 20"));
    }
}
