use cfgmap_common::model::interface::{AdminState, Interface, PortMode};
use cfgmap_common::model::routing::RoutingProtocol;
use cfgmap_common::network::subnet::InterfaceAddress;
use cfgmap_dialect::{Block, DialectProfile, Line};
use tracing::debug;

use super::Draft;
use super::vlan::vlan_id;

pub(super) fn apply(
    block: &Block,
    profile: &DialectProfile,
    reduced_fidelity: bool,
    draft: &mut Draft,
) -> Result<(), String> {
    let name = interface_name(&block.header_args())
        .ok_or_else(|| "interface header without a name".to_string())?;
    let mut iface = Interface::new(profile.normalize_interface(&name), block.line_range());
    let mut explicit_state = None;

    for line in block.body() {
        let words = line.words();
        let lowered: Vec<String> = words.iter().map(|w| w.to_ascii_lowercase()).collect();
        let keys: Vec<&str> = lowered.iter().map(String::as_str).collect();

        match keys.as_slice() {
            ["shutdown"] => explicit_state = Some(AdminState::Down),
            ["no", "shutdown"] => explicit_state = Some(AdminState::Up),
            ["description", ..] => iface.description = Some(rest_of(line, "description")),
            ["ip", "address", "dhcp", ..] | ["no", "ip", "address", ..] => {}
            ["ip", "address", ..] => read_address(&words[2..], line, &mut iface),
            ["no", "switchport"] => iface.mode = Some(PortMode::Routed),
            ["switchport", "mode", "access"] => iface.mode = Some(PortMode::Access),
            ["switchport", "mode", "trunk"] => iface.mode = Some(PortMode::Trunk),
            ["switchport", "mode", "dynamic", kind, ..] => {
                iface.mode = Some(PortMode::Dynamic(kind.to_string()));
            }
            ["switchport", "access", "vlan", id] => iface.access_vlan = Some(vlan_id(id)?),
            ["switchport", "trunk", "native", "vlan", id] => iface.native_vlan = Some(vlan_id(id)?),
            ["bandwidth", kbps, ..] => iface.bandwidth_kbps = kbps.parse().ok(),
            ["duplex", value] => iface.duplex = Some(value.to_string()),
            ["speed", value] => iface.speed = Some(value.to_string()),
            ["encapsulation", ..] => iface.encapsulation = Some(rest_of(line, "encapsulation")),
            ["vrf", "forwarding" | "member", _] | ["ip", "vrf", "forwarding", _] => {
                iface.vrf = words.last().map(|vrf| vrf.to_string());
            }
            _ => {
                if let Some(protocol) = authentication_protocol(&keys) {
                    draft.authenticated.insert(protocol);
                }
            }
        }
    }

    iface.admin_state = match explicit_state {
        Some(state) => state,
        None if reduced_fidelity => AdminState::Unset,
        None => AdminState::Up,
    };

    draft.push_interface(iface);
    Ok(())
}

/// `GigabitEthernet0/1`, `GigabitEthernet 0/1` and `Serial0/0.1 point-to-point`.
fn interface_name(args: &[&str]) -> Option<String> {
    match args {
        [] => None,
        [kind, number, ..] if number.starts_with(|c: char| c.is_ascii_digit()) => {
            Some(format!("{kind}{number}"))
        }
        [name, ..] => Some(name.to_string()),
    }
}

fn read_address(args: &[&str], line: &Line, iface: &mut Interface) {
    let secondary = args.iter().any(|w| w.eq_ignore_ascii_case("secondary"));
    let spec = match args {
        [cidr, ..] if cidr.contains('/') => cidr.to_string(),
        [address, mask, ..] => format!("{address} {mask}"),
        _ => String::new(),
    };

    match spec.parse::<InterfaceAddress>() {
        Ok(address) if secondary => iface.secondary_addresses.push(address),
        Ok(address) => iface.address = Some(address),
        Err(reason) => debug!(line = line.number, %reason, "skipping unreadable address"),
    }
}

/// Text after the keyword, as written.
fn rest_of(line: &Line, keyword: &str) -> String {
    line.text()
        .get(keyword.len()..)
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Interface-level statements that authenticate a routing protocol.
pub(super) fn authentication_protocol(keys: &[&str]) -> Option<RoutingProtocol> {
    match keys {
        ["ip", "ospf", "authentication" | "authentication-key" | "message-digest-key", ..] => {
            Some(RoutingProtocol::Ospf)
        }
        ["ip", "authentication", "mode" | "key-chain", "eigrp", ..] => Some(RoutingProtocol::Eigrp),
        ["ip", "rip", "authentication", ..] => Some(RoutingProtocol::Rip),
        _ => None,
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
    use cfgmap_dialect::profile::IOS;
    use cfgmap_dialect::tokenize;

    use super::*;

    fn build(text: &str) -> Draft {
        let mut draft = Draft::default();
        for block in tokenize(text, &IOS) {
            apply(&block, &IOS, false, &mut draft).unwrap();
        }
        draft
    }

    #[test]
    fn split_names_and_subinterfaces() {
        assert_eq!(interface_name(&["GigabitEthernet", "0/1"]).as_deref(), Some("GigabitEthernet0/1"));
        assert_eq!(
            interface_name(&["Serial0/0.1", "point-to-point"]).as_deref(),
            Some("Serial0/0.1")
        );
        assert_eq!(interface_name(&[]), None);
    }

    #[test]
    fn abbreviated_header_is_canonicalized() {
        let draft = build("interface gi0/2\n switchport mode dynamic desirable\n encapsulation dot1Q 10 native\n");
        let iface = &draft.interfaces[0];
        assert_eq!(iface.name, "GigabitEthernet0/2");
        assert_eq!(iface.mode, Some(PortMode::Dynamic("desirable".into())));
        assert_eq!(iface.encapsulation.as_deref(), Some("dot1Q 10 native"));
    }

    #[test]
    fn vrf_and_interface_authentication() {
        let draft = build(
            "interface Gi0/0\n ip vrf forwarding CUST\n ip authentication mode eigrp 100 md5\n ip rip authentication key-chain K\n",
        );
        assert_eq!(draft.interfaces[0].vrf.as_deref(), Some("CUST"));
        assert!(draft.authenticated.contains(&RoutingProtocol::Eigrp));
        assert!(draft.authenticated.contains(&RoutingProtocol::Rip));
        assert!(!draft.authenticated.contains(&RoutingProtocol::Ospf));
    }

    #[test]
    fn bad_access_vlan_fails_the_block() {
        let blocks = tokenize("interface Fa0/1\n switchport access vlan 5000\n", &IOS);
        let mut draft = Draft::default();
        assert!(apply(&blocks[0], &IOS, false, &mut draft).is_err());
    }

    #[test]
    fn dhcp_and_bad_addresses_leave_no_address() {
        let draft = build("interface Gi0/0\n ip address dhcp\ninterface Gi0/1\n ip address 10.0.0.1 255.0.255.0\n");
        assert!(draft.interfaces.iter().all(|iface| iface.address.is_none()));
    }
}
