use std::net::Ipv4Addr;

use cfgmap_common::model::device::SnmpCommunity;
use cfgmap_common::model::routing::{NextHop, RoutingEntry, RoutingProtocol};
use cfgmap_common::model::source::LineRange;
use cfgmap_common::network::subnet::{Network, mask_to_prefix};
use cfgmap_dialect::{Block, DialectProfile, Line};
use tracing::debug;

use super::Draft;

/// Top-level statements: identity, credentials, static routes, switching modes.
pub(super) fn apply(block: &Block, profile: &DialectProfile, draft: &mut Draft) {
    for line in block.body() {
        apply_line(line, profile, draft);
    }
}

/// Sections no other parser claims. Only `line` sections carry anything the
/// model keeps, their passwords.
pub(super) fn apply_section(block: &Block, draft: &mut Draft) {
    let Some(header) = block.header() else {
        return;
    };
    let words = header.words();
    if !words.first().is_some_and(|w| w.eq_ignore_ascii_case("line")) {
        return;
    }

    let has_password = block.body().iter().any(|line| {
        let text = line.text().to_ascii_lowercase();
        text.starts_with("password ") || text.starts_with("secret ")
    });
    if has_password {
        draft.security.line_passwords.push(words[1..].join(" "));
    }
}

fn apply_line(line: &Line, profile: &DialectProfile, draft: &mut Draft) {
    let words = line.words();
    let lowered: Vec<String> = words.iter().map(|w| w.to_ascii_lowercase()).collect();
    let keys: Vec<&str> = lowered.iter().map(String::as_str).collect();

    match keys.as_slice() {
        ["hostname" | "switchname", _, ..] => {
            draft.hostname = Some(words[1].trim_matches('"').to_string());
        }
        ["enable", "secret", _, ..] => draft.security.enable_secret = true,
        ["enable", "password", _, ..] => draft.security.enable_password = true,
        ["username", _, rest @ ..] if rest.iter().any(|w| matches!(*w, "password" | "secret")) => {
            draft.security.local_users.push(words[1].to_string());
        }
        ["service", "password-encryption"] => draft.security.password_encryption = true,
        ["snmp-server", "community", _, rest @ ..] => {
            let access = rest
                .iter()
                .position(|w| matches!(*w, "ro" | "rw"))
                .map(|idx| words[3 + idx].to_uppercase());
            draft.security.snmp_communities.push(SnmpCommunity {
                name: words[2].to_string(),
                access,
                lines: LineRange::single(line.number),
            });
        }
        ["ip", "route", ..] => match static_route(&words[2..], line.number, profile) {
            Some(entry) => draft.push_route(entry),
            None => debug!(line = line.number, text = line.text(), "skipping unreadable static route"),
        },
        ["spanning-tree", "mode", _, ..] => draft.switch.stp_mode = Some(lowered[2].clone()),
        ["vtp", "mode", _, ..] => draft.switch.vtp_mode = Some(lowered[2].clone()),
        _ => {}
    }
}

/// `ip route [vrf V] NET MASK (NEXT-HOP | IFACE [NEXT-HOP]) [DISTANCE] ...`
fn static_route(args: &[&str], line: usize, profile: &DialectProfile) -> Option<RoutingEntry> {
    let args = match args {
        [vrf, _, rest @ ..] if vrf.eq_ignore_ascii_case("vrf") => rest,
        _ => args,
    };

    // NX-OS writes `ip route 10.0.0.0/8 ...`
    let (network, rest) = match args.first()?.split_once('/') {
        Some((addr, prefix)) => {
            let address: Ipv4Addr = addr.parse().ok()?;
            let prefix: u8 = prefix.parse().ok().filter(|p| *p <= 32)?;
            (Network::containing(address, prefix), &args[1..])
        }
        None => {
            let address: Ipv4Addr = args.first()?.parse().ok()?;
            let mask: Ipv4Addr = args.get(1)?.parse().ok()?;
            (Network::containing(address, mask_to_prefix(mask)?), args.get(2..)?)
        }
    };

    let mut entry = RoutingEntry::new(RoutingProtocol::Static, "ip route", LineRange::single(line));
    entry.destination = Some(network);

    let mut rest = rest.iter();
    let first = rest.next()?;
    let mut after_hop = rest.clone();
    entry.next_hop = Some(match first.parse::<Ipv4Addr>() {
        Ok(address) => NextHop::Address(address),
        Err(_) => {
            let iface = NextHop::Interface(profile.normalize_interface(first));
            match rest.clone().next().map(|w| w.parse::<Ipv4Addr>()) {
                Some(Ok(address)) => {
                    after_hop.next();
                    NextHop::Address(address)
                }
                _ => iface,
            }
        }
    });

    entry.admin_distance = after_hop.next().and_then(|w| w.parse().ok());
    Some(entry)
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

    use super::*;

    fn route(text: &str) -> Option<RoutingEntry> {
        let words: Vec<&str> = text.split_whitespace().collect();
        static_route(&words[2..], 1, &IOS)
    }

    #[test]
    fn static_route_forms() {
        let via_iface_and_hop = route("ip route 10.0.0.0 255.0.0.0 Gi0/0 192.168.1.254 5").unwrap();
        assert_eq!(
            via_iface_and_hop.next_hop,
            Some(NextHop::Address(Ipv4Addr::new(192, 168, 1, 254)))
        );
        assert_eq!(via_iface_and_hop.admin_distance, Some(5));

        let in_vrf = route("ip route vrf MGMT 0.0.0.0 0.0.0.0 Null0").unwrap();
        assert!(in_vrf.is_default_route());
        assert_eq!(in_vrf.next_hop, Some(NextHop::Interface("Null0".into())));

        let cidr = route("ip route 172.16.0.0/12 10.1.1.1").unwrap();
        assert_eq!(cidr.destination.unwrap().prefix, 12);
    }

    #[test]
    fn unreadable_static_routes_are_rejected() {
        assert!(route("ip route 10.0.0.0 255.0.255.0 10.1.1.1").is_none());
        assert!(route("ip route banana 255.0.0.0 10.1.1.1").is_none());
        assert!(route("ip route 10.0.0.0 255.0.0.0").is_none());
    }
}
