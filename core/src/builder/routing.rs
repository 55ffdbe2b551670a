use std::net::Ipv4Addr;

use cfgmap_common::model::routing::{NextHop, RoutingEntry, RoutingProtocol};
use cfgmap_common::model::source::LineRange;
use cfgmap_common::network::subnet::{Network, classful_prefix, mask_or_wildcard_to_prefix, mask_to_prefix};
use cfgmap_dialect::{Block, Line};
use tracing::debug;

use super::Draft;

/// `router <keyword> [process]` sections.
pub(super) fn apply(block: &Block, draft: &mut Draft) {
    let args = block.header_args();
    let keyword = args.first().copied().unwrap_or_default().to_ascii_lowercase();
    let protocol = RoutingProtocol::from_keyword(&keyword);
    let process = args.get(1).map(|p| p.to_string());

    match (protocol, process.as_deref().and_then(|p| p.parse::<u32>().ok())) {
        (RoutingProtocol::Ospf, Some(id)) if !draft.router.ospf_process_ids.contains(&id) => {
            draft.router.ospf_process_ids.push(id);
        }
        (RoutingProtocol::Bgp, Some(asn)) => draft.router.bgp_asn = Some(asn),
        _ => {}
    }

    let header_keyword = format!("router {keyword}");
    let template = |lines: LineRange| {
        let mut entry = RoutingEntry::new(protocol, header_keyword.clone(), lines);
        entry.process = process.clone();
        entry
    };

    let mut statements = 0;
    for line in block.body() {
        let words = line.words();
        let lowered: Vec<String> = words.iter().map(|w| w.to_ascii_lowercase()).collect();
        let keys: Vec<&str> = lowered.iter().map(String::as_str).collect();

        if is_authentication(&keys) {
            draft.authenticated.insert(protocol);
        }

        match keys.as_slice() {
            ["network", ..] => match network_statement(&keys[1..], protocol) {
                Some((network, area)) => {
                    let mut entry = template(LineRange::single(line.number));
                    entry.destination = Some(network);
                    entry.area = area;
                    draft.push_route(entry);
                    statements += 1;
                }
                None => skip(line),
            },
            ["neighbor", peer, "remote-as", ..] => match peer.parse::<Ipv4Addr>() {
                Ok(address) => {
                    let mut entry = template(LineRange::single(line.number));
                    entry.next_hop = Some(NextHop::Address(address));
                    draft.push_route(entry);
                    statements += 1;
                }
                Err(_) => skip(line),
            },
            _ => {}
        }
    }

    if statements == 0 {
        draft.push_route(template(block.line_range()));
    }
}

/// `network A [W|M] [area X]` and BGP's `network A mask M`.
fn network_statement(args: &[&str], protocol: RoutingProtocol) -> Option<(Network, Option<String>)> {
    let (address, rest) = match args.first()?.split_once('/') {
        Some((addr, prefix)) => {
            let address: Ipv4Addr = addr.parse().ok()?;
            let prefix: u8 = prefix.parse().ok().filter(|p| *p <= 32)?;
            let area = area_of(&args[1..]);
            return Some((Network::containing(address, prefix), area));
        }
        None => (args.first()?.parse::<Ipv4Addr>().ok()?, &args[1..]),
    };

    let prefix = match rest {
        ["mask", mask, ..] => mask_to_prefix(mask.parse().ok()?)?,
        [value, ..] if value.parse::<Ipv4Addr>().is_ok() => {
            let value: Ipv4Addr = value.parse().ok()?;
            match protocol {
                RoutingProtocol::Bgp => mask_to_prefix(value)?,
                _ => mask_or_wildcard_to_prefix(value)?,
            }
        }
        _ => classful_prefix(address),
    };

    Some((Network::containing(address, prefix), area_of(rest)))
}

fn area_of(args: &[&str]) -> Option<String> {
    args.iter()
        .position(|w| *w == "area")
        .and_then(|idx| args.get(idx + 1))
        .map(|area| area.to_string())
}

fn is_authentication(keys: &[&str]) -> bool {
    match keys {
        ["area", _, "authentication", ..] => true,
        ["neighbor", _, "password", ..] => true,
        ["authentication", ..] => true,
        ["message-digest-key", ..] => true,
        _ => false,
    }
}

fn skip(line: &Line) {
    debug!(line = line.number, text = line.text(), "skipping unreadable routing statement");
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
            apply(&block, &mut draft);
        }
        draft
    }

    #[test]
    fn classful_rip_and_eigrp_networks() {
        let draft = build("router rip\n version 2\n network 10.0.0.0\n network 192.168.1.0\n");
        let prefixes: Vec<u8> = draft.routes.iter().filter_map(|r| r.destination).map(|n| n.prefix).collect();
        assert_eq!(prefixes, vec![8, 24]);
        assert!(draft.routes.iter().all(|r| r.protocol == RoutingProtocol::Rip));
        assert!(draft.authenticated.is_empty());
    }

    #[test]
    fn eigrp_wildcard_and_auth() {
        let draft = build("router eigrp 100\n network 172.16.4.0 0.0.1.255\n authentication mode md5\n");
        assert_eq!(draft.routes[0].destination.unwrap().prefix, 23);
        assert_eq!(draft.routes[0].process.as_deref(), Some("100"));
        assert!(draft.authenticated.contains(&RoutingProtocol::Eigrp));
    }

    #[test]
    fn ospf_area_authentication() {
        let draft = build("router ospf 7\n area 0 authentication message-digest\n network 10.1.0.0/16 area 0\n");
        assert!(draft.authenticated.contains(&RoutingProtocol::Ospf));
        assert_eq!(draft.router.ospf_process_ids, vec![7]);
        assert_eq!(draft.routes[0].area.as_deref(), Some("0"));
    }

    #[test]
    fn block_without_statements_yields_one_entry() {
        let draft = build("router isis CORE\n net 49.0001.0000.0000.0001.00\n");
        assert_eq!(draft.routes.len(), 1);
        let entry = &draft.routes[0];
        assert_eq!(entry.protocol, RoutingProtocol::Unknown);
        assert_eq!(entry.keyword, "router isis");
        assert_eq!(entry.destination, None);
        assert_eq!(entry.lines, LineRange::new(1, 2));
    }

    #[test]
    fn bgp_network_uses_mask() {
        let draft = build("router bgp 65000\n network 203.0.113.0 mask 255.255.255.0\n");
        assert_eq!(draft.routes[0].destination.unwrap().prefix, 24);
        assert_eq!(draft.router.bgp_asn, Some(65000));
    }
}
