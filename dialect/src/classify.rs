//! Router-versus-switch heuristics.
//!
//! Neither role is declared anywhere in a configuration, so the decision is a
//! vote: structural signals (routing sections, Layer-3 ports, VLAN sections,
//! switchport commands) weigh more than single keywords from the profile.

use cfgmap_common::model::device::DeviceRole;

use crate::profile::{Capability, DialectProfile};
use crate::tokenizer::{Block, BlockKind};

const STRUCTURAL_WEIGHT: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub role: DeviceRole,
    pub router_score: u32,
    pub switch_score: u32,
    /// Human-readable reasons, for debug logging.
    pub signals: Vec<String>,
}

pub fn classify_role(blocks: &[Block], profile: &DialectProfile) -> Classification {
    let mut router_score = 0;
    let mut switch_score = 0;
    let mut signals = Vec::new();

    let routing_blocks = blocks.iter().filter(|b| b.kind == BlockKind::Routing).count();
    if routing_blocks > 0 {
        router_score += STRUCTURAL_WEIGHT;
        signals.push(format!("{routing_blocks} routing section(s)"));
    }

    let l3_ports = blocks
        .iter()
        .filter(|b| b.kind == BlockKind::Interface && is_layer3_port(b))
        .count();
    if l3_ports >= 2 {
        router_score += STRUCTURAL_WEIGHT;
        signals.push(format!("{l3_ports} layer-3 ports"));
    }

    let vlan_blocks = blocks.iter().filter(|b| b.kind == BlockKind::Vlan).count();
    if vlan_blocks > 0 {
        switch_score += STRUCTURAL_WEIGHT;
        signals.push(format!("{vlan_blocks} vlan section(s)"));
    }

    let switchport = blocks
        .iter()
        .filter(|b| b.kind == BlockKind::Interface)
        .flat_map(|b| b.body())
        .any(|line| line.text().to_ascii_lowercase().starts_with("switchport"));
    if switchport {
        switch_score += STRUCTURAL_WEIGHT;
        signals.push("switchport commands".to_string());
    } else if profile.has(Capability::SwitchportByDefault) && l3_ports == 0 {
        switch_score += 1;
        signals.push("ports default to switchport".to_string());
    }

    let lowered: Vec<String> = blocks
        .iter()
        .flat_map(|b| b.lines.iter())
        .map(|line| line.text().to_ascii_lowercase())
        .collect();
    let mentions = |indicator: &str| lowered.iter().any(|line| line.contains(indicator));

    for indicator in profile.router_indicators {
        if mentions(*indicator) {
            router_score += 1;
            signals.push(format!("router indicator '{}'", indicator.trim()));
        }
    }
    for indicator in profile.switch_indicators {
        if mentions(*indicator) {
            switch_score += 1;
            signals.push(format!("switch indicator '{}'", indicator.trim()));
        }
    }

    let role = match router_score.cmp(&switch_score) {
        std::cmp::Ordering::Greater => DeviceRole::Router,
        std::cmp::Ordering::Less => DeviceRole::Switch,
        std::cmp::Ordering::Equal => DeviceRole::Unknown,
    };

    Classification {
        role,
        router_score,
        switch_score,
        signals,
    }
}

/// A physical port with an address; loopbacks and SVIs do not count.
fn is_layer3_port(block: &Block) -> bool {
    let name = block
        .header_args()
        .first()
        .map(|name| name.to_ascii_lowercase())
        .unwrap_or_default();
    if ["lo", "vl", "null", "tu", "bvi"].iter().any(|p| name.starts_with(p)) {
        return false;
    }
    block.body().iter().any(|line| {
        let text = line.text().to_ascii_lowercase();
        text.starts_with("ip address ") && !text.contains("dhcp")
    })
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
    use crate::profile::{IOS, NXOS};
    use crate::tokenizer::tokenize;

    fn classify(text: &str) -> Classification {
        classify_role(&tokenize(text, &IOS), &IOS)
    }

    #[test]
    fn routing_sections_and_l3_ports_make_a_router() {
        let text = "\
hostname R1
interface GigabitEthernet0/0
 ip address 10.0.0.1 255.255.255.252
interface GigabitEthernet0/1
 ip address 10.0.1.1 255.255.255.0
router ospf 1
 network 10.0.0.0 0.0.255.255 area 0
";
        let result = classify(text);
        assert_eq!(result.role, DeviceRole::Router);
        assert_eq!(result.router_score, 4);
        assert_eq!(result.switch_score, 0);
    }

    #[test]
    fn vlans_and_switchports_make_a_switch() {
        let text = "\
hostname SW1
vlan 10
 name USERS
interface FastEthernet0/1
 switchport mode access
 switchport access vlan 10
spanning-tree mode rapid-pvst
";
        let result = classify(text);
        assert_eq!(result.role, DeviceRole::Switch);
        assert!(result.switch_score >= 5);
    }

    #[test]
    fn no_signals_is_unknown() {
        let result = classify("hostname X1\nservice timestamps\n");
        assert_eq!(result.role, DeviceRole::Unknown);
        assert!(result.signals.is_empty());
    }

    #[test]
    fn loopbacks_do_not_count_as_layer3_ports() {
        let text = "\
hostname X1
interface Loopback0
 ip address 1.1.1.1 255.255.255.255
interface Vlan1
 ip address 10.0.0.2 255.255.255.0
";
        assert_eq!(classify(text).role, DeviceRole::Switch);
    }

    #[test]
    fn nxos_ports_lean_towards_switch() {
        let text = "hostname N1\ninterface Ethernet1/1\n description server\n";
        let result = classify_role(&tokenize(text, &NXOS), &NXOS);
        assert_eq!(result.role, DeviceRole::Switch);
    }
}
