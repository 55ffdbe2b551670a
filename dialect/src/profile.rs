//! Capability-tagged keyword tables, one per supported syntax family.
//!
//! Adding a dialect means adding a [`DialectProfile`] to [`PROFILES`]; nothing
//! else in the pipeline is dialect specific.

use crate::names;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// `banner <kind> <delim> ... <delim>` blocks.
    Banners,
    /// `vlan N` blocks with `name` children.
    VlanBlocks,
    /// Ethernet ports are Layer-2 switchports unless told otherwise.
    SwitchportByDefault,
}

#[derive(Debug)]
pub struct DialectProfile {
    pub name: &'static str,
    pub capabilities: &'static [Capability],
    /// Line prefixes (lowercase) that identify this dialect.
    pub signatures: &'static [&'static str],
    pub interface_header: &'static str,
    pub routing_header: &'static str,
    pub vlan_header: &'static str,
    /// Exact abbreviations, lowercase, mapped to the canonical prefix.
    pub abbreviations: &'static [(&'static str, &'static str)],
    /// Canonical interface type names; unique prefixes expand to these.
    pub interface_types: &'static [&'static str],
    pub router_indicators: &'static [&'static str],
    pub switch_indicators: &'static [&'static str],
}

pub static IOS: DialectProfile = DialectProfile {
    name: "ios",
    capabilities: &[Capability::Banners, Capability::VlanBlocks],
    signatures: &[],
    interface_header: "interface",
    routing_header: "router",
    vlan_header: "vlan",
    abbreviations: &[
        ("f", "FastEthernet"),
        ("fe", "FastEthernet"),
        ("g", "GigabitEthernet"),
        ("ge", "GigabitEthernet"),
        ("gig", "GigabitEthernet"),
        ("te", "TenGigabitEthernet"),
        ("ten", "TenGigabitEthernet"),
        ("fo", "FortyGigabitEthernet"),
        ("hu", "HundredGigE"),
        ("e", "Ethernet"),
        ("eth", "Ethernet"),
        ("s", "Serial"),
        ("se", "Serial"),
        ("lo", "Loopback"),
        ("po", "Port-channel"),
        ("vl", "Vlan"),
        ("tu", "Tunnel"),
        ("di", "Dialer"),
        ("mu", "Multilink"),
    ],
    interface_types: &[
        "FastEthernet",
        "GigabitEthernet",
        "TenGigabitEthernet",
        "TwentyFiveGigE",
        "FortyGigabitEthernet",
        "HundredGigE",
        "Ethernet",
        "Serial",
        "Loopback",
        "Vlan",
        "Port-channel",
        "Tunnel",
        "Dialer",
        "Multilink",
        "Async",
        "BVI",
        "Null",
        "Virtual-Template",
        "Cellular",
    ],
    router_indicators: &[
        "ip route ",
        "interface serial",
        "interface tunnel",
        "ppp authentication",
        "frame-relay",
        "ip nat",
        "crypto map",
        "ipsec",
    ],
    switch_indicators: &[
        "spanning-tree",
        "vtp mode",
        "vlan database",
        "interface vlan",
        "interface port-channel",
        "mac address-table",
    ],
};

pub static NXOS: DialectProfile = DialectProfile {
    name: "nxos",
    capabilities: &[Capability::Banners, Capability::VlanBlocks, Capability::SwitchportByDefault],
    signatures: &["!command: show running-config", "feature "],
    interface_header: "interface",
    routing_header: "router",
    vlan_header: "vlan",
    abbreviations: &[
        ("e", "Ethernet"),
        ("eth", "Ethernet"),
        ("po", "port-channel"),
        ("lo", "loopback"),
        ("vl", "Vlan"),
        ("mgmt", "mgmt"),
    ],
    interface_types: &["Ethernet", "port-channel", "loopback", "Vlan", "Tunnel", "mgmt", "nve"],
    router_indicators: &["ip route ", "interface tunnel", "feature nat"],
    switch_indicators: &[
        "spanning-tree",
        "vtp mode",
        "feature interface-vlan",
        "feature lacp",
        "feature vpc",
        "interface vlan",
    ],
};

/// Known dialects, most specific first; the last one is the fallback.
pub static PROFILES: &[&DialectProfile] = &[&NXOS, &IOS];

impl DialectProfile {
    /// Picks the first profile whose signature appears at the start of a line.
    pub fn detect(text: &str) -> &'static DialectProfile {
        PROFILES
            .iter()
            .copied()
            .find(|profile| profile.matches(text))
            .unwrap_or(&IOS)
    }

    pub fn by_name(name: &str) -> Option<&'static DialectProfile> {
        PROFILES
            .iter()
            .copied()
            .find(|profile| profile.name.eq_ignore_ascii_case(name))
    }

    fn matches(&self, text: &str) -> bool {
        if self.signatures.is_empty() {
            return false;
        }
        text.lines().any(|line| {
            let lower = line.trim_start().to_ascii_lowercase();
            self.signatures.iter().any(|sig| lower.starts_with(sig))
        })
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Canonical interface type for an alphabetic prefix such as `Gi` or `fa`.
    pub fn canonical_type(&self, prefix: &str) -> Option<&'static str> {
        let lower = prefix.to_ascii_lowercase();
        if let Some((_, canonical)) = self.abbreviations.iter().find(|(abbr, _)| *abbr == lower) {
            return Some(*canonical);
        }

        if let Some(exact) = self
            .interface_types
            .iter()
            .find(|name| name.eq_ignore_ascii_case(&lower))
        {
            return Some(*exact);
        }

        if lower.len() < 2 {
            return None;
        }
        let mut candidates = self
            .interface_types
            .iter()
            .filter(|name| name.to_ascii_lowercase().starts_with(&lower));
        match (candidates.next(), candidates.next()) {
            (Some(only), None) => Some(*only),
            _ => None,
        }
    }

    pub fn normalize_interface(&self, raw: &str) -> String {
        names::normalize_interface_name(raw, self)
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

    #[test]
    fn detect_falls_back_to_ios() {
        assert_eq!(DialectProfile::detect("hostname R1\n").name, "ios");
        assert_eq!(DialectProfile::detect("").name, "ios");
    }

    #[test]
    fn detect_recognizes_nxos() {
        let text = "!Command: show running-config\nhostname N1\nfeature ospf\n";
        assert_eq!(DialectProfile::detect(text).name, "nxos");
    }

    #[test]
    fn canonical_type_expands_abbreviations_and_prefixes() {
        assert_eq!(IOS.canonical_type("Gi"), Some("GigabitEthernet"));
        assert_eq!(IOS.canonical_type("fa"), Some("FastEthernet"));
        assert_eq!(IOS.canonical_type("SERIAL"), Some("Serial"));
        assert_eq!(IOS.canonical_type("Port-chan"), Some("Port-channel"));
        assert_eq!(IOS.canonical_type("Te"), Some("TenGigabitEthernet"));
    }

    #[test]
    fn canonical_type_rejects_ambiguous_or_unknown_prefixes() {
        // TenGigabitEthernet, TwentyFiveGigE, Tunnel
        assert_eq!(IOS.canonical_type("t"), None);
        assert_eq!(IOS.canonical_type("r"), None);
        assert_eq!(IOS.canonical_type("area"), None);
    }

    #[test]
    fn by_name_is_case_insensitive() {
        assert_eq!(DialectProfile::by_name("NXOS").map(|p| p.name), Some("nxos"));
        assert!(DialectProfile::by_name("junos").is_none());
    }
}
