use serde::{Deserialize, Serialize};

use crate::model::source::LineRange;
use crate::network::subnet::InterfaceAddress;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminState {
    Up,
    Down,
    /// No evidence either way; only produced for reduced-fidelity sources.
    #[default]
    Unset,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortMode {
    Access,
    Trunk,
    /// `switchport mode dynamic auto|desirable`.
    Dynamic(String),
    /// `no switchport`, a Layer-3 port on a switch.
    Routed,
}

/// A device's named port and its configured attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interface {
    /// Canonical long-form name, e.g. `GigabitEthernet0/1`.
    pub name: String,
    pub admin_state: AdminState,
    pub address: Option<InterfaceAddress>,
    pub secondary_addresses: Vec<InterfaceAddress>,
    pub description: Option<String>,
    pub mode: Option<PortMode>,
    pub access_vlan: Option<u16>,
    pub native_vlan: Option<u16>,
    pub bandwidth_kbps: Option<u32>,
    pub duplex: Option<String>,
    pub speed: Option<String>,
    pub encapsulation: Option<String>,
    pub vrf: Option<String>,
    pub lines: LineRange,
}

impl Interface {
    pub fn new(name: impl Into<String>, lines: LineRange) -> Self {
        Self {
            name: name.into(),
            admin_state: AdminState::Unset,
            address: None,
            secondary_addresses: Vec::new(),
            description: None,
            mode: None,
            access_vlan: None,
            native_vlan: None,
            bandwidth_kbps: None,
            duplex: None,
            speed: None,
            encapsulation: None,
            vrf: None,
            lines,
        }
    }

    pub fn is_up(&self) -> bool {
        self.admin_state == AdminState::Up
    }

    pub fn is_trunk(&self) -> bool {
        matches!(self.mode, Some(PortMode::Trunk))
    }

    pub fn is_access(&self) -> bool {
        matches!(self.mode, Some(PortMode::Access))
    }

    /// Primary address first, then secondaries in declaration order.
    pub fn addresses(&self) -> impl Iterator<Item = &InterfaceAddress> {
        self.address.iter().chain(self.secondary_addresses.iter())
    }

    pub fn has_address(&self) -> bool {
        self.address.is_some()
    }

    /// VLAN an access port carries; an access port without a VLAN sits on VLAN 1.
    pub fn effective_access_vlan(&self) -> Option<u16> {
        if self.is_access() {
            Some(self.access_vlan.unwrap_or(1))
        } else {
            None
        }
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
