use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::interface::Interface;
use crate::model::routing::{RoutingEntry, RoutingProtocol};
use crate::model::source::{LineRange, SourceRef};
use crate::model::vlan::VlanDefinition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceRole {
    Router,
    Switch,
    Unknown,
}

impl fmt::Display for DeviceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Router => "router",
            Self::Switch => "switch",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterDetails {
    pub bgp_asn: Option<u32>,
    pub ospf_process_ids: Vec<u32>,
    /// Hardware model hint such as `Cisco 2911`, when the dump carries one.
    pub model: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchDetails {
    pub stp_mode: Option<String>,
    pub vtp_mode: Option<String>,
}

/// Role-specific data on top of the fields every device shares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum RoleProfile {
    Router(RouterDetails),
    Switch(SwitchDetails),
    Unknown,
}

impl RoleProfile {
    pub fn role(&self) -> DeviceRole {
        match self {
            Self::Router(_) => DeviceRole::Router,
            Self::Switch(_) => DeviceRole::Switch,
            Self::Unknown => DeviceRole::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnmpCommunity {
    pub name: String,
    /// `RO` / `RW` as written, if present.
    pub access: Option<String>,
    pub lines: LineRange,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecuritySettings {
    pub enable_secret: bool,
    pub enable_password: bool,
    /// `line` sections carrying a password, e.g. `vty 0 4`.
    pub line_passwords: Vec<String>,
    /// Local users that have a password or secret.
    pub local_users: Vec<String>,
    pub snmp_communities: Vec<SnmpCommunity>,
    pub password_encryption: bool,
}

impl SecuritySettings {
    pub fn has_any_password(&self) -> bool {
        self.enable_secret
            || self.enable_password
            || !self.line_passwords.is_empty()
            || !self.local_users.is_empty()
    }
}

/// Normalized model of one parsed configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub hostname: String,
    pub profile: RoleProfile,
    pub interfaces: Vec<Interface>,
    pub routes: Vec<RoutingEntry>,
    pub vlans: BTreeMap<u16, VlanDefinition>,
    pub security: SecuritySettings,
    /// Dynamic protocols for which an authentication statement was found.
    pub authenticated_protocols: BTreeSet<RoutingProtocol>,
    pub source: SourceRef,
    /// Built from text extracted out of a binary project file.
    pub reduced_fidelity: bool,
    /// Name of the dialect profile the file was parsed with.
    pub dialect: String,
}

impl Device {
    pub fn role(&self) -> DeviceRole {
        self.profile.role()
    }

    pub fn interface(&self, name: &str) -> Option<&Interface> {
        self.interfaces.iter().find(|iface| iface.name == name)
    }

    pub fn has_interface(&self, name: &str) -> bool {
        self.interface(name).is_some()
    }

    /// Dynamic routing protocols in use, in protocol order.
    pub fn dynamic_protocols(&self) -> BTreeSet<RoutingProtocol> {
        self.routes
            .iter()
            .map(|route| route.protocol)
            .filter(RoutingProtocol::is_dynamic)
            .collect()
    }

    pub fn static_routes(&self) -> impl Iterator<Item = &RoutingEntry> {
        self.routes
            .iter()
            .filter(|route| route.protocol == RoutingProtocol::Static)
    }

    /// Hostname compared the way the run enforces uniqueness.
    pub fn hostname_key(&self) -> String {
        self.hostname.to_lowercase()
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.hostname, self.role())
    }
}
