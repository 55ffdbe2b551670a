//! # Device model builder
//!
//! Turns the labeled blocks of one configuration into a normalized [`Device`].
//! The builder is pure: everything it needs arrives as arguments, so the
//! session can run it on any worker thread.
//!
//! Each block kind has its own submodule that writes into a shared [`Draft`].
//! Assembling the final [`Device`] happens once every block has been seen,
//! because VLAN membership and the role payload depend on the whole file.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::LazyLock;

use cfgmap_common::error::AnalysisError;
use cfgmap_common::model::device::{
    Device, DeviceRole, RoleProfile, RouterDetails, SecuritySettings, SwitchDetails,
};
use cfgmap_common::model::interface::Interface;
use cfgmap_common::model::routing::{RoutingEntry, RoutingProtocol};
use cfgmap_common::model::source::{LineRange, SourceRef};
use cfgmap_common::model::vlan::VlanDefinition;
use cfgmap_dialect::{Block, BlockKind, DialectProfile, classify_role, tokenize};
use regex::Regex;
use tracing::debug;

mod global;
mod interface;
mod routing;
mod vlan;

static MODEL_HINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{4})\s+(?:router|series)\b").expect("model hint pattern")
});

/// Everything collected from the blocks before the role is applied.
#[derive(Debug, Default)]
struct Draft {
    hostname: Option<String>,
    interfaces: Vec<Interface>,
    routes: Vec<RoutingEntry>,
    vlans: BTreeMap<u16, VlanDefinition>,
    security: SecuritySettings,
    authenticated: BTreeSet<RoutingProtocol>,
    router: RouterDetails,
    switch: SwitchDetails,
}

impl Draft {
    /// Routing entries form a set; a repeated statement is recorded once.
    fn push_route(&mut self, entry: RoutingEntry) {
        let duplicate = self.routes.iter().any(|known| {
            known.protocol == entry.protocol
                && known.process == entry.process
                && known.destination == entry.destination
                && known.next_hop == entry.next_hop
                && known.area == entry.area
        });
        if !duplicate {
            self.routes.push(entry);
        }
    }

    fn push_interface(&mut self, iface: Interface) {
        match self.interfaces.iter_mut().find(|known| known.name == iface.name) {
            Some(known) => {
                debug!(interface = %iface.name, "interface declared twice, keeping the later block");
                *known = iface;
            }
            None => self.interfaces.push(iface),
        }
    }

    fn reference_vlan(&mut self, id: u16) -> &mut VlanDefinition {
        self.vlans
            .entry(id)
            .or_insert_with(|| VlanDefinition::referenced(id))
    }
}

/// Reads, classifies and builds one configuration text.
///
/// The dialect is detected from the text itself. `reduced_fidelity` marks text
/// recovered from a binary project file.
pub fn parse_config(path: &Path, text: &str, reduced_fidelity: bool) -> Result<Device, AnalysisError> {
    let profile = DialectProfile::detect(text);
    let blocks = tokenize(text, profile);
    if blocks.is_empty() {
        return Err(AnalysisError::malformed(path, None, "no configuration statements"));
    }

    let classification = classify_role(&blocks, profile);
    debug!(
        path = %path.display(),
        dialect = profile.name,
        role = %classification.role,
        router = classification.router_score,
        switch = classification.switch_score,
        signals = ?classification.signals,
        "classified configuration"
    );

    let last_line = blocks
        .last()
        .map(|block| block.line_range().last)
        .unwrap_or(1);
    let source = SourceRef::new(path, LineRange::new(1, last_line));

    let mut device = build_device(&source, &blocks, classification.role, profile, reduced_fidelity)?;
    if let RoleProfile::Router(details) = &mut device.profile
        && details.model.is_none()
    {
        details.model = model_hint(text);
    }
    Ok(device)
}

/// Builds a [`Device`] from already tokenized blocks.
///
/// Fails with [`AnalysisError::MalformedConfig`] when a section header cannot
/// be interpreted or when no hostname is declared.
pub fn build_device(
    source: &SourceRef,
    blocks: &[Block],
    role: DeviceRole,
    profile: &DialectProfile,
    reduced_fidelity: bool,
) -> Result<Device, AnalysisError> {
    let mut draft = Draft::default();

    for block in blocks {
        let malformed = |reason: String| AnalysisError::malformed(&source.path, Some(block.line_range()), reason);
        match block.kind {
            BlockKind::Global => global::apply(block, profile, &mut draft),
            BlockKind::Interface => {
                interface::apply(block, profile, reduced_fidelity, &mut draft).map_err(malformed)?
            }
            BlockKind::Routing => routing::apply(block, &mut draft),
            BlockKind::Vlan => vlan::apply(block, &mut draft).map_err(malformed)?,
            BlockKind::Unknown => global::apply_section(block, &mut draft),
        }
    }

    let hostname = draft
        .hostname
        .take()
        .ok_or_else(|| AnalysisError::malformed(&source.path, None, "no hostname declared"))?;

    link_vlan_members(&mut draft);

    let profile_data = match role {
        DeviceRole::Router => RoleProfile::Router(draft.router),
        DeviceRole::Switch => RoleProfile::Switch(draft.switch),
        DeviceRole::Unknown => RoleProfile::Unknown,
    };

    let device = Device {
        hostname,
        profile: profile_data,
        interfaces: draft.interfaces,
        routes: draft.routes,
        vlans: draft.vlans,
        security: draft.security,
        authenticated_protocols: draft.authenticated,
        source: source.clone(),
        reduced_fidelity,
        dialect: profile.name.to_string(),
    };
    debug!(
        device = %device,
        interfaces = device.interfaces.len(),
        routes = device.routes.len(),
        vlans = device.vlans.len(),
        "built device"
    );
    Ok(device)
}

/// First `NNNN router` / `NNNN series` mention, as `Cisco NNNN`.
pub fn model_hint(text: &str) -> Option<String> {
    MODEL_HINT
        .captures(text)
        .map(|caps| format!("Cisco {}", &caps[1]))
}

fn link_vlan_members(draft: &mut Draft) {
    let memberships: Vec<(u16, String)> = draft
        .interfaces
        .iter()
        .filter_map(|iface| iface.effective_access_vlan().map(|id| (id, iface.name.clone())))
        .collect();
    let natives: Vec<u16> = draft
        .interfaces
        .iter()
        .filter_map(|iface| iface.native_vlan)
        .collect();

    for (id, name) in memberships {
        draft.reference_vlan(id).members.insert(name);
    }
    for id in natives {
        draft.reference_vlan(id);
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
