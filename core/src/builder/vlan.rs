use cfgmap_common::model::vlan::VlanDefinition;
use cfgmap_dialect::Block;

use super::Draft;

/// Highest accepted id; the reserved 0 and 4095 are valid input.
const MAX_VLAN_ID: u16 = 4095;

/// `vlan N` or `vlan A,B-C` with an optional `name` child.
pub(super) fn apply(block: &Block, draft: &mut Draft) -> Result<(), String> {
    let list = block.header_args().concat();
    let ids = parse_vlan_list(&list)?;

    let name = block.body().iter().find_map(|line| {
        let text = line.text();
        let (keyword, value) = text.split_once(char::is_whitespace)?;
        keyword
            .eq_ignore_ascii_case("name")
            .then(|| value.trim().to_string())
    });

    for id in ids {
        let vlan = draft
            .vlans
            .entry(id)
            .or_insert_with(|| VlanDefinition::declared(id));
        vlan.declared = true;
        if name.is_some() {
            vlan.name = name.clone();
        }
    }
    Ok(())
}

/// Expands `10,20-22` into `[10, 20, 21, 22]`.
fn parse_vlan_list(list: &str) -> Result<Vec<u16>, String> {
    let mut ids = Vec::new();
    for part in list.split(',').filter(|part| !part.is_empty()) {
        match part.split_once('-') {
            Some((low, high)) => {
                let (low, high) = (vlan_id(low)?, vlan_id(high)?);
                if low > high {
                    return Err(format!("descending VLAN range '{part}'"));
                }
                ids.extend(low..=high);
            }
            None => ids.push(vlan_id(part)?),
        }
    }

    if ids.is_empty() {
        return Err("vlan header without an id".to_string());
    }
    Ok(ids)
}

pub(super) fn vlan_id(raw: &str) -> Result<u16, String> {
    raw.trim()
        .parse::<u16>()
        .ok()
        .filter(|id| *id <= MAX_VLAN_ID)
        .ok_or_else(|| format!("'{raw}' is not a VLAN id"))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
