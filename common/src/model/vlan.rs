use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VlanDefinition {
    pub id: u16,
    pub name: Option<String>,
    /// Interface names of the owning device; back-references, not ownership.
    pub members: BTreeSet<String>,
    /// `false` when the VLAN is only referenced by a port, never declared.
    pub declared: bool,
}

impl VlanDefinition {
    pub fn declared(id: u16) -> Self {
        Self {
            id,
            name: None,
            members: BTreeSet::new(),
            declared: true,
        }
    }

    pub fn referenced(id: u16) -> Self {
        Self {
            declared: false,
            ..Self::declared(id)
        }
    }

    pub fn is_default(&self) -> bool {
        self.id == 1
    }
}
