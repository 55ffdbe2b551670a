//! Interface-name normalization.
//!
//! Later stages compare names across files written by different people with
//! different habits (`Gi0/1`, `g0/1`, `GigabitEthernet 0/1`), so every name is
//! reduced to the canonical long form before it leaves the parser.

use std::sync::LazyLock;

use regex::Regex;

use crate::profile::DialectProfile;

static INTERFACE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z][A-Za-z-]*?)\s*(\d[\d/.:]*)$").expect("interface name pattern")
});

static INTERFACE_MENTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Za-z][A-Za-z-]*)\s?(\d+(?:/\d+)*(?:\.\d+)?)\b").expect("interface mention pattern")
});

/// Maps `Gi0/1` to `GigabitEthernet0/1`. Unknown prefixes are kept as written.
pub fn normalize_interface_name(raw: &str, profile: &DialectProfile) -> String {
    let raw = raw.trim();
    let Some(caps) = INTERFACE_NAME.captures(raw) else {
        return raw.to_string();
    };

    match profile.canonical_type(&caps[1]) {
        Some(canonical) => format!("{canonical}{}", &caps[2]),
        None => raw.to_string(),
    }
}

/// An interface name found in free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mention {
    /// Byte offset of the mention in the searched text.
    pub offset: usize,
    /// Canonical interface name.
    pub name: String,
}

/// Interface names mentioned in free text, such as a description reading
/// `uplink to R2 Gi0/1`, in text order. Only recognized interface types are
/// returned.
pub fn interface_mentions(text: &str, profile: &DialectProfile) -> Vec<Mention> {
    INTERFACE_MENTION
        .captures_iter(text)
        .filter_map(|caps| {
            let canonical = profile.canonical_type(&caps[1])?;
            Some(Mention {
                offset: caps.get(0).map_or(0, |m| m.start()),
                name: format!("{canonical}{}", &caps[2]),
            })
        })
        .collect()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
