use cfgmap_common::model::device::{Device, DeviceRole, RoleProfile};
use cfgmap_common::model::issue::{Severity, ValidationIssue};
use cfgmap_common::model::topology::{Confidence, Link, SharedSegment};
use cfgmap_common::network::subnet::InterfaceAddress;
use colored::*;

use crate::terminal::colors;

pub type Detail = (String, ColoredString);

pub fn role_label(role: DeviceRole) -> ColoredString {
    let color = match role {
        DeviceRole::Router => colors::ROUTER,
        DeviceRole::Switch => colors::SWITCH,
        DeviceRole::Unknown => colors::UNKNOWN,
    };
    role.to_string().color(color)
}

pub fn severity_label(severity: Severity) -> ColoredString {
    let label = format!("[{severity}]");
    match severity {
        Severity::Error => label.color(colors::SEVERITY_ERROR).bold(),
        Severity::Warning => label.color(colors::SEVERITY_WARNING).bold(),
        Severity::BestPractice => label.color(colors::SEVERITY_BEST_PRACTICE),
    }
}

pub fn confidence_label(confidence: Confidence) -> ColoredString {
    match confidence {
        Confidence::High => "high".green().bold(),
        Confidence::Medium => "medium".yellow(),
    }
}

pub fn address(address: &InterfaceAddress) -> ColoredString {
    let ip: ColoredString = address.address.to_string().color(colors::IPV4_ADDR);
    let prefix: ColoredString = address.prefix.to_string().color(colors::IPV4_PREFIX);
    format!("{ip}/{prefix}").color(colors::SEPARATOR)
}

pub fn device_details(device: &Device, issue_count: usize) -> Vec<Detail> {
    let mut details: Vec<Detail> = vec![
        ("Role".to_string(), role_label(device.role())),
        ("Dialect".to_string(), device.dialect.normal()),
        ("Source".to_string(), device.source.file_name().normal()),
    ];

    if let RoleProfile::Router(router) = &device.profile
        && let Some(model) = &router.model
    {
        details.push(("Model".to_string(), model.normal()));
    }

    let up = device.interfaces.iter().filter(|iface| iface.is_up()).count();
    details.push((
        "Ports".to_string(),
        format!("{} configured, {up} up", device.interfaces.len()).normal(),
    ));

    let addresses: Vec<String> = device
        .interfaces
        .iter()
        .filter_map(|iface| iface.address.as_ref().map(|addr| format!("{} {}", iface.name, address(addr))))
        .collect();
    if !addresses.is_empty() {
        details.push(("Addresses".to_string(), addresses.join(", ").normal()));
    }

    let protocols: Vec<String> = device
        .dynamic_protocols()
        .iter()
        .map(|protocol| protocol.to_string())
        .collect();
    let statics = device.static_routes().count();
    details.push((
        "Routing".to_string(),
        match protocols.is_empty() {
            true => format!("{statics} static").normal(),
            false => format!("{}, {statics} static", protocols.join(", ")).normal(),
        },
    ));

    let declared = device.vlans.values().filter(|vlan| vlan.declared).count();
    if declared > 0 {
        details.push(("VLANs".to_string(), declared.to_string().normal()));
    }

    if device.reduced_fidelity {
        details.push(("Fidelity".to_string(), "reduced (binary project)".yellow()));
    }

    let issues = match issue_count {
        0 => "clean".green().bold(),
        n => format!("{n}").red().bold(),
    };
    details.push(("Issues".to_string(), issues));
    details
}

pub fn issue_line(issue: &ValidationIssue) -> String {
    let mut line = format!("{} {}", severity_label(issue.severity), issue.message);
    if let Some(interface) = &issue.interface {
        line.push_str(&format!(" {}", format!("({interface})").color(colors::PRIMARY)));
    }
    if let Some(lines) = issue.lines {
        line.push_str(&format!(" {}", format!("line {lines}").bright_black()));
    }
    line.push_str(&format!(" {}", issue.rule.as_str().color(colors::SEPARATOR)));
    line
}

pub fn link_line(link: &Link) -> String {
    let mut line = format!(
        "{} {} {}  {} via {}",
        link.a.to_string().color(colors::PRIMARY),
        "⟷".color(colors::SEPARATOR),
        link.b.to_string().color(colors::PRIMARY),
        confidence_label(link.confidence),
        link.basis
    );
    if let Some(network) = &link.network {
        line.push_str(&format!(" {}", network.to_string().color(colors::IPV4_ADDR)));
    }
    for flag in &link.flags {
        line.push_str(&format!(" {}", format!("[{flag}]").yellow()));
    }
    line
}

pub fn segment_line(segment: &SharedSegment) -> String {
    let members: Vec<String> = segment.members.iter().map(|m| m.to_string()).collect();
    format!(
        "{}  {} via {}: {}",
        segment.network.to_string().color(colors::IPV4_ADDR),
        confidence_label(segment.confidence),
        segment.basis,
        members.join(", ").color(colors::PRIMARY)
    )
}
