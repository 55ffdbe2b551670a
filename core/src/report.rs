//! Read-only result of one analysis run.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use cfgmap_common::model::device::Device;
use cfgmap_common::model::issue::{IssueSubject, Severity, ValidationIssue};
use cfgmap_common::model::topology::{Confidence, TopologyGraph};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisReport {
    devices: Vec<Device>,
    issues: Vec<ValidationIssue>,
    topology: TopologyGraph,
    failed_files: Vec<PathBuf>,
}

impl AnalysisReport {
    pub(crate) fn new(
        devices: Vec<Device>,
        issues: Vec<ValidationIssue>,
        topology: TopologyGraph,
        failed_files: Vec<PathBuf>,
    ) -> Self {
        Self {
            devices,
            issues,
            topology,
            failed_files,
        }
    }

    /// Parsed devices, in input order.
    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn device(&self, hostname: &str) -> Option<&Device> {
        self.devices.iter().find(|device| device.hostname == hostname)
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn topology(&self) -> &TopologyGraph {
        &self.topology
    }

    /// Files that never became a device, in input order.
    pub fn failed_files(&self) -> &[PathBuf] {
        &self.failed_files
    }

    pub fn issues_for<'a>(&'a self, hostname: &'a str) -> impl Iterator<Item = &'a ValidationIssue> + 'a {
        self.issues
            .iter()
            .filter(move |issue| issue.hostname() == Some(hostname))
    }

    /// A device with no issue of any severity.
    pub fn is_clean(&self, hostname: &str) -> bool {
        self.issues_for(hostname).next().is_none()
    }

    pub fn issues_by_subject(&self) -> BTreeMap<&IssueSubject, Vec<&ValidationIssue>> {
        let mut grouped: BTreeMap<&IssueSubject, Vec<&ValidationIssue>> = BTreeMap::new();
        for issue in &self.issues {
            grouped.entry(&issue.subject).or_default().push(issue);
        }
        grouped
    }

    pub fn issues_by_severity(&self) -> BTreeMap<Severity, Vec<&ValidationIssue>> {
        let mut grouped: BTreeMap<Severity, Vec<&ValidationIssue>> = BTreeMap::new();
        for issue in &self.issues {
            grouped.entry(issue.severity).or_default().push(issue);
        }
        grouped
    }

    pub fn summary(&self) -> RunSummary {
        let mut issues_by_severity: BTreeMap<Severity, usize> =
            Severity::ALL.into_iter().map(|severity| (severity, 0)).collect();
        for issue in &self.issues {
            *issues_by_severity.entry(issue.severity).or_default() += 1;
        }

        let links_by_confidence = [Confidence::High, Confidence::Medium]
            .into_iter()
            .map(|confidence| (confidence, self.topology.count_links(confidence)))
            .collect();

        RunSummary {
            devices_parsed: self.devices.len(),
            devices_failed: self.failed_files.len(),
            issues_by_severity,
            links_by_confidence,
            shared_segments: self.topology.segments().len(),
            isolated_devices: self
                .topology
                .isolated()
                .map(|node| node.hostname.clone())
                .collect(),
        }
    }
}

/// Counts describing a run, always producible even for an empty report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub devices_parsed: usize,
    pub devices_failed: usize,
    pub issues_by_severity: BTreeMap<Severity, usize>,
    pub links_by_confidence: BTreeMap<Confidence, usize>,
    pub shared_segments: usize,
    pub isolated_devices: Vec<String>,
}

impl RunSummary {
    pub fn issues(&self, severity: Severity) -> usize {
        self.issues_by_severity.get(&severity).copied().unwrap_or(0)
    }

    pub fn links(&self, confidence: Confidence) -> usize {
        self.links_by_confidence.get(&confidence).copied().unwrap_or(0)
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "devices parsed: {}", self.devices_parsed)?;
        writeln!(f, "files failed: {}", self.devices_failed)?;
        for (severity, count) in &self.issues_by_severity {
            writeln!(f, "{severity} issues: {count}")?;
        }
        for (confidence, count) in &self.links_by_confidence {
            writeln!(f, "{confidence}-confidence links: {count}")?;
        }
        writeln!(f, "shared segments: {}", self.shared_segments)?;
        if self.isolated_devices.is_empty() {
            write!(f, "isolated devices: none")
        } else {
            write!(f, "isolated devices: {}", self.isolated_devices.join(", "))
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report_still_summarizes() {
        let summary = AnalysisReport::default().summary();
        assert_eq!(summary.devices_parsed, 0);
        assert_eq!(summary.issues(Severity::Error), 0);
        assert_eq!(summary.links(Confidence::High), 0);
        assert!(summary.to_string().contains("isolated devices: none"));
    }

    #[test]
    fn issues_group_by_subject_and_severity() {
        let issues = vec![
            ValidationIssue::for_device(Severity::Warning, "weak-snmp-community", "R1", "public"),
            ValidationIssue::for_device(Severity::Error, "no-password-set", "R1", "none"),
            ValidationIssue::for_device(Severity::Error, "no-password-set", "SW1", "none"),
        ];
        let report = AnalysisReport::new(Vec::new(), issues, TopologyGraph::default(), Vec::new());

        let by_subject = report.issues_by_subject();
        assert_eq!(by_subject[&IssueSubject::Device("R1".into())].len(), 2);
        assert_eq!(report.issues_by_severity()[&Severity::Error].len(), 2);
        assert_eq!(report.summary().issues(Severity::Warning), 1);
        assert!(!report.is_clean("SW1"));
        assert!(report.is_clean("R2"));
    }
}
