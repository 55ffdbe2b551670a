use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::model::source::LineRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    Error,
    Warning,
    BestPractice,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Error, Severity::Warning, Severity::BestPractice];
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::BestPractice => "best-practice",
        };
        f.write_str(name)
    }
}

/// What an issue is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSubject {
    /// A parsed device, by hostname.
    Device(String),
    /// A file that never became a device.
    File(PathBuf),
}

impl fmt::Display for IssueSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Device(hostname) => f.write_str(hostname),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub rule: String,
    pub subject: IssueSubject,
    pub interface: Option<String>,
    pub lines: Option<LineRange>,
    pub message: String,
}

impl ValidationIssue {
    pub fn for_device(
        severity: Severity,
        rule: impl Into<String>,
        hostname: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            rule: rule.into(),
            subject: IssueSubject::Device(hostname.into()),
            interface: None,
            lines: None,
            message: message.into(),
        }
    }

    /// File-level error for a file that was excluded from the device set.
    pub fn for_file(path: impl Into<PathBuf>, err: &AnalysisError) -> Self {
        Self {
            severity: Severity::Error,
            rule: err.rule_id().to_string(),
            subject: IssueSubject::File(path.into()),
            interface: None,
            lines: err.lines(),
            message: err.to_string(),
        }
    }

    pub fn on_interface(mut self, name: impl Into<String>) -> Self {
        self.interface = Some(name.into());
        self
    }

    pub fn at_lines(mut self, lines: LineRange) -> Self {
        self.lines = Some(lines);
        self
    }

    pub fn hostname(&self) -> Option<&str> {
        match &self.subject {
            IssueSubject::Device(hostname) => Some(hostname),
            IssueSubject::File(_) => None,
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: ", self.severity, self.subject)?;
        if let Some(interface) = &self.interface {
            write!(f, "{interface}: ")?;
        }
        write!(f, "{} ({})", self.message, self.rule)
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
    fn file_issue_carries_error_details() {
        let err = AnalysisError::malformed("bad.cfg", Some(LineRange::new(4, 6)), "interface without a name");
        let issue = ValidationIssue::for_file("bad.cfg", &err);

        assert_eq!(issue.severity, Severity::Error);
        assert_eq!(issue.rule, "malformed-config");
        assert_eq!(issue.lines, Some(LineRange::new(4, 6)));
        assert_eq!(issue.hostname(), None);
        assert!(issue.message.contains("lines 4-6"));
    }

    #[test]
    fn display_includes_interface_and_rule() {
        let issue = ValidationIssue::for_device(Severity::Warning, "default-vlan-in-use", "SW1", "port is on VLAN 1")
            .on_interface("FastEthernet0/2");
        assert_eq!(
            issue.to_string(),
            "[warning] SW1: FastEthernet0/2: port is on VLAN 1 (default-vlan-in-use)"
        );
    }

    #[test]
    fn severity_orders_error_first() {
        let mut all = vec![Severity::BestPractice, Severity::Error, Severity::Warning];
        all.sort();
        assert_eq!(all, Severity::ALL.to_vec());
    }

    #[test]
    fn severity_serializes_kebab_case() {
        let json = serde_json::to_string(&Severity::BestPractice).unwrap();
        assert_eq!(json, "\"best-practice\"");
    }
}
