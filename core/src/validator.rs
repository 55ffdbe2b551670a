//! # Validator engine
//!
//! Runs a fixed, ordered registry of [`Rule`]s against one [`Device`] at a
//! time. Every rule that matches reports; there is no short-circuiting. A rule
//! that fails internally (an error or a panic) is reported as a
//! `validator-rule-failed` issue and the remaining rules still run.

use std::panic::{self, AssertUnwindSafe};

use cfgmap_common::config::Config;
use cfgmap_common::error::RuleError;
use cfgmap_common::model::device::Device;
use cfgmap_common::model::issue::{Severity, ValidationIssue};
use cfgmap_common::model::source::LineRange;
use tracing::{debug, warn};

mod rules;

pub use rules::registry;

/// Prefix of the meta-issue raised when a rule itself fails.
pub const RULE_FAILED: &str = "validator-rule-failed";

/// One match of a rule against a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub message: String,
    pub interface: Option<String>,
    pub lines: Option<LineRange>,
}

impl Finding {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            interface: None,
            lines: None,
        }
    }

    pub fn on_interface(mut self, name: impl Into<String>, lines: LineRange) -> Self {
        self.interface = Some(name.into());
        self.lines = Some(lines);
        self
    }

    pub fn at_lines(mut self, lines: LineRange) -> Self {
        self.lines = Some(lines);
        self
    }
}

/// A single, independent configuration check.
pub trait Rule: Send + Sync {
    /// Stable kebab-case identifier, e.g. `weak-snmp-community`.
    fn id(&self) -> &'static str;

    fn severity(&self) -> Severity;

    /// One line shown by `cfgmap rules`.
    fn summary(&self) -> &'static str;

    /// Inspects `device`; an empty vector means the rule does not apply.
    fn check(&self, device: &Device) -> Result<Vec<Finding>, RuleError>;
}

pub struct Validator {
    rules: Vec<Box<dyn Rule>>,
}

impl Validator {
    /// The full registry minus the rules `config` disables.
    pub fn new(config: &Config) -> Self {
        let rules = registry()
            .into_iter()
            .filter(|rule| config.is_rule_enabled(rule.id()))
            .collect();
        Self::with_rules(rules)
    }

    pub fn with_rules(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(|rule| rule.as_ref())
    }

    /// Issues for `device`, in registry order then finding order.
    pub fn validate(&self, device: &Device) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        for rule in &self.rules {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| rule.check(device)))
                .unwrap_or_else(|payload| Err(RuleError::Panicked(panic_message(payload.as_ref()))));

            match outcome {
                Ok(findings) => {
                    issues.extend(findings.into_iter().map(|finding| {
                        let mut issue = ValidationIssue::for_device(
                            rule.severity(),
                            rule.id(),
                            &device.hostname,
                            finding.message,
                        );
                        issue.interface = finding.interface;
                        issue.lines = finding.lines;
                        issue
                    }));
                }
                Err(err) => {
                    warn!(rule = rule.id(), device = %device.hostname, %err, "validation rule failed");
                    issues.push(ValidationIssue::for_device(
                        Severity::Error,
                        format!("{RULE_FAILED}: {}", rule.id()),
                        &device.hostname,
                        format!("rule '{}' could not run: {err}", rule.id()),
                    ));
                }
            }
        }

        debug!(device = %device.hostname, issues = issues.len(), "validated");
        issues
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        text.to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "unknown panic".to_string()
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
    use std::path::Path;

    use cfgmap_common::model::issue::IssueSubject;

    use super::*;
    use crate::builder::parse_config;

    struct Exploding;

    impl Rule for Exploding {
        fn id(&self) -> &'static str {
            "exploding"
        }
        fn severity(&self) -> Severity {
            Severity::Warning
        }
        fn summary(&self) -> &'static str {
            "always panics"
        }
        fn check(&self, _device: &Device) -> Result<Vec<Finding>, RuleError> {
            panic!("boom")
        }
    }

    struct Failing;

    impl Rule for Failing {
        fn id(&self) -> &'static str {
            "failing"
        }
        fn severity(&self) -> Severity {
            Severity::BestPractice
        }
        fn summary(&self) -> &'static str {
            "always errors"
        }
        fn check(&self, _device: &Device) -> Result<Vec<Finding>, RuleError> {
            Err(RuleError::Other("no data".into()))
        }
    }

    struct Always;

    impl Rule for Always {
        fn id(&self) -> &'static str {
            "always"
        }
        fn severity(&self) -> Severity {
            Severity::Warning
        }
        fn summary(&self) -> &'static str {
            "always matches"
        }
        fn check(&self, _device: &Device) -> Result<Vec<Finding>, RuleError> {
            Ok(vec![Finding::new("matched")])
        }
    }

    fn device(text: &str) -> Device {
        parse_config(Path::new("t.cfg"), text, false).unwrap()
    }

    const LAX_SWITCH: &str = "\
hostname SW1
snmp-server community public RO
vlan 10
!
interface FastEthernet0/1
 switchport mode access
 description user port
!
interface FastEthernet0/2
 switchport mode access
 switchport access vlan 10
 description printer
";

    #[test]
    fn failing_rules_become_meta_issues_and_others_still_run() {
        let validator = Validator::with_rules(vec![Box::new(Exploding), Box::new(Failing), Box::new(Always)]);
        let issues = validator.validate(&device("hostname R1\n"));

        let rules: Vec<&str> = issues.iter().map(|i| i.rule.as_str()).collect();
        assert_eq!(
            rules,
            vec!["validator-rule-failed: exploding", "validator-rule-failed: failing", "always"]
        );
        assert!(issues[..2].iter().all(|i| i.severity == Severity::Error));
        assert!(issues[0].message.contains("boom"));
        assert_eq!(issues[2].subject, IssueSubject::Device("R1".into()));
    }

    #[test]
    fn passwordless_switch_reports_error_and_warnings() {
        let issues = Validator::new(&Config::default()).validate(&device(LAX_SWITCH));
        let has = |rule: &str, severity: Severity| {
            issues
                .iter()
                .any(|issue| issue.rule == rule && issue.severity == severity)
        };

        assert!(has("no-password-set", Severity::Error));
        assert!(has("default-vlan-in-use", Severity::Warning));
        assert!(has("weak-snmp-community", Severity::Warning));
        assert!(has("unnamed-vlan", Severity::BestPractice));

        let vlan_one = issues
            .iter()
            .find(|issue| issue.rule == "default-vlan-in-use")
            .unwrap();
        assert_eq!(vlan_one.interface.as_deref(), Some("FastEthernet0/1"));
    }

    #[test]
    fn disabled_rules_do_not_run() {
        let mut config = Config::default();
        config.disabled_rules.insert("no-password-set".into());
        let validator = Validator::new(&config);

        assert!(validator.rules().all(|rule| rule.id() != "no-password-set"));
        let issues = validator.validate(&device(LAX_SWITCH));
        assert!(issues.iter().all(|issue| issue.rule != "no-password-set"));
    }

    #[test]
    fn validation_is_deterministic() {
        let validator = Validator::new(&Config::default());
        let dev = device(LAX_SWITCH);
        assert_eq!(validator.validate(&dev), validator.validate(&dev));
    }
}
