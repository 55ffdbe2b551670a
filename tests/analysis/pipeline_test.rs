use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use cfgmap_common::config::Config;
use cfgmap_common::error::AnalysisError;
use cfgmap_common::model::device::DeviceRole;
use cfgmap_common::model::interface::AdminState;
use cfgmap_common::model::issue::{IssueSubject, Severity, ValidationIssue};
use cfgmap_core::AnalysisSession;
use cfgmap_integration_tests::{config_dir, path_in, router, switch};

/*************************************************************
                     Per-file isolation
**************************************************************/

#[test]
fn one_malformed_file_does_not_stop_the_others() {
    let mut files: Vec<(String, String)> = (1..=8)
        .map(|n| {
            let text = router(&format!("R{n}"), &[("GigabitEthernet0/0", &format!("172.16.{n}.1 255.255.255.0"), None)]);
            (format!("r{n}.cfg"), text)
        })
        .collect();
    files.push(("broken.cfg".to_string(), "interface GigabitEthernet0/0\n ip address 10.0.0.1 255.255.255.0\n".to_string()));
    let refs: Vec<(&str, &str)> = files.iter().map(|(n, t)| (n.as_str(), t.as_str())).collect();
    let dir = config_dir(&refs).unwrap();

    let report = AnalysisSession::new(Config::default()).run(dir.path()).unwrap();

    assert_eq!(report.devices().len(), 8);
    assert_eq!(report.failed_files(), &[path_in(&dir, "broken.cfg")]);
    assert_eq!(report.topology().nodes().len(), 8);

    let file_issues: Vec<&ValidationIssue> = report
        .issues()
        .iter()
        .filter(|issue| matches!(issue.subject, IssueSubject::File(_)))
        .collect();
    assert_eq!(file_issues.len(), 1);
    assert_eq!(file_issues[0].rule, "malformed-config");
    assert_eq!(file_issues[0].severity, Severity::Error);
}

#[test]
fn duplicate_hostname_keeps_the_first_file() {
    let dir = config_dir(&[
        ("a.cfg", &router("CORE", &[("Gi0/0", "10.0.0.1 255.255.255.252", None)])),
        ("b.cfg", &router("core", &[("Gi0/0", "10.0.0.2 255.255.255.252", None)])),
    ])
    .unwrap();

    let report = AnalysisSession::new(Config::default()).run(dir.path()).unwrap();

    assert_eq!(report.devices().len(), 1);
    assert_eq!(report.devices()[0].source.path, path_in(&dir, "a.cfg"));
    assert!(report.topology().links().is_empty());
    assert!(
        report
            .issues()
            .iter()
            .any(|issue| issue.rule == "duplicate-hostname"
                && issue.subject == IssueSubject::File(path_in(&dir, "b.cfg")))
    );
}

#[test]
fn no_usable_file_fails_the_run() {
    let dir = config_dir(&[("empty.cfg", ""), ("notes.md", "hostname R1\n")]).unwrap();

    let err = AnalysisSession::new(Config::default()).run(dir.path()).unwrap_err();

    assert!(matches!(err, AnalysisError::NoUsableInput { attempted: 1 }));
}

#[test]
fn oversized_files_are_skipped() {
    let big = router("BIG", &[("Gi0/0", "10.9.0.1 255.255.255.0", None)]);
    let dir = config_dir(&[("big.cfg", &big), ("small.cfg", "hostname S1\n")]).unwrap();
    let config = Config {
        max_file_bytes: 64,
        ..Config::default()
    };

    let report = AnalysisSession::new(config).run(dir.path()).unwrap();

    assert!(report.device("BIG").is_none());
    assert!(report.device("S1").is_some());
    assert!(report.issues().iter().any(|issue| issue.rule == "file-unreadable"));
}

/*************************************************************
                        Validation
**************************************************************/

const LAX_SWITCH: &str = "\
hostname SW9
snmp-server community public RO
vlan 20
vlan 30
 name SPARE
interface FastEthernet0/1
 switchport mode access
interface FastEthernet0/2
 switchport mode access
 switchport access vlan 20
spanning-tree mode pvst
";

const STATIC_ROUTER: &str = "\
hostname EDGE
enable secret 5 $1$abcd
interface GigabitEthernet0/0
 ip address 192.0.2.1 255.255.255.0
 description ISP handoff
router eigrp 10
 network 192.0.2.0
ip route 10.10.0.0 255.255.0.0 192.0.2.254
";

fn rules_for(report: &cfgmap_core::AnalysisReport, hostname: &str) -> BTreeSet<String> {
    report.issues_for(hostname).map(|issue| issue.rule.clone()).collect()
}

#[test]
fn every_matching_rule_reports() {
    let dir = config_dir(&[("sw9.cfg", LAX_SWITCH), ("edge.cfg", STATIC_ROUTER)]).unwrap();

    let report = AnalysisSession::new(Config::default()).run(dir.path()).unwrap();

    let switch_rules = rules_for(&report, "SW9");
    for rule in [
        "no-password-set",
        "weak-snmp-community",
        "default-vlan-in-use",
        "unnamed-vlan",
        "empty-vlan",
        "unused-interface-up",
    ] {
        assert!(switch_rules.contains(rule), "SW9 should trip {rule}, got {switch_rules:?}");
    }

    let default_vlan: Vec<&ValidationIssue> = report
        .issues_for("SW9")
        .filter(|issue| issue.rule == "default-vlan-in-use")
        .collect();
    assert_eq!(default_vlan.len(), 1);
    assert_eq!(default_vlan[0].interface.as_deref(), Some("FastEthernet0/1"));
    assert!(default_vlan[0].lines.is_some());

    let router_rules = rules_for(&report, "EDGE");
    assert!(router_rules.contains("missing-routing-auth"));
    assert!(router_rules.contains("missing-default-route"));
    assert!(!router_rules.contains("no-password-set"));
    assert_eq!(report.device("EDGE").map(|d| d.role()), Some(DeviceRole::Router));
}

#[test]
fn skipped_rules_never_report() {
    let dir = config_dir(&[("sw9.cfg", LAX_SWITCH)]).unwrap();
    let config = Config {
        disabled_rules: ["weak-snmp-community".to_string(), "unused-interface-up".to_string()].into(),
        ..Config::default()
    };

    let report = AnalysisSession::new(config).run(dir.path()).unwrap();

    let rules = rules_for(&report, "SW9");
    assert!(!rules.contains("weak-snmp-community"));
    assert!(!rules.contains("unused-interface-up"));
    assert!(rules.contains("no-password-set"));
}

#[test]
fn clean_switch_has_no_errors_or_warnings() {
    let dir = config_dir(&[("sw1.cfg", &switch("SW1", "uplink"))]).unwrap();

    let report = AnalysisSession::new(Config::default()).run(dir.path()).unwrap();

    let summary = report.summary();
    assert_eq!(summary.issues(Severity::Error), 0);
    assert_eq!(summary.issues(Severity::Warning), 0);
    assert_eq!(report.device("SW1").map(|d| d.role()), Some(DeviceRole::Switch));
}

/*************************************************************
                 Determinism and output formats
**************************************************************/

fn lab() -> Vec<(PathBuf, String)> {
    vec![
        (PathBuf::from("r1.cfg"), router("R1", &[("Gi0/0", "10.0.0.1 255.255.255.252", Some("to R2")), ("Gi0/1", "10.1.1.1 255.255.255.0", Some("SW1 trunk"))])),
        (PathBuf::from("r2.cfg"), router("R2", &[("Gi0/0", "10.0.0.2 255.255.255.252", None), ("Gi0/1", "10.2.2.1 255.255.255.0", None)])),
        (PathBuf::from("r3.cfg"), router("R3", &[("Gi0/0", "10.2.2.2 255.255.255.0", None)])),
        (PathBuf::from("r4.cfg"), router("R4", &[("Gi0/0", "10.2.2.3 255.255.255.0", None)])),
        (PathBuf::from("sw1.cfg"), switch("SW1", "uplink to R1")),
        (PathBuf::from("sw9.cfg"), LAX_SWITCH.to_string()),
    ]
}

#[test]
fn report_ignores_input_order_and_worker_count() {
    let serial = AnalysisSession::new(Config {
        jobs: Some(1),
        ..Config::default()
    });
    let parallel = AnalysisSession::new(Config {
        jobs: Some(4),
        ..Config::default()
    });

    let baseline = serial.run_sources(lab()).unwrap();

    let mut reversed = lab();
    reversed.reverse();
    assert_eq!(parallel.run_sources(reversed).unwrap(), baseline);

    let mut rotated = lab();
    rotated.rotate_left(3);
    assert_eq!(parallel.run_sources(rotated).unwrap(), baseline);
}

#[test]
fn json_snapshot_has_every_section() {
    let report = AnalysisSession::new(Config::default()).run_sources(lab()).unwrap();

    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["devices"].as_array().map(Vec::len), Some(6));
    assert!(json["issues"].as_array().is_some_and(|issues| !issues.is_empty()));
    assert!(json["topology"]["links"].is_array());
    assert!(json["topology"]["segments"].is_array());
    assert_eq!(json["failed_files"].as_array().map(Vec::len), Some(0));
}

#[test]
fn summary_text_counts_severities() {
    let report = AnalysisSession::new(Config::default()).run_sources(lab()).unwrap();
    let summary = report.summary();
    let text = summary.to_string();

    assert_eq!(summary.devices_parsed, 6);
    assert!(text.contains(&format!("devices parsed: {}", summary.devices_parsed)));
    assert!(summary.issues(Severity::Warning) > 0);
}

/*************************************************************
                     Binary project files
**************************************************************/

#[test]
fn project_files_are_scraped_with_reduced_fidelity() {
    let dir = tempfile::tempdir().unwrap();
    let mut blob = vec![0x1f, 0x8b, 0x00, 0xff];
    blob.extend_from_slice(b"hostname LAB-R1\x00\x02interface FastEthernet0/0\x00 ip address 10.0.0.1 255.255.255.0\x00");
    blob.extend_from_slice(&[0x00, 0xfe, 0x07]);
    fs::write(dir.path().join("lab.pkt"), blob).unwrap();
    fs::write(dir.path().join("r2.cfg"), "hostname R2\ninterface FastEthernet0/0\n ip address 10.0.0.2 255.255.255.0\n").unwrap();

    let report = AnalysisSession::new(Config::default()).run(dir.path()).unwrap();

    let lab = report.device("LAB-R1").unwrap();
    assert!(lab.reduced_fidelity);
    assert_eq!(lab.interfaces[0].admin_state, AdminState::Unset);

    let plain = report.device("R2").unwrap();
    assert!(!plain.reduced_fidelity);
    assert_eq!(plain.interfaces[0].admin_state, AdminState::Up);
}
