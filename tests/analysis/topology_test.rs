use cfgmap_common::config::Config;
use cfgmap_common::model::topology::{Confidence, Endpoint, InferenceBasis};
use cfgmap_core::{AnalysisReport, AnalysisSession};
use cfgmap_integration_tests::{config_dir, router, switch};

fn analyze(files: &[(&str, &str)]) -> AnalysisReport {
    let dir = config_dir(files).unwrap();
    AnalysisSession::new(Config::default()).run(dir.path()).unwrap()
}

fn endpoint(device: &str, interface: &str) -> Endpoint {
    Endpoint::new(device, Some(interface.to_string()))
}

/*************************************************************
                       Subnet matching
**************************************************************/

#[test]
fn point_to_point_subnet_links_two_routers() {
    let report = analyze(&[
        ("r1.cfg", &router("R1", &[("Serial0/0/0", "10.0.0.1 255.255.255.252", None)])),
        ("r2.cfg", &router("R2", &[("Serial0/0/0", "10.0.0.2 255.255.255.252", None)])),
    ]);

    let links = report.topology().links();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].basis, InferenceBasis::Subnet);
    assert_eq!(links[0].confidence, Confidence::Medium);
    assert_eq!(links[0].a, endpoint("R1", "Serial0/0/0"));
    assert_eq!(links[0].b, endpoint("R2", "Serial0/0/0"));
    assert!(report.summary().isolated_devices.is_empty());
}

#[test]
fn lan_with_three_routers_is_one_segment() {
    let report = analyze(&[
        ("r1.cfg", &router("R1", &[("Gi0/0", "192.168.5.1 255.255.255.0", None)])),
        ("r2.cfg", &router("R2", &[("Gi0/0", "192.168.5.2 255.255.255.0", None)])),
        ("r3.cfg", &router("R3", &[("Gi0/0", "192.168.5.3 255.255.255.0", None)])),
    ]);

    assert!(report.topology().links().is_empty());
    let segments = report.topology().segments();
    assert_eq!(segments.len(), 1);
    let members: Vec<&str> = segments[0].members.iter().map(|m| m.device.as_str()).collect();
    assert_eq!(members, vec!["R1", "R2", "R3"]);
    assert_eq!(report.summary().shared_segments, 1);
}

#[test]
fn mismatched_masks_are_reported_not_linked() {
    let report = analyze(&[
        ("r1.cfg", &router("R1", &[("Gi0/0", "10.4.4.1 255.255.255.0", None)])),
        ("r2.cfg", &router("R2", &[("Gi0/0", "10.4.4.2 255.255.255.128", None)])),
    ]);

    assert!(report.topology().has_no_edges());
    let mismatches: Vec<&str> = report
        .issues()
        .iter()
        .filter(|issue| issue.rule == "subnet-mask-mismatch")
        .filter_map(|issue| issue.hostname())
        .collect();
    assert_eq!(mismatches, vec!["R1", "R2"]);
}

/*************************************************************
                     Description matching
**************************************************************/

#[test]
fn description_beats_subnet_and_names_the_remote_port() {
    let report = analyze(&[
        ("r1.cfg", &router("R1", &[("Serial0/0/0", "10.0.0.1 255.255.255.252", Some("WAN to R2 Se0/0/1"))])),
        ("r2.cfg", &router("R2", &[("Serial0/0/1", "10.0.0.2 255.255.255.252", None)])),
    ]);

    let links = report.topology().links();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].basis, InferenceBasis::Description);
    assert_eq!(links[0].confidence, Confidence::High);
    assert_eq!(links[0].b, endpoint("R2", "Serial0/0/1"));
    assert_eq!(report.summary().links(Confidence::High), 1);
}

#[test]
fn switch_uplink_description_links_to_router() {
    let report = analyze(&[
        ("r1.cfg", &router("R1", &[("Gi0/1", "10.1.1.1 255.255.255.0", Some("access SW1"))])),
        ("sw1.cfg", &switch("SW1", "uplink to R1")),
    ]);

    let links = report.topology().links();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].a, endpoint("R1", "GigabitEthernet0/1"));
    assert_eq!(links[0].b, endpoint("SW1", "GigabitEthernet0/1"));
    assert!(!links[0].is_ambiguous());
}

#[test]
fn unknown_remote_port_is_flagged() {
    let report = analyze(&[
        ("r1.cfg", &router("R1", &[("Gi0/0", "10.1.1.1 255.255.255.0", Some("to R2"))])),
        ("r2.cfg", &router("R2", &[("Gi0/0", "10.5.5.1 255.255.255.0", None), ("Gi0/1", "10.6.6.1 255.255.255.0", None)])),
    ]);

    let links = report.topology().links();
    assert_eq!(links.len(), 1);
    assert!(links[0].is_ambiguous());
    assert_eq!(links[0].b, Endpoint::new("R2", None));
}

#[test]
fn unconnected_device_is_isolated() {
    let report = analyze(&[
        ("r1.cfg", &router("R1", &[("Gi0/0", "10.0.0.1 255.255.255.252", None)])),
        ("r2.cfg", &router("R2", &[("Gi0/0", "10.0.0.2 255.255.255.252", None)])),
        ("lone.cfg", &router("LONE", &[("Gi0/0", "172.20.0.1 255.255.255.0", None)])),
    ]);

    assert_eq!(report.summary().isolated_devices, vec!["LONE".to_string()]);
    assert!(report.summary().to_string().ends_with("isolated devices: LONE"));
}
