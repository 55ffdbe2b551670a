//! Fixtures shared by the integration tests: small configuration builders and
//! a scratch directory to run the analyzer against.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

/// A scratch directory populated with `(file name, contents)` pairs.
pub fn config_dir(files: &[(&str, &str)]) -> anyhow::Result<TempDir> {
    let dir = tempfile::tempdir()?;
    for (name, contents) in files {
        fs::write(dir.path().join(name), contents)?;
    }
    Ok(dir)
}

pub fn path_in(dir: &TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}

/// An OSPF router; each port is `(name, "address mask", description)`.
pub fn router(hostname: &str, ports: &[(&str, &str, Option<&str>)]) -> String {
    let mut text = format!("hostname {hostname}\nenable secret 5 $1$abcd\n!\n");
    for (name, address, description) in ports {
        text.push_str(&format!("interface {name}\n"));
        if let Some(description) = description {
            text.push_str(&format!(" description {description}\n"));
        }
        text.push_str(&format!(" ip address {address}\n no shutdown\n!\n"));
    }
    text.push_str("router ospf 1\n network 10.0.0.0 0.255.255.255 area 0\n!\nend\n");
    text
}

/// An access switch with a single named VLAN and one port in it.
pub fn switch(hostname: &str, uplink_description: &str) -> String {
    format!(
        "\
hostname {hostname}
enable secret 5 $1$abcd
vlan 10
 name USERS
interface FastEthernet0/1
 description user port
 switchport mode access
 switchport access vlan 10
interface GigabitEthernet0/1
 description {uplink_description}
 switchport mode trunk
spanning-tree mode rapid-pvst
end
"
    )
}
