//! # Device and Topology Model
//!
//! Normalized, vendor-neutral records produced by the parser and consumed by
//! the validator, the topology builder and every report collaborator.
//!
//! * [`device::Device`]: one parsed configuration file.
//! * [`interface::Interface`]: a named port owned by exactly one device.
//! * [`vlan::VlanDefinition`] and [`routing::RoutingEntry`]: per-device tables.
//! * [`issue::ValidationIssue`]: a finding attached to a device or a file.
//! * [`topology::TopologyGraph`]: inferred links between devices, by hostname.

pub mod device;
pub mod interface;
pub mod issue;
pub mod routing;
pub mod source;
pub mod topology;
pub mod vlan;
