//! # cfgmap common
//!
//! Shared vocabulary of the workspace: the normalized device model, the
//! topology graph handed to report consumers, the error taxonomy and the run
//! configuration.
//!
//! * **[`model`]**: devices, interfaces, VLANs, routing entries, issues, topology.
//! * **[`network`]**: IPv4 address/mask helpers used by the parser and topology.
//! * **[`error`]**: the [`error::AnalysisError`] taxonomy.
//! * **[`config`]**: knobs of one analysis run.

#[macro_use]
mod macros;

pub mod config;
pub mod error;
pub mod model;
pub mod network;
