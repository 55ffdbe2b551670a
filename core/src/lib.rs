//! # cfgmap core
//!
//! The analysis pipeline. A run goes through
//! [`session::AnalysisSession`], which feeds each input file through the
//! [`builder`] and the [`validator`] on a worker pool and hands the surviving
//! devices to [`topology`].

pub mod builder;
pub mod inputs;
pub mod report;
pub mod session;
pub mod topology;
pub mod validator;

pub use report::{AnalysisReport, RunSummary};
pub use session::AnalysisSession;
