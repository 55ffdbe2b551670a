//! # Analysis session
//!
//! Orchestrates one run: discover inputs, parse and validate every file in
//! parallel, resolve duplicate hostnames, then infer the topology from the
//! surviving devices.
//!
//! Each worker owns its file's bytes, device and issues exclusively; nothing
//! is shared but the progress counter. The indexed `collect` of the parallel
//! iterator is the join barrier, so everything after it sees the complete
//! device set in input order.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use cfgmap_common::config::Config;
use cfgmap_common::error::AnalysisError;
use cfgmap_common::model::device::Device;
use cfgmap_common::model::issue::ValidationIssue;
use cfgmap_common::{info, success, warn};
use rayon::prelude::*;
use tracing::debug;

use crate::builder::parse_config;
use crate::inputs::{InputFile, discover_inputs};
use crate::report::AnalysisReport;
use crate::topology;
use crate::validator::Validator;

/// Called with the running number of processed files.
pub type ProgressCallback = Arc<dyn Fn(usize) + Send + Sync>;

enum FileOutcome {
    Parsed {
        device: Box<Device>,
        issues: Vec<ValidationIssue>,
    },
    Failed(AnalysisError),
}

pub struct AnalysisSession {
    config: Config,
    validator: Validator,
    on_file_done: Option<ProgressCallback>,
}

impl AnalysisSession {
    pub fn new(config: Config) -> Self {
        let validator = Validator::new(&config);
        Self {
            config,
            validator,
            on_file_done: None,
        }
    }

    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.on_file_done = Some(callback);
        self
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Analyzes a single file or every recognized file in a directory.
    pub fn run(&self, path: &Path) -> Result<AnalysisReport, AnalysisError> {
        let inputs = discover_inputs(path)?;
        info!("Found {} configuration file(s) in {}", inputs.len(), path.display());
        self.run_inputs(inputs)
    }

    pub fn run_inputs(&self, mut inputs: Vec<InputFile>) -> Result<AnalysisReport, AnalysisError> {
        inputs.sort();
        let limit = self.config.max_file_bytes;
        self.run_with(&inputs, |input| &input.path, |input| {
            let bytes = input.read(limit)?;
            let text = input.decode(&bytes)?;
            parse_config(&input.path, &text, input.reduced_fidelity)
        })
    }

    /// Analyzes configurations already held in memory, keyed by a path label.
    pub fn run_sources(&self, mut sources: Vec<(PathBuf, String)>) -> Result<AnalysisReport, AnalysisError> {
        sources.sort_by(|a, b| a.0.cmp(&b.0));
        self.run_with(&sources, |(path, _)| path, |(path, text)| parse_config(path, text, false))
    }

    fn run_with<T, P, F>(&self, items: &[T], path_of: P, parse: F) -> Result<AnalysisReport, AnalysisError>
    where
        T: Sync,
        P: Fn(&T) -> &PathBuf + Sync,
        F: Fn(&T) -> Result<Device, AnalysisError> + Sync,
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.jobs.unwrap_or(0))
            .build()
            .map_err(|err| AnalysisError::ThreadPool(err.to_string()))?;

        let processed = AtomicUsize::new(0);
        let outcomes: Vec<FileOutcome> = pool.install(|| {
            items
                .par_iter()
                .map(|item| {
                    let outcome = match parse(item) {
                        Ok(device) => {
                            let issues = self.validator.validate(&device);
                            FileOutcome::Parsed {
                                device: Box::new(device),
                                issues,
                            }
                        }
                        Err(err) => FileOutcome::Failed(err),
                    };

                    let done = processed.fetch_add(1, Ordering::Relaxed) + 1;
                    if let Some(callback) = &self.on_file_done {
                        callback(done);
                    }
                    outcome
                })
                .collect()
        });

        let paths: Vec<&PathBuf> = items.iter().map(path_of).collect();
        self.assemble(&paths, outcomes)
    }

    /// Runs after the barrier: duplicates, failures and topology, in input order.
    fn assemble(&self, paths: &[&PathBuf], outcomes: Vec<FileOutcome>) -> Result<AnalysisReport, AnalysisError> {
        let mut devices: Vec<Device> = Vec::new();
        let mut issues = Vec::new();
        let mut failed_files = Vec::new();
        let mut owners: HashMap<String, PathBuf> = HashMap::new();

        for (path, outcome) in paths.iter().zip(outcomes) {
            let path = (*path).clone();
            match outcome {
                FileOutcome::Parsed { device, issues: found } => {
                    if let Some(first) = owners.get(&device.hostname_key()) {
                        let err = AnalysisError::DuplicateHostname {
                            hostname: device.hostname.clone(),
                            path: path.clone(),
                            first: first.clone(),
                        };
                        warn!("{err}");
                        issues.push(ValidationIssue::for_file(&path, &err));
                        failed_files.push(path);
                        continue;
                    }

                    debug!(device = %device, issues = found.len(), "accepted device");
                    owners.insert(device.hostname_key(), path);
                    devices.push(*device);
                    issues.extend(found);
                }
                FileOutcome::Failed(err) => {
                    warn!("Skipping {}: {err}", path.display());
                    issues.push(ValidationIssue::for_file(&path, &err));
                    failed_files.push(path);
                }
            }
        }

        if devices.is_empty() {
            return Err(AnalysisError::NoUsableInput { attempted: paths.len() });
        }
        success!("Parsed {} device(s), {} file(s) failed", devices.len(), failed_files.len());

        let outcome = topology::build(&devices);
        issues.extend(outcome.issues);

        Ok(AnalysisReport::new(devices, issues, outcome.graph, failed_files))
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
