use std::collections::BTreeSet;
use std::path::PathBuf;

/// Default upper bound for a single configuration file.
pub const DEFAULT_MAX_FILE_BYTES: u64 = 16 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    /// Verbosity reduction, 0 prints everything.
    pub quiet: u8,
    /// Hides the banner.
    pub no_banner: bool,
    /// Worker threads for parsing and validation. `None` uses every core.
    pub jobs: Option<usize>,
    /// Files above this size are skipped as unreadable.
    pub max_file_bytes: u64,
    /// Rule ids that the validator must not run.
    pub disabled_rules: BTreeSet<String>,
    /// Where to write the JSON snapshot of the run, if anywhere.
    pub json_out: Option<PathBuf>,
    /// Where to write the plain-text validation summary, if anywhere.
    pub summary_out: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quiet: 0,
            no_banner: false,
            jobs: None,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            disabled_rules: BTreeSet::new(),
            json_out: None,
            summary_out: None,
        }
    }
}

impl Config {
    pub fn is_rule_enabled(&self, id: &str) -> bool {
        !self.disabled_rules.contains(id)
    }
}
