pub mod analyze;
pub mod rules;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use cfgmap_common::config::DEFAULT_MAX_FILE_BYTES;

#[derive(Parser)]
#[command(name = "cfgmap")]
#[command(version)]
#[command(about = "Offline analyzer for router and switch configurations.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Reduce output, repeat for less (-q, -qq)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub quiet: u8,

    /// Do not print the banner
    #[arg(long, global = true)]
    pub no_banner: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse, validate and map a file or a directory of configurations
    #[command(alias = "a")]
    Analyze {
        /// A configuration file or a directory of them
        path: PathBuf,

        /// Write a JSON snapshot of devices, issues and topology
        #[arg(long, value_name = "FILE")]
        json: Option<PathBuf>,

        /// Write the plain-text validation summary
        #[arg(long, value_name = "FILE")]
        summary: Option<PathBuf>,

        /// Worker threads, defaults to one per core
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Rule id to skip, may be repeated
        #[arg(long = "skip-rule", value_name = "ID")]
        skip_rules: Vec<String>,

        /// Files larger than this many bytes are skipped
        #[arg(long, default_value_t = DEFAULT_MAX_FILE_BYTES)]
        max_file_size: u64,
    },
    /// List the validation rules
    #[command(alias = "r")]
    Rules,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
