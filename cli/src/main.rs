mod commands;
mod terminal;

use std::collections::BTreeSet;

use commands::{CommandLine, Commands, analyze, rules};
use cfgmap_common::config::Config;
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.quiet);
    print::banner(commands.no_banner, commands.quiet);

    match commands.command {
        Commands::Analyze {
            path,
            json,
            summary,
            jobs,
            skip_rules,
            max_file_size,
        } => {
            let cfg = Config {
                quiet: commands.quiet,
                no_banner: commands.no_banner,
                jobs,
                max_file_bytes: max_file_size,
                disabled_rules: skip_rules.into_iter().collect::<BTreeSet<String>>(),
                json_out: json,
                summary_out: summary,
            };
            print::header("loading configurations", cfg.quiet);
            analyze::analyze(path, cfg).await
        }
        Commands::Rules => {
            rules::rules(commands.quiet);
            Ok(())
        }
    }
}
