use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use colored::*;

use crate::{mprint, terminal::{colors, format, print, spinner}};
use cfgmap_common::{config::Config, error::AnalysisError, info, success};
use cfgmap_common::model::issue::{IssueSubject, Severity};
use cfgmap_core::{AnalysisReport, AnalysisSession, inputs::discover_inputs};

pub async fn analyze(path: PathBuf, cfg: Config) -> anyhow::Result<()> {
    let inputs = discover_inputs(&path)
        .with_context(|| format!("cannot collect configurations from {}", path.display()))?;
    let total = inputs.len();
    info!("Found {total} configuration file(s) in {}", path.display());

    spinner::start_analysis(total);
    let start_time: Instant = Instant::now();
    let session = AnalysisSession::new(cfg.clone())
        .with_progress(Arc::new(move |done| spinner::report_parse_progress(done, total)));
    let result = tokio::task::spawn_blocking(move || session.run_inputs(inputs))
        .await
        .context("analysis worker stopped unexpectedly")?;
    spinner::finish();

    let report = match result {
        Ok(report) => report,
        Err(err @ AnalysisError::NoUsableInput { .. }) => {
            print::header("nothing to analyze", cfg.quiet);
            print::no_results();
            return Err(err.into());
        }
        Err(err) => return Err(err.into()),
    };

    analysis_ends(&report, start_time.elapsed(), &cfg);
    write_outputs(&report, &cfg)
}

fn analysis_ends(report: &AnalysisReport, total_time: Duration, cfg: &Config) {
    if cfg.quiet > 0 {
        mprint!();
    }

    if cfg.quiet < 2 {
        print::header("devices", cfg.quiet);
        print_devices(report);
        print_file_failures(report, cfg);
        print::header("topology", cfg.quiet);
        print_topology(report);
    }

    print_summary(report, total_time, cfg);
}

fn print_devices(report: &AnalysisReport) {
    let devices = report.devices();
    for (idx, device) in devices.iter().enumerate() {
        print::tree_head(idx, &device.hostname);
        let issues: Vec<String> = report.issues_for(&device.hostname).map(format::issue_line).collect();
        print::as_tree_one_level(format::device_details(device, issues.len()));
        print::as_list(&issues);

        if idx + 1 != devices.len() {
            mprint!();
        }
    }
}

fn print_file_failures(report: &AnalysisReport, cfg: &Config) {
    let failures: Vec<String> = report
        .issues_by_subject()
        .into_iter()
        .filter_map(|(subject, issues)| match subject {
            IssueSubject::File(path) => Some((path, issues)),
            IssueSubject::Device(_) => None,
        })
        .flat_map(|(path, issues)| {
            issues.into_iter().map(move |issue| {
                format!("{} {}", path.display().to_string().color(colors::PRIMARY), format::issue_line(issue))
            })
        })
        .collect();

    if failures.is_empty() {
        return;
    }
    print::header("skipped files", cfg.quiet);
    print::as_list(&failures);
}

fn print_topology(report: &AnalysisReport) {
    let topology = report.topology();
    let links: Vec<String> = topology.links().iter().map(format::link_line).collect();
    let segments: Vec<String> = topology.segments().iter().map(format::segment_line).collect();

    if links.is_empty() && segments.is_empty() {
        print::print_status("no inferred connections".color(colors::UNKNOWN).to_string());
        return;
    }

    if !links.is_empty() {
        print::print_status(format!("{} link(s)", links.len()));
        print::as_list(&links);
    }
    if !segments.is_empty() {
        print::print_status(format!("{} shared segment(s)", segments.len()));
        print::as_list(&segments);
    }

    let isolated = report.summary().isolated_devices;
    if !isolated.is_empty() {
        let names = isolated.join(", ").color(colors::UNKNOWN);
        print::print_status(format!("isolated: {names}"));
    }
}

fn print_summary(report: &AnalysisReport, total_time: Duration, cfg: &Config) {
    let summary = report.summary();
    let devices: ColoredString = format!("{} devices", summary.devices_parsed).bold().green();
    let errors: ColoredString = format!("{} errors", summary.issues(Severity::Error)).bold().red();
    let warnings: ColoredString = format!("{} warnings", summary.issues(Severity::Warning)).bold().yellow();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: &ColoredString = &format!("Analysis Complete: {devices}, {errors}, {warnings} in {total_time}")
        .color(colors::TEXT_DEFAULT);

    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(output);
        }
        _ => {
            mprint!();
            success!("{}", output)
        }
    }
}

fn write_outputs(report: &AnalysisReport, cfg: &Config) -> anyhow::Result<()> {
    if let Some(path) = &cfg.json_out {
        let json = serde_json::to_string_pretty(report).context("cannot serialize the report")?;
        write_file(path, &json)?;
        success!("JSON report written to {}", path.display());
    }

    if let Some(path) = &cfg.summary_out {
        write_file(path, &report.summary().to_string())?;
        success!("Validation summary written to {}", path.display());
    }

    Ok(())
}

fn write_file(path: &Path, contents: &str) -> anyhow::Result<()> {
    fs::write(path, contents).with_context(|| format!("cannot write {}", path.display()))
}
