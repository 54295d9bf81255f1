//! Plan execution command.

use super::{parse_suites, with_hint};
use crate::OutputFormat;
use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use shopcheck_core::{
    render_case, render_check, render_suite_header, render_summary, CaseResult, CheckRecord,
    Harness, HarnessConfig, HarnessError, Plan, Reporter, RunOptions, RunSummary, Suite, TestCase,
    Verdict,
};
use std::time::Duration;

/// Drives a progress bar and prints the trail above it.
struct ProgressReporter {
    pb: ProgressBar,
    trail: bool,
}

impl ProgressReporter {
    fn new(len: usize, trail: bool) -> Result<Self> {
        let pb = ProgressBar::new(len as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")?
                .progress_chars("=> "),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        Ok(Self { pb, trail })
    }

    /// Print to stdout with the bar cleared. A hidden bar (stderr not a
    /// terminal) runs the closure directly, so the trail is never dropped.
    fn print(&self, lines: &[String]) {
        if self.trail {
            self.pb.suspend(|| {
                for line in lines {
                    println!("{}", line);
                }
            });
        }
    }
}

impl Reporter for ProgressReporter {
    fn suite_started(&mut self, suite: Suite) {
        self.print(&[render_suite_header(suite)]);
    }

    fn case_started(&mut self, case: &TestCase) {
        self.pb.set_message(case.qualified_name());
    }

    fn check(&mut self, record: &CheckRecord) {
        self.print(&render_check(record));
    }

    fn note(&mut self, message: &str) {
        self.print(&[format!("  {}", style(message).dim())]);
    }

    fn case_finished(&mut self, result: &CaseResult) {
        self.print(&render_case(result));
        self.pb.inc(1);
    }

    fn run_finished(&mut self, _summary: &RunSummary) {
        self.pb.finish_and_clear();
    }
}

fn first_blocked_hint(summary: &RunSummary) -> Option<&'static str> {
    summary.results.iter().find_map(|r| match &r.verdict {
        Verdict::Blocked { missing } => missing
            .first()
            .and_then(|key| HarnessError::MissingFixture { key: *key }.recovery_suggestion()),
        _ => None,
    })
}

/// Run the selected plan and report every case.
pub fn run(
    mut config: HarnessConfig,
    suites: &[String],
    fail_fast: bool,
    format: OutputFormat,
    wait_for_api: Option<u64>,
) -> Result<()> {
    config.run.fail_fast |= fail_fast;
    let options = RunOptions {
        fail_fast: config.run.fail_fast,
    };

    let plan = Plan::full().select(&parse_suites(suites)?);
    plan.validate().map_err(with_hint)?;

    let harness = Harness::new(config).map_err(with_hint)?;
    if let Some(secs) = wait_for_api {
        harness
            .client()
            .wait_until_healthy(Duration::from_secs(secs))
            .map_err(with_hint)?;
    }

    tracing::info!(stamp = harness.identity().stamp(), "run identity captured");

    let mut reporter = ProgressReporter::new(plan.len(), format == OutputFormat::Text)?;
    let summary = harness.run(&plan, &mut reporter, options);

    match format {
        OutputFormat::Text => {
            for line in render_summary(&summary) {
                println!("{}", line);
            }
            if let Some(hint) = first_blocked_hint(&summary) {
                println!();
                println!("{}", style(hint).yellow());
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&summary).context("serializing run summary")?;
            println!("{}", json);
        }
    }

    if summary.all_passed() {
        Ok(())
    } else {
        anyhow::bail!(
            "{} of {} case(s) did not pass",
            summary.results.len() - summary.passed(),
            summary.results.len()
        )
    }
}
