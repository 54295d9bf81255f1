//! Human-readable pass/fail trail.
//!
//! Reporting is separate from logging: `tracing` carries diagnostics for
//! the operator, a [`Reporter`] carries the per-check verdict lines that are
//! the harness's second required output next to the assertions themselves.

use crate::case::{CheckRecord, Suite, TestCase};
use crate::runner::{CaseResult, RunSummary, Verdict};
use console::style;
use std::io::Write;

/// Receives run events in execution order.
pub trait Reporter {
    fn suite_started(&mut self, _suite: Suite) {}

    fn case_started(&mut self, _case: &TestCase) {}

    /// Called once per `verify`, passed or not.
    fn check(&mut self, record: &CheckRecord);

    fn note(&mut self, _message: &str) {}

    fn case_finished(&mut self, _result: &CaseResult) {}

    fn run_finished(&mut self, _summary: &RunSummary) {}
}

const SEPARATOR: &str = "------------------------------";

/// Lines for one check: verdict with status; on failure the body (decoded
/// JSON or raw text) and every unmet expectation.
pub fn render_check(record: &CheckRecord) -> Vec<String> {
    let mut lines = Vec::new();
    if record.passed {
        lines.push(format!(
            "{} PASSED: {} (Status: {})",
            style("✓").green(),
            record.label,
            record.status
        ));
    } else {
        lines.push(format!(
            "{} FAILED: {} (Status: {})",
            style("×").red(),
            style(&record.label).red(),
            record.status
        ));
        lines.push(format!("   Response: {}", record.body));
        for failure in &record.failures {
            lines.push(format!("   - {}", failure));
        }
    }
    lines.push(SEPARATOR.to_string());
    lines
}

/// Lines for a finished case, when its outcome is not already visible
/// through its check lines.
pub fn render_case(result: &CaseResult) -> Vec<String> {
    match &result.verdict {
        Verdict::Passed => Vec::new(),
        Verdict::Failed { reason } => {
            if result.checks.iter().any(|c| !c.passed) {
                Vec::new()
            } else {
                vec![
                    format!(
                        "{} FAILED: {} ({})",
                        style("×").red(),
                        style(&result.name).red(),
                        reason
                    ),
                    SEPARATOR.to_string(),
                ]
            }
        }
        Verdict::Blocked { missing } => {
            let keys: Vec<&str> = missing.iter().map(|k| k.as_str()).collect();
            vec![
                format!(
                    "{} BLOCKED: {} (missing fixture: {})",
                    style("⊘").yellow(),
                    result.name,
                    keys.join(", ")
                ),
                SEPARATOR.to_string(),
            ]
        }
        Verdict::Skipped { reason } => vec![format!(
            "{} SKIPPED: {} ({})",
            style("-").dim(),
            result.name,
            reason
        )],
    }
}

pub fn render_suite_header(suite: Suite) -> String {
    format!("\n--- Running {} suite ---", style(suite).bold())
}

pub fn render_summary(summary: &RunSummary) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        format!("{}", style("Run Summary:").bold()),
        format!("  Passed:   {}", style(summary.passed()).green()),
        format!("  Failed:   {}", style(summary.failed()).red()),
        format!("  Blocked:  {}", style(summary.blocked()).yellow()),
        format!("  Skipped:  {}", summary.skipped()),
        format!("  Total:    {}", summary.results.len()),
    ];
    for result in summary.results.iter().filter(|r| !r.verdict.is_pass()) {
        lines.push(format!(
            "    {} [{}] {}: {}",
            style("×").red(),
            result.position,
            result.name,
            result.verdict
        ));
    }
    lines
}

/// Writes the trail to any `Write` sink, stdout by default.
pub struct ConsoleReporter<W: Write = std::io::Stdout> {
    out: W,
}

impl ConsoleReporter {
    pub fn stdout() -> Self {
        Self {
            out: std::io::stdout(),
        }
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, lines: &[String]) {
        for line in lines {
            // A closed stdout must not abort the run.
            let _ = writeln!(self.out, "{}", line);
        }
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn suite_started(&mut self, suite: Suite) {
        self.emit(&[render_suite_header(suite)]);
    }

    fn check(&mut self, record: &CheckRecord) {
        self.emit(&render_check(record));
    }

    fn note(&mut self, message: &str) {
        self.emit(&[format!("  {}", style(message).dim())]);
    }

    fn case_finished(&mut self, result: &CaseResult) {
        self.emit(&render_case(result));
    }

    fn run_finished(&mut self, summary: &RunSummary) {
        self.emit(&render_summary(summary));
    }
}
