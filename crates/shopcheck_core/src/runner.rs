//! Ordered plan construction, dependency validation and sequential execution.

use crate::case::{CaseContext, CaseKind, CheckRecord, Position, Suite, TestCase};
use crate::client::ApiClient;
use crate::config::HarnessConfig;
use crate::error::{HarnessError, Result};
use crate::fixtures::{FixtureKey, FixtureRegistry, RunIdentity};
use crate::report::Reporter;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::time::Instant;

/// Cases in run order: ascending position, declaration order within a
/// position.
#[derive(Debug, Default)]
pub struct Plan {
    cases: Vec<TestCase>,
}

impl Plan {
    /// Order cases by position. The sort is stable, so cases sharing a
    /// position keep their declaration order.
    pub fn new(mut cases: Vec<TestCase>) -> Self {
        cases.sort_by_key(TestCase::position);
        Self { cases }
    }

    /// Every case of every suite.
    pub fn full() -> Self {
        Self::new(crate::suites::all_cases())
    }

    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Cases grouped by shared position.
    pub fn groups(&self) -> Vec<(Position, &[TestCase])> {
        let mut groups = Vec::new();
        let mut start = 0;
        for i in 1..=self.cases.len() {
            if i == self.cases.len() || self.cases[i].position() != self.cases[start].position() {
                groups.push((self.cases[start].position(), &self.cases[start..i]));
                start = i;
            }
        }
        groups
    }

    /// Keep only the given suites, plus whichever earlier cases provide the
    /// fixtures the kept cases read, transitively.
    pub fn select(self, suites: &[Suite]) -> Self {
        if suites.is_empty() {
            return self;
        }

        let mut keep: Vec<bool> = self
            .cases
            .iter()
            .map(|c| suites.contains(&c.suite()))
            .collect();

        // Walk backwards: a kept case's reads must be provided by an earlier
        // case, and pulling that provider in may add reads of its own.
        for i in (0..self.cases.len()).rev() {
            if !keep[i] {
                continue;
            }
            for key in self.cases[i].read_keys() {
                if (0..i).any(|j| keep[j] && self.cases[j].write_keys().contains(key)) {
                    continue;
                }
                if let Some(provider) =
                    (0..i).rev().find(|&j| self.cases[j].write_keys().contains(key))
                {
                    tracing::debug!(
                        case = %self.cases[i].qualified_name(),
                        provider = %self.cases[provider].qualified_name(),
                        %key,
                        "pulling in fixture provider"
                    );
                    keep[provider] = true;
                }
            }
        }

        let cases = self
            .cases
            .into_iter()
            .zip(keep)
            .filter_map(|(case, kept)| kept.then_some(case))
            .collect();
        Self { cases }
    }

    /// Every problem that would make a case unrunnable regardless of what
    /// the API answers: a read with no earlier writer.
    pub fn dependency_issues(&self) -> Vec<HarnessError> {
        let mut available: HashSet<FixtureKey> = HashSet::new();
        let mut issues = Vec::new();

        for case in &self.cases {
            for key in case.read_keys() {
                if !available.contains(key) && !case.write_keys().contains(key) {
                    issues.push(HarnessError::UnsatisfiedDependency {
                        case: case.qualified_name(),
                        key: *key,
                    });
                }
            }
            available.extend(case.write_keys().iter().copied());
        }
        issues
    }

    /// Fail on the first unsatisfied dependency.
    pub fn validate(&self) -> Result<()> {
        match self.dependency_issues().into_iter().next() {
            Some(issue) => Err(issue),
            None => Ok(()),
        }
    }
}

/// Per-run switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Stop at the first case that does not pass.
    pub fail_fast: bool,
}

/// How a case ended.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    Passed,
    Failed { reason: String },
    /// Not executed: declared reads were absent.
    Blocked { missing: Vec<FixtureKey> },
    /// Not executed: a setup case of the suite failed, or the run stopped.
    Skipped { reason: String },
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passed => write!(f, "passed"),
            Self::Failed { reason } => write!(f, "failed: {}", reason),
            Self::Blocked { missing } => {
                let keys: Vec<&str> = missing.iter().map(|k| k.as_str()).collect();
                write!(f, "blocked on {}", keys.join(", "))
            }
            Self::Skipped { reason } => write!(f, "skipped: {}", reason),
        }
    }
}

/// Recorded outcome of one case.
#[derive(Debug, Clone, Serialize)]
pub struct CaseResult {
    pub suite: Suite,
    pub position: Position,
    pub name: String,
    pub kind: CaseKind,
    #[serde(flatten)]
    pub verdict: Verdict,
    pub checks: Vec<CheckRecord>,
    pub elapsed_ms: u64,
}

/// Every case result of a run, in execution order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub stamp: i64,
    pub results: Vec<CaseResult>,
}

impl RunSummary {
    pub fn passed(&self) -> usize {
        self.count(|v| matches!(v, Verdict::Passed))
    }

    pub fn failed(&self) -> usize {
        self.count(|v| matches!(v, Verdict::Failed { .. }))
    }

    pub fn blocked(&self) -> usize {
        self.count(|v| matches!(v, Verdict::Blocked { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|v| matches!(v, Verdict::Skipped { .. }))
    }

    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.verdict.is_pass())
    }

    /// Result of a case by qualified name (`suite::name`).
    pub fn result(&self, name: &str) -> Option<&CaseResult> {
        self.results.iter().find(|r| r.name == name)
    }

    fn count(&self, pred: impl Fn(&Verdict) -> bool) -> usize {
        self.results.iter().filter(|r| pred(&r.verdict)).count()
    }
}

/// Configured harness: client, config and the run identity captured at
/// construction.
pub struct Harness {
    config: HarnessConfig,
    client: ApiClient,
    identity: RunIdentity,
}

impl Harness {
    /// Validate config, build the client and read the clock for this run.
    pub fn new(config: HarnessConfig) -> Result<Self> {
        let identity = RunIdentity::capture(&config.seed.customer_password);
        Self::with_identity(config, identity)
    }

    pub fn with_identity(config: HarnessConfig, identity: RunIdentity) -> Result<Self> {
        config.validate()?;
        let client = ApiClient::new(&config.api)?;
        Ok(Self {
            config,
            client,
            identity,
        })
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn identity(&self) -> &RunIdentity {
        &self.identity
    }

    /// Execute the plan once, strictly sequentially, with a fresh registry.
    pub fn run(&self, plan: &Plan, reporter: &mut dyn Reporter, options: RunOptions) -> RunSummary {
        let mut fixtures = FixtureRegistry::new();
        let mut summary = RunSummary {
            stamp: self.identity.stamp(),
            results: Vec::with_capacity(plan.len()),
        };
        let mut aborted_suites: BTreeSet<Suite> = BTreeSet::new();
        let mut current_suite = None;
        let mut stopped = false;

        tracing::info!(cases = plan.len(), base_url = %self.client.base_url(), "starting run");

        for case in plan.cases() {
            if current_suite != Some(case.suite()) {
                current_suite = Some(case.suite());
                reporter.suite_started(case.suite());
            }

            let result = if stopped {
                skipped(case, "run stopped after an earlier failure".to_string())
            } else if aborted_suites.contains(&case.suite()) && case.kind() != CaseKind::Cleanup {
                skipped(case, format!("setup of suite '{}' failed", case.suite()))
            } else {
                self.run_case(case, &mut fixtures, reporter)
            };

            if !result.verdict.is_pass() {
                if case.kind() == CaseKind::Setup {
                    tracing::warn!(suite = %case.suite(), case = %result.name, "setup failed, aborting suite");
                    aborted_suites.insert(case.suite());
                }
                if options.fail_fast && !stopped && !matches!(result.verdict, Verdict::Skipped { .. }) {
                    tracing::warn!(case = %result.name, "fail-fast: stopping run");
                    stopped = true;
                }
            }

            reporter.case_finished(&result);
            summary.results.push(result);
        }

        tracing::info!(
            passed = summary.passed(),
            failed = summary.failed(),
            blocked = summary.blocked(),
            skipped = summary.skipped(),
            "run finished"
        );
        reporter.run_finished(&summary);
        summary
    }

    fn run_case(
        &self,
        case: &TestCase,
        fixtures: &mut FixtureRegistry,
        reporter: &mut dyn Reporter,
    ) -> CaseResult {
        let missing: Vec<FixtureKey> = case
            .read_keys()
            .iter()
            .copied()
            .filter(|k| !fixtures.contains(*k))
            .collect();
        if !missing.is_empty() {
            tracing::warn!(case = %case.qualified_name(), ?missing, "case blocked");
            return result(case, Verdict::Blocked { missing }, Vec::new(), 0);
        }

        tracing::debug!(case = %case.qualified_name(), position = %case.position(), "running case");
        reporter.case_started(case);
        let started = Instant::now();

        let mut ctx = CaseContext::new(
            case,
            &self.client,
            &self.config,
            &self.identity,
            fixtures,
            reporter,
        );
        let outcome = case.execute(&mut ctx);
        let checks = ctx.into_records();

        let outcome = outcome.and_then(|()| {
            match case.write_keys().iter().find(|k| !fixtures.contains(**k)) {
                Some(key) => Err(HarnessError::FixtureNotWritten {
                    case: case.qualified_name(),
                    key: *key,
                }),
                None => Ok(()),
            }
        });

        let verdict = match outcome {
            Ok(()) => Verdict::Passed,
            Err(e) => {
                tracing::debug!(case = %case.qualified_name(), error = %e, "case failed");
                Verdict::Failed {
                    reason: e.to_string(),
                }
            }
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;
        result(case, verdict, checks, elapsed_ms)
    }
}

fn skipped(case: &TestCase, reason: String) -> CaseResult {
    result(case, Verdict::Skipped { reason }, Vec::new(), 0)
}

fn result(case: &TestCase, verdict: Verdict, checks: Vec<CheckRecord>, elapsed_ms: u64) -> CaseResult {
    CaseResult {
        suite: case.suite(),
        position: case.position(),
        name: case.qualified_name(),
        kind: case.kind(),
        verdict,
        checks,
        elapsed_ms,
    }
}
