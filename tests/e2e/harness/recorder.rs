use shopcheck_core::{CaseResult, CheckRecord, Reporter, RunSummary, Suite, TestCase};

/// Reporter that keeps every event for later inspection.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub suites: Vec<Suite>,
    pub started: Vec<String>,
    pub checks: Vec<CheckRecord>,
    pub notes: Vec<String>,
    pub finished: Vec<String>,
    pub run_finished: bool,
}

impl RecordingReporter {
    pub fn failed_checks(&self) -> impl Iterator<Item = &CheckRecord> {
        self.checks.iter().filter(|c| !c.passed)
    }
}

impl Reporter for RecordingReporter {
    fn suite_started(&mut self, suite: Suite) {
        self.suites.push(suite);
    }

    fn case_started(&mut self, case: &TestCase) {
        self.started.push(case.qualified_name());
    }

    fn check(&mut self, record: &CheckRecord) {
        self.checks.push(record.clone());
    }

    fn note(&mut self, message: &str) {
        self.notes.push(message.to_string());
    }

    fn case_finished(&mut self, result: &CaseResult) {
        self.finished.push(result.name.clone());
    }

    fn run_finished(&mut self, _summary: &RunSummary) {
        self.run_finished = true;
    }
}
