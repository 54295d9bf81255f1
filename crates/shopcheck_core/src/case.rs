//! Test case descriptors and the context a case body runs in.

use crate::check::Check;
use crate::client::{ApiClient, ApiResponse, ResponseBody};
use crate::config::HarnessConfig;
use crate::error::{HarnessError, Result};
use crate::fixtures::{FixtureKey, FixtureRegistry, FixtureValue, RunIdentity};
use crate::report::Reporter;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Domain suites, in global run order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Suite {
    Auth,
    Categories,
    Products,
    Cart,
    Orders,
}

impl Suite {
    pub const ALL: [Suite; 5] = [
        Suite::Auth,
        Suite::Categories,
        Suite::Products,
        Suite::Cart,
        Suite::Orders,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Categories => "categories",
            Self::Products => "products",
            Self::Cart => "cart",
            Self::Orders => "orders",
        }
    }
}

impl fmt::Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Suite {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self> {
        Suite::ALL
            .into_iter()
            .find(|suite| suite.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| HarnessError::UnknownSuite(s.to_string()))
    }
}

/// Run position of a case, a decimal with up to three fractional digits.
/// `14.5` is `Position::at(14, 500)` and sorts between 14 and 15; `14.25`
/// is `Position::at(14, 250)`. Cases sharing a position run together in
/// declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    major: u32,
    /// Fraction in thousandths, always below 1000.
    thousandths: u16,
}

impl Position {
    pub const fn new(major: u32) -> Self {
        Self {
            major,
            thousandths: 0,
        }
    }

    /// `thousandths` must be below 1000.
    pub const fn at(major: u32, thousandths: u16) -> Self {
        assert!(thousandths < 1000, "position fraction is in thousandths");
        Self { major, thousandths }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.thousandths == 0 {
            return write!(f, "{}", self.major);
        }
        let fraction = format!("{:03}", self.thousandths);
        write!(f, "{}.{}", self.major, fraction.trim_end_matches('0'))
    }
}

impl Serialize for Position {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Role of a case within its suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseKind {
    /// Acquires prerequisite state; its failure aborts the rest of the suite.
    Setup,
    /// Asserts API behaviour.
    Check,
    /// Deletes what the suite created; attempted even after a setup failure.
    Cleanup,
}

type CaseBody = Box<dyn Fn(&mut CaseContext<'_>) -> Result<()> + Send + Sync>;

/// A statically defined, ordered test case.
pub struct TestCase {
    suite: Suite,
    position: Position,
    name: String,
    kind: CaseKind,
    reads: Vec<FixtureKey>,
    writes: Vec<FixtureKey>,
    body: CaseBody,
}

impl TestCase {
    /// Create a check case with an empty body.
    pub fn new(suite: Suite, position: Position, name: &str) -> Self {
        Self {
            suite,
            position,
            name: name.to_string(),
            kind: CaseKind::Check,
            reads: Vec::new(),
            writes: Vec::new(),
            body: Box::new(|_| Ok(())),
        }
    }

    pub fn setup(mut self) -> Self {
        self.kind = CaseKind::Setup;
        self
    }

    pub fn cleanup(mut self) -> Self {
        self.kind = CaseKind::Cleanup;
        self
    }

    /// Declare fixture keys this case requires.
    pub fn reads(mut self, keys: &[FixtureKey]) -> Self {
        self.reads.extend_from_slice(keys);
        self
    }

    /// Declare fixture keys this case publishes.
    pub fn writes(mut self, keys: &[FixtureKey]) -> Self {
        self.writes.extend_from_slice(keys);
        self
    }

    pub fn body<F>(mut self, body: F) -> Self
    where
        F: Fn(&mut CaseContext<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.body = Box::new(body);
        self
    }

    pub fn suite(&self) -> Suite {
        self.suite
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `suite::name`, unique within a plan.
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.suite, self.name)
    }

    pub fn kind(&self) -> CaseKind {
        self.kind
    }

    pub fn read_keys(&self) -> &[FixtureKey] {
        &self.reads
    }

    pub fn write_keys(&self) -> &[FixtureKey] {
        &self.writes
    }

    pub(crate) fn execute(&self, ctx: &mut CaseContext<'_>) -> Result<()> {
        (self.body)(ctx)
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("suite", &self.suite)
            .field("position", &self.position)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("reads", &self.reads)
            .field("writes", &self.writes)
            .finish_non_exhaustive()
    }
}

/// Outcome of one [`CaseContext::verify`] call.
#[derive(Debug, Clone, Serialize)]
pub struct CheckRecord {
    pub label: String,
    pub passed: bool,
    pub status: u16,
    pub body: ResponseBody,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<String>,
}

/// Everything a case body can reach while it runs.
///
/// Fixture access is checked against the case's declaration: reads must be
/// declared in `reads` or `writes`, writes must be declared in `writes`.
pub struct CaseContext<'a> {
    case: &'a TestCase,
    client: &'a ApiClient,
    config: &'a HarnessConfig,
    identity: &'a RunIdentity,
    fixtures: &'a mut FixtureRegistry,
    reporter: &'a mut dyn Reporter,
    records: Vec<CheckRecord>,
}

impl<'a> CaseContext<'a> {
    pub(crate) fn new(
        case: &'a TestCase,
        client: &'a ApiClient,
        config: &'a HarnessConfig,
        identity: &'a RunIdentity,
        fixtures: &'a mut FixtureRegistry,
        reporter: &'a mut dyn Reporter,
    ) -> Self {
        Self {
            case,
            client,
            config,
            identity,
            fixtures,
            reporter,
            records: Vec::new(),
        }
    }

    pub fn api(&self) -> &ApiClient {
        self.client
    }

    pub fn config(&self) -> &HarnessConfig {
        self.config
    }

    pub fn identity(&self) -> &RunIdentity {
        self.identity
    }

    pub fn text(&self, key: FixtureKey) -> Result<String> {
        self.ensure_readable(key)?;
        self.fixtures.text(key).map(str::to_string)
    }

    pub fn count(&self, key: FixtureKey) -> Result<u64> {
        self.ensure_readable(key)?;
        self.fixtures.count(key)
    }

    pub fn amount(&self, key: FixtureKey) -> Result<f64> {
        self.ensure_readable(key)?;
        self.fixtures.amount(key)
    }

    /// Publish a fixture for later cases.
    pub fn set(&mut self, key: FixtureKey, value: impl Into<FixtureValue>) -> Result<()> {
        if !self.case.writes.contains(&key) {
            return Err(self.undeclared(key, "wrote"));
        }
        self.fixtures.set(key, value);
        Ok(())
    }

    /// Evaluate `check` against `res`, report the outcome, and fail the case
    /// if any expectation does not hold.
    pub fn verify(&mut self, label: &str, res: &ApiResponse, check: Check) -> Result<()> {
        let failures = check.evaluate(res);
        let record = CheckRecord {
            label: label.to_string(),
            passed: failures.is_empty(),
            status: res.status,
            body: res.body.clone(),
            failures,
        };
        self.reporter.check(&record);

        let outcome = if record.passed {
            Ok(())
        } else {
            Err(HarnessError::CheckFailed {
                label: record.label.clone(),
                reasons: record.failures.join("; "),
            })
        };
        self.records.push(record);
        outcome
    }

    /// Free-form progress line in the report.
    pub fn note(&mut self, message: &str) {
        self.reporter.note(message);
    }

    pub(crate) fn into_records(self) -> Vec<CheckRecord> {
        self.records
    }

    fn ensure_readable(&self, key: FixtureKey) -> Result<()> {
        if self.case.reads.contains(&key) || self.case.writes.contains(&key) {
            Ok(())
        } else {
            Err(self.undeclared(key, "read"))
        }
    }

    fn undeclared(&self, key: FixtureKey, access: &'static str) -> HarnessError {
        HarnessError::UndeclaredFixture {
            case: self.case.qualified_name(),
            key,
            access,
        }
    }
}
