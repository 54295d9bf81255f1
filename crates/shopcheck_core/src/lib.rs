//! shopcheck core library
//!
//! An ordered, stateful contract harness for an e-commerce REST API:
//! - Typed fixture registry shared between ordered cases
//! - Blocking HTTP client with envelope-aware responses
//! - Declarative response checks with a printed pass/fail trail
//! - Position-ordered plans with declared fixture dependencies
//!
//! # Quick Start
//!
//! ```no_run
//! use shopcheck_core::{ConsoleReporter, Harness, HarnessConfig, Plan, RunOptions};
//!
//! let harness = Harness::new(HarnessConfig::default())?;
//! let plan = Plan::full();
//! plan.validate()?;
//!
//! let summary = harness.run(&plan, &mut ConsoleReporter::stdout(), RunOptions::default());
//! assert!(summary.all_passed());
//! # Ok::<(), shopcheck_core::HarnessError>(())
//! ```
//!
//! # Writing cases
//!
//! A case declares what it reads and writes; the runner blocks it when a
//! read is absent and fails it when a declared write never happened.
//!
//! ```
//! use shopcheck_core::{Check, FixtureKey, Position, Suite, TestCase};
//!
//! let case = TestCase::new(Suite::Auth, Position::new(3), "current user")
//!     .reads(&[FixtureKey::UserToken])
//!     .body(|ctx| {
//!         let token = ctx.text(FixtureKey::UserToken)?;
//!         let res = ctx.api().get("/auth/me").bearer(&token).send()?;
//!         ctx.verify("Get Me: Success (200)", &res, Check::status(200).success())
//!     });
//! assert_eq!(case.qualified_name(), "auth::current user");
//! ```

mod case;
mod check;
mod client;
mod config;
mod error;
mod fixtures;
mod report;
mod runner;
mod suites;

pub use case::{CaseContext, CaseKind, CheckRecord, Position, Suite, TestCase};
pub use check::{Check, Expect};
pub use client::{ApiClient, ApiRequest, ApiResponse, ResponseBody};
pub use config::{
    ApiConfig, HarnessConfig, RunConfig, SeedConfig, CONFIG_FILE, ENV_BASE_URL, ENV_OWNER_EMAIL,
    ENV_OWNER_PASSWORD,
};
pub use error::{HarnessError, Result};
pub use fixtures::{FixtureKey, FixtureKind, FixtureRegistry, FixtureValue, RunIdentity, UserPayload};
pub use report::{
    render_case, render_check, render_suite_header, render_summary, ConsoleReporter, Reporter,
};
pub use runner::{CaseResult, Harness, Plan, RunOptions, RunSummary, Verdict};
pub use suites::{all_cases, NONEXISTENT_ID};
