//! Error types for shopcheck_core operations.

use crate::fixtures::{FixtureKey, FixtureKind};
use thiserror::Error;

/// Core error type for harness operations.
///
/// Expected API errors (a 401 the case asked for, say) are not represented
/// here: they are asserted through [`crate::Check`]. Everything in this enum
/// is a reason a case could not establish what it set out to check.
#[derive(Error, Debug)]
pub enum HarnessError {
    /// A case read a fixture that no earlier case has written.
    #[error("fixture '{key}' has not been written")]
    MissingFixture {
        /// The absent key
        key: FixtureKey,
    },

    /// A fixture holds a value of a different kind than requested.
    #[error("fixture '{key}' holds a {found} value, expected {expected}")]
    FixtureKind {
        /// The key that was read
        key: FixtureKey,
        /// Kind the caller asked for
        expected: FixtureKind,
        /// Kind actually stored
        found: FixtureKind,
    },

    /// A case touched a fixture it did not declare.
    #[error("case '{case}' {access} undeclared fixture '{key}'")]
    UndeclaredFixture {
        /// Case name
        case: String,
        /// The key touched
        key: FixtureKey,
        /// "read" or "wrote"
        access: &'static str,
    },

    /// A case finished without producing a fixture it declared.
    #[error("case '{case}' declared fixture '{key}' but never wrote it")]
    FixtureNotWritten {
        /// Case name
        case: String,
        /// The key that is still absent
        key: FixtureKey,
    },

    /// A response did not satisfy a check.
    #[error("check failed: {label}: {reasons}")]
    CheckFailed {
        /// Label of the failed check
        label: String,
        /// Every unmet expectation, joined with "; "
        reasons: String,
    },

    /// A response body lacked a field the case needed to extract.
    #[error("response has no usable value at '{pointer}'")]
    MissingField {
        /// JSON pointer that was looked up
        pointer: String,
    },

    /// The request could not be completed at the transport level.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A case reads a key that no earlier case in the plan writes.
    #[error("case '{case}' reads '{key}' but no earlier case writes it")]
    UnsatisfiedDependency {
        /// Case name
        case: String,
        /// The unprovided key
        key: FixtureKey,
    },

    /// Configuration error (loading, parsing, invalid values).
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// A suite name did not match any known suite.
    #[error("unknown suite: {0}")]
    UnknownSuite(String),

    /// The API did not report healthy within the allotted time.
    #[error("API at {url} not healthy after {waited_secs}s")]
    Unhealthy {
        /// Health endpoint polled
        url: String,
        /// Seconds spent waiting
        waited_secs: u64,
    },
}

impl HarnessError {
    /// Returns an operator-facing recovery hint, if one applies.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            Self::MissingFixture {
                key: FixtureKey::OwnerToken,
            } => Some(
                "The owner login did not succeed. Make sure the seed owner account exists in the target system.",
            ),
            Self::MissingFixture { .. } => {
                Some("An earlier case failed to produce this value; fix the first failure in the run.")
            }
            Self::UndeclaredFixture { .. } | Self::FixtureNotWritten { .. } => {
                Some("Update the case's reads/writes declaration to match what its body does.")
            }
            Self::UnsatisfiedDependency { .. } => {
                Some("Move the providing case to an earlier position or include its suite.")
            }
            Self::Transport(_) => {
                Some("Is the API running? Check --base-url or SHOPCHECK_BASE_URL.")
            }
            Self::Unhealthy { .. } => Some("Start the API or raise --wait-for-api."),
            Self::UnknownSuite(_) => Some("Known suites: auth, categories, products, cart, orders."),
            _ => None,
        }
    }
}

/// Convenience Result type for shopcheck_core operations.
pub type Result<T> = std::result::Result<T, HarnessError>;
