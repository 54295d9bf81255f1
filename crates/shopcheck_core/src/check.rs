//! Declarative expectations on an [`ApiResponse`].
//!
//! A [`Check`] is a conjunction: it holds when every [`Expect`] holds.

use crate::client::ApiResponse;
use serde_json::Value;
use std::fmt;

/// Tolerance used when comparing JSON numbers against computed amounts.
const AMOUNT_EPSILON: f64 = 1e-6;

/// A single expectation on a response.
#[derive(Debug, Clone, PartialEq)]
pub enum Expect {
    /// Exact status code.
    Status(u16),
    /// Envelope `success` is `true`.
    Success,
    /// Exact `error.code`.
    ErrorCode(String),
    /// `error.message` contains the fragment.
    MessageContains(String),
    /// `error.message` equals the text.
    MessageEquals(String),
    /// A value exists at the pointer.
    Present(String),
    /// Value at the pointer equals the JSON value.
    Equals { pointer: String, value: Value },
    /// Value at the pointer exists and differs from the JSON value.
    NotEquals { pointer: String, value: Value },
    /// Number at the pointer equals the amount, within a small tolerance.
    Amount { pointer: String, value: f64 },
    /// Number at the pointer is at least `min`.
    AtLeast { pointer: String, min: f64 },
    /// Array at the pointer has exactly `len` elements.
    Len { pointer: String, len: usize },
}

impl fmt::Display for Expect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "status {}", code),
            Self::Success => write!(f, "success == true"),
            Self::ErrorCode(code) => write!(f, "error.code == {}", code),
            Self::MessageContains(s) => write!(f, "error.message contains {:?}", s),
            Self::MessageEquals(s) => write!(f, "error.message == {:?}", s),
            Self::Present(p) => write!(f, "{} present", p),
            Self::Equals { pointer, value } => write!(f, "{} == {}", pointer, value),
            Self::NotEquals { pointer, value } => write!(f, "{} != {}", pointer, value),
            Self::Amount { pointer, value } => write!(f, "{} == {}", pointer, value),
            Self::AtLeast { pointer, min } => write!(f, "{} >= {}", pointer, min),
            Self::Len { pointer, len } => write!(f, "len({}) == {}", pointer, len),
        }
    }
}

impl Expect {
    /// Evaluate against a response, describing the mismatch on failure.
    pub fn evaluate(&self, res: &ApiResponse) -> Result<(), String> {
        match self {
            Self::Status(expected) => {
                if res.status == *expected {
                    Ok(())
                } else {
                    Err(format!("expected status {}, got {}", expected, res.status))
                }
            }
            Self::Success => match res.success() {
                Some(true) => Ok(()),
                other => Err(format!("expected success == true, got {:?}", other)),
            },
            Self::ErrorCode(expected) => match res.error_code() {
                Some(code) if code == expected => Ok(()),
                other => Err(format!("expected error.code {}, got {:?}", expected, other)),
            },
            Self::MessageContains(fragment) => match res.error_message() {
                Some(message) if message.contains(fragment.as_str()) => Ok(()),
                other => Err(format!(
                    "expected error.message containing {:?}, got {:?}",
                    fragment, other
                )),
            },
            Self::MessageEquals(expected) => match res.error_message() {
                Some(message) if message == expected => Ok(()),
                other => Err(format!(
                    "expected error.message {:?}, got {:?}",
                    expected, other
                )),
            },
            Self::Present(pointer) => match res.pointer(pointer) {
                Some(_) => Ok(()),
                None => Err(format!("expected a value at {}", pointer)),
            },
            Self::Equals { pointer, value } => match res.pointer(pointer) {
                Some(actual) if json_eq(actual, value) => Ok(()),
                other => Err(format!("expected {} == {}, got {}", pointer, value, show(other))),
            },
            Self::NotEquals { pointer, value } => match res.pointer(pointer) {
                Some(actual) if !json_eq(actual, value) => Ok(()),
                other => Err(format!("expected {} != {}, got {}", pointer, value, show(other))),
            },
            Self::Amount { pointer, value } => match res.pointer(pointer).and_then(Value::as_f64) {
                Some(actual) if (actual - value).abs() < AMOUNT_EPSILON => Ok(()),
                _ => Err(format!(
                    "expected {} == {}, got {}",
                    pointer,
                    value,
                    show(res.pointer(pointer))
                )),
            },
            Self::AtLeast { pointer, min } => match res.pointer(pointer).and_then(Value::as_f64) {
                Some(actual) if actual >= *min => Ok(()),
                _ => Err(format!(
                    "expected {} >= {}, got {}",
                    pointer,
                    min,
                    show(res.pointer(pointer))
                )),
            },
            Self::Len { pointer, len } => match res.pointer(pointer).and_then(Value::as_array) {
                Some(items) if items.len() == *len => Ok(()),
                Some(items) => Err(format!(
                    "expected {} to have {} element(s), got {}",
                    pointer,
                    len,
                    items.len()
                )),
                None => Err(format!("expected an array at {}", pointer)),
            },
        }
    }
}

/// Numbers compare by value so that `21` and `21.0` are equal.
fn json_eq(actual: &Value, expected: &Value) -> bool {
    match (actual.as_f64(), expected.as_f64()) {
        (Some(a), Some(b)) if actual.is_number() && expected.is_number() => {
            (a - b).abs() < AMOUNT_EPSILON
        }
        _ => actual == expected,
    }
}

fn show(value: Option<&Value>) -> String {
    value.map_or_else(|| "nothing".to_string(), Value::to_string)
}

/// Fluent conjunction of expectations, always anchored on a status code.
#[derive(Debug, Clone, PartialEq)]
pub struct Check {
    expectations: Vec<Expect>,
}

impl Check {
    /// Start a check expecting the given status code.
    pub fn status(code: u16) -> Self {
        Self {
            expectations: vec![Expect::Status(code)],
        }
    }

    /// Append an arbitrary expectation.
    pub fn expect(mut self, expect: Expect) -> Self {
        self.expectations.push(expect);
        self
    }

    pub fn success(self) -> Self {
        self.expect(Expect::Success)
    }

    pub fn error_code(self, code: &str) -> Self {
        self.expect(Expect::ErrorCode(code.to_string()))
    }

    pub fn message_contains(self, fragment: &str) -> Self {
        self.expect(Expect::MessageContains(fragment.to_string()))
    }

    pub fn message_equals(self, message: &str) -> Self {
        self.expect(Expect::MessageEquals(message.to_string()))
    }

    pub fn present(self, pointer: &str) -> Self {
        self.expect(Expect::Present(pointer.to_string()))
    }

    pub fn equals(self, pointer: &str, value: impl Into<Value>) -> Self {
        self.expect(Expect::Equals {
            pointer: pointer.to_string(),
            value: value.into(),
        })
    }

    pub fn not_equals(self, pointer: &str, value: impl Into<Value>) -> Self {
        self.expect(Expect::NotEquals {
            pointer: pointer.to_string(),
            value: value.into(),
        })
    }

    pub fn amount(self, pointer: &str, value: f64) -> Self {
        self.expect(Expect::Amount {
            pointer: pointer.to_string(),
            value,
        })
    }

    pub fn at_least(self, pointer: &str, min: f64) -> Self {
        self.expect(Expect::AtLeast {
            pointer: pointer.to_string(),
            min,
        })
    }

    pub fn len(self, pointer: &str, len: usize) -> Self {
        self.expect(Expect::Len {
            pointer: pointer.to_string(),
            len,
        })
    }

    pub fn expectations(&self) -> &[Expect] {
        &self.expectations
    }

    /// Evaluate every expectation; the result lists all that failed.
    pub fn evaluate(&self, res: &ApiResponse) -> Vec<String> {
        self.expectations
            .iter()
            .filter_map(|e| e.evaluate(res).err())
            .collect()
    }
}
