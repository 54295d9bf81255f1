//! Shared fixture state passed between ordered cases.
//!
//! The registry is owned by a single run and handed to each case by
//! `&mut`; the set of keys a run may ever hold is the [`FixtureKey`] enum.

use crate::error::{HarnessError, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Every value a case may publish for later cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FixtureKey {
    /// Token of the per-run test user (auth suite).
    UserToken,
    /// Token of the seed owner account, exchanged once by the categories suite.
    OwnerToken,
    CategoryId,
    CategorySlug,
    ProductCustomerToken,
    ProductCategoryId,
    ProductId,
    ProductSlug,
    SecondProductId,
    CartCategoryId,
    CartProductId,
    CartProductStock,
    CartProductPrice,
    CartItemId,
    OrderCategoryId,
    OrderProductId,
    OrderProductSlug,
    OrderProductStock,
    OrderCustomerToken,
    OrderId,
}

impl FixtureKey {
    /// Stable snake_case name, used in reports and errors.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UserToken => "user_token",
            Self::OwnerToken => "owner_token",
            Self::CategoryId => "category_id",
            Self::CategorySlug => "category_slug",
            Self::ProductCustomerToken => "product_customer_token",
            Self::ProductCategoryId => "product_category_id",
            Self::ProductId => "product_id",
            Self::ProductSlug => "product_slug",
            Self::SecondProductId => "second_product_id",
            Self::CartCategoryId => "cart_category_id",
            Self::CartProductId => "cart_product_id",
            Self::CartProductStock => "cart_product_stock",
            Self::CartProductPrice => "cart_product_price",
            Self::CartItemId => "cart_item_id",
            Self::OrderCategoryId => "order_category_id",
            Self::OrderProductId => "order_product_id",
            Self::OrderProductSlug => "order_product_slug",
            Self::OrderProductStock => "order_product_stock",
            Self::OrderCustomerToken => "order_customer_token",
            Self::OrderId => "order_id",
        }
    }
}

impl fmt::Display for FixtureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind tag of a [`FixtureValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureKind {
    Text,
    Count,
    Amount,
}

impl fmt::Display for FixtureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Count => f.write_str("count"),
            Self::Amount => f.write_str("amount"),
        }
    }
}

/// A value stored in the registry.
#[derive(Debug, Clone, PartialEq)]
pub enum FixtureValue {
    /// Tokens, identifiers, slugs.
    Text(String),
    /// Stock levels and other non-negative integers.
    Count(u64),
    /// Prices.
    Amount(f64),
}

impl FixtureValue {
    pub fn kind(&self) -> FixtureKind {
        match self {
            Self::Text(_) => FixtureKind::Text,
            Self::Count(_) => FixtureKind::Count,
            Self::Amount(_) => FixtureKind::Amount,
        }
    }
}

impl From<String> for FixtureValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for FixtureValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<u64> for FixtureValue {
    fn from(value: u64) -> Self {
        Self::Count(value)
    }
}

impl From<f64> for FixtureValue {
    fn from(value: f64) -> Self {
        Self::Amount(value)
    }
}

/// Mutable key/value store shared by the cases of one run.
#[derive(Debug, Default)]
pub struct FixtureRegistry {
    values: BTreeMap<FixtureKey, FixtureValue>,
}

impl FixtureRegistry {
    /// Create an empty registry. Every key starts absent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value, replacing any previous one.
    pub fn set(&mut self, key: FixtureKey, value: impl Into<FixtureValue>) {
        let value = value.into();
        tracing::debug!(%key, kind = %value.kind(), "fixture written");
        self.values.insert(key, value);
    }

    /// Whether the key has been written.
    pub fn contains(&self, key: FixtureKey) -> bool {
        self.values.contains_key(&key)
    }

    /// Raw access to a stored value.
    pub fn get(&self, key: FixtureKey) -> Result<&FixtureValue> {
        self.values
            .get(&key)
            .ok_or(HarnessError::MissingFixture { key })
    }

    /// Read a text fixture.
    pub fn text(&self, key: FixtureKey) -> Result<&str> {
        match self.get(key)? {
            FixtureValue::Text(s) => Ok(s),
            other => Err(kind_error(key, FixtureKind::Text, other)),
        }
    }

    /// Read a count fixture.
    pub fn count(&self, key: FixtureKey) -> Result<u64> {
        match self.get(key)? {
            FixtureValue::Count(n) => Ok(*n),
            other => Err(kind_error(key, FixtureKind::Count, other)),
        }
    }

    /// Read an amount fixture.
    pub fn amount(&self, key: FixtureKey) -> Result<f64> {
        match self.get(key)? {
            FixtureValue::Amount(v) => Ok(*v),
            other => Err(kind_error(key, FixtureKind::Amount, other)),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn kind_error(key: FixtureKey, expected: FixtureKind, found: &FixtureValue) -> HarnessError {
    HarnessError::FixtureKind {
        key,
        expected,
        found: found.kind(),
    }
}

/// Registration payload accepted by `POST /auth/register`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub first_name: String,
    pub last_name: String,
}

impl UserPayload {
    pub fn new(email: impl Into<String>, password: &str, first_name: &str, last_name: &str) -> Self {
        Self {
            email: email.into(),
            password: Some(password.to_string()),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        }
    }

    /// The same payload with the password removed.
    pub fn without_password(mut self) -> Self {
        self.password = None;
        self
    }

    /// Login body for this user.
    pub fn credentials(&self) -> serde_json::Value {
        serde_json::json!({
            "email": self.email,
            "password": self.password,
        })
    }
}

/// Per-run identity: one wall-clock reading from which every unique name
/// of the run is derived, so repeated runs never collide on unique
/// constraints (email, category name, SKU).
#[derive(Debug, Clone)]
pub struct RunIdentity {
    stamp: i64,
    password: String,
    test_user: UserPayload,
}

impl RunIdentity {
    /// Read the clock once and derive the run's identity from it.
    pub fn capture(password: &str) -> Self {
        Self::at(chrono::Utc::now().timestamp(), password)
    }

    /// Identity for a fixed stamp.
    pub fn at(stamp: i64, password: &str) -> Self {
        let test_user = UserPayload::new(
            format!("test-user-{stamp}@example.com"),
            password,
            "Test",
            "User",
        );
        Self {
            stamp,
            password: password.to_string(),
            test_user,
        }
    }

    pub fn stamp(&self) -> i64 {
        self.stamp
    }

    /// Password shared by every ordinary user the run registers.
    pub fn password(&self) -> &str {
        &self.password
    }

    /// The run's primary test user.
    pub fn test_user(&self) -> &UserPayload {
        &self.test_user
    }

    /// `<prefix>-<stamp>@example.com`
    pub fn email(&self, prefix: &str) -> String {
        format!("{prefix}-{}@example.com", self.stamp)
    }

    /// `<label> <stamp>`, for entity names that must be unique per run.
    pub fn name(&self, label: &str) -> String {
        format!("{label} {}", self.stamp)
    }

    /// `<prefix>-<stamp>`, for SKUs.
    pub fn sku(&self, prefix: &str) -> String {
        format!("{prefix}-{}", self.stamp)
    }
}
