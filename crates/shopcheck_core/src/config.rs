//! Harness configuration: target API, seed credentials, run behaviour.

use crate::error::{HarnessError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default config file name looked up in the working directory.
pub const CONFIG_FILE: &str = "shopcheck.toml";

/// Environment variable overriding `api.base_url`.
pub const ENV_BASE_URL: &str = "SHOPCHECK_BASE_URL";
/// Environment variable overriding `seed.owner_email`.
pub const ENV_OWNER_EMAIL: &str = "SHOPCHECK_OWNER_EMAIL";
/// Environment variable overriding `seed.owner_password`.
pub const ENV_OWNER_PASSWORD: &str = "SHOPCHECK_OWNER_PASSWORD";

/// Complete harness configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct HarnessConfig {
    /// Target API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Pre-existing accounts and credentials for created users.
    #[serde(default)]
    pub seed: SeedConfig,

    /// Run behaviour.
    #[serde(default)]
    pub run: RunConfig,
}

impl HarnessConfig {
    /// Load configuration from a file. A missing file yields defaults.
    /// Values are not validated here; overrides may still replace them.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| HarnessError::ConfigError(format!("failed to read config: {}", e)))?;
            let config: Self = toml::from_str(&content)
                .map_err(|e| HarnessError::ConfigError(format!("failed to parse config: {}", e)))?;
            tracing::debug!(path = %path.display(), "loaded config");
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply `SHOPCHECK_*` environment overrides.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable source.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.api.base_url = url;
        }
        if let Some(email) = lookup(ENV_OWNER_EMAIL) {
            self.seed.owner_email = email;
        }
        if let Some(password) = lookup(ENV_OWNER_PASSWORD) {
            self.seed.owner_password = password;
        }
        self
    }

    /// Reject values the harness cannot work with.
    pub fn validate(&self) -> Result<()> {
        let url = self.api.base_url.trim();
        if url.is_empty() {
            return Err(HarnessError::ConfigError("api.base_url is empty".into()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(HarnessError::ConfigError(format!(
                "api.base_url must start with http:// or https://, got '{}'",
                url
            )));
        }
        if self.seed.owner_email.is_empty() || self.seed.owner_password.is_empty() {
            return Err(HarnessError::ConfigError(
                "seed.owner_email and seed.owner_password are required".into(),
            ));
        }
        if self.api.request_timeout_secs == Some(0) {
            return Err(HarnessError::ConfigError(
                "api.request_timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// Target API settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every case path is appended to (default: http://localhost:5000/api/v1).
    pub base_url: String,

    /// Per-request timeout. Unset keeps the HTTP client's own default.
    pub request_timeout_secs: Option<u64>,

    /// Path polled by `--wait-for-api` (default: /health).
    pub health_path: String,
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api/v1".to_string(),
            request_timeout_secs: None,
            health_path: "/health".to_string(),
        }
    }
}

/// Seed account and created-user credentials.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SeedConfig {
    /// Email of the pre-existing owner account (default: owner@test.com).
    pub owner_email: String,

    /// Password of the owner account (default: password123).
    pub owner_password: String,

    /// Password given to every user the run registers (default: password123).
    pub customer_password: String,
}

impl SeedConfig {
    /// Login body for the owner account.
    pub fn owner_credentials(&self) -> serde_json::Value {
        serde_json::json!({
            "email": self.owner_email,
            "password": self.owner_password,
        })
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            owner_email: "owner@test.com".to_string(),
            owner_password: "password123".to_string(),
            customer_password: "password123".to_string(),
        }
    }
}

/// Run behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    /// Stop at the first case that does not pass (default: false).
    pub fail_fast: bool,
}
