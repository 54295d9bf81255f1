//! CLI commands.

pub mod check;
pub mod list;
pub mod run;

use anyhow::{Context, Result};
use shopcheck_core::{HarnessConfig, HarnessError, Plan, Suite, CONFIG_FILE};
use std::path::Path;

/// File config, then `SHOPCHECK_*` variables, then the `--base-url` flag.
pub fn load_config(path: Option<&Path>, base_url: Option<String>) -> Result<HarnessConfig> {
    let path = path.unwrap_or_else(|| Path::new(CONFIG_FILE));
    let mut config = HarnessConfig::load(path)
        .with_context(|| format!("loading {}", path.display()))?
        .with_env_overrides();
    if let Some(url) = base_url {
        config.api.base_url = url;
    }
    Ok(config)
}

/// Parse `--suite` values; an empty list means every suite.
pub fn parse_suites(names: &[String]) -> Result<Vec<Suite>> {
    let mut suites = Vec::new();
    for name in names {
        let suite: Suite = name.parse().map_err(with_hint)?;
        if !suites.contains(&suite) {
            suites.push(suite);
        }
    }
    Ok(suites)
}

/// The full plan restricted to the requested suites.
pub fn plan_for(names: &[String]) -> Result<Plan> {
    let suites = parse_suites(names)?;
    Ok(Plan::full().select(&suites))
}

/// Attach the error's recovery suggestion, when it has one.
pub fn with_hint(err: HarnessError) -> anyhow::Error {
    match err.recovery_suggestion() {
        Some(hint) => anyhow::anyhow!("{}\n  hint: {}", err, hint),
        None => anyhow::Error::new(err),
    }
}
