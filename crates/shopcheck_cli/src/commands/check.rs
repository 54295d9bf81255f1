//! Offline plan validation command.

use super::plan_for;
use anyhow::Result;
use console::style;

/// Verify that every declared read has an earlier writer.
pub fn run(suites: &[String]) -> Result<()> {
    let plan = plan_for(suites)?;
    let issues = plan.dependency_issues();

    if issues.is_empty() {
        println!(
            "{} {} case(s), all fixture dependencies satisfied",
            style("✓").green(),
            plan.len()
        );
        return Ok(());
    }

    println!("{}", style("Dependency issues:").bold());
    for issue in &issues {
        println!("  {} {}", style("×").red(), issue);
    }
    if let Some(hint) = issues.first().and_then(|i| i.recovery_suggestion()) {
        println!();
        println!("{}", style(hint).yellow());
    }
    anyhow::bail!("{} unsatisfied dependency(ies)", issues.len())
}
