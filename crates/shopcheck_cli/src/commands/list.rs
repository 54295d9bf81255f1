//! Plan listing command.

use super::plan_for;
use anyhow::Result;
use console::style;
use shopcheck_core::{CaseKind, FixtureKey};

fn keys(keys: &[FixtureKey]) -> String {
    keys.iter().map(|k| k.as_str()).collect::<Vec<_>>().join(", ")
}

/// Print the ordered plan grouped by position.
pub fn run(suites: &[String]) -> Result<()> {
    let plan = plan_for(suites)?;

    for (position, cases) in plan.groups() {
        println!("{}", style(format!("[{}]", position)).bold());
        for case in cases {
            let kind = match case.kind() {
                CaseKind::Setup => style("setup  ").cyan(),
                CaseKind::Check => style("check  ").dim(),
                CaseKind::Cleanup => style("cleanup").magenta(),
            };
            println!("  {} {}", kind, case.qualified_name());
            if !case.read_keys().is_empty() {
                println!("      reads:  {}", keys(case.read_keys()));
            }
            if !case.write_keys().is_empty() {
                println!("      writes: {}", style(keys(case.write_keys())).green());
            }
        }
    }

    println!();
    println!("{} case(s)", style(plan.len()).cyan());
    Ok(())
}
