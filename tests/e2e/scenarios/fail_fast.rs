use crate::harness::{Assertion, Scenario};
use anyhow::ensure;
use shopcheck_core::{Suite, Verdict};

#[test]
fn test_fail_fast_skips_everything_after_first_failure() {
    Scenario::new("fail_fast_missing_owner")
        .without_owner_seed()
        .fail_fast()
        .assert_passed("auth::current user")
        .assert_failed("categories::owner login")
        // Cleanups are skipped too once the run has stopped.
        .assert_skipped("categories::delete")
        .assert_skipped("orders::delete category")
        .assert(Assertion::NeverStarted("products::owner token present".to_string()))
        .assert_custom(|outcome| {
            let s = outcome.summary;
            ensure!(s.passed() == 3 && s.failed() == 1, "{} passed, {} failed", s.passed(), s.failed());
            ensure!(s.blocked() == 0, "nothing should be blocked, got {}", s.blocked());
            ensure!(s.skipped() == s.results.len() - 4, "skipped: {}", s.skipped());
            let reason = s.results.iter().rev().find_map(|r| match &r.verdict {
                Verdict::Skipped { reason } => Some(reason.clone()),
                _ => None,
            });
            ensure!(
                reason.as_deref().is_some_and(|r| r.contains("stopped")),
                "skip reason: {:?}",
                reason
            );
            Ok(())
        })
        .run()
        .unwrap();
}

#[test]
fn test_fail_fast_is_inert_on_a_clean_run() {
    Scenario::new("fail_fast_clean")
        .fail_fast()
        .assert_all_passed()
        .run()
        .unwrap();
}

#[test]
fn test_fail_fast_applies_to_selected_plan() {
    Scenario::new("fail_fast_selected")
        .without_owner_seed()
        .fail_fast()
        .suites(&[Suite::Products])
        // The selected plan starts with the pulled-in owner login.
        .assert_failed("categories::owner login")
        .assert_skipped("products::owner token present")
        .assert_skipped("products::delete product category")
        .assert_custom(|outcome| {
            let s = outcome.summary;
            ensure!(s.failed() == 1, "failed: {}", s.failed());
            ensure!(s.skipped() == s.results.len() - 1, "skipped: {}", s.skipped());
            Ok(())
        })
        .run()
        .unwrap();
}
