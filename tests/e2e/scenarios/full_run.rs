use crate::harness::Scenario;
use anyhow::ensure;
use shopcheck_core::Suite;

#[test]
fn test_full_plan_passes_against_conforming_backend() {
    let summary = Scenario::new("full_plan_passes")
        .assert_all_passed()
        .assert_backend_clean(1)
        .assert_check_passed("Register - 1: Success (201)")
        .assert_check_passed("Security: DELETE with Customer token (403)")
        .assert_check_passed("Add: same product merges lines (200)")
        .assert_check_passed("After order: stock is reduced")
        .assert_check_passed("Admin: mark shipped (200)")
        .assert_note_contains("Product tests are using the Owner token.")
        .assert_note_contains("Order tests cleaned up temporary product and category.")
        .run()
        .expect("full plan should pass");

    assert_eq!(summary.stamp, 1_700_000_000);
    assert_eq!(summary.passed(), summary.results.len());
}

#[test]
fn test_results_follow_position_order() {
    Scenario::new("position_order")
        .assert_custom(|outcome| {
            let positions: Vec<_> = outcome.summary.results.iter().map(|r| r.position).collect();
            let mut sorted = positions.clone();
            sorted.sort();
            ensure!(positions == sorted, "results out of position order");

            let suites: Vec<Suite> = outcome.reporter.suites.clone();
            ensure!(suites == Suite::ALL.to_vec(), "suite order: {:?}", suites);
            ensure!(outcome.reporter.run_finished, "run_finished never reported");
            Ok(())
        })
        .run()
        .unwrap();
}

#[test]
fn test_every_started_case_reports_its_checks() {
    Scenario::new("checks_recorded")
        .assert_custom(|outcome| {
            ensure!(
                outcome.reporter.failed_checks().next().is_none(),
                "unexpected failed checks"
            );
            let recorded: usize = outcome.summary.results.iter().map(|r| r.checks.len()).sum();
            ensure!(
                recorded == outcome.reporter.checks.len(),
                "summary holds {} checks, reporter saw {}",
                recorded,
                outcome.reporter.checks.len()
            );
            ensure!(
                outcome.reporter.started == outcome.reporter.finished,
                "every started case should finish, in order"
            );
            Ok(())
        })
        .run()
        .unwrap();
}

#[test]
fn test_repeated_runs_do_not_collide() {
    // Emails, category names and SKUs all carry the run stamp.
    Scenario::new("repeated_runs")
        .twice()
        .assert_all_passed()
        .assert_backend_clean(2)
        .run()
        .expect("second run against the same backend should pass");
}
