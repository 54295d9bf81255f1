use crate::harness::{Assertion, Scenario};
use anyhow::ensure;
use shopcheck_core::{Check, FixtureKey, Position, Suite, TestCase, Verdict};

#[test]
fn test_missing_owner_account_blocks_dependents() {
    Scenario::new("missing_owner")
        .without_owner_seed()
        // Auth never touches the owner account.
        .assert_passed("auth::register")
        .assert_passed("auth::login")
        .assert_passed("auth::current user")
        .assert_failed("categories::owner login")
        .assert_failure_contains("categories::owner login", "Category - 0: Get Owner Token")
        .assert_check_failed("Category - 0: Get Owner Token")
        // The failed setup aborts its suite, cleanup still gets its turn.
        .assert_skipped("categories::list public")
        .assert_skipped("categories::create")
        .assert_blocked("categories::delete", FixtureKey::OwnerToken)
        // Later suites block on the token instead of running.
        .assert_blocked("products::owner token present", FixtureKey::OwnerToken)
        .assert_skipped("products::temporary customer")
        .assert_skipped("products::create")
        .assert_blocked("products::delete product category", FixtureKey::OwnerToken)
        .assert_blocked("cart::setup", FixtureKey::OwnerToken)
        .assert_blocked("orders::setup product", FixtureKey::OwnerToken)
        .assert_skipped("orders::setup customer")
        .assert(Assertion::ProductCount(0))
        .assert(Assertion::CategoryCount(0))
        .assert(Assertion::OrderCount(0))
        .assert_custom(|outcome| {
            let s = outcome.summary;
            ensure!(s.passed() == 3, "passed: {}", s.passed());
            ensure!(s.failed() == 1, "failed: {}", s.failed());
            // categories delete, products 13 + 2 cleanups, cart 27 + 2
            // cleanups, orders 41 + 2 cleanups
            ensure!(s.blocked() == 10, "blocked: {}", s.blocked());
            ensure!(
                s.skipped() == s.results.len() - 14,
                "skipped: {} of {}",
                s.skipped(),
                s.results.len()
            );
            Ok(())
        })
        .run()
        .unwrap();
}

#[test]
fn test_blocked_verdict_lists_every_missing_key() {
    Scenario::new("blocked_lists_keys")
        .without_owner_seed()
        .assert_custom(|outcome| {
            let result = outcome
                .summary
                .result("products::delete product category")
                .ok_or_else(|| anyhow::anyhow!("missing result"))?;
            match &result.verdict {
                Verdict::Blocked { missing } => ensure!(
                    missing == &vec![FixtureKey::OwnerToken, FixtureKey::ProductCategoryId],
                    "missing: {:?}",
                    missing
                ),
                other => anyhow::bail!("expected blocked, got {}", other),
            }
            ensure!(result.checks.is_empty(), "blocked case recorded checks");
            Ok(())
        })
        .run()
        .unwrap();
}

#[test]
fn test_contract_drift_fails_case_and_blocks_its_readers() {
    let cases = vec![
        TestCase::new(Suite::Categories, Position::new(1), "expects created")
            .writes(&[FixtureKey::CategoryId])
            .body(|ctx| {
                // Listing answers 200, not 201.
                let res = ctx.api().get("/categories").send()?;
                ctx.verify("Drift: list answers 201", &res, Check::status(201))?;
                ctx.set(FixtureKey::CategoryId, res.text_at("/data/_id")?)
            }),
        TestCase::new(Suite::Categories, Position::new(2), "reads category")
            .reads(&[FixtureKey::CategoryId])
            .body(|_| panic!("body must not run when blocked")),
        TestCase::new(Suite::Categories, Position::new(3), "independent").body(|ctx| {
            let res = ctx.api().get("/categories").send()?;
            ctx.verify("Drift: list still works", &res, Check::status(200).success())
        }),
    ];

    Scenario::new("contract_drift")
        .with_cases(cases)
        .assert_failed("categories::expects created")
        .assert_check_failed("Drift: list answers 201")
        .assert_blocked("categories::reads category", FixtureKey::CategoryId)
        .assert_passed("categories::independent")
        .assert_counts(1, 1, 1, 0)
        .run()
        .unwrap();
}

#[test]
fn test_declared_write_without_value_fails_case() {
    let cases = vec![TestCase::new(Suite::Auth, Position::new(1), "forgets token")
        .writes(&[FixtureKey::UserToken])
        .body(|ctx| {
            let res = ctx.api().get("/categories").send()?;
            ctx.verify("Public list", &res, Check::status(200))
        })];

    Scenario::new("forgotten_write")
        .with_cases(cases)
        .assert_failure_contains("auth::forgets token", "never wrote")
        .assert_check_passed("Public list")
        .run()
        .unwrap();
}
