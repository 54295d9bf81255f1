//! A backend that breaks one cart, order or delete rule must fail the case
//! that owns the rule.

use crate::harness::{Assertion, BackendOptions, Scenario};

fn drifting(options: BackendOptions) -> Scenario {
    Scenario::new("contract_drift").backend(options)
}

#[test]
fn test_duplicate_cart_lines_fail_merge_case() {
    drifting(BackendOptions {
        merge_cart_lines: false,
        ..BackendOptions::default()
    })
    .assert_passed("cart::add")
    .assert_failed("cart::add merges")
    .assert_check_failed("Add: same product merges lines (200)")
    .assert_failure_contains("cart::add merges", "Add: same product merges lines (200)")
    .run()
    .unwrap();
}

#[test]
fn test_quantity_over_stock_accepted_fails_stock_cases() {
    drifting(BackendOptions {
        enforce_stock: false,
        ..BackendOptions::default()
    })
    .assert_failed("cart::add over stock")
    .assert_check_failed("Add: insufficient stock (400)")
    .assert_failed("cart::update over stock")
    .assert_check_failed("Update: insufficient stock (400)")
    .run()
    .unwrap();
}

#[test]
fn test_stock_left_untouched_fails_stock_reduced() {
    drifting(BackendOptions {
        decrement_stock: false,
        ..BackendOptions::default()
    })
    .assert_passed("orders::create")
    .assert_passed("orders::cart cleared")
    .assert_failed("orders::stock reduced")
    .assert_check_failed("After order: stock is reduced")
    .run()
    .unwrap();
}

#[test]
fn test_cart_kept_after_checkout_fails_cart_cleared() {
    drifting(BackendOptions {
        clear_cart_on_order: false,
        ..BackendOptions::default()
    })
    .assert_passed("orders::create")
    .assert_failed("orders::cart cleared")
    .assert_check_failed("After order: cart is cleared")
    // The leftover cart lets a second order through.
    .assert_failed("orders::reorder with empty cart")
    .assert_check_failed("After order: second order fails (400)")
    .assert(Assertion::OrderCount(2))
    .run()
    .unwrap();
}

#[test]
fn test_repeat_delete_answering_ok_fails_not_found_checks() {
    drifting(BackendOptions {
        missing_delete_is_404: false,
        ..BackendOptions::default()
    })
    .assert_passed("products::delete")
    .assert_failed("products::delete again")
    .assert_check_failed("Delete: not found (404)")
    .assert_failed("categories::delete")
    .assert_check_passed("DELETE - 1: Happy Path")
    .assert_check_failed("DELETE - 2: Logic (Not Found)")
    // Cleanups still remove what the suites created.
    .assert_backend_clean(1)
    .run()
    .unwrap();
}
