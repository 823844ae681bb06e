#![cfg(feature = "async")]
//! Unit tests for the Outcome settled-result record.

use mapops::concurrent::Outcome;
use rstest::rstest;

// =============================================================================
// Type Checking
// =============================================================================

#[rstest]
fn test_fulfilled_outcome_reports_fulfilled() {
    let outcome: Outcome<i32, String> = Outcome::Fulfilled(42);
    assert!(outcome.is_fulfilled());
    assert!(!outcome.is_rejected());
}

#[rstest]
fn test_rejected_outcome_reports_rejected() {
    let outcome: Outcome<i32, String> = Outcome::Rejected("boom".to_string());
    assert!(outcome.is_rejected());
    assert!(!outcome.is_fulfilled());
}

// =============================================================================
// Value Extraction
// =============================================================================

#[rstest]
fn test_fulfilled_extraction() {
    let outcome: Outcome<i32, String> = Outcome::Fulfilled(42);
    assert_eq!(outcome.fulfilled(), Some(42));

    let outcome: Outcome<i32, String> = Outcome::Rejected("boom".to_string());
    assert_eq!(outcome.fulfilled(), None);
}

#[rstest]
fn test_rejected_extraction() {
    let outcome: Outcome<i32, String> = Outcome::Rejected("boom".to_string());
    assert_eq!(outcome.rejected(), Some("boom".to_string()));

    let outcome: Outcome<i32, String> = Outcome::Fulfilled(42);
    assert_eq!(outcome.rejected(), None);
}

#[rstest]
fn test_reference_extraction() {
    let outcome: Outcome<i32, String> = Outcome::Fulfilled(42);
    assert_eq!(outcome.fulfilled_ref(), Some(&42));
    assert_eq!(outcome.rejected_ref(), None);
}

// =============================================================================
// Transformation
// =============================================================================

#[rstest]
fn test_map_transforms_fulfilled_value() {
    let outcome: Outcome<i32, String> = Outcome::Fulfilled(21);
    assert_eq!(outcome.map(|value| value * 2), Outcome::Fulfilled(42));
}

#[rstest]
fn test_map_leaves_rejection_untouched() {
    let outcome: Outcome<i32, String> = Outcome::Rejected("boom".to_string());
    assert_eq!(
        outcome.map(|value| value * 2),
        Outcome::Rejected("boom".to_string())
    );
}

#[rstest]
fn test_map_rejected_transforms_reason() {
    let outcome: Outcome<i32, String> = Outcome::Rejected("boom".to_string());
    assert_eq!(
        outcome.map_rejected(|reason| reason.to_uppercase()),
        Outcome::Rejected("BOOM".to_string())
    );
}

#[rstest]
fn test_map_rejected_leaves_fulfilled_untouched() {
    let outcome: Outcome<i32, String> = Outcome::Fulfilled(42);
    assert_eq!(
        outcome.map_rejected(|reason| reason.to_uppercase()),
        Outcome::Fulfilled(42)
    );
}

#[rstest]
fn test_as_ref_borrows_the_contents() {
    let outcome: Outcome<String, String> = Outcome::Fulfilled("ok".to_string());
    assert_eq!(outcome.as_ref().map(|value| value.len()), Outcome::Fulfilled(2));
    // The original is still usable after as_ref
    assert!(outcome.is_fulfilled());
}

// =============================================================================
// Result Conversions
// =============================================================================

#[rstest]
fn test_into_result_round_trips() {
    let fulfilled: Outcome<i32, String> = Outcome::Fulfilled(42);
    assert_eq!(fulfilled.into_result(), Ok(42));

    let rejected: Outcome<i32, String> = Outcome::Rejected("boom".to_string());
    assert_eq!(rejected.into_result(), Err("boom".to_string()));
}

#[rstest]
fn test_from_result() {
    let ok: Result<i32, String> = Ok(42);
    assert_eq!(Outcome::from(ok), Outcome::Fulfilled(42));

    let err: Result<i32, String> = Err("boom".to_string());
    assert_eq!(Outcome::from(err), Outcome::Rejected("boom".to_string()));
}

#[rstest]
fn test_result_from_outcome() {
    let outcome: Outcome<i32, String> = Outcome::Fulfilled(42);
    let result: Result<i32, String> = outcome.into();
    assert_eq!(result, Ok(42));
}

// =============================================================================
// Display
// =============================================================================

#[rstest]
fn test_display_fulfilled() {
    let outcome: Outcome<i32, String> = Outcome::Fulfilled(42);
    assert_eq!(format!("{outcome}"), "fulfilled(42)");
}

#[rstest]
fn test_display_rejected() {
    let outcome: Outcome<i32, String> = Outcome::Rejected("boom".to_string());
    assert_eq!(format!("{outcome}"), "rejected(boom)");
}
