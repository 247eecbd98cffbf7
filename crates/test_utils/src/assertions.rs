//! Custom Test Assertions
//!
//! Assertion helpers for domain types that give more meaningful failure
//! messages than a bare `assert_eq!`.

use core_kernel::{ItemId, UserId};
use domain_claims::{ClaimAttempt, ClaimError, ClaimStatus};
use domain_items::{Item, ItemError, ItemStatus};

/// Asserts an item's status
pub fn assert_item_status(item: &Item, expected: ItemStatus) {
    assert_eq!(
        item.status, expected,
        "Item {} ({}) is {}, expected {}",
        item.id, item.name, item.status, expected
    );
}

/// Asserts that an item is claimed by `claimant`
pub fn assert_claimed_by(item: &Item, claimant: UserId) {
    assert_item_status(item, ItemStatus::Claimed);
    assert_eq!(
        item.claimed_by,
        Some(claimant),
        "Item {} is claimed by {:?}, expected {}",
        item.id,
        item.claimed_by,
        claimant
    );
}

/// Asserts a claim's status
pub fn assert_claim_status(claim: &ClaimAttempt, expected: ClaimStatus) {
    assert_eq!(
        claim.status, expected,
        "Claim {} is {}, expected {}",
        claim.id, claim.status, expected
    );
}

/// Asserts that `items` holds exactly the given ids, in order
pub fn assert_item_ids(items: &[Item], expected: &[ItemId]) {
    let actual: Vec<ItemId> = items.iter().map(|i| i.id).collect();
    assert_eq!(
        actual,
        expected,
        "Item ids differ: got {:?}",
        items.iter().map(|i| i.name.as_str()).collect::<Vec<_>>()
    );
}

/// Asserts that an item operation failed validation on `field`
pub fn assert_item_validation<T: std::fmt::Debug>(result: &Result<T, ItemError>, field: &str) {
    match result {
        Err(ItemError::Validation { field: Some(actual), .. }) => assert_eq!(
            actual, field,
            "Validation failed on {}, expected {}",
            actual, field
        ),
        other => panic!("Expected validation error on {}, got {:?}", field, other),
    }
}

/// Asserts that a claim operation failed validation on `field`
pub fn assert_claim_validation<T: std::fmt::Debug>(result: &Result<T, ClaimError>, field: &str) {
    match result {
        Err(ClaimError::Validation { field: Some(actual), .. }) => assert_eq!(
            actual, field,
            "Validation failed on {}, expected {}",
            actual, field
        ),
        other => panic!("Expected validation error on {}, got {:?}", field, other),
    }
}

/// Asserts that an operation was refused for lack of authorization
pub fn assert_unauthorized<T: std::fmt::Debug>(result: &Result<T, ItemError>) {
    assert!(
        matches!(result, Err(ItemError::Unauthorized(_))),
        "Expected Unauthorized, got {:?}",
        result
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::TestItemBuilder;

    #[test]
    fn test_assert_claimed_by_passes() {
        let claimant = UserId::new();
        let item = TestItemBuilder::found().claimed_by(claimant).build();
        assert_claimed_by(&item, claimant);
    }

    #[test]
    #[should_panic(expected = "expected returned")]
    fn test_assert_item_status_reports_mismatch() {
        let item = TestItemBuilder::found().build();
        assert_item_status(&item, ItemStatus::Returned);
    }

    #[test]
    fn test_assert_item_validation() {
        let result: Result<(), ItemError> = Err(ItemError::validation_field("name", "required"));
        assert_item_validation(&result, "name");
    }
}
