#![allow(dead_code)]

extern crate std;

use crate::math::{unprocessed_of, FULL_RATE};
use crate::types::CycleMetadata;

/// INV-1: A project balance must never be negative.
pub fn assert_balance_non_negative(project_id: u64, balance: i128) {
    assert!(
        balance >= 0,
        "INV-1 violated: project {} has negative balance ({})",
        project_id,
        balance
    );
}

/// INV-2: Deposit invariant: after a deposit of `amount`, the project
/// balance increases by exactly `amount`.
pub fn assert_deposit_invariant(balance_before: i128, balance_after: i128, amount: i128) {
    assert_eq!(
        balance_after,
        balance_before + amount,
        "INV-2 violated: deposit invariant broken: {} + {} != {}",
        balance_before,
        amount,
        balance_after
    );
}

/// INV-3: A reconciled project has its tracker equal to the ticket supply,
/// i.e. no unprocessed reserved tickets remain.
pub fn assert_tracker_reconciled(tracker: i128, total_supply: i128) {
    assert_eq!(
        tracker, total_supply,
        "INV-3 violated: tracker {} != total supply {}",
        tracker, total_supply
    );
}

/// INV-4: Burning tickets shifts the tracker with the supply, leaving the
/// unprocessed distance unchanged.
pub fn assert_unprocessed_preserved(
    tracker_before: i128,
    supply_before: i128,
    tracker_after: i128,
    supply_after: i128,
) {
    assert_eq!(
        unprocessed_of(tracker_after, supply_after),
        unprocessed_of(tracker_before, supply_before),
        "INV-4 violated: unprocessed distance changed across a burn"
    );
}

/// INV-5: All configured rates stay within the 0..=200 range.
pub fn assert_rates_bounded(metadata: &CycleMetadata) {
    assert!(
        metadata.reserved_rate <= FULL_RATE
            && metadata.bonding_curve_rate <= FULL_RATE
            && metadata.reconfig_bonding_curve_rate <= FULL_RATE,
        "INV-5 violated: a rate exceeds {}",
        FULL_RATE
    );
}
