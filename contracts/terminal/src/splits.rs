//! Split store: ordered payout and ticket recipient lists, keyed by
//! `(project, configuration number)` and settable by the project owner.

use soroban_sdk::{contracttype, panic_with_error, Env, Vec};

use crate::math::SPLIT_TOTAL;
use crate::storage::bump_persistent;
use crate::types::Split;
use crate::Error;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SplitKey {
    Payout(u64, u64),
    Ticket(u64, u64),
}

pub fn payout_splits_of(env: &Env, project_id: u64, config: u64) -> Vec<Split> {
    read(env, &SplitKey::Payout(project_id, config))
}

pub fn ticket_splits_of(env: &Env, project_id: u64, config: u64) -> Vec<Split> {
    read(env, &SplitKey::Ticket(project_id, config))
}

pub fn set_payout_splits(env: &Env, project_id: u64, config: u64, splits: &Vec<Split>) {
    validate(env, splits, true);
    write(env, &SplitKey::Payout(project_id, config), splits);
}

/// Ticket splits mint to a beneficiary; routing through an allocator or a
/// target project is rejected.
pub fn set_ticket_splits(env: &Env, project_id: u64, config: u64, splits: &Vec<Split>) {
    validate(env, splits, false);
    write(env, &SplitKey::Ticket(project_id, config), splits);
}

fn validate(env: &Env, splits: &Vec<Split>, allow_routing: bool) {
    let mut total: u64 = 0;
    for split in splits.iter() {
        if split.percent == 0 || split.percent > SPLIT_TOTAL {
            panic_with_error!(env, Error::BadSplits);
        }
        if !allow_routing && (split.allocator.is_some() || split.project_id.is_some()) {
            panic_with_error!(env, Error::BadSplits);
        }
        total += split.percent as u64;
    }
    if total > SPLIT_TOTAL as u64 {
        panic_with_error!(env, Error::BadSplits);
    }
}

fn read(env: &Env, key: &SplitKey) -> Vec<Split> {
    match env.storage().persistent().get(key) {
        Some(splits) => {
            bump_persistent(env, key);
            splits
        }
        None => Vec::new(env),
    }
}

fn write(env: &Env, key: &SplitKey, splits: &Vec<Split>) {
    env.storage().persistent().set(key, splits);
    bump_persistent(env, key);
}
