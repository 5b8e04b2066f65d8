//! Funding-cycle store: one current cycle per project plus at most one
//! queued reconfiguration gated by a ballot.
//!
//! A queued configuration holds the ballot state: while it is pending the
//! ballot is `Active` (which switches redemption to the reconfiguration
//! curve rate), and once governance approves it the promotion to current
//! happens on the next accounting operation. The entry points in `lib.rs`
//! reconcile reserved tickets under the outgoing configuration before
//! promoting.

use soroban_sdk::{contracttype, panic_with_error, Env};

use crate::math::FULL_RATE;
use crate::storage::bump_persistent;
use crate::types::{BallotState, Cycle, CycleMetadata, CycleProperties, QueuedCycle};
use crate::{prices, Error};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CycleKey {
    Current(u64),
    Queued(u64),
}

/// Store a new configuration for the project, snapshotting `fee`.
///
/// The first configuration, and any configuration with
/// `activate_immediately`, becomes the current cycle at once; otherwise it
/// is queued behind a ballot. Returns the cycle the configuration will
/// produce (for a queued configuration, a preview with the next number).
pub fn configure(
    env: &Env,
    project_id: u64,
    properties: &CycleProperties,
    metadata: &CycleMetadata,
    fee: u32,
    activate_immediately: bool,
) -> Cycle {
    if properties.target <= 0 || properties.weight <= 0 {
        panic_with_error!(env, Error::BadProperties);
    }
    if metadata.reserved_rate > FULL_RATE
        || metadata.bonding_curve_rate > FULL_RATE
        || metadata.reconfig_bonding_curve_rate > FULL_RATE
    {
        panic_with_error!(env, Error::BadRate);
    }
    // A target in an unknown currency could never be tapped.
    let _ = prices::price_of(env, properties.currency);

    let now = env.ledger().timestamp();
    match current_cycle_of(env, project_id) {
        None => activate(env, project_id, 1, properties, metadata, fee, now),
        Some(current) if activate_immediately => {
            env.storage()
                .persistent()
                .remove(&CycleKey::Queued(project_id));
            activate(env, project_id, current.number + 1, properties, metadata, fee, now)
        }
        Some(current) => {
            let key = CycleKey::Queued(project_id);
            env.storage().persistent().set(
                &key,
                &QueuedCycle {
                    properties: properties.clone(),
                    metadata: metadata.clone(),
                    fee,
                    approved: false,
                    configured_at: now,
                },
            );
            bump_persistent(env, &key);
            Cycle {
                project_id,
                number: current.number + 1,
                properties: properties.clone(),
                metadata: metadata.clone(),
                fee,
                tapped: 0,
                configured_at: now,
            }
        }
    }
}

pub fn current_cycle_of(env: &Env, project_id: u64) -> Option<Cycle> {
    let key = CycleKey::Current(project_id);
    let cycle: Option<Cycle> = env.storage().persistent().get(&key);
    if cycle.is_some() {
        bump_persistent(env, &key);
    }
    cycle
}

/// Register a withdrawal against the current cycle's spending target and
/// return the updated cycle.
pub fn register_tap(env: &Env, project_id: u64, amount: i128) -> Cycle {
    let mut cycle = match current_cycle_of(env, project_id) {
        Some(cycle) => cycle,
        None => panic_with_error!(env, Error::NoActiveCycle),
    };
    let tapped = match cycle.tapped.checked_add(amount) {
        Some(tapped) => tapped,
        None => panic_with_error!(env, Error::MathOverflow),
    };
    if tapped > cycle.properties.target {
        panic_with_error!(env, Error::TapLimitExceeded);
    }
    cycle.tapped = tapped;
    let key = CycleKey::Current(project_id);
    env.storage().persistent().set(&key, &cycle);
    bump_persistent(env, &key);
    cycle
}

pub fn ballot_state_of(env: &Env, project_id: u64) -> BallotState {
    let queued: Option<QueuedCycle> = env
        .storage()
        .persistent()
        .get(&CycleKey::Queued(project_id));
    match queued {
        None => BallotState::None,
        Some(queued) if queued.approved => BallotState::Approved,
        Some(_) => BallotState::Active,
    }
}

pub fn queued_is_approved(env: &Env, project_id: u64) -> bool {
    ballot_state_of(env, project_id) == BallotState::Approved
}

pub fn mark_approved(env: &Env, project_id: u64) {
    let key = CycleKey::Queued(project_id);
    let mut queued: QueuedCycle = match env.storage().persistent().get(&key) {
        Some(queued) => queued,
        None => panic_with_error!(env, Error::NoQueuedReconfiguration),
    };
    queued.approved = true;
    env.storage().persistent().set(&key, &queued);
    bump_persistent(env, &key);
}

pub fn drop_queued(env: &Env, project_id: u64) {
    let key = CycleKey::Queued(project_id);
    if !env.storage().persistent().has(&key) {
        panic_with_error!(env, Error::NoQueuedReconfiguration);
    }
    env.storage().persistent().remove(&key);
}

/// Promote the queued configuration to the current cycle.
pub fn promote_queued(env: &Env, project_id: u64) -> Cycle {
    let key = CycleKey::Queued(project_id);
    let queued: QueuedCycle = match env.storage().persistent().get(&key) {
        Some(queued) => queued,
        None => panic_with_error!(env, Error::NoQueuedReconfiguration),
    };
    let number = current_cycle_of(env, project_id)
        .map(|cycle| cycle.number)
        .unwrap_or(0)
        + 1;
    env.storage().persistent().remove(&key);
    activate(
        env,
        project_id,
        number,
        &queued.properties,
        &queued.metadata,
        queued.fee,
        queued.configured_at,
    )
}

fn activate(
    env: &Env,
    project_id: u64,
    number: u64,
    properties: &CycleProperties,
    metadata: &CycleMetadata,
    fee: u32,
    configured_at: u64,
) -> Cycle {
    let cycle = Cycle {
        project_id,
        number,
        properties: properties.clone(),
        metadata: metadata.clone(),
        fee,
        tapped: 0,
        configured_at,
    };
    let key = CycleKey::Current(project_id);
    env.storage().persistent().set(&key, &cycle);
    bump_persistent(env, &key);
    cycle
}
