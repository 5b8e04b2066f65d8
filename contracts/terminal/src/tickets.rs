//! Project-scoped claim-token ledger.
//!
//! Each holder's tickets live in two pools, staked and unstaked; the
//! `prefer_unstaked` flag on mint selects the destination pool, and on burn
//! the preferred pool is drawn down first with fallback to the other. The
//! per-project total supply is the quantity the reserved-ticket tracker is
//! reconciled against.

use soroban_sdk::{contracttype, panic_with_error, Address, Env};

use crate::storage::bump_persistent;
use crate::Error;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TicketKey {
    Supply(u64),
    Staked(u64, Address),
    Unstaked(u64, Address),
}

pub fn total_supply_of(env: &Env, project_id: u64) -> i128 {
    read(env, &TicketKey::Supply(project_id))
}

pub fn balance_of(env: &Env, holder: &Address, project_id: u64) -> i128 {
    staked_balance_of(env, holder, project_id) + unstaked_balance_of(env, holder, project_id)
}

pub fn staked_balance_of(env: &Env, holder: &Address, project_id: u64) -> i128 {
    read(env, &TicketKey::Staked(project_id, holder.clone()))
}

pub fn unstaked_balance_of(env: &Env, holder: &Address, project_id: u64) -> i128 {
    read(env, &TicketKey::Unstaked(project_id, holder.clone()))
}

pub fn mint(env: &Env, holder: &Address, project_id: u64, amount: i128, prefer_unstaked: bool) {
    let supply_key = TicketKey::Supply(project_id);
    let supply = match read(env, &supply_key).checked_add(amount) {
        Some(supply) => supply,
        None => panic_with_error!(env, Error::MathOverflow),
    };
    write(env, &supply_key, supply);

    let pool_key = if prefer_unstaked {
        TicketKey::Unstaked(project_id, holder.clone())
    } else {
        TicketKey::Staked(project_id, holder.clone())
    };
    write(env, &pool_key, read(env, &pool_key) + amount);
}

pub fn burn(env: &Env, holder: &Address, project_id: u64, amount: i128, prefer_unstaked: bool) {
    let staked_key = TicketKey::Staked(project_id, holder.clone());
    let unstaked_key = TicketKey::Unstaked(project_id, holder.clone());
    let staked = read(env, &staked_key);
    let unstaked = read(env, &unstaked_key);
    if staked + unstaked < amount {
        panic_with_error!(env, Error::InsufficientTickets);
    }

    // Drain the preferred pool first, then the remainder from the other.
    let (first_key, first, second_key, second) = if prefer_unstaked {
        (unstaked_key, unstaked, staked_key, staked)
    } else {
        (staked_key, staked, unstaked_key, unstaked)
    };
    if amount <= first {
        write(env, &first_key, first - amount);
    } else {
        write(env, &first_key, 0);
        write(env, &second_key, second - (amount - first));
    }

    let supply_key = TicketKey::Supply(project_id);
    write(env, &supply_key, read(env, &supply_key) - amount);
}

fn read(env: &Env, key: &TicketKey) -> i128 {
    let value = env.storage().persistent().get(key).unwrap_or(0);
    if value != 0 {
        bump_persistent(env, key);
    }
    value
}

fn write(env: &Env, key: &TicketKey, value: i128) {
    env.storage().persistent().set(key, &value);
    bump_persistent(env, key);
}
