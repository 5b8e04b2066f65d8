//! # Storage
//!
//! Typed helpers over the two Soroban storage tiers used by the terminal's
//! accounting core.
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key                  | Type      | Description                            |
//! |----------------------|-----------|----------------------------------------|
//! | `Governance`         | `Address` | Privileged protocol actor              |
//! | `SettlementToken`    | `Address` | Token contract funds are custodied in  |
//! | `FeeRate`            | `u32`     | Protocol withdrawal fee, out of 200    |
//! | `MigrationAllowed(t)`| `bool`    | Terminal allow-list for migration      |
//! | `ReentrancyGuard`    | `bool`    | Per-invocation exclusion latch         |
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key          | Type   | Description                                    |
//! |--------------|--------|------------------------------------------------|
//! | `Balance(p)` | `i128` | Funds custodied for project `p`, base units    |
//! | `Tracker(p)` | `i128` | Signed processed-ticket reconciliation cursor  |
//! | `Premined(p)`| `i128` | Tickets premined before the first real deposit |
//!
//! Collaborator modules (cycles, tickets, splits, prices, projects,
//! directory) own their own key enums and reuse the TTL helpers here.

use soroban_sdk::{contracttype, panic_with_error, Address, Env, IntoVal, Val};

use crate::Error;

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

/// Instance storage: bump by 7 days when below 1 day remaining.
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

/// Persistent storage: bump by 30 days when below 7 days remaining.
const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

/// Default protocol fee: 10/200 == 5%.
pub const DEFAULT_FEE_RATE: u32 = 10;

// ── Storage Keys ─────────────────────────────────────────────────────

/// Core accounting keys. Everything keyed by a project id is persistent;
/// protocol-wide configuration is instance-tier.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Governance,
    SettlementToken,
    FeeRate,
    MigrationAllowed(Address),
    ReentrancyGuard,
    Balance(u64),
    Tracker(u64),
    Premined(u64),
}

// ── TTL Helpers (shared with collaborator modules) ───────────────────

/// Extend instance storage TTL if it falls below the threshold.
pub fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

/// Extend the TTL for a persistent storage key.
pub fn bump_persistent<K>(env: &Env, key: &K)
where
    K: IntoVal<Env, Val>,
{
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

// ── Protocol Configuration ───────────────────────────────────────────

/// Store the governance address and settlement token exactly once.
pub fn init_protocol(env: &Env, governance: &Address, settlement_token: &Address) {
    if env.storage().instance().has(&DataKey::Governance) {
        panic_with_error!(env, Error::AlreadyInitialized);
    }
    env.storage().instance().set(&DataKey::Governance, governance);
    env.storage()
        .instance()
        .set(&DataKey::SettlementToken, settlement_token);
    env.storage()
        .instance()
        .set(&DataKey::FeeRate, &DEFAULT_FEE_RATE);
    bump_instance(env);
}

pub fn governance(env: &Env) -> Address {
    bump_instance(env);
    match env.storage().instance().get(&DataKey::Governance) {
        Some(governance) => governance,
        None => panic_with_error!(env, Error::NotInitialized),
    }
}

pub fn settlement_token(env: &Env) -> Address {
    bump_instance(env);
    match env.storage().instance().get(&DataKey::SettlementToken) {
        Some(token) => token,
        None => panic_with_error!(env, Error::NotInitialized),
    }
}

pub fn fee_rate(env: &Env) -> u32 {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::FeeRate)
        .unwrap_or(DEFAULT_FEE_RATE)
}

pub fn set_fee_rate(env: &Env, rate: u32) {
    env.storage().instance().set(&DataKey::FeeRate, &rate);
    bump_instance(env);
}

pub fn migration_allowed(env: &Env, terminal: &Address) -> bool {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::MigrationAllowed(terminal.clone()))
        .unwrap_or(false)
}

pub fn set_migration_allowed(env: &Env, terminal: &Address) {
    env.storage()
        .instance()
        .set(&DataKey::MigrationAllowed(terminal.clone()), &true);
    bump_instance(env);
}

// ── Reentrancy Latch ─────────────────────────────────────────────────

/// Take the exclusion latch for the duration of a public entry point.
/// A panic anywhere inside reverts the whole invocation, latch included.
pub fn guard_enter(env: &Env) {
    if env
        .storage()
        .instance()
        .get(&DataKey::ReentrancyGuard)
        .unwrap_or(false)
    {
        panic_with_error!(env, Error::ReentrantCall);
    }
    env.storage().instance().set(&DataKey::ReentrancyGuard, &true);
}

pub fn guard_exit(env: &Env) {
    env.storage()
        .instance()
        .set(&DataKey::ReentrancyGuard, &false);
}

// ── Per-Project Accounting State ─────────────────────────────────────

pub fn balance_of(env: &Env, project_id: u64) -> i128 {
    let key = DataKey::Balance(project_id);
    let balance = env.storage().persistent().get(&key).unwrap_or(0);
    if balance > 0 {
        bump_persistent(env, &key);
    }
    balance
}

pub fn set_balance(env: &Env, project_id: u64, balance: i128) {
    let key = DataKey::Balance(project_id);
    env.storage().persistent().set(&key, &balance);
    bump_persistent(env, &key);
}

pub fn tracker_of(env: &Env, project_id: u64) -> i128 {
    let key = DataKey::Tracker(project_id);
    let tracker = env.storage().persistent().get(&key).unwrap_or(0);
    if tracker != 0 {
        bump_persistent(env, &key);
    }
    tracker
}

pub fn set_tracker(env: &Env, project_id: u64, tracker: i128) {
    let key = DataKey::Tracker(project_id);
    env.storage().persistent().set(&key, &tracker);
    bump_persistent(env, &key);
}

pub fn premined_of(env: &Env, project_id: u64) -> i128 {
    let key = DataKey::Premined(project_id);
    let premined = env.storage().persistent().get(&key).unwrap_or(0);
    if premined != 0 {
        bump_persistent(env, &key);
    }
    premined
}

pub fn set_premined(env: &Env, project_id: u64, premined: i128) {
    let key = DataKey::Premined(project_id);
    env.storage().persistent().set(&key, &premined);
    bump_persistent(env, &key);
}
