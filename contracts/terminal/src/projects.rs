//! Minimal project registry: auto-incrementing ids and owner lookup.
//!
//! Project id 1 is the distinguished protocol project, created at `init`
//! and owned by governance; withdrawal fees are deposited into it.

use soroban_sdk::{contracttype, panic_with_error, Address, Env};

use crate::storage::{bump_instance, bump_persistent};
use crate::Error;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ProjectKey {
    /// Global auto-increment counter (Instance).
    Count,
    /// Owner address keyed by project id (Persistent).
    Owner(u64),
}

/// Register a new project for `owner` and return its id. Ids start at 1.
pub fn create(env: &Env, owner: &Address) -> u64 {
    bump_instance(env);
    let next: u64 = env
        .storage()
        .instance()
        .get(&ProjectKey::Count)
        .unwrap_or(0)
        + 1;
    env.storage().instance().set(&ProjectKey::Count, &next);
    set_owner(env, next, owner);
    next
}

/// Adopt a project created elsewhere under an explicit id, e.g. ahead of a
/// migration into this terminal. Fails if the id is already taken locally.
pub fn adopt(env: &Env, project_id: u64, owner: &Address) {
    let key = ProjectKey::Owner(project_id);
    if env.storage().persistent().has(&key) {
        panic_with_error!(env, Error::ProjectExists);
    }
    set_owner(env, project_id, owner);
}

pub fn owner_of(env: &Env, project_id: u64) -> Address {
    let key = ProjectKey::Owner(project_id);
    match env.storage().persistent().get(&key) {
        Some(owner) => {
            bump_persistent(env, &key);
            owner
        }
        None => panic_with_error!(env, Error::ProjectNotFound),
    }
}

pub fn exists(env: &Env, project_id: u64) -> bool {
    env.storage()
        .persistent()
        .has(&ProjectKey::Owner(project_id))
}

fn set_owner(env: &Env, project_id: u64, owner: &Address) {
    let key = ProjectKey::Owner(project_id);
    env.storage().persistent().set(&key, owner);
    bump_persistent(env, &key);
}
