//! Terminal directory: which terminal contract currently handles a
//! project's accounting. Migration repoints this, and `add_to_balance`
//! uses it to detect the hand-off window.

use soroban_sdk::{contracttype, Address, Env};

use crate::storage::bump_persistent;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DirectoryKey {
    TerminalOf(u64),
}

pub fn terminal_of(env: &Env, project_id: u64) -> Option<Address> {
    let key = DirectoryKey::TerminalOf(project_id);
    let terminal: Option<Address> = env.storage().persistent().get(&key);
    if terminal.is_some() {
        bump_persistent(env, &key);
    }
    terminal
}

pub fn set_terminal(env: &Env, project_id: u64, terminal: &Address) {
    let key = DirectoryKey::TerminalOf(project_id);
    env.storage().persistent().set(&key, terminal);
    bump_persistent(env, &key);
}
