//! Audit events emitted by the terminal.
//!
//! One event per state change, published under a short symbol topic with
//! the project id as the second topic. Every payload carries the fields an
//! external reconciler needs to reconstruct the balance or tracker delta
//! it describes.

use soroban_sdk::{contracttype, symbol_short, Address, Env, String};

use crate::types::Split;

/// A deposit was processed and tickets were minted (or, for a fully
/// reserved cycle, accrued on the tracker).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PayEvent {
    pub cycle_number: u64,
    pub payer: Address,
    pub beneficiary: Address,
    pub amount: i128,
    pub tickets: i128,
    pub memo: String,
}

/// A withdrawal ran: `gross` left the project balance, `fee` went to the
/// protocol project, splits received `gross - fee - leftover`, and
/// `leftover` went to the owner.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TapEvent {
    pub cycle_number: u64,
    pub owner: Address,
    pub currency_amount: i128,
    pub gross: i128,
    pub fee: i128,
    pub leftover: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RedeemEvent {
    pub holder: Address,
    pub destination: Address,
    pub count: i128,
    pub proceeds: i128,
    pub memo: String,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MigrateEvent {
    pub to: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AddToBalanceEvent {
    pub from: Address,
    pub amount: i128,
}

/// Reserved tickets were printed: `amount` total, of which `owner_amount`
/// went to the owner after the ticket splits took their cuts.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PrintReservedEvent {
    pub owner: Address,
    pub amount: i128,
    pub owner_amount: i128,
    pub tracker: i128,
    pub memo: String,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PrintPreminedEvent {
    pub beneficiary: Address,
    pub currency_amount: i128,
    pub currency: u32,
    pub tickets: i128,
    pub memo: String,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DistributePayoutEvent {
    pub cycle_number: u64,
    pub split: Split,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DistributeTicketEvent {
    pub split: Split,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigureEvent {
    pub cycle_number: u64,
    pub queued: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectCreatedEvent {
    pub owner: Address,
}

pub fn pay(env: &Env, project_id: u64, event: PayEvent) {
    env.events()
        .publish((symbol_short!("pay"), project_id), event);
}

pub fn tap(env: &Env, project_id: u64, event: TapEvent) {
    env.events()
        .publish((symbol_short!("tap"), project_id), event);
}

pub fn redeem(env: &Env, project_id: u64, event: RedeemEvent) {
    env.events()
        .publish((symbol_short!("redeem"), project_id), event);
}

pub fn migrate(env: &Env, project_id: u64, event: MigrateEvent) {
    env.events()
        .publish((symbol_short!("migrate"), project_id), event);
}

pub fn add_to_balance(env: &Env, project_id: u64, event: AddToBalanceEvent) {
    env.events()
        .publish((symbol_short!("add_bal"), project_id), event);
}

pub fn print_reserved(env: &Env, project_id: u64, event: PrintReservedEvent) {
    env.events()
        .publish((symbol_short!("res_print"), project_id), event);
}

pub fn print_premined(env: &Env, project_id: u64, event: PrintPreminedEvent) {
    env.events()
        .publish((symbol_short!("pre_print"), project_id), event);
}

pub fn distribute_payout(env: &Env, project_id: u64, event: DistributePayoutEvent) {
    env.events()
        .publish((symbol_short!("split_pay"), project_id), event);
}

pub fn distribute_tickets(env: &Env, project_id: u64, event: DistributeTicketEvent) {
    env.events()
        .publish((symbol_short!("split_tik"), project_id), event);
}

pub fn configure(env: &Env, project_id: u64, event: ConfigureEvent) {
    env.events()
        .publish((symbol_short!("configure"), project_id), event);
}

pub fn project_created(env: &Env, project_id: u64, event: ProjectCreatedEvent) {
    env.events()
        .publish((symbol_short!("project"), project_id), event);
}

pub fn allow_migration(env: &Env, terminal: &Address) {
    env.events()
        .publish((symbol_short!("allow_mig"),), terminal.clone());
}

pub fn set_fee(env: &Env, rate: u32) {
    env.events().publish((symbol_short!("set_fee"),), rate);
}

pub fn price_feed(env: &Env, currency: u32, price: i128) {
    env.events()
        .publish((symbol_short!("price_set"), currency), price);
}
