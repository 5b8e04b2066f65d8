//! # Funding Terminal Contract
//!
//! This is the root crate of the **multi-tenant funding terminal**. It
//! exposes the single Soroban contract [`Terminal`] whose entry points cover
//! the full accounting lifecycle of a funded project:
//!
//! | Phase         | Entry Point(s)                                       |
//! |---------------|------------------------------------------------------|
//! | Bootstrap     | [`Terminal::init`]                                   |
//! | Registration  | `create_project`, `register_project`                 |
//! | Configuration | `configure`, `set_payout_splits`, `set_ticket_splits`|
//! | Funding       | [`Terminal::pay`], `add_to_balance`, `print_premined_tickets` |
//! | Withdrawal    | [`Terminal::tap`]                                    |
//! | Redemption    | [`Terminal::redeem`]                                 |
//! | Reconciliation| [`Terminal::print_reserved_tickets`]                 |
//! | Migration     | `allow_migration`, [`Terminal::migrate`]             |
//! | Governance    | `set_fee`, `set_price_feed`, ballot resolution       |
//!
//! ## Architecture
//!
//! The terminal custodies all deposits in one settlement token and owns
//! exactly three pieces of durable accounting state per project: the
//! balance, the signed processed-ticket tracker, and the premined-ticket
//! count. Cycle configuration, the ticket ledger, splits, price feeds, the
//! project registry, and the terminal directory are small stores in their
//! own modules; delegates and split allocators are external contracts
//! reached through the clients in [`delegate`]. This file contains the
//! orchestration: validation order, fee extraction, split distribution,
//! and the tracker algebra tying them together.

#![no_std]

use soroban_sdk::{
    auth::{ContractContext, InvokerContractAuthEntry, SubContractInvocation},
    contract, contracterror, contractimpl, panic_with_error, token, vec, Address, Env, IntoVal,
    String, Symbol, Vec,
};

mod cycles;
mod delegate;
mod directory;
mod events;
mod math;
mod prices;
mod projects;
mod splits;
mod storage;
mod tickets;
mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_delegate;
#[cfg(test)]
mod test_migrate;
#[cfg(test)]
mod test_reserved;

pub use delegate::{
    FundingDelegate, FundingDelegateClient, PayHookResult, RedeemHookResult, SplitAllocator,
    SplitAllocatorClient,
};
pub use math::{BASE_WEIGHT, FIXED_POINT_SCALE, FULL_RATE, SPLIT_TOTAL};
pub use types::{
    BallotState, Cycle, CycleMetadata, CycleProperties, HookAccess, QueuedCycle, Split,
};

use events::{
    AddToBalanceEvent, ConfigureEvent, DistributePayoutEvent, DistributeTicketEvent, MigrateEvent,
    PayEvent, PrintPreminedEvent, PrintReservedEvent, ProjectCreatedEvent, RedeemEvent, TapEvent,
};

/// The distinguished project that collects protocol fees; created at
/// `init` and owned by governance.
pub const PROTOCOL_PROJECT_ID: u64 = 1;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    ProjectNotFound = 3,
    ProjectExists = 4,
    NoActiveCycle = 5,
    PayPaused = 6,
    TapPaused = 7,
    RedeemPaused = 8,
    CurrencyMismatch = 9,
    BadProperties = 10,
    BadRate = 11,
    BadSplits = 12,
    PriceFeedMissing = 13,
    PriceFeedExists = 14,
    ZeroAmount = 15,
    InadequateTickets = 16,
    InadequateProceeds = 17,
    InadequateWithdrawal = 18,
    InsufficientBalance = 19,
    InsufficientTickets = 20,
    TapLimitExceeded = 21,
    PayRejected = 22,
    RedeemRejected = 23,
    PreminingDisabled = 24,
    MigrationNotAllowed = 25,
    UnauthorizedTerminal = 26,
    TerminalNotFound = 27,
    NoQueuedReconfiguration = 28,
    MathOverflow = 29,
    TrackerOverflow = 30,
    ReentrantCall = 31,
}

#[contract]
pub struct Terminal;

#[contractimpl]
impl Terminal {
    // ─────────────────────────────────────────────────────────
    // Bootstrap & registration
    // ─────────────────────────────────────────────────────────

    /// Initialise the terminal: set governance, fix the settlement token,
    /// and create the protocol fee project (id 1) owned by governance.
    ///
    /// Must be called exactly once; subsequent calls panic with
    /// `Error::AlreadyInitialized`.
    pub fn init(env: Env, governance: Address, settlement_token: Address) {
        governance.require_auth();
        storage::init_protocol(&env, &governance, &settlement_token);
        let project_id = projects::create(&env, &governance);
        directory::set_terminal(&env, project_id, &env.current_contract_address());
        events::project_created(&env, project_id, ProjectCreatedEvent { owner: governance });
    }

    /// Register a new project for `owner` and return its id.
    pub fn create_project(env: Env, owner: Address) -> u64 {
        owner.require_auth();
        let _ = storage::governance(&env);
        let project_id = projects::create(&env, &owner);
        directory::set_terminal(&env, project_id, &env.current_contract_address());
        events::project_created(&env, project_id, ProjectCreatedEvent { owner });
        project_id
    }

    /// Adopt a project created on another terminal under its existing id,
    /// so this terminal can serve as a migration destination for it.
    pub fn register_project(env: Env, project_id: u64, owner: Address) {
        storage::governance(&env).require_auth();
        projects::adopt(&env, project_id, &owner);
        events::project_created(&env, project_id, ProjectCreatedEvent { owner });
    }

    // ─────────────────────────────────────────────────────────
    // Configuration
    // ─────────────────────────────────────────────────────────

    /// Configure the project's funding cycle. The first configuration (and
    /// any with `activate_immediately`) takes effect at once; otherwise it
    /// queues behind a reconfiguration ballot. Reserved tickets are
    /// reconciled under the outgoing configuration first, so the tracker
    /// invariant never straddles a configuration change.
    pub fn configure(
        env: Env,
        project_id: u64,
        properties: CycleProperties,
        metadata: CycleMetadata,
        activate_immediately: bool,
    ) -> Cycle {
        let owner = projects::owner_of(&env, project_id);
        owner.require_auth();
        let this = env.current_contract_address();
        match directory::terminal_of(&env, project_id) {
            None => directory::set_terminal(&env, project_id, &this),
            Some(terminal) if terminal != this => {
                panic_with_error!(&env, Error::UnauthorizedTerminal)
            }
            Some(_) => {}
        }
        if let Some(current) = settled_cycle_of(&env, project_id) {
            reconcile_reserved(&env, project_id, &current, String::from_str(&env, "configure"));
        }
        let fee = storage::fee_rate(&env);
        let cycle =
            cycles::configure(&env, project_id, &properties, &metadata, fee, activate_immediately);
        let queued = cycles::ballot_state_of(&env, project_id) == BallotState::Active;
        events::configure(
            &env,
            project_id,
            ConfigureEvent {
                cycle_number: cycle.number,
                queued,
            },
        );
        cycle
    }

    pub fn set_payout_splits(env: Env, project_id: u64, config: u64, list: Vec<Split>) {
        projects::owner_of(&env, project_id).require_auth();
        splits::set_payout_splits(&env, project_id, config, &list);
    }

    pub fn set_ticket_splits(env: Env, project_id: u64, config: u64, list: Vec<Split>) {
        projects::owner_of(&env, project_id).require_auth();
        splits::set_ticket_splits(&env, project_id, config, &list);
    }

    // ─────────────────────────────────────────────────────────
    // Funding
    // ─────────────────────────────────────────────────────────

    /// Deposit `amount` settlement units for `project_id`, minting the
    /// unreserved share of the weighted ticket amount to `beneficiary`.
    /// Returns the cycle number the payment was attributed to.
    ///
    /// `min_tickets` protects the payer against weight or reserved-rate
    /// changes landing between submission and execution.
    pub fn pay(
        env: Env,
        payer: Address,
        project_id: u64,
        beneficiary: Address,
        amount: i128,
        min_tickets: i128,
        prefer_unstaked: bool,
        memo: String,
    ) -> u64 {
        storage::guard_enter(&env);
        payer.require_auth();
        if amount <= 0 {
            panic_with_error!(&env, Error::ZeroAmount);
        }
        token::Client::new(&env, &storage::settlement_token(&env)).transfer(
            &payer,
            &env.current_contract_address(),
            &amount,
        );
        let number = pay_internal(
            &env,
            project_id,
            payer,
            beneficiary,
            amount,
            min_tickets,
            prefer_unstaked,
            memo,
        );
        storage::guard_exit(&env);
        number
    }

    /// Credit funds to a project without minting tickets.
    ///
    /// When this terminal is not the project's registered terminal (the
    /// state during a migration hand-off), the tracker is reset to the
    /// local total supply so reserved tickets cannot be claimed against a
    /// supply this terminal never accounted for.
    pub fn add_to_balance(env: Env, from: Address, project_id: u64, amount: i128) {
        from.require_auth();
        if amount <= 0 {
            panic_with_error!(&env, Error::ZeroAmount);
        }
        token::Client::new(&env, &storage::settlement_token(&env)).transfer(
            &from,
            &env.current_contract_address(),
            &amount,
        );
        let balance = storage::balance_of(&env, project_id);
        match balance.checked_add(amount) {
            Some(balance) => storage::set_balance(&env, project_id, balance),
            None => panic_with_error!(&env, Error::MathOverflow),
        }
        let this = env.current_contract_address();
        if directory::terminal_of(&env, project_id) != Some(this) {
            let supply = tickets::total_supply_of(&env, project_id);
            storage::set_tracker(&env, project_id, supply);
        }
        events::add_to_balance(&env, project_id, AddToBalanceEvent { from, amount });
    }

    /// Mint tickets against a future deposit, before any real deposit has
    /// been recorded. `amount` is denominated in `currency` and converted
    /// through the price feed at the base weight unless `weight` overrides
    /// it.
    pub fn print_premined_tickets(
        env: Env,
        project_id: u64,
        amount: i128,
        currency: u32,
        weight: Option<i128>,
        beneficiary: Address,
        prefer_unstaked: bool,
        memo: String,
    ) {
        let owner = projects::owner_of(&env, project_id);
        owner.require_auth();
        if amount <= 0 {
            panic_with_error!(&env, Error::ZeroAmount);
        }
        if !can_premine(&env, project_id) {
            panic_with_error!(&env, Error::PreminingDisabled);
        }
        let price = prices::price_of(&env, currency);
        let base = match math::to_base_units(amount, price) {
            Some(base) => base,
            None => panic_with_error!(&env, Error::MathOverflow),
        };
        let weight = weight.unwrap_or(BASE_WEIGHT);
        if weight <= 0 {
            panic_with_error!(&env, Error::BadProperties);
        }
        let tickets_to_print = match math::fixed_mul(base, weight) {
            Some(tickets_to_print) => tickets_to_print,
            None => panic_with_error!(&env, Error::MathOverflow),
        };
        if tickets_to_print <= 0 {
            panic_with_error!(&env, Error::ZeroAmount);
        }
        tickets::mint(&env, &beneficiary, project_id, tickets_to_print, prefer_unstaked);
        let tracker = storage::tracker_of(&env, project_id);
        match tracker.checked_add(tickets_to_print) {
            Some(tracker) => storage::set_tracker(&env, project_id, tracker),
            None => panic_with_error!(&env, Error::TrackerOverflow),
        }
        let premined = storage::premined_of(&env, project_id);
        storage::set_premined(&env, project_id, premined + tickets_to_print);
        events::print_premined(
            &env,
            project_id,
            PrintPreminedEvent {
                beneficiary,
                currency_amount: amount,
                currency,
                tickets: tickets_to_print,
                memo,
            },
        );
    }

    // ─────────────────────────────────────────────────────────
    // Withdrawal
    // ─────────────────────────────────────────────────────────

    /// Withdraw `amount` (in the cycle's currency) on the project's
    /// behalf. Callable by anyone: the funds can only reach the protocol
    /// fee project, the configured payout splits, and the project owner.
    /// Returns the converted settlement amount, or 0 when the project has
    /// no cycle.
    pub fn tap(env: Env, project_id: u64, amount: i128, currency: u32, min_converted: i128) -> i128 {
        storage::guard_enter(&env);
        if amount <= 0 {
            panic_with_error!(&env, Error::ZeroAmount);
        }
        if settled_cycle_of(&env, project_id).is_none() {
            storage::guard_exit(&env);
            return 0;
        }
        let cycle = cycles::register_tap(&env, project_id, amount);
        if cycle.metadata.pause_tap {
            panic_with_error!(&env, Error::TapPaused);
        }
        if currency != cycle.properties.currency {
            panic_with_error!(&env, Error::CurrencyMismatch);
        }
        let price = prices::price_of(&env, cycle.properties.currency);
        let converted = match math::to_base_units(amount, price) {
            Some(converted) => converted,
            None => panic_with_error!(&env, Error::MathOverflow),
        };
        if converted < min_converted {
            panic_with_error!(&env, Error::InadequateWithdrawal);
        }
        let balance = storage::balance_of(&env, project_id);
        if converted > balance {
            panic_with_error!(&env, Error::InsufficientBalance);
        }
        storage::set_balance(&env, project_id, balance - converted);

        let owner = projects::owner_of(&env, project_id);
        let fee = if cycle.fee > 0 && project_id != PROTOCOL_PROJECT_ID {
            match math::fee_amount(converted, cycle.fee) {
                Some(fee) => fee,
                None => panic_with_error!(&env, Error::MathOverflow),
            }
        } else {
            0
        };
        if fee > 0 {
            // The fee is itself a deposit into the protocol project, with
            // the tapping project's owner as ticket beneficiary.
            pay_internal(
                &env,
                PROTOCOL_PROJECT_ID,
                env.current_contract_address(),
                owner.clone(),
                fee,
                0,
                false,
                String::from_str(&env, "protocol fee"),
            );
        }
        let net = converted - fee;
        let memo = String::from_str(&env, "tap");
        let distributed = distribute_payout_splits(&env, project_id, &cycle, net, &memo);
        let leftover = net - distributed;
        if leftover > 0 {
            token::Client::new(&env, &storage::settlement_token(&env)).transfer(
                &env.current_contract_address(),
                &owner,
                &leftover,
            );
        }
        events::tap(
            &env,
            project_id,
            TapEvent {
                cycle_number: cycle.number,
                owner,
                currency_amount: amount,
                gross: converted,
                fee,
                leftover,
            },
        );
        storage::guard_exit(&env);
        converted
    }

    // ─────────────────────────────────────────────────────────
    // Redemption
    // ─────────────────────────────────────────────────────────

    /// Burn `count` of `holder`'s tickets for a share of the project's
    /// overflow, priced by the bonding curve or the cycle's delegate.
    /// Sending the proceeds to this contract's own address burns without
    /// payout. Returns the released amount.
    pub fn redeem(
        env: Env,
        holder: Address,
        project_id: u64,
        count: i128,
        min_proceeds: i128,
        destination: Address,
        prefer_unstaked: bool,
        memo: String,
    ) -> i128 {
        storage::guard_enter(&env);
        holder.require_auth();
        if count < 0 {
            panic_with_error!(&env, Error::ZeroAmount);
        }
        if tickets::balance_of(&env, &holder, project_id) < count {
            panic_with_error!(&env, Error::InsufficientTickets);
        }
        let cycle = settled_cycle_of(&env, project_id);
        if let Some(cycle) = &cycle {
            if cycle.metadata.pause_redeem {
                panic_with_error!(&env, Error::RedeemPaused);
            }
        }
        let this = env.current_contract_address();
        let pure_burn = destination == this;
        let (proceeds, access, memo) = if pure_burn {
            (0i128, HookAccess::Allow, memo)
        } else {
            let cycle = match &cycle {
                Some(cycle) => cycle,
                None => panic_with_error!(&env, Error::NoActiveCycle),
            };
            match (&cycle.metadata.delegate, cycle.metadata.use_delegate_on_redeem) {
                (Some(delegate), true) => {
                    let curve_proceeds = claimable(&env, project_id, count, cycle);
                    let result = FundingDelegateClient::new(&env, delegate).redeem_hook(
                        &project_id,
                        &holder,
                        &count,
                        &curve_proceeds,
                        &memo,
                    );
                    (result.proceeds, result.access, result.memo)
                }
                _ => (claimable(&env, project_id, count, cycle), HookAccess::Allow, memo),
            }
        };
        if access == HookAccess::Disallow {
            panic_with_error!(&env, Error::RedeemRejected);
        }
        if !pure_burn {
            if proceeds < min_proceeds {
                panic_with_error!(&env, Error::InadequateProceeds);
            }
            if proceeds > storage::balance_of(&env, project_id) {
                panic_with_error!(&env, Error::InsufficientBalance);
            }
        }
        if count > 0 {
            tickets::burn(&env, &holder, project_id, count, prefer_unstaked);
            let tracker = storage::tracker_of(&env, project_id);
            match math::tracker_after_redeem(tracker, count) {
                Some(tracker) => storage::set_tracker(&env, project_id, tracker),
                None => panic_with_error!(&env, Error::TrackerOverflow),
            }
        }
        if proceeds > 0 {
            let balance = storage::balance_of(&env, project_id);
            storage::set_balance(&env, project_id, balance - proceeds);
            token::Client::new(&env, &storage::settlement_token(&env)).transfer(
                &this,
                &destination,
                &proceeds,
            );
        }
        if access == HookAccess::AllowWithCallback {
            if let Some(cycle) = &cycle {
                if let Some(delegate) = &cycle.metadata.delegate {
                    FundingDelegateClient::new(&env, delegate).did_redeem(
                        &project_id,
                        &holder,
                        &destination,
                        &count,
                        &proceeds,
                        &memo,
                    );
                }
            }
        }
        events::redeem(
            &env,
            project_id,
            RedeemEvent {
                holder,
                destination,
                count,
                proceeds,
                memo,
            },
        );
        storage::guard_exit(&env);
        proceeds
    }

    // ─────────────────────────────────────────────────────────
    // Reserved tickets
    // ─────────────────────────────────────────────────────────

    /// Mint the tickets owed to the project's reserved list since the last
    /// reconciliation, distributing them across the ticket splits with the
    /// remainder to the owner. A no-op returning 0 once the tracker equals
    /// the total supply. Callable by anyone.
    pub fn print_reserved_tickets(env: Env, project_id: u64, memo: String) -> i128 {
        storage::guard_enter(&env);
        let amount = match settled_cycle_of(&env, project_id) {
            Some(cycle) => print_reserved_internal(&env, project_id, &cycle, memo),
            None => 0,
        };
        storage::guard_exit(&env);
        amount
    }

    // ─────────────────────────────────────────────────────────
    // Migration
    // ─────────────────────────────────────────────────────────

    /// Move the project's balance and operations to another allow-listed
    /// terminal. Reserved tickets are reconciled first; the balance is
    /// zeroed locally and forwarded through the destination's
    /// `add_to_balance`; the directory is repointed.
    pub fn migrate(env: Env, project_id: u64, to: Address) {
        storage::guard_enter(&env);
        let owner = projects::owner_of(&env, project_id);
        owner.require_auth();
        if !storage::migration_allowed(&env, &to) {
            panic_with_error!(&env, Error::MigrationNotAllowed);
        }
        let this = env.current_contract_address();
        match directory::terminal_of(&env, project_id) {
            Some(terminal) if terminal == this => {}
            _ => panic_with_error!(&env, Error::UnauthorizedTerminal),
        }
        if let Some(cycle) = settled_cycle_of(&env, project_id) {
            reconcile_reserved(&env, project_id, &cycle, String::from_str(&env, "migrate"));
        }
        let balance = storage::balance_of(&env, project_id);
        storage::set_balance(&env, project_id, 0);
        if balance > 0 {
            let token_address = storage::settlement_token(&env);
            authorize_outbound_transfer(&env, &token_address, &to, balance);
            TerminalClient::new(&env, &to).add_to_balance(&this, &project_id, &balance);
        }
        directory::set_terminal(&env, project_id, &to);
        events::migrate(&env, project_id, MigrateEvent { to, amount: balance });
        storage::guard_exit(&env);
    }

    // ─────────────────────────────────────────────────────────
    // Governance
    // ─────────────────────────────────────────────────────────

    pub fn allow_migration(env: Env, terminal: Address) {
        storage::governance(&env).require_auth();
        storage::set_migration_allowed(&env, &terminal);
        events::allow_migration(&env, &terminal);
    }

    pub fn set_fee(env: Env, rate: u32) {
        storage::governance(&env).require_auth();
        if rate > FULL_RATE {
            panic_with_error!(&env, Error::BadRate);
        }
        storage::set_fee_rate(&env, rate);
        events::set_fee(&env, rate);
    }

    pub fn set_price_feed(env: Env, currency: u32, price: i128) {
        storage::governance(&env).require_auth();
        prices::set_feed(&env, currency, price);
        events::price_feed(&env, currency, price);
    }

    pub fn approve_reconfiguration(env: Env, project_id: u64) {
        storage::governance(&env).require_auth();
        cycles::mark_approved(&env, project_id);
    }

    pub fn reject_reconfiguration(env: Env, project_id: u64) {
        storage::governance(&env).require_auth();
        cycles::drop_queued(&env, project_id);
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    pub fn balance_of(env: Env, project_id: u64) -> i128 {
        storage::balance_of(&env, project_id)
    }

    pub fn processed_ticket_tracker_of(env: Env, project_id: u64) -> i128 {
        storage::tracker_of(&env, project_id)
    }

    pub fn premined_ticket_count_of(env: Env, project_id: u64) -> i128 {
        storage::premined_of(&env, project_id)
    }

    pub fn can_print_premined_tickets(env: Env, project_id: u64) -> bool {
        can_premine(&env, project_id)
    }

    /// Funds beyond what the current cycle can still tap; the sole base
    /// for redemption proceeds.
    pub fn current_overflow_of(env: Env, project_id: u64) -> i128 {
        match cycles::current_cycle_of(&env, project_id) {
            Some(cycle) => current_overflow(&env, project_id, &cycle),
            None => storage::balance_of(&env, project_id),
        }
    }

    /// Bonding-curve proceeds `count` tickets would redeem for right now.
    pub fn claimable_overflow_of(env: Env, project_id: u64, count: i128) -> i128 {
        match cycles::current_cycle_of(&env, project_id) {
            Some(cycle) => claimable(&env, project_id, count, &cycle),
            None => 0,
        }
    }

    /// Reserved tickets owed but not yet printed under the current cycle.
    pub fn reserved_ticket_amount_of(env: Env, project_id: u64) -> i128 {
        let cycle = match cycles::current_cycle_of(&env, project_id) {
            Some(cycle) => cycle,
            None => return 0,
        };
        let supply = tickets::total_supply_of(&env, project_id);
        let tracker = storage::tracker_of(&env, project_id);
        match math::reserved_ticket_amount(tracker, cycle.metadata.reserved_rate, supply) {
            Some(amount) => amount,
            None => panic_with_error!(&env, Error::MathOverflow),
        }
    }

    pub fn fee_rate(env: Env) -> u32 {
        storage::fee_rate(&env)
    }

    pub fn migration_is_allowed(env: Env, terminal: Address) -> bool {
        storage::migration_allowed(&env, &terminal)
    }

    pub fn current_cycle_of(env: Env, project_id: u64) -> Option<Cycle> {
        cycles::current_cycle_of(&env, project_id)
    }

    pub fn ballot_state_of(env: Env, project_id: u64) -> BallotState {
        cycles::ballot_state_of(&env, project_id)
    }

    pub fn owner_of(env: Env, project_id: u64) -> Address {
        projects::owner_of(&env, project_id)
    }

    pub fn terminal_of(env: Env, project_id: u64) -> Option<Address> {
        directory::terminal_of(&env, project_id)
    }

    pub fn ticket_balance_of(env: Env, holder: Address, project_id: u64) -> i128 {
        tickets::balance_of(&env, &holder, project_id)
    }

    pub fn staked_ticket_balance_of(env: Env, holder: Address, project_id: u64) -> i128 {
        tickets::staked_balance_of(&env, &holder, project_id)
    }

    pub fn unstaked_ticket_balance_of(env: Env, holder: Address, project_id: u64) -> i128 {
        tickets::unstaked_balance_of(&env, &holder, project_id)
    }

    pub fn total_ticket_supply_of(env: Env, project_id: u64) -> i128 {
        tickets::total_supply_of(&env, project_id)
    }

    pub fn payout_splits_of(env: Env, project_id: u64, config: u64) -> Vec<Split> {
        splits::payout_splits_of(&env, project_id, config)
    }

    pub fn ticket_splits_of(env: Env, project_id: u64, config: u64) -> Vec<Split> {
        splits::ticket_splits_of(&env, project_id, config)
    }
}

// ─────────────────────────────────────────────────────────────
// Internal orchestration
// ─────────────────────────────────────────────────────────────

/// The current cycle after applying any approved reconfiguration. The
/// promotion reconciles reserved tickets under the outgoing configuration
/// first.
fn settled_cycle_of(env: &Env, project_id: u64) -> Option<Cycle> {
    if cycles::queued_is_approved(env, project_id) {
        if let Some(current) = cycles::current_cycle_of(env, project_id) {
            reconcile_reserved(env, project_id, &current, String::from_str(env, "reconfigure"));
        }
        return Some(cycles::promote_queued(env, project_id));
    }
    cycles::current_cycle_of(env, project_id)
}

fn reconcile_reserved(env: &Env, project_id: u64, cycle: &Cycle, memo: String) {
    if storage::tracker_of(env, project_id) != tickets::total_supply_of(env, project_id) {
        print_reserved_internal(env, project_id, cycle, memo);
    }
}

/// Deposit accounting shared by `pay`, the fee route, and split-target
/// routing. The settlement tokens are already in custody when this runs.
#[allow(clippy::too_many_arguments)]
fn pay_internal(
    env: &Env,
    project_id: u64,
    payer: Address,
    beneficiary: Address,
    amount: i128,
    min_tickets: i128,
    prefer_unstaked: bool,
    memo: String,
) -> u64 {
    let cycle = match settled_cycle_of(env, project_id) {
        Some(cycle) => cycle,
        None => panic_with_error!(env, Error::NoActiveCycle),
    };
    if cycle.metadata.pause_pay {
        panic_with_error!(env, Error::PayPaused);
    }
    let (weight, memo, access) = match (&cycle.metadata.delegate, cycle.metadata.use_delegate_on_pay)
    {
        (Some(delegate), true) => {
            let result = FundingDelegateClient::new(env, delegate).pay_hook(
                &project_id,
                &payer,
                &beneficiary,
                &amount,
                &cycle.properties.weight,
                &memo,
            );
            (result.weight, result.memo, result.access)
        }
        _ => (cycle.properties.weight, memo, HookAccess::Allow),
    };
    if access == HookAccess::Disallow {
        panic_with_error!(env, Error::PayRejected);
    }
    let weighted = match math::fixed_mul(amount, weight) {
        Some(weighted) => weighted,
        None => panic_with_error!(env, Error::MathOverflow),
    };
    let tickets_to_print = match math::unreserved_portion(weighted, cycle.metadata.reserved_rate) {
        Some(tickets_to_print) => tickets_to_print,
        None => panic_with_error!(env, Error::MathOverflow),
    };
    if tickets_to_print < min_tickets {
        panic_with_error!(env, Error::InadequateTickets);
    }
    let balance = storage::balance_of(env, project_id);
    match balance.checked_add(amount) {
        Some(balance) => storage::set_balance(env, project_id, balance),
        None => panic_with_error!(env, Error::MathOverflow),
    }
    if tickets_to_print > 0 {
        tickets::mint(env, &beneficiary, project_id, tickets_to_print, prefer_unstaked);
    } else if weighted > 0 {
        // Fully reserved cycle: accrue the whole weighted amount on the
        // tracker instead of minting.
        let tracker = storage::tracker_of(env, project_id);
        match tracker.checked_sub(weighted) {
            Some(tracker) => storage::set_tracker(env, project_id, tracker),
            None => panic_with_error!(env, Error::TrackerOverflow),
        }
    }
    if access == HookAccess::AllowWithCallback {
        if let Some(delegate) = &cycle.metadata.delegate {
            FundingDelegateClient::new(env, delegate).did_pay(
                &project_id,
                &payer,
                &beneficiary,
                &amount,
                &weighted,
                &tickets_to_print,
                &memo,
            );
        }
    }
    events::pay(
        env,
        project_id,
        PayEvent {
            cycle_number: cycle.number,
            payer,
            beneficiary,
            amount,
            tickets: tickets_to_print,
            memo,
        },
    );
    cycle.number
}

/// Mint the owed reserved tickets, set the tracker to the new total
/// supply, and distribute through the ticket splits. Returns the printed
/// amount.
fn print_reserved_internal(env: &Env, project_id: u64, cycle: &Cycle, memo: String) -> i128 {
    let supply = tickets::total_supply_of(env, project_id);
    let tracker = storage::tracker_of(env, project_id);
    let amount = match math::reserved_ticket_amount(tracker, cycle.metadata.reserved_rate, supply) {
        Some(amount) => amount,
        None => panic_with_error!(env, Error::MathOverflow),
    };
    let new_tracker = match supply.checked_add(amount) {
        Some(new_tracker) => new_tracker,
        None => panic_with_error!(env, Error::TrackerOverflow),
    };
    storage::set_tracker(env, project_id, new_tracker);
    if amount == 0 {
        return 0;
    }
    let owner = projects::owner_of(env, project_id);
    let distributed = distribute_ticket_splits(env, project_id, cycle.number, amount);
    let owner_amount = amount - distributed;
    if owner_amount > 0 {
        tickets::mint(env, &owner, project_id, owner_amount, false);
    }
    events::print_reserved(
        env,
        project_id,
        PrintReservedEvent {
            owner,
            amount,
            owner_amount,
            tracker: new_tracker,
            memo,
        },
    );
    amount
}

fn distribute_ticket_splits(env: &Env, project_id: u64, config: u64, amount: i128) -> i128 {
    let list = splits::ticket_splits_of(env, project_id, config);
    let mut distributed: i128 = 0;
    for split in list.iter() {
        let cut = match math::split_cut(amount, split.percent) {
            Some(cut) => cut,
            None => panic_with_error!(env, Error::MathOverflow),
        };
        if cut == 0 {
            continue;
        }
        tickets::mint(env, &split.beneficiary, project_id, cut, split.prefer_unstaked);
        distributed += cut;
        events::distribute_tickets(env, project_id, DistributeTicketEvent { split, amount: cut });
    }
    distributed
}

/// Route `total` through the project's payout splits; returns the summed
/// cuts. Splits can hand their cut to an external allocator, deposit it
/// into another project (through this terminal when it is that project's
/// registered terminal, else through the remote one), or pay a beneficiary
/// directly.
fn distribute_payout_splits(
    env: &Env,
    project_id: u64,
    cycle: &Cycle,
    total: i128,
    memo: &String,
) -> i128 {
    let list = splits::payout_splits_of(env, project_id, cycle.number);
    let token_address = storage::settlement_token(env);
    let this = env.current_contract_address();
    let mut distributed: i128 = 0;
    for split in list.iter() {
        let cut = match math::split_cut(total, split.percent) {
            Some(cut) => cut,
            None => panic_with_error!(env, Error::MathOverflow),
        };
        if cut == 0 {
            continue;
        }
        distributed += cut;
        if let Some(allocator) = &split.allocator {
            token::Client::new(env, &token_address).transfer(&this, allocator, &cut);
            SplitAllocatorClient::new(env, allocator).allocate(
                &project_id,
                &split.project_id,
                &split.beneficiary,
                &cut,
            );
        } else if let Some(target) = split.project_id {
            let terminal = match directory::terminal_of(env, target) {
                Some(terminal) => terminal,
                None => panic_with_error!(env, Error::TerminalNotFound),
            };
            if terminal == this {
                pay_internal(
                    env,
                    target,
                    this.clone(),
                    split.beneficiary.clone(),
                    cut,
                    0,
                    split.prefer_unstaked,
                    memo.clone(),
                );
            } else {
                authorize_outbound_transfer(env, &token_address, &terminal, cut);
                TerminalClient::new(env, &terminal).pay(
                    &this,
                    &target,
                    &split.beneficiary,
                    &cut,
                    &0,
                    &split.prefer_unstaked,
                    memo,
                );
            }
        } else {
            token::Client::new(env, &token_address).transfer(&this, &split.beneficiary, &cut);
        }
        events::distribute_payout(
            env,
            project_id,
            DistributePayoutEvent {
                cycle_number: cycle.number,
                split,
                amount: cut,
            },
        );
    }
    distributed
}

fn current_overflow(env: &Env, project_id: u64, cycle: &Cycle) -> i128 {
    let balance = storage::balance_of(env, project_id);
    let remaining = cycle.properties.target - cycle.tapped;
    let price = prices::price_of(env, cycle.properties.currency);
    let limit = match math::to_base_units(remaining, price) {
        Some(limit) => limit,
        None => panic_with_error!(env, Error::MathOverflow),
    };
    if balance > limit {
        balance - limit
    } else {
        0
    }
}

fn claimable(env: &Env, project_id: u64, count: i128, cycle: &Cycle) -> i128 {
    let overflow = current_overflow(env, project_id, cycle);
    if overflow == 0 {
        return 0;
    }
    let supply = tickets::total_supply_of(env, project_id);
    let tracker = storage::tracker_of(env, project_id);
    let reserved = match math::reserved_ticket_amount(tracker, cycle.metadata.reserved_rate, supply)
    {
        Some(reserved) => reserved,
        None => panic_with_error!(env, Error::MathOverflow),
    };
    let eligible = match supply.checked_add(reserved) {
        Some(eligible) => eligible,
        None => panic_with_error!(env, Error::MathOverflow),
    };
    let rate = if cycles::ballot_state_of(env, project_id) == BallotState::Active {
        cycle.metadata.reconfig_bonding_curve_rate
    } else {
        cycle.metadata.bonding_curve_rate
    };
    match math::claimable_proceeds(overflow, count, eligible, rate) {
        Some(proceeds) => proceeds,
        None => panic_with_error!(env, Error::MathOverflow),
    }
}

fn can_premine(env: &Env, project_id: u64) -> bool {
    let premined = storage::premined_of(env, project_id);
    let tracker = storage::tracker_of(env, project_id);
    tickets::total_supply_of(env, project_id) == premined && tracker >= 0 && tracker == premined
}

/// Pre-authorise the settlement-token transfer a callee terminal will pull
/// from this contract during a cross-terminal deposit or migration.
fn authorize_outbound_transfer(env: &Env, token_address: &Address, to: &Address, amount: i128) {
    env.authorize_as_current_contract(vec![
        env,
        InvokerContractAuthEntry::Contract(SubContractInvocation {
            context: ContractContext {
                contract: token_address.clone(),
                fn_name: Symbol::new(env, "transfer"),
                args: (env.current_contract_address(), to.clone(), amount).into_val(env),
            },
            sub_invocations: vec![env],
        }),
    ]);
}
