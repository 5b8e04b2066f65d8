//! # Types
//!
//! Shared data structures used across all modules of the funding terminal.
//!
//! ## Design decisions
//!
//! ### Explicit cycle metadata, not a bitmask
//!
//! Pause flags, curve rates, and the delegate reference live in a named
//! [`CycleMetadata`] record. The delegate is an `Option<Address>`; absent
//! means base behavior, with no sentinel value standing in for "none".
//!
//! ### Rates out of 200
//!
//! `reserved_rate`, `bonding_curve_rate`, and
//! `reconfig_bonding_curve_rate` are expressed out of 200
//! (100% == 200), leaving headroom above nominal full allocation in
//! intermediate math. Split percentages are out of 10 000. See
//! [`crate::math`] for the arithmetic built on these.

use soroban_sdk::{contracttype, Address};

/// State of a project's pending reconfiguration ballot.
///
/// `Active` is the window in which redemption switches to the cycle's
/// reconfiguration bonding-curve rate.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BallotState {
    /// No reconfiguration is queued.
    None,
    /// A reconfiguration is queued and awaiting approval.
    Active,
    /// The queued reconfiguration is approved; it becomes current on the
    /// next accounting operation.
    Approved,
}

/// Caller-chosen properties of a funding cycle.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CycleProperties {
    /// Spending target for the cycle, denominated in `currency`.
    pub target: i128,
    /// Currency code the target is denominated in. `0` is the settlement
    /// asset itself.
    pub currency: u32,
    /// Intended cycle duration in seconds. Informational; cycles roll over
    /// through the ballot mechanism, not a clock.
    pub duration: u64,
    /// Tickets minted per settlement base unit, fixed-point scaled by
    /// [`crate::math::FIXED_POINT_SCALE`].
    pub weight: i128,
}

/// Accounting flags and rates for a funding cycle.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CycleMetadata {
    /// Share of minted ticket weight withheld for the project's reserved
    /// list, out of 200.
    pub reserved_rate: u32,
    /// Redemption curve rate in effect normally, out of 200.
    pub bonding_curve_rate: u32,
    /// Redemption curve rate in effect while a reconfiguration ballot is
    /// active, out of 200.
    pub reconfig_bonding_curve_rate: u32,
    pub pause_pay: bool,
    pub pause_tap: bool,
    pub pause_redeem: bool,
    /// Optional funding delegate contract consulted on pay and/or redeem.
    pub delegate: Option<Address>,
    pub use_delegate_on_pay: bool,
    pub use_delegate_on_redeem: bool,
}

/// A project's active funding cycle.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Cycle {
    pub project_id: u64,
    /// Monotonically increasing configuration number, starting at 1.
    pub number: u64,
    pub properties: CycleProperties,
    pub metadata: CycleMetadata,
    /// Protocol fee snapshotted at configuration time, out of 200.
    pub fee: u32,
    /// Amount already withdrawn against `properties.target`, in `currency`.
    pub tapped: i128,
    /// Ledger timestamp of the configuration.
    pub configured_at: u64,
}

/// A queued reconfiguration awaiting ballot resolution.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct QueuedCycle {
    pub properties: CycleProperties,
    pub metadata: CycleMetadata,
    pub fee: u32,
    pub approved: bool,
    pub configured_at: u64,
}

/// A percentage-based recipient of payouts or newly minted tickets.
///
/// Exactly one routing applies, checked in order: `allocator` (external
/// callback contract), `project_id` (deposit into another project; the
/// beneficiary receives the minted tickets), else a direct transfer to
/// `beneficiary`. Ticket splits mint instead of transferring and may only
/// use the direct form.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Split {
    /// Share of the distributed total, out of 10 000.
    pub percent: u32,
    pub beneficiary: Address,
    pub project_id: Option<u64>,
    pub allocator: Option<Address>,
    pub prefer_unstaked: bool,
}

/// Access decision returned by delegate hooks.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HookAccess {
    Allow,
    AllowWithCallback,
    Disallow,
}
