//! Cross-contract interfaces the terminal calls out to.
//!
//! A funding delegate is chosen per cycle configuration and can override
//! minted weight on pay, override or veto redemption proceeds, and receive
//! a post-action callback when its hook answered `AllowWithCallback`.
//! A split allocator receives a payout split's cut (the tokens are
//! transferred to it before the call) along with the routing context.

use soroban_sdk::{contractclient, contracttype, Address, Env, String};

use crate::types::HookAccess;

/// Answer from a delegate's pay hook.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PayHookResult {
    /// Effective mint weight, replacing the cycle's configured weight.
    pub weight: i128,
    /// Possibly rewritten memo, recorded on the payment event.
    pub memo: String,
    pub access: HookAccess,
}

/// Answer from a delegate's redeem hook.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RedeemHookResult {
    /// Proceeds to release, replacing the bonding-curve amount.
    pub proceeds: i128,
    pub memo: String,
    pub access: HookAccess,
}

#[contractclient(name = "FundingDelegateClient")]
pub trait FundingDelegate {
    fn pay_hook(
        env: Env,
        project_id: u64,
        payer: Address,
        beneficiary: Address,
        amount: i128,
        weight: i128,
        memo: String,
    ) -> PayHookResult;

    fn redeem_hook(
        env: Env,
        project_id: u64,
        holder: Address,
        count: i128,
        proceeds: i128,
        memo: String,
    ) -> RedeemHookResult;

    fn did_pay(
        env: Env,
        project_id: u64,
        payer: Address,
        beneficiary: Address,
        amount: i128,
        weighted_amount: i128,
        tickets: i128,
        memo: String,
    );

    fn did_redeem(
        env: Env,
        project_id: u64,
        holder: Address,
        destination: Address,
        count: i128,
        proceeds: i128,
        memo: String,
    );
}

#[contractclient(name = "SplitAllocatorClient")]
pub trait SplitAllocator {
    /// Handle a payout cut. The settlement tokens have already been
    /// transferred to the allocator when this runs.
    fn allocate(
        env: Env,
        project_id: u64,
        target_project_id: Option<u64>,
        beneficiary: Address,
        amount: i128,
    );
}
