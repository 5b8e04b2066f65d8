extern crate std;

use soroban_sdk::{
    contract, contractimpl, symbol_short, testutils::Address as _, token, Address, Env, String,
};

use crate::{
    CycleMetadata, CycleProperties, Error, FundingDelegate, HookAccess, PayHookResult,
    RedeemHookResult, Terminal, TerminalClient, FIXED_POINT_SCALE,
};

const MODE_ALLOW: u32 = 0;
const MODE_CALLBACK: u32 = 1;
const MODE_DISALLOW: u32 = 2;

/// A delegate that doubles the pay weight, pins redemption proceeds to a
/// configured value, and counts its callbacks.
#[contract]
pub struct TestDelegate;

#[contractimpl]
impl TestDelegate {
    pub fn set_mode(env: Env, mode: u32) {
        env.storage().instance().set(&symbol_short!("mode"), &mode);
    }

    pub fn set_proceeds(env: Env, proceeds: i128) {
        env.storage().instance().set(&symbol_short!("proceeds"), &proceeds);
    }

    pub fn pay_callbacks(env: Env) -> u32 {
        env.storage().instance().get(&symbol_short!("did_pay")).unwrap_or(0)
    }

    pub fn redeem_callbacks(env: Env) -> u32 {
        env.storage().instance().get(&symbol_short!("did_rdm")).unwrap_or(0)
    }
}

fn configured_access(env: &Env) -> HookAccess {
    match env
        .storage()
        .instance()
        .get(&symbol_short!("mode"))
        .unwrap_or(MODE_ALLOW)
    {
        MODE_CALLBACK => HookAccess::AllowWithCallback,
        MODE_DISALLOW => HookAccess::Disallow,
        _ => HookAccess::Allow,
    }
}

#[contractimpl]
impl FundingDelegate for TestDelegate {
    fn pay_hook(
        env: Env,
        _project_id: u64,
        _payer: Address,
        _beneficiary: Address,
        _amount: i128,
        weight: i128,
        _memo: String,
    ) -> PayHookResult {
        PayHookResult {
            weight: weight * 2,
            memo: String::from_str(&env, "delegated pay"),
            access: configured_access(&env),
        }
    }

    fn redeem_hook(
        env: Env,
        _project_id: u64,
        _holder: Address,
        _count: i128,
        proceeds: i128,
        _memo: String,
    ) -> RedeemHookResult {
        let overridden = env
            .storage()
            .instance()
            .get(&symbol_short!("proceeds"))
            .unwrap_or(proceeds);
        RedeemHookResult {
            proceeds: overridden,
            memo: String::from_str(&env, "delegated redeem"),
            access: configured_access(&env),
        }
    }

    fn did_pay(
        env: Env,
        _project_id: u64,
        _payer: Address,
        _beneficiary: Address,
        _amount: i128,
        _weighted_amount: i128,
        _tickets: i128,
        _memo: String,
    ) {
        let count: u32 = env.storage().instance().get(&symbol_short!("did_pay")).unwrap_or(0);
        env.storage().instance().set(&symbol_short!("did_pay"), &(count + 1));
    }

    fn did_redeem(
        env: Env,
        _project_id: u64,
        _holder: Address,
        _destination: Address,
        _count: i128,
        _proceeds: i128,
        _memo: String,
    ) {
        let count: u32 = env.storage().instance().get(&symbol_short!("did_rdm")).unwrap_or(0);
        env.storage().instance().set(&symbol_short!("did_rdm"), &(count + 1));
    }
}

struct World {
    env: Env,
    client: TerminalClient<'static>,
    delegate: TestDelegateClient<'static>,
    delegate_id: Address,
    token_admin: token::StellarAssetClient<'static>,
}

fn setup() -> World {
    let env = Env::default();
    env.mock_all_auths();
    let governance = Address::generate(&env);
    let token_admin = Address::generate(&env);
    let sac = env.register_stellar_asset_contract_v2(token_admin.clone());
    let token_admin_client = token::StellarAssetClient::new(&env, &sac.address());
    let contract_id = env.register(Terminal, ());
    let client = TerminalClient::new(&env, &contract_id);
    client.init(&governance, &sac.address());
    let delegate_id = env.register(TestDelegate, ());
    let delegate = TestDelegateClient::new(&env, &delegate_id);
    World {
        env,
        client,
        delegate,
        delegate_id,
        token_admin,
    }
}

fn delegate_metadata(world: &World, on_pay: bool, on_redeem: bool) -> CycleMetadata {
    CycleMetadata {
        reserved_rate: 0,
        bonding_curve_rate: 200,
        reconfig_bonding_curve_rate: 200,
        pause_pay: false,
        pause_tap: false,
        pause_redeem: false,
        delegate: Some(world.delegate_id.clone()),
        use_delegate_on_pay: on_pay,
        use_delegate_on_redeem: on_redeem,
    }
}

fn properties(target: i128) -> CycleProperties {
    CycleProperties {
        target,
        currency: 0,
        duration: 604_800,
        weight: FIXED_POINT_SCALE,
    }
}

fn memo(env: &Env, text: &str) -> String {
    String::from_str(env, text)
}

#[test]
fn pay_hook_overrides_the_mint_weight() {
    let world = setup();
    let owner = Address::generate(&world.env);
    let payer = Address::generate(&world.env);
    let project = world.client.create_project(&owner);
    world
        .client
        .configure(&project, &properties(10_000), &delegate_metadata(&world, true, false), &true);
    world.delegate.set_mode(&MODE_CALLBACK);
    world.token_admin.mint(&payer, &100);

    world
        .client
        .pay(&payer, &project, &payer, &100, &0, &false, &memo(&world.env, "in"));

    // Weight doubled by the hook: 200 tickets for a 100 deposit.
    assert_eq!(world.client.ticket_balance_of(&payer, &project), 200);
    assert_eq!(world.client.balance_of(&project), 100);
    assert_eq!(world.delegate.pay_callbacks(), 1);
}

#[test]
fn pay_hook_can_disallow_the_deposit() {
    let world = setup();
    let owner = Address::generate(&world.env);
    let payer = Address::generate(&world.env);
    let project = world.client.create_project(&owner);
    world
        .client
        .configure(&project, &properties(10_000), &delegate_metadata(&world, true, false), &true);
    world.delegate.set_mode(&MODE_DISALLOW);
    world.token_admin.mint(&payer, &100);

    assert_eq!(
        world
            .client
            .try_pay(&payer, &project, &payer, &100, &0, &false, &memo(&world.env, "in")),
        Err(Ok(Error::PayRejected))
    );
    assert_eq!(world.client.balance_of(&project), 0);
}

#[test]
fn delegate_is_ignored_when_the_pay_flag_is_off() {
    let world = setup();
    let owner = Address::generate(&world.env);
    let payer = Address::generate(&world.env);
    let project = world.client.create_project(&owner);
    world
        .client
        .configure(&project, &properties(10_000), &delegate_metadata(&world, false, false), &true);
    world.token_admin.mint(&payer, &100);

    world
        .client
        .pay(&payer, &project, &payer, &100, &0, &false, &memo(&world.env, "in"));

    assert_eq!(world.client.ticket_balance_of(&payer, &project), 100);
    assert_eq!(world.delegate.pay_callbacks(), 0);
}

#[test]
fn redeem_hook_overrides_the_proceeds() {
    let world = setup();
    let owner = Address::generate(&world.env);
    let holder = Address::generate(&world.env);
    let destination = Address::generate(&world.env);
    let project = world.client.create_project(&owner);
    world.client.print_premined_tickets(
        &project,
        &100,
        &0,
        &Some(FIXED_POINT_SCALE),
        &holder,
        &false,
        &memo(&world.env, "seed"),
    );
    world
        .client
        .configure(&project, &properties(50), &delegate_metadata(&world, false, true), &true);
    let funder = Address::generate(&world.env);
    world.token_admin.mint(&funder, &150);
    world.client.add_to_balance(&funder, &project, &150);
    world.delegate.set_mode(&MODE_CALLBACK);
    world.delegate.set_proceeds(&7);

    let proceeds = world.client.redeem(
        &holder,
        &project,
        &10,
        &7,
        &destination,
        &false,
        &memo(&world.env, "out"),
    );

    assert_eq!(proceeds, 7);
    assert_eq!(world.client.balance_of(&project), 143);
    assert_eq!(world.client.total_ticket_supply_of(&project), 90);
    assert_eq!(world.delegate.redeem_callbacks(), 1);
}

#[test]
fn redeem_hook_can_veto_the_redemption() {
    let world = setup();
    let owner = Address::generate(&world.env);
    let holder = Address::generate(&world.env);
    let destination = Address::generate(&world.env);
    let project = world.client.create_project(&owner);
    world.client.print_premined_tickets(
        &project,
        &100,
        &0,
        &Some(FIXED_POINT_SCALE),
        &holder,
        &false,
        &memo(&world.env, "seed"),
    );
    world
        .client
        .configure(&project, &properties(50), &delegate_metadata(&world, false, true), &true);
    world.delegate.set_mode(&MODE_DISALLOW);

    assert_eq!(
        world.client.try_redeem(
            &holder,
            &project,
            &10,
            &0,
            &destination,
            &false,
            &memo(&world.env, "out"),
        ),
        Err(Ok(Error::RedeemRejected))
    );
    assert_eq!(world.client.total_ticket_supply_of(&project), 100);
}
