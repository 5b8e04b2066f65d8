extern crate std;

use soroban_sdk::{testutils::Address as _, token, vec, Address, Env, String};

use crate::{
    invariants, CycleMetadata, CycleProperties, Split, Terminal, TerminalClient, FIXED_POINT_SCALE,
};

fn setup() -> (
    Env,
    TerminalClient<'static>,
    Address,
    token::StellarAssetClient<'static>,
) {
    let env = Env::default();
    env.mock_all_auths();
    let governance = Address::generate(&env);
    let token_admin = Address::generate(&env);
    let sac = env.register_stellar_asset_contract_v2(token_admin.clone());
    let token_admin_client = token::StellarAssetClient::new(&env, &sac.address());
    let contract_id = env.register(Terminal, ());
    let client = TerminalClient::new(&env, &contract_id);
    client.init(&governance, &sac.address());
    (env, client, governance, token_admin_client)
}

fn properties(target: i128) -> CycleProperties {
    CycleProperties {
        target,
        currency: 0,
        duration: 604_800,
        weight: FIXED_POINT_SCALE,
    }
}

fn metadata_with_reserved(reserved_rate: u32) -> CycleMetadata {
    CycleMetadata {
        reserved_rate,
        bonding_curve_rate: 200,
        reconfig_bonding_curve_rate: 200,
        pause_pay: false,
        pause_tap: false,
        pause_redeem: false,
        delegate: None,
        use_delegate_on_pay: false,
        use_delegate_on_redeem: false,
    }
}

fn memo(env: &Env, text: &str) -> String {
    String::from_str(env, text)
}

/// Project at reserved rate 50 (25%) with one 300-unit deposit: 225
/// tickets minted to the payer, 75 owed to the reserved list.
fn quarter_reserved_project(
    env: &Env,
    client: &TerminalClient<'static>,
    token_admin: &token::StellarAssetClient<'static>,
    owner: &Address,
) -> u64 {
    let project = client.create_project(owner);
    client.configure(&project, &properties(10_000), &metadata_with_reserved(50), &true);
    let payer = Address::generate(env);
    token_admin.mint(&payer, &300);
    client.pay(&payer, &project, &payer, &300, &0, &false, &memo(env, "fund"));
    project
}

#[test]
fn printing_reserved_tickets_reconciles_the_tracker() {
    let (env, client, _governance, token_admin) = setup();
    let owner = Address::generate(&env);
    let project = quarter_reserved_project(&env, &client, &token_admin, &owner);

    assert_eq!(client.total_ticket_supply_of(&project), 225);
    assert_eq!(client.reserved_ticket_amount_of(&project), 75);

    let printed = client.print_reserved_tickets(&project, &memo(&env, "quarterly"));

    assert_eq!(printed, 75);
    assert_eq!(client.ticket_balance_of(&owner, &project), 75);
    assert_eq!(client.total_ticket_supply_of(&project), 300);
    invariants::assert_tracker_reconciled(
        client.processed_ticket_tracker_of(&project),
        client.total_ticket_supply_of(&project),
    );
    // Reconciled: printing again is a no-op.
    assert_eq!(client.print_reserved_tickets(&project, &memo(&env, "again")), 0);
    assert_eq!(client.total_ticket_supply_of(&project), 300);
}

#[test]
fn reserved_tickets_flow_through_ticket_splits() {
    let (env, client, _governance, token_admin) = setup();
    let owner = Address::generate(&env);
    let crew = Address::generate(&env);
    let project = quarter_reserved_project(&env, &client, &token_admin, &owner);
    client.set_ticket_splits(
        &project,
        &1,
        &vec![
            &env,
            Split {
                percent: 5_000,
                beneficiary: crew.clone(),
                project_id: None,
                allocator: None,
                prefer_unstaked: false,
            },
        ],
    );

    let printed = client.print_reserved_tickets(&project, &memo(&env, "with splits"));

    // floor(75 * 5000 / 10000) = 37 to the split, remainder 38 to the owner.
    assert_eq!(printed, 75);
    assert_eq!(client.ticket_balance_of(&crew, &project), 37);
    assert_eq!(client.ticket_balance_of(&owner, &project), 38);
}

#[test]
fn zero_reserved_rate_round_trip_prints_nothing() {
    let (env, client, _governance, token_admin) = setup();
    let owner = Address::generate(&env);
    let project = client.create_project(&owner);
    client.configure(&project, &properties(10_000), &metadata_with_reserved(0), &true);
    let payer = Address::generate(&env);
    token_admin.mint(&payer, &500);
    client.pay(&payer, &project, &payer, &500, &0, &false, &memo(&env, "fund"));

    let printed = client.print_reserved_tickets(&project, &memo(&env, "nothing owed"));

    assert_eq!(printed, 0);
    assert_eq!(client.total_ticket_supply_of(&project), 500);
    assert_eq!(client.ticket_balance_of(&owner, &project), 0);
}

#[test]
fn printing_without_a_cycle_returns_zero() {
    let (env, client, _governance, _token_admin) = setup();
    let owner = Address::generate(&env);
    let project = client.create_project(&owner);
    assert_eq!(client.print_reserved_tickets(&project, &memo(&env, "no cycle")), 0);
}

#[test]
fn fully_reserved_accrual_is_printable() {
    let (env, client, _governance, token_admin) = setup();
    let owner = Address::generate(&env);
    let project = client.create_project(&owner);
    client.configure(&project, &properties(10_000), &metadata_with_reserved(200), &true);
    let payer = Address::generate(&env);
    token_admin.mint(&payer, &600);
    client.pay(&payer, &project, &payer, &600, &0, &false, &memo(&env, "fund"));

    assert_eq!(client.total_ticket_supply_of(&project), 0);
    assert_eq!(client.reserved_ticket_amount_of(&project), 600);

    let printed = client.print_reserved_tickets(&project, &memo(&env, "all of it"));

    assert_eq!(printed, 600);
    assert_eq!(client.ticket_balance_of(&owner, &project), 600);
    invariants::assert_tracker_reconciled(
        client.processed_ticket_tracker_of(&project),
        client.total_ticket_supply_of(&project),
    );
}

#[test]
fn reconfiguration_reconciles_under_the_outgoing_rate() {
    let (env, client, _governance, token_admin) = setup();
    let owner = Address::generate(&env);
    let project = quarter_reserved_project(&env, &client, &token_admin, &owner);

    // Reconfiguring to rate 0 must not erase the 75 tickets owed under the
    // outgoing rate-50 configuration.
    client.configure(&project, &properties(10_000), &metadata_with_reserved(0), &true);

    assert_eq!(client.ticket_balance_of(&owner, &project), 75);
    assert_eq!(client.total_ticket_supply_of(&project), 300);
    assert_eq!(client.reserved_ticket_amount_of(&project), 0);
    assert_eq!(client.current_cycle_of(&project).unwrap().number, 2);
}
