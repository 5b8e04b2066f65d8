extern crate std;

use soroban_sdk::{testutils::Address as _, token, Address, Env, String};

use crate::{CycleMetadata, CycleProperties, Error, Terminal, TerminalClient, FIXED_POINT_SCALE};

struct World {
    env: Env,
    source: TerminalClient<'static>,
    destination: TerminalClient<'static>,
    governance: Address,
    token: token::Client<'static>,
    token_admin: token::StellarAssetClient<'static>,
}

/// Two terminals over one settlement token, with the destination on the
/// source's migration allow-list.
fn setup() -> World {
    let env = Env::default();
    env.mock_all_auths();
    let governance = Address::generate(&env);
    let token_admin = Address::generate(&env);
    let sac = env.register_stellar_asset_contract_v2(token_admin.clone());
    let token = token::Client::new(&env, &sac.address());
    let token_admin_client = token::StellarAssetClient::new(&env, &sac.address());

    let source_id = env.register(Terminal, ());
    let source = TerminalClient::new(&env, &source_id);
    source.init(&governance, &sac.address());

    let destination_id = env.register(Terminal, ());
    let destination = TerminalClient::new(&env, &destination_id);
    destination.init(&governance, &sac.address());

    source.allow_migration(&destination_id);

    World {
        env,
        source,
        destination,
        governance,
        token,
        token_admin: token_admin_client,
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

fn funded_project(world: &World, owner: &Address, deposit: i128) -> u64 {
    let project = world.source.create_project(owner);
    world
        .source
        .configure(&project, &properties(10_000), &metadata_with_reserved(0), &true);
    let payer = Address::generate(&world.env);
    world.token_admin.mint(&payer, &deposit);
    world
        .source
        .pay(&payer, &project, &payer, &deposit, &0, &false, &memo(&world.env, "fund"));
    project
}

#[test]
fn migrate_moves_the_balance_exactly_once() {
    let world = setup();
    let owner = Address::generate(&world.env);
    let project = funded_project(&world, &owner, 500);
    world.destination.register_project(&project, &owner);

    world.source.migrate(&project, &world.destination.address);

    assert_eq!(world.source.balance_of(&project), 0);
    assert_eq!(world.destination.balance_of(&project), 500);
    assert_eq!(world.token.balance(&world.source.address), 0);
    assert_eq!(world.token.balance(&world.destination.address), 500);
    assert_eq!(
        world.source.terminal_of(&project),
        Some(world.destination.address.clone())
    );
    // The receiving terminal starts reconciled against its local supply.
    assert_eq!(world.destination.processed_ticket_tracker_of(&project), 0);
}

#[test]
fn migrate_requires_an_allowlisted_destination() {
    let world = setup();
    let owner = Address::generate(&world.env);
    let project = funded_project(&world, &owner, 500);
    let rogue = Address::generate(&world.env);

    assert_eq!(
        world.source.try_migrate(&project, &rogue),
        Err(Ok(Error::MigrationNotAllowed))
    );
    assert_eq!(world.source.balance_of(&project), 500);
}

#[test]
fn migrate_requires_being_the_registered_terminal() {
    let world = setup();
    let owner = Address::generate(&world.env);
    let project = funded_project(&world, &owner, 500);
    world.destination.register_project(&project, &owner);
    world.source.migrate(&project, &world.destination.address);

    // The directory now points at the destination; a second migration from
    // the source must fail.
    assert_eq!(
        world.source.try_migrate(&project, &world.destination.address),
        Err(Ok(Error::UnauthorizedTerminal))
    );
    assert_eq!(world.destination.balance_of(&project), 500);
}

#[test]
fn migrate_reconciles_reserved_tickets_first() {
    let world = setup();
    let owner = Address::generate(&world.env);
    let project = world.source.create_project(&owner);
    world
        .source
        .configure(&project, &properties(10_000), &metadata_with_reserved(50), &true);
    let payer = Address::generate(&world.env);
    world.token_admin.mint(&payer, &300);
    world
        .source
        .pay(&payer, &project, &payer, &300, &0, &false, &memo(&world.env, "fund"));
    world.destination.register_project(&project, &owner);

    world.source.migrate(&project, &world.destination.address);

    // The 75 owed reserved tickets were printed on the source before the
    // balance moved.
    assert_eq!(world.source.ticket_balance_of(&owner, &project), 75);
    assert_eq!(world.source.total_ticket_supply_of(&project), 300);
    assert_eq!(world.source.processed_ticket_tracker_of(&project), 300);
    assert_eq!(world.destination.balance_of(&project), 300);
}

#[test]
fn top_up_on_the_registered_terminal_keeps_the_tracker() {
    let world = setup();
    let holder = Address::generate(&world.env);
    let owner = Address::generate(&world.env);
    let project = world.source.create_project(&owner);
    world.source.print_premined_tickets(
        &project,
        &10,
        &0,
        &Some(FIXED_POINT_SCALE),
        &holder,
        &false,
        &memo(&world.env, "seed"),
    );
    world
        .source
        .configure(&project, &properties(10_000), &metadata_with_reserved(200), &true);
    let payer = Address::generate(&world.env);
    world.token_admin.mint(&payer, &15);
    world
        .source
        .pay(&payer, &project, &payer, &15, &0, &false, &memo(&world.env, "reserved"));
    assert_eq!(world.source.processed_ticket_tracker_of(&project), -5);

    // A plain top-up on the registered terminal must not reset the
    // obligation the negative tracker represents.
    let funder = Address::generate(&world.env);
    world.token_admin.mint(&funder, &40);
    world.source.add_to_balance(&funder, &project, &40);

    assert_eq!(world.source.processed_ticket_tracker_of(&project), -5);
    assert_eq!(world.source.balance_of(&project), 55);
    let _ = &world.governance;
}
