use cosmwasm_std::{to_json_binary, Addr, Binary};
use cw_multi_test::Executor;
use tourney_allowlist_extension::{
    msg::{
        AllowlistConfig, ExecuteMsg as ExtensionExecuteMsg,
        InstantiateMsg as ExtensionInstantiateMsg, QueryMsg as ExtensionQueryMsg,
    },
    state::Allowlist,
};
use tourney_interface::schedule::Phase;

use super::*;
use crate::{msg::EntryRequirementTypeMsg, state::EntryRequirementType};

fn ban(suite: &mut Suite, tournament_id: u64, token_id: u64) -> anyhow::Result<AppResponse> {
    suite.app.execute_contract(
        Addr::unchecked(OWNER),
        suite.settlement.clone(),
        &ExecuteMsg::BanEntry {
            tournament_id,
            token_id,
            proof: None,
        },
        &[],
    )
}

fn entries_left(suite: &Suite, tournament_id: u64, player: &str) -> Option<u32> {
    suite.query(&QueryMsg::EntriesLeft {
        tournament_id,
        player: player.to_string(),
        proof: None,
    })
}

#[test]
fn allowlist_limits_entries() {
    let mut suite = Suite::new();
    let tournament_id = suite.create_tournament(
        None,
        Some(EntryRequirementMsg {
            entry_limit: 2,
            requirement_type: EntryRequirementTypeMsg::Allowlist {
                addresses: vec![ALICE.to_string(), BOB.to_string()],
            },
        }),
    );
    let free = suite.create_tournament(None, None);

    let requirement: Option<crate::state::EntryRequirement> =
        suite.query(&QueryMsg::EntryRequirement { tournament_id });
    let requirement = requirement.unwrap();
    assert_eq!(requirement.entry_limit, 2);
    assert!(matches!(
        requirement.requirement_type,
        EntryRequirementType::Allowlist { .. }
    ));

    suite.advance_to(Phase::Registration);
    assert_eq!(entries_left(&suite, tournament_id, ALICE), Some(2));
    suite.register(ALICE, tournament_id, &[]).unwrap();
    let token_id = suite.register(ALICE, tournament_id, &[]).unwrap();
    assert_eq!(entries_left(&suite, tournament_id, ALICE), Some(0));
    assert_eq!(entries_left(&suite, tournament_id, BOB), Some(2));
    assert_eq!(entries_left(&suite, free, ALICE), None);

    let err = suite.register(ALICE, tournament_id, &[]).unwrap_err();
    assert_eq!(contract_error(err), ContractError::NoEntriesLeft {});
    let err = suite.register(CAROL, tournament_id, &[]).unwrap_err();
    assert_eq!(contract_error(err), ContractError::InvalidEntry {});

    let err = ban(&mut suite, tournament_id, token_id).unwrap_err();
    assert_eq!(contract_error(err), ContractError::CannotBan {});

    let free_token = suite.register(CAROL, free, &[]).unwrap();
    let err = ban(&mut suite, free, free_token).unwrap_err();
    assert_eq!(contract_error(err), ContractError::NoEntryRequirement {});
}

#[test]
fn token_holders_qualify_and_lapsed_holders_are_banned() {
    let mut suite = Suite::new();
    let token = suite.instantiate_cw20(&[(ALICE, 100), (BOB, 100)]);
    let tournament_id = suite.create_tournament(
        None,
        Some(EntryRequirementMsg {
            entry_limit: 0,
            requirement_type: EntryRequirementTypeMsg::Token {
                address: token.to_string(),
                min_balance: uint(50),
            },
        }),
    );

    suite.advance_to(Phase::Registration);
    let alice_token = suite.register(ALICE, tournament_id, &[]).unwrap();
    let bob_token = suite.register(BOB, tournament_id, &[]).unwrap();
    let err = suite.register(CAROL, tournament_id, &[]).unwrap_err();
    assert_eq!(contract_error(err), ContractError::InvalidEntry {});
    assert_eq!(entries_left(&suite, tournament_id, ALICE), None);

    // bob sells his stake after registering
    suite
        .app
        .execute_contract(
            Addr::unchecked(BOB),
            token.clone(),
            &cw20::Cw20ExecuteMsg::Transfer {
                recipient: CAROL.to_string(),
                amount: uint(100),
            },
            &[],
        )
        .unwrap();

    suite.advance_to(Phase::Staging);
    let err = ban(&mut suite, tournament_id, alice_token).unwrap_err();
    assert_eq!(contract_error(err), ContractError::CannotBan {});

    let response = ban(&mut suite, tournament_id, bob_token).unwrap();
    assert_eq!(attribute(&response, "banned_by").as_deref(), Some(OWNER));
    assert!(suite.registration(bob_token).is_banned);

    let err = ban(&mut suite, tournament_id, bob_token).unwrap_err();
    assert_eq!(contract_error(err), ContractError::EntryBanned {});

    suite.advance_to(Phase::Live);
    let err = ban(&mut suite, tournament_id, alice_token).unwrap_err();
    assert_eq!(
        contract_error(err),
        ContractError::invalid_phase("ban entries", Phase::Live)
    );

    suite.set_score(bob_token, 1_000);
    suite.advance_to(Phase::Submission);
    let err = suite
        .submit_score(BOB, tournament_id, bob_token, 1)
        .unwrap_err();
    assert_eq!(contract_error(err), ContractError::EntryBanned {});
    suite
        .submit_score(ALICE, tournament_id, alice_token, 1)
        .unwrap();
    assert_eq!(suite.leaderboard(tournament_id), vec![alice_token]);
}

#[test]
fn extension_decides_who_may_enter() {
    let mut suite = Suite::new();
    let code_id = suite.app.store_code(extension_contract());
    let extension = suite
        .app
        .instantiate_contract(
            code_id,
            Addr::unchecked(OWNER),
            &ExtensionInstantiateMsg {
                owner: OWNER.to_string(),
                tournament_contract: suite.settlement.to_string(),
                registration_only: false,
            },
            &[],
            "allowlist-extension",
            None,
        )
        .unwrap();

    let config: Binary = to_json_binary(&AllowlistConfig {
        addresses: vec![ALICE.to_string(), BOB.to_string()],
    })
    .unwrap();
    let tournament_id = suite.create_tournament(
        None,
        Some(EntryRequirementMsg {
            entry_limit: 1,
            requirement_type: EntryRequirementTypeMsg::Extension {
                address: extension.to_string(),
                config,
            },
        }),
    );

    let allowlist: Option<Allowlist> = suite
        .app
        .wrap()
        .query_wasm_smart(&extension, &ExtensionQueryMsg::Allowlist { tournament_id })
        .unwrap();
    let allowlist = allowlist.unwrap();
    assert_eq!(allowlist.entry_limit, 1);
    assert_eq!(allowlist.addresses.len(), 2);

    // entries stay open past the registration window
    suite.advance_to(Phase::Staging);
    let alice_token = suite.register(ALICE, tournament_id, &[]).unwrap();
    let bob_token = suite.register(BOB, tournament_id, &[]).unwrap();
    assert_eq!(entries_left(&suite, tournament_id, ALICE), Some(0));

    let err = suite.register(ALICE, tournament_id, &[]).unwrap_err();
    assert_eq!(contract_error(err), ContractError::NoEntriesLeft {});
    let err = suite.register(CAROL, tournament_id, &[]).unwrap_err();
    assert_eq!(contract_error(err), ContractError::InvalidEntry {});

    let err = ban(&mut suite, tournament_id, alice_token).unwrap_err();
    assert_eq!(contract_error(err), ContractError::CannotBan {});

    suite
        .app
        .execute_contract(
            Addr::unchecked(OWNER),
            extension.clone(),
            &ExtensionExecuteMsg::Revoke {
                tournament_id,
                address: BOB.to_string(),
            },
            &[],
        )
        .unwrap();
    ban(&mut suite, tournament_id, bob_token).unwrap();

    let bob_entries: u32 = suite
        .app
        .wrap()
        .query_wasm_smart(
            &extension,
            &ExtensionQueryMsg::Entries {
                tournament_id,
                player: BOB.to_string(),
            },
        )
        .unwrap();
    assert_eq!(bob_entries, 0);
    assert!(suite.registration(bob_token).is_banned);
    assert!(!suite.registration(alice_token).is_banned);
}

#[test]
fn extension_only_accepts_its_tournament_contract() {
    let mut suite = Suite::new();
    let code_id = suite.app.store_code(extension_contract());
    let extension = suite
        .app
        .instantiate_contract(
            code_id,
            Addr::unchecked(OWNER),
            &ExtensionInstantiateMsg {
                owner: OWNER.to_string(),
                tournament_contract: "elsewhere".to_string(),
                registration_only: true,
            },
            &[],
            "allowlist-extension",
            None,
        )
        .unwrap();

    let schedule = suite.schedule();
    let err = suite
        .create_tournament_with(
            schedule,
            3,
            None,
            Some(EntryRequirementMsg {
                entry_limit: 0,
                requirement_type: EntryRequirementTypeMsg::Extension {
                    address: extension.to_string(),
                    config: to_json_binary(&AllowlistConfig { addresses: vec![] }).unwrap(),
                },
            }),
        )
        .unwrap_err();
    assert_eq!(
        err.downcast::<tourney_allowlist_extension::ContractError>()
            .unwrap(),
        tourney_allowlist_extension::ContractError::Unauthorized {}
    );

    let count: u64 = suite.query(&QueryMsg::TournamentCount {});
    assert_eq!(count, 0);
}
