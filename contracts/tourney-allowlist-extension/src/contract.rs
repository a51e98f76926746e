use cosmwasm_std::{
    ensure, entry_point, from_json, to_json_binary, Addr, Binary, Deps, DepsMut, Env,
    MessageInfo, Response, StdResult,
};
use cw2::set_contract_version;
use cw_utils::nonpayable;

use crate::{
    msg::{AllowlistConfig, ExecuteMsg, InstantiateMsg, QueryMsg},
    state::{entries_left, is_allowed, Allowlist, Config, ALLOWLISTS, CONFIG, ENTRIES, REVOKED},
    ContractError,
};

pub(crate) const CONTRACT_NAME: &str = "crates.io:tourney-allowlist-extension";
pub(crate) const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    CONFIG.save(
        deps.storage,
        &Config {
            tournament_contract: deps.api.addr_validate(&msg.tournament_contract)?,
            registration_only: msg.registration_only,
        },
    )?;
    let ownership = cw_ownable::initialize_owner(deps.storage, deps.api, Some(msg.owner.as_str()))?;

    Ok(Response::new().add_attributes(ownership.into_attributes()))
}

fn assert_tournament_contract(deps: Deps, sender: &Addr) -> Result<(), ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure!(
        config.tournament_contract == *sender,
        ContractError::Unauthorized {}
    );
    Ok(())
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;

    match msg {
        ExecuteMsg::UpdateOwnership(action) => {
            let ownership = cw_ownable::update_ownership(deps, &env.block, &info.sender, action)?;
            Ok(Response::new().add_attributes(ownership.into_attributes()))
        }
        ExecuteMsg::AddConfig {
            tournament_id,
            entry_limit,
            config,
        } => {
            assert_tournament_contract(deps.as_ref(), &info.sender)?;
            ensure!(
                !ALLOWLISTS.has(deps.storage, tournament_id),
                ContractError::AlreadyConfigured { tournament_id }
            );

            let config: AllowlistConfig = from_json(&config)?;
            let addresses = config
                .addresses
                .iter()
                .map(|address| deps.api.addr_validate(address))
                .collect::<StdResult<Vec<_>>>()?;
            ALLOWLISTS.save(
                deps.storage,
                tournament_id,
                &Allowlist {
                    entry_limit,
                    addresses,
                },
            )?;

            Ok(Response::new()
                .add_attribute("action", "add_config")
                .add_attribute("tournament_id", tournament_id.to_string())
                .add_attribute("entry_limit", entry_limit.to_string()))
        }
        ExecuteMsg::AddEntry {
            tournament_id,
            token_id,
            player,
            proof: _,
        } => {
            assert_tournament_contract(deps.as_ref(), &info.sender)?;
            ensure!(
                ALLOWLISTS.has(deps.storage, tournament_id),
                ContractError::UnknownTournament { tournament_id }
            );
            let player = deps.api.addr_validate(&player)?;
            ensure!(
                is_allowed(deps.storage, tournament_id, &player)?,
                ContractError::NotAllowed {
                    tournament_id,
                    player: player.to_string(),
                }
            );

            ENTRIES.update(deps.storage, (tournament_id, &player), |x| -> StdResult<_> {
                Ok(x.unwrap_or_default() + 1)
            })?;

            Ok(Response::new()
                .add_attribute("action", "add_entry")
                .add_attribute("tournament_id", tournament_id.to_string())
                .add_attribute("token_id", token_id.to_string())
                .add_attribute("player", player))
        }
        ExecuteMsg::RemoveEntry {
            tournament_id,
            token_id,
            player,
            proof: _,
        } => {
            assert_tournament_contract(deps.as_ref(), &info.sender)?;
            let player = deps.api.addr_validate(&player)?;

            ENTRIES.update(deps.storage, (tournament_id, &player), |x| -> StdResult<_> {
                Ok(x.unwrap_or_default().saturating_sub(1))
            })?;

            Ok(Response::new()
                .add_attribute("action", "remove_entry")
                .add_attribute("tournament_id", tournament_id.to_string())
                .add_attribute("token_id", token_id.to_string())
                .add_attribute("player", player))
        }
        ExecuteMsg::Revoke {
            tournament_id,
            address,
        } => {
            cw_ownable::assert_owner(deps.storage, &info.sender)?;
            let address = deps.api.addr_validate(&address)?;
            REVOKED.save(deps.storage, (tournament_id, &address), &())?;

            Ok(Response::new()
                .add_attribute("action", "revoke")
                .add_attribute("tournament_id", tournament_id.to_string())
                .add_attribute("address", address))
        }
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::RegistrationOnly {} => {
            to_json_binary(&CONFIG.load(deps.storage)?.registration_only)
        }
        QueryMsg::ValidEntry {
            tournament_id,
            player,
            proof: _,
        } => {
            let player = deps.api.addr_validate(&player)?;
            to_json_binary(&is_allowed(deps.storage, tournament_id, &player)?)
        }
        QueryMsg::ShouldBan {
            tournament_id,
            token_id: _,
            owner,
            proof: _,
        } => {
            let owner = deps.api.addr_validate(&owner)?;
            to_json_binary(&!is_allowed(deps.storage, tournament_id, &owner)?)
        }
        QueryMsg::EntriesLeft {
            tournament_id,
            player,
            proof: _,
        } => {
            let player = deps.api.addr_validate(&player)?;
            to_json_binary(&entries_left(deps.storage, tournament_id, &player)?)
        }
        QueryMsg::Config {} => to_json_binary(&CONFIG.load(deps.storage)?),
        QueryMsg::Allowlist { tournament_id } => {
            to_json_binary(&ALLOWLISTS.may_load(deps.storage, tournament_id)?)
        }
        QueryMsg::Entries {
            tournament_id,
            player,
        } => {
            let player = deps.api.addr_validate(&player)?;
            to_json_binary(
                &ENTRIES
                    .may_load(deps.storage, (tournament_id, &player))?
                    .unwrap_or_default(),
            )
        }
        QueryMsg::Ownership {} => to_json_binary(&cw_ownable::get_ownership(deps.storage)?),
    }
}
