use cosmwasm_std::{
    entry_point, to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult,
};
use cw2::{ensure_from_older_version, set_contract_version};
use tourney_interface::schedule::ScheduleLimits;

use crate::{
    claims,
    execute::{self, Payment},
    msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg},
    query,
    state::{Config, CONFIG, ENTRY_COUNTS, LEADERBOARDS, PRIZE_COUNT, TOURNAMENT_COUNT},
    ContractError,
};

pub(crate) const CONTRACT_NAME: &str = "crates.io:tourney-settlement";
pub(crate) const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_MAX_LEADERBOARD_SIZE: u32 = 100;
pub const DEFAULT_MAX_ADDITIONAL_SHARES: u32 = 32;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let config = Config {
        schedule_limits: msg.schedule_limits.unwrap_or_else(ScheduleLimits::default),
        max_leaderboard_size: msg
            .max_leaderboard_size
            .unwrap_or(DEFAULT_MAX_LEADERBOARD_SIZE),
        max_additional_shares: msg
            .max_additional_shares
            .unwrap_or(DEFAULT_MAX_ADDITIONAL_SHARES),
    };
    execute::validate_config(&config)?;
    CONFIG.save(deps.storage, &config)?;
    TOURNAMENT_COUNT.save(deps.storage, &0)?;
    PRIZE_COUNT.save(deps.storage, &0)?;

    let owner = deps.api.addr_validate(&msg.owner)?;
    let ownership = cw_ownable::initialize_owner(deps.storage, deps.api, Some(owner.as_str()))?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attributes(ownership.into_attributes()))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::UpdateOwnership(action) => {
            let ownership = cw_ownable::update_ownership(deps, &env.block, &info.sender, action)?;
            Ok(Response::new().add_attributes(ownership.into_attributes()))
        }
        ExecuteMsg::CreateTournament {
            metadata,
            schedule,
            game_config,
            entry_fee,
            entry_requirement,
        } => execute::create_tournament(
            deps,
            env,
            info,
            metadata,
            schedule,
            game_config,
            entry_fee,
            entry_requirement,
        ),
        ExecuteMsg::Register {
            tournament_id,
            player,
            proof,
        } => {
            let player = player
                .map(|player| deps.api.addr_validate(&player))
                .transpose()?
                .unwrap_or_else(|| info.sender.clone());
            execute::register(
                deps,
                env,
                tournament_id,
                player,
                proof,
                Payment::Native(&info),
            )
        }
        ExecuteMsg::SubmitScore {
            tournament_id,
            token_id,
            position,
        } => execute::submit_score(deps, env, info, tournament_id, token_id, position),
        ExecuteMsg::AddPrize {
            tournament_id,
            distribution,
            distribution_count,
            position,
        } => execute::add_native_prize(
            deps,
            env,
            info,
            tournament_id,
            distribution,
            distribution_count,
            position,
        ),
        ExecuteMsg::ClaimReward {
            tournament_id,
            reward,
        } => execute::claim_reward(deps, env, info, tournament_id, reward),
        ExecuteMsg::BanEntry {
            tournament_id,
            token_id,
            proof,
        } => execute::ban_entry(deps, env, info, tournament_id, token_id, proof),
        ExecuteMsg::UpdateConfig {
            schedule_limits,
            max_leaderboard_size,
            max_additional_shares,
        } => execute::update_config(
            deps,
            info,
            schedule_limits,
            max_leaderboard_size,
            max_additional_shares,
        ),
        ExecuteMsg::Receive(cw20_msg) => execute::receive_cw20(deps, env, info, cw20_msg),
        ExecuteMsg::ReceiveNft(cw721_msg) => execute::receive_nft(deps, env, info, cw721_msg),
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => to_json_binary(&CONFIG.load(deps.storage)?),
        QueryMsg::Tournament { tournament_id } => {
            to_json_binary(&query::tournament(deps, env, tournament_id)?)
        }
        QueryMsg::Tournaments {
            start_after,
            limit,
            filter,
        } => to_json_binary(&query::tournaments_page(
            deps,
            env,
            start_after,
            limit,
            filter,
        )?),
        QueryMsg::TournamentCount {} => to_json_binary(&TOURNAMENT_COUNT.load(deps.storage)?),
        QueryMsg::Phase { tournament_id } => {
            to_json_binary(&query::phase(deps, env, tournament_id)?)
        }
        QueryMsg::EntryFee { tournament_id } => {
            to_json_binary(&query::entry_fee(deps, tournament_id)?)
        }
        QueryMsg::EntryRequirement { tournament_id } => {
            to_json_binary(&query::entry_requirement(deps, tournament_id)?)
        }
        QueryMsg::EntryCount { tournament_id } => to_json_binary(
            &ENTRY_COUNTS
                .may_load(deps.storage, tournament_id)?
                .unwrap_or_default(),
        ),
        QueryMsg::EntriesLeft {
            tournament_id,
            player,
            proof,
        } => to_json_binary(&query::entries_left(deps, tournament_id, player, proof)?),
        QueryMsg::Prize { prize_id } => to_json_binary(&query::prize(deps, prize_id)?),
        QueryMsg::Prizes {
            tournament_id,
            start_after,
            limit,
        } => to_json_binary(&query::prizes(deps, tournament_id, start_after, limit)?),
        QueryMsg::Registration {
            game_address,
            token_id,
        } => to_json_binary(&query::registration(deps, game_address, token_id)?),
        QueryMsg::Leaderboard { tournament_id } => to_json_binary(
            &LEADERBOARDS
                .may_load(deps.storage, tournament_id)?
                .unwrap_or_default(),
        ),
        QueryMsg::IsClaimed {
            tournament_id,
            reward,
        } => to_json_binary(&claims::is_claimed(deps.storage, tournament_id, &reward)),
        QueryMsg::Payout {
            tournament_id,
            reward,
        } => to_json_binary(&query::payout(deps, tournament_id, reward)?),
        QueryMsg::Ownership {} => to_json_binary(&cw_ownable::get_ownership(deps.storage)?),
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, msg: MigrateMsg) -> Result<Response, ContractError> {
    let version = ensure_from_older_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    match msg {
        MigrateMsg::FromCompatible {} => {}
    }

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("from_version", version.to_string()))
}
