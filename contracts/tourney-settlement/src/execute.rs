use cosmwasm_std::{
    ensure, from_json, Addr, Api, Binary, CosmosMsg, Deps, DepsMut, Env, Event, MessageInfo,
    Response, StdError, StdResult, Storage, Uint128,
};
use cw20::Cw20ReceiveMsg;
use cw721::Cw721ReceiveMsg;
use cw_utils::{must_pay, nonpayable, one_coin};
use itertools::Itertools as _;
use tourney_distribution::{validate, Distribution, TOTAL_BPS};
use tourney_interface::{
    game::GameQueryMsg,
    reward::{EntryFeeReward, RewardDescriptor},
    schedule::{Phase, Schedule, ScheduleLimits},
};

use crate::{
    claims,
    msg::{EntryFeeMsg, EntryRequirementMsg, GameConfigMsg, NftReceiveMsg, ReceiveMsg},
    payout,
    registration::{self, allocate_entry, load_registration, save_registration},
    state::{
        mark_additional_share_claimed, save_additional_shares, tournaments, Config,
        DistributionState, EntryFee, FeeToken, GameConfig, Metadata, Prize, PrizeToken,
        Tournament, CONFIG, ENTRY_COUNTS, ENTRY_FEES, ENTRY_FEE_CUSTOM_SHARES,
        ENTRY_REQUIREMENTS, LEADERBOARDS, PRIZES, PRIZE_COUNT, PRIZE_COUNTS,
        PRIZE_CUSTOM_SHARES, TOURNAMENT_COUNT, TOURNAMENT_PRIZES,
    },
    ContractError,
};

/// How an entry fee arrives: attached funds or a cw20 `Send`.
pub enum Payment<'a> {
    Native(&'a MessageInfo),
    Cw20 { token: Addr, amount: Uint128 },
}

#[allow(clippy::too_many_arguments)]
pub fn create_tournament(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    metadata: Metadata,
    schedule: Schedule,
    game_config: GameConfigMsg,
    entry_fee: Option<EntryFeeMsg>,
    entry_requirement: Option<EntryRequirementMsg>,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;
    let config = CONFIG.load(deps.storage)?;

    schedule.validate(env.block.time.seconds(), &config.schedule_limits)?;
    ensure!(
        game_config.leaderboard_size > 0
            && game_config.leaderboard_size <= config.max_leaderboard_size,
        ContractError::InvalidLeaderboardSize {
            size: game_config.leaderboard_size,
            max: config.max_leaderboard_size,
        }
    );
    let game_config = GameConfig {
        game_address: deps.api.addr_validate(&game_config.game_address)?,
        game_creator: game_config
            .game_creator
            .as_deref()
            .map(|game_creator| deps.api.addr_validate(game_creator))
            .transpose()?,
        leaderboard_size: game_config.leaderboard_size,
    };

    let tournament_id = TOURNAMENT_COUNT.update(deps.storage, |x| -> StdResult<_> { Ok(x + 1) })?;

    let entry_fee = entry_fee
        .map(|entry_fee| {
            save_entry_fee(
                deps.storage,
                deps.api,
                &config,
                &game_config,
                tournament_id,
                entry_fee,
            )
        })
        .transpose()?;

    let mut msgs: Vec<CosmosMsg> = vec![];
    if let Some(entry_requirement) = entry_requirement {
        let requirement = entry_requirement.into_checked(deps.api)?;
        msgs.extend(requirement.validator().add_config(tournament_id)?);
        ENTRY_REQUIREMENTS.save(deps.storage, tournament_id, &requirement)?;
    }

    let tournament = Tournament {
        id: tournament_id,
        creator: info.sender,
        created_at: env.block.time.seconds(),
        metadata,
        schedule,
        game_config,
    };
    tournaments().save(deps.storage, tournament_id, &tournament)?;

    let registration_start = tournament
        .schedule
        .registration
        .map(|registration| registration.start.to_string())
        .unwrap_or_else(|| "none".to_string());
    let entry_fee = entry_fee
        .map(|entry_fee| format!("{}{}", entry_fee.amount, entry_fee.token))
        .unwrap_or_else(|| "none".to_string());

    Ok(Response::new()
        .add_attribute("action", "create_tournament")
        .add_attribute("tournament_id", tournament_id.to_string())
        .add_messages(msgs)
        .add_event(
            Event::new("tournament_created")
                .add_attribute("tournament_id", tournament_id.to_string())
                .add_attribute("creator", tournament.creator.to_string())
                .add_attribute("name", tournament.metadata.name)
                .add_attribute("game_address", tournament.game_config.game_address.to_string())
                .add_attribute(
                    "leaderboard_size",
                    tournament.game_config.leaderboard_size.to_string(),
                )
                .add_attribute("registration_start", registration_start)
                .add_attribute("game_start", tournament.schedule.game.start.to_string())
                .add_attribute("game_end", tournament.schedule.game.end.to_string())
                .add_attribute(
                    "submission_end",
                    tournament.schedule.submission_end().to_string(),
                )
                .add_attribute("entry_fee", entry_fee),
        ))
}

fn save_entry_fee(
    storage: &mut dyn Storage,
    api: &dyn Api,
    config: &Config,
    game_config: &GameConfig,
    tournament_id: u64,
    msg: EntryFeeMsg,
) -> Result<EntryFee, ContractError> {
    let invalid = |reason: &str| ContractError::InvalidEntryFee {
        reason: reason.to_string(),
    };

    ensure!(!msg.amount.is_zero(), invalid("amount must be positive"));
    let distribution_count = msg
        .distribution_count
        .unwrap_or(game_config.leaderboard_size);
    ensure!(
        distribution_count > 0 && distribution_count <= game_config.leaderboard_size,
        invalid("distribution count must fit the leaderboard")
    );
    validate(&msg.distribution, distribution_count)?;
    ensure!(
        msg.additional_shares.len() as u32 <= config.max_additional_shares,
        invalid("too many additional shares")
    );
    ensure!(
        msg.game_creator_share.is_none() || game_config.game_creator.is_some(),
        invalid("game creator share requires a game creator")
    );

    let total = [
        msg.tournament_creator_share,
        msg.game_creator_share,
        msg.refund_share,
    ]
    .iter()
    .flatten()
    .chain(msg.additional_shares.iter().map(|share| &share.share_bps))
    .map(|share| *share as u32)
    .sum::<u32>();
    ensure!(
        total <= TOTAL_BPS as u32,
        ContractError::FeeSharesExceedTotal { total }
    );

    let token = msg.token.into_checked(api)?;
    if let FeeToken::Native { denom } = &token {
        ensure!(!denom.is_empty(), invalid("denom cannot be empty"));
    }

    let additional_recipients = msg
        .additional_shares
        .iter()
        .map(|share| api.addr_validate(&share.recipient))
        .collect::<StdResult<Vec<_>>>()?;
    let additional_shares: Vec<u16> = msg
        .additional_shares
        .iter()
        .map(|share| share.share_bps)
        .collect();
    save_additional_shares(storage, tournament_id, &additional_shares)?;

    let entry_fee = EntryFee {
        token,
        amount: msg.amount,
        distribution: DistributionState::store(
            storage,
            &ENTRY_FEE_CUSTOM_SHARES,
            tournament_id,
            &msg.distribution,
        )?,
        distribution_count,
        tournament_creator_share: msg.tournament_creator_share,
        game_creator_share: msg.game_creator_share,
        refund_share: msg.refund_share,
        additional_recipients,
    };
    ENTRY_FEES.save(storage, tournament_id, &entry_fee)?;

    Ok(entry_fee)
}

pub fn register(
    deps: DepsMut,
    env: Env,
    tournament_id: u64,
    player: Addr,
    proof: Option<Binary>,
    payment: Payment,
) -> Result<Response, ContractError> {
    let tournament = tournaments().load(deps.storage, tournament_id)?;
    let phase = tournament.schedule.phase_at(&env.block);

    let requirement = ENTRY_REQUIREMENTS.may_load(deps.storage, tournament_id)?;
    let validator = requirement.as_ref().map(|requirement| requirement.validator());
    let registration_only = match &validator {
        Some(validator) => validator.registration_only(deps.as_ref())?,
        None => true,
    };
    ensure!(
        registration::is_open(&tournament.schedule, phase, registration_only),
        ContractError::invalid_phase("register", phase)
    );

    if let Some(validator) = &validator {
        ensure!(
            validator.valid_entry(deps.as_ref(), tournament_id, &player, proof.as_ref())?,
            ContractError::InvalidEntry {}
        );
        if let Some(entries_left) =
            validator.entries_left(deps.as_ref(), tournament_id, &player, proof.as_ref())?
        {
            ensure!(entries_left > 0, ContractError::NoEntriesLeft {});
        }
    }

    check_entry_fee(deps.as_ref(), tournament_id, payment)?;

    let (token_id, registration) = allocate_entry(deps.storage, &tournament, player)?;
    let msgs = match &validator {
        Some(validator) => validator.add_entry(
            deps.storage,
            tournament_id,
            token_id,
            &registration.player,
            proof.as_ref(),
        )?,
        None => vec![],
    };

    Ok(Response::new()
        .add_attribute("action", "register")
        .add_attribute("token_id", token_id.to_string())
        .add_messages(msgs)
        .add_event(
            Event::new("registration")
                .add_attribute("tournament_id", tournament_id.to_string())
                .add_attribute("game_address", tournament.game_config.game_address.to_string())
                .add_attribute("token_id", token_id.to_string())
                .add_attribute("entry_number", registration.entry_number.to_string())
                .add_attribute("player", registration.player.to_string()),
        )
        .add_event(counters_event(deps.as_ref(), tournament_id)?))
}

fn check_entry_fee(deps: Deps, tournament_id: u64, payment: Payment) -> Result<(), ContractError> {
    let Some(entry_fee) = ENTRY_FEES.may_load(deps.storage, tournament_id)? else {
        return match payment {
            Payment::Native(info) => Ok(nonpayable(info)?),
            Payment::Cw20 { .. } => Err(ContractError::UnexpectedPayment {}),
        };
    };
    let not_paid = || ContractError::EntryFeeNotPaid {
        expected: format!("{}{}", entry_fee.amount, entry_fee.token),
    };

    match (&entry_fee.token, payment) {
        (FeeToken::Native { denom }, Payment::Native(info)) => {
            ensure!(must_pay(info, denom)? == entry_fee.amount, not_paid());
        }
        (FeeToken::Cw20 { address }, Payment::Cw20 { token, amount }) => {
            ensure!(
                token == *address && amount == entry_fee.amount,
                not_paid()
            );
        }
        _ => return Err(not_paid()),
    }

    Ok(())
}

fn query_score(deps: Deps, game_address: &Addr, token_id: u64) -> StdResult<u64> {
    deps.querier
        .query_wasm_smart(game_address, &GameQueryMsg::Score { token_id })
}

pub fn submit_score(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    tournament_id: u64,
    token_id: u64,
    position: u32,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;
    let tournament = tournaments().load(deps.storage, tournament_id)?;
    let phase = tournament.schedule.phase_at(&env.block);
    ensure!(
        phase == Phase::Submission,
        ContractError::invalid_phase("submit scores", phase)
    );

    let mut registration = load_registration(deps.storage, &tournament, token_id)?;
    ensure!(
        registration.player == info.sender,
        ContractError::Unauthorized {}
    );
    ensure!(!registration.is_banned, ContractError::EntryBanned {});
    ensure!(
        !registration.has_submitted,
        ContractError::AlreadySubmitted {}
    );

    let leaderboard_size = tournament.game_config.leaderboard_size;
    let mut leaderboard = LEADERBOARDS
        .may_load(deps.storage, tournament_id)?
        .unwrap_or_default();
    let max = (leaderboard.len() as u32 + 1).min(leaderboard_size);
    ensure!(
        position >= 1 && position <= max,
        ContractError::InvalidPosition { position, max }
    );

    let game_address = &tournament.game_config.game_address;
    let score = query_score(deps.as_ref(), game_address, token_id)?;
    let index = (position - 1) as usize;
    if index > 0 {
        let above = query_score(deps.as_ref(), game_address, leaderboard[index - 1])?;
        ensure!(
            score <= above,
            ContractError::ScoreTooHigh {
                position: position - 1
            }
        );
    }
    // ties keep the entry that got there first
    if let Some(current) = leaderboard.get(index) {
        let current_score = query_score(deps.as_ref(), game_address, *current)?;
        ensure!(score > current_score, ContractError::ScoreTooLow { position });
    }

    leaderboard.insert(index, token_id);
    leaderboard.truncate(leaderboard_size as usize);
    LEADERBOARDS.save(deps.storage, tournament_id, &leaderboard)?;

    registration.has_submitted = true;
    save_registration(deps.storage, &tournament, token_id, &registration)?;

    Ok(Response::new()
        .add_attribute("action", "submit_score")
        .add_event(
            Event::new("leaderboard_updated")
                .add_attribute("tournament_id", tournament_id.to_string())
                .add_attribute("token_id", token_id.to_string())
                .add_attribute("position", position.to_string())
                .add_attribute("score", score.to_string())
                .add_attribute("leaderboard", leaderboard.iter().join(",")),
        ))
}

#[allow(clippy::too_many_arguments)]
pub fn add_prize(
    deps: DepsMut,
    env: &Env,
    sponsor: Addr,
    tournament_id: u64,
    token: PrizeToken,
    distribution: Option<Distribution>,
    distribution_count: Option<u32>,
    position: u32,
) -> Result<Response, ContractError> {
    let tournament = tournaments().load(deps.storage, tournament_id)?;
    let phase = tournament.schedule.phase_at(&env.block);
    ensure!(
        phase < Phase::Finalized,
        ContractError::invalid_phase("add prizes", phase)
    );

    let invalid = |reason: &str| ContractError::InvalidPrize {
        reason: reason.to_string(),
    };
    match &token {
        PrizeToken::Native { amount, .. } | PrizeToken::Cw20 { amount, .. } => {
            ensure!(!amount.is_zero(), invalid("amount must be positive"))
        }
        PrizeToken::Cw721 { .. } => {}
    }

    let leaderboard_size = tournament.game_config.leaderboard_size;
    let (payout_position, distribution_count) = match &distribution {
        Some(distribution) => {
            ensure!(
                position == 0,
                invalid("distributed prizes are not tied to a position")
            );
            ensure!(
                !matches!(token, PrizeToken::Cw721 { .. }),
                invalid("nft prizes cannot be distributed")
            );
            let count = distribution_count.unwrap_or(leaderboard_size);
            ensure!(
                count > 0 && count <= leaderboard_size,
                invalid("distribution count must fit the leaderboard")
            );
            validate(distribution, count)?;
            (0, count)
        }
        None => {
            ensure!(
                position >= 1 && position <= leaderboard_size,
                ContractError::InvalidPosition {
                    position,
                    max: leaderboard_size,
                }
            );
            (position, 0)
        }
    };

    let prize_id = PRIZE_COUNT.update(deps.storage, |x| -> StdResult<_> { Ok(x + 1) })?;
    let distribution = distribution
        .as_ref()
        .map(|distribution| {
            DistributionState::store(deps.storage, &PRIZE_CUSTOM_SHARES, prize_id, distribution)
        })
        .transpose()?;
    let prize = Prize {
        id: prize_id,
        tournament_id,
        token,
        sponsor,
        payout_position,
        distribution,
        distribution_count,
    };
    PRIZES.save(deps.storage, prize_id, &prize)?;
    TOURNAMENT_PRIZES.save(deps.storage, (tournament_id, prize_id), &())?;
    PRIZE_COUNTS.update(deps.storage, tournament_id, |x| -> StdResult<_> {
        Ok(x.unwrap_or_default() + 1)
    })?;

    let token = match &prize.token {
        PrizeToken::Native { denom, amount } => format!("{amount}{denom}"),
        PrizeToken::Cw20 { address, amount } => format!("{amount}{address}"),
        PrizeToken::Cw721 { address, token_id } => format!("{address}:{token_id}"),
    };

    Ok(Response::new()
        .add_attribute("action", "add_prize")
        .add_attribute("prize_id", prize_id.to_string())
        .add_event(
            Event::new("prize_added")
                .add_attribute("tournament_id", tournament_id.to_string())
                .add_attribute("prize_id", prize_id.to_string())
                .add_attribute("sponsor", prize.sponsor.to_string())
                .add_attribute("token", token)
                .add_attribute("payout_position", payout_position.to_string()),
        )
        .add_event(counters_event(deps.as_ref(), tournament_id)?))
}

pub fn claim_reward(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    tournament_id: u64,
    reward: RewardDescriptor,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;
    let tournament = tournaments().load(deps.storage, tournament_id)?;
    let phase = tournament.schedule.phase_at(&env.block);
    ensure!(
        phase == Phase::Finalized,
        ContractError::invalid_phase("claim rewards", phase)
    );

    let payout = payout::resolve(deps.as_ref(), &tournament, &reward)?;

    ensure!(
        !claims::try_claim(deps.storage, tournament_id, &reward)?,
        ContractError::AlreadyClaimed {}
    );
    if let RewardDescriptor::EntryFee(EntryFeeReward::AdditionalShare { index }) = &reward {
        mark_additional_share_claimed(deps.storage, tournament_id, *index)?;
    }

    let paid = payout
        .asset
        .as_ref()
        .map(|asset| asset.to_string())
        .unwrap_or_else(|| "0".to_string());
    let msgs = payout
        .asset
        .map(|asset| asset.transfer_msg(&payout.recipient))
        .transpose()?;

    Ok(Response::new()
        .add_attribute("action", "claim_reward")
        .add_messages(msgs)
        .add_event(
            Event::new("reward_claimed")
                .add_attribute("tournament_id", tournament_id.to_string())
                .add_attribute("reward", reward.kind())
                .add_attribute("recipient", payout.recipient.to_string())
                .add_attribute("amount", paid),
        ))
}

pub fn ban_entry(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    tournament_id: u64,
    token_id: u64,
    proof: Option<Binary>,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;
    let tournament = tournaments().load(deps.storage, tournament_id)?;
    let phase = tournament.schedule.phase_at(&env.block);
    ensure!(
        phase < Phase::Live,
        ContractError::invalid_phase("ban entries", phase)
    );

    let requirement = ENTRY_REQUIREMENTS
        .may_load(deps.storage, tournament_id)?
        .ok_or(ContractError::NoEntryRequirement {})?;
    let validator = requirement.validator();

    let mut registration = load_registration(deps.storage, &tournament, token_id)?;
    ensure!(!registration.is_banned, ContractError::EntryBanned {});
    ensure!(
        validator.should_ban(
            deps.as_ref(),
            tournament_id,
            token_id,
            &registration.player,
            proof.as_ref()
        )?,
        ContractError::CannotBan {}
    );

    registration.is_banned = true;
    save_registration(deps.storage, &tournament, token_id, &registration)?;
    let msgs = validator.remove_entry(
        deps.storage,
        tournament_id,
        token_id,
        &registration.player,
        proof.as_ref(),
    )?;

    Ok(Response::new()
        .add_attribute("action", "ban_entry")
        .add_messages(msgs)
        .add_event(
            Event::new("entry_banned")
                .add_attribute("tournament_id", tournament_id.to_string())
                .add_attribute("token_id", token_id.to_string())
                .add_attribute("player", registration.player.to_string())
                .add_attribute("banned_by", info.sender.to_string()),
        ))
}

pub fn update_config(
    deps: DepsMut,
    info: MessageInfo,
    schedule_limits: Option<ScheduleLimits>,
    max_leaderboard_size: Option<u32>,
    max_additional_shares: Option<u32>,
) -> Result<Response, ContractError> {
    cw_ownable::assert_owner(deps.storage, &info.sender)?;

    let mut config = CONFIG.load(deps.storage)?;
    if let Some(schedule_limits) = schedule_limits {
        config.schedule_limits = schedule_limits;
    }
    if let Some(max_leaderboard_size) = max_leaderboard_size {
        config.max_leaderboard_size = max_leaderboard_size;
    }
    if let Some(max_additional_shares) = max_additional_shares {
        config.max_additional_shares = max_additional_shares;
    }
    validate_config(&config)?;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new().add_attribute("action", "update_config"))
}

pub fn validate_config(config: &Config) -> StdResult<()> {
    let limits = &config.schedule_limits;
    if limits.min_game_duration > limits.max_game_duration
        || limits.min_submission_duration > limits.max_submission_duration
    {
        return Err(StdError::generic_err(
            "Schedule limits must have min <= max",
        ));
    }
    if config.max_leaderboard_size == 0 {
        return Err(StdError::generic_err(
            "Max leaderboard size must be positive",
        ));
    }
    Ok(())
}

pub fn receive_cw20(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    cw20_msg: Cw20ReceiveMsg,
) -> Result<Response, ContractError> {
    let sender = deps.api.addr_validate(&cw20_msg.sender)?;

    match from_json(&cw20_msg.msg)? {
        ReceiveMsg::Register {
            tournament_id,
            player,
            proof,
        } => {
            let player = player
                .map(|player| deps.api.addr_validate(&player))
                .transpose()?
                .unwrap_or(sender);
            register(
                deps,
                env,
                tournament_id,
                player,
                proof,
                Payment::Cw20 {
                    token: info.sender,
                    amount: cw20_msg.amount,
                },
            )
        }
        ReceiveMsg::AddPrize {
            tournament_id,
            distribution,
            distribution_count,
            position,
        } => add_prize(
            deps,
            &env,
            sender,
            tournament_id,
            PrizeToken::Cw20 {
                address: info.sender,
                amount: cw20_msg.amount,
            },
            distribution,
            distribution_count,
            position,
        ),
    }
}

pub fn receive_nft(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    cw721_msg: Cw721ReceiveMsg,
) -> Result<Response, ContractError> {
    let sender = deps.api.addr_validate(&cw721_msg.sender)?;

    match from_json(&cw721_msg.msg)? {
        NftReceiveMsg::AddPrize {
            tournament_id,
            position,
        } => add_prize(
            deps,
            &env,
            sender,
            tournament_id,
            PrizeToken::Cw721 {
                address: info.sender,
                token_id: cw721_msg.token_id,
            },
            None,
            None,
            position,
        ),
    }
}

pub fn add_native_prize(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    tournament_id: u64,
    distribution: Option<Distribution>,
    distribution_count: Option<u32>,
    position: u32,
) -> Result<Response, ContractError> {
    let coin = one_coin(&info)?;

    add_prize(
        deps,
        &env,
        info.sender,
        tournament_id,
        PrizeToken::Native {
            denom: coin.denom,
            amount: coin.amount,
        },
        distribution,
        distribution_count,
        position,
    )
}

fn counters_event(deps: Deps, tournament_id: u64) -> StdResult<Event> {
    let entry_count = ENTRY_COUNTS
        .may_load(deps.storage, tournament_id)?
        .unwrap_or_default();
    let prize_count = PRIZE_COUNTS
        .may_load(deps.storage, tournament_id)?
        .unwrap_or_default();

    Ok(Event::new("tournament_counters")
        .add_attribute("tournament_id", tournament_id.to_string())
        .add_attribute("entry_count", entry_count.to_string())
        .add_attribute("prize_count", prize_count.to_string()))
}
