use cosmwasm_std::{Binary, Deps, Env, Order, StdError, StdResult};
use cw_storage_plus::Bound;
use tourney_interface::{reward::RewardDescriptor, schedule::Phase};

use crate::{
    claims,
    msg::{
        AdditionalShareResponse, EntryFeeResponse, PayoutResponse, PrizeResponse,
        RegistrationResponse, TournamentFilter, TournamentResponse,
    },
    payout,
    state::{
        load_additional_shares, tournaments, EntryRequirement, Prize, Tournament, ENTRY_COUNTS,
        ENTRY_FEES, ENTRY_FEE_CUSTOM_SHARES, ENTRY_REQUIREMENTS, PRIZES, PRIZE_COUNTS,
        PRIZE_CUSTOM_SHARES, REGISTRATIONS, TOURNAMENT_PRIZES,
    },
};

const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 30;

fn tournament_response(
    deps: Deps,
    env: &Env,
    tournament: Tournament,
) -> StdResult<TournamentResponse> {
    Ok(TournamentResponse {
        phase: tournament.schedule.phase_at(&env.block),
        entry_count: ENTRY_COUNTS
            .may_load(deps.storage, tournament.id)?
            .unwrap_or_default(),
        prize_count: PRIZE_COUNTS
            .may_load(deps.storage, tournament.id)?
            .unwrap_or_default(),
        tournament,
    })
}

pub fn tournament(deps: Deps, env: Env, tournament_id: u64) -> StdResult<TournamentResponse> {
    let tournament = tournaments().load(deps.storage, tournament_id)?;
    tournament_response(deps, &env, tournament)
}

pub fn tournaments_page(
    deps: Deps,
    env: Env,
    start_after: Option<u64>,
    limit: Option<u32>,
    filter: Option<TournamentFilter>,
) -> StdResult<Vec<TournamentResponse>> {
    let start = start_after.map(Bound::exclusive);
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;

    let page = match filter {
        None => tournaments()
            .range(deps.storage, start, None, Order::Ascending)
            .take(limit)
            .collect::<StdResult<Vec<_>>>()?,
        Some(TournamentFilter::Creator(creator)) => {
            let creator = deps.api.addr_validate(&creator)?;
            tournaments()
                .idx
                .creator
                .prefix(creator)
                .range(deps.storage, start, None, Order::Ascending)
                .take(limit)
                .collect::<StdResult<Vec<_>>>()?
        }
    };

    page.into_iter()
        .map(|(_, tournament)| tournament_response(deps, &env, tournament))
        .collect()
}

pub fn phase(deps: Deps, env: Env, tournament_id: u64) -> StdResult<Phase> {
    let tournament = tournaments().load(deps.storage, tournament_id)?;
    Ok(tournament.schedule.phase_at(&env.block))
}

pub fn entry_fee(deps: Deps, tournament_id: u64) -> StdResult<Option<EntryFeeResponse>> {
    let Some(entry_fee) = ENTRY_FEES.may_load(deps.storage, tournament_id)? else {
        return Ok(None);
    };

    let additional_shares = load_additional_shares(
        deps.storage,
        tournament_id,
        entry_fee.additional_recipients.len() as u32,
    )?
    .into_iter()
    .zip(entry_fee.additional_recipients)
    .map(|(share, recipient)| AdditionalShareResponse {
        recipient,
        share_bps: share.share_bps,
        claimed: share.claimed,
    })
    .collect();

    Ok(Some(EntryFeeResponse {
        distribution: entry_fee.distribution.load(
            deps.storage,
            &ENTRY_FEE_CUSTOM_SHARES,
            tournament_id,
        )?,
        token: entry_fee.token,
        amount: entry_fee.amount,
        distribution_count: entry_fee.distribution_count,
        tournament_creator_share: entry_fee.tournament_creator_share,
        game_creator_share: entry_fee.game_creator_share,
        refund_share: entry_fee.refund_share,
        additional_shares,
    }))
}

pub fn entries_left(
    deps: Deps,
    tournament_id: u64,
    player: String,
    proof: Option<Binary>,
) -> StdResult<Option<u32>> {
    let player = deps.api.addr_validate(&player)?;
    match ENTRY_REQUIREMENTS.may_load(deps.storage, tournament_id)? {
        Some(requirement) => {
            requirement
                .validator()
                .entries_left(deps, tournament_id, &player, proof.as_ref())
        }
        None => Ok(None),
    }
}

fn prize_response(deps: Deps, prize: Prize) -> StdResult<PrizeResponse> {
    Ok(PrizeResponse {
        distribution: prize
            .distribution
            .map(|distribution| distribution.load(deps.storage, &PRIZE_CUSTOM_SHARES, prize.id))
            .transpose()?,
        id: prize.id,
        tournament_id: prize.tournament_id,
        token: prize.token,
        sponsor: prize.sponsor,
        payout_position: prize.payout_position,
        distribution_count: prize.distribution_count,
    })
}

pub fn prize(deps: Deps, prize_id: u64) -> StdResult<PrizeResponse> {
    prize_response(deps, PRIZES.load(deps.storage, prize_id)?)
}

pub fn prizes(
    deps: Deps,
    tournament_id: u64,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<Vec<PrizeResponse>> {
    let start = start_after.map(Bound::exclusive);
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;

    TOURNAMENT_PRIZES
        .prefix(tournament_id)
        .keys(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|prize_id| prize_response(deps, PRIZES.load(deps.storage, prize_id?)?))
        .collect()
}

pub fn registration(
    deps: Deps,
    game_address: String,
    token_id: u64,
) -> StdResult<RegistrationResponse> {
    let game_address = deps.api.addr_validate(&game_address)?;

    Ok(
        match REGISTRATIONS.may_load(deps.storage, (&game_address, token_id))? {
            Some(registration) => RegistrationResponse {
                tournament_id: registration.tournament_id,
                entry_number: registration.entry_number,
                player: Some(registration.player),
                has_submitted: registration.has_submitted,
                is_banned: registration.is_banned,
            },
            None => RegistrationResponse {
                tournament_id: 0,
                entry_number: 0,
                player: None,
                has_submitted: false,
                is_banned: false,
            },
        },
    )
}

pub fn entry_requirement(
    deps: Deps,
    tournament_id: u64,
) -> StdResult<Option<EntryRequirement>> {
    ENTRY_REQUIREMENTS.may_load(deps.storage, tournament_id)
}

pub fn payout(
    deps: Deps,
    tournament_id: u64,
    reward: RewardDescriptor,
) -> StdResult<PayoutResponse> {
    let tournament = tournaments().load(deps.storage, tournament_id)?;
    let payout = payout::resolve(deps, &tournament, &reward)
        .map_err(|err| StdError::generic_err(err.to_string()))?;

    Ok(PayoutResponse {
        recipient: payout.recipient,
        asset: payout.asset,
        claimed: claims::is_claimed(deps.storage, tournament_id, &reward),
    })
}
