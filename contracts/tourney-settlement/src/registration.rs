use cosmwasm_std::{Addr, StdError, StdResult, Storage};
use tourney_interface::schedule::{Phase, Schedule};

use crate::{
    state::{Registration, Tournament, ENTRY_COUNTS, GAME_TOKEN_COUNTS, REGISTRATIONS},
    ContractError,
};

/// Whether new entries are accepted in `phase`.
///
/// Requirements that are not registration-only let players join any time
/// before submissions open, as do tournaments without a registration window.
pub fn is_open(schedule: &Schedule, phase: Phase, registration_only: bool) -> bool {
    if schedule.registration.is_some() && registration_only {
        phase == Phase::Registration
    } else {
        phase < Phase::Submission
    }
}

/// Mints the next game token id and tournament entry number for `player`.
/// Both sequences start at 1.
pub fn allocate_entry(
    storage: &mut dyn Storage,
    tournament: &Tournament,
    player: Addr,
) -> StdResult<(u64, Registration)> {
    let game_address = &tournament.game_config.game_address;
    let token_id = GAME_TOKEN_COUNTS.update(storage, game_address, |count| -> StdResult<_> {
        Ok(count.unwrap_or_default().checked_add(1).ok_or_else(|| {
            StdError::generic_err("game token id overflow")
        })?)
    })?;
    let entry_number = ENTRY_COUNTS.update(storage, tournament.id, |count| -> StdResult<_> {
        Ok(count.unwrap_or_default().checked_add(1).ok_or_else(|| {
            StdError::generic_err("entry number overflow")
        })?)
    })?;

    let registration = Registration {
        tournament_id: tournament.id,
        entry_number,
        player,
        has_submitted: false,
        is_banned: false,
    };
    REGISTRATIONS.save(storage, (game_address, token_id), &registration)?;

    Ok((token_id, registration))
}

/// Loads the registration of `token_id`, failing if it belongs to another
/// tournament on the same game.
pub fn load_registration(
    storage: &dyn Storage,
    tournament: &Tournament,
    token_id: u64,
) -> Result<Registration, ContractError> {
    REGISTRATIONS
        .may_load(storage, (&tournament.game_config.game_address, token_id))?
        .filter(|registration| registration.tournament_id == tournament.id)
        .ok_or(ContractError::NotRegistered {
            tournament_id: tournament.id,
            token_id,
        })
}

pub fn save_registration(
    storage: &mut dyn Storage,
    tournament: &Tournament,
    token_id: u64,
    registration: &Registration,
) -> StdResult<()> {
    REGISTRATIONS.save(
        storage,
        (&tournament.game_config.game_address, token_id),
        registration,
    )
}
