use cosmwasm_std::{OverflowError, StdError};
use cw_ownable::OwnershipError;
use cw_utils::PaymentError;
use thiserror::Error;
use tourney_distribution::DistributionError;
use tourney_interface::schedule::{Phase, ScheduleError};

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    StdError(#[from] StdError),

    #[error("{0}")]
    OwnershipError(#[from] OwnershipError),

    #[error("{0}")]
    OverflowError(#[from] OverflowError),

    #[error("{0}")]
    PaymentError(#[from] PaymentError),

    #[error("{0}")]
    DistributionError(#[from] DistributionError),

    #[error("{0}")]
    ScheduleError(#[from] ScheduleError),

    #[error("Unauthorized")]
    Unauthorized {},

    #[error("Cannot {action} during the {phase} phase")]
    InvalidPhase { action: String, phase: Phase },

    #[error("Leaderboard size {size} must be between 1 and {max}")]
    InvalidLeaderboardSize { size: u32, max: u32 },

    #[error("Invalid entry fee: {reason}")]
    InvalidEntryFee { reason: String },

    #[error("Entry fee shares total {total} basis points, above 10000")]
    FeeSharesExceedTotal { total: u32 },

    #[error("Entry fee {expected} was not paid")]
    EntryFeeNotPaid { expected: String },

    #[error("Tournament does not accept this payment")]
    UnexpectedPayment {},

    #[error("Player does not meet the entry requirement")]
    InvalidEntry {},

    #[error("No entries left for this player")]
    NoEntriesLeft {},

    #[error("Token {token_id} is not registered for tournament {tournament_id}")]
    NotRegistered { tournament_id: u64, token_id: u64 },

    #[error("Score has already been submitted")]
    AlreadySubmitted {},

    #[error("Entry has been banned")]
    EntryBanned {},

    #[error("Position {position} is not available, expected 1..={max}")]
    InvalidPosition { position: u32, max: u32 },

    #[error("Score is higher than the score at position {position}")]
    ScoreTooHigh { position: u32 },

    #[error("Score does not beat the score at position {position}")]
    ScoreTooLow { position: u32 },

    #[error("Invalid prize: {reason}")]
    InvalidPrize { reason: String },

    #[error("Invalid reward: {reason}")]
    InvalidReward { reason: String },

    #[error("Reward has already been claimed")]
    AlreadyClaimed {},

    #[error("Tournament has no entry requirement")]
    NoEntryRequirement {},

    #[error("Entry does not qualify for a ban")]
    CannotBan {},
}

impl ContractError {
    pub fn invalid_phase(action: &str, phase: Phase) -> Self {
        ContractError::InvalidPhase {
            action: action.to_string(),
            phase,
        }
    }
}
