use cosmwasm_std::StdError;
use cw_ownable::OwnershipError;
use cw_utils::PaymentError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    StdError(#[from] StdError),

    #[error("{0}")]
    OwnershipError(#[from] OwnershipError),

    #[error("{0}")]
    PaymentError(#[from] PaymentError),

    #[error("Unauthorized")]
    Unauthorized {},

    #[error("Tournament {tournament_id} is already configured")]
    AlreadyConfigured { tournament_id: u64 },

    #[error("Tournament {tournament_id} is not configured")]
    UnknownTournament { tournament_id: u64 },

    #[error("{player} is not allowed to enter tournament {tournament_id}")]
    NotAllowed { tournament_id: u64, player: String },
}
