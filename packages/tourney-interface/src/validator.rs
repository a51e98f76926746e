//! Message protocol for external entry validators.
//!
//! A tournament whose entry requirement is an extension forwards every gating
//! decision to a contract answering [`ValidatorQueryMsg`] and accepting
//! [`ValidatorExecuteMsg`] from the tournament contract.

use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Binary;

#[cw_serde]
pub enum ValidatorExecuteMsg {
    /// Sent once when a tournament using this validator is created.
    AddConfig {
        tournament_id: u64,
        entry_limit: u32,
        config: Binary,
    },
    AddEntry {
        tournament_id: u64,
        token_id: u64,
        player: String,
        proof: Option<Binary>,
    },
    RemoveEntry {
        tournament_id: u64,
        token_id: u64,
        player: String,
        proof: Option<Binary>,
    },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum ValidatorQueryMsg {
    /// Whether entries are only accepted during the registration window.
    #[returns(bool)]
    RegistrationOnly {},
    #[returns(bool)]
    ValidEntry {
        tournament_id: u64,
        player: String,
        proof: Option<Binary>,
    },
    #[returns(bool)]
    ShouldBan {
        tournament_id: u64,
        token_id: u64,
        owner: String,
        proof: Option<Binary>,
    },
    /// `None` means unlimited.
    #[returns(Option<u32>)]
    EntriesLeft {
        tournament_id: u64,
        player: String,
        proof: Option<Binary>,
    },
}
