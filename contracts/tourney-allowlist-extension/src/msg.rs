use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Binary;

use crate::state::{Allowlist, Config};

#[cw_serde]
pub struct InstantiateMsg {
    pub owner: String,
    pub tournament_contract: String,
    pub registration_only: bool,
}

/// Payload of `AddConfig`, chosen by the tournament creator.
#[cw_serde]
pub struct AllowlistConfig {
    pub addresses: Vec<String>,
}

/// Accepts the validator execute protocol plus owner moderation.
#[cw_ownable::cw_ownable_execute]
#[cw_serde]
pub enum ExecuteMsg {
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
    /// Entries owned by a revoked address become bannable
    Revoke { tournament_id: u64, address: String },
}

#[cw_ownable::cw_ownable_query]
#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
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
    #[returns(Option<u32>)]
    EntriesLeft {
        tournament_id: u64,
        player: String,
        proof: Option<Binary>,
    },
    #[returns(Config)]
    Config {},
    #[returns(Option<Allowlist>)]
    Allowlist { tournament_id: u64 },
    #[returns(u32)]
    Entries { tournament_id: u64, player: String },
}
