use cosmwasm_schema::{cw_serde, QueryResponses};

/// Queries a game contract must answer for its tokens to be ranked.
#[cw_serde]
#[derive(QueryResponses)]
pub enum GameQueryMsg {
    #[returns(u64)]
    Score { token_id: u64 },
}
