use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Api, Binary, StdResult, Uint128};
use cw20::Cw20ReceiveMsg;
use cw721::Cw721ReceiveMsg;
use tourney_distribution::Distribution;
use tourney_interface::{
    reward::RewardDescriptor,
    schedule::{Phase, Schedule, ScheduleLimits},
};

use crate::payout::Asset;
use crate::state::{
    Config, EntryRequirement, EntryRequirementType, FeeToken, Metadata, PrizeToken, Tournament,
};

#[cw_serde]
pub struct InstantiateMsg {
    pub owner: String,
    pub schedule_limits: Option<ScheduleLimits>,
    pub max_leaderboard_size: Option<u32>,
    pub max_additional_shares: Option<u32>,
}

#[allow(clippy::large_enum_variant)]
#[cw_ownable::cw_ownable_execute]
#[cw_serde]
pub enum ExecuteMsg {
    CreateTournament {
        metadata: Metadata,
        schedule: Schedule,
        game_config: GameConfigMsg,
        entry_fee: Option<EntryFeeMsg>,
        entry_requirement: Option<EntryRequirementMsg>,
    },
    /// Native entry fees are attached as funds
    Register {
        tournament_id: u64,
        /// Owner of the entry, defaults to the sender
        player: Option<String>,
        proof: Option<Binary>,
    },
    SubmitScore {
        tournament_id: u64,
        token_id: u64,
        position: u32,
    },
    /// Native prizes are attached as funds
    AddPrize {
        tournament_id: u64,
        distribution: Option<Distribution>,
        distribution_count: Option<u32>,
        position: u32,
    },
    ClaimReward {
        tournament_id: u64,
        reward: RewardDescriptor,
    },
    BanEntry {
        tournament_id: u64,
        token_id: u64,
        proof: Option<Binary>,
    },
    UpdateConfig {
        schedule_limits: Option<ScheduleLimits>,
        max_leaderboard_size: Option<u32>,
        max_additional_shares: Option<u32>,
    },
    Receive(Cw20ReceiveMsg),
    ReceiveNft(Cw721ReceiveMsg),
}

/// Hook messages for cw20 `Send`
#[cw_serde]
pub enum ReceiveMsg {
    Register {
        tournament_id: u64,
        player: Option<String>,
        proof: Option<Binary>,
    },
    AddPrize {
        tournament_id: u64,
        distribution: Option<Distribution>,
        distribution_count: Option<u32>,
        position: u32,
    },
}

/// Hook messages for cw721 `SendNft`
#[cw_serde]
pub enum NftReceiveMsg {
    AddPrize { tournament_id: u64, position: u32 },
}

#[cw_serde]
pub struct GameConfigMsg {
    pub game_address: String,
    pub game_creator: Option<String>,
    pub leaderboard_size: u32,
}

#[cw_serde]
pub enum FeeTokenMsg {
    Native { denom: String },
    Cw20 { address: String },
}

impl FeeTokenMsg {
    pub fn into_checked(self, api: &dyn Api) -> StdResult<FeeToken> {
        Ok(match self {
            FeeTokenMsg::Native { denom } => FeeToken::Native { denom },
            FeeTokenMsg::Cw20 { address } => FeeToken::Cw20 {
                address: api.addr_validate(&address)?,
            },
        })
    }
}

#[cw_serde]
pub struct AdditionalShareMsg {
    pub recipient: String,
    pub share_bps: u16,
}

#[cw_serde]
pub struct EntryFeeMsg {
    pub token: FeeTokenMsg,
    pub amount: Uint128,
    pub distribution: Distribution,
    /// Paid places, defaults to the leaderboard size
    pub distribution_count: Option<u32>,
    pub tournament_creator_share: Option<u16>,
    pub game_creator_share: Option<u16>,
    pub refund_share: Option<u16>,
    #[serde(default)]
    pub additional_shares: Vec<AdditionalShareMsg>,
}

#[cw_serde]
pub enum EntryRequirementTypeMsg {
    Token {
        address: String,
        min_balance: Uint128,
    },
    Allowlist {
        addresses: Vec<String>,
    },
    Extension {
        address: String,
        config: Binary,
    },
}

#[cw_serde]
pub struct EntryRequirementMsg {
    #[serde(default)]
    pub entry_limit: u32,
    pub requirement_type: EntryRequirementTypeMsg,
}

impl EntryRequirementMsg {
    pub fn into_checked(self, api: &dyn Api) -> StdResult<EntryRequirement> {
        let requirement_type = match self.requirement_type {
            EntryRequirementTypeMsg::Token {
                address,
                min_balance,
            } => EntryRequirementType::Token {
                address: api.addr_validate(&address)?,
                min_balance,
            },
            EntryRequirementTypeMsg::Allowlist { addresses } => EntryRequirementType::Allowlist {
                addresses: addresses
                    .iter()
                    .map(|address| api.addr_validate(address))
                    .collect::<StdResult<Vec<_>>>()?,
            },
            EntryRequirementTypeMsg::Extension { address, config } => {
                EntryRequirementType::Extension {
                    address: api.addr_validate(&address)?,
                    config,
                }
            }
        };

        Ok(EntryRequirement {
            entry_limit: self.entry_limit,
            requirement_type,
        })
    }
}

#[cw_serde]
pub enum TournamentFilter {
    Creator(String),
}

#[cw_ownable::cw_ownable_query]
#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(Config)]
    Config {},
    #[returns(TournamentResponse)]
    Tournament { tournament_id: u64 },
    #[returns(Vec<TournamentResponse>)]
    Tournaments {
        start_after: Option<u64>,
        limit: Option<u32>,
        filter: Option<TournamentFilter>,
    },
    #[returns(u64)]
    TournamentCount {},
    #[returns(Phase)]
    Phase { tournament_id: u64 },
    #[returns(Option<EntryFeeResponse>)]
    EntryFee { tournament_id: u64 },
    #[returns(Option<EntryRequirement>)]
    EntryRequirement { tournament_id: u64 },
    #[returns(u32)]
    EntryCount { tournament_id: u64 },
    /// Entries the player may still make, `None` when unlimited
    #[returns(Option<u32>)]
    EntriesLeft {
        tournament_id: u64,
        player: String,
        proof: Option<Binary>,
    },
    #[returns(PrizeResponse)]
    Prize { prize_id: u64 },
    #[returns(Vec<PrizeResponse>)]
    Prizes {
        tournament_id: u64,
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    /// Unregistered tokens return `entry_number` 0
    #[returns(RegistrationResponse)]
    Registration { game_address: String, token_id: u64 },
    #[returns(Vec<u64>)]
    Leaderboard { tournament_id: u64 },
    #[returns(bool)]
    IsClaimed {
        tournament_id: u64,
        reward: RewardDescriptor,
    },
    /// What claiming `reward` would pay right now
    #[returns(PayoutResponse)]
    Payout {
        tournament_id: u64,
        reward: RewardDescriptor,
    },
}

#[cw_serde]
pub enum MigrateMsg {
    FromCompatible {},
}

#[cw_serde]
pub struct TournamentResponse {
    pub tournament: Tournament,
    pub phase: Phase,
    pub entry_count: u32,
    pub prize_count: u32,
}

#[cw_serde]
pub struct AdditionalShareResponse {
    pub recipient: Addr,
    pub share_bps: u16,
    pub claimed: bool,
}

#[cw_serde]
pub struct EntryFeeResponse {
    pub token: FeeToken,
    pub amount: Uint128,
    pub distribution: Distribution,
    pub distribution_count: u32,
    pub tournament_creator_share: Option<u16>,
    pub game_creator_share: Option<u16>,
    pub refund_share: Option<u16>,
    pub additional_shares: Vec<AdditionalShareResponse>,
}

#[cw_serde]
pub struct PrizeResponse {
    pub id: u64,
    pub tournament_id: u64,
    pub token: PrizeToken,
    pub sponsor: Addr,
    pub payout_position: u32,
    pub distribution: Option<Distribution>,
    pub distribution_count: u32,
}

#[cw_serde]
pub struct RegistrationResponse {
    pub tournament_id: u64,
    pub entry_number: u32,
    pub player: Option<Addr>,
    pub has_submitted: bool,
    pub is_banned: bool,
}

#[cw_serde]
pub struct PayoutResponse {
    pub recipient: Addr,
    pub asset: Option<Asset>,
    pub claimed: bool,
}
