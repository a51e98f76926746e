use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Binary, StdResult, Storage, Uint128, Uint256};
use cw_storage_plus::{Index, IndexList, IndexedMap, Item, Map, MultiIndex};
use tourney_distribution::Distribution;
use tourney_interface::schedule::{Schedule, ScheduleLimits};
use tourney_packing::{CustomShareCodec, PackedCodec, RecipientShare, RecipientShareCodec};

#[cw_serde]
pub struct Config {
    pub schedule_limits: ScheduleLimits,
    pub max_leaderboard_size: u32,
    pub max_additional_shares: u32,
}

#[cw_serde]
pub struct Metadata {
    pub name: String,
    pub description: String,
}

#[cw_serde]
pub struct GameConfig {
    pub game_address: Addr,
    pub game_creator: Option<Addr>,
    pub leaderboard_size: u32,
}

#[cw_serde]
pub struct Tournament {
    pub id: u64,
    pub creator: Addr,
    pub created_at: u64,
    pub metadata: Metadata,
    pub schedule: Schedule,
    pub game_config: GameConfig,
}

#[cw_serde]
pub enum FeeToken {
    Native { denom: String },
    Cw20 { address: Addr },
}

impl std::fmt::Display for FeeToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeeToken::Native { denom } => f.write_str(denom),
            FeeToken::Cw20 { address } => f.write_str(address.as_str()),
        }
    }
}

/// Stored shape of a [`Distribution`]. Custom shares live in packed words
/// next to the record that owns them.
#[cw_serde]
pub enum DistributionState {
    Linear { weight: u16 },
    Exponential { weight: u16 },
    Uniform {},
    Custom { len: u32 },
}

impl DistributionState {
    pub fn store(
        storage: &mut dyn Storage,
        words: &Map<(u64, u32), Uint256>,
        id: u64,
        distribution: &Distribution,
    ) -> StdResult<Self> {
        Ok(match distribution {
            Distribution::Linear { weight } => DistributionState::Linear { weight: *weight },
            Distribution::Exponential { weight } => {
                DistributionState::Exponential { weight: *weight }
            }
            Distribution::Uniform {} => DistributionState::Uniform {},
            Distribution::Custom { shares } => {
                for (index, word) in CustomShareCodec::pack_all(shares).into_iter().enumerate() {
                    words.save(storage, (id, index as u32), &word)?;
                }
                DistributionState::Custom {
                    len: shares.len() as u32,
                }
            }
        })
    }

    pub fn load(
        &self,
        storage: &dyn Storage,
        words: &Map<(u64, u32), Uint256>,
        id: u64,
    ) -> StdResult<Distribution> {
        Ok(match self {
            DistributionState::Linear { weight } => Distribution::Linear { weight: *weight },
            DistributionState::Exponential { weight } => {
                Distribution::Exponential { weight: *weight }
            }
            DistributionState::Uniform {} => Distribution::Uniform {},
            DistributionState::Custom { len } => {
                let packed = (0..CustomShareCodec::words_for(*len))
                    .map(|index| words.load(storage, (id, index)))
                    .collect::<StdResult<Vec<_>>>()?;
                Distribution::Custom {
                    shares: CustomShareCodec::unpack_all(&packed, *len),
                }
            }
        })
    }
}

#[cw_serde]
pub struct EntryFee {
    pub token: FeeToken,
    pub amount: Uint128,
    pub distribution: DistributionState,
    pub distribution_count: u32,
    pub tournament_creator_share: Option<u16>,
    pub game_creator_share: Option<u16>,
    pub refund_share: Option<u16>,
    /// Shares and claimed flags are packed in [`ADDITIONAL_SHARES`].
    pub additional_recipients: Vec<Addr>,
}

impl EntryFee {
    /// Basis points of the pool left for leaderboard positions.
    pub fn position_share(&self, storage: &dyn Storage, tournament_id: u64) -> StdResult<u16> {
        let additional: u32 = load_additional_shares(
            storage,
            tournament_id,
            self.additional_recipients.len() as u32,
        )?
        .iter()
        .map(|share| share.share_bps as u32)
        .sum();
        let reserved = [
            self.tournament_creator_share,
            self.game_creator_share,
            self.refund_share,
        ]
        .iter()
        .flatten()
        .map(|share| *share as u32)
        .sum::<u32>()
            + additional;

        Ok(10_000u32.saturating_sub(reserved) as u16)
    }
}

#[cw_serde]
pub enum EntryRequirementType {
    /// Holders of at least `min_balance` of a cw20 token.
    Token { address: Addr, min_balance: Uint128 },
    Allowlist { addresses: Vec<Addr> },
    /// Delegates every decision to an external validator contract.
    Extension { address: Addr, config: Binary },
}

#[cw_serde]
pub struct EntryRequirement {
    /// Entries allowed per player, 0 for unlimited.
    pub entry_limit: u32,
    pub requirement_type: EntryRequirementType,
}

#[cw_serde]
pub struct Registration {
    pub tournament_id: u64,
    pub entry_number: u32,
    pub player: Addr,
    pub has_submitted: bool,
    pub is_banned: bool,
}

#[cw_serde]
pub enum PrizeToken {
    Native { denom: String, amount: Uint128 },
    Cw20 { address: Addr, amount: Uint128 },
    Cw721 { address: Addr, token_id: String },
}

#[cw_serde]
pub struct Prize {
    pub id: u64,
    pub tournament_id: u64,
    pub token: PrizeToken,
    pub sponsor: Addr,
    /// 0 when the prize is split by `distribution`.
    pub payout_position: u32,
    pub distribution: Option<DistributionState>,
    pub distribution_count: u32,
}

pub struct TournamentIndexes<'a> {
    pub creator: MultiIndex<'a, Addr, Tournament, u64>,
}

impl IndexList<Tournament> for TournamentIndexes<'_> {
    fn get_indexes(&'_ self) -> Box<dyn Iterator<Item = &'_ dyn Index<Tournament>> + '_> {
        let v: Vec<&dyn Index<Tournament>> = vec![&self.creator];
        Box::new(v.into_iter())
    }
}

pub fn tournaments<'a>() -> IndexedMap<'a, u64, Tournament, TournamentIndexes<'a>> {
    let indexes = TournamentIndexes {
        creator: MultiIndex::new(
            |_pk, tournament: &Tournament| tournament.creator.clone(),
            "tournaments",
            "tournaments__creator",
        ),
    };

    IndexedMap::new("tournaments", indexes)
}

pub const CONFIG: Item<Config> = Item::new("config");
pub const TOURNAMENT_COUNT: Item<u64> = Item::new("tournament_count");
pub const PRIZE_COUNT: Item<u64> = Item::new("prize_count");

pub const ENTRY_FEES: Map<u64, EntryFee> = Map::new("entry_fees");
pub const ENTRY_FEE_CUSTOM_SHARES: Map<(u64, u32), Uint256> = Map::new("entry_fee_custom_shares");
/// (tournament_id, word_index) -> packed [`RecipientShare`] records
pub const ADDITIONAL_SHARES: Map<(u64, u32), Uint256> = Map::new("additional_shares");

pub const ENTRY_REQUIREMENTS: Map<u64, EntryRequirement> = Map::new("entry_requirements");
/// Entries used per player under a built-in requirement
pub const QUALIFICATION_ENTRIES: Map<(u64, &Addr), u32> = Map::new("qualification_entries");

pub const ENTRY_COUNTS: Map<u64, u32> = Map::new("entry_counts");
pub const GAME_TOKEN_COUNTS: Map<&Addr, u64> = Map::new("game_token_counts");
/// (game_address, token_id) -> registration
pub const REGISTRATIONS: Map<(&Addr, u64), Registration> = Map::new("registrations");

/// Token ids, best first
pub const LEADERBOARDS: Map<u64, Vec<u64>> = Map::new("leaderboards");

pub const PRIZES: Map<u64, Prize> = Map::new("prizes");
pub const PRIZE_CUSTOM_SHARES: Map<(u64, u32), Uint256> = Map::new("prize_custom_shares");
pub const TOURNAMENT_PRIZES: Map<(u64, u64), ()> = Map::new("tournament_prizes");
pub const PRIZE_COUNTS: Map<u64, u32> = Map::new("prize_counts");

/// (tournament_id, sha256 of the reward key)
pub const CLAIMS: Map<(u64, &[u8]), ()> = Map::new("claims");

pub fn save_additional_shares(
    storage: &mut dyn Storage,
    tournament_id: u64,
    shares: &[u16],
) -> StdResult<()> {
    let records: Vec<RecipientShare> = shares
        .iter()
        .map(|share_bps| RecipientShare {
            share_bps: *share_bps,
            claimed: false,
        })
        .collect();
    for (index, word) in RecipientShareCodec::pack_all(&records)
        .into_iter()
        .enumerate()
    {
        ADDITIONAL_SHARES.save(storage, (tournament_id, index as u32), &word)?;
    }
    Ok(())
}

pub fn load_additional_shares(
    storage: &dyn Storage,
    tournament_id: u64,
    len: u32,
) -> StdResult<Vec<RecipientShare>> {
    let words = (0..RecipientShareCodec::words_for(len))
        .map(|index| ADDITIONAL_SHARES.load(storage, (tournament_id, index)))
        .collect::<StdResult<Vec<_>>>()?;
    Ok(RecipientShareCodec::unpack_all(&words, len))
}

pub fn load_additional_share(
    storage: &dyn Storage,
    tournament_id: u64,
    index: u32,
) -> StdResult<RecipientShare> {
    let (word_index, offset) = RecipientShareCodec::locate(index);
    let word = ADDITIONAL_SHARES.load(storage, (tournament_id, word_index))?;
    Ok(RecipientShareCodec::get(word, offset))
}

pub fn mark_additional_share_claimed(
    storage: &mut dyn Storage,
    tournament_id: u64,
    index: u32,
) -> StdResult<()> {
    let (word_index, offset) = RecipientShareCodec::locate(index);
    ADDITIONAL_SHARES.update(storage, (tournament_id, word_index), |word| -> StdResult<_> {
        Ok(RecipientShareCodec::mark_claimed(
            word.unwrap_or_default(),
            offset,
        ))
    })?;
    Ok(())
}
