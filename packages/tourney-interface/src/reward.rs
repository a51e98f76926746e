use cosmwasm_schema::cw_serde;

/// Identifies exactly one payout so it can be claimed once.
#[cw_serde]
pub enum RewardDescriptor {
    Prize(PrizeReward),
    EntryFee(EntryFeeReward),
}

#[cw_serde]
pub enum PrizeReward {
    /// A prize paid in full to its fixed payout position.
    Single { prize_id: u64 },
    /// The share of a distributed prize owed to 1-based `position`.
    Distributed { prize_id: u64, position: u32 },
}

#[cw_serde]
pub enum EntryFeeReward {
    /// The share of the entry fee pool owed to 1-based `position`.
    Position { position: u32 },
    TournamentCreator {},
    GameCreator {},
    /// The refund share of the entry paid for `token_id`.
    Refund { token_id: u64 },
    /// 0-based index into the tournament's additional share recipients.
    AdditionalShare { index: u32 },
}

impl RewardDescriptor {
    /// Stable tagged byte encoding used as the claim hash preimage.
    pub fn key_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(14);
        match self {
            RewardDescriptor::Prize(prize) => {
                bytes.push(0);
                match prize {
                    PrizeReward::Single { prize_id } => {
                        bytes.push(0);
                        bytes.extend_from_slice(&prize_id.to_be_bytes());
                    }
                    PrizeReward::Distributed { prize_id, position } => {
                        bytes.push(1);
                        bytes.extend_from_slice(&prize_id.to_be_bytes());
                        bytes.extend_from_slice(&position.to_be_bytes());
                    }
                }
            }
            RewardDescriptor::EntryFee(entry_fee) => {
                bytes.push(1);
                match entry_fee {
                    EntryFeeReward::Position { position } => {
                        bytes.push(0);
                        bytes.extend_from_slice(&position.to_be_bytes());
                    }
                    EntryFeeReward::TournamentCreator {} => bytes.push(1),
                    EntryFeeReward::GameCreator {} => bytes.push(2),
                    EntryFeeReward::Refund { token_id } => {
                        bytes.push(3);
                        bytes.extend_from_slice(&token_id.to_be_bytes());
                    }
                    EntryFeeReward::AdditionalShare { index } => {
                        bytes.push(4);
                        bytes.extend_from_slice(&index.to_be_bytes());
                    }
                }
            }
        }
        bytes
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RewardDescriptor::Prize(PrizeReward::Single { .. }) => "prize_single",
            RewardDescriptor::Prize(PrizeReward::Distributed { .. }) => "prize_distributed",
            RewardDescriptor::EntryFee(EntryFeeReward::Position { .. }) => "entry_fee_position",
            RewardDescriptor::EntryFee(EntryFeeReward::TournamentCreator {}) => {
                "entry_fee_tournament_creator"
            }
            RewardDescriptor::EntryFee(EntryFeeReward::GameCreator {}) => "entry_fee_game_creator",
            RewardDescriptor::EntryFee(EntryFeeReward::Refund { .. }) => "entry_fee_refund",
            RewardDescriptor::EntryFee(EntryFeeReward::AdditionalShare { .. }) => {
                "entry_fee_additional_share"
            }
        }
    }
}
