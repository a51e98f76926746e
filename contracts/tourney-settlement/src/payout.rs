use cosmwasm_schema::cw_serde;
use cosmwasm_std::{
    coin, to_json_binary, Addr, BankMsg, CosmosMsg, Deps, StdResult, Uint128, WasmMsg,
};
use cw20::Cw20ExecuteMsg;
use cw721::Cw721ExecuteMsg;
use tourney_distribution::{amount_for_share, share_at, TOTAL_BPS};
use tourney_interface::reward::{EntryFeeReward, PrizeReward, RewardDescriptor};

use crate::{
    registration::load_registration,
    state::{
        load_additional_share, EntryFee, FeeToken, Prize, PrizeToken, Tournament, ENTRY_COUNTS,
        ENTRY_FEES, ENTRY_FEE_CUSTOM_SHARES, LEADERBOARDS, PRIZES, PRIZE_CUSTOM_SHARES,
        REGISTRATIONS,
    },
    ContractError,
};

/// A single transferable holding of the contract.
#[cw_serde]
pub enum Asset {
    Native { denom: String, amount: Uint128 },
    Cw20 { address: Addr, amount: Uint128 },
    Cw721 { address: Addr, token_id: String },
}

impl Asset {
    fn fungible(token: &FeeToken, amount: Uint128) -> Self {
        match token {
            FeeToken::Native { denom } => Asset::Native {
                denom: denom.clone(),
                amount,
            },
            FeeToken::Cw20 { address } => Asset::Cw20 {
                address: address.clone(),
                amount,
            },
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Asset::Native { amount, .. } | Asset::Cw20 { amount, .. } => amount.is_zero(),
            Asset::Cw721 { .. } => false,
        }
    }

    pub fn transfer_msg(self, recipient: &Addr) -> StdResult<CosmosMsg> {
        Ok(match self {
            Asset::Native { denom, amount } => CosmosMsg::Bank(BankMsg::Send {
                to_address: recipient.to_string(),
                amount: vec![coin(amount.u128(), denom)],
            }),
            Asset::Cw20 { address, amount } => CosmosMsg::Wasm(WasmMsg::Execute {
                contract_addr: address.to_string(),
                msg: to_json_binary(&Cw20ExecuteMsg::Transfer {
                    recipient: recipient.to_string(),
                    amount,
                })?,
                funds: vec![],
            }),
            Asset::Cw721 { address, token_id } => CosmosMsg::Wasm(WasmMsg::Execute {
                contract_addr: address.to_string(),
                msg: to_json_binary(&Cw721ExecuteMsg::TransferNft {
                    recipient: recipient.to_string(),
                    token_id,
                })?,
                funds: vec![],
            }),
        })
    }
}

impl std::fmt::Display for Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Asset::Native { denom, amount } => write!(f, "{amount}{denom}"),
            Asset::Cw20 { address, amount } => write!(f, "{amount}{address}"),
            Asset::Cw721 { address, token_id } => write!(f, "{address}:{token_id}"),
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct Payout {
    pub recipient: Addr,
    /// `None` when the reward is worth nothing, e.g. an empty pool.
    pub asset: Option<Asset>,
}

impl Payout {
    fn new(recipient: Addr, asset: Asset) -> Self {
        let asset = if asset.is_zero() { None } else { Some(asset) };
        Payout { recipient, asset }
    }
}

fn invalid(reason: impl Into<String>) -> ContractError {
    ContractError::InvalidReward {
        reason: reason.into(),
    }
}

/// Owner of the entry at 1-based `position`, or the tournament creator when
/// nobody finished there.
pub fn position_recipient(deps: Deps, tournament: &Tournament, position: u32) -> StdResult<Addr> {
    let leaderboard = LEADERBOARDS
        .may_load(deps.storage, tournament.id)?
        .unwrap_or_default();

    match position
        .checked_sub(1)
        .and_then(|index| leaderboard.get(index as usize))
    {
        Some(token_id) => Ok(REGISTRATIONS
            .load(
                deps.storage,
                (&tournament.game_config.game_address, *token_id),
            )?
            .player),
        None => Ok(tournament.creator.clone()),
    }
}

/// Works out who receives `reward` and what they get, without touching the
/// claim ledger.
pub fn resolve(
    deps: Deps,
    tournament: &Tournament,
    reward: &RewardDescriptor,
) -> Result<Payout, ContractError> {
    match reward {
        RewardDescriptor::Prize(prize_reward) => resolve_prize(deps, tournament, prize_reward),
        RewardDescriptor::EntryFee(entry_fee_reward) => {
            resolve_entry_fee(deps, tournament, entry_fee_reward)
        }
    }
}

fn resolve_prize(
    deps: Deps,
    tournament: &Tournament,
    reward: &PrizeReward,
) -> Result<Payout, ContractError> {
    let prize_id = match reward {
        PrizeReward::Single { prize_id } | PrizeReward::Distributed { prize_id, .. } => *prize_id,
    };
    let prize: Prize = PRIZES
        .may_load(deps.storage, prize_id)?
        .filter(|prize| prize.tournament_id == tournament.id)
        .ok_or_else(|| invalid(format!("prize {prize_id} is not part of this tournament")))?;

    match reward {
        PrizeReward::Single { .. } => {
            if prize.payout_position == 0 {
                return Err(invalid("distributed prizes are claimed per position"));
            }
            let recipient = position_recipient(deps, tournament, prize.payout_position)?;
            let asset = match prize.token {
                PrizeToken::Native { denom, amount } => Asset::Native { denom, amount },
                PrizeToken::Cw20 { address, amount } => Asset::Cw20 { address, amount },
                PrizeToken::Cw721 { address, token_id } => Asset::Cw721 { address, token_id },
            };
            Ok(Payout::new(recipient, asset))
        }
        PrizeReward::Distributed { position, .. } => {
            let distribution = prize
                .distribution
                .as_ref()
                .ok_or_else(|| invalid("prize is paid to a single position"))?
                .load(deps.storage, &PRIZE_CUSTOM_SHARES, prize.id)?;
            if *position == 0 || *position > prize.distribution_count {
                return Err(invalid(format!(
                    "prize {} pays positions 1..={}",
                    prize.id, prize.distribution_count
                )));
            }
            let share = share_at(&distribution, prize.distribution_count, *position)?;
            let recipient = position_recipient(deps, tournament, *position)?;
            let asset = match prize.token {
                PrizeToken::Native { denom, amount } => Asset::Native {
                    denom,
                    amount: amount_for_share(amount, share),
                },
                PrizeToken::Cw20 { address, amount } => Asset::Cw20 {
                    address,
                    amount: amount_for_share(amount, share),
                },
                PrizeToken::Cw721 { .. } => {
                    return Err(invalid("nft prizes cannot be distributed"))
                }
            };
            Ok(Payout::new(recipient, asset))
        }
    }
}

fn resolve_entry_fee(
    deps: Deps,
    tournament: &Tournament,
    reward: &EntryFeeReward,
) -> Result<Payout, ContractError> {
    let entry_fee: EntryFee = ENTRY_FEES
        .may_load(deps.storage, tournament.id)?
        .ok_or_else(|| invalid("tournament has no entry fee"))?;
    let entry_count = ENTRY_COUNTS
        .may_load(deps.storage, tournament.id)?
        .unwrap_or_default();
    let pool = entry_fee.amount.checked_mul(Uint128::from(entry_count))?;

    let (recipient, amount) = match reward {
        EntryFeeReward::Position { position } => {
            if *position == 0 || *position > entry_fee.distribution_count {
                return Err(invalid(format!(
                    "entry fee pays positions 1..={}",
                    entry_fee.distribution_count
                )));
            }
            let distribution =
                entry_fee
                    .distribution
                    .load(deps.storage, &ENTRY_FEE_CUSTOM_SHARES, tournament.id)?;
            let share = share_at(&distribution, entry_fee.distribution_count, *position)?;
            let position_share = entry_fee.position_share(deps.storage, tournament.id)?;
            let amount = pool.multiply_ratio(
                position_share as u128 * share as u128,
                TOTAL_BPS as u128 * TOTAL_BPS as u128,
            );
            (position_recipient(deps, tournament, *position)?, amount)
        }
        EntryFeeReward::TournamentCreator {} => {
            let share = entry_fee
                .tournament_creator_share
                .ok_or_else(|| invalid("no tournament creator share"))?;
            (tournament.creator.clone(), amount_for_share(pool, share))
        }
        EntryFeeReward::GameCreator {} => {
            let share = entry_fee
                .game_creator_share
                .ok_or_else(|| invalid("no game creator share"))?;
            let game_creator = tournament
                .game_config
                .game_creator
                .clone()
                .ok_or_else(|| invalid("tournament has no game creator"))?;
            (game_creator, amount_for_share(pool, share))
        }
        EntryFeeReward::Refund { token_id } => {
            let share = entry_fee
                .refund_share
                .ok_or_else(|| invalid("no refund share"))?;
            let registration = load_registration(deps.storage, tournament, *token_id)?;
            (
                registration.player,
                amount_for_share(entry_fee.amount, share),
            )
        }
        EntryFeeReward::AdditionalShare { index } => {
            let recipient = entry_fee
                .additional_recipients
                .get(*index as usize)
                .cloned()
                .ok_or_else(|| invalid(format!("no additional share at index {index}")))?;
            let share = load_additional_share(deps.storage, tournament.id, *index)?;
            (recipient, amount_for_share(pool, share.share_bps))
        }
    };

    Ok(Payout::new(
        recipient,
        Asset::fungible(&entry_fee.token, amount),
    ))
}

#[cfg(test)]
mod tests {
    use cosmwasm_std::testing::{mock_dependencies, MockStorage};
    use tourney_distribution::Distribution;
    use tourney_interface::schedule::{Period, Schedule};

    use super::*;
    use crate::state::{
        save_additional_shares, DistributionState, GameConfig, Metadata, Registration,
    };

    fn tournament() -> Tournament {
        Tournament {
            id: 1,
            creator: Addr::unchecked("creator"),
            created_at: 0,
            metadata: Metadata {
                name: "cup".to_string(),
                description: String::new(),
            },
            schedule: Schedule {
                registration: None,
                game: Period::new(100, 200),
                submission_duration: 100,
            },
            game_config: GameConfig {
                game_address: Addr::unchecked("game"),
                game_creator: Some(Addr::unchecked("studio")),
                leaderboard_size: 3,
            },
        }
    }

    fn save_entry_fee(storage: &mut MockStorage, additional: &[(&str, u16)]) {
        let distribution = DistributionState::store(
            storage,
            &ENTRY_FEE_CUSTOM_SHARES,
            1,
            &Distribution::Custom {
                shares: vec![6000, 3000, 1000],
            },
        )
        .unwrap();
        let shares: Vec<u16> = additional.iter().map(|(_, share)| *share).collect();
        save_additional_shares(storage, 1, &shares).unwrap();
        ENTRY_FEES
            .save(
                storage,
                1,
                &EntryFee {
                    token: FeeToken::Native {
                        denom: "utourney".to_string(),
                    },
                    amount: Uint128::new(100),
                    distribution,
                    distribution_count: 3,
                    tournament_creator_share: Some(1000),
                    game_creator_share: Some(500),
                    refund_share: Some(1000),
                    additional_recipients: additional
                        .iter()
                        .map(|(recipient, _)| Addr::unchecked(*recipient))
                        .collect(),
                },
            )
            .unwrap();
    }

    fn register(storage: &mut MockStorage, token_id: u64, player: &str) {
        REGISTRATIONS
            .save(
                storage,
                (&Addr::unchecked("game"), token_id),
                &Registration {
                    tournament_id: 1,
                    entry_number: token_id as u32,
                    player: Addr::unchecked(player),
                    has_submitted: true,
                    is_banned: false,
                },
            )
            .unwrap();
    }

    fn native(amount: u128) -> Option<Asset> {
        Some(Asset::Native {
            denom: "utourney".to_string(),
            amount: Uint128::new(amount),
        })
    }

    #[test]
    fn entry_fee_pool_is_split_after_fees() {
        let mut deps = mock_dependencies();
        save_entry_fee(&mut deps.storage, &[("treasury", 500)]);
        ENTRY_COUNTS.save(&mut deps.storage, 1, &10).unwrap();
        register(&mut deps.storage, 1, "alice");
        register(&mut deps.storage, 2, "bob");
        LEADERBOARDS.save(&mut deps.storage, 1, &vec![2, 1]).unwrap();
        let tournament = tournament();

        // pool 1000, positions share 10000 - 1000 - 500 - 1000 - 500 = 7000
        let first = resolve(
            deps.as_ref(),
            &tournament,
            &RewardDescriptor::EntryFee(EntryFeeReward::Position { position: 1 }),
        )
        .unwrap();
        assert_eq!(first.recipient, Addr::unchecked("bob"));
        assert_eq!(first.asset, native(420));

        // nobody finished third, the creator collects
        let third = resolve(
            deps.as_ref(),
            &tournament,
            &RewardDescriptor::EntryFee(EntryFeeReward::Position { position: 3 }),
        )
        .unwrap();
        assert_eq!(third.recipient, Addr::unchecked("creator"));
        assert_eq!(third.asset, native(70));

        let creator = resolve(
            deps.as_ref(),
            &tournament,
            &RewardDescriptor::EntryFee(EntryFeeReward::TournamentCreator {}),
        )
        .unwrap();
        assert_eq!(creator.asset, native(100));

        let studio = resolve(
            deps.as_ref(),
            &tournament,
            &RewardDescriptor::EntryFee(EntryFeeReward::GameCreator {}),
        )
        .unwrap();
        assert_eq!(studio.recipient, Addr::unchecked("studio"));
        assert_eq!(studio.asset, native(50));

        let refund = resolve(
            deps.as_ref(),
            &tournament,
            &RewardDescriptor::EntryFee(EntryFeeReward::Refund { token_id: 1 }),
        )
        .unwrap();
        assert_eq!(refund.recipient, Addr::unchecked("alice"));
        assert_eq!(refund.asset, native(10));

        let treasury = resolve(
            deps.as_ref(),
            &tournament,
            &RewardDescriptor::EntryFee(EntryFeeReward::AdditionalShare { index: 0 }),
        )
        .unwrap();
        assert_eq!(treasury.recipient, Addr::unchecked("treasury"));
        assert_eq!(treasury.asset, native(50));
    }

    #[test]
    fn empty_pool_pays_nothing() {
        let mut deps = mock_dependencies();
        save_entry_fee(&mut deps.storage, &[]);

        let payout = resolve(
            deps.as_ref(),
            &tournament(),
            &RewardDescriptor::EntryFee(EntryFeeReward::Position { position: 1 }),
        )
        .unwrap();
        assert_eq!(payout.recipient, Addr::unchecked("creator"));
        assert_eq!(payout.asset, None);
    }

    #[test]
    fn rejects_rewards_outside_the_tournament() {
        let mut deps = mock_dependencies();
        save_entry_fee(&mut deps.storage, &[]);
        let tournament = tournament();

        let err = resolve(
            deps.as_ref(),
            &tournament,
            &RewardDescriptor::EntryFee(EntryFeeReward::Position { position: 4 }),
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::InvalidReward { .. }));

        let err = resolve(
            deps.as_ref(),
            &tournament,
            &RewardDescriptor::EntryFee(EntryFeeReward::AdditionalShare { index: 0 }),
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::InvalidReward { .. }));

        let err = resolve(
            deps.as_ref(),
            &tournament,
            &RewardDescriptor::EntryFee(EntryFeeReward::Refund { token_id: 9 }),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ContractError::NotRegistered {
                tournament_id: 1,
                token_id: 9
            }
        );

        let err = resolve(
            deps.as_ref(),
            &tournament,
            &RewardDescriptor::Prize(PrizeReward::Single { prize_id: 1 }),
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::InvalidReward { .. }));
    }

    #[test]
    fn distributed_prize_follows_its_curve() {
        let mut deps = mock_dependencies();
        let distribution = DistributionState::store(
            &mut deps.storage,
            &PRIZE_CUSTOM_SHARES,
            5,
            &Distribution::Uniform {},
        )
        .unwrap();
        PRIZES
            .save(
                &mut deps.storage,
                5,
                &Prize {
                    id: 5,
                    tournament_id: 1,
                    token: PrizeToken::Cw20 {
                        address: Addr::unchecked("token"),
                        amount: Uint128::new(1_000),
                    },
                    sponsor: Addr::unchecked("sponsor"),
                    payout_position: 0,
                    distribution: Some(distribution),
                    distribution_count: 3,
                },
            )
            .unwrap();
        let tournament = tournament();

        let payout = resolve(
            deps.as_ref(),
            &tournament,
            &RewardDescriptor::Prize(PrizeReward::Distributed {
                prize_id: 5,
                position: 1,
            }),
        )
        .unwrap();
        assert_eq!(
            payout.asset,
            Some(Asset::Cw20 {
                address: Addr::unchecked("token"),
                amount: Uint128::new(333),
            })
        );

        let err = resolve(
            deps.as_ref(),
            &tournament,
            &RewardDescriptor::Prize(PrizeReward::Single { prize_id: 5 }),
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::InvalidReward { .. }));
    }
}
