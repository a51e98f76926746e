mod gating;

use cosmwasm_std::{coins, to_json_binary, Addr, Coin, Empty, Timestamp, Uint128};
use cw20::{BalanceResponse, Cw20Coin, Cw20ExecuteMsg, Cw20QueryMsg};
use cw_multi_test::{App, AppResponse, Contract, ContractWrapper, Executor};
use tourney_interface::{
    reward::RewardDescriptor,
    schedule::{Period, Phase, Schedule, ScheduleLimits},
};

use crate::{
    msg::{
        EntryFeeMsg, EntryRequirementMsg, ExecuteMsg, GameConfigMsg, InstantiateMsg, QueryMsg,
        ReceiveMsg, RegistrationResponse,
    },
    state::Metadata,
    ContractError,
};

pub const OWNER: &str = "owner";
pub const CREATOR: &str = "creator";
pub const STUDIO: &str = "studio";
pub const SPONSOR: &str = "sponsor";
pub const ALICE: &str = "alice";
pub const BOB: &str = "bob";
pub const CAROL: &str = "carol";
pub const DAVE: &str = "dave";
pub const DENOM: &str = "utourney";
pub const INITIAL_BALANCE: u128 = 10_000;

/// Minimal game contract: scores are set directly and read back through
/// the game query interface.
mod game {
    use cosmwasm_schema::cw_serde;
    use cosmwasm_std::{
        to_json_binary, Binary, Deps, DepsMut, Empty, Env, MessageInfo, Response, StdResult,
    };
    use cw_storage_plus::Map;
    use tourney_interface::game::GameQueryMsg;

    const SCORES: Map<u64, u64> = Map::new("scores");

    #[cw_serde]
    pub enum ExecuteMsg {
        SetScore { token_id: u64, score: u64 },
    }

    pub fn instantiate(
        _deps: DepsMut,
        _env: Env,
        _info: MessageInfo,
        _msg: Empty,
    ) -> StdResult<Response> {
        Ok(Response::new())
    }

    pub fn execute(
        deps: DepsMut,
        _env: Env,
        _info: MessageInfo,
        msg: ExecuteMsg,
    ) -> StdResult<Response> {
        match msg {
            ExecuteMsg::SetScore { token_id, score } => {
                SCORES.save(deps.storage, token_id, &score)?;
                Ok(Response::new())
            }
        }
    }

    pub fn query(deps: Deps, _env: Env, msg: GameQueryMsg) -> StdResult<Binary> {
        match msg {
            GameQueryMsg::Score { token_id } => to_json_binary(
                &SCORES
                    .may_load(deps.storage, token_id)?
                    .unwrap_or_default(),
            ),
        }
    }
}

pub fn settlement_contract() -> Box<dyn Contract<Empty>> {
    let contract = ContractWrapper::new(
        crate::contract::execute,
        crate::contract::instantiate,
        crate::contract::query,
    )
    .with_migrate(crate::contract::migrate);
    Box::new(contract)
}

pub fn game_contract() -> Box<dyn Contract<Empty>> {
    Box::new(ContractWrapper::new(
        game::execute,
        game::instantiate,
        game::query,
    ))
}

pub fn cw20_contract() -> Box<dyn Contract<Empty>> {
    Box::new(ContractWrapper::new(
        cw20_base::contract::execute,
        cw20_base::contract::instantiate,
        cw20_base::contract::query,
    ))
}

pub fn extension_contract() -> Box<dyn Contract<Empty>> {
    Box::new(ContractWrapper::new(
        tourney_allowlist_extension::contract::execute,
        tourney_allowlist_extension::contract::instantiate,
        tourney_allowlist_extension::contract::query,
    ))
}

pub fn contract_error(err: anyhow::Error) -> ContractError {
    err.downcast::<ContractError>()
        .expect("expected a settlement contract error")
}

pub fn attribute(response: &AppResponse, key: &str) -> Option<String> {
    response
        .events
        .iter()
        .flat_map(|event| event.attributes.iter())
        .find(|attribute| attribute.key == key)
        .map(|attribute| attribute.value.clone())
}

pub struct Suite {
    pub app: App,
    pub settlement: Addr,
    pub game: Addr,
    /// Block time when the suite was built; schedules are relative to it.
    pub start: u64,
}

impl Suite {
    pub fn new() -> Self {
        let mut app = App::new(|router, _api, storage| {
            for user in [CREATOR, SPONSOR, ALICE, BOB, CAROL, DAVE] {
                router
                    .bank
                    .init_balance(storage, &Addr::unchecked(user), coins(INITIAL_BALANCE, DENOM))
                    .unwrap();
            }
        });

        let settlement_id = app.store_code(settlement_contract());
        let game_id = app.store_code(game_contract());

        let settlement = app
            .instantiate_contract(
                settlement_id,
                Addr::unchecked(OWNER),
                &InstantiateMsg {
                    owner: OWNER.to_string(),
                    schedule_limits: Some(ScheduleLimits {
                        min_registration_period: 60,
                        min_game_duration: 60,
                        max_game_duration: 86_400,
                        min_submission_duration: 60,
                        max_submission_duration: 86_400,
                    }),
                    max_leaderboard_size: Some(10),
                    max_additional_shares: None,
                },
                &[],
                "tourney-settlement",
                Some(OWNER.to_string()),
            )
            .unwrap();
        let game = app
            .instantiate_contract(
                game_id,
                Addr::unchecked(OWNER),
                &Empty {},
                &[],
                "game",
                None,
            )
            .unwrap();
        let start = app.block_info().time.seconds();

        Suite {
            app,
            settlement,
            game,
            start,
        }
    }

    /// Registration `[+100, +200)`, staging `[+200, +300)`, live
    /// `[+300, +400)`, submission `[+400, +500)`.
    pub fn schedule(&self) -> Schedule {
        Schedule {
            registration: Some(Period::new(self.start + 100, self.start + 200)),
            game: Period::new(self.start + 300, self.start + 400),
            submission_duration: 100,
        }
    }

    pub fn advance_to(&mut self, phase: Phase) {
        let offset = match phase {
            Phase::Scheduled => 0,
            Phase::Registration => 150,
            Phase::Staging => 250,
            Phase::Live => 350,
            Phase::Submission => 450,
            Phase::Finalized => 600,
        };
        let time = Timestamp::from_seconds(self.start + offset);
        self.app.update_block(|block| {
            if block.time < time {
                block.time = time;
                block.height += 1;
            }
        });
    }

    pub fn create_tournament_with(
        &mut self,
        schedule: Schedule,
        leaderboard_size: u32,
        entry_fee: Option<EntryFeeMsg>,
        entry_requirement: Option<EntryRequirementMsg>,
    ) -> anyhow::Result<u64> {
        self.app.execute_contract(
            Addr::unchecked(CREATOR),
            self.settlement.clone(),
            &ExecuteMsg::CreateTournament {
                metadata: Metadata {
                    name: "Weekly cup".to_string(),
                    description: "Top scores win".to_string(),
                },
                schedule,
                game_config: GameConfigMsg {
                    game_address: self.game.to_string(),
                    game_creator: Some(STUDIO.to_string()),
                    leaderboard_size,
                },
                entry_fee,
                entry_requirement,
            },
            &[],
        )?;

        Ok(self
            .app
            .wrap()
            .query_wasm_smart(&self.settlement, &QueryMsg::TournamentCount {})?)
    }

    pub fn create_tournament(
        &mut self,
        entry_fee: Option<EntryFeeMsg>,
        entry_requirement: Option<EntryRequirementMsg>,
    ) -> u64 {
        let schedule = self.schedule();
        self.create_tournament_with(schedule, 3, entry_fee, entry_requirement)
            .unwrap()
    }

    pub fn register(
        &mut self,
        player: &str,
        tournament_id: u64,
        funds: &[Coin],
    ) -> anyhow::Result<u64> {
        let response = self.app.execute_contract(
            Addr::unchecked(player),
            self.settlement.clone(),
            &ExecuteMsg::Register {
                tournament_id,
                player: None,
                proof: None,
            },
            funds,
        )?;

        Ok(attribute(&response, "token_id")
            .expect("registration emits the token id")
            .parse()?)
    }

    pub fn set_score(&mut self, token_id: u64, score: u64) {
        self.app
            .execute_contract(
                Addr::unchecked(OWNER),
                self.game.clone(),
                &game::ExecuteMsg::SetScore { token_id, score },
                &[],
            )
            .unwrap();
    }

    pub fn submit_score(
        &mut self,
        player: &str,
        tournament_id: u64,
        token_id: u64,
        position: u32,
    ) -> anyhow::Result<AppResponse> {
        self.app.execute_contract(
            Addr::unchecked(player),
            self.settlement.clone(),
            &ExecuteMsg::SubmitScore {
                tournament_id,
                token_id,
                position,
            },
            &[],
        )
    }

    pub fn claim(
        &mut self,
        tournament_id: u64,
        reward: RewardDescriptor,
    ) -> anyhow::Result<AppResponse> {
        self.app.execute_contract(
            Addr::unchecked("anyone"),
            self.settlement.clone(),
            &ExecuteMsg::ClaimReward {
                tournament_id,
                reward,
            },
            &[],
        )
    }

    pub fn query<T: serde::de::DeserializeOwned>(&self, msg: &QueryMsg) -> T {
        self.app
            .wrap()
            .query_wasm_smart(&self.settlement, msg)
            .unwrap()
    }

    pub fn phase(&self, tournament_id: u64) -> Phase {
        self.query(&QueryMsg::Phase { tournament_id })
    }

    pub fn leaderboard(&self, tournament_id: u64) -> Vec<u64> {
        self.query(&QueryMsg::Leaderboard { tournament_id })
    }

    pub fn registration(&self, token_id: u64) -> RegistrationResponse {
        self.query(&QueryMsg::Registration {
            game_address: self.game.to_string(),
            token_id,
        })
    }

    pub fn instantiate_cw20(&mut self, balances: &[(&str, u128)]) -> Addr {
        let code_id = self.app.store_code(cw20_contract());
        self.app
            .instantiate_contract(
                code_id,
                Addr::unchecked(OWNER),
                &cw20_base::msg::InstantiateMsg {
                    name: "Tourney Token".to_string(),
                    symbol: "TRNY".to_string(),
                    decimals: 6,
                    initial_balances: balances
                        .iter()
                        .map(|(address, amount)| Cw20Coin {
                            address: address.to_string(),
                            amount: Uint128::new(*amount),
                        })
                        .collect(),
                    mint: None,
                    marketing: None,
                },
                &[],
                "tourney-token",
                None,
            )
            .unwrap()
    }

    pub fn cw20_send(
        &mut self,
        sender: &str,
        token: &Addr,
        amount: u128,
        msg: &ReceiveMsg,
    ) -> anyhow::Result<AppResponse> {
        self.app.execute_contract(
            Addr::unchecked(sender),
            token.clone(),
            &Cw20ExecuteMsg::Send {
                contract: self.settlement.to_string(),
                amount: Uint128::new(amount),
                msg: to_json_binary(msg)?,
            },
            &[],
        )
    }

    pub fn cw20_balance(&self, token: &Addr, address: &str) -> u128 {
        let response: BalanceResponse = self
            .app
            .wrap()
            .query_wasm_smart(
                token,
                &Cw20QueryMsg::Balance {
                    address: address.to_string(),
                },
            )
            .unwrap();
        response.balance.u128()
    }

    pub fn balance(&self, address: impl Into<String>) -> u128 {
        self.app
            .wrap()
            .query_balance(address, DENOM)
            .unwrap()
            .amount
            .u128()
    }
}

pub fn native_fee(amount: u128) -> Vec<Coin> {
    coins(amount, DENOM)
}

pub fn uint(amount: u128) -> Uint128 {
    Uint128::new(amount)
}
