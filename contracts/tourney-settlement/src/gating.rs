//! Entry requirements.
//!
//! Built-in requirements are answered from this contract's own state. An
//! extension requirement forwards every decision to an external validator
//! speaking [`ValidatorQueryMsg`] / [`ValidatorExecuteMsg`].

use cosmwasm_std::{
    to_json_binary, Addr, Binary, CosmosMsg, Deps, StdResult, Storage, Uint128, WasmMsg,
};
use cw20::{BalanceResponse, Cw20QueryMsg};
use tourney_interface::validator::{ValidatorExecuteMsg, ValidatorQueryMsg};

use crate::state::{EntryRequirement, EntryRequirementType, QUALIFICATION_ENTRIES};

pub trait EntryValidator {
    /// Whether entries are only accepted inside the registration window.
    fn registration_only(&self, deps: Deps) -> StdResult<bool>;

    fn valid_entry(
        &self,
        deps: Deps,
        tournament_id: u64,
        player: &Addr,
        proof: Option<&Binary>,
    ) -> StdResult<bool>;

    fn should_ban(
        &self,
        deps: Deps,
        tournament_id: u64,
        token_id: u64,
        owner: &Addr,
        proof: Option<&Binary>,
    ) -> StdResult<bool>;

    /// `None` when the player may enter any number of times.
    fn entries_left(
        &self,
        deps: Deps,
        tournament_id: u64,
        player: &Addr,
        proof: Option<&Binary>,
    ) -> StdResult<Option<u32>>;

    fn add_config(&self, tournament_id: u64) -> StdResult<Vec<CosmosMsg>>;

    fn add_entry(
        &self,
        storage: &mut dyn Storage,
        tournament_id: u64,
        token_id: u64,
        player: &Addr,
        proof: Option<&Binary>,
    ) -> StdResult<Vec<CosmosMsg>>;

    fn remove_entry(
        &self,
        storage: &mut dyn Storage,
        tournament_id: u64,
        token_id: u64,
        player: &Addr,
        proof: Option<&Binary>,
    ) -> StdResult<Vec<CosmosMsg>>;
}

impl EntryRequirement {
    pub fn validator(&self) -> Box<dyn EntryValidator + '_> {
        let entry_limit = self.entry_limit;
        match &self.requirement_type {
            EntryRequirementType::Token {
                address,
                min_balance,
            } => Box::new(TokenGate {
                address,
                min_balance: *min_balance,
                entry_limit,
            }),
            EntryRequirementType::Allowlist { addresses } => Box::new(AllowlistGate {
                addresses,
                entry_limit,
            }),
            EntryRequirementType::Extension { address, config } => Box::new(ExtensionGate {
                address,
                config,
                entry_limit,
            }),
        }
    }
}

fn builtin_entries_left(
    storage: &dyn Storage,
    tournament_id: u64,
    player: &Addr,
    entry_limit: u32,
) -> StdResult<Option<u32>> {
    if entry_limit == 0 {
        return Ok(None);
    }
    let used = QUALIFICATION_ENTRIES
        .may_load(storage, (tournament_id, player))?
        .unwrap_or_default();
    Ok(Some(entry_limit.saturating_sub(used)))
}

fn builtin_add_entry(
    storage: &mut dyn Storage,
    tournament_id: u64,
    player: &Addr,
) -> StdResult<()> {
    QUALIFICATION_ENTRIES.update(storage, (tournament_id, player), |used| -> StdResult<_> {
        Ok(used.unwrap_or_default().saturating_add(1))
    })?;
    Ok(())
}

fn builtin_remove_entry(
    storage: &mut dyn Storage,
    tournament_id: u64,
    player: &Addr,
) -> StdResult<()> {
    QUALIFICATION_ENTRIES.update(storage, (tournament_id, player), |used| -> StdResult<_> {
        Ok(used.unwrap_or_default().saturating_sub(1))
    })?;
    Ok(())
}

/// Holders of a minimum cw20 balance.
pub struct TokenGate<'a> {
    pub address: &'a Addr,
    pub min_balance: Uint128,
    pub entry_limit: u32,
}

impl TokenGate<'_> {
    fn balance_of(&self, deps: Deps, holder: &Addr) -> StdResult<Uint128> {
        let response: BalanceResponse = deps.querier.query_wasm_smart(
            self.address,
            &Cw20QueryMsg::Balance {
                address: holder.to_string(),
            },
        )?;
        Ok(response.balance)
    }
}

impl EntryValidator for TokenGate<'_> {
    fn registration_only(&self, _deps: Deps) -> StdResult<bool> {
        Ok(true)
    }

    fn valid_entry(
        &self,
        deps: Deps,
        _tournament_id: u64,
        player: &Addr,
        _proof: Option<&Binary>,
    ) -> StdResult<bool> {
        Ok(self.balance_of(deps, player)? >= self.min_balance)
    }

    fn should_ban(
        &self,
        deps: Deps,
        _tournament_id: u64,
        _token_id: u64,
        owner: &Addr,
        _proof: Option<&Binary>,
    ) -> StdResult<bool> {
        Ok(self.balance_of(deps, owner)? < self.min_balance)
    }

    fn entries_left(
        &self,
        deps: Deps,
        tournament_id: u64,
        player: &Addr,
        _proof: Option<&Binary>,
    ) -> StdResult<Option<u32>> {
        builtin_entries_left(deps.storage, tournament_id, player, self.entry_limit)
    }

    fn add_config(&self, _tournament_id: u64) -> StdResult<Vec<CosmosMsg>> {
        Ok(vec![])
    }

    fn add_entry(
        &self,
        storage: &mut dyn Storage,
        tournament_id: u64,
        _token_id: u64,
        player: &Addr,
        _proof: Option<&Binary>,
    ) -> StdResult<Vec<CosmosMsg>> {
        builtin_add_entry(storage, tournament_id, player)?;
        Ok(vec![])
    }

    fn remove_entry(
        &self,
        storage: &mut dyn Storage,
        tournament_id: u64,
        _token_id: u64,
        player: &Addr,
        _proof: Option<&Binary>,
    ) -> StdResult<Vec<CosmosMsg>> {
        builtin_remove_entry(storage, tournament_id, player)?;
        Ok(vec![])
    }
}

pub struct AllowlistGate<'a> {
    pub addresses: &'a [Addr],
    pub entry_limit: u32,
}

impl EntryValidator for AllowlistGate<'_> {
    fn registration_only(&self, _deps: Deps) -> StdResult<bool> {
        Ok(true)
    }

    fn valid_entry(
        &self,
        _deps: Deps,
        _tournament_id: u64,
        player: &Addr,
        _proof: Option<&Binary>,
    ) -> StdResult<bool> {
        Ok(self.addresses.contains(player))
    }

    fn should_ban(
        &self,
        _deps: Deps,
        _tournament_id: u64,
        _token_id: u64,
        owner: &Addr,
        _proof: Option<&Binary>,
    ) -> StdResult<bool> {
        Ok(!self.addresses.contains(owner))
    }

    fn entries_left(
        &self,
        deps: Deps,
        tournament_id: u64,
        player: &Addr,
        _proof: Option<&Binary>,
    ) -> StdResult<Option<u32>> {
        builtin_entries_left(deps.storage, tournament_id, player, self.entry_limit)
    }

    fn add_config(&self, _tournament_id: u64) -> StdResult<Vec<CosmosMsg>> {
        Ok(vec![])
    }

    fn add_entry(
        &self,
        storage: &mut dyn Storage,
        tournament_id: u64,
        _token_id: u64,
        player: &Addr,
        _proof: Option<&Binary>,
    ) -> StdResult<Vec<CosmosMsg>> {
        builtin_add_entry(storage, tournament_id, player)?;
        Ok(vec![])
    }

    fn remove_entry(
        &self,
        storage: &mut dyn Storage,
        tournament_id: u64,
        _token_id: u64,
        player: &Addr,
        _proof: Option<&Binary>,
    ) -> StdResult<Vec<CosmosMsg>> {
        builtin_remove_entry(storage, tournament_id, player)?;
        Ok(vec![])
    }
}

/// Forwards to an external validator contract.
pub struct ExtensionGate<'a> {
    pub address: &'a Addr,
    pub config: &'a Binary,
    pub entry_limit: u32,
}

impl ExtensionGate<'_> {
    fn execute_msg(&self, msg: &ValidatorExecuteMsg) -> StdResult<CosmosMsg> {
        Ok(CosmosMsg::Wasm(WasmMsg::Execute {
            contract_addr: self.address.to_string(),
            msg: to_json_binary(msg)?,
            funds: vec![],
        }))
    }
}

impl EntryValidator for ExtensionGate<'_> {
    fn registration_only(&self, deps: Deps) -> StdResult<bool> {
        deps.querier
            .query_wasm_smart(self.address, &ValidatorQueryMsg::RegistrationOnly {})
    }

    fn valid_entry(
        &self,
        deps: Deps,
        tournament_id: u64,
        player: &Addr,
        proof: Option<&Binary>,
    ) -> StdResult<bool> {
        deps.querier.query_wasm_smart(
            self.address,
            &ValidatorQueryMsg::ValidEntry {
                tournament_id,
                player: player.to_string(),
                proof: proof.cloned(),
            },
        )
    }

    fn should_ban(
        &self,
        deps: Deps,
        tournament_id: u64,
        token_id: u64,
        owner: &Addr,
        proof: Option<&Binary>,
    ) -> StdResult<bool> {
        deps.querier.query_wasm_smart(
            self.address,
            &ValidatorQueryMsg::ShouldBan {
                tournament_id,
                token_id,
                owner: owner.to_string(),
                proof: proof.cloned(),
            },
        )
    }

    fn entries_left(
        &self,
        deps: Deps,
        tournament_id: u64,
        player: &Addr,
        proof: Option<&Binary>,
    ) -> StdResult<Option<u32>> {
        deps.querier.query_wasm_smart(
            self.address,
            &ValidatorQueryMsg::EntriesLeft {
                tournament_id,
                player: player.to_string(),
                proof: proof.cloned(),
            },
        )
    }

    fn add_config(&self, tournament_id: u64) -> StdResult<Vec<CosmosMsg>> {
        Ok(vec![self.execute_msg(&ValidatorExecuteMsg::AddConfig {
            tournament_id,
            entry_limit: self.entry_limit,
            config: self.config.clone(),
        })?])
    }

    fn add_entry(
        &self,
        _storage: &mut dyn Storage,
        tournament_id: u64,
        token_id: u64,
        player: &Addr,
        proof: Option<&Binary>,
    ) -> StdResult<Vec<CosmosMsg>> {
        Ok(vec![self.execute_msg(&ValidatorExecuteMsg::AddEntry {
            tournament_id,
            token_id,
            player: player.to_string(),
            proof: proof.cloned(),
        })?])
    }

    fn remove_entry(
        &self,
        _storage: &mut dyn Storage,
        tournament_id: u64,
        token_id: u64,
        player: &Addr,
        proof: Option<&Binary>,
    ) -> StdResult<Vec<CosmosMsg>> {
        Ok(vec![self.execute_msg(&ValidatorExecuteMsg::RemoveEntry {
            tournament_id,
            token_id,
            player: player.to_string(),
            proof: proof.cloned(),
        })?])
    }
}
