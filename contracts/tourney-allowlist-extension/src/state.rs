use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, StdResult, Storage};
use cw_storage_plus::{Item, Map};

#[cw_serde]
pub struct Config {
    /// The only contract allowed to configure tournaments and record entries
    pub tournament_contract: Addr,
    pub registration_only: bool,
}

#[cw_serde]
pub struct Allowlist {
    /// 0 for unlimited
    pub entry_limit: u32,
    pub addresses: Vec<Addr>,
}

pub const CONFIG: Item<Config> = Item::new("config");
pub const ALLOWLISTS: Map<u64, Allowlist> = Map::new("allowlists");
pub const ENTRIES: Map<(u64, &Addr), u32> = Map::new("entries");
pub const REVOKED: Map<(u64, &Addr), ()> = Map::new("revoked");

pub fn is_allowed(storage: &dyn Storage, tournament_id: u64, player: &Addr) -> StdResult<bool> {
    let Some(allowlist) = ALLOWLISTS.may_load(storage, tournament_id)? else {
        return Ok(false);
    };
    Ok(allowlist.addresses.contains(player) && !REVOKED.has(storage, (tournament_id, player)))
}

pub fn entries_left(
    storage: &dyn Storage,
    tournament_id: u64,
    player: &Addr,
) -> StdResult<Option<u32>> {
    let Some(allowlist) = ALLOWLISTS.may_load(storage, tournament_id)? else {
        return Ok(Some(0));
    };
    if allowlist.entry_limit == 0 {
        return Ok(None);
    }
    let used = ENTRIES
        .may_load(storage, (tournament_id, player))?
        .unwrap_or_default();
    Ok(Some(allowlist.entry_limit.saturating_sub(used)))
}
