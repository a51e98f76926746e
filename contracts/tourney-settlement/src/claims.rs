//! Exactly-once ledger of paid rewards.
//!
//! Every [`RewardDescriptor`] maps to a sha256 key scoped by tournament, so
//! structurally different rewards can never share a slot.

use cosmwasm_std::{StdResult, Storage};
use sha2::{Digest, Sha256};
use tourney_interface::reward::RewardDescriptor;

use crate::state::CLAIMS;

pub type ClaimHash = [u8; 32];

pub fn hash_of(reward: &RewardDescriptor) -> ClaimHash {
    Sha256::digest(reward.key_bytes()).into()
}

pub fn is_claimed_by_hash(storage: &dyn Storage, tournament_id: u64, hash: &ClaimHash) -> bool {
    CLAIMS.has(storage, (tournament_id, hash.as_slice()))
}

pub fn set_claimed_by_hash(
    storage: &mut dyn Storage,
    tournament_id: u64,
    hash: &ClaimHash,
) -> StdResult<()> {
    CLAIMS.save(storage, (tournament_id, hash.as_slice()), &())
}

pub fn is_claimed(storage: &dyn Storage, tournament_id: u64, reward: &RewardDescriptor) -> bool {
    is_claimed_by_hash(storage, tournament_id, &hash_of(reward))
}

/// Marks `reward` as paid. Returns `true` if it already was, in which case
/// nothing is written.
pub fn try_claim(
    storage: &mut dyn Storage,
    tournament_id: u64,
    reward: &RewardDescriptor,
) -> StdResult<bool> {
    let hash = hash_of(reward);
    if is_claimed_by_hash(storage, tournament_id, &hash) {
        return Ok(true);
    }
    set_claimed_by_hash(storage, tournament_id, &hash)?;
    Ok(false)
}
