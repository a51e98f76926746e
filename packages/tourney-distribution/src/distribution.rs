use std::ops::RangeInclusive;

use cosmwasm_schema::cw_serde;
use cosmwasm_std::Uint128;
use tourney_fixed::Fixed;

use crate::DistributionError;

/// 100% in basis points.
pub const TOTAL_BPS: u16 = 10_000;

/// Linear weights are scaled by 10, so this is 0.1..=10.0.
pub const LINEAR_WEIGHT_RANGE: RangeInclusive<u16> = 1..=100;
/// Exponential weights must stay above 1.0 for the curve to decrease.
pub const EXPONENTIAL_WEIGHT_RANGE: RangeInclusive<u16> = 11..=100;

/// How a pool is split across ranked positions.
///
/// `weight` is a decimal scaled by 10, e.g. `20` means `2.0`.
#[cw_serde]
pub enum Distribution {
    /// Position `i` of `n` weighs `(n - i + 1)^weight`.
    Linear { weight: u16 },
    /// Position `i` of `n` weighs `weight^(n - i)`.
    Exponential { weight: u16 },
    Uniform {},
    /// Explicit basis points per position, best first.
    Custom { shares: Vec<u16> },
}

/// Write-time checks for a distribution paying `positions` places.
pub fn validate(distribution: &Distribution, positions: u32) -> Result<(), DistributionError> {
    match distribution {
        Distribution::Linear { weight } => check_weight("linear", *weight, LINEAR_WEIGHT_RANGE),
        Distribution::Exponential { weight } => {
            check_weight("exponential", *weight, EXPONENTIAL_WEIGHT_RANGE)
        }
        Distribution::Uniform {} => Ok(()),
        Distribution::Custom { shares } => {
            if shares.len() != positions as usize {
                return Err(DistributionError::LengthMismatch {
                    expected: positions,
                    actual: shares.len(),
                });
            }
            let total: u64 = shares.iter().map(|share| *share as u64).sum();
            if positions > 0 && total != TOTAL_BPS as u64 {
                return Err(DistributionError::InvalidTotal { total });
            }
            Ok(())
        }
    }
}

fn check_weight(
    curve: &'static str,
    weight: u16,
    range: RangeInclusive<u16>,
) -> Result<(), DistributionError> {
    if range.contains(&weight) {
        Ok(())
    } else {
        Err(DistributionError::InvalidWeight {
            curve,
            weight,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

/// Basis-point shares for `positions` places, best first. The result always
/// sums to exactly 10000 unless `positions` is zero.
pub fn shares(distribution: &Distribution, positions: u32) -> Result<Vec<u16>, DistributionError> {
    validate(distribution, positions)?;
    if positions == 0 {
        return Ok(vec![]);
    }

    match distribution {
        Distribution::Uniform {} => Ok(uniform(positions)),
        Distribution::Custom { shares } => Ok(shares.clone()),
        Distribution::Linear { weight } => {
            let exponent = Fixed::from_ratio(*weight as u64, 10)?;
            let raw = (1..=positions)
                .map(|position| {
                    Fixed::from_ratio((positions - position + 1) as u64, positions as u64)?
                        .pow(exponent)
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(normalize(&raw))
        }
        Distribution::Exponential { weight } => {
            // w^(n - i) scaled down by w^(n - 1) so the best place weighs 1.0
            let ratio = Fixed::from_ratio(10, *weight as u64)?;
            let raw = (1..=positions)
                .map(|position| ratio.pow(Fixed::from_int(position - 1)))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(normalize(&raw))
        }
    }
}

/// Share of a single 1-based `position`; places past the paid range get 0.
pub fn share_at(
    distribution: &Distribution,
    positions: u32,
    position: u32,
) -> Result<u16, DistributionError> {
    if position == 0 || position > positions {
        return Ok(0);
    }
    Ok(shares(distribution, positions)?[(position - 1) as usize])
}

/// `amount * share_bps / 10000`, rounded down.
pub fn amount_for_share(amount: Uint128, share_bps: u16) -> Uint128 {
    amount.multiply_ratio(share_bps, TOTAL_BPS)
}

fn uniform(positions: u32) -> Vec<u16> {
    let base = TOTAL_BPS as u32 / positions;
    let remainder = TOTAL_BPS as u32 % positions;

    // remainder goes to the best places first
    (0..positions)
        .map(|index| (base + u32::from(index < remainder)) as u16)
        .collect()
}

fn normalize(raw: &[Fixed]) -> Vec<u16> {
    let total: u128 = raw.iter().map(|weight| weight.mag() as u128).sum();
    if total == 0 {
        return uniform(raw.len() as u32);
    }

    let mut shares: Vec<u16> = raw
        .iter()
        .map(|weight| (weight.mag() as u128 * TOTAL_BPS as u128 / total) as u16)
        .collect();
    let assigned: u32 = shares.iter().map(|share| *share as u32).sum();
    distribute_dust(&mut shares, (TOTAL_BPS as u32 - assigned) as u16);
    shares
}

/// Hands out leftover basis points one at a time, starting from the worst
/// place that already earns something and moving up. A place that already
/// matches the one above it is skipped so the ranking never inverts.
fn distribute_dust(shares: &mut [u16], mut dust: u16) {
    if dust == 0 {
        return;
    }
    if shares.iter().all(|share| *share == 0) {
        shares[0] += dust;
        return;
    }
    // the top place is never skipped, so every pass makes progress
    while dust > 0 {
        for index in (0..shares.len()).rev() {
            if dust == 0 {
                break;
            }
            if shares[index] == 0 || (index > 0 && shares[index] >= shares[index - 1]) {
                continue;
            }
            shares[index] += 1;
            dust -= 1;
        }
    }
}
