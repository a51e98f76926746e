use thiserror::Error;
use tourney_fixed::MathError;

#[derive(Error, Debug, PartialEq)]
pub enum DistributionError {
    #[error("{0}")]
    MathError(#[from] MathError),

    #[error("Invalid {curve} weight {weight}, expected {min}..={max}")]
    InvalidWeight {
        curve: &'static str,
        weight: u16,
        min: u16,
        max: u16,
    },

    #[error("Custom distribution has {actual} shares for {expected} positions")]
    LengthMismatch { expected: u32, actual: usize },

    #[error("Custom distribution shares sum to {total} instead of 10000")]
    InvalidTotal { total: u64 },
}
