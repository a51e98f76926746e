pub mod claims;
pub mod contract;
mod error;
pub mod execute;
pub mod gating;
pub mod msg;
pub mod payout;
pub mod query;
pub mod registration;
pub mod state;

#[cfg(test)]
mod tests;

pub use crate::error::ContractError;
