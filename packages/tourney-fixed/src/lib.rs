//! Signed 32.32 fixed-point numbers.
//!
//! A [`Fixed`] stores a 64-bit magnitude and a sign bit; the represented value
//! is `±mag / 2^32`. Checked operations return [`MathError`], while the
//! operator impls panic on overflow the same way `cosmwasm_std::Uint128` does.

mod error;
mod fixed;
mod transcendental;

pub use crate::error::MathError;
pub use crate::fixed::{Fixed, HALF, ONE};
pub use crate::transcendental::{LN_2, LOG2_E};
