mod distribution;
mod error;

pub use crate::distribution::{
    amount_for_share, share_at, shares, validate, Distribution, EXPONENTIAL_WEIGHT_RANGE,
    LINEAR_WEIGHT_RANGE, TOTAL_BPS,
};
pub use crate::error::DistributionError;
