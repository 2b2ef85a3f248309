//! Fleet construction errors.
//!
//! Runtime outcomes (infeasibility, stale offers) are events, not errors —
//! see `rp_core::events`.  Only malformed construction input is fallible.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FleetError {
    #[error("fleet has no vehicles")]
    NoVehicles,

    #[error("vehicle {index} has zero seat capacity")]
    ZeroSeatCapacity { index: usize },
}

pub type FleetResult<T> = Result<T, FleetError>;
