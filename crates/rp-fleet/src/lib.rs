//! `rp-fleet` — vehicle and fleet state machines for the `rust_rp`
//! ride-pooling simulator.
//!
//! # Offer / commit protocol
//!
//! ```text
//! submit_transportation_request(r)
//!   ├─ r trivial?                → Rejection
//!   ├─ quote every vehicle      (parallel with the `parallel` feature)
//!   ├─ all quotes infinite?      → Rejection
//!   └─ record pending offer      → Offer (estimated in-vehicle window)
//!
//! execute_transportation_request(id)
//!   ├─ no / mismatched pending   → Rejection ("stale offer")
//!   └─ commit proposed stoplist  → Acceptance
//!
//! fast_forward(t)
//!   ├─ per-vehicle fast_forward_time(t), merged by (timestamp, vehicle)
//!   └─ invalidates any pending offer
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                   |
//! |------------|----------------------------------------------------------|
//! | `parallel` | Runs per-vehicle quoting and fast-forwarding on Rayon.   |

pub mod builder;
pub mod error;
pub mod fleet;
pub mod vehicle;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use builder::FleetBuilder;
pub use error::{FleetError, FleetResult};
pub use fleet::FleetState;
pub use vehicle::{SingleVehicleSolution, VehicleState};
