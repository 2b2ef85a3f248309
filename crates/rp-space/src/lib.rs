//! `rp-space` — transport spaces for the `rust_rp` ride-pooling simulator.
//!
//! A transport space answers three questions about an abstract set of
//! locations: how far apart are two of them (`d`), how long does driving
//! between them take (`t`), and where is a vehicle that is part-way through
//! that drive (`interp_dist` / `interp_time`).
//!
//! # Provided spaces
//!
//! | Space          | Locations | Metric            | Interpolation          |
//! |----------------|-----------|-------------------|------------------------|
//! | [`Euclidean2D`] | [`R2Loc`] | straight line     | exact point, zero jump |
//! | [`Manhattan2D`] | [`R2Loc`] | ℓ₁                | axis-ordered, exact    |
//! | [`SquareGrid`]  | [`GridLoc`] | `g · ℓ₁`        | next lattice node      |
//! | [`GraphSpace`]  | [`NodeId`] | shortest path    | next path node         |
//!
//! All spaces are pure and shareable (`Send + Sync`); the graph space
//! memoises shortest-path queries behind an internal mutex.

pub mod error;
pub mod euclidean;
pub mod graph;
pub mod grid;
pub mod loc;
pub mod manhattan;
pub mod space;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::SpaceError;
pub use euclidean::Euclidean2D;
pub use graph::{GraphSpace, GraphSpaceBuilder};
pub use grid::SquareGrid;
pub use loc::{GridLoc, NodeId, R2Loc};
pub use manhattan::Manhattan2D;
pub use space::TransportSpace;
