//! The `TransportSpace` trait.

use rp_core::Location;

/// Metric and interpolation capabilities of an abstract transport space.
///
/// # Contract
///
/// All operations are pure, deterministic and referentially transparent for
/// fixed arguments.  Implementations may memoise internally as long as the
/// memoisation is synchronised — the space is shared read-only across all
/// vehicles, possibly from a worker pool.
///
/// Laws every implementation upholds (checked by the shared law tests):
///
/// - `d(u, u) == 0`
/// - `t(u, v) == d(u, v) / velocity`
/// - `interp_*(u, u, r) == (u, 0)`
/// - `interp_*(u, v, 0) == (v, 0)`
/// - `dist_to_dest >= d(u, v)` ⇒ `(u, 0)` — the vehicle has not yet left `u`
///
/// `d` is *not* required to be symmetric: a directed graph space may give
/// `d(u, v) != d(v, u)`.  The plane and grid reference spaces are symmetric.
pub trait TransportSpace: Send + Sync {
    type Loc: Location;

    /// Spatial distance from `u` to `v`.
    ///
    /// May be `f64::INFINITY` when `v` is unreachable (disconnected graph);
    /// an infinite distance propagates into an infinite insertion cost and
    /// thus into request rejection, never into an error.
    fn d(&self, u: &Self::Loc, v: &Self::Loc) -> f64;

    /// Travel time from `u` to `v`.  Conventionally `d(u, v) / velocity`.
    fn t(&self, u: &Self::Loc, v: &Self::Loc) -> f64;

    /// Locate a vehicle travelling from `u` toward `v` that still has
    /// `dist_to_dest` distance to go.
    ///
    /// Returns `(next_location, jump_dist)`:
    ///
    /// - **continuous spaces**: the exact interpolated point, `jump_dist = 0`;
    /// - **discrete spaces**: the next node that will be reached along a
    ///   shortest path, and the distance still to cover on the current edge
    ///   before arriving there.
    fn interp_dist(&self, u: &Self::Loc, v: &Self::Loc, dist_to_dest: f64) -> (Self::Loc, f64);

    /// Same as [`interp_dist`](Self::interp_dist) in the time domain:
    /// `time_to_dest` is the remaining travel time, the second component the
    /// remaining travel time to the returned location.
    fn interp_time(&self, u: &Self::Loc, v: &Self::Loc, time_to_dest: f64) -> (Self::Loc, f64);
}
