//! Simulation time model.
//!
//! # Design
//!
//! Time is a continuous `f64` in abstract units.  The simulator is
//! event-driven, not tick-driven: the harness advances the fleet to the
//! creation timestamp of each incoming request, so there is no global clock
//! resolution to configure.  `f64::INFINITY` is a first-class value meaning
//! "unbounded" and shows up both in open time windows and in infeasible
//! insertion costs.

use std::fmt;

/// Continuous simulation time.  Distances and times are related through each
/// transport space's velocity: `t(u, v) = d(u, v) / velocity`.
pub type Time = f64;

// ── TimeWindow ────────────────────────────────────────────────────────────────

/// A closed service-time interval `[min, max]` with `min <= max` and `max`
/// possibly unbounded.
///
/// Under the drive-first discipline `min` is the earliest admissible service
/// time (the vehicle waits if it arrives earlier) and `max` the latest
/// admissible arrival.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeWindow {
    pub min: Time,
    pub max: Time,
}

impl TimeWindow {
    /// The unconstrained window `[0, +inf)` — the default for requests that
    /// specify no window and for the CPE.
    pub const UNBOUNDED: TimeWindow = TimeWindow {
        min: 0.0,
        max: f64::INFINITY,
    };

    /// # Panics
    /// Panics in debug mode if `min > max`.
    #[inline]
    pub fn new(min: Time, max: Time) -> Self {
        debug_assert!(min <= max, "time window [{min}, {max}] is inverted");
        Self { min, max }
    }

    /// `[min, +inf)` — only an earliest-service constraint.
    #[inline]
    pub fn after(min: Time) -> Self {
        Self {
            min,
            max: f64::INFINITY,
        }
    }

    /// `true` if `t` lies within `[min, max]`.
    #[inline]
    pub fn contains(&self, t: Time) -> bool {
        self.min <= t && t <= self.max
    }

    /// `true` if the window imposes no upper bound.
    #[inline]
    pub fn is_open_ended(&self) -> bool {
        self.max == f64::INFINITY
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_open_ended() {
            write!(f, "[{}, inf)", self.min)
        } else {
            write!(f, "[{}, {}]", self.min, self.max)
        }
    }
}
