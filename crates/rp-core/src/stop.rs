//! Planned itinerary entries (`Stop`) and the per-vehicle plan (`Stoplist`).
//!
//! # Mutation discipline
//!
//! The head element of every stoplist is the **CPE** (current position
//! estimator): a synthetic internal stop whose location and arrival time
//! encode where the vehicle is and when it finishes its in-progress edge.
//! The CPE is updated in place, never removed, and never emitted as a
//! service event.
//!
//! Non-CPE stops enter the list only through the dispatcher's insertion
//! routine and leave it only through a vehicle fast-forward.  No other code
//! may change ordering, occupancy or arrival times; [`Stoplist::assert_valid`]
//! backs `debug_assert!`s at those two mutation sites.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use crate::{InternalRequest, Location, RequestId, Time, TimeWindow, TransportationRequest};

// ── StopAction ────────────────────────────────────────────────────────────────

/// What the vehicle does upon servicing a stop.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopAction {
    Pickup,
    Dropoff,
    Internal,
}

impl fmt::Display for StopAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopAction::Pickup => write!(f, "pickup"),
            StopAction::Dropoff => write!(f, "dropoff"),
            StopAction::Internal => write!(f, "internal"),
        }
    }
}

// ── StopRequest ───────────────────────────────────────────────────────────────

/// Shared handle to the request a stop belongs to.
///
/// A transportation request is referenced by two stops (its pickup and its
/// dropoff); both hold the same `Arc`, so the request value is dropped
/// exactly when neither stop survives.
#[derive(Clone, Debug, PartialEq)]
pub enum StopRequest<L: Location> {
    Transportation(Arc<TransportationRequest<L>>),
    Internal(Arc<InternalRequest<L>>),
}

impl<L: Location> StopRequest<L> {
    #[inline]
    pub fn request_id(&self) -> RequestId {
        match self {
            StopRequest::Transportation(r) => r.request_id,
            StopRequest::Internal(r) => r.request_id,
        }
    }
}

// ── Stop ──────────────────────────────────────────────────────────────────────

/// A single planned itinerary entry.
#[derive(Clone, Debug, PartialEq)]
pub struct Stop<L: Location> {
    /// Where the stop is serviced.
    pub location: L,

    /// The owning request (shared between the pickup/dropoff pair).
    pub request: StopRequest<L>,

    pub action: StopAction,

    /// CPAT — the currently projected arrival time under drive-first.
    pub estimated_arrival_time: Time,

    /// Number of passengers on board after this stop has been serviced.
    pub occupancy_after_servicing: u32,

    /// Copied from the owning request's pickup or delivery window
    /// (`[0, inf)` for internal stops, including the CPE).
    pub time_window: TimeWindow,
}

impl<L: Location> Stop<L> {
    /// Drive-first departure: leave as soon as both the arrival and the
    /// earliest admissible service time allow.
    ///
    /// This doubles as the *service time* — the timestamp a stop event
    /// carries when the stop is serviced.
    #[inline]
    pub fn estimated_departure_time(&self) -> Time {
        self.estimated_arrival_time.max(self.time_window.min)
    }

    #[inline]
    pub fn request_id(&self) -> RequestId {
        self.request.request_id()
    }
}

// ── Stoplist ──────────────────────────────────────────────────────────────────

/// The ordered plan of future stops for a single vehicle, head = CPE.
///
/// Dereferences to `[Stop<L>]` for read access; mutation goes through the
/// narrow API documented at module level.
#[derive(Clone, Debug, PartialEq)]
pub struct Stoplist<L: Location> {
    stops: Vec<Stop<L>>,
}

impl<L: Location> Stoplist<L> {
    /// A fresh stoplist containing only a CPE parked at `location` at time
    /// `t`, backed by an internal request with the `INVALID` sentinel id.
    pub fn with_cpe_at(location: L, t: Time) -> Self {
        let request = InternalRequest::new(RequestId::INVALID, t, location.clone());
        Self {
            stops: vec![Stop {
                location,
                request: StopRequest::Internal(Arc::new(request)),
                action: StopAction::Internal,
                estimated_arrival_time: t,
                occupancy_after_servicing: 0,
                time_window: TimeWindow::UNBOUNDED,
            }],
        }
    }

    /// Adopt an existing stop sequence.
    ///
    /// # Panics
    /// Panics in debug mode if the sequence is empty or its head is not an
    /// internal stop (a malformed CPE).
    pub fn from_stops(stops: Vec<Stop<L>>) -> Self {
        debug_assert!(!stops.is_empty(), "stoplist must contain a CPE");
        debug_assert_eq!(
            stops[0].action,
            StopAction::Internal,
            "stoplist head must be the CPE"
        );
        Self { stops }
    }

    // ── Read access ───────────────────────────────────────────────────────

    #[inline]
    pub fn cpe(&self) -> &Stop<L> {
        &self.stops[0]
    }

    /// `true` if only the CPE remains — nothing left to service.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.stops.len() == 1
    }

    // ── Mutation (dispatcher insertion + vehicle fast-forward only) ───────

    #[inline]
    pub fn cpe_mut(&mut self) -> &mut Stop<L> {
        &mut self.stops[0]
    }

    /// Mutable view of all stops, used by the insertion routine to propagate
    /// arrival-time deltas along the tail.
    #[inline]
    pub fn stops_mut(&mut self) -> &mut [Stop<L>] {
        &mut self.stops
    }

    /// Insert `stop` at position `idx` (shifting later stops back).
    ///
    /// # Panics
    /// Panics in debug mode when `idx == 0` — nothing may displace the CPE.
    pub fn insert(&mut self, idx: usize, stop: Stop<L>) {
        debug_assert!(idx >= 1, "cannot insert before the CPE");
        self.stops.insert(idx, stop);
    }

    /// Remove the `count` stops directly after the CPE (the serviced prefix
    /// identified by a fast-forward).
    pub fn remove_serviced(&mut self, count: usize) {
        debug_assert!(count < self.stops.len());
        self.stops.drain(1..=count);
    }

    // ── Invariants ────────────────────────────────────────────────────────

    /// Panic with a descriptive message if any structural invariant is
    /// violated.  Called through `debug_assert!` after every mutation and
    /// directly by tests.
    ///
    /// Checks: CPE presence, arrival-time monotonicity, occupancy stepping
    /// (+1 pickup / -1 dropoff / 0 internal) within `0..=seat_capacity`,
    /// pickup-before-dropoff pairing, and `EAT <= time_window.max` for every
    /// non-CPE stop.
    ///
    /// Monotonicity at the head is stated against the first stop's
    /// *departure*: a relocated CPE may carry an arrival time past the
    /// frozen arrival of a stop that is waiting for its window to open.
    pub fn assert_valid(&self, seat_capacity: u32) {
        assert!(!self.stops.is_empty(), "stoplist lost its CPE");
        assert_eq!(
            self.stops[0].action,
            StopAction::Internal,
            "stoplist head is not an internal stop"
        );

        if let Some(first) = self.stops.get(1) {
            assert!(
                self.stops[0].estimated_arrival_time <= first.estimated_departure_time(),
                "CPE arrival {} is past the first stop's departure {}",
                self.stops[0].estimated_arrival_time,
                first.estimated_departure_time(),
            );
        }

        for (k, pair) in self.stops.windows(2).enumerate() {
            let (prev, stop) = (&pair[0], &pair[1]);

            if k >= 1 {
                assert!(
                    prev.estimated_arrival_time <= stop.estimated_arrival_time,
                    "arrival times not monotone at index {}: {} > {}",
                    k + 1,
                    prev.estimated_arrival_time,
                    stop.estimated_arrival_time,
                );
            }

            let expected = match stop.action {
                StopAction::Pickup => prev.occupancy_after_servicing + 1,
                StopAction::Dropoff => prev
                    .occupancy_after_servicing
                    .checked_sub(1)
                    .expect("dropoff would make occupancy negative"),
                StopAction::Internal => prev.occupancy_after_servicing,
            };
            assert_eq!(
                stop.occupancy_after_servicing,
                expected,
                "occupancy does not step by the stop action at index {}",
                k + 1,
            );
            assert!(
                stop.occupancy_after_servicing <= seat_capacity,
                "occupancy {} exceeds seat capacity {}",
                stop.occupancy_after_servicing,
                seat_capacity,
            );

            assert!(
                stop.estimated_arrival_time <= stop.time_window.max,
                "stop at index {} misses its time window: arrival {} > max {}",
                k + 1,
                stop.estimated_arrival_time,
                stop.time_window.max,
            );
        }

        // Every pickup must be followed (strictly later) by its dropoff.
        for (k, stop) in self.stops.iter().enumerate() {
            if stop.action == StopAction::Pickup {
                let id = stop.request_id();
                let has_dropoff = self.stops[k + 1..]
                    .iter()
                    .any(|s| s.action == StopAction::Dropoff && s.request_id() == id);
                assert!(has_dropoff, "pickup of {id} has no later dropoff");
            }
        }
    }
}

impl<L: Location> Deref for Stoplist<L> {
    type Target = [Stop<L>];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.stops
    }
}
