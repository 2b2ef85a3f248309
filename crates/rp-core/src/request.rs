//! Request types — the exogenous inputs of the simulation.

use crate::{Location, RequestId, Time, TimeWindow};

// ── TransportationRequest ─────────────────────────────────────────────────────

/// A customer's wish to be transported from `origin` to `destination` within
/// the given service windows.
///
/// Requests are immutable once created.  Both stops of a served request hold
/// a shared handle (`Arc`) to the same request value, so the request lives
/// exactly as long as some stop still references it.
///
/// Invariant: `origin != destination`.  Trivial requests are rejected by the
/// fleet before any dispatcher sees them.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransportationRequest<L: Location> {
    pub request_id: RequestId,
    pub creation_timestamp: Time,
    pub origin: L,
    pub destination: L,
    pub pickup_timewindow: TimeWindow,
    pub delivery_timewindow: TimeWindow,
}

impl<L: Location> TransportationRequest<L> {
    /// A request with unconstrained pickup and delivery windows.
    pub fn new(request_id: RequestId, creation_timestamp: Time, origin: L, destination: L) -> Self {
        Self {
            request_id,
            creation_timestamp,
            origin,
            destination,
            pickup_timewindow: TimeWindow::UNBOUNDED,
            delivery_timewindow: TimeWindow::UNBOUNDED,
        }
    }

    pub fn with_windows(
        request_id: RequestId,
        creation_timestamp: Time,
        origin: L,
        destination: L,
        pickup_timewindow: TimeWindow,
        delivery_timewindow: TimeWindow,
    ) -> Self {
        Self {
            request_id,
            creation_timestamp,
            origin,
            destination,
            pickup_timewindow,
            delivery_timewindow,
        }
    }

    /// `true` if origin and destination coincide.  Such requests carry no
    /// transportation task and are rejected upstream.
    #[inline]
    pub fn is_trivial(&self) -> bool {
        self.origin == self.destination
    }
}

// ── InternalRequest ───────────────────────────────────────────────────────────

/// A system-originated task at a single location that no customer asked for:
/// the vehicle's starting position (backing the CPE) or a repositioning
/// order.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InternalRequest<L: Location> {
    pub request_id: RequestId,
    pub creation_timestamp: Time,
    pub location: L,
}

impl<L: Location> InternalRequest<L> {
    pub fn new(request_id: RequestId, creation_timestamp: Time, location: L) -> Self {
        Self {
            request_id,
            creation_timestamp,
            location,
        }
    }
}
