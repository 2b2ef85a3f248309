//! Events emitted by the fleet.
//!
//! Two families: `StopEvent`s fall out of fast-forwarding (a stop got
//! serviced), `RequestEvent`s answer the offer/commit protocol.  The
//! [`Event`] enum unions both for merged simulation output.
//!
//! Infeasibility and protocol misuse are *data*, not errors: they surface as
//! [`RequestEvent::Rejection`] values, never as `Err` or panics.

use std::fmt;

use crate::{RequestId, StopAction, Time, TimeWindow, VehicleId};

// ── StopEvent ─────────────────────────────────────────────────────────────────

/// A stop was serviced.
///
/// `timestamp` is the stop's service time `max(EAT, time_window.min)`, not
/// the wall time of the fast-forward that drained it.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StopEvent {
    pub timestamp: Time,
    pub vehicle_id: VehicleId,
    /// `RequestId::INVALID` for internal stops.
    pub request_id: RequestId,
    pub action: StopAction,
}

impl fmt::Display for StopEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:.3} {} {} ({})",
            self.timestamp, self.vehicle_id, self.action, self.request_id
        )
    }
}

// ── RequestEvent ──────────────────────────────────────────────────────────────

/// Outcome of one step of the offer/commit protocol for a single request.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RequestEvent {
    /// A vehicle can serve the request; the offer is pending until committed
    /// or invalidated by the next fast-forward.
    Offer {
        timestamp: Time,
        request_id: RequestId,
        /// `(pickup EAT, dropoff EAT)` read from the chosen vehicle's
        /// proposed stoplist.
        estimated_invehicle_window: TimeWindow,
        comment: String,
    },
    /// No vehicle can serve the request, the request is trivial, or a commit
    /// arrived without a matching pending offer.
    Rejection {
        timestamp: Time,
        request_id: RequestId,
        comment: String,
    },
    /// A pending offer was committed; the chosen vehicle adopted its
    /// proposed stoplist.
    Acceptance {
        timestamp: Time,
        request_id: RequestId,
        comment: String,
    },
}

impl RequestEvent {
    #[inline]
    pub fn timestamp(&self) -> Time {
        match self {
            RequestEvent::Offer { timestamp, .. }
            | RequestEvent::Rejection { timestamp, .. }
            | RequestEvent::Acceptance { timestamp, .. } => *timestamp,
        }
    }

    #[inline]
    pub fn request_id(&self) -> RequestId {
        match self {
            RequestEvent::Offer { request_id, .. }
            | RequestEvent::Rejection { request_id, .. }
            | RequestEvent::Acceptance { request_id, .. } => *request_id,
        }
    }

    #[inline]
    pub fn is_rejection(&self) -> bool {
        matches!(self, RequestEvent::Rejection { .. })
    }
}

impl fmt::Display for RequestEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestEvent::Offer {
                timestamp,
                request_id,
                estimated_invehicle_window,
                comment,
            } => write!(
                f,
                "t={timestamp:.3} offer {request_id} in-vehicle {estimated_invehicle_window}: {comment}"
            ),
            RequestEvent::Rejection {
                timestamp,
                request_id,
                comment,
            } => write!(f, "t={timestamp:.3} rejection {request_id}: {comment}"),
            RequestEvent::Acceptance {
                timestamp,
                request_id,
                comment,
            } => write!(f, "t={timestamp:.3} acceptance {request_id}: {comment}"),
        }
    }
}

// ── Event ─────────────────────────────────────────────────────────────────────

/// Union of all event kinds, as produced by the merged simulation stream.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Event {
    Stop(StopEvent),
    Request(RequestEvent),
}

impl Event {
    #[inline]
    pub fn timestamp(&self) -> Time {
        match self {
            Event::Stop(e) => e.timestamp,
            Event::Request(e) => e.timestamp(),
        }
    }
}

impl From<StopEvent> for Event {
    fn from(e: StopEvent) -> Self {
        Event::Stop(e)
    }
}

impl From<RequestEvent> for Event {
    fn from(e: RequestEvent) -> Self {
        Event::Request(e)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Stop(e) => e.fmt(f),
            Event::Request(e) => e.fmt(f),
        }
    }
}
