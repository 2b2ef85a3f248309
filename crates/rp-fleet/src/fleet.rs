//! The fleet coordinator: offer/commit across vehicles and the merged event
//! stream.

use std::sync::Arc;

use log::{debug, info};

use rp_core::{Event, RequestEvent, RequestId, StopEvent, Time, TransportationRequest, VehicleId};
use rp_dispatch::Dispatcher;
use rp_space::TransportSpace;

use crate::vehicle::{SingleVehicleSolution, VehicleState};

// ── PendingOffer ──────────────────────────────────────────────────────────────

/// The single in-flight offer between `submit` and `execute`.
///
/// Created by a successful submit, cleared by execute or by the next
/// fast-forward (a time advance makes every quote stale).
#[derive(Copy, Clone, Debug)]
struct PendingOffer {
    request_id: RequestId,
    vehicle_index: usize,
}

// ── FleetState ────────────────────────────────────────────────────────────────

/// All vehicles plus the shared transport space and dispatcher.
///
/// The coordinator is single-threaded from the outside; within
/// [`fast_forward`](Self::fast_forward) and
/// [`submit_transportation_request`](Self::submit_transportation_request)
/// the per-vehicle work is embarrassingly parallel and runs on Rayon when
/// the `parallel` feature is enabled.
///
/// Construct via [`FleetBuilder`](crate::FleetBuilder).
pub struct FleetState<S: TransportSpace, D: Dispatcher<S>> {
    pub(crate) vehicles: Vec<VehicleState<S, D>>,
    pub(crate) space: Arc<S>,
    pub(crate) dispatcher: Arc<D>,
    pending_offer: Option<PendingOffer>,
    t: Time,
}

impl<S: TransportSpace, D: Dispatcher<S>> FleetState<S, D> {
    pub(crate) fn from_vehicles(
        vehicles: Vec<VehicleState<S, D>>,
        space: Arc<S>,
        dispatcher: Arc<D>,
        start_time: Time,
    ) -> Self {
        Self {
            vehicles,
            space,
            dispatcher,
            pending_offer: None,
            t: start_time,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn current_time(&self) -> Time {
        self.t
    }

    #[inline]
    pub fn vehicles(&self) -> &[VehicleState<S, D>] {
        &self.vehicles
    }

    #[inline]
    pub fn space(&self) -> &Arc<S> {
        &self.space
    }

    #[inline]
    pub fn dispatcher(&self) -> &Arc<D> {
        &self.dispatcher
    }

    /// Interpolated per-vehicle positions at the current time, for
    /// visualisation.
    pub fn vehicle_positions(&self) -> Vec<(VehicleId, S::Loc)> {
        self.vehicles
            .iter()
            .map(|v| (v.vehicle_id(), v.current_position()))
            .collect()
    }

    // ── Fast-forward ──────────────────────────────────────────────────────

    /// Advance every vehicle to time `t` and merge the emitted stop events
    /// into a single stream ordered by `(timestamp, vehicle_id)`.
    ///
    /// Any pending offer becomes stale: the quotes were computed against
    /// stoplists that no longer exist.
    pub fn fast_forward(&mut self, t: Time) -> Vec<StopEvent> {
        #[cfg(not(feature = "parallel"))]
        let per_vehicle: Vec<Vec<StopEvent>> = self
            .vehicles
            .iter_mut()
            .map(|v| v.fast_forward_time(t))
            .collect();

        #[cfg(feature = "parallel")]
        let per_vehicle: Vec<Vec<StopEvent>> = {
            use rayon::prelude::*;
            self.vehicles
                .par_iter_mut()
                .map(|v| v.fast_forward_time(t))
                .collect()
        };

        let mut events: Vec<StopEvent> = per_vehicle.into_iter().flatten().collect();
        events.sort_by(|a, b| {
            a.timestamp
                .total_cmp(&b.timestamp)
                .then(a.vehicle_id.cmp(&b.vehicle_id))
        });

        self.pending_offer = None;
        self.t = t;
        events
    }

    // ── Offer phase ───────────────────────────────────────────────────────

    /// Quote all vehicles for `request` and record the cheapest as the
    /// pending offer.
    ///
    /// Returns an `Offer` event carrying the estimated in-vehicle window,
    /// or a `Rejection` when the request is trivial or no vehicle can serve
    /// it.  A second submit before the commit simply replaces the pending
    /// offer.
    pub fn submit_transportation_request(
        &mut self,
        request: TransportationRequest<S::Loc>,
    ) -> RequestEvent {
        let t = self.t;
        let request_id = request.request_id;
        debug!("handling request {request_id} at t={t}");

        if request.is_trivial() {
            return RequestEvent::Rejection {
                timestamp: t,
                request_id,
                comment: "trivial request: origin equals destination".into(),
            };
        }

        let request = Arc::new(request);

        #[cfg(not(feature = "parallel"))]
        let solutions: Vec<SingleVehicleSolution> = self
            .vehicles
            .iter_mut()
            .map(|v| v.handle_transportation_request(&request))
            .collect();

        #[cfg(feature = "parallel")]
        let solutions: Vec<SingleVehicleSolution> = {
            use rayon::prelude::*;
            self.vehicles
                .par_iter_mut()
                .map(|v| v.handle_transportation_request(&request))
                .collect()
        };

        // Strict `<` keeps the earliest vehicle on cost ties.
        let mut best: Option<(usize, f64)> = None;
        for (index, solution) in solutions.iter().enumerate() {
            if best.is_none_or(|(_, cost)| solution.min_cost < cost) {
                best = Some((index, solution.min_cost));
            }
        }

        let Some((vehicle_index, min_cost)) = best else {
            return RequestEvent::Rejection {
                timestamp: t,
                request_id,
                comment: "no vehicle can serve this request".into(),
            };
        };
        if min_cost.is_infinite() {
            return RequestEvent::Rejection {
                timestamp: t,
                request_id,
                comment: "no vehicle can serve this request".into(),
            };
        }

        let vehicle = &self.vehicles[vehicle_index];
        debug!(
            "best vehicle for {request_id}: {} at min_cost={min_cost}",
            vehicle.vehicle_id()
        );
        self.pending_offer = Some(PendingOffer {
            request_id,
            vehicle_index,
        });

        RequestEvent::Offer {
            timestamp: t,
            request_id,
            estimated_invehicle_window: vehicle.estimated_invehicle_window(request_id),
            comment: "offering a ride".into(),
        }
    }

    // ── Commit phase ──────────────────────────────────────────────────────

    /// Commit the pending offer for `request_id`: the chosen vehicle adopts
    /// its proposed stoplist.
    ///
    /// Rejected when no offer is pending (e.g. a fast-forward intervened) or
    /// when the id does not match the pending one.  Never blocks.
    pub fn execute_transportation_request(&mut self, request_id: RequestId) -> RequestEvent {
        let pending = match self.pending_offer {
            None => {
                return RequestEvent::Rejection {
                    timestamp: self.t,
                    request_id,
                    comment: "stale offer: no submission is pending".into(),
                }
            }
            Some(pending) if pending.request_id != request_id => {
                return RequestEvent::Rejection {
                    timestamp: self.t,
                    request_id,
                    comment: format!(
                        "stale offer: pending submission is {}",
                        pending.request_id
                    ),
                }
            }
            Some(pending) => pending,
        };

        self.vehicles[pending.vehicle_index].select_new_stoplist();
        self.pending_offer = None;
        let vehicle_id = self.vehicles[pending.vehicle_index].vehicle_id();
        info!("request {request_id} accepted by {vehicle_id}");

        RequestEvent::Acceptance {
            timestamp: self.t,
            request_id,
            comment: format!("serving request with {vehicle_id}"),
        }
    }

    // ── Batch driver ──────────────────────────────────────────────────────

    /// Run a whole request stream (non-decreasing creation timestamps)
    /// through the fleet, committing every offer immediately, and return
    /// the merged event stream.
    ///
    /// After the last request the fleet is fast-forwarded to
    /// `min(t_cutoff, latest planned arrival)` so that remaining stops are
    /// serviced.
    pub fn simulate(
        &mut self,
        requests: impl IntoIterator<Item = TransportationRequest<S::Loc>>,
        t_cutoff: Time,
    ) -> Vec<Event> {
        let mut events: Vec<Event> = Vec::new();

        for request in requests {
            let t = request.creation_timestamp;
            if t > t_cutoff {
                break;
            }
            events.extend(self.fast_forward(t).into_iter().map(Event::Stop));

            let request_id = request.request_id;
            let response = self.submit_transportation_request(request);
            let accepted = matches!(response, RequestEvent::Offer { .. });
            events.push(Event::Request(response));
            if accepted {
                events.push(Event::Request(self.execute_transportation_request(request_id)));
            }
        }

        // Drain whatever is still planned, but never run past the cutoff or
        // backwards.
        let horizon = self
            .vehicles
            .iter()
            .map(|v| v.last_planned_arrival())
            .fold(self.t, f64::max);
        let t_end = horizon.min(t_cutoff).max(self.t);
        events.extend(self.fast_forward(t_end).into_iter().map(Event::Stop));

        events
    }
}
