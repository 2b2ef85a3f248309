//! Per-vehicle stoplist state machine.

use std::sync::Arc;

use log::debug;

use rp_core::{
    StopAction, StopEvent, Stoplist, Time, TimeWindow, TransportationRequest, RequestId, VehicleId,
};
use rp_dispatch::Dispatcher;
use rp_space::TransportSpace;

// ── SingleVehicleSolution ─────────────────────────────────────────────────────

/// One vehicle's quote for serving a request: the insertion cost plus the
/// realised service windows.  `min_cost == f64::INFINITY` means this vehicle
/// cannot serve the request.
#[derive(Clone, Debug)]
pub struct SingleVehicleSolution {
    pub vehicle_id: VehicleId,
    pub min_cost: f64,
    pub pickup_window: TimeWindow,
    pub delivery_window: TimeWindow,
}

// ── VehicleState ──────────────────────────────────────────────────────────────

/// A single vehicle: its stoplist, its clock, and the ephemeral stoplist
/// proposed by the latest dispatcher quote.
///
/// The fleet coordinator is the only caller of the mutating operations;
/// between calls all stoplist invariants hold (checked by `debug_assert!`).
pub struct VehicleState<S: TransportSpace, D: Dispatcher<S>> {
    vehicle_id: VehicleId,
    seat_capacity: u32,
    stoplist: Stoplist<S::Loc>,
    /// Tentative stoplist from the offer phase; `None` outside it.
    /// Overwritten by every new quote, consumed by
    /// [`select_new_stoplist`](Self::select_new_stoplist).
    proposed_stoplist: Option<Stoplist<S::Loc>>,
    space: Arc<S>,
    dispatcher: Arc<D>,
    current_time: Time,
}

impl<S: TransportSpace, D: Dispatcher<S>> VehicleState<S, D> {
    /// A vehicle parked at `location` at `start_time`, with an empty plan
    /// (its stoplist holds only the CPE).
    pub fn new(
        vehicle_id: VehicleId,
        location: S::Loc,
        seat_capacity: u32,
        space: Arc<S>,
        dispatcher: Arc<D>,
        start_time: Time,
    ) -> Self {
        Self {
            vehicle_id,
            seat_capacity,
            stoplist: Stoplist::with_cpe_at(location, start_time),
            proposed_stoplist: None,
            space,
            dispatcher,
            current_time: start_time,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn vehicle_id(&self) -> VehicleId {
        self.vehicle_id
    }

    #[inline]
    pub fn seat_capacity(&self) -> u32 {
        self.seat_capacity
    }

    #[inline]
    pub fn stoplist(&self) -> &Stoplist<S::Loc> {
        &self.stoplist
    }

    #[inline]
    pub fn current_time(&self) -> Time {
        self.current_time
    }

    /// Arrival time at the last planned stop (the CPE's own arrival when the
    /// vehicle is idle) — the moment this vehicle's plan runs dry.
    pub fn last_planned_arrival(&self) -> Time {
        self.stoplist
            .last()
            .map(|s| s.estimated_arrival_time)
            .unwrap_or(self.current_time)
    }

    /// The vehicle's position at `current_time`, interpolated between the
    /// CPE and the next stop.  For discrete spaces this is the next location
    /// that will be reached.  Visualisation helper; the simulation itself
    /// only ever looks at the CPE.
    pub fn current_position(&self) -> S::Loc {
        if self.stoplist.is_idle() {
            return self.stoplist.cpe().location.clone();
        }
        let next = &self.stoplist[1];
        let (location, _) = self.space.interp_time(
            &self.stoplist.cpe().location,
            &next.location,
            next.estimated_arrival_time - self.current_time,
        );
        location
    }

    // ── Fast-forward ──────────────────────────────────────────────────────

    /// Advance the vehicle to time `t`, servicing every stop whose service
    /// time `max(EAT, time_window.min)` has passed, and relocate the CPE to
    /// the inferred current position.
    ///
    /// Returns the emitted stop events in ascending service-time order.
    ///
    /// # Panics
    /// Panics if `t` lies before the vehicle's current time — time reversal
    /// is a caller bug, not a recoverable condition.
    pub fn fast_forward_time(&mut self, t: Time) -> Vec<StopEvent> {
        assert!(
            t >= self.current_time,
            "{} cannot fast-forward backwards ({} -> {})",
            self.vehicle_id,
            self.current_time,
            t,
        );

        // Service times are non-decreasing along the list (drive-first on
        // monotone arrivals), so the serviceable stops form a prefix.
        let mut events = Vec::new();
        for stop in self.stoplist.iter().skip(1) {
            let service_time = stop.estimated_departure_time();
            if service_time > t {
                break;
            }
            events.push(StopEvent {
                timestamp: service_time,
                vehicle_id: self.vehicle_id,
                request_id: stop.request_id(),
                action: stop.action,
            });
        }

        // The last serviced stop anchors the CPE relocation; with nothing
        // serviced that role falls to the (outdated) CPE itself.
        let serviced = events.len();
        let (last_location, last_occupancy) = {
            let last = &self.stoplist[serviced];
            (last.location.clone(), last.occupancy_after_servicing)
        };
        if serviced > 0 {
            debug!("{} serviced {serviced} stops up to t={t}", self.vehicle_id);
            self.stoplist.remove_serviced(serviced);
        }

        self.stoplist.cpe_mut().occupancy_after_servicing = last_occupancy;

        // A CPE still in the future (mid-jump past t) stays as it is; the
        // vehicle will materialise there when its edge completes.
        if self.stoplist.cpe().estimated_arrival_time <= t {
            if self.stoplist.is_idle() {
                let cpe = self.stoplist.cpe_mut();
                cpe.location = last_location;
                cpe.estimated_arrival_time = t;
            } else {
                let (location, jump_time) = self.space.interp_time(
                    &last_location,
                    &self.stoplist[1].location,
                    self.stoplist[1].estimated_arrival_time - t,
                );
                let cpe = self.stoplist.cpe_mut();
                cpe.location = location;
                cpe.estimated_arrival_time = t + jump_time;
            }
        }

        self.current_time = t;
        #[cfg(debug_assertions)]
        self.stoplist.assert_valid(self.seat_capacity);

        events
    }

    // ── Offer phase ───────────────────────────────────────────────────────

    /// Quote this vehicle for `request`: run the dispatcher against the
    /// current stoplist and stash the tentative result as the proposal.
    ///
    /// Proposals are ephemeral — each call overwrites the previous one, and
    /// the fleet's next fast-forward renders them stale.
    pub fn handle_transportation_request(
        &mut self,
        request: &Arc<TransportationRequest<S::Loc>>,
    ) -> SingleVehicleSolution {
        let result =
            self.dispatcher
                .dispatch(request, &self.stoplist, &self.space, self.seat_capacity);
        self.proposed_stoplist = result.new_stoplist;
        SingleVehicleSolution {
            vehicle_id: self.vehicle_id,
            min_cost: result.min_cost,
            pickup_window: result.pickup_window,
            delivery_window: result.delivery_window,
        }
    }

    /// Commit the proposed stoplist.  Called by the fleet for exactly the
    /// vehicle whose offer was accepted.
    pub fn select_new_stoplist(&mut self) {
        debug_assert!(
            self.proposed_stoplist.is_some(),
            "{} has no proposed stoplist to commit",
            self.vehicle_id,
        );
        if let Some(proposed) = self.proposed_stoplist.take() {
            #[cfg(debug_assertions)]
            proposed.assert_valid(self.seat_capacity);
            self.stoplist = proposed;
        }
    }

    /// `(pickup EAT, dropoff EAT)` of `request_id` in the proposed stoplist
    /// — the estimated in-vehicle window quoted in an OFFER event.
    /// Components stay infinite when the proposal lacks the request.
    pub fn estimated_invehicle_window(&self, request_id: RequestId) -> TimeWindow {
        let mut window = TimeWindow {
            min: f64::INFINITY,
            max: f64::INFINITY,
        };
        if let Some(proposed) = &self.proposed_stoplist {
            for stop in proposed.iter() {
                if stop.request_id() == request_id {
                    match stop.action {
                        StopAction::Pickup => window.min = stop.estimated_arrival_time,
                        StopAction::Dropoff => window.max = stop.estimated_arrival_time,
                        StopAction::Internal => {}
                    }
                }
            }
        }
        window
    }
}
