//! Exhaustive total-travel-time-minimising insertion search.

use std::sync::Arc;

use log::debug;

use rp_core::{Stoplist, TransportationRequest};
use rp_space::TransportSpace;

use crate::dispatcher::{Dispatcher, InsertionResult};
use crate::insertion::{
    cpat_of_inserted_stop, insert_request_drive_first, insertion_violates_downstream_windows,
    time_from_current_stop_to_next, time_to_stop_after_insertion,
};

/// The reference dispatcher: enumerate every ordered pair of insertion
/// positions `(i, j)`, `0 <= i <= j < n`, for pickup-after-`i` and
/// dropoff-after-`j`, and return the feasible pair minimising the **total
/// added travel time** along the itinerary.
///
/// Waiting time forced by a pickup window opening after the projected
/// arrival is charged to nobody: the cost is pure extra driving.
///
/// Ties are broken by first encounter (strict `<` on cost), i.e. the
/// lexicographically smallest `(i, j)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BruteForceDispatcher;

impl<S: TransportSpace> Dispatcher<S> for BruteForceDispatcher {
    fn dispatch(
        &self,
        request: &Arc<TransportationRequest<S::Loc>>,
        stoplist: &Stoplist<S::Loc>,
        space: &S,
        seat_capacity: u32,
    ) -> InsertionResult<S::Loc> {
        let n = stoplist.len();
        let mut min_cost = f64::INFINITY;
        let mut best_insertion: Option<(usize, usize)> = None;

        for i in 0..n {
            let stop_before_pickup = &stoplist[i];

            // A full vehicle after stop i cannot take the pickup here.
            if stop_before_pickup.occupancy_after_servicing == seat_capacity {
                continue;
            }

            let time_to_pickup = space.t(&stop_before_pickup.location, &request.origin);
            let cpat_pu = cpat_of_inserted_stop(stop_before_pickup, time_to_pickup, 0.0);
            if cpat_pu > request.pickup_timewindow.max {
                continue;
            }
            let earliest_pickup = request.pickup_timewindow.min;

            // ── Adjacent insertion (j == i): dropoff right after pickup ────
            //
            // This is the earliest the dropoff can ever happen for this i;
            // if even this arrival misses the delivery window, every
            // disjoint dropoff (which only adds stops in between) does too,
            // so the whole pickup position is hopeless.
            let direct_leg = space.t(&request.origin, &request.destination);
            let cpat_do = earliest_pickup.max(cpat_pu) + direct_leg;
            if cpat_do > request.delivery_timewindow.max {
                continue;
            }

            let time_from_dropoff =
                time_to_stop_after_insertion(stoplist, &request.destination, i, space);
            let original_pickup_edge = time_from_current_stop_to_next(stoplist, i, space);
            let total_cost = time_to_pickup + direct_leg + time_from_dropoff - original_pickup_edge;

            if total_cost < min_cost {
                let cpat_at_next_stop =
                    cpat_do.max(request.delivery_timewindow.min) + time_from_dropoff;
                if !insertion_violates_downstream_windows(stoplist, i, cpat_at_next_stop) {
                    best_insertion = Some((i, i));
                    min_cost = total_cost;
                }
            }

            // ── Disjoint insertion (j > i) ─────────────────────────────────
            let time_from_pickup =
                time_to_stop_after_insertion(stoplist, &request.origin, i, space);
            let cpat_at_next_stop = cpat_pu.max(earliest_pickup) + time_from_pickup;
            if insertion_violates_downstream_windows(stoplist, i, cpat_at_next_stop) {
                continue;
            }

            let pickup_cost = time_to_pickup + time_from_pickup - original_pickup_edge;

            // Cascading delay the pickup detour introduces at stop i+1;
            // updated stop by stop as waiting slack absorbs it.
            let mut delta_cpat = if i < n - 1 {
                cpat_at_next_stop - stoplist[i + 1].estimated_arrival_time
            } else {
                0.0
            };

            for j in (i + 1)..n {
                let stop_before_dropoff = &stoplist[j];

                // The pickup rides along: a full stop anywhere before the
                // dropoff blocks this and every later j.
                if stop_before_dropoff.occupancy_after_servicing == seat_capacity {
                    break;
                }

                let time_to_dropoff = space.t(&stop_before_dropoff.location, &request.destination);
                let cpat_do = cpat_of_inserted_stop(stop_before_dropoff, time_to_dropoff, delta_cpat);
                if cpat_do > request.delivery_timewindow.max {
                    break;
                }

                let time_from_dropoff =
                    time_to_stop_after_insertion(stoplist, &request.destination, j, space);
                let original_dropoff_edge = time_from_current_stop_to_next(stoplist, j, space);
                let dropoff_cost = time_to_dropoff + time_from_dropoff - original_dropoff_edge;
                let total_cost = pickup_cost + dropoff_cost;

                if total_cost < min_cost {
                    let cpat_at_next_stop =
                        cpat_do.max(request.delivery_timewindow.min) + time_from_dropoff;
                    if !insertion_violates_downstream_windows(stoplist, j, cpat_at_next_stop) {
                        best_insertion = Some((i, j));
                        min_cost = total_cost;
                    }
                }

                // Waiting slack at stop j may shrink the delay the next
                // iteration sees.
                let new_departure = (stop_before_dropoff.estimated_arrival_time + delta_cpat)
                    .max(stop_before_dropoff.time_window.min);
                delta_cpat = new_departure - stop_before_dropoff.estimated_departure_time();
            }
        }

        match best_insertion {
            Some((pickup_idx, dropoff_idx)) => {
                debug!(
                    "request {}: best insertion ({pickup_idx}, {dropoff_idx}) at cost {min_cost}",
                    request.request_id
                );
                let new_stoplist =
                    insert_request_drive_first(stoplist, request, pickup_idx, dropoff_idx, space);
                let pickup_window = new_stoplist[pickup_idx + 1].time_window;
                let delivery_window = new_stoplist[dropoff_idx + 2].time_window;
                InsertionResult {
                    new_stoplist: Some(new_stoplist),
                    min_cost,
                    pickup_window,
                    delivery_window,
                }
            }
            None => {
                debug!("request {}: no feasible insertion", request.request_id);
                InsertionResult::infeasible()
            }
        }
    }
}
