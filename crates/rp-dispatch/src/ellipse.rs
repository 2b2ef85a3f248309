//! First-fit insertion bounded by relative detour.

use std::sync::Arc;

use log::debug;

use rp_core::{Stoplist, TransportationRequest};
use rp_space::TransportSpace;

use crate::dispatcher::{Dispatcher, InsertionResult};
use crate::insertion::{
    insert_request_drive_first, time_from_current_stop_to_next, time_to_stop_after_insertion,
};

/// Accepts the *first* insertion whose per-edge relative detour stays within
/// `max_relative_detour` at every affected edge, instead of minimising a
/// cost.
///
/// Time windows are disregarded; capacity is enforced.  When a pickup slot
/// exists but no mid-list dropoff fits, the dropoff is appended to the end
/// of the stoplist; when no pickup slot exists either, both stops are
/// appended.  The reported cost is 0 for a pure mid-list insertion and the
/// extra appended travel time otherwise.
#[derive(Clone, Copy, Debug)]
pub struct SimpleEllipseDispatcher {
    pub max_relative_detour: f64,
}

impl SimpleEllipseDispatcher {
    pub fn new(max_relative_detour: f64) -> Self {
        debug_assert!(max_relative_detour >= 0.0);
        Self {
            max_relative_detour,
        }
    }
}

/// `absolute_detour / original_edge_length`, with the degenerate cases
/// pinned down: no detour is always admissible, any detour over a
/// zero-length edge never is.
fn relative_detour(absolute_detour: f64, original_edge_length: f64) -> f64 {
    if absolute_detour <= 0.0 {
        0.0
    } else if original_edge_length == 0.0 {
        f64::INFINITY
    } else {
        absolute_detour / original_edge_length
    }
}

impl<S: TransportSpace> Dispatcher<S> for SimpleEllipseDispatcher {
    fn dispatch(
        &self,
        request: &Arc<TransportationRequest<S::Loc>>,
        stoplist: &Stoplist<S::Loc>,
        space: &S,
        seat_capacity: u32,
    ) -> InsertionResult<S::Loc> {
        let n = stoplist.len();
        let mut best_insertion: Option<(usize, usize, f64)> = None;

        // Mid-list pickup positions only; appends are handled separately.
        'pickup: for i in 0..n.saturating_sub(1) {
            if stoplist[i].occupancy_after_servicing == seat_capacity {
                continue;
            }

            let time_to_pickup = space.t(&stoplist[i].location, &request.origin);
            let time_from_pickup =
                time_to_stop_after_insertion(stoplist, &request.origin, i, space);
            let original_pickup_edge = time_from_current_stop_to_next(stoplist, i, space);
            let pickup_detour = time_to_pickup + time_from_pickup - original_pickup_edge;

            if relative_detour(pickup_detour, original_pickup_edge) > self.max_relative_detour {
                continue;
            }

            // Dropoff immediately after the pickup?
            let time_to_dropoff = space.t(&request.origin, &request.destination);
            let time_from_dropoff =
                time_to_stop_after_insertion(stoplist, &request.destination, i, space);
            let dropoff_detour = time_to_dropoff + time_from_dropoff - time_from_pickup;
            if relative_detour(dropoff_detour, time_from_pickup) <= self.max_relative_detour {
                best_insertion = Some((i, i, 0.0));
                break;
            }

            // Disjoint dropoff at the first admissible later edge.
            for j in (i + 1)..(n - 1) {
                if stoplist[j].occupancy_after_servicing == seat_capacity {
                    // The pickup would ride through a full stop; neither
                    // this j nor an append can work for this i.
                    continue 'pickup;
                }
                let time_to_dropoff = space.t(&stoplist[j].location, &request.destination);
                let time_from_dropoff =
                    time_to_stop_after_insertion(stoplist, &request.destination, j, space);
                let original_dropoff_edge = time_from_current_stop_to_next(stoplist, j, space);
                let dropoff_detour = time_to_dropoff + time_from_dropoff - original_dropoff_edge;
                if relative_detour(dropoff_detour, original_dropoff_edge)
                    <= self.max_relative_detour
                {
                    best_insertion = Some((i, j, 0.0));
                    break 'pickup;
                }
            }

            // No mid-list dropoff fits: append it, provided the passenger
            // can ride through the whole tail.
            if stoplist[i + 1..]
                .iter()
                .any(|s| s.occupancy_after_servicing == seat_capacity)
            {
                continue;
            }
            let append_cost = space.t(&stoplist[n - 1].location, &request.destination);
            best_insertion = Some((i, n - 1, append_cost));
            break;
        }

        let (pickup_idx, dropoff_idx, min_cost) = match best_insertion {
            Some(found) => found,
            // No pickup slot at all: append both stops to the end.
            None => {
                if stoplist[n - 1].occupancy_after_servicing == seat_capacity {
                    return InsertionResult::infeasible();
                }
                let cost = space.t(&stoplist[n - 1].location, &request.origin)
                    + space.t(&request.origin, &request.destination);
                (n - 1, n - 1, cost)
            }
        };
        debug!(
            "request {}: ellipse insertion ({pickup_idx}, {dropoff_idx}) at cost {min_cost}",
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
}
