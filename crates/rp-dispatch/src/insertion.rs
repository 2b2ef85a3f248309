//! Drive-first insertion primitives shared by all dispatchers.
//!
//! Index convention: "insertion at `idx`" always means *after* the `idx`-th
//! stop, i.e. the new stop ends up at position `idx + 1`.

use std::sync::Arc;

use rp_core::{Location, Stop, StopAction, StopRequest, Stoplist, TransportationRequest};
use rp_space::TransportSpace;

/// Projected arrival time of a stop inserted after `stop_before`, whose own
/// arrival is shifted by `delta_cpat`, under drive-first.
#[inline]
pub fn cpat_of_inserted_stop<L: Location>(
    stop_before: &Stop<L>,
    time_from_stop_before: f64,
    delta_cpat: f64,
) -> f64 {
    (stop_before.estimated_arrival_time + delta_cpat).max(stop_before.time_window.min)
        + time_from_stop_before
}

/// Travel time from a stop inserted at `idx` with `location` to the stop it
/// displaces; 0 when inserting at the end of the list.
#[inline]
pub fn time_to_stop_after_insertion<S: TransportSpace>(
    stoplist: &Stoplist<S::Loc>,
    location: &S::Loc,
    idx: usize,
    space: &S,
) -> f64 {
    if idx < stoplist.len() - 1 {
        space.t(location, &stoplist[idx + 1].location)
    } else {
        0.0
    }
}

/// Travel time along the existing edge leaving the `i`-th stop; 0 for the
/// last stop.
#[inline]
pub fn time_from_current_stop_to_next<S: TransportSpace>(
    stoplist: &Stoplist<S::Loc>,
    i: usize,
    space: &S,
) -> f64 {
    if i < stoplist.len() - 1 {
        space.t(&stoplist[i].location, &stoplist[i + 1].location)
    } else {
        0.0
    }
}

/// Would an insertion at `idx`, arriving at the displaced stop at
/// `est_arrival_first_stop_after_insertion`, violate (or worsen an existing
/// violation of) any downstream time window?
///
/// Propagates the cascading delay while honouring `time_window.min`
/// absorption: a stop that has to wait anyway swallows the delay and the
/// check terminates early.
pub fn insertion_violates_downstream_windows<L: Location>(
    stoplist: &Stoplist<L>,
    idx: usize,
    est_arrival_first_stop_after_insertion: f64,
) -> bool {
    // Inserting at the end: nothing downstream to check.
    if idx + 2 > stoplist.len() {
        return false;
    }

    // Zero detour and no new waiting: nothing changes downstream.
    if est_arrival_first_stop_after_insertion <= stoplist[idx + 1].estimated_arrival_time {
        return false;
    }

    let mut delta_cpat =
        est_arrival_first_stop_after_insertion - stoplist[idx + 1].estimated_arrival_time;

    for stop in &stoplist[idx + 1..] {
        let old_leeway = stop.time_window.max - stop.estimated_arrival_time;
        let new_leeway = old_leeway - delta_cpat;

        if new_leeway < 0.0 && new_leeway < old_leeway {
            return true;
        } else if stop.time_window.min >= stop.estimated_arrival_time + delta_cpat {
            // The stop waits (or arrives exactly on time) — the delay is
            // fully absorbed here.
            return false;
        } else {
            delta_cpat = (stop.estimated_arrival_time + delta_cpat).max(stop.time_window.min)
                - stop.estimated_departure_time();
        }
    }

    false
}

/// Insert a single stop after position `idx`, fixing its arrival time from
/// its new predecessor and rippling the arrival-time delta down the tail
/// until it is absorbed.
pub fn insert_stop_drive_first<S: TransportSpace>(
    stoplist: &mut Stoplist<S::Loc>,
    mut stop: Stop<S::Loc>,
    idx: usize,
    space: &S,
) {
    let time_from_before = space.t(&stoplist[idx].location, &stop.location);
    stop.estimated_arrival_time = cpat_of_inserted_stop(&stoplist[idx], time_from_before, 0.0);

    if idx < stoplist.len() - 1 {
        let mut delta_cpat = stop.estimated_departure_time()
            + space.t(&stop.location, &stoplist[idx + 1].location)
            - stoplist[idx + 1].estimated_arrival_time;

        for later_stop in &mut stoplist.stops_mut()[idx + 1..] {
            let old_departure = later_stop.estimated_departure_time();
            later_stop.estimated_arrival_time += delta_cpat;
            delta_cpat = later_stop.estimated_departure_time() - old_departure;
            if delta_cpat == 0.0 {
                break;
            }
        }
    }

    stoplist.insert(idx + 1, stop);
}

/// Build the tentative stoplist for inserting `request` with its pickup
/// after `pickup_idx` and its dropoff after `dropoff_idx` (`==` means
/// adjacent, pickup first).  The input is cloned, never mutated.
///
/// Occupancies of all stops riding between the two new stops increase by
/// one; arrival times are recomputed under drive-first.
pub fn insert_request_drive_first<S: TransportSpace>(
    stoplist: &Stoplist<S::Loc>,
    request: &Arc<TransportationRequest<S::Loc>>,
    pickup_idx: usize,
    dropoff_idx: usize,
    space: &S,
) -> Stoplist<S::Loc> {
    debug_assert!(pickup_idx <= dropoff_idx);
    let mut new_stoplist = stoplist.clone();

    let pickup_stop = Stop {
        location: request.origin.clone(),
        request: StopRequest::Transportation(Arc::clone(request)),
        action: StopAction::Pickup,
        // Fixed up by insert_stop_drive_first.
        estimated_arrival_time: 0.0,
        occupancy_after_servicing: new_stoplist[pickup_idx].occupancy_after_servicing + 1,
        time_window: request.pickup_timewindow,
    };

    // The passenger rides across every stop between pickup and dropoff.
    // Indices here are pre-insertion: 0, .., pickup_idx, (pickup goes here),
    // .., dropoff_idx, (dropoff goes here), ..
    for stop in &mut new_stoplist.stops_mut()[pickup_idx + 1..=dropoff_idx] {
        stop.occupancy_after_servicing += 1;
    }

    insert_stop_drive_first(&mut new_stoplist, pickup_stop, pickup_idx, space);

    let dropoff_idx = dropoff_idx + 1; // account for the pickup insertion
    let dropoff_stop = Stop {
        location: request.destination.clone(),
        request: StopRequest::Transportation(Arc::clone(request)),
        action: StopAction::Dropoff,
        estimated_arrival_time: 0.0,
        occupancy_after_servicing: new_stoplist[dropoff_idx].occupancy_after_servicing - 1,
        time_window: request.delivery_timewindow,
    };
    insert_stop_drive_first(&mut new_stoplist, dropoff_stop, dropoff_idx, space);

    new_stoplist
}
