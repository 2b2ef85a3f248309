//! Unit tests for the vehicle and fleet state machines.

use std::sync::Arc;

use rp_core::{RequestEvent, RequestId, StopAction, TimeWindow, TransportationRequest, VehicleId};
use rp_dispatch::BruteForceDispatcher;
use rp_space::{Euclidean2D, GridLoc, R2Loc, SquareGrid};

use crate::{FleetBuilder, FleetError, FleetState, VehicleState};

// ── Helpers ───────────────────────────────────────────────────────────────────

type TestFleet = FleetState<Euclidean2D, BruteForceDispatcher>;

fn r2(x: f64, y: f64) -> R2Loc {
    R2Loc::new(x, y)
}

fn fleet_at(locations: &[(f64, f64)], seat_capacity: u32) -> TestFleet {
    FleetBuilder::new(Arc::new(Euclidean2D::default()), Arc::new(BruteForceDispatcher))
        .vehicles_at(locations.iter().map(|&(x, y)| r2(x, y)), seat_capacity)
        .build()
        .unwrap()
}

fn request(id: u64, t: f64, origin: R2Loc, destination: R2Loc) -> TransportationRequest<R2Loc> {
    TransportationRequest::new(RequestId(id), t, origin, destination)
}

fn single_vehicle(
    at: R2Loc,
    seat_capacity: u32,
) -> VehicleState<Euclidean2D, BruteForceDispatcher> {
    VehicleState::new(
        VehicleId(0),
        at,
        seat_capacity,
        Arc::new(Euclidean2D::default()),
        Arc::new(BruteForceDispatcher),
        0.0,
    )
}

/// Put one trip on a vehicle's plan through the regular quote/commit pair.
fn commit_request(
    vehicle: &mut VehicleState<Euclidean2D, BruteForceDispatcher>,
    req: TransportationRequest<R2Loc>,
) {
    let solution = vehicle.handle_transportation_request(&Arc::new(req));
    assert!(solution.min_cost.is_finite());
    vehicle.select_new_stoplist();
}

// ── VehicleState ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod vehicle {
    use super::*;

    #[test]
    fn fast_forward_services_due_stops_and_relocates_cpe() {
        let mut vehicle = single_vehicle(r2(0.0, 0.0), 4);
        commit_request(&mut vehicle, request(1, 0.0, r2(1.0, 0.0), r2(3.0, 0.0)));

        let events = vehicle.fast_forward_time(2.0);

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].action, StopAction::Pickup);
        assert_eq!(events[0].timestamp, 1.0);
        assert_eq!(events[0].request_id, RequestId(1));

        // Mid-leg between pickup (1,0) and dropoff (3,0) at t=2.
        let cpe = vehicle.stoplist().cpe();
        assert_eq!(cpe.location, r2(2.0, 0.0));
        assert_eq!(cpe.estimated_arrival_time, 2.0);
        assert_eq!(cpe.occupancy_after_servicing, 1);
        assert_eq!(vehicle.current_time(), 2.0);
        assert_eq!(vehicle.stoplist().len(), 2);
    }

    #[test]
    fn fast_forward_to_final_stop_parks_the_vehicle() {
        let mut vehicle = single_vehicle(r2(0.0, 0.0), 4);
        commit_request(&mut vehicle, request(1, 0.0, r2(1.0, 0.0), r2(3.0, 0.0)));

        let events = vehicle.fast_forward_time(3.0);

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].timestamp, 1.0);
        assert_eq!(events[1].timestamp, 3.0);
        assert!(vehicle.stoplist().is_idle());

        let cpe = vehicle.stoplist().cpe();
        assert_eq!(cpe.location, r2(3.0, 0.0));
        assert_eq!(cpe.estimated_arrival_time, 3.0);
        assert_eq!(cpe.occupancy_after_servicing, 0);
    }

    #[test]
    fn fast_forward_before_first_service_only_moves_the_cpe() {
        let mut vehicle = single_vehicle(r2(0.0, 0.0), 4);
        commit_request(&mut vehicle, request(1, 0.0, r2(1.0, 0.0), r2(3.0, 0.0)));

        let events = vehicle.fast_forward_time(0.5);

        assert!(events.is_empty());
        assert_eq!(vehicle.stoplist().len(), 3);
        assert_eq!(vehicle.stoplist().cpe().location, r2(0.5, 0.0));
        assert_eq!(vehicle.stoplist().cpe().estimated_arrival_time, 0.5);
    }

    #[test]
    #[should_panic(expected = "cannot fast-forward backwards")]
    fn time_reversal_is_a_programmer_error() {
        let mut vehicle = single_vehicle(r2(0.0, 0.0), 4);
        vehicle.fast_forward_time(1.0);
        vehicle.fast_forward_time(0.5);
    }

    // A pickup whose window opens at t=5 is reached at t=1; the vehicle
    // drives there and waits, and the stop is serviced at window opening.
    #[test]
    fn vehicle_waits_at_early_pickup() {
        let mut vehicle = single_vehicle(r2(0.0, 0.0), 4);
        let req = TransportationRequest::with_windows(
            RequestId(1),
            0.0,
            r2(1.0, 0.0),
            r2(2.0, 0.0),
            TimeWindow::after(5.0),
            TimeWindow::UNBOUNDED,
        );
        commit_request(&mut vehicle, req);

        let events = vehicle.fast_forward_time(3.0);
        assert!(events.is_empty());
        // Already at the pickup location, holding until the window opens.
        assert_eq!(vehicle.stoplist().cpe().location, r2(1.0, 0.0));
        assert_eq!(vehicle.stoplist().cpe().estimated_arrival_time, 3.0);

        let events = vehicle.fast_forward_time(6.0);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].timestamp, 5.0); // serviced at window opening
        assert_eq!(events[1].timestamp, 6.0);
    }

    // The square-grid variant of CPE relocation: between lattice nodes the
    // CPE snaps to the next node with the residual in its arrival time.
    #[test]
    fn grid_cpe_relocates_to_next_lattice_node() {
        let mut vehicle: VehicleState<SquareGrid, BruteForceDispatcher> = VehicleState::new(
            VehicleId(0),
            GridLoc::new(0, 0),
            4,
            Arc::new(SquareGrid::default()),
            Arc::new(BruteForceDispatcher),
            0.0,
        );
        let req = TransportationRequest::new(
            RequestId(1),
            0.0,
            GridLoc::new(0, 0),
            GridLoc::new(2, 3),
        );
        let solution = vehicle.handle_transportation_request(&Arc::new(req));
        assert_eq!(solution.min_cost, 5.0);
        vehicle.select_new_stoplist();

        let events = vehicle.fast_forward_time(2.5);

        assert_eq!(events.len(), 1); // the pickup at t=0
        let cpe = vehicle.stoplist().cpe();
        assert_eq!(cpe.location, GridLoc::new(2, 1));
        assert_eq!(cpe.estimated_arrival_time, 3.0); // 2.5 + half an edge
    }

    #[test]
    fn current_position_interpolates() {
        let mut vehicle = single_vehicle(r2(0.0, 0.0), 4);
        commit_request(&mut vehicle, request(1, 0.0, r2(4.0, 0.0), r2(8.0, 0.0)));
        vehicle.fast_forward_time(1.0);
        assert_eq!(vehicle.current_position(), r2(1.0, 0.0));
    }
}

// ── Offer / commit protocol ───────────────────────────────────────────────────

#[cfg(test)]
mod offer_commit {
    use super::*;

    // One idle vehicle at the origin: pickup immediately, dropoff after the
    // 5-unit direct leg.
    #[test]
    fn submit_then_execute_round_trip() {
        let mut fleet = fleet_at(&[(0.0, 0.0)], 4);
        let offer = fleet.submit_transportation_request(request(1, 0.0, r2(0.0, 0.0), r2(3.0, 4.0)));

        match offer {
            RequestEvent::Offer {
                timestamp,
                request_id,
                estimated_invehicle_window,
                ..
            } => {
                assert_eq!(timestamp, 0.0);
                assert_eq!(request_id, RequestId(1));
                assert_eq!(estimated_invehicle_window.min, 0.0);
                assert_eq!(estimated_invehicle_window.max, 5.0);
            }
            other => panic!("expected an offer, got {other:?}"),
        }

        // The offer alone must not touch the live stoplist.
        assert_eq!(fleet.vehicles()[0].stoplist().len(), 1);

        let outcome = fleet.execute_transportation_request(RequestId(1));
        assert!(matches!(outcome, RequestEvent::Acceptance { .. }));
        assert_eq!(fleet.vehicles()[0].stoplist().len(), 3);
    }

    #[test]
    fn trivial_request_is_rejected_without_pending_offer() {
        let mut fleet = fleet_at(&[(0.0, 0.0)], 4);
        let outcome = fleet.submit_transportation_request(request(1, 0.0, r2(2.0, 2.0), r2(2.0, 2.0)));
        assert!(outcome.is_rejection());

        // Nothing pending: a commit attempt is also rejected.
        let outcome = fleet.execute_transportation_request(RequestId(1));
        assert!(outcome.is_rejection());
    }

    #[test]
    fn unservable_request_is_rejected() {
        let mut fleet = fleet_at(&[(0.0, 0.0)], 4);
        let req = TransportationRequest::with_windows(
            RequestId(1),
            0.0,
            r2(0.0, 0.0),
            r2(5.0, 0.0),
            TimeWindow::UNBOUNDED,
            TimeWindow::new(0.0, 3.0), // 5 time units away from everything
        );
        let outcome = fleet.submit_transportation_request(req);
        assert!(outcome.is_rejection());
    }

    #[test]
    fn fast_forward_makes_the_offer_stale() {
        let mut fleet = fleet_at(&[(0.0, 0.0)], 4);
        let offer = fleet.submit_transportation_request(request(1, 0.0, r2(1.0, 0.0), r2(2.0, 0.0)));
        assert!(matches!(offer, RequestEvent::Offer { .. }));

        fleet.fast_forward(0.1);

        let outcome = fleet.execute_transportation_request(RequestId(1));
        match outcome {
            RequestEvent::Rejection { comment, .. } => assert!(comment.contains("stale")),
            other => panic!("expected a rejection, got {other:?}"),
        }
        // The proposal was never committed.
        assert_eq!(fleet.vehicles()[0].stoplist().len(), 1);
    }

    #[test]
    fn mismatched_commit_leaves_the_offer_pending() {
        let mut fleet = fleet_at(&[(0.0, 0.0)], 4);
        fleet.submit_transportation_request(request(7, 0.0, r2(1.0, 0.0), r2(2.0, 0.0)));

        assert!(fleet.execute_transportation_request(RequestId(8)).is_rejection());
        // The matching id still commits.
        let outcome = fleet.execute_transportation_request(RequestId(7));
        assert!(matches!(outcome, RequestEvent::Acceptance { .. }));
    }

    #[test]
    fn resubmission_overwrites_the_pending_offer() {
        let mut fleet = fleet_at(&[(0.0, 0.0)], 4);
        fleet.submit_transportation_request(request(1, 0.0, r2(1.0, 0.0), r2(2.0, 0.0)));
        fleet.submit_transportation_request(request(2, 0.0, r2(3.0, 0.0), r2(4.0, 0.0)));

        assert!(fleet.execute_transportation_request(RequestId(1)).is_rejection());
        assert!(matches!(
            fleet.execute_transportation_request(RequestId(2)),
            RequestEvent::Acceptance { .. }
        ));
    }

    #[test]
    fn cheapest_vehicle_wins_the_offer() {
        let mut fleet = fleet_at(&[(0.0, 0.0), (10.0, 0.0)], 4);
        fleet.submit_transportation_request(request(1, 0.0, r2(11.0, 0.0), r2(13.0, 0.0)));
        fleet.execute_transportation_request(RequestId(1));

        // The nearer vehicle (id 1) got the trip.
        assert_eq!(fleet.vehicles()[0].stoplist().len(), 1);
        assert_eq!(fleet.vehicles()[1].stoplist().len(), 3);
    }

    // Capacity 1 and a zero-slack passenger: no insertion point for a
    // request that must detour through the occupied segment.
    #[test]
    fn capacity_refusal() {
        let mut fleet = fleet_at(&[(0.0, 0.0)], 1);
        let ra = TransportationRequest::with_windows(
            RequestId(1),
            0.0,
            r2(10.0, 0.0),
            r2(20.0, 0.0),
            TimeWindow::new(0.0, 10.0),
            TimeWindow::new(0.0, 20.0),
        );
        fleet.submit_transportation_request(ra);
        fleet.execute_transportation_request(RequestId(1));

        let rb = TransportationRequest::with_windows(
            RequestId(2),
            0.0,
            r2(5.0, 1.0),
            r2(6.0, 1.0),
            TimeWindow::UNBOUNDED,
            TimeWindow::new(0.0, 25.0),
        );
        assert!(fleet.submit_transportation_request(rb).is_rejection());
    }
}

// ── Fleet fast-forward ────────────────────────────────────────────────────────

#[cfg(test)]
mod fleet_fast_forward {
    use super::*;

    fn two_vehicle_fleet_with_trips() -> TestFleet {
        let mut fleet = fleet_at(&[(0.0, 0.0), (10.0, 0.0)], 4);
        fleet.submit_transportation_request(request(1, 0.0, r2(1.0, 0.0), r2(3.0, 0.0)));
        fleet.execute_transportation_request(RequestId(1));
        fleet.submit_transportation_request(request(2, 0.0, r2(11.0, 0.0), r2(13.0, 0.0)));
        fleet.execute_transportation_request(RequestId(2));
        fleet
    }

    // Both pickups fall due at t=1; the tie is broken by vehicle id and the
    // dropoffs stay planned.
    #[test]
    fn events_merge_sorted_by_timestamp_then_vehicle() {
        let mut fleet = two_vehicle_fleet_with_trips();
        let events = fleet.fast_forward(2.0);

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].timestamp, 1.0);
        assert_eq!(events[0].vehicle_id, VehicleId(0));
        assert_eq!(events[0].action, StopAction::Pickup);
        assert_eq!(events[1].timestamp, 1.0);
        assert_eq!(events[1].vehicle_id, VehicleId(1));

        // Each CPE sits mid-leg between its pickup and dropoff.
        assert_eq!(fleet.vehicles()[0].stoplist().cpe().location, r2(2.0, 0.0));
        assert_eq!(fleet.vehicles()[1].stoplist().cpe().location, r2(12.0, 0.0));
        assert_eq!(fleet.current_time(), 2.0);
    }

    #[test]
    fn successive_fast_forwards_partition_the_stream() {
        let mut fleet = two_vehicle_fleet_with_trips();
        let first = fleet.fast_forward(1.0);
        let second = fleet.fast_forward(5.0);

        assert!(first.iter().all(|e| e.timestamp <= 1.0));
        assert!(second.iter().all(|e| e.timestamp > 1.0 && e.timestamp <= 5.0));
        assert_eq!(first.len() + second.len(), 4);
        assert!(fleet.vehicles().iter().all(|v| v.stoplist().is_idle()));
    }

    #[test]
    fn vehicle_positions_report_all_vehicles() {
        let mut fleet = two_vehicle_fleet_with_trips();
        fleet.fast_forward(2.0);
        let positions = fleet.vehicle_positions();
        assert_eq!(
            positions,
            vec![
                (VehicleId(0), r2(2.0, 0.0)),
                (VehicleId(1), r2(12.0, 0.0)),
            ]
        );
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use super::*;

    #[test]
    fn empty_fleet_is_an_error() {
        let result = FleetBuilder::new(
            Arc::new(Euclidean2D::default()),
            Arc::new(BruteForceDispatcher),
        )
        .build();
        assert!(matches!(result, Err(FleetError::NoVehicles)));
    }

    #[test]
    fn zero_capacity_is_an_error() {
        let result = FleetBuilder::new(
            Arc::new(Euclidean2D::default()),
            Arc::new(BruteForceDispatcher),
        )
        .vehicle(r2(0.0, 0.0), 4)
        .vehicle(r2(1.0, 0.0), 0)
        .build();
        assert!(matches!(
            result,
            Err(FleetError::ZeroSeatCapacity { index: 1 })
        ));
    }

    #[test]
    fn vehicles_get_sequential_ids_and_start_state() {
        let fleet = FleetBuilder::new(
            Arc::new(Euclidean2D::default()),
            Arc::new(BruteForceDispatcher),
        )
        .start_time(2.0)
        .vehicle(r2(0.0, 0.0), 4)
        .vehicle(r2(5.0, 5.0), 2)
        .build()
        .unwrap();

        assert_eq!(fleet.current_time(), 2.0);
        let ids: Vec<VehicleId> = fleet.vehicles().iter().map(|v| v.vehicle_id()).collect();
        assert_eq!(ids, vec![VehicleId(0), VehicleId(1)]);
        assert_eq!(fleet.vehicles()[1].stoplist().cpe().location, r2(5.0, 5.0));
        assert_eq!(fleet.vehicles()[1].seat_capacity(), 2);
        assert_eq!(fleet.vehicles()[1].current_time(), 2.0);
    }
}

// ── simulate ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod simulate {
    use rp_core::Event;

    use super::*;

    fn classify(events: &[Event]) -> (usize, usize, usize, usize) {
        let mut stops = 0;
        let mut offers = 0;
        let mut acceptances = 0;
        let mut rejections = 0;
        for event in events {
            match event {
                Event::Stop(_) => stops += 1,
                Event::Request(RequestEvent::Offer { .. }) => offers += 1,
                Event::Request(RequestEvent::Acceptance { .. }) => acceptances += 1,
                Event::Request(RequestEvent::Rejection { .. }) => rejections += 1,
            }
        }
        (stops, offers, acceptances, rejections)
    }

    #[test]
    fn full_stream_with_mixed_outcomes() {
        let mut fleet = fleet_at(&[(0.0, 0.0), (10.0, 0.0)], 4);
        let requests = vec![
            request(1, 0.0, r2(1.0, 0.0), r2(3.0, 0.0)),
            request(2, 0.5, r2(11.0, 0.0), r2(13.0, 0.0)),
            request(3, 1.0, r2(2.0, 0.0), r2(2.0, 0.0)), // trivial
        ];

        let events = fleet.simulate(requests, 100.0);

        let (stops, offers, acceptances, rejections) = classify(&events);
        assert_eq!(offers, 2);
        assert_eq!(acceptances, 2);
        assert_eq!(rejections, 1);
        assert_eq!(stops, 4); // two pickups + two dropoffs

        // Stop events arrive in global timestamp order.
        let stop_times: Vec<f64> = events
            .iter()
            .filter_map(|e| match e {
                Event::Stop(s) => Some(s.timestamp),
                _ => None,
            })
            .collect();
        let mut sorted = stop_times.clone();
        sorted.sort_by(f64::total_cmp);
        assert_eq!(stop_times, sorted);

        // Everything planned was serviced.
        assert!(fleet.vehicles().iter().all(|v| v.stoplist().is_idle()));
    }

    #[test]
    fn cutoff_truncates_the_run() {
        let mut fleet = fleet_at(&[(0.0, 0.0)], 4);
        let requests = vec![request(1, 0.0, r2(1.0, 0.0), r2(3.0, 0.0))];

        let events = fleet.simulate(requests, 2.0);

        let (stops, offers, acceptances, rejections) = classify(&events);
        assert_eq!((offers, acceptances, rejections), (1, 1, 0));
        assert_eq!(stops, 1); // the pickup; the dropoff lies past the cutoff
        assert_eq!(fleet.current_time(), 2.0);
        assert_eq!(fleet.vehicles()[0].stoplist().len(), 2);
    }

    #[test]
    fn requests_beyond_cutoff_are_ignored() {
        let mut fleet = fleet_at(&[(0.0, 0.0)], 4);
        let requests = vec![
            request(1, 0.0, r2(1.0, 0.0), r2(2.0, 0.0)),
            request(2, 50.0, r2(1.0, 0.0), r2(2.0, 0.0)), // after cutoff
        ];
        let events = fleet.simulate(requests, 10.0);
        let (_, offers, _, _) = classify(&events);
        assert_eq!(offers, 1);
    }
}
