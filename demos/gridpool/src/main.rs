//! gridpool — smallest end-to-end example for the rust_rp simulator.
//!
//! Ten vehicles pool eighty random requests on a 20x20 unit grid.  Run with
//! `RUST_LOG=debug` to watch the dispatcher's insertion decisions.

use anyhow::Result;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use rp_core::{Event, RequestEvent, RequestId, TransportationRequest};
use rp_dispatch::BruteForceDispatcher;
use rp_fleet::FleetBuilder;
use rp_space::{GridLoc, SquareGrid};
use std::sync::Arc;

// ── Constants ─────────────────────────────────────────────────────────────────

const GRID_EXTENT: i32 = 20;
const VEHICLE_COUNT: usize = 10;
const SEAT_CAPACITY: u32 = 4;
const REQUEST_COUNT: usize = 80;
const MEAN_INTERARRIVAL: f64 = 1.5;
const SEED: u64 = 42;

fn random_node(rng: &mut SmallRng) -> GridLoc {
    GridLoc::new(rng.gen_range(0..=GRID_EXTENT), rng.gen_range(0..=GRID_EXTENT))
}

/// Uniform origin/destination pairs with exponential inter-arrival times.
fn generate_requests(rng: &mut SmallRng) -> Vec<TransportationRequest<GridLoc>> {
    let mut requests = Vec::with_capacity(REQUEST_COUNT);
    let mut t = 0.0f64;
    for id in 0..REQUEST_COUNT {
        t += -MEAN_INTERARRIVAL * (1.0 - rng.gen_range(0.0f64..1.0)).ln();
        let origin = random_node(rng);
        let destination = loop {
            let candidate = random_node(rng);
            if candidate != origin {
                break candidate;
            }
        };
        requests.push(TransportationRequest::new(
            RequestId(id as u64),
            t,
            origin,
            destination,
        ));
    }
    requests
}

fn main() -> Result<()> {
    env_logger::init();
    let mut rng = SmallRng::seed_from_u64(SEED);

    let space = Arc::new(SquareGrid::new(1.0, 1.0));
    let dispatcher = Arc::new(BruteForceDispatcher);
    let mut fleet = FleetBuilder::new(space, dispatcher)
        .vehicles_at((0..VEHICLE_COUNT).map(|_| random_node(&mut rng)), SEAT_CAPACITY)
        .build()?;

    let requests = generate_requests(&mut rng);
    let events = fleet.simulate(requests, f64::INFINITY);

    let mut pickups = 0;
    let mut dropoffs = 0;
    let mut accepted = 0;
    let mut rejected = 0;
    let mut last_timestamp: f64 = 0.0;
    for event in &events {
        match event {
            Event::Stop(stop) => {
                last_timestamp = last_timestamp.max(stop.timestamp);
                match stop.action {
                    rp_core::StopAction::Pickup => pickups += 1,
                    rp_core::StopAction::Dropoff => dropoffs += 1,
                    rp_core::StopAction::Internal => {}
                }
            }
            Event::Request(RequestEvent::Acceptance { .. }) => accepted += 1,
            Event::Request(RequestEvent::Rejection { .. }) => rejected += 1,
            Event::Request(RequestEvent::Offer { .. }) => {}
        }
    }

    println!("simulated {} events", events.len());
    println!("  accepted requests: {accepted}");
    println!("  rejected requests: {rejected}");
    println!("  pickups/dropoffs:  {pickups}/{dropoffs}");
    println!("  last stop at t = {last_timestamp:.2}");

    Ok(())
}
