//! Fluent builder for constructing a [`FleetState`].

use std::sync::Arc;

use rp_core::{Time, VehicleId};
use rp_dispatch::Dispatcher;
use rp_space::TransportSpace;

use crate::error::{FleetError, FleetResult};
use crate::fleet::FleetState;
use crate::vehicle::VehicleState;

/// Fluent builder for [`FleetState`].
///
/// # Example
///
/// ```rust,ignore
/// let space = Arc::new(Euclidean2D::default());
/// let dispatcher = Arc::new(BruteForceDispatcher);
/// let mut fleet = FleetBuilder::new(space, dispatcher)
///     .vehicle(R2Loc::new(0.0, 0.0), 4)
///     .vehicle(R2Loc::new(5.0, 5.0), 4)
///     .build()?;
/// ```
pub struct FleetBuilder<S: TransportSpace, D: Dispatcher<S>> {
    space: Arc<S>,
    dispatcher: Arc<D>,
    start_time: Time,
    vehicles: Vec<(S::Loc, u32)>,
}

impl<S: TransportSpace, D: Dispatcher<S>> FleetBuilder<S, D> {
    pub fn new(space: Arc<S>, dispatcher: Arc<D>) -> Self {
        Self {
            space,
            dispatcher,
            start_time: 0.0,
            vehicles: Vec::new(),
        }
    }

    /// Simulation time at which all vehicles come into existence.
    /// Default: 0.
    pub fn start_time(mut self, t: Time) -> Self {
        self.start_time = t;
        self
    }

    /// Add one vehicle parked at `location` with the given seat capacity.
    /// Vehicle ids are assigned sequentially in call order.
    pub fn vehicle(mut self, location: S::Loc, seat_capacity: u32) -> Self {
        self.vehicles.push((location, seat_capacity));
        self
    }

    /// Add a homogeneous batch of vehicles, one per location.
    pub fn vehicles_at(
        mut self,
        locations: impl IntoIterator<Item = S::Loc>,
        seat_capacity: u32,
    ) -> Self {
        for location in locations {
            self.vehicles.push((location, seat_capacity));
        }
        self
    }

    /// Validate and assemble the fleet.
    pub fn build(self) -> FleetResult<FleetState<S, D>> {
        if self.vehicles.is_empty() {
            return Err(FleetError::NoVehicles);
        }
        if let Some(index) = self.vehicles.iter().position(|&(_, cap)| cap == 0) {
            return Err(FleetError::ZeroSeatCapacity { index });
        }

        let vehicles = self
            .vehicles
            .into_iter()
            .enumerate()
            .map(|(i, (location, seat_capacity))| {
                VehicleState::new(
                    VehicleId(i as u32),
                    location,
                    seat_capacity,
                    Arc::clone(&self.space),
                    Arc::clone(&self.dispatcher),
                    self.start_time,
                )
            })
            .collect();

        Ok(FleetState::from_vehicles(
            vehicles,
            self.space,
            self.dispatcher,
            self.start_time,
        ))
    }
}
