//! The Euclidean plane with constant velocity.

use crate::loc::R2Loc;
use crate::space::TransportSpace;

/// ℝ² with the straight-line metric.  Vehicles drive anywhere on the plane;
/// interpolation is the linear convex combination of the endpoints and the
/// jump distance is always zero.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Euclidean2D {
    velocity: f64,
}

impl Euclidean2D {
    /// # Panics
    /// Panics if `velocity` is not strictly positive.
    pub fn new(velocity: f64) -> Self {
        assert!(velocity > 0.0, "velocity must be positive, got {velocity}");
        Self { velocity }
    }

    #[inline]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }
}

impl Default for Euclidean2D {
    /// Unit velocity: distances and travel times coincide.
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl TransportSpace for Euclidean2D {
    type Loc = R2Loc;

    #[inline]
    fn d(&self, u: &R2Loc, v: &R2Loc) -> f64 {
        (*v - *u).norm()
    }

    #[inline]
    fn t(&self, u: &R2Loc, v: &R2Loc) -> f64 {
        self.d(u, v) / self.velocity
    }

    fn interp_dist(&self, u: &R2Loc, v: &R2Loc, dist_to_dest: f64) -> (R2Loc, f64) {
        let total = self.d(u, v);
        if dist_to_dest <= 0.0 || total == 0.0 {
            return (*v, 0.0);
        }
        if dist_to_dest >= total {
            return (*u, 0.0);
        }
        (*v - (*v - *u) * (dist_to_dest / total), 0.0)
    }

    fn interp_time(&self, u: &R2Loc, v: &R2Loc, time_to_dest: f64) -> (R2Loc, f64) {
        self.interp_dist(u, v, time_to_dest * self.velocity)
    }
}
