//! The plane with the ℓ₁ (taxicab) metric.

use crate::loc::R2Loc;
use crate::space::TransportSpace;

/// ℝ² with the ℓ₁-induced metric.
///
/// # Interpolation convention
///
/// Between two points a vehicle traverses the full x extent first, then the
/// y extent.  Any monotone staircase realises the same ℓ₁ length; one
/// concrete path has to be picked for interpolation to be well defined, and
/// the tests pin this one down.  The interpolated position is exact (this is
/// still a continuous space), so the jump distance is always zero.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Manhattan2D {
    velocity: f64,
}

impl Manhattan2D {
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

impl Default for Manhattan2D {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl TransportSpace for Manhattan2D {
    type Loc = R2Loc;

    #[inline]
    fn d(&self, u: &R2Loc, v: &R2Loc) -> f64 {
        (*v - *u).l1_norm()
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

        let traveled = total - dist_to_dest;
        let x_extent = (v.x - u.x).abs();
        let pos = if traveled <= x_extent {
            R2Loc::new(u.x + (v.x - u.x).signum() * traveled, u.y)
        } else {
            R2Loc::new(v.x, u.y + (v.y - u.y).signum() * (traveled - x_extent))
        };
        (pos, 0.0)
    }

    fn interp_time(&self, u: &R2Loc, v: &R2Loc, time_to_dest: f64) -> (R2Loc, f64) {
        self.interp_dist(u, v, time_to_dest * self.velocity)
    }
}
