//! The integer lattice with uniform edge length.

use crate::loc::GridLoc;
use crate::space::TransportSpace;

/// A square lattice with edge length `grid_size` and constant velocity.
///
/// Distances are `grid_size * ℓ₁`; vehicles move along lattice edges and a
/// shortest path traverses the full x extent first, then the y extent (the
/// same convention as [`Manhattan2D`](crate::Manhattan2D)).  Since locations
/// are discrete, interpolation reports the *next* lattice node on that path
/// together with the residual distance (`< grid_size`) still to cover on the
/// current edge.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SquareGrid {
    grid_size: f64,
    velocity: f64,
}

impl SquareGrid {
    /// # Panics
    /// Panics if `grid_size` or `velocity` is not strictly positive.
    pub fn new(grid_size: f64, velocity: f64) -> Self {
        assert!(grid_size > 0.0, "grid size must be positive, got {grid_size}");
        assert!(velocity > 0.0, "velocity must be positive, got {velocity}");
        Self {
            grid_size,
            velocity,
        }
    }

    #[inline]
    pub fn grid_size(&self) -> f64 {
        self.grid_size
    }

    #[inline]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }
}

impl Default for SquareGrid {
    /// Unit grid, unit velocity.
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

impl TransportSpace for SquareGrid {
    type Loc = GridLoc;

    #[inline]
    fn d(&self, u: &GridLoc, v: &GridLoc) -> f64 {
        self.grid_size * u.l1_edges(*v) as f64
    }

    #[inline]
    fn t(&self, u: &GridLoc, v: &GridLoc) -> f64 {
        self.d(u, v) / self.velocity
    }

    fn interp_dist(&self, u: &GridLoc, v: &GridLoc, dist_to_dest: f64) -> (GridLoc, f64) {
        let total = self.d(u, v);
        if dist_to_dest <= 0.0 || total == 0.0 {
            return (*v, 0.0);
        }
        if dist_to_dest >= total {
            return (*u, 0.0);
        }

        let g = self.grid_size;
        let traveled = total - dist_to_dest;
        let x_extent = g * u.x.abs_diff(v.x) as f64;

        // Next node after `traveled` on the x-first lattice path; an exact
        // node position yields that node with zero residual.
        if traveled <= x_extent {
            let edges = (traveled / g).ceil();
            let step = if v.x >= u.x { 1 } else { -1 };
            let node = GridLoc::new(u.x + step * edges as i32, u.y);
            (node, edges * g - traveled)
        } else {
            let y_traveled = traveled - x_extent;
            let edges = (y_traveled / g).ceil();
            let step = if v.y >= u.y { 1 } else { -1 };
            let node = GridLoc::new(v.x, u.y + step * edges as i32);
            (node, edges * g - y_traveled)
        }
    }

    fn interp_time(&self, u: &GridLoc, v: &GridLoc, time_to_dest: f64) -> (GridLoc, f64) {
        let (node, jump_dist) = self.interp_dist(u, v, time_to_dest * self.velocity);
        (node, jump_dist / self.velocity)
    }
}
