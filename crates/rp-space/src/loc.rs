//! Concrete location types for the reference spaces.

use std::fmt;
use std::ops::{Add, Mul, Sub};

// ── R2Loc ─────────────────────────────────────────────────────────────────────

/// A point in the real plane, used by [`Euclidean2D`](crate::Euclidean2D)
/// and [`Manhattan2D`](crate::Manhattan2D).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct R2Loc {
    pub x: f64,
    pub y: f64,
}

impl R2Loc {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean norm.
    #[inline]
    pub fn norm(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// ℓ₁ norm.
    #[inline]
    pub fn l1_norm(self) -> f64 {
        self.x.abs() + self.y.abs()
    }
}

impl Add for R2Loc {
    type Output = R2Loc;
    #[inline]
    fn add(self, rhs: R2Loc) -> R2Loc {
        R2Loc::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for R2Loc {
    type Output = R2Loc;
    #[inline]
    fn sub(self, rhs: R2Loc) -> R2Loc {
        R2Loc::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for R2Loc {
    type Output = R2Loc;
    #[inline]
    fn mul(self, k: f64) -> R2Loc {
        R2Loc::new(self.x * k, self.y * k)
    }
}

impl From<(f64, f64)> for R2Loc {
    #[inline]
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for R2Loc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ── GridLoc ───────────────────────────────────────────────────────────────────

/// A node of the integer lattice, used by [`SquareGrid`](crate::SquareGrid).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridLoc {
    pub x: i32,
    pub y: i32,
}

impl GridLoc {
    #[inline]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Number of lattice edges on a shortest path to `other` (ℓ₁ distance in
    /// edge units, before scaling by the grid size).
    #[inline]
    pub fn l1_edges(self, other: GridLoc) -> u64 {
        self.x.abs_diff(other.x) as u64 + self.y.abs_diff(other.y) as u64
    }
}

impl From<(i32, i32)> for GridLoc {
    #[inline]
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for GridLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ── NodeId ────────────────────────────────────────────────────────────────────

/// Index of a node in a [`GraphSpace`](crate::GraphSpace).
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub u32);

impl NodeId {
    /// Cast to `usize` for direct use as a `Vec` index.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}
