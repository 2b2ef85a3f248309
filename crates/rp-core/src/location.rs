//! The `Location` capability trait.
//!
//! The whole simulator is polymorphic over the location type: a point in the
//! plane, an integer lattice coordinate, a graph node id — anything a
//! transport space can measure distances between.  The core only ever needs
//! to *store*, *clone* and *compare* locations; all geometry lives behind
//! the `TransportSpace` trait in `rp-space`.

/// Capability bundle required of a location type.
///
/// Blanket-implemented for every type with value semantics, so downstream
/// crates never implement it by hand.  `Send + Sync` is part of the bundle
/// because per-vehicle dispatcher queries may run on a worker pool.
pub trait Location: Clone + PartialEq + Send + Sync + 'static {}

impl<T> Location for T where T: Clone + PartialEq + Send + Sync + 'static {}
