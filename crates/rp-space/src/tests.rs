//! Unit tests for the reference transport spaces.

use crate::{
    Euclidean2D, GraphSpace, GraphSpaceBuilder, GridLoc, Manhattan2D, NodeId, R2Loc, SquareGrid,
    TransportSpace,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn r2(x: f64, y: f64) -> R2Loc {
    R2Loc::new(x, y)
}

fn gl(x: i32, y: i32) -> GridLoc {
    GridLoc::new(x, y)
}

/// Laws every space must uphold, checked at a handful of probe points.
fn assert_space_laws<S: TransportSpace>(space: &S, u: S::Loc, v: S::Loc, velocity: f64)
where
    S::Loc: std::fmt::Debug,
{
    assert_eq!(space.d(&u, &u), 0.0);
    assert_eq!(space.d(&v, &v), 0.0);
    let d = space.d(&u, &v);
    let t = space.t(&u, &v);
    assert!((t - d / velocity).abs() < 1e-12, "t != d / velocity");

    // Zero remaining distance: the vehicle is at the destination.
    assert_eq!(space.interp_dist(&u, &v, 0.0), (v.clone(), 0.0));
    // Degenerate journey.
    assert_eq!(space.interp_dist(&u, &u, 1.0), (u.clone(), 0.0));
    // More remaining than the whole trip: not yet departed.
    assert_eq!(space.interp_dist(&u, &v, d + 1.0), (u.clone(), 0.0));
}

// ── Euclidean2D ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod euclidean {
    use super::*;

    #[test]
    fn laws() {
        assert_space_laws(&Euclidean2D::default(), r2(0.0, 0.0), r2(3.0, 4.0), 1.0);
        assert_space_laws(&Euclidean2D::new(2.0), r2(-1.0, 2.0), r2(2.0, -2.0), 2.0);
    }

    #[test]
    fn pythagorean_distance() {
        let space = Euclidean2D::default();
        assert_eq!(space.d(&r2(0.0, 0.0), &r2(3.0, 4.0)), 5.0);
    }

    #[test]
    fn velocity_scales_time() {
        let space = Euclidean2D::new(2.0);
        assert_eq!(space.t(&r2(0.0, 0.0), &r2(3.0, 4.0)), 2.5);
    }

    #[test]
    fn interpolation_is_linear() {
        let space = Euclidean2D::default();
        let (mid, jump) = space.interp_dist(&r2(0.0, 0.0), &r2(3.0, 4.0), 2.5);
        assert_eq!(jump, 0.0);
        assert!((mid.x - 1.5).abs() < 1e-12);
        assert!((mid.y - 2.0).abs() < 1e-12);
    }

    #[test]
    fn interp_time_uses_velocity() {
        let space = Euclidean2D::new(2.0);
        // 1 time unit from destination = 2 distance units from destination.
        let (pos, jump) = space.interp_time(&r2(0.0, 0.0), &r2(10.0, 0.0), 1.0);
        assert_eq!(jump, 0.0);
        assert!((pos.x - 8.0).abs() < 1e-12);
    }
}

// ── Manhattan2D ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod manhattan {
    use super::*;

    #[test]
    fn laws() {
        assert_space_laws(&Manhattan2D::default(), r2(0.0, 0.0), r2(2.0, 3.0), 1.0);
    }

    #[test]
    fn l1_distance() {
        let space = Manhattan2D::default();
        assert_eq!(space.d(&r2(0.0, 0.0), &r2(2.0, 3.0)), 5.0);
        assert_eq!(space.d(&r2(1.0, 1.0), &r2(-1.0, -1.0)), 4.0);
    }

    // Interpolation convention: the x extent is traversed first, then y.
    #[test]
    fn interpolation_walks_x_axis_first() {
        let space = Manhattan2D::default();
        // 1 unit into the journey (0,0) -> (2,3): still on the x leg.
        let (pos, jump) = space.interp_dist(&r2(0.0, 0.0), &r2(2.0, 3.0), 4.0);
        assert_eq!(jump, 0.0);
        assert_eq!(pos, r2(1.0, 0.0));
        // 3 units in: x leg exhausted, 1 unit up the y leg.
        let (pos, _) = space.interp_dist(&r2(0.0, 0.0), &r2(2.0, 3.0), 2.0);
        assert_eq!(pos, r2(2.0, 1.0));
    }

    #[test]
    fn interpolation_handles_negative_direction() {
        let space = Manhattan2D::default();
        let (pos, _) = space.interp_dist(&r2(2.0, 3.0), &r2(0.0, 0.0), 4.0);
        assert_eq!(pos, r2(1.0, 3.0));
    }
}

// ── SquareGrid ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod square_grid {
    use super::*;

    #[test]
    fn laws() {
        assert_space_laws(&SquareGrid::default(), gl(0, 0), gl(2, 3), 1.0);
        assert_space_laws(&SquareGrid::new(0.5, 2.0), gl(-1, 4), gl(3, 0), 2.0);
    }

    #[test]
    fn distance_scales_with_grid_size() {
        let space = SquareGrid::new(2.0, 1.0);
        assert_eq!(space.d(&gl(0, 0), &gl(2, 3)), 10.0);
    }

    // The x-first path from (0,0) to (2,3) passes (1,0), (2,0), (2,1),
    // (2,2).  With 2.5 to go the vehicle is between (2,0) and (2,1): the
    // next node is (2,1), half an edge away.
    #[test]
    fn interp_reports_next_node_and_residual() {
        let space = SquareGrid::default();
        assert_eq!(space.interp_dist(&gl(0, 0), &gl(2, 3), 2.5), (gl(2, 1), 0.5));
    }

    #[test]
    fn interp_at_exact_node_has_zero_residual() {
        let space = SquareGrid::default();
        assert_eq!(space.interp_dist(&gl(0, 0), &gl(2, 3), 2.0), (gl(2, 1), 0.0));
        assert_eq!(space.interp_dist(&gl(0, 0), &gl(2, 3), 3.0), (gl(2, 0), 0.0));
    }

    #[test]
    fn interp_on_x_leg() {
        let space = SquareGrid::default();
        // 4.5 to go on a length-5 trip: half an edge past the origin.
        assert_eq!(space.interp_dist(&gl(0, 0), &gl(2, 3), 4.5), (gl(1, 0), 0.5));
    }

    #[test]
    fn interp_time_scales_by_velocity() {
        let space = SquareGrid::new(1.0, 2.0);
        // 1.25 time units = 2.5 distance units from the destination.
        let (node, jump_time) = space.interp_time(&gl(0, 0), &gl(2, 3), 1.25);
        assert_eq!(node, gl(2, 1));
        assert!((jump_time - 0.25).abs() < 1e-12);
    }

    #[test]
    fn interp_negative_directions() {
        let space = SquareGrid::default();
        // (3,2) -> (0,0): x-first path 3 left then 2 down, total 5.
        assert_eq!(space.interp_dist(&gl(3, 2), &gl(0, 0), 1.5), (gl(0, 1), 0.5));
    }
}

// ── GraphSpace ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod graph {
    use super::*;

    /// 0 --1.0-- 1 --1.0-- 2 --1.0-- 3 (undirected chain), plus a 5.0
    /// shortcut 0 -> 3 that Dijkstra must ignore.
    fn chain() -> GraphSpace {
        let mut b = GraphSpaceBuilder::new(1.0);
        let n0 = b.add_node();
        let n1 = b.add_node();
        let n2 = b.add_node();
        let n3 = b.add_node();
        b.add_link(n0, n1, 1.0);
        b.add_link(n1, n2, 1.0);
        b.add_link(n2, n3, 1.0);
        b.add_edge(n0, n3, 5.0);
        b.build().unwrap()
    }

    #[test]
    fn laws() {
        assert_space_laws(&chain(), NodeId(0), NodeId(3), 1.0);
    }

    #[test]
    fn shortest_path_distance() {
        let space = chain();
        assert_eq!(space.d(&NodeId(0), &NodeId(3)), 3.0);
        assert_eq!(
            space.shortest_path_nodes(NodeId(0), NodeId(3)),
            vec![NodeId(0), NodeId(1), NodeId(2), NodeId(3)]
        );
    }

    #[test]
    fn directed_distances_may_differ() {
        let mut b = GraphSpaceBuilder::new(1.0);
        let n0 = b.add_node();
        let n1 = b.add_node();
        let n2 = b.add_node();
        b.add_edge(n0, n1, 1.0);
        b.add_edge(n1, n2, 1.0);
        b.add_edge(n2, n0, 10.0);
        let space = b.build().unwrap();
        assert_eq!(space.d(&NodeId(0), &NodeId(2)), 2.0);
        assert_eq!(space.d(&NodeId(2), &NodeId(0)), 10.0);
    }

    #[test]
    fn unreachable_is_infinite() {
        let mut b = GraphSpaceBuilder::new(1.0);
        let n0 = b.add_node();
        let n1 = b.add_node();
        b.add_edge(n0, n1, 1.0); // one-way
        let space = b.build().unwrap();
        assert_eq!(space.d(&NodeId(1), &NodeId(0)), f64::INFINITY);
    }

    #[test]
    fn interp_reports_next_path_node() {
        let space = chain();
        // 1.5 from node 3 on the path 0-1-2-3: between 1 and 2.
        assert_eq!(
            space.interp_dist(&NodeId(0), &NodeId(3), 1.5),
            (NodeId(2), 0.5)
        );
        // Exactly at node 2.
        assert_eq!(
            space.interp_dist(&NodeId(0), &NodeId(3), 1.0),
            (NodeId(2), 0.0)
        );
    }

    #[test]
    fn repeated_queries_hit_cache_and_agree() {
        let space = chain();
        let first = space.d(&NodeId(0), &NodeId(3));
        for _ in 0..10 {
            assert_eq!(space.d(&NodeId(0), &NodeId(3)), first);
        }
    }

    #[test]
    fn builder_rejects_bad_input() {
        let b = GraphSpaceBuilder::new(1.0);
        assert!(b.build().is_err()); // no nodes

        let mut b = GraphSpaceBuilder::new(1.0);
        let n0 = b.add_node();
        b.add_edge(n0, NodeId(7), 1.0);
        assert!(b.build().is_err()); // endpoint out of bounds

        let mut b = GraphSpaceBuilder::new(1.0);
        let n0 = b.add_node();
        let n1 = b.add_node();
        b.add_edge(n0, n1, -2.0);
        assert!(b.build().is_err()); // negative weight
    }

    #[test]
    fn velocity_scales_time_and_interp() {
        let mut b = GraphSpaceBuilder::new(2.0);
        let n0 = b.add_node();
        let n1 = b.add_node();
        b.add_link(n0, n1, 4.0);
        let space = b.build().unwrap();
        assert_eq!(space.t(&NodeId(0), &NodeId(1)), 2.0);
        // 1 time unit out = 2 distance units out.
        assert_eq!(
            space.interp_time(&NodeId(0), &NodeId(1), 1.0),
            (NodeId(1), 1.0)
        );
    }
}
