//! Directed weighted graph space with shortest-path routing.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a node `n`, its outgoing edges occupy the index range
//! `out_start[n] .. out_start[n+1]` of the edge arrays.  Iteration over a
//! node's outgoing edges is therefore a contiguous memory scan — ideal for
//! Dijkstra's inner loop.
//!
//! # Memoisation
//!
//! `d` and `interp_*` all reduce to one shortest-path query.  Query results
//! (total distance + node sequence) are cached in a bounded map behind a
//! mutex, so repeated dispatcher probes against the same stoplist hit the
//! cache.  When the cache is full it is cleared wholesale rather than
//! tracking per-entry recency.

use std::collections::{BinaryHeap, HashMap};
use std::cmp::Reverse;
use std::sync::{Arc, Mutex};

use ordered_float::OrderedFloat;

use crate::error::SpaceError;
use crate::loc::NodeId;
use crate::space::TransportSpace;

/// Entries kept in the shortest-path cache before it is flushed.
const PATH_CACHE_CAPACITY: usize = 16_384;

// ── ShortestPath ──────────────────────────────────────────────────────────────

/// A resolved shortest-path query.
#[derive(Debug, Clone)]
struct ShortestPath {
    /// Sum of edge weights along `nodes`; `f64::INFINITY` when the
    /// destination is unreachable (then `nodes` is empty).
    total: f64,
    /// Node sequence from source to destination, both inclusive.
    nodes: Vec<NodeId>,
}

// ── GraphSpace ────────────────────────────────────────────────────────────────

/// A directed weighted graph in CSR form.
///
/// Locations are [`NodeId`]s; `d` is the shortest-path distance and
/// interpolation walks the shortest path.  Distances need not be symmetric.
/// Build via [`GraphSpaceBuilder`].
pub struct GraphSpace {
    node_count: usize,
    velocity: f64,

    /// CSR row pointer; outgoing edges of node `n` are at
    /// `out_start[n] .. out_start[n+1]`.  Length `node_count + 1`.
    out_start: Vec<u32>,
    edge_to: Vec<NodeId>,
    edge_weight: Vec<f64>,

    path_cache: Mutex<HashMap<(NodeId, NodeId), Arc<ShortestPath>>>,
}

impl GraphSpace {
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    #[inline]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// The node sequence of a shortest path from `u` to `v`, both inclusive;
    /// empty when `v` is unreachable.
    pub fn shortest_path_nodes(&self, u: NodeId, v: NodeId) -> Vec<NodeId> {
        self.shortest_path(u, v).nodes.clone()
    }

    fn shortest_path(&self, u: NodeId, v: NodeId) -> Arc<ShortestPath> {
        {
            let cache = self.path_cache.lock().expect("path cache poisoned");
            if let Some(hit) = cache.get(&(u, v)) {
                return Arc::clone(hit);
            }
        }

        let resolved = Arc::new(self.dijkstra(u, v));

        let mut cache = self.path_cache.lock().expect("path cache poisoned");
        if cache.len() >= PATH_CACHE_CAPACITY {
            cache.clear();
        }
        cache.insert((u, v), Arc::clone(&resolved));
        resolved
    }

    fn dijkstra(&self, from: NodeId, to: NodeId) -> ShortestPath {
        if from == to {
            return ShortestPath {
                total: 0.0,
                nodes: vec![from],
            };
        }

        let n = self.node_count;
        let mut dist = vec![f64::INFINITY; n];
        // prev[v] = predecessor node on the best known path; usize::MAX = none.
        let mut prev = vec![usize::MAX; n];
        dist[from.index()] = 0.0;

        // Min-heap via Reverse; the NodeId secondary key makes tie-breaking
        // deterministic.
        let mut heap: BinaryHeap<Reverse<(OrderedFloat<f64>, NodeId)>> = BinaryHeap::new();
        heap.push(Reverse((OrderedFloat(0.0), from)));

        while let Some(Reverse((OrderedFloat(cost), node))) = heap.pop() {
            if node == to {
                return self.reconstruct(prev, from, to, cost);
            }
            // Skip stale heap entries.
            if cost > dist[node.index()] {
                continue;
            }

            let start = self.out_start[node.index()] as usize;
            let end = self.out_start[node.index() + 1] as usize;
            for e in start..end {
                let neighbor = self.edge_to[e];
                let new_cost = cost + self.edge_weight[e];
                if new_cost < dist[neighbor.index()] {
                    dist[neighbor.index()] = new_cost;
                    prev[neighbor.index()] = node.index();
                    heap.push(Reverse((OrderedFloat(new_cost), neighbor)));
                }
            }
        }

        ShortestPath {
            total: f64::INFINITY,
            nodes: vec![],
        }
    }

    fn reconstruct(&self, prev: Vec<usize>, from: NodeId, to: NodeId, total: f64) -> ShortestPath {
        let mut nodes = vec![to];
        let mut cur = to.index();
        while cur != from.index() {
            cur = prev[cur];
            nodes.push(NodeId(cur as u32));
        }
        nodes.reverse();
        ShortestPath { total, nodes }
    }

    /// Weight of the direct edge `a -> b`.
    ///
    /// # Panics
    /// Panics if no such edge exists — callers only ever ask about adjacent
    /// path nodes.
    fn edge_weight_between(&self, a: NodeId, b: NodeId) -> f64 {
        let start = self.out_start[a.index()] as usize;
        let end = self.out_start[a.index() + 1] as usize;
        (start..end)
            .find(|&e| self.edge_to[e] == b)
            .map(|e| self.edge_weight[e])
            .unwrap_or_else(|| panic!("no edge {a} -> {b}"))
    }
}

impl TransportSpace for GraphSpace {
    type Loc = NodeId;

    fn d(&self, u: &NodeId, v: &NodeId) -> f64 {
        self.shortest_path(*u, *v).total
    }

    fn t(&self, u: &NodeId, v: &NodeId) -> f64 {
        self.d(u, v) / self.velocity
    }

    fn interp_dist(&self, u: &NodeId, v: &NodeId, dist_to_dest: f64) -> (NodeId, f64) {
        if u == v || dist_to_dest <= 0.0 {
            return (*v, 0.0);
        }

        let path = self.shortest_path(*u, *v);
        if path.total <= dist_to_dest {
            return (*u, 0.0);
        }

        // Walk the path backward from the destination, accumulating suffix
        // distance until it covers `dist_to_dest`.  The vehicle sits on the
        // edge where the threshold is crossed; exactly hitting a node means
        // the vehicle is at that node.
        let mut suffix = 0.0;
        for pair in path.nodes.windows(2).rev() {
            let (a, b) = (pair[0], pair[1]);
            let with_edge = suffix + self.edge_weight_between(a, b);
            if with_edge >= dist_to_dest {
                if with_edge > dist_to_dest {
                    return (b, dist_to_dest - suffix);
                }
                return (a, 0.0);
            }
            suffix = with_edge;
        }

        // Unreachable: path.total > dist_to_dest guarantees the loop crosses
        // the threshold.
        (*u, 0.0)
    }

    fn interp_time(&self, u: &NodeId, v: &NodeId, time_to_dest: f64) -> (NodeId, f64) {
        let (node, jump_dist) = self.interp_dist(u, v, time_to_dest * self.velocity);
        (node, jump_dist / self.velocity)
    }
}

// ── GraphSpaceBuilder ─────────────────────────────────────────────────────────

/// Construct a [`GraphSpace`] incrementally, then call [`build`](Self::build).
///
/// The builder accepts nodes and directed edges in any order; `build()`
/// validates endpoints and weights, sorts edges by source node and lays out
/// the CSR arrays.
///
/// # Example
///
/// ```
/// use rp_space::GraphSpaceBuilder;
///
/// let mut b = GraphSpaceBuilder::new(1.0);
/// let n0 = b.add_node();
/// let n1 = b.add_node();
/// b.add_link(n0, n1, 2.5); // both directions
/// let space = b.build().unwrap();
/// assert_eq!(space.edge_count(), 2);
/// ```
pub struct GraphSpaceBuilder {
    velocity: f64,
    node_count: usize,
    raw_edges: Vec<(NodeId, NodeId, f64)>,
}

impl GraphSpaceBuilder {
    pub fn new(velocity: f64) -> Self {
        assert!(velocity > 0.0, "velocity must be positive, got {velocity}");
        Self {
            velocity,
            node_count: 0,
            raw_edges: Vec::new(),
        }
    }

    /// Add a node and return its id (sequential from 0).
    pub fn add_node(&mut self) -> NodeId {
        let id = NodeId(self.node_count as u32);
        self.node_count += 1;
        id
    }

    /// Add `n` nodes at once, returning the id of the first.
    pub fn add_nodes(&mut self, n: usize) -> NodeId {
        let first = NodeId(self.node_count as u32);
        self.node_count += n;
        first
    }

    /// Add a **directed** edge with the given weight (distance units).
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, weight: f64) {
        self.raw_edges.push((from, to, weight));
    }

    /// Convenience: add edges in both directions for an undirected link.
    pub fn add_link(&mut self, a: NodeId, b: NodeId, weight: f64) {
        self.add_edge(a, b, weight);
        self.add_edge(b, a, weight);
    }

    /// Validate and lay out the CSR arrays.
    pub fn build(self) -> Result<GraphSpace, SpaceError> {
        if self.node_count == 0 {
            return Err(SpaceError::EmptyGraph);
        }
        for &(from, to, weight) in &self.raw_edges {
            for node in [from, to] {
                if node.index() >= self.node_count {
                    return Err(SpaceError::NodeOutOfBounds {
                        node,
                        node_count: self.node_count,
                    });
                }
            }
            if !weight.is_finite() || weight < 0.0 {
                return Err(SpaceError::BadEdgeWeight { from, to, weight });
            }
        }

        let mut raw = self.raw_edges;
        raw.sort_unstable_by_key(|&(from, _, _)| from);

        let edge_to: Vec<NodeId> = raw.iter().map(|&(_, to, _)| to).collect();
        let edge_weight: Vec<f64> = raw.iter().map(|&(_, _, w)| w).collect();

        let mut out_start = vec![0u32; self.node_count + 1];
        for &(from, _, _) in &raw {
            out_start[from.index() + 1] += 1;
        }
        for i in 1..=self.node_count {
            out_start[i] += out_start[i - 1];
        }
        debug_assert_eq!(out_start[self.node_count] as usize, edge_to.len());

        Ok(GraphSpace {
            node_count: self.node_count,
            velocity: self.velocity,
            out_start,
            edge_to,
            edge_weight,
            path_cache: Mutex::new(HashMap::new()),
        })
    }
}
