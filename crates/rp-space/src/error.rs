//! Space construction errors.

use thiserror::Error;

use crate::loc::NodeId;

/// Errors raised while building a [`GraphSpace`](crate::GraphSpace).
///
/// Query-time "failures" (unreachable destinations) are not errors: they
/// surface as infinite distances, which the dispatcher treats as
/// infeasibility.
#[derive(Debug, Error)]
pub enum SpaceError {
    #[error("edge endpoint {node} out of bounds for graph with {node_count} nodes")]
    NodeOutOfBounds { node: NodeId, node_count: usize },

    #[error("edge {from} -> {to} has non-finite or negative weight {weight}")]
    BadEdgeWeight { from: NodeId, to: NodeId, weight: f64 },

    #[error("graph has no nodes")]
    EmptyGraph,
}
