//! The `Dispatcher` trait and its result type.

use std::sync::Arc;

use rp_core::{Location, Stoplist, TimeWindow, TransportationRequest};
use rp_space::TransportSpace;

// ── InsertionResult ───────────────────────────────────────────────────────────

/// Outcome of a dispatch: the tentative stoplist with the request inserted,
/// the total added travel time, and the realised service windows.
///
/// `min_cost == f64::INFINITY` denotes infeasibility (capacity or some time
/// window would be violated for every candidate insertion); the stoplist is
/// then absent and the windows meaningless.
#[derive(Clone, Debug)]
pub struct InsertionResult<L: Location> {
    pub new_stoplist: Option<Stoplist<L>>,
    pub min_cost: f64,
    pub pickup_window: TimeWindow,
    pub delivery_window: TimeWindow,
}

impl<L: Location> InsertionResult<L> {
    /// The canonical "no feasible insertion" value.
    pub fn infeasible() -> Self {
        Self {
            new_stoplist: None,
            min_cost: f64::INFINITY,
            pickup_window: TimeWindow::UNBOUNDED,
            delivery_window: TimeWindow::UNBOUNDED,
        }
    }

    #[inline]
    pub fn is_feasible(&self) -> bool {
        self.min_cost.is_finite()
    }
}

// ── Dispatcher ────────────────────────────────────────────────────────────────

/// Maps `(request, stoplist)` to a cost and a tentative new stoplist.
///
/// # Purity
///
/// `dispatch` must not mutate its inputs and must be deterministic: the
/// fleet runs one call per vehicle, possibly in parallel, and compares the
/// returned costs.  Any internal caching has to be synchronised.
pub trait Dispatcher<S: TransportSpace>: Send + Sync {
    fn dispatch(
        &self,
        request: &Arc<TransportationRequest<S::Loc>>,
        stoplist: &Stoplist<S::Loc>,
        space: &S,
        seat_capacity: u32,
    ) -> InsertionResult<S::Loc>;
}
