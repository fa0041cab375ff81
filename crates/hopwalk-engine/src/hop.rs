//! Hop execution: one store round-trip per hop.

use hopwalk_graph::{Edge, OrderedSet, VertexValue};

use crate::error::{WalkError, WalkResult};
use crate::store::{Context, GetElements, HopOperation, ScopedCursor, Store};

/// Where a hop takes its seeds from.
#[derive(Debug, Clone, Copy)]
pub enum HopInput<'a, V> {
    /// The caller's seed vertices (hop 0).
    Seeds(&'a [V]),
    /// The edges returned by the previous hop; the walk continues from their
    /// adjacent ends.
    Previous(&'a [Edge<V>]),
}

/// Edges retained for one hop.
#[derive(Debug, Clone)]
pub struct HopOutput<V> {
    pub edges: Vec<Edge<V>>,
    pub seed_count: usize,
    /// The store had more edges than the result limit allowed.
    pub truncated: bool,
}

/// Re-seed from the adjacent (not matched) vertex of each edge.
///
/// Order is first appearance; repeats are dropped so they do not spend the
/// next hop's result limit on duplicate matches.
pub fn seeds_from_adjacent<V: VertexValue>(edges: &[Edge<V>]) -> Vec<V> {
    let unique: OrderedSet<&V> = edges.iter().map(Edge::adjacent_vertex).collect();
    unique.into_iter().cloned().collect()
}

/// Runs hop queries against a store with a fixed result limit.
pub struct HopExecutor<'a, V, S: ?Sized> {
    store: &'a S,
    context: &'a Context,
    result_limit: usize,
    _vertex: std::marker::PhantomData<fn() -> V>,
}

impl<'a, V: VertexValue, S: Store<V> + ?Sized> HopExecutor<'a, V, S> {
    pub fn new(store: &'a S, context: &'a Context, result_limit: usize) -> Self {
        Self {
            store,
            context,
            result_limit,
            _vertex: std::marker::PhantomData,
        }
    }

    pub fn result_limit(&self) -> usize {
        self.result_limit
    }

    /// Execute hop `hop`, returning at most `result_limit` edges in store
    /// emission order.
    ///
    /// A hop with no seeds returns nothing without calling the store.
    pub async fn execute_hop(
        &self,
        hop: usize,
        input: HopInput<'_, V>,
        operation: &HopOperation,
    ) -> WalkResult<HopOutput<V>> {
        let seeds = match input {
            HopInput::Seeds(seeds) => seeds.to_vec(),
            HopInput::Previous(edges) => seeds_from_adjacent(edges),
        };
        let seed_count = seeds.len();

        if seeds.is_empty() {
            tracing::debug!(hop, "no seeds; skipping store query");
            return Ok(HopOutput {
                edges: Vec::new(),
                seed_count,
                truncated: false,
            });
        }

        let query = GetElements {
            seeds,
            operation: operation.clone(),
        };
        let cursor = self
            .store
            .execute(&query, self.context)
            .await
            .map_err(WalkError::at_hop(hop))?;
        let limited = ScopedCursor::new(cursor)
            .take(self.result_limit)
            .await
            .map_err(WalkError::at_hop(hop))?;

        tracing::debug!(
            hop,
            seeds = seed_count,
            edges = limited.edges.len(),
            truncated = limited.truncated,
            job_id = %self.context.job_id,
            "hop executed"
        );

        Ok(HopOutput {
            edges: limited.edges,
            seed_count,
            truncated: limited.truncated,
        })
    }
}
