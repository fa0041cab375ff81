//! GetWalks: the top-level walk request and its handler.

use hopwalk_graph::{AdjacencyMap, PrunedAdjacencyIndex, VertexValue, Walk, WalkAssembler};
use serde::{Deserialize, Serialize};

use crate::config::WalkConfig;
use crate::error::WalkResult;
use crate::hop::{HopExecutor, HopInput};
use crate::store::{Context, HopOperation, Store};

/// A request for every walk of `operations.len()` hops from `input`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetWalks<V> {
    /// Seed vertices; `None` means there is nothing to walk from.
    pub input: Option<Vec<V>>,
    /// One retrieval query per hop, in order.
    pub operations: Vec<HopOperation>,
    /// Maximum edges retained from the store at each hop.
    pub results_limit: usize,
}

impl<V: VertexValue> GetWalks<V> {
    pub fn new(results_limit: usize) -> Self {
        Self {
            input: None,
            operations: Vec::new(),
            results_limit,
        }
    }

    pub fn input<I: IntoIterator<Item = V>>(mut self, seeds: I) -> Self {
        self.input = Some(seeds.into_iter().collect());
        self
    }

    pub fn operation(mut self, operation: HopOperation) -> Self {
        self.operations.push(operation);
        self
    }

    pub fn operations<I: IntoIterator<Item = HopOperation>>(mut self, operations: I) -> Self {
        self.operations.extend(operations);
        self
    }

    pub fn hop_count(&self) -> usize {
        self.operations.len()
    }
}

/// Executes [`GetWalks`] requests against a [`Store`].
#[derive(Debug, Clone, Default)]
pub struct GetWalksHandler {
    config: WalkConfig,
}

impl GetWalksHandler {
    pub fn new(config: WalkConfig) -> WalkResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &WalkConfig {
        &self.config
    }

    /// Run a walk request.
    ///
    /// Returns `Ok(None)` when the request has no input (the store is not
    /// touched), `Ok(Some(vec![]))` for an empty hop chain, and otherwise every
    /// walk, grouped by seed in input order. Any hop failure fails the whole
    /// request.
    pub async fn do_operation<V, S>(
        &self,
        request: &GetWalks<V>,
        context: &Context,
        store: &S,
    ) -> WalkResult<Option<Vec<Walk<V>>>>
    where
        V: VertexValue,
        S: Store<V> + ?Sized,
    {
        let Some(seeds) = request.input.as_deref() else {
            return Ok(None);
        };
        if request.operations.is_empty() {
            return Ok(Some(Vec::new()));
        }

        let index = self
            .build_index(seeds, &request.operations, request.results_limit, context, store)
            .await?;

        let assembler = WalkAssembler::new(&index, self.config.parallel_edges);
        let walks = if self.config.parallel_assembly {
            assembler.par_walks_from_all(seeds)
        } else {
            assembler.walks_from_all(seeds)
        };

        tracing::info!(
            job_id = %context.job_id,
            hops = request.operations.len(),
            seeds = seeds.len(),
            walks = walks.len(),
            retained_edges = index.retained_edges(),
            pruned_entries = index.pruned_entries(),
            "walk request complete"
        );

        Ok(Some(walks))
    }

    /// Run every hop in order, feeding each result into a fresh index.
    async fn build_index<V, S>(
        &self,
        seeds: &[V],
        operations: &[HopOperation],
        results_limit: usize,
        context: &Context,
        store: &S,
    ) -> WalkResult<PrunedAdjacencyIndex<V>>
    where
        V: VertexValue,
        S: Store<V> + ?Sized,
    {
        let limit = self.config.effective_limit(results_limit);
        let executor = HopExecutor::new(store, context, limit);
        let mut index = PrunedAdjacencyIndex::with_seeds(seeds.iter().cloned(), self.config.prune);

        // Re-seeding uses the unpruned edges, so pruning cannot change which
        // seeds (and therefore which truncated results) the next hop sees.
        let mut previous = Vec::new();
        for (hop, operation) in operations.iter().enumerate() {
            let input = if hop == 0 {
                HopInput::Seeds(seeds)
            } else {
                HopInput::Previous(&previous)
            };
            let output = executor.execute_hop(hop, input, operation).await?;

            index.add(output.edges.iter().cloned().collect::<AdjacencyMap<V>>());
            previous = output.edges;
        }

        Ok(index)
    }
}
