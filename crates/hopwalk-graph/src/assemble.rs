//! Walk assembly: depth-first enumeration over a built index.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::adjacency::EdgeSet;
use crate::edge::VertexValue;
use crate::pruned::PrunedAdjacencyIndex;
use crate::walk::Walk;

/// How parallel edges between one vertex pair become walk steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParallelEdges {
    /// Each parallel edge is its own step, so `a -{e1,e2}-> b` yields two walks.
    #[default]
    Separate,
    /// The whole edge set is one step: one walk per vertex path.
    Grouped,
}

/// Enumerates every walk of exactly `hop_count` hops through an index.
///
/// The index must be fully built; the hop count is taken from it once and
/// passed down the recursion, so one assembler can serve many seeds
/// concurrently.
pub struct WalkAssembler<'a, V> {
    index: &'a PrunedAdjacencyIndex<V>,
    hop_count: usize,
    parallel_edges: ParallelEdges,
}

impl<'a, V: VertexValue> WalkAssembler<'a, V> {
    pub fn new(index: &'a PrunedAdjacencyIndex<V>, parallel_edges: ParallelEdges) -> Self {
        Self {
            index,
            hop_count: index.hop_count(),
            parallel_edges,
        }
    }

    pub fn hop_count(&self) -> usize {
        self.hop_count
    }

    /// All walks starting at `seed`, in depth-first order.
    pub fn walks_from(&self, seed: &V) -> Vec<Walk<V>> {
        let mut walks = Vec::new();
        if self.hop_count == 0 {
            return walks;
        }
        let mut stack: Vec<EdgeSet<V>> = Vec::with_capacity(self.hop_count);
        self.descend(seed, &mut stack, &mut walks);
        walks
    }

    /// Walks for every seed, flattened in seed order.
    pub fn walks_from_all(&self, seeds: &[V]) -> Vec<Walk<V>> {
        seeds.iter().flat_map(|seed| self.walks_from(seed)).collect()
    }

    /// Like [`walks_from_all`](Self::walks_from_all), one rayon task per seed.
    pub fn par_walks_from_all(&self, seeds: &[V]) -> Vec<Walk<V>> {
        let per_seed: Vec<Vec<Walk<V>>> =
            seeds.par_iter().map(|seed| self.walks_from(seed)).collect();
        per_seed.into_iter().flatten().collect()
    }

    // `stack.len()` is the depth: one edge set per completed hop.
    fn descend(&self, curr: &V, stack: &mut Vec<EdgeSet<V>>, walks: &mut Vec<Walk<V>>) {
        let depth = stack.len();
        if depth == self.hop_count {
            walks.push(Walk::from_edge_sets(stack.clone()));
            return;
        }

        for next in self.index.destinations_of(depth, curr) {
            let Some(edges) = self.index.edges_between(depth, curr, next) else {
                continue;
            };
            match self.parallel_edges {
                ParallelEdges::Grouped => {
                    stack.push(edges.clone());
                    self.descend(next, stack, walks);
                    stack.pop();
                }
                ParallelEdges::Separate => {
                    for edge in edges {
                        stack.push(std::iter::once(edge.clone()).collect());
                        self.descend(next, stack, walks);
                        stack.pop();
                    }
                }
            }
        }
    }
}
