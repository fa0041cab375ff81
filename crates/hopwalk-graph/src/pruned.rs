//! Pruned N-dimensional adjacency index.
//!
//! Holds one [`AdjacencyMap`] per hop. Hop `h` was seeded from the adjacent
//! vertices of hop `h - 1`, so an entry can only sit on a complete walk if it
//! connects to something on both sides. As each map arrives the index drops
//! entries that cannot:
//!
//! - **backward**: entries of the new map whose matched vertex is not a
//!   destination of the previous map (or not a seed, for hop 0 when seeds are
//!   known);
//! - **forward**: entries of the previous map whose adjacent vertex is not a
//!   source of the new map. Losing entries can strand entries further
//!   upstream, so the forward pass cascades towards hop 0 until a map loses
//!   nothing.
//!
//! Once the final map is added every retained entry lies on at least one
//! complete walk. Pruning only bounds memory: an index built with
//! [`PruneMode::Disabled`] enumerates the same walks.

use serde::{Deserialize, Serialize};

use crate::adjacency::{AdjacencyMap, EdgeSet, OrderedSet};
use crate::edge::{Edge, VertexValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PruneMode {
    #[default]
    Enabled,
    Disabled,
}

#[derive(Debug, Clone)]
pub struct PrunedAdjacencyIndex<V> {
    maps: Vec<AdjacencyMap<V>>,
    seeds: Option<OrderedSet<V>>,
    mode: PruneMode,
    pruned_entries: usize,
}

impl<V: VertexValue> PrunedAdjacencyIndex<V> {
    pub fn new(mode: PruneMode) -> Self {
        Self {
            maps: Vec::new(),
            seeds: None,
            mode,
            pruned_entries: 0,
        }
    }

    /// An index that also drops hop-0 entries not matched on one of `seeds`.
    pub fn with_seeds<I: IntoIterator<Item = V>>(seeds: I, mode: PruneMode) -> Self {
        Self {
            seeds: Some(seeds.into_iter().collect()),
            ..Self::new(mode)
        }
    }

    pub fn mode(&self) -> PruneMode {
        self.mode
    }

    /// Number of hop maps added so far.
    pub fn hop_count(&self) -> usize {
        self.maps.len()
    }

    /// Total `(matched, adjacent)` entries discarded by pruning.
    pub fn pruned_entries(&self) -> usize {
        self.pruned_entries
    }

    /// Edges currently retained across all hops.
    pub fn retained_edges(&self) -> usize {
        self.maps.iter().map(AdjacencyMap::edge_count).sum()
    }

    pub fn get(&self, hop: usize) -> Option<&AdjacencyMap<V>> {
        self.maps.get(hop)
    }

    pub fn maps(&self) -> &[AdjacencyMap<V>] {
        &self.maps
    }

    /// Incorporate the map for the next hop, pruning if enabled.
    ///
    /// Returns the number of entries removed by this call.
    pub fn add(&mut self, mut map: AdjacencyMap<V>) -> usize {
        let hop = self.maps.len();
        let mut removed = 0;

        if self.mode == PruneMode::Enabled {
            removed += match (self.maps.last(), &self.seeds) {
                (Some(prev), _) => map.retain_sources(|v| prev.contains_destination(v)),
                (None, Some(seeds)) => map.retain_sources(|v| seeds.contains(v)),
                (None, None) => 0,
            };

            for upstream in (0..hop).rev() {
                let (head, tail) = self.maps.split_at_mut(upstream + 1);
                let downstream = tail.first().unwrap_or(&map);
                let n = head[upstream].retain_destinations(|v| downstream.contains_source(v));
                removed += n;
                if n == 0 {
                    break;
                }
            }

            if removed > 0 {
                tracing::debug!(hop, removed, "pruned adjacency entries");
            }
        }

        self.pruned_entries += removed;
        self.maps.push(map);
        removed
    }

    /// Adjacent vertices reachable from `vertex` at `hop`.
    pub fn destinations_of<'a>(
        &'a self,
        hop: usize,
        vertex: &V,
    ) -> impl Iterator<Item = &'a V> + 'a {
        self.maps
            .get(hop)
            .map(|map| map.destinations_of(vertex))
            .into_iter()
            .flatten()
    }

    /// Edge set for `(matched, adjacent)` at `hop`, if present.
    pub fn edges_between(&self, hop: usize, matched: &V, adjacent: &V) -> Option<&EdgeSet<V>> {
        self.maps.get(hop)?.get(matched, adjacent)
    }

    /// Every edge retained at `hop`.
    pub fn edges_at(&self, hop: usize) -> impl Iterator<Item = &Edge<V>> + '_ {
        self.maps
            .get(hop)
            .into_iter()
            .flat_map(|map| map.iter().flat_map(|(_, _, edges)| edges.iter()))
    }
}
