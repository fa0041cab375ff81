//! Per-hop adjacency map.
//!
//! One `AdjacencyMap` holds every edge returned by a single hop, indexed by the
//! ordered pair `(matched vertex, adjacent vertex)`. Parallel edges between the
//! same pair are kept side by side in an [`EdgeSet`].
//!
//! Iteration follows insertion order, so a store that emits edges in a stable
//! order yields a stable walk enumeration order.

use indexmap::{IndexMap, IndexSet};

use crate::edge::{Edge, VertexValue};

/// Insertion-ordered map keyed with `ahash`.
pub type OrderedMap<K, V> = IndexMap<K, V, ahash::RandomState>;

/// Insertion-ordered set keyed with `ahash`.
pub type OrderedSet<T> = IndexSet<T, ahash::RandomState>;

/// Edges connecting one `(matched, adjacent)` pair at one hop.
pub type EdgeSet<V> = OrderedSet<Edge<V>>;

/// Adjacency index for a single hop.
#[derive(Debug, Clone)]
pub struct AdjacencyMap<V> {
    /// matched -> (adjacent -> edges)
    forward: OrderedMap<V, OrderedMap<V, EdgeSet<V>>>,
    /// adjacent -> {matched}
    reverse: OrderedMap<V, OrderedSet<V>>,
}

impl<V: VertexValue> Default for AdjacencyMap<V> {
    fn default() -> Self {
        Self {
            forward: OrderedMap::default(),
            reverse: OrderedMap::default(),
        }
    }
}

impl<V: VertexValue> AdjacencyMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an edge under its own `(matched, adjacent)` key.
    ///
    /// Returns `false` if an identical edge was already present.
    pub fn put(&mut self, edge: Edge<V>) -> bool {
        let matched = edge.matched_vertex().clone();
        let adjacent = edge.adjacent_vertex().clone();

        self.reverse
            .entry(adjacent.clone())
            .or_default()
            .insert(matched.clone());

        self.forward
            .entry(matched)
            .or_default()
            .entry(adjacent)
            .or_default()
            .insert(edge)
    }

    /// Edge set for an exact pair, if any edge connects them.
    pub fn get(&self, matched: &V, adjacent: &V) -> Option<&EdgeSet<V>> {
        self.forward.get(matched)?.get(adjacent)
    }

    /// Edges for an exact pair; empty when the pair is absent.
    pub fn edges_between<'a>(
        &'a self,
        matched: &V,
        adjacent: &V,
    ) -> impl Iterator<Item = &'a Edge<V>> + 'a {
        self.get(matched, adjacent).into_iter().flatten()
    }

    /// Adjacent vertices reachable from `matched` at this hop.
    pub fn destinations_of<'a>(&'a self, matched: &V) -> impl Iterator<Item = &'a V> + 'a {
        self.forward
            .get(matched)
            .into_iter()
            .flat_map(|dests| dests.keys())
    }

    /// Matched vertices that reach `adjacent` at this hop.
    pub fn sources_of<'a>(&'a self, adjacent: &V) -> impl Iterator<Item = &'a V> + 'a {
        self.reverse.get(adjacent).into_iter().flatten()
    }

    pub fn contains_source(&self, matched: &V) -> bool {
        self.forward.contains_key(matched)
    }

    pub fn contains_destination(&self, adjacent: &V) -> bool {
        self.reverse.contains_key(adjacent)
    }

    /// Every matched vertex with at least one edge.
    pub fn all_sources(&self) -> impl Iterator<Item = &V> + '_ {
        self.forward.keys()
    }

    /// Every adjacent vertex with at least one edge.
    pub fn all_destinations(&self) -> impl Iterator<Item = &V> + '_ {
        self.reverse.keys()
    }

    /// Iterate `(matched, adjacent, edges)` entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&V, &V, &EdgeSet<V>)> + '_ {
        self.forward
            .iter()
            .flat_map(|(a, dests)| dests.iter().map(move |(b, edges)| (a, b, edges)))
    }

    /// Number of `(matched, adjacent)` entries.
    pub fn len(&self) -> usize {
        self.forward.values().map(|dests| dests.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Number of edges across all entries (parallel edges counted separately).
    pub fn edge_count(&self) -> usize {
        self.forward
            .values()
            .flat_map(|dests| dests.values())
            .map(|edges| edges.len())
            .sum()
    }

    /// Drop every entry whose matched vertex fails `keep`.
    ///
    /// Returns the number of `(matched, adjacent)` entries removed.
    pub fn retain_sources(&mut self, mut keep: impl FnMut(&V) -> bool) -> usize {
        let Self { forward, reverse } = self;
        let mut removed = 0;

        forward.retain(|matched, dests| {
            if keep(matched) {
                return true;
            }
            removed += dests.len();
            for adjacent in dests.keys() {
                if let Some(sources) = reverse.get_mut(adjacent) {
                    sources.shift_remove(matched);
                }
            }
            false
        });

        if removed > 0 {
            reverse.retain(|_, sources| !sources.is_empty());
        }
        removed
    }

    /// Drop every entry whose adjacent vertex fails `keep`.
    ///
    /// Returns the number of `(matched, adjacent)` entries removed.
    pub fn retain_destinations(&mut self, mut keep: impl FnMut(&V) -> bool) -> usize {
        let Self { forward, reverse } = self;
        let mut removed = 0;

        reverse.retain(|adjacent, sources| {
            if keep(adjacent) {
                return true;
            }
            for matched in sources.iter() {
                if let Some(dests) = forward.get_mut(matched) {
                    if dests.shift_remove(adjacent).is_some() {
                        removed += 1;
                    }
                }
            }
            false
        });

        if removed > 0 {
            forward.retain(|_, dests| !dests.is_empty());
        }
        removed
    }
}

impl<V: VertexValue> FromIterator<Edge<V>> for AdjacencyMap<V> {
    fn from_iter<I: IntoIterator<Item = Edge<V>>>(iter: I) -> Self {
        let mut map = Self::new();
        for edge in iter {
            map.put(edge);
        }
        map
    }
}

impl<V: VertexValue> Extend<Edge<V>> for AdjacencyMap<V> {
    fn extend<I: IntoIterator<Item = Edge<V>>>(&mut self, iter: I) {
        for edge in iter {
            self.put(edge);
        }
    }
}
