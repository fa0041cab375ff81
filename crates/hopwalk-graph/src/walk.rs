//! Walk: the output of a multi-hop traversal.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::adjacency::{EdgeSet, OrderedSet};
use crate::edge::{Edge, VertexValue};

/// An ordered sequence of edge sets, one per hop.
///
/// Walks are built only by the [`WalkAssembler`](crate::WalkAssembler) and
/// own their edges; they stay valid after the index that produced them is
/// dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(
    serialize = "V: Serialize",
    deserialize = "V: Deserialize<'de> + VertexValue"
))]
pub struct Walk<V> {
    edges: Vec<EdgeSet<V>>,
}

impl<V: VertexValue> PartialEq for Walk<V> {
    fn eq(&self, other: &Self) -> bool {
        self.edges == other.edges
    }
}

impl<V: VertexValue> Eq for Walk<V> {}

impl<V: VertexValue> Walk<V> {
    pub(crate) fn from_edge_sets(edges: Vec<EdgeSet<V>>) -> Self {
        Self { edges }
    }

    /// Number of hops.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Edge set traversed at each hop.
    pub fn edges(&self) -> &[EdgeSet<V>] {
        &self.edges
    }

    pub fn into_edge_sets(self) -> Vec<EdgeSet<V>> {
        self.edges
    }

    /// All edges, hop by hop.
    pub fn edges_as_list(&self) -> Vec<&Edge<V>> {
        self.edges.iter().flatten().collect()
    }

    /// Matched vertex of the first hop.
    pub fn source_vertex(&self) -> Option<&V> {
        self.edges.first()?.first().map(Edge::matched_vertex)
    }

    /// Adjacent vertex of the last hop.
    pub fn destination_vertex(&self) -> Option<&V> {
        self.edges.last()?.first().map(Edge::adjacent_vertex)
    }

    /// Vertices visited, from the seed to the final adjacent vertex.
    pub fn vertices(&self) -> Vec<&V> {
        let mut out = Vec::with_capacity(self.edges.len() + 1);
        if let Some(source) = self.source_vertex() {
            out.push(source);
        }
        out.extend(
            self.edges
                .iter()
                .filter_map(|set| set.first().map(Edge::adjacent_vertex)),
        );
        out
    }

    /// True when no stored edge is traversed twice.
    ///
    /// An edge crossed once from each end counts as repeated.
    pub fn is_trail(&self) -> bool {
        let mut seen = HashSet::new();
        self.edges
            .iter()
            .flatten()
            .all(|e| seen.insert((e.group(), e.source(), e.destination(), e.properties())))
    }

    /// True when no vertex is visited twice.
    pub fn is_path(&self) -> bool {
        let vertices = self.vertices();
        let distinct: OrderedSet<&V> = vertices.iter().copied().collect();
        distinct.len() == vertices.len()
    }
}
