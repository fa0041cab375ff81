//! In-memory reference store.
//!
//! An edge list with forward and backward indexes, answering
//! [`GetElements`] queries the way a real backend would: edges are matched on
//! either end according to the hop's [`IncludeIncomingOutgoing`] option, and
//! emitted seed by seed in insertion order.

use ahash::AHashMap;
use async_trait::async_trait;
use hopwalk_graph::{Edge, MatchedEnd, Properties, VertexValue};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::StoreError;
use crate::store::{
    Context, EdgeCursor, GetElements, HopOperation, IncludeIncomingOutgoing, Store, VecCursor,
};

/// An edge as stored, before any hop has matched it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEdge<V> {
    pub group: String,
    pub source: V,
    pub destination: V,
    pub directed: bool,
    pub properties: Properties,
}

impl<V: VertexValue> StoredEdge<V> {
    fn matched_from(&self, end: MatchedEnd) -> Edge<V> {
        Edge::new(
            self.group.clone(),
            self.source.clone(),
            self.destination.clone(),
            self.directed,
            end,
        )
        .with_properties(self.properties.clone())
    }
}

#[derive(Debug)]
struct Inner<V> {
    edges: Vec<StoredEdge<V>>,
    /// source -> edge ids
    by_source: AHashMap<V, Vec<usize>>,
    /// destination -> edge ids
    by_destination: AHashMap<V, Vec<usize>>,
}

/// Thread-safe in-memory graph store.
#[derive(Debug)]
pub struct MemoryStore<V> {
    inner: RwLock<Inner<V>>,
    open_cursors: Arc<AtomicUsize>,
    queries: AtomicUsize,
}

impl<V: VertexValue> Default for MemoryStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: VertexValue> MemoryStore<V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                edges: Vec::new(),
                by_source: AHashMap::new(),
                by_destination: AHashMap::new(),
            }),
            open_cursors: Arc::new(AtomicUsize::new(0)),
            queries: AtomicUsize::new(0),
        }
    }

    /// Add an edge, returning its insertion id.
    pub fn add_edge(&self, edge: StoredEdge<V>) -> usize {
        let mut inner = self.inner.write();
        let id = inner.edges.len();
        inner
            .by_source
            .entry(edge.source.clone())
            .or_default()
            .push(id);
        inner
            .by_destination
            .entry(edge.destination.clone())
            .or_default()
            .push(id);
        inner.edges.push(edge);
        id
    }

    /// Add a property-less edge.
    pub fn add(&self, group: &str, source: V, destination: V, directed: bool) -> usize {
        self.add_edge(StoredEdge {
            group: group.to_string(),
            source,
            destination,
            directed,
            properties: Properties::new(),
        })
    }

    pub fn len(&self) -> usize {
        self.inner.read().edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().edges.is_empty()
    }

    /// Cursors handed out and not yet released.
    pub fn open_cursors(&self) -> usize {
        self.open_cursors.load(Ordering::SeqCst)
    }

    /// Number of `execute` calls served.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    /// Edges matched by `seed` under `operation`, in insertion order.
    fn matches(inner: &Inner<V>, seed: &V, operation: &HopOperation) -> Vec<Edge<V>> {
        let mut hits: Vec<(usize, MatchedEnd)> = Vec::new();

        let wants_out = operation.include != IncludeIncomingOutgoing::Incoming;
        let wants_in = operation.include != IncludeIncomingOutgoing::Outgoing;

        for &id in inner.by_source.get(seed).into_iter().flatten() {
            let edge = &inner.edges[id];
            if wants_out || !edge.directed {
                hits.push((id, MatchedEnd::Source));
            }
        }
        for &id in inner.by_destination.get(seed).into_iter().flatten() {
            let edge = &inner.edges[id];
            let loop_already_matched =
                edge.source == edge.destination && (wants_out || !edge.directed);
            if loop_already_matched {
                continue;
            }
            if wants_in || !edge.directed {
                hits.push((id, MatchedEnd::Destination));
            }
        }

        hits.sort_by_key(|&(id, _)| id);
        hits.into_iter()
            .map(|(id, end)| (&inner.edges[id], end))
            .filter(|(edge, _)| {
                operation.accepts_group(&edge.group) && operation.directed.accepts(edge.directed)
            })
            .map(|(edge, end)| edge.matched_from(end))
            .collect()
    }
}

#[async_trait]
impl<V: VertexValue> Store<V> for MemoryStore<V> {
    async fn execute(
        &self,
        query: &GetElements<V>,
        _context: &Context,
    ) -> Result<Box<dyn EdgeCursor<V>>, StoreError> {
        self.queries.fetch_add(1, Ordering::SeqCst);

        let edges: Vec<Edge<V>> = {
            let inner = self.inner.read();
            query
                .seeds
                .iter()
                .flat_map(|seed| Self::matches(&inner, seed, &query.operation))
                .collect()
        };

        self.open_cursors.fetch_add(1, Ordering::SeqCst);
        let open = Arc::clone(&self.open_cursors);
        Ok(Box::new(VecCursor::new(edges).on_release(move || {
            open.fetch_sub(1, Ordering::SeqCst);
        })))
    }
}
