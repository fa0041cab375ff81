//! Store contract: the only way the engine reaches graph data.
//!
//! A [`Store`] answers one [`GetElements`] query with an [`EdgeCursor`]. The
//! cursor may hold backend resources (open scans, pooled connections), so the
//! engine never handles it bare: it is wrapped in a [`ScopedCursor`] that
//! releases it on every exit path, including early truncation, errors and a
//! dropped (cancelled) request future.

use async_trait::async_trait;
use hopwalk_graph::{Edge, VertexValue};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;

// ============================================================================
// Query Descriptors
// ============================================================================

/// Which edges a seed may match, relative to the edge's stored direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncludeIncomingOutgoing {
    #[default]
    Either,
    Incoming,
    Outgoing,
}

/// Filter on the edge's directed flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectedType {
    #[default]
    Either,
    Directed,
    Undirected,
}

impl DirectedType {
    pub fn accepts(self, directed: bool) -> bool {
        match self {
            DirectedType::Either => true,
            DirectedType::Directed => directed,
            DirectedType::Undirected => !directed,
        }
    }
}

/// One hop of a walk request: which edges to retrieve from each seed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HopOperation {
    /// Edge groups to return; empty means every group.
    pub groups: Vec<String>,
    pub include: IncludeIncomingOutgoing,
    pub directed: DirectedType,
}

impl HopOperation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.groups.push(group.into());
        self
    }

    pub fn outgoing(mut self) -> Self {
        self.include = IncludeIncomingOutgoing::Outgoing;
        self
    }

    pub fn incoming(mut self) -> Self {
        self.include = IncludeIncomingOutgoing::Incoming;
        self
    }

    pub fn directed_type(mut self, directed: DirectedType) -> Self {
        self.directed = directed;
        self
    }

    pub fn accepts_group(&self, group: &str) -> bool {
        self.groups.is_empty() || self.groups.iter().any(|g| g == group)
    }
}

/// A retrieval query sent to the store for one hop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetElements<V> {
    pub seeds: Vec<V>,
    pub operation: HopOperation,
}

/// Per-request execution context handed to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    pub job_id: Uuid,
    pub user_id: Option<String>,
}

impl Context {
    pub fn new() -> Self {
        Self {
            job_id: Uuid::new_v4(),
            user_id: None,
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Store Interface
// ============================================================================

/// A stream of edges produced by one store query.
#[async_trait]
pub trait EdgeCursor<V>: Send {
    /// Next edge in emission order, or `None` once exhausted.
    async fn next_edge(&mut self) -> Result<Option<Edge<V>>, StoreError>;

    /// Free backend resources. Called exactly once by [`ScopedCursor`].
    fn release(&mut self);
}

/// Trait for backing graph stores.
#[async_trait]
pub trait Store<V: VertexValue>: Send + Sync {
    /// Run a retrieval query, returning edges whose matched end is one of
    /// `query.seeds`.
    async fn execute(
        &self,
        query: &GetElements<V>,
        context: &Context,
    ) -> Result<Box<dyn EdgeCursor<V>>, StoreError>;
}

/// Edges read from a cursor under a result limit.
#[derive(Debug, Clone)]
pub struct LimitedEdges<V> {
    pub edges: Vec<Edge<V>>,
    /// The limit was reached before the cursor reported exhaustion.
    pub truncated: bool,
}

/// Owns a cursor and guarantees it is released once.
pub struct ScopedCursor<V> {
    inner: Option<Box<dyn EdgeCursor<V>>>,
}

impl<V: VertexValue> ScopedCursor<V> {
    pub fn new(cursor: Box<dyn EdgeCursor<V>>) -> Self {
        Self {
            inner: Some(cursor),
        }
    }

    /// Read at most `limit` edges in emission order, then release the cursor.
    ///
    /// On error the cursor is released by `Drop`.
    pub async fn take(mut self, limit: usize) -> Result<LimitedEdges<V>, StoreError> {
        let mut edges = Vec::new();
        let mut exhausted = false;

        if let Some(cursor) = self.inner.as_mut() {
            while edges.len() < limit {
                match cursor.next_edge().await? {
                    Some(edge) => edges.push(edge),
                    None => {
                        exhausted = true;
                        break;
                    }
                }
            }
        }

        self.close();
        Ok(LimitedEdges {
            edges,
            truncated: !exhausted,
        })
    }

    /// Release the cursor now.
    pub fn close(&mut self) {
        if let Some(mut cursor) = self.inner.take() {
            cursor.release();
        }
    }
}

impl<V> Drop for ScopedCursor<V> {
    fn drop(&mut self) {
        if let Some(mut cursor) = self.inner.take() {
            tracing::warn!("edge cursor dropped before completion; releasing");
            cursor.release();
        }
    }
}

/// Cursor over edges already materialized in memory.
pub struct VecCursor<V> {
    edges: std::vec::IntoIter<Edge<V>>,
    on_release: Option<Box<dyn FnOnce() + Send>>,
}

impl<V> VecCursor<V> {
    pub fn new(edges: Vec<Edge<V>>) -> Self {
        Self {
            edges: edges.into_iter(),
            on_release: None,
        }
    }

    /// Run `hook` when the cursor is released.
    pub fn on_release(mut self, hook: impl FnOnce() + Send + 'static) -> Self {
        self.on_release = Some(Box::new(hook));
        self
    }
}

#[async_trait]
impl<V: VertexValue> EdgeCursor<V> for VecCursor<V> {
    async fn next_edge(&mut self) -> Result<Option<Edge<V>>, StoreError> {
        Ok(self.edges.next())
    }

    fn release(&mut self) {
        self.edges = Vec::new().into_iter();
        if let Some(hook) = self.on_release.take() {
            hook();
        }
    }
}
