//! Hopwalk engine: multi-hop walk queries over a pluggable graph store.
//!
//! A [`GetWalks`] request names a list of seed vertices and one
//! [`HopOperation`] per hop. The [`GetWalksHandler`] runs the hops in order,
//! each against the [`Store`], re-seeding hop `k` from the adjacent vertices
//! found at hop `k - 1`:
//!
//! ```text
//!  seeds ─► hop 0 ─► adjacent vertices ─► hop 1 ─► ... ─► hop N-1
//!            │                             │                │
//!            ▼                             ▼                ▼
//!        AdjacencyMap                 AdjacencyMap     AdjacencyMap
//!            └──────────────► PrunedAdjacencyIndex ◄────────┘
//!                                     │
//!                                     ▼
//!                           WalkAssembler (per seed)
//! ```
//!
//! ## Resource Handling
//!
//! Every hop caps the store's stream at the request's result limit (itself
//! capped by [`WalkConfig::results_limit_cap`]) and releases the store cursor
//! through a [`ScopedCursor`], whether the hop drains it, stops early, fails, or
//! the request future is dropped.
//!
//! ## Outcomes
//!
//! - no input: `Ok(None)`, the store is never queried
//! - no hops: `Ok(Some(vec![]))`
//! - any hop failure: `Err(WalkError::Store { .. })`, no partial walks

pub mod config;
pub mod error;
pub mod handler;
pub mod hop;
pub mod memory;
pub mod store;

pub use config::{WalkConfig, DEFAULT_RESULTS_LIMIT_CAP};
pub use error::{StoreError, WalkError, WalkResult};
pub use handler::{GetWalks, GetWalksHandler};
pub use hop::{seeds_from_adjacent, HopExecutor, HopInput, HopOutput};
pub use memory::{MemoryStore, StoredEdge};
pub use store::{
    Context, DirectedType, EdgeCursor, GetElements, HopOperation, IncludeIncomingOutgoing,
    LimitedEdges, ScopedCursor, Store, VecCursor,
};

pub use hopwalk_graph::{
    Edge, MatchedEnd, ParallelEdges, PruneMode, PropertyValue, VertexValue, Walk,
};
