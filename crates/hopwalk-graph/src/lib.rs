//! Hopwalk graph core: turning per-hop query results into walks.
//!
//! A walk request is answered in layers. Each hop's query results are loaded
//! into an [`AdjacencyMap`] keyed by `(matched vertex, adjacent vertex)`; the
//! maps are collected into a [`PrunedAdjacencyIndex`] which discards entries
//! that cannot lie on a complete walk; finally a [`WalkAssembler`] runs a
//! depth-first search from every seed to enumerate the [`Walk`]s.
//!
//! ```text
//!   hop 0 results ──► AdjacencyMap ─┐
//!   hop 1 results ──► AdjacencyMap ─┼──► PrunedAdjacencyIndex ──► WalkAssembler ──► Vec<Walk>
//!   hop N results ──► AdjacencyMap ─┘
//! ```
//!
//! ## Multiplicity
//!
//! Parallel edges between the same vertex pair are never merged. With the
//! default [`ParallelEdges::Separate`] policy every parallel edge yields its own
//! walk; [`ParallelEdges::Grouped`] keeps them together as one step.
//!
//! This crate is synchronous and store-agnostic; fetching hop results is the
//! job of `hopwalk-engine`.

pub mod adjacency;
pub mod assemble;
pub mod edge;
pub mod pruned;
pub mod walk;

pub use adjacency::{AdjacencyMap, EdgeSet, OrderedMap, OrderedSet};
pub use assemble::{ParallelEdges, WalkAssembler};
pub use edge::{Edge, MatchedEnd, Properties, PropertyValue, VertexValue};
pub use pruned::{PruneMode, PrunedAdjacencyIndex};
pub use walk::Walk;
