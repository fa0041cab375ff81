//! Vertex and edge value model.
//!
//! A hop query seeded by vertex `v` may return edges where `v` is either the
//! source or the destination. Rather than re-deriving "which end matched" at
//! every lookup, an [`Edge`] records its matched end once, at construction, and
//! exposes the pair as [`Edge::matched_vertex`] / [`Edge::adjacent_vertex`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Anything usable as a vertex identifier.
///
/// Identity is by value: two vertices are the same vertex iff they compare
/// equal.
pub trait VertexValue: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

impl<T> VertexValue for T where T: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

/// Which endpoint of an edge was the seed of the hop that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchedEnd {
    Source,
    Destination,
}

impl MatchedEnd {
    pub fn opposite(self) -> Self {
        match self {
            MatchedEnd::Source => MatchedEnd::Destination,
            MatchedEnd::Destination => MatchedEnd::Source,
        }
    }
}

/// Opaque property value carried as edge payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        PropertyValue::Bool(v)
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        PropertyValue::Int(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        PropertyValue::Str(v.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        PropertyValue::Str(v)
    }
}

pub type Properties = BTreeMap<String, PropertyValue>;

/// An edge as returned by one hop's query.
///
/// Equality and hashing cover every field, including properties, so two
/// parallel edges between the same vertices stay distinct as long as any part
/// of their payload differs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge<V> {
    group: String,
    matched: V,
    adjacent: V,
    matched_end: MatchedEnd,
    directed: bool,
    properties: Properties,
}

impl<V: VertexValue> Edge<V> {
    /// Build an edge from its stored orientation and the end that matched the
    /// hop seed.
    pub fn new(
        group: impl Into<String>,
        source: V,
        destination: V,
        directed: bool,
        matched_end: MatchedEnd,
    ) -> Self {
        let (matched, adjacent) = match matched_end {
            MatchedEnd::Source => (source, destination),
            MatchedEnd::Destination => (destination, source),
        };
        Self {
            group: group.into(),
            matched,
            adjacent,
            matched_end,
            directed,
            properties: Properties::new(),
        }
    }

    /// Shorthand for a directed edge seeded from its source.
    pub fn outgoing(group: impl Into<String>, source: V, destination: V) -> Self {
        Self::new(group, source, destination, true, MatchedEnd::Source)
    }

    pub fn with_property(
        mut self,
        name: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn matched_vertex(&self) -> &V {
        &self.matched
    }

    pub fn adjacent_vertex(&self) -> &V {
        &self.adjacent
    }

    pub fn matched_end(&self) -> MatchedEnd {
        self.matched_end
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// The stored source vertex, independent of which end matched.
    pub fn source(&self) -> &V {
        match self.matched_end {
            MatchedEnd::Source => &self.matched,
            MatchedEnd::Destination => &self.adjacent,
        }
    }

    /// The stored destination vertex, independent of which end matched.
    pub fn destination(&self) -> &V {
        match self.matched_end {
            MatchedEnd::Source => &self.adjacent,
            MatchedEnd::Destination => &self.matched,
        }
    }

    /// The same stored edge, re-seeded from its other endpoint.
    pub fn flipped(&self) -> Self {
        Self {
            group: self.group.clone(),
            matched: self.adjacent.clone(),
            adjacent: self.matched.clone(),
            matched_end: self.matched_end.opposite(),
            directed: self.directed,
            properties: self.properties.clone(),
        }
    }
}
