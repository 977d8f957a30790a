//! Weighted relation graph over maps and agents.
//!
//! The graph is bipartite in spirit: map vertices connect to agent
//! vertices with a suitability weight, and agent vertices optionally
//! connect to each other with a co-play frequency weight. Vertices are
//! stored in an arena keyed by their lowercase identity; neighbour
//! tables hold identities rather than references, so there are no
//! ownership cycles.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Role;

mod builder;
mod view;

pub use builder::{build_graph, edge_weight, BuildOptions, MapSelection};
pub use view::{EdgeView, GraphView, VertexView};

/// Structural graph errors.
///
/// These indicate caller bugs and are never repaired silently. The two
/// probe queries (`get_weight`, `adjacent`) are deliberately exempt and
/// report "no relation" for unknown identities instead.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("vertex already exists: {0}")]
    DuplicateKey(String),

    #[error("unknown vertex: {0}")]
    UnknownVertex(String),

    #[error("self-loop edges are not allowed: {0}")]
    SelfLoop(String),
}

/// The two vertex kinds.
///
/// Agent-agent edges carry a co-play count rather than a suitability
/// score, so consumers must check the kind before interpreting a weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VertexKind {
    Map,
    Agent,
}

/// One vertex in the relation graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vertex {
    identity: String,
    kind: VertexKind,
    role: Option<Role>,
    neighbours: HashMap<String, f64>,
}

impl Vertex {
    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn kind(&self) -> VertexKind {
        self.kind
    }

    /// Agent sub-category, if this vertex is an agent with a known role.
    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn degree(&self) -> usize {
        self.neighbours.len()
    }

    /// Neighbour identities with their edge weights, in arbitrary order.
    pub fn neighbour_weights(&self) -> impl Iterator<Item = (&str, f64)> {
        self.neighbours.iter().map(|(id, w)| (id.as_str(), *w))
    }
}

/// Undirected weighted graph keyed by vertex identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeightedGraph {
    vertices: HashMap<String, Vertex>,
}

impl WeightedGraph {
    /// Create an empty graph with no vertices or edges.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an isolated vertex.
    pub fn add_vertex(
        &mut self,
        identity: impl Into<String>,
        kind: VertexKind,
        role: Option<Role>,
    ) -> Result<(), GraphError> {
        let identity = identity.into();
        if self.vertices.contains_key(&identity) {
            return Err(GraphError::DuplicateKey(identity));
        }
        self.vertices.insert(
            identity.clone(),
            Vertex {
                identity,
                kind,
                role,
                neighbours: HashMap::new(),
            },
        );
        Ok(())
    }

    /// Set the edge weight between two existing, distinct vertices.
    ///
    /// The weight is written symmetrically on both endpoints. Calling
    /// this again for the same pair overwrites the previous weight; the
    /// graph never holds more than one edge per pair.
    pub fn add_edge(&mut self, a: &str, b: &str, weight: f64) -> Result<(), GraphError> {
        if a == b {
            return Err(GraphError::SelfLoop(a.to_string()));
        }
        if !self.vertices.contains_key(a) {
            return Err(GraphError::UnknownVertex(a.to_string()));
        }
        if !self.vertices.contains_key(b) {
            return Err(GraphError::UnknownVertex(b.to_string()));
        }

        // Both lookups verified above.
        if let Some(va) = self.vertices.get_mut(a) {
            va.neighbours.insert(b.to_string(), weight);
        }
        if let Some(vb) = self.vertices.get_mut(b) {
            vb.neighbours.insert(a.to_string(), weight);
        }
        Ok(())
    }

    /// Weight of the edge between two identities.
    ///
    /// Returns 0 when the pair is not adjacent or either identity is
    /// unknown; recommendation queries probe speculatively and treat
    /// "unknown" as "no relation".
    pub fn get_weight(&self, a: &str, b: &str) -> f64 {
        self.vertices
            .get(a)
            .and_then(|v| v.neighbours.get(b))
            .copied()
            .unwrap_or(0.0)
    }

    /// Whether two identities are adjacent. False if either is unknown.
    pub fn adjacent(&self, a: &str, b: &str) -> bool {
        self.vertices
            .get(a)
            .is_some_and(|v| v.neighbours.contains_key(b))
    }

    /// Neighbour identities of a vertex, sorted.
    pub fn neighbours_of(&self, id: &str) -> Result<BTreeSet<String>, GraphError> {
        let vertex = self
            .vertices
            .get(id)
            .ok_or_else(|| GraphError::UnknownVertex(id.to_string()))?;
        Ok(vertex.neighbours.keys().cloned().collect())
    }

    pub fn exists(&self, id: &str) -> bool {
        self.vertices.contains_key(id)
    }

    pub fn vertex_of(&self, id: &str) -> Option<&Vertex> {
        self.vertices.get(id)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.values()
    }

    /// Identities of every vertex of the given kind, sorted.
    pub fn identities_of_kind(&self, kind: VertexKind) -> Vec<String> {
        let mut out: Vec<String> = self
            .vertices
            .values()
            .filter(|v| v.kind == kind)
            .map(|v| v.identity.clone())
            .collect();
        out.sort();
        out
    }

    /// Total number of distinct edges.
    pub fn edge_count(&self) -> usize {
        let endpoint_sum: usize = self.vertices.values().map(Vertex::degree).sum();
        endpoint_sum / 2
    }
}
